use anyhow::Result;

use crate::{TemplateArgs, load_schema};

pub(crate) fn run_schema(templates: &TemplateArgs) -> Result<()> {
    let schema = load_schema(templates)?;
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
