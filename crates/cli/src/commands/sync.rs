use anyhow::Result;

use crate::{SheetArgs, TemplateArgs, connect, load_schema, resolve_settings};

pub(crate) async fn run_sync(templates: &TemplateArgs, sheet: &SheetArgs) -> Result<()> {
    let schema = load_schema(templates)?;
    let settings = resolve_settings(sheet)?;
    let (_, report) = connect(&settings, &schema).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub(crate) async fn run_count(templates: &TemplateArgs, sheet: &SheetArgs) -> Result<()> {
    let schema = load_schema(templates)?;
    let settings = resolve_settings(sheet)?;
    let (service, _) = connect(&settings, &schema).await?;
    println!("{}", service.saved_rows().await?);
    Ok(())
}
