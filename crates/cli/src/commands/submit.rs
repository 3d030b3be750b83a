use anyhow::Result;
use emolabel_core::LabelForm;

use crate::{SheetArgs, TemplateArgs, connect, load_schema, resolve_settings};

/// Parses `column=value`; the value may be empty or contain `=`.
pub(crate) fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (column, value) = raw.split_once('=').ok_or_else(|| format!("expected COLUMN=VALUE, got `{raw}`"))?;
    let column = column.trim();
    if column.is_empty() {
        return Err(format!("empty column name in `{raw}`"));
    }
    Ok((column.to_owned(), value.trim().to_owned()))
}

pub(crate) async fn run_submit(
    templates: &TemplateArgs,
    sheet: &SheetArgs,
    values: Vec<(String, String)>,
    uncertain: bool,
) -> Result<()> {
    let schema = load_schema(templates)?;
    let mut form = LabelForm::new(&schema);
    for (column, value) in values {
        form.set(&column, value)?;
    }
    if uncertain {
        form.mark_uncertain();
    }
    form.validate()?;

    let settings = resolve_settings(sheet)?;
    let (service, _) = connect(&settings, &schema).await?;
    let row = service.submit(&form).await?;
    println!("{}", serde_json::to_string(&row)?);
    Ok(())
}
