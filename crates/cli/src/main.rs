mod commands;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use emolabel_core::constants::{DEFAULT_EXAMPLE_PATH, DEFAULT_FEATURES_PATH};
use emolabel_core::env_config::env_non_empty;
use emolabel_core::settings::{SPREADSHEET_ID_VAR, WORKSHEET_NAME_VAR};
use emolabel_core::{HostedSecrets, Schema, Settings, Table, derive_schema};
use emolabel_service::{LabelService, SyncReport};
use emolabel_sheets::SheetsClient;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "emolabel")]
#[command(about = "Label driver-emotion video clips into a shared Google Sheet", long_about = None)]
struct Cli {
    #[command(flatten)]
    templates: TemplateArgs,
    #[command(flatten)]
    sheet: SheetArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct TemplateArgs {
    /// Features workbook (field name in column B, value in column C)
    #[arg(long, global = true, default_value = DEFAULT_FEATURES_PATH)]
    features: PathBuf,
    /// Example-labels workbook whose header row defines the columns
    #[arg(long, global = true, default_value = DEFAULT_EXAMPLE_PATH)]
    example: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct SheetArgs {
    #[arg(long, global = true, env = "SPREADSHEET_ID")]
    spreadsheet_id: Option<String>,
    #[arg(long, global = true, env = "WORKSHEET_NAME")]
    worksheet: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the derived form schema as JSON
    Schema,
    /// Create or reconcile the worksheet and print what changed
    Sync,
    /// Print the number of saved label rows
    Count,
    /// Append one label row
    Submit {
        /// Column value as `column=value`; repeatable
        #[arg(long = "set", value_name = "COLUMN=VALUE", value_parser = commands::submit::parse_assignment)]
        values: Vec<(String, String)>,
        /// Flag the label as uncertain
        #[arg(long)]
        uncertain: bool,
    },
    /// Interactively label clips from stdin
    Label {
        /// Local .mp4 files to label
        clips: Vec<PathBuf>,
        /// Text file with one clip URL per line
        #[arg(long)]
        urls: Option<PathBuf>,
    },
}

pub(crate) fn load_schema(templates: &TemplateArgs) -> Result<Schema> {
    let features = Table::read_optional(&templates.features)?;
    let example = Table::read_optional(&templates.example)?;
    if example.is_none() {
        tracing::info!(path = %templates.example.display(), "Example template not found, using default columns");
    }
    Ok(derive_schema(features.as_ref(), example.as_ref()))
}

pub(crate) fn resolve_settings(sheet: &SheetArgs) -> Result<Settings> {
    let secrets = HostedSecrets::load_default()?;
    let lookup = |key: &str| {
        let flag = match key {
            SPREADSHEET_ID_VAR => sheet.spreadsheet_id.clone(),
            WORKSHEET_NAME_VAR => sheet.worksheet.clone(),
            _ => None,
        };
        flag.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty()).or_else(|| env_non_empty(key))
    };
    Ok(Settings::resolve_with(lookup, secrets.as_ref())?)
}

pub(crate) async fn connect(settings: &Settings, schema: &Schema) -> Result<(LabelService, SyncReport)> {
    let client = SheetsClient::from_credentials(&settings.credentials).context("loading service account")?;
    let session = emolabel_core::LabelSession::new(settings.clone(), schema.clone(), Vec::new());
    let (service, report) = LabelService::connect(Arc::new(client), &session)
        .await
        .with_context(|| format!("opening worksheet {}", settings.worksheet_name))?;
    Ok((service, report))
}

pub(crate) fn read_url_list(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Schema => commands::schema::run_schema(&cli.templates)?,
        Commands::Sync => commands::sync::run_sync(&cli.templates, &cli.sheet).await?,
        Commands::Count => commands::sync::run_count(&cli.templates, &cli.sheet).await?,
        Commands::Submit { values, uncertain } => {
            commands::submit::run_submit(&cli.templates, &cli.sheet, values, uncertain).await?;
        },
        Commands::Label { clips, urls } => {
            commands::label::run_label(&cli.templates, &cli.sheet, clips, urls).await?;
        },
    }

    Ok(())
}
