use std::io::{self, Read};
use std::path::Path;

use aetherkit_core::export::parse_import_text;
use aetherkit_core::{Error, ImportOptions, ImportSummary, ReconcilePolicy};

use crate::commands::common::open_database;
use crate::error::CliError;

pub async fn run_import(
    source: &Path,
    options: ImportOptions,
    as_json: bool,
    db_path: &Path,
) -> Result<(), CliError> {
    let raw = read_source(source)?;
    let payload = parse_import_text(&raw)?;

    let db = open_database(db_path).await?;
    let summary = db
        .import_templates(&payload, options)
        .await
        .map_err(|error| match error {
            Error::InvalidRecord { id, reason } => CliError::ImportRejected { id, reason },
            other => CliError::Core(other),
        })?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", format_import_summary(&summary, options.policy));
    }
    Ok(())
}

pub fn format_import_summary(summary: &ImportSummary, policy: ReconcilePolicy) -> String {
    format!(
        "Imported {} templates ({}): {} inserted, {} updated, {} kept local, {} skipped",
        summary.total(),
        policy.as_str(),
        summary.inserted,
        summary.updated,
        summary.kept_local,
        summary.skipped
    )
}

fn read_source(source: &Path) -> Result<String, CliError> {
    if source == Path::new("-") {
        let mut buffer = String::new();
        io::stdin().lock().read_to_string(&mut buffer)?;
        return Ok(buffer);
    }
    Ok(std::fs::read_to_string(source)?)
}
