use std::path::{Path, PathBuf};

use aetherkit_core::export::{render_json_export, suggested_export_file_name};
use chrono::Utc;

use crate::commands::common::open_database;
use crate::error::CliError;

pub async fn run_export(output_path: Option<&Path>, db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path).await?;
    let document = db.export_templates().await?;
    let rendered = render_json_export(&document)?;

    if let Some(path) = output_path {
        let path = export_target(path);
        std::fs::write(&path, rendered)?;
        println!("{}", path.display());
    } else {
        println!("{rendered}");
    }

    Ok(())
}

/// Directories get a timestamped file name inside them
pub fn export_target(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(suggested_export_file_name(Utc::now().timestamp_millis()))
    } else {
        path.to_path_buf()
    }
}
