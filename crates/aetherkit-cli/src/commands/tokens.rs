use std::path::Path;

use crate::commands::common::{normalize_template_identifier, open_database, resolve_template};
use crate::error::CliError;

pub async fn run_tokens(id: &str, db_path: &Path) -> Result<(), CliError> {
    let normalized_id = normalize_template_identifier(id)?;
    let db = open_database(db_path).await?;
    let template = resolve_template(&normalized_id, &db).await?;

    for token in template.tokens() {
        println!("{token}");
    }
    Ok(())
}
