use std::path::Path;

use aetherkit_core::RenderMode;
use serde::Serialize;

use crate::commands::common::{
    normalize_template_identifier, open_database, parse_token_assignments, resolve_template,
};
use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct RenderOutput {
    pub id: String,
    pub name: String,
    pub mode: RenderMode,
    pub text: String,
    pub missing: Vec<String>,
}

pub async fn run_render(
    id: Option<&str>,
    assignments: &[String],
    mode: RenderMode,
    as_json: bool,
    db_path: &Path,
) -> Result<(), CliError> {
    let values = parse_token_assignments(assignments)?;
    let db = open_database(db_path).await?;

    let template_id = if let Some(id) = id {
        let normalized_id = normalize_template_identifier(id)?;
        resolve_template(&normalized_id, &db).await?.id
    } else {
        db.load_settings()
            .await?
            .last_template_id
            .ok_or(CliError::NoRecentTemplate)?
    };

    let rendered = db.render_template(&template_id, &values, mode).await?;

    if as_json {
        let output = RenderOutput {
            id: rendered.template.id.to_string(),
            name: rendered.template.name,
            mode,
            text: rendered.text,
            missing: rendered.missing,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", rendered.text);
    if !rendered.missing.is_empty() {
        eprintln!("Missing values: {}", rendered.missing.join(", "));
    }
    Ok(())
}
