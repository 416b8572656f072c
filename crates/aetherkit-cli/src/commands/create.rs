use std::path::Path;

use aetherkit_core::models::NewTemplate;
use aetherkit_core::util::normalize_text_option;
use aetherkit_core::TemplateCategory;

use crate::commands::common::{open_database, resolve_template_content};
use crate::error::CliError;

pub async fn run_create(
    name: Option<String>,
    category: Option<TemplateCategory>,
    favorite: bool,
    content_parts: &[String],
    db_path: &Path,
) -> Result<(), CliError> {
    let content = resolve_template_content(content_parts)?;
    let defaults = NewTemplate::default();
    let draft = NewTemplate {
        name: normalize_text_option(name).unwrap_or(defaults.name),
        category: category.unwrap_or(defaults.category),
        content,
        favorite,
    };

    let db = open_database(db_path).await?;
    let template = db.create_template(&draft).await?;

    println!("{}", template.id);
    Ok(())
}
