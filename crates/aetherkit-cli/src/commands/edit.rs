use std::path::Path;

use aetherkit_core::models::TemplatePatch;
use aetherkit_core::TemplateCategory;

use crate::commands::common::{
    capture_editor_input_with_initial, normalize_template_identifier, open_database,
    resolve_template,
};
use crate::error::CliError;

pub async fn run_edit(
    id: &str,
    name: Option<String>,
    category: Option<TemplateCategory>,
    content: Option<String>,
    db_path: &Path,
) -> Result<(), CliError> {
    let normalized_id = normalize_template_identifier(id)?;
    let db = open_database(db_path).await?;
    let template = resolve_template(&normalized_id, &db).await?;

    let mut patch = TemplatePatch {
        name: name.map(|name| name.trim().to_string()),
        category,
        content,
        favorite: None,
    };

    if patch.is_empty() {
        let Some(edited_content) = capture_editor_input_with_initial(&template.content)? else {
            return Err(CliError::EmptyEditedContent);
        };
        if edited_content == template.content {
            println!("{}", template.id);
            return Ok(());
        }
        patch.content = Some(edited_content);
    }

    let updated = db.update_template(&template.id, &patch).await?;
    println!("{}", updated.id);
    Ok(())
}
