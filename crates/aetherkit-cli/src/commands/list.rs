use std::path::Path;

use aetherkit_core::TemplateCategory;

use crate::commands::common::{
    format_template_lines, open_database, template_to_list_item, TemplateListItem,
};
use crate::error::CliError;

pub async fn run_list(
    category: Option<TemplateCategory>,
    favorites_only: bool,
    as_json: bool,
    db_path: &Path,
) -> Result<(), CliError> {
    let db = open_database(db_path).await?;
    let mut templates = db.list_templates(category).await?;
    if favorites_only {
        templates.retain(|template| template.favorite);
    }

    if as_json {
        let json_items = templates
            .iter()
            .map(template_to_list_item)
            .collect::<Vec<TemplateListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else if templates.is_empty() {
        eprintln!("No templates yet. Run `aetherkit seed` or `aetherkit new`.");
    } else {
        for line in format_template_lines(&templates) {
            println!("{line}");
        }
    }

    Ok(())
}
