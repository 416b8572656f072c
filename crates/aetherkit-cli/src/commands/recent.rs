use std::path::Path;

use aetherkit_core::services::DatabaseService;
use aetherkit_core::Template;
use chrono::Utc;

use crate::commands::common::{
    format_relative_time, open_database, short_id, template_to_list_item, TemplateListItem,
};
use crate::error::CliError;

/// Recently rendered templates with their last-used time, newest first
pub async fn recent_templates(
    db: &DatabaseService,
    limit: usize,
) -> Result<Vec<(Template, i64)>, CliError> {
    let mut recent = Vec::new();
    for usage in db.recent_usage(limit).await? {
        if let Some(template) = db.get_template(&usage.template_id).await? {
            recent.push((template, usage.last_used_at));
        }
    }
    Ok(recent)
}

pub async fn run_recent(limit: usize, as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path).await?;
    let recent = recent_templates(&db, limit).await?;

    if as_json {
        let json_items = recent
            .iter()
            .map(|(template, _)| template_to_list_item(template))
            .collect::<Vec<TemplateListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
        return Ok(());
    }

    if recent.is_empty() {
        eprintln!("Nothing rendered yet");
        return Ok(());
    }

    let now_ms = Utc::now().timestamp_millis();
    for (template, last_used_at) in &recent {
        println!(
            "{:<13} {:<24}  used {}",
            short_id(&template.id),
            template.name,
            format_relative_time(*last_used_at, now_ms)
        );
    }
    Ok(())
}
