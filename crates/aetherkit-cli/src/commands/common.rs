use std::collections::HashMap;
use std::env;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use aetherkit_core::services::DatabaseService;
use aetherkit_core::{Template, TemplateId};
use chrono::Utc;
use serde::Serialize;

use crate::error::CliError;

const SHORT_ID_LEN: usize = 13;

#[derive(Debug, Serialize)]
pub struct TemplateListItem {
    pub id: String,
    pub name: String,
    pub category: String,
    pub favorite: bool,
    pub preview: String,
    pub tokens: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub relative_time: String,
}

pub async fn open_database(path: &Path) -> Result<DatabaseService, CliError> {
    Ok(DatabaseService::open_path(path.to_path_buf()).await?)
}

pub async fn resolve_template(
    template_query: &str,
    db: &DatabaseService,
) -> Result<Template, CliError> {
    if let Some(template_id) = TemplateId::parse(template_query) {
        if let Some(template) = db.get_template(&template_id).await? {
            return Ok(template);
        }
    }

    let matching_ids = db.list_template_ids_by_prefix(template_query, 3).await?;

    match matching_ids.as_slice() {
        [] => Err(CliError::TemplateNotFound(template_query.to_string())),
        [resolved_id] => db
            .get_template(resolved_id)
            .await?
            .ok_or_else(|| CliError::TemplateNotFound(template_query.to_string())),
        _ => {
            let options = matching_ids
                .iter()
                .map(short_id)
                .collect::<Vec<_>>()
                .join(", ");

            Err(CliError::AmbiguousTemplateId(format!(
                "ID prefix '{template_query}' is ambiguous; matches: {options}"
            )))
        }
    }
}

pub fn short_id(id: &TemplateId) -> String {
    id.as_str().chars().take(SHORT_ID_LEN).collect()
}

pub fn format_template_lines(templates: &[Template]) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    templates
        .iter()
        .map(|template| {
            let marker = if template.favorite { '*' } else { ' ' };
            let name = template_preview(&template.name, 24);
            let relative_time = format_relative_time(template.updated_at, now_ms);
            format!(
                "{:<13} {marker} {name:<24}  {:<8}  {relative_time}",
                short_id(&template.id),
                template.category.as_str(),
            )
        })
        .collect()
}

pub fn template_to_list_item(template: &Template) -> TemplateListItem {
    let now_ms = Utc::now().timestamp_millis();

    TemplateListItem {
        id: template.id.to_string(),
        name: template.name.clone(),
        category: template.category.as_str().to_string(),
        favorite: template.favorite,
        preview: template_preview(&template.content, 80),
        tokens: template.tokens(),
        created_at: template.created_at,
        updated_at: template.updated_at,
        relative_time: format_relative_time(template.updated_at, now_ms),
    }
}

/// First line of `text`, whitespace-collapsed and cut to `max_chars`
pub fn template_preview(text: &str, max_chars: usize) -> String {
    let first_line = text.lines().next().unwrap_or("").trim();
    let collapsed = first_line.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn format_timestamp(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms).map_or_else(
        || timestamp_ms.to_string(),
        |date_time| date_time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

/// Parse repeated `TOKEN=VALUE` flags; later assignments win.
pub fn parse_token_assignments(assignments: &[String]) -> Result<HashMap<String, String>, CliError> {
    assignments
        .iter()
        .map(|assignment| {
            let (name, value) = assignment
                .split_once('=')
                .ok_or_else(|| CliError::InvalidTokenAssignment(assignment.clone()))?;
            let name = name.trim();
            let name = name
                .strip_prefix('{')
                .and_then(|inner| inner.strip_suffix('}'))
                .unwrap_or(name);
            if name.is_empty() {
                return Err(CliError::InvalidTokenAssignment(assignment.clone()));
            }
            Ok((name.to_string(), value.to_string()))
        })
        .collect()
}

pub fn resolve_template_content(content_parts: &[String]) -> Result<String, CliError> {
    if let Some(content) = normalize_content(&content_parts.join(" ")) {
        return Ok(content);
    }

    if let Some(content) = read_piped_stdin()? {
        return Ok(content);
    }

    if let Some(content) = capture_editor_input()? {
        return Ok(content);
    }

    Err(CliError::EmptyContent)
}

pub fn normalize_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn normalize_template_identifier(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyTemplateId)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_content(&buffer))
}

pub fn capture_editor_input() -> Result<Option<String>, CliError> {
    capture_editor_input_with_initial("")
}

pub fn capture_editor_input_with_initial(
    initial_content: &str,
) -> Result<Option<String>, CliError> {
    let editor = preferred_editor();
    let temp_file = create_temp_template_file_path();
    std::fs::write(&temp_file, initial_content)?;

    let launch_result = launch_editor(&editor, &temp_file);
    let template_content = std::fs::read_to_string(&temp_file)?;
    let _ = std::fs::remove_file(&temp_file);

    launch_result?;
    Ok(normalize_content(&template_content))
}

pub fn launch_editor(editor: &str, file_path: &Path) -> Result<(), CliError> {
    match Command::new(editor).arg(file_path).status() {
        Ok(status) => {
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            let mut parts = editor.split_whitespace();
            let Some(program) = parts.next() else {
                return Err(CliError::EditorFailed("empty EDITOR command".into()));
            };

            let mut command = Command::new(program);
            command.args(parts).arg(file_path);

            let status = command.status()?;
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) => Err(CliError::Io(err)),
    }
}

pub fn preferred_editor() -> String {
    env::var("VISUAL")
        .or_else(|_| env::var("EDITOR"))
        .unwrap_or_else(|_| default_editor().to_string())
}

pub const fn default_editor() -> &'static str {
    if cfg!(windows) {
        "notepad"
    } else {
        "vi"
    }
}

pub fn create_temp_template_file_path() -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_nanos());
    env::temp_dir().join(format!("aetherkit-template-{}-{now}.txt", std::process::id()))
}
