use std::path::Path;

use aetherkit_core::models::{Language, Settings};

use crate::cli::SettingsCommands;
use crate::commands::common::open_database;
use crate::error::CliError;

pub async fn run_settings(command: Option<SettingsCommands>, db_path: &Path) -> Result<(), CliError> {
    match command.unwrap_or(SettingsCommands::Show { json: false }) {
        SettingsCommands::Show { json } => run_settings_show(json, db_path).await,
        SettingsCommands::Set {
            venue,
            pay_to,
            language,
        } => run_settings_set(venue, pay_to, language.map(Language::from), db_path).await,
    }
}

async fn run_settings_show(as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path).await?;
    let settings = db.load_settings().await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&settings)?);
    } else {
        for line in format_settings_lines(&settings) {
            println!("{line}");
        }
    }
    Ok(())
}

async fn run_settings_set(
    venue: Option<String>,
    pay_to: Option<String>,
    language: Option<Language>,
    db_path: &Path,
) -> Result<(), CliError> {
    let db = open_database(db_path).await?;
    let mut settings = db.load_settings().await?;

    if let Some(venue) = venue {
        settings.default_venue = venue.trim().to_string();
    }
    if let Some(pay_to) = pay_to {
        settings.default_pay_to = pay_to.trim().to_string();
    }
    if let Some(language) = language {
        settings.language = language;
    }

    db.save_settings(&settings).await?;
    for line in format_settings_lines(&settings) {
        println!("{line}");
    }
    Ok(())
}

pub fn format_settings_lines(settings: &Settings) -> Vec<String> {
    let or_unset = |value: &str| {
        if value.is_empty() {
            "(unset)".to_string()
        } else {
            value.to_string()
        }
    };

    vec![
        format!("default_venue:    {}", or_unset(&settings.default_venue)),
        format!("default_pay_to:   {}", or_unset(&settings.default_pay_to)),
        format!("language:         {}", settings.language),
        format!(
            "last_template_id: {}",
            settings
                .last_template_id
                .as_ref()
                .map_or_else(|| "(none)".to_string(), ToString::to_string)
        ),
    ]
}
