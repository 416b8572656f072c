//! AetherKit CLI - fill message templates from the terminal
//!
//! Manage templates, render them with token values, and merge exports
//! between devices.

mod cli;
mod commands;
mod config;
mod error;


use aetherkit_core::ImportOptions;
use clap::{CommandFactory, Parser};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::create::run_create;
use crate::commands::delete::run_delete;
use crate::commands::duplicate::run_duplicate;
use crate::commands::edit::run_edit;
use crate::commands::export::run_export;
use crate::commands::favorite::run_favorite;
use crate::commands::import::run_import;
use crate::commands::list::run_list;
use crate::commands::recent::run_recent;
use crate::commands::render::run_render;
use crate::commands::seed::run_seed;
use crate::commands::settings::run_settings;
use crate::commands::show::run_show;
use crate::commands::tokens::run_tokens;
use crate::config::CliConfig;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let directive: Directive = "aetherkit=info"
        .parse()
        .map_err(|error| CliError::Config(format!("invalid log directive: {error}")))?;
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    match command {
        Commands::Config { command } => return run_config(command),
        Commands::Completions { shell, output } => {
            return run_completions(shell, output.as_deref());
        }
        _ => {}
    }

    let config = CliConfig::load().map_err(CliError::Config)?;
    let db_path = config
        .resolve_db_path(cli.db_path)
        .map_err(CliError::Config)?;
    tracing::debug!("Using database at {}", db_path.display());

    match command {
        Commands::List {
            category,
            favorites,
            json,
        } => run_list(category.map(Into::into), favorites, json, &db_path).await,
        Commands::Show { id, json } => run_show(&id, json, &db_path).await,
        Commands::New {
            name,
            category,
            favorite,
            content,
        } => run_create(name, category.map(Into::into), favorite, &content, &db_path).await,
        Commands::Edit {
            id,
            name,
            category,
            content,
        } => run_edit(&id, name, category.map(Into::into), content, &db_path).await,
        Commands::Delete { id } => run_delete(&id, &db_path).await,
        Commands::Favorite { id } => run_favorite(&id, &db_path).await,
        Commands::Duplicate { id } => run_duplicate(&id, &db_path).await,
        Commands::Tokens { id } => run_tokens(&id, &db_path).await,
        Commands::Render { id, set, mode, json } => {
            let mode = mode.map_or(config.render_mode, Into::into);
            run_render(id.as_deref(), &set, mode, json, &db_path).await
        }
        Commands::Recent { limit, json } => run_recent(limit, json, &db_path).await,
        Commands::Export { output } => run_export(output.as_deref(), &db_path).await,
        Commands::Import {
            path,
            policy,
            import_settings,
            json,
        } => {
            let options = ImportOptions::new(policy.map_or(config.import_policy, Into::into))
                .with_import_settings(import_settings);
            run_import(&path, options, json, &db_path).await
        }
        Commands::Seed => run_seed(&db_path).await,
        Commands::Settings { command } => run_settings(command, &db_path).await,
        Commands::Config { .. } | Commands::Completions { .. } => Ok(()),
    }
}
