use std::path::PathBuf;

use aetherkit_core::util::normalize_text_option;
use aetherkit_core::{ReconcilePolicy, RenderMode};

use crate::cli::ConfigCommands;
use crate::config::{config_path, CliConfig};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Show => {
            let config = CliConfig::load().map_err(CliError::Config)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        ConfigCommands::Set {
            default_db_path,
            import_policy,
            render_mode,
        } => {
            let mut config = CliConfig::load().map_err(CliError::Config)?;
            apply_config_update(
                &mut config,
                default_db_path,
                import_policy.map(ReconcilePolicy::from),
                render_mode.map(RenderMode::from),
            );
            let path = config.save().map_err(CliError::Config)?;
            println!("{}", path.display());
            Ok(())
        }
        ConfigCommands::Path => {
            let path = config_path().map_err(CliError::Config)?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

/// Apply the given values; an empty `db_path` clears the stored path
pub fn apply_config_update(
    config: &mut CliConfig,
    db_path: Option<String>,
    import_policy: Option<ReconcilePolicy>,
    render_mode: Option<RenderMode>,
) {
    if let Some(db_path) = db_path {
        config.db_path = normalize_text_option(Some(db_path)).map(PathBuf::from);
    }
    if let Some(policy) = import_policy {
        config.import_policy = policy;
    }
    if let Some(mode) = render_mode {
        config.render_mode = mode;
    }
}
