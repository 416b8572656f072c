use std::path::PathBuf;

use aetherkit_core::models::{Language, TemplateCategory};
use aetherkit_core::{ReconcilePolicy, RenderMode};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "aetherkit")]
#[command(about = "Fill message templates from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List templates, favorites first
    List {
        /// Only show one category
        #[arg(short, long, value_enum)]
        category: Option<CategoryArg>,
        /// Only show favorites
        #[arg(long)]
        favorites: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a template
    Show {
        /// Template ID or unique ID prefix
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new template
    #[command(alias = "add")]
    New {
        /// Template name
        #[arg(short, long)]
        name: Option<String>,
        /// Template category
        #[arg(short, long, value_enum)]
        category: Option<CategoryArg>,
        /// Mark as favorite
        #[arg(long)]
        favorite: bool,
        /// Template content (read from stdin or $EDITOR when omitted)
        content: Vec<String>,
    },
    /// Edit an existing template
    Edit {
        /// Template ID or unique ID prefix
        id: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New category
        #[arg(long, value_enum)]
        category: Option<CategoryArg>,
        /// New content (opens $EDITOR when no field flag is given)
        #[arg(long)]
        content: Option<String>,
    },
    /// Delete a template
    Delete {
        /// Template ID or unique ID prefix
        id: String,
    },
    /// Toggle the favorite flag of a template
    Favorite {
        /// Template ID or unique ID prefix
        id: String,
    },
    /// Copy a template under a new id
    Duplicate {
        /// Template ID or unique ID prefix
        id: String,
    },
    /// List the tokens a template uses
    Tokens {
        /// Template ID or unique ID prefix
        id: String,
    },
    /// Render a template with token values
    Render {
        /// Template ID or unique ID prefix (defaults to the last rendered template)
        id: Option<String>,
        /// Token value, repeatable
        #[arg(short, long = "set", value_name = "TOKEN=VALUE")]
        set: Vec<String>,
        /// How unfilled tokens are rendered (config default when omitted)
        #[arg(long, value_enum)]
        mode: Option<RenderModeArg>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List recently rendered templates
    Recent {
        /// Maximum number of templates to show
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export all templates as JSON
    Export {
        /// Output file or directory (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Merge templates from an export file
    Import {
        /// Export file to read (`-` for stdin)
        path: PathBuf,
        /// Conflict policy (config default when omitted)
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,
        /// Also import settings carried by the file
        #[arg(long)]
        import_settings: bool,
        /// Output the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add the starter templates to an empty database
    Seed,
    /// Show or change app settings
    Settings {
        #[command(subcommand)]
        command: Option<SettingsCommands>,
    },
    /// Show or change CLI configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CategoryArg {
    Receipt,
    Event,
    Rp,
    Custom,
}

impl From<CategoryArg> for TemplateCategory {
    fn from(value: CategoryArg) -> Self {
        match value {
            CategoryArg::Receipt => Self::Receipt,
            CategoryArg::Event => Self::Event,
            CategoryArg::Rp => Self::Rp,
            CategoryArg::Custom => Self::Custom,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum RenderModeArg {
    Preview,
    Final,
    Verbatim,
}

impl From<RenderModeArg> for RenderMode {
    fn from(value: RenderModeArg) -> Self {
        match value {
            RenderModeArg::Preview => Self::Preview,
            RenderModeArg::Final => Self::Final,
            RenderModeArg::Verbatim => Self::Verbatim,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum PolicyArg {
    TimestampWins,
    MergeOverwrite,
}

impl From<PolicyArg> for ReconcilePolicy {
    fn from(value: PolicyArg) -> Self {
        match value {
            PolicyArg::TimestampWins => Self::TimestampWins,
            PolicyArg::MergeOverwrite => Self::MergeOverwrite,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum LanguageArg {
    En,
    FrCa,
}

impl From<LanguageArg> for Language {
    fn from(value: LanguageArg) -> Self {
        match value {
            LanguageArg::En => Self::English,
            LanguageArg::FrCa => Self::CanadianFrench,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Print current settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update settings; blank values clear a default
    Set {
        /// Default value for the {venue} token
        #[arg(long, value_name = "TEXT")]
        venue: Option<String>,
        /// Default value for the {pay_to} token
        #[arg(long, value_name = "TEXT")]
        pay_to: Option<String>,
        /// Interface language
        #[arg(long, value_enum)]
        language: Option<LanguageArg>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Update configuration values
    Set {
        /// Default database file (empty to clear)
        #[arg(long, value_name = "PATH")]
        default_db_path: Option<String>,
        /// Default import policy
        #[arg(long, value_enum)]
        import_policy: Option<PolicyArg>,
        /// Default render mode
        #[arg(long, value_enum)]
        render_mode: Option<RenderModeArg>,
    },
    /// Print the configuration file path
    Path,
}
