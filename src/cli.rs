use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::config::{Config, DEFAULT_CONFIG_FILE};

#[derive(Debug, Parser)]
#[command(
    name = "planboard",
    version,
    about = "Terminal view of an agent's task plan and its active tool set"
)]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Todo list written by the agent (JSON array)
    #[arg(long, global = true)]
    pub todos: Option<PathBuf>,

    /// Settings snapshot written by the desktop shell (JSON object)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Open the interactive plan view (default)
    Watch,
    /// Print the tool definitions exposed to the model as JSON
    Tools {
        /// Print the full catalog, ignoring settings
        #[arg(long)]
        all: bool,
    },
    /// Print plan progress as JSON
    Progress,
}

impl Cli {
    /// Command-line paths win over the config file.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(path) = &self.todos {
            config.todos_file = path.clone();
        }
        if let Some(path) = &self.settings {
            config.settings_file = path.clone();
        }
        if let Some(path) = &self.log_file {
            config.log_file = Some(path.clone());
        }
    }

    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Watch)
    }
}
