//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for assist-stream
#[derive(Parser, Debug)]
#[command(name = "assist-stream")]
#[command(author, version, about = "Streaming chat and model download client for a local assistant backend")]
#[command(long_about = r#"
assist-stream talks to a local assistant backend: it streams chat replies as
they are generated and tracks model downloads until they finish.

Configuration files are loaded from (in priority order):
1. ASSIST_<SECTION>__<KEY>   Environment variables
2. --config <path>          Explicit config file
3. ./assist.toml            Project-level config
4. ~/.config/assist-stream/config.toml   Global config

Example:
  assist-stream chat -m qwen2.5-3b "Explain ownership in one paragraph"
  assist-stream chat -m qwen2.5-3b
  assist-stream download qwen2.5-3b sd-v1-5
  assist-stream watch
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress bars (print plain lines instead)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Also write diagnostics to a daily-rotated file in this directory
    #[arg(long, value_name = "DIR", global = true)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Send a message and stream the reply (interactive when MESSAGE is omitted)
    Chat {
        /// Model to answer with (defaults to chat.default_model)
        #[arg(short, long, value_name = "MODEL")]
        model: Option<String>,

        /// Message to send
        message: Option<String>,
    },

    /// Start downloads and track them until they finish
    Download {
        /// Catalog ids to download
        #[arg(required = true, value_name = "ID")]
        ids: Vec<String>,
    },

    /// Resume tracking downloads the server reports as in progress
    Watch,

    /// Cancel a running download
    Cancel {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Delete an installed model
    Delete {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// List the model catalog
    Catalog,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_one_shot_chat() {
        let cli = Cli::parse_from(["assist-stream", "-vv", "chat", "-m", "phi-3", "hello"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(
            cli.command,
            Some(Command::Chat {
                model: Some("phi-3".into()),
                message: Some("hello".into())
            })
        );
    }

    #[test]
    fn test_parse_download_many() {
        let cli = Cli::parse_from(["assist-stream", "download", "a", "b", "--quiet"]);
        assert!(cli.quiet);
        assert_eq!(
            cli.command,
            Some(Command::Download {
                ids: vec!["a".into(), "b".into()]
            })
        );
    }

    #[test]
    fn test_download_requires_an_id() {
        assert!(Cli::try_parse_from(["assist-stream", "download"]).is_err());
    }

    #[test]
    fn test_show_config_without_command() {
        let cli = Cli::parse_from(["assist-stream", "--show-config"]);
        assert!(cli.show_config);
        assert!(cli.command.is_none());
    }
}
