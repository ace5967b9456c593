//! CLI argument parsing for irradiate

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "irr")]
#[command(author, version, about = "Refine atomic-test techniques into executable YAML", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Refine techniques and write them to the output directory
    Process {
        /// Technique identifiers (e.g. T1057)
        #[arg(required = true)]
        techniques: Vec<String>,
    },

    /// Print a refined technique without writing it
    Show {
        /// Technique identifier
        #[arg(required = true)]
        technique: String,
    },

    /// Translate an executor name for a platform
    Translate {
        /// Generic command name (e.g. sh, powershell)
        #[arg(required = true)]
        command: String,

        /// Platform (e.g. linux, windows)
        #[arg(required = true)]
        os: String,
    },

    /// List technique identifiers in the corpus
    List,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_process_many() {
        let cli = Cli::parse_from(["irr", "process", "T1057", "T1033"]);
        match cli.command {
            Command::Process { techniques } => assert_eq!(techniques, vec!["T1057", "T1033"]),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["irr", "translate", "sh", "linux", "-l", "debug", "-c", "x.yml"]);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.config, Some(PathBuf::from("x.yml")));
    }

    #[test]
    fn test_process_requires_technique() {
        assert!(Cli::try_parse_from(["irr", "process"]).is_err());
    }
}
