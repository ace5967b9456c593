//! Irradiate - atomic-test technique refinement
//!
//! CLI entry point standing in for the automation host.

use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use tracing::{debug, info};

use irradiate::cli::{Cli, Command};
use irradiate::config::Config;
use irradiate::{Pipeline, Substitutor, TranslationTable};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Priority: CLI --log-level > config file > INFO
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    debug!("Logging initialized (level: {:?})", level);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let pipeline =
        Pipeline::new(config.paths()).with_substitutor(Substitutor::default().with_policy(config.missing_argument));

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Process { techniques } => {
            let mut failed = Vec::new();
            for id in &techniques {
                match pipeline
                    .process_technique(id)
                    .context(format!("Failed to process technique {}", id))?
                {
                    Some(produced) => println!("{} {}", "✓".green(), produced),
                    None => {
                        println!("{} {}", "✗".red(), id);
                        failed.push(id.clone());
                    }
                }
            }
            info!(processed = techniques.len() - failed.len(), failed = failed.len(), "Processing complete");
            if !failed.is_empty() {
                return Err(eyre!("No output produced for: {}", failed.join(", ")));
            }
        }
        Command::Show { technique } => {
            let yaml = pipeline
                .refine_only(&technique)
                .context(format!("Failed to refine technique {}", technique))?;
            print!("{}", yaml);
        }
        Command::Translate { command, os } => {
            let table = TranslationTable::load(&config.translations).context("Failed to load translation table")?;
            println!("{}", table.translate(&command, &os));
        }
        Command::List => {
            let ids = pipeline.list_techniques().context("Failed to list techniques")?;
            if ids.is_empty() {
                println!("No techniques found in {}", config.atomics_dir.display());
            } else {
                for id in ids {
                    println!("{}", id);
                }
            }
        }
    }

    Ok(())
}
