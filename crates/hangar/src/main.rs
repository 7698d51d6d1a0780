// SPDX-FileCopyrightText: 2026 Hangar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hangar - local plugin loader and instance reconciler.
//!
//! This is the binary entry point.

mod check;
mod load;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hangar_config::HangarConfig;
use hangar_core::{HangarError, classify};
use tracing::error;

/// Hangar - local plugin loader and instance reconciler.
#[derive(Parser, Debug)]
#[command(name = "hangar", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Load plugins from the given roots (default: configured plugin_paths).
    Load {
        paths: Vec<PathBuf>,
    },
    /// Parse one plugin directory and print its normalized manifest.
    Check {
        dir: PathBuf,
    },
    /// Print the effective configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => hangar_config::load_and_validate_path(path),
        None => hangar_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            hangar_config::render_errors(&errors);
            let class = classify(&HangarError::Configuration(String::new()));
            std::process::exit(class.exit_code);
        }
    };

    init_tracing(&config.logging.level);

    let result = match cli.command {
        Some(Commands::Load { paths }) => load::run_load(&config, paths).await,
        Some(Commands::Check { dir }) => check::run_check(&config, &dir),
        Some(Commands::Config) => print_config(&config),
        None => {
            println!("hangar: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        let class = classify(&e);
        error!(error = %e, class = class.label, "command failed");
        eprintln!("error[{}]: {e}", class.label);
        std::process::exit(class.exit_code);
    }
}

fn print_config(config: &HangarConfig) -> Result<(), HangarError> {
    let rendered = toml::to_string_pretty(config)
        .map_err(|e| HangarError::Internal(format!("cannot render config: {e}")))?;
    print!("{rendered}");
    Ok(())
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hangar={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn load_accepts_multiple_roots() {
        let cli = Cli::try_parse_from(["hangar", "load", "a", "b"]).unwrap();
        match cli.command {
            Some(Commands::Load { paths }) => {
                assert_eq!(paths, vec![PathBuf::from("a"), PathBuf::from("b")])
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn check_requires_a_directory() {
        assert!(Cli::try_parse_from(["hangar", "check"]).is_err());
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = hangar_config::load_and_validate_str("").expect("default config should be valid");
        assert_eq!(config.loader.manifest_file, "plugin.toml");
        assert!(print_config(&config).is_ok());
    }
}
