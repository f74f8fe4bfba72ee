//! Command-line interface for visaid
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Vision-guided walking assistance for Termux
#[derive(Parser, Debug)]
#[command(
    name = "visaid",
    version,
    about = "Vision-guided walking assistance for Android phones running Termux"
)]
pub struct Cli {
    /// Subcommand to execute (default: walk)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Camera to use (back, front)
    #[arg(long, global = true, value_name = "CAMERA")]
    pub camera: Option<String>,

    /// Suppress textual output (speech still happens)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: info, -vv: debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a single capture-describe-instruct-speak cycle
    Once,

    /// Run cycles continuously until Ctrl-C
    Walk {
        /// Seconds between cycles (default from config). Examples: 10, 30s, 1m
        #[arg(long, short = 'i', value_name = "DURATION", value_parser = parse_interval_secs)]
        interval: Option<u64>,
    },

    /// Check system dependencies
    Check,
}

/// Parse an interval string into seconds.
///
/// Supports any duration format accepted by `humantime`: bare numbers
/// (seconds), single-unit (`30s`, `5m`), and compound (`1m30s`).
fn parse_interval_secs(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(secs);
    }
    humantime::parse_duration(s)
        .map(|d| d.as_secs())
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_number_is_seconds() {
        assert_eq!(parse_interval_secs("10"), Ok(10));
    }

    #[test]
    fn test_parse_humantime_formats() {
        assert_eq!(parse_interval_secs("30s"), Ok(30));
        assert_eq!(parse_interval_secs("5m"), Ok(300));
        assert_eq!(parse_interval_secs("1m30s"), Ok(90));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_interval_secs("soon").is_err());
    }

    #[test]
    fn test_cli_parses_walk_with_interval() {
        let cli = Cli::parse_from(["visaid", "walk", "--interval", "30s"]);
        match cli.command {
            Some(Commands::Walk { interval }) => assert_eq!(interval, Some(30)),
            other => panic!("expected walk, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_defaults_to_no_subcommand() {
        let cli = Cli::parse_from(["visaid"]);
        assert!(cli.command.is_none());
        assert!(!cli.quiet);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::parse_from(["visaid", "-q", "-vv", "--camera", "front", "once"]);
        assert!(cli.quiet);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.camera.as_deref(), Some("front"));
        assert!(matches!(cli.command, Some(Commands::Once)));
    }
}
