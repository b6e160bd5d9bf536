//! Top-level CLI definition and dispatch.

use std::path::PathBuf;

use clap::Parser;
use colored::{Colorize, control};
use thiserror::Error;

use bitui::core::config::Config;
use bitui::core::errors::BituiError;
use bitui::rpc::auth::Network;
use bitui::tui::dashboard::PopulateReport;
use bitui::tui::run_dashboard;

/// bitui: a scrolling terminal view of a Bitcoin node's recent blocks.
#[derive(Debug, Parser)]
#[command(
    name = "bitui",
    author,
    version,
    about = "Terminal block explorer for a bitcoind node",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// JSON-RPC endpoint of the node, e.g. http://127.0.0.1:18443
    #[arg(value_name = "URL")]
    url: String,
    /// Network the node serves; picks the cookie directory [default: regtest].
    #[arg(short = 'c', long = "chain", value_enum, value_name = "CHAIN")]
    chain: Option<Network>,
    /// RPC username.
    #[arg(short, long, conflicts_with = "cookie")]
    username: Option<String>,
    /// RPC password.
    #[arg(short, long, requires = "username")]
    password: Option<String>,
    /// Authenticate with the node's .cookie file.
    #[arg(short = 'C', long)]
    cookie: bool,
    /// bitcoind data directory holding the cookie [default: ~/.bitcoin].
    #[arg(short = 'd', long, value_name = "DIR")]
    data_dir: Option<PathBuf>,
    /// Override config file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Number of recent blocks to load at startup.
    #[arg(short = 'n', long = "blocks", value_name = "N")]
    blocks: Option<u64>,
    /// Session log (JSONL) path.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
    /// Disable colored output.
    #[arg(long)]
    no_color: bool,
}

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input or configuration.
    #[error("{0}")]
    User(String),
    /// Node, network, or terminal failure.
    #[error("{0}")]
    Runtime(String),
    /// Layout invariant violation.
    #[error("{0}")]
    Internal(String),
}

impl CliError {
    /// Process exit code contract for the CLI.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::User(_) => 1,
            Self::Runtime(_) => 2,
            Self::Internal(_) => 3,
        }
    }
}

impl From<BituiError> for CliError {
    fn from(err: BituiError) -> Self {
        let message = err.to_string();
        match err {
            BituiError::InvalidConfig { .. }
            | BituiError::MissingConfig { .. }
            | BituiError::ConfigParse { .. }
            | BituiError::Cookie { .. } => Self::User(message),
            BituiError::Geometry { .. } | BituiError::Capacity { .. } => Self::Internal(message),
            BituiError::DataFetch { .. }
            | BituiError::Rpc { .. }
            | BituiError::Transport { .. }
            | BituiError::Serialization { .. }
            | BituiError::Io { .. }
            | BituiError::Terminal { .. } => Self::Runtime(message),
        }
    }
}

/// Load config, apply flags, and run the dashboard.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color {
        control::set_override(false);
    }
    let config = resolve_config(cli)?;
    let report = run_dashboard(&config)?;
    print_report(&report);
    Ok(())
}

/// Effective configuration: file and environment, then command-line flags.
fn resolve_config(cli: &Cli) -> Result<Config, CliError> {
    // bitcoind serves RPC over plain HTTP only.
    if !cli.url.starts_with("http://") {
        return Err(CliError::User(format!(
            "URL must start with http://, got {:?}",
            cli.url
        )));
    }

    let mut config = Config::load(cli.config.as_deref())?;
    config.rpc.url.clone_from(&cli.url);
    if let Some(chain) = cli.chain {
        config.rpc.network = chain;
    }
    if cli.cookie {
        config.rpc.cookie = true;
    } else if let Some(username) = &cli.username {
        config.rpc.cookie = false;
        config.rpc.username = Some(username.clone());
        config.rpc.password.clone_from(&cli.password);
    }
    if let Some(dir) = &cli.data_dir {
        config.rpc.data_dir.clone_from(dir);
    }
    if let Some(blocks) = cli.blocks {
        config.dashboard.initial_blocks = blocks;
    }
    if let Some(path) = &cli.log_file {
        config.paths.log_file.clone_from(path);
    }
    config.validate()?;
    Ok(config)
}

fn print_report(report: &PopulateReport) {
    if let (Some(first), Some(last)) = (report.placed.first(), report.placed.last()) {
        println!(
            "{} {} blocks ({first}..={last})",
            "loaded".green(),
            report.placed.len()
        );
    }
    if !report.skipped.is_empty() {
        println!("{} heights {:?}", "skipped".yellow(), report.skipped);
    }
    if report.capacity_reached {
        println!(
            "{} canvas full; later blocks were not shown",
            "warning:".yellow().bold()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("bitui").chain(args.iter().copied()))
    }

    #[test]
    fn url_is_required() {
        assert!(parse(&[]).is_err());
    }

    #[test]
    fn full_flag_set_parses() {
        let cli = parse(&[
            "http://127.0.0.1:38332",
            "-c",
            "signet",
            "-u",
            "alice",
            "-p",
            "pw",
            "-d",
            "/data/btc",
            "-n",
            "12",
            "--log-file",
            "/tmp/s.jsonl",
        ])
        .unwrap();
        assert_eq!(cli.chain, Some(Network::Signet));
        assert_eq!(cli.username.as_deref(), Some("alice"));
        assert_eq!(cli.blocks, Some(12));
    }

    #[test]
    fn cookie_conflicts_with_username() {
        assert!(parse(&["http://x", "-C", "-u", "alice"]).is_err());
    }

    #[test]
    fn unknown_chain_rejected() {
        assert!(parse(&["http://x", "--chain", "mainnet"]).is_err());
    }

    #[test]
    fn flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.toml");
        std::fs::write(&path, "[rpc]\ncookie = true\n[dashboard]\ninitial_blocks = 3\n").unwrap();
        let path_arg = path.to_string_lossy().to_string();
        let cli = parse(&[
            "http://node:8332",
            "--config",
            &path_arg,
            "-u",
            "bob",
            "-n",
            "9",
        ])
        .unwrap();
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.rpc.url, "http://node:8332");
        assert!(!config.rpc.cookie);
        assert_eq!(config.rpc.username.as_deref(), Some("bob"));
        assert_eq!(config.dashboard.initial_blocks, 9);
    }

    #[test]
    fn zero_blocks_is_user_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.toml");
        std::fs::write(&path, "").unwrap();
        let path_arg = path.to_string_lossy().to_string();
        let cli = parse(&["http://x", "--config", &path_arg, "-n", "0"]).unwrap();
        let err = resolve_config(&cli).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn non_http_url_is_user_error() {
        let cli = parse(&["127.0.0.1:18443"]).unwrap();
        assert_eq!(resolve_config(&cli).unwrap_err().exit_code(), 1);
    }

    #[test]
    fn error_classes_map_to_exit_codes() {
        let geometry: CliError = BituiError::geometry("2x2").into();
        assert_eq!(geometry.exit_code(), 3);
        let transport: CliError = BituiError::Transport {
            method: "getblockchaininfo".to_string(),
            details: "refused".to_string(),
        }
        .into();
        assert_eq!(transport.exit_code(), 2);
        let config: CliError = BituiError::InvalidConfig {
            details: "x".to_string(),
        }
        .into();
        assert_eq!(config.exit_code(), 1);
    }
}
