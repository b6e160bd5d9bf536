//! Configuration system: TOML file + env var overrides + smart defaults.
//!
//! Precedence, lowest first: built-in defaults, the TOML file, `BITUI_*`
//! environment variables, then command-line flags (applied by the CLI).

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::errors::{BituiError, Result};
use crate::layout::chain::BlockGeometry;
use crate::rpc::auth::{Network, RpcAuth};
use crate::rpc::client::Credentials;

/// Full bitui configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub rpc: RpcConfig,
    pub dashboard: DashboardConfig,
    pub paths: PathsConfig,
}

/// Node connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RpcConfig {
    pub url: String,
    pub network: Network,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Authenticate with the node's `.cookie` file instead of user/password.
    pub cookie: bool,
    /// bitcoind data directory; `~` expands to `$HOME`.
    pub data_dir: PathBuf,
    /// HTTP timeout; 0 keeps the HTTP client's default.
    pub timeout_ms: u64,
}

/// Dashboard layout and loop knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    /// Sleep between input polls.
    pub tick_ms: u64,
    /// Columns moved per scroll key press.
    pub scroll_step: u16,
    /// How many of the most recent blocks to fetch at startup.
    pub initial_blocks: u64,
    /// Canvas width as a multiple of the visible frame width.
    pub canvas_multiplier: u16,
    pub block_width: u16,
    pub block_height: u16,
    /// Canvas row of each block's top border.
    pub block_top: u16,
    /// Share of the screen height given to the block history.
    pub split_percent: f64,
}

/// Filesystem paths used by bitui.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    pub config_file: PathBuf,
    pub log_file: PathBuf,
    /// Session log used when `log_file` cannot be opened or written.
    pub fallback_log_file: Option<PathBuf>,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:18443".to_string(),
            network: Network::default(),
            username: None,
            password: None,
            cookie: false,
            data_dir: PathBuf::from("~/.bitcoin"),
            timeout_ms: 0,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let block = BlockGeometry::default();
        Self {
            tick_ms: 10,
            scroll_step: 10,
            initial_blocks: 5,
            canvas_multiplier: 10,
            block_width: block.width,
            block_height: block.height,
            block_top: block.top,
            split_percent: 0.5,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let home_dir = env::var_os("HOME").map_or_else(
            || {
                eprintln!(
                    "[BUI-CONFIG] WARNING: HOME not set, falling back to /tmp for data paths"
                );
                PathBuf::from("/tmp")
            },
            PathBuf::from,
        );
        Self {
            config_file: home_dir.join(".config").join("bitui").join("config.toml"),
            log_file: home_dir
                .join(".local")
                .join("share")
                .join("bitui")
                .join("session.jsonl"),
            fallback_log_file: Some(env::temp_dir().join("bitui").join("session.jsonl")),
        }
    }
}

impl RpcConfig {
    /// Authentication mode implied by these settings. The cookie wins over
    /// a username; no username means anonymous.
    #[must_use]
    pub fn auth(&self) -> RpcAuth {
        if self.cookie {
            return RpcAuth::Cookie {
                data_dir: self.data_dir.clone(),
                network: self.network,
            };
        }
        match &self.username {
            Some(username) => RpcAuth::UserPass(Credentials {
                username: username.clone(),
                password: self.password.clone().unwrap_or_default(),
            }),
            None => RpcAuth::Anonymous,
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

impl DashboardConfig {
    #[must_use]
    pub const fn block_geometry(&self) -> BlockGeometry {
        BlockGeometry {
            height: self.block_height,
            width: self.block_width,
            top: self.block_top,
        }
    }

    #[must_use]
    pub const fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

impl Config {
    /// Default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        PathsConfig::default().config_file
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from default path; defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);
        let is_explicit_path = path.is_some();

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| BituiError::Io {
                path: path_buf.clone(),
                source,
            })?;
            let parsed: Self = toml::from_str(&raw)?;
            parsed
        } else if is_explicit_path {
            return Err(BituiError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.paths.config_file = path_buf;
        cfg.apply_env_overrides_from(env_var)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply `BITUI_*` overrides, resolving each name through `lookup`.
    pub fn apply_env_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        // rpc
        if let Some(url) = lookup("BITUI_RPC_URL") {
            self.rpc.url = url;
        }
        if let Some(raw) = lookup("BITUI_NETWORK") {
            self.rpc.network = parse_network(&raw)?;
        }
        if let Some(user) = lookup("BITUI_RPC_USER") {
            self.rpc.username = Some(user);
        }
        if let Some(password) = lookup("BITUI_RPC_PASSWORD") {
            self.rpc.password = Some(password);
        }
        set_bool(&lookup, "BITUI_RPC_COOKIE", &mut self.rpc.cookie)?;
        if let Some(dir) = lookup("BITUI_DATA_DIR") {
            self.rpc.data_dir = PathBuf::from(dir);
        }
        set_parsed(&lookup, "BITUI_RPC_TIMEOUT_MS", &mut self.rpc.timeout_ms)?;

        // dashboard
        set_parsed(&lookup, "BITUI_TICK_MS", &mut self.dashboard.tick_ms)?;
        set_parsed(&lookup, "BITUI_SCROLL_STEP", &mut self.dashboard.scroll_step)?;
        set_parsed(
            &lookup,
            "BITUI_INITIAL_BLOCKS",
            &mut self.dashboard.initial_blocks,
        )?;
        set_parsed(
            &lookup,
            "BITUI_CANVAS_MULTIPLIER",
            &mut self.dashboard.canvas_multiplier,
        )?;

        // paths
        if let Some(path) = lookup("BITUI_LOG_FILE") {
            self.paths.log_file = PathBuf::from(path);
        }
        if let Some(path) = lookup("BITUI_FALLBACK_LOG_FILE") {
            self.paths.fallback_log_file = Some(PathBuf::from(path));
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |details: String| Err(BituiError::InvalidConfig { details });

        if self.rpc.url.trim().is_empty() {
            return invalid("rpc.url must not be empty".to_string());
        }
        let dash = &self.dashboard;
        for (name, value) in [
            ("tick_ms", dash.tick_ms),
            ("scroll_step", u64::from(dash.scroll_step)),
            ("initial_blocks", dash.initial_blocks),
            ("canvas_multiplier", u64::from(dash.canvas_multiplier)),
        ] {
            if value == 0 {
                return invalid(format!("dashboard.{name} must be > 0"));
            }
        }
        if dash.block_width < 3 || dash.block_height < 3 {
            return invalid(format!(
                "dashboard block must be at least 3x3, got {}x{}",
                dash.block_height, dash.block_width
            ));
        }
        if !(dash.split_percent > 0.0 && dash.split_percent < 1.0) {
            return invalid(format!(
                "dashboard.split_percent must be in (0, 1), got {}",
                dash.split_percent
            ));
        }
        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn set_parsed<F, T>(lookup: &F, name: &str, slot: &mut T) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    if let Some(raw) = lookup(name) {
        *slot = raw.trim().parse::<T>().map_err(|error| BituiError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })?;
    }
    Ok(())
}

fn set_bool<F>(lookup: &F, name: &str, slot: &mut bool) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    set_parsed(lookup, name, slot)
}

fn parse_network(raw: &str) -> Result<Network> {
    match raw.trim() {
        "main" => Ok(Network::Main),
        "test" => Ok(Network::Test),
        "signet" => Ok(Network::Signet),
        "regtest" => Ok(Network::Regtest),
        other => Err(BituiError::ConfigParse {
            context: "env",
            details: format!("BITUI_NETWORK={other:?}: expected main, test, signet or regtest"),
        }),
    }
}
