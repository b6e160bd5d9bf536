//! RPC credentials: explicit user/password or bitcoind's auth cookie.
//!
//! When bitcoind runs without `rpcuser`/`rpcpassword` it writes a `.cookie`
//! file holding `__cookie__:<random>` into the network's data directory on
//! every start.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::client::Credentials;
use crate::core::errors::{BituiError, Result};

/// Cookie file name inside the network data directory.
pub const COOKIE_FILE: &str = ".cookie";

/// Which Bitcoin network the node serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Main,
    Test,
    Signet,
    #[default]
    Regtest,
}

impl Network {
    /// Sub-directory of the data dir bitcoind uses for this network.
    #[must_use]
    pub const fn data_subdir(self) -> Option<&'static str> {
        match self {
            Self::Main => None,
            Self::Test => Some("testnet3"),
            Self::Signet => Some("signet"),
            Self::Regtest => Some("regtest"),
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Test => "test",
            Self::Signet => "signet",
            Self::Regtest => "regtest",
        }
    }
}

/// How to authenticate against the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcAuth {
    Anonymous,
    UserPass(Credentials),
    Cookie { data_dir: PathBuf, network: Network },
}

impl RpcAuth {
    /// Credentials to send, reading the cookie file if needed.
    pub fn resolve(&self) -> Result<Option<Credentials>> {
        match self {
            Self::Anonymous => Ok(None),
            Self::UserPass(creds) => Ok(Some(creds.clone())),
            Self::Cookie { data_dir, network } => {
                read_cookie(&cookie_path(data_dir, *network)).map(Some)
            }
        }
    }
}

/// `<data_dir>[/<network dir>]/.cookie`, with a leading `~` expanded.
#[must_use]
pub fn cookie_path(data_dir: &Path, network: Network) -> PathBuf {
    let mut path = expand_home(data_dir);
    if let Some(sub) = network.data_subdir() {
        path.push(sub);
    }
    path.push(COOKIE_FILE);
    path
}

/// Parse a cookie file of the form `user:password`.
pub fn read_cookie(path: &Path) -> Result<Credentials> {
    let raw = fs::read_to_string(path).map_err(|source| BituiError::io(path, source))?;
    parse_cookie(raw.trim()).ok_or_else(|| BituiError::Cookie {
        path: path.to_path_buf(),
        details: "expected `user:password`".to_string(),
    })
}

fn parse_cookie(raw: &str) -> Option<Credentials> {
    let (username, password) = raw.split_once(':')?;
    if username.is_empty() || password.is_empty() {
        return None;
    }
    Some(Credentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// Replace a leading `~` with `$HOME`. Paths without one are returned as is.
#[must_use]
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(rest),
        None => path.to_path_buf(),
    }
}
