#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::process::{Command, ExitStatus};
use std::time::{SystemTime, UNIX_EPOCH};

use bitui::core::errors::{BituiError, Result};
use bitui::layout::block::BlockSummary;
use bitui::rpc::{ChainSource, ChainSummary};
use serde_json::json;

pub struct CmdResult {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub log_path: PathBuf,
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis())
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn resolve_bin_path() -> PathBuf {
    if let Ok(path) = std::env::var("CARGO_BIN_EXE_bitui") {
        return PathBuf::from(path);
    }

    let exe_name = if cfg!(windows) { "bitui.exe" } else { "bitui" };
    let fallback = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .and_then(|deps| deps.parent().map(PathBuf::from))
        .map(|debug_dir| debug_dir.join(exe_name));

    match fallback {
        Some(path) if path.exists() => path,
        _ => panic!("unable to resolve bitui binary path for integration test"),
    }
}

/// Run the binary with `args`, keeping a transcript under the temp dir.
pub fn run_cli_case(case_name: &str, args: &[&str]) -> CmdResult {
    let root = std::env::temp_dir().join("bitui-test-logs");
    fs::create_dir_all(&root).expect("create temp test log dir");

    let log_path = root.join(format!("{}-{}.log", sanitize(case_name), now_millis()));
    let bin_path = resolve_bin_path();

    let output = Command::new(&bin_path)
        .args(args)
        .env("RUST_BACKTRACE", "1")
        .output()
        .expect("execute bitui command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    let mut log_content = String::new();
    log_content.push_str(&format!("case={case_name}\n"));
    log_content.push_str(&format!("bin={}\n", bin_path.display()));
    log_content.push_str(&format!("args={args:?}\n"));
    log_content.push_str(&format!("status={}\n", output.status));
    log_content.push_str("----- stdout -----\n");
    log_content.push_str(&stdout);
    log_content.push('\n');
    log_content.push_str("----- stderr -----\n");
    log_content.push_str(&stderr);
    log_content.push('\n');
    fs::write(&log_path, log_content).expect("write test log");

    CmdResult {
        status: output.status,
        stdout,
        stderr,
        log_path,
    }
}

/// In-memory chain of heights `0..=tip`; heights in `failing` return an RPC error.
pub struct ScriptedChain {
    pub tip: u64,
    pub failing: Vec<u64>,
    pub requested: Vec<u64>,
}

impl ScriptedChain {
    pub fn new(tip: u64) -> Self {
        Self {
            tip,
            failing: Vec::new(),
            requested: Vec::new(),
        }
    }

    pub fn failing(mut self, heights: &[u64]) -> Self {
        self.failing.extend_from_slice(heights);
        self
    }
}

impl ChainSource for ScriptedChain {
    fn get_chain_summary(&mut self) -> Result<ChainSummary> {
        ChainSummary::from_value(json!({
            "chain": "regtest",
            "blocks": self.tip,
            "headers": self.tip,
            "pruned": false,
        }))
    }

    fn get_block_by_height(&mut self, height: u64) -> Result<BlockSummary> {
        self.requested.push(height);
        if height > self.tip || self.failing.contains(&height) {
            return Err(BituiError::Rpc {
                method: "getblockhash".to_string(),
                code: -8,
                message: "Block height out of range".to_string(),
            });
        }
        Ok(BlockSummary {
            height,
            nonce: 1000 + height,
            confirmations: i64::try_from(self.tip - height + 1).unwrap_or(i64::MAX),
            hash: Some(format!("{height:064x}")),
            time: None,
            n_tx: Some(1),
        })
    }
}
