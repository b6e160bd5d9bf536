//! JSONL session log: append-only line-delimited JSON.
//!
//! Each line is a self-contained JSON object assembled in memory and written
//! with a single `write_all`, so `tail -f` never sees a partial line.
//!
//! Degradation chain:
//! 1. Primary file path
//! 2. Optional fallback path
//! 3. Silent discard
//!
//! There is no stderr level: while the dashboard runs, the terminal belongs to
//! the alternate screen and stray output would corrupt it.

#![allow(missing_docs)]

use std::fs::{self, File, OpenOptions, rename};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{BituiError, Result};

/// Severity level for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Session event identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    SessionStart,
    SessionStop,
    SummaryFetched,
    BlockPlaced,
    BlockSkipped,
    CapacityReached,
    Resize,
    Error,
}

/// A single JSONL log entry; only `ts`, `event` and `severity` are always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// RFC 3339 UTC timestamp with millisecond precision.
    pub ts: String,
    pub event: EventType,
    pub severity: Severity,
    /// Block height the event refers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u64>,
    /// Canvas column of a placed block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u16>,
    /// `BUI-xxxx` code when the event records a failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl LogEntry {
    /// Create a new entry stamped with the current UTC time.
    #[must_use]
    pub fn new(event: EventType, severity: Severity) -> Self {
        Self {
            ts: format_utc_now(),
            event,
            severity,
            height: None,
            offset: None,
            error_code: None,
            details: None,
        }
    }
}

/// Degradation state of the JSONL writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    Normal,
    Fallback,
    Discard,
}

/// Configuration for the JSONL writer.
#[derive(Debug, Clone)]
pub struct JsonlConfig {
    pub path: PathBuf,
    pub fallback_path: Option<PathBuf>,
    /// Size at which the current file is rotated. Default: 10 MiB.
    pub max_size_bytes: u64,
    /// Number of rotated files to keep. Default: 3.
    pub max_rotated_files: u32,
}

impl JsonlConfig {
    /// Defaults for a log at `path` with no fallback.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            fallback_path: None,
            max_size_bytes: 10 * 1024 * 1024,
            max_rotated_files: 3,
        }
    }
}

/// Append-only JSONL writer with rotation and fallback.
pub struct JsonlWriter {
    config: JsonlConfig,
    writer: Option<BufWriter<File>>,
    state: WriterState,
    bytes_written: u64,
}

impl JsonlWriter {
    /// Open the log file, falling through the degradation chain on failure.
    #[must_use]
    pub fn open(config: JsonlConfig) -> Self {
        let mut w = Self {
            config,
            writer: None,
            state: WriterState::Discard,
            bytes_written: 0,
        };
        w.try_open_primary();
        w
    }

    /// A writer that drops everything.
    #[must_use]
    pub fn discard() -> Self {
        Self {
            config: JsonlConfig::at(PathBuf::new()),
            writer: None,
            state: WriterState::Discard,
            bytes_written: 0,
        }
    }

    /// Write a single log entry as one JSONL line.
    pub fn write_entry(&mut self, entry: &LogEntry) {
        let Ok(json) = serde_json::to_string(entry) else {
            return;
        };
        self.write_line(&format!("{json}\n"));
    }

    pub fn flush(&mut self) {
        if let Some(w) = self.writer.as_mut() {
            let _ = w.flush();
        }
    }

    /// Current degradation state.
    #[must_use]
    pub fn state(&self) -> &str {
        match self.state {
            WriterState::Normal => "normal",
            WriterState::Fallback => "fallback",
            WriterState::Discard => "discard",
        }
    }

    /// Bytes in the current file.
    #[must_use]
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    // ──────────────────────── internals ────────────────────────

    fn write_line(&mut self, line: &str) {
        let len = line.len() as u64;
        if self.bytes_written + len > self.config.max_size_bytes
            && self.state != WriterState::Discard
        {
            self.rotate();
        }

        if self.state == WriterState::Discard {
            return;
        }
        let written = self
            .writer
            .as_mut()
            .is_some_and(|w| w.write_all(line.as_bytes()).is_ok());
        if written {
            self.bytes_written += len;
        } else {
            self.degrade();
            self.write_line(line); // retry at next level
        }
    }

    fn try_open_primary(&mut self) {
        match open_append(&self.config.path) {
            Ok((file, size)) => {
                self.writer = Some(BufWriter::new(file));
                self.state = WriterState::Normal;
                self.bytes_written = size;
            }
            Err(_) => self.try_open_fallback(),
        }
    }

    fn try_open_fallback(&mut self) {
        let opened = self
            .config
            .fallback_path
            .as_deref()
            .and_then(|fb| open_append(fb).ok());
        match opened {
            Some((file, size)) => {
                self.writer = Some(BufWriter::new(file));
                self.state = WriterState::Fallback;
                self.bytes_written = size;
            }
            None => {
                self.writer = None;
                self.state = WriterState::Discard;
            }
        }
    }

    fn degrade(&mut self) {
        self.writer = None;
        match self.state {
            WriterState::Normal => self.try_open_fallback(),
            WriterState::Fallback | WriterState::Discard => {
                self.state = WriterState::Discard;
            }
        }
    }

    fn rotate(&mut self) {
        if let Some(w) = self.writer.as_mut() {
            let _ = w.flush();
        }
        self.writer = None;

        let base = match (self.state, &self.config.fallback_path) {
            (WriterState::Normal, _) => self.config.path.clone(),
            (WriterState::Fallback, Some(fb)) => fb.clone(),
            _ => return,
        };

        // Shift existing rotations: .2→.3, .1→.2, current→.1
        for i in (1..self.config.max_rotated_files).rev() {
            let _ = rename(rotated_name(&base, i), rotated_name(&base, i + 1));
        }
        if self.config.max_rotated_files == 0 {
            let _ = fs::remove_file(&base);
        } else {
            let _ = rename(&base, rotated_name(&base, 1));
        }

        match open_append(&base) {
            Ok((file, _)) => {
                self.writer = Some(BufWriter::new(file));
                self.bytes_written = 0;
            }
            Err(_) => self.degrade(),
        }
    }
}

impl Drop for JsonlWriter {
    fn drop(&mut self) {
        self.flush();
    }
}

// ──────────────────────── helpers ────────────────────────

/// Open or create a file for appending. Returns `(File, current_size)`.
fn open_append(path: &Path) -> Result<(File, u64)> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| BituiError::io(parent, source))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| BituiError::io(path, source))?;
    let size = file.metadata().map(|m| m.len()).unwrap_or(0);
    Ok((file, size))
}

/// `session.jsonl` → `session.jsonl.2`.
fn rotated_name(base: &Path, index: u32) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(format!(".{index}"));
    PathBuf::from(name)
}

fn format_utc_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

// ──────────────────────── tests ────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn write_entry_produces_valid_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.jsonl");
        let mut writer = JsonlWriter::open(JsonlConfig::at(&path));

        let mut entry = LogEntry::new(EventType::BlockPlaced, Severity::Info);
        entry.height = Some(104);
        entry.offset = Some(221);
        writer.write_entry(&entry);
        writer.flush();

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["event"], "block_placed");
        assert_eq!(lines[0]["severity"], "info");
        assert_eq!(lines[0]["height"], 104);
        assert_eq!(lines[0]["offset"], 221);
    }

    #[test]
    fn timestamp_is_rfc3339_utc() {
        let entry = LogEntry::new(EventType::SessionStart, Severity::Info);
        assert!(entry.ts.ends_with('Z'), "{}", entry.ts);
        assert!(chrono::DateTime::parse_from_rfc3339(&entry.ts).is_ok());
    }

    #[test]
    fn optional_fields_omitted_when_none() {
        let line =
            serde_json::to_string(&LogEntry::new(EventType::SessionStop, Severity::Info)).unwrap();
        assert!(!line.contains("\"height\""));
        assert!(!line.contains("\"error_code\""));
        assert!(!line.contains("\"details\""));
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("s.jsonl");
        let mut writer = JsonlWriter::open(JsonlConfig::at(&path));
        assert_eq!(writer.state(), "normal");
        writer.write_entry(&LogEntry::new(EventType::Resize, Severity::Info));
        writer.flush();
        assert_eq!(read_lines(&path).len(), 1);
    }

    #[test]
    fn appends_to_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.jsonl");
        for _ in 0..2 {
            let mut writer = JsonlWriter::open(JsonlConfig::at(&path));
            writer.write_entry(&LogEntry::new(EventType::SessionStart, Severity::Info));
        }
        assert_eq!(read_lines(&path).len(), 2);
    }

    #[test]
    fn rotation_shifts_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rot.jsonl");
        let config = JsonlConfig {
            max_size_bytes: 100,
            ..JsonlConfig::at(&path)
        };
        let mut writer = JsonlWriter::open(config);
        for _ in 0..10 {
            writer.write_entry(&LogEntry::new(EventType::BlockSkipped, Severity::Warning));
        }
        writer.flush();

        assert!(path.exists());
        assert!(rotated_name(&path, 1).exists());
        assert!(!rotated_name(&path, 4).exists());
    }

    #[test]
    fn fallback_when_primary_unwritable() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file cannot be a parent directory.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let fallback = dir.path().join("fallback.jsonl");
        let config = JsonlConfig {
            fallback_path: Some(fallback.clone()),
            ..JsonlConfig::at(blocker.join("primary.jsonl"))
        };
        let mut writer = JsonlWriter::open(config);

        assert_eq!(writer.state(), "fallback");
        writer.write_entry(&LogEntry::new(EventType::Error, Severity::Error));
        writer.flush();
        assert_eq!(read_lines(&fallback).len(), 1);
    }

    #[test]
    fn discards_when_nothing_opens() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let mut writer = JsonlWriter::open(JsonlConfig::at(blocker.join("s.jsonl")));
        assert_eq!(writer.state(), "discard");
        writer.write_entry(&LogEntry::new(EventType::Error, Severity::Error));
        assert_eq!(writer.bytes_written(), 0);
        assert_eq!(JsonlWriter::discard().state(), "discard");
    }
}
