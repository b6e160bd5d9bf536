//! Session activity log: typed events mapped onto JSONL entries.

#![allow(missing_docs)]

use std::path::Path;

use crate::core::config::PathsConfig;
use crate::core::errors::BituiError;
use crate::logger::jsonl::{EventType, JsonlConfig, JsonlWriter, LogEntry, Severity};

/// Events recorded during a dashboard session.
#[derive(Debug, Clone, PartialEq)]
pub enum ActivityEvent {
    SessionStarted { url: String, network: String },
    SessionStopped { blocks: usize },
    SummaryFetched { tip: u64 },
    BlockPlaced { height: u64, offset: u16 },
    BlockSkipped { height: u64, code: String, message: String },
    CapacityReached { height: u64, message: String },
    Resized { height: u16, width: u16 },
    Error { code: String, message: String },
}

impl ActivityEvent {
    /// Record a failure, keeping its stable code.
    #[must_use]
    pub fn error(err: &BituiError) -> Self {
        Self::Error {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }

    /// Build the JSONL entry for this event.
    #[must_use]
    pub fn to_entry(&self) -> LogEntry {
        match self {
            Self::SessionStarted { url, network } => {
                let mut e = LogEntry::new(EventType::SessionStart, Severity::Info);
                e.details = Some(format!("url={url} network={network}"));
                e
            }
            Self::SessionStopped { blocks } => {
                let mut e = LogEntry::new(EventType::SessionStop, Severity::Info);
                e.details = Some(format!("blocks={blocks}"));
                e
            }
            Self::SummaryFetched { tip } => {
                let mut e = LogEntry::new(EventType::SummaryFetched, Severity::Info);
                e.height = Some(*tip);
                e
            }
            Self::BlockPlaced { height, offset } => {
                let mut e = LogEntry::new(EventType::BlockPlaced, Severity::Info);
                e.height = Some(*height);
                e.offset = Some(*offset);
                e
            }
            Self::BlockSkipped {
                height,
                code,
                message,
            } => {
                let mut e = LogEntry::new(EventType::BlockSkipped, Severity::Warning);
                e.height = Some(*height);
                e.error_code = Some(code.clone());
                e.details = Some(message.clone());
                e
            }
            Self::CapacityReached { height, message } => {
                let mut e = LogEntry::new(EventType::CapacityReached, Severity::Warning);
                e.height = Some(*height);
                e.details = Some(message.clone());
                e
            }
            Self::Resized { height, width } => {
                let mut e = LogEntry::new(EventType::Resize, Severity::Info);
                e.details = Some(format!("{height}x{width}"));
                e
            }
            Self::Error { code, message } => {
                let mut e = LogEntry::new(EventType::Error, Severity::Error);
                e.error_code = Some(code.clone());
                e.details = Some(message.clone());
                e
            }
        }
    }
}

/// Synchronous session logger. The dashboard is single-threaded, so events
/// are written inline.
pub struct ActivityLog {
    writer: JsonlWriter,
}

impl ActivityLog {
    /// Log to `path`, degrading silently if it cannot be opened.
    #[must_use]
    pub fn open(path: &Path) -> Self {
        Self {
            writer: JsonlWriter::open(JsonlConfig::at(path)),
        }
    }

    /// Log to the configured session file, then its fallback, then nowhere.
    #[must_use]
    pub fn from_paths(paths: &PathsConfig) -> Self {
        let config = JsonlConfig {
            fallback_path: paths.fallback_log_file.clone(),
            ..JsonlConfig::at(&paths.log_file)
        };
        Self::with_writer(JsonlWriter::open(config))
    }

    #[must_use]
    pub fn with_writer(writer: JsonlWriter) -> Self {
        Self { writer }
    }

    /// A log that records nothing.
    #[must_use]
    pub fn disabled() -> Self {
        Self::with_writer(JsonlWriter::discard())
    }

    pub fn record(&mut self, event: &ActivityEvent) {
        self.writer.write_entry(&event.to_entry());
    }

    pub fn flush(&mut self) {
        self.writer.flush();
    }

    /// Degradation state of the underlying writer.
    #[must_use]
    pub fn state(&self) -> &str {
        self.writer.state()
    }
}

impl std::fmt::Debug for ActivityLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityLog")
            .field("state", &self.state())
            .finish()
    }
}

// ──────────────────────── tests ────────────────────────
