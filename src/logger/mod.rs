//! Session logging: JSONL append-only file with graceful degradation.

pub mod activity;
pub mod jsonl;
