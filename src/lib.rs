#![forbid(unsafe_code)]

//! bitui: a scrollable, block-oriented view of a Bitcoin chain in a
//! fixed-size character terminal.
//!
//! Layers, leaf first:
//! 1. **Layout**: rectangles, shared cell buffers, surfaces, a scrolling
//!    viewport, and an anchored chain of block widgets
//! 2. **RPC**: a blocking JSON-RPC client and the bitcoind calls the
//!    dashboard needs, behind the [`rpc::ChainSource`] trait
//! 3. **TUI**: the dashboard state machine, key map, and crossterm runtime
//!
//! # Library usage
//!
//! ```rust,no_run
//! use bitui::prelude::*;
//! ```

pub mod prelude;

pub mod core;
pub mod layout;
pub mod logger;
pub mod rpc;
pub mod tui;
