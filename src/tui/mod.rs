//! Dashboard state machine and its terminal runtime.
//!
//! [`dashboard`] and [`input`] are pure and always built; the terminal
//! session, signal handling, and the run loop need the `cli` feature.

#![allow(missing_docs)]

pub mod dashboard;
pub mod input;
#[cfg(feature = "cli")]
pub mod runtime;
#[cfg(feature = "cli")]
pub mod signals;
#[cfg(feature = "cli")]
pub mod terminal_guard;

#[cfg(feature = "cli")]
pub use runtime::run_dashboard;
