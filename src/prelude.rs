//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use bitui::prelude::*;
//! ```

// Core
pub use crate::core::config::{Config, DashboardConfig};
pub use crate::core::errors::{BituiError, Result};

// Layout
pub use crate::layout::block::{Block, BlockSummary, BlockText};
pub use crate::layout::chain::{BlockGeometry, Chain, Growth};
pub use crate::layout::rect::{Dimensions, Rect};
pub use crate::layout::surface::Surface;
pub use crate::layout::viewport::Viewport;

// Data sources
pub use crate::rpc::bitcoin::BitcoinRpc;
pub use crate::rpc::{ChainSource, ChainSummary};

// Dashboard
pub use crate::tui::dashboard::{Dashboard, DashboardState, PopulateReport};
pub use crate::tui::input::InputAction;
