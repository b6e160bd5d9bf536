//! Dashboard state: screen layout, the block chain, and the summary panel.
//!
//! ```text
//! ┌──────────────────────────────────────┐ upper box: viewport over the canvas
//! │ ┌──────────┐ ┌──────────┐ ┌────────  │
//! │ │height: 100 │height: 101 │height: 1 │
//! │ └──────────┘ └──────────┘ └────────  │
//! └──────────────────────────────────────┘
//! ┌──────────────────────────────────────┐ lower box: chain summary
//! │chain -> regtest                      │
//! │blocks -> 110                         │
//! └──────────────────────────────────────┘
//! ```
//!
//! Nothing here touches the terminal. The runtime flushes [`Dashboard::screen`]
//! to the display after [`Dashboard::render`].

#![allow(missing_docs)]

use std::cell::Ref;
use std::rc::Rc;

use super::input::InputAction;
use crate::core::config::DashboardConfig;
use crate::core::errors::{BituiError, Result};
use crate::layout::block::BlockText;
use crate::layout::buffer::{CellBuffer, SharedBuffer};
use crate::layout::chain::{Chain, Growth};
use crate::layout::rect::Dimensions;
use crate::layout::split::split_vertical;
use crate::layout::surface::Surface;
use crate::layout::viewport::Viewport;
use crate::logger::activity::{ActivityEvent, ActivityLog};
use crate::rpc::ChainSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardState {
    Running,
    Terminated,
}

/// Outcome of [`Dashboard::populate`] or [`Dashboard::fetch_range`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopulateReport {
    /// Chain tip reported by the summary, when one was fetched.
    pub tip: Option<u64>,
    /// Heights placed, in placement order.
    pub placed: Vec<u64>,
    /// Heights whose fetch failed.
    pub skipped: Vec<u64>,
    /// Fetching stopped because the canvas was full.
    pub capacity_reached: bool,
}

#[derive(Debug)]
pub struct Dashboard {
    screen: SharedBuffer,
    viewport: Viewport,
    chain: Chain,
    summary: Surface,
    scroll_step: u16,
    state: DashboardState,
    terminal_size: Dimensions,
    log: ActivityLog,
}

impl Dashboard {
    /// Lay out a dashboard for a `screen`-sized terminal.
    ///
    /// # Errors
    /// [`BituiError::Geometry`] when the screen is too small for the split,
    /// the canvas, or a single block.
    pub fn new(screen: Dimensions, config: &DashboardConfig) -> Result<Self> {
        let buffer = CellBuffer::shared(screen);
        let root = Surface::root(Rc::clone(&buffer))?;

        let (upper, lower) = split_vertical(screen, config.split_percent)?;
        let upper_box = root.derive(upper)?;
        let lower_box = root.derive(lower)?;
        upper_box.draw_border();
        lower_box.draw_border();

        let frame = upper_box.interior()?;
        let canvas_width = frame
            .width()
            .checked_mul(config.canvas_multiplier)
            .ok_or_else(|| {
                BituiError::geometry(format!(
                    "canvas width {} x {} exceeds {}",
                    frame.width(),
                    config.canvas_multiplier,
                    u16::MAX
                ))
            })?;
        // The canvas is tall enough for a whole block; rows below the frame
        // are clipped by render.
        let geometry = config.block_geometry();
        let block_rows = geometry.top.saturating_add(geometry.height);
        let canvas = Dimensions::new(frame.height().max(block_rows), canvas_width);
        let mut viewport = Viewport::new(canvas, frame)?;
        let chain = Chain::new(&viewport, geometry)?;
        viewport.scroll_to(i64::from(chain.anchor()));

        Ok(Self {
            screen: buffer,
            viewport,
            chain,
            summary: lower_box.interior()?,
            scroll_step: config.scroll_step,
            state: DashboardState::Running,
            terminal_size: screen,
            log: ActivityLog::disabled(),
        })
    }

    /// Record session events to `log`.
    #[must_use]
    pub fn with_log(mut self, log: ActivityLog) -> Self {
        self.log = log;
        self
    }

    /// Fetch the chain summary and the `count` most recent blocks, oldest first.
    ///
    /// # Errors
    /// [`BituiError::DataFetch`] when the summary cannot be fetched or has no
    /// tip height; nothing is placed in that case. Geometry failures while
    /// placing blocks also propagate.
    pub fn populate<S: ChainSource + ?Sized>(
        &mut self,
        source: &mut S,
        count: u64,
    ) -> Result<PopulateReport> {
        let summary = source
            .get_chain_summary()
            .and_then(|summary| summary.tip_height().map(|tip| (summary, tip)));
        let (summary, tip) = match summary {
            Ok(found) => found,
            Err(err) => {
                let err = match err {
                    BituiError::DataFetch { .. } => err,
                    other => BituiError::fetch("chain summary", &other),
                };
                self.log.record(&ActivityEvent::error(&err));
                return Err(err);
            }
        };
        self.log.record(&ActivityEvent::SummaryFetched { tip });
        self.summary.clear();
        self.summary.write_text(&summary.lines().join("\n"));

        let start = (tip + 1).saturating_sub(count);
        let mut report = self.fetch_range(source, start..=tip)?;
        report.tip = Some(tip);
        Ok(report)
    }

    /// Fetch and place `heights` in order.
    ///
    /// A failed fetch is logged and the height skipped. A full canvas stops
    /// the range and sets [`PopulateReport::capacity_reached`].
    ///
    /// # Errors
    /// Only geometry failures, which mean the layout itself is broken.
    pub fn fetch_range<S, I>(&mut self, source: &mut S, heights: I) -> Result<PopulateReport>
    where
        S: ChainSource + ?Sized,
        I: IntoIterator<Item = u64>,
    {
        let mut report = PopulateReport::default();
        for height in heights {
            let block = match source.get_block_by_height(height) {
                Ok(block) => block,
                Err(cause) => {
                    let err = match cause {
                        BituiError::DataFetch { .. } => cause,
                        other => BituiError::fetch(format!("block {height}"), &other),
                    };
                    self.log.record(&ActivityEvent::BlockSkipped {
                        height,
                        code: err.code().to_string(),
                        message: err.to_string(),
                    });
                    report.skipped.push(height);
                    continue;
                }
            };

            match self.chain.append(BlockText::from(&block), Growth::Forward) {
                Ok(handle) => {
                    self.log.record(&ActivityEvent::BlockPlaced {
                        height,
                        offset: handle.offset(),
                    });
                    report.placed.push(height);
                }
                // A full canvas is the only recoverable placement failure.
                Err(err) if err.is_recoverable() => {
                    self.log.record(&ActivityEvent::CapacityReached {
                        height,
                        message: err.to_string(),
                    });
                    report.capacity_reached = true;
                    break;
                }
                Err(err) => {
                    self.log.record(&ActivityEvent::error(&err));
                    return Err(err);
                }
            }
        }
        self.log.flush();
        Ok(report)
    }

    /// Apply one input action. Returns whether the display needs a redraw.
    pub fn apply(&mut self, action: InputAction) -> bool {
        if self.state == DashboardState::Terminated {
            return false;
        }
        let step = i32::from(self.scroll_step);
        match action {
            InputAction::ScrollLeft => self.scroll_by(-step),
            InputAction::ScrollRight => self.scroll_by(step),
            InputAction::Quit => {
                self.state = DashboardState::Terminated;
                true
            }
            InputAction::Resize { height, width } => {
                // Layout stays at its initial size; the new size is only recorded.
                self.terminal_size = Dimensions::new(height, width);
                self.log.record(&ActivityEvent::Resized { height, width });
                false
            }
            InputAction::NoOp => false,
        }
    }

    /// Copy the visible canvas window into the screen buffer.
    pub fn render(&self) {
        self.viewport.render();
    }

    #[must_use]
    pub const fn state(&self) -> DashboardState {
        self.state
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == DashboardState::Running
    }

    #[must_use]
    pub const fn chain(&self) -> &Chain {
        &self.chain
    }

    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The full screen buffer, borders and panels included.
    #[must_use]
    pub fn screen(&self) -> Ref<'_, CellBuffer> {
        self.screen.borrow()
    }

    /// Last terminal size reported by a resize, or the initial size.
    #[must_use]
    pub const fn terminal_size(&self) -> Dimensions {
        self.terminal_size
    }

    pub fn log_mut(&mut self) -> &mut ActivityLog {
        &mut self.log
    }

    fn scroll_by(&mut self, delta: i32) -> bool {
        let before = self.viewport.scroll_offset();
        self.viewport.scroll(delta);
        self.viewport.scroll_offset() != before
    }
}

// ──────────────────── tests ────────────────────
