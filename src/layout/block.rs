//! Bordered, fixed-size block widgets.

#![allow(missing_docs)]

use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::surface::Surface;
use crate::core::errors::Result;

/// The per-height fields the dashboard shows for one block.
///
/// Deserialized straight from a `getblock` reply; unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSummary {
    pub height: u64,
    pub nonce: u64,
    /// `-1` when the block is not on the main chain.
    pub confirmations: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<u64>,
    #[serde(default, rename = "nTx", skip_serializing_if = "Option::is_none")]
    pub n_tx: Option<u64>,
}

/// Text payload of a block, one entry per display line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockText {
    lines: Vec<String>,
}

impl BlockText {
    #[must_use]
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Lines joined for [`Surface::write_text`].
    #[must_use]
    pub fn joined(&self) -> String {
        self.lines.join("\n")
    }
}

impl From<&BlockSummary> for BlockText {
    fn from(summary: &BlockSummary) -> Self {
        Self::new(vec![
            format!("height: {}", summary.height),
            format!("nonce: {}", summary.nonce),
            format!("confirmations: {}", summary.confirmations),
        ])
    }
}

/// A block drawn on a viewport canvas. Content is written once, at placement.
#[derive(Debug, Clone)]
pub struct Block {
    rect: Rect,
    content: Surface,
    text: BlockText,
}

impl Block {
    /// Draw a bordered block at `rect` (canvas-local) and write `text` inside.
    ///
    /// # Errors
    /// [`crate::core::errors::BituiError::Geometry`] when `rect` does not fit
    /// the canvas or is too small for a border. Nothing is drawn in that case.
    pub fn place(canvas: &Surface, rect: Rect, text: BlockText) -> Result<Self> {
        let frame = canvas.derive(rect)?;
        let content = frame.interior()?;
        frame.draw_border();
        content.write_text(&text.joined());
        Ok(Self {
            rect,
            content,
            text,
        })
    }

    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.rect
    }

    /// Horizontal offset on the canvas.
    #[must_use]
    pub const fn offset(&self) -> u16 {
        self.rect.x()
    }

    #[must_use]
    pub const fn content(&self) -> &Surface {
        &self.content
    }

    #[must_use]
    pub const fn text(&self) -> &BlockText {
        &self.text
    }
}
