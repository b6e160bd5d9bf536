//! Anchored, append-only placement of blocks on a viewport canvas.
//!
//! Blocks are laid out from a fixed anchor at the middle of the canvas. The
//! block appended forward at index `i` sits at `anchor + i * (width + GAP)`.
//! Backward growth walks left from the anchor with its own cursor, so placing
//! older blocks never moves the ones already drawn.

#![allow(missing_docs)]

use std::collections::VecDeque;

use super::block::{Block, BlockText};
use super::rect::Rect;
use super::surface::Surface;
use super::viewport::Viewport;
use crate::core::errors::{BituiError, Result};

/// Columns left empty between neighbouring blocks.
pub const GAP: u16 = 1;

/// Size and vertical position shared by every block in a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockGeometry {
    pub height: u16,
    pub width: u16,
    /// Canvas row of each block's top border.
    pub top: u16,
}

impl Default for BlockGeometry {
    fn default() -> Self {
        Self {
            height: 10,
            width: 20,
            top: 1,
        }
    }
}

impl BlockGeometry {
    /// Horizontal distance between the left edges of neighbouring blocks.
    #[must_use]
    pub fn stride(&self) -> u32 {
        u32::from(self.width) + u32::from(GAP)
    }
}

/// Which side of the anchor a new block grows on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Growth {
    /// Right of everything placed so far (newer heights).
    #[default]
    Forward,
    /// Left of everything placed so far (older heights).
    Backward,
}

/// Placement record returned by [`Chain::append`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHandle {
    pub rect: Rect,
    pub growth: Growth,
}

impl BlockHandle {
    #[must_use]
    pub const fn offset(&self) -> u16 {
        self.rect.x()
    }
}

#[derive(Debug)]
pub struct Chain {
    canvas: Surface,
    canvas_width: u16,
    geometry: BlockGeometry,
    anchor: u16,
    /// Left edge of the next forward block.
    right_cursor: u32,
    /// Left edge of the most recent backward block (or the anchor).
    left_cursor: u32,
    blocks: VecDeque<Block>,
}

impl Chain {
    /// Bind a chain to `viewport`'s canvas. The anchor is fixed here at
    /// `canvas_width / 2`.
    ///
    /// # Errors
    /// [`BituiError::Geometry`] when the block has no interior or its rows
    /// do not fit the canvas height.
    pub fn new(viewport: &Viewport, geometry: BlockGeometry) -> Result<Self> {
        // Validates the size once so a placement can only fail on width.
        Rect::new(geometry.height, geometry.width, 0, 0)?.interior()?;

        let canvas_dims = viewport.canvas_dims();
        let rows_needed = u32::from(geometry.top) + u32::from(geometry.height);
        if rows_needed > u32::from(canvas_dims.height) {
            return Err(BituiError::geometry(format!(
                "block rows {}..{rows_needed} do not fit canvas height {}",
                geometry.top, canvas_dims.height
            )));
        }

        let anchor = canvas_dims.width / 2;
        Ok(Self {
            canvas: viewport.canvas_surface()?,
            canvas_width: canvas_dims.width,
            geometry,
            anchor,
            right_cursor: u32::from(anchor),
            left_cursor: u32::from(anchor),
            blocks: VecDeque::new(),
        })
    }

    #[must_use]
    pub const fn anchor(&self) -> u16 {
        self.anchor
    }

    #[must_use]
    pub const fn geometry(&self) -> BlockGeometry {
        self.geometry
    }

    /// Number of blocks currently recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Blocks in visual (left-to-right) order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    /// Horizontal offsets in visual order.
    #[must_use]
    pub fn offsets(&self) -> Vec<u16> {
        self.blocks.iter().map(Block::offset).collect()
    }

    /// How many more forward blocks fit before the canvas is exhausted.
    #[must_use]
    pub fn forward_capacity(&self) -> usize {
        let stride = self.geometry.stride();
        let width = u32::from(self.geometry.width);
        let canvas = u32::from(self.canvas_width);
        if self.right_cursor + width > canvas {
            return 0;
        }
        // The last block needs no trailing gap.
        ((canvas - self.right_cursor - width) / stride + 1) as usize
    }

    /// Place a new block carrying `content` on the `growth` side.
    ///
    /// Placement is computed and checked before anything is drawn or
    /// recorded, so a failure leaves the chain exactly as it was.
    ///
    /// # Errors
    /// [`BituiError::Capacity`] when the block would not fit on the canvas.
    pub fn append(&mut self, content: BlockText, growth: Growth) -> Result<BlockHandle> {
        let x = self.next_offset(growth)?;
        let rect = Rect::new(self.geometry.height, self.geometry.width, self.geometry.top, x)?;
        let block = Block::place(&self.canvas, rect, content)?;

        match growth {
            Growth::Forward => {
                self.right_cursor = u32::from(x) + self.geometry.stride();
                self.blocks.push_back(block);
            }
            Growth::Backward => {
                self.left_cursor = u32::from(x);
                self.blocks.push_front(block);
            }
        }
        Ok(BlockHandle { rect, growth })
    }

    /// Forget every recorded block and reset both cursors to the anchor.
    ///
    /// Canvas cells are left as drawn; the next append draws over them.
    pub fn clear(&mut self) {
        self.blocks.clear();
        self.right_cursor = u32::from(self.anchor);
        self.left_cursor = u32::from(self.anchor);
    }

    fn next_offset(&self, growth: Growth) -> Result<u16> {
        let width = self.geometry.width;
        let candidate = match growth {
            Growth::Forward => i64::from(self.right_cursor),
            Growth::Backward => i64::from(self.left_cursor) - i64::from(self.geometry.stride()),
        };
        let fits = candidate >= 0 && candidate + i64::from(width) <= i64::from(self.canvas_width);
        match u16::try_from(candidate) {
            Ok(x) if fits => Ok(x),
            _ => Err(BituiError::Capacity {
                x: candidate,
                width,
                canvas_width: self.canvas_width,
            }),
        }
    }
}
