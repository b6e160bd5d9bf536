//! Bounded drawing regions over a shared cell buffer.
//!
//! A [`Surface`] owns no cells. It is a rect in its parent's coordinates plus
//! a handle to the backing [`CellBuffer`]; deriving a child adds the child's
//! origin to the parent's, so nested surfaces compose additively and a child
//! can never reach outside its parent.

#![allow(missing_docs)]

use std::rc::Rc;

use super::buffer::{BLANK, CellBuffer, SharedBuffer};
use super::rect::{Dimensions, Rect};
use crate::core::errors::{BituiError, Result};

/// Box-drawing characters used by [`Surface::draw_border`].
const TOP_LEFT: char = '┌';
const TOP_RIGHT: char = '┐';
const BOTTOM_LEFT: char = '└';
const BOTTOM_RIGHT: char = '┘';
const HORIZONTAL: char = '─';
const VERTICAL: char = '│';

/// A bounded view into a shared buffer.
#[derive(Debug, Clone)]
pub struct Surface {
    /// Bounds in the parent's coordinate system.
    rect: Rect,
    /// Top-left corner in the backing buffer.
    abs_y: u16,
    abs_x: u16,
    buffer: SharedBuffer,
}

impl Surface {
    /// Surface covering the whole buffer.
    pub fn root(buffer: SharedBuffer) -> Result<Self> {
        let dims = buffer.borrow().dims();
        let rect = Rect::sized(dims)?;
        Ok(Self {
            rect,
            abs_y: 0,
            abs_x: 0,
            buffer,
        })
    }

    /// Bounds in parent-local coordinates.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.rect
    }

    #[must_use]
    pub const fn dims(&self) -> Dimensions {
        self.rect.dims()
    }

    #[must_use]
    pub const fn height(&self) -> u16 {
        self.rect.height()
    }

    #[must_use]
    pub const fn width(&self) -> u16 {
        self.rect.width()
    }

    /// Top-left corner `(y, x)` in the backing buffer.
    #[must_use]
    pub const fn absolute_origin(&self) -> (u16, u16) {
        (self.abs_y, self.abs_x)
    }

    /// Whether both surfaces draw into the same buffer.
    #[must_use]
    pub fn shares_buffer(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.buffer, &other.buffer)
    }

    /// Create a child surface at `rect`, relative to this surface's origin.
    ///
    /// # Errors
    /// [`BituiError::Geometry`] when `rect` reaches past this surface's bounds.
    pub fn derive(&self, rect: Rect) -> Result<Self> {
        if rect.bottom() > u32::from(self.height()) || rect.right() > u32::from(self.width()) {
            return Err(BituiError::geometry(format!(
                "child {}x{} at ({},{}) exceeds parent {}x{}",
                rect.height(),
                rect.width(),
                rect.y(),
                rect.x(),
                self.height(),
                self.width()
            )));
        }
        // Parent lies inside the buffer and the child inside the parent, so
        // these sums stay in range.
        Ok(Self {
            rect,
            abs_y: self.abs_y + rect.y(),
            abs_x: self.abs_x + rect.x(),
            buffer: Rc::clone(&self.buffer),
        })
    }

    /// The one-cell-inset child, i.e. the region safe to write into after
    /// [`Self::draw_border`].
    pub fn interior(&self) -> Result<Self> {
        let local = Rect::sized(self.dims())?.interior()?;
        self.derive(local)
    }

    /// Write `text` from the top-left cell. Each `\n` starts a new row at the
    /// left edge; anything past the right or bottom edge is dropped.
    pub fn write_text(&self, text: &str) {
        let mut buffer = self.buffer.borrow_mut();
        for (row, line) in text.split('\n').enumerate() {
            let Ok(row) = u16::try_from(row) else {
                break;
            };
            if row >= self.height() {
                break;
            }
            buffer.put_str(self.abs_y + row, self.abs_x, line, self.width());
        }
    }

    /// Draw a one-cell border along the outer edge.
    pub fn draw_border(&self) {
        let mut buffer = self.buffer.borrow_mut();
        let (top, left) = (self.abs_y, self.abs_x);
        let bottom = top + self.height() - 1;
        let right = left + self.width() - 1;

        for x in left..=right {
            buffer.set(top, x, HORIZONTAL);
            buffer.set(bottom, x, HORIZONTAL);
        }
        for y in top..=bottom {
            buffer.set(y, left, VERTICAL);
            buffer.set(y, right, VERTICAL);
        }
        buffer.set(top, left, TOP_LEFT);
        buffer.set(top, right, TOP_RIGHT);
        buffer.set(bottom, left, BOTTOM_LEFT);
        buffer.set(bottom, right, BOTTOM_RIGHT);
    }

    /// Blank the whole region.
    pub fn clear(&self) {
        self.buffer
            .borrow_mut()
            .fill(self.abs_y, self.abs_x, self.height(), self.width(), BLANK);
    }

    /// Fill this surface with the window of `source` whose top-left corner is
    /// `(src_y, src_x)`. Cells outside `source` come out blank.
    ///
    /// `source` must not be this surface's own buffer.
    pub fn copy_from(&self, source: &CellBuffer, src_y: u16, src_x: u16) {
        let mut buffer = self.buffer.borrow_mut();
        for row in 0..self.height() {
            for col in 0..self.width() {
                let ch = match (src_y.checked_add(row), src_x.checked_add(col)) {
                    (Some(y), Some(x)) => source.get(y, x).unwrap_or(BLANK),
                    _ => BLANK,
                };
                buffer.set(self.abs_y + row, self.abs_x + col, ch);
            }
        }
    }

    /// Row `y` of this surface as text (testing and snapshot aid).
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height() {
            return String::new();
        }
        let buffer = self.buffer.borrow();
        (0..self.width())
            .map(|col| buffer.get(self.abs_y + y, self.abs_x + col).unwrap_or(BLANK))
            .collect()
    }
}
