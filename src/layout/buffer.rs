//! Character-cell grid that surfaces draw into.

#![allow(missing_docs)]

use std::cell::RefCell;
use std::rc::Rc;

use super::rect::Dimensions;

/// Blank cell value.
pub const BLANK: char = ' ';

/// Shared handle to a cell buffer. The program has one thread of control, so
/// surfaces share their backing buffer through `Rc<RefCell<_>>`.
pub type SharedBuffer = Rc<RefCell<CellBuffer>>;

/// Row-major grid of character cells. Writes outside the grid are clipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellBuffer {
    dims: Dimensions,
    cells: Vec<char>,
}

impl CellBuffer {
    #[must_use]
    pub fn new(dims: Dimensions) -> Self {
        let len = usize::from(dims.height) * usize::from(dims.width);
        Self {
            dims,
            cells: vec![BLANK; len],
        }
    }

    /// Wrap a fresh buffer in a shared handle.
    #[must_use]
    pub fn shared(dims: Dimensions) -> SharedBuffer {
        Rc::new(RefCell::new(Self::new(dims)))
    }

    #[must_use]
    pub const fn dims(&self) -> Dimensions {
        self.dims
    }

    fn index(&self, y: u16, x: u16) -> Option<usize> {
        (y < self.dims.height && x < self.dims.width)
            .then(|| usize::from(y) * usize::from(self.dims.width) + usize::from(x))
    }

    /// Cell at `(y, x)`, or `None` outside the grid.
    #[must_use]
    pub fn get(&self, y: u16, x: u16) -> Option<char> {
        self.index(y, x).map(|i| self.cells[i])
    }

    pub fn set(&mut self, y: u16, x: u16, ch: char) {
        if let Some(i) = self.index(y, x) {
            self.cells[i] = ch;
        }
    }

    /// Write `text` on row `y` starting at column `x`, stopping after
    /// `max_cols` characters. Returns the number of cells written.
    pub fn put_str(&mut self, y: u16, x: u16, text: &str, max_cols: u16) -> u16 {
        let mut written = 0u16;
        for ch in text.chars().take(usize::from(max_cols)) {
            let Some(col) = x.checked_add(written) else {
                break;
            };
            if self.index(y, col).is_none() {
                break;
            }
            self.set(y, col, ch);
            written += 1;
        }
        written
    }

    /// Blank a `height x width` block whose top-left corner is `(y, x)`.
    pub fn fill(&mut self, y: u16, x: u16, height: u16, width: u16, ch: char) {
        for row in y..y.saturating_add(height) {
            for col in x..x.saturating_add(width) {
                self.set(row, col, ch);
            }
        }
    }

    /// Row `y` as a string, or an empty string outside the grid.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.dims.height {
            return String::new();
        }
        let start = usize::from(y) * usize::from(self.dims.width);
        self.cells[start..start + usize::from(self.dims.width)]
            .iter()
            .collect()
    }

    /// Every row, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.dims.height).map(|y| self.row_text(y))
    }
}
