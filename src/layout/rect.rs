//! Immutable rectangle and size values.
//!
//! Every transform returns a new value; nothing here mutates in place, so a
//! surface derived from a rect can never be corrupted by later geometry work.

#![allow(missing_docs)]

use crate::core::errors::{BituiError, Result};

/// Height and width of a region with no placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub height: u16,
    pub width: u16,
}

impl Dimensions {
    #[must_use]
    pub const fn new(height: u16, width: u16) -> Self {
        Self { height, width }
    }
}

/// A rectangular region: `height`, `width`, then origin `y`, `x`.
///
/// Field order is positional everywhere (constructors included) so a rect
/// reads the same way as the arguments of a region-creation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    height: u16,
    width: u16,
    y: u16,
    x: u16,
}

impl Rect {
    /// Build a rect. Zero height or width is a geometry error.
    pub fn new(height: u16, width: u16, y: u16, x: u16) -> Result<Self> {
        if height == 0 || width == 0 {
            return Err(BituiError::geometry(format!(
                "rect {height}x{width} at ({y},{x}) has an empty side"
            )));
        }
        // The far edges must stay addressable.
        if u32::from(y) + u32::from(height) > u32::from(u16::MAX) + 1
            || u32::from(x) + u32::from(width) > u32::from(u16::MAX) + 1
        {
            return Err(BituiError::geometry(format!(
                "rect {height}x{width} at ({y},{x}) overflows the coordinate space"
            )));
        }
        Ok(Self {
            height,
            width,
            y,
            x,
        })
    }

    /// A rect of the given size anchored at the origin.
    pub fn sized(dims: Dimensions) -> Result<Self> {
        Self::new(dims.height, dims.width, 0, 0)
    }

    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub const fn y(&self) -> u16 {
        self.y
    }

    #[must_use]
    pub const fn x(&self) -> u16 {
        self.x
    }

    #[must_use]
    pub const fn dims(&self) -> Dimensions {
        Dimensions::new(self.height, self.width)
    }

    /// One past the last row, widened so it cannot overflow.
    #[must_use]
    pub fn bottom(&self) -> u32 {
        u32::from(self.y) + u32::from(self.height)
    }

    /// One past the last column, widened so it cannot overflow.
    #[must_use]
    pub fn right(&self) -> u32 {
        u32::from(self.x) + u32::from(self.width)
    }

    /// The region left after insetting one cell on every side.
    ///
    /// Only defined for rects at least 3x3; anything smaller has no interior
    /// and is reported instead of being clamped.
    pub fn interior(&self) -> Result<Self> {
        if self.height < 3 || self.width < 3 {
            return Err(BituiError::geometry(format!(
                "rect {}x{} is too small for an interior (needs 3x3)",
                self.height, self.width
            )));
        }
        Ok(Self {
            height: self.height - 2,
            width: self.width - 2,
            y: self.y + 1,
            x: self.x + 1,
        })
    }

    /// Same size, new origin.
    pub fn with_origin(&self, y: u16, x: u16) -> Result<Self> {
        Self::new(self.height, self.width, y, x)
    }

    /// Same size, origin shifted by `(dy, dx)`.
    pub fn offset_by(&self, dy: u16, dx: u16) -> Result<Self> {
        let y = self.y.checked_add(dy);
        let x = self.x.checked_add(dx);
        match (y, x) {
            (Some(y), Some(x)) => Self::new(self.height, self.width, y, x),
            _ => Err(BituiError::geometry(format!(
                "offsetting ({},{}) by ({dy},{dx}) overflows",
                self.y, self.x
            ))),
        }
    }

    /// Whether `other` lies entirely inside this rect (same coordinate space).
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        other.y >= self.y
            && other.x >= self.x
            && other.bottom() <= self.bottom()
            && other.right() <= self.right()
    }

    /// Whether the two rects share at least one cell.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        u32::from(self.x) < other.right()
            && u32::from(other.x) < self.right()
            && u32::from(self.y) < other.bottom()
            && u32::from(other.y) < self.bottom()
    }
}
