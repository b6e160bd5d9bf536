//! Horizontally scrolling window over a virtual canvas.
//!
//! The canvas is an off-screen [`CellBuffer`] at least as wide as the frame.
//! Content drawn on it stays invisible until [`Viewport::render`] copies the
//! window `[scroll_offset, scroll_offset + frame_width)` onto the frame.

#![allow(missing_docs)]

use super::buffer::{CellBuffer, SharedBuffer};
use super::rect::Dimensions;
use super::surface::Surface;
use crate::core::errors::{BituiError, Result};

#[derive(Debug)]
pub struct Viewport {
    canvas: SharedBuffer,
    canvas_dims: Dimensions,
    frame: Surface,
    scroll_offset: u16,
}

impl Viewport {
    /// Build a viewport whose visible window is `frame`.
    ///
    /// # Errors
    /// [`BituiError::Geometry`] when the canvas is narrower than the frame or
    /// has an empty side.
    pub fn new(canvas_dims: Dimensions, frame: Surface) -> Result<Self> {
        if canvas_dims.width < frame.width() {
            return Err(BituiError::geometry(format!(
                "canvas width {} is narrower than frame width {}",
                canvas_dims.width,
                frame.width()
            )));
        }
        if canvas_dims.height == 0 {
            return Err(BituiError::geometry("canvas height must be at least 1"));
        }
        Ok(Self {
            canvas: CellBuffer::shared(canvas_dims),
            canvas_dims,
            frame,
            scroll_offset: 0,
        })
    }

    /// Surface spanning the whole canvas, for placing content on it.
    pub fn canvas_surface(&self) -> Result<Surface> {
        Surface::root(std::rc::Rc::clone(&self.canvas))
    }

    #[must_use]
    pub const fn canvas_dims(&self) -> Dimensions {
        self.canvas_dims
    }

    #[must_use]
    pub const fn frame(&self) -> &Surface {
        &self.frame
    }

    #[must_use]
    pub const fn frame_width(&self) -> u16 {
        self.frame.width()
    }

    #[must_use]
    pub const fn scroll_offset(&self) -> u16 {
        self.scroll_offset
    }

    /// Largest valid offset: `canvas_width - frame_width`.
    #[must_use]
    pub const fn max_scroll_offset(&self) -> u16 {
        self.canvas_dims.width - self.frame.width()
    }

    /// Move the window by `delta` columns, clamped to the valid range.
    pub fn scroll(&mut self, delta: i32) {
        self.scroll_to(i64::from(self.scroll_offset) + i64::from(delta));
    }

    /// Put the window's left edge at `offset`, clamped to the valid range.
    pub fn scroll_to(&mut self, offset: i64) {
        let clamped = offset.clamp(0, i64::from(self.max_scroll_offset()));
        // Clamped into [0, u16::MAX] above.
        self.scroll_offset = u16::try_from(clamped).unwrap_or(self.max_scroll_offset());
    }

    /// Copy the visible slice of the canvas onto the frame.
    pub fn render(&self) {
        let canvas = self.canvas.borrow();
        self.frame.copy_from(&canvas, 0, self.scroll_offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::rect::Rect;

    fn frame(width: u16) -> Surface {
        let screen = CellBuffer::shared(Dimensions::new(3, width + 2));
        Surface::root(screen)
            .unwrap()
            .derive(Rect::new(3, width, 0, 1).unwrap())
            .unwrap()
    }

    #[test]
    fn canvas_narrower_than_frame_is_rejected() {
        let err = Viewport::new(Dimensions::new(3, 39), frame(40)).unwrap_err();
        assert_eq!(err.code(), "BUI-1001");
    }

    #[test]
    fn canvas_equal_to_frame_cannot_scroll() {
        let mut vp = Viewport::new(Dimensions::new(3, 40), frame(40)).unwrap();
        assert_eq!(vp.max_scroll_offset(), 0);
        vp.scroll(5);
        assert_eq!(vp.scroll_offset(), 0);
    }

    #[test]
    fn scroll_clamps_both_sides() {
        let mut vp = Viewport::new(Dimensions::new(3, 400), frame(40)).unwrap();
        vp.scroll(500);
        assert_eq!(vp.scroll_offset(), 360);
        vp.scroll(-10_000);
        assert_eq!(vp.scroll_offset(), 0);
        vp.scroll(10);
        vp.scroll(10);
        assert_eq!(vp.scroll_offset(), 20);
    }

    #[test]
    fn scroll_at_bound_is_noop() {
        let mut vp = Viewport::new(Dimensions::new(3, 100), frame(40)).unwrap();
        vp.scroll(-1);
        assert_eq!(vp.scroll_offset(), 0);
        vp.scroll_to(60);
        vp.scroll(1);
        assert_eq!(vp.scroll_offset(), 60);
    }

    #[test]
    fn extreme_deltas_do_not_overflow() {
        let mut vp = Viewport::new(Dimensions::new(1, u16::MAX), frame(10)).unwrap();
        vp.scroll(i32::MAX);
        assert_eq!(vp.scroll_offset(), u16::MAX - 10);
        vp.scroll(i32::MIN);
        assert_eq!(vp.scroll_offset(), 0);
        vp.scroll_to(i64::MAX);
        assert_eq!(vp.scroll_offset(), vp.max_scroll_offset());
    }

    #[test]
    fn render_shows_only_the_scrolled_window() {
        let mut vp = Viewport::new(Dimensions::new(3, 12), frame(4)).unwrap();
        let canvas = vp.canvas_surface().unwrap();
        canvas.write_text("abcdefghijkl");

        // Nothing is visible before the first render.
        assert_eq!(vp.frame().row_text(0), "    ");

        vp.render();
        assert_eq!(vp.frame().row_text(0), "abcd");

        vp.scroll(6);
        vp.render();
        assert_eq!(vp.frame().row_text(0), "ghij");

        vp.scroll(100);
        vp.render();
        assert_eq!(vp.frame().row_text(0), "ijkl");
    }

    #[test]
    fn render_does_not_touch_cells_outside_frame() {
        let screen = CellBuffer::shared(Dimensions::new(1, 6));
        let root = Surface::root(std::rc::Rc::clone(&screen)).unwrap();
        root.write_text("|....|");
        let inner = root.derive(Rect::new(1, 4, 0, 1).unwrap()).unwrap();
        let vp = Viewport::new(Dimensions::new(1, 8), inner).unwrap();
        vp.canvas_surface().unwrap().write_text("XYZWVUTS");
        vp.render();
        assert_eq!(screen.borrow().row_text(0), "|XYZW|");
    }
}
