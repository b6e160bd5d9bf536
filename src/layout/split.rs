//! Screen partitioning into the upper (block history) and lower (summary) boxes.
//!
//! ```text
//! ┌──────────────┐ <- screen
//! │┌────────────┐│
//! ││   upper    ││
//! │└────────────┘│
//! │┌────────────┐│
//! ││   lower    ││
//! │└────────────┘│
//! └──────────────┘
//! ```

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use super::rect::{Dimensions, Rect};
use crate::core::errors::{BituiError, Result};

/// Cells of separation between a box and the screen edge or its neighbour.
pub const SEP: u16 = 1;

/// Split `screen` into an upper box taking `percent` of the height and a
/// lower box taking the rest, each inset from the screen edges by [`SEP`].
///
/// # Errors
/// [`BituiError::Geometry`] when `percent` is outside `(0, 1)` or either box
/// would be too small to hold a border and one cell of content.
pub fn split_vertical(screen: Dimensions, percent: f64) -> Result<(Rect, Rect)> {
    if !(percent > 0.0 && percent < 1.0) {
        return Err(BituiError::geometry(format!(
            "split percent must be in (0, 1), got {percent}"
        )));
    }

    let total = f64::from(screen.height);
    let upper_share = (percent * total).floor() as i32;
    let lower_share = ((1.0 - percent) * total).floor() as i32;
    let sep = i32::from(SEP);

    let width = i32::from(screen.width) - 2 * sep;
    let upper_height = upper_share - 2 * sep;
    let lower_height = lower_share - 2 * sep;
    let lower_y = upper_height + 3 * sep;

    for (name, h) in [("upper", upper_height), ("lower", lower_height)] {
        if h < 3 || width < 3 {
            return Err(BituiError::geometry(format!(
                "{name} box {h}x{width} is too small for screen {}x{}",
                screen.height, screen.width
            )));
        }
    }

    // All values are positive and bounded by the screen size here.
    let upper = Rect::new(upper_height as u16, width as u16, SEP, SEP)?;
    let lower = Rect::new(lower_height as u16, width as u16, lower_y as u16, SEP)?;
    Ok((upper, lower))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_split_of_standard_terminal() {
        let (upper, lower) = split_vertical(Dimensions::new(24, 80), 0.5).unwrap();
        assert_eq!(upper, Rect::new(10, 78, 1, 1).unwrap());
        assert_eq!(lower, Rect::new(10, 78, 13, 1).unwrap());
        assert!(!upper.overlaps(&lower));
        assert!(lower.bottom() <= 24);
    }

    #[test]
    fn uneven_split_keeps_boxes_on_screen() {
        let screen = Rect::new(41, 120, 0, 0).unwrap();
        let (upper, lower) = split_vertical(screen.dims(), 0.6).unwrap();
        assert!(screen.contains(&upper));
        assert!(screen.contains(&lower));
        assert!(!upper.overlaps(&lower));
        assert!(upper.height() > lower.height());
    }

    #[test]
    fn tiny_screen_is_geometry_error() {
        let err = split_vertical(Dimensions::new(8, 80), 0.5).unwrap_err();
        assert_eq!(err.code(), "BUI-1001");
        assert!(split_vertical(Dimensions::new(24, 4), 0.5).is_err());
    }

    #[test]
    fn percent_out_of_range_is_rejected() {
        for p in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            assert!(split_vertical(Dimensions::new(24, 80), p).is_err(), "{p}");
        }
    }
}
