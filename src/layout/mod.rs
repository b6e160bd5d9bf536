//! Geometry kernel: rects, surfaces, the scrolling viewport and block chain.

pub mod block;
pub mod buffer;
pub mod chain;
pub mod rect;
pub mod split;
pub mod surface;
pub mod viewport;
