//! Foundational primitives for text-region segmentation.
//!
//! ## Images and Plane Stacks
//! [`Image`] is an owned row-major 2D buffer; [`ImageView`] borrows one, or any
//! slice with an element stride of at least `width` (row-padded buffers are
//! read in place).
//!
//! [`PlaneStack`] holds a `[channels, height, width]` volume, the layout a
//! predictor emits for class probabilities (one plane per class) and adjacency
//! scores (one plane per [`Offset`]).
//!
//! ## Coordinates
//! Pixel `(x, y)` is column `x`, row `y`. Flat pixel indices are row-major:
//! `y * width + x`. Offsets are written `[dy, dx]`.

mod error;
mod geom;
mod image;
mod offset;
mod planes;
mod resize;

pub use error::Error;
pub use geom::{Point2f, Vec2f};
pub use image::{Image, ImageView};
pub use offset::Offset;
pub use planes::PlaneStack;
pub use resize::resize_nearest;
