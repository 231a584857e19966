#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// color channel order conversions.
pub mod color;

/// utilities for interpolation and border extension.
pub mod interpolation;

/// module containing parallization utilities.
pub mod parallel;

/// image resizing module.
pub mod resize;

/// image geometric transformations module.
pub mod warp;
