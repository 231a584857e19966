//! Pixel interpolation methods for image transformations.
//!
//! This module provides the interpolation kernels used when resampling
//! images during geometric transformations, together with the border
//! extension rules applied to taps that fall outside the source image.
//!
//! # Interpolation Modes
//!
//! - **Nearest**: Fastest, uses nearest pixel value (no interpolation)
//! - **Bilinear**: Linear interpolation between the 2x2 adjacent pixels
//! - **Bicubic**: Keys cubic convolution over a 4x4 neighborhood
//! - **Lanczos**: Windowed sinc over an 8x8 neighborhood, slowest and sharpest
//!
//! # Border Modes
//!
//! - **Constant**: a fixed fill value
//! - **Replicate**: clamp to the edge pixel
//! - **Reflect**: mirror across the edge, edge pixel included
//! - **Wrap**: continue from the opposite edge

mod bicubic;
mod bilinear;
mod border;
pub(crate) mod interpolate;
mod lanczos;
mod nearest;

pub use border::BorderMode;
pub use interpolate::{interpolate_pixel, InterpolationMode};
