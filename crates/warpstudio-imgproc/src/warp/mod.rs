//! Geometric image transformations using affine and perspective warps.
//!
//! This module provides functions for applying 2D transformations to images:
//!
//! - Affine transformations (rotation, translation, scaling, shearing)
//! - Perspective transformations (homographies)
//! - Rotation matrix generation
//! - Matrix estimation from point correspondences
//! - Affine and perspective transform inversion
//!
//! Matrices are row-major, in double precision, and map source coordinates
//! to destination coordinates.
//!
//! # Examples
//!
//! Rotating an image by 45 degrees:
//!
//! ```
//! use warpstudio_image::Image;
//! use warpstudio_imgproc::interpolation::{BorderMode, InterpolationMode};
//! use warpstudio_imgproc::warp::{get_rotation_matrix2d, warp_affine};
//!
//! let src = Image::<u8, 3>::from_size_val([256, 256].into(), 128).unwrap();
//! let mut dst = Image::<u8, 3>::from_size_val(src.size(), 0).unwrap();
//!
//! let rotation_matrix = get_rotation_matrix2d((128.0, 128.0), 45.0, 1.0);
//! warp_affine(
//!     &src,
//!     &mut dst,
//!     &rotation_matrix,
//!     InterpolationMode::Bilinear,
//!     BorderMode::Constant,
//!     0.0,
//! )
//! .unwrap();
//! ```

mod affine;
mod perspective;

/// Ratio of the smallest to the largest singular value under which a system is singular.
const SINGULAR_TOLERANCE: f64 = 1e-12;

/// Whether the square system `mat` is singular or too ill-conditioned to solve.
fn is_singular(mat: &faer::Mat<f64>) -> bool {
    let singular_values = mat.singular_values();
    let largest = singular_values.iter().fold(0.0f64, |acc, s| acc.max(*s));
    let smallest = singular_values.iter().fold(f64::INFINITY, |acc, s| acc.min(*s));
    !largest.is_finite() || largest == 0.0 || smallest <= SINGULAR_TOLERANCE * largest
}

pub use affine::{get_affine_transform, get_rotation_matrix2d, invert_affine_transform, warp_affine};
pub use perspective::{get_perspective_transform, inverse_perspective_matrix, warp_perspective};
