use std::fmt;
use std::str::FromStr;

use super::bicubic::bicubic_interpolation;
use super::bilinear::bilinear_interpolation;
use super::border::{fetch_pixel, BorderMode};
use super::lanczos::lanczos_interpolation;
use super::nearest::nearest_neighbor_interpolation;
use warpstudio_image::{Image, ImageDtype};

/// Interpolation mode for the resampling operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterpolationMode {
    /// Nearest neighbor interpolation
    #[cfg_attr(feature = "serde", serde(rename = "nearest"))]
    Nearest,
    /// Bilinear interpolation over a 2x2 neighborhood
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "linear", alias = "bilinear"))]
    Bilinear,
    /// Bicubic interpolation over a 4x4 neighborhood
    #[cfg_attr(feature = "serde", serde(rename = "cubic", alias = "bicubic"))]
    Bicubic,
    /// Lanczos windowed-sinc interpolation over an 8x8 neighborhood
    #[cfg_attr(feature = "serde", serde(rename = "lanczos"))]
    Lanczos,
}

impl fmt::Display for InterpolationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InterpolationMode::Nearest => "nearest",
            InterpolationMode::Bilinear => "linear",
            InterpolationMode::Bicubic => "cubic",
            InterpolationMode::Lanczos => "lanczos",
        };
        f.write_str(name)
    }
}

impl FromStr for InterpolationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nearest" => Ok(InterpolationMode::Nearest),
            "linear" | "bilinear" => Ok(InterpolationMode::Bilinear),
            "cubic" | "bicubic" => Ok(InterpolationMode::Bicubic),
            "lanczos" | "lanczos4" => Ok(InterpolationMode::Lanczos),
            other => Err(format!("unknown interpolation mode: {other}")),
        }
    }
}

/// Weighted sum of a `K x K` neighborhood starting at `(x0, y0)`.
///
/// `wx` and `wy` are the separable column and row weights.
#[inline]
pub(crate) fn separable_sum<T: ImageDtype, const C: usize, const K: usize>(
    image: &Image<T, C>,
    x0: isize,
    y0: isize,
    wx: &[f32; K],
    wy: &[f32; K],
    border: BorderMode,
    border_value: f32,
) -> [f32; C] {
    let mut pixel = [0.0; C];
    for (j, wy_j) in wy.iter().enumerate() {
        if *wy_j == 0.0 {
            continue;
        }
        let mut row = [0.0; C];
        for (i, wx_i) in wx.iter().enumerate() {
            if *wx_i == 0.0 {
                continue;
            }
            let tap = fetch_pixel(
                image,
                x0 + i as isize,
                y0 + j as isize,
                border,
                border_value,
            );
            for k in 0..C {
                row[k] += tap[k] * wx_i;
            }
        }
        for k in 0..C {
            pixel[k] += row[k] * wy_j;
        }
    }
    pixel
}

/// Largest coordinate magnitude handed to the kernels.
///
/// Every `f32` beyond it is a whole number, and keeping taps within it leaves
/// the integer tap offsets far from overflow.
const COORD_LIMIT: f32 = (1 << 24) as f32;

/// Kernel for interpolating a pixel value
///
/// # Arguments
///
/// * `image` - The input image container with shape (height, width, C).
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
/// * `interpolation` - The interpolation mode to use.
/// * `border` - How taps outside the image are synthesized.
/// * `border_value` - The value of taps resolved by [`BorderMode::Constant`].
///
/// Non-finite coordinates yield `border_value`. Coordinates farther than 2^24
/// pixels from the origin are pulled in to that distance first.
///
/// # Returns
///
/// The interpolated values of every channel.
pub fn interpolate_pixel<T: ImageDtype, const C: usize>(
    image: &Image<T, C>,
    u: f32,
    v: f32,
    interpolation: InterpolationMode,
    border: BorderMode,
    border_value: f32,
) -> [f32; C] {
    if !u.is_finite() || !v.is_finite() {
        return [border_value; C];
    }
    let u = u.clamp(-COORD_LIMIT, COORD_LIMIT);
    let v = v.clamp(-COORD_LIMIT, COORD_LIMIT);
    match interpolation {
        InterpolationMode::Nearest => {
            nearest_neighbor_interpolation(image, u, v, border, border_value)
        }
        InterpolationMode::Bilinear => bilinear_interpolation(image, u, v, border, border_value),
        InterpolationMode::Bicubic => bicubic_interpolation(image, u, v, border, border_value),
        InterpolationMode::Lanczos => lanczos_interpolation(image, u, v, border, border_value),
    }
}
