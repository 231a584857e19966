use super::border::{fetch_pixel, BorderMode};
use warpstudio_image::{Image, ImageDtype};

/// Kernel for nearest neighbor interpolation
///
/// # Arguments
///
/// * `image` - The input image container.
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
///
/// # Returns
///
/// The interpolated pixel values.
pub(crate) fn nearest_neighbor_interpolation<T: ImageDtype, const C: usize>(
    image: &Image<T, C>,
    u: f32,
    v: f32,
    border: BorderMode,
    border_value: f32,
) -> [f32; C] {
    let iu = u.round() as isize;
    let iv = v.round() as isize;

    fetch_pixel(image, iu, iv, border, border_value)
}
