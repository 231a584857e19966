use super::border::BorderMode;
use super::interpolate::separable_sum;
use warpstudio_image::{Image, ImageDtype};

/// Kernel for bilinear interpolation
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
pub(crate) fn bilinear_interpolation<T: ImageDtype, const C: usize>(
    image: &Image<T, C>,
    u: f32,
    v: f32,
    border: BorderMode,
    border_value: f32,
) -> [f32; C] {
    let (u0, v0) = (u.floor(), v.floor());

    let frac_u = u - u0;
    let frac_v = v - v0;

    let wx = [1.0 - frac_u, frac_u];
    let wy = [1.0 - frac_v, frac_v];

    separable_sum(
        image,
        u0 as isize,
        v0 as isize,
        &wx,
        &wy,
        border,
        border_value,
    )
}
