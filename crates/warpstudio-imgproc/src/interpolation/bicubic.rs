use super::border::BorderMode;
use super::interpolate::separable_sum;
use warpstudio_image::{Image, ImageDtype};

/// Free parameter of the Keys cubic convolution kernel, as used by OpenCV.
const CUBIC_A: f32 = -0.75;

/// Weights of the four taps at offsets -1, 0, 1, 2 for a fractional position `x`.
#[inline]
pub(crate) fn cubic_weights(x: f32) -> [f32; 4] {
    let a = CUBIC_A;
    let w0 = ((a * (x + 1.0) - 5.0 * a) * (x + 1.0) + 8.0 * a) * (x + 1.0) - 4.0 * a;
    let w1 = ((a + 2.0) * x - (a + 3.0)) * x * x + 1.0;
    let w2 = ((a + 2.0) * (1.0 - x) - (a + 3.0)) * (1.0 - x) * (1.0 - x) + 1.0;
    let w3 = 1.0 - w0 - w1 - w2;
    [w0, w1, w2, w3]
}

/// Kernel for bicubic interpolation over the 4x4 neighborhood of `(u, v)`.
pub(crate) fn bicubic_interpolation<T: ImageDtype, const C: usize>(
    image: &Image<T, C>,
    u: f32,
    v: f32,
    border: BorderMode,
    border_value: f32,
) -> [f32; C] {
    let (u0, v0) = (u.floor(), v.floor());

    let wx = cubic_weights(u - u0);
    let wy = cubic_weights(v - v0);

    separable_sum(
        image,
        u0 as isize - 1,
        v0 as isize - 1,
        &wx,
        &wy,
        border,
        border_value,
    )
}
