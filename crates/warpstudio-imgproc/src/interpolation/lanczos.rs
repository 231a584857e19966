use std::f32::consts::PI;

use super::border::BorderMode;
use super::interpolate::separable_sum;
use warpstudio_image::{Image, ImageDtype};

/// Half width of the Lanczos window, in pixels.
const LANCZOS_A: usize = 4;

/// Number of taps per axis.
const LANCZOS_TAPS: usize = 2 * LANCZOS_A;

/// Normalized sinc, `sin(pi x) / (pi x)`.
#[inline]
fn sinc(x: f32) -> f32 {
    if x.abs() < 1e-6 {
        1.0
    } else {
        let px = PI * x;
        px.sin() / px
    }
}

/// Lanczos weights for the taps at offsets `-3..=4` around a fractional position `x`.
///
/// The weights are normalized to sum to one.
#[inline]
pub(crate) fn lanczos_weights(x: f32) -> [f32; LANCZOS_TAPS] {
    let mut w = [0.0; LANCZOS_TAPS];
    if x.abs() < 1e-6 {
        w[LANCZOS_A - 1] = 1.0;
        return w;
    }

    let a = LANCZOS_A as f32;
    let mut sum = 0.0;
    for (i, wi) in w.iter_mut().enumerate() {
        let d = x - (i as f32 - (a - 1.0));
        *wi = sinc(d) * sinc(d / a);
        sum += *wi;
    }
    for wi in w.iter_mut() {
        *wi /= sum;
    }
    w
}

/// Kernel for Lanczos interpolation over the 8x8 neighborhood of `(u, v)`.
pub(crate) fn lanczos_interpolation<T: ImageDtype, const C: usize>(
    image: &Image<T, C>,
    u: f32,
    v: f32,
    border: BorderMode,
    border_value: f32,
) -> [f32; C] {
    let (u0, v0) = (u.floor(), v.floor());

    let wx = lanczos_weights(u - u0);
    let wy = lanczos_weights(v - v0);

    let offset = LANCZOS_A as isize - 1;
    separable_sum(
        image,
        u0 as isize - offset,
        v0 as isize - offset,
        &wx,
        &wy,
        border,
        border_value,
    )
}
