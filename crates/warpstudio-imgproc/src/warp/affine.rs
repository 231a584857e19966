use faer::prelude::SpSolver;
use warpstudio_image::{Image, ImageDtype, ImageError};

use super::is_singular;
use crate::interpolation::{interpolate_pixel, BorderMode, InterpolationMode};
use crate::parallel;

/// Inverts a 2x3 affine transformation matrix.
///
/// Arguments:
///
/// * `m` - The 2x3 affine transformation matrix, row-major.
///
/// Returns:
///
/// The inverted 2x3 affine transformation matrix.
///
/// # Errors
///
/// Returns [`ImageError::CannotComputeDeterminant`] when the linear part is singular.
pub fn invert_affine_transform(m: &[f64; 6]) -> Result<[f64; 6], ImageError> {
    let (a, b, c, d, e, f) = (m[0], m[1], m[2], m[3], m[4], m[5]);

    let determinant = a * e - b * d;
    if determinant.abs() < f64::EPSILON || !determinant.is_finite() {
        return Err(ImageError::CannotComputeDeterminant);
    }
    let inv_determinant = 1.0 / determinant;

    let new_a = e * inv_determinant;
    let new_b = -b * inv_determinant;
    let new_d = -d * inv_determinant;
    let new_e = a * inv_determinant;
    let new_c = -(new_a * c + new_b * f);
    let new_f = -(new_d * c + new_e * f);

    Ok([new_a, new_b, new_c, new_d, new_e, new_f])
}

/// Returns a 2x3 rotation matrix for a 2D rotation around a center point.
///
/// The rotation matrix is defined as:
///
/// | alpha  beta  tx |
/// | -beta  alpha ty |
///
/// where:
///
/// alpha = scale * cos(angle)
/// beta = scale * sin(angle)
/// tx = (1 - alpha) * center.x - beta * center.y
/// ty = beta * center.x + (1 - alpha) * center.y
///
/// A positive angle rotates counter-clockwise as the image is displayed.
///
/// # Arguments
///
/// * `center` - The center point of the rotation.
/// * `angle` - The angle of rotation in degrees.
/// * `scale` - The scale factor.
///
/// # Example
///
/// ```
/// use warpstudio_imgproc::warp::get_rotation_matrix2d;
///
/// let rotation_matrix = get_rotation_matrix2d((0.0, 0.0), 0.0, 1.0);
/// assert_eq!(rotation_matrix, [1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
/// ```
pub fn get_rotation_matrix2d(center: (f64, f64), angle: f64, scale: f64) -> [f64; 6] {
    let angle = angle.to_radians();
    let alpha = scale * angle.cos();
    let beta = scale * angle.sin();

    let tx = (1.0 - alpha) * center.0 - beta * center.1;
    let ty = beta * center.0 + (1.0 - alpha) * center.1;

    [alpha, beta, tx, -beta, alpha, ty]
}

/// Computes the affine transform that maps three source points onto three destination points.
///
/// # Arguments
///
/// * `src` - The three source points `(x, y)`.
/// * `dst` - The three destination points `(x, y)`.
///
/// # Returns
///
/// The 2x3 matrix `m` such that `m * [x, y, 1]^T` sends `src[i]` to `dst[i]`.
///
/// # Errors
///
/// Returns [`ImageError::CannotComputeDeterminant`] when the source points are collinear.
///
/// # Example
///
/// ```
/// use warpstudio_imgproc::warp::get_affine_transform;
///
/// let src = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)];
/// let dst = [(2.0, 3.0), (3.0, 3.0), (2.0, 4.0)];
/// let m = get_affine_transform(&src, &dst).unwrap();
///
/// for (a, b) in m.iter().zip([1.0, 0.0, 2.0, 0.0, 1.0, 3.0]) {
///     assert!((a - b).abs() < 1e-9);
/// }
/// ```
pub fn get_affine_transform(
    src: &[(f64, f64); 3],
    dst: &[(f64, f64); 3],
) -> Result<[f64; 6], ImageError> {
    let mat_a = faer::Mat::<f64>::from_fn(3, 3, |i, j| [src[i].0, src[i].1, 1.0][j]);
    if is_singular(&mat_a) {
        return Err(ImageError::CannotComputeDeterminant);
    }

    // each output coordinate is one rhs column sharing the same lhs
    let rhs = faer::Mat::<f64>::from_fn(3, 2, |i, j| match j {
        0 => dst[i].0,
        _ => dst[i].1,
    });
    let sol = mat_a.partial_piv_lu().solve(rhs);
    let (row_x, row_y) = (sol.col(0), sol.col(1));

    let m = [row_x[0], row_x[1], row_x[2], row_y[0], row_y[1], row_y[2]];
    if m.iter().any(|v| !v.is_finite()) {
        return Err(ImageError::CannotComputeDeterminant);
    }
    Ok(m)
}

/// Applies an affine transformation to a point.
#[inline]
pub(crate) fn transform_point(x: f64, y: f64, m: &[f64; 6]) -> (f64, f64) {
    let u = m[0] * x + m[1] * y + m[2];
    let v = m[3] * x + m[4] * y + m[5];
    (u, v)
}

/// Applies an affine transformation to an image.
///
/// Every destination pixel is sampled from the source at the position given by
/// the inverse of `m`; samples falling outside the source are extended with `border`.
///
/// # Arguments
///
/// * `src` - The input image with shape (height, width, channels).
/// * `dst` - The output image with shape (new_height, new_width, channels).
/// * `m` - The 2x3 affine transformation matrix src -> dst.
/// * `interpolation` - The interpolation mode to use.
/// * `border` - The border extension mode.
/// * `border_value` - The fill value used by [`BorderMode::Constant`].
///
/// # Errors
///
/// Returns [`ImageError::CannotComputeDeterminant`] when `m` cannot be inverted.
///
/// # Example
///
/// ```
/// use warpstudio_image::{Image, ImageSize};
/// use warpstudio_imgproc::interpolation::{BorderMode, InterpolationMode};
/// use warpstudio_imgproc::warp::warp_affine;
///
/// let src = Image::<u8, 3>::from_size_val(
///     ImageSize {
///         width: 4,
///         height: 5,
///     },
///     1,
/// ).unwrap();
///
/// let m = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
///
/// let mut dst = Image::<u8, 3>::from_size_val(src.size(), 0).unwrap();
///
/// warp_affine(&src, &mut dst, &m, InterpolationMode::Nearest, BorderMode::Constant, 0.0).unwrap();
///
/// assert_eq!(dst.as_slice(), src.as_slice());
/// ```
pub fn warp_affine<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    m: &[f64; 6],
    interpolation: InterpolationMode,
    border: BorderMode,
    border_value: f32,
) -> Result<(), ImageError> {
    // invert affine transform matrix to find corresponding positions in src from dst
    let m_inv = invert_affine_transform(m)?;

    parallel::par_iter_rows_resample(dst, |x, y, dst_pixel| {
        let (u, v) = transform_point(x as f64, y as f64, &m_inv);
        let pixel = interpolate_pixel(
            src,
            u as f32,
            v as f32,
            interpolation,
            border,
            border_value,
        );
        dst_pixel
            .iter_mut()
            .zip(pixel)
            .for_each(|(d, p)| *d = T::from_f32(p));
    });

    Ok(())
}
