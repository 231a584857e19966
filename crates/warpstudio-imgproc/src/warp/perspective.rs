use crate::{
    interpolation::{interpolate_pixel, BorderMode, InterpolationMode},
    parallel,
};

use super::is_singular;
use faer::prelude::SpSolver;
use warpstudio_image::{Image, ImageDtype, ImageError};

#[rustfmt::skip]
fn determinant3x3(m: &[f64; 9]) -> f64 {
    m[0] * (m[4] * m[8] - m[5] * m[7]) -
    m[1] * (m[3] * m[8] - m[5] * m[6]) +
    m[2] * (m[3] * m[7] - m[4] * m[6])
}

#[rustfmt::skip]
fn adjugate3x3(m: &[f64; 9]) -> [f64; 9] {
    [
        m[4] * m[8] - m[5] * m[7],  // [0, 0]
        m[2] * m[7] - m[1] * m[8],  // [0, 1]
        m[1] * m[5] - m[2] * m[4],  // [0, 2]
        m[5] * m[6] - m[3] * m[8],  // [1, 0]
        m[0] * m[8] - m[2] * m[6],  // [1, 1]
        m[2] * m[3] - m[0] * m[5],  // [1, 2]
        m[3] * m[7] - m[4] * m[6],  // [2, 0]
        m[1] * m[6] - m[0] * m[7],  // [2, 1]
        m[0] * m[4] - m[1] * m[3],  // [2, 2]
    ]
}

/// Inverts a 3x3 perspective transformation matrix.
///
/// # Errors
///
/// Returns [`ImageError::CannotComputeDeterminant`] when the matrix is singular.
pub fn inverse_perspective_matrix(m: &[f64; 9]) -> Result<[f64; 9], ImageError> {
    let det = determinant3x3(m);

    if det.abs() < 1e-12 || !det.is_finite() {
        return Err(ImageError::CannotComputeDeterminant);
    }

    let adj = adjugate3x3(m);
    let inv_det = 1.0 / det;

    Ok(adj.map(|v| v * inv_det))
}

/// Applies a projective transformation to a point.
///
/// Returns `None` for points mapped to infinity.
#[inline]
pub(crate) fn transform_point(x: f64, y: f64, m: &[f64; 9]) -> Option<(f64, f64)> {
    let w = m[6] * x + m[7] * y + m[8];
    if w.abs() < f64::EPSILON {
        return None;
    }
    let u = (m[0] * x + m[1] * y + m[2]) / w;
    let v = (m[3] * x + m[4] * y + m[5]) / w;
    Some((u, v))
}

/// Computes the homography that maps four source points onto four destination points.
///
/// The matrix is normalized so that its last element is one.
///
/// # Arguments
///
/// * `src` - The four source points `(x, y)`.
/// * `dst` - The four destination points `(x, y)`.
///
/// # Errors
///
/// Returns [`ImageError::CannotComputeDeterminant`] when the 8x8 system is singular,
/// which happens when three of the points in either set are collinear.
///
/// # Example
///
/// ```
/// use warpstudio_imgproc::warp::get_perspective_transform;
///
/// let corners = [(0.0, 0.0), (4.0, 0.0), (0.0, 3.0), (4.0, 3.0)];
/// let m = get_perspective_transform(&corners, &corners).unwrap();
///
/// for (a, b) in m.iter().zip([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]) {
///     assert!((a - b).abs() < 1e-9);
/// }
/// ```
pub fn get_perspective_transform(
    src: &[(f64, f64); 4],
    dst: &[(f64, f64); 4],
) -> Result<[f64; 9], ImageError> {
    // two equations per correspondence:
    // x' = (h0 x + h1 y + h2) / (h6 x + h7 y + 1)
    // y' = (h3 x + h4 y + h5) / (h6 x + h7 y + 1)
    let mut mat_a = faer::Mat::<f64>::zeros(8, 8);
    let mut mat_b = faer::Mat::<f64>::zeros(8, 1);
    for (i, (&(x, y), &(xp, yp))) in src.iter().zip(dst.iter()).enumerate() {
        let row_x = [x, y, 1.0, 0.0, 0.0, 0.0, -x * xp, -y * xp];
        let row_y = [0.0, 0.0, 0.0, x, y, 1.0, -x * yp, -y * yp];
        for (j, (ax, ay)) in row_x.into_iter().zip(row_y).enumerate() {
            mat_a.write(i, j, ax);
            mat_a.write(i + 4, j, ay);
        }
        mat_b.write(i, 0, xp);
        mat_b.write(i + 4, 0, yp);
    }

    if is_singular(&mat_a) {
        return Err(ImageError::CannotComputeDeterminant);
    }

    // solve -> h: 8x1, the last element is fixed to one
    let h_mat = mat_a.partial_piv_lu().solve(mat_b);
    let h = h_mat.col(0);
    let m = [h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0];

    let det = determinant3x3(&m);
    if det.abs() < 1e-12 || m.iter().any(|v| !v.is_finite()) {
        return Err(ImageError::CannotComputeDeterminant);
    }
    Ok(m)
}

/// Applies a perspective transformation to an image.
///
/// * `src` - The input image with shape (height, width, channels).
/// * `dst` - The output image with shape (new_height, new_width, channels).
/// * `m` - The 3x3 perspective transformation matrix src -> dst.
/// * `interpolation` - The interpolation mode to use.
/// * `border` - The border extension mode.
/// * `border_value` - The fill value used by [`BorderMode::Constant`] and for points at infinity.
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
/// use warpstudio_imgproc::warp::warp_perspective;
///
/// let src = Image::<f32, 1>::new(
///     ImageSize {
///         width: 4,
///         height: 5,
///     },
///     vec![0.0f32; 4 * 5],
/// ).unwrap();
///
/// let m = [1.0, 0.0, -1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0];
///
/// let mut dst = Image::<f32, 1>::from_size_val(
///     ImageSize {
///         width: 2,
///         height: 3,
///     },
///     0.0,
/// ).unwrap();
///
/// warp_perspective(&src, &mut dst, &m, InterpolationMode::Bilinear, BorderMode::Constant, 0.0).unwrap();
///
/// assert_eq!(dst.size().width, 2);
/// assert_eq!(dst.size().height, 3);
/// ```
pub fn warp_perspective<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    m: &[f64; 9],
    interpolation: InterpolationMode,
    border: BorderMode,
    border_value: f32,
) -> Result<(), ImageError> {
    let inv_m = inverse_perspective_matrix(m)?;

    parallel::par_iter_rows_resample(dst, |x, y, dst_pixel| {
        let pixel = match transform_point(x as f64, y as f64, &inv_m) {
            Some((u, v)) => interpolate_pixel(
                src,
                u as f32,
                v as f32,
                interpolation,
                border,
                border_value,
            ),
            None => [border_value; C],
        };
        dst_pixel
            .iter_mut()
            .zip(pixel)
            .for_each(|(d, p)| *d = T::from_f32(p));
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use warpstudio_image::{Image, ImageError, ImageSize};

    use super::{BorderMode, InterpolationMode};

    #[test]
    fn inverse_perspective_matrix() -> Result<(), ImageError> {
        let m = [1.0, 0.0, -1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0];
        let expected = [1.0, 0.0, 1.0, 0.0, 1.0, -1.0, 0.0, 0.0, 1.0];
        let inv_m = super::inverse_perspective_matrix(&m)?;
        assert_eq!(inv_m, expected);
        Ok(())
    }

    #[test]
    fn inverse_perspective_matrix_singular() {
        let m = [1.0, 2.0, 3.0, 2.0, 4.0, 6.0, 0.0, 0.0, 1.0];
        assert_eq!(
            super::inverse_perspective_matrix(&m),
            Err(ImageError::CannotComputeDeterminant)
        );
    }

    #[test]
    fn transform_point() {
        let m = [1.0, 0.0, -1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0];
        assert_eq!(super::transform_point(1.0, 1.0, &m), Some((0.0, 2.0)));

        let at_infinity = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0];
        assert_eq!(super::transform_point(0.0, 5.0, &at_infinity), None);
    }

    #[test]
    fn perspective_transform_maps_points() -> Result<(), ImageError> {
        let src = [(0.0, 0.0), (200.0, 0.0), (0.0, 100.0), (200.0, 100.0)];
        let dst = [(10.0, 20.0), (180.0, 5.0), (30.0, 120.0), (210.0, 90.0)];
        let m = super::get_perspective_transform(&src, &dst)?;
        for (s, d) in src.iter().zip(dst.iter()) {
            let (u, v) = super::transform_point(s.0, s.1, &m).unwrap();
            assert_relative_eq!(u, d.0, epsilon = 1e-6);
            assert_relative_eq!(v, d.1, epsilon = 1e-6);
        }
        Ok(())
    }

    #[test]
    fn perspective_transform_collinear_destination() {
        let src = [(0.0, 0.0), (10.0, 0.0), (0.0, 10.0), (10.0, 10.0)];
        let dst = [(0.0, 0.0), (5.0, 5.0), (10.0, 10.0), (20.0, 20.0)];
        assert_eq!(
            super::get_perspective_transform(&src, &dst),
            Err(ImageError::CannotComputeDeterminant)
        );
    }

    #[test]
    fn perspective_transform_coincident_source() {
        let src = [(0.0, 0.0), (0.0, 0.0), (0.0, 10.0), (10.0, 10.0)];
        let dst = [(0.0, 0.0), (10.0, 0.0), (0.0, 10.0), (10.0, 10.0)];
        assert_eq!(
            super::get_perspective_transform(&src, &dst),
            Err(ImageError::CannotComputeDeterminant)
        );
    }

    #[test]
    fn perspective_transform_large_canvas() -> Result<(), ImageError> {
        let (w, h) = (4000.0, 3000.0);
        let src = [(0.0, 0.0), (w, 0.0), (0.0, h), (w, h)];
        let dst = [(120.0, 80.0), (w - 40.0, 10.0), (30.0, h - 200.0), (w, h + 15.0)];
        let m = super::get_perspective_transform(&src, &dst)?;
        for (s, d) in src.iter().zip(dst.iter()) {
            let (u, v) = super::transform_point(s.0, s.1, &m).unwrap();
            assert_relative_eq!(u, d.0, epsilon = 1e-6);
            assert_relative_eq!(v, d.1, epsilon = 1e-6);
        }
        Ok(())
    }

    #[test]
    fn warp_perspective_hflip() -> Result<(), ImageError> {
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 2,
                height: 3,
            },
            vec![0.0f32, 1.0, 2.0, 3.0, 4.0, 5.0],
        )?;

        let image_expected = vec![1.0, 0.0, 3.0, 2.0, 5.0, 4.0];

        // flip matrix
        let m = [-1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

        let mut image_transformed = Image::<_, 1>::from_size_val(image.size(), 0.0)?;

        super::warp_perspective(
            &image,
            &mut image_transformed,
            &m,
            InterpolationMode::Bilinear,
            BorderMode::Constant,
            0.0,
        )?;

        assert_eq!(image_transformed.num_channels(), 1);
        assert_eq!(image_transformed.as_slice(), image_expected);

        Ok(())
    }

    #[test]
    fn warp_perspective_shift() -> Result<(), ImageError> {
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 4,
                height: 4,
            },
            vec![
                0.0f32, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0,
                15.0,
            ],
        )?;

        // shift left by 1 pixel
        let m = [1.0, 0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

        let image_expected = vec![
            1.0f32, 2.0, 3.0, 0.0, 5.0, 6.0, 7.0, 0.0, 9.0, 10.0, 11.0, 0.0, 13.0, 14.0, 15.0, 0.0,
        ];

        let mut image_transformed = Image::<_, 1>::from_size_val(image.size(), 0.0)?;

        super::warp_perspective(
            &image,
            &mut image_transformed,
            &m,
            InterpolationMode::Bilinear,
            BorderMode::Constant,
            0.0,
        )?;

        assert_eq!(image_transformed.as_slice(), image_expected);

        Ok(())
    }

    #[test]
    fn warp_perspective_identity_u8() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new([3, 2].into(), (0..18).collect())?;
        let corners = [(0.0, 0.0), (3.0, 0.0), (0.0, 2.0), (3.0, 2.0)];
        let m = super::get_perspective_transform(&corners, &corners)?;

        let mut dst = Image::<u8, 3>::from_size_val(image.size(), 0)?;
        super::warp_perspective(
            &image,
            &mut dst,
            &m,
            InterpolationMode::Nearest,
            BorderMode::Constant,
            0.0,
        )?;
        assert_eq!(dst, image);
        Ok(())
    }
}
