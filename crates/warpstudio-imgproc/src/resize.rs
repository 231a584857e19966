use warpstudio_image::{Image, ImageError};

use crate::parallel;

/// Resize an image with nearest neighbor sampling.
///
/// Destination pixel `x` reads source column `floor(x * src_width / dst_width)`,
/// and rows likewise, so a 2x downscale keeps the even pixels. The size of
/// `dst` sets the output size.
///
/// # Arguments
///
/// * `src` - The input image container.
/// * `dst` - The output image container.
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] when either image is empty.
///
/// # Example
///
/// ```
/// use warpstudio_image::Image;
/// use warpstudio_imgproc::resize::resize_nearest;
///
/// let image = Image::<u8, 1>::new([4, 1].into(), vec![0, 1, 2, 3]).unwrap();
/// let mut half = Image::<u8, 1>::from_size_val([2, 1].into(), 0).unwrap();
///
/// resize_nearest(&image, &mut half).unwrap();
///
/// assert_eq!(half.as_slice(), &[0, 2]);
/// ```
pub fn resize_nearest<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    if src.is_empty() || dst.is_empty() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    let (src_cols, src_rows) = (src.cols(), src.rows());
    let (dst_cols, dst_rows) = (dst.cols(), dst.rows());
    let src_data = src.as_slice();

    parallel::par_iter_rows_resample(dst, |x, y, dst_pixel| {
        let sx = (x * src_cols / dst_cols).min(src_cols - 1);
        let sy = (y * src_rows / dst_rows).min(src_rows - 1);
        let base = (sy * src_cols + sx) * C;
        dst_pixel.copy_from_slice(&src_data[base..base + C]);
    });

    Ok(())
}
