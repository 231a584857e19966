use crate::parallel;
use warpstudio_image::{Image, ImageError};

fn swap_red_blue<T>(src: &Image<T, 3>, dst: &mut Image<T, 3>) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        dst_pixel
            .iter_mut()
            .zip(src_pixel.iter().rev())
            .for_each(|(d, s)| {
                *d = *s;
            });
    });

    Ok(())
}

/// Convert an RGB image to BGR channel order.
///
/// # Arguments
///
/// * `src` - The input RGB image.
/// * `dst` - The output BGR image.
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use warpstudio_image::{Image, ImageSize};
/// use warpstudio_imgproc::color::bgr_from_rgb;
///
/// let rgb = Image::<u8, 3>::new(ImageSize { width: 1, height: 1 }, vec![255, 0, 10]).unwrap();
/// let mut bgr = Image::<u8, 3>::from_size_val(rgb.size(), 0).unwrap();
///
/// bgr_from_rgb(&rgb, &mut bgr).unwrap();
///
/// assert_eq!(bgr.as_slice(), &[10, 0, 255]);
/// ```
pub fn bgr_from_rgb<T>(src: &Image<T, 3>, dst: &mut Image<T, 3>) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    swap_red_blue(src, dst)
}

/// Convert a BGR image, as produced by BGR-ordered decoders, to RGB for display.
///
/// Precondition: the input and output images must have the same size.
pub fn rgb_from_bgr<T>(src: &Image<T, 3>, dst: &mut Image<T, 3>) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    swap_red_blue(src, dst)
}

#[cfg(test)]
mod tests {
    use warpstudio_image::{Image, ImageError, ImageSize};

    #[test]
    fn bgr_from_rgb() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let image = Image::new(
            ImageSize {
                width: 1,
                height: 3,
            },
            vec![
                0.0, 1.0, 2.0,
                3.0, 4.0, 5.0,
                6.0, 7.0, 8.0,
            ],
        )?;

        let mut bgr = Image::<f32, 3>::from_size_val(image.size(), 0.0)?;

        super::bgr_from_rgb(&image, &mut bgr)?;

        #[rustfmt::skip]
        assert_eq!(
            bgr.as_slice(),
            &[
                2.0, 1.0, 0.0,
                5.0, 4.0, 3.0,
                8.0, 7.0, 6.0,
            ]
        );

        Ok(())
    }

    #[test]
    fn rgb_from_bgr_roundtrip() -> Result<(), ImageError> {
        let bgr = Image::<u8, 3>::new([2, 1].into(), vec![1, 2, 3, 4, 5, 6])?;
        let mut rgb = Image::<u8, 3>::from_size_val(bgr.size(), 0)?;
        super::rgb_from_bgr(&bgr, &mut rgb)?;
        assert_eq!(rgb.as_slice(), &[3, 2, 1, 6, 5, 4]);

        let mut back = Image::<u8, 3>::from_size_val(bgr.size(), 0)?;
        super::bgr_from_rgb(&rgb, &mut back)?;
        assert_eq!(back, bgr);
        Ok(())
    }

    #[test]
    fn swap_size_mismatch() -> Result<(), ImageError> {
        let src = Image::<u8, 3>::from_size_val([2, 2].into(), 0)?;
        let mut dst = Image::<u8, 3>::from_size_val([3, 2].into(), 0)?;
        assert_eq!(
            super::rgb_from_bgr(&src, &mut dst),
            Err(ImageError::InvalidImageSize(2, 2, 3, 2))
        );
        Ok(())
    }
}
