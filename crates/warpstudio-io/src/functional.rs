use std::path::Path;

use warpstudio_image::{Image, ImageSize};

use crate::error::IoError;

/// Resolve the encoder for a file path from its extension.
fn output_format(file_path: &Path) -> Result<image::ImageFormat, IoError> {
    let ext = file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => Ok(image::ImageFormat::Png),
        Some("jpg") | Some("jpeg") => Ok(image::ImageFormat::Jpeg),
        Some("bmp") => Ok(image::ImageFormat::Bmp),
        _ => Err(IoError::InvalidFileExtension(file_path.to_path_buf())),
    }
}

/// Reads an image from the given file path as 8-bit RGB.
///
/// The method tries to read from any image format supported by the image crate;
/// grayscale, alpha and 16-bit images are converted to 8-bit RGB.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An image containing the image data in RGB order.
///
/// # Errors
///
/// Returns [`IoError::FileDoesNotExist`] for missing files and
/// [`IoError::ImageDecodeError`] for files that cannot be decoded.
pub fn read_image_any_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let file_path = file_path.as_ref();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let img = image::ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    let image = Image::new(size, img.into_rgb8().into_raw())?;

    log::debug!("read {} from {}", image.size(), file_path.display());

    Ok(image)
}

/// Writes an RGB image to the given file path.
///
/// The encoder is chosen from the extension: `png`, `jpg`/`jpeg` or `bmp`.
///
/// # Arguments
///
/// * `file_path` - The path where the image is written.
/// * `image` - The RGB image to encode.
///
/// # Errors
///
/// Returns [`IoError::InvalidFileExtension`] for unsupported extensions and
/// [`IoError::EmptyImage`] when the image has no pixels.
pub fn write_image_rgb8(file_path: impl AsRef<Path>, image: &Image<u8, 3>) -> Result<(), IoError> {
    let file_path = file_path.as_ref();
    let format = output_format(file_path)?;

    if image.is_empty() {
        return Err(IoError::EmptyImage);
    }

    image::save_buffer_with_format(
        file_path,
        image.as_slice(),
        image.width() as u32,
        image.height() as u32,
        image::ColorType::Rgb8,
        format,
    )?;

    log::debug!("wrote {} to {}", image.size(), file_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{output_format, read_image_any_rgb8, write_image_rgb8};
    use crate::error::IoError;
    use warpstudio_image::Image;

    #[test]
    fn output_format_from_extension() -> Result<(), IoError> {
        assert_eq!(output_format(Path::new("a.PNG"))?, image::ImageFormat::Png);
        assert_eq!(output_format(Path::new("a.jpeg"))?, image::ImageFormat::Jpeg);
        assert_eq!(output_format(Path::new("a.jpg"))?, image::ImageFormat::Jpeg);
        assert_eq!(output_format(Path::new("a.bmp"))?, image::ImageFormat::Bmp);
        assert!(matches!(
            output_format(Path::new("a.tiff")),
            Err(IoError::InvalidFileExtension(_))
        ));
        assert!(matches!(
            output_format(Path::new("noext")),
            Err(IoError::InvalidFileExtension(_))
        ));
        Ok(())
    }

    #[test]
    fn read_missing_file() {
        let res = read_image_any_rgb8("does/not/exist.png");
        assert!(matches!(res, Err(IoError::FileDoesNotExist(_))));
    }

    #[test]
    fn write_empty_image() -> Result<(), IoError> {
        let image = Image::<u8, 3>::new([0, 0].into(), vec![])?;
        let res = write_image_rgb8("empty.png", &image);
        assert!(matches!(res, Err(IoError::EmptyImage)));
        Ok(())
    }
}
