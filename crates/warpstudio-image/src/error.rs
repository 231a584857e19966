/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the data length does not match the image size.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when two images that must agree in size do not.
    #[error("Invalid image size ({0}x{1}), expected ({2}x{3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when a pixel index is outside the image.
    #[error("Pixel index ({0}, {1}) out of bounds ({2}x{3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when a transformation matrix cannot be inverted or solved.
    #[error("Cannot compute the determinant of a singular matrix")]
    CannotComputeDeterminant,
}
