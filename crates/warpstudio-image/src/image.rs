use crate::error::ImageError;

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use warpstudio_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl ImageSize {
    /// Number of pixels covered by the size.
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Whether either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// Trait for image data types.
///
/// Send and Sync is required to resample rows in parallel.
pub trait ImageDtype: Copy + Default + Into<f32> + Send + Sync {
    /// Convert a f32 value to the image data type.
    fn from_f32(x: f32) -> Self;
}

impl ImageDtype for f32 {
    fn from_f32(x: f32) -> Self {
        x
    }
}

impl ImageDtype for u8 {
    fn from_f32(x: f32) -> Self {
        x.round().clamp(0.0, 255.0) as u8
    }
}

/// Represents an image with pixel data.
///
/// Pixels are stored row-major and interleaved with shape (H, W, C); the row
/// stride is `width * CHANNELS` elements.
#[derive(Clone, Debug, PartialEq)]
pub struct Image<T, const CHANNELS: usize> {
    size: ImageSize,
    data: Vec<T>,
}

impl<T, const CHANNELS: usize> Image<T, CHANNELS> {
    /// Create a new image from pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `data` - The pixel data of the image.
    ///
    /// # Errors
    ///
    /// If the length of the pixel data does not match the image size, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use warpstudio_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 3>::new(
    ///     ImageSize {
    ///         width: 10,
    ///         height: 20,
    ///     },
    ///     vec![0u8; 10 * 20 * 3],
    /// ).unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// assert_eq!(image.num_channels(), 3);
    /// ```
    pub fn new(size: ImageSize, data: Vec<T>) -> Result<Self, ImageError> {
        // check if the data length matches the image size
        if data.len() != size.area() * CHANNELS {
            return Err(ImageError::InvalidChannelShape(
                data.len(),
                size.area() * CHANNELS,
            ));
        }

        Ok(Self { size, data })
    }

    /// Create a new image with the given size and default pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `val` - The default value of the pixel data.
    ///
    /// # Examples
    ///
    /// ```
    /// use warpstudio_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 3>::from_size_val(
    ///     ImageSize {
    ///         width: 10,
    ///         height: 20,
    ///     },
    ///     0u8,
    /// ).unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// assert_eq!(image.num_channels(), 3);
    /// ```
    pub fn from_size_val(size: ImageSize, val: T) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        let data = vec![val; size.area() * CHANNELS];
        Image::new(size, data)
    }

    /// Create an image whose every pixel is `pixel`.
    pub fn from_size_pixel(size: ImageSize, pixel: [T; CHANNELS]) -> Result<Self, ImageError>
    where
        T: Copy,
    {
        let mut data = Vec::with_capacity(size.area() * CHANNELS);
        for _ in 0..size.area() {
            data.extend_from_slice(&pixel);
        }
        Image::new(size, data)
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the number of columns of the image.
    pub fn cols(&self) -> usize {
        self.size.width
    }

    /// Get the number of rows of the image.
    pub fn rows(&self) -> usize {
        self.size.height
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of channels in the image.
    pub fn num_channels(&self) -> usize {
        CHANNELS
    }

    /// Number of elements between the starts of two consecutive rows.
    pub fn row_stride(&self) -> usize {
        self.size.width * CHANNELS
    }

    /// Whether the image has no pixels.
    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    /// Get the pixel data as a flat slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get the pixel data as a flat mutable slice.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Get a single element at `[row, col, channel]`.
    ///
    /// Returns `None` when the index is out of bounds.
    pub fn get(&self, index: [usize; 3]) -> Option<&T> {
        let [y, x, c] = index;
        if y >= self.rows() || x >= self.cols() || c >= CHANNELS {
            return None;
        }
        self.data.get((y * self.cols() + x) * CHANNELS + c)
    }

    /// Get all the channels of the pixel at column `x` and row `y`.
    ///
    /// # Errors
    ///
    /// If the coordinates are outside the image, an error is returned.
    pub fn pixel(&self, x: usize, y: usize) -> Result<&[T], ImageError> {
        if x >= self.cols() || y >= self.rows() {
            return Err(ImageError::PixelIndexOutOfBounds(
                x,
                y,
                self.cols(),
                self.rows(),
            ));
        }
        let base = (y * self.cols() + x) * CHANNELS;
        Ok(&self.data[base..base + CHANNELS])
    }

    /// Cast the pixel data of the image to a different type.
    ///
    /// Values are converted through `f32`; converting to `u8` rounds and saturates.
    ///
    /// # Examples
    ///
    /// ```
    /// use warpstudio_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 1>::new(ImageSize { width: 2, height: 1 }, vec![0, 255]).unwrap();
    /// let image_f32: Image<f32, 1> = image.cast();
    ///
    /// assert_eq!(image_f32.as_slice(), &[0.0, 255.0]);
    /// ```
    pub fn cast<U>(&self) -> Image<U, CHANNELS>
    where
        T: ImageDtype,
        U: ImageDtype,
    {
        let data = self.data.iter().map(|&x| U::from_f32(x.into())).collect();
        Image {
            size: self.size,
            data,
        }
    }
}
