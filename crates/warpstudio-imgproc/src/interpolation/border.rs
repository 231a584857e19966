use std::fmt;
use std::str::FromStr;

use warpstudio_image::{Image, ImageDtype};

/// A border type used when a sample falls outside the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BorderMode {
    /// This border type fills the border with a single, constant color value.
    ///
    /// Example: ...d c b a | v v v v...
    #[default]
    Constant,

    /// This border type takes the outermost row or column of pixels and repeats it.
    ///
    /// Example: ...d c b a | a a a a...
    Replicate,

    /// This border type mirrors the pixel values at the boundary, starting with the edge pixel itself.
    ///
    /// Example: ...d c b a | a b c d...
    Reflect,

    /// This border type wraps the content from the opposite side to fill the border.
    ///
    /// Example: ...d c b a | w x y z...
    Wrap,
}

impl BorderMode {
    #[inline]
    fn reflect(i: isize, len: usize) -> usize {
        if len == 1 {
            return 0;
        }
        let len = len as isize;
        // one period of the mirrored sequence is 2 * len long
        let period = 2 * len;
        let i = i.rem_euclid(period);
        if i < len {
            i as usize
        } else {
            (period - i - 1) as usize
        }
    }

    #[inline]
    fn wrap(i: isize, len: usize) -> usize {
        i.rem_euclid(len as isize) as usize
    }

    /// Maps index `i` to a valid index within `[0, len)` according to the border mode.
    ///
    /// - `Replicate`: clamp to edge
    /// - `Reflect`: mirror including edge
    /// - `Wrap`: circular wrap
    /// - `Constant`: `None` for any index outside the range
    ///
    /// Returns `None` when `len` is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use warpstudio_imgproc::interpolation::BorderMode;
    ///
    /// assert_eq!(BorderMode::Replicate.map_index(-3, 4), Some(0));
    /// assert_eq!(BorderMode::Reflect.map_index(-2, 4), Some(1));
    /// assert_eq!(BorderMode::Wrap.map_index(-1, 4), Some(3));
    /// assert_eq!(BorderMode::Constant.map_index(4, 4), None);
    /// ```
    #[inline]
    pub fn map_index(&self, i: isize, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        if i >= 0 && (i as usize) < len {
            return Some(i as usize);
        }
        match self {
            BorderMode::Constant => None,
            BorderMode::Replicate => Some(i.clamp(0, len as isize - 1) as usize),
            BorderMode::Reflect => Some(Self::reflect(i, len)),
            BorderMode::Wrap => Some(Self::wrap(i, len)),
        }
    }
}

impl fmt::Display for BorderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BorderMode::Constant => "constant",
            BorderMode::Replicate => "replicate",
            BorderMode::Reflect => "reflect",
            BorderMode::Wrap => "wrap",
        };
        f.write_str(name)
    }
}

impl FromStr for BorderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "constant" => Ok(BorderMode::Constant),
            "replicate" => Ok(BorderMode::Replicate),
            "reflect" => Ok(BorderMode::Reflect),
            "wrap" => Ok(BorderMode::Wrap),
            other => Err(format!("unknown border mode: {other}")),
        }
    }
}

/// Read the pixel at integer position `(x, y)`, extending the image with `border`.
///
/// Samples resolved by [`BorderMode::Constant`] take `border_value` on every channel.
#[inline]
pub(crate) fn fetch_pixel<T: ImageDtype, const C: usize>(
    image: &Image<T, C>,
    x: isize,
    y: isize,
    border: BorderMode,
    border_value: f32,
) -> [f32; C] {
    let (cols, rows) = (image.cols(), image.rows());
    match (border.map_index(x, cols), border.map_index(y, rows)) {
        (Some(ix), Some(iy)) => {
            let base = (iy * cols + ix) * C;
            let src = &image.as_slice()[base..base + C];
            let mut pixel = [0.0; C];
            for (p, s) in pixel.iter_mut().zip(src) {
                *p = (*s).into();
            }
            pixel
        }
        _ => [border_value; C],
    }
}
