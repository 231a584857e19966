use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use warpstudio_image::ImageSize;
use warpstudio_imgproc::interpolation::{BorderMode, InterpolationMode};

/// The six planar transform families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformKind {
    /// Pure shift by whole pixels.
    Translation,
    /// Rotation about a center point.
    Rotation,
    /// Independent horizontal and vertical scaling; the only kind that resizes the canvas.
    Scaling,
    /// Rotation, uniform scale and translation.
    Similarity,
    /// General affine map from three control points.
    Affine,
    /// Projective map from four corner correspondences.
    Perspective,
}

impl TransformKind {
    /// Every kind, in the order the tabs of a front-end present them.
    pub const ALL: [TransformKind; 6] = [
        TransformKind::Translation,
        TransformKind::Rotation,
        TransformKind::Scaling,
        TransformKind::Similarity,
        TransformKind::Affine,
        TransformKind::Perspective,
    ];

    /// Map a tab position to its kind.
    ///
    /// # Example
    ///
    /// ```
    /// use warpstudio_transform::TransformKind;
    ///
    /// assert_eq!(TransformKind::from_index(2), Some(TransformKind::Scaling));
    /// assert_eq!(TransformKind::from_index(6), None);
    /// ```
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Whether the kind produces a 3x3 homography instead of a 2x3 affine matrix.
    pub fn is_projective(&self) -> bool {
        matches!(self, TransformKind::Perspective)
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransformKind::Translation => "translation",
            TransformKind::Rotation => "rotation",
            TransformKind::Scaling => "scaling",
            TransformKind::Similarity => "similarity",
            TransformKind::Affine => "affine",
            TransformKind::Perspective => "perspective",
        };
        f.write_str(name)
    }
}

impl FromStr for TransformKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown transform kind: {s}"))
    }
}

/// Shift in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationParams {
    /// Horizontal shift, positive to the right.
    pub tx: i32,
    /// Vertical shift, positive downwards.
    pub ty: i32,
}

/// Where a rotation pivots.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationCenter {
    /// The integer midpoint of the image.
    #[default]
    Auto,
    /// A caller supplied point, clamped to the image bounds.
    Manual {
        /// Horizontal coordinate of the pivot.
        x: f64,
        /// Vertical coordinate of the pivot.
        y: f64,
    },
}

/// Rotation about a center without scale change.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationParams {
    /// Angle in degrees, positive is counter-clockwise.
    pub angle: f64,
    /// Pivot of the rotation.
    pub center: RotationCenter,
}

/// Canvas resize by percentages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalingParams {
    /// Horizontal scale in percent.
    pub sx: f64,
    /// Vertical scale in percent, ignored when `keep_aspect` is set.
    pub sy: f64,
    /// Force the vertical scale to follow the horizontal one.
    pub keep_aspect: bool,
}

impl Default for ScalingParams {
    fn default() -> Self {
        Self {
            sx: 100.0,
            sy: 100.0,
            keep_aspect: false,
        }
    }
}

impl ScalingParams {
    /// The effective `(sx, sy)` factors as ratios, with the aspect lock applied.
    pub fn factors(&self) -> (f64, f64) {
        let sx = self.sx / 100.0;
        let sy = if self.keep_aspect { sx } else { self.sy / 100.0 };
        (sx, sy)
    }
}

/// Rotation about the image center, uniform scale, then translation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityParams {
    /// Angle in degrees, positive is counter-clockwise.
    pub angle: f64,
    /// Uniform scale in percent.
    pub scale: f64,
    /// Horizontal shift applied after rotation and scaling.
    pub tx: i32,
    /// Vertical shift applied after rotation and scaling.
    pub ty: i32,
}

impl Default for SimilarityParams {
    fn default() -> Self {
        Self {
            angle: 0.0,
            scale: 100.0,
            tx: 0,
            ty: 0,
        }
    }
}

/// Displacements of the three affine control points.
///
/// The control points are `(50, 50)`, `(w - 50, 50)` and `(50, h - 50)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AffineParams {
    /// `(dx, dy)` added to each control point, in order.
    pub deltas: [(f64, f64); 3],
}

/// Destinations of the four image corners.
///
/// Corners are ordered top-left, top-right, bottom-left, bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerspectiveParams {
    /// Where each corner lands in the output.
    pub dst: [(f64, f64); 4],
}

impl PerspectiveParams {
    /// The corners of an image of `size`, which makes the identity homography.
    pub fn identity(size: ImageSize) -> Self {
        Self {
            dst: source_corners(size),
        }
    }
}

/// Corners of the source image, in the order of [`PerspectiveParams::dst`].
pub(crate) fn source_corners(size: ImageSize) -> [(f64, f64); 4] {
    let (w, h) = (size.width as f64, size.height as f64);
    [(0.0, 0.0), (w, 0.0), (0.0, h), (w, h)]
}

/// A parameter set, always paired with exactly one [`TransformKind`].
///
/// Serialized with an inline `kind` tag:
///
/// ```
/// use warpstudio_transform::{TransformParams, TranslationParams};
///
/// let params: TransformParams =
///     serde_json::from_str(r#"{ "kind": "translation", "tx": 4, "ty": -2 }"#).unwrap();
/// assert_eq!(
///     params,
///     TransformParams::Translation(TranslationParams { tx: 4, ty: -2 })
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TransformParams {
    /// See [`TranslationParams`].
    Translation(TranslationParams),
    /// See [`RotationParams`].
    Rotation(RotationParams),
    /// See [`ScalingParams`].
    Scaling(ScalingParams),
    /// See [`SimilarityParams`].
    Similarity(SimilarityParams),
    /// See [`AffineParams`].
    Affine(AffineParams),
    /// See [`PerspectiveParams`].
    Perspective(PerspectiveParams),
}

impl TransformParams {
    /// The kind this parameter set belongs to.
    pub fn kind(&self) -> TransformKind {
        match self {
            TransformParams::Translation(_) => TransformKind::Translation,
            TransformParams::Rotation(_) => TransformKind::Rotation,
            TransformParams::Scaling(_) => TransformKind::Scaling,
            TransformParams::Similarity(_) => TransformKind::Similarity,
            TransformParams::Affine(_) => TransformKind::Affine,
            TransformParams::Perspective(_) => TransformKind::Perspective,
        }
    }

    /// The neutral parameter set of `kind` for an image of `size`.
    pub fn identity(kind: TransformKind, size: ImageSize) -> Self {
        match kind {
            TransformKind::Translation => TransformParams::Translation(Default::default()),
            TransformKind::Rotation => TransformParams::Rotation(Default::default()),
            TransformKind::Scaling => TransformParams::Scaling(Default::default()),
            TransformKind::Similarity => TransformParams::Similarity(Default::default()),
            TransformKind::Affine => TransformParams::Affine(Default::default()),
            TransformKind::Perspective => {
                TransformParams::Perspective(PerspectiveParams::identity(size))
            }
        }
    }
}

/// How the resampler reads the source, shared by every kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingOptions {
    /// Interpolation kernel.
    pub interpolation: InterpolationMode,
    /// Border-extension policy for taps outside the source.
    pub border: BorderMode,
    /// Fill value on every channel, only read with [`BorderMode::Constant`].
    pub border_value: u8,
}
