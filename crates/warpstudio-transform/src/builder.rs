use warpstudio_image::ImageSize;
use warpstudio_imgproc::warp::{
    get_affine_transform, get_perspective_transform, get_rotation_matrix2d,
};

use crate::error::TransformError;
use crate::params::{
    source_corners, AffineParams, PerspectiveParams, RotationCenter, RotationParams,
    ScalingParams, SimilarityParams, TransformParams, TranslationParams,
};

// sine of the smallest angle three control points may span
const COLLINEAR_TOLERANCE: f64 = 1e-6;

/// Distance of the affine control points from the image border.
const AFFINE_MARGIN: f64 = 50.0;

/// A coordinate map from source to destination pixels, row-major.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformMatrix {
    /// A 2x3 affine matrix.
    Affine([f64; 6]),
    /// A 3x3 homography.
    Perspective([f64; 9]),
}

/// The output of the matrix builder: the map and the canvas it renders into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformPlan {
    /// The source to destination map.
    pub matrix: TransformMatrix,
    /// Size of the destination image.
    pub dst_size: ImageSize,
}

/// Compute the coordinate map of `params` for a source image of `size`.
///
/// The builder is pure: it never touches pixel data. The destination canvas
/// equals `size` for every kind but scaling.
///
/// # Errors
///
/// * [`TransformError::InvalidImage`] when `size` has a zero dimension.
/// * [`TransformError::SingularTransform`] when the geometry is degenerate,
///   e.g. collinear control points or a zero scale.
///
/// # Example
///
/// ```
/// use warpstudio_image::ImageSize;
/// use warpstudio_transform::{build_transform, TransformMatrix, TransformParams, TranslationParams};
///
/// let size = ImageSize { width: 64, height: 48 };
/// let params = TransformParams::Translation(TranslationParams { tx: 5, ty: -3 });
/// let plan = build_transform(&params, size).unwrap();
///
/// assert_eq!(plan.dst_size, size);
/// assert_eq!(plan.matrix, TransformMatrix::Affine([1.0, 0.0, 5.0, 0.0, 1.0, -3.0]));
/// ```
pub fn build_transform(
    params: &TransformParams,
    size: ImageSize,
) -> Result<TransformPlan, TransformError> {
    if size.is_empty() {
        return Err(TransformError::InvalidImage {
            width: size.width,
            height: size.height,
        });
    }

    let plan = match params {
        TransformParams::Translation(p) => same_canvas(translation_matrix(p), size)?,
        TransformParams::Rotation(p) => same_canvas(rotation_matrix(p, size), size)?,
        TransformParams::Scaling(p) => scaling_plan(p, size)?,
        TransformParams::Similarity(p) => same_canvas(similarity_matrix(p, size), size)?,
        TransformParams::Affine(p) => same_canvas(affine_matrix(p, size)?, size)?,
        TransformParams::Perspective(p) => TransformPlan {
            matrix: TransformMatrix::Perspective(perspective_matrix(p, size)?),
            dst_size: size,
        },
    };

    log::debug!(
        "built {} plan {:?} for {}x{} -> {}x{}",
        params.kind(),
        plan.matrix,
        size.width,
        size.height,
        plan.dst_size.width,
        plan.dst_size.height
    );

    Ok(plan)
}

fn same_canvas(m: [f64; 6], size: ImageSize) -> Result<TransformPlan, TransformError> {
    check_invertible(&m)?;
    Ok(TransformPlan {
        matrix: TransformMatrix::Affine(m),
        dst_size: size,
    })
}

fn check_invertible(m: &[f64; 6]) -> Result<(), TransformError> {
    let det = m[0] * m[4] - m[1] * m[3];
    if det.abs() < f64::EPSILON || !det.is_finite() {
        return Err(TransformError::SingularTransform(format!(
            "affine matrix has determinant {det}"
        )));
    }
    Ok(())
}

fn translation_matrix(p: &TranslationParams) -> [f64; 6] {
    [1.0, 0.0, p.tx as f64, 0.0, 1.0, p.ty as f64]
}

/// Integer midpoint of the image.
fn image_center(size: ImageSize) -> (f64, f64) {
    ((size.width / 2) as f64, (size.height / 2) as f64)
}

fn rotation_matrix(p: &RotationParams, size: ImageSize) -> [f64; 6] {
    let center = match p.center {
        RotationCenter::Auto => image_center(size),
        RotationCenter::Manual { x, y } => {
            let (w, h) = (size.width as f64, size.height as f64);
            let clamped = (x.clamp(0.0, w), y.clamp(0.0, h));
            if clamped != (x, y) {
                log::warn!("rotation center ({x}, {y}) clamped to {clamped:?}");
            }
            clamped
        }
    };
    get_rotation_matrix2d(center, p.angle, 1.0)
}

fn scaling_plan(p: &ScalingParams, size: ImageSize) -> Result<TransformPlan, TransformError> {
    let (sx, sy) = p.factors();
    if !(sx > 0.0 && sy > 0.0 && sx.is_finite() && sy.is_finite()) {
        return Err(TransformError::SingularTransform(format!(
            "scale factors must be positive, got ({sx}, {sy})"
        )));
    }

    let dst_size = ImageSize {
        width: scaled_len(size.width, sx),
        height: scaled_len(size.height, sy),
    };

    // the exact ratio of the rounded canvas, with pixel centers aligned
    let fx = dst_size.width as f64 / size.width as f64;
    let fy = dst_size.height as f64 / size.height as f64;
    let m = [fx, 0.0, 0.5 * fx - 0.5, 0.0, fy, 0.5 * fy - 0.5];

    Ok(TransformPlan {
        matrix: TransformMatrix::Affine(m),
        dst_size,
    })
}

fn scaled_len(len: usize, factor: f64) -> usize {
    ((len as f64 * factor).round() as usize).max(1)
}

fn similarity_matrix(p: &SimilarityParams, size: ImageSize) -> [f64; 6] {
    let mut m = get_rotation_matrix2d(image_center(size), p.angle, p.scale / 100.0);
    m[2] += p.tx as f64;
    m[5] += p.ty as f64;
    m
}

fn affine_matrix(p: &AffineParams, size: ImageSize) -> Result<[f64; 6], TransformError> {
    let (w, h) = (size.width as f64, size.height as f64);
    let src = [
        (AFFINE_MARGIN, AFFINE_MARGIN),
        (w - AFFINE_MARGIN, AFFINE_MARGIN),
        (AFFINE_MARGIN, h - AFFINE_MARGIN),
    ];
    let dst = [0, 1, 2].map(|i| (src[i].0 + p.deltas[i].0, src[i].1 + p.deltas[i].1));

    if are_collinear(src[0], src[1], src[2]) {
        return Err(TransformError::SingularTransform(format!(
            "affine control points {src:?} are collinear for a {w}x{h} image"
        )));
    }
    if are_collinear(dst[0], dst[1], dst[2]) {
        return Err(TransformError::SingularTransform(format!(
            "displaced control points {dst:?} are collinear"
        )));
    }

    Ok(get_affine_transform(&src, &dst)?)
}

fn perspective_matrix(p: &PerspectiveParams, size: ImageSize) -> Result<[f64; 9], TransformError> {
    let d = &p.dst;
    for (i, j, k) in [(0, 1, 2), (0, 1, 3), (0, 2, 3), (1, 2, 3)] {
        if are_collinear(d[i], d[j], d[k]) {
            return Err(TransformError::SingularTransform(format!(
                "destination corners {i}, {j} and {k} are collinear"
            )));
        }
    }
    Ok(get_perspective_transform(&source_corners(size), d)?)
}

/// Whether three points are (nearly) on one line; coincident points count.
fn are_collinear(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> bool {
    let (abx, aby) = (b.0 - a.0, b.1 - a.1);
    let (acx, acy) = (c.0 - a.0, c.1 - a.1);
    let norm = abx.hypot(aby) * acx.hypot(acy);
    if norm < f64::EPSILON || !norm.is_finite() {
        return true;
    }
    let cross = abx * acy - aby * acx;
    (cross / norm).abs() < COLLINEAR_TOLERANCE
}
