use std::time::Instant;

use warpstudio_image::Image;
use warpstudio_imgproc::interpolation::{BorderMode, InterpolationMode};
use warpstudio_imgproc::resize::resize_nearest;
use warpstudio_imgproc::warp::{warp_affine, warp_perspective};

use crate::builder::{build_transform, TransformMatrix};
use crate::error::TransformError;
use crate::params::{SamplingOptions, TransformKind, TransformParams};

/// Build the matrix of `params` and resample `src` through it.
///
/// This is the synchronous core of a transform job; the executor runs it on
/// a worker thread. Scaling always samples with [`BorderMode::Replicate`],
/// the other kinds honor `options.border`. Nearest neighbor scaling reads
/// source pixel `floor(x / scale)`, so a 50% downscale keeps the even pixels.
///
/// # Errors
///
/// * [`TransformError::InvalidImage`] when `src` has a zero dimension, before any matrix work.
/// * [`TransformError::SingularTransform`] when the geometry is degenerate.
///
/// # Example
///
/// ```
/// use warpstudio_image::Image;
/// use warpstudio_transform::{apply_transform, SamplingOptions, ScalingParams, TransformParams};
///
/// let src = Image::<u8, 3>::from_size_pixel([200, 200].into(), [255, 0, 0]).unwrap();
/// let params = TransformParams::Scaling(ScalingParams {
///     sx: 50.0,
///     sy: 50.0,
///     keep_aspect: true,
/// });
///
/// let dst = apply_transform(&src, &params, &SamplingOptions::default()).unwrap();
/// assert_eq!((dst.width(), dst.height()), (100, 100));
/// ```
pub fn apply_transform<const C: usize>(
    src: &Image<u8, C>,
    params: &TransformParams,
    options: &SamplingOptions,
) -> Result<Image<u8, C>, TransformError> {
    if src.is_empty() {
        return Err(TransformError::InvalidImage {
            width: src.width(),
            height: src.height(),
        });
    }

    let plan = build_transform(params, src.size())?;

    let border = match params.kind() {
        TransformKind::Scaling => BorderMode::Replicate,
        _ => options.border,
    };
    let border_value = options.border_value as f32;

    let mut dst = Image::from_size_val(plan.dst_size, 0u8)?;

    let nearest_scaling = params.kind() == TransformKind::Scaling
        && options.interpolation == InterpolationMode::Nearest;

    match plan.matrix {
        TransformMatrix::Affine(_) if nearest_scaling => resize_nearest(src, &mut dst)?,
        TransformMatrix::Affine(m) => warp_affine(
            src,
            &mut dst,
            &m,
            options.interpolation,
            border,
            border_value,
        )?,
        TransformMatrix::Perspective(m) => warp_perspective(
            src,
            &mut dst,
            &m,
            options.interpolation,
            border,
            border_value,
        )?,
    }

    Ok(dst)
}

/// A one-shot snapshot of everything a transform needs.
///
/// The job owns a private copy of the source pixels, so the caller's image
/// stays untouched while the job runs. Running consumes the job.
#[derive(Debug)]
pub struct TransformJob {
    source: Image<u8, 3>,
    params: TransformParams,
    options: SamplingOptions,
}

impl TransformJob {
    /// Create a job from a copy of `source`.
    pub fn new(source: &Image<u8, 3>, params: TransformParams, options: SamplingOptions) -> Self {
        Self::from_owned(source.clone(), params, options)
    }

    /// Create a job that takes ownership of `source`.
    pub fn from_owned(
        source: Image<u8, 3>,
        params: TransformParams,
        options: SamplingOptions,
    ) -> Self {
        Self {
            source,
            params,
            options,
        }
    }

    /// The kind of transform the job performs.
    pub fn kind(&self) -> TransformKind {
        self.params.kind()
    }

    /// The source image snapshot.
    pub fn source(&self) -> &Image<u8, 3> {
        &self.source
    }

    /// The transform parameters.
    pub fn params(&self) -> &TransformParams {
        &self.params
    }

    /// The sampling options.
    pub fn options(&self) -> &SamplingOptions {
        &self.options
    }

    /// Run the job to completion on the calling thread.
    pub fn run(self) -> Result<Image<u8, 3>, TransformError> {
        let start = Instant::now();
        let outcome = apply_transform(&self.source, &self.params, &self.options);
        log::debug!(
            "{} job over {}x{} ran in {:?}",
            self.kind(),
            self.source.width(),
            self.source.height(),
            start.elapsed()
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{PerspectiveParams, ScalingParams, TranslationParams};
    use warpstudio_image::ImageSize;

    fn numbered(width: usize, height: usize) -> Result<Image<u8, 3>, TransformError> {
        let data = (0..width * height)
            .flat_map(|i| [i as u8, (i * 3) as u8, 255 - i as u8])
            .collect();
        Ok(Image::new([width, height].into(), data)?)
    }

    #[test]
    fn empty_source_is_rejected() -> Result<(), TransformError> {
        let src = Image::<u8, 3>::new([0, 4].into(), vec![])?;
        let params = TransformParams::Translation(TranslationParams::default());
        assert_eq!(
            apply_transform(&src, &params, &SamplingOptions::default()),
            Err(TransformError::InvalidImage {
                width: 0,
                height: 4
            })
        );
        Ok(())
    }

    #[test]
    fn translation_shifts_pixels() -> Result<(), TransformError> {
        let src = numbered(5, 4)?;
        let params = TransformParams::Translation(TranslationParams { tx: 2, ty: 1 });
        let options = SamplingOptions {
            interpolation: InterpolationMode::Nearest,
            border: BorderMode::Constant,
            border_value: 200,
        };
        let dst = apply_transform(&src, &params, &options)?;

        assert_eq!(dst.pixel(2, 1)?, src.pixel(0, 0)?);
        assert_eq!(dst.pixel(4, 3)?, src.pixel(2, 2)?);
        assert_eq!(dst.pixel(1, 3)?, &[200, 200, 200]);
        assert_eq!(dst.pixel(3, 0)?, &[200, 200, 200]);
        Ok(())
    }

    #[test]
    fn scaling_ignores_border_setting() -> Result<(), TransformError> {
        let src = Image::<u8, 3>::from_size_pixel([10, 10].into(), [40, 80, 120])?;
        let params = TransformParams::Scaling(ScalingParams {
            sx: 250.0,
            sy: 250.0,
            keep_aspect: false,
        });
        let options = SamplingOptions {
            interpolation: InterpolationMode::Bicubic,
            border: BorderMode::Constant,
            border_value: 0,
        };
        let dst = apply_transform(&src, &params, &options)?;

        assert_eq!(dst.size(), ImageSize::from([25, 25]));
        // the edges would darken if taps outside the source read the fill value
        assert!(dst.as_slice().chunks_exact(3).all(|px| px == [40, 80, 120]));
        Ok(())
    }

    #[test]
    fn nearest_half_scaling_keeps_even_pixels() -> Result<(), TransformError> {
        let src = numbered(8, 6)?;
        let params = TransformParams::Scaling(ScalingParams {
            sx: 50.0,
            sy: 50.0,
            keep_aspect: false,
        });
        let options = SamplingOptions {
            interpolation: InterpolationMode::Nearest,
            ..Default::default()
        };
        let dst = apply_transform(&src, &params, &options)?;

        assert_eq!(dst.size(), ImageSize::from([4, 3]));
        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(dst.pixel(x, y)?, src.pixel(2 * x, 2 * y)?, "pixel ({x}, {y})");
            }
        }
        Ok(())
    }

    #[test]
    fn job_runs_on_private_copy() -> Result<(), TransformError> {
        let src = numbered(6, 6)?;
        let job = TransformJob::new(
            &src,
            TransformParams::Perspective(PerspectiveParams::identity(src.size())),
            SamplingOptions::default(),
        );
        assert_eq!(job.kind(), TransformKind::Perspective);
        assert_eq!(job.source(), &src);

        let dst = job.run()?;
        assert_eq!(dst, src);
        Ok(())
    }
}
