use warpstudio_image::Image;

use crate::error::TransformError;
use crate::executor::{TransformExecutor, TransformHandle};
use crate::params::{SamplingOptions, TransformParams};
use crate::pipeline::TransformJob;

/// Caller-side state of an interactive editing session.
///
/// The session keeps the loaded original next to the latest result. Every
/// transform starts from the original, and a failed job leaves the previous
/// result in place.
///
/// # Example
///
/// ```
/// use warpstudio_image::Image;
/// use warpstudio_transform::{RotationParams, SamplingOptions, TransformParams, TransformSession};
///
/// let mut session = TransformSession::new();
/// session.load(Image::<u8, 3>::from_size_val([40, 30].into(), 90).unwrap()).unwrap();
///
/// let params = TransformParams::Rotation(RotationParams { angle: 15.0, ..Default::default() });
/// session.apply(params, SamplingOptions::default()).unwrap();
/// assert!(session.is_busy());
///
/// session.wait().unwrap().unwrap();
/// assert!(!session.is_busy());
/// assert_ne!(session.result(), session.original());
///
/// session.reset();
/// assert_eq!(session.result(), session.original());
/// ```
#[derive(Debug, Default)]
pub struct TransformSession {
    executor: TransformExecutor,
    original: Option<Image<u8, 3>>,
    result: Option<Image<u8, 3>>,
    pending: Option<TransformHandle>,
}

impl TransformSession {
    /// Create a session with no image loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// The image transforms start from.
    pub fn original(&self) -> Option<&Image<u8, 3>> {
        self.original.as_ref()
    }

    /// The latest successful result, or the original after a load or reset.
    pub fn result(&self) -> Option<&Image<u8, 3>> {
        self.result.as_ref()
    }

    /// Whether a submitted job has not been collected yet.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Replace the original image; the result starts as a copy of it.
    ///
    /// # Errors
    ///
    /// [`TransformError::InvalidImage`] for an empty image and
    /// [`TransformError::ExecutorBusy`] while a job is pending.
    pub fn load(&mut self, image: Image<u8, 3>) -> Result<(), TransformError> {
        if self.is_busy() {
            return Err(TransformError::ExecutorBusy);
        }
        if image.is_empty() {
            return Err(TransformError::InvalidImage {
                width: image.width(),
                height: image.height(),
            });
        }
        self.result = Some(image.clone());
        self.original = Some(image);
        Ok(())
    }

    /// Drop the current result in favor of a copy of the original.
    pub fn reset(&mut self) {
        self.result = self.original.clone();
    }

    /// Submit a transform of the original image.
    ///
    /// # Errors
    ///
    /// [`TransformError::InvalidImage`] when no image is loaded and
    /// [`TransformError::ExecutorBusy`] while a previous job is pending.
    pub fn apply(
        &mut self,
        params: TransformParams,
        options: SamplingOptions,
    ) -> Result<(), TransformError> {
        if self.is_busy() {
            return Err(TransformError::ExecutorBusy);
        }
        let original = self.original.as_ref().ok_or(TransformError::InvalidImage {
            width: 0,
            height: 0,
        })?;
        let job = TransformJob::new(original, params, options);
        self.pending = Some(self.executor.submit(job)?);
        Ok(())
    }

    /// Collect the pending job if it has finished.
    ///
    /// Returns `None` while the job runs or when nothing was submitted, and the
    /// job's status exactly once after it finishes.
    pub fn poll(&mut self) -> Option<Result<(), TransformError>> {
        let handle = self.pending.take()?;
        match handle.try_wait() {
            Ok(outcome) => Some(self.install(outcome)),
            Err(handle) => {
                self.pending = Some(handle);
                None
            }
        }
    }

    /// Block until the pending job finishes and collect it.
    ///
    /// Returns `None` when nothing was submitted.
    pub fn wait(&mut self) -> Option<Result<(), TransformError>> {
        let handle = self.pending.take()?;
        Some(self.install(handle.wait()))
    }

    fn install(
        &mut self,
        outcome: Result<Image<u8, 3>, TransformError>,
    ) -> Result<(), TransformError> {
        let image = outcome?;
        self.result = Some(image);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{AffineParams, TranslationParams};
    use std::thread;

    fn image(width: usize, height: usize) -> Result<Image<u8, 3>, TransformError> {
        let data = (0..width * height * 3).map(|i| (i % 251) as u8).collect();
        Ok(Image::new([width, height].into(), data)?)
    }

    #[test]
    fn apply_without_image() {
        let mut session = TransformSession::new();
        let params = TransformParams::Translation(TranslationParams::default());
        assert_eq!(
            session.apply(params, SamplingOptions::default()),
            Err(TransformError::InvalidImage {
                width: 0,
                height: 0
            })
        );
        assert!(session.poll().is_none());
        assert!(session.wait().is_none());
    }

    #[test]
    fn load_rejects_empty_image() -> Result<(), TransformError> {
        let mut session = TransformSession::new();
        let empty = Image::<u8, 3>::new([5, 0].into(), vec![])?;
        assert!(matches!(
            session.load(empty),
            Err(TransformError::InvalidImage { .. })
        ));
        assert!(session.original().is_none());
        Ok(())
    }

    #[test]
    fn poll_installs_result_once() -> Result<(), TransformError> {
        let mut session = TransformSession::new();
        session.load(image(12, 9)?)?;

        let params = TransformParams::Translation(TranslationParams { tx: 3, ty: 0 });
        session.apply(params, SamplingOptions::default())?;
        assert_eq!(
            session.apply(params, SamplingOptions::default()),
            Err(TransformError::ExecutorBusy)
        );
        assert_eq!(session.load(image(2, 2)?), Err(TransformError::ExecutorBusy));

        let status = loop {
            if let Some(status) = session.poll() {
                break status;
            }
            thread::yield_now();
        };
        status?;
        assert!(session.poll().is_none());

        let (original, result) = match (session.original(), session.result()) {
            (Some(original), Some(result)) => (original, result),
            _ => panic!("session lost its images"),
        };
        assert_eq!(result.pixel(3, 0)?, original.pixel(0, 0)?);
        Ok(())
    }

    #[test]
    fn failed_job_keeps_previous_result() -> Result<(), TransformError> {
        let mut session = TransformSession::new();
        session.load(image(200, 200)?)?;

        session.apply(
            TransformParams::Translation(TranslationParams { tx: 1, ty: 1 }),
            SamplingOptions::default(),
        )?;
        session.wait().transpose()?;
        let before = session.result().cloned();

        // control points collapse onto one line
        let degenerate = TransformParams::Affine(AffineParams {
            deltas: [(0.0, 0.0), (0.0, 100.0), (100.0, 0.0)],
        });
        session.apply(degenerate, SamplingOptions::default())?;
        assert!(matches!(
            session.wait(),
            Some(Err(TransformError::SingularTransform(_)))
        ));
        assert_eq!(session.result().cloned(), before);

        session.reset();
        assert_eq!(session.result(), session.original());
        Ok(())
    }
}
