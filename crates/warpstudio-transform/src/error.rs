use warpstudio_image::ImageError;

/// An error type for the transform pipeline.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum TransformError {
    /// The source image is missing or has a zero dimension.
    #[error("Invalid source image of size {width}x{height}")]
    InvalidImage {
        /// The width of the rejected image.
        width: usize,
        /// The height of the rejected image.
        height: usize,
    },

    /// The input geometry does not define an invertible transform.
    #[error("Singular transform: {0}")]
    SingularTransform(String),

    /// A job was submitted while another one is still in flight.
    #[error("A transform job is already in flight")]
    ExecutorBusy,

    /// The operating system refused to start the worker thread.
    #[error("Failed to spawn the transform worker: {0}")]
    WorkerSpawn(String),

    /// The worker panicked while resampling.
    #[error("Transform worker panicked: {0}")]
    WorkerPanicked(String),

    /// The worker went away without reporting an outcome.
    #[error("Transform worker exited without reporting an outcome")]
    WorkerDisconnected,

    /// Error raised by the image container.
    #[error(transparent)]
    Image(ImageError),
}

impl From<ImageError> for TransformError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::CannotComputeDeterminant => {
                TransformError::SingularTransform("matrix is not invertible".to_string())
            }
            other => TransformError::Image(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TransformError;
    use warpstudio_image::ImageError;

    #[test]
    fn determinant_failure_is_singular() {
        let err: TransformError = ImageError::CannotComputeDeterminant.into();
        assert!(matches!(err, TransformError::SingularTransform(_)));

        let err: TransformError = ImageError::InvalidChannelShape(3, 4).into();
        assert_eq!(
            err,
            TransformError::Image(ImageError::InvalidChannelShape(3, 4))
        );
    }
}
