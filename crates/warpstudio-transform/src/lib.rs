#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// builder of the coordinate maps for each transform kind.
pub mod builder;

/// error types for the transform pipeline.
pub mod error;

/// asynchronous one-job-at-a-time execution.
pub mod executor;

/// transform kinds, parameters and sampling options.
pub mod params;

/// synchronous transform pipeline and job snapshots.
pub mod pipeline;

/// caller-side editing session state.
pub mod session;

pub use crate::builder::{build_transform, TransformMatrix, TransformPlan};
pub use crate::error::TransformError;
pub use crate::executor::{TransformExecutor, TransformHandle, TransformOutcome};
pub use crate::params::{
    AffineParams, PerspectiveParams, RotationCenter, RotationParams, SamplingOptions,
    ScalingParams, SimilarityParams, TransformKind, TransformParams, TranslationParams,
};
pub use crate::pipeline::{apply_transform, TransformJob};
pub use crate::session::TransformSession;
