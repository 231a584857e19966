use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use warpstudio_image::Image;

use crate::error::TransformError;
use crate::pipeline::TransformJob;

/// The single terminal outcome of a transform job.
pub type TransformOutcome = Result<Image<u8, 3>, TransformError>;

/// Runs transform jobs on a background worker, one at a time.
///
/// Each submission spawns a dedicated worker thread that runs the job to
/// completion and delivers exactly one [`TransformOutcome`]. There is no
/// queue and no cancellation: submitting while a job is in flight fails with
/// [`TransformError::ExecutorBusy`].
///
/// Clones share the in-flight state.
///
/// # Example
///
/// ```
/// use warpstudio_image::Image;
/// use warpstudio_transform::{
///     SamplingOptions, TransformExecutor, TransformJob, TransformParams, TranslationParams,
/// };
///
/// let image = Image::<u8, 3>::from_size_val([32, 32].into(), 7).unwrap();
/// let job = TransformJob::new(
///     &image,
///     TransformParams::Translation(TranslationParams { tx: 4, ty: 0 }),
///     SamplingOptions::default(),
/// );
///
/// let executor = TransformExecutor::new();
/// let handle = executor.submit(job).unwrap();
/// let result = handle.wait().unwrap();
///
/// assert_eq!(result.size(), image.size());
/// assert!(!executor.is_busy());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TransformExecutor {
    in_flight: Arc<AtomicBool>,
}

impl TransformExecutor {
    /// Create an idle executor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a job is currently running.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Submit a job and get a handle to its outcome.
    ///
    /// # Errors
    ///
    /// [`TransformError::ExecutorBusy`] when a job is already in flight, or
    /// [`TransformError::WorkerSpawn`] when the worker thread cannot start.
    pub fn submit(&self, job: TransformJob) -> Result<TransformHandle, TransformError> {
        let (tx, rx) = mpsc::sync_channel(1);
        let worker = self.spawn(job, move |outcome| {
            // the handle may have been dropped, the outcome is then discarded
            let _ = tx.send(outcome);
        })?;
        Ok(TransformHandle {
            receiver: rx,
            worker: Some(worker),
        })
    }

    /// Submit a job and have `callback` invoked with its outcome on the worker thread.
    ///
    /// The callback runs exactly once, after all resampling work is done.
    ///
    /// # Errors
    ///
    /// Same as [`TransformExecutor::submit`]; the callback is not invoked then.
    pub fn submit_with<F>(
        &self,
        job: TransformJob,
        callback: F,
    ) -> Result<JoinHandle<()>, TransformError>
    where
        F: FnOnce(TransformOutcome) + Send + 'static,
    {
        self.spawn(job, callback)
    }

    fn spawn<F>(&self, job: TransformJob, notify: F) -> Result<JoinHandle<()>, TransformError>
    where
        F: FnOnce(TransformOutcome) + Send + 'static,
    {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::warn!("rejected {} job: a job is already in flight", job.kind());
            return Err(TransformError::ExecutorBusy);
        }

        let kind = job.kind();
        let size = job.source().size();
        log::info!("submitting {kind} job over {}x{}", size.width, size.height);

        let in_flight = self.in_flight.clone();
        let spawned = thread::Builder::new()
            .name("warpstudio-transform".to_string())
            .spawn(move || {
                let start = Instant::now();
                let outcome = match panic::catch_unwind(AssertUnwindSafe(|| job.run())) {
                    Ok(outcome) => outcome,
                    Err(payload) => Err(TransformError::WorkerPanicked(panic_message(&*payload))),
                };

                match &outcome {
                    Ok(image) => log::info!(
                        "{kind} job finished in {:?}, output {}x{}",
                        start.elapsed(),
                        image.width(),
                        image.height()
                    ),
                    Err(err) => log::warn!("{kind} job failed: {err}"),
                }

                // idle again before the caller hears back, so it may resubmit at once
                in_flight.store(false, Ordering::Release);
                notify(outcome);
            });

        spawned.map_err(|err| {
            self.in_flight.store(false, Ordering::Release);
            TransformError::WorkerSpawn(err.to_string())
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// The receiving end of a submitted job.
///
/// Both [`TransformHandle::wait`] and a successful [`TransformHandle::try_wait`]
/// consume the handle, so the outcome is observed exactly once.
#[derive(Debug)]
pub struct TransformHandle {
    receiver: mpsc::Receiver<TransformOutcome>,
    worker: Option<JoinHandle<()>>,
}

impl TransformHandle {
    /// Block until the job finishes and return its outcome.
    pub fn wait(mut self) -> TransformOutcome {
        let outcome = self
            .receiver
            .recv()
            .unwrap_or(Err(TransformError::WorkerDisconnected));
        self.join();
        outcome
    }

    /// Return the outcome if the job has finished, or the handle back if not.
    pub fn try_wait(mut self) -> Result<TransformOutcome, Self> {
        match self.receiver.try_recv() {
            Ok(outcome) => {
                self.join();
                Ok(outcome)
            }
            Err(mpsc::TryRecvError::Empty) => Err(self),
            Err(mpsc::TryRecvError::Disconnected) => {
                self.join();
                Ok(Err(TransformError::WorkerDisconnected))
            }
        }
    }

    fn join(&mut self) {
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("transform worker panicked after reporting its outcome");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{SamplingOptions, TransformParams, TranslationParams};
    use std::sync::atomic::AtomicUsize;
    use warpstudio_image::ImageSize;

    fn job(width: usize, height: usize) -> Result<TransformJob, TransformError> {
        let image = Image::<u8, 3>::from_size_val([width, height].into(), 50)?;
        Ok(TransformJob::from_owned(
            image,
            TransformParams::Translation(TranslationParams { tx: 1, ty: 1 }),
            SamplingOptions::default(),
        ))
    }

    #[test]
    fn panic_messages() {
        assert_eq!(panic_message(&"boom"), "boom");
        assert_eq!(panic_message(&"boom".to_string()), "boom");
        assert_eq!(panic_message(&42u32), "unknown panic payload");
    }

    #[test]
    fn try_wait_hands_back_until_done() -> Result<(), TransformError> {
        let executor = TransformExecutor::new();
        let mut handle = executor.submit(job(16, 16)?)?;
        let outcome = loop {
            match handle.try_wait() {
                Ok(outcome) => break outcome,
                Err(pending) => {
                    handle = pending;
                    thread::yield_now();
                }
            }
        };
        assert_eq!(outcome?.size(), ImageSize::from([16, 16]));
        assert!(!executor.is_busy());
        Ok(())
    }

    #[test]
    fn callback_runs_once() -> Result<(), TransformError> {
        let executor = TransformExecutor::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = calls.clone();
        let worker = executor.submit_with(job(8, 8)?, move |outcome| {
            assert!(outcome.is_ok());
            counter.fetch_add(1, Ordering::SeqCst);
        })?;

        assert!(worker.join().is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!executor.is_busy());
        Ok(())
    }

    #[test]
    fn resubmit_after_completion() -> Result<(), TransformError> {
        let executor = TransformExecutor::new();
        for _ in 0..3 {
            let image = executor.submit(job(4, 4)?)?.wait()?;
            assert_eq!(image.width(), 4);
        }
        Ok(())
    }
}
