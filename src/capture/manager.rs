//! Bridges the synchronous overlay event loop with the async pipeline.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};

use super::pipeline::{CaptureDependencies, CaptureRequest, perform_capture};
use super::types::{CaptureError, CaptureStatus};

/// User-presentable status text for any pipeline failure. The actual cause
/// is logged, never shown.
pub(crate) const FAILURE_STATUS: &str = "screenshot capture failed";

/// Shared handle for submitting capture requests and observing progress.
///
/// Requests queue onto a background task owned by the caller's Tokio
/// runtime; the overlay side never blocks on acquisition.
#[derive(Clone)]
pub struct CaptureManager {
    request_tx: mpsc::UnboundedSender<CaptureRequest>,
    status: Arc<Mutex<CaptureStatus>>,
}

impl CaptureManager {
    /// Creates the manager and spawns its processing task.
    pub fn new(runtime_handle: &tokio::runtime::Handle, dependencies: CaptureDependencies) -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<CaptureRequest>();
        let status = Arc::new(Mutex::new(CaptureStatus::Idle));

        let status_clone = status.clone();
        let dependencies = Arc::new(dependencies);

        runtime_handle.spawn(async move {
            while let Some(request) = request_rx.recv().await {
                log::debug!("processing capture request: {:?}", request);
                *status_clone.lock().await = CaptureStatus::InProgress;

                match perform_capture(request, dependencies.clone()).await {
                    Ok(()) => {
                        *status_clone.lock().await = CaptureStatus::Success;
                    }
                    Err(err) => {
                        // Cause stays in the log; the status text is generic.
                        log::error!("{FAILURE_STATUS}: {err}");
                        *status_clone.lock().await =
                            CaptureStatus::Failed(FAILURE_STATUS.to_string());
                    }
                }
            }
        });

        Self { request_tx, status }
    }

    /// Queues a finalized selection for processing. Non-blocking.
    pub(crate) fn submit(&self, request: CaptureRequest) -> Result<(), CaptureError> {
        self.request_tx
            .send(request)
            .map_err(|_| CaptureError::ManagerStopped)?;

        // Mark busy immediately so a gesture starting right after pointer-up
        // is rejected even before the background task picks the request up.
        if let Ok(mut status) = self.status.try_lock() {
            *status = CaptureStatus::InProgress;
        }
        Ok(())
    }

    /// Whether a capture is queued or in flight.
    pub fn is_busy(&self) -> bool {
        match self.status.try_lock() {
            Ok(status) => *status == CaptureStatus::InProgress,
            // The background task holds the lock only around transitions.
            Err(_) => true,
        }
    }

    /// Current pipeline status.
    pub async fn status(&self) -> CaptureStatus {
        self.status.lock().await.clone()
    }
}

#[cfg(test)]
impl CaptureManager {
    pub(crate) fn with_closed_channel_for_test() -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<CaptureRequest>();
        drop(rx);
        Self {
            request_tx: tx,
            status: Arc::new(Mutex::new(CaptureStatus::Idle)),
        }
    }
}
