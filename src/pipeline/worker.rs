use std::{thread, time::Duration};

use crossbeam_channel::{Receiver, Sender, unbounded};

use super::{BreedPipeline, classifier::InferenceModel};
use crate::types::{CaptureOutcome, Photo};

struct CaptureRequest {
    generation: u64,
    photo: Photo,
}

#[derive(Clone, Debug)]
pub struct ClassifiedCapture {
    pub generation: u64,
    pub outcome: CaptureOutcome,
    /// Time from capture to finished classification.
    pub latency: Duration,
}

/// Handle to the background classification thread.
///
/// Every submission gets a new generation number; results carrying an older
/// generation are stale and dropped by [`ClassificationWorker::accept`].
#[derive(Debug)]
pub struct ClassificationWorker {
    request_tx: Option<Sender<CaptureRequest>>,
    generation: u64,
    pending: bool,
    handle: Option<thread::JoinHandle<()>>,
}

impl ClassificationWorker {
    pub fn submit(&mut self, photo: Photo) -> u64 {
        self.generation += 1;
        let request = CaptureRequest {
            generation: self.generation,
            photo,
        };
        match self.request_tx.as_ref().map(|tx| tx.send(request)) {
            Some(Ok(())) => self.pending = true,
            _ => {
                log::error!("classification worker is gone, dropping capture");
                self.pending = false;
            }
        }
        self.generation
    }

    /// Abandons whatever is in flight; its result will be discarded.
    pub fn cancel(&mut self) {
        if self.pending {
            log::info!("abandoning classification {}", self.generation);
        }
        self.generation += 1;
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Returns the outcome if it answers the latest submission.
    pub fn accept(&mut self, result: ClassifiedCapture) -> Option<CaptureOutcome> {
        if result.generation != self.generation || !self.pending {
            log::debug!(
                "discarding stale classification {} (current {})",
                result.generation,
                self.generation
            );
            return None;
        }
        self.pending = false;
        Some(result.outcome)
    }
}

impl Drop for ClassificationWorker {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop.
        self.request_tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Spawns the worker. `build` runs on the worker thread so model loading never
/// blocks the caller.
pub fn start_classification_worker<F, A, B>(
    build: F,
    result_tx: Sender<ClassifiedCapture>,
) -> ClassificationWorker
where
    F: FnOnce() -> anyhow::Result<BreedPipeline<A, B>> + Send + 'static,
    A: InferenceModel,
    B: InferenceModel,
{
    let (request_tx, request_rx) = unbounded();

    let handle = thread::spawn(move || {
        let mut pipeline = match build() {
            Ok(pipeline) => {
                log::info!("classification worker ready");
                Some(pipeline)
            }
            Err(err) => {
                log::error!("failed to prepare classification pipeline: {err:?}");
                None
            }
        };

        while let Some(request) = recv_latest_request(&request_rx) {
            let outcome = match pipeline.as_mut() {
                Some(pipeline) => pipeline.run(&request.photo),
                None => CaptureOutcome::NoBreed,
            };
            let latency = request.photo.captured_at.elapsed();
            log::debug!(
                "classification {} finished {latency:?} after capture",
                request.generation
            );
            let result = ClassifiedCapture {
                generation: request.generation,
                outcome,
                latency,
            };
            if result_tx.send(result).is_err() {
                break;
            }
        }
    });

    ClassificationWorker {
        request_tx: Some(request_tx),
        generation: 0,
        pending: false,
        handle: Some(handle),
    }
}

fn recv_latest_request(request_rx: &Receiver<CaptureRequest>) -> Option<CaptureRequest> {
    let mut request = request_rx.recv().ok()?;
    // Only the newest capture matters; older ones were superseded.
    while let Ok(newer) = request_rx.try_recv() {
        request = newer;
    }
    Some(request)
}
