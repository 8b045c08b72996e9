use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::{Duration, Instant},
};

use crossbeam_channel::{Sender, TrySendError};

use super::{clock::AnimationClockController, engine::ViewerEngine};

/// Receives the displayed timeline position.
pub trait ProgressSink: Send + 'static {
    /// Returns `false` once nobody is listening anymore.
    fn publish(&self, progress: u64) -> bool;
}

impl ProgressSink for Sender<u64> {
    fn publish(&self, progress: u64) -> bool {
        match self.try_send(progress) {
            Ok(()) | Err(TrySendError::Full(_)) => true,
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    SkippedScrubbing,
    AwaitingDuration,
    Published(u64),
    /// The renderer could not answer; nothing was published.
    Failed,
    SinkClosed,
}

/// One synchronization step. Never publishes while the user is scrubbing.
pub fn tick<E: ViewerEngine>(
    clock: &mut AnimationClockController<E>,
    sink: &dyn ProgressSink,
) -> TickOutcome {
    if clock.is_user_scrubbing() {
        return TickOutcome::SkippedScrubbing;
    }

    if clock.duration_seconds().is_none() {
        if let Err(err) = clock.discover_duration() {
            if !err.is_transient() {
                log::trace!("duration query failed: {err}");
            }
            return TickOutcome::AwaitingDuration;
        }
    }

    match clock.poll_progress() {
        Ok(progress) if sink.publish(progress) => TickOutcome::Published(progress),
        Ok(_) => TickOutcome::SinkClosed,
        Err(err) => {
            log::trace!("progress query failed: {err}");
            TickOutcome::Failed
        }
    }
}

/// Lifetime of the background synchronizer. Dropping it stops the loop.
#[derive(Debug)]
pub struct SyncHandle {
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl SyncHandle {
    pub fn stop(mut self) {
        self.shutdown();
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Starts ticking `clock` every `interval` on its own thread.
///
/// Each tick holds the controller lock for its whole duration, so a scrub
/// started on another thread is always seen by the next tick.
pub fn start_synchronizer<E, S>(
    clock: Arc<Mutex<AnimationClockController<E>>>,
    sink: S,
    interval: Duration,
) -> SyncHandle
where
    E: ViewerEngine,
    S: ProgressSink,
{
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = stop.clone();

    let handle = thread::spawn(move || {
        log::debug!("ui synchronizer started ({}ms)", interval.as_millis());
        while !stop_flag.load(Ordering::Relaxed) {
            let started = Instant::now();

            let outcome = match clock.lock() {
                Ok(mut clock) => tick(&mut *clock, &sink),
                Err(_) => {
                    log::error!("animation clock lock poisoned, stopping synchronizer");
                    break;
                }
            };
            if outcome == TickOutcome::SinkClosed {
                log::debug!("progress receiver gone, stopping synchronizer");
                break;
            }

            if let Some(remaining) = interval.checked_sub(started.elapsed()) {
                thread::sleep(remaining);
            }
        }
        log::debug!("ui synchronizer stopped");
    });

    SyncHandle {
        stop,
        handle: Some(handle),
    }
}
