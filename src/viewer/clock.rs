use std::sync::Arc;

use thiserror::Error;

use super::engine::{RendererError, ViewerEngine};

/// UI timeline units are milliseconds.
const PROGRESS_UNITS_PER_SECOND: f32 = 1000.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockPhase {
    /// Duration not resolved yet.
    Stopped,
    Ready { playing: bool },
    /// The user is dragging the timeline; `resume` is the pre-scrub intent.
    Scrubbing { resume: bool },
}

#[derive(Debug, Error)]
pub enum ClockError {
    #[error(transparent)]
    Renderer(#[from] RendererError),
    #[error("{op} is not allowed while {phase:?}")]
    InvalidPhase { op: &'static str, phase: ClockPhase },
}

impl ClockError {
    /// Worth retrying on the next natural trigger.
    pub fn is_transient(&self) -> bool {
        match self {
            ClockError::Renderer(err) => err.is_transient(),
            ClockError::InvalidPhase { .. } => false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationClockState {
    pub is_playing: bool,
    pub is_user_scrubbing: bool,
    pub resume_after_scrub: bool,
    pub current_time_seconds: f32,
    /// `0.0` until the renderer reports a duration for the loaded asset.
    pub duration_seconds: f32,
}

impl Default for AnimationClockState {
    fn default() -> Self {
        Self {
            is_playing: true,
            is_user_scrubbing: false,
            resume_after_scrub: false,
            current_time_seconds: 0.0,
            duration_seconds: 0.0,
        }
    }
}

impl AnimationClockState {
    pub fn phase(&self) -> ClockPhase {
        if self.is_user_scrubbing {
            ClockPhase::Scrubbing {
                resume: self.resume_after_scrub,
            }
        } else if self.duration_seconds > 0.0 {
            ClockPhase::Ready {
                playing: self.is_playing,
            }
        } else {
            ClockPhase::Stopped
        }
    }
}

pub fn seconds_to_progress(seconds: f32) -> u64 {
    (seconds * PROGRESS_UNITS_PER_SECOND).round().max(0.0) as u64
}

pub fn progress_to_seconds(progress: u64) -> f32 {
    progress as f32 / PROGRESS_UNITS_PER_SECOND
}

/// Sole owner of [`AnimationClockState`]; every timeline query and mutation
/// against the renderer goes through here.
pub struct AnimationClockController<E> {
    engine: Arc<E>,
    state: AnimationClockState,
}

impl<E: ViewerEngine> AnimationClockController<E> {
    pub fn new(engine: Arc<E>) -> Self {
        Self {
            engine,
            state: AnimationClockState::default(),
        }
    }

    pub fn state(&self) -> AnimationClockState {
        self.state
    }

    pub fn phase(&self) -> ClockPhase {
        self.state.phase()
    }

    pub fn is_user_scrubbing(&self) -> bool {
        self.state.is_user_scrubbing
    }

    pub fn duration_seconds(&self) -> Option<f32> {
        (self.state.duration_seconds > 0.0).then_some(self.state.duration_seconds)
    }

    /// Upper bound of the UI timeline, once the duration is known.
    pub fn progress_max(&self) -> Option<u64> {
        self.duration_seconds().map(seconds_to_progress)
    }

    /// Forget the cached duration so it is rediscovered for a newly loaded asset.
    pub fn reset_for_new_asset(&mut self) {
        self.state = AnimationClockState {
            is_playing: self.state.is_playing,
            ..AnimationClockState::default()
        };
    }

    /// Resolves the duration once per asset. Safe to call every tick: while the
    /// renderer has no answer this returns `NotReady` and stays `Stopped`.
    pub fn discover_duration(&mut self) -> Result<f32, ClockError> {
        if let Some(duration) = self.duration_seconds() {
            return Ok(duration);
        }

        let duration = self.engine.animation_duration()?;
        if !(duration > 0.0) || !duration.is_finite() {
            return Err(RendererError::NotReady.into());
        }

        self.state.duration_seconds = duration;
        match self.engine.is_animation_playing() {
            Ok(playing) => self.state.is_playing = playing,
            Err(err) => log::debug!("keeping assumed play state: {err}"),
        }
        log::info!("animation duration resolved: {duration:.3}s");
        Ok(duration)
    }

    /// Flips playback; the renderer's answer becomes the new play state.
    pub fn toggle_play_pause(&mut self) -> Result<bool, ClockError> {
        self.require_ready("toggle_play_pause")?;
        let desired = !self.state.is_playing;
        let actual = self.engine.toggle_play_pause(desired)?;
        if actual != desired {
            log::debug!("renderer answered playing={actual} for requested {desired}");
        }
        self.state.is_playing = actual;
        Ok(actual)
    }

    pub fn begin_scrub(&mut self) -> Result<(), ClockError> {
        self.require_ready("begin_scrub")?;

        let was_playing = self
            .engine
            .is_animation_playing()
            .unwrap_or(self.state.is_playing);
        self.state.resume_after_scrub = was_playing;
        self.state.is_user_scrubbing = true;

        if let Err(err) = self.engine.pause_animation() {
            log::debug!("pause at scrub start failed: {err}");
        }
        self.state.is_playing = false;
        Ok(())
    }

    /// Moves the renderer to a UI timeline position while scrubbing.
    pub fn scrub_to(&mut self, progress: u64) -> Result<(), ClockError> {
        if !self.state.is_user_scrubbing {
            return Err(ClockError::InvalidPhase {
                op: "scrub_to",
                phase: self.phase(),
            });
        }

        let seconds = progress_to_seconds(progress).clamp(0.0, self.state.duration_seconds);
        self.engine.set_animation_time(seconds)?;
        self.state.current_time_seconds = seconds;
        Ok(())
    }

    pub fn end_scrub(&mut self) -> Result<(), ClockError> {
        if !self.state.is_user_scrubbing {
            return Err(ClockError::InvalidPhase {
                op: "end_scrub",
                phase: self.phase(),
            });
        }

        self.state.is_user_scrubbing = false;
        let resume = std::mem::take(&mut self.state.resume_after_scrub);
        if resume {
            match self.engine.resume_animation() {
                Ok(()) => self.state.is_playing = true,
                Err(err) => {
                    log::debug!("resume after scrub failed: {err}");
                    self.state.is_playing = false;
                }
            }
        }
        Ok(())
    }

    pub fn jump_forward(&mut self) -> Result<(), ClockError> {
        self.require_ready("jump_forward")?;
        Ok(self.engine.jump_forward()?)
    }

    pub fn jump_backward(&mut self) -> Result<(), ClockError> {
        self.require_ready("jump_backward")?;
        Ok(self.engine.jump_backward()?)
    }

    /// Reads the renderer's current time as a UI timeline position.
    pub fn poll_progress(&mut self) -> Result<u64, ClockError> {
        if self.duration_seconds().is_none() {
            return Err(RendererError::NotReady.into());
        }
        let seconds = self.engine.current_animation_time()?;
        self.state.current_time_seconds = seconds;
        Ok(seconds_to_progress(seconds))
    }

    fn require_ready(&self, op: &'static str) -> Result<(), ClockError> {
        match self.phase() {
            ClockPhase::Ready { .. } => Ok(()),
            phase => Err(ClockError::InvalidPhase { op, phase }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewer::testing::{Call, ScriptedEngine};

    fn ready_controller(duration: f32, playing: bool) -> (Arc<ScriptedEngine>, AnimationClockController<ScriptedEngine>) {
        let engine = Arc::new(ScriptedEngine::with_duration(duration));
        engine.set_playing(playing);
        let mut clock = AnimationClockController::new(engine.clone());
        clock.discover_duration().unwrap();
        engine.clear_calls();
        (engine, clock)
    }

    #[test]
    fn duration_is_discovered_once() {
        let engine = Arc::new(ScriptedEngine::with_duration(0.0));
        let mut clock = AnimationClockController::new(engine.clone());

        for _ in 0..3 {
            assert!(clock.discover_duration().unwrap_err().is_transient());
            assert_eq!(clock.phase(), ClockPhase::Stopped);
        }

        engine.set_duration(12.5);
        assert_eq!(clock.discover_duration().unwrap(), 12.5);
        assert!(matches!(clock.phase(), ClockPhase::Ready { .. }));

        engine.set_duration(99.0);
        assert_eq!(clock.discover_duration().unwrap(), 12.5);
        assert_eq!(clock.discover_duration().unwrap(), 12.5);
        assert_eq!(engine.count(Call::Duration), 4);
    }

    #[test]
    fn renderer_failure_keeps_clock_stopped() {
        let engine = Arc::new(ScriptedEngine::with_duration(5.0));
        engine.fail_with(Some(RendererError::Unavailable("no asset".into())));
        let mut clock = AnimationClockController::new(engine.clone());

        let err = clock.discover_duration().unwrap_err();
        assert!(!err.is_transient());
        assert_eq!(clock.phase(), ClockPhase::Stopped);

        engine.fail_with(None);
        assert_eq!(clock.discover_duration().unwrap(), 5.0);
    }

    #[test]
    fn scrub_pauses_seeks_and_resumes() {
        let (engine, mut clock) = ready_controller(10.0, true);

        clock.begin_scrub().unwrap();
        assert_eq!(clock.phase(), ClockPhase::Scrubbing { resume: true });
        assert!(clock.state().resume_after_scrub);
        assert!(!engine.playing());

        clock.scrub_to(500).unwrap();
        assert_eq!(engine.time(), 0.5);
        assert_eq!(clock.phase(), ClockPhase::Scrubbing { resume: true });

        clock.end_scrub().unwrap();
        assert_eq!(clock.phase(), ClockPhase::Ready { playing: true });
        assert!(engine.playing());
        assert_eq!(
            engine.calls(),
            vec![
                Call::IsPlaying,
                Call::Pause,
                Call::SetTime(0.5),
                Call::Resume
            ]
        );
    }

    #[test]
    fn scrub_round_trip_restores_paused_state() {
        let (engine, mut clock) = ready_controller(4.0, false);

        clock.begin_scrub().unwrap();
        clock.end_scrub().unwrap();

        assert_eq!(clock.phase(), ClockPhase::Ready { playing: false });
        assert_eq!(engine.count(Call::Resume), 0);
    }

    #[test]
    fn scrub_position_is_clamped_to_duration() {
        let (engine, mut clock) = ready_controller(2.0, true);
        clock.begin_scrub().unwrap();
        clock.scrub_to(7_500).unwrap();
        assert_eq!(engine.time(), 2.0);
    }

    #[test]
    fn scrub_requires_known_duration() {
        let engine = Arc::new(ScriptedEngine::with_duration(0.0));
        let mut clock = AnimationClockController::new(engine);

        assert!(matches!(
            clock.begin_scrub(),
            Err(ClockError::InvalidPhase {
                phase: ClockPhase::Stopped,
                ..
            })
        ));
        assert!(clock.scrub_to(100).is_err());
        assert!(clock.end_scrub().is_err());
    }

    #[test]
    fn toggle_adopts_renderer_answer() {
        let (engine, mut clock) = ready_controller(3.0, true);

        assert_eq!(clock.toggle_play_pause().unwrap(), false);
        assert_eq!(clock.phase(), ClockPhase::Ready { playing: false });

        engine.refuse_playback(true);
        assert_eq!(clock.toggle_play_pause().unwrap(), false);
        assert_eq!(clock.phase(), ClockPhase::Ready { playing: false });
        assert_eq!(
            engine.calls(),
            vec![Call::Toggle(false), Call::Toggle(true)]
        );
    }

    #[test]
    fn jumps_only_touch_renderer_time() {
        let (engine, mut clock) = ready_controller(3.0, false);
        let before = clock.state();

        clock.jump_forward().unwrap();
        clock.jump_forward().unwrap();
        clock.jump_backward().unwrap();

        assert_eq!(clock.state(), before);
        assert!((engine.time() - 0.02).abs() < 1e-6);
    }

    #[test]
    fn controls_rejected_while_stopped_or_scrubbing() {
        let engine = Arc::new(ScriptedEngine::with_duration(0.0));
        let mut clock = AnimationClockController::new(engine.clone());
        assert!(clock.toggle_play_pause().is_err());
        assert!(clock.jump_forward().is_err());

        let (engine, mut clock) = ready_controller(3.0, true);
        clock.begin_scrub().unwrap();
        assert!(clock.toggle_play_pause().is_err());
        assert!(clock.jump_backward().is_err());
        assert!(clock.begin_scrub().is_err());
        assert_eq!(engine.count(Call::Toggle(false)), 0);
    }

    #[test]
    fn poll_progress_rounds_to_milliseconds() {
        let (engine, mut clock) = ready_controller(3.0, true);
        engine.set_time(1.23456);
        assert_eq!(clock.poll_progress().unwrap(), 1235);
        assert_eq!(clock.progress_max(), Some(3000));
    }

    #[test]
    fn new_asset_forgets_duration() {
        let (engine, mut clock) = ready_controller(3.0, true);
        clock.reset_for_new_asset();
        assert_eq!(clock.phase(), ClockPhase::Stopped);
        assert!(clock.poll_progress().is_err());

        engine.set_duration(6.0);
        assert_eq!(clock.discover_duration().unwrap(), 6.0);
    }
}
