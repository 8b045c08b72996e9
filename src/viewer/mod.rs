pub mod clock;
pub mod engine;
pub mod simulated;
pub mod sync;
pub mod view_mode;

pub use clock::{AnimationClockController, AnimationClockState, ClockError, ClockPhase};
pub use engine::{RendererError, RendererResult, ViewerEngine};
pub use simulated::SimulatedViewer;
pub use sync::{ProgressSink, SyncHandle, TickOutcome, start_synchronizer};
pub use view_mode::{PanelTransition, ViewMode, ViewModeSelection};

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::engine::{RendererError, RendererResult, ViewerEngine};

    #[derive(Clone, Debug, PartialEq)]
    pub enum Call {
        Load(String),
        TransformMode(bool),
        Xray(bool),
        JointEdit(bool),
        AnimationPicker(bool),
        BreedPicker(bool),
        Toggle(bool),
        JumpForward,
        JumpBackward,
        SetTime(f32),
        Duration,
        CurrentTime,
        Pause,
        Resume,
        IsPlaying,
        Sensitivity(f32),
    }

    #[derive(Default)]
    struct Script {
        duration: f32,
        time: f32,
        playing: bool,
        refuse_playback: bool,
        failure: Option<RendererError>,
        calls: Vec<Call>,
    }

    /// Renderer double that records every call and answers from a script.
    #[derive(Default)]
    pub struct ScriptedEngine {
        script: Mutex<Script>,
    }

    impl ScriptedEngine {
        pub fn with_duration(duration: f32) -> Self {
            let engine = Self::default();
            engine.set_duration(duration);
            engine
        }

        fn with<R>(&self, f: impl FnOnce(&mut Script) -> R) -> R {
            let mut script = self.script.lock().unwrap();
            f(&mut script)
        }

        fn record<R>(&self, call: Call, f: impl FnOnce(&mut Script) -> R) -> RendererResult<R> {
            self.with(|script| {
                script.calls.push(call);
                match &script.failure {
                    Some(err) => Err(err.clone()),
                    None => Ok(f(script)),
                }
            })
        }

        pub fn set_duration(&self, duration: f32) {
            self.with(|s| s.duration = duration);
        }

        pub fn set_time(&self, time: f32) {
            self.with(|s| s.time = time);
        }

        pub fn set_playing(&self, playing: bool) {
            self.with(|s| s.playing = playing);
        }

        pub fn refuse_playback(&self, refuse: bool) {
            self.with(|s| s.refuse_playback = refuse);
        }

        pub fn fail_with(&self, failure: Option<RendererError>) {
            self.with(|s| s.failure = failure);
        }

        pub fn playing(&self) -> bool {
            self.with(|s| s.playing)
        }

        pub fn time(&self) -> f32 {
            self.with(|s| s.time)
        }

        pub fn calls(&self) -> Vec<Call> {
            self.with(|s| s.calls.clone())
        }

        pub fn count(&self, call: Call) -> usize {
            self.with(|s| s.calls.iter().filter(|c| **c == call).count())
        }

        pub fn clear_calls(&self) {
            self.with(|s| s.calls.clear());
        }
    }

    impl ViewerEngine for ScriptedEngine {
        fn load_model(&self, asset_name: &str) -> RendererResult<()> {
            self.record(Call::Load(asset_name.to_string()), |s| {
                s.time = 0.0;
            })
        }

        fn set_view_transform_mode(&self, transform: bool) -> RendererResult<()> {
            self.record(Call::TransformMode(transform), |_| {})
        }

        fn set_xray_skeleton(&self, enabled: bool) -> RendererResult<()> {
            self.record(Call::Xray(enabled), |_| {})
        }

        fn set_joint_edit_mode(&self, enabled: bool) -> RendererResult<()> {
            self.record(Call::JointEdit(enabled), |_| {})
        }

        fn set_animation_picker_visible(&self, visible: bool) -> RendererResult<()> {
            self.record(Call::AnimationPicker(visible), |_| {})
        }

        fn set_breed_picker_visible(&self, visible: bool) -> RendererResult<()> {
            self.record(Call::BreedPicker(visible), |_| {})
        }

        fn toggle_play_pause(&self, desired_playing: bool) -> RendererResult<bool> {
            self.record(Call::Toggle(desired_playing), |s| {
                if !s.refuse_playback {
                    s.playing = desired_playing;
                }
                s.playing
            })
        }

        fn jump_forward(&self) -> RendererResult<()> {
            self.record(Call::JumpForward, |s| {
                s.time = (s.time + 0.02).min(s.duration);
            })
        }

        fn jump_backward(&self) -> RendererResult<()> {
            self.record(Call::JumpBackward, |s| {
                s.time = (s.time - 0.02).max(0.0);
            })
        }

        fn set_animation_time(&self, seconds: f32) -> RendererResult<()> {
            self.record(Call::SetTime(seconds), |s| s.time = seconds)
        }

        fn animation_duration(&self) -> RendererResult<f32> {
            self.record(Call::Duration, |s| s.duration)
        }

        fn current_animation_time(&self) -> RendererResult<f32> {
            self.record(Call::CurrentTime, |s| s.time)
        }

        fn pause_animation(&self) -> RendererResult<()> {
            self.record(Call::Pause, |s| s.playing = false)
        }

        fn resume_animation(&self) -> RendererResult<()> {
            self.record(Call::Resume, |s| s.playing = true)
        }

        fn is_animation_playing(&self) -> RendererResult<bool> {
            self.record(Call::IsPlaying, |s| s.playing)
        }

        fn set_camera_sensitivity(&self, factor: f32) -> RendererResult<()> {
            self.record(Call::Sensitivity(factor), |_| {})
        }
    }
}
