use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use crate::{
    config::sensitivity_factor,
    types::CaptureOutcome,
    viewer::{
        AnimationClockController, ClockError, PanelTransition, ProgressSink, RendererResult,
        SyncHandle, ViewMode, ViewModeSelection, ViewerEngine, start_synchronizer,
    },
};

const DEFAULT_SENSITIVITY_PERCENT: u8 = 75;

/// Everything the viewer screen owns: the renderer handle, the animation clock,
/// the panel selection and the lifetime of the progress synchronizer.
pub struct ViewerSession<E: ViewerEngine> {
    engine: Arc<E>,
    clock: Arc<Mutex<AnimationClockController<E>>>,
    panels: ViewModeSelection,
    menu_visible: bool,
    xray: bool,
    transform_mode: bool,
    sensitivity_percent: u8,
    sync: Option<SyncHandle>,
}

impl<E: ViewerEngine> ViewerSession<E> {
    pub fn new(engine: Arc<E>) -> Self {
        let session = Self {
            clock: Arc::new(Mutex::new(AnimationClockController::new(engine.clone()))),
            engine,
            panels: ViewModeSelection::default(),
            menu_visible: true,
            xray: true,
            transform_mode: false,
            sensitivity_percent: DEFAULT_SENSITIVITY_PERCENT,
            sync: None,
        };

        log_failure("x-ray", session.engine.set_xray_skeleton(session.xray));
        log_failure(
            "view mode",
            session.engine.set_view_transform_mode(session.transform_mode),
        );
        log_failure(
            "camera sensitivity",
            session
                .engine
                .set_camera_sensitivity(sensitivity_factor(session.sensitivity_percent)),
        );
        session
    }

    pub fn clock(&self) -> MutexGuard<'_, AnimationClockController<E>> {
        self.clock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn start_sync<S: ProgressSink>(&mut self, sink: S, interval: Duration) {
        self.stop_sync();
        self.sync = Some(start_synchronizer(self.clock.clone(), sink, interval));
    }

    pub fn stop_sync(&mut self) {
        if let Some(handle) = self.sync.take() {
            handle.stop();
        }
    }

    pub fn is_syncing(&self) -> bool {
        self.sync.as_ref().is_some_and(SyncHandle::is_running)
    }

    /// Shows `asset`, or clears the viewer for `None`. The clock starts over;
    /// a drag in progress is finished first so its resume intent is honoured.
    pub fn load_asset(&mut self, asset: Option<&str>) -> RendererResult<()> {
        {
            let mut clock = self.clock();
            if clock.is_user_scrubbing() {
                log::debug!("asset change ends the active scrub");
                if let Err(err) = clock.end_scrub() {
                    log::debug!("end scrub before asset change failed: {err}");
                }
            }
        }
        let result = self.engine.load_model(asset.unwrap_or(""));
        self.clock().reset_for_new_asset();
        result
    }

    /// Applies a finished capture and returns the text to show the user.
    pub fn apply_capture(&mut self, outcome: &CaptureOutcome) -> String {
        if let CaptureOutcome::Breed { .. } = outcome {
            log_failure("model load", self.load_asset(outcome.asset()));
        }
        outcome.notification()
    }

    pub fn active_panel(&self) -> ViewMode {
        self.panels.active()
    }

    pub fn select_panel(&mut self, panel: ViewMode) -> PanelTransition {
        let transition = self.panels.select(panel);
        self.apply_panels(transition);
        transition
    }

    pub fn menu_visible(&self) -> bool {
        self.menu_visible
    }

    /// Hiding the menu also closes whatever panel was open.
    pub fn toggle_menu(&mut self) -> bool {
        self.menu_visible = !self.menu_visible;
        if !self.menu_visible {
            let transition = self.panels.clear();
            self.apply_panels(transition);
        }
        self.menu_visible
    }

    pub fn xray(&self) -> bool {
        self.xray
    }

    pub fn toggle_xray(&mut self) -> bool {
        self.xray = !self.xray;
        log_failure("x-ray", self.engine.set_xray_skeleton(self.xray));
        self.xray
    }

    pub fn transform_mode(&self) -> bool {
        self.transform_mode
    }

    pub fn set_transform_mode(&mut self, transform: bool) {
        if self.transform_mode == transform {
            return;
        }
        self.transform_mode = transform;
        log_failure("view mode", self.engine.set_view_transform_mode(transform));
    }

    pub fn sensitivity_percent(&self) -> u8 {
        self.sensitivity_percent
    }

    /// Returns the factor handed to the renderer.
    pub fn set_sensitivity_percent(&mut self, percent: u8) -> f32 {
        self.sensitivity_percent = percent.min(100);
        let factor = sensitivity_factor(self.sensitivity_percent);
        log_failure(
            "camera sensitivity",
            self.engine.set_camera_sensitivity(factor),
        );
        factor
    }

    pub fn playback_controls_visible(&self) -> bool {
        !self.panels.is_active(ViewMode::JointEditor)
    }

    pub fn toggle_play_pause(&self) -> Result<bool, ClockError> {
        self.clock().toggle_play_pause()
    }

    pub fn jump_forward(&self) -> Result<(), ClockError> {
        self.clock().jump_forward()
    }

    pub fn jump_backward(&self) -> Result<(), ClockError> {
        self.clock().jump_backward()
    }

    pub fn begin_scrub(&self) -> Result<(), ClockError> {
        self.clock().begin_scrub()
    }

    pub fn scrub_to(&self, progress: u64) -> Result<(), ClockError> {
        self.clock().scrub_to(progress)
    }

    pub fn end_scrub(&self) -> Result<(), ClockError> {
        self.clock().end_scrub()
    }

    fn apply_panels(&self, transition: PanelTransition) {
        if let Some(panel) = transition.deactivated {
            log_failure(panel.label(), set_panel(&*self.engine, panel, false));
        }
        if let Some(panel) = transition.activated {
            log_failure(panel.label(), set_panel(&*self.engine, panel, true));
        }
    }
}

impl<E: ViewerEngine> Drop for ViewerSession<E> {
    fn drop(&mut self) {
        self.stop_sync();
    }
}

fn set_panel<E: ViewerEngine>(engine: &E, panel: ViewMode, visible: bool) -> RendererResult<()> {
    match panel {
        ViewMode::None => Ok(()),
        ViewMode::BreedPicker => engine.set_breed_picker_visible(visible),
        ViewMode::JointEditor => engine.set_joint_edit_mode(visible),
        ViewMode::AnimationPicker => engine.set_animation_picker_visible(visible),
    }
}

fn log_failure(what: &str, result: RendererResult<()>) {
    if let Err(err) = result {
        log::warn!("{what}: {err}");
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::unbounded;

    use super::*;
    use crate::{
        types::LabeledCandidate,
        viewer::{
            ClockPhase,
            testing::{Call, ScriptedEngine},
        },
    };

    fn session() -> (Arc<ScriptedEngine>, ViewerSession<ScriptedEngine>) {
        let engine = Arc::new(ScriptedEngine::with_duration(4.0));
        let session = ViewerSession::new(engine.clone());
        engine.clear_calls();
        (engine, session)
    }

    fn breed(label: &str, asset: Option<&str>) -> CaptureOutcome {
        let breed = LabeledCandidate {
            id: "0".to_string(),
            label: label.to_string(),
            confidence: 0.9,
        };
        CaptureOutcome::Breed {
            candidates: vec![breed.clone()],
            breed,
            asset: asset.map(str::to_string),
        }
    }

    #[test]
    fn new_session_pushes_defaults() {
        let engine = Arc::new(ScriptedEngine::default());
        let session = ViewerSession::new(engine.clone());

        assert!(session.xray());
        assert!(!session.transform_mode());
        assert!(session.menu_visible());
        assert_eq!(
            engine.calls(),
            vec![
                Call::Xray(true),
                Call::TransformMode(false),
                Call::Sensitivity(1.0)
            ]
        );
    }

    #[test]
    fn capture_loads_asset_and_resets_clock() {
        let (engine, mut session) = session();
        session.clock().discover_duration().unwrap();
        engine.clear_calls();

        let text = session.apply_capture(&breed("beagle", Some("Beagle")));
        assert_eq!(text, "beagle: 90% - Model available!");
        assert_eq!(engine.calls(), vec![Call::Load("Beagle".to_string())]);
        assert_eq!(session.clock().phase(), ClockPhase::Stopped);
    }

    #[test]
    fn asset_change_finishes_active_scrub() {
        let (engine, mut session) = session();
        engine.set_playing(true);
        session.clock().discover_duration().unwrap();
        session.begin_scrub().unwrap();
        engine.clear_calls();

        session.load_asset(Some("Corgi")).unwrap();

        assert_eq!(
            engine.calls(),
            vec![Call::Resume, Call::Load("Corgi".to_string())]
        );
        assert!(!session.clock().is_user_scrubbing());
        assert_eq!(session.clock().phase(), ClockPhase::Stopped);
        assert!(session.end_scrub().is_err());
    }

    #[test]
    fn unmapped_breed_clears_viewer() {
        let (engine, mut session) = session();
        session.apply_capture(&breed("chihuahua", None));
        assert_eq!(engine.calls(), vec![Call::Load(String::new())]);
    }

    #[test]
    fn non_breed_outcomes_leave_viewer_alone() {
        let (engine, mut session) = session();
        let text = session.apply_capture(&CaptureOutcome::NoBreed);
        assert_eq!(text, "No breed detected");
        assert!(engine.calls().is_empty());
    }

    #[test]
    fn panels_switch_on_renderer() {
        let (engine, mut session) = session();

        session.select_panel(ViewMode::BreedPicker);
        session.select_panel(ViewMode::AnimationPicker);
        assert_eq!(
            engine.calls(),
            vec![
                Call::BreedPicker(true),
                Call::BreedPicker(false),
                Call::AnimationPicker(true)
            ]
        );
    }

    #[test]
    fn hiding_menu_closes_panel() {
        let (engine, mut session) = session();
        session.select_panel(ViewMode::JointEditor);
        assert!(!session.playback_controls_visible());

        assert!(!session.toggle_menu());
        assert_eq!(session.active_panel(), ViewMode::None);
        assert!(session.playback_controls_visible());
        assert_eq!(engine.calls().last(), Some(&Call::JointEdit(false)));

        assert!(session.toggle_menu());
    }

    #[test]
    fn toggles_reach_renderer() {
        let (engine, mut session) = session();

        assert!(!session.toggle_xray());
        session.set_transform_mode(true);
        session.set_transform_mode(true);
        let factor = session.set_sensitivity_percent(150);

        assert_eq!(session.sensitivity_percent(), 100);
        assert!((factor - 1.25).abs() < 1e-6);
        assert_eq!(
            engine.calls(),
            vec![
                Call::Xray(false),
                Call::TransformMode(true),
                Call::Sensitivity(factor)
            ]
        );
    }

    #[test]
    fn sync_stops_with_session() {
        let (engine, mut session) = session();
        engine.set_time(2.0);
        let (tx, rx) = unbounded();

        session.start_sync(tx, Duration::from_millis(1));
        assert!(session.is_syncing());
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 2000);

        drop(session);
        while rx.try_recv().is_ok() {}
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }
}
