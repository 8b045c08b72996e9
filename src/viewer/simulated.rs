use std::{
    sync::{Mutex, MutexGuard},
    time::{Duration, Instant},
};

use super::engine::{RendererError, RendererResult, ViewerEngine};
use crate::pipeline::breed_assets;

/// Seconds moved by one jump control press.
pub const JUMP_STEP_SECONDS: f32 = 0.02;

/// Snapshot of what the simulated renderer is showing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewerStatus {
    pub asset: Option<String>,
    pub loading: bool,
    pub playing: bool,
    pub time_seconds: f32,
    pub duration_seconds: f32,
    pub transform_mode: bool,
    pub xray_skeleton: bool,
    pub joint_edit: bool,
    pub breed_picker: bool,
    pub animation_picker: bool,
    pub camera_sensitivity: f32,
}

#[derive(Debug)]
struct LoadedAsset {
    name: String,
    duration: f32,
    requested_at: Instant,
}

#[derive(Debug, Default)]
struct Scene {
    asset: Option<LoadedAsset>,
    /// Playback position at `anchor`, or the frozen position when paused.
    position: f32,
    anchor: Option<Instant>,
    transform_mode: bool,
    xray_skeleton: bool,
    joint_edit: bool,
    breed_picker: bool,
    animation_picker: bool,
    camera_sensitivity: f32,
}

impl Scene {
    fn ready_asset(&self, load_delay: Duration) -> RendererResult<&LoadedAsset> {
        match &self.asset {
            None => Err(RendererError::Unavailable("no model loaded".into())),
            Some(asset) if asset.requested_at.elapsed() < load_delay => {
                Err(RendererError::NotReady)
            }
            Some(asset) => Ok(asset),
        }
    }

    fn now(&self, duration: f32) -> f32 {
        match self.anchor {
            Some(anchor) => (self.position + anchor.elapsed().as_secs_f32()) % duration,
            None => self.position,
        }
    }

    fn freeze(&mut self, duration: f32) {
        self.position = self.now(duration);
        self.anchor = None;
    }

    fn seek(&mut self, seconds: f32) {
        self.position = seconds;
        if self.anchor.is_some() {
            self.anchor = Some(Instant::now());
        }
    }
}

/// In-process stand-in for the native 3D viewer.
///
/// Knows the rigged breed models, "loads" them after a configurable delay and
/// loops a fixed-length clip per model on the wall clock.
#[derive(Debug)]
pub struct SimulatedViewer {
    scene: Mutex<Scene>,
    load_delay: Duration,
}

impl Default for SimulatedViewer {
    fn default() -> Self {
        Self::new(Duration::from_millis(300))
    }
}

impl SimulatedViewer {
    pub fn new(load_delay: Duration) -> Self {
        Self {
            scene: Mutex::new(Scene {
                xray_skeleton: true,
                camera_sensitivity: 1.0,
                ..Scene::default()
            }),
            load_delay,
        }
    }

    /// Clip length of a known model.
    pub fn clip_duration(asset_name: &str) -> Option<f32> {
        let index = breed_assets::asset_names()
            .iter()
            .position(|name| *name == asset_name)?;
        Some(2.0 + (index % 5) as f32 * 0.75)
    }

    pub fn status(&self) -> ViewerStatus {
        let Ok(scene) = self.scene.lock() else {
            return ViewerStatus::default();
        };
        let ready = scene.ready_asset(self.load_delay).ok();
        ViewerStatus {
            asset: scene.asset.as_ref().map(|asset| asset.name.clone()),
            loading: scene.asset.is_some() && ready.is_none(),
            playing: ready.is_some() && scene.anchor.is_some(),
            time_seconds: ready.map_or(0.0, |asset| scene.now(asset.duration)),
            duration_seconds: ready.map_or(0.0, |asset| asset.duration),
            transform_mode: scene.transform_mode,
            xray_skeleton: scene.xray_skeleton,
            joint_edit: scene.joint_edit,
            breed_picker: scene.breed_picker,
            animation_picker: scene.animation_picker,
            camera_sensitivity: scene.camera_sensitivity,
        }
    }

    fn scene(&self) -> RendererResult<MutexGuard<'_, Scene>> {
        self.scene
            .lock()
            .map_err(|_| RendererError::Unavailable("viewer state poisoned".into()))
    }

    /// Runs `f` against a ready clip, passing its duration.
    fn with_clip<R>(&self, f: impl FnOnce(&mut Scene, f32) -> R) -> RendererResult<R> {
        let mut scene = self.scene()?;
        let duration = scene.ready_asset(self.load_delay)?.duration;
        Ok(f(&mut *scene, duration))
    }
}

impl ViewerEngine for SimulatedViewer {
    fn load_model(&self, asset_name: &str) -> RendererResult<()> {
        let mut scene = self.scene()?;
        scene.position = 0.0;
        scene.anchor = None;
        scene.asset = None;

        if asset_name.is_empty() {
            log::info!("viewer cleared");
            return Ok(());
        }
        let Some(duration) = Self::clip_duration(asset_name) else {
            log::warn!("viewer has no model named {asset_name:?}");
            return Ok(());
        };

        log::info!("viewer loading {asset_name} ({duration:.2}s clip)");
        let requested_at = Instant::now();
        scene.asset = Some(LoadedAsset {
            name: asset_name.to_string(),
            duration,
            requested_at,
        });
        // Playback starts as soon as the model is in.
        scene.anchor = Some(requested_at + self.load_delay);
        Ok(())
    }

    fn set_view_transform_mode(&self, transform: bool) -> RendererResult<()> {
        self.scene()?.transform_mode = transform;
        Ok(())
    }

    fn set_xray_skeleton(&self, enabled: bool) -> RendererResult<()> {
        self.scene()?.xray_skeleton = enabled;
        Ok(())
    }

    fn set_joint_edit_mode(&self, enabled: bool) -> RendererResult<()> {
        self.scene()?.joint_edit = enabled;
        Ok(())
    }

    fn set_animation_picker_visible(&self, visible: bool) -> RendererResult<()> {
        self.scene()?.animation_picker = visible;
        Ok(())
    }

    fn set_breed_picker_visible(&self, visible: bool) -> RendererResult<()> {
        self.scene()?.breed_picker = visible;
        Ok(())
    }

    fn toggle_play_pause(&self, desired_playing: bool) -> RendererResult<bool> {
        let mut scene = self.scene()?;
        let duration = match scene.ready_asset(self.load_delay) {
            Ok(asset) => asset.duration,
            Err(RendererError::Unavailable(_)) => return Ok(false),
            Err(err) => return Err(err),
        };

        if desired_playing && scene.anchor.is_none() {
            scene.anchor = Some(Instant::now());
        } else if !desired_playing && scene.anchor.is_some() {
            scene.freeze(duration);
        }
        Ok(scene.anchor.is_some())
    }

    fn jump_forward(&self) -> RendererResult<()> {
        self.with_clip(|scene, duration| {
            let target = (scene.now(duration) + JUMP_STEP_SECONDS).min(duration);
            scene.seek(target);
        })
    }

    fn jump_backward(&self) -> RendererResult<()> {
        self.with_clip(|scene, duration| {
            let target = (scene.now(duration) - JUMP_STEP_SECONDS).max(0.0);
            scene.seek(target);
        })
    }

    fn set_animation_time(&self, seconds: f32) -> RendererResult<()> {
        self.with_clip(|scene, duration| {
            scene.position = seconds.clamp(0.0, duration);
            scene.anchor = None;
        })
    }

    fn animation_duration(&self) -> RendererResult<f32> {
        match self.with_clip(|_, duration| duration) {
            Err(RendererError::Unavailable(_)) => Ok(0.0),
            other => other,
        }
    }

    fn current_animation_time(&self) -> RendererResult<f32> {
        self.with_clip(|scene, duration| scene.now(duration))
    }

    fn pause_animation(&self) -> RendererResult<()> {
        self.with_clip(|scene, duration| scene.freeze(duration))
    }

    fn resume_animation(&self) -> RendererResult<()> {
        self.with_clip(|scene, _| {
            if scene.anchor.is_none() {
                scene.anchor = Some(Instant::now());
            }
        })
    }

    fn is_animation_playing(&self) -> RendererResult<bool> {
        self.with_clip(|scene, _| scene.anchor.is_some())
    }

    fn set_camera_sensitivity(&self, factor: f32) -> RendererResult<()> {
        self.scene()?.camera_sensitivity = factor;
        Ok(())
    }
}
