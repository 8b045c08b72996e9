use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RendererError {
    /// The renderer cannot answer yet, e.g. the asset is still loading.
    #[error("renderer not ready")]
    NotReady,
    /// No renderer, or nothing loaded that could answer.
    #[error("renderer unavailable: {0}")]
    Unavailable(String),
}

impl RendererError {
    pub fn is_transient(&self) -> bool {
        matches!(self, RendererError::NotReady)
    }
}

pub type RendererResult<T> = Result<T, RendererError>;

/// The native 3D viewer as seen from the app.
///
/// Every call must return immediately; a query the renderer cannot service yet
/// answers [`RendererError::NotReady`] instead of blocking. Implementations own
/// their internal synchronisation.
pub trait ViewerEngine: Send + Sync + 'static {
    /// An empty name clears the current model. Unknown names are not an error.
    fn load_model(&self, asset_name: &str) -> RendererResult<()>;
    fn set_view_transform_mode(&self, transform: bool) -> RendererResult<()>;
    fn set_xray_skeleton(&self, enabled: bool) -> RendererResult<()>;
    fn set_joint_edit_mode(&self, enabled: bool) -> RendererResult<()>;
    fn set_animation_picker_visible(&self, visible: bool) -> RendererResult<()>;
    fn set_breed_picker_visible(&self, visible: bool) -> RendererResult<()>;

    /// Asks for `desired_playing`; returns the state the renderer actually ended in.
    fn toggle_play_pause(&self, desired_playing: bool) -> RendererResult<bool>;
    fn jump_forward(&self) -> RendererResult<()>;
    fn jump_backward(&self) -> RendererResult<()>;
    fn set_animation_time(&self, seconds: f32) -> RendererResult<()>;
    /// Zero or negative means the duration is not known yet.
    fn animation_duration(&self) -> RendererResult<f32>;
    fn current_animation_time(&self) -> RendererResult<f32>;
    fn pause_animation(&self) -> RendererResult<()>;
    fn resume_animation(&self) -> RendererResult<()>;
    fn is_animation_playing(&self) -> RendererResult<bool>;

    fn set_camera_sensitivity(&self, factor: f32) -> RendererResult<()>;
}
