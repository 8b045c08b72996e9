use std::{mem, path::PathBuf, sync::Arc, thread};

use breed_viewer::{
    config::ViewerConfig,
    model_download::{ModelDownloadEvent, ensure_model_ready},
    pipeline::{
        BreedPipeline, ClassificationWorker, ClassifiedCapture, preprocess,
        start_classification_worker,
    },
    session::ViewerSession,
    types::{CaptureOutcome, Photo},
    viewer::SimulatedViewer,
};
use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use gpui::prelude::FluentBuilder;
use gpui::{
    AnyElement, App, AppContext, Context, Hsla, InteractiveElement, IntoElement, MouseButton,
    MouseDownEvent, MouseMoveEvent, MouseUpEvent, ObjectFit, ParentElement, Render, RenderImage,
    SharedString, Styled, StyledImage, TitlebarOptions, Window, WindowControlArea,
    WindowDecorations, WindowOptions, div, img, px,
};
use gpui_component::{
    ActiveTheme, Root, Selectable, StyledExt,
    button::{Button, ButtonVariants},
    h_flex,
    tag::Tag,
    v_flex,
};
use image::{Frame as ImageFrame, ImageBuffer, Rgba, RgbaImage};

mod controls;
mod download;
mod main_view;
mod render_util;
mod titlebar;

const TIMELINE_WIDTH: f32 = 520.0;
const CONTROL_PANEL_WIDTH: f32 = 340.0;
const THUMBNAIL_SIZE: f32 = 300.0;
const SENSITIVITY_STEP: u8 = 5;

pub fn launch_ui(app: &mut App, config: ViewerConfig, photo_path: Option<PathBuf>) -> gpui::Result<()> {
    let window_options = WindowOptions {
        titlebar: Some(TitlebarOptions {
            title: Some("Breed Viewer".into()),
            appears_transparent: true,
            traffic_light_position: None,
        }),
        window_decorations: Some(WindowDecorations::Client),
        ..Default::default()
    };

    app.open_window(window_options, move |window, app| {
        let view = app.new(|_| AppView::new(config, photo_path));
        app.new(|cx| Root::new(view, window, cx))
    })?;

    Ok(())
}

struct AppView {
    screen: Screen,
    config: ViewerConfig,
    viewer: Arc<SimulatedViewer>,
    session: ViewerSession<SimulatedViewer>,
    progress_rx: Receiver<u64>,
    displayed_progress: u64,
    worker: Option<ClassificationWorker>,
    capture_tx: Option<Sender<ClassifiedCapture>>,
    capture_rx: Receiver<ClassifiedCapture>,
    photo_path: Option<PathBuf>,
    photo: Option<Photo>,
    photo_image: Option<Arc<RenderImage>>,
    photo_error: Option<String>,
    notification: Option<String>,
    last_outcome: Option<CaptureOutcome>,
    scrub_state: Option<ScrubState>,
    download_rx: Receiver<DownloadMessage>,
    _download_handle: thread::JoinHandle<()>,
}

enum Screen {
    Download(DownloadState),
    Main,
}

struct DownloadState {
    downloaded: u64,
    total: Option<u64>,
    models_ready: usize,
    message: String,
    error: Option<String>,
    skipped: bool,
}

impl DownloadState {
    fn new() -> Self {
        Self {
            downloaded: 0,
            total: None,
            models_ready: 0,
            message: "Checking recognition models...".to_string(),
            error: None,
            skipped: false,
        }
    }

    fn finished(&self) -> bool {
        self.skipped || (self.models_ready >= 2 && self.error.is_none())
    }
}

enum DownloadMessage {
    Event(ModelDownloadEvent),
    Error(String),
}

#[derive(Clone, Copy)]
struct ScrubState {
    start_pointer_x: f32,
    start_progress: u64,
}

impl AppView {
    fn new(config: ViewerConfig, photo_path: Option<PathBuf>) -> Self {
        let viewer = Arc::new(SimulatedViewer::default());
        let mut session = ViewerSession::new(viewer.clone());

        let (progress_tx, progress_rx) = bounded(4);
        session.start_sync(progress_tx, config.sync_interval);

        let (capture_tx, capture_rx) = unbounded();
        let (download_tx, download_rx) = unbounded();
        let download_handle = download::spawn_model_download(config.clone(), download_tx);

        Self {
            screen: Screen::Download(DownloadState::new()),
            config,
            viewer,
            session,
            progress_rx,
            displayed_progress: 0,
            worker: None,
            capture_tx: Some(capture_tx),
            capture_rx,
            photo_path,
            photo: None,
            photo_image: None,
            photo_error: None,
            notification: None,
            last_outcome: None,
            scrub_state: None,
            download_rx,
            _download_handle: download_handle,
        }
    }

    fn start_worker_if_needed(&mut self) {
        if self.worker.is_some() {
            return;
        }
        let Some(capture_tx) = self.capture_tx.take() else {
            log::warn!("missing result sender for classification worker");
            return;
        };

        let config = self.config.clone();
        self.worker = Some(start_classification_worker(
            move || BreedPipeline::from_config(&config),
            capture_tx,
        ));
    }

    fn load_photo_if_needed(&mut self) {
        if self.photo.is_some() || self.photo_error.is_some() {
            return;
        }
        let Some(path) = self.photo_path.as_ref() else {
            self.photo_error = Some("Pass a photo path to identify a breed".to_string());
            return;
        };

        match preprocess::load_photo(path) {
            Ok(photo) => {
                log::info!(
                    "loaded {} ({}x{})",
                    path.display(),
                    photo.width(),
                    photo.height()
                );
                self.photo_image = render_util::photo_to_image(&photo.image);
                self.photo = Some(photo);
            }
            Err(err) => {
                log::error!("failed to load {}: {err}", path.display());
                self.photo_error = Some(format!("Could not open photo: {err}"));
            }
        }
    }

    fn submit_capture(&mut self) {
        let (Some(worker), Some(photo)) = (self.worker.as_mut(), self.photo.as_ref()) else {
            return;
        };
        worker.submit(photo.clone());
        self.notification = Some("Identifying breed...".to_string());
    }

    fn cancel_capture(&mut self) {
        if let Some(worker) = self.worker.as_mut() {
            worker.cancel();
        }
        self.notification = None;
    }

    fn is_classifying(&self) -> bool {
        self.worker.as_ref().is_some_and(ClassificationWorker::is_pending)
    }
}

impl Render for AppView {
    fn render(
        &mut self,
        window: &mut Window,
        cx: &mut Context<'_, Self>,
    ) -> impl gpui::IntoElement {
        cx.defer_in(window, |_, _, cx| {
            cx.notify();
        });

        let mut screen = mem::replace(&mut self.screen, Screen::Main);
        let view = match screen {
            Screen::Download(mut state) => {
                self.poll_download_events(&mut state);
                let should_switch = state.finished();
                let view = self.render_download_view(&state, cx);
                if should_switch {
                    self.start_worker_if_needed();
                    self.load_photo_if_needed();
                    screen = Screen::Main;
                } else {
                    screen = Screen::Download(state);
                }
                view
            }
            Screen::Main => {
                screen = Screen::Main;
                self.render_main(window, cx)
            }
        };
        self.screen = screen;
        view
    }
}
