use super::{
    ActiveTheme, AnyElement, AppView, Button, ButtonVariants, Context, DownloadMessage,
    DownloadState, IntoElement, ModelDownloadEvent, ParentElement, Screen, SharedString, Sender,
    Styled, StyledExt, Tag, ViewerConfig, div, ensure_model_ready, h_flex, thread, v_flex,
};

impl AppView {
    pub(super) fn poll_download_events(&mut self, state: &mut DownloadState) {
        while let Ok(msg) = self.download_rx.try_recv() {
            match msg {
                DownloadMessage::Event(ModelDownloadEvent::AlreadyPresent { model }) => {
                    state.message = format!("Found {} on disk", model.label());
                }
                DownloadMessage::Event(ModelDownloadEvent::Started { model, total }) => {
                    state.downloaded = 0;
                    state.total = total;
                    state.message = format!("Downloading {}...", model.label());
                }
                DownloadMessage::Event(ModelDownloadEvent::Progress {
                    model,
                    downloaded,
                    total,
                }) => {
                    state.downloaded = downloaded;
                    state.total = total;
                    state.message = format!("Downloading {}...", model.label());
                }
                DownloadMessage::Event(ModelDownloadEvent::Finished { model }) => {
                    state.models_ready += 1;
                    state.message = format!("{} ready", model.label());
                }
                DownloadMessage::Error(err) => {
                    state.error = Some(err);
                    state.message = "Model preparation failed".to_string();
                }
            }
        }
    }

    pub(super) fn render_download_view(
        &self,
        state: &DownloadState,
        cx: &mut Context<'_, Self>,
    ) -> AnyElement {
        let theme = cx.theme();
        let bar = progress_bar_string(state.downloaded, state.total);
        let detail = match state.total {
            Some(total) if total > 0 => {
                let percent = (state.downloaded as f64 / total as f64 * 100.0).clamp(0.0, 100.0);
                format!("{percent:.1}% ({} of 2 models ready)", state.models_ready)
            }
            _ => format!("{} of 2 models ready", state.models_ready),
        };

        let (status_icon, status_text, status_color) = if state.error.is_some() {
            ("✗", "Models unavailable", theme.accent)
        } else if state.finished() {
            ("✓", "Models ready", theme.success)
        } else {
            ("⟳", "Preparing models", theme.foreground)
        };

        let mut container = v_flex()
            .gap_3()
            .p_6()
            .rounded_lg()
            .border_1()
            .border_color(theme.border)
            .bg(theme.group_box)
            .child(
                h_flex()
                    .gap_2()
                    .items_center()
                    .child(
                        div()
                            .text_color(status_color)
                            .font_semibold()
                            .child(format!("{status_icon} {status_text}")),
                    )
                    .child(
                        div()
                            .text_sm()
                            .text_color(theme.muted_foreground)
                            .child("Animal detector and breed classifier"),
                    ),
            )
            .child(
                div()
                    .px_3()
                    .py_2()
                    .rounded_md()
                    .border_1()
                    .border_color(theme.border)
                    .bg(theme.muted)
                    .font_family(theme.mono_font_family.clone())
                    .text_color(theme.foreground)
                    .child(bar),
            )
            .child(
                div()
                    .text_sm()
                    .text_color(theme.muted_foreground)
                    .child(detail),
            )
            .child(
                div()
                    .text_color(theme.foreground)
                    .child(state.message.clone()),
            );

        if let Some(err) = &state.error {
            container = container
                .child(Tag::danger().rounded_full().child(format!("Error: {err}")))
                .child(
                    Button::new(SharedString::from("skip-models"))
                        .outline()
                        .label("Continue without recognition")
                        .on_click(cx.listener(|this, _, _, cx| {
                            if let Screen::Download(state) = &mut this.screen {
                                state.skipped = true;
                            }
                            cx.notify();
                        })),
                );
        }

        v_flex()
            .size_full()
            .items_center()
            .justify_center()
            .bg(theme.background)
            .child(container)
            .into_any_element()
    }
}

/// Provisions both models in order, stopping at the first failure.
pub(super) fn spawn_model_download(
    config: ViewerConfig,
    tx: Sender<DownloadMessage>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        for source in [&config.animal_model, &config.breed_model] {
            let result = ensure_model_ready(source, |event| {
                let _ = tx.send(DownloadMessage::Event(event));
            });

            if let Err(err) = result {
                log::error!("failed to prepare {}: {err:?}", source.kind.label());
                let _ = tx.send(DownloadMessage::Error(format!("{err:#}")));
                return;
            }
        }
    })
}

fn progress_bar_string(downloaded: u64, total: Option<u64>) -> String {
    const BAR_LEN: usize = 30;
    match total {
        Some(total) if total > 0 => {
            let pct = (downloaded as f64 / total as f64).clamp(0.0, 1.0);
            let filled = ((pct * BAR_LEN as f64).round() as usize).min(BAR_LEN);
            format!(
                "[{}{}] {:>5.1}%",
                "=".repeat(filled),
                " ".repeat(BAR_LEN - filled),
                pct * 100.0
            )
        }
        _ if downloaded == 0 => format!("[{}]", " ".repeat(BAR_LEN)),
        _ => format!("[{:>width$}] {} KB", ">", downloaded / 1024, width = BAR_LEN),
    }
}
