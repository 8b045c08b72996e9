use breed_viewer::{
    pipeline::breed_assets,
    viewer::{ViewMode, clock::progress_to_seconds, simulated::ViewerStatus},
};

use super::titlebar::StatusChip;
use super::{
    ActiveTheme, AnyElement, AppView, Button, ButtonVariants, CONTROL_PANEL_WIDTH, Context,
    FluentBuilder, InteractiveElement, IntoElement, MouseButton, MouseDownEvent, MouseMoveEvent,
    MouseUpEvent, ParentElement, ScrubState, Selectable, SharedString, Styled, TIMELINE_WIDTH,
    Window, div, h_flex, px, v_flex,
};

impl AppView {
    pub(super) fn render_main(
        &mut self,
        window: &mut Window,
        cx: &mut Context<'_, Self>,
    ) -> AnyElement {
        self.poll_captures();
        self.poll_progress();

        let status = self.viewer.status();
        let theme = cx.theme();

        let classifier_chip = if self.worker.is_none() {
            StatusChip {
                color: theme.muted_foreground,
                icon: "○",
                text: "Recognition offline".to_string(),
            }
        } else if self.is_classifying() {
            StatusChip {
                color: theme.foreground,
                icon: "⟳",
                text: "Identifying breed".to_string(),
            }
        } else {
            StatusChip {
                color: theme.success,
                icon: "●",
                text: "Recognition ready".to_string(),
            }
        };
        let viewer_chip = match (&status.asset, status.loading) {
            (Some(asset), true) => StatusChip {
                color: theme.foreground,
                icon: "⟳",
                text: format!("Loading {asset}"),
            },
            (Some(asset), false) => StatusChip {
                color: theme.success,
                icon: "●",
                text: asset.clone(),
            },
            (None, _) => StatusChip {
                color: theme.muted_foreground,
                icon: "○",
                text: "No model".to_string(),
            },
        };

        let stage = self.render_stage(&status, cx);
        let playback = self
            .session
            .playback_controls_visible()
            .then(|| self.render_playback(&status, cx));
        let controls = self.render_controls(cx);
        let titlebar = self.render_titlebar(vec![classifier_chip, viewer_chip], window, cx);

        v_flex()
            .size_full()
            .bg(gpui::rgb(0x1a2332))
            .when(self.scrub_state.is_some(), |this| this.cursor_ew_resize())
            .on_mouse_move(cx.listener(Self::update_scrub))
            .on_mouse_up(MouseButton::Left, cx.listener(Self::finish_scrub))
            .child(titlebar)
            .child(
                h_flex()
                    .flex_1()
                    .gap_3()
                    .p_4()
                    .items_start()
                    .child(
                        v_flex()
                            .flex_1()
                            .h_full()
                            .gap_3()
                            .child(stage)
                            .children(playback),
                    )
                    .child(
                        div()
                            .w(px(CONTROL_PANEL_WIDTH))
                            .h_full()
                            .overflow_hidden()
                            .child(controls),
                    ),
            )
            .into_any_element()
    }

    fn poll_captures(&mut self) {
        while let Ok(result) = self.capture_rx.try_recv() {
            let Some(worker) = self.worker.as_mut() else {
                continue;
            };
            if let Some(outcome) = worker.accept(result) {
                let text = self.session.apply_capture(&outcome);
                log::info!("{text}");
                self.notification = Some(text);
                self.last_outcome = Some(outcome);
            }
        }
    }

    fn poll_progress(&mut self) {
        let scrubbing = self.scrub_state.is_some() || self.session.clock().is_user_scrubbing();
        while let Ok(progress) = self.progress_rx.try_recv() {
            // The drag owns the displayed position until it ends.
            if !scrubbing {
                self.displayed_progress = progress;
            }
        }
    }

    fn render_stage(&self, status: &ViewerStatus, cx: &mut Context<'_, Self>) -> AnyElement {
        let theme = cx.theme();

        let headline = match (&status.asset, status.loading) {
            (Some(asset), true) => format!("Loading {asset}..."),
            (Some(asset), false) => asset.clone(),
            (None, _) => "Identify a dog to load its model".to_string(),
        };

        let mode_line = format!(
            "{} mode · x-ray {} · sensitivity {:.2}",
            if status.transform_mode { "Transform" } else { "View" },
            if status.xray_skeleton { "on" } else { "off" },
            status.camera_sensitivity,
        );

        let mut stage = v_flex()
            .flex_1()
            .w_full()
            .gap_2()
            .p_4()
            .rounded_lg()
            .bg(gpui::rgb(0x0f1419))
            .items_center()
            .justify_center()
            .child(
                div()
                    .text_xl()
                    .text_color(gpui::rgb(0xe2e8f0))
                    .child(headline),
            )
            .child(
                div()
                    .text_xs()
                    .text_color(theme.muted_foreground)
                    .child(mode_line),
            );

        stage = match self.session.active_panel() {
            ViewMode::BreedPicker => stage.child(self.render_breed_picker(status, cx)),
            ViewMode::AnimationPicker => stage.child(
                div()
                    .text_sm()
                    .text_color(gpui::rgb(0xa0aab8))
                    .child("Animations: idle loop"),
            ),
            ViewMode::JointEditor => stage.child(
                div()
                    .text_sm()
                    .text_color(gpui::rgb(0xfacc15))
                    .child("Joint editor active"),
            ),
            ViewMode::None => stage,
        };

        stage.into_any_element()
    }

    fn render_breed_picker(
        &self,
        status: &ViewerStatus,
        cx: &mut Context<'_, Self>,
    ) -> AnyElement {
        breed_assets::asset_names()
            .into_iter()
            .enumerate()
            .fold(
                h_flex().flex_wrap().gap_2().max_w(px(TIMELINE_WIDTH)),
                |list, (idx, name)| {
                    let is_selected = status.asset.as_deref() == Some(name);
                    list.child(
                        Button::new(SharedString::from(format!("breed-asset-{idx}")))
                            .label(name)
                            .selected(is_selected)
                            .outline()
                            .on_click(cx.listener(move |this, _, _, cx| {
                                this.scrub_state = None;
                                if let Err(err) = this.session.load_asset(Some(name)) {
                                    log::warn!("failed to load {name}: {err}");
                                }
                                this.displayed_progress = 0;
                                cx.notify();
                            })),
                    )
                },
            )
            .into_any_element()
    }

    fn render_playback(&self, status: &ViewerStatus, cx: &mut Context<'_, Self>) -> AnyElement {
        let theme = cx.theme();
        let progress_max = self.session.clock().progress_max();
        let fraction = progress_max
            .filter(|max| *max > 0)
            .map(|max| (self.displayed_progress as f32 / max as f32).clamp(0.0, 1.0))
            .unwrap_or(0.0);

        let time_label = match progress_max {
            Some(max) => format!(
                "{:.2}s / {:.2}s",
                progress_to_seconds(self.displayed_progress),
                progress_to_seconds(max)
            ),
            None => "--".to_string(),
        };

        let timeline = div()
            .id("timeline")
            .relative()
            .w(px(TIMELINE_WIDTH))
            .h(px(10.0))
            .rounded_full()
            .bg(theme.muted)
            .cursor_ew_resize()
            .on_mouse_down(MouseButton::Left, cx.listener(Self::start_scrub))
            .on_mouse_up(MouseButton::Left, cx.listener(Self::finish_scrub))
            .on_mouse_up_out(MouseButton::Left, cx.listener(Self::finish_scrub))
            .child(
                div()
                    .absolute()
                    .left(px(0.0))
                    .top(px(0.0))
                    .h_full()
                    .w(px(TIMELINE_WIDTH * fraction))
                    .rounded_full()
                    .bg(if self.scrub_state.is_some() {
                        gpui::rgb(0xfacc15)
                    } else {
                        gpui::rgb(0x60a5fa)
                    }),
            );

        let play_label = if status.playing { "❚❚ Pause" } else { "▶ Play" };

        v_flex()
            .gap_2()
            .p_3()
            .rounded_lg()
            .bg(gpui::rgb(0x0f1419))
            .child(
                h_flex()
                    .gap_2()
                    .items_center()
                    .child(
                        Button::new(SharedString::from("jump-backward"))
                            .ghost()
                            .label("◀◀")
                            .on_click(cx.listener(|this, _, _, cx| {
                                if let Err(err) = this.session.jump_backward() {
                                    log::debug!("jump backward ignored: {err}");
                                }
                                cx.notify();
                            })),
                    )
                    .child(
                        Button::new(SharedString::from("play-pause"))
                            .primary()
                            .label(play_label)
                            .on_click(cx.listener(|this, _, _, cx| {
                                if let Err(err) = this.session.toggle_play_pause() {
                                    log::debug!("play/pause ignored: {err}");
                                }
                                cx.notify();
                            })),
                    )
                    .child(
                        Button::new(SharedString::from("jump-forward"))
                            .ghost()
                            .label("▶▶")
                            .on_click(cx.listener(|this, _, _, cx| {
                                if let Err(err) = this.session.jump_forward() {
                                    log::debug!("jump forward ignored: {err}");
                                }
                                cx.notify();
                            })),
                    )
                    .child(
                        div()
                            .text_xs()
                            .text_color(theme.muted_foreground)
                            .child(time_label),
                    ),
            )
            .child(timeline)
            .into_any_element()
    }

    fn start_scrub(&mut self, event: &MouseDownEvent, _: &mut Window, cx: &mut Context<'_, Self>) {
        if let Err(err) = self.session.begin_scrub() {
            log::debug!("scrub ignored: {err}");
            return;
        }
        self.scrub_state = Some(ScrubState {
            start_pointer_x: f32::from(event.position.x),
            start_progress: self.displayed_progress,
        });
        cx.notify();
    }

    fn update_scrub(&mut self, event: &MouseMoveEvent, _: &mut Window, cx: &mut Context<'_, Self>) {
        let Some(state) = self.scrub_state else {
            return;
        };
        if !event.dragging() {
            self.end_scrub();
            cx.notify();
            return;
        }
        let Some(max) = self.session.clock().progress_max() else {
            return;
        };

        let delta_x = f32::from(event.position.x) - state.start_pointer_x;
        let delta = delta_x / TIMELINE_WIDTH * max as f32;
        let target = (state.start_progress as f32 + delta).clamp(0.0, max as f32).round() as u64;
        if target == self.displayed_progress {
            return;
        }
        match self.session.scrub_to(target) {
            Ok(()) => self.displayed_progress = target,
            Err(err) => log::debug!("scrub to {target} failed: {err}"),
        }
        cx.notify();
    }

    fn finish_scrub(&mut self, _: &MouseUpEvent, _: &mut Window, cx: &mut Context<'_, Self>) {
        if self.scrub_state.is_some() {
            self.end_scrub();
            cx.notify();
        }
    }

    fn end_scrub(&mut self) {
        self.scrub_state = None;
        if let Err(err) = self.session.end_scrub() {
            log::debug!("end scrub ignored: {err}");
        }
    }
}
