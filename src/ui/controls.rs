use breed_viewer::{types::CaptureOutcome, viewer::ViewMode};

use super::{
    ActiveTheme, AnyElement, AppView, Button, ButtonVariants, Context, IntoElement, ObjectFit,
    ParentElement, SENSITIVITY_STEP, Selectable, SharedString, Styled, StyledExt, StyledImage,
    THUMBNAIL_SIZE, div, h_flex, img, px, v_flex,
};

impl AppView {
    pub(super) fn render_controls(&self, cx: &mut Context<'_, Self>) -> AnyElement {
        let mut panel = v_flex()
            .gap_3()
            .child(self.render_capture_card(cx))
            .child(
                Button::new(SharedString::from("menu-toggle"))
                    .ghost()
                    .label(if self.session.menu_visible() {
                        "Hide menu"
                    } else {
                        "Show menu"
                    })
                    .on_click(cx.listener(|this, _, _, cx| {
                        this.session.toggle_menu();
                        cx.notify();
                    })),
            );

        if self.session.menu_visible() {
            panel = panel.child(self.render_menu(cx));
        }

        panel.into_any_element()
    }

    fn render_capture_card(&self, cx: &mut Context<'_, Self>) -> AnyElement {
        let theme = cx.theme();

        let preview: AnyElement = match (&self.photo_image, &self.photo_error) {
            (Some(image), _) => img(image.clone())
                .w(px(THUMBNAIL_SIZE))
                .h(px(THUMBNAIL_SIZE * 0.75))
                .object_fit(ObjectFit::Contain)
                .rounded_t_lg()
                .into_any_element(),
            (None, Some(err)) => div()
                .p_3()
                .text_xs()
                .text_color(gpui::rgb(0xfca5a5))
                .child(err.clone())
                .into_any_element(),
            (None, None) => div()
                .p_3()
                .text_xs()
                .text_color(gpui::rgb(0x8b95a5))
                .child("Waiting for models...")
                .into_any_element(),
        };

        let photo_label = self
            .photo_path
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "No photo".to_string());

        let mut buttons = h_flex().gap_2().child(
            Button::new(SharedString::from("capture"))
                .primary()
                .label("Identify breed")
                .on_click(cx.listener(|this, _, _, cx| {
                    this.submit_capture();
                    cx.notify();
                })),
        );
        if self.is_classifying() {
            buttons = buttons.child(
                Button::new(SharedString::from("capture-cancel"))
                    .outline()
                    .label("Cancel")
                    .on_click(cx.listener(|this, _, _, cx| {
                        this.cancel_capture();
                        cx.notify();
                    })),
            );
        }

        let mut body = v_flex()
            .gap_2()
            .p_3()
            .child(
                div()
                    .text_xs()
                    .text_color(theme.muted_foreground)
                    .overflow_hidden()
                    .text_ellipsis()
                    .whitespace_nowrap()
                    .child(photo_label),
            )
            .child(buttons);

        if let Some(text) = &self.notification {
            let color = match &self.last_outcome {
                Some(outcome) if outcome.asset().is_some() => theme.success,
                Some(CaptureOutcome::Breed { .. }) => gpui::rgb(0xfacc15).into(),
                _ => theme.foreground,
            };
            body = body.child(
                div()
                    .px_2()
                    .py_1()
                    .rounded_md()
                    .bg(gpui::rgba(0x00000033))
                    .text_sm()
                    .text_color(color)
                    .child(text.clone()),
            );
        }

        if let Some(CaptureOutcome::Breed { candidates, .. }) = &self.last_outcome {
            body = candidates.iter().fold(body, |body, candidate| {
                body.child(
                    div()
                        .text_xs()
                        .text_color(gpui::rgb(0xa0aab8))
                        .child(format!("#{} {}", candidate.id, candidate.display_text())),
                )
            });
        }

        v_flex()
            .w_full()
            .rounded_lg()
            .overflow_hidden()
            .bg(gpui::rgb(0x0f1419))
            .child(preview)
            .child(body)
            .into_any_element()
    }

    fn render_menu(&self, cx: &mut Context<'_, Self>) -> AnyElement {
        let theme = cx.theme();
        let active = self.session.active_panel();

        let panels = ViewMode::PANELS.iter().fold(h_flex().gap_2(), |row, &panel| {
            row.child(
                Button::new(SharedString::from(format!("panel-{}", panel.label())))
                    .label(panel.label())
                    .selected(active == panel)
                    .outline()
                    .on_click(cx.listener(move |this, _, _, cx| {
                        this.session.select_panel(panel);
                        cx.notify();
                    })),
            )
        });

        let transform = self.session.transform_mode();
        let mode_row = h_flex()
            .gap_2()
            .child(
                Button::new(SharedString::from("mode-view"))
                    .label("View")
                    .selected(!transform)
                    .outline()
                    .on_click(cx.listener(|this, _, _, cx| {
                        this.session.set_transform_mode(false);
                        cx.notify();
                    })),
            )
            .child(
                Button::new(SharedString::from("mode-transform"))
                    .label("Transform")
                    .selected(transform)
                    .outline()
                    .on_click(cx.listener(|this, _, _, cx| {
                        this.session.set_transform_mode(true);
                        cx.notify();
                    })),
            )
            .child(
                Button::new(SharedString::from("xray"))
                    .label("X-ray")
                    .selected(self.session.xray())
                    .outline()
                    .on_click(cx.listener(|this, _, _, cx| {
                        this.session.toggle_xray();
                        cx.notify();
                    })),
            );

        let sensitivity = self.session.sensitivity_percent();
        let sensitivity_row = h_flex()
            .gap_2()
            .items_center()
            .child(
                div()
                    .text_xs()
                    .text_color(theme.muted_foreground)
                    .child("Camera sensitivity"),
            )
            .child(
                Button::new(SharedString::from("sensitivity-down"))
                    .ghost()
                    .label("−")
                    .on_click(cx.listener(|this, _, _, cx| {
                        let percent = this.session.sensitivity_percent();
                        this.session
                            .set_sensitivity_percent(percent.saturating_sub(SENSITIVITY_STEP));
                        cx.notify();
                    })),
            )
            .child(
                div()
                    .text_sm()
                    .text_color(theme.foreground)
                    .child(format!("{sensitivity}%")),
            )
            .child(
                Button::new(SharedString::from("sensitivity-up"))
                    .ghost()
                    .label("+")
                    .on_click(cx.listener(|this, _, _, cx| {
                        let percent = this.session.sensitivity_percent();
                        this.session
                            .set_sensitivity_percent(percent.saturating_add(SENSITIVITY_STEP));
                        cx.notify();
                    })),
            );

        v_flex()
            .gap_3()
            .p_3()
            .rounded_lg()
            .border_1()
            .border_color(theme.border)
            .bg(theme.group_box)
            .child(
                div()
                    .text_sm()
                    .font_semibold()
                    .text_color(theme.foreground)
                    .child("Viewer"),
            )
            .child(panels)
            .child(mode_row)
            .child(sensitivity_row)
            .into_any_element()
    }
}
