use super::{
    AnyElement, AppView, Context, Hsla, InteractiveElement, IntoElement, ParentElement, Styled,
    Window, WindowControlArea, div, h_flex, px,
};

/// One status chip in the titlebar.
pub(super) struct StatusChip {
    pub color: Hsla,
    pub icon: &'static str,
    pub text: String,
}

impl AppView {
    pub(super) fn render_titlebar(
        &self,
        chips: Vec<StatusChip>,
        window: &mut Window,
        _cx: &mut Context<'_, Self>,
    ) -> AnyElement {
        let chips = chips.into_iter().fold(
            h_flex().gap_3().pl(px(80.0)).pr_3().h_full().items_center(),
            |row, chip| {
                row.child(
                    div()
                        .px_2()
                        .py_0p5()
                        .rounded_md()
                        .bg(gpui::rgba(0x00000033))
                        .text_xs()
                        .text_color(chip.color)
                        .child(format!("{} {}", chip.icon, chip.text)),
                )
            },
        );

        h_flex()
            .window_control_area(WindowControlArea::Drag)
            .h(px(32.0))
            .w_full()
            .items_center()
            .justify_between()
            .bg(gpui::rgb(0x1a2332))
            .child(chips)
            .child(render_window_controls(window))
            .into_any_element()
    }
}

#[cfg(target_os = "macos")]
fn render_window_controls(_window: &mut Window) -> AnyElement {
    // Traffic lights are drawn by the system.
    div().into_any_element()
}

#[cfg(not(target_os = "macos"))]
fn render_window_controls(window: &mut Window) -> AnyElement {
    let maximize_path = if window.is_maximized() {
        "M 5,3 H 13 V 11 M 3,5 H 11 V 13 H 3 Z"
    } else {
        "M 4,4 H 12 V 12 H 4 Z"
    };

    h_flex()
        .gap_1()
        .px_2()
        .child(control_button(
            "window-minimize",
            WindowControlArea::Min,
            "M 4,8 H 12",
            gpui::rgb(0x1f2428).into(),
        ))
        .child(control_button(
            "window-maximize",
            WindowControlArea::Max,
            maximize_path,
            gpui::rgb(0x1f2428).into(),
        ))
        .child(control_button(
            "window-close",
            WindowControlArea::Close,
            "M 4,4 L 12,12 M 12,4 L 4,12",
            gpui::rgb(0xe81123).into(),
        ))
        .into_any_element()
}

#[cfg(not(target_os = "macos"))]
fn control_button(
    id: &'static str,
    area: WindowControlArea,
    icon_path: &'static str,
    hover_bg: Hsla,
) -> AnyElement {
    div()
        .id(id)
        .size(px(28.0))
        .flex()
        .items_center()
        .justify_center()
        .rounded_md()
        .cursor_pointer()
        .window_control_area(area)
        .hover(move |s| s.bg(hover_bg))
        .child(
            gpui::svg()
                .size(px(16.0))
                .path(icon_path)
                .text_color(gpui::rgb(0xc9d1d9)),
        )
        .into_any_element()
}
