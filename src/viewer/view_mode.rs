/// The mutually exclusive overlay panels of the viewer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ViewMode {
    #[default]
    None,
    BreedPicker,
    JointEditor,
    AnimationPicker,
}

impl ViewMode {
    pub const PANELS: [ViewMode; 3] = [
        ViewMode::BreedPicker,
        ViewMode::JointEditor,
        ViewMode::AnimationPicker,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::None => "None",
            ViewMode::BreedPicker => "Breeds",
            ViewMode::JointEditor => "Joints",
            ViewMode::AnimationPicker => "Animations",
        }
    }

    /// Selecting the active panel again closes it.
    pub fn toggled(self, panel: ViewMode) -> ViewMode {
        if panel == self { ViewMode::None } else { panel }
    }
}

/// What changed on a selection; the caller switches the renderer panels off
/// before switching the new one on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PanelTransition {
    pub deactivated: Option<ViewMode>,
    pub activated: Option<ViewMode>,
}

impl PanelTransition {
    pub fn is_noop(&self) -> bool {
        self.deactivated.is_none() && self.activated.is_none()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewModeSelection {
    active: ViewMode,
}

impl ViewModeSelection {
    pub fn active(&self) -> ViewMode {
        self.active
    }

    pub fn is_active(&self, panel: ViewMode) -> bool {
        panel != ViewMode::None && self.active == panel
    }

    pub fn select(&mut self, panel: ViewMode) -> PanelTransition {
        self.transition_to(self.active.toggled(panel))
    }

    pub fn clear(&mut self) -> PanelTransition {
        self.transition_to(ViewMode::None)
    }

    fn transition_to(&mut self, next: ViewMode) -> PanelTransition {
        let previous = std::mem::replace(&mut self.active, next);
        if previous == next {
            return PanelTransition::default();
        }
        PanelTransition {
            deactivated: (previous != ViewMode::None).then_some(previous),
            activated: (next != ViewMode::None).then_some(next),
        }
    }
}
