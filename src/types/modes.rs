//! Interaction modes of the in-page rule editor.

/// An edit mode the user can activate from the popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    /// Clicked elements are added to the site's hidden list.
    Mark,
    /// Clicked elements get a floating adjustment control for rescaling.
    Rescale,
}

impl EditMode {
    /// Parses the wire name used on the command channel.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "mark" => Some(EditMode::Mark),
            "rescale" => Some(EditMode::Rescale),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EditMode::Mark => "mark",
            EditMode::Rescale => "rescale",
        }
    }

    /// Label shown on the status badge while the mode is active.
    pub fn badge_label(self) -> &'static str {
        match self {
            EditMode::Mark => "HIDE MODE",
            EditMode::Rescale => "RESIZE MODE",
        }
    }

    /// Accent color used for the badge background and hover outline.
    pub fn accent_color(self) -> &'static str {
        match self {
            EditMode::Mark => "#e74c3c",
            EditMode::Rescale => "#9b59b6",
        }
    }

    /// Cursor shown over hover candidates in this mode.
    pub fn cursor(self) -> &'static str {
        match self {
            EditMode::Mark => "pointer",
            EditMode::Rescale => "zoom-in",
        }
    }
}

/// The controller's externally visible state.
///
/// Internally the controller tracks an optional edit mode plus a restoring
/// flag; policy keeps them mutually exclusive, and this enum is the collapsed
/// view of that pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeState {
    Idle,
    Marking,
    Rescaling,
    Restoring,
}

impl ModeState {
    pub fn name(self) -> &'static str {
        match self {
            ModeState::Idle => "idle",
            ModeState::Marking => "marking",
            ModeState::Rescaling => "rescaling",
            ModeState::Restoring => "restoring",
        }
    }
}
