// Keybindings for the product gallery
// Handles overlay navigation; the inline gallery uses on-screen controls only
//
// Keybindings (overlay open):
// - Escape: Close overlay
// - ArrowLeft: Previous item
// - ArrowRight: Next item

/// Keys the gallery reacts to, parsed from DOM-style key names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Other,
}

impl Key {
    /// Parses a key name as reported by the host (`KeyboardEvent.key` style).
    pub fn from_name(name: &str) -> Self {
        match name {
            "Escape" | "Esc" => Key::Escape,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            _ => Key::Other,
        }
    }
}

/// Current view mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Inline,
    Overlay,
}

/// Action requested by a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayAction {
    Close,
    Previous,
    Next,
}

/// Maps a key press to an action for the given view mode.
///
/// Returns `None` when the key is not handled, so the host may let it
/// propagate.
pub fn action_for(mode: ViewMode, key: Key) -> Option<OverlayAction> {
    if mode != ViewMode::Overlay {
        return None;
    }

    match key {
        Key::Escape => Some(OverlayAction::Close),
        Key::ArrowLeft => Some(OverlayAction::Previous),
        Key::ArrowRight => Some(OverlayAction::Next),
        Key::Other => None,
    }
}
