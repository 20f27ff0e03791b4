//! Reusable egui widget components for the Retouche UI.
//!
//! - **Buttons**: toggle tool buttons and primary/secondary text buttons
//! - **Layout**: section labels, separators, panel frames

pub mod buttons;
pub mod layout;

pub use buttons::{confirm_button, primary_button, secondary_button, ToggleButton};
pub use layout::{panel_frame, section_label, vertical_separator};

/// Standard sizing constants used across widgets.
pub mod sizing {
    /// Toolbar button height.
    pub const BUTTON_HEIGHT: f32 = 28.0;
    /// Standard corner radius.
    pub const CORNER_RADIUS: u8 = 6;
    /// Panel corner radius.
    pub const PANEL_RADIUS: u8 = 10;
}

/// Standard colors used across widgets (dark UI, amber accent).
pub mod theme {
    use egui::Color32;

    /// Window background.
    pub const BG: Color32 = Color32::from_rgb(17, 24, 39);
    /// Panel background.
    pub const PANEL_BG: Color32 = Color32::from_rgb(31, 41, 55);
    /// Recessed input background.
    pub const INPUT_BG: Color32 = Color32::from_rgb(12, 17, 28);
    /// Border color.
    pub const BORDER: Color32 = Color32::from_rgb(55, 65, 81);
    /// Body text.
    pub const TEXT: Color32 = Color32::from_rgb(243, 244, 246);
    /// Muted text.
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(156, 163, 175);
    /// Accent (amber).
    pub const ACCENT: Color32 = Color32::from_rgb(245, 158, 11);
    /// Accent hover (lighter amber).
    pub const ACCENT_HOVER: Color32 = Color32::from_rgb(251, 191, 36);
    /// Text drawn on top of the accent.
    pub const ON_ACCENT: Color32 = Color32::from_rgb(17, 24, 39);
    /// Confirm actions (teal).
    pub const CONFIRM: Color32 = Color32::from_rgb(13, 148, 136);
    /// Error text.
    pub const ERROR: Color32 = Color32::from_rgb(248, 113, 113);
    /// Hover background for neutral buttons.
    pub const HOVER_BG: Color32 = Color32::from_rgb(55, 65, 81);
}
