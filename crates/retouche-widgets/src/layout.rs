//! Layout helpers: section labels, separators, panel frames.

use egui::{CornerRadius, Frame, Margin, RichText, Stroke, Ui};

use crate::{sizing, theme};

/// A small muted uppercase section label.
pub fn section_label(ui: &mut Ui, text: &str) {
    ui.label(
        RichText::new(text.to_uppercase())
            .size(11.0)
            .color(theme::TEXT_MUTED),
    );
}

/// A thin vertical separator for toolbars.
pub fn vertical_separator(ui: &mut Ui) {
    let height = sizing::BUTTON_HEIGHT;
    let (rect, _) = ui.allocate_exact_size(egui::vec2(1.0, height), egui::Sense::hover());
    ui.painter()
        .line_segment([rect.center_top(), rect.center_bottom()], Stroke::new(1.0, theme::BORDER));
}

/// The standard rounded, bordered panel frame.
pub fn panel_frame() -> Frame {
    Frame::new()
        .fill(theme::PANEL_BG)
        .stroke(Stroke::new(1.0, theme::BORDER))
        .corner_radius(CornerRadius::same(sizing::PANEL_RADIUS))
        .inner_margin(Margin::same(12))
}
