//! Button components: toggle tool buttons and text action buttons.

use egui::{
    vec2, Align2, Color32, CornerRadius, CursorIcon, FontId, Response, Sense, Stroke, StrokeKind,
    Ui,
};

use crate::{sizing, theme};

/// A labeled toggle button: solid accent fill when selected, subtle hover
/// otherwise. Used for tool selection (brush/eraser) and similar
/// mutually-exclusive choices.
pub struct ToggleButton<'a> {
    label: &'a str,
    tooltip: Option<&'a str>,
    selected: bool,
    min_width: f32,
}

impl<'a> ToggleButton<'a> {
    /// Create a toggle button with the given label.
    pub fn new(label: &'a str) -> Self {
        Self {
            label,
            tooltip: None,
            selected: false,
            min_width: 64.0,
        }
    }

    /// Set whether the button is selected/active.
    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Set a hover tooltip.
    pub fn tooltip(mut self, tooltip: &'a str) -> Self {
        self.tooltip = Some(tooltip);
        self
    }

    /// Set a minimum width.
    pub fn min_width(mut self, min_width: f32) -> Self {
        self.min_width = min_width;
        self
    }

    /// Render the button, returning the interaction response.
    pub fn show(self, ui: &mut Ui) -> Response {
        let font = FontId::proportional(13.0);
        let text_width = ui
            .painter()
            .layout_no_wrap(self.label.to_string(), font.clone(), Color32::WHITE)
            .size()
            .x;
        let size = vec2(
            (text_width + 24.0).max(self.min_width),
            sizing::BUTTON_HEIGHT,
        );

        let (rect, response) = ui.allocate_exact_size(size, Sense::click());
        if ui.is_rect_visible(rect) {
            let (fill, text_color) = if self.selected {
                (theme::ACCENT, theme::ON_ACCENT)
            } else if response.hovered() {
                (theme::HOVER_BG, theme::TEXT)
            } else {
                (theme::PANEL_BG, theme::TEXT_MUTED)
            };

            let radius = CornerRadius::same(sizing::CORNER_RADIUS);
            ui.painter().rect_filled(rect, radius, fill);
            if !self.selected {
                ui.painter().rect_stroke(
                    rect,
                    radius,
                    Stroke::new(1.0, theme::BORDER),
                    StrokeKind::Inside,
                );
            }
            ui.painter().text(
                rect.center(),
                Align2::CENTER_CENTER,
                self.label,
                font,
                text_color,
            );
        }

        let response = response.on_hover_cursor(CursorIcon::PointingHand);
        match self.tooltip {
            Some(tooltip) => response.on_hover_text(tooltip),
            None => response,
        }
    }
}

/// A filled call-to-action button in the given color.
fn action_button(ui: &mut Ui, label: &str, fill: Color32, text_color: Color32) -> Response {
    let font = FontId::proportional(14.0);
    let text_width = ui
        .painter()
        .layout_no_wrap(label.to_string(), font.clone(), Color32::WHITE)
        .size()
        .x;
    let size = vec2(text_width + 32.0, sizing::BUTTON_HEIGHT + 4.0);

    let (rect, response) = ui.allocate_exact_size(size, Sense::click());
    if ui.is_rect_visible(rect) {
        let fill = if response.hovered() {
            fill.gamma_multiply(1.15)
        } else {
            fill
        };
        ui.painter()
            .rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), fill);
        ui.painter()
            .text(rect.center(), Align2::CENTER_CENTER, label, font, text_color);
    }
    response.on_hover_cursor(CursorIcon::PointingHand)
}

/// Accent-colored primary action button.
pub fn primary_button(ui: &mut Ui, label: &str) -> Response {
    action_button(ui, label, theme::ACCENT, theme::ON_ACCENT)
}

/// Neutral secondary action button.
pub fn secondary_button(ui: &mut Ui, label: &str) -> Response {
    action_button(ui, label, theme::HOVER_BG, theme::TEXT)
}

/// Teal confirm button (apply/save/download actions).
pub fn confirm_button(ui: &mut Ui, label: &str) -> Response {
    action_button(ui, label, theme::CONFIRM, theme::TEXT)
}
