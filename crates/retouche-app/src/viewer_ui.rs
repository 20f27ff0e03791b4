//! Zoomable image viewer: scroll to zoom about the cursor, drag to pan.

use egui::{
    vec2, Align2, Color32, CornerRadius, CursorIcon, FontId, Pos2, Rect, Sense, TextureHandle, Ui,
};
use kurbo::Point;
use retouche_core::{geometry, ZoomPan};
use retouche_widgets::theme;

/// Fixed viewer height, matching the result panel layout.
const VIEWER_HEIGHT: f32 = 380.0;

/// One mounted viewer instance. Dropped (and with it the view transform)
/// whenever the displayed image changes.
pub struct ZoomableImage {
    zoom: ZoomPan,
}

impl Default for ZoomableImage {
    fn default() -> Self {
        Self::new()
    }
}

impl ZoomableImage {
    /// Create a viewer at rest.
    pub fn new() -> Self {
        Self {
            zoom: ZoomPan::new(),
        }
    }

    /// Render the image inside a fixed-height frame with contain layout,
    /// applying the current zoom/pan transform.
    pub fn show(&mut self, ui: &mut Ui, texture: &TextureHandle, source_dims: (u32, u32)) {
        let width = ui.available_width();
        let (frame_rect, response) =
            ui.allocate_exact_size(vec2(width, VIEWER_HEIGHT), Sense::drag());
        if !ui.is_rect_visible(frame_rect) {
            return;
        }

        let painter = ui.painter().with_clip_rect(frame_rect);
        painter.rect_filled(frame_rect, CornerRadius::same(8), theme::INPUT_BG);

        // Input first so the transform drawn this frame is current. The
        // wheel delta is consumed here so the surrounding scroll area does
        // not also scroll the page while zooming.
        if let Some(hover) = response.hover_pos() {
            let scroll = ui.input_mut(|i| {
                let delta = i.raw_scroll_delta.y;
                if delta != 0.0 {
                    i.raw_scroll_delta = egui::Vec2::ZERO;
                    i.smooth_scroll_delta = egui::Vec2::ZERO;
                }
                delta
            });
            if scroll != 0.0 {
                self.zoom
                    .handle_wheel(local_point(hover, frame_rect), f64::from(scroll));
            }
        }
        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.zoom.pointer_down(local_point(pos, frame_rect));
            }
        }
        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.zoom.pointer_move(local_point(pos, frame_rect));
            }
        }
        if response.drag_stopped() {
            self.zoom.pointer_up();
        }

        // Contain box in frame-local coordinates, then the view transform
        // (screen = translate + scale * local).
        let outer = kurbo::Rect::new(0.0, 0.0, f64::from(width), f64::from(VIEWER_HEIGHT));
        if let Some(contain) = geometry::contain_box(outer, source_dims.0, source_dims.1) {
            let t = self.zoom.transform();
            let min = frame_rect.min
                + vec2(
                    (t.translate.x + t.scale * contain.x0) as f32,
                    (t.translate.y + t.scale * contain.y0) as f32,
                );
            let size = vec2(
                (t.scale * contain.width()) as f32,
                (t.scale * contain.height()) as f32,
            );
            painter.image(
                texture.id(),
                Rect::from_min_size(min, size),
                Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                Color32::WHITE,
            );
        }

        if self.zoom.is_zoomed() {
            let cursor = if self.zoom.is_dragging() {
                CursorIcon::Grabbing
            } else {
                CursorIcon::Grab
            };
            response.clone().on_hover_cursor(cursor);

            let reset_rect = Rect::from_min_size(
                frame_rect.right_top() + vec2(-40.0, 8.0),
                vec2(32.0, 24.0),
            );
            if ui
                .put(reset_rect, egui::Button::new("⟲").small())
                .on_hover_text("Reset zoom and pan")
                .clicked()
            {
                self.zoom.reset();
            }
        } else if response.hovered() {
            painter.text(
                frame_rect.center_bottom() + vec2(0.0, -12.0),
                Align2::CENTER_CENTER,
                "Scroll to zoom",
                FontId::proportional(11.0),
                theme::TEXT_MUTED,
            );
        }
    }
}

fn local_point(pos: Pos2, frame: Rect) -> Point {
    Point::new(f64::from(pos.x - frame.min.x), f64::from(pos.y - frame.min.y))
}
