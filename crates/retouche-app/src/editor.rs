//! The masking editor overlay: paint a region of interest over the image,
//! then promote it to a full-resolution mask on apply.

use egui::{
    vec2, Align2, Color32, ColorImage, Context, Id, Order, Pos2, Rect, RichText, Sense,
    TextureHandle, TextureOptions, Ui,
};
use kurbo::Point;
use retouche_core::{
    geometry, rasterize, BrushMode, MaskImage, OverlaySync, PaintSurface, StrokeEngine,
    SyncOutcome, MAX_BRUSH_WIDTH, MIN_BRUSH_WIDTH,
};
use retouche_widgets::{
    confirm_button, panel_frame, secondary_button, theme, vertical_separator, ToggleButton,
};

/// What the editor produced when it closed.
pub enum EditorAction {
    /// The user applied the mask; ownership transfers to the caller.
    Save(MaskImage),
    /// The user cancelled; all working state is discarded.
    Cancel,
}

/// One masking session over a single source image.
///
/// The surface, stroke engine, and layout sync live exactly as long as the
/// session; closing the editor drops them all.
pub struct MaskEditor {
    image_texture: TextureHandle,
    source_dims: (u32, u32),
    surface: PaintSurface,
    engine: StrokeEngine,
    sync: OverlaySync,
    mode: BrushMode,
    brush_width: f32,
    surface_texture: Option<TextureHandle>,
    surface_dirty: bool,
    error: Option<String>,
}

impl MaskEditor {
    /// Open a fresh session over the given image. Starts with an empty
    /// surface; layout runs on the first frame.
    pub fn new(image_texture: TextureHandle, source_dims: (u32, u32)) -> Self {
        Self {
            image_texture,
            source_dims,
            surface: PaintSurface::new(0, 0),
            engine: StrokeEngine::new(),
            sync: OverlaySync::new(),
            mode: BrushMode::Paint,
            brush_width: 40.0,
            surface_texture: None,
            surface_dirty: false,
            error: None,
        }
    }

    /// Render the overlay for one frame. Returns an action when the
    /// session ends.
    pub fn show(&mut self, ctx: &Context) -> Option<EditorAction> {
        let mut action = None;
        let screen = ctx.screen_rect();

        egui::Area::new(Id::new("mask_editor"))
            .order(Order::Foreground)
            .fixed_pos(Pos2::ZERO)
            .show(ctx, |ui| {
                ui.painter()
                    .rect_filled(screen, egui::CornerRadius::ZERO, Color32::from_black_alpha(210));
                // Swallow pointer input so the page underneath stays inert.
                ui.interact(screen, Id::new("mask_editor_backdrop"), Sense::click());
                self.show_canvas(ui, screen);
            });

        egui::Area::new(Id::new("mask_editor_toolbar"))
            .order(Order::Foreground)
            .anchor(Align2::CENTER_BOTTOM, vec2(0.0, -16.0))
            .show(ctx, |ui| {
                action = self.show_toolbar(ui);
            });

        action
    }

    /// The image area plus the paint overlay and its pointer handling.
    fn show_canvas(&mut self, ui: &mut Ui, screen: Rect) {
        // Everything above the toolbar strip is image area.
        let image_area = Rect::from_min_max(
            screen.min + vec2(24.0, 24.0),
            Pos2::new(screen.max.x - 24.0, screen.max.y - 104.0),
        );
        let container = kurbo::Rect::new(
            f64::from(image_area.min.x),
            f64::from(image_area.min.y),
            f64::from(image_area.max.x),
            f64::from(image_area.max.y),
        );

        let outcome = self
            .sync
            .sync(container, Some(self.source_dims), &mut self.surface);
        if outcome == SyncOutcome::Resized {
            self.surface_dirty = true;
        }
        let Some(surface_box) = self.sync.surface_box() else {
            return;
        };

        let rect = Rect::from_min_max(
            Pos2::new(surface_box.x0 as f32, surface_box.y0 as f32),
            Pos2::new(surface_box.x1 as f32, surface_box.y1 as f32),
        );
        let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
        ui.painter()
            .image(self.image_texture.id(), rect, uv, Color32::WHITE);

        let response = ui.interact(rect, Id::new("mask_paint"), Sense::drag());
        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                let local = geometry::surface_local(to_point(pos), surface_box);
                self.engine.begin_stroke(
                    &mut self.surface,
                    self.mode,
                    f64::from(self.brush_width),
                    local,
                );
                self.surface_dirty = true;
            }
        }
        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                let local = geometry::surface_local(to_point(pos), surface_box);
                self.engine.extend_stroke(&mut self.surface, local);
                self.surface_dirty = true;
            }
        }
        if response.drag_stopped() {
            self.engine.end_stroke();
        }
        response.on_hover_cursor(egui::CursorIcon::Crosshair);

        self.refresh_surface_texture(ui.ctx());
        if let Some(texture) = &self.surface_texture {
            ui.painter().image(texture.id(), rect, uv, Color32::WHITE);
        }
    }

    /// Tool toggles, size slider, cancel/apply.
    fn show_toolbar(&mut self, ui: &mut Ui) -> Option<EditorAction> {
        let mut action = None;
        panel_frame().show(ui, |ui| {
            ui.horizontal(|ui| {
                // Tool switches only apply between strokes; with a single
                // pointer they cannot land mid-stroke anyway.
                if ToggleButton::new("Brush")
                    .selected(self.mode == BrushMode::Paint)
                    .tooltip("Paint the region to edit")
                    .show(ui)
                    .clicked()
                    && !self.engine.is_active()
                {
                    self.mode = BrushMode::Paint;
                }
                if ToggleButton::new("Eraser")
                    .selected(self.mode == BrushMode::Erase)
                    .tooltip("Erase painted coverage")
                    .show(ui)
                    .clicked()
                    && !self.engine.is_active()
                {
                    self.mode = BrushMode::Erase;
                }

                vertical_separator(ui);

                ui.label(RichText::new("Size").color(theme::TEXT_MUTED));
                ui.add(
                    egui::Slider::new(
                        &mut self.brush_width,
                        MIN_BRUSH_WIDTH as f32..=MAX_BRUSH_WIDTH as f32,
                    )
                    .show_value(false),
                );

                vertical_separator(ui);

                if secondary_button(ui, "Cancel").clicked() {
                    action = Some(EditorAction::Cancel);
                }
                if confirm_button(ui, "Apply Mask").clicked() {
                    match rasterize(&self.surface, self.source_dims.0, self.source_dims.1) {
                        Ok(mask) => action = Some(EditorAction::Save(mask)),
                        Err(e) => {
                            log::warn!("mask apply rejected: {e}");
                            self.error = Some(e.to_string());
                        }
                    }
                }
            });
            if let Some(error) = &self.error {
                ui.colored_label(theme::ERROR, error);
            }
        });
        action
    }

    /// Re-upload the surface raster to the GPU when strokes or layout
    /// changed it this frame.
    fn refresh_surface_texture(&mut self, ctx: &Context) {
        if self.surface.is_empty() {
            return;
        }
        if self.surface_texture.is_none() || self.surface_dirty {
            let size = [self.surface.width() as usize, self.surface.height() as usize];
            let image = ColorImage::from_rgba_unmultiplied(size, self.surface.pixels().as_raw());
            match &mut self.surface_texture {
                Some(texture) => texture.set(image, TextureOptions::LINEAR),
                None => {
                    self.surface_texture =
                        Some(ctx.load_texture("mask_surface", image, TextureOptions::LINEAR));
                }
            }
            self.surface_dirty = false;
        }
    }
}

fn to_point(pos: Pos2) -> Point {
    Point::new(f64::from(pos.x), f64::from(pos.y))
}
