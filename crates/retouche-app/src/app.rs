//! Application state and top-level UI.

use std::sync::mpsc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use egui::{
    vec2, ColorImage, Context, Frame, Margin, RichText, TextureHandle, TextureOptions,
};
use image::{imageops, RgbaImage};
use retouche_client::{EditClient, EditOutput, InlineImage};
use retouche_core::MaskImage;
use retouche_widgets::{
    confirm_button, panel_frame, primary_button, secondary_button, section_label, theme,
    ToggleButton,
};

use crate::editor::{EditorAction, MaskEditor};
use crate::io::{self, AspectRatio};
use crate::viewer_ui::ZoomableImage;

/// A decoded image plus its GPU texture.
struct LoadedImage {
    bytes: Vec<u8>,
    mime: String,
    rgba: RgbaImage,
    texture: TextureHandle,
}

impl LoadedImage {
    fn from_bytes(ctx: &Context, name: &str, bytes: Vec<u8>) -> Result<Self, io::IoError> {
        let (rgba, mime) = io::decode_image(&bytes)?;
        let texture = make_texture(ctx, name, &rgba);
        Ok(Self {
            bytes,
            mime,
            rgba,
            texture,
        })
    }

    fn dims(&self) -> (u32, u32) {
        self.rgba.dimensions()
    }
}

/// An applied mask: the data-URL payload handed over by the editor plus a
/// thumbnail for the attachment row.
struct MaskAttachment {
    data_url: String,
    thumbnail: TextureHandle,
}

/// A completed model response ready for display.
struct EditResult {
    /// The submitted image (post-crop) shown next to the edited one.
    original: Option<(TextureHandle, (u32, u32))>,
    edited: Option<LoadedImage>,
    note: Option<String>,
    original_viewer: ZoomableImage,
    edited_viewer: ZoomableImage,
}

/// Top-level application state.
pub struct RetoucheApp {
    source: Option<LoadedImage>,
    prompt: String,
    aspect: AspectRatio,
    mask: Option<MaskAttachment>,
    editor: Option<MaskEditor>,
    /// Snapshot of the image actually sent with the in-flight request.
    submitted_preview: Option<(TextureHandle, (u32, u32))>,
    pending: Option<mpsc::Receiver<Result<EditOutput, String>>>,
    result: Option<EditResult>,
    error: Option<String>,
}

impl RetoucheApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut visuals = egui::Visuals::dark();
        visuals.panel_fill = theme::BG;
        visuals.window_fill = theme::PANEL_BG;
        visuals.extreme_bg_color = theme::INPUT_BG;
        cc.egui_ctx.set_visuals(visuals);

        Self {
            source: None,
            prompt: String::new(),
            aspect: AspectRatio::default(),
            mask: None,
            editor: None,
            submitted_preview: None,
            pending: None,
            result: None,
            error: None,
        }
    }

    /// Replace the source image, dropping any mask and result that
    /// referred to the previous one.
    fn load_image(&mut self, ctx: &Context, bytes: Vec<u8>, name: &str) {
        match LoadedImage::from_bytes(ctx, "source_image", bytes) {
            Ok(image) => {
                let (w, h) = image.dims();
                log::info!("loaded image {name} ({w}x{h}, {})", image.mime);
                self.source = Some(image);
                self.mask = None;
                self.result = None;
                self.submitted_preview = None;
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    fn handle_dropped_files(&mut self, ctx: &Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        for file in dropped {
            if let Some(path) = &file.path {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| "image".to_string());
                match std::fs::read(path) {
                    Ok(bytes) => self.load_image(ctx, bytes, &name),
                    Err(e) => {
                        log::error!("failed to read dropped file {path:?}: {e}");
                        self.error = Some("Please select a valid image file.".to_string());
                    }
                }
            } else if let Some(bytes) = &file.bytes {
                self.load_image(ctx, bytes.to_vec(), &file.name);
            }
        }
    }

    fn open_editor(&mut self) {
        if let Some(source) = &self.source {
            self.editor = Some(MaskEditor::new(source.texture.clone(), source.dims()));
        }
    }

    /// Take ownership of a finished mask from the editor.
    fn apply_mask(&mut self, ctx: &Context, mask: MaskImage) {
        let data_url = match mask.to_data_url() {
            Ok(url) => url,
            Err(e) => {
                log::error!("mask encoding failed: {e}");
                self.error = Some(e.to_string());
                return;
            }
        };
        let thumbnail = imageops::thumbnail(mask.pixels(), 96, 96);
        let thumbnail = make_texture(ctx, "mask_thumbnail", &thumbnail);
        log::info!("mask applied ({}x{})", mask.width(), mask.height());
        self.mask = Some(MaskAttachment {
            data_url,
            thumbnail,
        });
    }

    /// Build and dispatch the model request on a worker thread.
    fn submit(&mut self, ctx: &Context) {
        if self.prompt.trim().is_empty() {
            self.error = Some("Please provide an editing or generation prompt.".to_string());
            return;
        }
        let client = match EditClient::from_env() {
            Ok(client) => client,
            Err(e) => {
                self.error = Some(e.to_string());
                return;
            }
        };
        self.error = None;
        self.result = None;

        let (tx, rx) = mpsc::channel();
        let repaint = ctx.clone();
        let prompt = self.prompt.clone();

        if let Some(source) = &self.source {
            // Editing mode: image + optional mask + prompt.
            let (rgba, bytes, mime) = match self.aspect.ratio() {
                Some(ratio) => {
                    let cropped = io::crop_to_ratio(&source.rgba, ratio);
                    match io::encode_png(&cropped) {
                        Ok(bytes) => (cropped, bytes, "image/png".to_string()),
                        Err(e) => {
                            self.error = Some(e.to_string());
                            return;
                        }
                    }
                }
                None => (source.rgba.clone(), source.bytes.clone(), source.mime.clone()),
            };
            self.submitted_preview = Some((
                make_texture(ctx, "submitted_image", &rgba),
                rgba.dimensions(),
            ));

            let image = InlineImage {
                mime_type: mime,
                data: STANDARD.encode(&bytes),
            };
            let mask = self.mask.as_ref().and_then(|m| {
                match io::split_data_url(&m.data_url) {
                    Ok((mime_type, data)) => Some(InlineImage { mime_type, data }),
                    Err(e) => {
                        log::warn!("mask payload was malformed, sending without it: {e}");
                        None
                    }
                }
            });

            std::thread::spawn(move || {
                let outcome = run_blocking(client.edit_image(image, mask, &prompt));
                let _ = tx.send(outcome);
                repaint.request_repaint();
            });
        } else {
            // Generation mode: prompt only.
            self.submitted_preview = None;
            std::thread::spawn(move || {
                let outcome = run_blocking(client.generate_image(&prompt));
                let _ = tx.send(outcome);
                repaint.request_repaint();
            });
        }
        self.pending = Some(rx);
    }

    fn poll_pending(&mut self, ctx: &Context) {
        let Some(rx) = &self.pending else {
            return;
        };
        match rx.try_recv() {
            Ok(outcome) => {
                self.pending = None;
                match outcome {
                    Ok(output) => self.finish_request(ctx, output),
                    Err(message) => {
                        log::error!("model request failed: {message}");
                        self.error = Some(message);
                    }
                }
            }
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => {
                self.pending = None;
                self.error = Some("The request worker exited unexpectedly.".to_string());
            }
        }
    }

    fn finish_request(&mut self, ctx: &Context, output: EditOutput) {
        let edited = output.image.and_then(|inline| {
            let bytes = match STANDARD.decode(&inline.data) {
                Ok(bytes) => bytes,
                Err(e) => {
                    log::error!("returned image payload is not valid base64: {e}");
                    self.error = Some("The model returned an unreadable image.".to_string());
                    return None;
                }
            };
            match LoadedImage::from_bytes(ctx, "edited_image", bytes) {
                Ok(image) => Some(image),
                Err(e) => {
                    log::error!("returned image failed to decode: {e}");
                    self.error = Some("The model returned an unreadable image.".to_string());
                    None
                }
            }
        });

        log::info!(
            "model response received (image: {}, note: {})",
            edited.is_some(),
            output.text.is_some()
        );
        self.result = Some(EditResult {
            original: self.submitted_preview.take(),
            edited,
            note: output.text,
            original_viewer: ZoomableImage::new(),
            edited_viewer: ZoomableImage::new(),
        });
    }

    /// Feed the edited image back as the new source.
    fn use_result_as_input(&mut self) {
        let Some(result) = &mut self.result else {
            return;
        };
        let Some(edited) = result.edited.take() else {
            return;
        };
        log::info!("using edited image as new input");
        self.source = Some(edited);
        self.mask = None;
        self.result = None;
        self.submitted_preview = None;
        self.error = None;
    }

    fn show_request_panel(&mut self, ui: &mut egui::Ui) {
        panel_frame().show(ui, |ui| {
            section_label(ui, "1. Upload image");
            ui.add_space(4.0);
            self.show_upload_box(ui);

            if self.source.is_some() {
                ui.add_space(8.0);
                self.show_mask_row(ui);
            }

            ui.add_space(12.0);
            ui.horizontal(|ui| {
                section_label(ui, "2. Describe your edit");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    egui::ComboBox::from_id_salt("aspect_ratio")
                        .selected_text(self.aspect.label())
                        .show_ui(ui, |ui| {
                            for option in AspectRatio::ALL {
                                if ui
                                    .selectable_label(self.aspect == option, option.label())
                                    .clicked()
                                {
                                    self.aspect = option;
                                }
                            }
                        });
                    ui.label(RichText::new("Aspect").color(theme::TEXT_MUTED));
                });
            });
            ui.add_space(4.0);
            ui.add(
                egui::TextEdit::multiline(&mut self.prompt)
                    .desired_width(f32::INFINITY)
                    .desired_rows(4)
                    .hint_text(
                        "e.g. 'make the cat wear a tiny wizard hat' or \
                         'change the background to a surreal landscape'",
                    ),
            );

            ui.add_space(12.0);
            ui.vertical_centered(|ui| {
                let can_submit = !self.prompt.trim().is_empty() && self.pending.is_none();
                ui.add_enabled_ui(can_submit, |ui| {
                    let label = if self.source.is_some() {
                        "Generate"
                    } else {
                        "Generate from text"
                    };
                    if primary_button(ui, label).clicked() {
                        let ctx = ui.ctx().clone();
                        self.submit(&ctx);
                    }
                });
                if let Some(error) = &self.error {
                    ui.add_space(6.0);
                    ui.colored_label(theme::ERROR, error);
                }
            });
        });
    }

    fn show_upload_box(&mut self, ui: &mut egui::Ui) {
        let mut picked = None;
        match &self.source {
            Some(source) => {
                let (w, h) = source.dims();
                let scale = (180.0 / h as f32).min(ui.available_width() / w as f32).min(1.0);
                let size = vec2(w as f32 * scale, h as f32 * scale);
                ui.horizontal(|ui| {
                    ui.add(egui::Image::new((source.texture.id(), size)));
                    ui.vertical(|ui| {
                        ui.label(
                            RichText::new(format!("{w} x {h} ({})", source.mime))
                                .color(theme::TEXT_MUTED),
                        );
                        if secondary_button(ui, "Replace…").clicked() {
                            picked = io::pick_image_dialog();
                        }
                    });
                });
            }
            None => {
                ui.vertical_centered(|ui| {
                    ui.add_space(24.0);
                    ui.label(RichText::new("No image loaded").color(theme::TEXT_MUTED));
                    ui.label(
                        RichText::new("Drop an image here, or")
                            .color(theme::TEXT_MUTED)
                            .size(11.0),
                    );
                    ui.add_space(4.0);
                    if secondary_button(ui, "Click to upload").clicked() {
                        picked = io::pick_image_dialog();
                    }
                    ui.add_space(24.0);
                });
            }
        }
        if let Some((bytes, name)) = picked {
            let ctx = ui.ctx().clone();
            self.load_image(&ctx, bytes, &name);
        }
    }

    fn show_mask_row(&mut self, ui: &mut egui::Ui) {
        let mut remove = false;
        let mut edit = false;
        ui.horizontal(|ui| {
            match &self.mask {
                Some(mask) => {
                    ui.add(egui::Image::new((mask.thumbnail.id(), vec2(40.0, 40.0))));
                    ui.colored_label(egui::Color32::from_rgb(74, 222, 128), "Mask applied");
                    if secondary_button(ui, "Remove").clicked() {
                        remove = true;
                    }
                    if ToggleButton::new("Edit Mask").show(ui).clicked() {
                        edit = true;
                    }
                }
                None => {
                    ui.label(
                        RichText::new("Optional: add a mask for precise edits.")
                            .color(theme::TEXT_MUTED),
                    );
                    if ToggleButton::new("Add Mask").show(ui).clicked() {
                        edit = true;
                    }
                }
            }
        });
        if remove {
            self.mask = None;
        }
        if edit {
            self.open_editor();
        }
    }

    fn show_result_panel(&mut self, ui: &mut egui::Ui) {
        let mut download = false;
        let mut reuse = false;

        let Some(result) = &mut self.result else {
            return;
        };
        let original_view = result.original.clone();
        let edited_view = result
            .edited
            .as_ref()
            .map(|image| (image.texture.clone(), image.dims()));
        let note = result.note.clone();

        ui.add_space(16.0);
        panel_frame().show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading(RichText::new("Result").color(theme::ACCENT));
            });
            ui.add_space(8.0);

            match (&original_view, &edited_view) {
                (Some((texture, dims)), edited) => {
                    ui.columns(2, |columns| {
                        columns[0].label(RichText::new("Original").color(theme::TEXT_MUTED));
                        result.original_viewer.show(&mut columns[0], texture, *dims);
                        columns[1].label(RichText::new("Edited").color(theme::TEXT_MUTED));
                        match edited {
                            Some((edited_texture, edited_dims)) => {
                                result.edited_viewer.show(
                                    &mut columns[1],
                                    edited_texture,
                                    *edited_dims,
                                );
                            }
                            None => {
                                columns[1].centered_and_justified(|ui| {
                                    ui.label(
                                        RichText::new("No image was generated.")
                                            .color(theme::TEXT_MUTED),
                                    );
                                });
                            }
                        }
                    });
                }
                (None, Some((texture, dims))) => {
                    ui.label(RichText::new("Generated").color(theme::TEXT_MUTED));
                    result.edited_viewer.show(ui, texture, *dims);
                }
                (None, None) => {
                    ui.label(RichText::new("No image was generated.").color(theme::TEXT_MUTED));
                }
            }

            if edited_view.is_some() {
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if confirm_button(ui, "Download").clicked() {
                        download = true;
                    }
                    if secondary_button(ui, "Use as Input").clicked() {
                        reuse = true;
                    }
                });
            }

            if let Some(note) = &note {
                ui.add_space(8.0);
                Frame::new()
                    .fill(theme::INPUT_BG)
                    .corner_radius(egui::CornerRadius::same(6))
                    .inner_margin(Margin::same(8))
                    .show(ui, |ui| {
                        ui.label(RichText::new("Model note:").color(theme::ACCENT));
                        ui.label(RichText::new(format!("\u{201c}{note}\u{201d}")).italics());
                    });
            }
        });

        if download {
            if let Some(result) = &self.result {
                if let Some(image) = &result.edited {
                    let name = format!("edited-image.{}", io::extension_for_mime(&image.mime));
                    io::save_image_dialog(&image.bytes, &name);
                }
            }
        }
        if reuse {
            self.use_result_as_input();
        }
    }
}

impl eframe::App for RetoucheApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.poll_pending(ctx);
        if self.editor.is_none() {
            self.handle_dropped_files(ctx);
        }

        egui::CentralPanel::default()
            .frame(Frame::new().fill(theme::BG).inner_margin(Margin::same(16)))
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading(
                            RichText::new("Retouche")
                                .size(28.0)
                                .color(theme::ACCENT_HOVER),
                        );
                        ui.label(
                            RichText::new(
                                "AI-powered image editing. Upload a photo and describe your changes.",
                            )
                            .color(theme::TEXT_MUTED),
                        );
                    });
                    ui.add_space(12.0);

                    self.show_request_panel(ui);

                    if self.pending.is_some() {
                        ui.add_space(16.0);
                        ui.vertical_centered(|ui| {
                            ui.spinner();
                            ui.label(RichText::new("Working…").color(theme::TEXT_MUTED));
                        });
                        // Keep polling while the worker runs.
                        ctx.request_repaint_after(std::time::Duration::from_millis(150));
                    }

                    self.show_result_panel(ui);
                });
            });

        let editor_action = match &mut self.editor {
            Some(editor) => editor.show(ctx),
            None => None,
        };
        if let Some(action) = editor_action {
            self.editor = None;
            match action {
                EditorAction::Save(mask) => self.apply_mask(ctx, mask),
                EditorAction::Cancel => log::info!("masking editor cancelled"),
            }
        }
    }
}

fn make_texture(ctx: &Context, name: &str, rgba: &RgbaImage) -> TextureHandle {
    let size = [rgba.width() as usize, rgba.height() as usize];
    let image = ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
    ctx.load_texture(name, image, TextureOptions::LINEAR)
}

fn run_blocking<F: std::future::Future<Output = Result<EditOutput, retouche_client::ClientError>>>(
    future: F,
) -> Result<EditOutput, String> {
    match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime.block_on(future).map_err(|e| e.to_string()),
        Err(e) => Err(format!("failed to start async runtime: {e}")),
    }
}

