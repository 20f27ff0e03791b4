//! Retouche application shell: binds the masking/viewer core and the model
//! client to an eframe UI.

mod app;
mod editor;
mod io;
mod viewer_ui;

pub use app::RetoucheApp;
