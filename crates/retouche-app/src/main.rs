//! Native entry point.

use retouche_app::RetoucheApp;

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Retouche")
            .with_inner_size([1100.0, 820.0])
            .with_min_inner_size([720.0, 560.0]),
        ..Default::default()
    };

    eframe::run_native(
        "retouche",
        options,
        Box::new(|cc| Ok(Box::new(RetoucheApp::new(cc)))),
    )
}
