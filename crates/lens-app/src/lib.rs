//! Future Lens App: WASM entry point.
//!
//! This crate is the composition root (DI wiring layer).
//! It assembles all platform adapters and hands them to the egui UI.

mod app;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

const CANVAS_ID: &str = "lens_canvas";

/// WASM entry point, called from index.html
#[wasm_bindgen(start)]
pub async fn main() {
    // Initialize logging
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Future Lens starting...");

    let canvas = match find_canvas() {
        Ok(canvas) => canvas,
        Err(e) => {
            log::error!("Cannot start: {}", e);
            return;
        }
    };

    // Launch the egui application
    let web_options = eframe::WebOptions::default();
    wasm_bindgen_futures::spawn_local(async move {
        let started = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(app::LensApp::new(cc)))),
            )
            .await;
        if let Err(e) = started {
            log::error!("Failed to start eframe: {:?}", e);
        }
    });
}

/// Get the canvas element by ID
fn find_canvas() -> lens_types::Result<web_sys::HtmlCanvasElement> {
    use lens_types::LensError;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| LensError::JsInterop("No document".to_string()))?;
    document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| LensError::JsInterop(format!("No canvas element with id '{}'", CANVAS_ID)))?
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .map_err(|_| LensError::JsInterop(format!("Element '{}' is not a canvas", CANVAS_ID)))
}
