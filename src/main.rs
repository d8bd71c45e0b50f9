#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use blog_builder::{APP_NAME, BuilderApp, EditorConfig};

// Optional config file next to the working directory
const CONFIG_FILE: &str = "blog_builder.json";

#[cfg(not(target_arch = "wasm32"))]
fn load_config() -> EditorConfig {
    match std::fs::read_to_string(CONFIG_FILE) {
        Ok(raw) => EditorConfig::from_json_str(&raw).unwrap_or_else(|err| {
            log::error!("Ignoring {}: {}", CONFIG_FILE, err);
            EditorConfig::default()
        }),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => EditorConfig::default(),
        Err(err) => {
            log::error!("Could not read {}: {}", CONFIG_FILE, err);
            EditorConfig::default()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let config = load_config();
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        APP_NAME,
        native_options,
        Box::new(|cc| Ok(Box::new(BuilderApp::new(cc, config)))),
    )
}

#[cfg(target_arch = "wasm32")]
fn main() {}
