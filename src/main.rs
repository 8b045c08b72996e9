#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod ui;

use std::{env, path::PathBuf};

use anyhow::Result;
use breed_viewer::config::ViewerConfig;
use gpui::Application;

fn main() -> Result<()> {
    env_logger::init();

    let config = ViewerConfig::from_env();
    let photo_path = env::args_os().nth(1).map(PathBuf::from);
    log::info!(
        "models in {}, photo {:?}",
        config
            .animal_model
            .model_path
            .parent()
            .map(|dir| dir.display().to_string())
            .unwrap_or_default(),
        photo_path
    );

    Application::new()
        .with_assets(gpui_component_assets::Assets)
        .run(move |app| {
            gpui_component::init(app);

            if let Err(err) = ui::launch_ui(app, config, photo_path) {
                log::error!("failed to launch ui: {err:?}");
            }
        });

    Ok(())
}
