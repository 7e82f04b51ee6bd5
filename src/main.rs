mod app;
mod config;
mod upload;
mod utils;

use app::DxfUploader;
use config::AppConfig;
use eframe::CreationContext;

fn main() {
    let loaded = AppConfig::load_from_default_path();
    let config = match &loaded {
        Ok(Some(config)) => config.clone(),
        _ => AppConfig::default(),
    };

    env_logger::Builder::new()
        .filter_level(config.log_level.to_level_filter())
        .parse_default_env()
        .init();

    let config_path = AppConfig::default_path();
    match loaded {
        Ok(Some(_)) => log::info!("Loaded configuration from {:?}", config_path),
        Ok(None) => log::debug!("No config file found at {:?}", config_path),
        Err(e) => log::warn!("Using default configuration, {:?} is unusable: {}", config_path, e),
    }

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([640.0, 640.0])
            .with_min_inner_size([420.0, 480.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "DXF Grid Converter",
        options,
        Box::new(move |cc: &CreationContext<'_>| Box::new(DxfUploader::new(cc, config))),
    ) {
        log::error!("Application error: {}", e);
    }
}
