// GUI main entry point using Dioxus
#![allow(non_snake_case)]

use dioxus::prelude::*;
use dioxus_desktop::{Config as DesktopConfig, LogicalSize, WindowBuilder};

mod app;
mod components;
mod config;
mod services;
mod state;

use app::App;
use config::AppConfig;
use services::EngineClient;

fn main() {
    tracing_subscriber::fmt::init();
    tracing::info!("Starting stock dashboard (Dioxus desktop)");

    if let Err(e) = run() {
        tracing::error!(error = %e, "Dashboard failed to start");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let app_config = AppConfig::load_default()?;
    tracing::info!(version = %app_config.version, "Loaded default configuration");

    // Provider I/O runs on this runtime; the UI awaits its join handles.
    let runtime = tokio::runtime::Runtime::new()?;
    let client = EngineClient::new(app_config.engine_settings()?, runtime.handle().clone())?;

    let window = WindowBuilder::new()
        .with_title(app_config.app.title.clone())
        .with_inner_size(LogicalSize::new(
            app_config.app.window.width,
            app_config.app.window.height,
        ));

    LaunchBuilder::desktop()
        .with_cfg(DesktopConfig::new().with_window(window))
        .with_context(app_config)
        .with_context(client)
        .launch(App);

    Ok(())
}
