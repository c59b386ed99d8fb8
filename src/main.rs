//! Todo Sync Frontend Entry Point

mod api;
mod app;
mod components;
mod config;
mod context;
mod controller;
mod error;
mod logging;
mod models;
mod store;

use app::App;
use components::StartupError;
use config::AppConfig;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    logging::init();

    // Refuse to start without an API origin
    match AppConfig::from_build_env() {
        Ok(config) => {
            log::info!("[APP] Using API at {}", config.api_base());
            mount_to_body(move || view! { <App config=config /> });
        }
        Err(e) => {
            log::error!("[APP] {}", e);
            let message = e.to_string();
            mount_to_body(move || view! { <StartupError message=message /> });
        }
    }
}
