//! Taskboard Frontend Entry Point

mod api;
mod app;
mod board;
mod components;
mod config;
mod context;
mod error;
mod forms;
mod models;
mod pages;
mod session;
mod store;

use app::App;
use config::Config;
use leptos::prelude::*;
use tracing::Level;

fn main() {
    console_error_panic_hook::set_once();

    let level = if cfg!(debug_assertions) { Level::DEBUG } else { Level::INFO };
    let logs = rolling_logger::init(rolling_logger::DEFAULT_CAPACITY, level);
    let config = Config::load();
    tracing::info!(target: "app", api = %config.api_base_url, "starting");

    mount_to_body(move || view! { <App config=config logs=logs /> });
}
