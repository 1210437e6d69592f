mod app;
mod config;
mod core;
mod error;
mod features;
mod logging;
mod pages;

use leptos::prelude::*;

use app::App;
use config::BoardConfig;

fn main() {
    console_error_panic_hook::set_once();
    logging::init(log::LevelFilter::Info);

    let config = BoardConfig::from_document();
    log::set_max_level(config.level_filter());

    mount_to_body(move || view! { <App config=config.clone() /> });
}
