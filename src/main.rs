#![allow(non_snake_case)]

use std::env;

use roomCalendar::cli;
use roomCalendar::config::AppConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match env::var("CONFIG_FILE") {
        Ok(path) => match AppConfig::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(%path, error = %e, "Falling back to environment config");
                AppConfig::default()
            }
        },
        Err(_) => AppConfig::default(),
    };

    let settings = match config.settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    if let Err(e) = cli::run(settings).await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
