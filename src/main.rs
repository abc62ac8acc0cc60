use tokio::signal;
use tracing::{error, info};
use vaultwatch::app::App;
use vaultwatch::config::Config;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    // Config path as the first argument, defaulting to ./config.toml
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let config = match Config::load(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config from {config_path}: {e}");
            std::process::exit(1);
        }
    };

    config.init_logging();
    info!("vaultwatch starting");

    tokio::select! {
        result = App::run(config) => {
            if let Err(e) = result {
                error!(error = %e, "Fatal error");
                std::process::exit(1);
            }
        }
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!("vaultwatch stopped");
}
