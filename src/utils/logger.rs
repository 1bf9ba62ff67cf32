use crate::utils::config::LoggingConfig;
use std::path::Path;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set. JSON output is
/// meant for production ingestion; pretty output for terminals.
pub fn init_logger(level: &str, json_output: bool, log_file: Option<&Path>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    match (json_output, log_file) {
        (true, Some(file)) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file)
                .expect("Failed to open log file");
            registry.with(fmt::layer().json().with_writer(file)).init();
        }
        (true, None) => registry.with(fmt::layer().json()).init(),
        (false, _) => registry.with(fmt::layer().pretty()).init(),
    }
}

/// Initialize straight from the logging section of the config file.
pub fn init_from_config(config: &LoggingConfig) {
    let json = config.output == "json";
    let log_file = (!config.file_path.is_empty()).then(|| Path::new(&config.file_path));
    init_logger(&config.level, json, log_file);
}
