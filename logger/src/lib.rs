// Copyright(C) Mundis.
//! Process-wide logging setup on top of `env_logger`.
//!
//! The installed logger can be swapped later (tests call `setup_with` repeatedly), so the
//! global `log` facade forwards to a logger kept behind a lock.

use {
    lazy_static::lazy_static,
    log::Log,
    std::sync::{Arc, RwLock},
};

lazy_static! {
    static ref LOGGER: Arc<RwLock<env_logger::Logger>> =
        Arc::new(RwLock::new(env_logger::Logger::from_default_env()));
}

const DEFAULT_FILTER: &str = "info";

struct LoggerShim {}

impl Log for LoggerShim {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        LOGGER
            .read()
            .map(|logger| logger.enabled(metadata))
            .unwrap_or(false)
    }

    fn log(&self, record: &log::Record) {
        if let Ok(logger) = LOGGER.read() {
            logger.log(record);
        }
    }

    fn flush(&self) {}
}

fn replace_logger(logger: env_logger::Logger) {
    log::set_max_level(logger.filter());
    if let Ok(mut current) = LOGGER.write() {
        *current = logger;
    }
    // Only the first call installs the shim; later ones just swap the inner logger.
    let _ = log::set_boxed_logger(Box::new(LoggerShim {}));
}

/// Configures logging with a specific filter overriding RUST_LOG. _RUST_LOG is used instead
/// so if set it takes precedence.
pub fn setup_with(filter: &str) {
    let logger =
        env_logger::Builder::from_env(env_logger::Env::new().filter_or("_RUST_LOG", filter))
            .format_timestamp_nanos()
            .build();
    replace_logger(logger);
}

/// Configures logging with a fallback filter if RUST_LOG is not set
pub fn setup_with_default(filter: &str) {
    let logger = env_logger::Builder::from_env(env_logger::Env::new().default_filter_or(filter))
        .format_timestamp_nanos()
        .build();
    replace_logger(logger);
}

/// Configures logging from RUST_LOG, defaulting to `info`.
pub fn setup() {
    setup_with_default(DEFAULT_FILTER);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_can_be_called_repeatedly() {
        setup_with("warn");
        assert_eq!(log::max_level(), log::LevelFilter::Warn);
        setup_with("debug");
        assert_eq!(log::max_level(), log::LevelFilter::Debug);
        log::debug!("logger swapped");
    }
}
