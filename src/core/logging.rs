//! Logging initialization and utilities

/// Initialize the logging system
///
/// Uses env_logger with default filter level of `info`.
/// Override with RUST_LOG environment variable, e.g. `RUST_LOG=vitrine=debug`.
///
/// Safe to call more than once; later calls are ignored.
///
/// # Example
/// ```
/// vitrine::core::logging::init();
/// log::info!("Inspector started");
/// ```
pub fn init() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).try_init();
}
