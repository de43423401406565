use extdb_core::err::{Context, Result};
pub use log::*;

/// Configures the logger from `RUST_LOG`, defaulting to info
pub fn init_logging() -> Result<()> {
    env_logger::try_init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    )
    .context("Failed to init logging")
}

/// Logging init function for tests, safe to call from every test
pub fn init_for_tests() {
    let res = env_logger::builder()
        .filter_module("extdb", LevelFilter::Trace)
        .is_test(true)
        .try_init();
    if let Err(err) = res {
        eprintln!("Failed to init logging: {}", err);
    }
}
