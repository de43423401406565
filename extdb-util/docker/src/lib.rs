//! Manages test containers by driving the `docker` CLI

mod cli;
pub use cli::docker_available;
mod container;
pub use container::*;
mod wait;
pub use wait::*;

#[cfg(all(test, unix))]
mod fake_docker;
