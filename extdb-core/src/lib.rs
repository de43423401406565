pub mod config;
pub mod database;
pub mod err;
pub mod options;
