//! Lets connection managers written against our anyhow-based `Result`
//! back an r2d2 pool, which requires `std::error::Error` errors.

mod err;
pub use err::*;
mod manager;
pub use manager::*;
