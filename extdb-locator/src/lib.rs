//! Picks the first usable database out of an ordered list of providers.
//!
//! Providers encode where a database may come from (a local install, a
//! container, ...) and the order of the list encodes the preference.
//! When nothing is usable the lookup answers with
//! [`ExternalDatabase::Unavailable`] rather than an error so tests can skip.

pub use extdb_core::database::{ExternalDatabase, ProvidedDatabase, Validation};

mod provider;
pub use provider::*;
mod select;
pub use select::*;
mod memo;
pub use memo::*;
pub mod guard;
pub use guard::{guarded, Guard};
mod skip;

#[doc(hidden)]
pub use extdb_logging as __logging;
