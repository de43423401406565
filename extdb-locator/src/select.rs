use extdb_core::database::ExternalDatabase;
use extdb_logging::{debug, info};

use crate::provider::{provide_or_unavailable, DatabaseProvider};

/// Returns the first valid database produced by the supplied providers.
///
/// Providers are evaluated in order and evaluation stops at the first one
/// whose database passes [`ExternalDatabase::check_validity`], later
/// providers are never invoked. A provider which fails is treated as
/// unavailable. If no provider yields a valid database the unavailable
/// sentinel is returned.
pub fn select_first_available<I>(providers: I) -> ExternalDatabase
where
    I: IntoIterator,
    I::Item: DatabaseProvider,
{
    providers
        .into_iter()
        .find_map(|provider| {
            debug!("Trying database provider '{}'", provider.name());
            let db = provide_or_unavailable(&provider);

            if db.check_validity() {
                info!("Using database {} from provider '{}'", db, provider.name());
                Some(db)
            } else {
                debug!(
                    "Database provider '{}' did not yield a usable database",
                    provider.name()
                );
                None
            }
        })
        .unwrap_or_else(|| {
            info!("No database available from any provider");
            ExternalDatabase::Unavailable
        })
}
