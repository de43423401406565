//! Environment checks which short-circuit a lookup to unavailable

use std::env::consts::ARCH;

use extdb_core::database::ExternalDatabase;
use extdb_logging::info;

use crate::{provider::DatabaseProvider, select::select_first_available};

/// A named condition which, when tripped, prevents any provider from running
pub struct Guard<'a> {
    reason: String,
    tripped: Box<dyn Fn() -> bool + 'a>,
}

impl<'a> Guard<'a> {
    pub fn new(reason: impl Into<String>, tripped: impl Fn() -> bool + 'a) -> Self {
        Self {
            reason: reason.into(),
            tripped: Box::new(tripped),
        }
    }

    /// Trips when running on any of the supplied CPU architectures
    pub fn unsupported_arch(archs: &'a [&'a str]) -> Self {
        Self::new(format!("unsupported architecture {ARCH}"), move || {
            unsupported_arch(archs)
        })
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn is_tripped(&self) -> bool {
        (self.tripped)()
    }
}

/// Whether the current CPU architecture is one of `archs`
pub fn unsupported_arch(archs: &[&str]) -> bool {
    archs.contains(&ARCH)
}

/// Returns unavailable if any guard trips, otherwise selects the first
/// available database from the providers
pub fn guarded<'a, I>(guards: &[Guard<'a>], providers: I) -> ExternalDatabase
where
    I: IntoIterator,
    I::Item: DatabaseProvider,
{
    if let Some(guard) = guards.iter().find(|g| g.is_tripped()) {
        info!("Skipping database lookup: {}", guard.reason());
        return ExternalDatabase::Unavailable;
    }

    select_first_available(providers)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use extdb_core::database::ProvidedDatabase;

    use crate::provider::provider_fn;

    use super::*;

    fn mock_database() -> ExternalDatabase {
        ProvidedDatabase::builder()
            .hostname("localhost")
            .port(1521)
            .database("XEPDB1")
            .username("system")
            .verified()
            .build()
            .unwrap()
            .into()
    }

    #[test]
    fn test_unsupported_arch() {
        assert!(unsupported_arch(&[ARCH]));
        assert!(!unsupported_arch(&[]));
        assert!(!unsupported_arch(&["not-a-real-arch"]));
    }

    #[test]
    fn test_tripped_guard_skips_providers() {
        let calls = AtomicUsize::new(0);
        let provider = provider_fn("local", || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(mock_database())
        });
        let archs = [ARCH];

        let res = guarded(&[Guard::unsupported_arch(&archs)], [&provider]);

        assert_eq!(res, ExternalDatabase::Unavailable);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_untripped_guards_select() {
        let provider = provider_fn("local", || Ok(mock_database()));

        let res = guarded(
            &[
                Guard::unsupported_arch(&["not-a-real-arch"]),
                Guard::new("driver missing", || false),
            ],
            [&provider],
        );

        assert_eq!(res, mock_database());
    }

    #[test]
    fn test_guard_reason() {
        let guard = Guard::new("driver missing", || true);

        assert_eq!(guard.reason(), "driver missing");
        assert!(guard.is_tripped());
    }
}
