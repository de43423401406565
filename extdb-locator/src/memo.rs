use extdb_core::{database::ExternalDatabase, err::Result};
use extdb_logging::debug;
use once_cell::sync::OnceCell;

use crate::provider::{provide_or_unavailable, DatabaseProvider};

/// Wraps a provider so it is evaluated at most once.
///
/// The first call runs the inner provider and remembers the outcome,
/// including an unavailable outcome or a failure (stored as unavailable).
/// Concurrent callers block until the first evaluation completes so
/// expensive side effects such as starting a container never race.
pub struct Memoized<P> {
    inner: P,
    cell: OnceCell<ExternalDatabase>,
}

impl<P> Memoized<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            cell: OnceCell::new(),
        }
    }

    /// Gets the remembered database, if the provider has been evaluated
    pub fn get(&self) -> Option<&ExternalDatabase> {
        self.cell.get()
    }
}

/// Shorthand for [`Memoized::new`]
pub fn memoize<P: DatabaseProvider>(provider: P) -> Memoized<P> {
    Memoized::new(provider)
}

impl<P: DatabaseProvider> DatabaseProvider for Memoized<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn provide(&self) -> Result<ExternalDatabase> {
        let db = self.cell.get_or_init(|| {
            debug!("Evaluating memoized provider '{}'", self.inner.name());
            provide_or_unavailable(&self.inner)
        });

        Ok(db.clone())
    }
}
