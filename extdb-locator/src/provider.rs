use extdb_core::{database::ExternalDatabase, err::Result};
use extdb_logging::warn;

/// A source of databases, such as a local install or a container.
///
/// Providers may perform side effects (probing ports, starting containers).
/// An `Err` is treated by the locator the same as answering
/// [`ExternalDatabase::Unavailable`].
pub trait DatabaseProvider {
    /// The name used when logging about this provider
    fn name(&self) -> &str;

    /// Attempts to produce a database
    fn provide(&self) -> Result<ExternalDatabase>;
}

impl<T: DatabaseProvider + ?Sized> DatabaseProvider for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn provide(&self) -> Result<ExternalDatabase> {
        (**self).provide()
    }
}

impl<T: DatabaseProvider + ?Sized> DatabaseProvider for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn provide(&self) -> Result<ExternalDatabase> {
        (**self).provide()
    }
}

/// Provider backed by a closure, see [`provider_fn`]
pub struct FnProvider<F> {
    name: String,
    f: F,
}

/// Creates a provider from the supplied closure
pub fn provider_fn<F>(name: impl Into<String>, f: F) -> FnProvider<F>
where
    F: Fn() -> Result<ExternalDatabase>,
{
    FnProvider {
        name: name.into(),
        f,
    }
}

impl<F> DatabaseProvider for FnProvider<F>
where
    F: Fn() -> Result<ExternalDatabase>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn provide(&self) -> Result<ExternalDatabase> {
        (self.f)()
    }
}

/// Provider which never has a database
pub struct UnavailableProvider {
    name: String,
}

pub fn unavailable_provider(name: impl Into<String>) -> UnavailableProvider {
    UnavailableProvider { name: name.into() }
}

impl DatabaseProvider for UnavailableProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn provide(&self) -> Result<ExternalDatabase> {
        Ok(ExternalDatabase::Unavailable)
    }
}

/// Runs the provider, swallowing any failure into the unavailable sentinel
pub(crate) fn provide_or_unavailable<P: DatabaseProvider + ?Sized>(provider: &P) -> ExternalDatabase {
    provider.provide().unwrap_or_else(|err| {
        warn!(
            "Database provider '{}' failed, treating as unavailable: {:?}",
            provider.name(),
            err
        );
        ExternalDatabase::Unavailable
    })
}

#[cfg(test)]
mod tests {
    use extdb_core::err::bail;

    use super::*;

    #[test]
    fn test_provider_fn() {
        let provider = provider_fn("test", || Ok(ExternalDatabase::Unavailable));

        assert_eq!(provider.name(), "test");
        assert_eq!(provider.provide().unwrap(), ExternalDatabase::Unavailable);
    }

    #[test]
    fn test_boxed_providers() {
        let providers: Vec<Box<dyn DatabaseProvider>> = vec![
            Box::new(unavailable_provider("a")),
            Box::new(provider_fn("b", || bail!("no docker"))),
        ];

        assert_eq!(providers[0].name(), "a");
        assert_eq!(providers[1].name(), "b");
        assert!(providers[1].provide().is_err());
    }

    #[test]
    fn test_provide_or_unavailable_swallows_errors() {
        let provider = provider_fn("failing", || bail!("docker not available"));

        assert_eq!(
            provide_or_unavailable(&provider),
            ExternalDatabase::Unavailable
        );
    }
}
