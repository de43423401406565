use std::fmt::{self, Display};

use extdb_core::err::Error;

/// Wraps our core [`Error`] so it implements `std::error::Error`
#[derive(Debug)]
pub struct PoolError(Error);

impl PoolError {
    pub fn into_inner(self) -> Error {
        self.0
    }
}

impl Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // alternate form includes the context chain
        write!(f, "{:#}", self.0)
    }
}

impl std::error::Error for PoolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<Error> for PoolError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

#[cfg(test)]
mod tests {
    use extdb_core::err::{anyhow, Context, Result};

    use super::*;

    #[test]
    fn test_pool_error_display_includes_context() {
        let res: Result<()> = Err(anyhow!("connection refused")).context("Failed to connect");

        let err = PoolError::from(res.unwrap_err());

        assert_eq!(err.to_string(), "Failed to connect: connection refused");
        assert_eq!(err.into_inner().root_cause().to_string(), "connection refused");
    }
}
