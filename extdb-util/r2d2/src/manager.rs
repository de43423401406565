use std::fmt::{self, Debug};

use extdb_core::err::Result;
use r2d2::ManageConnection;

use crate::err::PoolError;

/// Mirror of r2d2's `ManageConnection` using our `Result` type
pub trait ConnectionManager: Send + Sync + 'static {
    type Connection: Send + 'static;

    /// Opens a new connection
    fn connect(&self) -> Result<Self::Connection>;

    /// Checks the connection is still usable, typically with a round trip
    fn is_valid(&self, conn: &mut Self::Connection) -> Result<()>;

    /// Quickly checks whether the connection is broken, must not block
    fn has_broken(&self, conn: &mut Self::Connection) -> bool;

    /// Wraps this manager so it can be handed to an r2d2 pool
    fn into_pool_manager(self) -> PoolManager<Self>
    where
        Self: Sized,
    {
        PoolManager(self)
    }
}

/// Implements r2d2's `ManageConnection` for a [`ConnectionManager`]
pub struct PoolManager<T: ConnectionManager>(T);

impl<T: ConnectionManager> ManageConnection for PoolManager<T> {
    type Connection = T::Connection;
    type Error = PoolError;

    fn connect(&self) -> Result<Self::Connection, Self::Error> {
        self.0.connect().map_err(PoolError::from)
    }

    fn is_valid(&self, conn: &mut Self::Connection) -> Result<(), Self::Error> {
        self.0.is_valid(conn).map_err(PoolError::from)
    }

    fn has_broken(&self, conn: &mut Self::Connection) -> bool {
        self.0.has_broken(conn)
    }
}

impl<T: ConnectionManager + Debug> Debug for PoolManager<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PoolManager").field(&self.0).finish()
    }
}
