use extdb_core::{
    config::LocalDatabaseConfig,
    database::{ExternalDatabase, ProvidedDatabase},
    err::Result,
};
use extdb_locator::DatabaseProvider;

/// Returns the locally installed database described by the config.
///
/// The endpoint is only considered valid if its port accepts connections.
pub fn local(conf: &LocalDatabaseConfig) -> Result<ExternalDatabase> {
    let db = ProvidedDatabase::builder()
        .hostname(&conf.hostname)
        .port(conf.port)
        .database(&conf.database)
        .username(&conf.username)
        .password(&conf.password)
        .build()?;

    Ok(db.into())
}

/// Provides the locally installed Oracle instance
pub struct LocalProvider {
    conf: LocalDatabaseConfig,
}

impl LocalProvider {
    pub fn new(conf: LocalDatabaseConfig) -> Self {
        Self { conf }
    }
}

impl DatabaseProvider for LocalProvider {
    fn name(&self) -> &str {
        "oracle-local"
    }

    fn provide(&self) -> Result<ExternalDatabase> {
        local(&self.conf)
    }
}
