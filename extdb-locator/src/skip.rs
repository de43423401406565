/// Yields the [`ProvidedDatabase`](crate::ProvidedDatabase) or returns
/// early from the calling test when the database is unavailable.
///
/// ```ignore
/// #[test]
/// fn test_query() {
///     let db = require_database!(extdb_oracle::database());
///     // ...
/// }
/// ```
#[macro_export]
macro_rules! require_database {
    ($db:expr) => {
        match $db {
            $crate::ExternalDatabase::Provided(db) => db,
            $crate::ExternalDatabase::Unavailable => {
                $crate::__logging::warn!(
                    "SKIPPED {}: no database available",
                    module_path!()
                );
                return;
            }
        }
    };
}
