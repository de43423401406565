use extdb_core::database::ExternalDatabase;

/// Locates the Oracle instance shared by the integration tests.
///
/// NOTE: When docker is used the container takes a long time to boot up
/// due to the image size so it is reused across test runs rather than
/// being removed at the end of each one.
pub fn oracle() -> ExternalDatabase {
    extdb_logging::init_for_tests();
    extdb_oracle::database()
}
