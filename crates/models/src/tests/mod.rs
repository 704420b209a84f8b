

/// Postgres-backed tests run only when a database is configured.
pub(crate) fn skip_db_tests() -> bool {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return true;
    }
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL missing; skip db tests");
        return true;
    }
    false
}
