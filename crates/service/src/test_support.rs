#![cfg(test)]
use migration::MigratorTrait;
use models::db::{connect_with_config, DatabaseConfig};
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();

fn test_config() -> Option<DatabaseConfig> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let url = std::env::var("DATABASE_URL").ok()?;
    Some(DatabaseConfig {
        url,
        max_connections: 10,
        min_connections: 1,
        connect_timeout_secs: 5,
        acquire_timeout_secs: 10,
        sqlx_logging: false,
    })
}

/// Migrated connection, or `None` when no database is configured.
pub async fn get_db() -> Result<Option<DatabaseConnection>, anyhow::Error> {
    let Some(cfg) = test_config() else {
        eprintln!("DATABASE_URL missing; skip db tests");
        return Ok(None);
    };

    MIGRATED
        .get_or_try_init(|| async {
            let db = connect_with_config(&cfg).await?;
            migration::Migrator::up(&db, None).await?;
            Ok::<_, anyhow::Error>(())
        })
        .await?;

    // Fresh connection for the current test's runtime
    Ok(Some(connect_with_config(&cfg).await?))
}
