use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use tracing::{info, warn};

use crate::config::DbConfig;
use crate::error::AppError;

/// Open the Postgres pool described by `config` and verify it answers.
///
/// No migrations are run.
pub async fn connect_db(config: &DbConfig) -> Result<DatabaseConnection, AppError> {
    let mut opt = ConnectOptions::new(config.url());
    opt.connect_timeout(config.connect_timeout)
        .acquire_timeout(config.connect_timeout)
        .sqlx_logging(false);

    let conn = Database::connect(opt).await?;
    check_connection(&conn).await?;

    info!(
        host = %config.host,
        port = config.port,
        database = %config.name,
        "database connected"
    );
    Ok(conn)
}

/// Round-trip a trivial statement to confirm the pool is usable.
pub async fn check_connection(conn: &DatabaseConnection) -> Result<(), AppError> {
    conn.ping().await?;
    conn.execute_unprepared("SELECT 1").await?;
    Ok(())
}

/// Close the pool, logging instead of failing on shutdown errors.
pub async fn close(conn: DatabaseConnection) {
    match conn.close().await {
        Ok(()) => info!("database connection closed"),
        Err(e) => warn!(error = %e, "failed to close database connection"),
    }
}
