use crate::config::DbConfig;
use crate::error::Result;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::ConnectOptions;

/// Opens a fresh connection to `db_name`. Every storage and report operation
/// runs on its own short-lived connection; nothing is pooled or reused.
pub async fn connect(config: &DbConfig, db_name: &str) -> Result<PgConnection> {
    let options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(db_name);
    Ok(options.connect().await?)
}

/// Connection to the maintenance database, used for CREATE/DROP DATABASE.
pub async fn connect_maintenance(config: &DbConfig) -> Result<PgConnection> {
    connect(config, &config.maintenance_db).await
}
