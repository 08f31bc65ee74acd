use async_trait::async_trait;
use deadpool_postgres::{Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime};
use serde::Serialize;
use tokio_postgres::NoTls;
use crate::error::{AppError, Result};
use std::time::Duration;

const SCHEMA: &str = include_str!("../migrations/0001_init.sql");

/// Creates a new database connection pool.
///
/// # Arguments
///
/// * `database_url` - The URL of the PostgreSQL database.
///
/// # Returns
///
/// A `Result` containing the `Pool`.
pub fn create_pool(database_url: &str) -> Result<Pool> {
    let mut cfg = Config::new();
    let pg_config: tokio_postgres::Config = database_url.parse()?;

    if let Some(host) = pg_config.get_hosts().first() {
        if let tokio_postgres::config::Host::Tcp(hostname) = host {
            cfg.host = Some(hostname.to_string());
        }
    }

    if let Some(port) = pg_config.get_ports().first() {
        cfg.port = Some(*port);
    }

    if let Some(dbname) = pg_config.get_dbname() {
        cfg.dbname = Some(dbname.to_string());
    }

    if let Some(user) = pg_config.get_user() {
        cfg.user = Some(user.to_string());
    }

    if let Some(password) = pg_config.get_password() {
        cfg.password = Some(String::from_utf8_lossy(password).to_string());
    }

    cfg.manager = Some(ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    });

    cfg.pool = Some(PoolConfig {
        max_size: 16,
        timeouts: deadpool_postgres::Timeouts {
            wait: Some(Duration::from_secs(5)),
            create: Some(Duration::from_secs(2)),
            recycle: Some(Duration::from_secs(1)),
        },
        ..Default::default()
    });

    cfg.create_pool(Some(Runtime::Tokio1), NoTls)
        .map_err(|e| AppError::Config(format!("Failed to create database pool: {}", e)))
}

/// Applies the schema. Every statement is idempotent.
pub async fn run_migrations(pool: &Pool) -> Result<()> {
    let client = pool.get().await?;
    client.batch_execute(SCHEMA).await?;
    tracing::info!("✅ Database schema is up to date");
    Ok(())
}

/// Connection state of the persistence layer, as reported by `/ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
}

impl ConnectionStatus {
    /// Numeric ready state: 1 when connected, 0 otherwise.
    pub fn ready_state(self) -> u8 {
        match self {
            ConnectionStatus::Connected => 1,
            ConnectionStatus::Disconnected => 0,
        }
    }
}

/// Reports whether the persistence layer can serve queries.
#[async_trait]
pub trait ConnectionProbe: Send + Sync {
    async fn status(&self) -> ConnectionStatus;
}

#[async_trait]
impl ConnectionProbe for Pool {
    async fn status(&self) -> ConnectionStatus {
        let client = match self.get().await {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!("❌ Database connection unavailable: {}", e);
                return ConnectionStatus::Disconnected;
            }
        };

        match client.simple_query("SELECT 1").await {
            Ok(_) => ConnectionStatus::Connected,
            Err(e) => {
                tracing::warn!("❌ Database ping failed: {}", e);
                ConnectionStatus::Disconnected
            }
        }
    }
}

/// A probe with a fixed answer, used by the in-memory store.
#[derive(Debug, Clone, Copy)]
pub struct StaticProbe(pub ConnectionStatus);

#[async_trait]
impl ConnectionProbe for StaticProbe {
    async fn status(&self) -> ConnectionStatus {
        self.0
    }
}
