//! sqlx-backed connections.
//!
//! Each driver module implements [`Connection`] directly on the matching sqlx
//! connection type and is compiled only with its Cargo feature. [`DbConnection`]
//! picks one of them at runtime from a [`DatabaseConfig`].

#[cfg(feature = "mysql")]
pub mod mysql;
#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

use tracing::{error, info};

use crate::config::{DatabaseConfig, Driver};
use crate::executor::{Connection, Database, ExecuteResult, Row};
use crate::params::Dialect;
use crate::{Error, Result, Value};

enum Backend {
    #[cfg(feature = "postgres")]
    Postgres(sqlx::PgConnection),
    #[cfg(feature = "mysql")]
    MySql(sqlx::MySqlConnection),
    #[cfg(feature = "sqlite")]
    Sqlite(sqlx::SqliteConnection),
}

impl Backend {
    async fn connect(driver: Driver, url: &str, dsn: &str) -> Result<Self> {
        #[allow(unused_variables)]
        let failed = |source: sqlx::Error| Error::Connection {
            dsn: dsn.to_string(),
            source,
        };

        match driver {
            #[cfg(feature = "postgres")]
            Driver::Postgres => {
                let conn = <sqlx::PgConnection as sqlx::Connection>::connect(url)
                    .await
                    .map_err(failed)?;
                Ok(Backend::Postgres(conn))
            }
            #[cfg(feature = "mysql")]
            Driver::MySql => {
                let conn = <sqlx::MySqlConnection as sqlx::Connection>::connect(url)
                    .await
                    .map_err(failed)?;
                Ok(Backend::MySql(conn))
            }
            #[cfg(feature = "sqlite")]
            Driver::Sqlite => {
                let conn = <sqlx::SqliteConnection as sqlx::Connection>::connect(url)
                    .await
                    .map_err(failed)?;
                Ok(Backend::Sqlite(conn))
            }
            #[allow(unreachable_patterns)]
            other => Err(Error::config(format!(
                "driver '{}' requires the `{}` feature",
                other.scheme(),
                other.scheme()
            ))),
        }
    }
}

/// A live database handle opened from a [`DatabaseConfig`]
pub struct DbConnection {
    backend: Backend,
    dsn: String,
}

impl DbConnection {
    /// Open a connection, failing fast when the database cannot be reached
    pub async fn open(config: &DatabaseConfig) -> Result<Self> {
        let driver = config.driver()?;
        let url = config.connection_url()?;
        let dsn = config.dsn();

        let backend = Backend::connect(driver, &url, &dsn)
            .await
            .map_err(|err| {
                error!(target: "quarry.sql", dsn = %dsn, error = %err, "connection failed");
                err
            })?;

        info!(target: "quarry.sql", dsn = %dsn, "connection opened");
        Ok(Self { backend, dsn })
    }

    /// The credential-free identity of this connection
    pub fn dsn(&self) -> &str {
        &self.dsn
    }

    /// Close the connection gracefully
    pub async fn close(self) -> Result<()> {
        let Self { backend, dsn } = self;
        match backend {
            #[cfg(feature = "postgres")]
            Backend::Postgres(conn) => sqlx::Connection::close(conn).await?,
            #[cfg(feature = "mysql")]
            Backend::MySql(conn) => sqlx::Connection::close(conn).await?,
            #[cfg(feature = "sqlite")]
            Backend::Sqlite(conn) => sqlx::Connection::close(conn).await?,
        }
        info!(target: "quarry.sql", dsn = %dsn, "connection closed");
        Ok(())
    }
}

impl Connection for DbConnection {
    fn dialect(&self) -> Dialect {
        match self.backend {
            #[cfg(feature = "postgres")]
            Backend::Postgres(ref conn) => Connection::dialect(conn),
            #[cfg(feature = "mysql")]
            Backend::MySql(ref conn) => Connection::dialect(conn),
            #[cfg(feature = "sqlite")]
            Backend::Sqlite(ref conn) => Connection::dialect(conn),
        }
    }

    async fn execute(&mut self, sql: &str, params: &[Value]) -> Result<ExecuteResult> {
        match self.backend {
            #[cfg(feature = "postgres")]
            Backend::Postgres(ref mut conn) => Connection::execute(conn, sql, params).await,
            #[cfg(feature = "mysql")]
            Backend::MySql(ref mut conn) => Connection::execute(conn, sql, params).await,
            #[cfg(feature = "sqlite")]
            Backend::Sqlite(ref mut conn) => Connection::execute(conn, sql, params).await,
        }
    }

    async fn fetch_all(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        match self.backend {
            #[cfg(feature = "postgres")]
            Backend::Postgres(ref mut conn) => Connection::fetch_all(conn, sql, params).await,
            #[cfg(feature = "mysql")]
            Backend::MySql(ref mut conn) => Connection::fetch_all(conn, sql, params).await,
            #[cfg(feature = "sqlite")]
            Backend::Sqlite(ref mut conn) => Connection::fetch_all(conn, sql, params).await,
        }
    }

    async fn query(&mut self, sql: &str) -> Result<Vec<Row>> {
        match self.backend {
            #[cfg(feature = "postgres")]
            Backend::Postgres(ref mut conn) => Connection::query(conn, sql).await,
            #[cfg(feature = "mysql")]
            Backend::MySql(ref mut conn) => Connection::query(conn, sql).await,
            #[cfg(feature = "sqlite")]
            Backend::Sqlite(ref mut conn) => Connection::query(conn, sql).await,
        }
    }
}

impl Database<DbConnection> {
    /// Open the connection described by `config` and take ownership of it
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        Ok(Self::new(DbConnection::open(config).await?))
    }

    /// Release the connection explicitly instead of on drop
    pub async fn close(self) -> Result<()> {
        self.into_inner().close().await
    }
}
