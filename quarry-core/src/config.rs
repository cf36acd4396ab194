//! Connection settings

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use url::Url;

use crate::params::Dialect;
use crate::{Error, Result};

const ENV_PREFIX: &str = "QUARRY_DB_";

/// Database driver named in [`DatabaseConfig::driver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    Postgres,
    MySql,
    Sqlite,
}

impl Driver {
    pub fn dialect(&self) -> Dialect {
        match self {
            Driver::Postgres => Dialect::Postgres,
            Driver::MySql => Dialect::MySql,
            Driver::Sqlite => Dialect::Sqlite,
        }
    }

    /// URL scheme understood by sqlx
    pub fn scheme(&self) -> &'static str {
        match self {
            Driver::Postgres => "postgres",
            Driver::MySql => "mysql",
            Driver::Sqlite => "sqlite",
        }
    }
}

impl FromStr for Driver {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pgsql" | "postgres" | "postgresql" => Ok(Driver::Postgres),
            "mysql" | "mariadb" => Ok(Driver::MySql),
            "sqlite" | "sqlite3" => Ok(Driver::Sqlite),
            other => Err(Error::config(format!("unknown driver '{other}'"))),
        }
    }
}

/// Credentials record handed to the connection factory
#[derive(Clone, Deserialize)]
pub struct DatabaseConfig {
    pub driver: String,
    #[serde(default)]
    pub host: String,
    pub database: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl DatabaseConfig {
    pub fn new(
        driver: impl Into<String>,
        host: impl Into<String>,
        database: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            driver: driver.into(),
            host: host.into(),
            database: database.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// In-memory SQLite database, mostly useful for tests
    pub fn sqlite_memory() -> Self {
        Self::new("sqlite", "", ":memory:", "", "")
    }

    /// Read `QUARRY_DB_DRIVER`, `QUARRY_DB_HOST`, `QUARRY_DB_DATABASE`,
    /// `QUARRY_DB_USERNAME` and `QUARRY_DB_PASSWORD`. Driver and database are
    /// required.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |field: &str| lookup(&format!("{ENV_PREFIX}{field}"));
        let required = |field: &str| {
            get(field).ok_or_else(|| Error::config(format!("{ENV_PREFIX}{field} is not set")))
        };

        Ok(Self {
            driver: required("DRIVER")?,
            host: get("HOST").unwrap_or_default(),
            database: required("DATABASE")?,
            username: get("USERNAME").unwrap_or_default(),
            password: get("PASSWORD").unwrap_or_default(),
        })
    }

    pub fn driver(&self) -> Result<Driver> {
        self.driver.parse()
    }

    /// `<driver>:host=<host>;dbname=<database>`; carries no credentials, so it
    /// is what logs and errors show.
    pub fn dsn(&self) -> String {
        format!("{}:host={};dbname={}", self.driver, self.host, self.database)
    }

    /// The sqlx connection URL, with credentials percent-encoded
    pub fn connection_url(&self) -> Result<String> {
        let driver = self.driver()?;
        if driver == Driver::Sqlite {
            return Ok(format!("sqlite:{}", self.database));
        }

        let invalid = || Error::config(format!("cannot build a connection URL for {}", self.dsn()));

        let mut url = Url::parse(&format!("{}://{}", driver.scheme(), self.host))
            .map_err(|_| invalid())?;
        url.set_username(&self.username).map_err(|_| invalid())?;
        if !self.password.is_empty() {
            url.set_password(Some(&self.password))
                .map_err(|_| invalid())?;
        }
        url.set_path(&format!("/{}", self.database));

        Ok(url.to_string())
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("driver", &self.driver)
            .field("host", &self.host)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
