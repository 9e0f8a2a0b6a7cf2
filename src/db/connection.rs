use crate::config::Config;
use crate::db::database::SqlDatabase;
use crate::error::SearchError;
use sqlx::any::AnyPoolOptions;
use std::fmt;
use tracing::debug;
use url::Url;

/// The three values needed to reach the database. Read once at startup.
#[derive(Clone)]
pub struct Credentials {
    pub user: String,
    password: String,
    /// Database URL without credentials.
    pub locator: String,
}

impl Credentials {
    pub fn new(
        user: impl Into<String>,
        password: impl Into<String>,
        locator: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
            locator: locator.into(),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(&cfg.db_user, &cfg.db_password, &cfg.db_connect)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("locator", &self.locator)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    MySql,
    Sqlite,
}

impl Dialect {
    pub fn from_scheme(scheme: &str) -> Option<Self> {
        match scheme.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Some(Self::Postgres),
            "mysql" | "mariadb" => Some(Self::MySql),
            "sqlite" => Some(Self::Sqlite),
            _ => None,
        }
    }

    /// Human readable name, as used in the agent's instruction.
    pub fn name(self) -> &'static str {
        match self {
            Self::Postgres => "PostgreSQL",
            Self::MySql => "MySQL",
            Self::Sqlite => "SQLite",
        }
    }

    pub fn quote_ident(self, ident: &str) -> String {
        match self {
            Self::MySql => format!("`{}`", ident.replace('`', "``")),
            Self::Postgres | Self::Sqlite => format!("\"{}\"", ident.replace('"', "\"\"")),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Build the driver URL: the locator with user and password injected.
/// SQLite locators are file paths and carry no credentials.
pub fn connection_url(creds: &Credentials) -> Result<(Url, Dialect), SearchError> {
    let mut url = Url::parse(creds.locator.trim())?;
    let dialect = Dialect::from_scheme(url.scheme())
        .ok_or_else(|| SearchError::UnsupportedDatabase(url.scheme().to_string()))?;

    if dialect == Dialect::Sqlite {
        debug!("sqlite locator; ignoring user and password");
        return Ok((url, dialect));
    }

    url.set_username(&creds.user).map_err(|_| {
        SearchError::UnsupportedDatabase(format!("{} cannot carry a user name", creds.locator))
    })?;
    url.set_password(Some(&creds.password)).map_err(|_| {
        SearchError::UnsupportedDatabase(format!("{} cannot carry a password", creds.locator))
    })?;
    Ok((url, dialect))
}

/// Open the pool with driver defaults. Any failure is fatal to startup.
pub async fn connect(creds: &Credentials, sample_rows: usize) -> Result<SqlDatabase, SearchError> {
    sqlx::any::install_default_drivers();
    let (url, dialect) = connection_url(creds)?;
    let pool = AnyPoolOptions::new().connect(url.as_str()).await?;
    Ok(SqlDatabase::new(pool, dialect).with_sample_rows(sample_rows))
}
