use crate::db::connection::Dialect;
use crate::db::render::{render_rows, row_cells};
use crate::error::SearchError;
use sqlx::any::AnyRow;
use sqlx::{AnyPool, Row};
use std::fmt::Write;
use tracing::debug;

/// A column as reported by the database catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub not_null: bool,
}

/// Read side of the database the agent's tools operate on.
#[derive(Clone)]
pub struct SqlDatabase {
    pool: AnyPool,
    dialect: Dialect,
    sample_rows: usize,
}

impl SqlDatabase {
    pub fn new(pool: AnyPool, dialect: Dialect) -> Self {
        Self {
            pool,
            dialect,
            sample_rows: 3,
        }
    }

    pub fn with_sample_rows(mut self, sample_rows: usize) -> Self {
        self.sample_rows = sample_rows;
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Names of the user tables, sorted. Catalog and system tables are excluded.
    pub async fn usable_table_names(&self) -> Result<Vec<String>, SearchError> {
        let sql = match self.dialect {
            Dialect::Sqlite => {
                "SELECT name FROM sqlite_master \
                 WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name"
            }
            Dialect::Postgres => {
                "SELECT table_name::text FROM information_schema.tables \
                 WHERE table_schema = current_schema() AND table_type = 'BASE TABLE' \
                 ORDER BY table_name"
            }
            Dialect::MySql => {
                "SELECT CAST(table_name AS CHAR) FROM information_schema.tables \
                 WHERE table_schema = DATABASE() AND table_type = 'BASE TABLE' \
                 ORDER BY table_name"
            }
        };
        let rows = sqlx::query(sql).fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| row.try_get::<String, _>(0).map_err(SearchError::from))
            .collect()
    }

    /// Map requested names onto the database's own spelling, case-insensitively.
    /// Every name must exist; the error lists the ones that do not.
    pub async fn resolve_tables(&self, requested: &[String]) -> Result<Vec<String>, SearchError> {
        let usable = self.usable_table_names().await?;
        let mut resolved = Vec::with_capacity(requested.len());
        let mut missing = Vec::new();
        for name in requested {
            match usable.iter().find(|t| t.eq_ignore_ascii_case(name)) {
                Some(actual) => resolved.push(actual.clone()),
                None => missing.push(name.clone()),
            }
        }
        if !missing.is_empty() {
            return Err(SearchError::UnknownTables(missing));
        }
        Ok(resolved)
    }

    pub async fn columns(&self, table: &str) -> Result<Vec<ColumnInfo>, SearchError> {
        let sql = match self.dialect {
            Dialect::Sqlite => {
                r#"SELECT name, type, "notnull" FROM pragma_table_info(?) ORDER BY cid"#
            }
            Dialect::Postgres => {
                "SELECT column_name::text, data_type::text, \
                 (CASE WHEN is_nullable = 'NO' THEN 1 ELSE 0 END)::bigint \
                 FROM information_schema.columns \
                 WHERE table_schema = current_schema() AND table_name = $1 \
                 ORDER BY ordinal_position"
            }
            Dialect::MySql => {
                "SELECT CAST(column_name AS CHAR), CAST(column_type AS CHAR), \
                 CAST(CASE WHEN is_nullable = 'NO' THEN 1 ELSE 0 END AS SIGNED) \
                 FROM information_schema.columns \
                 WHERE table_schema = DATABASE() AND table_name = ? \
                 ORDER BY ordinal_position"
            }
        };
        let rows = sqlx::query(sql).bind(table).fetch_all(&self.pool).await?;
        rows.iter().map(column_from_row).collect()
    }

    /// `CREATE TABLE` rendering plus a block of sample rows for each table.
    pub async fn table_info(&self, requested: &[String]) -> Result<String, SearchError> {
        let tables = self.resolve_tables(requested).await?;
        let mut blocks = Vec::with_capacity(tables.len());
        for table in &tables {
            blocks.push(self.describe_table(table).await?);
        }
        Ok(blocks.join("\n\n"))
    }

    async fn describe_table(&self, table: &str) -> Result<String, SearchError> {
        let columns = self.columns(table).await?;
        let mut out = String::new();

        let _ = writeln!(out, "CREATE TABLE {} (", self.dialect.quote_ident(table));
        let defs: Vec<String> = columns
            .iter()
            .map(|c| {
                let mut def = format!("\t{} {}", self.dialect.quote_ident(&c.name), c.data_type);
                if c.not_null {
                    def.push_str(" NOT NULL");
                }
                def
            })
            .collect();
        out.push_str(&defs.join(",\n"));
        out.push_str("\n)");

        if self.sample_rows == 0 {
            return Ok(out);
        }
        match self.sample(table).await {
            Ok(rows) => {
                let _ = write!(
                    out,
                    "\n\n/*\n{} rows from {} table:\n",
                    self.sample_rows, table
                );
                let header: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
                out.push_str(&header.join("\t"));
                for row in &rows {
                    out.push('\n');
                    out.push_str(&row_cells(row).join("\t"));
                }
                out.push_str("\n*/");
            }
            Err(e) => {
                debug!(table, error = %e, "sample rows unavailable");
            }
        }
        Ok(out)
    }

    async fn sample(&self, table: &str) -> Result<Vec<AnyRow>, SearchError> {
        let sql = format!(
            "SELECT * FROM {} LIMIT {}",
            self.dialect.quote_ident(table),
            self.sample_rows
        );
        Ok(sqlx::query(&sql).fetch_all(&self.pool).await?)
    }

    /// Execute a statement and render whatever rows it returns.
    pub async fn run(&self, sql: &str) -> Result<String, SearchError> {
        let rows = sqlx::query(sql).fetch_all(&self.pool).await?;
        Ok(render_rows(&rows))
    }
}

fn column_from_row(row: &AnyRow) -> Result<ColumnInfo, SearchError> {
    let name: String = row.try_get(0)?;
    let data_type: String = row.try_get::<Option<String>, _>(1)?.unwrap_or_default();
    let not_null = row.try_get::<i64, _>(2).unwrap_or(0) != 0;
    Ok(ColumnInfo {
        name,
        data_type,
        not_null,
    })
}
