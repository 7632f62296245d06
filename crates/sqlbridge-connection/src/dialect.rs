use crate::error::{DataError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// SQL dialect accepted by a backend.
///
/// Callers use it to pick dialect-specific SQL generation before a
/// connection exists, see [`crate::ConnectionRegistry::dialect_for`].
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Athena,
    BigQuery,
    ClickHouse,
    Databricks,
    DataFusion,
    Dremio,
    DuckDb,
    #[default]
    Generic,
    MySql,
    Postgres,
    Redshift,
    Snowflake,
    Sqlite,
}

impl Dialect {
    pub fn all() -> &'static [Dialect] {
        &[
            Dialect::Athena,
            Dialect::BigQuery,
            Dialect::ClickHouse,
            Dialect::Databricks,
            Dialect::DataFusion,
            Dialect::Dremio,
            Dialect::DuckDb,
            Dialect::Generic,
            Dialect::MySql,
            Dialect::Postgres,
            Dialect::Redshift,
            Dialect::Snowflake,
            Dialect::Sqlite,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Athena => "athena",
            Dialect::BigQuery => "bigquery",
            Dialect::ClickHouse => "clickhouse",
            Dialect::Databricks => "databricks",
            Dialect::DataFusion => "datafusion",
            Dialect::Dremio => "dremio",
            Dialect::DuckDb => "duckdb",
            Dialect::Generic => "generic",
            Dialect::MySql => "mysql",
            Dialect::Postgres => "postgres",
            Dialect::Redshift => "redshift",
            Dialect::Snowflake => "snowflake",
            Dialect::Sqlite => "sqlite",
        }
    }

    /// Character used to quote identifiers
    pub fn quote_style(&self) -> char {
        match self {
            Dialect::BigQuery | Dialect::Databricks | Dialect::MySql => '`',
            _ => '"',
        }
    }

    /// Quote an identifier, doubling any embedded quote character
    pub fn quote_identifier(&self, ident: &str) -> String {
        let quote = self.quote_style();
        let mut quoted = String::with_capacity(ident.len() + 2);
        quoted.push(quote);
        for c in ident.chars() {
            if c == quote {
                quoted.push(quote);
            }
            quoted.push(c);
        }
        quoted.push(quote);
        quoted
    }

    /// Whether ORDER BY accepts NULLS FIRST / NULLS LAST
    pub fn supports_null_ordering(&self) -> bool {
        !matches!(self, Dialect::MySql)
    }

    /// Whether -inf, inf and NaN float values can be represented.
    /// When false, non-finite values must be sent as NULL.
    pub fn supports_non_finite_floats(&self) -> bool {
        !matches!(
            self,
            Dialect::Athena | Dialect::Generic | Dialect::MySql | Dialect::Sqlite
        )
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Dialect {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        let dialect = match s.to_ascii_lowercase().as_str() {
            "generic" | "default" => Dialect::Generic,
            name => Dialect::all()
                .iter()
                .copied()
                .find(|d| d.name() == name)
                .ok_or_else(|| {
                    DataError::invalid_configuration(format!("Unsupported dialect: {}", s))
                })?,
        };
        Ok(dialect)
    }
}
