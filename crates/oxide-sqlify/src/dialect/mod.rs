//! SQL Dialect support.
//!
//! Every supported database is a variant of [`Dialect`]. The enum only answers
//! lookup questions (how to quote an identifier, how to spell a row limit,
//! which statement quirks apply); it holds no state, so one value can be
//! copied into every render call.

use std::fmt;
use std::str::FromStr;

/// Dialect used when the caller does not name one.
pub const DEFAULT_DATABASE: &str = "mysql";

/// A supported SQL dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Dialect {
    Athena,
    BigQuery,
    ClickHouse,
    Db2,
    DuckDb,
    FlinkSql,
    Hive,
    MariaDb,
    #[default]
    MySql,
    NoQl,
    PostgreSql,
    Redshift,
    Snowflake,
    Sqlite,
    TransactSql,
    Trino,
}

/// How a dialect delimits identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierQuote {
    /// `` `name` ``
    Backtick,
    /// `"name"`
    DoubleQuote,
    /// `[name]`
    Bracket,
    /// Identifiers are emitted as written.
    None,
}

impl IdentifierQuote {
    /// Returns the opening and closing delimiters, if any.
    #[must_use]
    pub const fn delimiters(self) -> Option<(char, char)> {
        match self {
            Self::Backtick => Some(('`', '`')),
            Self::DoubleQuote => Some(('"', '"')),
            Self::Bracket => Some(('[', ']')),
            Self::None => None,
        }
    }
}

/// How a dialect spells a row limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitStyle {
    /// `LIMIT <count> OFFSET <offset>`
    LimitOffset,
    /// `OFFSET <offset> ROWS FETCH NEXT <count> ROWS ONLY`
    FetchOffset,
}

impl Dialect {
    /// Every supported dialect.
    pub const ALL: [Self; 16] = [
        Self::Athena,
        Self::BigQuery,
        Self::ClickHouse,
        Self::Db2,
        Self::DuckDb,
        Self::FlinkSql,
        Self::Hive,
        Self::MariaDb,
        Self::MySql,
        Self::NoQl,
        Self::PostgreSql,
        Self::Redshift,
        Self::Snowflake,
        Self::Sqlite,
        Self::TransactSql,
        Self::Trino,
    ];

    /// Looks a dialect up by name, case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        Self::ALL.into_iter().find(|d| d.name() == name)
    }

    /// Returns the lowercase name of the dialect.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Athena => "athena",
            Self::BigQuery => "bigquery",
            Self::ClickHouse => "clickhouse",
            Self::Db2 => "db2",
            Self::DuckDb => "duckdb",
            Self::FlinkSql => "flinksql",
            Self::Hive => "hive",
            Self::MariaDb => "mariadb",
            Self::MySql => "mysql",
            Self::NoQl => "noql",
            Self::PostgreSql => "postgresql",
            Self::Redshift => "redshift",
            Self::Snowflake => "snowflake",
            Self::Sqlite => "sqlite",
            Self::TransactSql => "transactsql",
            Self::Trino => "trino",
        }
    }

    /// Returns how the dialect delimits identifiers.
    #[must_use]
    pub const fn identifier_quote(self) -> IdentifierQuote {
        match self {
            Self::MySql | Self::MariaDb | Self::Hive | Self::FlinkSql | Self::ClickHouse => {
                IdentifierQuote::Backtick
            }
            Self::TransactSql => IdentifierQuote::Bracket,
            Self::BigQuery | Self::Db2 => IdentifierQuote::None,
            Self::PostgreSql
            | Self::Sqlite
            | Self::DuckDb
            | Self::Redshift
            | Self::Snowflake
            | Self::Trino
            | Self::Athena
            | Self::NoQl => IdentifierQuote::DoubleQuote,
        }
    }

    /// Quotes an identifier, doubling any embedded closing delimiter.
    ///
    /// `*` is never quoted.
    #[must_use]
    pub fn quote_identifier(self, name: &str) -> String {
        if name == "*" {
            return name.to_string();
        }
        match self.identifier_quote().delimiters() {
            Some((open, close)) => {
                let escaped = name.replace(close, &format!("{close}{close}"));
                format!("{open}{escaped}{close}")
            }
            None => name.to_string(),
        }
    }

    /// Returns how the dialect spells LIMIT/OFFSET.
    #[must_use]
    pub const fn limit_style(self) -> LimitStyle {
        match self {
            Self::TransactSql | Self::Db2 => LimitStyle::FetchOffset,
            _ => LimitStyle::LimitOffset,
        }
    }

    /// Returns whether `FETCH` must follow an `OFFSET .. ROWS` clause.
    #[must_use]
    pub const fn requires_offset_before_fetch(self) -> bool {
        matches!(self, Self::TransactSql)
    }

    /// Returns whether `LIMIT <offset>, <count>` is accepted.
    #[must_use]
    pub const fn supports_limit_comma(self) -> bool {
        matches!(
            self,
            Self::MySql | Self::MariaDb | Self::ClickHouse | Self::Sqlite
        )
    }

    /// Returns whether DELETE prints the table references before `FROM`.
    ///
    /// ClickHouse rejects `DELETE t FROM t`, so the segment is always omitted.
    #[must_use]
    pub const fn prints_delete_table_refs(self) -> bool {
        !matches!(self, Self::ClickHouse)
    }

    /// Returns whether table aliases are introduced with `AS`.
    #[must_use]
    pub const fn table_alias_keyword(self) -> bool {
        !matches!(self, Self::DuckDb)
    }

    /// Returns whether the grammar accepts a RETURNING clause.
    #[must_use]
    pub const fn supports_returning(self) -> bool {
        matches!(
            self,
            Self::PostgreSql | Self::Sqlite | Self::DuckDb | Self::MariaDb | Self::Redshift
        )
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| crate::Error::UnsupportedDialect(s.to_string()))
    }
}
