//! Per-call options for the parser facade.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dialect::{Dialect, DEFAULT_DATABASE};
use crate::render::{RenderConfig, RenderMode};
use crate::Result;

/// What a whitelist check matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckType {
    #[default]
    Table,
    Column,
}

impl CheckType {
    /// Returns the lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Column => "column",
        }
    }
}

impl fmt::Display for CheckType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "column" => Ok(Self::Column),
            other => Err(format!("{other} is not valid check mode")),
        }
    }
}

/// Options accepted by every [`SqlParser`](crate::SqlParser) operation.
///
/// Deserializes from the camelCase JSON form, e.g.
/// `{"database": "postgresql", "trimQuery": false, "type": "column"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    /// Dialect name; MySQL when absent.
    pub database: Option<String>,
    /// Trim surrounding whitespace before parsing.
    pub trim_query: bool,
    /// Whitelist granularity.
    #[serde(rename = "type")]
    pub check_type: CheckType,
    pub mode: RenderMode,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            database: None,
            trim_query: true,
            check_type: CheckType::Table,
            mode: RenderMode::BestEffort,
        }
    }
}

impl Options {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the dialect by name.
    #[must_use]
    pub fn database(mut self, name: impl Into<String>) -> Self {
        self.database = Some(name.into());
        self
    }

    /// Enables or disables query trimming.
    #[must_use]
    pub const fn trim_query(mut self, trim: bool) -> Self {
        self.trim_query = trim;
        self
    }

    /// Sets the whitelist granularity.
    #[must_use]
    pub const fn check_type(mut self, check_type: CheckType) -> Self {
        self.check_type = check_type;
        self
    }

    /// Sets the render mode.
    #[must_use]
    pub const fn mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    /// Returns the dialect name, defaulting to MySQL.
    #[must_use]
    pub fn database_name(&self) -> &str {
        self.database.as_deref().unwrap_or(DEFAULT_DATABASE)
    }

    /// Resolves the dialect.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDialect`](crate::Error::UnsupportedDialect)
    /// for unknown names.
    pub fn dialect(&self) -> Result<Dialect> {
        self.database_name().parse()
    }

    /// Resolves the configuration threaded through rendering.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown dialect names.
    pub fn render_config(&self) -> Result<RenderConfig> {
        Ok(RenderConfig::new(self.dialect()?).with_mode(self.mode))
    }

    /// Reads options from their JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) for malformed input.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
