//! Composition settings.

use crate::error::CraftResult;
use crate::naming::NamingStrategy;
use serde::Deserialize;

/// Marker appended after the WHERE part when ORDER BY must survive rewriting.
pub const DEFAULT_KEEP_ORDER_BY_MARKER: &str = "/* keep orderby */";

/// Settings shared by every statement composed through a [`SqlManager`](crate::SqlManager).
///
/// Loadable from TOML; missing keys keep their defaults:
///
/// ```toml
/// keep_order_by_marker = "/* keep orderby */"
/// log_max_sql_length = 200
/// table_naming = "lower_underscore"
/// column_naming = "lower_underscore"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ComposeConfig {
    /// Inert comment emitted for criteria flagged `keep_order_by`.
    pub keep_order_by_marker: String,
    /// Truncate logged SQL (in bytes). `None` means no truncation.
    pub log_max_sql_length: Option<usize>,
    /// Convention table names are derived into from entity names.
    pub table_naming: NamingStrategy,
    /// Convention column names are derived into from property names.
    pub column_naming: NamingStrategy,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            keep_order_by_marker: DEFAULT_KEEP_ORDER_BY_MARKER.to_string(),
            log_max_sql_length: Some(200),
            table_naming: NamingStrategy::LowerUnderscore,
            column_naming: NamingStrategy::LowerUnderscore,
        }
    }
}

impl ComposeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document.
    pub fn from_toml_str(raw: &str) -> CraftResult<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn with_keep_order_by_marker(mut self, marker: impl Into<String>) -> Self {
        self.keep_order_by_marker = marker.into();
        self
    }

    /// Set maximum SQL length written to logs.
    pub fn with_log_max_sql_length(mut self, len: usize) -> Self {
        self.log_max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation in logs.
    pub fn no_truncate(mut self) -> Self {
        self.log_max_sql_length = None;
        self
    }

    pub fn with_table_naming(mut self, naming: NamingStrategy) -> Self {
        self.table_naming = naming;
        self
    }

    pub fn with_column_naming(mut self, naming: NamingStrategy) -> Self {
        self.column_naming = naming;
        self
    }

    pub(crate) fn truncate_sql(&self, sql: &str) -> String {
        match self.log_max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }
}

pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
