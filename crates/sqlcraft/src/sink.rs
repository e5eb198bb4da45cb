use crate::config::truncate_sql_bytes;
use crate::error::CraftResult;
use crate::manager::Statement;
use crate::traits::StatementSink;
use tracing::Level;

/// A `tracing`-based sink that logs every statement it receives and drops it.
///
/// Useful as a dry-run target, or chained in front of a real executor.
#[derive(Debug, Clone)]
pub struct TracingSink {
    /// Tracing event level to emit at.
    pub level: Level,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
    /// Log the statement with values inlined instead of placeholders.
    pub inline: bool,
}

impl Default for TracingSink {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            max_sql_length: Some(200),
            inline: false,
        }
    }
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the tracing event level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    /// Log values inlined as SQL literals.
    pub fn inline(mut self) -> Self {
        self.inline = true;
        self
    }

    fn truncate_sql(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }
}

impl StatementSink for TracingSink {
    fn accept(&mut self, statement: Statement) -> CraftResult<()> {
        /// Dispatch a tracing event at a runtime-determined level.
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN  => tracing::warn!($($field)*),
                    Level::INFO  => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    Level::TRACE => tracing::trace!($($field)*),
                }
            };
        }

        let sql = if self.inline {
            self.truncate_sql(&statement.inline())
        } else {
            self.truncate_sql(statement.sql())
        };
        emit_at_level!(
            self.level,
            target: "sqlcraft.sql",
            category = ?statement.category(),
            param_count = statement.param_count(),
            named = statement.named().len(),
            sql = %sql,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::Criteria;
    use crate::manager::SqlManager;
    use crate::meta::{ColumnDef, TableInfo};
    use crate::traits::SqlBuilder;
    use std::sync::Arc;

    #[test]
    fn emit_accepts_into_any_sink() {
        let info = Arc::new(
            TableInfo::builder("Tag")
                .column(ColumnDef::new("id", "i64").id())
                .build()
                .unwrap(),
        );
        let mut criteria = Criteria::select(info);
        criteria.eq("id", 9).unwrap();
        let manager = SqlManager::from_criteria(&criteria).unwrap();

        let mut buffer: Vec<Statement> = Vec::new();
        manager.emit(&mut buffer).unwrap();
        manager.emit(&mut TracingSink::new().inline()).unwrap();
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer[0].sql(), "SELECT * FROM tag WHERE id = ?0");
        assert_eq!(manager.to_sql().unwrap(), "SELECT * FROM tag WHERE id = 9");
    }

    #[test]
    fn truncation_adds_ellipsis() {
        let sink = TracingSink::new().max_sql_length(3);
        assert_eq!(sink.truncate_sql("SELECT"), "SEL...");
        assert_eq!(sink.no_truncate().truncate_sql("SELECT"), "SELECT");
    }
}
