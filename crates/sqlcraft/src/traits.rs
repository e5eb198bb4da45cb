//! Builder and sink traits.

use crate::error::CraftResult;
use crate::manager::{SqlManager, Statement};

/// Base trait for statement builders.
pub trait SqlBuilder {
    /// Compose the statement with bound parameters.
    fn build(&self) -> CraftResult<Statement>;

    /// Debug helper: the statement with values inlined.
    fn to_sql(&self) -> CraftResult<String> {
        self.build().map(|statement| statement.inline())
    }

    /// Validate builder state.
    fn validate(&self) -> CraftResult<()> {
        Ok(())
    }

    /// Validate, compose and hand the statement to `sink`.
    fn emit<S: StatementSink + ?Sized>(&self, sink: &mut S) -> CraftResult<()> {
        self.validate()?;
        sink.accept(self.build()?)
    }
}

impl SqlBuilder for SqlManager<'_> {
    fn build(&self) -> CraftResult<Statement> {
        SqlManager::build(self)
    }

    fn to_sql(&self) -> CraftResult<String> {
        self.intact_string()
    }
}

/// Receives finished statements (an executor, a batch, a test buffer).
pub trait StatementSink {
    fn accept(&mut self, statement: Statement) -> CraftResult<()>;
}

impl StatementSink for Vec<Statement> {
    fn accept(&mut self, statement: Statement) -> CraftResult<()> {
        self.push(statement);
        Ok(())
    }
}

impl<S: StatementSink + ?Sized> StatementSink for &mut S {
    fn accept(&mut self, statement: Statement) -> CraftResult<()> {
        (**self).accept(statement)
    }
}
