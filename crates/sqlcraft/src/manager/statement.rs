use crate::criteria::Category;
use crate::template::{self, TemplateArgs};
use crate::value::Value;
use serde::Serialize;
use std::fmt;

/// A composed statement: SQL with 0-based `?n` placeholders plus the values
/// bound to them, in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    sql: String,
    params: Vec<Value>,
    /// `:name` placeholders the caller must bind.
    named: Vec<String>,
    category: Category,
}

impl Statement {
    pub(crate) fn new(sql: String, params: Vec<Value>, named: Vec<String>, category: Category) -> Self {
        Self {
            sql,
            params,
            named,
            category,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn named(&self) -> &[String] {
        &self.named
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }

    /// SQL with every bound value written as a literal, for logs and tests.
    pub fn inline(&self) -> String {
        template::format(&self.sql, &Literals(&self.params))
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

struct Literals<'a>(&'a [Value]);

impl TemplateArgs for Literals<'_> {
    const POSITIONAL: bool = true;

    fn by_index(&self, index: usize) -> Option<String> {
        self.0.get(index).map(Value::to_sql_literal)
    }
}
