//! Projection items: plain columns and aggregate functions.

use crate::criterion::ColumnRef;
use crate::fragment::{Fragment, RenderContext};
use std::fmt;

/// Arguments an aggregate renders verbatim, without qualification or DISTINCT.
const LITERAL_ARGS: [&str; 3] = ["*", "1", "0"];

/// A projected column with an optional output alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub column: ColumnRef,
    pub alias: Option<String>,
}

impl Selection {
    pub fn new(column: impl Into<ColumnRef>) -> Self {
        Self {
            column: column.into(),
            alias: None,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    fn segment(&self, aliased: bool) -> String {
        match &self.alias {
            Some(alias) if aliased => format!("{} AS {alias}", self.column),
            _ => self.column.to_string(),
        }
    }
}

/// Aggregate function name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aggregate {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl Aggregate {
    pub const fn name(self) -> &'static str {
        match self {
            Aggregate::Count => "COUNT",
            Aggregate::Sum => "SUM",
            Aggregate::Avg => "AVG",
            Aggregate::Min => "MIN",
            Aggregate::Max => "MAX",
        }
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An aggregate over one column, e.g. `CAST(MIN(u.score) AS DECIMAL(38, 2)) AS min_score`.
///
/// ```ignore
/// use sqlcraft::{Function, Fragment};
///
/// assert_eq!(Function::count("*").to_segment(), "COUNT(*)");
/// assert_eq!(Function::min("score").scale(2).to_segment(), "CAST(MIN(score) AS DECIMAL(38, 2))");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub aggregate: Aggregate,
    pub column: ColumnRef,
    pub distinct: bool,
    pub scale: Option<u8>,
    pub alias: Option<String>,
}

impl Function {
    pub fn new(aggregate: Aggregate, column: impl Into<ColumnRef>) -> Self {
        Self {
            aggregate,
            column: column.into(),
            distinct: false,
            scale: None,
            alias: None,
        }
    }

    pub fn count(column: impl Into<ColumnRef>) -> Self {
        Self::new(Aggregate::Count, column)
    }

    pub fn sum(column: impl Into<ColumnRef>) -> Self {
        Self::new(Aggregate::Sum, column)
    }

    pub fn avg(column: impl Into<ColumnRef>) -> Self {
        Self::new(Aggregate::Avg, column)
    }

    pub fn min(column: impl Into<ColumnRef>) -> Self {
        Self::new(Aggregate::Min, column)
    }

    pub fn max(column: impl Into<ColumnRef>) -> Self {
        Self::new(Aggregate::Max, column)
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Cast the result to `DECIMAL(38, scale)`; ignored for COUNT.
    pub fn scale(mut self, scale: u8) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Whether the argument is one of the verbatim literals `*`, `1`, `0`.
    pub fn is_literal(&self) -> bool {
        LITERAL_ARGS.contains(&self.column.column.as_str())
    }

    /// The aggregate expression without its output alias.
    pub fn render_expr(&self) -> String {
        let call = if self.is_literal() {
            format!("{}({})", self.aggregate, self.column.column)
        } else if self.distinct {
            format!("{}(DISTINCT {})", self.aggregate, self.column)
        } else {
            format!("{}({})", self.aggregate, self.column)
        };
        match self.scale {
            Some(scale) if self.aggregate != Aggregate::Count => {
                format!("CAST({call} AS DECIMAL(38, {scale}))")
            }
            _ => call,
        }
    }

    fn segment(&self, aliased: bool) -> String {
        match &self.alias {
            Some(alias) if aliased => format!("{} AS {alias}", self.render_expr()),
            _ => self.render_expr(),
        }
    }
}

impl Fragment for Function {
    fn render(&self, _ctx: &mut RenderContext) -> String {
        self.segment(true)
    }
}

/// One item of a SELECT list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    Column(Selection),
    Function(Function),
    /// Raw SQL expression, rendered verbatim.
    Raw(String),
}

impl Projection {
    /// Render this item, with or without its output alias.
    pub fn segment(&self, aliased: bool) -> String {
        match self {
            Projection::Column(s) => s.segment(aliased),
            Projection::Function(f) => f.segment(aliased),
            Projection::Raw(sql) => sql.clone(),
        }
    }

    /// Whether this item is an aggregate (excluded from `GROUP BY` when grouping all).
    pub fn is_aggregate(&self) -> bool {
        matches!(self, Projection::Function(_))
    }

    /// Re-own the projected column under `owner`.
    pub(crate) fn qualify(&mut self, owner: Option<&str>) {
        match self {
            Projection::Column(s) => s.column = s.column.with_owner(owner),
            Projection::Function(f) if !f.is_literal() => f.column = f.column.with_owner(owner),
            Projection::Function(_) | Projection::Raw(_) => {}
        }
    }
}

impl Fragment for Projection {
    fn render(&self, _ctx: &mut RenderContext) -> String {
        self.segment(true)
    }
}

impl From<Selection> for Projection {
    fn from(selection: Selection) -> Self {
        Projection::Column(selection)
    }
}

impl From<Function> for Projection {
    fn from(function: Function) -> Self {
        Projection::Function(function)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_min_is_cast_to_decimal() {
        assert_eq!(
            Function::min("score").scale(2).to_segment(),
            "CAST(MIN(score) AS DECIMAL(38, 2))"
        );
    }

    #[test]
    fn count_literal_is_unqualified_and_never_distinct() {
        assert_eq!(Function::count("*").to_segment(), "COUNT(*)");
        let f = Function::count(ColumnRef::qualified("u", "1")).distinct();
        assert_eq!(f.to_segment(), "COUNT(1)");
    }

    #[test]
    fn count_ignores_scale() {
        assert_eq!(Function::count("id").scale(3).to_segment(), "COUNT(id)");
    }

    #[test]
    fn distinct_alias_and_owner() {
        let f = Function::sum(ColumnRef::qualified("o", "amount"))
            .distinct()
            .alias("total");
        assert_eq!(f.to_segment(), "SUM(DISTINCT o.amount) AS total");
        assert_eq!(Projection::from(f).segment(false), "SUM(DISTINCT o.amount)");
    }

    #[test]
    fn selection_alias_is_optional_at_render() {
        let p = Projection::from(Selection::new("user_name").alias("userName"));
        assert_eq!(p.segment(true), "user_name AS userName");
        assert_eq!(p.segment(false), "user_name");
    }

    #[test]
    fn qualify_leaves_literal_arguments_alone() {
        let mut p = Projection::from(Function::count("*"));
        p.qualify(Some("u"));
        assert_eq!(p.segment(true), "COUNT(*)");
        let mut p = Projection::from(Selection::new("id"));
        p.qualify(Some("u"));
        assert_eq!(p.segment(true), "u.id");
    }
}
