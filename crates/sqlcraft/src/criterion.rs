//! Single predicates: [`Symbol`] (operator), [`Slot`] (connector), [`Operand`] and
//! [`Criterion`].
//!
//! # Example
//! ```ignore
//! use sqlcraft::{Criterion, Fragment};
//!
//! let c = Criterion::ge("age", 18)?;
//! assert_eq!(c.to_segment(), "AND age >= 18");
//!
//! let c = Criterion::between("score", 10, 20)?.or();
//! assert_eq!(c.to_segment(), "OR score BETWEEN 10 AND 20");
//! # Ok::<(), sqlcraft::CraftError>(())
//! ```

use crate::error::{CraftError, CraftResult};
use crate::fragment::{Fragment, RenderContext};
use crate::value::Value;
use std::fmt;

/// Comparison operator of a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    IsNull,
    IsNotNull,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    In,
    NotIn,
    Exists,
    NotExists,
    Like,
    NotLike,
    Between,
    NotBetween,
}

/// Operand shape an operator accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// `IS NULL` family: no operand.
    Nullary,
    /// `EXISTS` family: a sub-query only.
    SubQuery,
    /// Comparisons: one operand.
    Unary,
    /// `BETWEEN` family: exactly two operands.
    Binary,
    /// `IN` family: a list of operands.
    Variadic,
}

impl Symbol {
    /// The SQL token this operator renders to.
    pub const fn token(self) -> &'static str {
        match self {
            Symbol::IsNull => "IS NULL",
            Symbol::IsNotNull => "IS NOT NULL",
            Symbol::Eq => "=",
            Symbol::Ne => "<>",
            Symbol::Lt => "<",
            Symbol::Le => "<=",
            Symbol::Gt => ">",
            Symbol::Ge => ">=",
            Symbol::In => "IN",
            Symbol::NotIn => "NOT IN",
            Symbol::Exists => "EXISTS",
            Symbol::NotExists => "NOT EXISTS",
            Symbol::Like => "LIKE",
            Symbol::NotLike => "NOT LIKE",
            Symbol::Between => "BETWEEN",
            Symbol::NotBetween => "NOT BETWEEN",
        }
    }

    pub const fn arity(self) -> Arity {
        match self {
            Symbol::IsNull | Symbol::IsNotNull => Arity::Nullary,
            Symbol::Exists | Symbol::NotExists => Arity::SubQuery,
            Symbol::Between | Symbol::NotBetween => Arity::Binary,
            Symbol::In | Symbol::NotIn => Arity::Variadic,
            Symbol::Eq
            | Symbol::Ne
            | Symbol::Lt
            | Symbol::Le
            | Symbol::Gt
            | Symbol::Ge
            | Symbol::Like
            | Symbol::NotLike => Arity::Unary,
        }
    }

    /// Check that `operand` fits this operator.
    pub fn check(self, operand: &Operand) -> CraftResult<()> {
        let ok = match (self.arity(), operand) {
            (Arity::Nullary, Operand::None) => true,
            (Arity::SubQuery, Operand::SubQuery(sql)) => !sql.trim().is_empty(),
            (
                Arity::Unary,
                Operand::Scalar(_) | Operand::Named(_) | Operand::Column(_) | Operand::SubQuery(_),
            ) => true,
            (Arity::Binary, Operand::Pair(_, _)) => true,
            (Arity::Variadic, Operand::List(_) | Operand::Named(_) | Operand::SubQuery(_)) => true,
            _ => false,
        };
        if ok {
            Ok(())
        } else {
            Err(CraftError::invalid_operand(
                self.token(),
                format!("{} does not accept {}", self.arity_name(), operand.shape()),
            ))
        }
    }

    fn arity_name(self) -> &'static str {
        match self.arity() {
            Arity::Nullary => "an operator without operands",
            Arity::SubQuery => "a sub-query operator",
            Arity::Unary => "a single-operand operator",
            Arity::Binary => "a two-operand operator",
            Arity::Variadic => "a list operator",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Logical connector placed before a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Slot {
    #[default]
    And,
    Or,
    /// No connector: first predicate of a clause, or an assignment in a SET list.
    None,
}

impl Slot {
    pub const fn token(self) -> Option<&'static str> {
        match self {
            Slot::And => Some("AND"),
            Slot::Or => Some("OR"),
            Slot::None => None,
        }
    }

    pub(crate) fn write(self, out: &mut String) {
        if let Some(token) = self.token() {
            out.push_str(token);
            out.push(' ');
        }
    }
}

/// A (possibly alias-qualified) column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    pub owner: Option<String>,
    pub column: String,
}

impl ColumnRef {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            owner: None,
            column: column.into(),
        }
    }

    pub fn qualified(owner: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            owner: Some(owner.into()),
            column: column.into(),
        }
    }

    /// Same column, owned by `owner` (or unqualified for `None`).
    pub fn with_owner(&self, owner: Option<&str>) -> Self {
        Self {
            owner: owner.map(str::to_string),
            column: self.column.clone(),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.owner {
            Some(owner) => write!(f, "{owner}.{}", self.column),
            None => f.write_str(&self.column),
        }
    }
}

impl From<&str> for ColumnRef {
    fn from(column: &str) -> Self {
        Self::new(column)
    }
}

impl From<String> for ColumnRef {
    fn from(column: String) -> Self {
        Self::new(column)
    }
}

impl Fragment for ColumnRef {
    fn render(&self, _ctx: &mut RenderContext) -> String {
        self.to_string()
    }
}

/// Right-hand side of a predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    None,
    Scalar(Value),
    Pair(Value, Value),
    List(Vec<Value>),
    /// A `:name` placeholder bound by the caller.
    Named(String),
    /// Another column, e.g. in a join condition.
    Column(ColumnRef),
    /// Sub-query SQL text, rendered inside parentheses.
    SubQuery(String),
}

impl Operand {
    fn shape(&self) -> &'static str {
        match self {
            Operand::None => "no operand",
            Operand::Scalar(_) => "a scalar",
            Operand::Pair(_, _) => "a pair",
            Operand::List(_) => "a list",
            Operand::Named(_) => "a named placeholder",
            Operand::Column(_) => "a column reference",
            Operand::SubQuery(_) => "a sub-query",
        }
    }

    /// The scalar value, if this is a scalar operand.
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Operand::Scalar(v) => Some(v),
            _ => None,
        }
    }
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Operand::Scalar(value)
    }
}

impl From<ColumnRef> for Operand {
    fn from(column: ColumnRef) -> Self {
        Operand::Column(column)
    }
}

/// Render `lhs SYMBOL operand`, feeding operand values through the templater.
pub(crate) fn render_comparison(
    lhs: &str,
    symbol: Symbol,
    operand: &Operand,
    ctx: &mut RenderContext,
) -> String {
    let token = symbol.token();
    match operand {
        Operand::None => format!("{lhs} {token}"),
        Operand::SubQuery(sql) if symbol.arity() == Arity::SubQuery => format!("{token} ({sql})"),
        Operand::SubQuery(sql) => format!("{lhs} {token} ({sql})"),
        Operand::Scalar(v) => {
            let rhs = ctx.fill_positional("?0", std::slice::from_ref(v));
            format!("{lhs} {token} {rhs}")
        }
        Operand::Pair(a, b) => {
            let rhs = ctx.fill_positional("?0 AND ?1", &[a.clone(), b.clone()]);
            format!("{lhs} {token} {rhs}")
        }
        Operand::List(values) if values.is_empty() => {
            // Empty IN matches nothing; empty NOT IN matches everything.
            let always = if symbol == Symbol::In { "1=0" } else { "1=1" };
            always.to_string()
        }
        Operand::List(values) => {
            let slots = (0..values.len())
                .map(|i| format!("?{i}"))
                .collect::<Vec<_>>()
                .join(", ");
            let rhs = ctx.fill_positional(&slots, values);
            format!("{lhs} {token} ({rhs})")
        }
        Operand::Named(name) if symbol.arity() == Arity::Variadic => {
            format!("{lhs} {token} ({})", ctx.named(name))
        }
        Operand::Named(name) => format!("{lhs} {token} {}", ctx.named(name)),
        Operand::Column(column) => format!("{lhs} {token} {column}"),
    }
}

/// A single WHERE predicate: `[connector] [alias.]column SYMBOL operand`.
///
/// Criteria are immutable once constructed; rendering is idempotent.
#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    column: ColumnRef,
    symbol: Symbol,
    slot: Slot,
    operand: Operand,
}

impl Criterion {
    /// Create a criterion, validating the operand against the operator.
    pub fn new(
        column: impl Into<ColumnRef>,
        symbol: Symbol,
        slot: Slot,
        operand: Operand,
    ) -> CraftResult<Self> {
        symbol.check(&operand)?;
        Ok(Self {
            column: column.into(),
            symbol,
            slot,
            operand,
        })
    }

    /// An update assignment `column = value` (no connector).
    pub fn assignment(column: impl Into<ColumnRef>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            symbol: Symbol::Eq,
            slot: Slot::None,
            operand: Operand::Scalar(value.into()),
        }
    }

    /// Same predicate with a different connector.
    pub fn with_slot(mut self, slot: Slot) -> Self {
        self.slot = slot;
        self
    }

    /// Same predicate joined with OR.
    pub fn or(self) -> Self {
        self.with_slot(Slot::Or)
    }

    pub fn column(&self) -> &ColumnRef {
        &self.column
    }

    pub fn symbol(&self) -> Symbol {
        self.symbol
    }

    pub fn slot(&self) -> Slot {
        self.slot
    }

    pub fn operand(&self) -> &Operand {
        &self.operand
    }

    // ==================== Convenience constructors (AND) ====================

    pub fn eq(column: impl Into<ColumnRef>, value: impl Into<Value>) -> CraftResult<Self> {
        Self::new(column, Symbol::Eq, Slot::And, Operand::Scalar(value.into()))
    }

    pub fn ne(column: impl Into<ColumnRef>, value: impl Into<Value>) -> CraftResult<Self> {
        Self::new(column, Symbol::Ne, Slot::And, Operand::Scalar(value.into()))
    }

    pub fn lt(column: impl Into<ColumnRef>, value: impl Into<Value>) -> CraftResult<Self> {
        Self::new(column, Symbol::Lt, Slot::And, Operand::Scalar(value.into()))
    }

    pub fn le(column: impl Into<ColumnRef>, value: impl Into<Value>) -> CraftResult<Self> {
        Self::new(column, Symbol::Le, Slot::And, Operand::Scalar(value.into()))
    }

    pub fn gt(column: impl Into<ColumnRef>, value: impl Into<Value>) -> CraftResult<Self> {
        Self::new(column, Symbol::Gt, Slot::And, Operand::Scalar(value.into()))
    }

    pub fn ge(column: impl Into<ColumnRef>, value: impl Into<Value>) -> CraftResult<Self> {
        Self::new(column, Symbol::Ge, Slot::And, Operand::Scalar(value.into()))
    }

    pub fn like(column: impl Into<ColumnRef>, pattern: impl Into<Value>) -> CraftResult<Self> {
        Self::new(column, Symbol::Like, Slot::And, Operand::Scalar(pattern.into()))
    }

    pub fn not_like(column: impl Into<ColumnRef>, pattern: impl Into<Value>) -> CraftResult<Self> {
        Self::new(column, Symbol::NotLike, Slot::And, Operand::Scalar(pattern.into()))
    }

    pub fn is_null(column: impl Into<ColumnRef>) -> CraftResult<Self> {
        Self::new(column, Symbol::IsNull, Slot::And, Operand::None)
    }

    pub fn is_not_null(column: impl Into<ColumnRef>) -> CraftResult<Self> {
        Self::new(column, Symbol::IsNotNull, Slot::And, Operand::None)
    }

    pub fn in_list<V: Into<Value>>(
        column: impl Into<ColumnRef>,
        values: impl IntoIterator<Item = V>,
    ) -> CraftResult<Self> {
        let values = values.into_iter().map(Into::into).collect();
        Self::new(column, Symbol::In, Slot::And, Operand::List(values))
    }

    pub fn not_in<V: Into<Value>>(
        column: impl Into<ColumnRef>,
        values: impl IntoIterator<Item = V>,
    ) -> CraftResult<Self> {
        let values = values.into_iter().map(Into::into).collect();
        Self::new(column, Symbol::NotIn, Slot::And, Operand::List(values))
    }

    pub fn between(
        column: impl Into<ColumnRef>,
        from: impl Into<Value>,
        to: impl Into<Value>,
    ) -> CraftResult<Self> {
        Self::new(
            column,
            Symbol::Between,
            Slot::And,
            Operand::Pair(from.into(), to.into()),
        )
    }

    pub fn not_between(
        column: impl Into<ColumnRef>,
        from: impl Into<Value>,
        to: impl Into<Value>,
    ) -> CraftResult<Self> {
        Self::new(
            column,
            Symbol::NotBetween,
            Slot::And,
            Operand::Pair(from.into(), to.into()),
        )
    }

    /// `EXISTS (sub_query)`; the column is unused.
    pub fn exists(sub_query: impl Into<String>) -> CraftResult<Self> {
        Self::new("", Symbol::Exists, Slot::And, Operand::SubQuery(sub_query.into()))
    }

    /// `NOT EXISTS (sub_query)`; the column is unused.
    pub fn not_exists(sub_query: impl Into<String>) -> CraftResult<Self> {
        Self::new("", Symbol::NotExists, Slot::And, Operand::SubQuery(sub_query.into()))
    }

    /// Column-to-column comparison, e.g. a join key.
    pub fn columns(left: impl Into<ColumnRef>, symbol: Symbol, right: ColumnRef) -> CraftResult<Self> {
        Self::new(left, symbol, Slot::And, Operand::Column(right))
    }
}

impl Fragment for Criterion {
    fn render(&self, ctx: &mut RenderContext) -> String {
        let mut out = String::new();
        self.slot.write(&mut out);
        let lhs = self.column.to_string();
        out.push_str(&render_comparison(&lhs, self.symbol, &self.operand, ctx));
        out
    }
}
