//! WHERE-clause items: plain criteria, nested groups and raw template predicates.

use crate::criterion::{Criterion, Slot};
use crate::error::CraftResult;
use crate::fragment::{Fragment, RenderContext, join_connected};
use crate::template::{self, Placeholder};
use crate::value::Value;
use std::collections::BTreeMap;

/// Operand source of a template predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateOperands {
    /// Answers `?0`, `?1`, ...
    Positional(Vec<Value>),
    /// Answers `:name`.
    Named(BTreeMap<String, Value>),
}

impl TemplateOperands {
    /// Build a keyed operand set from `(name, value)` pairs.
    pub fn named<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Named(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn positional<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        Self::Positional(values.into_iter().map(Into::into).collect())
    }

    /// Check that every placeholder of `sql` resolves against these operands.
    pub fn check(&self, sql: &str) -> CraftResult<()> {
        match self {
            Self::Positional(values) => template::try_format(sql, values.as_slice()).map(drop),
            Self::Named(values) => template::try_format(sql, values).map(drop),
        }
    }

    fn fill(&self, sql: &str, ctx: &mut RenderContext) -> String {
        match self {
            Self::Positional(values) => ctx.fill_positional(sql, values),
            Self::Named(values) => ctx.fill_named(sql, values),
        }
    }

    /// Record the `:name` placeholders of `sql` left for the caller to bind.
    fn record_unbound(&self, sql: &str, ctx: &mut RenderContext) {
        if let Self::Positional(_) = self {
            for (_, placeholder) in template::placeholders(sql) {
                if let Placeholder::Name(name) = placeholder {
                    ctx.named(name);
                }
            }
        }
    }

    /// Whether this operand set answers at least one placeholder in `sql`.
    fn used_by(&self, sql: &str) -> bool {
        template::placeholders(sql).any(|(_, p)| match (self, p) {
            (Self::Positional(_), Placeholder::Index(_)) => true,
            (Self::Named(_), Placeholder::Name(_)) => true,
            _ => false,
        })
    }
}

/// One item of a WHERE or HAVING list.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Criterion(Criterion),
    /// A parenthesised group of predicates, e.g. `AND (a = 1 OR b = 2)`.
    Group { slot: Slot, items: Vec<Predicate> },
    /// Raw SQL whose placeholders are filled from `operands`.
    Template {
        slot: Slot,
        sql: String,
        operands: TemplateOperands,
    },
}

impl Predicate {
    pub fn group(slot: Slot, items: Vec<Predicate>) -> Self {
        Self::Group { slot, items }
    }

    pub fn template(slot: Slot, sql: impl Into<String>, operands: TemplateOperands) -> Self {
        Self::Template {
            slot,
            sql: sql.into(),
            operands,
        }
    }

    pub fn slot(&self) -> Slot {
        match self {
            Self::Criterion(c) => c.slot(),
            Self::Group { slot, .. } | Self::Template { slot, .. } => *slot,
        }
    }

    /// The criterion, when this is a plain criterion.
    pub fn as_criterion(&self) -> Option<&Criterion> {
        match self {
            Self::Criterion(c) => Some(c),
            _ => None,
        }
    }
}

impl From<Criterion> for Predicate {
    fn from(criterion: Criterion) -> Self {
        Self::Criterion(criterion)
    }
}

impl Fragment for Predicate {
    fn render(&self, ctx: &mut RenderContext) -> String {
        match self {
            Self::Criterion(c) => c.render(ctx),
            Self::Group { slot, items } => {
                let inner = join_connected(items, ctx);
                if inner.is_empty() {
                    return String::new();
                }
                let mut out = String::new();
                slot.write(&mut out);
                out.push('(');
                out.push_str(&inner);
                out.push(')');
                out
            }
            Self::Template {
                slot,
                sql,
                operands,
            } => {
                if sql.trim().is_empty() {
                    return String::new();
                }
                operands.record_unbound(sql, ctx);
                let body = if operands.used_by(sql) {
                    operands.fill(sql, ctx)
                } else {
                    sql.clone()
                };
                let mut out = String::new();
                slot.write(&mut out);
                out.push_str(&body);
                out
            }
        }
    }
}
