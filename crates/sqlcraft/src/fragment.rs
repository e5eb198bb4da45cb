//! The common rendering contract for SQL fragments.
//!
//! Every piece of a statement (a predicate, a projected column, a sort key) is a
//! [`Fragment`]: it renders to a SQL segment, or to an empty string when it has
//! nothing to contribute. Rendering goes through a [`RenderContext`] that decides
//! how operand values are emitted:
//!
//! - [`RenderMode::Inline`]: values become SQL literals (`age >= 18`), used for
//!   logging, debugging and [`Fragment::to_segment`].
//! - [`RenderMode::Bind`]: values are pushed to the parameter list and replaced by
//!   `?n` placeholders (`age >= ?0`), used for executable statements.

use crate::template::{self, TemplateArgs};
use crate::value::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;

/// How operand values are written into the SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Inline,
    Bind,
}

/// Collects bound parameters while fragments render.
#[derive(Debug, Clone)]
pub struct RenderContext {
    mode: RenderMode,
    params: Vec<Value>,
    named: Vec<String>,
}

impl RenderContext {
    pub fn new(mode: RenderMode) -> Self {
        Self {
            mode,
            params: Vec::new(),
            named: Vec::new(),
        }
    }

    /// Context rendering values as SQL literals.
    pub fn inline() -> Self {
        Self::new(RenderMode::Inline)
    }

    /// Context binding values as `?n` placeholders.
    pub fn bind() -> Self {
        Self::new(RenderMode::Bind)
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Emit one operand value.
    pub fn operand(&mut self, value: &Value) -> String {
        match self.mode {
            RenderMode::Inline => value.to_sql_literal(),
            RenderMode::Bind => {
                let index = self.params.len();
                self.params.push(value.clone());
                format!("?{index}")
            }
        }
    }

    /// Emit a named placeholder, remembering the name for the caller.
    pub fn named(&mut self, name: &str) -> String {
        if !self.named.iter().any(|n| n == name) {
            self.named.push(name.to_string());
        }
        format!(":{name}")
    }

    /// Fill a `?n` template with operand values.
    pub fn fill_positional(&mut self, template: &str, values: &[Value]) -> String {
        let args = Operands {
            ctx: RefCell::new(self),
            source: values,
        };
        template::format(template, &args)
    }

    /// Fill a `:name` template with operand values.
    pub fn fill_named(&mut self, template: &str, values: &BTreeMap<String, Value>) -> String {
        let args = Operands {
            ctx: RefCell::new(self),
            source: values,
        };
        template::format(template, &args)
    }

    /// Parameters bound so far, in placeholder order.
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn into_parts(self) -> (Vec<Value>, Vec<String>) {
        (self.params, self.named)
    }
}

/// Template source that emits values through a [`RenderContext`] on demand, so
/// only referenced values are bound and in the order they appear.
struct Operands<'c, 'v, S: ?Sized> {
    ctx: RefCell<&'c mut RenderContext>,
    source: &'v S,
}

impl TemplateArgs for Operands<'_, '_, [Value]> {
    const POSITIONAL: bool = true;

    fn by_index(&self, index: usize) -> Option<String> {
        let value = self.source.get(index)?;
        Some(self.ctx.borrow_mut().operand(value))
    }
}

impl TemplateArgs for Operands<'_, '_, BTreeMap<String, Value>> {
    const NAMED: bool = true;

    fn by_name(&self, name: &str) -> Option<String> {
        let value = self.source.get(name)?;
        Some(self.ctx.borrow_mut().operand(value))
    }
}

/// A renderable SQL segment.
pub trait Fragment {
    /// Render this fragment; an empty string means "not applicable".
    fn render(&self, ctx: &mut RenderContext) -> String;

    /// Render with inline literal values.
    fn to_segment(&self) -> String {
        let mut ctx = RenderContext::inline();
        self.render(&mut ctx)
    }
}

impl<F: Fragment + ?Sized> Fragment for &F {
    fn render(&self, ctx: &mut RenderContext) -> String {
        (**self).render(ctx)
    }
}

impl<F: Fragment + ?Sized> Fragment for Box<F> {
    fn render(&self, ctx: &mut RenderContext) -> String {
        (**self).render(ctx)
    }
}

/// Strip a single leading `AND ` / `OR ` connector.
pub fn strip_connector(segment: &str) -> &str {
    let trimmed = segment.trim_start();
    trimmed
        .strip_prefix("AND ")
        .or_else(|| trimmed.strip_prefix("OR "))
        .unwrap_or(trimmed)
}

/// Render predicate-like fragments into one clause: blanks are dropped, the first
/// survivor loses its connector and the rest are joined with a single space.
pub(crate) fn join_connected<'f, F, I>(fragments: I, ctx: &mut RenderContext) -> String
where
    F: Fragment + 'f,
    I: IntoIterator<Item = &'f F>,
{
    let mut out = String::new();
    for fragment in fragments {
        let segment = fragment.render(ctx);
        if segment.trim().is_empty() {
            continue;
        }
        if out.is_empty() {
            out.push_str(strip_connector(&segment));
        } else {
            out.push(' ');
            out.push_str(&segment);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_operand_is_literal() {
        let mut ctx = RenderContext::inline();
        assert_eq!(ctx.operand(&Value::from("x")), "'x'");
        assert!(ctx.params().is_empty());
    }

    #[test]
    fn bind_operand_numbers_from_zero() {
        let mut ctx = RenderContext::bind();
        assert_eq!(ctx.operand(&Value::from(1)), "?0");
        assert_eq!(ctx.operand(&Value::from(2)), "?1");
        assert_eq!(ctx.params(), &[Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn fill_binds_only_referenced_values() {
        let mut ctx = RenderContext::bind();
        ctx.operand(&Value::from("first"));
        let sql = ctx.fill_positional("?1 AND ?1", &[Value::from(5), Value::from(9)]);
        assert_eq!(sql, "?1 AND ?2");
        assert_eq!(ctx.params().len(), 3);
        assert_eq!(ctx.params()[1], Value::Int(9));
    }

    #[test]
    fn fill_named_binds_by_key() {
        let mut ctx = RenderContext::bind();
        let values = BTreeMap::from([("lo".to_string(), Value::from(1))]);
        assert_eq!(ctx.fill_named("x > :lo and y < :hi", &values), "x > ?0 and y < null");
    }

    #[test]
    fn named_placeholders_are_recorded_once() {
        let mut ctx = RenderContext::bind();
        assert_eq!(ctx.named("tenant"), ":tenant");
        ctx.named("tenant");
        let (_, named) = ctx.into_parts();
        assert_eq!(named, vec!["tenant".to_string()]);
    }

    #[test]
    fn strip_connector_removes_one_token() {
        assert_eq!(strip_connector("AND a = 1"), "a = 1");
        assert_eq!(strip_connector("OR a = 1"), "a = 1");
        assert_eq!(strip_connector("a = 1"), "a = 1");
        assert_eq!(strip_connector("AND AND a"), "AND a");
        assert_eq!(strip_connector("ANDROID = 1"), "ANDROID = 1");
    }
}
