use super::FragmentManager;
use crate::criterion::{ColumnRef, Symbol};
use crate::fragment::{RenderContext, join_connected};
use crate::having::Having;
use crate::order::Order;
use crate::predicate::Predicate;
use crate::value::Value;

/// WHERE predicates of one criteria.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereStorage {
    predicates: FragmentManager<Predicate>,
}

impl Default for WhereStorage {
    fn default() -> Self {
        Self {
            predicates: FragmentManager::new(" "),
        }
    }
}

impl WhereStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, predicate: impl Into<Predicate>) -> &mut Self {
        self.predicates.add(predicate.into());
        self
    }

    pub fn add_all<P: Into<Predicate>>(&mut self, predicates: impl IntoIterator<Item = P>) -> &mut Self {
        self.predicates.add_all(predicates.into_iter().map(Into::into));
        self
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Predicate> {
        self.predicates.iter()
    }

    /// Render the condition without the `WHERE` keyword; the first predicate
    /// loses its connector.
    pub fn render(&self, ctx: &mut RenderContext) -> String {
        join_connected(&self.predicates, ctx)
    }

    pub fn segment(&self) -> String {
        self.render(&mut RenderContext::inline())
    }

    /// The value bound by a top-level `column = value` predicate, if any.
    pub fn version_value(&self, column: &str) -> Option<&Value> {
        self.predicates
            .iter()
            .filter_map(Predicate::as_criterion)
            .find(|c| c.symbol() == Symbol::Eq && c.column().column == column)
            .and_then(|c| c.operand().as_scalar())
    }
}

/// HAVING predicates of one criteria.
#[derive(Debug, Clone, PartialEq)]
pub struct HavingStorage {
    items: FragmentManager<Having>,
}

impl Default for HavingStorage {
    fn default() -> Self {
        Self {
            items: FragmentManager::new(" "),
        }
    }
}

impl HavingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, having: Having) -> &mut Self {
        self.items.add(having);
        self
    }

    pub fn add_all(&mut self, items: impl IntoIterator<Item = Having>) -> &mut Self {
        self.items.add_all(items);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Having> {
        self.items.iter()
    }

    /// Render the condition without the `HAVING` keyword.
    pub fn render(&self, ctx: &mut RenderContext) -> String {
        join_connected(&self.items, ctx)
    }

    /// ` HAVING cond`, or empty.
    pub fn segment(&self) -> String {
        let body = self.render(&mut RenderContext::inline());
        if body.is_empty() {
            body
        } else {
            format!(" HAVING {body}")
        }
    }
}

/// ORDER BY items of one criteria.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderStorage {
    items: FragmentManager<Order>,
}

impl Default for OrderStorage {
    fn default() -> Self {
        Self {
            items: FragmentManager::new(", "),
        }
    }
}

impl OrderStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, order: Order) -> &mut Self {
        self.items.add(order);
        self
    }

    pub fn add_all(&mut self, items: impl IntoIterator<Item = Order>) -> &mut Self {
        self.items.add_all(items);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Order> {
        self.items.iter()
    }

    /// Rendered sort items, blanks dropped.
    pub fn render_items(&self) -> Vec<String> {
        self.items.render_items(&mut RenderContext::inline())
    }

    /// ` ORDER BY a ASC, b DESC`, or empty.
    pub fn segment(&self) -> String {
        let body = self.items.segment();
        if body.is_empty() {
            body
        } else {
            format!(" ORDER BY {body}")
        }
    }
}

/// GROUP BY columns of one criteria; a column is kept once.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStorage {
    columns: FragmentManager<ColumnRef>,
}

impl Default for GroupStorage {
    fn default() -> Self {
        Self {
            columns: FragmentManager::new(", "),
        }
    }
}

impl GroupStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, column: impl Into<ColumnRef>) -> &mut Self {
        let column = column.into();
        if !self.columns.iter().any(|c| *c == column) {
            self.columns.add(column);
        }
        self
    }

    pub fn add_all<C: Into<ColumnRef>>(&mut self, columns: impl IntoIterator<Item = C>) -> &mut Self {
        for column in columns {
            self.add(column);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnRef> {
        self.columns.iter()
    }

    /// ` GROUP BY a, b`, or empty.
    pub fn segment(&self) -> String {
        let body = self.columns.segment();
        if body.is_empty() {
            body
        } else {
            format!(" GROUP BY {body}")
        }
    }
}
