//! Ordered fragment lists for each clause of a statement.
//!
//! A [`FragmentManager`] keeps same-kind fragments in insertion order and renders
//! them in a single left-to-right pass. Fragments that render empty are skipped,
//! so the output never carries a dangling separator or connector.
//!
//! - [`WhereStorage`]: WHERE predicates, connector-joined
//! - [`HavingStorage`]: HAVING predicates, connector-joined
//! - [`OrderStorage`]: ORDER BY items, `, `-joined
//! - [`GroupStorage`]: GROUP BY columns, de-duplicated

mod clauses;

pub use clauses::{GroupStorage, HavingStorage, OrderStorage, WhereStorage};

use crate::fragment::{Fragment, RenderContext};

/// Insertion-ordered list of fragments joined by a fixed separator.
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentManager<F> {
    fragments: Vec<F>,
    separator: &'static str,
}

impl<F> FragmentManager<F> {
    pub fn new(separator: &'static str) -> Self {
        Self {
            fragments: Vec::new(),
            separator,
        }
    }

    pub fn add(&mut self, fragment: F) -> &mut Self {
        self.fragments.push(fragment);
        self
    }

    pub fn add_all(&mut self, fragments: impl IntoIterator<Item = F>) -> &mut Self {
        self.fragments.extend(fragments);
        self
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, F> {
        self.fragments.iter()
    }

    pub fn separator(&self) -> &'static str {
        self.separator
    }
}

impl<F: Fragment> FragmentManager<F> {
    /// Render every fragment, dropping blanks.
    pub fn render_items(&self, ctx: &mut RenderContext) -> Vec<String> {
        self.fragments
            .iter()
            .map(|f| f.render(ctx))
            .filter(|s| !s.trim().is_empty())
            .collect()
    }

    /// Render the joined list (no clause keyword).
    pub fn render(&self, ctx: &mut RenderContext) -> String {
        self.render_items(ctx).join(self.separator)
    }

    /// Render the joined list with inline literals.
    pub fn segment(&self) -> String {
        self.render(&mut RenderContext::inline())
    }
}

impl<'a, F> IntoIterator for &'a FragmentManager<F> {
    type Item = &'a F;
    type IntoIter = std::slice::Iter<'a, F>;

    fn into_iter(self) -> Self::IntoIter {
        self.fragments.iter()
    }
}

#[cfg(test)]
mod tests;
