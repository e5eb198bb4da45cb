use super::{Category, Criteria};
use crate::error::{CraftError, CraftResult};

/// Handle to a [`Criteria`] stored in a [`CriteriaArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CriteriaId(usize);

impl CriteriaId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Join flavour of a foreign criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
    Full,
}

impl JoinType {
    pub const fn keyword(self) -> &'static str {
        match self {
            JoinType::Inner => "JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
            JoinType::Full => "FULL JOIN",
        }
    }
}

/// A criteria joined into another one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignRef {
    pub id: CriteriaId,
    pub kind: JoinType,
    /// `(root column, foreign column)` pairs, qualified at render time.
    pub on: Vec<(String, String)>,
}

/// Owns every criteria of one unit of work.
///
/// Configuration needs `&mut` access; composition borrows the arena shared, so
/// nothing can change while a statement is rendered.
#[derive(Debug, Clone, Default)]
pub struct CriteriaArena {
    items: Vec<Criteria>,
}

impl CriteriaArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, criteria: Criteria) -> CriteriaId {
        self.items.push(criteria);
        CriteriaId(self.items.len() - 1)
    }

    pub fn get(&self, id: CriteriaId) -> CraftResult<&Criteria> {
        self.items.get(id.0).ok_or(CraftError::UnknownCriteria(id.0))
    }

    pub fn get_mut(&mut self, id: CriteriaId) -> CraftResult<&mut Criteria> {
        self.items
            .get_mut(id.0)
            .ok_or(CraftError::UnknownCriteria(id.0))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Join `foreign` into `root` on `(root property, foreign property)` pairs.
    ///
    /// Only SELECT criteria join, and only one level deep: a foreign criteria
    /// cannot have foreign criteria of its own, nor can a root be joined elsewhere.
    pub fn join(
        &mut self,
        root: CriteriaId,
        foreign: CriteriaId,
        kind: JoinType,
        on: &[(&str, &str)],
    ) -> CraftResult<()> {
        if root == foreign {
            return Err(CraftError::UnsupportedJoin(
                "a criteria cannot be joined to itself".to_string(),
            ));
        }
        let root_criteria = self.get(root)?;
        let foreign_criteria = self.get(foreign)?;

        for (side, criteria) in [("root", root_criteria), ("foreign", foreign_criteria)] {
            if criteria.category() != Category::Select {
                return Err(CraftError::UnsupportedJoin(format!(
                    "{side} criteria on '{}' is not a SELECT",
                    criteria.info().entity
                )));
            }
        }
        if !foreign_criteria.foreign.is_empty() {
            return Err(CraftError::UnsupportedJoin(format!(
                "'{}' already has foreign criteria; nested joins are not supported",
                foreign_criteria.info().entity
            )));
        }
        if self.is_foreign(root) {
            return Err(CraftError::UnsupportedJoin(format!(
                "'{}' is already joined as a foreign criteria; nested joins are not supported",
                root_criteria.info().entity
            )));
        }
        if root_criteria.foreign.iter().any(|f| f.id == foreign) {
            return Err(CraftError::UnsupportedJoin(format!(
                "'{}' is already joined to '{}'",
                foreign_criteria.info().entity,
                root_criteria.info().entity
            )));
        }

        let on = on
            .iter()
            .map(|(left, right)| {
                Ok((
                    root_criteria.column_name(left)?,
                    foreign_criteria.column_name(right)?,
                ))
            })
            .collect::<CraftResult<Vec<_>>>()?;

        self.get_mut(root)?.foreign.push(ForeignRef {
            id: foreign,
            kind,
            on,
        });
        Ok(())
    }

    fn is_foreign(&self, id: CriteriaId) -> bool {
        self.items
            .iter()
            .any(|c| c.foreign.iter().any(|f| f.id == id))
    }
}
