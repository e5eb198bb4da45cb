//! ORDER BY items.

use crate::criterion::ColumnRef;
use crate::fragment::{Fragment, RenderContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub const fn token(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// One or more columns sorted in the same direction: `a DESC, b DESC`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    columns: Vec<ColumnRef>,
    direction: Direction,
}

impl Order {
    pub fn new(direction: Direction, columns: impl IntoIterator<Item = ColumnRef>) -> Self {
        Self {
            columns: columns.into_iter().collect(),
            direction,
        }
    }

    pub fn asc(column: impl Into<ColumnRef>) -> Self {
        Self::new(Direction::Asc, [column.into()])
    }

    pub fn desc(column: impl Into<ColumnRef>) -> Self {
        Self::new(Direction::Desc, [column.into()])
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn columns(&self) -> &[ColumnRef] {
        &self.columns
    }
}

impl Fragment for Order {
    fn render(&self, _ctx: &mut RenderContext) -> String {
        let mut seen: Vec<&ColumnRef> = Vec::with_capacity(self.columns.len());
        let mut parts = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            if seen.contains(&column) {
                continue;
            }
            seen.push(column);
            parts.push(format!("{column} {}", self.direction.token()));
        }
        parts.join(", ")
    }
}
