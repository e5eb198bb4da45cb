//! Common imports: `use sqlcraft::prelude::*;`

pub use crate::{
    Aggregate, Category, ColumnDef, ColumnRef, ComposeConfig, CraftError, CraftResult, Criteria,
    CriteriaArena, CriteriaId, Criterion, Direction, Entity, Fragment, Function, JoinType,
    NamingStrategy, Operand, Predicate, Slot, SqlBuilder, SqlManager, Statement, StatementSink,
    Symbol, TableInfo, TemplateOperands, Value,
};
