//! # sqlcraft
//!
//! Dynamic SQL composition: describe a query, update or delete as typed
//! criteria and get back the exact SQL text plus its bound parameters.
//!
//! ## Features
//!
//! - **Criteria builder**: predicates, groups, templates, projections, aggregates,
//!   ordering, grouping and pagination, all named by entity property
//! - **Joins**: foreign criteria merged into one statement (`JOIN ... ON ...`)
//! - **Placeholder templates**: `?0` / `:name` substitution with escaping
//! - **Naming strategies**: `user_name` ⇄ `UserName` ⇄ `USER_NAME`
//! - **Safe defaults**: DELETE requires WHERE, UPDATE requires SET
//! - **Optimistic locking**: `version = v + 1` added to guarded updates
//!
//! ## Example
//!
//! ```ignore
//! use sqlcraft::prelude::*;
//!
//! #[derive(Entity)]
//! struct User {
//!     #[entity(id)]
//!     id: i64,
//!     name: String,
//!     age: i32,
//! }
//!
//! let mut arena = CriteriaArena::new();
//! let mut users = Criteria::select_of::<User>()?;
//! users.ge("age", 18)?.order_by_asc(&["name"])?.paginate(1, 20);
//! let root = arena.add(users);
//!
//! let stmt = SqlManager::new(&arena, root)?.build()?;
//! assert_eq!(
//!     stmt.sql(),
//!     "SELECT * FROM user WHERE age >= ?0 ORDER BY name ASC LIMIT 20 OFFSET 0"
//! );
//! # Ok::<(), sqlcraft::CraftError>(())
//! ```

extern crate self as sqlcraft;

pub mod config;
pub mod criteria;
pub mod criterion;
pub mod error;
pub mod fragment;
pub mod having;
pub mod ident;
pub mod manager;
pub mod meta;
pub mod naming;
pub mod order;
pub mod predicate;
pub mod prelude;
pub mod selection;
pub mod sink;
pub mod storage;
pub mod template;
pub mod traits;
pub mod value;

pub use config::ComposeConfig;
pub use criteria::{Category, Criteria, CriteriaArena, CriteriaId, ForeignRef, JoinType};
pub use criterion::{ColumnRef, Criterion, Operand, Slot, Symbol};
pub use error::{CraftError, CraftResult};
pub use fragment::{Fragment, RenderContext, RenderMode};
pub use having::Having;
pub use ident::Ident;
pub use manager::{SqlManager, Statement};
pub use meta::{ColumnDef, ColumnInfo, Entity, MetaRegistry, TableInfo};
pub use naming::NamingStrategy;
pub use order::{Direction, Order};
pub use predicate::{Predicate, TemplateOperands};
pub use selection::{Aggregate, Function, Projection, Selection};
pub use sink::TracingSink;
pub use storage::{FragmentManager, GroupStorage, HavingStorage, OrderStorage, WhereStorage};
pub use traits::{SqlBuilder, StatementSink};
pub use value::Value;

#[cfg(feature = "derive")]
pub use sqlcraft_derive::Entity;
