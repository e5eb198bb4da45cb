//! Per-statement builder.
//!
//! A [`Criteria`] collects everything one statement needs: the target entity,
//! projections, predicates, ordering, grouping, update assignments and flags.
//! Callers name **properties**; they are resolved to columns through the
//! entity's [`TableInfo`] as soon as they are added, so an unknown property is
//! reported at configuration time.
//!
//! Criteria that take part in a join live in a [`CriteriaArena`] and refer to each
//! other through [`CriteriaId`] handles.
//!
//! ```ignore
//! use sqlcraft::{Criteria, CriteriaArena, JoinType, SqlManager};
//!
//! let mut arena = CriteriaArena::new();
//! let mut users = Criteria::select(user_info);
//! users.alias("u")?.ge("age", 18)?.order_by_desc(&["created_at"])?;
//! let root = arena.add(users);
//!
//! let mut dept = Criteria::select(dept_info);
//! dept.alias("d")?.eq("name", "R&D")?;
//! let dept = arena.add(dept);
//! arena.join(root, dept, JoinType::Left, &[("dept_id", "id")])?;
//!
//! let stmt = SqlManager::new(&arena, root)?.build()?;
//! # Ok::<(), sqlcraft::CraftError>(())
//! ```

mod arena;

pub use arena::{CriteriaArena, CriteriaId, ForeignRef, JoinType};

use crate::criterion::{ColumnRef, Criterion, Operand, Slot, Symbol};
use crate::error::{CraftError, CraftResult};
use crate::having::Having;
use crate::ident::Ident;
use crate::meta::{Entity, MetaRegistry, TableInfo};
use crate::order::{Direction, Order};
use crate::predicate::{Predicate, TemplateOperands};
use crate::selection::{Function, Projection, Selection};
use crate::storage::{GroupStorage, HavingStorage, OrderStorage, WhereStorage};
use crate::value::Value;
use serde::Serialize;
use std::sync::Arc;

/// Kind of statement a criteria composes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Select,
    Update,
    Delete,
}

/// Builder for one SELECT, UPDATE or DELETE statement.
#[derive(Debug, Clone)]
pub struct Criteria {
    info: Arc<TableInfo>,
    alias: Option<String>,
    category: Category,
    selections: Vec<Projection>,
    assignments: Vec<Criterion>,
    wheres: WhereStorage,
    orders: OrderStorage,
    havings: HavingStorage,
    groups: GroupStorage,
    pub(crate) foreign: Vec<ForeignRef>,
    distinct: bool,
    keep_order_by: bool,
    group_all: bool,
    fetch: bool,
    allow_delete_all: bool,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl Criteria {
    pub fn new(info: Arc<TableInfo>, category: Category) -> Self {
        Self {
            info,
            alias: None,
            category,
            selections: Vec::new(),
            assignments: Vec::new(),
            wheres: WhereStorage::new(),
            orders: OrderStorage::new(),
            havings: HavingStorage::new(),
            groups: GroupStorage::new(),
            foreign: Vec::new(),
            distinct: false,
            keep_order_by: false,
            group_all: false,
            fetch: false,
            allow_delete_all: false,
            limit: None,
            offset: None,
        }
    }

    pub fn select(info: Arc<TableInfo>) -> Self {
        Self::new(info, Category::Select)
    }

    pub fn update(info: Arc<TableInfo>) -> Self {
        Self::new(info, Category::Update)
    }

    pub fn delete(info: Arc<TableInfo>) -> Self {
        Self::new(info, Category::Delete)
    }

    /// SELECT criteria for `T`, with metadata from the global registry.
    pub fn select_of<T: Entity>() -> CraftResult<Self> {
        Ok(Self::select(MetaRegistry::global().table_of::<T>()?))
    }

    pub fn update_of<T: Entity>() -> CraftResult<Self> {
        Ok(Self::update(MetaRegistry::global().table_of::<T>()?))
    }

    pub fn delete_of<T: Entity>() -> CraftResult<Self> {
        Ok(Self::delete(MetaRegistry::global().table_of::<T>()?))
    }

    // ==================== Accessors ====================

    pub fn info(&self) -> &TableInfo {
        &self.info
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn alias_name(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// The name columns of this criteria are qualified with in joins.
    pub fn owner(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.info.table)
    }

    pub fn selections(&self) -> &[Projection] {
        &self.selections
    }

    pub fn assignments(&self) -> &[Criterion] {
        &self.assignments
    }

    pub fn wheres(&self) -> &WhereStorage {
        &self.wheres
    }

    pub fn orders(&self) -> &OrderStorage {
        &self.orders
    }

    pub fn havings(&self) -> &HavingStorage {
        &self.havings
    }

    pub fn groups(&self) -> &GroupStorage {
        &self.groups
    }

    pub fn foreign(&self) -> &[ForeignRef] {
        &self.foreign
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    pub fn is_keep_order_by(&self) -> bool {
        self.keep_order_by
    }

    pub fn is_group_all(&self) -> bool {
        self.group_all
    }

    pub fn is_fetch(&self) -> bool {
        self.fetch
    }

    pub fn is_delete_all_allowed(&self) -> bool {
        self.allow_delete_all
    }

    pub fn limit_value(&self) -> Option<u64> {
        self.limit
    }

    pub fn offset_value(&self) -> Option<u64> {
        self.offset
    }

    fn has_column_items(&self) -> bool {
        !(self.selections.is_empty()
            && self.assignments.is_empty()
            && self.wheres.is_empty()
            && self.orders.is_empty()
            && self.havings.is_empty()
            && self.groups.is_empty())
    }

    // ==================== Resolution ====================

    /// Resolve a property (or column) name to an owner-qualified column.
    pub fn resolve(&self, property: &str) -> CraftResult<ColumnRef> {
        let info = self.info.column(property)?;
        Ok(ColumnRef {
            owner: self.alias.clone(),
            column: info.column.clone(),
        })
    }

    /// Resolve a property to its bare column name.
    pub(crate) fn column_name(&self, property: &str) -> CraftResult<String> {
        Ok(self.info.column(property)?.column.clone())
    }

    fn resolve_all(&self, properties: &[&str]) -> CraftResult<Vec<ColumnRef>> {
        properties.iter().map(|p| self.resolve(p)).collect()
    }

    // ==================== Configuration ====================

    /// Table alias. Must be set before any column is referenced.
    pub fn alias(&mut self, alias: &str) -> CraftResult<&mut Self> {
        let ident = Ident::parse(alias)?;
        if ident.len() != 1 {
            return Err(CraftError::validation(format!(
                "alias '{alias}' must not be qualified"
            )));
        }
        if self.has_column_items() {
            return Err(CraftError::validation(format!(
                "alias '{alias}' must be set before columns of '{}' are referenced",
                self.info.entity
            )));
        }
        self.alias = Some(alias.to_string());
        Ok(self)
    }

    /// Build a criterion on `property` without adding it (for groups).
    pub fn criterion(
        &self,
        slot: Slot,
        property: &str,
        symbol: Symbol,
        operand: Operand,
    ) -> CraftResult<Criterion> {
        Criterion::new(self.resolve(property)?, symbol, slot, operand)
    }

    /// Add `AND property SYMBOL operand`.
    pub fn and(&mut self, property: &str, symbol: Symbol, operand: Operand) -> CraftResult<&mut Self> {
        self.push(Slot::And, property, symbol, operand)
    }

    /// Add `OR property SYMBOL operand`.
    pub fn or(&mut self, property: &str, symbol: Symbol, operand: Operand) -> CraftResult<&mut Self> {
        self.push(Slot::Or, property, symbol, operand)
    }

    fn push(
        &mut self,
        slot: Slot,
        property: &str,
        symbol: Symbol,
        operand: Operand,
    ) -> CraftResult<&mut Self> {
        let criterion = self.criterion(slot, property, symbol, operand)?;
        self.wheres.add(criterion);
        Ok(self)
    }

    pub fn eq(&mut self, property: &str, value: impl Into<Value>) -> CraftResult<&mut Self> {
        self.and(property, Symbol::Eq, Operand::Scalar(value.into()))
    }

    pub fn ne(&mut self, property: &str, value: impl Into<Value>) -> CraftResult<&mut Self> {
        self.and(property, Symbol::Ne, Operand::Scalar(value.into()))
    }

    pub fn gt(&mut self, property: &str, value: impl Into<Value>) -> CraftResult<&mut Self> {
        self.and(property, Symbol::Gt, Operand::Scalar(value.into()))
    }

    pub fn ge(&mut self, property: &str, value: impl Into<Value>) -> CraftResult<&mut Self> {
        self.and(property, Symbol::Ge, Operand::Scalar(value.into()))
    }

    pub fn lt(&mut self, property: &str, value: impl Into<Value>) -> CraftResult<&mut Self> {
        self.and(property, Symbol::Lt, Operand::Scalar(value.into()))
    }

    pub fn le(&mut self, property: &str, value: impl Into<Value>) -> CraftResult<&mut Self> {
        self.and(property, Symbol::Le, Operand::Scalar(value.into()))
    }

    pub fn like(&mut self, property: &str, pattern: impl Into<Value>) -> CraftResult<&mut Self> {
        self.and(property, Symbol::Like, Operand::Scalar(pattern.into()))
    }

    pub fn not_like(&mut self, property: &str, pattern: impl Into<Value>) -> CraftResult<&mut Self> {
        self.and(property, Symbol::NotLike, Operand::Scalar(pattern.into()))
    }

    pub fn is_null(&mut self, property: &str) -> CraftResult<&mut Self> {
        self.and(property, Symbol::IsNull, Operand::None)
    }

    pub fn is_not_null(&mut self, property: &str) -> CraftResult<&mut Self> {
        self.and(property, Symbol::IsNotNull, Operand::None)
    }

    pub fn in_list<V: Into<Value>>(
        &mut self,
        property: &str,
        values: impl IntoIterator<Item = V>,
    ) -> CraftResult<&mut Self> {
        let values = values.into_iter().map(Into::into).collect();
        self.and(property, Symbol::In, Operand::List(values))
    }

    pub fn not_in<V: Into<Value>>(
        &mut self,
        property: &str,
        values: impl IntoIterator<Item = V>,
    ) -> CraftResult<&mut Self> {
        let values = values.into_iter().map(Into::into).collect();
        self.and(property, Symbol::NotIn, Operand::List(values))
    }

    pub fn between(
        &mut self,
        property: &str,
        from: impl Into<Value>,
        to: impl Into<Value>,
    ) -> CraftResult<&mut Self> {
        self.and(property, Symbol::Between, Operand::Pair(from.into(), to.into()))
    }

    pub fn not_between(
        &mut self,
        property: &str,
        from: impl Into<Value>,
        to: impl Into<Value>,
    ) -> CraftResult<&mut Self> {
        self.and(property, Symbol::NotBetween, Operand::Pair(from.into(), to.into()))
    }

    /// `AND EXISTS (sub_query)`.
    pub fn exists(&mut self, sub_query: impl Into<String>) -> CraftResult<&mut Self> {
        self.wheres.add(Criterion::exists(sub_query)?);
        Ok(self)
    }

    /// `AND NOT EXISTS (sub_query)`.
    pub fn not_exists(&mut self, sub_query: impl Into<String>) -> CraftResult<&mut Self> {
        self.wheres.add(Criterion::not_exists(sub_query)?);
        Ok(self)
    }

    /// Add a parenthesised group, e.g. `AND (a = 1 OR b = 2)`.
    pub fn group(&mut self, slot: Slot, items: Vec<Predicate>) -> &mut Self {
        self.wheres.add(Predicate::group(slot, items));
        self
    }

    /// Add raw predicate SQL whose `?n` / `:name` placeholders are filled from
    /// `operands`. Unresolved placeholders render as `null`.
    pub fn template(&mut self, slot: Slot, sql: &str, operands: TemplateOperands) -> &mut Self {
        self.wheres.add(Predicate::template(slot, sql, operands));
        self
    }

    /// Like [`template`](Self::template), rejecting unresolved placeholders.
    pub fn template_checked(
        &mut self,
        slot: Slot,
        sql: &str,
        operands: TemplateOperands,
    ) -> CraftResult<&mut Self> {
        operands.check(sql)?;
        Ok(self.template(slot, sql, operands))
    }

    // ==================== Projection ====================

    /// Project properties; each column is aliased to its property name when they differ.
    pub fn columns(&mut self, properties: &[&str]) -> CraftResult<&mut Self> {
        for property in properties {
            let column = self.resolve(property)?;
            let mut selection = Selection::new(column.clone());
            if column.column != *property {
                selection = selection.alias(*property);
            }
            self.selections.push(selection.into());
        }
        Ok(self)
    }

    /// Project an aggregate; its argument is a property unless it is `*`, `1` or `0`.
    pub fn select_function(&mut self, function: Function) -> CraftResult<&mut Self> {
        let function = self.resolve_function(function)?;
        self.selections.push(function.into());
        Ok(self)
    }

    /// Project a raw SQL expression.
    pub fn select_raw(&mut self, sql: impl Into<String>) -> &mut Self {
        self.selections.push(Projection::Raw(sql.into()));
        self
    }

    fn resolve_function(&self, mut function: Function) -> CraftResult<Function> {
        if !function.is_literal() {
            function.column = self.resolve(&function.column.column)?;
        }
        Ok(function)
    }

    // ==================== Ordering & grouping ====================

    pub fn order_by_asc(&mut self, properties: &[&str]) -> CraftResult<&mut Self> {
        self.order_by(Direction::Asc, properties)
    }

    pub fn order_by_desc(&mut self, properties: &[&str]) -> CraftResult<&mut Self> {
        self.order_by(Direction::Desc, properties)
    }

    pub fn order_by(&mut self, direction: Direction, properties: &[&str]) -> CraftResult<&mut Self> {
        let columns = self.resolve_all(properties)?;
        self.orders.add(Order::new(direction, columns));
        Ok(self)
    }

    pub fn group_by(&mut self, properties: &[&str]) -> CraftResult<&mut Self> {
        let columns = self.resolve_all(properties)?;
        self.groups.add_all(columns);
        Ok(self)
    }

    /// Group by every non-aggregate projection.
    pub fn group_all(&mut self) -> &mut Self {
        self.group_all = true;
        self
    }

    pub fn having(
        &mut self,
        slot: Slot,
        function: Function,
        symbol: Symbol,
        operand: Operand,
    ) -> CraftResult<&mut Self> {
        let function = self.resolve_function(function)?;
        self.havings.add(Having::new(slot, function, symbol, operand)?);
        Ok(self)
    }

    // ==================== Update ====================

    /// Assign `property = value` in the SET list.
    ///
    /// Assigning the same column twice is allowed only with an equal value.
    pub fn set(&mut self, property: &str, value: impl Into<Value>) -> CraftResult<&mut Self> {
        if self.category != Category::Update {
            return Err(CraftError::validation(format!(
                "SET on '{}' requires an update criteria",
                self.info.entity
            )));
        }
        let column = self.column_name(property)?;
        let value = value.into();
        if let Some(existing) = self.assignments.iter().find(|a| a.column().column == column) {
            let old = existing.operand().as_scalar();
            if old == Some(&value) {
                return Ok(self);
            }
            return Err(CraftError::ConflictingAssignment {
                column,
                old: old.map(ToString::to_string).unwrap_or_default(),
                new: value.to_string(),
            });
        }
        self.assignments.push(Criterion::assignment(column.as_str(), value));
        Ok(self)
    }

    /// Guard the statement with `version = value` on the entity's version column.
    pub fn optimistic_lock(&mut self, property: &str, value: impl Into<Value>) -> CraftResult<&mut Self> {
        let info = self.info.column(property)?;
        if !info.version {
            return Err(CraftError::NotVersionColumn {
                entity: self.info.entity.clone(),
                column: info.column.clone(),
            });
        }
        self.and(property, Symbol::Eq, Operand::Scalar(value.into()))
    }

    // ==================== Flags ====================

    pub fn distinct(&mut self) -> &mut Self {
        self.distinct = true;
        self
    }

    /// Emit the configured marker so ORDER BY survives later rewriting.
    pub fn keep_order_by(&mut self) -> &mut Self {
        self.keep_order_by = true;
        self
    }

    /// Contribute this criteria's columns to the joined SELECT list.
    pub fn fetch(&mut self) -> &mut Self {
        self.fetch = true;
        self
    }

    /// Allow DELETE without WHERE.
    pub fn allow_delete_all(&mut self) -> &mut Self {
        self.allow_delete_all = true;
        self
    }

    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(&mut self, offset: u64) -> &mut Self {
        self.offset = Some(offset);
        self
    }

    /// Pagination helper.
    ///
    /// `page` is 1-based (clamped to >= 1).
    /// `per_page` is clamped to >= 1.
    pub fn paginate(&mut self, page: u64, per_page: u64) -> &mut Self {
        let page = page.max(1);
        let size = per_page.max(1);
        self.limit = Some(size);
        self.offset = Some((page - 1).saturating_mul(size));
        self
    }
}
