//! Statement composition.
//!
//! [`SqlManager`] reads a root [`Criteria`] and its foreign criteria from a
//! [`CriteriaArena`] and assembles the final SQL:
//!
//! - SELECT: `SELECT [DISTINCT] list FROM table [alias] [joins] [WHERE] [GROUP BY] [HAVING]
//!   [marker] [ORDER BY] [LIMIT] [OFFSET]`
//! - UPDATE: `UPDATE table [alias] SET a = ?0, ... [WHERE]`
//! - DELETE: `DELETE FROM table [alias] [WHERE]`
//!
//! Safe defaults: UPDATE requires SET; DELETE requires WHERE unless the criteria
//! explicitly allows deleting every row.

mod statement;

pub use statement::Statement;

use crate::config::ComposeConfig;
use crate::criteria::{Category, Criteria, CriteriaArena, CriteriaId, ForeignRef};
use crate::criterion::Criterion;
use crate::error::{CraftError, CraftResult};
use crate::fragment::{Fragment, RenderContext, join_connected};
use crate::predicate::Predicate;
use crate::selection::Projection;
use crate::value::Value;

/// Composes the statement of one root criteria.
#[derive(Debug, Clone)]
pub struct SqlManager<'a> {
    root: &'a Criteria,
    foreigns: Vec<(&'a ForeignRef, &'a Criteria)>,
    config: ComposeConfig,
}

impl<'a> SqlManager<'a> {
    /// Compose `root` together with the criteria joined into it.
    pub fn new(arena: &'a CriteriaArena, root: CriteriaId) -> CraftResult<Self> {
        let root = arena.get(root)?;
        let foreigns = root
            .foreign()
            .iter()
            .map(|f| Ok((f, arena.get(f.id)?)))
            .collect::<CraftResult<Vec<_>>>()?;
        Ok(Self {
            root,
            foreigns,
            config: ComposeConfig::default(),
        })
    }

    /// Compose a criteria that has no foreign criteria.
    pub fn from_criteria(criteria: &'a Criteria) -> CraftResult<Self> {
        if let Some(foreign) = criteria.foreign().first() {
            return Err(CraftError::UnknownCriteria(foreign.id.index()));
        }
        Ok(Self {
            root: criteria,
            foreigns: Vec::new(),
            config: ComposeConfig::default(),
        })
    }

    pub fn with_config(mut self, config: ComposeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn root(&self) -> &Criteria {
        self.root
    }

    pub fn config(&self) -> &ComposeConfig {
        &self.config
    }

    fn participants(&self) -> impl Iterator<Item = &'a Criteria> + '_ {
        std::iter::once(self.root).chain(self.foreigns.iter().map(|(_, c)| *c))
    }

    // ==================== SELECT list ====================

    /// The SELECT list, including `DISTINCT` when flagged; `*` when nothing is projected.
    pub fn select_segment(&self) -> String {
        let items = self.select_items();
        let list = if items.is_empty() {
            "*".to_string()
        } else {
            items.join(", ")
        };
        if self.root.is_distinct() {
            format!("DISTINCT {list}")
        } else {
            list
        }
    }

    fn select_items(&self) -> Vec<String> {
        let root = self.root;
        if self.foreigns.is_empty() {
            return root.selections().iter().map(|p| p.segment(true)).collect();
        }

        let explicit = self.participants().any(|c| !c.selections().is_empty());
        if !explicit {
            return self.participants().flat_map(mapped_columns).collect();
        }

        let mut items: Vec<String> = if root.selections().is_empty() {
            mapped_columns(root)
        } else {
            root.selections().iter().map(|p| p.segment(true)).collect()
        };
        for (_, foreign) in &self.foreigns {
            if !foreign.selections().is_empty() {
                items.extend(foreign.selections().iter().map(|p| p.segment(false)));
            } else if foreign.is_fetch() {
                items.extend(mapped_columns(foreign));
            }
        }
        items
    }

    // ==================== WHERE / GROUP BY / HAVING ====================

    /// Joins, condition, GROUP BY and HAVING, rendered inline and space-joined.
    ///
    /// `append_where` controls the `WHERE` keyword. `group_by_replacement`
    /// substitutes the GROUP BY column list; an empty replacement removes both
    /// GROUP BY and HAVING.
    pub fn where_segment(&self, append_where: bool, group_by_replacement: Option<&str>) -> String {
        self.render_where(&mut RenderContext::inline(), append_where, group_by_replacement)
    }

    /// The GROUP BY column list (root first), without the keyword.
    pub fn group_segment(&self) -> String {
        self.group_columns().join(", ")
    }

    /// ` ORDER BY ...` (root first), or empty.
    pub fn order_segment(&self) -> String {
        let items = self.order_items();
        if items.is_empty() {
            String::new()
        } else {
            format!(" ORDER BY {}", items.join(", "))
        }
    }

    fn render_where(
        &self,
        ctx: &mut RenderContext,
        append_where: bool,
        group_by_replacement: Option<&str>,
    ) -> String {
        let mut parts = Vec::new();
        for (foreign_ref, foreign) in &self.foreigns {
            parts.push(self.render_join(foreign_ref, foreign, ctx));
        }

        let condition = self.root.wheres().render(ctx);
        if !condition.is_empty() {
            parts.push(if append_where {
                format!("WHERE {condition}")
            } else {
                condition
            });
        }

        let group = match group_by_replacement {
            Some(replacement) if replacement.trim().is_empty() => return parts.join(" "),
            Some(replacement) => replacement.to_string(),
            None => self.group_segment(),
        };
        if !group.is_empty() {
            parts.push(format!("GROUP BY {group}"));
        }

        let havings = self.participants().flat_map(|c| c.havings().iter());
        let having = join_connected(havings, ctx);
        if !having.is_empty() {
            parts.push(format!("HAVING {having}"));
        }
        parts.join(" ")
    }

    fn render_join(&self, foreign_ref: &ForeignRef, foreign: &Criteria, ctx: &mut RenderContext) -> String {
        let mut out = format!("{} {}", foreign_ref.kind.keyword(), table_clause(foreign));
        let mut conditions: Vec<String> = foreign_ref
            .on
            .iter()
            .map(|(left, right)| format!("{}.{left} = {}.{right}", self.root.owner(), foreign.owner()))
            .collect();

        let predicates = foreign.wheres().render(ctx);
        if !predicates.is_empty() {
            // A raw template may carry its own top-level OR.
            let atomic = foreign.wheres().len() == 1
                && foreign
                    .wheres()
                    .iter()
                    .all(|p| !matches!(p, Predicate::Template { .. }));
            if !conditions.is_empty() && !atomic {
                conditions.push(format!("({predicates})"));
            } else {
                conditions.push(predicates);
            }
        }

        out.push_str(" ON ");
        if conditions.is_empty() {
            out.push_str("1=1");
        } else {
            out.push_str(&conditions.join(" AND "));
        }
        out
    }

    fn group_columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();
        for criteria in self.participants() {
            let explicit = criteria.groups().iter().map(ToString::to_string);
            let implied = criteria
                .selections()
                .iter()
                .filter(|_| criteria.is_group_all())
                .filter_map(|p| match p {
                    Projection::Column(s) => Some(s.column.to_string()),
                    Projection::Function(_) | Projection::Raw(_) => None,
                });
            for column in explicit.chain(implied) {
                if !columns.contains(&column) {
                    columns.push(column);
                }
            }
        }
        columns
    }

    fn order_items(&self) -> Vec<String> {
        self.participants()
            .flat_map(|c| c.orders().render_items())
            .collect()
    }

    fn has_grouping(&self) -> bool {
        !self.group_columns().is_empty() || self.participants().any(|c| !c.havings().is_empty())
    }

    // ==================== Statements ====================

    fn compose(&self, ctx: &mut RenderContext) -> CraftResult<String> {
        let root = self.root;
        match root.category() {
            Category::Select => {
                let mut sql = format!("SELECT {} FROM {}", self.select_segment(), table_clause(root));
                push_part(&mut sql, &self.render_where(ctx, true, None));

                let orders = self.order_items();
                if !orders.is_empty() {
                    if root.is_keep_order_by() {
                        push_part(&mut sql, &self.config.keep_order_by_marker);
                    }
                    sql.push_str(" ORDER BY ");
                    sql.push_str(&orders.join(", "));
                }
                if let Some(limit) = root.limit_value() {
                    sql.push_str(&format!(" LIMIT {limit}"));
                }
                if let Some(offset) = root.offset_value() {
                    sql.push_str(&format!(" OFFSET {offset}"));
                }
                Ok(sql)
            }
            Category::Update => {
                if root.assignments().is_empty() {
                    return Err(CraftError::MissingSet(root.info().table.clone()));
                }
                let set = self
                    .assignments()
                    .iter()
                    .map(|a| a.render(ctx))
                    .collect::<Vec<_>>()
                    .join(", ");
                let mut sql = format!("UPDATE {} SET {set}", table_clause(root));
                let condition = root.wheres().render(ctx);
                if !condition.is_empty() {
                    sql.push_str(" WHERE ");
                    sql.push_str(&condition);
                }
                Ok(sql)
            }
            Category::Delete => {
                let condition = root.wheres().render(ctx);
                if condition.is_empty() && !root.is_delete_all_allowed() {
                    return Err(CraftError::MissingWhere(root.info().table.clone()));
                }
                let mut sql = format!("DELETE FROM {}", table_clause(root));
                if !condition.is_empty() {
                    sql.push_str(" WHERE ");
                    sql.push_str(&condition);
                }
                Ok(sql)
            }
        }
    }

    /// SET assignments, plus `version = v + 1` when the statement is guarded by
    /// an integer version and the caller did not assign the version itself.
    fn assignments(&self) -> Vec<Criterion> {
        let mut assignments = self.root.assignments().to_vec();
        let Some(version) = self.root.info().version_column() else {
            return assignments;
        };
        if assignments.iter().any(|a| a.column().column == version.column) {
            return assignments;
        }
        let current = self
            .root
            .wheres()
            .version_value(&version.column)
            .and_then(Value::as_i64);
        if let Some(current) = current {
            assignments.push(Criterion::assignment(
                version.column.as_str(),
                current.saturating_add(1),
            ));
        }
        assignments
    }

    fn compose_count(&self, ctx: &mut RenderContext) -> CraftResult<String> {
        let root = self.root;
        if root.category() != Category::Select {
            return Err(CraftError::validation(format!(
                "COUNT requires a SELECT criteria on '{}'",
                root.info().entity
            )));
        }
        if self.has_grouping() || root.is_distinct() {
            let mut inner = format!("SELECT {} FROM {}", self.select_segment(), table_clause(root));
            push_part(&mut inner, &self.render_where(ctx, true, None));
            return Ok(format!("SELECT COUNT(*) FROM ({inner}) tmp_count"));
        }
        let mut sql = format!("SELECT COUNT(*) FROM {}", table_clause(root));
        push_part(&mut sql, &self.render_where(ctx, true, None));
        Ok(sql)
    }

    /// The complete statement with values inlined as literals.
    pub fn intact_string(&self) -> CraftResult<String> {
        self.compose(&mut RenderContext::inline())
    }

    /// The complete statement with values bound to `?n` placeholders.
    pub fn build(&self) -> CraftResult<Statement> {
        let mut ctx = RenderContext::bind();
        let sql = self.compose(&mut ctx)?;
        Ok(self.finish(sql, ctx))
    }

    /// `SELECT COUNT(*)` over the same rows, ignoring ORDER BY and pagination.
    pub fn count_string(&self) -> CraftResult<String> {
        self.compose_count(&mut RenderContext::inline())
    }

    pub fn build_count(&self) -> CraftResult<Statement> {
        let mut ctx = RenderContext::bind();
        let sql = self.compose_count(&mut ctx)?;
        Ok(self.finish(sql, ctx))
    }

    fn finish(&self, sql: String, ctx: RenderContext) -> Statement {
        let (params, named) = ctx.into_parts();
        let statement = Statement::new(sql, params, named, self.root.category());
        tracing::debug!(
            target: "sqlcraft.sql",
            entity = %self.root.info().entity,
            category = ?statement.category(),
            params = statement.param_count(),
            sql = %self.config.truncate_sql(statement.sql()),
            "composed statement"
        );
        statement
    }
}

fn table_clause(criteria: &Criteria) -> String {
    match criteria.alias_name() {
        Some(alias) => format!("{} {alias}", criteria.info().table),
        None => criteria.info().table.clone(),
    }
}

fn mapped_columns(criteria: &Criteria) -> Vec<String> {
    let owner = criteria.owner();
    criteria
        .info()
        .column_names()
        .map(|column| format!("{owner}.{column}"))
        .collect()
}

fn push_part(sql: &mut String, part: &str) {
    if !part.is_empty() {
        sql.push(' ');
        sql.push_str(part);
    }
}
