//! Entity → table/column metadata.
//!
//! [`TableInfo`] is the immutable snapshot the composer reads: the entity name,
//! its table and one [`ColumnInfo`] per mapped property. Snapshots are usually
//! produced by `#[derive(Entity)]` and shared through a [`MetaRegistry`].
//!
//! ```ignore
//! use sqlcraft::meta::{ColumnDef, TableInfo};
//!
//! let info = TableInfo::builder("UserAccount")
//!     .column(ColumnDef::new("id", "i64").id())
//!     .column(ColumnDef::new("user_name", "String"))
//!     .column(ColumnDef::new("version", "i32").version())
//!     .build()?;
//! assert_eq!(info.table, "user_account");
//! # Ok::<(), sqlcraft::CraftError>(())
//! ```

mod registry;

pub use registry::MetaRegistry;

use crate::config::ComposeConfig;
use crate::error::{CraftError, CraftResult};
use crate::ident::Ident;
use crate::naming::NamingStrategy;
use serde::Serialize;

/// Implemented by types that map to a table (see `#[derive(Entity)]`).
pub trait Entity {
    /// Registry key, normally the type name.
    fn entity_name() -> &'static str;

    /// Build the table metadata.
    fn table_info() -> CraftResult<TableInfo>;
}

/// One mapped column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    /// Property (field) name used by callers.
    pub property: String,
    /// Column name used in SQL.
    pub column: String,
    /// Declared value type, informational.
    pub type_name: String,
    /// Optimistic-lock version column.
    pub version: bool,
    pub nullable: bool,
    pub primary_key: bool,
}

/// Table metadata for one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableInfo {
    pub entity: String,
    pub table: String,
    pub columns: Vec<ColumnInfo>,
}

impl TableInfo {
    pub fn builder(entity: impl Into<String>) -> TableInfoBuilder {
        TableInfoBuilder::new(entity)
    }

    /// Look a column up by property name, then by column name.
    pub fn find(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns
            .iter()
            .find(|c| c.property == name)
            .or_else(|| self.columns.iter().find(|c| c.column == name))
    }

    /// Like [`find`](Self::find), failing with [`CraftError::UnknownProperty`].
    pub fn column(&self, name: &str) -> CraftResult<&ColumnInfo> {
        self.find(name)
            .ok_or_else(|| CraftError::unknown_property(&self.entity, name))
    }

    pub fn version_column(&self) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.version)
    }

    pub fn primary_key(&self) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.primary_key)
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.column.as_str())
    }
}

/// Column declaration fed to [`TableInfoBuilder::column`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    property: String,
    type_name: String,
    column: Option<String>,
    version: bool,
    nullable: bool,
    primary_key: bool,
}

impl ColumnDef {
    pub fn new(property: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            type_name: type_name.into(),
            column: None,
            version: false,
            nullable: false,
            primary_key: false,
        }
    }

    /// Mark as primary key.
    pub fn id(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Mark as optimistic-lock version column.
    pub fn version(mut self) -> Self {
        self.version = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Use an explicit column name instead of deriving one.
    pub fn rename(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }
}

/// Builder validating identifiers and deriving names via [`NamingStrategy`].
#[derive(Debug, Clone)]
pub struct TableInfoBuilder {
    entity: String,
    table: Option<String>,
    table_naming: NamingStrategy,
    property_naming: NamingStrategy,
    column_naming: NamingStrategy,
    columns: Vec<ColumnDef>,
}

impl TableInfoBuilder {
    fn new(entity: impl Into<String>) -> Self {
        let defaults = ComposeConfig::default();
        Self {
            entity: entity.into(),
            table: None,
            table_naming: defaults.table_naming,
            property_naming: NamingStrategy::LowerUnderscore,
            column_naming: defaults.column_naming,
            columns: Vec::new(),
        }
    }

    /// Explicit table name (may be schema-qualified).
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Target convention for both the derived table and column names.
    pub fn naming(mut self, target: NamingStrategy) -> Self {
        self.table_naming = target;
        self.column_naming = target;
        self
    }

    /// Convention of property names (`source`) and of derived column names (`target`).
    pub fn column_naming(mut self, source: NamingStrategy, target: NamingStrategy) -> Self {
        self.property_naming = source;
        self.column_naming = target;
        self
    }

    /// Take the naming defaults from `config`.
    pub fn with_config(mut self, config: &ComposeConfig) -> Self {
        self.table_naming = config.table_naming;
        self.column_naming = config.column_naming;
        self
    }

    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    pub fn build(self) -> CraftResult<TableInfo> {
        let table = match self.table {
            Some(table) => table,
            None => NamingStrategy::UpperCamel.to(self.table_naming, &self.entity),
        };
        Ident::parse(&table)
            .map_err(|e| CraftError::validation(format!("table of '{}': {e}", self.entity)))?;

        let mut columns: Vec<ColumnInfo> = Vec::with_capacity(self.columns.len());
        for def in self.columns {
            if columns.iter().any(|c| c.property == def.property) {
                return Err(CraftError::validation(format!(
                    "duplicate property '{}' on entity '{}'",
                    def.property, self.entity
                )));
            }
            if def.version && columns.iter().any(|c| c.version) {
                return Err(CraftError::validation(format!(
                    "entity '{}' declares more than one version column",
                    self.entity
                )));
            }
            let column = match def.column {
                Some(column) => column,
                None => self.property_naming.to(self.column_naming, &def.property),
            };
            let ident = Ident::parse(&column)?;
            if ident.len() != 1 {
                return Err(CraftError::validation(format!(
                    "column '{column}' must not be qualified"
                )));
            }
            columns.push(ColumnInfo {
                property: def.property,
                column,
                type_name: def.type_name,
                version: def.version,
                nullable: def.nullable,
                primary_key: def.primary_key,
            });
        }

        Ok(TableInfo {
            entity: self.entity,
            table,
            columns,
        })
    }
}

#[cfg(test)]
mod tests;
