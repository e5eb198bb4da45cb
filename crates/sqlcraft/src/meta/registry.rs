use super::{Entity, TableInfo};
use crate::error::CraftResult;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

/// Thread-safe entity → [`TableInfo`] registry.
///
/// Reads take a shared lock. A missing entity is built outside the lock and
/// inserted under the write lock, so each entity is populated at most once.
#[derive(Debug, Default)]
pub struct MetaRegistry {
    tables: RwLock<HashMap<String, Arc<TableInfo>>>,
}

impl MetaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry.
    pub fn global() -> &'static MetaRegistry {
        static GLOBAL: OnceLock<MetaRegistry> = OnceLock::new();
        GLOBAL.get_or_init(MetaRegistry::new)
    }

    /// Register (or replace) a snapshot.
    pub fn register(&self, info: TableInfo) -> Arc<TableInfo> {
        let info = Arc::new(info);
        let mut tables = self.tables.write().expect("meta registry lock poisoned");
        tables.insert(info.entity.clone(), Arc::clone(&info));
        info
    }

    pub fn get(&self, entity: &str) -> Option<Arc<TableInfo>> {
        let tables = self.tables.read().expect("meta registry lock poisoned");
        tables.get(entity).cloned()
    }

    /// Metadata for `T`, built and registered on first use.
    pub fn table_of<T: Entity>(&self) -> CraftResult<Arc<TableInfo>> {
        let name = T::entity_name();
        if let Some(found) = self.get(name) {
            return Ok(found);
        }

        // Build outside the lock to reduce contention.
        let info = Arc::new(T::table_info()?);

        let mut tables = self.tables.write().expect("meta registry lock poisoned");
        // Double-check: another thread may have inserted while we built.
        if let Some(found) = tables.get(name) {
            return Ok(Arc::clone(found));
        }
        tables.insert(name.to_string(), Arc::clone(&info));
        tracing::debug!(
            target: "sqlcraft.meta",
            entity = name,
            table = %info.table,
            "registered entity metadata"
        );
        Ok(info)
    }

    pub fn len(&self) -> usize {
        self.tables.read().expect("meta registry lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
