//! Metadata lookup and composition from many threads.

#![allow(dead_code)]

use sqlcraft::prelude::*;
use sqlcraft::MetaRegistry;
use std::sync::Arc;

#[derive(Debug, Entity)]
#[entity(table = "events")]
struct Event {
    #[entity(id)]
    id: i64,
    kind: String,
    score: i32,
}

#[test]
fn test_registry_populates_once_across_threads() {
    let registry = MetaRegistry::new();
    let infos: Vec<Arc<TableInfo>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| registry.table_of::<Event>().unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(registry.len(), 1);
    let canonical = registry.get("Event").unwrap();
    for info in &infos {
        assert!(Arc::ptr_eq(info, &canonical));
    }
}

#[test]
fn test_shared_arena_renders_identically() {
    let mut arena = CriteriaArena::new();
    let mut events = Criteria::select_of::<Event>().unwrap();
    events
        .columns(&["kind"])
        .unwrap()
        .select_function(Function::sum("score").scale(2).alias("total"))
        .unwrap()
        .in_list("kind", ["click", "view"])
        .unwrap()
        .group_all()
        .order_by_desc(&["kind"])
        .unwrap();
    let root = arena.add(events);

    let expected = SqlManager::new(&arena, root).unwrap().build().unwrap();
    let arena = &arena;
    let rendered: Vec<Statement> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(move || SqlManager::new(arena, root).unwrap().build().unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(
        expected.sql(),
        "SELECT kind, CAST(SUM(score) AS DECIMAL(38, 2)) AS total FROM events \
         WHERE kind IN (?0, ?1) GROUP BY kind ORDER BY kind DESC"
    );
    for stmt in &rendered {
        assert_eq!(stmt.sql(), expected.sql());
        assert_eq!(stmt.params(), expected.params());
    }
}
