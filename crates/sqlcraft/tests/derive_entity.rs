//! Metadata produced by `#[derive(Entity)]`.

#![allow(dead_code)]

use chrono::NaiveDateTime;
use sqlcraft::{Criteria, Entity, MetaRegistry, SqlManager};

#[derive(Debug, Entity)]
#[entity(table = "users")]
struct User {
    #[entity(id)]
    id: i64,
    user_name: String,
    #[entity(column = "mail")]
    email: Option<String>,
    #[entity(version)]
    version: i32,
    created_at: NaiveDateTime,
    #[entity(skip)]
    cached_score: f64,
}

#[derive(Debug, Entity)]
#[entity(naming = "upper_underscore")]
struct OrderLine {
    #[entity(id)]
    line_id: i64,
    unit_price: f64,
}

#[derive(Debug, Entity)]
struct AuditEntry {
    r#type: String,
    payload: serde_json::Value,
}

#[test]
fn test_derive_explicit_table() {
    let info = User::table_info().unwrap();
    assert_eq!(User::entity_name(), "User");
    assert_eq!(info.entity, "User");
    assert_eq!(info.table, "users");
    assert_eq!(
        info.column_names().collect::<Vec<_>>(),
        ["id", "user_name", "mail", "version", "created_at"]
    );
}

#[test]
fn test_derive_column_flags() {
    let info = User::table_info().unwrap();

    assert_eq!(info.primary_key().unwrap().property, "id");
    assert_eq!(info.version_column().unwrap().column, "version");

    let email = info.column("email").unwrap();
    assert_eq!(email.column, "mail");
    assert!(email.nullable);
    assert_eq!(email.type_name, "Option<String>");

    assert!(!info.column("user_name").unwrap().nullable);
    assert!(info.find("cached_score").is_none());
}

#[test]
fn test_derive_naming_convention() {
    let info = OrderLine::table_info().unwrap();
    assert_eq!(info.table, "ORDER_LINE");
    assert_eq!(
        info.column_names().collect::<Vec<_>>(),
        ["LINE_ID", "UNIT_PRICE"]
    );
    // Properties still resolve by their Rust names.
    assert_eq!(info.column("unit_price").unwrap().column, "UNIT_PRICE");
}

#[test]
fn test_derive_default_table_and_raw_ident() {
    let info = AuditEntry::table_info().unwrap();
    assert_eq!(info.table, "audit_entry");
    assert_eq!(info.column("type").unwrap().column, "type");
    assert!(info.primary_key().is_none());
    assert!(info.version_column().is_none());
}

#[test]
fn test_registry_caches_derived_metadata() {
    let registry = MetaRegistry::new();
    let first = registry.table_of::<User>().unwrap();
    let second = registry.table_of::<User>().unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_criteria_from_derived_entity() {
    let mut criteria = Criteria::select_of::<User>().unwrap();
    criteria
        .columns(&["id", "email"])
        .unwrap()
        .like("user_name", "jo%")
        .unwrap()
        .is_not_null("email")
        .unwrap();

    let sql = SqlManager::from_criteria(&criteria)
        .unwrap()
        .intact_string()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT id, mail AS email FROM users WHERE user_name LIKE 'jo%' AND mail IS NOT NULL"
    );
}
