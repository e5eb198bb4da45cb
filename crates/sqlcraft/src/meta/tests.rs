use super::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn user_info() -> TableInfo {
    TableInfo::builder("UserAccount")
        .column(ColumnDef::new("id", "i64").id())
        .column(ColumnDef::new("user_name", "String"))
        .column(ColumnDef::new("email", "Option<String>").nullable())
        .column(ColumnDef::new("version", "i32").version())
        .build()
        .unwrap()
}

#[test]
fn test_default_names_are_derived() {
    let info = user_info();
    assert_eq!(info.table, "user_account");
    assert_eq!(info.column("user_name").unwrap().column, "user_name");
    assert_eq!(info.primary_key().map(|c| c.property.as_str()), Some("id"));
    assert_eq!(info.version_column().map(|c| c.column.as_str()), Some("version"));
    assert_eq!(
        info.column_names().collect::<Vec<_>>(),
        vec!["id", "user_name", "email", "version"]
    );
}

#[test]
fn test_naming_target_applies_to_table_and_columns() {
    let info = TableInfo::builder("OrderLine")
        .naming(NamingStrategy::UpperUnderscore)
        .column(ColumnDef::new("line_no", "i32"))
        .build()
        .unwrap();
    assert_eq!(info.table, "ORDER_LINE");
    assert_eq!(info.column("line_no").unwrap().column, "LINE_NO");
    // Columns are also found by their SQL name.
    assert_eq!(info.column("LINE_NO").unwrap().property, "line_no");
}

#[test]
fn test_camel_properties() {
    let info = TableInfo::builder("Dept")
        .table("hr.dept")
        .column_naming(NamingStrategy::LowerCamel, NamingStrategy::LowerUnderscore)
        .column(ColumnDef::new("deptName", "String"))
        .column(ColumnDef::new("managerId", "i64").rename("boss_id"))
        .build()
        .unwrap();
    assert_eq!(info.table, "hr.dept");
    assert_eq!(info.column("deptName").unwrap().column, "dept_name");
    assert_eq!(info.column("managerId").unwrap().column, "boss_id");
}

#[test]
fn test_unknown_property() {
    let err = user_info().column("nope").unwrap_err();
    assert!(err.is_unknown_property());
    assert!(err.is_configuration());
}

#[test]
fn test_invalid_metadata_is_rejected() {
    let bad_table = TableInfo::builder("X").table("x; drop").build();
    assert!(bad_table.is_err());

    let duplicate = TableInfo::builder("X")
        .column(ColumnDef::new("a", "i32"))
        .column(ColumnDef::new("a", "i32"))
        .build();
    assert!(duplicate.is_err());

    let two_versions = TableInfo::builder("X")
        .column(ColumnDef::new("v1", "i32").version())
        .column(ColumnDef::new("v2", "i32").version())
        .build();
    assert!(two_versions.is_err());

    let qualified = TableInfo::builder("X")
        .column(ColumnDef::new("a", "i32").rename("t.a"))
        .build();
    assert!(qualified.is_err());
}

static BUILDS: AtomicUsize = AtomicUsize::new(0);

struct Counted;

impl Entity for Counted {
    fn entity_name() -> &'static str {
        "Counted"
    }

    fn table_info() -> CraftResult<TableInfo> {
        BUILDS.fetch_add(1, Ordering::SeqCst);
        TableInfo::builder("Counted")
            .column(ColumnDef::new("id", "i64").id())
            .build()
    }
}

#[test]
fn test_registry_populates_once() {
    let registry = MetaRegistry::new();
    let first = registry.table_of::<Counted>().unwrap();
    let second = registry.table_of::<Counted>().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(BUILDS.load(Ordering::SeqCst), 1);
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_registry_concurrent_reads_share_snapshot() {
    let registry = MetaRegistry::new();
    registry.register(user_info());
    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                let info = registry.get("UserAccount").unwrap();
                assert_eq!(info.table, "user_account");
            });
        }
    });
    assert!(registry.get("Missing").is_none());
}
