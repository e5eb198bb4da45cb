use super::*;
use crate::criterion::{ColumnRef, Criterion, Operand, Slot, Symbol};
use crate::having::Having;
use crate::order::{Direction, Order};
use crate::predicate::Predicate;
use crate::selection::Function;
use crate::value::Value;

#[test]
fn test_empty_where_renders_nothing() {
    let storage = WhereStorage::new();
    assert_eq!(storage.segment(), "");
}

#[test]
fn test_first_connector_is_stripped() {
    let mut storage = WhereStorage::new();
    storage.add(Criterion::ge("age", 18).unwrap());
    assert_eq!(storage.segment(), "age >= 18");

    storage.add(Criterion::eq("status", "active").unwrap().or());
    assert_eq!(storage.segment(), "age >= 18 OR status = 'active'");
}

#[test]
fn test_blank_predicates_leave_no_gap() {
    let mut storage = WhereStorage::new();
    storage
        .add(Predicate::group(Slot::And, vec![]))
        .add(Criterion::eq("a", 1).unwrap().or())
        .add(Predicate::group(Slot::And, vec![]))
        .add(Criterion::eq("b", 2).unwrap());
    assert_eq!(storage.segment(), "a = 1 AND b = 2");
}

#[test]
fn test_where_binds_in_render_order() {
    let mut storage = WhereStorage::new();
    storage.add_all([
        Criterion::eq("a", 1).unwrap(),
        Criterion::in_list("b", [2, 3]).unwrap(),
    ]);
    let mut ctx = RenderContext::bind();
    assert_eq!(storage.render(&mut ctx), "a = ?0 AND b IN (?1, ?2)");
    assert_eq!(ctx.params(), &[Value::Int(1), Value::Int(2), Value::Int(3)]);
}

#[test]
fn test_version_value() {
    let mut storage = WhereStorage::new();
    assert_eq!(storage.version_value("version"), None);

    storage.add(Criterion::gt("version", 3).unwrap());
    assert_eq!(storage.version_value("version"), None);

    storage.add(Criterion::eq(ColumnRef::qualified("t", "version"), 7).unwrap());
    assert_eq!(storage.version_value("version"), Some(&Value::Int(7)));
}

#[test]
fn test_order_segment() {
    let mut storage = OrderStorage::new();
    assert_eq!(storage.segment(), "");
    storage
        .add(Order::new(Direction::Desc, ["a".into(), "b".into(), "a".into()]))
        .add(Order::asc("c"));
    assert_eq!(storage.segment(), " ORDER BY a DESC, b DESC, c ASC");
    assert_eq!(storage.render_items().len(), 2);
}

#[test]
fn test_having_segment() {
    let mut storage = HavingStorage::new();
    assert_eq!(storage.segment(), "");
    storage.add(
        Having::new(
            Slot::And,
            Function::count("*"),
            Symbol::Gt,
            Operand::Scalar(Value::from(1)),
        )
        .unwrap(),
    );
    assert_eq!(storage.segment(), " HAVING COUNT(*) > 1");
}

#[test]
fn test_group_columns_deduplicated() {
    let mut storage = GroupStorage::new();
    storage.add_all(["dept_id", "role", "dept_id"]);
    assert_eq!(storage.len(), 2);
    assert_eq!(storage.segment(), " GROUP BY dept_id, role");
}

#[test]
fn test_generic_manager_joins_with_separator() {
    let mut manager = FragmentManager::new(", ");
    manager.add(ColumnRef::new("a")).add(ColumnRef::new("")).add(ColumnRef::new("b"));
    assert_eq!(manager.segment(), "a, b");
    assert_eq!(manager.len(), 3);
}
