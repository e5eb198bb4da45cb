//! Joined criteria composed into one statement.

#![allow(dead_code)]

use sqlcraft::prelude::*;

#[derive(Debug, Entity)]
struct Employee {
    #[entity(id)]
    id: i64,
    name: String,
    salary: f64,
    dept_id: i64,
}

#[derive(Debug, Entity)]
struct Department {
    #[entity(id)]
    dept_id: i64,
    dept_name: String,
    region: String,
}

#[test]
fn test_grouped_join_with_having_and_order() {
    let mut arena = CriteriaArena::new();

    let mut employees = Criteria::select_of::<Employee>().unwrap();
    employees
        .alias("e")
        .unwrap()
        .columns(&["dept_id"])
        .unwrap()
        .select_function(Function::count("id").alias("headcount"))
        .unwrap()
        .group_by(&["dept_id"])
        .unwrap()
        .having(
            Slot::And,
            Function::count("id"),
            Symbol::Gt,
            Operand::Scalar(Value::Int(3)),
        )
        .unwrap();
    let root = arena.add(employees);

    let mut departments = Criteria::select_of::<Department>().unwrap();
    departments
        .alias("d")
        .unwrap()
        .columns(&["dept_name"])
        .unwrap()
        .group_by(&["dept_name"])
        .unwrap()
        .order_by_asc(&["dept_name"])
        .unwrap();
    let foreign = arena.add(departments);
    arena
        .join(root, foreign, JoinType::Left, &[("dept_id", "dept_id")])
        .unwrap();

    let manager = SqlManager::new(&arena, root).unwrap();
    assert_eq!(
        manager.intact_string().unwrap(),
        "SELECT e.dept_id, COUNT(e.id) AS headcount, d.dept_name FROM employee e \
         LEFT JOIN department d ON e.dept_id = d.dept_id \
         GROUP BY e.dept_id, d.dept_name HAVING COUNT(e.id) > 3 ORDER BY d.dept_name ASC"
    );
    assert_eq!(manager.group_segment(), "e.dept_id, d.dept_name");
    assert_eq!(manager.order_segment(), " ORDER BY d.dept_name ASC");
    assert_eq!(
        manager.count_string().unwrap(),
        "SELECT COUNT(*) FROM (SELECT e.dept_id, COUNT(e.id) AS headcount, d.dept_name \
         FROM employee e LEFT JOIN department d ON e.dept_id = d.dept_id \
         GROUP BY e.dept_id, d.dept_name HAVING COUNT(e.id) > 3) tmp_count"
    );
}

#[test]
fn test_join_predicates_bind_before_root_predicates() {
    let mut arena = CriteriaArena::new();

    let mut employees = Criteria::select_of::<Employee>().unwrap();
    employees
        .alias("e")
        .unwrap()
        .columns(&["name"])
        .unwrap()
        .gt("salary", 5000.0)
        .unwrap();
    let root = arena.add(employees);

    let mut departments = Criteria::select_of::<Department>().unwrap();
    departments
        .alias("d")
        .unwrap()
        .eq("region", "EU")
        .unwrap()
        .or("dept_name", Symbol::Like, Operand::Scalar("Ops%".into()))
        .unwrap();
    let foreign = arena.add(departments);
    arena
        .join(root, foreign, JoinType::Inner, &[("dept_id", "dept_id")])
        .unwrap();

    let stmt = SqlManager::new(&arena, root).unwrap().build().unwrap();
    assert_eq!(
        stmt.sql(),
        "SELECT e.name FROM employee e \
         JOIN department d ON e.dept_id = d.dept_id AND (d.region = ?0 OR d.dept_name LIKE ?1) \
         WHERE e.salary > ?2"
    );
    assert_eq!(
        stmt.params(),
        &[Value::from("EU"), Value::from("Ops%"), Value::Float(5000.0)]
    );
}

#[test]
fn test_rejected_joins() {
    let mut arena = CriteriaArena::new();
    let root = arena.add(Criteria::select_of::<Employee>().unwrap());
    let dept = arena.add(Criteria::select_of::<Department>().unwrap());
    let update = arena.add(Criteria::update_of::<Department>().unwrap());

    let err = arena.join(root, root, JoinType::Inner, &[]).unwrap_err();
    assert!(matches!(err, CraftError::UnsupportedJoin(_)));

    let err = arena.join(root, update, JoinType::Inner, &[]).unwrap_err();
    assert!(matches!(err, CraftError::UnsupportedJoin(_)));

    let err = arena
        .join(root, dept, JoinType::Inner, &[("nope", "dept_id")])
        .unwrap_err();
    assert!(err.is_unknown_property());

    arena.join(root, dept, JoinType::Inner, &[]).unwrap();
    let err = arena.join(root, dept, JoinType::Left, &[]).unwrap_err();
    assert!(matches!(err, CraftError::UnsupportedJoin(_)));

    let other = arena.add(Criteria::select_of::<Employee>().unwrap());
    let err = arena.join(dept, other, JoinType::Inner, &[]).unwrap_err();
    assert!(matches!(err, CraftError::UnsupportedJoin(_)));
}

#[test]
fn test_unknown_handle() {
    let arena = CriteriaArena::new();
    let mut other = CriteriaArena::new();
    let id = other.add(Criteria::select_of::<Employee>().unwrap());
    let err = SqlManager::new(&arena, id).unwrap_err();
    assert!(matches!(err, CraftError::UnknownCriteria(0)));
}
