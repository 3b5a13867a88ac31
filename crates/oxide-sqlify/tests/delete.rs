mod common;
use common::*;

use oxide_sqlify::{Ast, Statement};
use serde_json::json;

#[test]
fn single_table_delete_omits_targets() {
    assert_eq!(
        round_trip("DELETE FROM users WHERE id = 1", "mysql"),
        "DELETE FROM `users` WHERE `id` = 1"
    );
    assert_eq!(
        round_trip("DELETE FROM users WHERE id = 1", "postgresql"),
        "DELETE FROM \"users\" WHERE \"id\" = 1"
    );
}

#[test]
fn implicit_targets_are_flagged_as_additions() {
    let Ast::Single(statement) = astify("DELETE FROM users WHERE id = 1", "mysql") else {
        panic!("expected a single statement");
    };
    let Statement::Delete(delete) = statement else {
        panic!("expected DELETE");
    };
    let table = delete.table.unwrap();
    assert_eq!(table.len(), 1);
    assert!(table[0].addition);
}

#[test]
fn multi_table_delete_prints_targets() {
    assert_eq!(
        round_trip(
            "DELETE t1 FROM t1 INNER JOIN t2 ON t1.id = t2.id WHERE t2.flag = 0",
            "mysql"
        ),
        "DELETE `t1` FROM `t1` INNER JOIN `t2` ON `t1`.`id` = `t2`.`id` WHERE `t2`.`flag` = 0"
    );
}

#[test]
fn json_addition_entries_are_suppressed() {
    let ast: Ast = serde_json::from_value(json!({
        "type": "delete",
        "table": [
            { "db": null, "table": "t1", "as": null, "addition": true },
            { "db": null, "table": "t2", "as": null }
        ],
        "from": [
            { "db": null, "table": "t1", "as": null },
            {
                "db": null, "table": "t2", "as": null,
                "join": "INNER JOIN",
                "on": {
                    "type": "binary_expr",
                    "operator": "=",
                    "left": { "type": "column_ref", "table": "t1", "column": "id" },
                    "right": { "type": "column_ref", "table": "t2", "column": "id" }
                }
            }
        ],
        "where": null
    }))
    .unwrap();
    assert_eq!(
        sqlify(&ast, "mysql"),
        "DELETE `t2` FROM `t1` INNER JOIN `t2` ON `t1`.`id` = `t2`.`id`"
    );
}

#[test]
fn clickhouse_never_prints_targets() {
    let ast = astify(
        "DELETE t1 FROM t1 INNER JOIN t2 ON t1.id = t2.id",
        "mysql",
    );
    let sql = sqlify(&ast, "clickhouse");
    assert!(sql.starts_with("DELETE FROM `t1`"), "{sql}");
}

#[test]
fn delete_with_returning() {
    assert_eq!(
        round_trip("DELETE FROM sessions WHERE expired = TRUE RETURNING id", "postgresql"),
        "DELETE FROM \"sessions\" WHERE \"expired\" = TRUE RETURNING \"id\""
    );
}
