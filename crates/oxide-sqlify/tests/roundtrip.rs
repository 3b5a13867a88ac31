//! Parse-then-render tests across dialects.

mod common;
use common::*;

use oxide_sqlify::Dialect;

const ROUNDTRIP_DATABASES: [&str; 7] = [
    "mysql",
    "postgresql",
    "sqlite",
    "clickhouse",
    "duckdb",
    "bigquery",
    "mariadb",
];

#[test]
fn star_is_preserved_in_every_dialect() {
    for dialect in Dialect::ALL {
        let result = round_trip("SELECT * FROM t", dialect.name());
        assert!(result.contains('*'), "{dialect}: {result}");
        assert!(result.contains('t'), "{dialect}: {result}");
        assert!(result.starts_with("SELECT * FROM"), "{dialect}: {result}");
    }
}

#[test]
fn star_with_where_clause() {
    for database in ROUNDTRIP_DATABASES {
        let result = round_trip("SELECT * FROM users WHERE id = 1", database);
        assert!(result.contains("SELECT *"), "{database}: {result}");
        assert!(result.contains("WHERE"), "{database}: {result}");
        assert!(result.ends_with("= 1"), "{database}: {result}");
    }
}

#[test]
fn explicit_columns_do_not_become_star() {
    for database in ROUNDTRIP_DATABASES {
        let result = round_trip("SELECT id, name FROM users", database);
        assert!(!result.contains('*'), "{database}: {result}");
        assert!(result.contains("id"), "{database}: {result}");
        assert!(result.contains("name"), "{database}: {result}");
    }
}

#[test]
fn column_alias_keeps_as() {
    for database in ROUNDTRIP_DATABASES {
        let result = round_trip("SELECT id AS user_id FROM users", database);
        assert!(result.contains(" AS user_id"), "{database}: {result}");
    }
}

#[test]
fn table_alias_per_dialect() {
    assert_eq!(
        round_trip("SELECT * FROM users u WHERE u.id = 1", "mysql"),
        "SELECT * FROM `users` AS `u` WHERE `u`.`id` = 1"
    );
    assert_eq!(
        round_trip("SELECT u.name FROM users u", "duckdb"),
        "SELECT \"u\".\"name\" FROM \"users\" \"u\""
    );
}

#[test]
fn quoted_identifiers_round_trip() {
    let cases = [
        ("mysql", "SELECT * FROM `my-table` WHERE `user-id` = 1", "`my-table`", "`user-id`"),
        ("clickhouse", "SELECT * FROM `my-table` WHERE `user-id` = 1", "`my-table`", "`user-id`"),
        ("postgresql", "SELECT * FROM \"my-table\" WHERE \"user-id\" = 1", "\"my-table\"", "\"user-id\""),
        ("duckdb", "SELECT * FROM \"my-table\" WHERE \"user-id\" = 1", "\"my-table\"", "\"user-id\""),
        ("transactsql", "SELECT * FROM [my-table] WHERE [user-id] = 1", "[my-table]", "[user-id]"),
    ];
    for (database, sql, table, column) in cases {
        let result = round_trip(sql, database);
        assert!(result.contains('*'), "{database}: {result}");
        assert!(result.contains(table), "{database}: {result}");
        assert!(result.contains(column), "{database}: {result}");
    }
}

#[test]
fn join_keeps_keyword_and_condition() {
    for database in ["mysql", "postgresql", "sqlite", "mariadb"] {
        let result = round_trip("SELECT * FROM users u JOIN orders o ON u.id = o.user_id", database);
        assert!(result.contains('*'), "{database}: {result}");
        assert!(result.contains(" JOIN "), "{database}: {result}");
        assert!(result.contains(" ON "), "{database}: {result}");
    }
}

#[test]
fn subquery_keeps_both_stars() {
    for database in ROUNDTRIP_DATABASES {
        let result = round_trip(
            "SELECT * FROM (SELECT * FROM users WHERE active = 1) sub",
            database,
        );
        assert_eq!(result.matches('*').count(), 2, "{database}: {result}");
        assert!(result.contains("(SELECT * FROM"), "{database}: {result}");
    }
}

#[test]
fn group_by_with_star() {
    assert_eq!(
        round_trip("SELECT * FROM users GROUP BY department", "postgresql"),
        "SELECT * FROM \"users\" GROUP BY \"department\""
    );
}

#[test]
fn set_operations() {
    assert_eq!(
        round_trip("SELECT a FROM x UNION ALL SELECT b FROM y", "postgresql"),
        "SELECT \"a\" FROM \"x\" UNION ALL SELECT \"b\" FROM \"y\""
    );
}

#[test]
fn with_clause() {
    assert_eq!(
        round_trip(
            "WITH recent AS (SELECT * FROM events) SELECT id FROM recent",
            "postgresql"
        ),
        "WITH \"recent\" AS (SELECT * FROM \"events\") SELECT \"id\" FROM \"recent\""
    );
}

#[test]
fn insert_update_forms() {
    assert_eq!(
        round_trip(
            "insert into users (id, name) values (1, 'John'), (2, 'Jane')",
            "postgresql"
        ),
        "INSERT INTO \"users\" (\"id\", \"name\") VALUES (1, 'John'), (2, 'Jane')"
    );
    assert_eq!(
        round_trip(
            "INSERT INTO t (a) VALUES (1) ON DUPLICATE KEY UPDATE a = 2",
            "mysql"
        ),
        "INSERT INTO `t` (`a`) VALUES (1) ON DUPLICATE KEY UPDATE `a` = 2"
    );
    assert_eq!(
        round_trip("UPDATE users SET name = 'x' WHERE id = 1 RETURNING id", "postgresql"),
        "UPDATE \"users\" SET \"name\" = 'x' WHERE \"id\" = 1 RETURNING \"id\""
    );
}

#[test]
fn rendering_is_stable() {
    for sql in [
        "SELECT DISTINCT a, b AS c FROM t WHERE a IN (1, 2) AND b IS NOT NULL ORDER BY a DESC",
        "SELECT COUNT(DISTINCT id) FROM t GROUP BY k HAVING COUNT(*) > 1",
        "SELECT CASE WHEN a > 1 THEN 'x' ELSE 'y' END FROM t",
        "SELECT * FROM a LEFT JOIN b ON a.id = b.a_id LIMIT 5 OFFSET 10",
        "DELETE FROM t WHERE id = 1",
    ] {
        assert_stable(sql, "postgresql");
        assert_stable(sql, "mysql");
    }
}

#[test]
fn multiple_statements_are_joined() {
    assert_eq!(
        round_trip("SELECT 1; SELECT 2", "mysql"),
        "SELECT 1 ; SELECT 2"
    );
}
