mod common;
use common::*;

const DB: &str = "duckdb";

#[test]
fn table_alias_without_as() {
    assert_eq!(
        round_trip("SELECT u.name FROM users u WHERE u.id = 1", DB),
        "SELECT \"u\".\"name\" FROM \"users\" \"u\" WHERE \"u\".\"id\" = 1"
    );
}

#[test]
fn column_alias_keeps_as() {
    assert_eq!(
        round_trip("SELECT name AS full_name FROM users", DB),
        "SELECT \"name\" AS full_name FROM \"users\""
    );
}

#[test]
fn struct_column_type() {
    assert_eq!(
        round_trip(
            "CREATE TABLE test (person STRUCT(name VARCHAR, age INTEGER))",
            DB
        ),
        "CREATE TABLE \"test\" (\"person\" STRUCT(\"name\" VARCHAR, \"age\" INTEGER))"
    );
}

#[test]
fn struct_literal_in_values() {
    assert_eq!(
        round_trip(
            "INSERT INTO products VALUES ({'name': 'Product 1', 'price': 100})",
            DB
        ),
        "INSERT INTO \"products\" VALUES ({'name': 'Product 1', 'price': 100})"
    );
}

#[test]
fn empty_call_keeps_parentheses() {
    assert_eq!(
        round_trip("SELECT count() FROM users", DB),
        "SELECT count() FROM \"users\""
    );
}

#[test]
fn drop_and_show() {
    assert_eq!(round_trip("DROP DATABASE test_db", DB), "DROP DATABASE \"test_db\"");
    assert_eq!(
        round_trip("DROP TABLE IF EXISTS a, b", DB),
        "DROP TABLE IF EXISTS \"a\", \"b\""
    );
    assert_eq!(round_trip("SHOW TABLES", DB), "SHOW TABLES");
    assert_eq!(round_trip("SHOW DATABASES", DB), "SHOW DATABASES");
}

#[test]
fn returning_is_accepted() {
    assert_eq!(
        round_trip("INSERT INTO t (a) VALUES (1) RETURNING a", DB),
        "INSERT INTO \"t\" (\"a\") VALUES (1) RETURNING \"a\""
    );
}

#[test]
fn duckdb_rendering_is_stable() {
    for sql in [
        "SELECT * FROM users u JOIN orders o ON u.id = o.user_id",
        "SELECT a, SUM(b) FROM t GROUP BY a ORDER BY a LIMIT 10 OFFSET 5",
        "CREATE TABLE test (person STRUCT(name VARCHAR, age INTEGER))",
    ] {
        assert_stable(sql, DB);
    }
}
