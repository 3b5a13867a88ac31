#![allow(dead_code)]

use oxide_sqlify::{Ast, Error, Options, SqlParser};

pub fn opts(database: &str) -> Options {
    Options::new().database(database)
}

pub fn astify(sql: &str, database: &str) -> Ast {
    SqlParser::new()
        .astify(sql, &opts(database))
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e}"))
}

pub fn sqlify(ast: &Ast, database: &str) -> String {
    SqlParser::new()
        .sqlify(ast, &opts(database))
        .unwrap_or_else(|e| panic!("Failed to render for {database}: {e}"))
}

/// Parses and renders `sql` in one dialect.
pub fn round_trip(sql: &str, database: &str) -> String {
    sqlify(&astify(sql, database), database)
}

/// Asserts that rendering is a fixed point: the output parses and renders
/// to itself again.
pub fn assert_stable(sql: &str, database: &str) {
    let first = round_trip(sql, database);
    let second = round_trip(&first, database);
    assert_eq!(
        first, second,
        "Round-trip not stable for {database}.\n  Input:  {sql}\n  First:  {first}\n  Second: {second}"
    );
}

pub fn parse_err(sql: &str, database: &str) -> Error {
    SqlParser::new()
        .astify(sql, &opts(database))
        .expect_err(&format!("Expected parse error for: {sql}"))
}

/// Installs a test subscriber so debug output shows up with `--nocapture`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}
