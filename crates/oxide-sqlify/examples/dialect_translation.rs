//! Dialect Translation Example
//!
//! This example shows the three things the facade is used for:
//! - Parsing SQL into a JSON AST
//! - Rendering one AST for several target databases
//! - Gating queries with a table whitelist
//!
//! Run with: cargo run --example dialect_translation

use oxide_sqlify::{CheckType, Options, SqlParser};

// =============================================================================
// TRANSLATION
// =============================================================================

fn translate(parser: &SqlParser, sql: &str) -> oxide_sqlify::Result<()> {
    let ast = parser.astify(sql, &Options::new().database("mysql"))?;
    println!("Source (mysql): {sql}");
    for target in ["postgresql", "transactsql", "duckdb", "bigquery"] {
        let rendered = parser.sqlify(&ast, &Options::new().database(target))?;
        println!("  {target:<12} {rendered}");
    }
    println!();
    Ok(())
}

// =============================================================================
// WHITELISTING
// =============================================================================

fn gate(parser: &SqlParser, sql: &str, allow: &[&str], check_type: CheckType) {
    let opts = Options::new().database("mysql").check_type(check_type);
    match parser.white_list_check(sql, allow, &opts) {
        Ok(()) => println!("  allowed: {sql}"),
        Err(e) => println!("  denied:  {e}"),
    }
}

fn main() -> oxide_sqlify::Result<()> {
    let parser = SqlParser::new();

    println!("=== Translation ===\n");
    translate(&parser, "SELECT id, name FROM users WHERE active = 1 LIMIT 20, 10")?;
    translate(
        &parser,
        "SELECT u.id, COUNT(o.id) AS orders FROM users u LEFT JOIN orders o ON o.user_id = u.id GROUP BY u.id",
    )?;

    println!("=== JSON AST ===\n");
    let ast = parser.astify("SELECT id FROM users WHERE id = 1", &Options::new())?;
    println!("{}\n", serde_json::to_string_pretty(&ast)?);

    println!("=== Whitelist ===\n");
    let tables = ["select::(.*)::(users|orders)"];
    gate(&parser, "SELECT * FROM users", &tables, CheckType::Table);
    gate(&parser, "SELECT * FROM secrets", &tables, CheckType::Table);
    gate(&parser, "DELETE FROM users WHERE id = 1", &tables, CheckType::Table);

    let columns = ["select::users::(id|name)"];
    gate(&parser, "SELECT u.id FROM users u", &columns, CheckType::Column);
    gate(&parser, "SELECT u.password FROM users u", &columns, CheckType::Column);

    for entry in parser.table_list(
        "SELECT * FROM shop.orders o JOIN users u ON u.id = o.user_id",
        &Options::new(),
    )? {
        println!("  table: {entry}");
    }
    Ok(())
}
