//! Subcommand implementations. Each returns the text printed on stdout.

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use tracing::info;

use oxide_sqlify::ast::{Ast, Expr};
use oxide_sqlify::{Options, SqlParser};

/// Returns the SQL argument, or stdin when it is absent or `-`.
pub fn read_sql(sql: Option<String>) -> anyhow::Result<String> {
    match sql {
        Some(sql) if sql != "-" => Ok(sql),
        _ => read_stdin(),
    }
}

/// Returns the file's content, or stdin when it is absent or `-`.
pub fn read_file(file: Option<PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => read_stdin(),
    }
}

fn read_stdin() -> anyhow::Result<String> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;
    Ok(input)
}

pub fn astify(sql: &str, opts: &Options) -> anyhow::Result<String> {
    let ast = SqlParser::new().astify(sql, opts)?;
    Ok(serde_json::to_string_pretty(&ast)?)
}

/// Renders a JSON AST. A lone expression node is rendered on its own.
pub fn sqlify(json: &str, opts: &Options) -> anyhow::Result<String> {
    let value: serde_json::Value = serde_json::from_str(json).context("input is not JSON")?;
    let parser = SqlParser::new();
    let is_expression = value
        .get("type")
        .and_then(serde_json::Value::as_str)
        .is_some_and(|kind| !is_statement_kind(kind));
    if is_expression {
        let expr = Expr::from_value(value)?;
        return Ok(parser.expr_to_sql(&expr, opts)?);
    }
    let ast: Ast = serde_json::from_value(value).context("input is not a statement AST")?;
    Ok(parser.sqlify(&ast, opts)?)
}

fn is_statement_kind(kind: &str) -> bool {
    matches!(
        kind,
        "select" | "insert" | "replace" | "update" | "delete" | "create" | "drop" | "show"
    )
}

pub fn tables(sql: &str, opts: &Options) -> anyhow::Result<String> {
    Ok(SqlParser::new().table_list(sql, opts)?.join("\n"))
}

pub fn columns(sql: &str, opts: &Options) -> anyhow::Result<String> {
    Ok(SqlParser::new().column_list(sql, opts)?.join("\n"))
}

pub fn check(sql: &str, allow: &[String], opts: &Options) -> anyhow::Result<String> {
    SqlParser::new().white_list_check(sql, allow, opts)?;
    info!(kind = %opts.check_type, "Query allowed");
    Ok("ok".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_astify_then_sqlify() {
        let opts = Options::new().database("postgresql");
        let json = astify("SELECT id FROM t WHERE id = 1", &opts).unwrap();
        assert_eq!(
            sqlify(&json, &opts).unwrap(),
            "SELECT \"id\" FROM \"t\" WHERE \"id\" = 1"
        );
    }

    #[test]
    fn test_sqlify_expression() {
        let json = r#"{"type": "column_ref", "table": null, "column": "a-b"}"#;
        assert_eq!(sqlify(json, &Options::new()).unwrap(), "`a-b`");
    }

    #[test]
    fn test_check_denied() {
        let err = check("SELECT * FROM secret", &["public".to_string()], &Options::new())
            .unwrap_err();
        assert!(err.to_string().contains("select::null::secret"));
    }
}
