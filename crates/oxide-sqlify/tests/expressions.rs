mod common;
use common::*;

use oxide_sqlify::ast::{ColumnRef, Expr};
use oxide_sqlify::dialect::Dialect;
use oxide_sqlify::render::{ExtensionRegistry, RenderConfig, RenderMode, Renderer};
use oxide_sqlify::{Error, SqlParser};
use serde_json::json;

fn render(expr: &Expr, database: &str) -> String {
    SqlParser::new().expr_to_sql(expr, &opts(database)).unwrap()
}

#[test]
fn unary_operator_spacing() {
    assert_eq!(render(&Expr::unary("-", Expr::number(5)), "mysql"), "-5");
    assert_eq!(render(&Expr::unary("~", Expr::column("bits")), "mysql"), "~`bits`");
    assert_eq!(render(&Expr::unary("not", Expr::column("x")), "mysql"), "NOT `x`");
    assert_eq!(
        render(&Expr::unary("NOT", Expr::column("x")), "postgresql"),
        "NOT \"x\""
    );
}

#[test]
fn list_parentheses_follow_flag() {
    let bare = Expr::list(vec![Expr::number(1), Expr::number(2)]);
    assert_eq!(render(&bare, "mysql"), "1, 2");
    assert_eq!(render(&bare.parenthesized(), "mysql"), "(1, 2)");
}

#[test]
fn explicit_parentheses_are_kept() {
    assert_eq!(
        round_trip("SELECT (a + b) * c FROM t", "mysql"),
        "SELECT (`a` + `b`) * `c` FROM `t`"
    );
    assert_eq!(
        round_trip("SELECT a + b * c FROM t", "mysql"),
        "SELECT `a` + `b` * `c` FROM `t`"
    );
}

#[test]
fn string_literals_double_quotes() {
    assert_eq!(render(&Expr::string("it's"), "postgresql"), "'it''s'");
}

#[test]
fn null_and_booleans() {
    assert_eq!(render(&Expr::null(), "mysql"), "NULL");
    assert_eq!(render(&Expr::boolean(true), "mysql"), "TRUE");
    assert_eq!(
        round_trip("SELECT * FROM t WHERE a IS NULL AND b IS NOT NULL", "postgresql"),
        "SELECT * FROM \"t\" WHERE \"a\" IS NULL AND \"b\" IS NOT NULL"
    );
}

#[test]
fn in_and_between() {
    assert_eq!(
        round_trip("SELECT * FROM t WHERE a IN (1, 2, 3)", "mysql"),
        "SELECT * FROM `t` WHERE `a` IN (1, 2, 3)"
    );
    assert_eq!(
        round_trip("SELECT * FROM t WHERE a BETWEEN 1 AND 5", "mysql"),
        "SELECT * FROM `t` WHERE `a` BETWEEN 1 AND 5"
    );
}

#[test]
fn fallback_renders_without_registered_capabilities() {
    init_tracing();
    let renderer = Renderer::with_registry(
        RenderConfig::new(Dialect::MySql),
        ExtensionRegistry::new(),
    );
    assert_eq!(renderer.expr(&Expr::column("id")).unwrap(), "`id`");
    let star = Expr::ColumnRef(ColumnRef::star().with_table("t"));
    assert_eq!(renderer.expr(&star).unwrap(), "`t`.*");
    assert_eq!(
        renderer
            .expr(&Expr::column("id").binary("=", Expr::number(1)))
            .unwrap(),
        "`id` = 1"
    );
}

#[test]
fn unknown_nodes_render_best_effort() {
    init_tracing();
    let node = Expr::from_value(json!({ "type": "mystery", "value": 42 })).unwrap();
    assert!(matches!(node, Expr::Unknown(_)));
    assert_eq!(render(&node, "mysql"), "42");
}

#[test]
fn strict_mode_rejects_unknown_nodes() {
    let node = Expr::from_value(json!({ "type": "mystery", "value": 42 })).unwrap();
    let renderer = Renderer::new(RenderConfig::new(Dialect::MySql).with_mode(RenderMode::Strict));
    match renderer.expr(&node) {
        Err(Error::UnrenderableNode(kind)) => assert_eq!(kind, "mystery"),
        other => panic!("expected UnrenderableNode, got {other:?}"),
    }

    let strict = opts("mysql").mode(RenderMode::Strict);
    let err = SqlParser::new().expr_to_sql(&node, &strict).unwrap_err();
    assert_eq!(err.to_string(), "no renderer for node kind 'mystery'");
}

#[test]
fn expression_rendering_is_dialect_aware() {
    let expr = Expr::qualified_column("u", "my-col").binary(">", Expr::number(5));
    assert_eq!(render(&expr, "mysql"), "`u`.`my-col` > 5");
    assert_eq!(render(&expr, "postgresql"), "\"u\".\"my-col\" > 5");
    assert_eq!(render(&expr, "transactsql"), "[u].[my-col] > 5");
    assert_eq!(render(&expr, "bigquery"), "u.my-col > 5");
}
