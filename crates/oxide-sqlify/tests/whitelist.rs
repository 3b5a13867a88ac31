mod common;
use common::*;

use oxide_sqlify::{CheckType, Error, SqlParser};

const NONE: [&str; 0] = [];

#[test]
fn denied_table_names_the_authority() {
    let err = SqlParser::new()
        .white_list_check("SELECT * FROM secret", &["public"], &opts("mysql"))
        .unwrap_err();
    match &err {
        Error::WhiteListDenied {
            kind,
            authority,
            sql,
        } => {
            assert_eq!(*kind, CheckType::Table);
            assert_eq!(authority, "select::null::secret");
            assert_eq!(sql, "SELECT * FROM secret");
        }
        other => panic!("expected WhiteListDenied, got {other:?}"),
    }
    assert!(err.to_string().contains("secret"));
    assert!(err.to_string().contains("table whiteList"));
}

#[test]
fn allowed_tables_pass() {
    let parser = SqlParser::new();
    let opts = opts("mysql");
    parser
        .white_list_check("SELECT * FROM public", &["public"], &opts)
        .unwrap();
    parser
        .white_list_check("SELECT * FROM public", &["select::null::public"], &opts)
        .unwrap();
    parser
        .white_list_check(
            "SELECT * FROM a JOIN b ON a.id = b.id",
            &["select::(.*)::(a|b)"],
            &opts,
        )
        .unwrap();
}

#[test]
fn every_table_must_be_covered() {
    let err = SqlParser::new()
        .white_list_check(
            "SELECT * FROM public JOIN secret ON public.id = secret.id",
            &["public"],
            &opts("postgresql"),
        )
        .unwrap_err();
    assert!(matches!(err, Error::WhiteListDenied { ref authority, .. } if authority == "select::null::secret"));
}

#[test]
fn verbs_are_checked() {
    let parser = SqlParser::new();
    let opts = opts("mysql");
    let allow = ["select::(.*)::users"];
    parser
        .white_list_check("SELECT id FROM users", &allow, &opts)
        .unwrap();
    assert!(parser
        .white_list_check("DELETE FROM users WHERE id = 1", &allow, &opts)
        .is_err());
}

#[test]
fn column_check_type() {
    let parser = SqlParser::new();
    let opts = opts("mysql").check_type(CheckType::Column);
    parser
        .white_list_check(
            "SELECT id, name FROM users",
            &["select::null::(id|name)"],
            &opts,
        )
        .unwrap();
    let err = parser
        .white_list_check("SELECT id, password FROM users", &["select::null::id"], &opts)
        .unwrap_err();
    match err {
        Error::WhiteListDenied { kind, authority, .. } => {
            assert_eq!(kind, CheckType::Column);
            assert_eq!(authority, "select::null::password");
        }
        other => panic!("expected WhiteListDenied, got {other:?}"),
    }
}

#[test]
fn empty_whitelist_allows_anything() {
    SqlParser::new()
        .white_list_check("this is not sql", &NONE, &opts("mysql"))
        .unwrap();
}

#[test]
fn invalid_pattern_is_reported() {
    let err = SqlParser::new()
        .white_list_check("SELECT * FROM t", &["(unclosed"], &opts("mysql"))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidPattern { ref pattern, .. } if pattern == "(unclosed"));
}

#[test]
fn reference_lists() {
    let parser = SqlParser::new();
    let opts = opts("mysql");
    assert_eq!(
        parser
            .table_list("SELECT u.id FROM users u JOIN shop.orders o ON u.id = o.user_id", &opts)
            .unwrap(),
        vec!["select::null::users", "select::shop::orders"]
    );
    assert_eq!(
        parser
            .table_list("UPDATE accounts SET balance = 0 WHERE id = 1", &opts)
            .unwrap(),
        vec!["update::null::accounts"]
    );
    let columns = parser
        .column_list("SELECT u.id FROM users u", &opts)
        .unwrap();
    assert!(columns.contains(&"select::users::id".to_string()), "{columns:?}");
}
