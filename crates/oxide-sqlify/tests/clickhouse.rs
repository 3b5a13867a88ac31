mod common;
use common::*;

const DB: &str = "clickhouse";

#[test]
fn create_table_with_engine() {
    assert_eq!(
        round_trip(
            "CREATE TABLE events (id UInt64, ts DATETIME64(3), loc TUPLE(FLOAT32, FLOAT32), n NULLABLE(INT32)) ENGINE = MergeTree ORDER BY id",
            DB
        ),
        "CREATE TABLE `events` (`id` UInt64, `ts` DATETIME64(3), `loc` TUPLE(FLOAT32, FLOAT32), `n` NULLABLE(INT32)) ENGINE = MergeTree ORDER BY id"
    );
}

#[test]
fn engine_arguments_are_kept() {
    let sql = round_trip(
        "CREATE TABLE logs (id UInt64) ENGINE = ReplacingMergeTree(version) ORDER BY (id, ts)",
        DB,
    );
    assert!(sql.ends_with("ENGINE = ReplacingMergeTree(version) ORDER BY (id, ts)"), "{sql}");
}

#[test]
fn map_subscript_keeps_base_unquoted() {
    assert_eq!(
        round_trip("SELECT event_data['action'] AS action FROM events", DB),
        "SELECT event_data['action'] AS action FROM `events`"
    );
}

#[test]
fn function_names_keep_case() {
    assert_eq!(
        round_trip("SELECT toString(id) FROM t", DB),
        "SELECT toString(`id`) FROM `t`"
    );
}

#[test]
fn delete_prints_no_targets() {
    assert_eq!(
        round_trip("DELETE FROM events WHERE id = 1", DB),
        "DELETE FROM `events` WHERE `id` = 1"
    );
}

#[test]
fn limit_comma_form() {
    assert_eq!(
        round_trip("SELECT * FROM events LIMIT 10, 20", DB),
        "SELECT * FROM `events` LIMIT 10, 20"
    );
}
