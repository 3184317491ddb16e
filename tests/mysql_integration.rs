//! Integration tests against a live MySQL server.
//!
//! These tests require a reachable MySQL instance.
//! Run with: cargo test --features mysql-tests
//!
//! Prerequisites:
//! 1. A MySQL server (defaults to localhost:3306, override with MYSQL_HOST/MYSQL_PORT)
//! 2. A scratch database the test user may create tables in:
//!    `CREATE DATABASE mysql_wrapper_test;`
//!    (override with MYSQL_DATABASE, credentials via MYSQL_USER/MYSQL_PASSWORD)

#![cfg(feature = "mysql-tests")]

use std::sync::Arc;

use mysql_wrapper::db::{
    ConnectionConfig, Database, DbError, ErrorKind, MysqlDatabase, Outcome, Param, Params,
    QueryLog, Value, CR_INVALID_PARAMETER_NO, CR_PARAMS_NOT_BOUND,
};
use mysql::prelude::Queryable;
use mysql_wrapper::params;
use serial_test::serial;

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn test_config() -> ConnectionConfig {
    let port = env_or("MYSQL_PORT", "3306").parse().unwrap_or(3306);
    ConnectionConfig::new(
        &env_or("MYSQL_USER", "root"),
        &env_or("MYSQL_PASSWORD", ""),
        &env_or("MYSQL_DATABASE", "mysql_wrapper_test"),
    )
    .with_host(&env_or("MYSQL_HOST", "127.0.0.1"))
    .with_port(port)
}

/// Connect with a private log and a freshly seeded `users` table.
fn setup() -> (MysqlDatabase, Arc<QueryLog>) {
    let log = Arc::new(QueryLog::new());
    let mut db = MysqlDatabase::connect_with_log(&test_config(), Arc::clone(&log))
        .expect("Failed to connect to test database");

    db.send_query("DROP TABLE IF EXISTS users").unwrap();
    db.send_query(
        "CREATE TABLE users (id INT AUTO_INCREMENT PRIMARY KEY, name VARCHAR(64) NOT NULL, score DOUBLE NULL)",
    )
    .unwrap();
    db.send_query("INSERT INTO users (name) VALUES ('a'), ('b')").unwrap();
    (db, log)
}

// ============================================================================
// Plain queries
// ============================================================================

#[test]
#[serial]
fn test_get_query_assoc_rows() {
    let (mut db, _log) = setup();

    let rows = db
        .get_query("SELECT id, name FROM users ORDER BY id")
        .unwrap()
        .into_rows();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["id"], Value::Int(1));
    assert_eq!(rows[0]["name"], Value::Str("a".to_string()));
    assert_eq!(rows[1]["name"], Value::Str("b".to_string()));
    let columns: Vec<&String> = rows[0].keys().collect();
    assert_eq!(columns, ["id", "name"]);
    assert_eq!(db.affected_rows(), 2);
}

#[test]
#[serial]
fn test_get_query_numeric_rows() {
    let (mut db, _log) = setup();

    let rows = db
        .get_query_numeric("SELECT id, name FROM users ORDER BY id")
        .unwrap()
        .into_rows();

    assert_eq!(
        rows,
        vec![
            vec![Value::Int(1), Value::Str("a".to_string())],
            vec![Value::Int(2), Value::Str("b".to_string())],
        ]
    );
}

#[test]
#[serial]
fn test_get_query_without_result_set() {
    let (mut db, _log) = setup();

    let fetched = db.get_query("UPDATE users SET name = 'c' WHERE id = 1").unwrap();

    assert!(fetched.is_executed());
    assert_eq!(db.affected_rows(), 1);
}

#[test]
#[serial]
fn test_null_column_value() {
    let (mut db, _log) = setup();

    let rows = db.get_query("SELECT score FROM users WHERE id = 1").unwrap().into_rows();

    assert!(rows[0]["score"].is_null());
}

#[test]
#[serial]
fn test_send_query_outcomes() {
    let (mut db, _log) = setup();

    assert_eq!(
        db.send_query("UPDATE users SET name = 'x' WHERE id = 999").unwrap(),
        Outcome::NoEffect
    );
    assert_eq!(
        db.send_query("UPDATE users SET name = 'x' WHERE id = 1").unwrap(),
        Outcome::Applied
    );
    assert_eq!(db.send_query("SELECT 1").unwrap(), Outcome::Applied);
}

#[test]
#[serial]
fn test_insert_id_tracks_last_statement() {
    let (mut db, _log) = setup();

    db.send_query("INSERT INTO users (name) VALUES ('c')").unwrap();
    assert_eq!(db.insert_id(), Some(3));

    db.get_query("SELECT id FROM users").unwrap();
    assert_eq!(db.insert_id(), None);
}

#[test]
#[serial]
fn test_invalid_query_reports_code_and_resets_counters() {
    let (mut db, _log) = setup();
    db.send_query("UPDATE users SET name = 'x'").unwrap();
    assert_eq!(db.affected_rows(), 2);

    let err = db.get_query("SELECT nope FROM users").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Query);
    assert_eq!(err.code(), Some(1054));
    assert_eq!(err.query(), Some("SELECT nope FROM users"));
    assert!(err.to_string().starts_with("Invalid query. Errorno: 1054."));
    assert_eq!(db.affected_rows(), 0);
    assert_eq!(db.insert_id(), None);
}

// ============================================================================
// Prepared statements
// ============================================================================

#[test]
#[serial]
fn test_prepared_update_outcomes() {
    let (mut db, _log) = setup();

    let applied = db
        .send_prepared_query("UPDATE users SET name = ? WHERE id = ?", params!["z", 1])
        .unwrap();
    let missed = db
        .send_prepared_query("UPDATE users SET name = ? WHERE id = ?", params!["z", 42])
        .unwrap();

    assert_eq!(applied, Outcome::Applied);
    assert_eq!(missed, Outcome::NoEffect);
}

#[test]
#[serial]
fn test_prepared_select_binds_each_type() {
    let (mut db, _log) = setup();
    db.send_prepared_query("UPDATE users SET score = ? WHERE id = ?", params![0.5, 2])
        .unwrap();

    let rows = db
        .get_prepared_query(
            "SELECT id, name, score FROM users WHERE name = ? AND score > ?",
            params!["b", 0.25],
        )
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], Value::Int(2));
    assert_eq!(rows[0]["score"], Value::Float(0.5));

    let numeric = db
        .get_prepared_query_numeric("SELECT name FROM users WHERE id = ?", params![1])
        .unwrap();
    assert_eq!(numeric, vec![vec![Value::Str("a".to_string())]]);
}

#[test]
#[serial]
fn test_prepared_insert_sets_insert_id() {
    let (mut db, _log) = setup();

    db.send_prepared_query("INSERT INTO users (name) VALUES (?)", params!["c"])
        .unwrap();

    assert_eq!(db.insert_id(), Some(3));
    assert_eq!(db.affected_rows(), 1);
}

#[test]
#[serial]
fn test_prepared_without_result_set_returns_empty() {
    let (mut db, _log) = setup();

    let rows = db
        .get_prepared_query("DELETE FROM users WHERE id = ?", params![1])
        .unwrap();

    assert!(rows.is_empty());
    assert_eq!(db.affected_rows(), 1);
}

#[test]
#[serial]
fn test_unbindable_param_is_rejected() {
    let (mut db, _log) = setup();
    let params = Params::new().push("a").push_any(&vec![1u8, 2, 3]);

    let err = db
        .get_prepared_query("SELECT id FROM users WHERE name = ? AND id = ?", params)
        .unwrap_err();

    match err {
        DbError::UnbindableParam { position, .. } => assert_eq!(position, 1),
        other => panic!("Expected UnbindableParam, got {other:?}"),
    }
}

#[test]
#[serial]
fn test_missing_params_not_bound() {
    let (mut db, _log) = setup();

    let err = db
        .get_prepared_query("SELECT id FROM users WHERE id = ? AND name = ?", params![])
        .unwrap_err();

    assert_eq!(err.code(), Some(CR_PARAMS_NOT_BOUND));
    assert_eq!(err.query(), Some("SELECT id FROM users WHERE id = ? AND name = ?"));
}

#[test]
#[serial]
fn test_param_count_mismatch() {
    let (mut db, _log) = setup();

    let too_few = db
        .get_prepared_query("SELECT id FROM users WHERE id = ? AND name = ?", params![1])
        .unwrap_err();
    let too_many = db
        .get_prepared_query(
            "SELECT id FROM users WHERE id = ?",
            Params::from(vec![Param::from(1), Param::from("x")]),
        )
        .unwrap_err();

    assert_eq!(too_few.code(), Some(CR_INVALID_PARAMETER_NO));
    assert_eq!(too_many.code(), Some(CR_INVALID_PARAMETER_NO));
}

#[test]
#[serial]
fn test_prepared_execute_failure_reports_own_error() {
    let (mut db, _log) = setup();
    let sql = "INSERT INTO users (id, name) VALUES (?, ?)";
    db.send_prepared_query(sql, params![10, "c"]).unwrap();
    assert_eq!(db.insert_id(), Some(10));

    let err = db.send_prepared_query(sql, params![10, "dup"]).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Query);
    assert_eq!(err.code(), Some(1062));
    assert_eq!(err.query(), Some(sql));
    assert!(err.to_string().contains("Duplicate entry"));
    assert_eq!(db.affected_rows(), 0);
    assert_eq!(db.insert_id(), None);
}

// ============================================================================
// Query log, escaping, lifecycle
// ============================================================================

#[test]
#[serial]
fn test_query_log_is_shared_across_connections() {
    let (mut first, log) = setup();
    let mut second = MysqlDatabase::connect_with_log(&test_config(), Arc::clone(&log)).unwrap();
    let before = log.count();

    first.send_query("SELECT 1").unwrap();
    second.get_prepared_query("SELECT ?", params![2]).unwrap();

    assert_eq!(log.count(), before + 2);
    assert_eq!(first.total_query_count(), second.total_query_count());
    let queries = second.all_queries();
    assert_eq!(&queries[queries.len() - 2..], ["SELECT 1", "SELECT ?"]);
}

#[test]
#[serial]
fn test_clean_escapes_for_literal() {
    let (mut db, _log) = setup();
    let escaped = db.clean(&"O'Brien").unwrap();

    db.send_query(&format!("INSERT INTO users (name) VALUES ('{escaped}')"))
        .unwrap();
    let rows = db
        .get_prepared_query("SELECT name FROM users WHERE id = ?", params![3])
        .unwrap();

    assert_eq!(escaped, "O\\'Brien");
    assert_eq!(rows[0]["name"], Value::Str("O'Brien".to_string()));
}

#[test]
#[serial]
fn test_clean_follows_no_backslash_escapes_mode() {
    let (mut db, _log) = setup();
    db.raw_connection()
        .unwrap()
        .query_drop("SET SESSION sql_mode = 'NO_BACKSLASH_ESCAPES'")
        .unwrap();

    let input = r"x\' OR 1=1 -- ";
    let escaped = db.clean(&input).unwrap();
    db.send_query(&format!("INSERT INTO users (name) VALUES ('{escaped}')"))
        .unwrap();
    let rows = db
        .get_prepared_query("SELECT name FROM users WHERE id = ?", params![3])
        .unwrap();

    assert_eq!(escaped, r"x\'' OR 1=1 -- ");
    assert_eq!(rows[0]["name"], Value::Str(input.to_string()));
}

#[test]
#[serial]
fn test_operations_after_close_fail() {
    let (mut db, _log) = setup();

    db.close_connection();
    db.close_connection();

    assert!(!db.is_open());
    assert!(matches!(db.raw_connection(), Err(DbError::ConnectionClosed)));
    assert!(matches!(db.send_query("SELECT 1"), Err(DbError::ConnectionClosed)));
    assert!(matches!(db.clean(&"x"), Err(DbError::ConnectionClosed)));
}

#[test]
#[serial]
fn test_connect_failure_is_connection_error() {
    let config = test_config().with_port(1);

    let err = match MysqlDatabase::connect(&config) {
        Ok(_) => panic!("Expected connection to port 1 to fail"),
        Err(err) => err,
    };

    assert_eq!(err.kind(), ErrorKind::Connection);
    assert!(err.to_string().starts_with("Could not connect to database:"));
}
