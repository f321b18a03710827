// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use questclip::actions::{habit_increment, todo_complete};
use questclip::models::{self, HabitState, Task, TaskKind, TodoState};
use questclip::{cli, commands::exporter, db};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn.execute_batch(
        r#"
        INSERT INTO accounts(name) VALUES('default');
        INSERT INTO profiles(account_id, name, gold_balance)
            SELECT id, 'main', '10.00' FROM accounts WHERE name='default';
    "#,
    )
    .unwrap();
    conn
}

fn seed_actions(conn: &mut Connection) {
    let created = chrono::NaiveDate::from_ymd_opt(2026, 2, 1)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap();
    let at = chrono::NaiveDate::from_ymd_opt(2026, 2, 21)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    let habit = models::insert_task(
        conn,
        &Task {
            id: 0,
            profile_id: 1,
            title: "Walk".into(),
            notes: String::new(),
            is_hidden: false,
            gold_delta: Decimal::from_str_exact("2.00").unwrap(),
            created_at: created,
            updated_at: created,
            last_action_at: None,
            total_actions_count: 0,
            kind: TaskKind::Habit(HabitState {
                current_count: Decimal::ZERO,
                count_increment: Decimal::ONE,
                reset_cadence: None,
            }),
        },
    )
    .unwrap();
    let todo = models::insert_task(
        conn,
        &Task {
            id: 0,
            profile_id: 1,
            title: "Ship, it".into(),
            notes: String::new(),
            is_hidden: false,
            gold_delta: Decimal::from_str_exact("3.00").unwrap(),
            created_at: created,
            updated_at: created,
            last_action_at: None,
            total_actions_count: 0,
            kind: TaskKind::Todo(TodoState {
                due_at: None,
                is_done: false,
                completed_at: None,
            }),
        },
    )
    .unwrap();
    habit_increment(conn, 1, 1, habit, None, at).unwrap();
    todo_complete(conn, 1, 1, todo, at).unwrap();
}

fn run_export(conn: &Connection, args: &[&str]) {
    let matches = cli::build_cli().get_matches_from(args);
    let Some(("export", sub)) = matches.subcommand() else {
        panic!("export command not parsed");
    };
    exporter::handle(conn, sub).unwrap();
}

#[test]
fn export_logs_csv_writes_header_and_rows() {
    let mut conn = setup();
    seed_actions(&mut conn);
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("logs.csv");

    run_export(
        &conn,
        &[
            "questclip",
            "export",
            "logs",
            "--out",
            out.to_str().unwrap(),
            "--format",
            "csv",
        ],
    );

    let mut rdr = csv::Reader::from_path(&out).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(headers.get(0), Some("timestamp"));
    assert_eq!(headers.get(4), Some("user_gold"));
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    // habit row carries a count delta; todo row does not
    assert_eq!(rows[0].get(1), Some("habit_incremented"));
    assert_eq!(rows[0].get(5), Some("1.00"));
    assert_eq!(rows[1].get(1), Some("todo_completed"));
    assert_eq!(rows[1].get(5), Some(""));
    assert_eq!(rows[1].get(4), Some("15.00"));
}

#[test]
fn export_tasks_json_round_trips_titles_with_commas() {
    let mut conn = setup();
    seed_actions(&mut conn);
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("tasks.json");

    run_export(
        &conn,
        &[
            "questclip",
            "export",
            "tasks",
            "--out",
            out.to_str().unwrap(),
            "--format",
            "json",
        ],
    );

    let raw = std::fs::read_to_string(&out).unwrap();
    let items: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1]["title"], "Ship, it");
    assert_eq!(items[1]["type"], "todo");
    assert_eq!(items[1]["total_actions"], 1);
}

#[test]
fn schema_initializes_on_a_file_backed_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("questclip.sqlite");
    let mut conn = Connection::open(&path).unwrap();
    db::init_schema(&mut conn).unwrap();
    // Re-opening and re-initializing must be harmless.
    drop(conn);
    let mut conn = Connection::open(&path).unwrap();
    db::init_schema(&mut conn).unwrap();
    let tables: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN
             ('accounts','profiles','tasks','streak_bonus_rules','checklist_items','log_entries')",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(tables, 6);
}
