// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use questclip::db;
use questclip::errors::ActionError;
use questclip::models::{
    self, Cadence, DailyState, HabitState, TASK_COLUMNS, Task, TaskKind, TodoState,
};
use questclip::newday::{
    refresh_profile_period_state, start_new_day, uncompleted_dailies_from_previous_period,
};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn.execute_batch(
        r#"
        INSERT INTO accounts(name) VALUES('alice');
        INSERT INTO profiles(account_id, name, gold_balance)
            SELECT id, 'Alice Main', '10.00' FROM accounts WHERE name='alice';
    "#,
    )
    .unwrap();
    conn
}

fn ids(conn: &Connection) -> (i64, i64) {
    let account: i64 = conn
        .query_row("SELECT id FROM accounts WHERE name='alice'", [], |r| r.get(0))
        .unwrap();
    let profile: i64 = conn
        .query_row("SELECT id FROM profiles WHERE name='Alice Main'", [], |r| {
            r.get(0)
        })
        .unwrap();
    (account, profile)
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str_exact(s).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn ts(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, 0, 0).unwrap()
}

fn insert_daily(
    conn: &Connection,
    profile: i64,
    title: &str,
    streak: u32,
    best: u32,
    last: Option<NaiveDate>,
) -> i64 {
    let created = ts(2026, 2, 1, 8);
    let task = Task {
        id: 0,
        profile_id: profile,
        title: title.into(),
        notes: String::new(),
        is_hidden: false,
        gold_delta: dec("1.00"),
        created_at: created,
        updated_at: created,
        last_action_at: None,
        total_actions_count: 0,
        kind: TaskKind::Daily(DailyState {
            cadence: Cadence::Day,
            repeat_every: 1,
            current_streak: streak,
            best_streak: best,
            streak_goal: 0,
            last_completion_period: last,
            autocomplete_threshold_secs: None,
        }),
    };
    models::insert_task(conn, &task).unwrap()
}

fn insert_habit(
    conn: &Connection,
    profile: i64,
    title: &str,
    count: &str,
    reset: Option<Cadence>,
    last_action: Option<NaiveDateTime>,
) -> i64 {
    let created = ts(2026, 2, 1, 8);
    let task = Task {
        id: 0,
        profile_id: profile,
        title: title.into(),
        notes: String::new(),
        is_hidden: false,
        gold_delta: dec("1.00"),
        created_at: created,
        updated_at: created,
        last_action_at: last_action,
        total_actions_count: 0,
        kind: TaskKind::Habit(HabitState {
            current_count: dec(count),
            count_increment: Decimal::ONE,
            reset_cadence: reset,
        }),
    };
    models::insert_task(conn, &task).unwrap()
}

fn fetch_task(conn: &Connection, id: i64) -> Task {
    conn.query_row(
        &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id=?1"),
        params![id],
        Task::from_row,
    )
    .unwrap()
}

#[test]
fn refresh_resets_habit_count_on_new_period() {
    let mut conn = setup();
    let (account, profile) = ids(&conn);
    let habit = insert_habit(
        &conn,
        profile,
        "Habit",
        "4.00",
        Some(Cadence::Day),
        Some(ts(2026, 2, 20, 12)),
    );

    refresh_profile_period_state(&mut conn, account, profile, ts(2026, 2, 21, 8)).unwrap();

    let stored = fetch_task(&conn, habit);
    assert_eq!(stored.habit().unwrap().current_count, dec("0.00"));
}

#[test]
fn refresh_keeps_habit_count_within_same_period() {
    let mut conn = setup();
    let (account, profile) = ids(&conn);
    let habit = insert_habit(
        &conn,
        profile,
        "Habit",
        "4.00",
        Some(Cadence::Day),
        Some(ts(2026, 2, 20, 12)),
    );

    refresh_profile_period_state(&mut conn, account, profile, ts(2026, 2, 20, 18)).unwrap();

    let stored = fetch_task(&conn, habit);
    assert_eq!(stored.habit().unwrap().current_count, dec("4.00"));
}

#[test]
fn refresh_ignores_habits_without_reset_cadence() {
    let mut conn = setup();
    let (account, profile) = ids(&conn);
    let habit = insert_habit(
        &conn,
        profile,
        "Lifetime counter",
        "4.00",
        None,
        Some(ts(2026, 1, 1, 12)),
    );

    refresh_profile_period_state(&mut conn, account, profile, ts(2026, 2, 21, 8)).unwrap();

    let stored = fetch_task(&conn, habit);
    assert_eq!(stored.habit().unwrap().current_count, dec("4.00"));
}

#[test]
fn refresh_resets_streak_after_missed_period() {
    let mut conn = setup();
    let (account, profile) = ids(&conn);
    // Last completed 2026-02-18; at 2026-02-21 the expected previous period
    // is 2026-02-20, so a full period was missed.
    let daily = insert_daily(&conn, profile, "Daily", 3, 5, Some(date(2026, 2, 18)));

    refresh_profile_period_state(&mut conn, account, profile, ts(2026, 2, 21, 8)).unwrap();

    let stored = fetch_task(&conn, daily);
    assert_eq!(stored.daily().unwrap().current_streak, 0);
    assert_eq!(stored.daily().unwrap().best_streak, 5);
}

#[test]
fn refresh_keeps_streak_when_previous_period_was_completed() {
    let mut conn = setup();
    let (account, profile) = ids(&conn);
    let daily = insert_daily(&conn, profile, "Daily", 3, 5, Some(date(2026, 2, 20)));

    refresh_profile_period_state(&mut conn, account, profile, ts(2026, 2, 21, 8)).unwrap();

    let stored = fetch_task(&conn, daily);
    assert_eq!(stored.daily().unwrap().current_streak, 3);
}

#[test]
fn refresh_is_idempotent_for_a_fixed_timestamp() {
    let mut conn = setup();
    let (account, profile) = ids(&conn);
    let daily = insert_daily(&conn, profile, "Daily", 3, 5, Some(date(2026, 2, 18)));
    let habit = insert_habit(
        &conn,
        profile,
        "Habit",
        "4.00",
        Some(Cadence::Day),
        Some(ts(2026, 2, 20, 12)),
    );

    let at = ts(2026, 2, 21, 8);
    refresh_profile_period_state(&mut conn, account, profile, at).unwrap();
    let daily_once = fetch_task(&conn, daily);
    let habit_once = fetch_task(&conn, habit);

    refresh_profile_period_state(&mut conn, account, profile, at).unwrap();
    assert_eq!(fetch_task(&conn, daily), daily_once);
    assert_eq!(fetch_task(&conn, habit), habit_once);
}

#[test]
fn preview_reports_uncompleted_previous_period_daily() {
    let mut conn = setup();
    let (account, profile) = ids(&conn);
    let daily = insert_daily(&conn, profile, "Streak daily", 3, 3, Some(date(2026, 2, 19)));

    let preview =
        uncompleted_dailies_from_previous_period(&mut conn, account, profile, ts(2026, 2, 21, 8))
            .unwrap();

    assert_eq!(preview.len(), 1);
    assert_eq!(preview[0].task_id, daily);
    assert_eq!(preview[0].previous_period_start, date(2026, 2, 20));
    assert_eq!(preview[0].last_completion_period, Some(date(2026, 2, 19)));
}

#[test]
fn preview_skips_dailies_satisfied_for_current_or_previous_period() {
    let mut conn = setup();
    let (account, profile) = ids(&conn);
    insert_daily(&conn, profile, "Done today", 2, 2, Some(date(2026, 2, 21)));
    insert_daily(&conn, profile, "Done yesterday", 2, 2, Some(date(2026, 2, 20)));

    let preview =
        uncompleted_dailies_from_previous_period(&mut conn, account, profile, ts(2026, 2, 21, 12))
            .unwrap();

    assert!(preview.is_empty());
}

#[test]
fn preview_orders_by_title() {
    let mut conn = setup();
    let (account, profile) = ids(&conn);
    insert_daily(&conn, profile, "Beta", 0, 0, Some(date(2026, 2, 10)));
    insert_daily(&conn, profile, "Alpha", 0, 0, Some(date(2026, 2, 10)));

    let preview =
        uncompleted_dailies_from_previous_period(&mut conn, account, profile, ts(2026, 2, 21, 8))
            .unwrap();

    let titles: Vec<&str> = preview.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Alpha", "Beta"]);
}

#[test]
fn start_new_day_backfills_and_continues_streak() {
    let mut conn = setup();
    let (account, profile) = ids(&conn);
    // 2026-02-19 was the period before the previous one, so backfilling
    // 2026-02-20 continues the streak.
    let daily = insert_daily(&conn, profile, "Streak daily", 3, 3, Some(date(2026, 2, 19)));

    let updated =
        start_new_day(&mut conn, account, profile, &[daily], ts(2026, 2, 21, 8)).unwrap();

    assert_eq!(updated, 1);
    let stored = fetch_task(&conn, daily);
    assert_eq!(
        stored.daily().unwrap().last_completion_period,
        Some(date(2026, 2, 20))
    );
    assert_eq!(stored.daily().unwrap().current_streak, 4);
    assert_eq!(stored.daily().unwrap().best_streak, 4);
}

#[test]
fn start_new_day_restarts_streak_without_continuity() {
    let mut conn = setup();
    let (account, profile) = ids(&conn);
    let daily = insert_daily(&conn, profile, "Gappy daily", 2, 6, Some(date(2026, 2, 15)));

    let updated =
        start_new_day(&mut conn, account, profile, &[daily], ts(2026, 2, 21, 8)).unwrap();

    assert_eq!(updated, 1);
    let stored = fetch_task(&conn, daily);
    assert_eq!(
        stored.daily().unwrap().last_completion_period,
        Some(date(2026, 2, 20))
    );
    assert_eq!(stored.daily().unwrap().current_streak, 1);
    assert_eq!(stored.daily().unwrap().best_streak, 6);
}

#[test]
fn start_new_day_skips_already_satisfied_tasks() {
    let mut conn = setup();
    let (account, profile) = ids(&conn);
    let daily = insert_daily(&conn, profile, "Done today", 2, 2, Some(date(2026, 2, 21)));

    let updated =
        start_new_day(&mut conn, account, profile, &[daily], ts(2026, 2, 21, 12)).unwrap();

    assert_eq!(updated, 0);
    let stored = fetch_task(&conn, daily);
    assert_eq!(
        stored.daily().unwrap().last_completion_period,
        Some(date(2026, 2, 21))
    );
    assert_eq!(stored.daily().unwrap().current_streak, 2);
}

#[test]
fn start_new_day_moves_no_gold_and_writes_no_log() {
    let mut conn = setup();
    let (account, profile) = ids(&conn);
    let daily = insert_daily(&conn, profile, "Streak daily", 3, 3, Some(date(2026, 2, 19)));

    start_new_day(&mut conn, account, profile, &[daily], ts(2026, 2, 21, 8)).unwrap();

    let balance: String = conn
        .query_row(
            "SELECT gold_balance FROM profiles WHERE id=?1",
            params![profile],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(dec(&balance), dec("10.00"));
    let logs: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM log_entries WHERE profile_id=?1",
            params![profile],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(logs, 0);
}

#[test]
fn start_new_day_settles_remaining_rollovers() {
    let mut conn = setup();
    let (account, profile) = ids(&conn);
    let daily = insert_daily(&conn, profile, "Backfilled", 3, 3, Some(date(2026, 2, 19)));
    // Not checked, and two periods behind: the trailing refresh zeroes it.
    let stale = insert_daily(&conn, profile, "Stale", 4, 4, Some(date(2026, 2, 10)));
    let habit = insert_habit(
        &conn,
        profile,
        "Habit",
        "4.00",
        Some(Cadence::Day),
        Some(ts(2026, 2, 20, 12)),
    );

    start_new_day(&mut conn, account, profile, &[daily], ts(2026, 2, 21, 8)).unwrap();

    assert_eq!(fetch_task(&conn, stale).daily().unwrap().current_streak, 0);
    assert_eq!(
        fetch_task(&conn, habit).habit().unwrap().current_count,
        dec("0.00")
    );
}

#[test]
fn start_new_day_rejects_non_daily_tasks() {
    let mut conn = setup();
    let (account, profile) = ids(&conn);
    let created = ts(2026, 2, 1, 8);
    let todo = models::insert_task(
        &conn,
        &Task {
            id: 0,
            profile_id: profile,
            title: "Todo".into(),
            notes: String::new(),
            is_hidden: false,
            gold_delta: dec("1.00"),
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

    let err = start_new_day(&mut conn, account, profile, &[todo], ts(2026, 2, 21, 8))
        .unwrap_err();
    assert!(matches!(err, ActionError::TypeMismatch { .. }));
}
