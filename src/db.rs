// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Questclip", "questclip"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("questclip.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    // Concurrent invocations wait for the writer instead of failing outright;
    // a lock still held after the timeout surfaces as a retryable busy error.
    conn.busy_timeout(Duration::from_secs(5))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

/// Create all tables. Public so tests can run against `Connection::open_in_memory()`.
pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS accounts(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS profiles(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        account_id INTEGER NOT NULL,
        name TEXT NOT NULL,
        gold_balance TEXT NOT NULL DEFAULT '0.00',
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE(account_id, name),
        FOREIGN KEY(account_id) REFERENCES accounts(id) ON DELETE CASCADE
    );

    -- Single polymorphic table for all four task variants; variant-specific
    -- columns stay NULL for non-matching task types.
    CREATE TABLE IF NOT EXISTS tasks(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        profile_id INTEGER NOT NULL,
        task_type TEXT NOT NULL CHECK(task_type IN ('habit','daily','todo','reward')),
        title TEXT NOT NULL,
        notes TEXT NOT NULL DEFAULT '',
        is_hidden INTEGER NOT NULL DEFAULT 0,
        gold_delta TEXT NOT NULL DEFAULT '0.00',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        last_action_at TEXT,
        total_actions_count INTEGER NOT NULL DEFAULT 0,
        -- habit
        current_count TEXT,
        count_increment TEXT,
        count_reset_cadence TEXT,
        -- daily
        repeat_cadence TEXT,
        repeat_every INTEGER,
        current_streak INTEGER,
        best_streak INTEGER,
        streak_goal INTEGER,
        last_completion_period TEXT,
        autocomplete_threshold_secs INTEGER,
        -- todo
        due_at TEXT,
        is_done INTEGER,
        completed_at TEXT,
        -- reward
        is_repeatable INTEGER,
        is_claimed INTEGER,
        claimed_at TEXT,
        claim_count INTEGER,
        FOREIGN KEY(profile_id) REFERENCES profiles(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_tasks_profile_type ON tasks(profile_id, task_type, is_hidden);
    CREATE INDEX IF NOT EXISTS idx_tasks_profile_created ON tasks(profile_id, created_at);

    CREATE TABLE IF NOT EXISTS streak_bonus_rules(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        task_id INTEGER NOT NULL,
        streak_goal INTEGER NOT NULL CHECK(streak_goal >= 1),
        bonus_percent TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE(task_id, streak_goal),
        FOREIGN KEY(task_id) REFERENCES tasks(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS checklist_items(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        task_id INTEGER NOT NULL,
        text TEXT NOT NULL,
        is_completed INTEGER NOT NULL DEFAULT 0,
        sort_order INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(task_id) REFERENCES tasks(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_checklist_task_order ON checklist_items(task_id, sort_order);

    -- Append-only audit trail; user_gold is the balance AFTER this delta.
    CREATE TABLE IF NOT EXISTS log_entries(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        profile_id INTEGER NOT NULL,
        timestamp TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        type TEXT NOT NULL CHECK(type IN (
            'habit_incremented','daily_completed','todo_completed',
            'reward_claimed','activity_duration')),
        task_id INTEGER,
        reward_id INTEGER,
        gold_delta TEXT NOT NULL DEFAULT '0.00',
        user_gold TEXT NOT NULL DEFAULT '0.00',
        count_delta TEXT,
        duration_secs INTEGER,
        title_snapshot TEXT NOT NULL DEFAULT '',
        FOREIGN KEY(profile_id) REFERENCES profiles(id) ON DELETE CASCADE,
        FOREIGN KEY(task_id) REFERENCES tasks(id) ON DELETE SET NULL,
        FOREIGN KEY(reward_id) REFERENCES tasks(id) ON DELETE SET NULL
    );
    CREATE INDEX IF NOT EXISTS idx_logs_profile_ts ON log_entries(profile_id, timestamp);
    CREATE INDEX IF NOT EXISTS idx_logs_profile_type_ts ON log_entries(profile_id, type, timestamp);
    "#,
    )?;
    Ok(())
}
