// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::{Connection, Row, params};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub account_id: i64,
    pub name: String,
    pub gold_balance: Decimal,
    pub created_at: NaiveDateTime,
}

/// Scheduling cadence for dailies and habit-counter resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    Day,
    Week,
    Month,
    Year,
}

impl Cadence {
    pub fn as_str(self) -> &'static str {
        match self {
            Cadence::Day => "day",
            Cadence::Week => "week",
            Cadence::Month => "month",
            Cadence::Year => "year",
        }
    }

    pub fn parse(s: &str) -> Option<Cadence> {
        match s {
            "day" => Some(Cadence::Day),
            "week" => Some(Cadence::Week),
            "month" => Some(Cadence::Month),
            "year" => Some(Cadence::Year),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogType {
    HabitIncremented,
    DailyCompleted,
    TodoCompleted,
    RewardClaimed,
    ActivityDuration,
}

impl LogType {
    pub fn as_str(self) -> &'static str {
        match self {
            LogType::HabitIncremented => "habit_incremented",
            LogType::DailyCompleted => "daily_completed",
            LogType::TodoCompleted => "todo_completed",
            LogType::RewardClaimed => "reward_claimed",
            LogType::ActivityDuration => "activity_duration",
        }
    }

    pub fn parse(s: &str) -> Option<LogType> {
        match s {
            "habit_incremented" => Some(LogType::HabitIncremented),
            "daily_completed" => Some(LogType::DailyCompleted),
            "todo_completed" => Some(LogType::TodoCompleted),
            "reward_claimed" => Some(LogType::RewardClaimed),
            "activity_duration" => Some(LogType::ActivityDuration),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitState {
    pub current_count: Decimal,
    pub count_increment: Decimal,
    /// `None` means the counter never resets.
    pub reset_cadence: Option<Cadence>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyState {
    pub cadence: Cadence,
    pub repeat_every: u32,
    pub current_streak: u32,
    pub best_streak: u32,
    pub streak_goal: u32,
    /// Period-start date of the last completion; the idempotency key for
    /// `daily_complete` and the basis for streak continuity.
    pub last_completion_period: Option<NaiveDate>,
    pub autocomplete_threshold_secs: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoState {
    pub due_at: Option<NaiveDateTime>,
    pub is_done: bool,
    pub completed_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardState {
    pub is_repeatable: bool,
    pub is_claimed: bool,
    pub claimed_at: Option<NaiveDateTime>,
    pub claim_count: u32,
}

/// Variant payload. Fields that the old single-record shape kept "at defaults
/// unless the type matches" simply do not exist on the other variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "task_type", rename_all = "lowercase")]
pub enum TaskKind {
    Habit(HabitState),
    Daily(DailyState),
    Todo(TodoState),
    Reward(RewardState),
}

impl TaskKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            TaskKind::Habit(_) => "habit",
            TaskKind::Daily(_) => "daily",
            TaskKind::Todo(_) => "todo",
            TaskKind::Reward(_) => "reward",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub profile_id: i64,
    pub title: String,
    pub notes: String,
    pub is_hidden: bool,
    /// Positive = earn on action, negative = cost (rewards).
    pub gold_delta: Decimal,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub last_action_at: Option<NaiveDateTime>,
    pub total_actions_count: i64,
    #[serde(flatten)]
    pub kind: TaskKind,
}

impl Task {
    pub fn habit(&self) -> Option<&HabitState> {
        match &self.kind {
            TaskKind::Habit(h) => Some(h),
            _ => None,
        }
    }

    pub fn daily(&self) -> Option<&DailyState> {
        match &self.kind {
            TaskKind::Daily(d) => Some(d),
            _ => None,
        }
    }

    pub fn daily_mut(&mut self) -> Option<&mut DailyState> {
        match &mut self.kind {
            TaskKind::Daily(d) => Some(d),
            _ => None,
        }
    }

    /// Model-level integrity checks shared by every write path.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Task title must not be blank.".into());
        }
        match &self.kind {
            TaskKind::Daily(d) => {
                if d.repeat_every < 1 {
                    return Err("Daily repeat_every must be at least 1.".into());
                }
            }
            TaskKind::Todo(t) => {
                if t.is_done != t.completed_at.is_some() {
                    return Err("Todo completed_at must be set exactly when done.".into());
                }
            }
            TaskKind::Reward(_) => {
                if self.gold_delta >= Decimal::ZERO {
                    return Err("Reward cost must be negative.".into());
                }
            }
            TaskKind::Habit(_) => {}
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakBonusRule {
    pub id: i64,
    pub task_id: i64,
    pub streak_goal: u32,
    pub bonus_percent: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: i64,
    pub task_id: i64,
    pub text: String,
    pub is_completed: bool,
    pub sort_order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub profile_id: i64,
    /// When the event occurred; caller-supplied and backdatable.
    pub timestamp: NaiveDateTime,
    pub log_type: LogType,
    pub task_id: Option<i64>,
    pub reward_id: Option<i64>,
    pub gold_delta: Decimal,
    /// Balance AFTER this delta, as committed in the same transaction.
    pub user_gold: Decimal,
    pub count_delta: Option<Decimal>,
    pub duration_secs: Option<i64>,
    pub title_snapshot: String,
}

// ---------------------------------------------------------------------------
// Row mapping. Amounts live in TEXT columns; parse to Decimal on the way out.
// ---------------------------------------------------------------------------

pub const TASK_COLUMNS: &str = "id, profile_id, task_type, title, notes, is_hidden, gold_delta, \
     created_at, updated_at, last_action_at, total_actions_count, \
     current_count, count_increment, count_reset_cadence, \
     repeat_cadence, repeat_every, current_streak, best_streak, streak_goal, \
     last_completion_period, autocomplete_threshold_secs, \
     due_at, is_done, completed_at, \
     is_repeatable, is_claimed, claimed_at, claim_count";

pub const LOG_COLUMNS: &str =
    "id, profile_id, timestamp, type, task_id, reward_id, gold_delta, user_gold, \
     count_delta, duration_secs, title_snapshot";

fn bad_column(idx: usize, msg: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, msg.into())
}

fn decimal_col(row: &Row, idx: usize) -> rusqlite::Result<Decimal> {
    let s: String = row.get(idx)?;
    s.parse::<Decimal>()
        .map_err(|e| bad_column(idx, format!("invalid decimal '{s}': {e}")))
}

fn opt_decimal_col(row: &Row, idx: usize) -> rusqlite::Result<Option<Decimal>> {
    let s: Option<String> = row.get(idx)?;
    match s {
        Some(s) => s
            .parse::<Decimal>()
            .map(Some)
            .map_err(|e| bad_column(idx, format!("invalid decimal '{s}': {e}"))),
        None => Ok(None),
    }
}

fn cadence_col(row: &Row, idx: usize) -> rusqlite::Result<Option<Cadence>> {
    let s: Option<String> = row.get(idx)?;
    match s.as_deref() {
        None | Some("never") => Ok(None),
        Some(v) => Cadence::parse(v)
            .map(Some)
            .ok_or_else(|| bad_column(idx, format!("unknown cadence '{v}'"))),
    }
}

impl Profile {
    pub const COLUMNS: &'static str = "id, account_id, name, gold_balance, created_at";

    pub fn from_row(row: &Row) -> rusqlite::Result<Profile> {
        Ok(Profile {
            id: row.get(0)?,
            account_id: row.get(1)?,
            name: row.get(2)?,
            gold_balance: decimal_col(row, 3)?,
            created_at: row.get(4)?,
        })
    }
}

impl Task {
    /// Decode one row selected with [`TASK_COLUMNS`].
    pub fn from_row(row: &Row) -> rusqlite::Result<Task> {
        let task_type: String = row.get(2)?;
        let kind = match task_type.as_str() {
            "habit" => TaskKind::Habit(HabitState {
                current_count: opt_decimal_col(row, 11)?.unwrap_or(Decimal::ZERO),
                count_increment: opt_decimal_col(row, 12)?.unwrap_or(Decimal::ONE),
                reset_cadence: cadence_col(row, 13)?,
            }),
            "daily" => {
                let cadence: Option<String> = row.get(14)?;
                let cadence = cadence
                    .as_deref()
                    .and_then(Cadence::parse)
                    .ok_or_else(|| bad_column(14, "daily task without a repeat cadence".into()))?;
                TaskKind::Daily(DailyState {
                    cadence,
                    repeat_every: row.get::<_, Option<u32>>(15)?.unwrap_or(1),
                    current_streak: row.get::<_, Option<u32>>(16)?.unwrap_or(0),
                    best_streak: row.get::<_, Option<u32>>(17)?.unwrap_or(0),
                    streak_goal: row.get::<_, Option<u32>>(18)?.unwrap_or(0),
                    last_completion_period: row.get(19)?,
                    autocomplete_threshold_secs: row.get(20)?,
                })
            }
            "todo" => TaskKind::Todo(TodoState {
                due_at: row.get(21)?,
                is_done: row.get::<_, Option<bool>>(22)?.unwrap_or(false),
                completed_at: row.get(23)?,
            }),
            "reward" => TaskKind::Reward(RewardState {
                is_repeatable: row.get::<_, Option<bool>>(24)?.unwrap_or(false),
                is_claimed: row.get::<_, Option<bool>>(25)?.unwrap_or(false),
                claimed_at: row.get(26)?,
                claim_count: row.get::<_, Option<u32>>(27)?.unwrap_or(0),
            }),
            other => return Err(bad_column(2, format!("unknown task type '{other}'"))),
        };
        Ok(Task {
            id: row.get(0)?,
            profile_id: row.get(1)?,
            title: row.get(3)?,
            notes: row.get(4)?,
            is_hidden: row.get(5)?,
            gold_delta: decimal_col(row, 6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
            last_action_at: row.get(9)?,
            total_actions_count: row.get(10)?,
            kind,
        })
    }
}

struct VariantCols {
    current_count: Option<String>,
    count_increment: Option<String>,
    count_reset_cadence: Option<&'static str>,
    repeat_cadence: Option<&'static str>,
    repeat_every: Option<u32>,
    current_streak: Option<u32>,
    best_streak: Option<u32>,
    streak_goal: Option<u32>,
    last_completion_period: Option<NaiveDate>,
    autocomplete_threshold_secs: Option<i64>,
    due_at: Option<NaiveDateTime>,
    is_done: Option<bool>,
    completed_at: Option<NaiveDateTime>,
    is_repeatable: Option<bool>,
    is_claimed: Option<bool>,
    claimed_at: Option<NaiveDateTime>,
    claim_count: Option<u32>,
}

impl VariantCols {
    fn of(kind: &TaskKind) -> VariantCols {
        let mut cols = VariantCols {
            current_count: None,
            count_increment: None,
            count_reset_cadence: None,
            repeat_cadence: None,
            repeat_every: None,
            current_streak: None,
            best_streak: None,
            streak_goal: None,
            last_completion_period: None,
            autocomplete_threshold_secs: None,
            due_at: None,
            is_done: None,
            completed_at: None,
            is_repeatable: None,
            is_claimed: None,
            claimed_at: None,
            claim_count: None,
        };
        match kind {
            TaskKind::Habit(h) => {
                cols.current_count = Some(h.current_count.to_string());
                cols.count_increment = Some(h.count_increment.to_string());
                cols.count_reset_cadence = h.reset_cadence.map(Cadence::as_str);
            }
            TaskKind::Daily(d) => {
                cols.repeat_cadence = Some(d.cadence.as_str());
                cols.repeat_every = Some(d.repeat_every);
                cols.current_streak = Some(d.current_streak);
                cols.best_streak = Some(d.best_streak);
                cols.streak_goal = Some(d.streak_goal);
                cols.last_completion_period = d.last_completion_period;
                cols.autocomplete_threshold_secs = d.autocomplete_threshold_secs;
            }
            TaskKind::Todo(t) => {
                cols.due_at = t.due_at;
                cols.is_done = Some(t.is_done);
                cols.completed_at = t.completed_at;
            }
            TaskKind::Reward(r) => {
                cols.is_repeatable = Some(r.is_repeatable);
                cols.is_claimed = Some(r.is_claimed);
                cols.claimed_at = r.claimed_at;
                cols.claim_count = Some(r.claim_count);
            }
        }
        cols
    }
}

/// Insert a task (its `id` field is ignored) and return the new row id.
pub fn insert_task(conn: &Connection, task: &Task) -> rusqlite::Result<i64> {
    let v = VariantCols::of(&task.kind);
    conn.execute(
        "INSERT INTO tasks(profile_id, task_type, title, notes, is_hidden, gold_delta,
             created_at, updated_at, last_action_at, total_actions_count,
             current_count, count_increment, count_reset_cadence,
             repeat_cadence, repeat_every, current_streak, best_streak, streak_goal,
             last_completion_period, autocomplete_threshold_secs,
             due_at, is_done, completed_at,
             is_repeatable, is_claimed, claimed_at, claim_count)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16,?17,?18,?19,?20,
                 ?21,?22,?23,?24,?25,?26,?27)",
        params![
            task.profile_id,
            task.kind.type_name(),
            task.title,
            task.notes,
            task.is_hidden,
            task.gold_delta.to_string(),
            task.created_at,
            task.updated_at,
            task.last_action_at,
            task.total_actions_count,
            v.current_count,
            v.count_increment,
            v.count_reset_cadence,
            v.repeat_cadence,
            v.repeat_every,
            v.current_streak,
            v.best_streak,
            v.streak_goal,
            v.last_completion_period,
            v.autocomplete_threshold_secs,
            v.due_at,
            v.is_done,
            v.completed_at,
            v.is_repeatable,
            v.is_claimed,
            v.claimed_at,
            v.claim_count,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Rewrite a task's mutable columns; the variant may not change.
pub fn update_task(conn: &Connection, task: &Task) -> rusqlite::Result<()> {
    let v = VariantCols::of(&task.kind);
    conn.execute(
        "UPDATE tasks SET title=?2, notes=?3, is_hidden=?4, gold_delta=?5, updated_at=?6,
             last_action_at=?7, total_actions_count=?8,
             current_count=?9, count_increment=?10, count_reset_cadence=?11,
             repeat_cadence=?12, repeat_every=?13, current_streak=?14, best_streak=?15,
             streak_goal=?16, last_completion_period=?17, autocomplete_threshold_secs=?18,
             due_at=?19, is_done=?20, completed_at=?21,
             is_repeatable=?22, is_claimed=?23, claimed_at=?24, claim_count=?25
         WHERE id=?1 AND task_type=?26",
        params![
            task.id,
            task.title,
            task.notes,
            task.is_hidden,
            task.gold_delta.to_string(),
            task.updated_at,
            task.last_action_at,
            task.total_actions_count,
            v.current_count,
            v.count_increment,
            v.count_reset_cadence,
            v.repeat_cadence,
            v.repeat_every,
            v.current_streak,
            v.best_streak,
            v.streak_goal,
            v.last_completion_period,
            v.autocomplete_threshold_secs,
            v.due_at,
            v.is_done,
            v.completed_at,
            v.is_repeatable,
            v.is_claimed,
            v.claimed_at,
            v.claim_count,
            task.kind.type_name(),
        ],
    )?;
    Ok(())
}

impl LogEntry {
    /// Decode one row selected with [`LOG_COLUMNS`].
    pub fn from_row(row: &Row) -> rusqlite::Result<LogEntry> {
        let type_s: String = row.get(3)?;
        let log_type = LogType::parse(&type_s)
            .ok_or_else(|| bad_column(3, format!("unknown log type '{type_s}'")))?;
        Ok(LogEntry {
            id: row.get(0)?,
            profile_id: row.get(1)?,
            timestamp: row.get(2)?,
            log_type,
            task_id: row.get(4)?,
            reward_id: row.get(5)?,
            gold_delta: decimal_col(row, 6)?,
            user_gold: decimal_col(row, 7)?,
            count_delta: opt_decimal_col(row, 8)?,
            duration_secs: row.get(9)?,
            title_snapshot: row.get(10)?,
        })
    }
}

/// Append a log entry (its `id` field is ignored) and return the new row id.
pub fn insert_log(conn: &Connection, log: &LogEntry) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO log_entries(profile_id, timestamp, type, task_id, reward_id,
             gold_delta, user_gold, count_delta, duration_secs, title_snapshot)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10)",
        params![
            log.profile_id,
            log.timestamp,
            log.log_type.as_str(),
            log.task_id,
            log.reward_id,
            log.gold_delta.to_string(),
            log.user_gold.to_string(),
            log.count_delta.map(|d| d.to_string()),
            log.duration_secs,
            log.title_snapshot,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}
