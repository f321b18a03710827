// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The task action engine: the four gold-mutating transitions plus activity
//! logging. Each action is one atomic transaction — load and lock, assert
//! ownership, assert the task variant, apply the transition, then persist the
//! task, the profile balance, and an append-only log entry together. Any
//! precondition failure aborts the whole transaction.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rusqlite::{Connection, OptionalExtension, Transaction, TransactionBehavior, params};
use rust_decimal::Decimal;

use crate::errors::{ActionError, ActionResult};
use crate::ledger::{apply_delta, to_cents};
use crate::models::{self, LogEntry, LogType, Profile, TASK_COLUMNS, Task, TaskKind};
use crate::periods::{daily_period_start, previous_daily_period_start};

/// Begin the write transaction that stands in for row-level locks: an
/// immediate transaction takes the writer slot up front, so two actions on
/// the same database serialize instead of interleaving.
pub(crate) fn write_tx(conn: &mut Connection) -> ActionResult<Transaction<'_>> {
    Ok(conn.transaction_with_behavior(TransactionBehavior::Immediate)?)
}

pub(crate) fn load_profile_owned(
    tx: &Transaction,
    profile_id: i64,
    account_id: i64,
) -> ActionResult<Profile> {
    let profile = tx
        .query_row(
            &format!("SELECT {} FROM profiles WHERE id=?1", Profile::COLUMNS),
            params![profile_id],
            Profile::from_row,
        )
        .optional()?
        .ok_or(ActionError::NotFound("profile"))?;
    if profile.account_id != account_id {
        return Err(ActionError::Ownership(
            "profile does not belong to the authenticated account",
        ));
    }
    Ok(profile)
}

pub(crate) fn load_task_in_profile(
    tx: &Transaction,
    task_id: i64,
    profile_id: i64,
) -> ActionResult<Task> {
    let task = tx
        .query_row(
            &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id=?1"),
            params![task_id],
            Task::from_row,
        )
        .optional()?
        .ok_or(ActionError::NotFound("task"))?;
    if task.profile_id != profile_id {
        return Err(ActionError::Ownership(
            "task does not belong to the selected profile",
        ));
    }
    Ok(task)
}

fn lock_task_and_profile(
    tx: &Transaction,
    account_id: i64,
    profile_id: i64,
    task_id: i64,
) -> ActionResult<(Task, Profile)> {
    let profile = load_profile_owned(tx, profile_id, account_id)?;
    let task = load_task_in_profile(tx, task_id, profile_id)?;
    Ok((task, profile))
}

/// Persist task, profile, and log as one unit after model-level validation.
fn save_task_profile_log(
    tx: &Transaction,
    task: &Task,
    profile: &Profile,
    log: &LogEntry,
) -> ActionResult<i64> {
    task.validate().map_err(ActionError::DataIntegrity)?;
    models::update_task(tx, task)?;
    tx.execute(
        "UPDATE profiles SET gold_balance=?2 WHERE id=?1",
        params![profile.id, profile.gold_balance.to_string()],
    )?;
    Ok(models::insert_log(tx, log)?)
}

/// Highest bonus percent among rules whose streak goal the current streak
/// meets; 0 when no rule qualifies. Percent values are TEXT in storage, so
/// the comparison happens here on decoded decimals.
fn max_bonus_percent(tx: &Transaction, task_id: i64, current_streak: u32) -> ActionResult<Decimal> {
    let mut stmt = tx.prepare(
        "SELECT bonus_percent FROM streak_bonus_rules WHERE task_id=?1 AND streak_goal<=?2",
    )?;
    let mut rows = stmt.query(params![task_id, current_streak])?;
    let mut best = Decimal::ZERO;
    while let Some(row) = rows.next()? {
        let raw: String = row.get(0)?;
        let percent = raw.parse::<Decimal>().map_err(|e| {
            ActionError::DataIntegrity(format!("invalid bonus percent '{raw}': {e}"))
        })?;
        if percent > best {
            best = percent;
        }
    }
    Ok(best)
}

/// Increment a habit's counter and earn its flat gold delta.
pub fn habit_increment(
    conn: &mut Connection,
    account_id: i64,
    profile_id: i64,
    task_id: i64,
    by: Option<Decimal>,
    timestamp: NaiveDateTime,
) -> ActionResult<Task> {
    let tx = write_tx(conn)?;
    let (mut task, mut profile) = lock_task_and_profile(&tx, account_id, profile_id, task_id)?;

    let actual = task.kind.type_name();
    let TaskKind::Habit(habit) = &mut task.kind else {
        return Err(ActionError::TypeMismatch {
            expected: "habit",
            actual,
        });
    };
    let delta_count = by.unwrap_or(habit.count_increment);
    habit.current_count = to_cents(habit.current_count + delta_count);

    task.total_actions_count += 1;
    task.last_action_at = Some(timestamp);
    task.updated_at = timestamp;

    let gold_delta = to_cents(task.gold_delta);
    profile.gold_balance = apply_delta(profile.gold_balance, gold_delta);

    let log = LogEntry {
        id: 0,
        profile_id: profile.id,
        timestamp,
        log_type: LogType::HabitIncremented,
        task_id: Some(task.id),
        reward_id: None,
        gold_delta,
        user_gold: profile.gold_balance,
        count_delta: Some(to_cents(delta_count)),
        duration_secs: None,
        title_snapshot: task.title.clone(),
    };
    save_task_profile_log(&tx, &task, &profile, &log)?;
    tx.commit()?;
    Ok(task)
}

/// Complete a daily once per period and apply the highest eligible streak
/// bonus.
///
/// The period is the caller-supplied `completion_period` when given (trusted
/// verbatim), otherwise the timestamp's date bucketed by the task's cadence
/// and repeat interval with the task's creation date as anchor. The streak
/// continues only when the last completion sits in exactly the previous
/// period; any gap resets it to 1.
pub fn daily_complete(
    conn: &mut Connection,
    account_id: i64,
    profile_id: i64,
    task_id: i64,
    timestamp: NaiveDateTime,
    completion_period: Option<NaiveDate>,
) -> ActionResult<Task> {
    let tx = write_tx(conn)?;
    let (mut task, mut profile) = lock_task_and_profile(&tx, account_id, profile_id, task_id)?;

    let actual = task.kind.type_name();
    let anchor = task.created_at.date();
    let TaskKind::Daily(daily) = &mut task.kind else {
        return Err(ActionError::TypeMismatch {
            expected: "daily",
            actual,
        });
    };

    let period = completion_period.unwrap_or_else(|| {
        daily_period_start(timestamp.date(), daily.cadence, daily.repeat_every, anchor)
    });
    if daily.last_completion_period == Some(period) {
        return Err(ActionError::AlreadyCompleted);
    }

    let previous = previous_daily_period_start(period, daily.cadence, daily.repeat_every);
    daily.current_streak = if daily.last_completion_period == Some(previous) {
        daily.current_streak + 1
    } else {
        1
    };
    daily.best_streak = daily.best_streak.max(daily.current_streak);
    daily.last_completion_period = Some(period);
    let current_streak = daily.current_streak;

    task.total_actions_count += 1;
    task.last_action_at = Some(timestamp);
    task.updated_at = timestamp;

    let base_gold = to_cents(task.gold_delta);
    let bonus_percent = max_bonus_percent(&tx, task.id, current_streak)?;
    let final_gold = to_cents(base_gold * (Decimal::ONE + bonus_percent / Decimal::ONE_HUNDRED));
    profile.gold_balance = apply_delta(profile.gold_balance, final_gold);

    let log = LogEntry {
        id: 0,
        profile_id: profile.id,
        timestamp,
        log_type: LogType::DailyCompleted,
        task_id: Some(task.id),
        reward_id: None,
        gold_delta: final_gold,
        user_gold: profile.gold_balance,
        count_delta: None,
        duration_secs: None,
        title_snapshot: task.title.clone(),
    };
    save_task_profile_log(&tx, &task, &profile, &log)?;
    tx.commit()?;
    Ok(task)
}

/// Mark a todo done exactly once and earn its flat gold delta.
pub fn todo_complete(
    conn: &mut Connection,
    account_id: i64,
    profile_id: i64,
    task_id: i64,
    timestamp: NaiveDateTime,
) -> ActionResult<Task> {
    let tx = write_tx(conn)?;
    let (mut task, mut profile) = lock_task_and_profile(&tx, account_id, profile_id, task_id)?;

    let actual = task.kind.type_name();
    let TaskKind::Todo(todo) = &mut task.kind else {
        return Err(ActionError::TypeMismatch {
            expected: "todo",
            actual,
        });
    };
    if todo.is_done {
        return Err(ActionError::AlreadyCompleted);
    }
    todo.is_done = true;
    todo.completed_at = Some(timestamp);

    task.total_actions_count += 1;
    task.last_action_at = Some(timestamp);
    task.updated_at = timestamp;

    let gold_delta = to_cents(task.gold_delta);
    profile.gold_balance = apply_delta(profile.gold_balance, gold_delta);

    let log = LogEntry {
        id: 0,
        profile_id: profile.id,
        timestamp,
        log_type: LogType::TodoCompleted,
        task_id: Some(task.id),
        reward_id: None,
        gold_delta,
        user_gold: profile.gold_balance,
        count_delta: None,
        duration_secs: None,
        title_snapshot: task.title.clone(),
    };
    save_task_profile_log(&tx, &task, &profile, &log)?;
    tx.commit()?;
    Ok(task)
}

/// Claim a reward by spending gold.
///
/// Rejects non-repeatable rewards that were already claimed and any claim the
/// balance cannot cover; a rejected claim mutates nothing. The log entry
/// references the task both as `task` and as `reward`, since rewards are a
/// task variant.
pub fn reward_claim(
    conn: &mut Connection,
    account_id: i64,
    profile_id: i64,
    task_id: i64,
    timestamp: NaiveDateTime,
) -> ActionResult<Task> {
    let tx = write_tx(conn)?;
    let (mut task, mut profile) = lock_task_and_profile(&tx, account_id, profile_id, task_id)?;

    let actual = task.kind.type_name();
    let cost = task.gold_delta;
    let TaskKind::Reward(reward) = &mut task.kind else {
        return Err(ActionError::TypeMismatch {
            expected: "reward",
            actual,
        });
    };
    if cost >= Decimal::ZERO {
        return Err(ActionError::DataIntegrity(
            "reward cost must be negative".into(),
        ));
    }
    if !reward.is_repeatable && reward.is_claimed {
        return Err(ActionError::AlreadyClaimed);
    }
    if apply_delta(profile.gold_balance, cost) < Decimal::ZERO {
        return Err(ActionError::InsufficientFunds {
            balance: profile.gold_balance,
            cost: cost.abs(),
        });
    }

    reward.claim_count += 1;
    reward.is_claimed = true;
    reward.claimed_at = Some(timestamp);

    task.total_actions_count += 1;
    task.last_action_at = Some(timestamp);
    task.updated_at = timestamp;

    let gold_delta = to_cents(cost);
    profile.gold_balance = apply_delta(profile.gold_balance, gold_delta);

    let log = LogEntry {
        id: 0,
        profile_id: profile.id,
        timestamp,
        log_type: LogType::RewardClaimed,
        task_id: Some(task.id),
        reward_id: Some(task.id),
        gold_delta,
        user_gold: profile.gold_balance,
        count_delta: None,
        duration_secs: None,
        title_snapshot: task.title.clone(),
    };
    save_task_profile_log(&tx, &task, &profile, &log)?;
    tx.commit()?;
    Ok(task)
}

/// Append an activity-duration entry to the audit log.
///
/// This is not a task transition: no gold moves and no task state changes.
/// Optional task/reward references are validated to belong to the same
/// profile, and the reward reference must point at a reward task.
pub fn log_activity_duration(
    conn: &mut Connection,
    account_id: i64,
    profile_id: i64,
    duration: Duration,
    title: &str,
    timestamp: NaiveDateTime,
    task_id: Option<i64>,
    reward_id: Option<i64>,
) -> ActionResult<LogEntry> {
    if duration <= Duration::zero() {
        return Err(ActionError::InvalidInput(
            "duration must be positive".into(),
        ));
    }
    let title = title.trim();
    if title.is_empty() {
        return Err(ActionError::InvalidInput(
            "title must not be blank".into(),
        ));
    }

    let tx = write_tx(conn)?;
    let profile = load_profile_owned(&tx, profile_id, account_id)?;
    if let Some(id) = task_id {
        load_task_in_profile(&tx, id, profile_id)?;
    }
    if let Some(id) = reward_id {
        let reward = load_task_in_profile(&tx, id, profile_id)?;
        if !matches!(reward.kind, TaskKind::Reward(_)) {
            return Err(ActionError::InvalidInput(
                "reward reference must point to a reward task".into(),
            ));
        }
    }

    let mut log = LogEntry {
        id: 0,
        profile_id: profile.id,
        timestamp,
        log_type: LogType::ActivityDuration,
        task_id,
        reward_id,
        gold_delta: Decimal::ZERO,
        user_gold: profile.gold_balance,
        count_delta: None,
        duration_secs: Some(duration.num_seconds()),
        title_snapshot: title.to_string(),
    };
    log.id = models::insert_log(&tx, &log)?;
    tx.commit()?;
    Ok(log)
}
