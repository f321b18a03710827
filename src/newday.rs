// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read-time period rollover and the explicit "new day" backfill flow.
//!
//! `refresh_profile_period_state` settles what time alone changes: a daily
//! whose last completion is more than one period old loses its streak, a
//! habit with a reset cadence drops its counter on the next bucket boundary.
//! The new-day flow additionally lets the user retroactively credit the
//! previous, unfinished period — a streak correction that moves no gold and
//! writes no log entry.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Connection, Transaction, params};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::actions::{load_profile_owned, load_task_in_profile, write_tx};
use crate::errors::{ActionError, ActionResult};
use crate::models::{self, Profile, TASK_COLUMNS, Task, TaskKind};
use crate::periods::{daily_period_start, habit_reset_period_start, previous_daily_period_start};

/// A daily that was not completed for the period before the current one,
/// offered to the user for backfill.
#[derive(Debug, Clone, Serialize)]
pub struct UncompletedDaily {
    pub task_id: i64,
    pub title: String,
    pub previous_period_start: NaiveDate,
    pub last_completion_period: Option<NaiveDate>,
}

fn profile_dailies_and_habits(tx: &Transaction, profile_id: i64) -> ActionResult<Vec<Task>> {
    let mut stmt = tx.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks
         WHERE profile_id=?1 AND task_type IN ('daily','habit') ORDER BY id"
    ))?;
    let tasks = stmt
        .query_map(params![profile_id], Task::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(tasks)
}

fn refresh_in_tx(tx: &Transaction, profile: &Profile, timestamp: NaiveDateTime) -> ActionResult<()> {
    let today = timestamp.date();
    for mut task in profile_dailies_and_habits(tx, profile.id)? {
        let anchor = task.created_at.date();
        let fallback_action_at = task.last_action_at.unwrap_or(task.created_at);
        match &mut task.kind {
            TaskKind::Daily(daily) => {
                let Some(last) = daily.last_completion_period else {
                    continue;
                };
                let current_period =
                    daily_period_start(today, daily.cadence, daily.repeat_every, anchor);
                let expected_previous =
                    previous_daily_period_start(current_period, daily.cadence, daily.repeat_every);
                if last < expected_previous && daily.current_streak != 0 {
                    daily.current_streak = 0;
                    task.updated_at = timestamp;
                    models::update_task(tx, &task)?;
                }
            }
            TaskKind::Habit(habit) => {
                let Some(cadence) = habit.reset_cadence else {
                    continue;
                };
                if habit.current_count == Decimal::ZERO {
                    continue;
                }
                let last_bucket = habit_reset_period_start(fallback_action_at.date(), cadence);
                if last_bucket < habit_reset_period_start(today, cadence) {
                    habit.current_count = Decimal::ZERO;
                    task.updated_at = timestamp;
                    models::update_task(tx, &task)?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Settle period rollovers for every daily and habit of the profile.
/// Idempotent: a second call with the same timestamp changes nothing.
pub fn refresh_profile_period_state(
    conn: &mut Connection,
    account_id: i64,
    profile_id: i64,
    timestamp: NaiveDateTime,
) -> ActionResult<()> {
    let tx = write_tx(conn)?;
    let profile = load_profile_owned(&tx, profile_id, account_id)?;
    refresh_in_tx(&tx, &profile, timestamp)?;
    tx.commit()?;
    Ok(())
}

/// Report the dailies that were not completed for the previous period, for
/// the new-day prompt. Ordered by title.
pub fn uncompleted_dailies_from_previous_period(
    conn: &mut Connection,
    account_id: i64,
    profile_id: i64,
    timestamp: NaiveDateTime,
) -> ActionResult<Vec<UncompletedDaily>> {
    let tx = write_tx(conn)?;
    let profile = load_profile_owned(&tx, profile_id, account_id)?;
    let today = timestamp.date();

    let mut out = Vec::new();
    for task in profile_dailies_and_habits(&tx, profile.id)? {
        let Some(daily) = task.daily() else { continue };
        let last = daily.last_completion_period;
        let current_period =
            daily_period_start(today, daily.cadence, daily.repeat_every, task.created_at.date());
        let previous_period =
            previous_daily_period_start(current_period, daily.cadence, daily.repeat_every);
        if current_period == previous_period
            || last == Some(current_period)
            || last == Some(previous_period)
        {
            continue;
        }
        out.push(UncompletedDaily {
            task_id: task.id,
            title: task.title.clone(),
            previous_period_start: previous_period,
            last_completion_period: last,
        });
    }
    tx.commit()?;
    out.sort_by(|a, b| a.title.cmp(&b.title));
    Ok(out)
}

/// Backfill the checked dailies for the previous period, then settle any
/// remaining rollovers. Returns how many tasks were actually updated.
///
/// The checked list is a client hint: every guard is re-validated here, and a
/// task already satisfied for the current or previous period is skipped
/// silently. Backfill continues the streak only when the period before the
/// previous one was the last completion; otherwise the streak restarts at 1.
/// No gold moves and no log entry is written.
pub fn start_new_day(
    conn: &mut Connection,
    account_id: i64,
    profile_id: i64,
    checked_daily_ids: &[i64],
    timestamp: NaiveDateTime,
) -> ActionResult<usize> {
    let tx = write_tx(conn)?;
    let profile = load_profile_owned(&tx, profile_id, account_id)?;
    let today = timestamp.date();

    let mut updated = 0usize;
    for &task_id in checked_daily_ids {
        let mut task = load_task_in_profile(&tx, task_id, profile.id)?;
        let anchor = task.created_at.date();
        let actual = task.kind.type_name();
        let Some(daily) = task.daily_mut() else {
            return Err(ActionError::TypeMismatch {
                expected: "daily",
                actual,
            });
        };

        let current_period = daily_period_start(today, daily.cadence, daily.repeat_every, anchor);
        let previous_period =
            previous_daily_period_start(current_period, daily.cadence, daily.repeat_every);
        if current_period == previous_period
            || daily.last_completion_period == Some(current_period)
            || daily.last_completion_period == Some(previous_period)
        {
            continue;
        }

        let before_previous =
            previous_daily_period_start(previous_period, daily.cadence, daily.repeat_every);
        daily.current_streak = if daily.last_completion_period == Some(before_previous) {
            daily.current_streak + 1
        } else {
            1
        };
        daily.best_streak = daily.best_streak.max(daily.current_streak);
        daily.last_completion_period = Some(previous_period);

        task.updated_at = timestamp;
        task.validate().map_err(ActionError::DataIntegrity)?;
        models::update_task(&tx, &task)?;
        updated += 1;
    }

    refresh_in_tx(&tx, &profile, timestamp)?;
    tx.commit()?;
    Ok(updated)
}
