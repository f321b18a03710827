// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure calendar-period resolution. A "period" is the date bucket an instant
//! falls into for a given cadence, counted from a per-task anchor date; it is
//! the idempotency key for daily completions and the unit of streak
//! continuity. No I/O here.

use chrono::{Datelike, Days, NaiveDate};

use crate::models::Cadence;

/// Monday on or before `value`.
fn monday_start(value: NaiveDate) -> NaiveDate {
    value - Days::new(value.weekday().num_days_from_monday() as u64)
}

/// Day 1 of the month `month_idx` months after year 0, where
/// `month_idx = year * 12 + (month - 1)`.
fn month_from_index(month_idx: i64) -> NaiveDate {
    let year = month_idx.div_euclid(12);
    let month = month_idx.rem_euclid(12) + 1;
    NaiveDate::from_ymd_opt(year as i32, month as u32, 1)
        .expect("period start within calendar range")
}

fn jan1(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 1, 1).expect("period start within calendar range")
}

/// Start date of the period containing `target_date` for a daily task.
///
/// Buckets are `repeat_every` cadence units wide, measured forward from the
/// anchor (day), the Monday on/before the anchor (week), the anchor's month
/// (month, bucket start = day 1), or the anchor's year (year, bucket start =
/// Jan 1). A target before the anchor clamps to the anchor's own bucket.
pub fn daily_period_start(
    target_date: NaiveDate,
    cadence: Cadence,
    repeat_every: u32,
    anchor_date: NaiveDate,
) -> NaiveDate {
    let interval = repeat_every.max(1) as i64;
    match cadence {
        Cadence::Day => {
            let days_diff = (target_date - anchor_date).num_days().max(0);
            anchor_date + Days::new(((days_diff / interval) * interval) as u64)
        }
        Cadence::Week => {
            let current_start = monday_start(target_date);
            let anchor_start = monday_start(anchor_date);
            let weeks_diff = ((current_start - anchor_start).num_days() / 7).max(0);
            anchor_start + Days::new(((weeks_diff / interval) * interval * 7) as u64)
        }
        Cadence::Month => {
            let anchor_idx = anchor_date.year() as i64 * 12 + anchor_date.month() as i64 - 1;
            let current_idx = target_date.year() as i64 * 12 + target_date.month() as i64 - 1;
            let months_diff = (current_idx - anchor_idx).max(0);
            month_from_index(anchor_idx + (months_diff / interval) * interval)
        }
        Cadence::Year => {
            let years_diff = (target_date.year() as i64 - anchor_date.year() as i64).max(0);
            jan1(anchor_date.year() + ((years_diff / interval) * interval) as i32)
        }
    }
}

/// Exactly one bucket width before `current_period_start`.
///
/// This is arithmetic on the period boundary itself and deliberately ignores
/// the anchor: it answers "which period would an unbroken streak have been
/// completed in", not "which bucket does a raw date fall in".
pub fn previous_daily_period_start(
    current_period_start: NaiveDate,
    cadence: Cadence,
    repeat_every: u32,
) -> NaiveDate {
    let interval = repeat_every.max(1) as i64;
    match cadence {
        Cadence::Day => current_period_start - chrono::Duration::days(interval),
        Cadence::Week => current_period_start - chrono::Duration::days(7 * interval),
        Cadence::Month => {
            let idx = current_period_start.year() as i64 * 12
                + current_period_start.month() as i64
                - 1;
            month_from_index(idx - interval)
        }
        Cadence::Year => jan1(current_period_start.year() - interval as i32),
    }
}

/// Boundary of the single-unit bucket containing `target_date`, used for
/// habit-counter resets. Habits do not support `repeat_every` multipliers.
pub fn habit_reset_period_start(target_date: NaiveDate, cadence: Cadence) -> NaiveDate {
    match cadence {
        Cadence::Day => target_date,
        Cadence::Week => monday_start(target_date),
        Cadence::Month => {
            NaiveDate::from_ymd_opt(target_date.year(), target_date.month(), 1)
                .expect("first of an existing month")
        }
        Cadence::Year => jan1(target_date.year()),
    }
}
