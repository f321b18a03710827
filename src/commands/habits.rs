// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::actions::habit_increment;
use crate::models::TaskKind;
use crate::newday::refresh_profile_period_state;
use crate::utils::{action_timestamp, fmt_gold, parse_decimal, resolve_scope};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("increment", sub)) => increment(conn, sub),
        _ => Ok(()),
    }
}

fn increment(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (account_id, profile_id) = resolve_scope(conn, sub)?;
    let task_id = *sub.get_one::<i64>("task").unwrap();
    let by = sub
        .get_one::<String>("by")
        .map(|s| parse_decimal(s.trim()))
        .transpose()?;
    let at = action_timestamp(sub)?;

    refresh_profile_period_state(conn, account_id, profile_id, at)?;
    let task = habit_increment(conn, account_id, profile_id, task_id, by, at)?;

    if let TaskKind::Habit(h) = &task.kind {
        println!(
            "Incremented '{}' to {} (earned {})",
            task.title,
            h.current_count,
            fmt_gold(&task.gold_delta)
        );
    }
    Ok(())
}
