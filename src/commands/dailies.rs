// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::actions::daily_complete;
use crate::models::TaskKind;
use crate::newday::refresh_profile_period_state;
use crate::utils::{action_timestamp, parse_date, resolve_scope};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("complete", sub)) => complete(conn, sub),
        _ => Ok(()),
    }
}

fn complete(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (account_id, profile_id) = resolve_scope(conn, sub)?;
    let task_id = *sub.get_one::<i64>("task").unwrap();
    let period = sub
        .get_one::<String>("period")
        .map(|s| parse_date(s.trim()))
        .transpose()?;
    let at = action_timestamp(sub)?;

    refresh_profile_period_state(conn, account_id, profile_id, at)?;
    let task = daily_complete(conn, account_id, profile_id, task_id, at, period)?;

    if let TaskKind::Daily(d) = &task.kind {
        println!(
            "Completed '{}' — streak {} (best {})",
            task.title, d.current_streak, d.best_streak
        );
    }
    Ok(())
}
