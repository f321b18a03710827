// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::actions::todo_complete;
use crate::newday::refresh_profile_period_state;
use crate::utils::{action_timestamp, fmt_gold, resolve_scope};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("done", sub)) => done(conn, sub),
        _ => Ok(()),
    }
}

fn done(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (account_id, profile_id) = resolve_scope(conn, sub)?;
    let task_id = *sub.get_one::<i64>("task").unwrap();
    let at = action_timestamp(sub)?;

    refresh_profile_period_state(conn, account_id, profile_id, at)?;
    let task = todo_complete(conn, account_id, profile_id, task_id, at)?;

    println!(
        "Done: '{}' (earned {})",
        task.title,
        fmt_gold(&task.gold_delta)
    );
    Ok(())
}
