// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::actions::log_activity_duration;
use crate::utils::{action_timestamp, resolve_scope};
use anyhow::Result;
use chrono::Duration;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("log", sub)) => log(conn, sub),
        _ => Ok(()),
    }
}

fn log(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (account_id, profile_id) = resolve_scope(conn, sub)?;
    let title = sub.get_one::<String>("title").unwrap();
    let minutes = *sub.get_one::<i64>("minutes").unwrap();
    let task_id = sub.get_one::<i64>("task").copied();
    let reward_id = sub.get_one::<i64>("reward").copied();
    let at = action_timestamp(sub)?;

    let entry = log_activity_duration(
        conn,
        account_id,
        profile_id,
        Duration::minutes(minutes),
        title,
        at,
        task_id,
        reward_id,
    )?;
    println!(
        "Logged {} min of '{}' (entry #{})",
        minutes, entry.title_snapshot, entry.id
    );
    Ok(())
}
