// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::newday::{
    refresh_profile_period_state, start_new_day, uncompleted_dailies_from_previous_period,
};
use crate::utils::{action_timestamp, maybe_print_json, pretty_table, resolve_scope};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("preview", sub)) => preview(conn, sub),
        Some(("start", sub)) => start(conn, sub),
        _ => Ok(()),
    }
}

fn preview(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let (account_id, profile_id) = resolve_scope(conn, sub)?;
    let at = action_timestamp(sub)?;

    refresh_profile_period_state(conn, account_id, profile_id, at)?;
    let dailies = uncompleted_dailies_from_previous_period(conn, account_id, profile_id, at)?;

    if !maybe_print_json(json_flag, jsonl_flag, &dailies)? {
        if dailies.is_empty() {
            println!("Nothing to backfill — all dailies are settled.");
            return Ok(());
        }
        let rows = dailies
            .iter()
            .map(|d| {
                vec![
                    d.task_id.to_string(),
                    d.title.clone(),
                    d.previous_period_start.to_string(),
                    d.last_completion_period
                        .map(|p| p.to_string())
                        .unwrap_or_else(|| "never".into()),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "Title", "Previous period", "Last completed"], rows)
        );
    }
    Ok(())
}

fn start(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (account_id, profile_id) = resolve_scope(conn, sub)?;
    let ids: Vec<i64> = sub.get_many::<i64>("task").unwrap().copied().collect();
    let at = action_timestamp(sub)?;

    let updated = start_new_day(conn, account_id, profile_id, &ids, at)?;
    println!("New day started — {} task(s) backfilled", updated);
    Ok(())
}
