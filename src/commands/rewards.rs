// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::actions::reward_claim;
use crate::newday::refresh_profile_period_state;
use crate::utils::{action_timestamp, fmt_gold, parse_decimal, resolve_scope};
use anyhow::Result;
use rusqlite::{Connection, params};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("claim", sub)) => claim(conn, sub),
        _ => Ok(()),
    }
}

fn claim(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (account_id, profile_id) = resolve_scope(conn, sub)?;
    let task_id = *sub.get_one::<i64>("task").unwrap();
    let at = action_timestamp(sub)?;

    refresh_profile_period_state(conn, account_id, profile_id, at)?;
    let task = reward_claim(conn, account_id, profile_id, task_id, at)?;

    let balance: String = conn.query_row(
        "SELECT gold_balance FROM profiles WHERE id=?1",
        params![profile_id],
        |r| r.get(0),
    )?;
    println!(
        "Claimed '{}' for {} — balance {}",
        task.title,
        fmt_gold(&task.gold_delta.abs()),
        fmt_gold(&parse_decimal(&balance)?)
    );
    Ok(())
}
