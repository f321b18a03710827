// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{maybe_print_json, parse_decimal, pretty_table, resolve_scope};
use anyhow::{Result, bail};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn daily_task_in_profile(conn: &Connection, task_id: i64, profile_id: i64) -> Result<String> {
    let (task_type, title): (String, String) = conn.query_row(
        "SELECT task_type, title FROM tasks WHERE id=?1 AND profile_id=?2",
        params![task_id, profile_id],
        |r| Ok((r.get(0)?, r.get(1)?)),
    )?;
    if task_type != "daily" {
        bail!("Streak bonus rules can only be attached to daily tasks");
    }
    Ok(title)
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (_account_id, profile_id) = resolve_scope(conn, sub)?;
    let task_id = *sub.get_one::<i64>("task").unwrap();
    let goal = *sub.get_one::<u32>("goal").unwrap();
    let percent = parse_decimal(sub.get_one::<String>("percent").unwrap().trim())?;
    if goal < 1 {
        bail!("Streak goal must be at least 1");
    }
    if percent < Decimal::ZERO {
        bail!("Bonus percent must not be negative");
    }
    let title = daily_task_in_profile(conn, task_id, profile_id)?;
    conn.execute(
        "INSERT INTO streak_bonus_rules(task_id, streak_goal, bonus_percent)
         VALUES (?1, ?2, ?3)",
        params![task_id, goal, percent.to_string()],
    )?;
    println!("Added bonus rule to '{}': streak>={} => +{}%", title, goal, percent);
    Ok(())
}

#[derive(Serialize)]
struct BonusRow {
    id: i64,
    streak_goal: u32,
    bonus_percent: String,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let (_account_id, profile_id) = resolve_scope(conn, sub)?;
    let task_id = *sub.get_one::<i64>("task").unwrap();
    daily_task_in_profile(conn, task_id, profile_id)?;

    let mut stmt = conn.prepare(
        "SELECT id, streak_goal, bonus_percent FROM streak_bonus_rules
         WHERE task_id=?1 ORDER BY streak_goal",
    )?;
    let rows = stmt.query_map(params![task_id], |r| {
        Ok(BonusRow {
            id: r.get(0)?,
            streak_goal: r.get(1)?,
            bonus_percent: r.get(2)?,
        })
    })?;
    let data = rows.collect::<rusqlite::Result<Vec<_>>>()?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .into_iter()
            .map(|b| {
                vec![
                    b.id.to_string(),
                    b.streak_goal.to_string(),
                    format!("+{}%", b.bonus_percent),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Id", "Streak goal", "Bonus"], rows));
    }
    Ok(())
}
