// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::resolve_scope;
use anyhow::Result;
use rusqlite::{Connection, params};
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("logs", sub)) => export_logs(conn, sub),
        Some(("tasks", sub)) => export_tasks(conn, sub),
        _ => Ok(()),
    }
}

fn export_logs(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let (_account_id, profile_id) = resolve_scope(conn, sub)?;

    let mut stmt = conn.prepare(
        "SELECT timestamp, type, title_snapshot, gold_delta, user_gold, count_delta, duration_secs
         FROM log_entries WHERE profile_id=?1 ORDER BY timestamp, id",
    )?;
    let rows = stmt.query_map(params![profile_id], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, Option<String>>(5)?,
            r.get::<_, Option<i64>>(6)?,
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "timestamp",
                "type",
                "title",
                "gold_delta",
                "user_gold",
                "count_delta",
                "duration_secs",
            ])?;
            for row in rows {
                let (ts, ty, title, delta, gold, count, secs) = row?;
                wtr.write_record([
                    ts,
                    ty,
                    title,
                    delta,
                    gold,
                    count.unwrap_or_default(),
                    secs.map(|s| s.to_string()).unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for row in rows {
                let (ts, ty, title, delta, gold, count, secs) = row?;
                items.push(json!({
                    "timestamp": ts, "type": ty, "title": title, "gold_delta": delta,
                    "user_gold": gold, "count_delta": count, "duration_secs": secs
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported logs to {}", out);
    Ok(())
}

fn export_tasks(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let (_account_id, profile_id) = resolve_scope(conn, sub)?;

    let mut stmt = conn.prepare(
        "SELECT id, task_type, title, notes, gold_delta, created_at, total_actions_count
         FROM tasks WHERE profile_id=?1 ORDER BY created_at, id",
    )?;
    let rows = stmt.query_map(params![profile_id], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, i64>(6)?,
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "id",
                "type",
                "title",
                "notes",
                "gold_delta",
                "created_at",
                "total_actions",
            ])?;
            for row in rows {
                let (id, ty, title, notes, delta, created, actions) = row?;
                wtr.write_record([
                    id.to_string(),
                    ty,
                    title,
                    notes,
                    delta,
                    created,
                    actions.to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for row in rows {
                let (id, ty, title, notes, delta, created, actions) = row?;
                items.push(json!({
                    "id": id, "type": ty, "title": title, "notes": notes,
                    "gold_delta": delta, "created_at": created, "total_actions": actions
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported tasks to {}", out);
    Ok(())
}
