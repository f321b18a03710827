// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{LOG_COLUMNS, LogEntry, LogType};
use crate::utils::{fmt_gold, maybe_print_json, pretty_table, resolve_scope};
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(conn, sub),
        _ => Ok(()),
    }
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let (_account_id, profile_id) = resolve_scope(conn, sub)?;

    let mut sql = format!("SELECT {LOG_COLUMNS} FROM log_entries WHERE profile_id=?");
    let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(profile_id)];

    if let Some(t) = sub.get_one::<String>("type") {
        let t = t.trim();
        if LogType::parse(t).is_none() {
            bail!("Unknown log type '{}'", t);
        }
        sql.push_str(" AND type=?");
        params_vec.push(Box::new(t.to_string()));
    }
    if let Some(task_id) = sub.get_one::<i64>("task") {
        sql.push_str(" AND (task_id=? OR reward_id=?)");
        params_vec.push(Box::new(*task_id));
        params_vec.push(Box::new(*task_id));
    }
    sql.push_str(" ORDER BY timestamp DESC, id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(Box::new((*limit).clamp(1, 500) as i64));
    }

    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
    let data = stmt
        .query_map(rusqlite::params_from_iter(params), LogEntry::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .iter()
            .map(|l| {
                let extra = match (l.count_delta, l.duration_secs) {
                    (Some(c), _) => format!("count {}", c),
                    (_, Some(s)) => format!("{} min", s / 60),
                    _ => String::new(),
                };
                vec![
                    l.timestamp.to_string(),
                    l.log_type.as_str().to_string(),
                    l.title_snapshot.clone(),
                    fmt_gold(&l.gold_delta),
                    fmt_gold(&l.user_gold),
                    extra,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["When", "Type", "Title", "Gold", "Balance", "Extra"], rows)
        );
    }
    Ok(())
}
