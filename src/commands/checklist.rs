// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{maybe_print_json, pretty_table, resolve_scope};
use anyhow::{Result, bail};
use rusqlite::{Connection, params};
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("toggle", sub)) => toggle(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn todo_task_in_profile(conn: &Connection, task_id: i64, profile_id: i64) -> Result<()> {
    let task_type: String = conn.query_row(
        "SELECT task_type FROM tasks WHERE id=?1 AND profile_id=?2",
        params![task_id, profile_id],
        |r| r.get(0),
    )?;
    if task_type != "todo" {
        bail!("Checklist items can only be attached to todo tasks");
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (_account_id, profile_id) = resolve_scope(conn, sub)?;
    let task_id = *sub.get_one::<i64>("task").unwrap();
    let text = sub.get_one::<String>("text").unwrap().trim().to_string();
    let order = *sub.get_one::<i64>("order").unwrap();
    if text.is_empty() {
        bail!("Checklist text must not be blank");
    }
    todo_task_in_profile(conn, task_id, profile_id)?;
    conn.execute(
        "INSERT INTO checklist_items(task_id, text, sort_order) VALUES (?1, ?2, ?3)",
        params![task_id, text, order],
    )?;
    println!("Added checklist item to task #{}", task_id);
    Ok(())
}

#[derive(Serialize)]
struct ChecklistRow {
    id: i64,
    text: String,
    is_completed: bool,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let (_account_id, profile_id) = resolve_scope(conn, sub)?;
    let task_id = *sub.get_one::<i64>("task").unwrap();
    todo_task_in_profile(conn, task_id, profile_id)?;

    let mut stmt = conn.prepare(
        "SELECT id, text, is_completed FROM checklist_items
         WHERE task_id=?1 ORDER BY sort_order, created_at",
    )?;
    let data = stmt
        .query_map(params![task_id], |r| {
            Ok(ChecklistRow {
                id: r.get(0)?,
                text: r.get(1)?,
                is_completed: r.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .into_iter()
            .map(|c| {
                vec![
                    c.id.to_string(),
                    if c.is_completed { "[x]".into() } else { "[ ]".into() },
                    c.text,
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Id", "Done", "Text"], rows));
    }
    Ok(())
}

fn toggle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (_account_id, profile_id) = resolve_scope(conn, sub)?;
    let item_id = *sub.get_one::<i64>("item").unwrap();
    let changed = conn.execute(
        "UPDATE checklist_items SET is_completed = 1 - is_completed
         WHERE id=?1 AND task_id IN (SELECT id FROM tasks WHERE profile_id=?2)",
        params![item_id, profile_id],
    )?;
    if changed == 0 {
        bail!("Checklist item {} not found", item_id);
    }
    println!("Toggled checklist item #{}", item_id);
    Ok(())
}
