// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{
    self, Cadence, DailyState, HabitState, RewardState, TASK_COLUMNS, Task, TaskKind, TodoState,
};
use crate::newday::refresh_profile_period_state;
use crate::utils::{
    fmt_gold, maybe_print_json, parse_datetime, parse_decimal, pretty_table, resolve_scope,
};
use anyhow::{Result, bail};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn parse_cadence(s: &str) -> Result<Cadence> {
    Cadence::parse(s.trim())
        .ok_or_else(|| anyhow::anyhow!("Invalid cadence '{}', expected day|week|month|year", s))
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (_account_id, profile_id) = resolve_scope(conn, sub)?;
    let task_type = sub.get_one::<String>("type").unwrap().trim().to_lowercase();
    let title = sub.get_one::<String>("title").unwrap().trim().to_string();
    let notes = sub
        .get_one::<String>("notes")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    let gold_delta = sub
        .get_one::<String>("gold")
        .map(|s| parse_decimal(s.trim()))
        .transpose()?
        .unwrap_or(Decimal::ZERO);

    let kind = match task_type.as_str() {
        "habit" => TaskKind::Habit(HabitState {
            current_count: Decimal::ZERO,
            count_increment: sub
                .get_one::<String>("count-increment")
                .map(|s| parse_decimal(s.trim()))
                .transpose()?
                .unwrap_or(Decimal::ONE),
            reset_cadence: match sub.get_one::<String>("reset-cadence").map(|s| s.trim()) {
                None | Some("never") => None,
                Some(c) => Some(parse_cadence(c)?),
            },
        }),
        "daily" => TaskKind::Daily(DailyState {
            cadence: match sub.get_one::<String>("cadence") {
                Some(c) => parse_cadence(c)?,
                None => bail!("Daily tasks require --cadence day|week|month|year"),
            },
            repeat_every: *sub.get_one::<u32>("every").unwrap_or(&1),
            current_streak: 0,
            best_streak: 0,
            streak_goal: *sub.get_one::<u32>("streak-goal").unwrap_or(&0),
            last_completion_period: None,
            autocomplete_threshold_secs: None,
        }),
        "todo" => TaskKind::Todo(TodoState {
            due_at: sub
                .get_one::<String>("due")
                .map(|s| parse_datetime(s.trim()))
                .transpose()?,
            is_done: false,
            completed_at: None,
        }),
        "reward" => TaskKind::Reward(RewardState {
            is_repeatable: sub.get_flag("repeatable"),
            is_claimed: false,
            claimed_at: None,
            claim_count: 0,
        }),
        other => bail!("Unknown task type '{}', expected habit|daily|todo|reward", other),
    };

    let now = crate::utils::now();
    let task = Task {
        id: 0,
        profile_id,
        title: title.clone(),
        notes,
        is_hidden: sub.get_flag("hidden"),
        gold_delta,
        created_at: now,
        updated_at: now,
        last_action_at: None,
        total_actions_count: 0,
        kind,
    };
    if let Err(msg) = task.validate() {
        bail!("{}", msg);
    }
    let id = models::insert_task(conn, &task)?;
    println!("Added {} #{} '{}'", task_type, id, title);
    Ok(())
}

/// One-line summary of the variant-specific state, for the listing table.
fn detail(task: &Task) -> String {
    match &task.kind {
        TaskKind::Habit(h) => {
            let reset = h
                .reset_cadence
                .map(|c| format!(", resets {}", c.as_str()))
                .unwrap_or_default();
            format!("count {} (+{}{})", h.current_count, h.count_increment, reset)
        }
        TaskKind::Daily(d) => {
            let last = d
                .last_completion_period
                .map(|p| p.to_string())
                .unwrap_or_else(|| "never".into());
            format!(
                "every {} {}, streak {}/{}, last {}",
                d.repeat_every, d.cadence.as_str(), d.current_streak, d.best_streak, last
            )
        }
        TaskKind::Todo(t) => {
            if t.is_done {
                "done".into()
            } else {
                match t.due_at {
                    Some(due) => format!("due {}", due),
                    None => "open".into(),
                }
            }
        }
        TaskKind::Reward(r) => {
            if r.claim_count > 0 {
                format!("claimed {}x", r.claim_count)
            } else {
                "unclaimed".into()
            }
        }
    }
}

fn query_tasks(
    conn: &Connection,
    profile_id: i64,
    type_filter: Option<&str>,
    include_hidden: bool,
) -> Result<Vec<Task>> {
    let mut sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE profile_id=?1");
    if type_filter.is_some() {
        sql.push_str(" AND task_type=?2");
    }
    if !include_hidden {
        sql.push_str(" AND is_hidden=0");
    }
    sql.push_str(" ORDER BY created_at, id");

    let mut stmt = conn.prepare(&sql)?;
    let tasks = match type_filter {
        Some(t) => stmt
            .query_map(params![profile_id, t], Task::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        None => stmt
            .query_map(params![profile_id], Task::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
    };
    Ok(tasks)
}

fn list(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let (account_id, profile_id) = resolve_scope(conn, sub)?;

    // Settle period rollovers before presenting task state.
    refresh_profile_period_state(conn, account_id, profile_id, crate::utils::now())?;

    let type_filter = sub.get_one::<String>("type").map(|s| s.trim().to_lowercase());
    let tasks = query_tasks(conn, profile_id, type_filter.as_deref(), sub.get_flag("all"))?;

    if !maybe_print_json(json_flag, jsonl_flag, &tasks)? {
        let rows = tasks
            .iter()
            .map(|t| {
                vec![
                    t.id.to_string(),
                    t.kind.type_name().to_string(),
                    t.title.clone(),
                    fmt_gold(&t.gold_delta),
                    detail(t),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "Type", "Title", "Gold", "Detail"], rows)
        );
    }
    Ok(())
}

fn show(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let (account_id, profile_id) = resolve_scope(conn, sub)?;
    let task_id = *sub.get_one::<i64>("task").unwrap();

    refresh_profile_period_state(conn, account_id, profile_id, crate::utils::now())?;

    let task = conn.query_row(
        &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id=?1 AND profile_id=?2"),
        params![task_id, profile_id],
        Task::from_row,
    )?;
    if !maybe_print_json(json_flag, jsonl_flag, &task)? {
        let rows = vec![
            vec!["Type".into(), task.kind.type_name().into()],
            vec!["Title".into(), task.title.clone()],
            vec!["Notes".into(), task.notes.clone()],
            vec!["Gold".into(), fmt_gold(&task.gold_delta)],
            vec!["Actions".into(), task.total_actions_count.to_string()],
            vec!["Detail".into(), detail(&task)],
        ];
        println!("{}", pretty_table(&["Field", "Value"], rows));
    }
    Ok(())
}
