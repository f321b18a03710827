// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{fmt_gold, id_for_account, maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::{Connection, params};
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let account = sub.get_one::<String>("account").unwrap().trim();
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let account_id = id_for_account(conn, account)?;
    conn.execute(
        "INSERT INTO profiles(account_id, name) VALUES (?1, ?2)",
        params![account_id, name],
    )?;
    println!("Added profile '{}' under account '{}'", name, account);
    Ok(())
}

#[derive(Serialize)]
struct ProfileRow {
    id: i64,
    name: String,
    gold_balance: String,
    created_at: String,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let account = sub.get_one::<String>("account").unwrap().trim();
    let account_id = id_for_account(conn, account)?;

    let mut stmt = conn.prepare(
        "SELECT id, name, gold_balance, created_at FROM profiles
         WHERE account_id=?1 ORDER BY created_at",
    )?;
    let rows = stmt.query_map(params![account_id], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
        ))
    })?;
    let mut data = Vec::new();
    for row in rows {
        let (id, name, balance, created) = row?;
        let balance = fmt_gold(&parse_decimal(&balance)?);
        data.push(ProfileRow {
            id,
            name,
            gold_balance: balance,
            created_at: created,
        });
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .into_iter()
            .map(|p| vec![p.id.to_string(), p.name, p.gold_balance, p.created_at])
            .collect();
        println!("{}", pretty_table(&["Id", "Name", "Gold", "Created"], rows));
    }
    Ok(())
}
