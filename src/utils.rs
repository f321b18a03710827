// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Accepts `YYYY-MM-DD HH:MM[:SS]` (T separator also fine) or a bare date,
/// which maps to midnight.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime> {
    for fmt in [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d.and_hms_opt(0, 0, 0).unwrap_or_default());
    }
    anyhow::bail!("Invalid timestamp '{}', expected YYYY-MM-DD[ HH:MM[:SS]]", s)
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Resolve the `--at` timestamp of an action command, defaulting to now.
pub fn action_timestamp(m: &clap::ArgMatches) -> Result<NaiveDateTime> {
    match m.get_one::<String>("at") {
        Some(s) => parse_datetime(s.trim()),
        None => Ok(now()),
    }
}

pub fn fmt_gold(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn id_for_account(conn: &Connection, name: &str) -> Result<i64> {
    let mut stmt = conn.prepare("SELECT id FROM accounts WHERE name=?1")?;
    let id: i64 = stmt
        .query_row(params![name], |r| r.get(0))
        .with_context(|| format!("Account '{}' not found", name))?;
    Ok(id)
}

pub fn id_for_profile(conn: &Connection, account_id: i64, name: &str) -> Result<i64> {
    let mut stmt = conn.prepare("SELECT id FROM profiles WHERE account_id=?1 AND name=?2")?;
    let id: i64 = stmt
        .query_row(params![account_id, name], |r| r.get(0))
        .with_context(|| format!("Profile '{}' not found", name))?;
    Ok(id)
}

/// Resolve the `--account`/`--profile` names every action command carries
/// into (account_id, profile_id).
pub fn resolve_scope(conn: &Connection, m: &clap::ArgMatches) -> Result<(i64, i64)> {
    let account = m.get_one::<String>("account").map(String::as_str).unwrap_or("default");
    let profile = m.get_one::<String>("profile").map(String::as_str).unwrap_or("main");
    let account_id = id_for_account(conn, account.trim())?;
    let profile_id = id_for_profile(conn, account_id, profile.trim())?;
    Ok((account_id, profile_id))
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
