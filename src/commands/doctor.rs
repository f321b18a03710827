// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::to_cents;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

/// Audit every profile's ledger invariant and the tasks' variant integrity.
/// Amounts are TEXT in storage, so all sums happen on decoded decimals.
pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    // 1) Ledger invariant: balance == sum of log deltas == last user_gold
    let mut stmt = conn.prepare("SELECT id, name, gold_balance FROM profiles ORDER BY id")?;
    let profiles = stmt
        .query_map([], |r| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
            ))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    for (profile_id, name, balance_s) in profiles {
        let balance = balance_s.parse::<Decimal>().unwrap_or(Decimal::ZERO);

        let mut dstmt =
            conn.prepare("SELECT gold_delta FROM log_entries WHERE profile_id=?1")?;
        let mut cur = dstmt.query(params![profile_id])?;
        let mut sum = Decimal::ZERO;
        while let Some(r) = cur.next()? {
            let s: String = r.get(0)?;
            sum = to_cents(sum + s.parse::<Decimal>().unwrap_or(Decimal::ZERO));
        }
        if to_cents(balance) != sum {
            rows.push(vec![
                "balance_ne_log_sum".into(),
                format!("profile '{}': balance {} vs log sum {}", name, balance, sum),
            ]);
        }

        let last_gold: Option<String> = conn
            .query_row(
                "SELECT user_gold FROM log_entries WHERE profile_id=?1
                 ORDER BY id DESC LIMIT 1",
                params![profile_id],
                |r| r.get(0),
            )
            .optional()?;
        if let Some(s) = last_gold {
            let last = s.parse::<Decimal>().unwrap_or(Decimal::ZERO);
            if to_cents(balance) != to_cents(last) {
                rows.push(vec![
                    "balance_ne_last_user_gold".into(),
                    format!("profile '{}': balance {} vs last log {}", name, balance, last),
                ]);
            }
        }
    }

    // 2) Reward economics: costs must be strictly negative
    let mut rstmt = conn.prepare(
        "SELECT id, title, gold_delta FROM tasks WHERE task_type='reward' ORDER BY id",
    )?;
    let mut cur = rstmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let title: String = r.get(1)?;
        let delta: String = r.get(2)?;
        if delta.parse::<Decimal>().unwrap_or(Decimal::ZERO) >= Decimal::ZERO {
            rows.push(vec![
                "reward_nonnegative_cost".into(),
                format!("task #{} '{}' has gold_delta {}", id, title, delta),
            ]);
        }
    }

    // 3) Log cross-references must stay within the owning profile
    let mut xstmt = conn.prepare(
        "SELECT l.id FROM log_entries l JOIN tasks t ON l.task_id=t.id
         WHERE t.profile_id != l.profile_id",
    )?;
    let mut cur = xstmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        rows.push(vec![
            "log_task_profile_mismatch".into(),
            format!("log entry #{}", id),
        ]);
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
