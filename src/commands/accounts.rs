// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::{Connection, params};

/// `init` seeds one account and one profile so single-user installs never
/// have to think about either.
pub fn seed_defaults(conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO accounts(name) VALUES('default')",
        [],
    )?;
    conn.execute(
        "INSERT OR IGNORE INTO profiles(account_id, name)
         SELECT id, 'main' FROM accounts WHERE name='default'",
        [],
    )?;
    Ok(())
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim().to_string();
            conn.execute("INSERT INTO accounts(name) VALUES (?1)", params![name])?;
            println!("Added account '{}'", name);
        }
        Some(("list", _)) => {
            let mut stmt = conn.prepare("SELECT name, created_at FROM accounts ORDER BY name")?;
            let rows = stmt.query_map([], |r| {
                Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
            })?;
            let mut data = Vec::new();
            for row in rows {
                let (n, c) = row?;
                data.push(vec![n, c]);
            }
            println!("{}", pretty_table(&["Name", "Created"], data));
        }
        _ => {}
    }
    Ok(())
}
