// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use questclip::{cli, commands, db};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mut conn = db::open_or_init()?;

    match matches.subcommand() {
        Some(("init", _)) => {
            commands::accounts::seed_defaults(&conn)?;
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("account", sub)) => commands::accounts::handle(&conn, sub)?,
        Some(("profile", sub)) => commands::profiles::handle(&conn, sub)?,
        Some(("task", sub)) => commands::tasks::handle(&mut conn, sub)?,
        Some(("habit", sub)) => commands::habits::handle(&mut conn, sub)?,
        Some(("daily", sub)) => commands::dailies::handle(&mut conn, sub)?,
        Some(("todo", sub)) => commands::todos::handle(&mut conn, sub)?,
        Some(("reward", sub)) => commands::rewards::handle(&mut conn, sub)?,
        Some(("bonus", sub)) => commands::bonuses::handle(&conn, sub)?,
        Some(("check", sub)) => commands::checklist::handle(&conn, sub)?,
        Some(("activity", sub)) => commands::activity::handle(&mut conn, sub)?,
        Some(("log", sub)) => commands::logs::handle(&conn, sub)?,
        Some(("newday", sub)) => commands::newday::handle(&mut conn, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
