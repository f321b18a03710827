// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn account_arg() -> Arg {
    Arg::new("account")
        .long("account")
        .value_name("NAME")
        .default_value("default")
        .help("Account that owns the profile")
}

fn profile_arg() -> Arg {
    Arg::new("profile")
        .long("profile")
        .value_name("NAME")
        .default_value("main")
        .help("Profile to act on")
}

fn task_arg() -> Arg {
    Arg::new("task")
        .long("task")
        .value_name("ID")
        .required(true)
        .value_parser(value_parser!(i64))
}

fn at_arg() -> Arg {
    Arg::new("at")
        .long("at")
        .value_name("TIMESTAMP")
        .help("When the action happened (YYYY-MM-DD[ HH:MM[:SS]]); defaults to now")
}

fn with_json(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print JSON lines"),
    )
}

fn task_add_cmd() -> Command {
    Command::new("add")
        .about("Create a habit, daily, todo, or reward")
        .arg(account_arg())
        .arg(profile_arg())
        .arg(
            Arg::new("type")
                .long("type")
                .value_name("TYPE")
                .required(true)
                .help("habit | daily | todo | reward"),
        )
        .arg(
            Arg::new("title")
                .long("title")
                .value_name("TITLE")
                .required(true),
        )
        .arg(Arg::new("notes").long("notes").value_name("TEXT"))
        .arg(
            Arg::new("gold")
                .long("gold")
                .value_name("AMOUNT")
                .help("Gold delta per action: positive earns, negative costs (rewards)"),
        )
        .arg(
            Arg::new("hidden")
                .long("hidden")
                .action(ArgAction::SetTrue)
                .help("Hide from default listings"),
        )
        // habit
        .arg(
            Arg::new("count-increment")
                .long("count-increment")
                .value_name("AMOUNT")
                .help("Habit: default increment per action (default 1)"),
        )
        .arg(
            Arg::new("reset-cadence")
                .long("reset-cadence")
                .value_name("CADENCE")
                .help("Habit: counter reset cadence (day|week|month|year|never)"),
        )
        // daily
        .arg(
            Arg::new("cadence")
                .long("cadence")
                .value_name("CADENCE")
                .help("Daily: repeat cadence (day|week|month|year)"),
        )
        .arg(
            Arg::new("every")
                .long("every")
                .value_name("N")
                .value_parser(value_parser!(u32))
                .help("Daily: repeat every N cadence units (default 1)"),
        )
        .arg(
            Arg::new("streak-goal")
                .long("streak-goal")
                .value_name("N")
                .value_parser(value_parser!(u32))
                .help("Daily: target streak length"),
        )
        // todo
        .arg(
            Arg::new("due")
                .long("due")
                .value_name("TIMESTAMP")
                .help("Todo: due timestamp"),
        )
        // reward
        .arg(
            Arg::new("repeatable")
                .long("repeatable")
                .action(ArgAction::SetTrue)
                .help("Reward: claimable more than once"),
        )
}

pub fn build_cli() -> Command {
    Command::new("questclip")
        .about("Gamified habit, daily, todo, and reward tracking with a gold ledger")
        .version(crate_version!())
        .subcommand(Command::new("init").about("Create the database, default account, and main profile"))
        .subcommand(
            Command::new("account")
                .about("Manage accounts")
                .subcommand(
                    Command::new("add").arg(Arg::new("name").value_name("NAME").required(true)),
                )
                .subcommand(Command::new("list")),
        )
        .subcommand(
            Command::new("profile")
                .about("Manage profiles")
                .subcommand(
                    Command::new("add")
                        .arg(account_arg())
                        .arg(Arg::new("name").value_name("NAME").required(true)),
                )
                .subcommand(with_json(Command::new("list").arg(account_arg()))),
        )
        .subcommand(
            Command::new("task")
                .about("Create and inspect tasks")
                .subcommand(task_add_cmd())
                .subcommand(with_json(
                    Command::new("list")
                        .arg(account_arg())
                        .arg(profile_arg())
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .value_name("TYPE")
                                .help("Only habit | daily | todo | reward"),
                        )
                        .arg(
                            Arg::new("all")
                                .long("all")
                                .action(ArgAction::SetTrue)
                                .help("Include hidden tasks"),
                        ),
                ))
                .subcommand(with_json(
                    Command::new("show")
                        .arg(account_arg())
                        .arg(profile_arg())
                        .arg(task_arg()),
                )),
        )
        .subcommand(
            Command::new("habit").about("Habit actions").subcommand(
                Command::new("increment")
                    .arg(account_arg())
                    .arg(profile_arg())
                    .arg(task_arg())
                    .arg(
                        Arg::new("by")
                            .long("by")
                            .value_name("AMOUNT")
                            .help("Count delta; defaults to the habit's increment"),
                    )
                    .arg(at_arg()),
            ),
        )
        .subcommand(
            Command::new("daily").about("Daily actions").subcommand(
                Command::new("complete")
                    .arg(account_arg())
                    .arg(profile_arg())
                    .arg(task_arg())
                    .arg(
                        Arg::new("period")
                            .long("period")
                            .value_name("DATE")
                            .help("Explicit completion period start (YYYY-MM-DD)"),
                    )
                    .arg(at_arg()),
            ),
        )
        .subcommand(
            Command::new("todo").about("Todo actions").subcommand(
                Command::new("done")
                    .arg(account_arg())
                    .arg(profile_arg())
                    .arg(task_arg())
                    .arg(at_arg()),
            ),
        )
        .subcommand(
            Command::new("reward").about("Reward actions").subcommand(
                Command::new("claim")
                    .arg(account_arg())
                    .arg(profile_arg())
                    .arg(task_arg())
                    .arg(at_arg()),
            ),
        )
        .subcommand(
            Command::new("bonus")
                .about("Streak bonus rules on dailies")
                .subcommand(
                    Command::new("add")
                        .arg(account_arg())
                        .arg(profile_arg())
                        .arg(task_arg())
                        .arg(
                            Arg::new("goal")
                                .long("goal")
                                .value_name("STREAK")
                                .required(true)
                                .value_parser(value_parser!(u32)),
                        )
                        .arg(
                            Arg::new("percent")
                                .long("percent")
                                .value_name("PERCENT")
                                .required(true),
                        ),
                )
                .subcommand(with_json(
                    Command::new("list")
                        .arg(account_arg())
                        .arg(profile_arg())
                        .arg(task_arg()),
                )),
        )
        .subcommand(
            Command::new("check")
                .about("Checklist items on todos")
                .subcommand(
                    Command::new("add")
                        .arg(account_arg())
                        .arg(profile_arg())
                        .arg(task_arg())
                        .arg(Arg::new("text").value_name("TEXT").required(true))
                        .arg(
                            Arg::new("order")
                                .long("order")
                                .value_name("N")
                                .value_parser(value_parser!(i64))
                                .default_value("0"),
                        ),
                )
                .subcommand(with_json(
                    Command::new("list")
                        .arg(account_arg())
                        .arg(profile_arg())
                        .arg(task_arg()),
                ))
                .subcommand(
                    Command::new("toggle")
                        .arg(account_arg())
                        .arg(profile_arg())
                        .arg(
                            Arg::new("item")
                                .long("item")
                                .value_name("ID")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        ),
                ),
        )
        .subcommand(
            Command::new("activity")
                .about("Activity duration logging")
                .subcommand(
                    Command::new("log")
                        .arg(account_arg())
                        .arg(profile_arg())
                        .arg(
                            Arg::new("title")
                                .long("title")
                                .value_name("TITLE")
                                .required(true),
                        )
                        .arg(
                            Arg::new("minutes")
                                .long("minutes")
                                .value_name("N")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("task")
                                .long("task")
                                .value_name("ID")
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("reward")
                                .long("reward")
                                .value_name("ID")
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(at_arg()),
                ),
        )
        .subcommand(
            Command::new("log").about("Audit log").subcommand(with_json(
                Command::new("list")
                    .arg(account_arg())
                    .arg(profile_arg())
                    .arg(
                        Arg::new("type")
                            .long("type")
                            .value_name("TYPE")
                            .help("Filter by log type"),
                    )
                    .arg(
                        Arg::new("task")
                            .long("task")
                            .value_name("ID")
                            .value_parser(value_parser!(i64)),
                    )
                    .arg(
                        Arg::new("limit")
                            .long("limit")
                            .value_name("N")
                            .value_parser(value_parser!(usize)),
                    ),
            )),
        )
        .subcommand(
            Command::new("newday")
                .about("Period rollover and previous-period backfill")
                .subcommand(with_json(
                    Command::new("preview")
                        .arg(account_arg())
                        .arg(profile_arg())
                        .arg(at_arg()),
                ))
                .subcommand(
                    Command::new("start")
                        .arg(account_arg())
                        .arg(profile_arg())
                        .arg(
                            Arg::new("task")
                                .long("task")
                                .value_name("ID")
                                .action(ArgAction::Append)
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(at_arg()),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("logs")
                        .arg(account_arg())
                        .arg(profile_arg())
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .value_name("FMT")
                                .default_value("csv"),
                        )
                        .arg(
                            Arg::new("out")
                                .long("out")
                                .value_name("PATH")
                                .required(true),
                        ),
                )
                .subcommand(
                    Command::new("tasks")
                        .arg(account_arg())
                        .arg(profile_arg())
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .value_name("FMT")
                                .default_value("csv"),
                        )
                        .arg(
                            Arg::new("out")
                                .long("out")
                                .value_name("PATH")
                                .required(true),
                        ),
                ),
        )
        .subcommand(Command::new("doctor").about("Audit the gold ledger and task integrity"))
}
