//! # CLI Layer
//!
//! This module is **one possible UI client** for shelf; it is not the application itself.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Handles argument parsing
//! - Sets up logging
//! - Formats output for human consumption
//!
//! ## Structure
//!
//! - `run()`: main dispatch logic (called by `main.rs`)
//! - `init_tracing()`: stderr logging filtered by `SHELF_LOG`
//! - `handle_*()`: per-command handlers that call the API and print the result

use super::render::{
    print_messages, render_ages, render_doctor, render_events, render_files, render_pairs,
    render_ranked, render_results, render_shortcuts, render_student, render_text_list,
};
use super::setup::{
    Cli, Commands, EventCommands, FileCommands, ShortcutCommands, StudentCommands,
};
use chrono::{Local, NaiveDate};
use clap::Parser;
use shelf::api::{CmdMessage, ConfigAction, NewStudent, ShelfApi};
use shelf::error::{Result, ShelfError};
use shelf::init::initialize;
use shelf::model::Scope;
use shelf::store::fs_backend::FsBackend;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "SHELF_LOG";

struct AppContext {
    api: ShelfApi<FsBackend>,
    scope: Scope,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = init_context(&cli)?;

    match cli.command {
        Commands::Event(cmd) => match cmd {
            EventCommands::Add {
                date,
                name,
                reminder,
            } => {
                let result = ctx.api.add_event(ctx.scope, date, &name.join(" "), reminder)?;
                print_result_messages(result.messages)
            }
            EventCommands::List => handle_event_list(&ctx),
            EventCommands::On { date } => handle_events_on(&ctx, date),
            EventCommands::Search { term } => handle_event_search(&ctx, &term),
            EventCommands::Delete { date, which } => {
                let result = ctx.api.delete_event(ctx.scope, date, &which.join(" "))?;
                print_result_messages(result.messages)
            }
            EventCommands::Reminders { on } => handle_reminders(&ctx, on),
        },
        Commands::Age { dob, compare, on } => handle_age(&ctx, dob, compare, on),
        Commands::Zodiac { dob } => print_result_messages(ctx.api.zodiac(dob)?.messages),
        Commands::File(cmd) => match cmd {
            FileCommands::Add { path, name, mime } => handle_file_add(&ctx, &path, name, mime),
            FileCommands::List { category } => {
                let result = ctx.api.list_files(ctx.scope, category)?;
                print!("{}", render_files(&result.listed));
                print_result_messages(result.messages)
            }
            FileCommands::Search { term } => {
                let result = ctx.api.search_files(ctx.scope, &term)?;
                print_messages(&result.messages);
                print!("{}", render_files(&result.listed));
                Ok(())
            }
            FileCommands::Delete { name } => {
                print_result_messages(ctx.api.delete_file(ctx.scope, &name)?.messages)
            }
            FileCommands::Export { name, dest } => {
                print_result_messages(ctx.api.export_file(ctx.scope, &name, &dest)?.messages)
            }
        },
        Commands::Shortcut(cmd) => match cmd {
            ShortcutCommands::Add { name, link, icon } => {
                let icon = read_optional(icon.as_deref())?;
                let result = ctx.api.add_shortcut(ctx.scope, &name, &link, icon)?;
                print_result_messages(result.messages)
            }
            ShortcutCommands::List => {
                let result = ctx.api.list_shortcuts(ctx.scope)?;
                print!("{}", render_shortcuts(&result.listed));
                print_result_messages(result.messages)
            }
            ShortcutCommands::Search { term } => {
                let result = ctx.api.search_shortcuts(ctx.scope, &term)?;
                print!("{}", render_shortcuts(&result.listed));
                print_result_messages(result.messages)
            }
            ShortcutCommands::Delete { name } => {
                print_result_messages(ctx.api.delete_shortcut(ctx.scope, &name)?.messages)
            }
        },
        Commands::Student(cmd) => handle_student(&ctx, cmd),
        Commands::Doctor { repair } => {
            let result = ctx.api.doctor(ctx.scope, repair)?;
            print!("{}", render_doctor(&result.listed));
            print_result_messages(result.messages)
        }
        Commands::Export { dir } => {
            print_result_messages(ctx.api.export(ctx.scope, &dir)?.messages)
        }
        Commands::Init => print_result_messages(ctx.api.init(ctx.scope)?.messages),
        Commands::Config { key, value } => handle_config(&ctx, key, value),
    }
}

/// Logs go to stderr. `SHELF_LOG` takes a tracing filter; without it only
/// warnings show, and `-v` raises that to debug.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let ctx = initialize(&cwd, cli.global)?;

    Ok(AppContext {
        api: ctx.api,
        scope: ctx.scope,
    })
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn print_result_messages(messages: Vec<CmdMessage>) -> Result<()> {
    print_messages(&messages);
    Ok(())
}

fn read_optional(path: Option<&Path>) -> Result<Option<Vec<u8>>> {
    path.map(|p| std::fs::read(p).map_err(ShelfError::Io))
        .transpose()
}

fn handle_event_list(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.list_events(ctx.scope)?;
    print!("{}", render_events(&result.listed, 1));
    print_messages(&result.messages);
    Ok(())
}

fn handle_events_on(ctx: &AppContext, date: NaiveDate) -> Result<()> {
    let result = ctx.api.events_on(ctx.scope, date)?;
    print!("{}", render_events(&result.listed, 0));
    print_messages(&result.messages);
    Ok(())
}

fn handle_event_search(ctx: &AppContext, term: &str) -> Result<()> {
    let result = ctx.api.search_events(ctx.scope, term)?;
    print!("{}", render_events(&result.listed, 1));
    print_messages(&result.messages);
    Ok(())
}

fn handle_reminders(ctx: &AppContext, on: Option<NaiveDate>) -> Result<()> {
    let result = ctx.api.reminders(ctx.scope, on.unwrap_or_else(today))?;
    print!("{}", render_events(&result.listed, 1));
    print_messages(&result.messages);
    Ok(())
}

fn handle_age(
    ctx: &AppContext,
    dob: NaiveDate,
    compare: Option<NaiveDate>,
    on: Option<NaiveDate>,
) -> Result<()> {
    let today = on.unwrap_or_else(today);
    let result = match compare {
        Some(other) => ctx.api.compare_ages(dob, other, today)?,
        None => ctx.api.age(dob, today)?,
    };
    if result.listed.len() > 1 {
        print!("{}", render_ages(&result.listed));
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_file_add(
    ctx: &AppContext,
    path: &Path,
    name: Option<String>,
    mime: Option<String>,
) -> Result<()> {
    let result = ctx.api.add_file_from_path(ctx.scope, path, name, mime)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_student(ctx: &AppContext, cmd: StudentCommands) -> Result<()> {
    match cmd {
        StudentCommands::Add {
            roll,
            name,
            branch,
            photo,
        } => {
            let new = NewStudent {
                roll,
                name,
                branch,
                photo: read_optional(photo.as_deref())?,
            };
            print_result_messages(ctx.api.add_student(ctx.scope, new)?.messages)
        }
        StudentCommands::Marks {
            roll,
            semester,
            subject,
            marks,
        } => print_result_messages(
            ctx.api
                .record_marks(ctx.scope, &roll, semester, &subject, marks)?
                .messages,
        ),
        StudentCommands::Results { branch } => {
            let result = ctx.api.results(ctx.scope, &branch)?;
            if !result.listed.is_empty() {
                print!("{}", render_results(&result.listed));
            }
            print_result_messages(result.messages)
        }
        StudentCommands::Top { n } => {
            let result = ctx.api.top_students(ctx.scope, n)?;
            print!("{}", render_ranked(&result.listed));
            print_result_messages(result.messages)
        }
        StudentCommands::First => {
            print_result_messages(ctx.api.first_student(ctx.scope)?.messages)
        }
        StudentCommands::Show { roll } => {
            let result = ctx.api.student_details(ctx.scope, &roll)?;
            for student in &result.listed {
                print!("{}", render_student(student));
            }
            print_result_messages(result.messages)
        }
        StudentCommands::Search { term } => {
            let result = ctx.api.search_students(ctx.scope, &term)?;
            let lines: Vec<String> = result
                .listed
                .iter()
                .map(|s| format!("{} (Roll: {}, Branch: {})", s.name, s.roll, s.branch))
                .collect();
            print!("{}", render_text_list(&lines));
            print_result_messages(result.messages)
        }
        StudentCommands::Branches => {
            let result = ctx.api.branches(ctx.scope)?;
            print!("{}", render_text_list(&result.listed));
            print_result_messages(result.messages)
        }
        StudentCommands::Delete { roll } => {
            print_result_messages(ctx.api.delete_student(ctx.scope, &roll)?.messages)
        }
    }
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };

    let result = ctx.api.config_action(ctx.scope, action)?;
    print!("{}", render_pairs(&result.listed));
    print_messages(&result.messages);
    Ok(())
}
