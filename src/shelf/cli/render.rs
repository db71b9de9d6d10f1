//! # Rendering
//!
//! Turns command results into terminal text. Every `render_*` function returns
//! a `String` so output can be tested without capturing stdout; the handlers
//! print what they get back.
//!
//! Layout (widths, truncation, padding) is computed on plain text with
//! `unicode-width` before colours are applied, so ANSI codes never skew the
//! columns.

use chrono::{DateTime, Utc};
use colored::Colorize;
use shelf::api::{Age, CmdMessage, MessageLevel, Ranked, ResultRow, StoreHealth, StoreReport};
use shelf::commands::files::human_size;
use shelf::model::{Event, Reminder, Shortcut, StoredFile, Student};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const LINE_WIDTH: usize = 100;
pub const TIME_WIDTH: usize = 14;
const NAME_WIDTH: usize = 36;

pub fn render_messages(messages: &[CmdMessage]) -> String {
    let mut out = String::new();
    for message in messages {
        let line = match message.level {
            MessageLevel::Info => message.content.dimmed(),
            MessageLevel::Success => message.content.green(),
            MessageLevel::Warning => message.content.yellow(),
            MessageLevel::Error => message.content.red(),
        };
        let _ = writeln!(out, "{}", line);
    }
    out
}

pub fn print_messages(messages: &[CmdMessage]) {
    print!("{}", render_messages(messages));
}

/// Event lines numbered from `first`. Single-day listings start at 0 so the
/// number doubles as the position `event delete` takes.
pub fn render_events(events: &[Event], first: usize) -> String {
    let mut out = String::new();
    for (i, event) in events.iter().enumerate() {
        let idx = format!("{:>3}. ", i + first);
        let date = event.date.format("%Y-%m-%d").to_string();
        let reminder = match event.reminder {
            Reminder::None => String::new(),
            other => format!("  [reminder: {}]", other),
        };
        let available = LINE_WIDTH.saturating_sub(idx.width() + date.width() + 2 + reminder.width());
        let name = truncate_to_width(&event.name, available);
        let _ = writeln!(
            out,
            "{}{}  {}{}",
            idx,
            date.yellow(),
            name,
            reminder.dimmed()
        );
    }
    out
}

pub fn render_files(files: &[StoredFile]) -> String {
    let mut out = String::new();
    for file in files {
        let name = pad_to_width(&truncate_to_width(&file.name, NAME_WIDTH), NAME_WIDTH);
        let category = format!("{:<8}", file.category().to_string());
        let size = format!("{:>10}", human_size(file.size() as u64));
        let _ = writeln!(
            out,
            "  {} {} {} {}",
            name.bold(),
            category.cyan(),
            size,
            format_time_ago(file.added_at).dimmed()
        );
    }
    out
}

pub fn render_shortcuts(shortcuts: &[Shortcut]) -> String {
    let mut out = String::new();
    for shortcut in shortcuts {
        let name = pad_to_width(&truncate_to_width(&shortcut.name, 24), 24);
        let icon = if shortcut.icon.is_some() { "◆" } else { " " };
        let available = LINE_WIDTH.saturating_sub(2 + 2 + 24 + 1 + TIME_WIDTH);
        let link = pad_to_width(&truncate_to_width(&shortcut.link, available), available);
        let _ = writeln!(
            out,
            "  {} {} {}{}",
            icon,
            name.bold(),
            link.blue().underline(),
            format_time_ago(shortcut.added_at).dimmed()
        );
    }
    out
}

/// Branch result sheet: for every semester any listed student has, one column
/// per subject followed by that semester's total.
pub fn render_results(rows: &[ResultRow]) -> String {
    let mut subjects_by_sem: BTreeMap<u32, BTreeSet<&str>> = BTreeMap::new();
    for row in rows {
        for sem in row.semester_totals.keys() {
            subjects_by_sem.entry(*sem).or_default();
        }
        for (sem, subjects) in &row.marks {
            subjects_by_sem
                .entry(*sem)
                .or_default()
                .extend(subjects.keys().map(String::as_str));
        }
    }

    // `None` marks the semester total column that closes each semester.
    let mut ordered: Vec<(u32, Option<&str>)> = Vec::new();
    for (sem, subjects) in &subjects_by_sem {
        ordered.extend(subjects.iter().map(|subject| (*sem, Some(*subject))));
        ordered.push((*sem, None));
    }

    let labels: Vec<String> = ordered
        .iter()
        .map(|(sem, subject)| match subject {
            Some(subject) => format!("S{} {}", sem, subject),
            None => format!("Sem {}", sem),
        })
        .collect();
    let widths: Vec<usize> = labels.iter().map(|l| l.width().max(6)).collect();

    let mut header = format!("{:<5} {:<20} {:<10}", "No", "Name", "Roll No");
    for (label, width) in labels.iter().zip(&widths) {
        let _ = write!(header, " {:>w$}", label, w = *width);
    }
    let _ = write!(header, " {:>6} {:>7}", "Total", "%");

    let mut out = String::new();
    let _ = writeln!(out, "{}", header.bold());
    for row in rows {
        let name = pad_to_width(&truncate_to_width(&row.name, 20), 20);
        let mut line = format!("{:<5} {} {:<10}", row.serial, name, row.roll);
        for ((sem, subject), width) in ordered.iter().zip(&widths) {
            let value = match subject {
                Some(subject) => row
                    .marks
                    .get(sem)
                    .and_then(|subjects| subjects.get(*subject))
                    .copied(),
                None => row.semester_totals.get(sem).copied(),
            };
            let cell = value.map_or_else(|| "-".to_string(), |v| v.to_string());
            let _ = write!(line, " {:>w$}", cell, w = *width);
        }
        let pct = row
            .percentage
            .map(|p| format!("{:.2}", p))
            .unwrap_or_else(|| "-".to_string());
        let _ = write!(line, " {:>6} {:>7}", row.total, pct);
        let _ = writeln!(out, "{}", line);
    }
    out
}

pub fn render_ranked(ranked: &[Ranked]) -> String {
    let mut out = String::new();
    for r in ranked {
        let _ = writeln!(
            out,
            "{:>3}. {} (Roll: {}) - Total Marks: {}",
            r.rank,
            r.name.bold(),
            r.roll,
            r.total.to_string().green()
        );
    }
    out
}

pub fn render_student(student: &Student) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", "Name:".bold(), student.name);
    let _ = writeln!(out, "{} {}", "Roll No:".bold(), student.roll);
    let _ = writeln!(out, "{} {}", "Branch:".bold(), student.branch);
    let photo = match &student.photo {
        Some(bytes) => human_size(bytes.len() as u64),
        None => "No photo uploaded.".to_string(),
    };
    let _ = writeln!(out, "{} {}", "Photo:".bold(), photo);

    if student.semesters.is_empty() {
        let _ = writeln!(out, "{}", "No results available.".dimmed());
        return out;
    }

    for (sem, subjects) in &student.semesters {
        let _ = writeln!(out, "{}", format!("Semester {} Results:", sem).yellow());
        for (subject, marks) in subjects {
            let _ = writeln!(out, "  {}: {}", subject, marks);
        }
    }
    let _ = writeln!(out, "{} {}", "Total Marks:".bold(), student.total_marks());
    if let Some(pct) = student.percentage() {
        let _ = writeln!(out, "{} {:.2}%", "Percentage:".bold(), pct);
    }
    out
}

pub fn render_ages(ages: &[Age]) -> String {
    let mut out = String::new();
    for (i, age) in ages.iter().enumerate() {
        let _ = writeln!(out, "  Person {}: {}", i + 1, age);
    }
    out
}

pub fn render_doctor(reports: &[StoreReport]) -> String {
    let mut out = String::new();
    for report in reports {
        let health = report.health.to_string();
        let health = match report.health {
            StoreHealth::Absent => health.dimmed(),
            StoreHealth::Healthy { .. } => health.green(),
            StoreHealth::Corrupt { .. } => health.red(),
        };
        let _ = writeln!(out, "  {:<10} {}", report.kind.as_str(), health);
    }
    out
}

pub fn render_pairs(pairs: &[(String, String)]) -> String {
    let mut out = String::new();
    for (key, value) in pairs {
        let _ = writeln!(out, "{} = {}", key, value);
    }
    out
}

pub fn render_text_list(lines: &[String]) -> String {
    let mut out = String::new();
    for line in lines {
        let _ = writeln!(out, "  {}", line);
    }
    out
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }
    result
}

fn pad_to_width(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);

    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());

    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
