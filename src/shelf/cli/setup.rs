use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use shelf::model::{FileCategory, Reminder};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.1.0" for releases, "0.1.0@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("'{}' is not a date (expected YYYY-MM-DD)", s))
}

#[derive(Parser, Debug)]
#[command(name = "shelf", bin_name = "shelf", version = get_version())]
#[command(
    about = "Keep events, files, shortcuts and student marks in small local stores",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Operate on the global store instead of the project one
    #[arg(short, long, global = true, help_heading = "Options")]
    pub global: bool,

    /// Verbose output (debug logs on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Calendar events and reminders
    #[command(subcommand, display_order = 1)]
    Event(EventCommands),

    /// Age from a date of birth, optionally compared with a second one
    #[command(display_order = 2)]
    Age {
        /// Date of birth (YYYY-MM-DD)
        #[arg(value_parser = parse_date)]
        dob: NaiveDate,

        /// Second person's date of birth to compare with
        #[arg(long, value_parser = parse_date)]
        compare: Option<NaiveDate>,

        /// Reference date (defaults to today)
        #[arg(long, value_parser = parse_date)]
        on: Option<NaiveDate>,
    },

    /// Astrological sign for a date of birth
    #[command(display_order = 3)]
    Zodiac {
        /// Date of birth (YYYY-MM-DD)
        #[arg(value_parser = parse_date)]
        dob: NaiveDate,
    },

    /// Uploaded files
    #[command(subcommand, display_order = 4)]
    File(FileCommands),

    /// Website shortcuts
    #[command(subcommand, display_order = 5)]
    Shortcut(ShortcutCommands),

    /// Students and their marks
    #[command(subcommand, display_order = 6)]
    Student(StudentCommands),

    /// Check every store file, optionally moving corrupt ones aside
    #[command(display_order = 20)]
    Doctor {
        /// Quarantine corrupt store files so the stores open empty
        #[arg(long)]
        repair: bool,
    },

    /// Export all store files to a tar.gz archive
    #[command(display_order = 21)]
    Export {
        /// Directory to write the archive to
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },

    /// Initialize the store directory
    #[command(display_order = 22)]
    Init,

    /// Get or set configuration
    #[command(display_order = 23)]
    Config {
        /// Configuration key (max-upload-bytes, top-students)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum EventCommands {
    /// Add an event
    #[command(alias = "n")]
    Add {
        /// Event date (YYYY-MM-DD)
        #[arg(value_parser = parse_date)]
        date: NaiveDate,

        /// Event name words (joined with spaces)
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,

        /// Reminder: none, 1d or 1w
        #[arg(short, long, default_value = "none")]
        reminder: Reminder,
    },

    /// List all events by date
    #[command(alias = "ls")]
    List,

    /// Show the events on one date
    On {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
    },

    /// Search events by name
    Search { term: String },

    /// Delete an event by position on that date (0-based) or by name
    #[command(alias = "rm")]
    Delete {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,

        /// Position or name words
        #[arg(required = true, num_args = 1..)]
        which: Vec<String>,
    },

    /// Show reminders that are due
    Reminders {
        /// Reference date (defaults to today)
        #[arg(long, value_parser = parse_date)]
        on: Option<NaiveDate>,
    },
}

#[derive(Subcommand, Debug)]
pub enum FileCommands {
    /// Upload a file from disk
    Add {
        path: PathBuf,

        /// Store under this name instead of the file name
        #[arg(long)]
        name: Option<String>,

        /// MIME type (inferred from the extension when omitted)
        #[arg(long)]
        mime: Option<String>,
    },

    /// List files, optionally by category (pdf, image, audio, video, other)
    #[command(alias = "ls")]
    List {
        #[arg(short, long)]
        category: Option<FileCategory>,
    },

    /// Search files by name
    Search { term: String },

    /// Delete every file with this name
    #[command(alias = "rm")]
    Delete { name: String },

    /// Write a stored file back to disk
    Export {
        name: String,

        /// Destination file or directory
        #[arg(default_value = ".")]
        dest: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum ShortcutCommands {
    /// Add a shortcut
    Add {
        name: String,
        link: String,

        /// Icon image file
        #[arg(long)]
        icon: Option<PathBuf>,
    },

    /// List shortcuts
    #[command(alias = "ls")]
    List,

    /// Search shortcuts by name
    Search { term: String },

    /// Delete every shortcut with this name
    #[command(alias = "rm")]
    Delete { name: String },
}

#[derive(Subcommand, Debug)]
pub enum StudentCommands {
    /// Add a student
    Add {
        roll: String,
        name: String,
        branch: String,

        /// Photo image file
        #[arg(long)]
        photo: Option<PathBuf>,
    },

    /// Record marks for one subject in a semester
    Marks {
        roll: String,
        semester: u32,
        subject: String,
        marks: u32,
    },

    /// Result sheet for a branch
    Results { branch: String },

    /// Top students by total marks
    Top {
        /// How many to show (defaults to the top-students setting)
        #[arg(value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
        n: Option<usize>,
    },

    /// The student with the highest total
    First,

    /// Details for one student
    Show { roll: String },

    /// Search students by name
    Search { term: String },

    /// List branches
    Branches,

    /// Delete a student by roll number
    #[command(alias = "rm")]
    Delete { roll: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_event_add_with_reminder() {
        let cli = Cli::try_parse_from([
            "shelf", "event", "add", "2024-01-01", "New", "Year", "-r", "1w",
        ])
        .unwrap();
        match cli.command {
            Commands::Event(EventCommands::Add {
                date,
                name,
                reminder,
            }) => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
                assert_eq!(name.join(" "), "New Year");
                assert_eq!(reminder, Reminder::OneWeek);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["shelf", "shortcut", "list", "-g"]).unwrap();
        assert!(cli.global);
    }

    #[test]
    fn rejects_bad_date() {
        assert!(Cli::try_parse_from(["shelf", "zodiac", "01/02/2000"]).is_err());
    }

    #[test]
    fn student_top_requires_at_least_one() {
        assert!(Cli::try_parse_from(["shelf", "student", "top", "0"]).is_err());
        let cli = Cli::try_parse_from(["shelf", "student", "top", "3"]).unwrap();
        match cli.command {
            Commands::Student(StudentCommands::Top { n }) => assert_eq!(n, Some(3)),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_file_category() {
        let cli = Cli::try_parse_from(["shelf", "file", "list", "-c", "videos"]).unwrap();
        match cli.command {
            Commands::File(FileCommands::List { category }) => {
                assert_eq!(category, Some(FileCategory::Videos));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
