use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    Project,
    Global,
}

/// The four record collections a scope can hold. Each one is mirrored to its
/// own backing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Events,
    Files,
    Shortcuts,
    Students,
}

impl StoreKind {
    pub const ALL: [StoreKind; 4] = [
        StoreKind::Events,
        StoreKind::Files,
        StoreKind::Shortcuts,
        StoreKind::Students,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::Events => "events",
            StoreKind::Files => "files",
            StoreKind::Shortcuts => "shortcuts",
            StoreKind::Students => "students",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.as_str())
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single entry of a store.
///
/// `key` identifies the record for deletes and uniqueness checks; `search_text`
/// is the one text field that substring search looks at.
pub trait Record: Serialize + DeserializeOwned + Clone + fmt::Debug {
    const KIND: StoreKind;

    fn key(&self) -> String;

    fn search_text(&self) -> &str;
}

// --- Events ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Reminder {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "1-day")]
    OneDay,
    #[serde(rename = "1-week")]
    OneWeek,
}

impl Reminder {
    /// How many days before the event the reminder becomes due.
    pub fn lead_days(&self) -> Option<u64> {
        match self {
            Reminder::None => None,
            Reminder::OneDay => Some(1),
            Reminder::OneWeek => Some(7),
        }
    }
}

impl fmt::Display for Reminder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Reminder::None => "None",
            Reminder::OneDay => "1 Day",
            Reminder::OneWeek => "1 Week",
        };
        f.write_str(label)
    }
}

impl FromStr for Reminder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" => Ok(Reminder::None),
            "1d" | "1-day" | "day" => Ok(Reminder::OneDay),
            "1w" | "1-week" | "week" => Ok(Reminder::OneWeek),
            other => Err(format!(
                "Unknown reminder '{}' (expected none, 1d or 1w)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub date: NaiveDate,
    pub name: String,
    #[serde(default)]
    pub reminder: Reminder,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn new(date: NaiveDate, name: impl Into<String>, reminder: Reminder) -> Self {
        Self {
            date,
            name: name.into(),
            reminder,
            created_at: Utc::now(),
        }
    }

    /// The day the reminder fires, if one is set.
    pub fn reminder_date(&self) -> Option<NaiveDate> {
        self.reminder
            .lead_days()
            .and_then(|days| self.date.checked_sub_days(Days::new(days)))
    }
}

impl Record for Event {
    const KIND: StoreKind = StoreKind::Events;

    fn key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    fn search_text(&self) -> &str {
        &self.name
    }
}

// --- Files ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    pub name: String,
    pub mime: String,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    pub added_at: DateTime<Utc>,
}

impl StoredFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            data,
            added_at: Utc::now(),
        }
    }

    pub fn category(&self) -> FileCategory {
        FileCategory::from_mime(&self.mime)
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

impl Record for StoredFile {
    const KIND: StoreKind = StoreKind::Files;

    fn key(&self) -> String {
        self.name.clone()
    }

    fn search_text(&self) -> &str {
        &self.name
    }
}

/// Guess a MIME type from a file extension (without the dot).
pub fn mime_for_extension(ext: &str) -> &'static str {
    match ext.to_lowercase().as_str() {
        "pdf" => "application/pdf",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "mp3" => "audio/mpeg",
        "mp4" => "video/mp4",
        "mkv" => "video/x-matroska",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileCategory {
    Pdfs,
    Images,
    Audio,
    Videos,
    Other,
}

impl FileCategory {
    pub fn from_mime(mime: &str) -> Self {
        match mime {
            "application/pdf" => FileCategory::Pdfs,
            "image/jpeg" | "image/png" => FileCategory::Images,
            "audio/mpeg" => FileCategory::Audio,
            "video/mp4" | "video/x-matroska" => FileCategory::Videos,
            _ => FileCategory::Other,
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FileCategory::Pdfs => "PDFs",
            FileCategory::Images => "Images",
            FileCategory::Audio => "Audio",
            FileCategory::Videos => "Videos",
            FileCategory::Other => "Other",
        };
        f.write_str(label)
    }
}

impl FromStr for FileCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pdf" | "pdfs" => Ok(FileCategory::Pdfs),
            "image" | "images" => Ok(FileCategory::Images),
            "audio" => Ok(FileCategory::Audio),
            "video" | "videos" => Ok(FileCategory::Videos),
            "other" => Ok(FileCategory::Other),
            other => Err(format!("Unknown file category '{}'", other)),
        }
    }
}

// --- Shortcuts ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortcut {
    pub name: String,
    pub link: String,
    #[serde(default, with = "base64_opt_bytes")]
    pub icon: Option<Vec<u8>>,
    pub added_at: DateTime<Utc>,
}

impl Shortcut {
    pub fn new(name: impl Into<String>, link: impl Into<String>, icon: Option<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            link: link.into(),
            icon,
            added_at: Utc::now(),
        }
    }
}

impl Record for Shortcut {
    const KIND: StoreKind = StoreKind::Shortcuts;

    fn key(&self) -> String {
        self.name.clone()
    }

    fn search_text(&self) -> &str {
        &self.name
    }
}

// --- Students ---

/// Marks per subject, grouped by semester number.
pub type Semesters = BTreeMap<u32, BTreeMap<String, u32>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub roll: String,
    pub name: String,
    pub branch: String,
    #[serde(default, with = "base64_opt_bytes")]
    pub photo: Option<Vec<u8>>,
    #[serde(default)]
    pub semesters: Semesters,
}

impl Student {
    pub fn new(roll: impl Into<String>, name: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            roll: roll.into(),
            name: name.into(),
            branch: branch.into(),
            photo: None,
            semesters: Semesters::new(),
        }
    }

    pub fn semester_total(&self, semester: u32) -> u32 {
        self.semesters
            .get(&semester)
            .map(|subjects| subjects.values().sum())
            .unwrap_or(0)
    }

    pub fn total_marks(&self) -> u32 {
        self.semesters
            .values()
            .map(|subjects| subjects.values().sum::<u32>())
            .sum()
    }

    pub fn subject_count(&self) -> usize {
        self.semesters.values().map(|subjects| subjects.len()).sum()
    }

    /// Share of the maximum attainable marks (100 per subject), or `None` when
    /// nothing has been recorded yet.
    pub fn percentage(&self) -> Option<f64> {
        let subjects = self.subject_count();
        if subjects == 0 {
            return None;
        }
        Some(self.total_marks() as f64 * 100.0 / (subjects as f64 * 100.0))
    }
}

impl Record for Student {
    const KIND: StoreKind = StoreKind::Students;

    fn key(&self) -> String {
        self.roll.clone()
    }

    fn search_text(&self) -> &str {
        &self.name
    }
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD
            .decode(text.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

mod base64_opt_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        bytes: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(b) => serializer.serialize_some(&STANDARD.encode(b)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(text) => STANDARD
                .decode(text.as_bytes())
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}
