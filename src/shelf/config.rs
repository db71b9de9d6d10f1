//! # Configuration
//!
//! Each scope directory may hold a `config.json`. Missing keys fall back to
//! compiled defaults, and a missing file means "all defaults".
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `max-upload-bytes` | `1073741824` (1 GiB) | Largest file `shelf file add` accepts |
//! | `top-students` | `5` | How many students `shelf student top` shows by default |

use crate::error::{Result, ShelfError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_MAX_UPLOAD_BYTES: u64 = 1024 * 1024 * 1024;
const DEFAULT_TOP_STUDENTS: usize = 5;

pub const KEYS: [&str; 2] = ["max-upload-bytes", "top-students"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShelfConfig {
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,

    #[serde(default = "default_top_students")]
    pub top_students: usize,
}

fn default_max_upload_bytes() -> u64 {
    DEFAULT_MAX_UPLOAD_BYTES
}

fn default_top_students() -> usize {
    DEFAULT_TOP_STUDENTS
}

impl Default for ShelfConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            top_students: DEFAULT_TOP_STUDENTS,
        }
    }
}

impl ShelfConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(ShelfError::Io)?;
        let config: ShelfConfig =
            serde_json::from_str(&content).map_err(ShelfError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(ShelfError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(ShelfError::Serialization)?;
        fs::write(config_path, content).map_err(ShelfError::Io)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "max-upload-bytes" => Some(self.max_upload_bytes.to_string()),
            "top-students" => Some(self.top_students.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "max-upload-bytes" => {
                self.max_upload_bytes = parse_value(key, value)?;
            }
            "top-students" => {
                let n: usize = parse_value(key, value)?;
                if n == 0 {
                    return Err(ShelfError::Api("top-students must be at least 1".into()));
                }
                self.top_students = n;
            }
            other => return Err(ShelfError::Api(format!("Unknown config key: {}", other))),
        }
        Ok(())
    }

    pub fn entries(&self) -> Vec<(String, String)> {
        KEYS.iter()
            .filter_map(|k| self.get(k).map(|v| (k.to_string(), v)))
            .collect()
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ShelfError::Api(format!("Invalid value for {}: {}", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ShelfConfig::default();
        assert_eq!(config.max_upload_bytes, 1_073_741_824);
        assert_eq!(config.top_students, 5);
    }

    #[test]
    fn test_load_missing_config() {
        let temp = TempDir::new().unwrap();
        let config = ShelfConfig::load(temp.path().join("nowhere")).unwrap();
        assert_eq!(config, ShelfConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();

        let mut config = ShelfConfig::default();
        config.set("top-students", "3").unwrap();
        config.save(temp.path()).unwrap();

        let loaded = ShelfConfig::load(temp.path()).unwrap();
        assert_eq!(loaded.top_students, 3);
        assert_eq!(loaded.max_upload_bytes, 1_073_741_824);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("config.json"), r#"{"top_students": 9}"#).unwrap();

        let loaded = ShelfConfig::load(temp.path()).unwrap();
        assert_eq!(loaded.top_students, 9);
        assert_eq!(loaded.max_upload_bytes, 1_073_741_824);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = ShelfConfig::default();
        assert!(config.set("top-students", "0").is_err());
        assert!(config.set("max-upload-bytes", "lots").is_err());
        assert!(config.set("colour", "blue").is_err());
        assert_eq!(config, ShelfConfig::default());
    }

    #[test]
    fn test_entries_cover_all_keys() {
        let entries = ShelfConfig::default().entries();
        let keys: Vec<_> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, KEYS.to_vec());
    }
}
