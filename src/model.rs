use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Error;

/// How the duplicates are being presented. Image mode adds resolution data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Normal,
    Images,
}

/// A file descriptor as produced by the duplicate detection engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateFile {
    pub path: PathBuf,
    pub size: u64,
    pub modified: DateTime<Utc>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

impl DuplicateFile {
    pub fn new(path: impl Into<PathBuf>, size: u64, modified: DateTime<Utc>) -> Self {
        Self {
            path: path.into(),
            size,
            modified,
            width: None,
            height: None,
        }
    }

    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }
}

/// One group of content-identical files.
pub type DuplicateGroup = Vec<DuplicateFile>;

/// Ordered groups of duplicates, one scan's worth.
pub type DuplicatesList = Vec<DuplicateGroup>;

/// Read a duplicates list from a JSON file (an array of arrays of file descriptors).
pub fn load_duplicates_list(path: &Path) -> Result<DuplicatesList, Error> {
    let data = fs::read_to_string(path)?;
    let list: DuplicatesList = serde_json::from_str(&data)?;
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duplicates_list_json() {
        let json = r#"[
            [
                {"path": "/a/one.jpg", "size": 10, "modified": "2024-01-01T00:00:00Z", "width": 640, "height": 480},
                {"path": "/b/one.jpg", "size": 10, "modified": "2024-02-01T00:00:00Z"}
            ]
        ]"#;
        let list: DuplicatesList = serde_json::from_str(json).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].len(), 2);
        assert_eq!(list[0][0].width, Some(640));
        assert_eq!(list[0][1].height, None);
        assert_eq!(list[0][1].path, PathBuf::from("/b/one.jpg"));
    }

    #[test]
    fn test_mode_deserializes_lowercase() {
        let mode: Mode = serde_json::from_str("\"images\"").unwrap();
        assert_eq!(mode, Mode::Images);
    }
}
