use indicatif::{HumanBytes, HumanCount};
use serde::Serialize;
use std::fmt;
use std::io;

use super::{CheckState, GroupedSelectionTree};
use crate::Error;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateStats {
    pub group_count: usize,
    /// Checked files, i.e. the ones that would be deleted.
    pub file_count: usize,
    pub total_size: u64,
    /// Space reclaimed by deleting the current selection.
    pub wasted_size: u64,
}

impl fmt::Display for DuplicateStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} groups, {} files selected, {} of {} reclaimable",
            HumanCount(self.group_count as u64),
            HumanCount(self.file_count as u64),
            HumanBytes(self.wasted_size),
            HumanBytes(self.total_size)
        )
    }
}

#[derive(Debug, Serialize)]
struct SelectionRow<'a> {
    group: usize,
    path: &'a str,
    size: u64,
    checked: bool,
    locked: bool,
}

impl GroupedSelectionTree {
    pub fn calculate_stats(&self) -> DuplicateStats {
        let mut stats = DuplicateStats {
            group_count: self.groups.len(),
            ..Default::default()
        };
        for file in self.groups.iter().flat_map(|g| g.files.iter()) {
            stats.total_size += file.size;
            if file.state == CheckState::Checked {
                stats.file_count += 1;
                stats.wasted_size += file.size;
            }
        }
        stats
    }

    pub fn at_least_one_top_level_item_checked(&self) -> bool {
        self.groups.iter().any(|g| g.state != CheckState::Unchecked)
    }

    /// Write one CSV row per file. Returns the number of rows written.
    pub fn export_selection_csv<W: io::Write>(&self, writer: W) -> Result<usize, Error> {
        let mut wtr = csv::Writer::from_writer(writer);
        let mut rows = 0;
        for (index, group) in self.groups.iter().enumerate() {
            for file in &group.files {
                let path = file.path.to_string_lossy();
                wtr.serialize(SelectionRow {
                    group: index,
                    path: &path,
                    size: file.size,
                    checked: file.state == CheckState::Checked,
                    locked: file.locked,
                })?;
                rows += 1;
            }
        }
        wtr.flush()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DuplicateFile;
    use crate::tree::NodeRef;
    use chrono::{TimeZone, Utc};

    fn sized(sizes: &[u64]) -> Vec<DuplicateFile> {
        let stamp = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        sizes
            .iter()
            .enumerate()
            .map(|(i, size)| DuplicateFile::new(format!("/data/{}.bin", i), *size, stamp))
            .collect()
    }

    #[test]
    fn test_empty_tree_stats() {
        let tree = GroupedSelectionTree::new();
        assert_eq!(tree.calculate_stats(), DuplicateStats::default());
        assert!(!tree.at_least_one_top_level_item_checked());
    }

    #[test]
    fn test_wasted_size_follows_selection() {
        let mut tree = GroupedSelectionTree::new();
        tree.push_group(sized(&[10, 20, 30]));
        tree.set_check(NodeRef::Group(0), CheckState::Checked, false, false);

        let stats = tree.calculate_stats();
        assert_eq!(stats.group_count, 1);
        assert_eq!(stats.file_count, 3);
        assert_eq!(stats.total_size, 60);
        assert_eq!(stats.wasted_size, 60);

        tree.set_check(NodeRef::File(0, 1), CheckState::Unchecked, false, false);
        let stats = tree.calculate_stats();
        assert_eq!(stats.file_count, 2);
        assert_eq!(stats.total_size, 60);
        assert_eq!(stats.wasted_size, 40);
        assert!(tree.at_least_one_top_level_item_checked());
    }

    #[test]
    fn test_export_selection_csv() {
        let mut tree = GroupedSelectionTree::new();
        tree.push_group(sized(&[7, 7]));
        tree.set_check(NodeRef::File(0, 1), CheckState::Checked, false, false);

        let mut out = Vec::new();
        let rows = tree.export_selection_csv(&mut out).unwrap();
        assert_eq!(rows, 2);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "group,path,size,checked,locked");
        assert_eq!(lines[1], "0,/data/0.bin,7,false,false");
        assert_eq!(lines[2], "0,/data/1.bin,7,true,false");
    }
}
