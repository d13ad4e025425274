use std::cmp::Ordering;
use tracing::debug;

use super::{GroupNode, GroupedSelectionTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Sum of all file sizes in the group.
    TotalSize,
    /// Size of the largest file in the group.
    SingleFileSize,
    NumberOfFiles,
}

/// Ordering applied to groups. Files inside a group always keep scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupSort {
    pub key: SortKey,
    pub ascending: bool,
}

impl GroupSort {
    pub fn compare(&self, a: &GroupNode, b: &GroupNode) -> Ordering {
        let ordering = match self.key {
            SortKey::TotalSize => a.total_size().cmp(&b.total_size()),
            SortKey::SingleFileSize => a.largest_file_size().cmp(&b.largest_file_size()),
            SortKey::NumberOfFiles => a.files.len().cmp(&b.files.len()),
        };
        if self.ascending {
            ordering
        } else {
            ordering.reverse()
        }
    }
}

impl GroupedSelectionTree {
    pub fn sort_by_total_size(&mut self, asc: bool) {
        self.apply_sort(GroupSort {
            key: SortKey::TotalSize,
            ascending: asc,
        });
    }

    pub fn sort_by_single_file_size(&mut self, asc: bool) {
        self.apply_sort(GroupSort {
            key: SortKey::SingleFileSize,
            ascending: asc,
        });
    }

    pub fn sort_by_number_of_files(&mut self, asc: bool) {
        self.apply_sort(GroupSort {
            key: SortKey::NumberOfFiles,
            ascending: asc,
        });
    }

    pub fn sort_order(&self) -> Option<GroupSort> {
        self.sort
    }

    /// Remember `sort` and apply it now, or when the open batch closes.
    pub fn apply_sort(&mut self, sort: GroupSort) {
        debug!("Sorting groups by {:?} (ascending: {})", sort.key, sort.ascending);
        self.sort = Some(sort);
        if self.batch_depth == 0 {
            self.resort();
        }
    }

    pub(crate) fn resort(&mut self) {
        if let Some(sort) = self.sort {
            // stable: equal groups keep their relative order
            self.groups.sort_by(|a, b| sort.compare(a, b));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DuplicateFile;
    use chrono::{TimeZone, Utc};

    fn group(sizes: &[u64], tag: &str) -> Vec<DuplicateFile> {
        let stamp = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        sizes
            .iter()
            .enumerate()
            .map(|(i, size)| DuplicateFile::new(format!("/{}/{}", tag, i), *size, stamp))
            .collect()
    }

    fn tags(tree: &GroupedSelectionTree) -> Vec<String> {
        tree.groups()
            .map(|g| {
                g.files()[0]
                    .path()
                    .parent()
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect()
    }

    #[test]
    fn test_sort_by_single_file_size() {
        let mut tree = GroupedSelectionTree::new();
        tree.push_group(group(&[5, 90], "a"));
        tree.push_group(group(&[40, 40, 40], "b"));
        tree.push_group(group(&[60], "c"));

        tree.sort_by_single_file_size(false);
        assert_eq!(tags(&tree), vec!["/a", "/c", "/b"]);
        tree.sort_by_single_file_size(true);
        assert_eq!(tags(&tree), vec!["/b", "/c", "/a"]);
    }

    #[test]
    fn test_sort_by_number_of_files_is_stable() {
        let mut tree = GroupedSelectionTree::new();
        tree.push_group(group(&[1, 1], "a"));
        tree.push_group(group(&[1, 1, 1], "b"));
        tree.push_group(group(&[2, 2], "c"));

        tree.sort_by_number_of_files(false);
        assert_eq!(tags(&tree), vec!["/b", "/a", "/c"]);
        tree.sort_by_number_of_files(true);
        assert_eq!(tags(&tree), vec!["/a", "/c", "/b"]);
    }

    #[test]
    fn test_active_sort_applies_to_new_groups() {
        let mut tree = GroupedSelectionTree::new();
        tree.sort_by_total_size(true);
        tree.push_group(group(&[30], "big"));
        tree.push_group(group(&[10], "small"));
        assert_eq!(tags(&tree), vec!["/small", "/big"]);
        assert_eq!(
            tree.sort_order(),
            Some(GroupSort {
                key: SortKey::TotalSize,
                ascending: true
            })
        );
    }
}
