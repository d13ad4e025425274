#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use dupe_tree::tree::GroupNode;
use dupe_tree::{
    CheckState, DuplicateFile, DuplicateReceiver, DuplicatesList, GroupedSelectionTree, Mode,
};

pub fn stamp(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

pub fn file(path: &str, size: u64) -> DuplicateFile {
    DuplicateFile::new(path, size, stamp(0))
}

pub fn file_at(path: &str, size: u64, secs: i64) -> DuplicateFile {
    DuplicateFile::new(path, size, stamp(secs))
}

/// One group per entry, with files named `/<tag>/<index>`.
pub fn sized_groups(groups: &[(&str, &[u64])]) -> DuplicatesList {
    groups
        .iter()
        .map(|(tag, sizes)| {
            sizes
                .iter()
                .enumerate()
                .map(|(i, size)| file(&format!("/{}/{}", tag, i), *size))
                .collect()
        })
        .collect()
}

pub fn populated(list: DuplicatesList) -> GroupedSelectionTree {
    populated_with_mode(list, Mode::Normal)
}

pub fn populated_with_mode(list: DuplicatesList, mode: Mode) -> GroupedSelectionTree {
    let mut tree = GroupedSelectionTree::new().with_mode(mode);
    let mut action = tree.populate(list);
    while action.process_next() {}
    drop(action);
    tree
}

/// Check states of every file, group by group.
pub fn snapshot(tree: &GroupedSelectionTree) -> Vec<Vec<CheckState>> {
    tree.groups()
        .map(|g| g.files().iter().map(|f| f.state()).collect())
        .collect()
}

pub fn paths(tree: &GroupedSelectionTree) -> Vec<Vec<String>> {
    tree.groups()
        .map(|g| {
            g.files()
                .iter()
                .map(|f| f.path().to_string_lossy().into_owned())
                .collect()
        })
        .collect()
}

/// What a group's aggregate must be, computed independently of the tree.
pub fn expected_group_state(group: &GroupNode) -> CheckState {
    let unlocked: Vec<_> = group.files().iter().filter(|f| !f.is_locked()).collect();
    let checked = unlocked.iter().filter(|f| f.is_checked()).count();
    if checked == 0 {
        CheckState::Unchecked
    } else if checked == unlocked.len() {
        CheckState::Checked
    } else {
        CheckState::Mixed
    }
}
