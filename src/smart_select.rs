//! Automatic per-group selection.
//!
//! A [`SmartSelector`] walks the unlocked files of a group in scan order and
//! keeps a single winner: a candidate replaces the current winner only when
//! the policy strictly prefers it. The winner ends up checked, every other
//! candidate unchecked. Locked files and files the policy ignores are left
//! exactly as they were.
//!
//! Tie-breaking per policy:
//!
//! | policy                   | preferred                 | on a tie                          |
//! |--------------------------|---------------------------|-----------------------------------|
//! | keep-first-in-group      | lowest scan position      | n/a                               |
//! | keep-last-in-group       | highest scan position     | n/a                               |
//! | keep-earliest-modified   | oldest timestamp          | earlier scan position             |
//! | keep-latest-modified     | newest timestamp          | earlier scan position             |
//! | keep-shortest-name       | fewest chars in file name | lexicographically smaller, then earlier position |
//! | keep-longest-name        | most chars in file name   | lexicographically smaller, then earlier position |
//! | keep-shortest-path       | fewest chars in full path | lexicographically smaller, then earlier position |
//! | keep-longest-path        | most chars in full path   | lexicographically smaller, then earlier position |
//! | keep-lowest-resolution   | fewest pixels             | earlier scan position             |
//! | keep-highest-resolution  | most pixels               | earlier scan position             |
//!
//! The resolution policies ignore files without a usable width and height,
//! and are only offered in image mode.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::model::Mode;
use crate::tree::{CheckState, FileNode, GroupedSelectionTree, NodeRef};
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SmartSelectPolicy {
    KeepFirstInGroup,
    KeepLastInGroup,
    KeepEarliestModified,
    KeepLatestModified,
    KeepShortestName,
    KeepLongestName,
    KeepShortestPath,
    KeepLongestPath,
    KeepLowestResolution,
    KeepHighestResolution,
}

impl SmartSelectPolicy {
    pub const ALL: [SmartSelectPolicy; 10] = [
        Self::KeepFirstInGroup,
        Self::KeepLastInGroup,
        Self::KeepEarliestModified,
        Self::KeepLatestModified,
        Self::KeepShortestName,
        Self::KeepLongestName,
        Self::KeepShortestPath,
        Self::KeepLongestPath,
        Self::KeepLowestResolution,
        Self::KeepHighestResolution,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::KeepFirstInGroup => "keep-first-in-group",
            Self::KeepLastInGroup => "keep-last-in-group",
            Self::KeepEarliestModified => "keep-earliest-modified",
            Self::KeepLatestModified => "keep-latest-modified",
            Self::KeepShortestName => "keep-shortest-name",
            Self::KeepLongestName => "keep-longest-name",
            Self::KeepShortestPath => "keep-shortest-path",
            Self::KeepLongestPath => "keep-longest-path",
            Self::KeepLowestResolution => "keep-lowest-resolution",
            Self::KeepHighestResolution => "keep-highest-resolution",
        }
    }

    pub const fn requires_image_mode(&self) -> bool {
        matches!(self, Self::KeepLowestResolution | Self::KeepHighestResolution)
    }

    pub fn selector(&self) -> SmartSelector {
        match self {
            Self::KeepFirstInGroup => SmartSelector::new(|a, b| a.index < b.index),
            Self::KeepLastInGroup => SmartSelector::new(|a, b| a.index > b.index),
            Self::KeepEarliestModified => {
                SmartSelector::new(|a, b| wins(a.file.modified().cmp(&b.file.modified()), a, b))
            }
            Self::KeepLatestModified => {
                SmartSelector::new(|a, b| wins(b.file.modified().cmp(&a.file.modified()), a, b))
            }
            Self::KeepShortestName => {
                SmartSelector::new(|a, b| wins(by_length(&a.file.file_name(), &b.file.file_name()), a, b))
            }
            Self::KeepLongestName => SmartSelector::new(|a, b| {
                wins(by_length_desc(&a.file.file_name(), &b.file.file_name()), a, b)
            }),
            Self::KeepShortestPath => SmartSelector::new(|a, b| {
                wins(by_length(&path_text(a.file), &path_text(b.file)), a, b)
            }),
            Self::KeepLongestPath => SmartSelector::new(|a, b| {
                wins(by_length_desc(&path_text(a.file), &path_text(b.file)), a, b)
            }),
            Self::KeepLowestResolution => {
                SmartSelector::new(|a, b| wins(pixels(a.file).cmp(&pixels(b.file)), a, b))
                    .ignoring(lacks_resolution)
            }
            Self::KeepHighestResolution => {
                SmartSelector::new(|a, b| wins(pixels(b.file).cmp(&pixels(a.file)), a, b))
                    .ignoring(lacks_resolution)
            }
        }
    }

    /// The selector for this policy, if it is available in `mode`.
    pub fn selector_for(&self, mode: Mode) -> Result<SmartSelector, Error> {
        if self.requires_image_mode() && mode != Mode::Images {
            return Err(Error::ImageModeRequired(self.name().to_string()));
        }
        Ok(self.selector())
    }
}

impl fmt::Display for SmartSelectPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SmartSelectPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.name() == s.trim().to_lowercase())
            .ok_or_else(|| Error::UnknownPolicy(s.to_string()))
    }
}

/// A file together with its position in the group.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub index: usize,
    pub file: &'a FileNode,
}

/// `true` when `candidate` should replace `winner`.
pub type PreferFn = fn(Candidate<'_>, Candidate<'_>) -> bool;

pub type IgnoreFn = fn(&FileNode) -> bool;

/// One comparator plus an optional ignore predicate, built per invocation.
#[derive(Clone, Copy)]
pub struct SmartSelector {
    prefers: PreferFn,
    ignore: IgnoreFn,
}

impl fmt::Debug for SmartSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmartSelector").finish_non_exhaustive()
    }
}

impl SmartSelector {
    pub fn new(prefers: PreferFn) -> Self {
        Self {
            prefers,
            ignore: |_| false,
        }
    }

    pub fn ignoring(mut self, ignore: IgnoreFn) -> Self {
        self.ignore = ignore;
        self
    }

    pub fn is_candidate(&self, file: &FileNode) -> bool {
        !file.locked && !(self.ignore)(file)
    }

    /// Index of the file this selector picks, if any file is a candidate.
    pub fn pick_winner(&self, files: &[FileNode]) -> Option<usize> {
        files
            .iter()
            .enumerate()
            .filter(|(_, file)| self.is_candidate(file))
            .fold(None, |winner, (index, file)| match winner {
                None => Some(index),
                Some(current) => {
                    let candidate = Candidate { index, file };
                    let holder = Candidate {
                        index: current,
                        file: &files[current],
                    };
                    if (self.prefers)(candidate, holder) {
                        Some(index)
                    } else {
                        Some(current)
                    }
                }
            })
    }

    /// Check the winner of one group and uncheck the other candidates.
    pub fn select(&self, tree: &mut GroupedSelectionTree, group: usize) {
        let Some(node) = tree.group(group) else {
            return;
        };
        let Some(winner) = self.pick_winner(node.files()) else {
            return;
        };
        let candidates: Vec<usize> = node
            .files()
            .iter()
            .enumerate()
            .filter(|(_, file)| self.is_candidate(file))
            .map(|(index, _)| index)
            .collect();
        for index in candidates {
            let state = if index == winner {
                CheckState::Checked
            } else {
                CheckState::Unchecked
            };
            tree.set_check(NodeRef::File(group, index), state, true, true);
        }
        tree.refresh_group_state(group);
    }
}

fn wins(ordering: Ordering, candidate: Candidate<'_>, holder: Candidate<'_>) -> bool {
    match ordering {
        Ordering::Less => true,
        Ordering::Greater => false,
        Ordering::Equal => candidate.index < holder.index,
    }
}

fn by_length(a: &str, b: &str) -> Ordering {
    a.chars().count().cmp(&b.chars().count()).then_with(|| a.cmp(b))
}

fn by_length_desc(a: &str, b: &str) -> Ordering {
    b.chars().count().cmp(&a.chars().count()).then_with(|| a.cmp(b))
}

fn path_text(file: &FileNode) -> String {
    file.path.to_string_lossy().into_owned()
}

fn pixels(file: &FileNode) -> u64 {
    file.resolution()
        .map(|(w, h)| u64::from(w) * u64::from(h))
        .unwrap_or(0)
}

fn lacks_resolution(file: &FileNode) -> bool {
    !matches!(file.resolution(), Some((w, h)) if w > 0 && h > 0)
}
