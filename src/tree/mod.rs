//! Two-level selection tree: duplicate groups at the top, their files below.
//!
//! Every node carries a [`CheckState`]. Files are either checked or unchecked;
//! a group's state is the aggregate of its unlocked files. Locked files keep
//! their own state but never take part in the aggregate and ignore toggles.

mod sort;
mod stats;

pub use sort::{GroupSort, SortKey};
pub use stats::DuplicateStats;

use chrono::{DateTime, Utc};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::model::{DuplicateFile, DuplicateGroup, Mode};
use crate::smart_select::SmartSelectPolicy;
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckState {
    Checked,
    #[default]
    Unchecked,
    /// Only valid on groups: the unlocked children disagree.
    Mixed,
}

impl CheckState {
    pub fn inverted(self) -> Self {
        match self {
            CheckState::Checked => CheckState::Unchecked,
            CheckState::Unchecked | CheckState::Mixed => CheckState::Checked,
        }
    }
}

/// Positional reference to a node. Invalidated by any structural change
/// (sorting, deletion, exclusion, population).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef {
    Group(usize),
    File(usize, usize),
}

/// Notifications for whoever renders the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEvent {
    /// A row was activated: show `primary` next to `comparison`.
    DuplicateSelected {
        primary: PathBuf,
        comparison: PathBuf,
    },
    StatsChanged,
}

#[derive(Debug, Clone)]
pub struct FileNode {
    pub(crate) path: PathBuf,
    pub(crate) size: u64,
    pub(crate) modified: DateTime<Utc>,
    pub(crate) width: Option<u32>,
    pub(crate) height: Option<u32>,
    pub(crate) locked: bool,
    pub(crate) state: CheckState,
}

impl FileNode {
    fn from_descriptor(file: DuplicateFile) -> Self {
        Self {
            path: file.path,
            size: file.size,
            modified: file.modified,
            width: file.width,
            height: file.height,
            locked: false,
            state: CheckState::Unchecked,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn modified(&self) -> DateTime<Utc> {
        self.modified
    }

    /// Width and height, when both are known.
    pub fn resolution(&self) -> Option<(u32, u32)> {
        self.width.zip(self.height)
    }

    pub fn state(&self) -> CheckState {
        self.state
    }

    pub fn is_checked(&self) -> bool {
        self.state == CheckState::Checked
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

#[derive(Debug, Clone, Default)]
pub struct GroupNode {
    pub(crate) files: Vec<FileNode>,
    pub(crate) state: CheckState,
}

impl GroupNode {
    pub fn files(&self) -> &[FileNode] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn state(&self) -> CheckState {
        self.state
    }

    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }

    pub fn largest_file_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).max().unwrap_or(0)
    }
}

/// Aggregate state of a set of files, ignoring locked ones.
pub(crate) fn aggregate(files: &[FileNode]) -> CheckState {
    let mut any_checked = false;
    let mut any_unchecked = false;
    for file in files.iter().filter(|f| !f.locked) {
        if file.state == CheckState::Checked {
            any_checked = true;
        } else {
            any_unchecked = true;
        }
    }
    match (any_checked, any_unchecked) {
        (true, false) => CheckState::Checked,
        (true, true) => CheckState::Mixed,
        _ => CheckState::Unchecked,
    }
}

type Listener = Box<dyn Fn(&TreeEvent)>;

pub struct GroupedSelectionTree {
    groups: Vec<GroupNode>,
    mode: Mode,
    sort: Option<GroupSort>,
    batch_depth: usize,
    listeners: Vec<Listener>,
}

impl Default for GroupedSelectionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GroupedSelectionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupedSelectionTree")
            .field("groups", &self.groups)
            .field("mode", &self.mode)
            .field("sort", &self.sort)
            .field("batch_depth", &self.batch_depth)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl GroupedSelectionTree {
    pub fn new() -> Self {
        Self {
            groups: Vec::new(),
            mode: Mode::Normal,
            sort: None,
            batch_depth: 0,
            listeners: Vec::new(),
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn clear(&mut self) {
        self.groups.clear();
        self.notify_stats_changed();
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn groups(&self) -> impl Iterator<Item = &GroupNode> {
        self.groups.iter()
    }

    pub fn group(&self, group: usize) -> Option<&GroupNode> {
        self.groups.get(group)
    }

    pub fn file(&self, group: usize, file: usize) -> Option<&FileNode> {
        self.groups.get(group).and_then(|g| g.files.get(file))
    }

    pub fn file_count(&self) -> usize {
        self.groups.iter().map(|g| g.files.len()).sum()
    }

    pub fn check_state(&self, node: NodeRef) -> Option<CheckState> {
        match node {
            NodeRef::Group(g) => self.group(g).map(|g| g.state),
            NodeRef::File(g, f) => self.file(g, f).map(|f| f.state),
        }
    }

    /// Register a callback for tree notifications.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&TreeEvent) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    fn emit(&self, event: TreeEvent) {
        for listener in &self.listeners {
            listener(&event);
        }
    }

    pub(crate) fn notify_stats_changed(&self) {
        if self.batch_depth == 0 {
            self.emit(TreeEvent::StatsChanged);
        }
    }

    pub fn in_batch(&self) -> bool {
        self.batch_depth > 0
    }

    /// Open a bulk-update bracket. Sorting and stats notifications are
    /// deferred until the outermost bracket closes.
    pub fn begin_batch(&mut self) {
        self.batch_depth += 1;
        trace!("Batch opened (depth {})", self.batch_depth);
    }

    pub fn end_batch(&mut self) {
        if self.batch_depth == 0 {
            return;
        }
        self.batch_depth -= 1;
        trace!("Batch closed (depth {})", self.batch_depth);
        if self.batch_depth == 0 {
            self.resort();
            self.notify_stats_changed();
        }
    }

    /// Set a node's state.
    ///
    /// A group pushes the state down to its unlocked files unless
    /// `no_propagate_down` is set, in which case the state is stored as
    /// given. A file updates its parent's aggregate unless `no_propagate_up`
    /// is set. Returns whether the node ends up checked.
    pub fn set_check(
        &mut self,
        node: NodeRef,
        state: CheckState,
        no_propagate_up: bool,
        no_propagate_down: bool,
    ) -> bool {
        match node {
            NodeRef::Group(g) => {
                let Some(group) = self.groups.get_mut(g) else {
                    return false;
                };
                if no_propagate_down {
                    group.state = state;
                } else {
                    if state != CheckState::Mixed {
                        for file in group.files.iter_mut().filter(|f| !f.locked) {
                            file.state = state;
                        }
                    }
                    group.state = aggregate(&group.files);
                }
                group.state == CheckState::Checked
            }
            NodeRef::File(g, f) => {
                let Some(file) = self.groups.get_mut(g).and_then(|g| g.files.get_mut(f)) else {
                    return false;
                };
                if file.locked || state == CheckState::Mixed {
                    return file.state == CheckState::Checked;
                }
                file.state = state;
                if !no_propagate_up {
                    self.refresh_group_state(g);
                }
                state == CheckState::Checked
            }
        }
    }

    /// Recompute a group's aggregate from its files.
    pub(crate) fn refresh_group_state(&mut self, group: usize) {
        if let Some(state) = self.groups.get(group).map(|g| aggregate(&g.files)) {
            self.set_check(NodeRef::Group(group), state, true, true);
        }
    }

    /// A checkbox click on a row.
    pub fn toggle(&mut self, node: NodeRef) -> bool {
        let Some(current) = self.check_state(node) else {
            return false;
        };
        if let NodeRef::File(g, f) = node {
            if self.file(g, f).is_some_and(|f| f.locked) {
                return current == CheckState::Checked;
            }
        }
        let checked = self.set_check(node, current.inverted(), false, false);
        self.notify_stats_changed();
        checked
    }

    pub fn set_locked(&mut self, group: usize, file: usize, locked: bool) {
        let Some(node) = self.groups.get_mut(group).and_then(|g| g.files.get_mut(file)) else {
            return;
        };
        node.locked = locked;
        debug!(
            "{} '{}'",
            if locked { "Locked" } else { "Unlocked" },
            node.path.display()
        );
        self.refresh_group_state(group);
        self.notify_stats_changed();
    }

    pub fn toggle_lock(&mut self, group: usize, file: usize) {
        if let Some(locked) = self.file(group, file).map(|f| f.locked) {
            self.set_locked(group, file, !locked);
        }
    }

    /// Apply a per-file state function to every unlocked file of one group.
    pub(crate) fn apply_to_group<F>(&mut self, group: usize, select: F)
    where
        F: Fn(&FileNode) -> CheckState,
    {
        let Some(node) = self.groups.get(group) else {
            return;
        };
        let updates: Vec<(usize, CheckState)> = node
            .files
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.locked)
            .map(|(i, f)| (i, select(f)))
            .collect();
        for (file, state) in updates {
            self.set_check(NodeRef::File(group, file), state, true, true);
        }
        self.refresh_group_state(group);
    }

    pub fn group_select_all(&mut self, group: usize) {
        self.apply_to_group(group, |_| CheckState::Checked);
        self.notify_stats_changed();
    }

    pub fn group_clear_selection(&mut self, group: usize) {
        self.apply_to_group(group, |_| CheckState::Unchecked);
        self.notify_stats_changed();
    }

    pub fn group_invert_selection(&mut self, group: usize) {
        self.apply_to_group(group, |f| f.state.inverted());
        self.notify_stats_changed();
    }

    pub fn group_smart_select(&mut self, group: usize, policy: SmartSelectPolicy) -> Result<(), Error> {
        let selector = policy.selector_for(self.mode)?;
        selector.select(self, group);
        self.notify_stats_changed();
        Ok(())
    }

    /// Drop a group from the view without touching its files on disk.
    pub fn group_exclude(&mut self, group: usize) {
        if group < self.groups.len() {
            self.remove_group(group);
            self.notify_stats_changed();
        }
    }

    /// Row activation. Announces the file to preview along with a sibling to
    /// compare it against.
    pub fn activate(&self, node: NodeRef) {
        let (group, primary) = match node {
            NodeRef::Group(g) => (g, 0),
            NodeRef::File(g, f) => (g, f),
        };
        let Some(files) = self.group(group).map(|g| &g.files) else {
            return;
        };
        let Some(primary) = files.get(primary) else {
            return;
        };
        let comparison = files.iter().find(|f| !std::ptr::eq(*f, primary));
        if let Some(comparison) = comparison {
            self.emit(TreeEvent::DuplicateSelected {
                primary: primary.path.clone(),
                comparison: comparison.path.clone(),
            });
        }
    }

    pub(crate) fn push_group(&mut self, group: DuplicateGroup) {
        let files: Vec<FileNode> = group.into_iter().map(FileNode::from_descriptor).collect();
        let state = aggregate(&files);
        self.groups.push(GroupNode { files, state });
        if self.batch_depth == 0 {
            self.resort();
        }
    }

    /// Drop all groups without notifying.
    pub(crate) fn reset(&mut self) {
        self.groups.clear();
    }

    pub(crate) fn remove_group(&mut self, group: usize) -> GroupNode {
        self.groups.remove(group)
    }

    /// Remove several groups at once. `doomed` holds positions from before
    /// the removal, in ascending order.
    pub(crate) fn remove_groups(&mut self, doomed: &[usize]) {
        let mut index = 0;
        let mut doomed = doomed.iter().peekable();
        self.groups.retain(|_| {
            let remove = doomed.next_if_eq(&&index).is_some();
            index += 1;
            !remove
        });
    }

    pub(crate) fn remove_file(&mut self, group: usize, file: usize) -> Option<FileNode> {
        let node = self.groups.get_mut(group)?;
        if file >= node.files.len() {
            return None;
        }
        Some(node.files.remove(file))
    }
}
