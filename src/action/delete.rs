use std::path::PathBuf;
use tracing::{debug, info, warn};

use super::{DeferredAction, TreeAction};
use crate::deleter::{BackupDeleter, FileDeleter, PermanentDeleter, TrashDeleter};
use crate::tree::GroupedSelectionTree;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeletionSummary {
    pub deleted: usize,
    pub failed: usize,
    pub freed_bytes: u64,
}

/// Deletes checked, unlocked files one per step.
///
/// Deleted files leave the tree. A failure is logged and counted, the node
/// stays, and processing moves on. A group that lost a file and has at most
/// one left is no longer a duplicate; such groups are removed together when
/// the action finishes or is dropped, so group positions stay put meanwhile.
/// Groups that lost nothing are never removed.
pub struct DeleteAction<'a> {
    base: TreeAction<'a>,
    deleter: Box<dyn FileDeleter + 'a>,
    group: usize,
    file: usize,
    group_lost_file: bool,
    collapsed: Vec<usize>,
    summary: DeletionSummary,
}

impl<'a> DeleteAction<'a> {
    pub fn new(tree: &'a mut GroupedSelectionTree, deleter: Box<dyn FileDeleter + 'a>) -> Self {
        let total = tree.file_count();
        info!("Deleting selection with {} deleter", deleter.name());
        Self {
            base: TreeAction::new(tree, "delete", total),
            deleter,
            group: 0,
            file: 0,
            group_lost_file: false,
            collapsed: Vec::new(),
            summary: DeletionSummary::default(),
        }
    }

    pub fn summary(&self) -> DeletionSummary {
        self.summary
    }

    /// Close every group whose files have all been visited.
    fn close_exhausted_groups(&mut self) {
        while let Some(len) = self.base.tree.group(self.group).map(|g| g.len()) {
            if self.file < len {
                break;
            }
            self.close_current_group(len);
            self.group += 1;
            self.file = 0;
        }
    }

    fn close_current_group(&mut self, len: usize) {
        if self.group_lost_file && len <= 1 {
            debug!("Group {} has {} file(s) left, collapsing", self.group, len);
            self.collapsed.push(self.group);
        }
        self.group_lost_file = false;
    }

    /// Drop every collapsed group in one pass.
    fn sweep_collapsed(&mut self) {
        let collapsed = std::mem::take(&mut self.collapsed);
        if !collapsed.is_empty() {
            self.base.tree.remove_groups(&collapsed);
        }
    }

    fn process_file(&mut self) {
        let Some(node) = self.base.tree.file(self.group, self.file) else {
            self.file += 1;
            return;
        };
        if !node.is_checked() || node.is_locked() {
            self.file += 1;
            return;
        }
        let path: PathBuf = node.path().to_path_buf();
        let size = node.size();

        match self.deleter.delete(&path) {
            Ok(()) => {
                debug!("{}: {}", self.deleter.name(), path.display());
                self.base.tree.remove_file(self.group, self.file);
                self.base.tree.refresh_group_state(self.group);
                self.group_lost_file = true;
                self.summary.deleted += 1;
                self.summary.freed_bytes += size;
            }
            Err(err) => {
                warn!("Failed to remove '{}': {}", path.display(), err);
                self.summary.failed += 1;
                self.file += 1;
            }
        }
    }
}

impl DeferredAction for DeleteAction<'_> {
    fn progress(&self) -> f64 {
        self.base.progress()
    }

    fn process_next(&mut self) -> bool {
        if self.base.is_finished() {
            return false;
        }
        self.close_exhausted_groups();
        if self.group < self.base.tree.group_count() {
            self.process_file();
            self.base.advance();
            self.close_exhausted_groups();
        }
        if self.group < self.base.tree.group_count() {
            return true;
        }

        self.sweep_collapsed();
        self.base.tree.resort();
        info!(
            "Deletion finished: {} succeeded, {} failed, {} bytes freed",
            self.summary.deleted, self.summary.failed, self.summary.freed_bytes
        );
        self.base.finish();
        false
    }

    fn name(&self) -> &'static str {
        "delete"
    }
}

impl Drop for DeleteAction<'_> {
    fn drop(&mut self) {
        if self.base.is_finished() {
            return;
        }
        if let Some(len) = self.base.tree.group(self.group).map(|g| g.len()) {
            self.close_current_group(len);
        }
        self.sweep_collapsed();
    }
}

impl GroupedSelectionTree {
    pub fn delete_with<'a>(&'a mut self, deleter: Box<dyn FileDeleter + 'a>) -> DeleteAction<'a> {
        DeleteAction::new(self, deleter)
    }

    pub fn delete_permanently(&mut self) -> DeleteAction<'_> {
        self.delete_with(Box::new(PermanentDeleter))
    }

    pub fn delete_to_trash(&mut self) -> DeleteAction<'_> {
        self.delete_with(Box::new(TrashDeleter))
    }

    pub fn delete_to_backup_folder(&mut self, folder: impl Into<PathBuf>) -> DeleteAction<'_> {
        self.delete_with(Box::new(BackupDeleter::new(folder)))
    }
}
