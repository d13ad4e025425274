use std::vec;
use tracing::{info, warn};

use super::{DeferredAction, TreeAction};
use crate::model::{DuplicateGroup, DuplicatesList};
use crate::tree::GroupedSelectionTree;

/// Entry point for the duplicate detection engine: hand over a scan result,
/// get back an action that inserts it step by step.
pub trait DuplicateReceiver {
    fn populate(&mut self, list: DuplicatesList) -> Box<dyn DeferredAction + '_>;
}

impl DuplicateReceiver for GroupedSelectionTree {
    fn populate(&mut self, list: DuplicatesList) -> Box<dyn DeferredAction + '_> {
        Box::new(PopulateAction::new(self, list))
    }
}

/// Replaces the tree's contents with a scan result, one group per step,
/// inside a single batch bracket.
pub struct PopulateAction<'a> {
    base: TreeAction<'a>,
    values: vec::IntoIter<DuplicateGroup>,
    batch_started: bool,
    inserted: usize,
    skipped: usize,
}

impl<'a> PopulateAction<'a> {
    pub fn new(tree: &'a mut GroupedSelectionTree, list: DuplicatesList) -> Self {
        tree.reset();
        let total = list.len();
        Self {
            base: TreeAction::new(tree, "populate", total),
            values: list.into_iter(),
            batch_started: false,
            inserted: 0,
            skipped: 0,
        }
    }

    /// Groups skipped for being empty so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    fn begin_batch(&mut self) {
        if !self.batch_started {
            self.base.tree.begin_batch();
            self.batch_started = true;
        }
    }

    fn end_batch(&mut self) {
        if self.batch_started {
            self.base.tree.end_batch();
            self.batch_started = false;
        }
    }
}

impl DeferredAction for PopulateAction<'_> {
    fn progress(&self) -> f64 {
        self.base.progress()
    }

    fn process_next(&mut self) -> bool {
        if self.base.is_finished() {
            return false;
        }
        self.begin_batch();

        if let Some(group) = self.values.next() {
            if group.is_empty() {
                warn!("Skipping empty duplicate group");
                self.skipped += 1;
            } else {
                self.base.tree.push_group(group);
                self.inserted += 1;
            }
            self.base.advance();
        }

        if self.values.len() > 0 {
            return true;
        }

        self.end_batch();
        self.base.settle();
        info!(
            "Populated {} groups ({} skipped)",
            self.inserted, self.skipped
        );
        false
    }

    fn name(&self) -> &'static str {
        "populate"
    }
}

impl Drop for PopulateAction<'_> {
    fn drop(&mut self) {
        if self.batch_started {
            self.end_batch();
            self.base.settle();
        }
    }
}
