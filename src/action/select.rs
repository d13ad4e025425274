use tracing::info;

use super::{DeferredAction, TreeAction};
use crate::smart_select::{SmartSelectPolicy, SmartSelector};
use crate::tree::{CheckState, FileNode, GroupedSelectionTree};
use crate::Error;

type SelectFn = Box<dyn Fn(&FileNode) -> CheckState>;

/// Sets every unlocked file to whatever `select` says, one group per step.
pub struct BulkSelectAction<'a> {
    base: TreeAction<'a>,
    select: SelectFn,
    group: usize,
}

impl<'a> BulkSelectAction<'a> {
    pub fn new<F>(tree: &'a mut GroupedSelectionTree, name: &'static str, select: F) -> Self
    where
        F: Fn(&FileNode) -> CheckState + 'static,
    {
        let total = tree.group_count();
        Self {
            base: TreeAction::new(tree, name, total),
            select: Box::new(select),
            group: 0,
        }
    }
}

impl DeferredAction for BulkSelectAction<'_> {
    fn progress(&self) -> f64 {
        self.base.progress()
    }

    fn process_next(&mut self) -> bool {
        if self.base.is_finished() {
            return false;
        }
        if self.group < self.base.tree.group_count() {
            self.base.tree.apply_to_group(self.group, &self.select);
            self.group += 1;
            self.base.advance();
        }
        if self.group < self.base.tree.group_count() {
            return true;
        }
        self.base.finish();
        false
    }

    fn name(&self) -> &'static str {
        self.base.name
    }
}

/// Applies one smart selector to every group, one group per step.
pub struct SmartSelectAction<'a> {
    base: TreeAction<'a>,
    selector: SmartSelector,
    policy: SmartSelectPolicy,
    group: usize,
}

impl<'a> SmartSelectAction<'a> {
    pub fn new(
        tree: &'a mut GroupedSelectionTree,
        policy: SmartSelectPolicy,
    ) -> Result<Self, Error> {
        let selector = policy.selector_for(tree.mode())?;
        let total = tree.group_count();
        Ok(Self {
            base: TreeAction::new(tree, "smart select", total),
            selector,
            policy,
            group: 0,
        })
    }

    pub fn policy(&self) -> SmartSelectPolicy {
        self.policy
    }
}

impl DeferredAction for SmartSelectAction<'_> {
    fn progress(&self) -> f64 {
        self.base.progress()
    }

    fn process_next(&mut self) -> bool {
        if self.base.is_finished() {
            return false;
        }
        if self.group < self.base.tree.group_count() {
            self.selector.select(self.base.tree, self.group);
            self.group += 1;
            self.base.advance();
        }
        if self.group < self.base.tree.group_count() {
            return true;
        }
        info!("Smart selection '{}' applied", self.policy);
        self.base.finish();
        false
    }

    fn name(&self) -> &'static str {
        "smart select"
    }
}

impl GroupedSelectionTree {
    pub fn select_all(&mut self) -> BulkSelectAction<'_> {
        BulkSelectAction::new(self, "select all", |_| CheckState::Checked)
    }

    pub fn clear_selection(&mut self) -> BulkSelectAction<'_> {
        BulkSelectAction::new(self, "clear selection", |_| CheckState::Unchecked)
    }

    pub fn invert_selection(&mut self) -> BulkSelectAction<'_> {
        BulkSelectAction::new(self, "invert selection", |f| f.state().inverted())
    }

    pub fn smart_select(&mut self, policy: SmartSelectPolicy) -> Result<SmartSelectAction<'_>, Error> {
        SmartSelectAction::new(self, policy)
    }
}
