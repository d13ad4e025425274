//! Long tree operations split into bounded steps.
//!
//! An action borrows the tree mutably for its whole lifetime, so only one
//! action can drive mutation at a time. The owner calls
//! [`DeferredAction::process_next`] from an idle point until it returns
//! `false`. Dropping an action between steps is a valid way to abandon it:
//! every group aggregate stays consistent and any open batch is closed.

mod delete;
mod populate;
mod select;

pub use delete::{DeleteAction, DeletionSummary};
pub use populate::{DuplicateReceiver, PopulateAction};
pub use select::{BulkSelectAction, SmartSelectAction};

use std::time::Instant;
use tracing::{debug, info};

use crate::progress::ProgressReporter;
use crate::tree::GroupedSelectionTree;

pub trait DeferredAction {
    /// Fraction of work done, in `[0.0, 1.0]`.
    fn progress(&self) -> f64;

    /// Perform one unit of work. Returns `false` once nothing remains.
    fn process_next(&mut self) -> bool;

    fn name(&self) -> &'static str {
        "action"
    }
}

/// Drive `action` until it is done. Returns the number of steps taken.
pub fn run_to_completion<A>(action: &mut A, reporter: &dyn ProgressReporter) -> usize
where
    A: DeferredAction + ?Sized,
{
    let name = action.name();
    let start = Instant::now();
    reporter.on_action_start(name);

    let mut steps = 0;
    loop {
        let more = action.process_next();
        steps += 1;
        reporter.on_action_progress(action.progress());
        if !more {
            break;
        }
    }

    let duration = start.elapsed();
    reporter.on_action_complete(name, steps, duration.as_secs_f64());
    debug!(
        "{} completed in {:.2}s after {} steps",
        name,
        duration.as_secs_f64(),
        steps
    );
    steps
}

/// Shared state of every tree action: the borrowed tree and a counter.
struct TreeAction<'a> {
    tree: &'a mut GroupedSelectionTree,
    name: &'static str,
    total_items: usize,
    current_item: usize,
    finished: bool,
}

impl<'a> TreeAction<'a> {
    fn new(tree: &'a mut GroupedSelectionTree, name: &'static str, total_items: usize) -> Self {
        debug!("{} started over {} items", name, total_items);
        Self {
            tree,
            name,
            total_items,
            current_item: 0,
            finished: false,
        }
    }

    fn progress(&self) -> f64 {
        if self.finished || self.total_items == 0 {
            return 1.0;
        }
        (self.current_item as f64 / self.total_items as f64).min(1.0)
    }

    fn advance(&mut self) {
        self.current_item += 1;
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    /// Mark done without notifying; for callers that already did.
    fn settle(&mut self) {
        self.finished = true;
        self.current_item = self.total_items;
    }

    fn finish(&mut self) {
        self.settle();
        info!("{} finished", self.name);
        self.tree.notify_stats_changed();
    }
}

impl Drop for TreeAction<'_> {
    fn drop(&mut self) {
        if !self.finished {
            debug!(
                "{} abandoned at {}/{}",
                self.name, self.current_item, self.total_items
            );
            self.tree.notify_stats_changed();
        }
    }
}
