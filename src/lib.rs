pub mod action;
pub mod config;
pub mod deleter;
pub mod error;
pub mod model;
pub mod progress;
pub mod smart_select;
pub mod tree;

pub use action::{run_to_completion, DeferredAction, DeletionSummary, DuplicateReceiver};
pub use config::AppConfig;
pub use error::Error;
pub use model::{DuplicateFile, DuplicatesList, Mode};
pub use progress::{ProgressReporter, SilentReporter};
pub use smart_select::SmartSelectPolicy;
pub use tree::{CheckState, DuplicateStats, GroupedSelectionTree, NodeRef, TreeEvent};
