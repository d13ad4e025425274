use indicatif::{ProgressBar, ProgressStyle};
use std::cell::RefCell;
use std::time::Duration;

use dupe_tree::ProgressReporter;

const BAR_RESOLUTION: u64 = 1000;

/// CLI progress reporter: one indicatif bar per deferred action.
pub struct CliReporter {
    bar: RefCell<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: RefCell::new(None),
        }
    }

    fn finish_bar(&self) {
        if let Some(pb) = self.bar.borrow_mut().take() {
            pb.finish_and_clear();
        }
    }
}

impl ProgressReporter for CliReporter {
    fn on_action_start(&self, name: &str) {
        self.finish_bar();
        let pb = ProgressBar::new(BAR_RESOLUTION);
        let style = ProgressStyle::with_template(
            "  {spinner:.cyan} {prefix:<18} [{bar:30.cyan/dim}] {percent:>3}%",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━╸─")
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
        pb.set_style(style);
        pb.set_prefix(name.to_string());
        pb.enable_steady_tick(Duration::from_millis(80));
        *self.bar.borrow_mut() = Some(pb);
    }

    fn on_action_progress(&self, fraction: f64) {
        if let Some(pb) = self.bar.borrow().as_ref() {
            pb.set_position((fraction.clamp(0.0, 1.0) * BAR_RESOLUTION as f64) as u64);
        }
    }

    fn on_action_complete(&self, name: &str, steps: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m {} complete: {} steps in {:.2}s",
            name, steps, duration_secs
        );
    }
}
