use std::sync::atomic::{AtomicUsize, Ordering};

use banana_core::pipeline::{PipelineStage, ProgressReporter};
use indicatif::{ProgressBar, ProgressStyle};

/// Drives one terminal progress bar across pipeline stages.
pub struct BarReporter {
    pb: ProgressBar,
    stages_done: AtomicUsize,
}

impl BarReporter {
    pub fn new() -> Self {
        let pb = ProgressBar::new(0);
        if let Ok(style) =
            ProgressStyle::default_bar().template("{msg:24} [{bar:40}] {pos}/{len}")
        {
            pb.set_style(style.progress_chars("=> "));
        }
        Self {
            pb,
            stages_done: AtomicUsize::new(0),
        }
    }

    pub fn finish(&self) {
        let stages = self.stages_done.load(Ordering::Relaxed);
        self.pb.finish_with_message(format!("Done ({stages} stages)"));
    }
}

impl Default for BarReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: PipelineStage, total_items: Option<usize>) {
        self.pb.set_message(stage.to_string());
        self.pb.set_length(total_items.unwrap_or(1) as u64);
        self.pb.set_position(0);
    }

    fn advance(&self, items_done: usize) {
        self.pb.set_position(items_done as u64);
    }

    fn finish_stage(&self) {
        if let Some(len) = self.pb.length() {
            self.pb.set_position(len);
        }
        self.stages_done.fetch_add(1, Ordering::Relaxed);
    }
}
