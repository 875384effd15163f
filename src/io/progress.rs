//! Multi-file progress tracking with automatic batching for large sets

use std::path::Path;
use std::sync::LazyLock;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::io::configuration::{MAX_INDIVIDUAL_PROGRESS_BARS, PROGRESS_BAR_WIDTH};

/// Display state of one map in the rolling window
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileState {
    /// File name shown next to the bar
    pub name: String,
    /// Steps performed so far
    pub step: usize,
    /// Upper bound on steps, one per grid cell
    pub max_steps: usize,
    /// Outcome shown once the file is done
    pub outcome: Option<String>,
}

/// Coordinates progress display for batch runs
///
/// Shows one step bar per map for the most recent files, plus a single batch
/// bar once the file count exceeds what fits on screen.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    file_bars: Vec<ProgressBar>,
    file_states: Vec<FileState>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

static STEP_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "{{msg}} [{{bar:{PROGRESS_BAR_WIDTH}.green/white}}] {{prefix}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Maps: [{bar:40.green/white}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
            file_bars: Vec::new(),
            file_states: Vec::new(),
        }
    }

    /// Create the bars for a batch of `file_count` maps
    pub fn initialize(&mut self, file_count: usize) {
        if file_count > MAX_INDIVIDUAL_PROGRESS_BARS + 1 {
            let batch_bar = ProgressBar::new(file_count as u64);
            batch_bar.set_style(BATCH_STYLE.clone());
            self.batch_bar = Some(self.multi_progress.add(batch_bar));
        }

        for _ in 0..file_count.min(MAX_INDIVIDUAL_PROGRESS_BARS) {
            let pb = ProgressBar::new(0);
            pb.set_style(STEP_STYLE.clone());
            self.file_bars.push(self.multi_progress.add(pb));
        }
    }

    /// Configure the bar for a new map
    pub fn start_file(&mut self, index: usize, path: &Path, max_steps: usize) {
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        if index >= self.file_states.len() {
            self.file_states.resize(index + 1, FileState::default());
        }
        if let Some(state) = self.file_states.get_mut(index) {
            *state = FileState {
                name,
                step: 0,
                max_steps,
                outcome: None,
            };
        }
        self.update_bars();
    }

    /// Report the current step of a map
    pub fn update_step(&mut self, index: usize, step: usize) {
        if let Some(state) = self.file_states.get_mut(index) {
            state.step = step;
        }
        self.update_bars();
    }

    /// Mark a map as done with a short outcome text
    pub fn complete_file(&mut self, index: usize, outcome: &str) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
        }
        if let Some(state) = self.file_states.get_mut(index) {
            state.outcome = Some(outcome.to_string());
        }
        self.update_bars();
    }

    /// States of every map seen so far, by file index
    pub fn file_states(&self) -> &[FileState] {
        &self.file_states
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.finish_with_message("All maps processed");
        }
        let _ = self.multi_progress.clear();
    }

    // Shows the last N started maps
    fn update_bars(&self) {
        let active: Vec<&FileState> = self
            .file_states
            .iter()
            .filter(|state| !state.name.is_empty())
            .collect();
        let start_idx = active.len().saturating_sub(MAX_INDIVIDUAL_PROGRESS_BARS);
        let visible = active.get(start_idx..).unwrap_or(&[]);

        for (bar_idx, state) in visible.iter().enumerate() {
            if let Some(bar) = self.file_bars.get(bar_idx) {
                bar.set_length(state.max_steps as u64);
                match &state.outcome {
                    Some(outcome) => {
                        bar.set_position(state.max_steps as u64);
                        bar.set_message(format!("✓ {outcome}"));
                    }
                    None => {
                        bar.set_position(state.step as u64);
                        bar.set_message(format!("step {}", state.step));
                    }
                }
                bar.set_prefix(state.name.clone());
            }
        }

        for bar in self.file_bars.iter().skip(visible.len()) {
            bar.set_length(0);
            bar.set_position(0);
            bar.set_message(String::new());
            bar.set_prefix(String::new());
        }
    }
}
