use indicatif::{ProgressBar, ProgressStyle};

/// Optional terminal progress bar over the cells of a generation.
pub struct GenerationProgress {
    progress_bar: ProgressBar,
}

impl GenerationProgress {
    /// A hidden bar is used when `visible` is false so callers never branch.
    pub fn new(cells_to_collapse: usize, visible: bool) -> Self {
        if !visible {
            return Self {
                progress_bar: ProgressBar::hidden(),
            };
        }

        let pb = ProgressBar::new(cells_to_collapse as u64);
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} cells",
        ) {
            pb.set_style(style.progress_chars("##-"));
        }
        Self { progress_bar: pb }
    }

    /// Records one collapsed cell.
    pub fn increment(&self) {
        self.progress_bar.inc(1);
    }

    /// Cells recorded so far.
    pub fn position(&self) -> u64 {
        self.progress_bar.position()
    }

    /// Clears the bar from the terminal.
    pub fn finish(self) {
        self.progress_bar.finish_and_clear();
    }
}
