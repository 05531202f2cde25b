// file: src/pipeline/progress.rs
// description: progress tracking and statistics reporting for question answering
// reference: uses indicatif for progress bars and tracks retrieval metrics

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnswerStats {
    pub chunks_total: usize,
    pub chunks_embedded: usize,
    pub chunks_retrieved: usize,
    pub duration_ms: u64,
}

impl AnswerStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chunks_per_second(&self) -> f64 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        self.chunks_embedded as f64 / (self.duration_ms as f64 / 1000.0)
    }

    pub fn summary(&self) -> String {
        format!(
            "{} chunks, {} embedded, {} retrieved in {}ms ({:.1} chunks/s)",
            self.chunks_total.to_string().cyan(),
            self.chunks_embedded,
            self.chunks_retrieved.to_string().green(),
            self.duration_ms,
            self.chunks_per_second()
        )
    }
}

pub struct ProgressTracker {
    bar: ProgressBar,
    chunks_total: usize,
    chunks_embedded: AtomicUsize,
    start_time: Instant,
}

impl ProgressTracker {
    /// Tracker with a visible bar; hidden trackers still count.
    pub fn new(total_chunks: usize, visible: bool) -> Self {
        let bar = if visible {
            create_progress_bar(total_chunks as u64)
        } else {
            ProgressBar::hidden()
        };

        Self {
            bar,
            chunks_total: total_chunks,
            chunks_embedded: AtomicUsize::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn inc_embedded(&self, count: usize) {
        self.chunks_embedded.fetch_add(count, Ordering::SeqCst);
        self.bar.inc(count as u64);
    }

    pub fn finish(&self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }

    pub fn get_stats(&self, chunks_retrieved: usize) -> AnswerStats {
        AnswerStats {
            chunks_total: self.chunks_total,
            chunks_embedded: self.chunks_embedded.load(Ordering::SeqCst),
            chunks_retrieved,
            duration_ms: self.start_time.elapsed().as_millis() as u64,
        }
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

fn create_progress_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks embedded {msg}")
    {
        bar.set_style(style.progress_chars("█▓▒░"));
    }
    bar
}
