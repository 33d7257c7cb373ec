// Worker pool for pure pairwise distance evaluation.

use rayon::prelude::*;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use std::time::Instant;
use crate::config::ProcessorConfig;
use crate::error::Result;

/// Evaluates batches of independent `(i, j)` tasks on a bounded thread pool.
///
/// Results always come back in input order, so a batch is deterministic no
/// matter how the work was scheduled.
pub struct PairEvaluator {
    thread_pool: rayon::ThreadPool,
    verbose: bool,
}

impl PairEvaluator {
    pub fn new(processor_config: &ProcessorConfig, verbose: bool) -> Result<Self> {
        let threads = processor_config.thread_count();
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|idx| format!("happie-worker-{}", idx))
            .build()?;
        debug!("Created distance worker pool with {} threads", threads);

        Ok(Self { thread_pool, verbose })
    }

    pub fn threads(&self) -> usize {
        self.thread_pool.current_num_threads()
    }

    /// Runs `op` inside the pool, so nested rayon iterators use its threads.
    pub fn install<R, F>(&self, op: F) -> R
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        self.thread_pool.install(op)
    }

    /// Evaluates `f` for every pair; `label` names the batch in logs and progress output.
    pub fn evaluate<F>(&self, pairs: &[(usize, usize)], label: &str, f: F) -> Vec<f64>
    where
        F: Fn(usize, usize) -> f64 + Sync + Send,
    {
        let start_time = Instant::now();
        let progress = progress_bar(pairs.len() as u64, label, self.verbose);

        let results: Vec<f64> = self.thread_pool.install(|| {
            pairs
                .par_iter()
                .map(|&(i, j)| {
                    let value = f(i, j);
                    progress.inc(1);
                    value
                })
                .collect()
        });

        progress.finish_and_clear();
        info!(
            "Computed {} {} in {:.2?} on {} threads",
            results.len(),
            label,
            start_time.elapsed(),
            self.threads()
        );
        results
    }
}

/// Progress bar for `len` steps, hidden unless `verbose`.
pub fn progress_bar(len: u64, label: &str, verbose: bool) -> ProgressBar {
    if !verbose {
        return ProgressBar::hidden();
    }
    let progress = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} {msg}: [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
    {
        progress.set_style(style);
    }
    progress.set_message(label.to_string());
    progress
}
