use super::date_resolver::extract_date;
use super::destination::resolve_destination;
use super::transfer::TransferExecutor;
use super::worker_pool::{PoolReport, WorkerPool};
use crate::config::Config;
use crate::tools::{CommandRunner, MetadataBackend, MetadataExtractor, collect_files};
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use std::path::Path;
use std::time::{Duration, Instant};

/// 整批處理的統計
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

/// 依拍攝日期整理檔案
pub struct SortByDate<'a, B> {
    config: &'a Config,
    extractor: &'a MetadataExtractor<B>,
    transfer: TransferExecutor<'a>,
}

impl<'a, B: MetadataBackend> SortByDate<'a, B> {
    pub fn new(
        config: &'a Config,
        extractor: &'a MetadataExtractor<B>,
        runner: &'a dyn CommandRunner,
    ) -> Self {
        Self {
            config,
            extractor,
            transfer: TransferExecutor::new(config, runner),
        }
    }

    pub fn run(&self) -> BatchSummary {
        self.run_with_progress(new_progress_bar)
    }

    /// `progress_bar` 以檔案總數建立進度條
    pub fn run_with_progress<P>(&self, progress_bar: P) -> BatchSummary
    where
        P: FnOnce(u64) -> ProgressBar,
    {
        let start = Instant::now();

        let collected = collect_files(&self.config.input_path);
        let total = collected.total;
        info!("Estimated total files: {total}");

        let progress = progress_bar(total as u64);
        let pool = WorkerPool::new(self.config.workers, self.config.buffer);
        let PoolReport {
            succeeded, failed, ..
        } = pool.run(collected.paths, &progress, |_, path| self.process_file(path));
        progress.finish_and_clear();

        let elapsed = start.elapsed();
        info!("Processing finished. Total files: {total}, Elapsed time: {elapsed:?}");

        BatchSummary {
            total,
            succeeded,
            failed,
            elapsed,
        }
    }

    /// 單一檔案：擷取日期、計算目的地、搬移
    pub fn process_file(&self, path: &Path) -> Result<()> {
        let date = extract_date(self.extractor, &self.config.date_policy, path)?;
        let destination = resolve_destination(&self.config.output, &date, path)?;
        self.transfer.execute(path, &destination)
    }
}

fn new_progress_bar(total: u64) -> ProgressBar {
    let progress_bar = ProgressBar::new(total);
    let style = ProgressStyle::with_template(
        "{msg} [{bar:20.cyan/blue}] {pos}/{len} ({per_sec}, {elapsed_precise})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("#>-");
    progress_bar.set_style(style);
    progress_bar.set_message("Processing");
    progress_bar
}
