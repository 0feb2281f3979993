use anyhow::Result;
use indicatif::ProgressBar;
use log::{debug, error};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Mutex, PoisonError};
use std::thread;

/// 工作池執行結果
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PoolReport {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// 固定數量 worker 共用一個有界佇列
///
/// 單一工作失敗只會被記錄與計數，不影響其他工作
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    workers: usize,
    buffer: usize,
}

struct Counters {
    succeeded: AtomicUsize,
    failed: AtomicUsize,
}

impl WorkerPool {
    #[must_use]
    pub fn new(workers: usize, buffer: usize) -> Self {
        Self {
            workers: workers.max(1),
            buffer: buffer.max(1),
        }
    }

    /// 將所有工作送入佇列並等待全部 worker 結束
    ///
    /// `handler` 收到 worker 編號（從 1 開始）與工作內容。
    /// 佇列滿時呼叫端會阻塞，送完後關閉佇列讓 worker 在清空後結束。
    pub fn run<J, F>(&self, jobs: Vec<J>, progress: &ProgressBar, handler: F) -> PoolReport
    where
        J: AsRef<Path> + Send,
        F: Fn(usize, &J) -> Result<()> + Sync,
    {
        let (sender, receiver) = mpsc::sync_channel::<J>(self.buffer);
        let receiver = Mutex::new(receiver);
        let counters = Counters {
            succeeded: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
        };

        thread::scope(|scope| {
            for id in 1..=self.workers {
                let receiver = &receiver;
                let counters = &counters;
                let handler = &handler;
                scope.spawn(move || worker(id, receiver, progress, counters, handler));
            }

            for job in jobs {
                if sender.send(job).is_err() {
                    error!("All workers exited, stopping dispatch");
                    break;
                }
            }
            drop(sender);
        });

        let succeeded = counters.succeeded.load(Ordering::SeqCst);
        let failed = counters.failed.load(Ordering::SeqCst);
        PoolReport {
            processed: succeeded + failed,
            succeeded,
            failed,
        }
    }
}

fn next_job<J>(receiver: &Mutex<Receiver<J>>) -> Option<J> {
    let receiver = receiver.lock().unwrap_or_else(PoisonError::into_inner);
    receiver.recv().ok()
}

fn worker<J, F>(
    id: usize,
    receiver: &Mutex<Receiver<J>>,
    progress: &ProgressBar,
    counters: &Counters,
    handler: &F,
) where
    J: AsRef<Path>,
    F: Fn(usize, &J) -> Result<()>,
{
    while let Some(job) = next_job(receiver) {
        let path = job.as_ref();
        debug!("Worker {id} handling {}", path.display());

        match panic::catch_unwind(AssertUnwindSafe(|| handler(id, &job))) {
            Ok(Ok(())) => {
                counters.succeeded.fetch_add(1, Ordering::SeqCst);
            }
            Ok(Err(e)) => {
                error!("Failed processing {}: {e:#}", path.display());
                counters.failed.fetch_add(1, Ordering::SeqCst);
            }
            Err(_) => {
                error!("Failed processing {}: worker {id} panicked", path.display());
                counters.failed.fetch_add(1, Ordering::SeqCst);
            }
        }

        progress.inc(1);
    }
    debug!("Worker {id} finished");
}
