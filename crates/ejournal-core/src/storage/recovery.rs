//! Index recovery from entry blobs.
//!
//! Recovery runs as a bounded task group: at most one worker per CPU (and
//! never more workers than blobs) pulls blob paths from a shared queue and
//! reports each result to a single aggregator. The aggregator waits for every
//! result or for one batch-wide deadline, whichever comes first.
//!
//! Outcomes are kept apart: a blob that was read and failed is a
//! [`RecoveryOutcome::PartialFailure`]; a batch that ran out of time is
//! [`RecoveryOutcome::TimedOut`]. Neither yields an index.
//!
//! On timeout the aggregator raises a shared cancel flag. Workers stop taking
//! new blobs and discard anything they finish afterwards. A decrypt already in
//! progress is not interrupted; its detached worker thread runs it to
//! completion.

use std::fmt;
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::error::Result;
use crate::storage::types::Index;

/// Default wall-clock budget for a whole recovery batch.
pub const DEFAULT_RECOVERY_DEADLINE: Duration = Duration::from_secs(30);

/// Worker count used when the platform cannot report its parallelism.
const FALLBACK_WORKERS: usize = 4;

/// A blob that could not be read during recovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryFailure {
    pub path: PathBuf,
    pub reason: String,
}

impl fmt::Display for RecoveryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.reason)
    }
}

/// Result of a recovery batch.
#[derive(Debug)]
pub enum RecoveryOutcome {
    /// Every blob was read; the rebuilt index
    Recovered(Index),
    /// Every task reported, but at least one failed
    PartialFailure(Vec<RecoveryFailure>),
    /// The deadline elapsed before every task reported
    TimedOut { completed: usize, total: usize },
}

struct TaskReport {
    path: PathBuf,
    outcome: std::result::Result<(DateTime<Utc>, String), String>,
}

/// Read every blob in `paths` with `read`, concurrently, within `deadline`.
///
/// `read` maps one blob to its `(date, id)` index mapping.
pub fn recover_index<F>(paths: Vec<PathBuf>, deadline: Duration, read: F) -> RecoveryOutcome
where
    F: Fn(&Path) -> Result<(DateTime<Utc>, String)> + Send + Sync + 'static,
{
    let total = paths.len();
    if total == 0 {
        return RecoveryOutcome::Recovered(Index::new());
    }

    let started = Instant::now();
    let deadline_at = started + deadline;
    let queue = Arc::new(Mutex::new(paths));
    let cancelled = Arc::new(AtomicBool::new(false));
    let read = Arc::new(read);
    let (tx, rx) = mpsc::channel();

    let workers = thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(FALLBACK_WORKERS)
        .min(total);

    let mut spawned = 0;
    for n in 0..workers {
        let queue = Arc::clone(&queue);
        let cancelled = Arc::clone(&cancelled);
        let read = Arc::clone(&read);
        let tx = tx.clone();
        let builder = thread::Builder::new().name(format!("ejournal-recovery-{}", n));
        match builder.spawn(move || run_worker(&queue, &cancelled, read.as_ref(), &tx)) {
            Ok(_) => spawned += 1,
            Err(err) => {
                warn!(error = %err, "Failed to start recovery worker");
                break;
            }
        }
    }
    drop(tx);

    if spawned == 0 {
        let paths = queue.lock().map(|mut q| std::mem::take(&mut *q)).unwrap_or_default();
        return RecoveryOutcome::PartialFailure(
            paths
                .into_iter()
                .map(|path| RecoveryFailure {
                    path,
                    reason: "no recovery worker could be started".to_string(),
                })
                .collect(),
        );
    }

    let mut index = Index::new();
    let mut failures = Vec::new();
    let mut completed = 0;

    while completed < total {
        let remaining = deadline_at.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok(report) => {
                completed += 1;
                match report.outcome {
                    Ok((date, id)) => {
                        if let Some(displaced) = index.insert(date, id.clone()) {
                            warn!(%date, kept = %id, displaced = %displaced, "Two entries share a timestamp");
                        }
                    }
                    Err(reason) => {
                        warn!(path = %report.path.display(), error = %reason, "Failed to recover entry");
                        failures.push(RecoveryFailure {
                            path: report.path,
                            reason,
                        });
                    }
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                cancelled.store(true, Ordering::Release);
                warn!(completed, total, ?deadline, "Recovery timed out");
                return RecoveryOutcome::TimedOut { completed, total };
            }
            Err(RecvTimeoutError::Disconnected) => {
                // Workers exited without reporting; only possible if the queue lock was poisoned.
                failures.push(RecoveryFailure {
                    path: PathBuf::new(),
                    reason: format!("{} entries were never read", total - completed),
                });
                break;
            }
        }
    }

    if failures.is_empty() {
        info!(
            entries = index.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Recovered index from entry blobs"
        );
        RecoveryOutcome::Recovered(index)
    } else {
        RecoveryOutcome::PartialFailure(failures)
    }
}

fn run_worker<F>(
    queue: &Mutex<Vec<PathBuf>>,
    cancelled: &AtomicBool,
    read: &F,
    tx: &Sender<TaskReport>,
) where
    F: Fn(&Path) -> Result<(DateTime<Utc>, String)>,
{
    loop {
        if cancelled.load(Ordering::Acquire) {
            return;
        }

        let next = match queue.lock() {
            Ok(mut queue) => queue.pop(),
            Err(_) => return,
        };
        let Some(path) = next else {
            return;
        };

        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| read(&path))) {
            Ok(Ok(mapping)) => Ok(mapping),
            Ok(Err(err)) => Err(err.to_string()),
            Err(_) => Err("recovery task panicked".to_string()),
        };

        if cancelled.load(Ordering::Acquire) {
            return;
        }
        if tx.send(TaskReport { path, outcome }).is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JournalError;
    use chrono::TimeZone;

    fn date_for(n: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_600_000_000 + n, 0).unwrap()
    }

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    fn id_of(path: &Path) -> String {
        path.file_stem().unwrap().to_string_lossy().to_string()
    }

    #[test]
    fn test_empty_batch_recovers_empty_index() {
        let outcome = recover_index(Vec::new(), Duration::from_secs(1), |_| {
            unreachable!("no blobs to read")
        });

        assert!(matches!(outcome, RecoveryOutcome::Recovered(index) if index.is_empty()));
    }

    #[test]
    fn test_all_succeed() {
        let names: Vec<String> = (0..20).map(|n| format!("{}.cpt", n)).collect();
        let batch = names.iter().map(PathBuf::from).collect();

        let outcome = recover_index(batch, Duration::from_secs(5), |path| {
            let id = id_of(path);
            let n: i64 = id.parse().unwrap();
            Ok((date_for(n), id))
        });

        match outcome {
            RecoveryOutcome::Recovered(index) => {
                assert_eq!(index.len(), 20);
                assert_eq!(index.get(&date_for(7)), Some(&"7".to_string()));
            }
            other => panic!("expected recovered index, got {:?}", other),
        }
    }

    #[test]
    fn test_single_failure_fails_whole_batch() {
        let outcome = recover_index(
            paths(&["a.cpt", "bad.cpt", "c.cpt"]),
            Duration::from_secs(5),
            |path| {
                let id = id_of(path);
                if id == "bad" {
                    Err(JournalError::AuthenticationFailure)
                } else {
                    Ok((date_for(id.len() as i64), id))
                }
            },
        );

        match outcome {
            RecoveryOutcome::PartialFailure(failures) => {
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].path, PathBuf::from("bad.cpt"));
                assert!(failures[0].reason.contains("Authentication failed"));
            }
            other => panic!("expected partial failure, got {:?}", other),
        }
    }

    #[test]
    fn test_all_failures_are_aggregated() {
        let outcome = recover_index(
            paths(&["a.cpt", "b.cpt", "c.cpt"]),
            Duration::from_secs(5),
            |path| Err(JournalError::EntryNotFound(id_of(path))),
        );

        match outcome {
            RecoveryOutcome::PartialFailure(failures) => assert_eq!(failures.len(), 3),
            other => panic!("expected partial failure, got {:?}", other),
        }
    }

    #[test]
    fn test_panicking_task_is_a_failure_not_a_timeout() {
        let outcome = recover_index(paths(&["a.cpt"]), Duration::from_secs(5), |_| {
            panic!("boom")
        });

        match outcome {
            RecoveryOutcome::PartialFailure(failures) => {
                assert!(failures[0].reason.contains("panicked"));
            }
            other => panic!("expected partial failure, got {:?}", other),
        }
    }

    #[test]
    fn test_stuck_task_times_out() {
        let started = Instant::now();
        let outcome = recover_index(
            paths(&["a.cpt", "stuck.cpt", "c.cpt"]),
            Duration::from_millis(200),
            |path| {
                let id = id_of(path);
                if id == "stuck" {
                    thread::sleep(Duration::from_secs(10));
                }
                Ok((date_for(id.len() as i64), id))
            },
        );

        assert!(started.elapsed() < Duration::from_secs(5));
        match outcome {
            RecoveryOutcome::TimedOut { completed, total } => {
                assert_eq!(total, 3);
                assert!(completed < 3);
            }
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[test]
    fn test_timeout_wins_over_failures_already_seen() {
        let outcome = recover_index(
            paths(&["bad.cpt", "stuck.cpt"]),
            Duration::from_millis(200),
            |path| {
                if id_of(path) == "stuck" {
                    thread::sleep(Duration::from_secs(10));
                }
                Err(JournalError::AuthenticationFailure)
            },
        );

        assert!(matches!(outcome, RecoveryOutcome::TimedOut { total: 2, .. }));
    }
}
