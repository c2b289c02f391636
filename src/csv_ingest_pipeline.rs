//! Loading two row sources into their [`RowSet`]s.
//!
//! The concurrent path runs one reader per source, each streaming raw lines into its own
//! bounded queue, plus a pool of workers shared by both queues. A worker pops from the
//! left queue, then from the right one, parses what it got and inserts it into the
//! matching set under that set's own mutex.
//!
//! ```text
//!  left source ──reader──▶ [bounded queue] ──┐          ┌──▶ Mutex<RowSet> (left)
//!                                            ├─workers──┤
//!  right source ─reader──▶ [bounded queue] ──┘          └──▶ Mutex<RowSet> (right)
//! ```
//!
//! There is no wait/notify between readers and workers. Readers block for at most one
//! backoff interval on a full queue, workers sleep one backoff interval when both
//! queues are empty. Termination is detected through explicit completion flags, since a
//! single closed queue says nothing about the other lane. A shared failure flag cancels
//! everything, and a failed run never yields partial sets.

use std::io::{Read, Seek};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, SendTimeoutError, Sender};

use crate::config::DiffConfig;
use crate::csv::Csv;
use crate::csv_row_codec::CsvRowCodec;
use crate::error::RowDiffError;
use crate::row_set::RowSet;
use crate::thread_scope_strategy::{ScopedTask, ThreadScoper};
use crate::value_equivalence::ValueEquivalence;

pub(crate) const READER_LANES: usize = 2;

/// Flags shared by every reader and worker of one pipeline run.
#[derive(Debug, Default)]
pub(crate) struct PipelineState {
    failed: AtomicBool,
    failure: Mutex<Option<String>>,
}

impl PipelineState {
    /// Records the first failure and raises the flag.
    fn fail(&self, reason: String) {
        let mut failure = self.failure.lock().unwrap_or_else(PoisonError::into_inner);
        if failure.is_none() {
            *failure = Some(reason);
        }
        self.failed.store(true, Ordering::Release);
    }

    #[inline]
    fn is_failed(&self) -> bool {
        self.failed.load(Ordering::Acquire)
    }

    fn into_failure(self) -> Option<String> {
        if self.failed.into_inner() {
            Some(
                self.failure
                    .into_inner()
                    .unwrap_or_else(PoisonError::into_inner)
                    .unwrap_or_else(|| "unknown failure".to_string()),
            )
        } else {
            None
        }
    }
}

/// The consumer side of one lane.
struct Lane<'a> {
    receiver: Receiver<String>,
    complete: &'a AtomicBool,
    rows: &'a Mutex<RowSet>,
}

impl Lane<'_> {
    /// Pops, parses and inserts one line if one is queued.
    #[inline]
    fn try_ingest(&self, codec: &CsvRowCodec) -> bool {
        match self.receiver.try_recv() {
            Ok(line) => {
                let row = codec.parse_line(&line);
                self.rows
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(row);
                true
            }
            Err(_) => false,
        }
    }

    #[inline]
    fn is_drained(&self) -> bool {
        self.complete.load(Ordering::Acquire) && self.receiver.is_empty()
    }
}

fn read_lane<R: Read + Seek>(
    csv: &mut Csv<R>,
    sender: Sender<String>,
    complete: &AtomicBool,
    state: &PipelineState,
    backoff: Duration,
) {
    let (name, lines) = csv.named_lines();
    let _span = tracing::debug_span!("reader", source = %name).entered();
    let lines = match lines {
        Ok(lines) => lines,
        Err(e) => {
            state.fail(format!("could not read source `{}`: {}", name, e));
            complete.store(true, Ordering::Release);
            return;
        }
    };

    let mut lines_read: u64 = 0;
    for line in lines {
        let mut pending = match line {
            Ok(line) if line.is_empty() => continue,
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(source = %name, lines_read, error = %e, "reader failed");
                state.fail(format!("could not read source `{}`: {}", name, e));
                complete.store(true, Ordering::Release);
                return;
            }
        };
        loop {
            match sender.send_timeout(pending, backoff) {
                Ok(()) => break,
                Err(SendTimeoutError::Timeout(line)) => {
                    if state.is_failed() {
                        complete.store(true, Ordering::Release);
                        return;
                    }
                    pending = line;
                }
                // every worker is gone, which only happens after a failure
                Err(SendTimeoutError::Disconnected(_)) => {
                    complete.store(true, Ordering::Release);
                    return;
                }
            }
        }
        lines_read += 1;
    }

    tracing::trace!(lines_read, "reader complete");
    complete.store(true, Ordering::Release);
}

fn run_worker(
    worker: usize,
    lanes: &[Lane<'_>; READER_LANES],
    codec: &CsvRowCodec,
    state: &PipelineState,
    backoff: Duration,
) {
    let _span = tracing::trace_span!("worker", worker).entered();
    let mut rows_parsed: u64 = 0;
    loop {
        let mut work_done = false;
        for lane in lanes.iter() {
            if lane.try_ingest(codec) {
                work_done = true;
                rows_parsed += 1;
            }
        }

        if state.is_failed() {
            break;
        }
        if !work_done {
            if lanes.iter().all(Lane::is_drained) {
                break;
            }
            thread::sleep(backoff);
        }
    }
    tracing::trace!(rows_parsed, "worker exited");
}

/// Wraps a task so that a panic raises the failure flag instead of unwinding into the
/// scope.
fn guarded<'env, F>(state: &'env PipelineState, what: String, task: F) -> ScopedTask<'env>
where
    F: FnOnce() + Send + 'env,
{
    Box::new(move || {
        if panic::catch_unwind(AssertUnwindSafe(task)).is_err() {
            state.fail(format!("{} panicked", what));
        }
    })
}

/// Loads both sources through the reader/worker pipeline.
pub(crate) fn ingest_concurrent<R, T>(
    scoper: &T,
    config: &DiffConfig,
    left: &mut Csv<R>,
    right: &mut Csv<R>,
) -> Result<(RowSet, RowSet), RowDiffError>
where
    R: Read + Seek + Send,
    T: ThreadScoper,
{
    let codec = config.codec();
    let equivalence = config.equivalence();
    let backoff = config.backoff;

    let (sender_left, receiver_left) = bounded(config.queue_capacity);
    let (sender_right, receiver_right) = bounded(config.queue_capacity);
    let rows_left = Mutex::new(RowSet::new(equivalence));
    let rows_right = Mutex::new(RowSet::new(equivalence));
    let left_complete = AtomicBool::new(false);
    let right_complete = AtomicBool::new(false);
    let state = PipelineState::default();

    tracing::debug!(
        workers = config.worker_threads,
        queue_capacity = config.queue_capacity,
        "starting concurrent ingestion"
    );

    {
        let state = &state;
        let codec = &codec;
        let left_name = left.name().to_string();
        let right_name = right.name().to_string();
        let mut tasks: Vec<ScopedTask<'_>> =
            Vec::with_capacity(config.worker_threads + READER_LANES);

        let left_complete_ref = &left_complete;
        tasks.push(guarded(state, format!("reader for `{}`", left_name), move || {
            read_lane(left, sender_left, left_complete_ref, state, backoff)
        }));
        let right_complete_ref = &right_complete;
        tasks.push(guarded(state, format!("reader for `{}`", right_name), move || {
            read_lane(right, sender_right, right_complete_ref, state, backoff)
        }));

        for worker in 0..config.worker_threads {
            let lanes = [
                Lane {
                    receiver: receiver_left.clone(),
                    complete: &left_complete,
                    rows: &rows_left,
                },
                Lane {
                    receiver: receiver_right.clone(),
                    complete: &right_complete,
                    rows: &rows_right,
                },
            ];
            tasks.push(guarded(state, format!("worker {}", worker), move || {
                run_worker(worker, &lanes, codec, state, backoff)
            }));
        }
        drop(receiver_left);
        drop(receiver_right);

        scoper.scope_all(tasks)?;
    }

    if let Some(reason) = state.into_failure() {
        tracing::warn!(%reason, "concurrent ingestion failed, discarding partial rows");
        return Err(RowDiffError::PipelineFailure { reason });
    }

    Ok((
        rows_left
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner),
        rows_right
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner),
    ))
}

/// Reads, parses and inserts one source on the calling thread.
pub(crate) fn load_sequential<R: Read + Seek>(
    csv: &mut Csv<R>,
    codec: &CsvRowCodec,
    equivalence: ValueEquivalence,
) -> Result<RowSet, RowDiffError> {
    let (name, lines) = csv.named_lines();
    let _span = tracing::debug_span!("sequential_load", source = %name).entered();
    let unavailable = |error| RowDiffError::SourceUnavailable {
        source_name: name.to_string(),
        error,
    };

    let mut rows = RowSet::new(equivalence);
    for line in lines.map_err(unavailable)? {
        let line = line.map_err(unavailable)?;
        if line.is_empty() {
            continue;
        }
        rows.insert(codec.parse_line(&line));
    }
    Ok(rows)
}
