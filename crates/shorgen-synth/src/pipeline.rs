//! Parallel-batched emission.
//!
//! The round schedule is already fixed (see [`crate::schedule`]), so each
//! round's text is a pure function of its [`Round`] record. Rounds are cut
//! into consecutive batches of `P`; every round of a batch is rendered on a
//! blocking worker, which reports `(iteration, text)` on a channel. The
//! aggregator waits for the whole batch, then writes the texts in iteration
//! order, so the output is byte-identical to a sequential run whatever the
//! completion order.
//!
//! On a multi-thread runtime the batch writes run under
//! [`tokio::task::block_in_place`]; a current-thread runtime writes inline.

use std::any::Any;
use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::arithmetic::Synthesizer;
use crate::emitter::{BenchmarkEmitter, BenchmarkLayout, CircuitWriter, render_round};
use crate::error::{SynthError, SynthResult};
use crate::schedule::{Round, Schedule};
use crate::stats::RunStats;

/// Progress callback, called after each batch with `(rounds done, total)`.
pub type ProgressFn = Arc<dyn Fn(u32, u32) + Send + Sync>;

/// Default bounded wait per batch.
pub const DEFAULT_BATCH_TIMEOUT: Duration = Duration::from_secs(600);

type Report = (u32, Result<String, String>);

/// Per-round renderer run on the workers.
type RenderFn = fn(&mut Synthesizer, &BenchmarkLayout, &Round) -> String;

/// Batched multi-worker emitter.
#[derive(Clone)]
pub struct ParallelPipeline {
    workers: usize,
    batch_timeout: Duration,
    progress: Option<ProgressFn>,
}

impl std::fmt::Debug for ParallelPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParallelPipeline")
            .field("workers", &self.workers)
            .field("batch_timeout", &self.batch_timeout)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

impl ParallelPipeline {
    /// Pipeline with `workers` concurrent rounds per batch (at least one).
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
            batch_timeout: DEFAULT_BATCH_TIMEOUT,
            progress: None,
        }
    }

    /// Fail a batch that has not fully reported within `timeout`.
    pub fn with_batch_timeout(mut self, timeout: Duration) -> Self {
        self.batch_timeout = timeout;
        self
    }

    /// Report progress after each batch.
    pub fn with_progress(mut self, progress: impl Fn(u32, u32) + Send + Sync + 'static) -> Self {
        self.progress = Some(Arc::new(progress));
        self
    }

    /// Report progress through a shared callback.
    pub fn with_progress_fn(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Batch size `P`.
    pub const fn workers(&self) -> usize {
        self.workers
    }

    /// Write the circuit described by `emitter` and `schedule`.
    pub async fn run<W: Write>(
        &self,
        emitter: &BenchmarkEmitter,
        schedule: &Schedule,
        writer: W,
    ) -> SynthResult<RunStats> {
        self.run_with(emitter, schedule, writer, render_round).await
    }

    async fn run_with<W: Write>(
        &self,
        emitter: &BenchmarkEmitter,
        schedule: &Schedule,
        writer: W,
        render: RenderFn,
    ) -> SynthResult<RunStats> {
        let start = Instant::now();
        let layout = Arc::new(emitter.layout().clone());
        let modulus = emitter.params().modulus().clone();
        let d = emitter.synthesizer().max_denominator();
        // One builder per worker slot, handed back through the join handle so
        // QFT blocks stay cached across batches.
        let mut pool: Vec<Synthesizer> = (0..self.workers)
            .map(|_| Synthesizer::new(modulus.clone(), d))
            .collect();

        let mut out = CircuitWriter::new(writer);
        out.write_block(&emitter.header())?;

        let total = schedule.len() as u32;
        let mut done = 0u32;
        for batch in schedule.rounds().chunks(self.workers) {
            let (Some(first), Some(last)) = (batch.first(), batch.last()) else {
                continue;
            };
            info!("building iterations {} to {}", first.index, last.index);

            let (tx, mut rx) = mpsc::unbounded_channel::<Report>();
            let mut handles = Vec::with_capacity(batch.len());
            for round in batch {
                let mut synth = pool
                    .pop()
                    .unwrap_or_else(|| Synthesizer::new(modulus.clone(), d));
                let round = round.clone();
                let layout = Arc::clone(&layout);
                let tx = tx.clone();
                let index = round.index;
                let handle = tokio::task::spawn_blocking(move || {
                    let rendered = panic::catch_unwind(AssertUnwindSafe(|| {
                        render(&mut synth, &layout, &round)
                    }))
                    .map_err(|payload| panic_message(payload.as_ref()));
                    // The receiver is gone only once the aggregator has given up.
                    let _ = tx.send((round.index, rendered));
                    synth
                });
                handles.push((index, handle));
            }
            drop(tx);

            let mut texts: Vec<Option<String>> = vec![None; batch.len()];
            let drain = async {
                while let Some((index, rendered)) = rx.recv().await {
                    let text = rendered.map_err(|reason| SynthError::WorkerFailed {
                        iteration: index,
                        reason,
                    })?;
                    texts[(index - first.index) as usize] = Some(text);
                }
                Ok::<(), SynthError>(())
            };
            match tokio::time::timeout(self.batch_timeout, drain).await {
                Ok(result) => result?,
                Err(_) => {
                    return Err(SynthError::BatchTimeout {
                        batch_start: first.index,
                        waited_secs: self.batch_timeout.as_secs(),
                    });
                }
            }

            for (index, handle) in handles {
                let synth = handle.await.map_err(|e| SynthError::WorkerFailed {
                    iteration: index,
                    reason: e.to_string(),
                })?;
                pool.push(synth);
            }

            let texts = batch
                .iter()
                .zip(texts)
                .map(|(round, text)| text.ok_or_else(|| missing_report(round)))
                .collect::<SynthResult<Vec<String>>>()?;
            blocking_write(|| texts.iter().try_for_each(|text| out.write_block(text)))?;

            done += batch.len() as u32;
            debug!(done, total, "batch written");
            if let Some(progress) = &self.progress {
                progress(done, total);
            }
        }

        out.write_block(&emitter.footer())?;
        let mut stats = emitter.stats_template(schedule, self.workers);
        stats.instruction_lines = out.instructions();
        stats.bytes_written = out.bytes();
        out.finish()?;

        let hits: u64 = pool.iter().map(|synth| synth.qft_engine().hits()).sum();
        info!(
            rounds = stats.rounds,
            emitted = stats.emitted_rounds,
            bytes = stats.bytes_written,
            workers = self.workers,
            "circuit written"
        );
        Ok(stats
            .with_duration(start.elapsed())
            .with_metric("qft_cache_hits", hits))
    }
}

/// Run `write` on the current worker thread, handing the runtime's other
/// tasks to a different thread while it blocks.
fn blocking_write<T>(write: impl FnOnce() -> T) -> T {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(write)
        }
        _ => write(),
    }
}

fn missing_report(round: &Round) -> SynthError {
    SynthError::WorkerFailed {
        iteration: round.index,
        reason: "worker exited without reporting".into(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {message}")
    } else {
        "panicked".to_string()
    }
}
