//! The acquisition task: source → lines → records → ring.
//!
//! Runs on its own OS thread, independently of rendering. The loop never
//! holds the ring lock across I/O, backs off with a bounded sleep while the
//! device is quiet, and honors a stop request within one backoff interval so
//! the thread is always joinable.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, error, info};

use crate::reader::LineReader;
use crate::record::Schema;
use crate::ring::SharedRing;
use crate::source::ByteSource;

/// Lifecycle of the acquisition thread as observed by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionState {
    /// Actively reading (or backing off between quiet polls).
    Running,
    /// Exited cleanly after a stop request.
    Stopped,
    /// Terminated by a fatal source error; the last rendered frame stays up
    /// but no new data will arrive.
    Failed,
}

const STATE_RUNNING: u8 = 0;
const STATE_STOPPED: u8 = 1;
const STATE_FAILED: u8 = 2;

/// Counters exported by the producer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProducerStats {
    /// Records parsed and pushed into the ring.
    pub accepted: u64,
    /// Records rejected by the parser (malformed token or field count).
    pub rejected: u64,
    /// Lines dropped because they outgrew the line buffer.
    pub line_overflows: u64,
}

struct ProducerShared {
    stop: AtomicBool,
    state: AtomicU8,
    accepted: AtomicU64,
    rejected: AtomicU64,
    line_overflows: AtomicU64,
}

impl ProducerShared {
    fn new() -> Self {
        Self {
            stop: AtomicBool::new(false),
            state: AtomicU8::new(STATE_RUNNING),
            accepted: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            line_overflows: AtomicU64::new(0),
        }
    }

    fn set_state(&self, state: AcquisitionState) {
        let raw = match state {
            AcquisitionState::Running => STATE_RUNNING,
            AcquisitionState::Stopped => STATE_STOPPED,
            AcquisitionState::Failed => STATE_FAILED,
        };
        self.state.store(raw, Ordering::Release);
    }

    fn state(&self) -> AcquisitionState {
        match self.state.load(Ordering::Acquire) {
            STATE_STOPPED => AcquisitionState::Stopped,
            STATE_FAILED => AcquisitionState::Failed,
            _ => AcquisitionState::Running,
        }
    }
}

/// Handle to a running producer thread.
///
/// Dropping the handle requests a stop and joins the thread; shutdown
/// latency is bounded by the poll interval.
pub struct ProducerHandle {
    shared: Arc<ProducerShared>,
    thread: Option<JoinHandle<()>>,
}

impl ProducerHandle {
    /// Ask the loop to exit. Observed within one poll interval.
    pub fn stop(&self) {
        self.shared.stop.store(true, Ordering::Relaxed);
    }

    /// Wait for the thread to finish. Call [`ProducerHandle::stop`] first
    /// unless the producer already failed.
    pub fn join(&mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }

    pub fn state(&self) -> AcquisitionState {
        self.shared.state()
    }

    pub fn stats(&self) -> ProducerStats {
        ProducerStats {
            accepted: self.shared.accepted.load(Ordering::Relaxed),
            rejected: self.shared.rejected.load(Ordering::Relaxed),
            line_overflows: self.shared.line_overflows.load(Ordering::Relaxed),
        }
    }
}

impl Drop for ProducerHandle {
    fn drop(&mut self) {
        self.stop();
        self.join();
    }
}

/// Spawn the acquisition thread.
///
/// The thread drives `source` through a [`LineReader`], parses each line
/// against `schema`, and pushes accepted samples into `ring`. Malformed
/// records are counted and skipped; a fatal source error ends the loop and
/// leaves the handle in [`AcquisitionState::Failed`].
pub fn spawn<S: ByteSource + 'static>(
    source: S,
    schema: Schema,
    ring: SharedRing,
    poll_interval: Duration,
    line_capacity: usize,
) -> ProducerHandle {
    let shared = Arc::new(ProducerShared::new());
    let shared_thread = Arc::clone(&shared);
    let thread = thread::spawn(move || {
        run_loop(source, schema, ring, poll_interval, line_capacity, shared_thread);
    });
    ProducerHandle {
        shared,
        thread: Some(thread),
    }
}

fn run_loop<S: ByteSource>(
    source: S,
    schema: Schema,
    ring: SharedRing,
    poll_interval: Duration,
    line_capacity: usize,
    shared: Arc<ProducerShared>,
) {
    let mut reader = LineReader::new(source, line_capacity);
    info!(fields = schema.field_count(), "data acquisition started");

    while !shared.stop.load(Ordering::Relaxed) {
        match reader.poll_line() {
            Ok(Some(line)) => match schema.parse_record(&line) {
                Ok(sample) => {
                    ring.push(sample);
                    shared.accepted.fetch_add(1, Ordering::Relaxed);
                }
                Err(err) => {
                    shared.rejected.fetch_add(1, Ordering::Relaxed);
                    debug!(error = %err, line = line.as_str(), "record rejected");
                }
            },
            Ok(None) => thread::sleep(poll_interval),
            Err(err) => {
                error!(error = %err, "data acquisition stopped");
                shared
                    .line_overflows
                    .store(reader.overflow_count(), Ordering::Relaxed);
                shared.set_state(AcquisitionState::Failed);
                return;
            }
        }
        shared
            .line_overflows
            .store(reader.overflow_count(), Ordering::Relaxed);
    }

    shared.set_state(AcquisitionState::Stopped);
    info!("data acquisition stopped cleanly");
}
