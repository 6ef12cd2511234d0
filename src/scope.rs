//! The engine context object.
//!
//! All shared state lives in one explicit [`TelemetryScope`] owned by the
//! process entry point and borrowed by the host's redraw path; there are no
//! process-wide globals.

use crate::config::{ConfigError, ScopeConfig};
use crate::producer::{self, AcquisitionState, ProducerHandle, ProducerStats};
use crate::record::{Sample, Schema};
use crate::render::{self, DrawCommand, SurfaceSize};
use crate::ring::SharedRing;
use crate::source::ByteSource;

/// Owns the shared sample ring, the schema and the producer thread, and
/// exposes the two hooks a windowing host calls: `on_redraw` and the
/// data-generation counter.
pub struct TelemetryScope {
    config: ScopeConfig,
    schema: Schema,
    ring: SharedRing,
    producer: Option<ProducerHandle>,
}

impl TelemetryScope {
    /// Validate `config` and build an idle scope (no producer running yet).
    pub fn new(config: ScopeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let schema = Schema::new(config.field_count)?;
        let ring = SharedRing::new(config.capacity);
        Ok(Self {
            config,
            schema,
            ring,
            producer: None,
        })
    }

    /// Start acquiring from `source` on a background thread.
    ///
    /// This is a single-producer engine: a previously running producer is
    /// shut down first.
    pub fn start<S: ByteSource + 'static>(&mut self, source: S) {
        self.shutdown();
        self.producer = Some(producer::spawn(
            source,
            self.schema,
            self.ring.clone(),
            self.config.poll_interval(),
            self.config.line_capacity,
        ));
    }

    /// Stop the producer and wait for it. Latency is bounded by the poll
    /// interval; safe to call when nothing is running. The final state and
    /// counters remain observable afterwards.
    pub fn shutdown(&mut self) {
        if let Some(handle) = &mut self.producer {
            handle.stop();
            handle.join();
        }
    }

    /// Build the draw list for the current contents at `size`.
    ///
    /// Takes one snapshot under the lock, computes the frame range once, and
    /// maps every sample. Geometry always derives from the `size` passed in,
    /// so hosts stay correct across resizes without any cache invalidation.
    pub fn on_redraw(&self, size: SurfaceSize) -> Vec<DrawCommand> {
        let snapshot = self.ring.snapshot();
        render::render_frame(
            &snapshot,
            self.config.field_count,
            size,
            self.config.margin,
            self.config.theme,
        )
    }

    /// Monotone counter bumped once per accepted sample.
    pub fn data_generation(&self) -> u64 {
        self.ring.generation()
    }

    /// True when samples arrived after the `seen` generation; hosts use this
    /// as their new-data-available hook.
    pub fn has_new_data_since(&self, seen: u64) -> bool {
        self.ring.generation() != seen
    }

    /// A self-consistent copy of the buffered samples in insertion order.
    pub fn snapshot(&self) -> Vec<Sample> {
        self.ring.snapshot()
    }

    pub fn acquisition_state(&self) -> AcquisitionState {
        match &self.producer {
            Some(handle) => handle.state(),
            None => AcquisitionState::Stopped,
        }
    }

    pub fn stats(&self) -> ProducerStats {
        self.producer
            .as_ref()
            .map(|h| h.stats())
            .unwrap_or_default()
    }

    pub fn config(&self) -> &ScopeConfig {
        &self.config
    }

    pub fn schema(&self) -> Schema {
        self.schema
    }
}

impl Drop for TelemetryScope {
    fn drop(&mut self) {
        self.shutdown();
    }
}
