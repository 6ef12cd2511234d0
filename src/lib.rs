//! serialscope crate root: re-exports and module wiring.
//!
//! A rolling-graph engine for line-oriented CSV telemetry
//! (`timestamp,v1,...,vN` per line) read from a serial device:
//! - `source`: the byte-source boundary and the serialport-backed device
//! - `reader`: bounded line assembly over partial reads
//! - `record`: the fixed-schema sample format and strict CSV parsing
//! - `ring`: the fixed-capacity overwrite-on-full sample history
//! - `range`: per-frame min/max axis extents
//! - `render`: snapshot → display-agnostic draw commands
//! - `producer`: the acquisition thread driving source → ring
//! - `scope`: the context object tying it all together
//! - `config`: startup configuration and validation
//!
//! The engine never owns a window handle; a host windowing loop calls
//! [`TelemetryScope::on_redraw`] with the current surface size and paints
//! the returned commands. The bundled `serialscope` binary (feature
//! `host`) is one such host built on eframe.

pub mod config;
pub mod producer;
pub mod range;
pub mod reader;
pub mod record;
pub mod render;
pub mod ring;
pub mod scope;
pub mod source;

// Public re-exports for a compact external API
pub use config::{ConfigError, ScopeConfig, Theme, MAX_FIELDS};
pub use producer::{AcquisitionState, ProducerStats};
pub use range::FrameRange;
pub use reader::LineReader;
pub use record::{ParseError, Sample, Schema};
pub use render::{field_color, DrawCommand, Rgb, SurfaceSize, PALETTE};
pub use ring::{SampleRing, SharedRing};
pub use scope::TelemetryScope;
pub use source::{ByteSource, ReadStatus, SerialSource, SourceError};
