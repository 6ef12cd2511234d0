//! Byte sources: the boundary between the engine and the device.
//!
//! A [`ByteSource`] delivers raw telemetry bytes without ever blocking for
//! long: a quiet device reports [`ReadStatus::WouldBlock`] so the producer
//! can back off instead of spinning, and real failures surface as
//! [`SourceError`] rather than being swallowed.

use std::io;
use std::io::Read;
use std::time::Duration;

/// Internal read timeout for serial ports. Short enough that the producer's
/// own backoff interval dominates the loop cadence.
const SERIAL_READ_TIMEOUT: Duration = Duration::from_millis(20);

/// Outcome of a non-blocking read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStatus {
    /// `n` bytes were placed at the start of the caller's buffer.
    Data(usize),
    /// The source currently has nothing to deliver; back off and retry.
    WouldBlock,
}

/// Fatal source failure. Transient empty reads are `ReadStatus::WouldBlock`,
/// never errors.
#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error("device i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("cannot open {device}: {source}")]
    Open {
        device: String,
        #[source]
        source: serialport::Error,
    },
}

/// Anything that can deliver raw telemetry bytes to the producer.
pub trait ByteSource: Send {
    /// Read up to `buf.len()` bytes. Must return promptly: either data,
    /// `WouldBlock`, or a fatal error.
    fn read(&mut self, buf: &mut [u8]) -> Result<ReadStatus, SourceError>;
}

/// Serial device source built on the `serialport` crate.
///
/// The port is opened with a short read timeout so that a quiet line maps to
/// `ReadStatus::WouldBlock` and the [`crate::producer`] backoff logic stays
/// effective.
pub struct SerialSource {
    port: Box<dyn serialport::SerialPort>,
}

impl SerialSource {
    /// Open `device` at `baud_rate`, 8N1.
    pub fn open(device: &str, baud_rate: u32) -> Result<Self, SourceError> {
        let port = serialport::new(device, baud_rate)
            .timeout(SERIAL_READ_TIMEOUT)
            .open()
            .map_err(|e| SourceError::Open {
                device: device.to_string(),
                source: e,
            })?;
        Ok(Self { port })
    }
}

impl ByteSource for SerialSource {
    fn read(&mut self, buf: &mut [u8]) -> Result<ReadStatus, SourceError> {
        match self.port.read(buf) {
            Ok(0) => Ok(ReadStatus::WouldBlock),
            Ok(n) => Ok(ReadStatus::Data(n)),
            Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(ReadStatus::WouldBlock),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(ReadStatus::WouldBlock),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(ReadStatus::WouldBlock),
            Err(e) => Err(SourceError::Io(e)),
        }
    }
}
