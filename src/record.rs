//! Telemetry records: the fixed-schema CSV sample format.
//!
//! One record per line: a timestamp token followed by exactly
//! `field_count` value tokens, comma separated. Parsing is strict by
//! design — a record with a bad token or the wrong token count is rejected
//! wholesale, so a glitched line never plots as a silent `0.0`.

use crate::config::{ConfigError, MAX_FIELDS};

/// One parsed telemetry record: a timestamp plus one value per schema field.
///
/// Timestamps are unit-agnostic source units (commonly milliseconds).
/// Samples are immutable once constructed; the ring evicts them whole.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub timestamp: f64,
    pub values: Vec<f64>,
}

/// Why a record was rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected 1 timestamp + {expected} value tokens, got {got}")]
    FieldCount { expected: usize, got: usize },
    #[error("bad timestamp token {token:?}")]
    BadTimestamp { token: String },
    #[error("bad value token {token:?} in field {field}")]
    BadValue { field: usize, token: String },
}

/// The fixed expected field count for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    field_count: usize,
}

impl Schema {
    /// A schema for `field_count` value fields, `1..=MAX_FIELDS`.
    pub fn new(field_count: usize) -> Result<Self, ConfigError> {
        if field_count < 1 || field_count > MAX_FIELDS {
            return Err(ConfigError::FieldCount(field_count));
        }
        Ok(Self { field_count })
    }

    pub fn field_count(&self) -> usize {
        self.field_count
    }

    /// Parse one CSV record against this schema.
    ///
    /// Tokens are trimmed before parsing. Non-finite numbers (`inf`, `NaN`)
    /// are rejected like any other bad token: they would poison the axis
    /// ranges.
    pub fn parse_record(&self, line: &str) -> Result<Sample, ParseError> {
        let tokens: Vec<&str> = line.split(',').map(str::trim).collect();
        if tokens.len() != self.field_count + 1 {
            return Err(ParseError::FieldCount {
                expected: self.field_count,
                got: tokens.len(),
            });
        }

        let timestamp = parse_finite(tokens[0]).ok_or_else(|| ParseError::BadTimestamp {
            token: tokens[0].to_string(),
        })?;

        let mut values = Vec::with_capacity(self.field_count);
        for (field, token) in tokens[1..].iter().enumerate() {
            let v = parse_finite(token).ok_or_else(|| ParseError::BadValue {
                field,
                token: token.to_string(),
            })?;
            values.push(v);
        }

        Ok(Sample { timestamp, values })
    }
}

fn parse_finite(token: &str) -> Option<f64> {
    match token.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => None,
    }
}
