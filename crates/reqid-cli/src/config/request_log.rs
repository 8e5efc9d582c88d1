//! Request log destination.

use std::sync::Arc;

use clap::ValueEnum;
use reqid::{LogSink, TracingSink, WriterSink};
use serde::{Deserialize, Serialize};
use strum::Display;

/// Where request-scoped log lines are written.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RequestLogTarget {
    /// Plain lines on standard output.
    #[default]
    Stdout,
    /// Plain lines on standard error.
    Stderr,
    /// `tracing` events, filtered and formatted like the rest of the logs.
    Tracing,
}

impl RequestLogTarget {
    /// Builds the sink for this destination.
    pub fn into_sink(self) -> Arc<dyn LogSink> {
        match self {
            Self::Stdout => Arc::new(WriterSink::stdout()),
            Self::Stderr => Arc::new(WriterSink::stderr()),
            Self::Tracing => Arc::new(TracingSink),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_flag_values() {
        assert_eq!(RequestLogTarget::Stdout.to_string(), "stdout");
        assert_eq!(RequestLogTarget::Stderr.to_string(), "stderr");
        assert_eq!(RequestLogTarget::Tracing.to_string(), "tracing");

        for target in RequestLogTarget::value_variants() {
            let parsed = RequestLogTarget::from_str(&target.to_string(), false).unwrap();
            assert_eq!(parsed, *target);
        }
    }
}
