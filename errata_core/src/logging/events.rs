//! Diagnostic events emitted to sinks

use crate::classify::{self, LogLevel};
use crate::error::{ComposedError, ErrorCode};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One rendered error written to a diagnostic sink
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticEvent {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
    pub message: String,
    /// Full stack text as stored on the error
    pub text: String,
}

impl DiagnosticEvent {
    pub fn from_error(error: &ComposedError) -> Self {
        Self {
            timestamp: Utc::now(),
            level: classify::log_level(error),
            kind: error.display_name().to_string(),
            code: error.code().cloned(),
            message: error.message().to_string(),
            text: error.stack().to_string(),
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.level == LogLevel::Fatal
    }

    pub fn is_warning(&self) -> bool {
        self.level == LogLevel::Warning
    }

    /// Human-readable form
    pub fn format(&self) -> String {
        self.text.clone()
    }

    /// JSON line form for structured sinks
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
