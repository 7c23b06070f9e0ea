//! Kind classification tables
//!
//! Single source of truth for how each predefined kind maps to an HTTP status
//! code and a log level. Unknown kinds fall back to `500` and `debug`.

use crate::error::{Cause, ComposedError};
use crate::kinds;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Status code for kinds without a table entry
pub const DEFAULT_STATUS_CODE: u16 = 500;

// ============================================================================
// CLASSIFICATION TYPES
// ============================================================================

/// Log severity of an error kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Fatal = 0,
    Warning = 1,
    Debug = 2,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Fatal => "fatal",
            LogLevel::Warning => "warning",
            LogLevel::Debug => "debug",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "fatal" => Some(LogLevel::Fatal),
            "warning" => Some(LogLevel::Warning),
            "debug" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complete classification metadata for a kind
#[derive(Debug, Clone)]
pub struct KindMetadata {
    pub name: &'static str,
    pub status_code: u16,
    pub log_level: LogLevel,
    pub description: &'static str,
}

impl KindMetadata {
    pub fn new(
        name: &'static str,
        status_code: u16,
        log_level: LogLevel,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            status_code,
            log_level,
            description,
        }
    }
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

static KIND_REGISTRY: OnceLock<HashMap<&'static str, KindMetadata>> = OnceLock::new();

fn get_kind_registry() -> &'static HashMap<&'static str, KindMetadata> {
    KIND_REGISTRY.get_or_init(|| {
        use LogLevel::{Debug, Fatal, Warning};

        let entries = [
            KindMetadata::new(kinds::MISSING_PARAMETER, 500, Debug, "Required parameter missing"),
            KindMetadata::new(kinds::INVALID_PARAMETER, 500, Debug, "Parameter value is not valid"),
            KindMetadata::new(kinds::IO, 500, Warning, "Generic I/O failure"),
            KindMetadata::new(kinds::DIRECTORY_NOT_FOUND, 404, Warning, "Directory not found"),
            KindMetadata::new(kinds::FILE_NOT_FOUND, 404, Warning, "File not found"),
            KindMetadata::new(kinds::FILE_LOAD, 500, Warning, "File exists but cannot be loaded"),
            KindMetadata::new(kinds::URI, 404, Warning, "Malformed or unknown URI"),
            KindMetadata::new(kinds::HTTP, 500, Debug, "HTTP status failure"),
            KindMetadata::new(kinds::ARGUMENT, 500, Debug, "Generic argument error"),
            KindMetadata::new(kinds::AUTHENTICATION, 401, Debug, "Authentication failed"),
            KindMetadata::new(kinds::NOT_FOUND, 404, Warning, "Generic not found error"),
            KindMetadata::new(kinds::RANGE, 416, Debug, "Value or range out of bounds"),
            KindMetadata::new(kinds::REFERENCE, 500, Debug, "Invalid reference"),
            KindMetadata::new(kinds::TYPE, 500, Debug, "Unexpected type"),
            KindMetadata::new(kinds::VALIDATION, 422, Debug, "Validation failed"),
            KindMetadata::new(kinds::FATAL, 500, Fatal, "Unrecoverable failure"),
            KindMetadata::new(kinds::CONNECTION, 504, Fatal, "Upstream connection failed"),
            KindMetadata::new(kinds::RATE_LIMITER, 429, Debug, "Rate limit exceeded"),
            KindMetadata::new(kinds::RESOURCE_BUSY, 503, Warning, "Resource busy or locked"),
            KindMetadata::new(kinds::FORBIDDEN, 403, Debug, "Access forbidden"),
            KindMetadata::new(kinds::NOT_ALLOWED, 405, Debug, "Operation not allowed"),
            KindMetadata::new(kinds::NOT_ACCEPTABLE, 406, Debug, "Representation not acceptable"),
            KindMetadata::new(kinds::TIMEOUT, 408, Warning, "Operation timed out"),
            KindMetadata::new(kinds::UNSUPPORTED, 415, Debug, "Unsupported media or operation"),
            KindMetadata::new(kinds::TOO_LARGE, 413, Debug, "Payload too large"),
            KindMetadata::new(kinds::CONFLICT, 409, Debug, "State conflict"),
            KindMetadata::new(kinds::PRECONDITION, 412, Debug, "Precondition failed"),
            KindMetadata::new(kinds::URI_TOO_LONG, 414, Debug, "URI too long"),
        ];

        entries
            .into_iter()
            .map(|metadata| (metadata.name, metadata))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION TARGETS
// ============================================================================

/// Anything that can be classified: an error value or a bare kind name
pub trait Classify {
    fn kind_name(&self) -> Option<&str>;

    /// Instance-level HTTP status that supersedes the table
    fn status_override(&self) -> Option<u16> {
        None
    }
}

impl Classify for str {
    fn kind_name(&self) -> Option<&str> {
        Some(self)
    }
}

impl Classify for String {
    fn kind_name(&self) -> Option<&str> {
        Some(self)
    }
}

impl Classify for ComposedError {
    fn kind_name(&self) -> Option<&str> {
        self.name()
    }

    fn status_override(&self) -> Option<u16> {
        self.status_code()
    }
}

impl Classify for Cause {
    fn kind_name(&self) -> Option<&str> {
        match self {
            Cause::Composed(error) => error.kind_name(),
            Cause::Native(_) => None,
        }
    }

    fn status_override(&self) -> Option<u16> {
        self.as_composed().and_then(ComposedError::status_code)
    }
}

// ============================================================================
// LOOKUP FUNCTIONS
// ============================================================================

pub fn get_kind_metadata(name: &str) -> Option<&'static KindMetadata> {
    get_kind_registry().get(name)
}

/// All known kinds sorted by name
pub fn all_kind_metadata() -> Vec<&'static KindMetadata> {
    let mut all: Vec<_> = get_kind_registry().values().collect();
    all.sort_by_key(|metadata| metadata.name);
    all
}

/// HTTP status code for an error or kind name
pub fn status_code<T: Classify + ?Sized>(target: &T) -> u16 {
    if let Some(status) = target.status_override() {
        return status;
    }
    target
        .kind_name()
        .and_then(get_kind_metadata)
        .map(|metadata| metadata.status_code)
        .unwrap_or(DEFAULT_STATUS_CODE)
}

/// Log level for an error or kind name
pub fn log_level<T: Classify + ?Sized>(target: &T) -> LogLevel {
    target
        .kind_name()
        .and_then(get_kind_metadata)
        .map(|metadata| metadata.log_level)
        .unwrap_or(LogLevel::Debug)
}

/// Get human-readable description for a kind
pub fn get_description(name: &str) -> &'static str {
    get_kind_metadata(name)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error kind")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_by_name() {
        assert_eq!(status_code(kinds::AUTHENTICATION), 401);
        assert_eq!(status_code(kinds::FORBIDDEN), 403);
        for name in [
            kinds::NOT_FOUND,
            kinds::FILE_NOT_FOUND,
            kinds::DIRECTORY_NOT_FOUND,
            kinds::URI,
        ] {
            assert_eq!(status_code(name), 404, "{}", name);
        }
        assert_eq!(status_code(kinds::RATE_LIMITER), 429);
        assert_eq!(status_code(kinds::FATAL), 500);
        assert_eq!(status_code(kinds::RESOURCE_BUSY), 503);
        assert_eq!(status_code(kinds::CONNECTION), 504);
        assert_eq!(status_code(kinds::CONFLICT), 409);
        assert_eq!(status_code("SomethingElseError"), DEFAULT_STATUS_CODE);
    }

    #[test]
    fn test_log_levels_by_name() {
        assert_eq!(log_level(kinds::FATAL), LogLevel::Fatal);
        assert_eq!(log_level(kinds::CONNECTION), LogLevel::Fatal);
        for name in [
            kinds::IO,
            kinds::DIRECTORY_NOT_FOUND,
            kinds::FILE_NOT_FOUND,
            kinds::FILE_LOAD,
            kinds::URI,
            kinds::NOT_FOUND,
            kinds::RESOURCE_BUSY,
            kinds::TIMEOUT,
        ] {
            assert_eq!(log_level(name), LogLevel::Warning, "{}", name);
        }
        assert_eq!(log_level(kinds::VALIDATION), LogLevel::Debug);
        assert_eq!(log_level("Unknown"), LogLevel::Debug);
    }

    #[test]
    fn test_every_catalog_kind_has_metadata() {
        for name in kinds::ALL {
            assert!(get_kind_metadata(name).is_some(), "{} missing", name);
        }
        assert_eq!(all_kind_metadata().len(), kinds::ALL.len());
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("warning"), Some(LogLevel::Warning));
        assert_eq!(LogLevel::from_str("info"), None);
        assert_eq!(
            serde_json::to_string(&LogLevel::Fatal).unwrap(),
            "\"fatal\""
        );
    }

    #[test]
    fn test_description_fallback() {
        assert_eq!(get_description(kinds::TIMEOUT), "Operation timed out");
        assert_eq!(get_description("Nope"), "Unknown error kind");
    }
}
