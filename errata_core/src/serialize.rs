//! Transport shape for errors crossing a process boundary

use crate::error::{Cause, ComposedError, ErrorCode};
use serde::{Deserialize, Serialize};

/// JSON-compatible error record
///
/// `error` is the message without cause-chain augmentation; `errors` lists
/// the same for each sub-error and is omitted when there are none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedError {
    pub error: String,
    pub error_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ErrorCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

pub fn serialize(error: &ComposedError) -> SerializedError {
    let children: Vec<String> = error
        .errors()
        .map(|errors| {
            errors
                .iter()
                .map(|child| child.message_original().into_owned())
                .collect()
        })
        .unwrap_or_default();

    SerializedError {
        error: error.message_original().to_string(),
        error_name: error.display_name().to_string(),
        error_code: error.code().cloned(),
        errors: (!children.is_empty()).then_some(children),
    }
}

/// Serialize any cause; native errors report their display text
pub fn serialize_cause(cause: &Cause) -> SerializedError {
    match cause {
        Cause::Composed(error) => serialize(error),
        Cause::Native(_) => SerializedError {
            error: cause.message_original().into_owned(),
            error_name: cause.name().to_string(),
            error_code: cause.code(),
            errors: None,
        },
    }
}

impl From<&ComposedError> for SerializedError {
    fn from(error: &ComposedError) -> Self {
        serialize(error)
    }
}
