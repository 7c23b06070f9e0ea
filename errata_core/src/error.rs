//! Composed error values
//!
//! A [`ComposedError`] is the populated payload produced by the composer: kind
//! name, optional code, final message, the unadorned original message, an
//! optional cause and the captured origin. Values are immutable once built and
//! cheap to clone; clones share identity (see [`ComposedError::is_same`]).

use crate::errno;
use crate::origin::Origin;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::sync::Arc;

/// Display name used for errors composed without a kind name
pub const UNNAMED_ERROR: &str = "Error";

// ============================================================================
// ERROR CODE
// ============================================================================

/// Error code carried by a composed error
///
/// Either a textual code (auto-extracted from a `"CODE, message"` prefix or
/// set by an initializer) or a number such as an HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorCode {
    Number(i64),
    Text(String),
}

impl ErrorCode {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ErrorCode::Text(text) => Some(text),
            ErrorCode::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            ErrorCode::Number(number) => Some(*number),
            ErrorCode::Text(_) => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Number(number) => write!(f, "{}", number),
            ErrorCode::Text(text) => write!(f, "{}", text),
        }
    }
}

impl From<&str> for ErrorCode {
    fn from(code: &str) -> Self {
        ErrorCode::Text(code.to_string())
    }
}

impl From<String> for ErrorCode {
    fn from(code: String) -> Self {
        ErrorCode::Text(code)
    }
}

impl From<i64> for ErrorCode {
    fn from(code: i64) -> Self {
        ErrorCode::Number(code)
    }
}

impl From<u16> for ErrorCode {
    fn from(code: u16) -> Self {
        ErrorCode::Number(i64::from(code))
    }
}

impl PartialEq<&str> for ErrorCode {
    fn eq(&self, other: &&str) -> bool {
        self.as_text() == Some(*other)
    }
}

impl PartialEq<i64> for ErrorCode {
    fn eq(&self, other: &i64) -> bool {
        self.as_number() == Some(*other)
    }
}

// ============================================================================
// CAUSE
// ============================================================================

/// The error that led to a composed error
///
/// Either another composed error (sharing identity with the original) or any
/// native Rust error.
#[derive(Clone)]
pub enum Cause {
    Composed(ComposedError),
    Native(Arc<dyn StdError + Send + Sync>),
}

impl Cause {
    /// Wrap a native error
    pub fn native<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Cause::Native(Arc::new(error))
    }

    /// Kind name used in cause-chain lines
    pub fn name(&self) -> &str {
        match self {
            Cause::Composed(error) => error.display_name(),
            Cause::Native(_) => UNNAMED_ERROR,
        }
    }

    pub fn message(&self) -> Cow<'_, str> {
        match self {
            Cause::Composed(error) => Cow::Borrowed(error.message()),
            Cause::Native(error) => Cow::Owned(error.to_string()),
        }
    }

    /// Message without cause-chain augmentation, when one is known
    pub fn message_original(&self) -> Cow<'_, str> {
        match self {
            Cause::Composed(error) => Cow::Borrowed(error.message_original()),
            Cause::Native(error) => Cow::Owned(error.to_string()),
        }
    }

    /// Code of the cause; `std::io::Error` causes report an errno-style name
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Cause::Composed(error) => error.code().cloned(),
            Cause::Native(error) => error
                .downcast_ref::<io::Error>()
                .and_then(|io_error| errno::code_for_io_kind(io_error.kind()))
                .map(ErrorCode::from),
        }
    }

    pub fn as_composed(&self) -> Option<&ComposedError> {
        match self {
            Cause::Composed(error) => Some(error),
            Cause::Native(_) => None,
        }
    }

    pub fn as_std(&self) -> &(dyn StdError + 'static) {
        match self {
            Cause::Composed(error) => error,
            Cause::Native(error) => &**error,
        }
    }
}

impl fmt::Debug for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Composed(error) => f.debug_tuple("Composed").field(error).finish(),
            Cause::Native(error) => f.debug_tuple("Native").field(&error.to_string()).finish(),
        }
    }
}

impl From<ComposedError> for Cause {
    fn from(error: ComposedError) -> Self {
        Cause::Composed(error)
    }
}

impl From<&ComposedError> for Cause {
    fn from(error: &ComposedError) -> Self {
        Cause::Composed(error.clone())
    }
}

impl From<io::Error> for Cause {
    fn from(error: io::Error) -> Self {
        Cause::native(error)
    }
}

impl From<Arc<dyn StdError + Send + Sync>> for Cause {
    fn from(error: Arc<dyn StdError + Send + Sync>) -> Self {
        Cause::Native(error)
    }
}

// ============================================================================
// SUB-ERRORS
// ============================================================================

/// Nested error collection, e.g. aggregated validation failures
#[derive(Debug, Clone)]
pub enum SubErrors {
    List(Vec<Cause>),
    /// Keyed sub-errors in insertion order
    Map(Vec<(String, Cause)>),
}

impl SubErrors {
    pub fn len(&self) -> usize {
        match self {
            SubErrors::List(items) => items.len(),
            SubErrors::Map(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate sub-errors in order, dropping keys
    pub fn iter(&self) -> Box<dyn Iterator<Item = &Cause> + '_> {
        match self {
            SubErrors::List(items) => Box::new(items.iter()),
            SubErrors::Map(items) => Box::new(items.iter().map(|(_, cause)| cause)),
        }
    }
}

// ============================================================================
// DRAFT (initializer view)
// ============================================================================

/// Mutable error state handed to kind initializers during composition
#[derive(Debug, Clone, Default)]
pub struct ErrorDraft {
    pub(crate) name: Option<String>,
    pub(crate) code: Option<ErrorCode>,
    pub(crate) status_code: Option<u16>,
    pub(crate) message: String,
    pub(crate) fields: Map<String, Value>,
    pub(crate) errors: Option<SubErrors>,
}

impl ErrorDraft {
    pub(crate) fn named(name: Option<&str>) -> Self {
        Self {
            name: name.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    pub fn code(&self) -> Option<&ErrorCode> {
        self.code.as_ref()
    }

    pub fn set_code(&mut self, code: impl Into<ErrorCode>) {
        self.code = Some(code.into());
    }

    /// Set an HTTP status that supersedes the classification table
    pub fn set_status_code(&mut self, status_code: u16) {
        self.status_code = Some(status_code);
    }

    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn set_errors(&mut self, errors: SubErrors) {
        self.errors = Some(errors);
    }
}

// ============================================================================
// COMPOSED ERROR
// ============================================================================

#[derive(Clone)]
pub(crate) struct ErrorInner {
    pub(crate) name: Option<String>,
    pub(crate) code: Option<ErrorCode>,
    pub(crate) status_code: Option<u16>,
    pub(crate) message: String,
    pub(crate) message_original: String,
    pub(crate) cause: Option<Cause>,
    pub(crate) attachments: Vec<Value>,
    pub(crate) fields: Map<String, Value>,
    pub(crate) errors: Option<SubErrors>,
    pub(crate) origin: Origin,
    pub(crate) stack: String,
}

/// One instantiated error value
#[derive(Clone)]
pub struct ComposedError {
    inner: Arc<ErrorInner>,
}

impl ComposedError {
    pub(crate) fn from_inner(inner: ErrorInner) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Kind name; `None` for the unnamed base form
    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    /// Kind name, or `"Error"` for the unnamed base form
    pub fn display_name(&self) -> &str {
        self.name().unwrap_or(UNNAMED_ERROR)
    }

    pub fn code(&self) -> Option<&ErrorCode> {
        self.inner.code.as_ref()
    }

    /// Explicit HTTP status override set by the kind initializer
    pub fn status_code(&self) -> Option<u16> {
        self.inner.status_code
    }

    pub fn message(&self) -> &str {
        &self.inner.message
    }

    /// Message before cause-chain augmentation
    pub fn message_original(&self) -> &str {
        &self.inner.message_original
    }

    pub fn cause(&self) -> Option<&Cause> {
        self.inner.cause.as_ref()
    }

    /// Walk the cause chain starting at the immediate cause
    pub fn causes(&self) -> impl Iterator<Item = &Cause> {
        let mut next = self.cause();
        std::iter::from_fn(move || {
            let current = next?;
            next = current.as_composed().and_then(|error| error.cause());
            Some(current)
        })
    }

    pub fn attachments(&self) -> &[Value] {
        &self.inner.attachments
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.inner.fields.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.inner.fields
    }

    pub fn errors(&self) -> Option<&SubErrors> {
        self.inner.errors.as_ref()
    }

    pub fn origin(&self) -> &Origin {
        &self.inner.origin
    }

    /// Stack text: header, cause line and origin frames
    pub fn stack(&self) -> &str {
        &self.inner.stack
    }

    /// True when both handles refer to the same constructed error
    pub fn is_same(&self, other: &ComposedError) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Attach a nested error collection
    ///
    /// Clones the payload when other handles share it, so the result may no
    /// longer be [`is_same`](Self::is_same) as those handles.
    pub fn with_errors(mut self, errors: SubErrors) -> Self {
        Arc::make_mut(&mut self.inner).errors = Some(errors);
        self
    }
}

impl fmt::Display for ComposedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl fmt::Debug for ComposedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposedError")
            .field("name", &self.display_name())
            .field("code", &self.code())
            .field("message", &self.message())
            .field("cause", &self.cause())
            .finish()
    }
}

impl StdError for ComposedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause().map(Cause::as_std)
    }
}
