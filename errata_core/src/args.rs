//! Typed composer arguments
//!
//! The composer consumes an ordered list of [`Arg`] values left to right: an
//! optional leading cause, format text with interpolation values, attachment
//! objects and an optional trailing initializer.

use crate::error::{Cause, ComposedError, ErrorDraft};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Kind-specific constructor logic run against the error being composed
///
/// Receives the remaining positional arguments after the cause has been
/// consumed and the initializer itself removed.
#[derive(Clone)]
pub struct Initializer(Arc<dyn Fn(&mut ErrorDraft, &[Arg]) + Send + Sync>);

impl Initializer {
    pub fn new<F>(init: F) -> Self
    where
        F: Fn(&mut ErrorDraft, &[Arg]) + Send + Sync + 'static,
    {
        Self(Arc::new(init))
    }

    /// Initializer that uses its first argument verbatim as the message
    pub fn verbatim() -> Self {
        Self::new(|draft, args| {
            let message = args.first().map(Arg::to_text).unwrap_or_default();
            draft.set_message(message);
        })
    }

    pub fn apply(&self, draft: &mut ErrorDraft, args: &[Arg]) {
        (self.0)(draft, args)
    }
}

impl fmt::Debug for Initializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Initializer(..)")
    }
}

/// One composer argument
#[derive(Debug, Clone)]
pub enum Arg {
    Cause(Cause),
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Structured object; extracted as an attachment when formatting
    Object(Value),
    Init(Initializer),
    /// Drop this many additional origin frames beyond the internal ones
    Skip(usize),
}

impl Arg {
    /// Serialize any value into an attachment argument
    pub fn attachment<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => Arg::Object(value),
            Err(e) => Arg::Text(format!("[unserializable attachment: {}]", e)),
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Arg::Object(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Arg::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Integer value of the argument, parsing text when needed
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Arg::Int(value) => Some(*value),
            Arg::Float(value) if value.fract() == 0.0 && value.is_finite() => Some(*value as i64),
            Arg::Text(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    /// Text coercion used for code matching and `%s`
    pub fn to_text(&self) -> String {
        match self {
            Arg::Cause(cause) => format!("{}: {}", cause.name(), cause.message()),
            Arg::Text(text) => text.clone(),
            Arg::Int(value) => value.to_string(),
            Arg::Float(value) => crate::format::number_to_text(*value),
            Arg::Bool(value) => value.to_string(),
            Arg::Object(Value::Null) => "null".to_string(),
            Arg::Object(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(text) => text.clone(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
            Arg::Object(_) => "[object Object]".to_string(),
            Arg::Init(_) => "[initializer]".to_string(),
            Arg::Skip(_) => String::new(),
        }
    }
}

impl From<&str> for Arg {
    fn from(text: &str) -> Self {
        Arg::Text(text.to_string())
    }
}

impl From<String> for Arg {
    fn from(text: String) -> Self {
        Arg::Text(text)
    }
}

impl From<&String> for Arg {
    fn from(text: &String) -> Self {
        Arg::Text(text.clone())
    }
}

macro_rules! int_arg {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Arg {
                fn from(value: $ty) -> Self {
                    Arg::Int(value as i64)
                }
            }
        )*
    };
}

int_arg!(i8, i16, i32, i64, u8, u16, u32, usize);

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Arg::Float(value)
    }
}

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Arg::Bool(value)
    }
}

impl From<Cause> for Arg {
    fn from(cause: Cause) -> Self {
        Arg::Cause(cause)
    }
}

impl From<ComposedError> for Arg {
    fn from(error: ComposedError) -> Self {
        Arg::Cause(Cause::Composed(error))
    }
}

impl From<&ComposedError> for Arg {
    fn from(error: &ComposedError) -> Self {
        Arg::Cause(Cause::Composed(error.clone()))
    }
}

impl From<Initializer> for Arg {
    fn from(init: Initializer) -> Self {
        Arg::Init(init)
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => Arg::Text(text),
            Value::Bool(flag) => Arg::Bool(flag),
            Value::Number(number) => match number.as_i64() {
                Some(int) => Arg::Int(int),
                None => Arg::Float(number.as_f64().unwrap_or(f64::NAN)),
            },
            other => Arg::Object(other),
        }
    }
}
