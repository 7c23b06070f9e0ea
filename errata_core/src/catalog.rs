//! Predefined error kinds
//!
//! Every kind in [`kinds::ALL`] is registered with an empty default message.
//! Three kinds carry initializers: the parameter errors name the offending
//! parameter and `HTTPError` maps a status code to its reason phrase.

use crate::args::{Arg, Initializer};
use crate::error::ErrorCode;
use crate::format::format_message;
use crate::kinds;
use crate::registry::{ErrorKindRegistry, KindDefinition};

/// Field holding the parameter name on the parameter errors
pub const PARAMETER_FIELD: &str = "parameter";

fn parameter_name(args: &[Arg]) -> String {
    match args.first().map(Arg::to_text) {
        Some(name) if !name.is_empty() => name,
        _ => "?".to_string(),
    }
}

fn parameter_initializer(template: &'static str) -> Initializer {
    Initializer::new(move |draft, args| {
        let name = parameter_name(args);
        draft.set_message(format_message(&[Arg::from(template), Arg::from(name.as_str())]));
        draft.set_field(PARAMETER_FIELD, name);
    })
}

fn http_initializer() -> Initializer {
    Initializer::new(|draft, args| {
        let status = args.first().and_then(Arg::as_int).filter(|status| *status > 0);

        match status {
            Some(status) => {
                draft.set_code(ErrorCode::Number(status));
                let reason = u16::try_from(status)
                    .ok()
                    .and_then(|status| http::StatusCode::from_u16(status).ok())
                    .map(|status| {
                        draft.set_status_code(status.as_u16());
                        status.canonical_reason().unwrap_or_default()
                    });

                let message = match args.get(1).map(Arg::to_text) {
                    Some(message) if !message.is_empty() => message,
                    _ => reason.unwrap_or_default().to_string(),
                };
                draft.set_message(message);
            }
            None => {
                let message = args.first().map(status_text).unwrap_or_default();
                draft.set_message(message);
            }
        }
    })
}

/// Message for a non-status first argument; falsy values read as empty
fn status_text(arg: &Arg) -> String {
    match arg {
        Arg::Int(0) | Arg::Bool(false) | Arg::Object(serde_json::Value::Null) => String::new(),
        Arg::Float(value) if *value == 0.0 || value.is_nan() => String::new(),
        other => other.to_text(),
    }
}

/// Definitions for the whole catalog, in [`kinds::ALL`] order
pub fn catalog_definitions() -> Vec<KindDefinition> {
    kinds::ALL
        .iter()
        .map(|name| {
            let definition = KindDefinition::new(*name);
            match *name {
                kinds::MISSING_PARAMETER => {
                    definition.construct(parameter_initializer("Required parameter `%s` missing"))
                }
                kinds::INVALID_PARAMETER => {
                    definition.construct(parameter_initializer("Parameter `%s` is not valid"))
                }
                kinds::HTTP => definition.construct(http_initializer()),
                _ => definition,
            }
        })
        .collect()
}

/// Register every predefined kind
pub fn register_catalog(registry: &ErrorKindRegistry) {
    for definition in catalog_definitions() {
        if let Err(e) = registry.define(definition) {
            log::error!("Failed to register predefined kind: {}", e);
        }
    }
    log::debug!("Registered {} predefined error kinds", registry.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use crate::classify;
    use crate::config::ErrataConfig;
    use serde_json::json;

    fn registry() -> ErrorKindRegistry {
        ErrorKindRegistry::with_catalog(ErrataConfig::quiet())
    }

    #[test]
    fn test_catalog_is_complete() {
        let registry = registry();
        assert_eq!(registry.len(), kinds::ALL.len());
        for name in kinds::ALL {
            let error = registry.kind(name).unwrap().empty();
            assert_eq!(error.name(), Some(*name));
        }
    }

    #[test]
    fn test_http_error_reason_phrase() {
        let http = registry().kind(kinds::HTTP).unwrap();

        let error = http.new(args![404]);
        assert_eq!(error.code(), Some(&ErrorCode::Number(404)));
        assert_eq!(error.message(), "Not Found");
        assert_eq!(error.status_code(), Some(404));
        assert_eq!(classify::status_code(&error), 404);

        let error = http.new(args![500, "custom"]);
        assert_eq!(error.code(), Some(&ErrorCode::Number(500)));
        assert_eq!(error.message(), "custom");
    }

    #[test]
    fn test_http_error_without_status() {
        let http = registry().kind(kinds::HTTP).unwrap();

        let error = http.new(args!["upstream refused"]);
        assert_eq!(error.code(), None);
        assert_eq!(error.message(), "upstream refused");

        let error = http.empty();
        assert_eq!(error.message(), "");
        assert_eq!(classify::status_code(&error), 500);
    }

    #[test]
    fn test_http_error_falsy_status_is_empty() {
        let http = registry().kind(kinds::HTTP).unwrap();

        for error in [http.new(args![0]), http.new(args![false]), http.new(args![0.0])] {
            assert_eq!(error.code(), None);
            assert_eq!(error.message(), "");
        }
        assert_eq!(http.new(args![-3]).message(), "-3");
    }

    #[test]
    fn test_http_error_unknown_status() {
        let error = registry().kind(kinds::HTTP).unwrap().new(args![1000]);

        assert_eq!(error.code(), Some(&ErrorCode::Number(1000)));
        assert_eq!(error.status_code(), None);
        assert_eq!(error.message(), "");
    }

    #[test]
    fn test_parameter_errors() {
        let registry = registry();

        let error = registry.kind(kinds::MISSING_PARAMETER).unwrap().new(args!["id"]);
        assert_eq!(error.message(), "Required parameter `id` missing");
        assert_eq!(error.field(PARAMETER_FIELD), Some(&json!("id")));

        let error = registry.kind(kinds::MISSING_PARAMETER).unwrap().empty();
        assert_eq!(error.message(), "Required parameter `?` missing");

        let error = registry.kind(kinds::INVALID_PARAMETER).unwrap().new(args!["limit"]);
        assert_eq!(error.message(), "Parameter `limit` is not valid");
    }

    #[test]
    fn test_catalog_kind_with_cause() {
        let registry = registry();
        let cause = registry.kind(kinds::IO).unwrap().new(args!["ENOENT, open a.toml"]);
        let error = registry
            .kind(kinds::FILE_LOAD)
            .unwrap()
            .new(args![cause, "config unavailable"]);

        assert_eq!(
            error.message(),
            "config unavailable\n <- IOError: ENOENT, open a.toml (no such file or directory)"
        );
        assert_eq!(error.message_original(), "config unavailable");
    }
}
