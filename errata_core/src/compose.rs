//! Error composition engine
//!
//! Turns an ordered argument list into a populated [`ComposedError`]:
//!
//! 1. A leading [`Arg::Cause`] is consumed as the cause.
//! 2. If the first remaining argument reads `CODE, ...` the code is recorded
//!    (the message text keeps the prefix).
//! 3. A trailing [`Arg::Init`] is removed and run against the draft with the
//!    remaining arguments; otherwise the arguments are printf-formatted.
//! 4. Object arguments become attachments appended under `Attachments:`.
//! 5. `message_original` is snapshotted, then the cause line is appended.
//! 6. The origin is captured and the stack rendered through the presenter.
//!
//! Composition never fails.

use crate::args::Arg;
use crate::config::{self, ErrataConfig};
use crate::errno;
use crate::error::{Cause, ComposedError, ErrorCode, ErrorDraft, ErrorInner};
use crate::format::format_message;
use crate::logging::{self, DiagnosticEvent, DiagnosticSink};
use crate::origin::Origin;
use crate::pretty::{PlainPresenter, PrettyPresenter, StackPresenter};
use regex::Regex;
use serde_json::Value;
use std::panic::Location;
use std::sync::{Arc, OnceLock};

/// Marker placed before the cause name on the cause line
pub const CAUSE_MARKER: &str = " <- ";

fn code_pattern() -> &'static Regex {
    static CODE_PATTERN: OnceLock<Regex> = OnceLock::new();
    CODE_PATTERN.get_or_init(|| Regex::new(r"^([A-Z_0-9]+),\s").expect("valid code pattern"))
}

/// Code named by a leading `CODE, message` argument
pub fn extract_code(arg: &Arg) -> Option<String> {
    let text = arg.to_text();
    code_pattern()
        .captures(&text)
        .map(|caps| caps[1].to_string())
}

/// Composition context: presentation, capture settings and diagnostic sink
#[derive(Clone)]
pub struct Composer {
    config: ErrataConfig,
    presenter: Arc<dyn StackPresenter>,
    sink: Arc<dyn DiagnosticSink>,
}

impl Composer {
    pub fn new(config: ErrataConfig) -> Self {
        let presenter: Arc<dyn StackPresenter> = if config.pretty_stacks {
            Arc::new(PrettyPresenter)
        } else {
            Arc::new(PlainPresenter)
        };
        let sink = logging::create_configured_sink(&config);

        Self {
            config,
            presenter,
            sink,
        }
    }

    /// Composer configured from the process-wide configuration
    pub fn from_global_config() -> Self {
        Self::new(config::global().clone())
    }

    pub fn with_presenter(mut self, presenter: Arc<dyn StackPresenter>) -> Self {
        self.presenter = presenter;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &ErrataConfig {
        &self.config
    }

    pub fn sink(&self) -> &Arc<dyn DiagnosticSink> {
        &self.sink
    }

    /// Emit an error's stack to the diagnostic sink
    pub fn emit(&self, error: &ComposedError) {
        self.sink.emit(&DiagnosticEvent::from_error(error));
    }

    /// Compose an unnamed error
    #[track_caller]
    pub fn error<I>(&self, args: I) -> ComposedError
    where
        I: IntoIterator<Item = Arg>,
    {
        self.compose_at(None, args.into_iter().collect(), Location::caller())
    }

    /// Compose an error with an explicit kind name
    #[track_caller]
    pub fn named<I>(&self, name: &str, args: I) -> ComposedError
    where
        I: IntoIterator<Item = Arg>,
    {
        self.compose_at(Some(name), args.into_iter().collect(), Location::caller())
    }

    /// Compose with an explicit construction site
    pub fn compose_at(
        &self,
        name: Option<&str>,
        args: Vec<Arg>,
        location: &'static Location<'static>,
    ) -> ComposedError {
        let mut skip = 0usize;
        let mut args: Vec<Arg> = args
            .into_iter()
            .filter(|arg| match arg {
                Arg::Skip(frames) => {
                    skip += frames;
                    false
                }
                _ => true,
            })
            .collect();

        let mut draft = ErrorDraft::named(name);
        let cause = match args.first() {
            Some(Arg::Cause(_)) => match args.remove(0) {
                Arg::Cause(cause) => Some(cause),
                _ => None,
            },
            _ => None,
        };

        let mut attachments = Vec::new();
        if let Some(first) = args.first() {
            if let Some(code) = extract_code(first) {
                draft.code = Some(ErrorCode::Text(code));
            }

            match args.pop() {
                Some(Arg::Init(init)) => {
                    draft.message.clear();
                    attachments = object_values(&args);
                    init.apply(&mut draft, &args);
                }
                Some(last) => {
                    args.push(last);
                    attachments = object_values(&args);
                    args.retain(|arg| !arg.is_object());
                    draft.message = format_message(&args);
                }
                None => {}
            }
        }

        if !attachments.is_empty() {
            draft.message.push_str("\n\nAttachments:");
            for attachment in &attachments {
                draft.message.push('\n');
                draft
                    .message
                    .push_str(&serde_json::to_string_pretty(attachment).unwrap_or_default());
            }
        }

        let message_original = draft.message.clone();
        let mut message = draft.message;
        if let Some(cause) = &cause {
            message.push_str(&cause_line(cause));
        }

        let origin = if self.config.capture_backtrace {
            Origin::capture(location, skip)
        } else {
            Origin::at(location)
        };

        let display_name = draft.name.as_deref().unwrap_or(crate::error::UNNAMED_ERROR);
        let raw_stack = raw_stack(display_name, &message, &origin);
        let stack = self.presenter.render(&raw_stack, draft.code.as_ref());

        let error = ComposedError::from_inner(ErrorInner {
            name: draft.name,
            code: draft.code,
            status_code: draft.status_code,
            message,
            message_original,
            cause,
            attachments,
            fields: draft.fields,
            errors: draft.errors,
            origin,
            stack,
        });

        if self.config.echo_on_construct {
            self.emit(&error);
        }

        error
    }
}

impl Default for Composer {
    fn default() -> Self {
        Self::from_global_config()
    }
}

fn object_values(args: &[Arg]) -> Vec<Value> {
    args.iter()
        .filter_map(|arg| match arg {
            Arg::Object(value) => Some(value.clone()),
            _ => None,
        })
        .collect()
}

/// Cause line appended to the message, with errno decoration for the
/// immediate cause only
fn cause_line(cause: &Cause) -> String {
    let mut line = format!("\n{}{}: {}", CAUSE_MARKER, cause.name(), cause.message());
    let description = cause
        .code()
        .as_ref()
        .and_then(ErrorCode::as_text)
        .and_then(errno::describe);
    if let Some(description) = description {
        line.push_str(&format!(" ({})", description));
    }
    line
}

fn raw_stack(name: &str, message: &str, origin: &Origin) -> String {
    let mut stack = if message.is_empty() {
        name.to_string()
    } else {
        format!("{}: {}", name, message)
    };
    for line in origin.stack_lines() {
        stack.push('\n');
        stack.push_str(&line);
    }
    stack
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use crate::args::Initializer;
    use crate::logging::MemorySink;
    use serde_json::json;
    use std::io;

    fn composer() -> Composer {
        Composer::new(ErrataConfig::quiet())
    }

    #[test]
    fn test_plain_message() {
        let error = composer().error(args!["test_message"]);

        assert_eq!(error.message(), "test_message");
        assert_eq!(error.message_original(), "test_message");
        assert_eq!(error.code(), None);
        assert_eq!(error.name(), None);
        assert_eq!(error.display_name(), "Error");
    }

    #[test]
    fn test_named_error() {
        let error = composer().named("TestError", args!["test_message"]);

        assert_eq!(error.name(), Some("TestError"));
        assert_eq!(error.message(), "test_message");
        assert_eq!(error.code(), None);
    }

    #[test]
    fn test_sprintf_message() {
        let error = composer().error(args!["test %s with %s", "message", "sprintf"]);
        assert_eq!(error.message(), "test message with sprintf");
    }

    #[test]
    fn test_code_from_message_prefix() {
        let error = composer().error(args!["ERR_CODE, This is an error"]);

        assert_eq!(error.code(), Some(&ErrorCode::from("ERR_CODE")));
        assert_eq!(error.message(), "ERR_CODE, This is an error");
    }

    #[test]
    fn test_code_prefix_requires_uppercase_and_space() {
        assert_eq!(extract_code(&Arg::from("Err_code, x")), None);
        assert_eq!(extract_code(&Arg::from("ERR_CODE,x")), None);
        assert_eq!(extract_code(&Arg::from("E404, x")), Some("E404".to_string()));
    }

    #[test]
    fn test_empty_arguments() {
        let error = composer().error(Vec::new());
        assert_eq!(error.message(), "");
        assert!(error.cause().is_none());
    }

    #[test]
    fn test_chaining() {
        let c = composer();
        let err2 = c.error(args!["err2"]);
        let err1 = c.error(args![&err2, "err1"]);
        let err = c.error(args![&err1, "err"]);

        assert!(err.cause().unwrap().as_composed().unwrap().is_same(&err1));
        assert!(err1.cause().unwrap().as_composed().unwrap().is_same(&err2));
        assert!(err2.cause().is_none());
        assert_eq!(err.causes().count(), 2);
    }

    #[test]
    fn test_cause_line_and_original_message() {
        let c = composer();
        let cause = c.named("IOError", args!["disk gone"]);
        let error = c.named("FileLoadError", args![cause, "cannot load %s", "a.toml"]);

        assert_eq!(error.message_original(), "cannot load a.toml");
        assert_eq!(
            error.message(),
            "cannot load a.toml\n <- IOError: disk gone"
        );
        assert!(!error.message_original().contains(CAUSE_MARKER));
    }

    #[test]
    fn test_errno_decoration_for_cause_code() {
        let c = composer();
        let cause = c.named("IOError", args!["EACCES, open failed"]);
        let error = c.error(args![cause, "read failed"]);
        assert!(error
            .message()
            .ends_with("<- IOError: EACCES, open failed (permission denied)"));

        let io_cause = Cause::from(io::Error::new(io::ErrorKind::NotFound, "no file"));
        let error = c.error(args![io_cause, "load"]);
        assert_eq!(
            error.message(),
            "load\n <- Error: no file (no such file or directory)"
        );
    }

    #[test]
    fn test_errno_decoration_is_shallow() {
        let c = composer();
        let root = c.named("IOError", args!["ENOENT, gone"]);
        let middle = c.named("FileLoadError", args![root, "middle"]);
        let top = c.error(args![middle, "top"]);

        assert_eq!(
            top.message(),
            format!("top\n <- FileLoadError: {}", middle_message(&top))
        );
        assert_eq!(top.message().matches("(no such file or directory)").count(), 1);
    }

    fn middle_message(top: &ComposedError) -> String {
        top.cause().unwrap().message().into_owned()
    }

    #[test]
    fn test_attachments_are_extracted() {
        let error = composer().error(args![
            "user %s failed",
            json!({"id": 7, "role": "admin"}),
            "alice"
        ]);

        assert_eq!(error.attachments().len(), 1);
        assert!(error.message().starts_with("user alice failed\n\nAttachments:\n{"));
        assert!(error.message().contains("\"id\": 7"));
        assert!(error.message().contains("\"role\": \"admin\""));
    }

    #[test]
    fn test_trailing_initializer() {
        let init = Initializer::new(|draft, args| {
            let port = args.first().and_then(Arg::as_int).unwrap_or(0);
            draft.set_message(format!("port {} closed", port));
            draft.set_field("port", port);
        });
        let error = composer().named("ConnectionError", args![8080, init]);

        assert_eq!(error.message(), "port 8080 closed");
        assert_eq!(error.field("port"), Some(&json!(8080)));
    }

    #[test]
    fn test_initializer_keeps_object_attachments() {
        let init = Initializer::new(|draft, _| draft.set_message("with context"));
        let error = composer().error(args![json!({"k": "v"}), init]);

        assert_eq!(error.attachments().len(), 1);
        assert!(error.message().starts_with("with context\n\nAttachments:"));
    }

    #[test]
    fn test_initializer_code_overrides_prefix_code() {
        let init = Initializer::new(|draft, _| draft.set_code(404u16));
        let error = composer().error(args!["E_PREFIX, text", init]);
        assert_eq!(error.code(), Some(&ErrorCode::Number(404)));
    }

    #[test]
    fn test_cause_only_leaves_message_empty() {
        let c = composer();
        let cause = c.error(args!["inner"]);
        let error = c.named("WrapError", args![cause]);

        assert_eq!(error.message_original(), "");
        assert_eq!(error.message(), "\n <- Error: inner");
    }

    #[test]
    fn test_stack_contains_header_and_origin() {
        let error = composer().named("NotFoundError", args!["missing"]);
        let mut lines = error.stack().lines();

        assert_eq!(lines.next(), Some("NotFoundError: missing"));
        let at = lines.next().unwrap();
        assert!(at.starts_with("    at "));
        assert!(at.contains("compose.rs"));
        assert_eq!(error.origin().location().file(), file!());
    }

    #[test]
    fn test_development_mode_renders_pretty_stack() {
        let c = Composer::new(ErrataConfig::for_mode(config::RuntimeMode::Development));
        let error = c.named("NotFoundError", args!["E_NF, missing"]);

        assert!(error.stack().contains("Stack trace:"));
        assert!(error.stack().contains("(E_NF)"));
    }

    #[test]
    fn test_echo_on_construct() {
        let sink = Arc::new(MemorySink::new());
        let mut config = ErrataConfig::quiet();
        config.echo_on_construct = true;
        let c = Composer::new(config).with_sink(sink.clone());

        c.error(args!["echoed"]);
        assert_eq!(sink.event_count(), 1);
        assert!(sink.texts()[0].starts_with("Error: echoed"));
    }

    #[test]
    fn test_backtrace_capture_skips_internal_frames() {
        let mut config = ErrataConfig::quiet();
        config.capture_backtrace = true;
        let error = Composer::new(config).error(args!["traced", Arg::Skip(0)]);

        if let Some(first) = error.origin().frames().first() {
            assert!(!first.is_internal());
        }
    }
}
