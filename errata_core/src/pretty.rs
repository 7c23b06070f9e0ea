//! Stack presentation for terminals
//!
//! Recognises three line shapes in a raw stack: a `Kind: message` header, a
//! ` <- Kind: message` cause line and an `    at frame` location line.
//! Everything else passes through unchanged.

use crate::error::ErrorCode;
use colored::Colorize;
use regex::Regex;
use std::sync::OnceLock;

/// Renders raw stack text for display
pub trait StackPresenter: Send + Sync {
    fn render(&self, stack: &str, code: Option<&ErrorCode>) -> String;
}

/// Identity presenter
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainPresenter;

impl StackPresenter for PlainPresenter {
    fn render(&self, stack: &str, _code: Option<&ErrorCode>) -> String {
        stack.to_string()
    }
}

/// Colorized presenter with a `Stack trace:` section
#[derive(Debug, Default, Clone, Copy)]
pub struct PrettyPresenter;

struct Patterns {
    error: Regex,
    cause: Regex,
    at: Regex,
    file: Regex,
    reference: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        error: Regex::new(r"^(\w+):\s(.*)$").expect("valid header pattern"),
        cause: Regex::new(r"^\s+<-\s(\w+):\s(.*)$").expect("valid cause pattern"),
        at: Regex::new(r"^\s+at\s(.*)$").expect("valid frame pattern"),
        file: Regex::new(r"([^\\/]+):(\d+):(\d+)$").expect("valid file pattern"),
        reference: Regex::new(r"^(.*)\s\(([^)]+)\)$").expect("valid reference pattern"),
    })
}

impl StackPresenter for PrettyPresenter {
    fn render(&self, stack: &str, code: Option<&ErrorCode>) -> String {
        let patterns = patterns();
        let mut out = String::new();
        let mut error_lines = 0usize;
        let mut at_lines = 0usize;

        for line in stack.split('\n') {
            if let Some(caps) = patterns.error.captures(line) {
                out.push_str(&format!("{} {}", format!("{}:", &caps[1]).red(), &caps[2]));
                if error_lines == 0 {
                    if let Some(code) = code {
                        out.push_str(&format!(" ({})", code));
                    }
                }
                out.push('\n');
                error_lines += 1;
            } else if let Some(caps) = patterns.cause.captures(line) {
                out.push_str(&format!(
                    " \u{2190}  {} {}\n",
                    format!("{}:", &caps[1]).red(),
                    &caps[2]
                ));
            } else if let Some(caps) = patterns.at.captures(line) {
                if at_lines == 0 {
                    out.push_str("\nStack trace:");
                }
                out.push_str(&render_frame(patterns, &caps[1]));
                at_lines += 1;
            } else {
                out.push_str(line);
                out.push('\n');
            }
        }

        out.push('\n');
        out
    }
}

/// Render a raw stack with the pretty presenter
pub fn pretty(stack: &str) -> String {
    PrettyPresenter.render(stack, None)
}

fn render_frame(patterns: &Patterns, body: &str) -> String {
    let prefix = "\n \u{21B3}  ";

    if let Some(file) = patterns.file.captures(body) {
        return format!(
            "{}{}{}{}\n    {}",
            prefix,
            file[1].bold().blue(),
            ":".bright_black(),
            file[2].bold().blue(),
            body.bright_black()
        );
    }

    if let Some(reference) = patterns.reference.captures(body) {
        let symbol = &reference[1];
        let location = &reference[2];
        return match patterns.file.captures(location) {
            Some(file) => format!(
                "{}{}{}{} {}\n    {}",
                prefix,
                file[1].bold().blue(),
                ":".bright_black(),
                file[2].bold().blue(),
                symbol,
                location.bright_black()
            ),
            None => format!(
                "{}{} {}\n    {}",
                prefix,
                location.bold().blue(),
                symbol,
                location.bright_black()
            ),
        };
    }

    format!("{}{}", prefix, body.bold().blue())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = "NotFoundError: user missing\n <- IOError: disk gone\n    at app::load (src/app.rs:10:5)\n    at src/main.rs:3:1";

    #[test]
    fn test_plain_presenter_is_identity() {
        assert_eq!(PlainPresenter.render(RAW, None), RAW);
    }

    #[test]
    fn test_pretty_presenter_shapes() {
        let code = ErrorCode::from("E_USER");
        let rendered = PrettyPresenter.render(RAW, Some(&code));

        assert!(rendered.contains("NotFoundError:"));
        assert!(rendered.contains("user missing"));
        assert!(rendered.contains("(E_USER)"));
        assert!(rendered.contains("\u{2190}"));
        assert!(rendered.contains("IOError:"));
        assert!(rendered.contains("Stack trace:"));
        assert!(rendered.contains("app.rs"));
        assert!(rendered.contains("app::load"));
        assert!(rendered.contains("main.rs"));
        assert_eq!(rendered.matches("Stack trace:").count(), 1);
        assert!(rendered.ends_with('\n'));
    }

    #[test]
    fn test_code_only_on_first_header() {
        let raw = "A: one\nB: two";
        let code = ErrorCode::from(404u16);
        let rendered = PrettyPresenter.render(raw, Some(&code));
        assert_eq!(rendered.matches("(404)").count(), 1);
    }

    #[test]
    fn test_unrecognised_lines_pass_through() {
        let rendered = PrettyPresenter.render("{\n  \"id\": 1\n}", None);
        assert!(rendered.contains("  \"id\": 1\n"));
    }
}
