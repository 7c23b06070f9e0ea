//! Construction-site origin capture
//!
//! The origin always records the `#[track_caller]` location of the public
//! constructor call. When backtrace capture is enabled it also records the
//! resolved frames, with the composer's own frames removed from the top.

use backtrace::Backtrace;
use std::fmt;
use std::panic::Location;

/// Symbol prefixes that belong to the capture machinery or this crate
const INTERNAL_PREFIXES: &[&str] = &["backtrace::", "errata_core::"];

/// One resolved stack frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub symbol: Option<String>,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl Frame {
    /// Whether the frame belongs to the capture machinery or the composer
    pub fn is_internal(&self) -> bool {
        let Some(symbol) = &self.symbol else {
            return false;
        };
        let symbol = symbol.trim_start_matches('<');
        if symbol.contains("::tests::") {
            return false;
        }
        INTERNAL_PREFIXES
            .iter()
            .any(|prefix| symbol.starts_with(prefix))
    }

    fn location(&self) -> Option<String> {
        let file = self.file.as_ref()?;
        Some(format!(
            "{}:{}:{}",
            file,
            self.line.unwrap_or(0),
            self.column.unwrap_or(0)
        ))
    }
}

impl fmt::Display for Frame {
    /// Renders as a stack line body: `symbol (file:line:col)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.symbol, self.location()) {
            (Some(symbol), Some(location)) => write!(f, "{} ({})", symbol, location),
            (Some(symbol), None) => write!(f, "{}", symbol),
            (None, Some(location)) => write!(f, "{}", location),
            (None, None) => write!(f, "<unknown>"),
        }
    }
}

/// Captured construction site of an error
#[derive(Debug, Clone)]
pub struct Origin {
    location: &'static Location<'static>,
    frames: Vec<Frame>,
}

impl Origin {
    /// Record the call site only
    pub fn at(location: &'static Location<'static>) -> Self {
        Self {
            location,
            frames: Vec::new(),
        }
    }

    /// Record the call site plus resolved frames
    ///
    /// Leading internal frames are dropped first, then `skip` more frames for
    /// wrappers that construct errors on behalf of their own caller.
    pub fn capture(location: &'static Location<'static>, skip: usize) -> Self {
        let backtrace = Backtrace::new();
        let frames = backtrace
            .frames()
            .iter()
            .flat_map(|frame| frame.symbols())
            .map(|symbol| Frame {
                symbol: symbol.name().map(|name| format!("{:#}", name)),
                file: symbol.filename().map(|path| path.display().to_string()),
                line: symbol.lineno(),
                column: symbol.colno(),
            });

        Self {
            location,
            frames: trim_frames(frames, skip),
        }
    }

    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Stack lines (`    at ...`), falling back to the call site alone
    pub fn stack_lines(&self) -> Vec<String> {
        if self.frames.is_empty() {
            return vec![format!(
                "    at {}:{}:{}",
                self.location.file(),
                self.location.line(),
                self.location.column()
            )];
        }
        self.frames
            .iter()
            .map(|frame| format!("    at {}", frame))
            .collect()
    }
}

fn trim_frames(frames: impl Iterator<Item = Frame>, skip: usize) -> Vec<Frame> {
    frames
        .skip_while(Frame::is_internal)
        .skip(skip)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(symbol: &str) -> Frame {
        Frame {
            symbol: Some(symbol.to_string()),
            file: Some("src/app.rs".to_string()),
            line: Some(12),
            column: Some(5),
        }
    }

    #[test]
    fn test_internal_frames_are_trimmed() {
        let frames = vec![
            frame("backtrace::backtrace::trace"),
            frame("errata_core::origin::Origin::capture"),
            frame("<errata_core::registry::ErrorKind>::new"),
            frame("app::handler"),
            frame("app::main"),
        ];

        let trimmed = trim_frames(frames.into_iter(), 0);
        assert_eq!(trimmed.len(), 2);
        assert_eq!(trimmed[0].symbol.as_deref(), Some("app::handler"));
    }

    #[test]
    fn test_skip_marker_drops_wrapper_frames() {
        let frames = vec![
            frame("errata_core::compose::compose"),
            frame("app::wrap_error"),
            frame("app::handler"),
        ];

        let trimmed = trim_frames(frames.into_iter(), 1);
        assert_eq!(trimmed.len(), 1);
        assert_eq!(trimmed[0].symbol.as_deref(), Some("app::handler"));
    }

    #[test]
    fn test_test_frames_are_not_internal() {
        assert!(!frame("errata_core::compose::tests::test_chain").is_internal());
        assert!(frame("errata_core::compose::compose").is_internal());
    }

    #[test]
    fn test_stack_lines_fall_back_to_location() {
        let origin = Origin::at(Location::caller());
        let lines = origin.stack_lines();

        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("    at "));
        assert!(lines[0].contains("origin.rs"));
    }

    #[test]
    fn test_frame_display() {
        assert_eq!(frame("app::main").to_string(), "app::main (src/app.rs:12:5)");
    }
}
