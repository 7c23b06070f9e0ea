//! Diagnostic sinks: the error output stream for rendered errors

use super::events::DiagnosticEvent;
use std::sync::{Mutex, MutexGuard};

/// Destination for rendered errors
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, event: &DiagnosticEvent);
}

/// Writes stack text to stderr
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

impl DiagnosticSink for ConsoleSink {
    fn emit(&self, event: &DiagnosticEvent) {
        eprintln!("{}", event.format());
    }
}

/// Writes one JSON object per event to stderr
#[derive(Debug, Default)]
pub struct StructuredSink;

impl StructuredSink {
    pub fn new() -> Self {
        Self
    }
}

impl DiagnosticSink for StructuredSink {
    fn emit(&self, event: &DiagnosticEvent) {
        match event.format_json() {
            Ok(json) => eprintln!("{}", json),
            Err(e) => {
                log::warn!("Structured diagnostic serialization failed: {}", e);
                eprintln!("{}", event.format());
            }
        }
    }
}

/// Memory sink for testing
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<DiagnosticEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<DiagnosticEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.lock().clone()
    }

    /// Rendered text of every recorded event
    pub fn texts(&self) -> Vec<String> {
        self.lock().iter().map(DiagnosticEvent::format).collect()
    }

    pub fn event_count(&self) -> usize {
        self.lock().len()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn get_fatal_events(&self) -> Vec<DiagnosticEvent> {
        self.lock()
            .iter()
            .filter(|event| event.is_fatal())
            .cloned()
            .collect()
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, event: &DiagnosticEvent) {
        self.lock().push(event.clone());
    }
}
