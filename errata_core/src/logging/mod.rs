//! Diagnostic output for composed errors
//!
//! Rendered errors go to a [`DiagnosticSink`]; the console sink writes to
//! stderr, the structured sink writes JSON lines and the memory sink records
//! events for inspection. Internal tracing uses the `log` facade.

pub mod events;
pub mod sink;

pub use events::DiagnosticEvent;
pub use sink::{ConsoleSink, DiagnosticSink, MemorySink, StructuredSink};

use crate::config::ErrataConfig;
use std::sync::Arc;

/// Create the sink selected by configuration
pub fn create_configured_sink(config: &ErrataConfig) -> Arc<dyn DiagnosticSink> {
    if config.structured_output {
        Arc::new(StructuredSink::new())
    } else {
        Arc::new(ConsoleSink::new())
    }
}
