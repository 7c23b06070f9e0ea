//! # errata
//!
//! Named error kinds with chained causes, formatted messages, HTTP status and
//! log level classification, and readable diagnostic stacks.
//!
//! ```
//! use errata_core::{args, kinds, registry};
//!
//! let io = registry().kind(kinds::IO).unwrap().new(args!["ENOENT, open config.toml"]);
//! let err = registry()
//!     .kind(kinds::FILE_LOAD)
//!     .unwrap()
//!     .new(args![&io, "cannot load %s", "config.toml"]);
//!
//! assert_eq!(err.message_original(), "cannot load config.toml");
//! assert!(err.message().contains("<- IOError: ENOENT, open config.toml"));
//! assert_eq!(errata_core::status_code(&err), 500);
//! ```

mod macros;

pub mod args;
pub mod catalog;
pub mod classify;
pub mod compose;
pub mod config;
pub mod errno;
pub mod error;
pub mod format;
pub mod helpers;
pub mod kinds;
pub mod logging;
pub mod origin;
pub mod pretty;
pub mod registry;
pub mod serialize;

pub use args::{Arg, Initializer};
pub use classify::{log_level, status_code, Classify, KindMetadata, LogLevel};
pub use compose::Composer;
pub use config::{ConfigError, ErrataConfig, RuntimeMode};
pub use error::{Cause, ComposedError, ErrorCode, ErrorDraft, SubErrors};
pub use helpers::{catch, catch_named, fatal, log, NameFilter};
pub use pretty::{pretty, PlainPresenter, PrettyPresenter, StackPresenter};
pub use registry::{ErrorKind, ErrorKindRegistry, KindDefinition};
pub use serialize::{serialize, SerializedError};

/// The process-wide kind registry
pub fn registry() -> &'static ErrorKindRegistry {
    registry::global()
}

/// Define a kind on the process-wide registry
#[track_caller]
pub fn define<D>(definition: D) -> Result<ErrorKind, ComposedError>
where
    D: Into<KindDefinition>,
{
    registry::global().define(definition)
}

/// Build an unnamed error through the process-wide registry
#[track_caller]
pub fn error<I>(args: I) -> ComposedError
where
    I: IntoIterator<Item = Arg>,
{
    registry::global().error(args)
}

pub mod prelude {
    pub use crate::args;
    pub use crate::kinds;
    pub use crate::{
        Arg, Cause, ComposedError, ErrorCode, ErrorKind, ErrorKindRegistry, Initializer,
        KindDefinition, LogLevel,
    };
}
