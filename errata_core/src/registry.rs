//! Error kind registry
//!
//! Kinds are defined at runtime by name. Each definition yields an
//! [`ErrorKind`] handle that builds errors of that kind through the
//! registry's [`Composer`]. Defining a name again replaces the earlier
//! definition; handles obtained before keep their original behaviour.

use crate::args::{Arg, Initializer};
use crate::catalog;
use crate::compose::Composer;
use crate::config::{self, ErrataConfig};
use crate::error::ComposedError;
use crate::kinds;
use std::collections::HashMap;
use std::panic::Location;
use std::sync::{Arc, OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Message of the FatalError raised for an invalid kind name
pub const INVALID_NAME_MESSAGE: &str = "Error name must begin with a capital letter";

/// Definition of one error kind
#[derive(Debug, Clone)]
pub struct KindDefinition {
    name: String,
    default_message: String,
    initializer: Option<Initializer>,
}

impl KindDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_message: String::new(),
            initializer: None,
        }
    }

    /// Message used when the kind is constructed without arguments
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.default_message = message.into();
        self
    }

    /// Kind-specific initializer run on every construction
    pub fn construct(mut self, initializer: Initializer) -> Self {
        self.initializer = Some(initializer);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_message(&self) -> &str {
        &self.default_message
    }

    pub fn initializer(&self) -> Option<&Initializer> {
        self.initializer.as_ref()
    }
}

impl From<&str> for KindDefinition {
    fn from(name: &str) -> Self {
        KindDefinition::new(name)
    }
}

impl From<String> for KindDefinition {
    fn from(name: String) -> Self {
        KindDefinition::new(name)
    }
}

impl From<(&str, &str)> for KindDefinition {
    fn from((name, message): (&str, &str)) -> Self {
        KindDefinition::new(name).message(message)
    }
}

impl From<(&str, Initializer)> for KindDefinition {
    fn from((name, initializer): (&str, Initializer)) -> Self {
        KindDefinition::new(name).construct(initializer)
    }
}

impl From<(&str, &str, Initializer)> for KindDefinition {
    fn from((name, message, initializer): (&str, &str, Initializer)) -> Self {
        KindDefinition::new(name)
            .message(message)
            .construct(initializer)
    }
}

fn valid_kind_name(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

/// Constructor handle for a defined kind
#[derive(Clone)]
pub struct ErrorKind {
    definition: Arc<KindDefinition>,
    composer: Composer,
}

impl ErrorKind {
    pub fn name(&self) -> &str {
        self.definition.name()
    }

    pub fn default_message(&self) -> &str {
        self.definition.default_message()
    }

    pub fn definition(&self) -> &KindDefinition {
        &self.definition
    }

    /// Build an error of this kind
    ///
    /// With no positional arguments the default message is used. The kind's
    /// initializer is appended unless the caller supplied a trailing one.
    #[track_caller]
    pub fn new<I>(&self, args: I) -> ComposedError
    where
        I: IntoIterator<Item = Arg>,
    {
        self.compose_at(args.into_iter().collect(), Location::caller())
    }

    /// Build an error of this kind with its default message
    #[track_caller]
    pub fn empty(&self) -> ComposedError {
        self.compose_at(Vec::new(), Location::caller())
    }

    pub fn compose_at(&self, args: Vec<Arg>, location: &'static Location<'static>) -> ComposedError {
        let (markers, mut args): (Vec<Arg>, Vec<Arg>) =
            args.into_iter().partition(|arg| matches!(arg, Arg::Skip(_)));

        if args.is_empty() {
            args.push(Arg::Text(self.definition.default_message.clone()));
        }

        if let Some(initializer) = &self.definition.initializer {
            if !matches!(args.last(), Some(Arg::Init(_))) {
                args.push(Arg::Init(initializer.clone()));
            }
        }

        args.extend(markers);
        self.composer
            .compose_at(Some(self.name()), args, location)
    }

    /// True when `error` was built with this kind's name
    pub fn matches(&self, error: &ComposedError) -> bool {
        error.name() == Some(self.name())
    }
}

impl std::fmt::Debug for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorKind")
            .field("name", &self.name())
            .field("default_message", &self.default_message())
            .finish()
    }
}

/// Registry of error kinds keyed by name
pub struct ErrorKindRegistry {
    kinds: RwLock<HashMap<String, ErrorKind>>,
    composer: Composer,
}

impl ErrorKindRegistry {
    /// Empty registry
    pub fn new(config: ErrataConfig) -> Self {
        Self::with_composer(Composer::new(config))
    }

    pub fn with_composer(composer: Composer) -> Self {
        Self {
            kinds: RwLock::new(HashMap::new()),
            composer,
        }
    }

    /// Registry pre-populated with the predefined kind catalog
    pub fn with_catalog(config: ErrataConfig) -> Self {
        let registry = Self::new(config);
        catalog::register_catalog(&registry);
        registry
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, ErrorKind>> {
        self.kinds.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, ErrorKind>> {
        self.kinds.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Define a kind, replacing any earlier definition with the same name
    ///
    /// Names must begin with an ASCII capital letter; otherwise a FatalError
    /// is returned and nothing is registered.
    #[track_caller]
    pub fn define<D>(&self, definition: D) -> Result<ErrorKind, ComposedError>
    where
        D: Into<KindDefinition>,
    {
        let location = Location::caller();
        let definition = definition.into();

        if !valid_kind_name(definition.name()) {
            return Err(self.composer.compose_at(
                Some(kinds::FATAL),
                vec![Arg::from(INVALID_NAME_MESSAGE)],
                location,
            ));
        }

        let kind = ErrorKind {
            definition: Arc::new(definition),
            composer: self.composer.clone(),
        };

        let previous = self
            .write()
            .insert(kind.name().to_string(), kind.clone());
        if previous.is_some() {
            log::debug!("Redefined error kind {}", kind.name());
        } else {
            log::debug!("Defined error kind {}", kind.name());
        }

        Ok(kind)
    }

    pub fn kind(&self, name: &str) -> Option<ErrorKind> {
        self.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// Defined kind names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Build an error of a registered kind, `None` when the name is unknown
    #[track_caller]
    pub fn construct<I>(&self, name: &str, args: I) -> Option<ComposedError>
    where
        I: IntoIterator<Item = Arg>,
    {
        let location = Location::caller();
        self.kind(name)
            .map(|kind| kind.compose_at(args.into_iter().collect(), location))
    }

    /// Build an unnamed error
    #[track_caller]
    pub fn error<I>(&self, args: I) -> ComposedError
    where
        I: IntoIterator<Item = Arg>,
    {
        self.composer
            .compose_at(None, args.into_iter().collect(), Location::caller())
    }

    /// Build an error with an arbitrary name, bypassing registered kinds
    #[track_caller]
    pub fn named<I>(&self, name: &str, args: I) -> ComposedError
    where
        I: IntoIterator<Item = Arg>,
    {
        self.composer
            .compose_at(Some(name), args.into_iter().collect(), Location::caller())
    }
}

impl std::fmt::Debug for ErrorKindRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorKindRegistry")
            .field("kinds", &self.names())
            .finish()
    }
}

static GLOBAL_REGISTRY: OnceLock<ErrorKindRegistry> = OnceLock::new();

/// Process-wide registry holding the predefined catalog
pub fn global() -> &'static ErrorKindRegistry {
    GLOBAL_REGISTRY.get_or_init(|| ErrorKindRegistry::with_catalog(config::global().clone()))
}
