//! Convenience operations built on the composer
//!
//! Each helper accepts an optional error and does nothing when none is
//! given. Wrappers use the given message verbatim (no format expansion) and
//! record the helper's caller as their origin.

use crate::args::{Arg, Initializer};
use crate::error::{Cause, ComposedError};
use crate::kinds;
use crate::registry::{self, ErrorKindRegistry};
use std::panic::Location;

/// Kind names accepted by [`ErrorKindRegistry::catch_named`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameFilter {
    One(String),
    Any(Vec<String>),
}

impl NameFilter {
    pub fn matches(&self, name: &str) -> bool {
        match self {
            NameFilter::One(expected) => expected == name,
            NameFilter::Any(names) => names.iter().any(|expected| expected == name),
        }
    }
}

impl From<&str> for NameFilter {
    fn from(name: &str) -> Self {
        NameFilter::One(name.to_string())
    }
}

impl From<String> for NameFilter {
    fn from(name: String) -> Self {
        NameFilter::One(name)
    }
}

impl From<&[&str]> for NameFilter {
    fn from(names: &[&str]) -> Self {
        NameFilter::Any(names.iter().map(|name| name.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for NameFilter {
    fn from(names: [&str; N]) -> Self {
        NameFilter::Any(names.iter().map(|name| name.to_string()).collect())
    }
}

impl From<Vec<String>> for NameFilter {
    fn from(names: Vec<String>) -> Self {
        NameFilter::Any(names)
    }
}

impl ErrorKindRegistry {
    fn wrap(
        &self,
        name: Option<&str>,
        cause: Cause,
        message: Option<&str>,
        location: &'static Location<'static>,
    ) -> ComposedError {
        let args = vec![
            Arg::Cause(cause),
            Arg::from(message.unwrap_or_default()),
            Arg::Init(Initializer::verbatim()),
        ];
        self.composer().compose_at(name, args, location)
    }

    /// Emit a wrapper of `err` to the diagnostic sink and hand `err` back
    #[track_caller]
    pub fn log<E>(&self, err: Option<E>, message: Option<&str>) -> Option<E>
    where
        E: Into<Cause> + Clone,
    {
        let location = Location::caller();
        let err = err?;
        let wrapper = self.wrap(None, err.clone().into(), message, location);
        self.composer().emit(&wrapper);
        Some(err)
    }

    /// Pass `err` to `callback`, wrapped when a message is given
    #[track_caller]
    pub fn catch<E, F>(&self, err: Option<E>, callback: F, message: Option<&str>) -> Option<E>
    where
        E: Into<Cause> + Clone,
        F: FnOnce(Cause),
    {
        let location = Location::caller();
        let err = err?;
        callback(self.caught(err.clone().into(), message, location));
        Some(err)
    }

    /// Like [`catch`](Self::catch) but only for errors whose kind name matches
    #[track_caller]
    pub fn catch_named<N, E, F>(
        &self,
        names: N,
        err: Option<E>,
        callback: F,
        message: Option<&str>,
    ) -> Option<E>
    where
        N: Into<NameFilter>,
        E: Into<Cause> + Clone,
        F: FnOnce(Cause),
    {
        let location = Location::caller();
        let err = err?;
        let cause: Cause = err.clone().into();
        if !names.into().matches(cause.name()) {
            return None;
        }
        callback(self.caught(cause, message, location));
        Some(err)
    }

    fn caught(
        &self,
        cause: Cause,
        message: Option<&str>,
        location: &'static Location<'static>,
    ) -> Cause {
        match message {
            None => cause,
            Some(_) => Cause::Composed(self.wrap(None, cause, message, location)),
        }
    }

    /// Wrap `err` in a FatalError and return it as `Err`
    #[track_caller]
    pub fn fatal<E>(&self, err: Option<E>, message: Option<&str>) -> Result<(), ComposedError>
    where
        E: Into<Cause>,
    {
        let location = Location::caller();
        match err {
            Some(err) => Err(self.wrap(Some(kinds::FATAL), err.into(), message, location)),
            None => Ok(()),
        }
    }
}

/// [`ErrorKindRegistry::log`] on the global registry
#[track_caller]
pub fn log<E>(err: Option<E>, message: Option<&str>) -> Option<E>
where
    E: Into<Cause> + Clone,
{
    registry::global().log(err, message)
}

/// [`ErrorKindRegistry::catch`] on the global registry
#[track_caller]
pub fn catch<E, F>(err: Option<E>, callback: F, message: Option<&str>) -> Option<E>
where
    E: Into<Cause> + Clone,
    F: FnOnce(Cause),
{
    registry::global().catch(err, callback, message)
}

/// [`ErrorKindRegistry::catch_named`] on the global registry
#[track_caller]
pub fn catch_named<N, E, F>(names: N, err: Option<E>, callback: F, message: Option<&str>) -> Option<E>
where
    N: Into<NameFilter>,
    E: Into<Cause> + Clone,
    F: FnOnce(Cause),
{
    registry::global().catch_named(names, err, callback, message)
}

/// [`ErrorKindRegistry::fatal`] on the global registry
#[track_caller]
pub fn fatal<E>(err: Option<E>, message: Option<&str>) -> Result<(), ComposedError>
where
    E: Into<Cause>,
{
    registry::global().fatal(err, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use crate::compose::Composer;
    use crate::config::ErrataConfig;
    use crate::logging::MemorySink;
    use std::cell::RefCell;
    use std::io;
    use std::sync::Arc;

    fn registry_with_sink() -> (ErrorKindRegistry, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let composer = Composer::new(ErrataConfig::quiet()).with_sink(sink.clone());
        (ErrorKindRegistry::with_composer(composer), sink)
    }

    #[test]
    fn test_log_emits_wrapper_and_returns_error() {
        let (registry, sink) = registry_with_sink();
        let err = registry.named(kinds::IO, args!["disk"]);

        let returned = registry.log(Some(err.clone()), Some("while saving %s"));
        assert!(returned.unwrap().is_same(&err));
        assert_eq!(sink.event_count(), 1);
        assert!(sink.texts()[0].starts_with("Error: while saving %s\n <- IOError: disk"));
    }

    #[test]
    fn test_log_without_error_does_nothing() {
        let (registry, sink) = registry_with_sink();
        assert!(registry.log(None::<ComposedError>, Some("unused")).is_none());
        assert_eq!(sink.event_count(), 0);
    }

    #[test]
    fn test_catch_passes_original_without_message() {
        let (registry, _) = registry_with_sink();
        let err = registry.named(kinds::TIMEOUT, args!["slow"]);
        let seen = RefCell::new(None);

        registry.catch(Some(&err), |cause| *seen.borrow_mut() = Some(cause), None);
        let seen = seen.into_inner().unwrap();
        assert!(seen.as_composed().unwrap().is_same(&err));
    }

    #[test]
    fn test_catch_without_error_does_nothing() {
        let (registry, sink) = registry_with_sink();
        let calls = RefCell::new(0);

        let caught = registry.catch(None::<ComposedError>, |_| *calls.borrow_mut() += 1, None);
        assert!(caught.is_none());

        let caught = registry.catch_named(
            kinds::TIMEOUT,
            None::<ComposedError>,
            |_| *calls.borrow_mut() += 1,
            Some("unused"),
        );
        assert!(caught.is_none());
        assert_eq!(*calls.borrow(), 0);
        assert_eq!(sink.event_count(), 0);
    }

    #[test]
    fn test_catch_empty_message_still_wraps() {
        let (registry, _) = registry_with_sink();
        let err = registry.named(kinds::TIMEOUT, args!["slow"]);
        let seen = RefCell::new(None);

        let returned = registry.catch(Some(&err), |cause| *seen.borrow_mut() = Some(cause), Some(""));
        assert!(returned.unwrap().is_same(&err));

        let seen = seen.into_inner().unwrap();
        let wrapper = seen.as_composed().unwrap();
        assert!(!wrapper.is_same(&err));
        assert_eq!(wrapper.message_original(), "");
        assert!(wrapper.cause().unwrap().as_composed().unwrap().is_same(&err));
    }

    #[test]
    fn test_catch_wraps_with_message() {
        let (registry, _) = registry_with_sink();
        let err = registry.named(kinds::TIMEOUT, args!["slow"]);
        let seen = RefCell::new(None);

        registry.catch(
            Some(err.clone()),
            |cause| *seen.borrow_mut() = Some(cause),
            Some("request aborted"),
        );
        let seen = seen.into_inner().unwrap();
        let wrapper = seen.as_composed().unwrap();
        assert_eq!(wrapper.name(), None);
        assert_eq!(wrapper.message_original(), "request aborted");
        assert!(wrapper.cause().unwrap().as_composed().unwrap().is_same(&err));
    }

    #[test]
    fn test_catch_named_filters_by_kind() {
        let (registry, _) = registry_with_sink();
        let err = registry.named(kinds::NOT_FOUND, args!["gone"]);
        let calls = RefCell::new(0);

        let missed = registry.catch_named(kinds::TIMEOUT, Some(&err), |_| *calls.borrow_mut() += 1, None);
        assert!(missed.is_none());
        assert_eq!(*calls.borrow(), 0);

        let hit = registry.catch_named(
            [kinds::TIMEOUT, kinds::NOT_FOUND],
            Some(&err),
            |_| *calls.borrow_mut() += 1,
            None,
        );
        assert!(hit.is_some());
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn test_catch_native_error() {
        let (registry, _) = registry_with_sink();
        let err = Cause::from(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        let seen = RefCell::new(None);

        registry.catch_named("Error", Some(err), |cause| *seen.borrow_mut() = Some(cause), Some("read"));
        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.message(), "read\n <- Error: denied (permission denied)");
    }

    #[test]
    fn test_fatal_wraps_error() {
        let (registry, _) = registry_with_sink();
        let err = registry.named(kinds::CONNECTION, args!["refused"]);

        let fatal = registry.fatal(Some(&err), Some("cannot start")).unwrap_err();
        assert_eq!(fatal.name(), Some(kinds::FATAL));
        assert_eq!(fatal.message_original(), "cannot start");
        assert!(fatal.cause().unwrap().as_composed().unwrap().is_same(&err));

        assert!(registry.fatal(None::<ComposedError>, Some("unused")).is_ok());
    }

    #[test]
    fn test_fatal_without_message() {
        let (registry, _) = registry_with_sink();
        let err = registry.named(kinds::CONNECTION, args!["refused"]);

        let fatal = registry.fatal(Some(err), None).unwrap_err();
        assert_eq!(fatal.message(), "\n <- ConnectionError: refused");
    }
}
