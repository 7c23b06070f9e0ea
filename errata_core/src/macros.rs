//! Argument list construction

/// Build a `Vec<Arg>` from heterogeneous values
///
/// ```
/// use errata_core::{args, Arg};
///
/// let args: Vec<Arg> = args!["user %s not found", "alice"];
/// assert_eq!(args.len(), 2);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Arg>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::Arg::from($arg)),+]
    };
}
