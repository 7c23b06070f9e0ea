//! Names of the predefined error kinds

pub const MISSING_PARAMETER: &str = "MissingParameterError";
pub const INVALID_PARAMETER: &str = "InvalidParameterError";
pub const IO: &str = "IOError";
pub const DIRECTORY_NOT_FOUND: &str = "DirectoryNotFoundError";
pub const FILE_NOT_FOUND: &str = "FileNotFoundError";
pub const FILE_LOAD: &str = "FileLoadError";
pub const URI: &str = "URIError";
pub const HTTP: &str = "HTTPError";
pub const ARGUMENT: &str = "ArgumentError";
pub const AUTHENTICATION: &str = "AuthenticationError";
pub const NOT_FOUND: &str = "NotFoundError";
pub const RANGE: &str = "RangeError";
pub const REFERENCE: &str = "ReferenceError";
pub const TYPE: &str = "TypeError";
pub const VALIDATION: &str = "ValidationError";
pub const FATAL: &str = "FatalError";
pub const CONNECTION: &str = "ConnectionError";
pub const RATE_LIMITER: &str = "RateLimiterError";
pub const RESOURCE_BUSY: &str = "ResourceBusyError";
pub const FORBIDDEN: &str = "ForbiddenError";
pub const NOT_ALLOWED: &str = "NotAllowedError";
pub const NOT_ACCEPTABLE: &str = "NotAcceptableError";
pub const TIMEOUT: &str = "TimeoutError";
pub const UNSUPPORTED: &str = "UnsupportedError";
pub const TOO_LARGE: &str = "TooLargeError";
pub const CONFLICT: &str = "ConflictError";
pub const PRECONDITION: &str = "PreconditionError";
pub const URI_TOO_LONG: &str = "URITooLongError";

/// Every predefined kind, in catalog order
pub const ALL: &[&str] = &[
    MISSING_PARAMETER,
    INVALID_PARAMETER,
    IO,
    DIRECTORY_NOT_FOUND,
    FILE_NOT_FOUND,
    FILE_LOAD,
    URI,
    HTTP,
    ARGUMENT,
    AUTHENTICATION,
    NOT_FOUND,
    RANGE,
    REFERENCE,
    TYPE,
    VALIDATION,
    FATAL,
    CONNECTION,
    RATE_LIMITER,
    RESOURCE_BUSY,
    FORBIDDEN,
    NOT_ALLOWED,
    NOT_ACCEPTABLE,
    TIMEOUT,
    UNSUPPORTED,
    TOO_LARGE,
    CONFLICT,
    PRECONDITION,
    URI_TOO_LONG,
];
