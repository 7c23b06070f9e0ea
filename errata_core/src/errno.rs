//! Platform error code table
//!
//! Maps errno-style names (`ENOENT`, `EACCES`, ...) to a numeric code and a
//! human description. Used to decorate cause-chain lines when a cause carries
//! a recognised code.

use std::collections::HashMap;
use std::io;
use std::sync::OnceLock;

/// One errno table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrnoEntry {
    pub name: &'static str,
    pub errno: i32,
    pub description: &'static str,
}

impl ErrnoEntry {
    pub const fn new(name: &'static str, errno: i32, description: &'static str) -> Self {
        Self {
            name,
            errno,
            description,
        }
    }
}

// ============================================================================
// TABLE
// ============================================================================

static ENTRIES: &[ErrnoEntry] = &[
    ErrnoEntry::new("UNKNOWN", -1, "unknown error"),
    ErrnoEntry::new("OK", 0, "success"),
    ErrnoEntry::new("EOF", 1, "end of file"),
    ErrnoEntry::new("EADDRINFO", 2, "getaddrinfo error"),
    ErrnoEntry::new("EACCES", 3, "permission denied"),
    ErrnoEntry::new("EAGAIN", 4, "resource temporarily unavailable"),
    ErrnoEntry::new("EADDRINUSE", 5, "address already in use"),
    ErrnoEntry::new("EADDRNOTAVAIL", 6, "address not available"),
    ErrnoEntry::new("EAFNOSUPPORT", 7, "address family not supported"),
    ErrnoEntry::new("EALREADY", 8, "connection already in progress"),
    ErrnoEntry::new("EBADF", 9, "bad file descriptor"),
    ErrnoEntry::new("EBUSY", 10, "resource busy or locked"),
    ErrnoEntry::new("ECONNABORTED", 11, "software caused connection abort"),
    ErrnoEntry::new("ECONNREFUSED", 12, "connection refused"),
    ErrnoEntry::new("ECONNRESET", 13, "connection reset by peer"),
    ErrnoEntry::new("EDESTADDRREQ", 14, "destination address required"),
    ErrnoEntry::new("EFAULT", 15, "bad address in system call argument"),
    ErrnoEntry::new("EHOSTUNREACH", 16, "host is unreachable"),
    ErrnoEntry::new("EINTR", 17, "interrupted system call"),
    ErrnoEntry::new("EINVAL", 18, "invalid argument"),
    ErrnoEntry::new("EISCONN", 19, "socket is already connected"),
    ErrnoEntry::new("EMFILE", 20, "too many open files"),
    ErrnoEntry::new("EMSGSIZE", 21, "message too long"),
    ErrnoEntry::new("ENETDOWN", 22, "network is down"),
    ErrnoEntry::new("ENETUNREACH", 23, "network is unreachable"),
    ErrnoEntry::new("ENFILE", 24, "file table overflow"),
    ErrnoEntry::new("ENOBUFS", 25, "no buffer space available"),
    ErrnoEntry::new("ENOMEM", 26, "not enough memory"),
    ErrnoEntry::new("ENOTDIR", 27, "not a directory"),
    ErrnoEntry::new("EISDIR", 28, "illegal operation on a directory"),
    ErrnoEntry::new("ENONET", 29, "machine is not on the network"),
    ErrnoEntry::new("ENOTCONN", 31, "socket is not connected"),
    ErrnoEntry::new("ENOTSOCK", 32, "socket operation on non-socket"),
    ErrnoEntry::new("ENOTSUP", 33, "operation not supported on socket"),
    ErrnoEntry::new("ENOENT", 34, "no such file or directory"),
    ErrnoEntry::new("ENOSYS", 35, "function not implemented"),
    ErrnoEntry::new("EPIPE", 36, "broken pipe"),
    ErrnoEntry::new("EPROTO", 37, "protocol error"),
    ErrnoEntry::new("EPROTONOSUPPORT", 38, "protocol not supported"),
    ErrnoEntry::new("EPROTOTYPE", 39, "protocol wrong type for socket"),
    ErrnoEntry::new("ETIMEDOUT", 40, "connection timed out"),
    ErrnoEntry::new("ECHARSET", 41, "invalid Unicode character"),
    ErrnoEntry::new("EAIFAMNOSUPPORT", 42, "address family for hostname not supported"),
    ErrnoEntry::new("EAISERVICE", 44, "servname not supported for ai_socktype"),
    ErrnoEntry::new("EAISOCKTYPE", 45, "ai_socktype not supported"),
    ErrnoEntry::new("ESHUTDOWN", 46, "cannot send after transport endpoint shutdown"),
    ErrnoEntry::new("EEXIST", 47, "file already exists"),
    ErrnoEntry::new("ESRCH", 48, "no such process"),
    ErrnoEntry::new("ENAMETOOLONG", 49, "name too long"),
    ErrnoEntry::new("EPERM", 50, "operation not permitted"),
    ErrnoEntry::new("ELOOP", 51, "too many symbolic links encountered"),
    ErrnoEntry::new("EXDEV", 52, "cross-device link not permitted"),
    ErrnoEntry::new("ENOTEMPTY", 53, "directory not empty"),
    ErrnoEntry::new("ENOSPC", 54, "no space left on device"),
    ErrnoEntry::new("EIO", 55, "i/o error"),
    ErrnoEntry::new("EROFS", 56, "read-only file system"),
    ErrnoEntry::new("ENODEV", 57, "no such device"),
    ErrnoEntry::new("ESPIPE", 58, "invalid seek"),
    ErrnoEntry::new("ECANCELED", 59, "operation canceled"),
];

static ERRNO_INDEX: OnceLock<HashMap<&'static str, &'static ErrnoEntry>> = OnceLock::new();

fn get_errno_index() -> &'static HashMap<&'static str, &'static ErrnoEntry> {
    ERRNO_INDEX.get_or_init(|| ENTRIES.iter().map(|entry| (entry.name, entry)).collect())
}

// ============================================================================
// LOOKUP FUNCTIONS
// ============================================================================

/// All entries in table order
pub fn all_entries() -> &'static [ErrnoEntry] {
    ENTRIES
}

pub fn lookup(name: &str) -> Option<&'static ErrnoEntry> {
    get_errno_index().get(name).copied()
}

/// Description for a code name, if the table knows it
pub fn describe(name: &str) -> Option<&'static str> {
    lookup(name).map(|entry| entry.description)
}

pub fn lookup_errno(errno: i32) -> Option<&'static ErrnoEntry> {
    ENTRIES.iter().find(|entry| entry.errno == errno)
}

/// Errno-style name for an I/O error kind
pub fn code_for_io_kind(kind: io::ErrorKind) -> Option<&'static str> {
    let name = match kind {
        io::ErrorKind::NotFound => "ENOENT",
        io::ErrorKind::PermissionDenied => "EACCES",
        io::ErrorKind::ConnectionRefused => "ECONNREFUSED",
        io::ErrorKind::ConnectionReset => "ECONNRESET",
        io::ErrorKind::ConnectionAborted => "ECONNABORTED",
        io::ErrorKind::NotConnected => "ENOTCONN",
        io::ErrorKind::AddrInUse => "EADDRINUSE",
        io::ErrorKind::AddrNotAvailable => "EADDRNOTAVAIL",
        io::ErrorKind::BrokenPipe => "EPIPE",
        io::ErrorKind::AlreadyExists => "EEXIST",
        io::ErrorKind::WouldBlock => "EAGAIN",
        io::ErrorKind::InvalidInput => "EINVAL",
        io::ErrorKind::TimedOut => "ETIMEDOUT",
        io::ErrorKind::Interrupted => "EINTR",
        io::ErrorKind::Unsupported => "ENOTSUP",
        io::ErrorKind::OutOfMemory => "ENOMEM",
        io::ErrorKind::UnexpectedEof => "EOF",
        _ => return None,
    };
    Some(name)
}
