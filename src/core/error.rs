//! Error types for the dump engine and its auth sources.
//!
//! [`DumpError`] is what callers of the engine see. [`SourceError`] is what an
//! [`AuthSource`](crate::adapters::AuthSource) reports; the engine wraps it in
//! [`DumpError::Upstream`] together with the call that failed.

use std::fmt;
use thiserror::Error;

/// Failure of a single dump invocation.
#[derive(Debug, Error)]
pub enum DumpError {
    /// The live auth revision equals the caller's baseline; nothing was read.
    ///
    /// Not a failure: callers should treat this as "nothing to do".
    #[error("unchanged: auth revision is the same as before ({revision})")]
    Unchanged { revision: u64 },

    /// A read against the auth source failed.
    #[error("{call} failed: {source}")]
    Upstream {
        call: UpstreamCall,
        #[source]
        source: SourceError,
    },

    /// The auth revision moved between the first and the last status read.
    #[error(
        "authentication configuration was changed during the dump \
         (auth revision {start} at start, {end} at end)"
    )]
    ChangedDuringDump { start: u64, end: u64 },

    /// The dump context was cancelled.
    #[error("dump cancelled")]
    Cancelled,

    /// The dump context deadline passed.
    #[error("dump deadline exceeded")]
    DeadlineExceeded,
}

impl DumpError {
    /// Create an Upstream error for the given call.
    pub fn upstream(call: UpstreamCall, source: SourceError) -> Self {
        Self::Upstream { call, source }
    }

    /// Create a ChangedDuringDump error.
    pub fn changed_during_dump(start: u64, end: u64) -> Self {
        Self::ChangedDuringDump { start, end }
    }

    /// Check if this is the "nothing changed" signal rather than a failure.
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged { .. })
    }

    /// Check if running the same dump again may succeed.
    pub fn is_retriable(&self) -> bool {
        match self {
            Self::ChangedDuringDump { .. } => true,
            Self::Upstream { source, .. } => source.is_transient(),
            _ => false,
        }
    }
}

/// Result type using DumpError.
pub type DumpResult<T> = Result<T, DumpError>;

/// The read that an [`DumpError::Upstream`] error came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamCall {
    AuthStatus,
    RoleList,
    RoleGet { role: String },
    UserList,
    UserGet { user: String },
}

impl fmt::Display for UpstreamCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuthStatus => write!(f, "AuthStatus"),
            Self::RoleList => write!(f, "RoleList"),
            Self::RoleGet { role } => write!(f, "RoleGet({:?})", role),
            Self::UserList => write!(f, "UserList"),
            Self::UserGet { user } => write!(f, "UserGet({:?})", user),
        }
    }
}

/// Error reported by an auth source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The server answered with a non-OK gRPC status.
    #[error("rpc error: code = {code} desc = {message}")]
    Rpc { code: GrpcCode, message: String },

    /// The connection to the server failed.
    #[error("transport error: {message}")]
    Transport { message: String },

    /// A permission carried a type outside READ/WRITE/READWRITE.
    #[error("unknown permission type {perm_type}")]
    UnknownPermissionType { perm_type: i32 },

    /// The requested role or user does not exist.
    #[error("{kind} {name:?} not found")]
    NotFound { kind: &'static str, name: String },
}

impl SourceError {
    /// Create an Rpc error.
    pub fn rpc(code: GrpcCode, message: impl Into<String>) -> Self {
        Self::Rpc {
            code,
            message: message.into(),
        }
    }

    /// Create a Transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a NotFound error for a role.
    pub fn role_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "role",
            name: name.into(),
        }
    }

    /// Create a NotFound error for a user.
    pub fn user_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "user",
            name: name.into(),
        }
    }

    /// Check if the failure is likely to go away on its own.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Rpc { code, .. } => matches!(
                code,
                GrpcCode::Unavailable | GrpcCode::DeadlineExceeded | GrpcCode::ResourceExhausted
            ),
            Self::Transport { .. } => true,
            _ => false,
        }
    }
}

/// gRPC status codes as reported by the etcd server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrpcCode {
    Ok = 0,
    Cancelled = 1,
    Unknown = 2,
    InvalidArgument = 3,
    DeadlineExceeded = 4,
    NotFound = 5,
    AlreadyExists = 6,
    PermissionDenied = 7,
    ResourceExhausted = 8,
    FailedPrecondition = 9,
    Aborted = 10,
    OutOfRange = 11,
    Unimplemented = 12,
    Internal = 13,
    Unavailable = 14,
    DataLoss = 15,
    Unauthenticated = 16,
}

impl GrpcCode {
    /// Map a numeric status code; anything out of range is Unknown.
    pub fn from_i32(code: i32) -> Self {
        match code {
            0 => Self::Ok,
            1 => Self::Cancelled,
            3 => Self::InvalidArgument,
            4 => Self::DeadlineExceeded,
            5 => Self::NotFound,
            6 => Self::AlreadyExists,
            7 => Self::PermissionDenied,
            8 => Self::ResourceExhausted,
            9 => Self::FailedPrecondition,
            10 => Self::Aborted,
            11 => Self::OutOfRange,
            12 => Self::Unimplemented,
            13 => Self::Internal,
            14 => Self::Unavailable,
            15 => Self::DataLoss,
            16 => Self::Unauthenticated,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for GrpcCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
