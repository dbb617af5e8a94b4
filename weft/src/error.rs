//! Error taxonomy for the resolution pipeline.
//!
//! Each family maps to one failure surface: reference resolution, network
//! retrieval, style compilation, and host element registration. Everything is
//! reported through logging at the discovery boundary; a failed component
//! simply never reaches `Resolved`.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// A resource reference that could not be turned into a canonical path.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PathResolutionError {
    #[error("malformed reference '{reference}': {message}")]
    Malformed { reference: String, message: String },

    #[error("unsupported reference '{0}'")]
    Unsupported(String),
}

/// Network retrieval failures.
///
/// Cloneable so the single-flight cache can hand the same settled error to
/// every waiter of a shared in-flight retrieval.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    #[error("network retrieval failed for {url}: {message}")]
    Network { url: String, message: String },

    #[error("non-success status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("retrieval timed out after {timeout_ms}ms for {url}")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("retrieval task failed: {0}")]
    Internal(String),
}

/// Style compilation failures.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CompileError {
    #[error("no style compiler capability is configured")]
    CompilerUnavailable,

    #[error("style compilation failed: {0}")]
    Failed(String),
}

/// Reason reported by the host registration capability.
///
/// Tagged rather than free-form so the suppression policy can match on the
/// reason instead of on message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationErrorReason {
    /// A component with that element name is already registered.
    DuplicateName,
    /// The element name is not acceptable to the host.
    InvalidName,
    /// Anything else; treated as fatal for the component's setup.
    Other(String),
}

impl std::fmt::Display for RegistrationErrorReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateName => write!(f, "a type with that name is already registered"),
            Self::InvalidName => write!(f, "the type name is invalid"),
            Self::Other(message) => write!(f, "{}", message),
        }
    }
}

/// Raised by the host registration capability.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("registration of '{element_name}' failed: {reason}")]
pub struct RegistrationError {
    pub element_name: String,
    pub reason: RegistrationErrorReason,
}

/// Top-level error for component resolution.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResolveError {
    #[error(transparent)]
    Path(#[from] PathResolutionError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error("component '{element_name}': {failed} of {total} style references failed to resolve")]
    StylesFailed {
        element_name: String,
        failed: usize,
        total: usize,
    },

    #[error("internal error: {0}")]
    Internal(String),
}
