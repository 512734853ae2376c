//! Unified error handling for slirc-feedbot.
//!
//! Each concern gets its own error enum. None of these ever reach the chat
//! transport: the dispatcher and translator catch them at their boundary and
//! either drop them (logged) or render a placeholder line.

use thiserror::Error;

// ============================================================================
// Data lookup errors (feed data requests)
// ============================================================================

/// Errors raised while resolving a `/data-<kind> <key>` request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("unknown data kind: {0}")]
    UnknownDataKind(String),

    #[error("no {kind} named {key}")]
    UnknownEntity { kind: &'static str, key: String },

    #[error("malformed data request: {0}")]
    MalformedRequest(String),
}

impl LookupError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownDataKind(_) => "unknown_data_kind",
            Self::UnknownEntity { .. } => "unknown_entity",
            Self::MalformedRequest(_) => "malformed_request",
        }
    }
}

// ============================================================================
// Alias resolution errors
// ============================================================================

/// Failure to turn a command name into a handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("alias chain for {name} exceeded {hops} hops")]
    AliasCycle { name: String, hops: usize },
}

impl ResolveError {
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownCommand(_) => "unknown_command",
            Self::AliasCycle { .. } => "alias_cycle",
        }
    }
}

// ============================================================================
// Handler errors (command processing)
// ============================================================================

/// Errors a command handler may return.
///
/// The dispatcher logs these and produces no chat output for them.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("permission denied for {0}")]
    PermissionDenied(String),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("command failed: {0}")]
    Failed(String),
}

impl CommandError {
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingArgument(_) => "missing_argument",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::PermissionDenied(_) => "permission_denied",
            Self::Lookup(e) => e.error_code(),
            Self::Failed(_) => "failed",
        }
    }
}

/// Result type for command handlers.
pub type HandlerResult = Result<(), CommandError>;

// ============================================================================
// Scoring errors
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error("match has already ended")]
    AlreadyEnded,
}

/// Score persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

// ============================================================================
// Transport errors
// ============================================================================

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("codec error: {0}")]
    Codec(#[from] tokio_util::codec::LinesCodecError),

    #[error("connection closed")]
    Closed,
}
