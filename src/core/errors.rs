//! Domain error types
//!
//! These errors represent business logic failures, distinct from
//! collaborator/transport failures (which stay `anyhow` at the seams).
//! Using thiserror for ergonomic error handling with proper Display
//! implementations.

use thiserror::Error;

/// Coarse classification frontends use to decide how to react: validation
/// failures are user-input problems, invalid-state failures mean a control
/// fired while the conversation forbids it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    InvalidState,
}

/// Errors from Turn construction and enrichment
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TurnError {
    /// Content was empty after trimming
    #[error("turn content is empty")]
    EmptyContent,

    /// Role string was neither "user" nor "agent"
    #[error("unknown turn role: {0}")]
    UnknownRole(String),

    /// User turns never carry plan/code/log sections
    #[error("user turns cannot carry structured sections")]
    SectionsOnUserTurn,
}

impl TurnError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}

/// Errors from the consent gate state machine
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GateError {
    /// Risk level outside the 0-10 scale
    #[error("risk level {0} is outside the 0-10 scale")]
    RiskOutOfRange(u8),

    /// open() while a proposal is still unresolved
    #[error("a proposal is already pending")]
    AlreadyPending,

    /// approve()/deny() with no pending proposal
    #[error("no proposal is pending")]
    NotPending,
}

impl GateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RiskOutOfRange(_) => ErrorKind::Validation,
            Self::AlreadyPending | Self::NotPending => ErrorKind::InvalidState,
        }
    }
}

/// Errors from conversation controller operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConversationError {
    /// submit() with blank text
    #[error("prompt is empty")]
    EmptyPrompt,

    /// submit() while a previous submission is still outstanding
    #[error("still awaiting the agent's response")]
    AlreadyAwaiting,

    /// submit() while an action proposal awaits a decision
    #[error("an action proposal is awaiting a decision")]
    ProposalPending,

    /// Turn validation failure propagated from the model
    #[error(transparent)]
    Turn(#[from] TurnError),

    /// Consent gate failure
    #[error(transparent)]
    Gate(#[from] GateError),
}

impl ConversationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyPrompt => ErrorKind::Validation,
            Self::AlreadyAwaiting | Self::ProposalPending => ErrorKind::InvalidState,
            Self::Turn(err) => err.kind(),
            Self::Gate(err) => err.kind(),
        }
    }
}
