//! crates/dreamlog_core/src/error.rs
//!
//! The error taxonomy shared by the validators and resolvers. The core only
//! classifies failures; logging and HTTP mapping happen at the service
//! boundary.

use crate::ports::StoreError;

//=========================================================================================
// Entities and Violations
//=========================================================================================

/// Which entity a lookup failed to resolve. `ParentComment` is distinct from
/// `Comment` so a failed reply names the parent, not the reply itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    Dream,
    Comment,
    ParentComment,
    Topic,
    DreamType,
    Reaction,
    RefreshToken,
}

impl Entity {
    /// Human-readable label used in not-found descriptions.
    pub fn label(&self) -> &'static str {
        match self {
            Entity::User => "User",
            Entity::Dream => "Dream",
            Entity::Comment => "Comment",
            Entity::ParentComment => "Parent comment",
            Entity::Topic => "Topic",
            Entity::DreamType => "Type",
            Entity::Reaction => "Reaction",
            Entity::RefreshToken => "Refresh token",
        }
    }
}

/// The machine-readable class of a single field violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    Required,
    InvalidFormat,
    TooShort,
    NameTaken,
    TopicRequired,
    InvalidTopic,
}

impl ViolationKind {
    pub fn code(&self) -> &'static str {
        match self {
            ViolationKind::Required => "required",
            ViolationKind::InvalidFormat => "invalid_format",
            ViolationKind::TooShort => "too_short",
            ViolationKind::NameTaken => "name_taken",
            ViolationKind::TopicRequired => "topic_required",
            ViolationKind::InvalidTopic => "invalid_topic",
        }
    }
}

/// One field-level validation failure. Validators collect every violation
/// before failing so clients see the full report, never just the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: &'static str,
    pub kind: ViolationKind,
    pub message: String,
}

impl Violation {
    pub fn new(field: &'static str, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            field,
            kind,
            message: message.into(),
        }
    }
}

//=========================================================================================
// The Core Error Type
//=========================================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A lookup did not resolve; carries which entity was missing.
    #[error("{} not found", .0.label())]
    NotFound(Entity),

    /// One or more field violations; the write was rejected as a whole.
    #[error("Validation failed with {} violation(s)", .0.len())]
    Validation(Vec<Violation>),

    /// The storage backend failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Error {
    /// The violations of a validation failure, empty for other variants.
    /// Convenient for assertions and for the wire mapping.
    pub fn violations(&self) -> &[Violation] {
        match self {
            Error::Validation(violations) => violations,
            _ => &[],
        }
    }
}
