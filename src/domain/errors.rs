//! Error types for the progress engine.
//!
//! A guard miss is not an error: [`crate::navigation::can_reach`] returns
//! `false` and the caller redirects to the task list.

use thiserror::Error;

use crate::domain::name_warning::SameNameWarning;
use crate::domain::types::ActorUid;
use crate::navigation::Step;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed or incomplete step input. The caller re-renders the step.
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// A party was entered with another party's name and the warning was not
    /// acknowledged.
    #[error("same name warning: {0}")]
    NameWarning(SameNameWarning),

    #[error("no member with uid {uid}")]
    UnknownMember { uid: ActorUid },

    /// The review step was completed with nothing changed since the last review.
    #[error("nothing has changed since the last review")]
    NothingToReview,

    /// A resolver has no row for the current combination of answers. This is a
    /// programming defect.
    #[error("no transition from {step:?}: {reason}")]
    UnmappedTransition { step: Step, reason: &'static str },

    /// A collaborator call failed; the source error is kept intact.
    #[error("{collaborator} failed: {source}")]
    Collaborator {
        collaborator: &'static str,
        #[source]
        source: BoxError,
    },
}

impl EngineError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn collaborator(collaborator: &'static str, source: anyhow::Error) -> Self {
        Self::Collaborator {
            collaborator,
            source: source.into(),
        }
    }

    /// Defects that must never be shown to the applicant as a field error.
    pub fn is_defect(&self) -> bool {
        matches!(self, Self::UnmappedTransition { .. })
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
