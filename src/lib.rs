//! Progress tracking and step gating for a lasting power of attorney
//! application wizard.
//!
//! # Architecture
//!
//! - **Domain** (`domain/`): the application aggregate, its parties and the
//!   collaborator contracts
//! - **Derivation** (`derivation.rs`): section states as pure functions of the
//!   application
//! - **Change fingerprint** (`change_fingerprint.rs`): detects document changes
//!   since the last review
//! - **Navigation** (`navigation/`): step guards and next-step resolution
//! - **State machine** (`state_machine/`): the single mutation path for answers
//! - **Review** (`review/`): review completion and certificate-provider
//!   notifications
//! - **Presenter** (`presenter.rs`): the task list view

pub mod change_fingerprint;
pub mod config;
pub mod derivation;
pub mod domain;
pub mod navigation;
pub mod presenter;
pub mod review;
pub mod state_machine;
pub mod structured_logger;

#[cfg(test)]
mod test_support;

pub use config::EngineConfig;
pub use domain::{Application, EngineError, Result};
pub use navigation::{can_reach, resolve_next_step, Step};
pub use review::{resolve_notification_branch, ReviewService};
pub use state_machine::{ApplicationStateMachine, StepCommand, StepEvent};
