//! Domain model for one legal-document application.
//!
//! # Architecture
//!
//! - **Types** (`types.rs`): identifiers and closed answer enums
//! - **Roster** (`roster.rs`): uid-keyed member storage
//! - **Actors** (`actors.rs`): the named parties and their completeness rules
//! - **Application** (`application.rs`): the aggregate root
//! - **Tasks** (`tasks.rs`): per-section states
//! - **Services** (`services.rs`): collaborator contracts

pub mod actors;
pub mod application;
pub mod errors;
pub mod name_warning;
pub mod roster;
pub mod services;
pub mod tasks;
pub mod types;

pub use actors::{
    Address, Attorney, Attorneys, AuthorisedSignatory, CertificateProvider, Correspondent, Donor,
    IndependentWitness, PersonToNotify, TrustCorporation, Voucher,
};
pub use application::{
    Application, FeeRecord, IdentityRecord, PaymentRecord, ReviewRecord, Signing, Vouching,
    FULL_FEE_PENCE, HALF_FEE_PENCE, MAX_VOUCH_ATTEMPTS,
};
pub use errors::{EngineError, Result};
pub use name_warning::{ActorKind, SameNameWarning};
pub use roster::{Member, Roster};
pub use services::{
    ApplicationStore, Clock, NotificationPayload, NotificationSender, NotificationTemplate,
    PartyProgress, PartyProgressLookup, Recipient, Reminder, ReminderAction, ReminderScheduler,
    SystemClock,
};
pub use tasks::{IdentityState, PaymentState, Section, SectionState, TaskState, Tasks};
pub use types::{
    ActorUid, CanBeUsedWhen, CaseId, CaseReference, Channel, ContentHash, DecisionMode,
    Decisions, EvidenceDelivery, FeeDecision, FeeType, IdentityOption, IdentityStatus,
    LifeSustainingTreatment, LpaType, NoVoucherDecision, RelationshipKind, RelationshipLength,
    ReplacementStepIn, TimestampUtc, YesNo,
};
