//! Events emitted by the state machine after processing commands.
//!
//! These are for logging and for callers that react to changes; the
//! application itself is the source of truth.

use serde::Serialize;

use crate::domain::{ActorUid, IdentityStatus, Section, SectionState, TimestampUtc};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum StepEvent {
    /// A single answer was stored.
    AnswerRecorded {
        section: Section,
        field: &'static str,
    },
    MemberAdded { section: Section, uid: ActorUid },
    MemberUpdated { section: Section, uid: ActorUid },
    MemberRemoved { section: Section, uid: ActorUid },
    MembersReordered { section: Section },
    /// Decision answers were cleared because the collections no longer need them.
    DecisionsReset { section: Section },
    TaskStateChanged {
        section: Section,
        from: SectionState,
        to: SectionState,
    },
    CertificateProviderNotRelatedConfirmed,
    PaymentRecorded { payment_id: String, amount: i64 },
    /// A payment callback was replayed and ignored.
    DuplicatePaymentIgnored { payment_id: String },
    IdentityResultRecorded {
        status: IdentityStatus,
        matches_donor: bool,
    },
    VoucherNamed { uid: ActorUid, attempt: u8 },
    VoucherRemoved { uid: ActorUid },
    Signed { at: TimestampUtc },
    WitnessedByCertificateProvider { at: TimestampUtc },
    WitnessedByIndependentWitness { at: TimestampUtc },
}
