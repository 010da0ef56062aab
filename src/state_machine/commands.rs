//! Commands that can mutate an application.
//!
//! All changes MUST go through the state machine's `apply()` method, which
//! validates the command, re-derives the affected sections and logs both the
//! command and the resulting events.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{
    ActorKind, ActorUid, Address, Attorney, AuthorisedSignatory, CanBeUsedWhen, Channel,
    Correspondent, DecisionMode, EvidenceDelivery, FeeDecision, FeeType, IdentityOption,
    IdentityStatus, IndependentWitness, LifeSustainingTreatment, LpaType, NoVoucherDecision,
    PaymentRecord, PersonToNotify, RelationshipKind, RelationshipLength, ReplacementStepIn,
    Section, TrustCorporation, Voucher, YesNo,
};

/// Which attorney collection a command addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttorneyParty {
    Primary,
    Replacement,
}

impl AttorneyParty {
    pub fn section(self) -> Section {
        match self {
            AttorneyParty::Primary => Section::ChooseAttorneys,
            AttorneyParty::Replacement => Section::ChooseReplacementAttorneys,
        }
    }

    pub fn actor_kind(self) -> ActorKind {
        match self {
            AttorneyParty::Primary => ActorKind::Attorney,
            AttorneyParty::Replacement => ActorKind::ReplacementAttorney,
        }
    }
}

/// Commands that can mutate an application.
///
/// Commands that add or rename a party carry `acknowledged_warning`: the
/// descriptor of a same-name warning the applicant has already seen.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum StepCommand {
    // Donor
    SetDonorName {
        first_names: String,
        last_name: String,
        other_names: String,
        acknowledged_warning: Option<String>,
    },
    SetDonorDateOfBirth { date_of_birth: NaiveDate },
    SetDonorAddress { address: Address },
    SetCanSign { can_sign: YesNo },
    SetLpaType { lpa_type: LpaType },

    // Attorneys and replacement attorneys
    /// Adds a member, or updates the member with the same uid.
    PutAttorney {
        party: AttorneyParty,
        attorney: Attorney,
        acknowledged_warning: Option<String>,
    },
    SetAttorneyAddress {
        party: AttorneyParty,
        uid: ActorUid,
        address: Address,
    },
    RemoveAttorney { party: AttorneyParty, uid: ActorUid },
    ReorderAttorneys {
        party: AttorneyParty,
        order: Vec<ActorUid>,
    },
    PutTrustCorporation {
        party: AttorneyParty,
        trust_corporation: TrustCorporation,
    },
    RemoveTrustCorporation { party: AttorneyParty },
    SetDecisions {
        party: AttorneyParty,
        mode: DecisionMode,
        details: String,
    },
    SetWantReplacementAttorneys { answer: YesNo },
    SetReplacementStepIn {
        step_in: ReplacementStepIn,
        details: String,
    },

    // Usage conditions and restrictions
    SetWhenCanBeUsed { when: CanBeUsedWhen },
    SetLifeSustainingTreatment { option: LifeSustainingTreatment },
    SetRestrictions { restrictions: String },

    // Certificate provider
    SetCertificateProviderName {
        first_names: String,
        last_name: String,
        mobile: String,
        acknowledged_warning: Option<String>,
    },
    SetCertificateProviderChannel { channel: Channel, email: String },
    SetCertificateProviderAddress { address: Address },
    SetCertificateProviderRelationship { relationship: RelationshipKind },
    SetCertificateProviderRelationshipLength { length: RelationshipLength },
    ConfirmCertificateProviderNotRelated,

    // People to notify and correspondent
    SetWantPeopleToNotify { answer: YesNo },
    PutPersonToNotify {
        person: PersonToNotify,
        acknowledged_warning: Option<String>,
    },
    SetPersonToNotifyAddress { uid: ActorUid, address: Address },
    RemovePersonToNotify { uid: ActorUid },
    SetAddCorrespondent { answer: YesNo },
    SetCorrespondent { correspondent: Correspondent },

    // Signatory
    SetAuthorisedSignatory {
        signatory: AuthorisedSignatory,
        acknowledged_warning: Option<String>,
    },
    SetIndependentWitness {
        witness: IndependentWitness,
        acknowledged_warning: Option<String>,
    },

    // Payment
    SetApplyingForReduction { answer: YesNo },
    SetFeeType { fee_type: FeeType },
    SetEvidenceDelivery { delivery: EvidenceDelivery },
    RecordFeeDecision { decision: FeeDecision },
    /// Payment provider callback. Replays of the same record are ignored.
    RecordPayment { payment: PaymentRecord },

    // Identity and vouching
    SetIdentityOption { option: IdentityOption },
    RecordIdentityResult {
        status: IdentityStatus,
        first_names: String,
        last_name: String,
        date_of_birth: Option<NaiveDate>,
    },
    SetWantVoucher { answer: YesNo },
    SetVoucher { voucher: Voucher },
    RecordVoucherVerified,
    SetNoVoucherDecision { decision: NoVoucherDecision },
    ConfirmNoLongerNeedVoucher,
    SetRegisteringWithCourtOfProtection { registering: bool },

    // Signing
    Sign,
    WitnessByCertificateProvider,
    WitnessByIndependentWitness,
}

impl StepCommand {
    /// The section whose inputs this command changes. `None` for commands that
    /// only touch data no section derives from.
    pub fn section(&self) -> Option<Section> {
        use StepCommand::*;

        let section = match self {
            SetDonorName { .. }
            | SetDonorDateOfBirth { .. }
            | SetDonorAddress { .. }
            | SetCanSign { .. }
            | SetLpaType { .. } => Section::YourDetails,

            PutAttorney { party, .. }
            | SetAttorneyAddress { party, .. }
            | RemoveAttorney { party, .. }
            | ReorderAttorneys { party, .. }
            | PutTrustCorporation { party, .. }
            | RemoveTrustCorporation { party }
            | SetDecisions { party, .. } => party.section(),
            SetWantReplacementAttorneys { .. } | SetReplacementStepIn { .. } => {
                Section::ChooseReplacementAttorneys
            }

            SetWhenCanBeUsed { .. } | SetLifeSustainingTreatment { .. } => {
                Section::UsageConditions
            }
            SetRestrictions { .. } => Section::Restrictions,

            SetCertificateProviderName { .. }
            | SetCertificateProviderChannel { .. }
            | SetCertificateProviderAddress { .. }
            | SetCertificateProviderRelationship { .. }
            | SetCertificateProviderRelationshipLength { .. } => Section::CertificateProvider,
            ConfirmCertificateProviderNotRelated => return None,

            SetWantPeopleToNotify { .. }
            | PutPersonToNotify { .. }
            | SetPersonToNotifyAddress { .. }
            | RemovePersonToNotify { .. } => Section::PeopleToNotify,
            SetAddCorrespondent { .. } | SetCorrespondent { .. } => Section::AddCorrespondent,
            SetAuthorisedSignatory { .. } | SetIndependentWitness { .. } => {
                Section::ChooseYourSignatory
            }

            SetApplyingForReduction { .. }
            | SetFeeType { .. }
            | SetEvidenceDelivery { .. }
            | RecordFeeDecision { .. }
            | RecordPayment { .. } => Section::PayForLpa,

            SetIdentityOption { .. }
            | RecordIdentityResult { .. }
            | SetWantVoucher { .. }
            | SetVoucher { .. }
            | RecordVoucherVerified
            | SetNoVoucherDecision { .. }
            | ConfirmNoLongerNeedVoucher
            | SetRegisteringWithCourtOfProtection { .. } => Section::ConfirmYourIdentity,

            Sign | WitnessByCertificateProvider | WitnessByIndependentWitness => {
                Section::SignTheLpa
            }
        };
        Some(section)
    }

    /// Whether the command changes what the signed document says.
    pub fn changes_document(&self) -> bool {
        matches!(self, StepCommand::ConfirmCertificateProviderNotRelated)
            || self.section().is_some_and(Section::is_reviewable)
    }
}
