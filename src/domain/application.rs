//! The application aggregate root.
//!
//! One `Application` holds everything entered for a case so far. Section
//! states in [`Tasks`] are always derived from the other fields by
//! [`crate::derivation`] and are never edited directly.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::actors::{
    Attorneys, AuthorisedSignatory, CertificateProvider, Correspondent, Donor,
    IndependentWitness, PersonToNotify, Voucher,
};
use crate::domain::name_warning::names_equal;
use crate::domain::roster::Roster;
use crate::domain::tasks::{Section, Tasks};
use crate::domain::types::{
    CanBeUsedWhen, CaseId, CaseReference, ContentHash, DecisionMode, Decisions, EvidenceDelivery,
    FeeDecision, FeeType, IdentityOption, IdentityStatus, LifeSustainingTreatment, LpaType,
    NoVoucherDecision, ReplacementStepIn, TimestampUtc, YesNo,
};

/// Cost of a full-fee application, in pence.
pub const FULL_FEE_PENCE: i64 = 8200;
/// Cost of a half-fee or repeat application, in pence.
pub const HALF_FEE_PENCE: i64 = 4100;
/// A donor may ask at most this many people to vouch for them.
pub const MAX_VOUCH_ATTEMPTS: u8 = 2;

/// Moment of review plus the fingerprint taken at that moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub checked_at: Option<TimestampUtc>,
    #[serde(default)]
    pub content_hash: ContentHash,
}

impl ReviewRecord {
    pub fn is_reviewed(&self) -> bool {
        self.checked_at.is_some()
    }
}

/// One payment reported by the payment provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub payment_id: String,
    pub reference: String,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeeRecord {
    pub applying_for_reduction: Option<YesNo>,
    pub fee_type: Option<FeeType>,
    pub evidence_delivery: Option<EvidenceDelivery>,
    pub decision: Option<FeeDecision>,
}

/// Identity details returned by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub option: Option<IdentityOption>,
    pub status: Option<IdentityStatus>,
    #[serde(default)]
    pub first_names: String,
    #[serde(default)]
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub checked_at: Option<TimestampUtc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Vouching {
    pub want_voucher: Option<YesNo>,
    pub voucher: Option<Voucher>,
    #[serde(default)]
    pub vouch_attempts: u8,
    pub no_voucher_decision: Option<NoVoucherDecision>,
    #[serde(default)]
    pub verified_by_voucher: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Signing {
    pub signed_at: Option<TimestampUtc>,
    pub witnessed_by_certificate_provider_at: Option<TimestampUtc>,
    pub witnessed_by_independent_witness_at: Option<TimestampUtc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub case_id: CaseId,
    pub case_reference: Option<CaseReference>,
    pub lpa_type: Option<LpaType>,
    pub donor: Donor,

    pub attorneys: Attorneys,
    pub attorney_decisions: Decisions,
    pub want_replacement_attorneys: Option<YesNo>,
    pub replacement_attorneys: Attorneys,
    pub replacement_attorney_decisions: Decisions,
    pub replacement_step_in: Option<ReplacementStepIn>,
    #[serde(default)]
    pub replacement_step_in_details: String,

    pub when_can_be_used: Option<CanBeUsedWhen>,
    pub life_sustaining_treatment: Option<LifeSustainingTreatment>,
    pub restrictions: Option<String>,

    pub certificate_provider: CertificateProvider,
    #[serde(default)]
    pub certificate_provider_not_related: ReviewRecord,
    pub certificate_provider_invited_at: Option<TimestampUtc>,

    pub want_people_to_notify: Option<YesNo>,
    pub people_to_notify: Roster<PersonToNotify>,
    pub add_correspondent: Option<YesNo>,
    pub correspondent: Correspondent,
    pub authorised_signatory: AuthorisedSignatory,
    pub independent_witness: IndependentWitness,

    #[serde(default)]
    pub review: ReviewRecord,
    #[serde(default)]
    pub fee: FeeRecord,
    #[serde(default)]
    pub payments: Vec<PaymentRecord>,
    #[serde(default)]
    pub identity: IdentityRecord,
    #[serde(default)]
    pub vouching: Vouching,
    #[serde(default)]
    pub registering_with_court_of_protection: bool,
    #[serde(default)]
    pub signing: Signing,

    #[serde(default)]
    pub tasks: Tasks,
    pub created_at: TimestampUtc,
    pub updated_at: TimestampUtc,
}

impl Application {
    /// An empty application, as created on case start.
    pub fn new(case_id: CaseId, now: TimestampUtc) -> Self {
        Self {
            case_id,
            case_reference: None,
            lpa_type: None,
            donor: Donor::default(),
            attorneys: Attorneys::default(),
            attorney_decisions: Decisions::default(),
            want_replacement_attorneys: None,
            replacement_attorneys: Attorneys::default(),
            replacement_attorney_decisions: Decisions::default(),
            replacement_step_in: None,
            replacement_step_in_details: String::new(),
            when_can_be_used: None,
            life_sustaining_treatment: None,
            restrictions: None,
            certificate_provider: CertificateProvider::default(),
            certificate_provider_not_related: ReviewRecord::default(),
            certificate_provider_invited_at: None,
            want_people_to_notify: None,
            people_to_notify: Roster::new(),
            add_correspondent: None,
            correspondent: Correspondent::default(),
            authorised_signatory: AuthorisedSignatory::default(),
            independent_witness: IndependentWitness::default(),
            review: ReviewRecord::default(),
            fee: FeeRecord::default(),
            payments: Vec::new(),
            identity: IdentityRecord::default(),
            vouching: Vouching::default(),
            registering_with_court_of_protection: false,
            signing: Signing::default(),
            tasks: Tasks::default(),
            created_at: now,
            updated_at: now,
        }
    }

    // ========================================================================
    // Fees and payments
    // ========================================================================

    /// Total cost in pence. A denied reduction reverts to the full fee.
    pub fn cost(&self) -> i64 {
        if self.fee.decision == Some(FeeDecision::Denied) {
            return FULL_FEE_PENCE;
        }
        match self.fee.fee_type {
            None | Some(FeeType::FullFee) => FULL_FEE_PENCE,
            Some(FeeType::HalfFee) | Some(FeeType::RepeatApplicationFee) => HALF_FEE_PENCE,
            Some(FeeType::NoFee) | Some(FeeType::HardshipFee) => 0,
        }
    }

    pub fn paid(&self) -> i64 {
        self.payments.iter().map(|p| p.amount).sum()
    }

    /// Amount still to pay, never negative.
    pub fn fee_amount(&self) -> i64 {
        (self.cost() - self.paid()).max(0)
    }

    /// A reduced fee has been applied for and the caseworker has not yet accepted it.
    pub fn awaiting_fee_decision(&self) -> bool {
        self.fee.fee_type.is_some_and(FeeType::requires_evidence)
            && matches!(
                self.fee.decision,
                None | Some(FeeDecision::MoreEvidenceRequired)
            )
    }

    /// Appends a payment unless an identical record is already present.
    /// Returns true when the record was added.
    pub fn record_payment(&mut self, record: PaymentRecord) -> bool {
        if self.payments.contains(&record) {
            return false;
        }
        self.payments.push(record);
        true
    }

    // ========================================================================
    // Identity and vouching
    // ========================================================================

    /// The provider confirmed an identity that matches the donor's details,
    /// or a voucher has verified them.
    pub fn donor_identity_confirmed(&self) -> bool {
        if self.vouching.verified_by_voucher {
            return true;
        }
        self.identity.status == Some(IdentityStatus::Confirmed)
            && names_equal(&self.identity.first_names, &self.donor.first_names)
            && names_equal(&self.identity.last_name, &self.donor.last_name)
            && self.identity.date_of_birth.is_some()
            && self.identity.date_of_birth == self.donor.date_of_birth
    }

    pub fn can_have_voucher(&self) -> bool {
        self.vouching.vouch_attempts < MAX_VOUCH_ATTEMPTS
    }

    pub fn voucher_named(&self) -> bool {
        self.vouching.voucher.as_ref().is_some_and(Voucher::is_named)
    }

    /// Name and date of birth are fixed once identity checks have begun.
    pub fn can_change_personal_details(&self) -> bool {
        self.identity.status.is_none() && !self.voucher_named()
    }

    // ========================================================================
    // Decisions
    // ========================================================================

    /// Clears decision answers that no longer apply after the rosters or the
    /// primary decision mode changed.
    pub fn normalise_decisions(&mut self) {
        let attorney_count = self.attorneys.len();
        let replacement_count = self.replacement_attorneys.len();

        match attorney_count {
            0 => self.attorney_decisions.clear(),
            1 => {
                if self.attorney_decisions.mode != Some(DecisionMode::Solely) {
                    self.attorney_decisions.clear();
                    self.attorney_decisions.mode = Some(DecisionMode::Solely);
                }
                self.attorney_decisions.details.clear();
            }
            _ => {
                if self.attorney_decisions.is_mode(DecisionMode::Solely) {
                    self.attorney_decisions.clear();
                }
                if !self
                    .attorney_decisions
                    .is_mode(DecisionMode::JointlyForSomeSeverallyForOthers)
                {
                    self.attorney_decisions.details.clear();
                }
            }
        }

        if replacement_count <= 1 {
            self.replacement_attorney_decisions.clear();
        } else if !self
            .replacement_attorney_decisions
            .is_mode(DecisionMode::JointlyForSomeSeverallyForOthers)
        {
            self.replacement_attorney_decisions.details.clear();
        }

        if replacement_count == 0 {
            self.replacement_step_in = None;
            self.replacement_step_in_details.clear();
            return;
        }

        match self.attorney_decisions.mode {
            _ if attorney_count <= 1 => {
                self.replacement_step_in = None;
                self.replacement_step_in_details.clear();
            }
            Some(DecisionMode::Jointly) => {
                self.replacement_step_in = None;
                self.replacement_step_in_details.clear();
            }
            Some(DecisionMode::JointlyAndSeverally) => {
                if self.replacement_step_in != Some(ReplacementStepIn::WhenAllCanNoLongerAct) {
                    self.replacement_attorney_decisions.clear();
                }
                if self.replacement_step_in != Some(ReplacementStepIn::AnotherWay) {
                    self.replacement_step_in_details.clear();
                }
            }
            _ => {
                self.replacement_attorney_decisions.clear();
                self.replacement_step_in = None;
                self.replacement_step_in_details.clear();
            }
        }
    }

    // ========================================================================
    // Progress
    // ========================================================================

    pub fn is_signed(&self) -> bool {
        self.signing.signed_at.is_some()
    }

    /// Sections that apply to this application, in task-list order.
    pub fn applicable_sections(&self) -> impl Iterator<Item = Section> + '_ {
        Section::ALL
            .into_iter()
            .filter(move |s| *s != Section::ChooseYourSignatory || self.donor.cannot_sign())
    }

    /// Every applicable section is complete.
    pub fn completed_all_tasks(&self) -> bool {
        self.applicable_sections()
            .all(|section| self.tasks.get(section).is_completed())
    }

    /// Every reviewable section is complete, not counting the review itself.
    pub fn ready_for_review(&self) -> bool {
        self.applicable_sections()
            .filter(|s| s.is_reviewable())
            .all(|section| self.tasks.get(section).is_completed())
    }

    /// All of the "fill in your LPA" sections, including the review, are complete.
    pub fn section_one_completed(&self) -> bool {
        self.ready_for_review() && self.tasks.check_your_lpa.is_completed()
    }

    /// Whether any attorney or replacement attorney is under 18 on `today`.
    pub fn has_underage_attorney(&self, today: NaiveDate) -> bool {
        self.attorneys
            .iter()
            .chain(self.replacement_attorneys.iter())
            .any(|a| a.age_on(today).is_some_and(|age| age < 18))
    }
}

#[cfg(test)]
#[path = "tests/application_tests.rs"]
mod tests;
