//! Navigation guard.
//!
//! Each step declares the conditions it needs. A step is reachable when all of
//! them hold. Once the application is signed, only the stages that are still
//! unfinished stay open, and their steps still need their own conditions.

use crate::domain::{Application, IdentityState, IdentityStatus, Section, TaskState, YesNo};
use crate::navigation::step::{Stage, Step};

/// A condition a step can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Donor details and attorneys are both complete.
    DetailsAndAttorneysCompleted,
    CertificateProviderCompleted,
    /// Every reviewable section is complete.
    ReadyForReview,
    /// Nothing has been reviewed yet, or something changed since the review.
    ReviewOutstanding,
    /// Every "fill in" section, including the review, is complete.
    SectionOneCompleted,
    /// Payment is complete, or nothing more can be paid until a caseworker decides.
    PaymentCompletedOrPending,
    /// Identity is confirmed or on a route to confirmation.
    IdentityConfirmedOrRouted,
    CanChangePersonalDetails,
    AttorneysNotEmpty,
    TrustCorporationEntered,
    ReplacementAttorneysNotEmpty,
    PeopleToNotifyNotEmpty,
    CertificateProviderNamed,
    WantsCorrespondent,
    DonorCannotSign,
    IdentityInsufficientEvidence,
    /// Identity check failed, was inconclusive, or expired.
    IdentityUnsuccessful,
    /// Identity check failed or was inconclusive.
    IdentityNeedsAlternative,
    IdentityExpired,
    VouchingAllowed,
    VoucherNamed,
    RegisteringWithCourtOfProtection,
    /// Only reachable after signing.
    Signed,
}

use Requirement::*;

const PAYMENT_BASE: &[Requirement] = &[SectionOneCompleted];
const IDENTITY_BASE: &[Requirement] = &[SectionOneCompleted, PaymentCompletedOrPending];
const SIGNING_BASE: &[Requirement] = &[
    SectionOneCompleted,
    PaymentCompletedOrPending,
    IdentityConfirmedOrRouted,
];

/// The dependency table.
pub fn requirements(step: Step) -> &'static [Requirement] {
    match step {
        Step::TaskList | Step::Progress => &[],

        Step::YourDetails | Step::YourAddress | Step::CanYouSignYourLpa | Step::LpaType => &[],
        Step::YourName | Step::YourDateOfBirth => &[CanChangePersonalDetails],

        Step::ChooseAttorneysGuidance | Step::ChooseAttorneys | Step::EnterTrustCorporation => &[],
        Step::ChooseAttorneysAddress
        | Step::ChooseAttorneysSummary
        | Step::RemoveAttorney
        | Step::HowShouldAttorneysMakeDecisions => &[AttorneysNotEmpty],
        Step::EnterTrustCorporationAddress => &[TrustCorporationEntered],
        Step::BecauseYouHaveChosenJointly
        | Step::BecauseYouHaveChosenJointlyForSomeSeverallyForOthers => &[],

        Step::DoYouWantReplacementAttorneys => &[DetailsAndAttorneysCompleted],
        Step::ChooseReplacementAttorneys => &[],
        Step::ChooseReplacementAttorneysAddress
        | Step::ChooseReplacementAttorneysSummary
        | Step::RemoveReplacementAttorney
        | Step::HowShouldReplacementAttorneysStepIn
        | Step::HowShouldReplacementAttorneysMakeDecisions => &[ReplacementAttorneysNotEmpty],

        Step::WhenCanTheLpaBeUsed
        | Step::LifeSustainingTreatment
        | Step::Restrictions
        | Step::WhatACertificateProviderDoes
        | Step::DoYouWantToNotifyPeople => &[DetailsAndAttorneysCompleted],

        Step::CertificateProviderDetails | Step::ChooseNewCertificateProvider => &[],
        Step::HowWouldCertificateProviderPreferToCarryOutTheirRole
        | Step::CertificateProviderAddress
        | Step::HowDoYouKnowYourCertificateProvider
        | Step::HowLongHaveYouKnownCertificateProvider
        | Step::CertificateProviderSummary => &[CertificateProviderNamed],

        Step::ChoosePeopleToNotify => &[],
        Step::ChoosePeopleToNotifyAddress
        | Step::ChoosePeopleToNotifySummary
        | Step::RemovePersonToNotify => &[PeopleToNotifyNotEmpty],

        Step::AddCorrespondent => &[],
        Step::EnterCorrespondentDetails => &[WantsCorrespondent],

        Step::GettingHelpSigning => &[CertificateProviderCompleted, DonorCannotSign],
        Step::YourAuthorisedSignatory | Step::YourIndependentWitness => &[DonorCannotSign],

        Step::YouCannotSignYourLpaYet | Step::LpaDetailsSaved => &[],
        Step::ConfirmYourCertificateProviderIsNotRelated | Step::CheckYourLpa => {
            &[ReadyForReview, ReviewOutstanding]
        }

        Step::AboutPayment
        | Step::AreYouApplyingForFeeDiscountOrExemption
        | Step::WhichFeeTypeAreYouApplyingFor
        | Step::EvidenceRequired
        | Step::HowWouldYouLikeToSendEvidence
        | Step::UploadEvidence
        | Step::SendUsYourEvidenceByPost
        | Step::PayFee
        | Step::PaymentConfirmation
        | Step::PaymentSuccessful
        | Step::EvidenceSuccessfullyUploaded
        | Step::PendingPayment => PAYMENT_BASE,

        Step::ConfirmYourIdentity
        | Step::HowWillYouConfirmYourIdentity
        | Step::CompletingYourIdentityConfirmation
        | Step::IdentityWithOneLogin
        | Step::IdentityWithOneLoginCallback
        | Step::IdentityDetails => IDENTITY_BASE,
        Step::UnableToConfirmIdentity => &[
            SectionOneCompleted,
            PaymentCompletedOrPending,
            IdentityInsufficientEvidence,
        ],
        Step::ChooseSomeoneToVouchForYou => &[
            SectionOneCompleted,
            PaymentCompletedOrPending,
            IdentityInsufficientEvidence,
            VouchingAllowed,
        ],
        Step::EnterVoucher => &[SectionOneCompleted, PaymentCompletedOrPending, VouchingAllowed],
        Step::WeHaveContactedVoucher | Step::AreYouSureYouNoLongerNeedVoucher => {
            &[SectionOneCompleted, PaymentCompletedOrPending, VoucherNamed]
        }
        Step::WhatYouCanDoNow => &[
            SectionOneCompleted,
            PaymentCompletedOrPending,
            IdentityNeedsAlternative,
        ],
        Step::WhatYouCanDoNowExpired => {
            &[SectionOneCompleted, PaymentCompletedOrPending, IdentityExpired]
        }
        Step::RegisterWithCourtOfProtection => &[
            SectionOneCompleted,
            PaymentCompletedOrPending,
            IdentityUnsuccessful,
        ],
        Step::WhatHappensNextRegisteringWithCourtOfProtection => &[
            SectionOneCompleted,
            PaymentCompletedOrPending,
            RegisteringWithCourtOfProtection,
        ],

        Step::HowToSignYourLpa
        | Step::ReadYourLpa
        | Step::LpaYourLegalRightsAndResponsibilities
        | Step::SignYourLpa
        | Step::SignTheLpaOnBehalf
        | Step::WitnessingYourSignature
        | Step::WitnessingAsCertificateProvider
        | Step::WitnessingAsIndependentWitness
        | Step::YouHaveSubmittedYourLpa => SIGNING_BASE,

        Step::ViewLpa => &[Signed],
        Step::DeleteThisLpa | Step::WithdrawThisLpa | Step::WarningInterruption => &[],
    }
}

fn completed(app: &Application, section: Section) -> bool {
    app.tasks.get(section).is_completed()
}

/// Evaluates one condition against the application.
pub fn holds(requirement: Requirement, app: &Application) -> bool {
    let status = app.identity.status;
    match requirement {
        DetailsAndAttorneysCompleted => {
            completed(app, Section::YourDetails) && completed(app, Section::ChooseAttorneys)
        }
        CertificateProviderCompleted => completed(app, Section::CertificateProvider),
        ReadyForReview => app.ready_for_review(),
        ReviewOutstanding => app.tasks.check_your_lpa != TaskState::Completed,
        SectionOneCompleted => app.section_one_completed(),
        PaymentCompletedOrPending => app.tasks.pay_for_lpa.is_completed_or_pending(),
        IdentityConfirmedOrRouted => {
            app.donor_identity_confirmed()
                || app.tasks.confirm_your_identity == IdentityState::Pending
                || app.registering_with_court_of_protection
                || app.voucher_named()
        }
        CanChangePersonalDetails => app.can_change_personal_details(),
        AttorneysNotEmpty => !app.attorneys.is_empty(),
        TrustCorporationEntered => app.attorneys.trust_corporation.is_some(),
        ReplacementAttorneysNotEmpty => !app.replacement_attorneys.is_empty(),
        PeopleToNotifyNotEmpty => !app.people_to_notify.is_empty(),
        CertificateProviderNamed => app.certificate_provider.is_named(),
        WantsCorrespondent => app.add_correspondent == Some(YesNo::Yes),
        DonorCannotSign => app.donor.cannot_sign(),
        IdentityInsufficientEvidence => status == Some(IdentityStatus::InsufficientEvidence),
        IdentityUnsuccessful => matches!(
            status,
            Some(IdentityStatus::Failed)
                | Some(IdentityStatus::InsufficientEvidence)
                | Some(IdentityStatus::Expired)
        ),
        IdentityNeedsAlternative => matches!(
            status,
            Some(IdentityStatus::Failed) | Some(IdentityStatus::InsufficientEvidence)
        ),
        IdentityExpired => status == Some(IdentityStatus::Expired),
        VouchingAllowed => app.can_have_voucher(),
        VoucherNamed => app.voucher_named(),
        RegisteringWithCourtOfProtection => app.registering_with_court_of_protection,
        Signed => app.is_signed(),
    }
}

impl Requirement {
    /// Conditions that held when the application was signed and that later
    /// answers cannot undo.
    fn implied_by_signing(self) -> bool {
        matches!(
            self,
            SectionOneCompleted | PaymentCompletedOrPending | IdentityConfirmedOrRouted
        )
    }
}

/// Whether the stage a step belongs to still has work to do after signing.
pub(crate) fn open_after_signing(step: Step, app: &Application) -> bool {
    match step.stage() {
        Stage::Admin => true,
        Stage::Overview => step == Step::Progress || !app.completed_all_tasks(),
        Stage::Payment => !app.tasks.pay_for_lpa.is_completed(),
        Stage::Identity => !app.tasks.confirm_your_identity.is_completed(),
        Stage::Signing => !app.tasks.sign_the_lpa.is_completed(),
        Stage::FillIn => false,
    }
}

/// Where to send the applicant when a step is out of reach: the task list, or
/// the progress page once a signed application has nothing left to do.
pub fn overview_step(app: &Application) -> Step {
    if app.is_signed() && app.completed_all_tasks() {
        Step::Progress
    } else {
        Step::TaskList
    }
}

/// Whether `step` may be shown now. Never mutates the application; callers
/// redirect to [`overview_step`] when this returns false.
pub fn can_reach(app: &Application, step: Step) -> bool {
    let signed = app.is_signed();
    let reachable = (!signed || open_after_signing(step, app))
        && requirements(step)
            .iter()
            .filter(|r| !(signed && r.implied_by_signing()))
            .all(|r| holds(*r, app));

    if !reachable {
        tracing::debug!(case_id = %app.case_id, step = %step, "step not reachable");
    }
    reachable
}
