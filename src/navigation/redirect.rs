//! Next-step resolution.
//!
//! After a step's answer has been stored, [`resolve_next_step`] picks where the
//! applicant goes next. Each step has one row in the table below; branching
//! rows match on a tuple of the answers and flags they depend on. A missing
//! answer that the step should have recorded is a defect and is reported as
//! [`EngineError::UnmappedTransition`], never papered over.

use crate::domain::{
    Application, Channel, DecisionMode, Decisions, EngineError, EvidenceDelivery, FeeType,
    IdentityOption, IdentityStatus, NoVoucherDecision, RelationshipKind, RelationshipLength,
    ReplacementStepIn, Result, YesNo,
};
use crate::navigation::guard::{open_after_signing, overview_step};
use crate::navigation::step::Step;

type Row = std::result::Result<Step, &'static str>;

/// Resolves the step that follows `step` for the stored application.
///
/// Once the application is signed, a next step in a stage that has since
/// finished collapses to the overview.
pub fn resolve_next_step(step: Step, app: &Application) -> Result<Step> {
    let next = next_step(step, app).map_err(|reason| {
        tracing::error!(case_id = %app.case_id, step = %step, reason, "unmapped transition");
        EngineError::UnmappedTransition { step, reason }
    })?;

    if app.is_signed() && !open_after_signing(next, app) {
        return Ok(overview_step(app));
    }
    Ok(next)
}

fn next_step(step: Step, app: &Application) -> Row {
    let overview = overview_step(app);

    let next = match step {
        Step::TaskList => Step::Progress,
        Step::Progress => overview,

        // Donor details
        Step::YourDetails if app.can_change_personal_details() => Step::YourName,
        Step::YourDetails => Step::YourAddress,
        Step::YourName => Step::YourDateOfBirth,
        Step::YourDateOfBirth => Step::YourAddress,
        Step::YourAddress => Step::CanYouSignYourLpa,
        Step::CanYouSignYourLpa => match app.donor.can_sign {
            Some(_) => Step::LpaType,
            None => return Err("can sign not answered"),
        },
        Step::LpaType => match app.lpa_type {
            Some(_) => overview,
            None => return Err("lpa type not answered"),
        },

        // Attorneys
        Step::ChooseAttorneysGuidance => Step::ChooseAttorneys,
        Step::ChooseAttorneys if app.attorneys.members.is_empty() => {
            return Err("no attorney entered")
        }
        Step::ChooseAttorneys => Step::ChooseAttorneysAddress,
        Step::EnterTrustCorporation if app.attorneys.trust_corporation.is_none() => {
            return Err("no trust corporation entered")
        }
        Step::EnterTrustCorporation => Step::EnterTrustCorporationAddress,
        Step::ChooseAttorneysAddress | Step::EnterTrustCorporationAddress => {
            Step::ChooseAttorneysSummary
        }
        Step::ChooseAttorneysSummary if app.attorneys.len() > 1 => {
            Step::HowShouldAttorneysMakeDecisions
        }
        Step::ChooseAttorneysSummary => overview,
        Step::RemoveAttorney if app.attorneys.is_empty() => Step::ChooseAttorneys,
        Step::RemoveAttorney => Step::ChooseAttorneysSummary,
        Step::HowShouldAttorneysMakeDecisions => {
            decisions_explainer(&app.attorney_decisions, overview)?
        }
        Step::BecauseYouHaveChosenJointly
        | Step::BecauseYouHaveChosenJointlyForSomeSeverallyForOthers => overview,

        // Replacement attorneys
        Step::DoYouWantReplacementAttorneys => match (
            app.want_replacement_attorneys,
            app.replacement_attorneys.is_empty(),
        ) {
            (Some(YesNo::Yes), true) => Step::ChooseReplacementAttorneys,
            (Some(YesNo::Yes), false) => Step::ChooseReplacementAttorneysSummary,
            (Some(YesNo::No), _) => overview,
            (None, _) => return Err("want replacement attorneys not answered"),
        },
        Step::ChooseReplacementAttorneys if app.replacement_attorneys.is_empty() => {
            return Err("no replacement attorney entered")
        }
        Step::ChooseReplacementAttorneys => Step::ChooseReplacementAttorneysAddress,
        Step::ChooseReplacementAttorneysAddress => Step::ChooseReplacementAttorneysSummary,
        Step::ChooseReplacementAttorneysSummary => replacement_follow_up(app, overview),
        Step::RemoveReplacementAttorney if app.replacement_attorneys.is_empty() => overview,
        Step::RemoveReplacementAttorney => Step::ChooseReplacementAttorneysSummary,
        Step::HowShouldReplacementAttorneysStepIn => match (
            app.replacement_step_in,
            app.replacement_attorneys.len() > 1,
        ) {
            (Some(ReplacementStepIn::WhenAllCanNoLongerAct), true) => {
                Step::HowShouldReplacementAttorneysMakeDecisions
            }
            (Some(_), _) => overview,
            (None, _) => return Err("step in not answered"),
        },
        Step::HowShouldReplacementAttorneysMakeDecisions => {
            decisions_explainer(&app.replacement_attorney_decisions, overview)?
        }

        // Usage conditions and restrictions
        Step::WhenCanTheLpaBeUsed => match app.when_can_be_used {
            Some(_) => overview,
            None => return Err("when can be used not answered"),
        },
        Step::LifeSustainingTreatment => match app.life_sustaining_treatment {
            Some(_) => overview,
            None => return Err("life sustaining treatment not answered"),
        },
        Step::Restrictions => match app.restrictions {
            Some(_) => overview,
            None => return Err("restrictions not answered"),
        },

        // Certificate provider
        Step::WhatACertificateProviderDoes | Step::ChooseNewCertificateProvider => {
            Step::CertificateProviderDetails
        }
        Step::CertificateProviderDetails if !app.certificate_provider.is_named() => {
            return Err("certificate provider not named")
        }
        Step::CertificateProviderDetails => {
            Step::HowWouldCertificateProviderPreferToCarryOutTheirRole
        }
        Step::HowWouldCertificateProviderPreferToCarryOutTheirRole => {
            match app.certificate_provider.channel {
                Some(Channel::Paper) | Some(Channel::Online) => Step::CertificateProviderAddress,
                None => return Err("certificate provider channel not answered"),
            }
        }
        Step::CertificateProviderAddress => Step::HowDoYouKnowYourCertificateProvider,
        Step::HowDoYouKnowYourCertificateProvider => match app.certificate_provider.relationship {
            Some(RelationshipKind::Personally) => Step::HowLongHaveYouKnownCertificateProvider,
            Some(RelationshipKind::Professionally) => Step::CertificateProviderSummary,
            None => return Err("certificate provider relationship not answered"),
        },
        Step::HowLongHaveYouKnownCertificateProvider => {
            match app.certificate_provider.relationship_length {
                Some(RelationshipLength::GreaterThanEqualToTwoYears) => {
                    Step::CertificateProviderSummary
                }
                Some(RelationshipLength::LessThanTwoYears) => Step::ChooseNewCertificateProvider,
                None => return Err("relationship length not answered"),
            }
        }
        Step::CertificateProviderSummary => overview,

        // People to notify
        Step::DoYouWantToNotifyPeople => {
            match (app.want_people_to_notify, app.people_to_notify.is_empty()) {
                (Some(YesNo::Yes), true) => Step::ChoosePeopleToNotify,
                (Some(YesNo::Yes), false) => Step::ChoosePeopleToNotifySummary,
                (Some(YesNo::No), _) => overview,
                (None, _) => return Err("want people to notify not answered"),
            }
        }
        Step::ChoosePeopleToNotify if app.people_to_notify.is_empty() => {
            return Err("no person to notify entered")
        }
        Step::ChoosePeopleToNotify => Step::ChoosePeopleToNotifyAddress,
        Step::ChoosePeopleToNotifyAddress => Step::ChoosePeopleToNotifySummary,
        Step::ChoosePeopleToNotifySummary => overview,
        Step::RemovePersonToNotify if app.people_to_notify.is_empty() => overview,
        Step::RemovePersonToNotify => Step::ChoosePeopleToNotifySummary,

        // Correspondent
        Step::AddCorrespondent => match app.add_correspondent {
            Some(YesNo::Yes) => Step::EnterCorrespondentDetails,
            Some(YesNo::No) => overview,
            None => return Err("add correspondent not answered"),
        },
        Step::EnterCorrespondentDetails => overview,

        // Signatory
        Step::GettingHelpSigning => Step::YourAuthorisedSignatory,
        Step::YourAuthorisedSignatory => Step::YourIndependentWitness,
        Step::YourIndependentWitness => overview,

        // Review
        Step::YouCannotSignYourLpaYet => overview,
        Step::ConfirmYourCertificateProviderIsNotRelated => Step::CheckYourLpa,
        Step::CheckYourLpa => Step::LpaDetailsSaved,
        Step::LpaDetailsSaved
            if app.section_one_completed() && !app.tasks.pay_for_lpa.is_completed() =>
        {
            Step::AboutPayment
        }
        Step::LpaDetailsSaved => overview,

        // Payment
        Step::AboutPayment => Step::AreYouApplyingForFeeDiscountOrExemption,
        Step::AreYouApplyingForFeeDiscountOrExemption => match app.fee.applying_for_reduction {
            Some(YesNo::Yes) => Step::WhichFeeTypeAreYouApplyingFor,
            Some(YesNo::No) => collect_or_skip(app, overview),
            None => return Err("fee reduction not answered"),
        },
        Step::WhichFeeTypeAreYouApplyingFor => match app.fee.fee_type {
            Some(FeeType::FullFee) => collect_or_skip(app, overview),
            Some(_) => Step::EvidenceRequired,
            None => return Err("fee type not answered"),
        },
        Step::EvidenceRequired => Step::HowWouldYouLikeToSendEvidence,
        Step::HowWouldYouLikeToSendEvidence => match app.fee.evidence_delivery {
            Some(EvidenceDelivery::Upload) => Step::UploadEvidence,
            Some(EvidenceDelivery::Post) => Step::SendUsYourEvidenceByPost,
            None => return Err("evidence delivery not answered"),
        },
        Step::UploadEvidence | Step::SendUsYourEvidenceByPost => collect_or_skip(app, overview),
        Step::PayFee if app.fee_amount() > 0 => Step::PaymentConfirmation,
        Step::PayFee => after_fee_settled(app, overview),
        Step::PaymentConfirmation => Step::PaymentSuccessful,
        Step::PaymentSuccessful => after_fee_settled(app, overview),
        Step::EvidenceSuccessfullyUploaded | Step::PendingPayment => overview,

        // Identity
        Step::ConfirmYourIdentity => Step::HowWillYouConfirmYourIdentity,
        Step::HowWillYouConfirmYourIdentity => match app.identity.option {
            Some(IdentityOption::OneLogin) => Step::IdentityWithOneLogin,
            Some(IdentityOption::PostOffice) => Step::CompletingYourIdentityConfirmation,
            None => return Err("identity option not answered"),
        },
        Step::CompletingYourIdentityConfirmation => overview,
        Step::IdentityWithOneLogin => Step::IdentityWithOneLoginCallback,
        Step::IdentityWithOneLoginCallback => match app.identity.status {
            Some(IdentityStatus::Confirmed) if app.donor_identity_confirmed() => {
                after_identity_confirmed(app, overview)
            }
            Some(IdentityStatus::Confirmed) => Step::IdentityDetails,
            Some(IdentityStatus::Failed) => Step::RegisterWithCourtOfProtection,
            Some(IdentityStatus::Expired) => Step::WhatYouCanDoNowExpired,
            Some(IdentityStatus::InsufficientEvidence) => insufficient_evidence_route(app),
            None => return Err("identity result not recorded"),
        },
        Step::IdentityDetails if app.donor_identity_confirmed() => {
            after_identity_confirmed(app, overview)
        }
        Step::IdentityDetails => overview,
        Step::UnableToConfirmIdentity if app.can_have_voucher() => {
            Step::ChooseSomeoneToVouchForYou
        }
        Step::UnableToConfirmIdentity => Step::WhatYouCanDoNow,
        Step::ChooseSomeoneToVouchForYou => match app.vouching.want_voucher {
            Some(YesNo::Yes) => Step::EnterVoucher,
            Some(YesNo::No) => Step::WhatYouCanDoNow,
            None => return Err("want voucher not answered"),
        },
        Step::EnterVoucher => match (app.voucher_named(), app.tasks.pay_for_lpa.is_completed()) {
            (true, true) => Step::WeHaveContactedVoucher,
            (true, false) => overview,
            (false, _) => return Err("no voucher entered"),
        },
        Step::WeHaveContactedVoucher => overview,
        Step::WhatYouCanDoNow | Step::WhatYouCanDoNowExpired => {
            no_voucher_decision(app, overview)?
        }
        Step::AreYouSureYouNoLongerNeedVoucher if app.voucher_named() => overview,
        Step::AreYouSureYouNoLongerNeedVoucher => no_voucher_decision(app, overview)?,
        Step::RegisterWithCourtOfProtection if app.registering_with_court_of_protection => {
            Step::WhatHappensNextRegisteringWithCourtOfProtection
        }
        Step::RegisterWithCourtOfProtection => identity_fallback(app, overview),
        Step::WhatHappensNextRegisteringWithCourtOfProtection => overview,

        // Signing
        Step::HowToSignYourLpa => Step::ReadYourLpa,
        Step::ReadYourLpa => Step::LpaYourLegalRightsAndResponsibilities,
        Step::LpaYourLegalRightsAndResponsibilities if app.donor.cannot_sign() => {
            Step::SignTheLpaOnBehalf
        }
        Step::LpaYourLegalRightsAndResponsibilities => Step::SignYourLpa,
        Step::SignYourLpa | Step::SignTheLpaOnBehalf if !app.is_signed() => {
            return Err("signature not recorded")
        }
        Step::SignYourLpa | Step::SignTheLpaOnBehalf => Step::WitnessingYourSignature,
        Step::WitnessingYourSignature => Step::WitnessingAsCertificateProvider,
        Step::WitnessingAsCertificateProvider if app.donor.cannot_sign() => {
            Step::WitnessingAsIndependentWitness
        }
        Step::WitnessingAsCertificateProvider | Step::WitnessingAsIndependentWitness => {
            Step::YouHaveSubmittedYourLpa
        }

        // Admin
        Step::YouHaveSubmittedYourLpa | Step::ViewLpa | Step::WithdrawThisLpa => Step::Progress,
        Step::DeleteThisLpa | Step::WarningInterruption => overview,
    };

    Ok(next)
}

/// Shows the explanation page only when the answer just changed to a mode
/// that needs one.
fn decisions_explainer(decisions: &Decisions, overview: Step) -> Row {
    match (decisions.mode, decisions.mode_changed) {
        (Some(DecisionMode::Jointly), true) => Ok(Step::BecauseYouHaveChosenJointly),
        (Some(DecisionMode::JointlyForSomeSeverallyForOthers), true) => {
            Ok(Step::BecauseYouHaveChosenJointlyForSomeSeverallyForOthers)
        }
        (Some(_), _) => Ok(overview),
        (None, _) => Err("decision mode not answered"),
    }
}

fn replacement_follow_up(app: &Application, overview: Step) -> Step {
    let several = app.replacement_attorneys.len() > 1;
    let primary_mode = if app.attorneys.len() > 1 {
        app.attorney_decisions.mode
    } else {
        None
    };

    match (primary_mode, several) {
        (Some(DecisionMode::JointlyAndSeverally), _) => Step::HowShouldReplacementAttorneysStepIn,
        (None, true) | (Some(DecisionMode::Jointly), true) => {
            Step::HowShouldReplacementAttorneysMakeDecisions
        }
        _ => overview,
    }
}

/// Pay if anything is owed; otherwise skip collection entirely.
fn collect_or_skip(app: &Application, overview: Step) -> Step {
    if app.fee_amount() > 0 {
        Step::PayFee
    } else {
        after_fee_settled(app, overview)
    }
}

fn after_fee_settled(app: &Application, overview: Step) -> Step {
    match (app.awaiting_fee_decision(), app.fee.evidence_delivery) {
        (true, Some(EvidenceDelivery::Upload)) => Step::EvidenceSuccessfullyUploaded,
        (true, Some(EvidenceDelivery::Post)) => Step::PendingPayment,
        _ => overview,
    }
}

fn after_identity_confirmed(app: &Application, overview: Step) -> Step {
    if app.is_signed() {
        overview
    } else {
        Step::ReadYourLpa
    }
}

fn insufficient_evidence_route(app: &Application) -> Step {
    match (
        app.registering_with_court_of_protection,
        app.voucher_named(),
        app.vouching.want_voucher,
        app.can_have_voucher(),
    ) {
        (true, _, _, _) => Step::WhatHappensNextRegisteringWithCourtOfProtection,
        (false, true, _, _) => Step::WeHaveContactedVoucher,
        (false, false, Some(YesNo::Yes), true) => Step::EnterVoucher,
        (false, false, Some(YesNo::Yes), false) => Step::WhatYouCanDoNow,
        (false, false, Some(YesNo::No), _) => Step::WhatYouCanDoNow,
        (false, false, None, true) => Step::ChooseSomeoneToVouchForYou,
        (false, false, None, false) => Step::WhatYouCanDoNow,
    }
}

/// The "what you can do now" page matching the identity outcome.
fn identity_fallback(app: &Application, overview: Step) -> Step {
    match app.identity.status {
        Some(IdentityStatus::Expired) => Step::WhatYouCanDoNowExpired,
        Some(IdentityStatus::Failed) | Some(IdentityStatus::InsufficientEvidence) => {
            Step::WhatYouCanDoNow
        }
        Some(IdentityStatus::Confirmed) | None => overview,
    }
}

fn no_voucher_decision(app: &Application, overview: Step) -> Row {
    let decision = app
        .vouching
        .no_voucher_decision
        .ok_or("no voucher decision not answered")?;
    if app.voucher_named() {
        return Ok(Step::AreYouSureYouNoLongerNeedVoucher);
    }

    match decision {
        NoVoucherDecision::ProveOwnIdentity => Ok(Step::ConfirmYourIdentity),
        NoVoucherDecision::SelectNewVoucher if app.can_have_voucher() => Ok(Step::EnterVoucher),
        NoVoucherDecision::SelectNewVoucher => Ok(identity_fallback(app, overview)),
        NoVoucherDecision::WithdrawLpa => Ok(Step::WithdrawThisLpa),
        NoVoucherDecision::ApplyToCourtOfProtection if app.registering_with_court_of_protection => {
            Ok(Step::WhatHappensNextRegisteringWithCourtOfProtection)
        }
        NoVoucherDecision::ApplyToCourtOfProtection => Err("court of protection routing not recorded"),
    }
}

#[cfg(test)]
#[path = "tests/redirect_tests.rs"]
mod tests;
