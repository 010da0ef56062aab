//! Handlers for payment, identity and signing commands.
//!
//! None of these change the document, so none of them affect the review.

use crate::domain::name_warning::names_equal;
use crate::domain::{
    Application, EngineError, FeeType, NoVoucherDecision, Result, Section, TimestampUtc, YesNo,
};
use crate::navigation::{can_reach, Step};
use crate::state_machine::commands::StepCommand;
use crate::state_machine::events::StepEvent;

fn recorded(section: Section, field: &'static str) -> Vec<StepEvent> {
    vec![StepEvent::AnswerRecorded { section, field }]
}

fn require_reduced_fee(app: &Application, field: &'static str) -> Result<()> {
    if app.fee.fee_type.is_some_and(FeeType::requires_evidence) {
        Ok(())
    } else {
        Err(EngineError::validation(
            field,
            "only applies when applying for a reduced fee",
        ))
    }
}

fn require_signed(app: &Application) -> Result<()> {
    if app.is_signed() {
        Ok(())
    } else {
        Err(EngineError::validation("signing", "the LPA has not been signed"))
    }
}

/// Follows up a no-voucher decision that needs more than the answer itself.
fn act_on_no_voucher_decision(app: &mut Application, decision: NoVoucherDecision) {
    match decision {
        NoVoucherDecision::ApplyToCourtOfProtection => {
            app.registering_with_court_of_protection = true;
        }
        NoVoucherDecision::SelectNewVoucher => {
            app.vouching.want_voucher = Some(YesNo::Yes);
        }
        NoVoucherDecision::ProveOwnIdentity | NoVoucherDecision::WithdrawLpa => {}
    }
}

pub(super) fn apply(
    app: &mut Application,
    command: StepCommand,
    now: TimestampUtc,
) -> Result<Vec<StepEvent>> {
    use StepCommand::*;

    match command {
        SetApplyingForReduction { answer } => {
            app.fee.applying_for_reduction = Some(answer);
            if answer == YesNo::No {
                app.fee.fee_type = Some(FeeType::FullFee);
                app.fee.evidence_delivery = None;
                app.fee.decision = None;
            }
            Ok(recorded(Section::PayForLpa, "applying_for_reduction"))
        }

        SetFeeType { fee_type } => {
            if app.fee.fee_type != Some(fee_type) {
                app.fee.decision = None;
            }
            app.fee.fee_type = Some(fee_type);
            if !fee_type.requires_evidence() {
                app.fee.evidence_delivery = None;
            }
            Ok(recorded(Section::PayForLpa, "fee_type"))
        }

        SetEvidenceDelivery { delivery } => {
            require_reduced_fee(app, "evidence_delivery")?;
            app.fee.evidence_delivery = Some(delivery);
            Ok(recorded(Section::PayForLpa, "evidence_delivery"))
        }

        RecordFeeDecision { decision } => {
            require_reduced_fee(app, "decision")?;
            app.fee.decision = Some(decision);
            Ok(recorded(Section::PayForLpa, "decision"))
        }

        RecordPayment { payment } => {
            if payment.amount <= 0 {
                return Err(EngineError::validation("amount", "payment amount must be positive"));
            }
            let payment_id = payment.payment_id.clone();
            let amount = payment.amount;
            if app.record_payment(payment) {
                tracing::info!(
                    case_id = %app.case_id,
                    payment_id = %payment_id,
                    amount,
                    "payment recorded"
                );
                Ok(vec![StepEvent::PaymentRecorded { payment_id, amount }])
            } else {
                tracing::warn!(
                    case_id = %app.case_id,
                    payment_id = %payment_id,
                    "duplicate payment ignored"
                );
                Ok(vec![StepEvent::DuplicatePaymentIgnored { payment_id }])
            }
        }

        SetIdentityOption { option } => {
            if app.donor_identity_confirmed() {
                return Err(EngineError::validation("identity", "identity is already confirmed"));
            }
            app.identity.option = Some(option);
            Ok(recorded(Section::ConfirmYourIdentity, "identity_option"))
        }

        RecordIdentityResult {
            status,
            first_names,
            last_name,
            date_of_birth,
        } => {
            let identity = &mut app.identity;
            identity.status = Some(status);
            identity.first_names = first_names;
            identity.last_name = last_name;
            identity.date_of_birth = date_of_birth;
            identity.checked_at = Some(now);
            let matches_donor = app.donor_identity_confirmed();
            Ok(vec![StepEvent::IdentityResultRecorded {
                status,
                matches_donor,
            }])
        }

        SetWantVoucher { answer } => {
            if answer == YesNo::Yes && !app.can_have_voucher() {
                return Err(EngineError::validation(
                    "want_voucher",
                    "you cannot ask anyone else to vouch for you",
                ));
            }
            app.vouching.want_voucher = Some(answer);
            Ok(recorded(Section::ConfirmYourIdentity, "want_voucher"))
        }

        SetVoucher { voucher } => {
            if !app.can_have_voucher() {
                return Err(EngineError::validation(
                    "voucher",
                    "you cannot ask anyone else to vouch for you",
                ));
            }
            if voucher.first_names.trim().is_empty() || voucher.last_name.trim().is_empty() {
                return Err(EngineError::validation("voucher", "enter the voucher's name"));
            }
            if names_equal(&voucher.first_names, &app.donor.first_names)
                && names_equal(&voucher.last_name, &app.donor.last_name)
            {
                return Err(EngineError::validation(
                    "voucher",
                    "the donor cannot vouch for themselves",
                ));
            }
            let uid = voucher.uid;
            let vouching = &mut app.vouching;
            vouching.vouch_attempts += 1;
            vouching.want_voucher = Some(YesNo::Yes);
            vouching.voucher = Some(voucher);
            Ok(vec![StepEvent::VoucherNamed {
                uid,
                attempt: vouching.vouch_attempts,
            }])
        }

        RecordVoucherVerified => {
            if !app.voucher_named() {
                return Err(EngineError::validation("voucher", "no voucher has been named"));
            }
            app.vouching.verified_by_voucher = true;
            Ok(recorded(Section::ConfirmYourIdentity, "verified_by_voucher"))
        }

        SetNoVoucherDecision { decision } => {
            app.vouching.no_voucher_decision = Some(decision);
            if !app.voucher_named() {
                act_on_no_voucher_decision(app, decision);
            }
            Ok(recorded(Section::ConfirmYourIdentity, "no_voucher_decision"))
        }

        ConfirmNoLongerNeedVoucher => {
            let voucher = app.vouching.voucher.take().ok_or_else(|| {
                EngineError::validation("voucher", "no voucher has been named")
            })?;
            app.vouching.want_voucher = None;
            if let Some(decision) = app.vouching.no_voucher_decision {
                act_on_no_voucher_decision(app, decision);
            }
            Ok(vec![StepEvent::VoucherRemoved { uid: voucher.uid }])
        }

        SetRegisteringWithCourtOfProtection { registering } => {
            app.registering_with_court_of_protection = registering;
            Ok(recorded(
                Section::ConfirmYourIdentity,
                "registering_with_court_of_protection",
            ))
        }

        Sign => {
            if app.is_signed() {
                return Err(EngineError::validation("signing", "the LPA is already signed"));
            }
            if !can_reach(app, Step::SignYourLpa) {
                return Err(EngineError::validation(
                    "signing",
                    "the LPA is not ready to be signed",
                ));
            }
            app.signing.signed_at = Some(now);
            Ok(vec![StepEvent::Signed { at: now }])
        }

        WitnessByCertificateProvider => {
            require_signed(app)?;
            app.signing.witnessed_by_certificate_provider_at = Some(now);
            Ok(vec![StepEvent::WitnessedByCertificateProvider { at: now }])
        }

        WitnessByIndependentWitness => {
            require_signed(app)?;
            if !app.donor.cannot_sign() {
                return Err(EngineError::validation(
                    "independent_witness",
                    "only needed when the donor cannot sign",
                ));
            }
            app.signing.witnessed_by_independent_witness_at = Some(now);
            Ok(vec![StepEvent::WitnessedByIndependentWitness { at: now }])
        }

        other => Err(EngineError::validation(
            "command",
            format!("{other:?} is not a payment, identity or signing step"),
        )),
    }
}
