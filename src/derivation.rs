//! Task state derivation.
//!
//! Every section's state is a pure function of the application. Nothing here
//! patches a stored state incrementally: [`refresh`] re-derives the touched
//! sections and everything that reads them.

use std::collections::BTreeSet;

use crate::change_fingerprint::has_changed_since_review;
use crate::domain::{
    Application, Attorneys, DecisionMode, FeeDecision, FeeType, IdentityOption, IdentityState,
    IdentityStatus, LpaType, PaymentState, ReplacementStepIn, Section, SectionState, TaskState,
    Tasks, YesNo,
};

/// Derives the current state of one section.
pub fn derive_task_state(section: Section, app: &Application) -> SectionState {
    match section {
        Section::YourDetails => SectionState::Task(your_details(app)),
        Section::ChooseAttorneys => SectionState::Task(choose_attorneys(app)),
        Section::ChooseReplacementAttorneys => {
            SectionState::Task(choose_replacement_attorneys(app))
        }
        Section::UsageConditions => SectionState::Task(usage_conditions(app)),
        Section::Restrictions => SectionState::Task(answered(app.restrictions.is_some())),
        Section::CertificateProvider => SectionState::Task(certificate_provider(app)),
        Section::PeopleToNotify => SectionState::Task(people_to_notify(app)),
        Section::AddCorrespondent => SectionState::Task(correspondent(app)),
        Section::ChooseYourSignatory => SectionState::Task(signatory(app)),
        Section::CheckYourLpa => SectionState::Task(check_your_lpa(app)),
        Section::PayForLpa => SectionState::Payment(pay_for_lpa(app)),
        Section::ConfirmYourIdentity => SectionState::Identity(confirm_your_identity(app)),
        Section::SignTheLpa => SectionState::Task(sign_the_lpa(app)),
    }
}

/// Derives every section from scratch.
pub fn derive_all(app: &Application) -> Tasks {
    let mut tasks = Tasks::default();
    for section in Section::ALL {
        tasks.set(section, derive_task_state(section, app));
    }
    tasks
}

/// A section whose stored state moved during [`refresh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange {
    pub section: Section,
    pub from: SectionState,
    pub to: SectionState,
}

/// Re-derives `touched` plus every section that depends on them, storing the
/// results. Sections outside that set keep their stored state.
pub fn refresh(app: &mut Application, touched: &[Section]) -> Vec<StateChange> {
    let mut pending: Vec<Section> = touched.to_vec();
    let mut affected: BTreeSet<Section> = BTreeSet::new();
    while let Some(section) = pending.pop() {
        if affected.insert(section) {
            pending.extend_from_slice(section.dependents());
        }
    }

    let mut changes = Vec::new();
    for section in affected {
        let from = app.tasks.get(section);
        let to = derive_task_state(section, app);
        if from != to {
            app.tasks.set(section, to);
            changes.push(StateChange { section, from, to });
        }
    }
    changes
}

fn answered(recorded: bool) -> TaskState {
    if recorded {
        TaskState::Completed
    } else {
        TaskState::NotStarted
    }
}

fn your_details(app: &Application) -> TaskState {
    let donor = &app.donor;
    let complete = !donor.first_names.trim().is_empty()
        && !donor.last_name.trim().is_empty()
        && donor.date_of_birth.is_some()
        && donor.address.is_present()
        && donor.can_sign.is_some()
        && app.lpa_type.is_some();

    if complete {
        TaskState::Completed
    } else if donor.has_any_detail() || donor.can_sign.is_some() || app.lpa_type.is_some() {
        TaskState::InProgress
    } else {
        TaskState::NotStarted
    }
}

fn collection_state(attorneys: &Attorneys, decisions_recorded: bool) -> Option<TaskState> {
    if attorneys.is_empty() {
        return Some(if decisions_recorded {
            TaskState::InProgress
        } else {
            TaskState::NotStarted
        });
    }
    if !attorneys.is_complete() {
        return Some(TaskState::InProgress);
    }
    None
}

fn choose_attorneys(app: &Application) -> TaskState {
    let decisions = &app.attorney_decisions;
    if let Some(state) = collection_state(&app.attorneys, !decisions.is_empty()) {
        return state;
    }
    if app.attorneys.len() > 1 && !decisions.is_complete_for_group() {
        return TaskState::InProgress;
    }
    TaskState::Completed
}

fn choose_replacement_attorneys(app: &Application) -> TaskState {
    if app.want_replacement_attorneys == Some(YesNo::No) {
        return TaskState::Completed;
    }

    let replacements = &app.replacement_attorneys;
    let decisions = &app.replacement_attorney_decisions;
    let recorded = app.want_replacement_attorneys.is_some() || !decisions.is_empty();
    if let Some(state) = collection_state(replacements, recorded) {
        return state;
    }

    let several = replacements.len() > 1;
    let decided = decisions.is_complete_for_group();
    let primary_mode = if app.attorneys.len() > 1 {
        app.attorney_decisions.mode
    } else {
        None
    };

    if primary_mode == Some(DecisionMode::JointlyAndSeverally) {
        match app.replacement_step_in {
            None => return TaskState::InProgress,
            Some(ReplacementStepIn::AnotherWay)
                if app.replacement_step_in_details.trim().is_empty() =>
            {
                return TaskState::InProgress
            }
            Some(ReplacementStepIn::WhenAllCanNoLongerAct) if several && !decided => {
                return TaskState::InProgress
            }
            _ => {}
        }
    } else if several && !decided && matches!(primary_mode, None | Some(DecisionMode::Jointly)) {
        return TaskState::InProgress;
    }

    TaskState::Completed
}

fn usage_conditions(app: &Application) -> TaskState {
    match app.lpa_type {
        None => TaskState::NotStarted,
        Some(LpaType::PropertyAndAffairs) => answered(app.when_can_be_used.is_some()),
        Some(LpaType::PersonalWelfare) => answered(app.life_sustaining_treatment.is_some()),
    }
}

fn certificate_provider(app: &Application) -> TaskState {
    let cp = &app.certificate_provider;
    if cp.is_complete() {
        TaskState::Completed
    } else if cp.is_named()
        || cp.address.is_present()
        || cp.channel.is_some()
        || cp.relationship.is_some()
    {
        TaskState::InProgress
    } else {
        TaskState::NotStarted
    }
}

fn people_to_notify(app: &Application) -> TaskState {
    let people = &app.people_to_notify;
    match app.want_people_to_notify {
        Some(YesNo::No) => TaskState::Completed,
        None if people.is_empty() => TaskState::NotStarted,
        _ if people.is_empty() => TaskState::InProgress,
        _ if people.iter().all(|p| p.is_complete()) => TaskState::Completed,
        _ => TaskState::InProgress,
    }
}

fn correspondent(app: &Application) -> TaskState {
    match app.add_correspondent {
        None => TaskState::NotStarted,
        Some(YesNo::No) => TaskState::Completed,
        Some(YesNo::Yes) if app.correspondent.is_complete() => TaskState::Completed,
        Some(YesNo::Yes) => TaskState::InProgress,
    }
}

fn signatory(app: &Application) -> TaskState {
    let signatory = &app.authorised_signatory;
    let witness = &app.independent_witness;
    if !app.donor.cannot_sign() {
        return TaskState::NotStarted;
    }
    if signatory.is_complete() && witness.is_complete() {
        return TaskState::Completed;
    }
    let untouched = signatory.first_names.is_empty()
        && signatory.last_name.is_empty()
        && witness.first_names.is_empty()
        && witness.last_name.is_empty();
    if untouched {
        TaskState::NotStarted
    } else {
        TaskState::InProgress
    }
}

fn check_your_lpa(app: &Application) -> TaskState {
    if !app.review.is_reviewed() {
        TaskState::NotStarted
    } else if has_changed_since_review(app) {
        TaskState::InProgress
    } else {
        TaskState::Completed
    }
}

fn pay_for_lpa(app: &Application) -> PaymentState {
    let fee = &app.fee;
    if fee.applying_for_reduction.is_none() && fee.fee_type.is_none() && app.payments.is_empty() {
        return PaymentState::NotStarted;
    }

    let outstanding = app.fee_amount();
    let reduced = fee.fee_type.is_some_and(FeeType::requires_evidence);

    match fee.decision {
        Some(FeeDecision::Denied) if outstanding == 0 => PaymentState::Completed,
        Some(FeeDecision::Denied) => PaymentState::Denied,
        Some(FeeDecision::MoreEvidenceRequired) if reduced => PaymentState::MoreEvidenceRequired,
        Some(FeeDecision::Approved) if reduced && outstanding > 0 => PaymentState::Approved,
        _ if reduced && app.awaiting_fee_decision() => {
            if fee.evidence_delivery.is_some() && outstanding == 0 {
                PaymentState::Pending
            } else {
                PaymentState::InProgress
            }
        }
        _ if outstanding == 0 && fee.fee_type.is_some() => PaymentState::Completed,
        _ => PaymentState::InProgress,
    }
}

fn confirm_your_identity(app: &Application) -> IdentityState {
    if app.donor_identity_confirmed() {
        return IdentityState::Completed;
    }
    match app.identity.status {
        None => match app.identity.option {
            None => IdentityState::NotStarted,
            Some(IdentityOption::OneLogin) => IdentityState::InProgress,
            Some(IdentityOption::PostOffice) => IdentityState::Pending,
        },
        Some(IdentityStatus::InsufficientEvidence)
            if app.voucher_named() || app.registering_with_court_of_protection =>
        {
            IdentityState::InProgress
        }
        Some(_) => IdentityState::Problem,
    }
}

fn sign_the_lpa(app: &Application) -> TaskState {
    let signing = &app.signing;
    if signing.signed_at.is_none() {
        return TaskState::NotStarted;
    }
    let witnessed = signing.witnessed_by_certificate_provider_at.is_some()
        && (!app.donor.cannot_sign() || signing.witnessed_by_independent_witness_at.is_some());
    if witnessed {
        TaskState::Completed
    } else {
        TaskState::InProgress
    }
}

#[cfg(test)]
#[path = "tests/derivation_tests.rs"]
mod tests;
