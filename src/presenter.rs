//! Task list presentation.
//!
//! Builds the ordered sections of the task list from an application snapshot.
//! Each item carries its derived state and the step the applicant should land
//! on when they pick it. Nothing here mutates the application or performs I/O.

use chrono::NaiveDate;
use serde::Serialize;

use crate::change_fingerprint::certificate_provider_shares_details;
use crate::domain::{
    Application, IdentityStatus, LpaType, PaymentState, Section, SectionState, YesNo,
};
use crate::navigation::Step;

/// One row of the task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskListItem {
    pub section: Section,
    /// Localisation key for the row title.
    pub name: &'static str,
    pub state: SectionState,
    pub step: Step,
    pub path: String,
    /// Number of members, for sections that hold a collection.
    pub count: usize,
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskListSection {
    pub heading: &'static str,
    pub items: Vec<TaskListItem>,
}

impl TaskListSection {
    pub fn visible_items(&self) -> impl Iterator<Item = &TaskListItem> + '_ {
        self.items.iter().filter(|item| !item.hidden)
    }
}

struct Row {
    section: Section,
    name: &'static str,
    step: Step,
    count: usize,
    hidden: bool,
}

impl Row {
    fn new(section: Section, name: &'static str, step: Step) -> Self {
        Self {
            section,
            name,
            step,
            count: 0,
            hidden: false,
        }
    }

    fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    fn into_item(self, app: &Application) -> TaskListItem {
        TaskListItem {
            section: self.section,
            name: self.name,
            state: app.tasks.get(self.section),
            step: self.step,
            path: self.step.path(&app.case_id),
            count: self.count,
            hidden: self.hidden,
        }
    }
}

/// Assembles the task list. `today` decides whether any attorney is still
/// under 18.
pub fn present(app: &Application, today: NaiveDate) -> Vec<TaskListSection> {
    let attorneys_step = if app.attorneys.is_empty() {
        Step::ChooseAttorneysGuidance
    } else {
        Step::ChooseAttorneysSummary
    };
    let replacements_step = if app.replacement_attorneys.is_empty() {
        Step::DoYouWantReplacementAttorneys
    } else {
        Step::ChooseReplacementAttorneysSummary
    };
    let usage = match app.lpa_type {
        Some(LpaType::PersonalWelfare) => Row::new(
            Section::UsageConditions,
            "lifeSustainingTreatment",
            Step::LifeSustainingTreatment,
        ),
        _ => Row::new(
            Section::UsageConditions,
            "chooseWhenTheLpaCanBeUsed",
            Step::WhenCanTheLpaBeUsed,
        ),
    };

    let fill_in = vec![
        Row::new(Section::YourDetails, "provideYourDetails", Step::YourDetails),
        Row::new(Section::ChooseAttorneys, "chooseYourAttorneys", attorneys_step)
            .count(app.attorneys.len()),
        Row::new(
            Section::ChooseReplacementAttorneys,
            "chooseYourReplacementAttorneys",
            replacements_step,
        )
        .count(app.replacement_attorneys.len()),
        usage,
        Row::new(Section::Restrictions, "addRestrictionsToTheLpa", Step::Restrictions),
        Row::new(
            Section::CertificateProvider,
            "chooseYourCertificateProvider",
            Step::WhatACertificateProviderDoes,
        ),
        Row::new(
            Section::PeopleToNotify,
            "peopleToNotifyAboutYourLpa",
            Step::DoYouWantToNotifyPeople,
        )
        .count(app.people_to_notify.len()),
        Row::new(Section::AddCorrespondent, "addCorrespondent", Step::AddCorrespondent),
        Row::new(
            Section::ChooseYourSignatory,
            "chooseYourSignatoryAndIndependentWitness",
            Step::GettingHelpSigning,
        )
        .hidden(!app.donor.cannot_sign()),
        Row::new(
            Section::CheckYourLpa,
            "checkAndSendToYourCertificateProvider",
            check_step(app, today),
        ),
    ];

    let payment = vec![Row::new(Section::PayForLpa, "payForTheLpa", payment_step(app))];

    let identity_and_sign = vec![
        Row::new(
            Section::ConfirmYourIdentity,
            "confirmYourIdentity",
            identity_step(app),
        ),
        Row::new(Section::SignTheLpa, "signTheLpa", sign_step(app)),
    ];

    [
        ("fillInTheLpa", fill_in),
        ("payForTheLpa", payment),
        ("confirmYourIdentityAndSign", identity_and_sign),
    ]
    .into_iter()
    .map(|(heading, rows)| TaskListSection {
        heading,
        items: rows.into_iter().map(|row| row.into_item(app)).collect(),
    })
    .collect()
}

/// Entry to the review. Under-18 attorneys block it; a certificate provider
/// who shares details with another party needs confirming first.
fn check_step(app: &Application, today: NaiveDate) -> Step {
    if app.has_underage_attorney(today) {
        Step::YouCannotSignYourLpaYet
    } else if certificate_provider_shares_details(app) {
        Step::ConfirmYourCertificateProviderIsNotRelated
    } else {
        Step::CheckYourLpa
    }
}

fn payment_step(app: &Application) -> Step {
    match app.tasks.pay_for_lpa {
        PaymentState::Approved | PaymentState::Denied => Step::PayFee,
        PaymentState::MoreEvidenceRequired => Step::UploadEvidence,
        _ => Step::AboutPayment,
    }
}

fn identity_step(app: &Application) -> Step {
    if app.is_signed() {
        return Step::YouHaveSubmittedYourLpa;
    }
    if app.donor_identity_confirmed() {
        return Step::ReadYourLpa;
    }
    match app.identity.status {
        None => Step::ConfirmYourIdentity,
        Some(IdentityStatus::Confirmed) => Step::IdentityDetails,
        Some(IdentityStatus::Failed) => Step::RegisterWithCourtOfProtection,
        Some(IdentityStatus::Expired) => Step::WhatYouCanDoNowExpired,
        Some(IdentityStatus::InsufficientEvidence) => {
            if app.registering_with_court_of_protection {
                Step::WhatHappensNextRegisteringWithCourtOfProtection
            } else if app.voucher_named() {
                Step::WeHaveContactedVoucher
            } else {
                match app.vouching.want_voucher {
                    Some(YesNo::Yes) if app.can_have_voucher() => Step::EnterVoucher,
                    Some(_) => Step::WhatYouCanDoNow,
                    None => Step::UnableToConfirmIdentity,
                }
            }
        }
    }
}

fn sign_step(app: &Application) -> Step {
    if app.is_signed() {
        Step::YouHaveSubmittedYourLpa
    } else {
        Step::HowToSignYourLpa
    }
}

#[cfg(test)]
#[path = "tests/presenter_tests.rs"]
mod tests;
