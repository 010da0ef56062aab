use super::*;
use crate::change_fingerprint::mark_certificate_provider_not_related;
use crate::domain::{FeeDecision, FeeType, TaskState, Voucher};
use crate::test_support::*;

fn item(sections: &[TaskListSection], section: Section) -> &TaskListItem {
    sections
        .iter()
        .flat_map(|s| s.items.iter())
        .find(|i| i.section == section)
        .expect("every section is presented")
}

#[test]
fn test_sections_are_ordered_and_complete() {
    let sections = present(&empty_application(), today());

    let headings: Vec<_> = sections.iter().map(|s| s.heading).collect();
    assert_eq!(
        headings,
        vec!["fillInTheLpa", "payForTheLpa", "confirmYourIdentityAndSign"]
    );
    let presented: Vec<Section> = sections
        .iter()
        .flat_map(|s| s.items.iter().map(|i| i.section))
        .collect();
    assert_eq!(presented, Section::ALL.to_vec());
}

#[test]
fn test_states_come_from_stored_tasks() {
    let app = paid();
    let sections = present(&app, today());

    for section in Section::ALL {
        assert_eq!(item(&sections, section).state, app.tasks.get(section));
    }
}

#[test]
fn test_signatory_hidden_unless_donor_cannot_sign() {
    let app = ready_for_review();
    let sections = present(&app, today());
    assert!(item(&sections, Section::ChooseYourSignatory).hidden);
    assert_eq!(sections[0].visible_items().count(), 9);

    let mut app = app;
    app.donor.can_sign = Some(crate::domain::YesNo::No);
    let sections = present(&settle(app), today());
    assert!(!item(&sections, Section::ChooseYourSignatory).hidden);
}

#[test]
fn test_collection_paths_and_counts() {
    let empty = present(&empty_application(), today());
    let attorneys = item(&empty, Section::ChooseAttorneys);
    assert_eq!(attorneys.step, Step::ChooseAttorneysGuidance);
    assert_eq!(attorneys.count, 0);
    assert_eq!(
        attorneys.path,
        "/lpa/M-1111-2222-3333/choose-attorneys-guidance"
    );

    let mut app = ready_for_review();
    app.attorneys.members.put(attorney("Robin", "Taylor"));
    let sections = present(&app, today());
    let attorneys = item(&sections, Section::ChooseAttorneys);
    assert_eq!(attorneys.step, Step::ChooseAttorneysSummary);
    assert_eq!(attorneys.count, 2);
    assert_eq!(
        item(&sections, Section::ChooseReplacementAttorneys).step,
        Step::DoYouWantReplacementAttorneys
    );
}

#[test]
fn test_usage_row_follows_lpa_type() {
    let mut app = with_donor_details();
    assert_eq!(
        item(&present(&app, today()), Section::UsageConditions).step,
        Step::WhenCanTheLpaBeUsed
    );

    app.lpa_type = Some(crate::domain::LpaType::PersonalWelfare);
    let sections = present(&app, today());
    let usage = item(&sections, Section::UsageConditions);
    assert_eq!(usage.step, Step::LifeSustainingTreatment);
    assert_eq!(usage.name, "lifeSustainingTreatment");
}

#[test]
fn test_check_path_blocked_by_underage_attorney() {
    let mut app = ready_for_review();
    let mut young = attorney("Kit", "Young");
    young.date_of_birth = Some(date(2010, 1, 1));
    app.replacement_attorneys.members.put(young);

    let sections = present(&app, today());
    assert_eq!(
        item(&sections, Section::CheckYourLpa).step,
        Step::YouCannotSignYourLpaYet
    );

    // The same attorney is an adult a decade later.
    let sections = present(&app, date(2030, 1, 1));
    assert_eq!(item(&sections, Section::CheckYourLpa).step, Step::CheckYourLpa);
}

#[test]
fn test_check_path_asks_about_shared_details_once() {
    let mut app = ready_for_review();
    app.certificate_provider.last_name = "Smith-Brown".to_string();
    assert_eq!(
        item(&present(&app, today()), Section::CheckYourLpa).step,
        Step::ConfirmYourCertificateProviderIsNotRelated
    );

    mark_certificate_provider_not_related(&mut app, fixed_now());
    assert_eq!(
        item(&present(&app, today()), Section::CheckYourLpa).step,
        Step::CheckYourLpa
    );
}

#[test]
fn test_payment_path_follows_payment_state() {
    let sections = present(&reviewed(), today());
    assert_eq!(item(&sections, Section::PayForLpa).step, Step::AboutPayment);

    let mut app = reviewed();
    app.fee.fee_type = Some(FeeType::HalfFee);
    app.fee.decision = Some(FeeDecision::MoreEvidenceRequired);
    let app = settle(app);
    assert_eq!(
        item(&present(&app, today()), Section::PayForLpa).step,
        Step::UploadEvidence
    );

    let mut app = app;
    app.fee.decision = Some(FeeDecision::Approved);
    let app = settle(app);
    assert_eq!(app.tasks.pay_for_lpa, PaymentState::Approved);
    assert_eq!(
        item(&present(&app, today()), Section::PayForLpa).step,
        Step::PayFee
    );
}

#[test]
fn test_identity_path_follows_identity_outcome() {
    let step = |app: &Application| item(&present(app, today()), Section::ConfirmYourIdentity).step;

    assert_eq!(step(&paid()), Step::ConfirmYourIdentity);
    assert_eq!(step(&identity_confirmed()), Step::ReadYourLpa);
    assert_eq!(step(&insufficient_evidence()), Step::UnableToConfirmIdentity);

    let mut declined = insufficient_evidence();
    declined.vouching.want_voucher = Some(crate::domain::YesNo::No);
    assert_eq!(step(&declined), Step::WhatYouCanDoNow);

    let mut vouching = insufficient_evidence();
    vouching.vouching.voucher = Some(Voucher {
        first_names: "Vic".to_string(),
        last_name: "Voucher".to_string(),
        ..Voucher::default()
    });
    assert_eq!(step(&vouching), Step::WeHaveContactedVoucher);

    let mut court = insufficient_evidence();
    court.registering_with_court_of_protection = true;
    assert_eq!(
        step(&court),
        Step::WhatHappensNextRegisteringWithCourtOfProtection
    );

    let mut failed = paid();
    failed.identity.status = Some(IdentityStatus::Failed);
    assert_eq!(step(&failed), Step::RegisterWithCourtOfProtection);
}

#[test]
fn test_signed_application_points_at_submission() {
    let sections = present(&signed(), today());

    assert_eq!(
        item(&sections, Section::SignTheLpa).step,
        Step::YouHaveSubmittedYourLpa
    );
    assert_eq!(
        item(&sections, Section::SignTheLpa).state,
        SectionState::Task(TaskState::InProgress)
    );
    assert_eq!(
        item(&sections, Section::ConfirmYourIdentity).step,
        Step::YouHaveSubmittedYourLpa
    );
}

#[test]
fn test_presenting_does_not_change_the_application() {
    for app in journey_fixtures() {
        let before = app.clone();
        let _ = present(&app, today());
        assert_eq!(app, before);
    }
}
