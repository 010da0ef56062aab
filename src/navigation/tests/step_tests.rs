use super::*;
use crate::domain::CaseId;
use std::collections::HashSet;

#[test]
fn test_slugs_are_unique() {
    let slugs: HashSet<&str> = Step::ALL.iter().map(|s| s.slug()).collect();
    assert_eq!(slugs.len(), Step::ALL.len());
}

#[test]
fn test_every_step_parses_back_from_its_slug() {
    for step in Step::ALL {
        assert_eq!(Step::from_slug(step.slug()), Some(*step));
    }
    assert_eq!(Step::from_slug("no-such-step"), None);
}

#[test]
fn test_path_includes_case_and_slug() {
    let case_id = CaseId::from("M-1111-2222-3333");
    assert_eq!(
        Step::CheckYourLpa.path(&case_id),
        "/lpa/M-1111-2222-3333/check-your-lpa"
    );
}

#[test]
fn test_stages_group_steps() {
    assert_eq!(Step::TaskList.stage(), Stage::Overview);
    assert_eq!(Step::ChooseAttorneys.stage(), Stage::FillIn);
    assert_eq!(Step::PayFee.stage(), Stage::Payment);
    assert_eq!(Step::EnterVoucher.stage(), Stage::Identity);
    assert_eq!(Step::SignYourLpa.stage(), Stage::Signing);
    assert_eq!(Step::ViewLpa.stage(), Stage::Admin);
}

#[test]
fn test_steps_serialize_as_snake_case() {
    let json = serde_json::to_string(&Step::HowShouldAttorneysMakeDecisions).unwrap();
    assert_eq!(json, "\"how_should_attorneys_make_decisions\"");
}
