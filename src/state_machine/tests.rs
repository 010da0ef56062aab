//! Tests for the application state machine.

use super::*;
use crate::domain::{
    ActorUid, Attorney, DecisionMode, FeeType, IdentityState, IdentityStatus, PaymentRecord,
    PaymentState, PersonToNotify, TaskState, TimestampUtc, Voucher, YesNo, FULL_FEE_PENCE,
};
use crate::test_support::*;
use proptest::prelude::*;
use tempfile::TempDir;

/// Creates a test state machine with a logger in a temp directory.
fn create_test_machine(app: Application) -> (ApplicationStateMachine, TempDir) {
    create_test_machine_with_config(app, EngineConfig::default())
}

fn create_test_machine_with_config(
    app: Application,
    config: EngineConfig,
) -> (ApplicationStateMachine, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let logs_dir = temp_dir.path().join("logs");
    let logger = Arc::new(StructuredLogger::new(&logs_dir).expect("Failed to create logger"));
    let machine = ApplicationStateMachine::new(app, logger, config)
        .with_clock(Arc::new(FixedClock(fixed_now())));
    (machine, temp_dir)
}

fn assert_settled(machine: &ApplicationStateMachine) {
    let app = machine.application();
    assert_eq!(app.tasks, derive_all(app), "stored states drifted from derivation");
}

fn person(first: &str, last: &str) -> PersonToNotify {
    PersonToNotify {
        uid: ActorUid::new(),
        first_names: first.to_string(),
        last_name: last.to_string(),
        address: address("5 Notify Close", "NT5 5NN"),
    }
}

fn payment(id: &str, amount: i64) -> PaymentRecord {
    PaymentRecord {
        payment_id: id.to_string(),
        reference: format!("ref-{id}"),
        amount,
    }
}

#[test]
fn test_new_rederives_stale_states() {
    let mut app = ready_for_review();
    app.tasks = Default::default();

    let (machine, _temp) = create_test_machine(app);

    assert_settled(&machine);
    assert_eq!(machine.application().tasks.your_details, TaskState::Completed);
}

#[test]
fn test_single_attorney_completes_section() {
    let (mut machine, _temp) = create_test_machine(empty_application());
    assert_eq!(
        machine.application().tasks.choose_attorneys,
        TaskState::NotStarted
    );

    let alex = attorney("Alex", "Jones");
    let events = machine
        .apply(StepCommand::PutAttorney {
            party: AttorneyParty::Primary,
            attorney: alex.clone(),
            acknowledged_warning: None,
        })
        .expect("PutAttorney should succeed");

    assert_eq!(
        events[0],
        StepEvent::MemberAdded {
            section: Section::ChooseAttorneys,
            uid: alex.uid
        }
    );
    assert!(events.contains(&StepEvent::TaskStateChanged {
        section: Section::ChooseAttorneys,
        from: crate::domain::SectionState::Task(TaskState::NotStarted),
        to: crate::domain::SectionState::Task(TaskState::Completed),
    }));
    let app = machine.application();
    assert_eq!(app.attorney_decisions.mode, Some(DecisionMode::Solely));
    assert_eq!(app.tasks.choose_attorneys, TaskState::Completed);
    assert_settled(&machine);
}

#[test]
fn test_second_attorney_needs_decisions() {
    let (mut machine, _temp) = create_test_machine(ready_for_review());

    let events = machine
        .apply(StepCommand::PutAttorney {
            party: AttorneyParty::Primary,
            attorney: attorney("Robin", "Taylor"),
            acknowledged_warning: None,
        })
        .unwrap();

    assert!(events.contains(&StepEvent::DecisionsReset {
        section: Section::ChooseAttorneys
    }));
    assert_eq!(machine.application().attorney_decisions.mode, None);
    assert_eq!(
        machine.application().tasks.choose_attorneys,
        TaskState::InProgress
    );

    machine
        .apply(StepCommand::SetDecisions {
            party: AttorneyParty::Primary,
            mode: DecisionMode::Jointly,
            details: "ignored".to_string(),
        })
        .unwrap();

    let app = machine.application();
    assert_eq!(app.attorney_decisions.mode, Some(DecisionMode::Jointly));
    assert!(app.attorney_decisions.details.is_empty());
    assert_eq!(app.tasks.choose_attorneys, TaskState::Completed);
    assert_settled(&machine);
}

#[test]
fn test_rejected_command_leaves_application_untouched() {
    let (mut machine, _temp) = create_test_machine(ready_for_review());
    let before = machine.application().clone();

    let result = machine.apply(StepCommand::SetDecisions {
        party: AttorneyParty::Primary,
        mode: DecisionMode::Jointly,
        details: String::new(),
    });

    assert!(matches!(
        result,
        Err(EngineError::Validation {
            field: "decisions",
            ..
        })
    ));
    assert_eq!(machine.application(), &before);
}

#[test]
fn test_same_name_warning_must_be_acknowledged() {
    let (mut machine, _temp) = create_test_machine(with_donor_details());
    let sam = attorney("Sam", "Smith");

    let err = machine
        .apply(StepCommand::PutAttorney {
            party: AttorneyParty::Primary,
            attorney: sam.clone(),
            acknowledged_warning: None,
        })
        .unwrap_err();
    let warning = match err {
        EngineError::NameWarning(warning) => warning,
        other => panic!("Expected NameWarning, got {other:?}"),
    };
    assert!(machine.application().attorneys.is_empty());

    // A descriptor for a different warning does not count.
    let wrong = machine.apply(StepCommand::PutAttorney {
        party: AttorneyParty::Primary,
        attorney: sam.clone(),
        acknowledged_warning: Some("errorAttorneyMatchesActor|theDonor|Sam|Jones".to_string()),
    });
    assert!(matches!(wrong, Err(EngineError::NameWarning(_))));

    let echoed = format!("  {}  ", warning.descriptor().to_uppercase());
    machine
        .apply(StepCommand::PutAttorney {
            party: AttorneyParty::Primary,
            attorney: sam,
            acknowledged_warning: Some(echoed),
        })
        .expect("acknowledged warning should pass");
    assert_eq!(machine.application().attorneys.len(), 1);
}

#[test]
fn test_changing_content_after_review_reopens_check() {
    let (mut machine, _temp) = create_test_machine(reviewed());
    assert_eq!(
        machine.application().tasks.check_your_lpa,
        TaskState::Completed
    );

    let events = machine
        .apply(StepCommand::SetRestrictions {
            restrictions: "Do not sell the house".to_string(),
        })
        .unwrap();

    assert!(events.contains(&StepEvent::TaskStateChanged {
        section: Section::CheckYourLpa,
        from: crate::domain::SectionState::Task(TaskState::Completed),
        to: crate::domain::SectionState::Task(TaskState::InProgress),
    }));
    assert_settled(&machine);
}

#[test]
fn test_do_not_want_replacements_clears_roster() {
    let mut app = ready_for_review();
    app.want_replacement_attorneys = Some(YesNo::Yes);
    app.replacement_attorneys.members.put(attorney("Jo", "Bloggs"));
    let (mut machine, _temp) = create_test_machine(app);

    machine
        .apply(StepCommand::SetWantReplacementAttorneys { answer: YesNo::No })
        .unwrap();

    let app = machine.application();
    assert!(app.replacement_attorneys.is_empty());
    assert_eq!(app.tasks.choose_replacement_attorneys, TaskState::Completed);
}

#[test]
fn test_people_to_notify_limit_comes_from_config() {
    let config = EngineConfig {
        max_people_to_notify: 1,
        ..EngineConfig::default()
    };
    let (mut machine, _temp) = create_test_machine_with_config(ready_for_review(), config);
    machine
        .apply(StepCommand::SetWantPeopleToNotify { answer: YesNo::Yes })
        .unwrap();

    let mut first = person("Pat", "Green");
    machine
        .apply(StepCommand::PutPersonToNotify {
            person: first.clone(),
            acknowledged_warning: None,
        })
        .unwrap();

    let second = machine.apply(StepCommand::PutPersonToNotify {
        person: person("Lee", "White"),
        acknowledged_warning: None,
    });
    assert!(matches!(
        second,
        Err(EngineError::Validation {
            field: "people_to_notify",
            ..
        })
    ));

    // Editing an existing person is not an addition.
    first.first_names = "Patricia".to_string();
    let events = machine
        .apply(StepCommand::PutPersonToNotify {
            person: first.clone(),
            acknowledged_warning: None,
        })
        .unwrap();
    assert_eq!(
        events[0],
        StepEvent::MemberUpdated {
            section: Section::PeopleToNotify,
            uid: first.uid
        }
    );
}

#[test]
fn test_remove_unknown_member_fails() {
    let (mut machine, _temp) = create_test_machine(ready_for_review());
    let uid = ActorUid::new();

    let result = machine.apply(StepCommand::RemoveAttorney {
        party: AttorneyParty::Primary,
        uid,
    });

    assert!(matches!(result, Err(EngineError::UnknownMember { uid: u }) if u == uid));
}

#[test]
fn test_duplicate_payment_is_ignored() {
    let (mut machine, _temp) = create_test_machine(reviewed());
    machine
        .apply(StepCommand::SetApplyingForReduction { answer: YesNo::No })
        .unwrap();
    assert_eq!(
        machine.application().fee.fee_type,
        Some(FeeType::FullFee)
    );

    let first = machine
        .apply(StepCommand::RecordPayment {
            payment: payment("pay-1", FULL_FEE_PENCE),
        })
        .unwrap();
    assert_eq!(
        first[0],
        StepEvent::PaymentRecorded {
            payment_id: "pay-1".to_string(),
            amount: FULL_FEE_PENCE
        }
    );
    assert_eq!(machine.application().tasks.pay_for_lpa, PaymentState::Completed);

    let replay = machine
        .apply(StepCommand::RecordPayment {
            payment: payment("pay-1", FULL_FEE_PENCE),
        })
        .unwrap();
    assert_eq!(
        replay,
        vec![StepEvent::DuplicatePaymentIgnored {
            payment_id: "pay-1".to_string()
        }]
    );
    assert_eq!(machine.application().payments.len(), 1);
}

#[test]
fn test_non_positive_payment_is_rejected() {
    let (mut machine, _temp) = create_test_machine(reviewed());

    let result = machine.apply(StepCommand::RecordPayment {
        payment: payment("pay-0", 0),
    });

    assert!(matches!(
        result,
        Err(EngineError::Validation { field: "amount", .. })
    ));
}

#[test]
fn test_evidence_delivery_needs_reduced_fee() {
    let (mut machine, _temp) = create_test_machine(reviewed());
    machine
        .apply(StepCommand::SetFeeType {
            fee_type: FeeType::FullFee,
        })
        .unwrap();

    let result = machine.apply(StepCommand::SetEvidenceDelivery {
        delivery: crate::domain::EvidenceDelivery::Upload,
    });

    assert!(result.is_err());
}

#[test]
fn test_identity_result_for_someone_else_is_not_confirmed() {
    let (mut machine, _temp) = create_test_machine(paid());

    let events = machine
        .apply(StepCommand::RecordIdentityResult {
            status: IdentityStatus::Confirmed,
            first_names: "Someone".to_string(),
            last_name: "Else".to_string(),
            date_of_birth: Some(date(1950, 3, 4)),
        })
        .unwrap();

    assert_eq!(
        events[0],
        StepEvent::IdentityResultRecorded {
            status: IdentityStatus::Confirmed,
            matches_donor: false
        }
    );
    assert_eq!(
        machine.application().tasks.confirm_your_identity,
        IdentityState::Problem
    );
}

#[test]
fn test_donor_details_locked_once_identity_checked() {
    let (mut machine, _temp) = create_test_machine(identity_confirmed());

    let result = machine.apply(StepCommand::SetDonorDateOfBirth {
        date_of_birth: date(1951, 1, 1),
    });

    assert!(matches!(
        result,
        Err(EngineError::Validation {
            field: "date_of_birth",
            ..
        })
    ));
}

#[test]
fn test_voucher_routes_identity_back_in_progress() {
    let (mut machine, _temp) = create_test_machine(insufficient_evidence());
    assert_eq!(
        machine.application().tasks.confirm_your_identity,
        IdentityState::Problem
    );

    let voucher = Voucher {
        uid: ActorUid::new(),
        first_names: "Vic".to_string(),
        last_name: "Voucher".to_string(),
        ..Voucher::default()
    };
    let events = machine
        .apply(StepCommand::SetVoucher {
            voucher: voucher.clone(),
        })
        .unwrap();

    assert_eq!(
        events[0],
        StepEvent::VoucherNamed {
            uid: voucher.uid,
            attempt: 1
        }
    );
    assert_eq!(
        machine.application().tasks.confirm_your_identity,
        IdentityState::InProgress
    );

    machine.apply(StepCommand::RecordVoucherVerified).unwrap();
    assert_eq!(
        machine.application().tasks.confirm_your_identity,
        IdentityState::Completed
    );
}

#[test]
fn test_donor_cannot_vouch_for_themselves() {
    let (mut machine, _temp) = create_test_machine(insufficient_evidence());

    let result = machine.apply(StepCommand::SetVoucher {
        voucher: Voucher {
            first_names: " sam ".to_string(),
            last_name: "SMITH".to_string(),
            ..Voucher::default()
        },
    });

    assert!(matches!(
        result,
        Err(EngineError::Validation { field: "voucher", .. })
    ));
    assert_eq!(machine.application().vouching.vouch_attempts, 0);
}

#[test]
fn test_no_voucher_decision_to_apply_to_court() {
    let (mut machine, _temp) = create_test_machine(insufficient_evidence());

    machine
        .apply(StepCommand::SetNoVoucherDecision {
            decision: crate::domain::NoVoucherDecision::ApplyToCourtOfProtection,
        })
        .unwrap();

    let app = machine.application();
    assert!(app.registering_with_court_of_protection);
    assert_eq!(app.tasks.confirm_your_identity, IdentityState::InProgress);
}

#[test]
fn test_sign_requires_a_ready_application() {
    let (mut machine, _temp) = create_test_machine(ready_for_review());

    let result = machine.apply(StepCommand::Sign);

    assert!(matches!(
        result,
        Err(EngineError::Validation { field: "signing", .. })
    ));
    assert!(!machine.application().is_signed());
}

#[test]
fn test_sign_then_witness() {
    let (mut machine, _temp) = create_test_machine(identity_confirmed());

    let events = machine.apply(StepCommand::Sign).unwrap();
    assert_eq!(events[0], StepEvent::Signed { at: fixed_now() });
    assert_eq!(
        machine.application().tasks.sign_the_lpa,
        TaskState::InProgress
    );

    machine
        .apply(StepCommand::WitnessByCertificateProvider)
        .unwrap();
    let app = machine.application();
    assert_eq!(app.tasks.sign_the_lpa, TaskState::Completed);
    assert!(app.completed_all_tasks());
}

#[test]
fn test_signed_application_rejects_document_changes() {
    let (mut machine, _temp) = create_test_machine(signed());
    let before = machine.application().clone();

    let result = machine.apply(StepCommand::SetRestrictions {
        restrictions: "Changed my mind".to_string(),
    });
    assert!(result.is_err());
    assert!(machine
        .apply(StepCommand::ConfirmCertificateProviderNotRelated)
        .is_err());
    assert!(machine.apply(StepCommand::Sign).is_err());
    assert_eq!(machine.application(), &before);
}

#[test]
fn test_updated_at_follows_the_clock() {
    let mut app = empty_application();
    app.updated_at = TimestampUtc(fixed_now().0 - chrono::Duration::days(3));
    let (mut machine, _temp) = create_test_machine(app);

    machine
        .apply(StepCommand::SetCanSign { can_sign: YesNo::Yes })
        .unwrap();

    assert_eq!(machine.application().updated_at, fixed_now());
}

#[test]
fn test_commands_and_events_are_logged() {
    let (mut machine, temp) = create_test_machine(empty_application());
    machine
        .apply(StepCommand::SetCanSign { can_sign: YesNo::Yes })
        .unwrap();
    let _ = machine.apply(StepCommand::RecordVoucherVerified);

    let log_path = temp.path().join("logs").join("events.jsonl");
    let content = std::fs::read_to_string(log_path).unwrap();
    let commands = content.lines().filter(|l| l.contains("StepCommand")).count();
    let events = content.lines().filter(|l| l.contains("StepEvent")).count();

    assert_eq!(commands, 2);
    // AnswerRecorded plus the your-details state change; the rejected command
    // logs nothing past its command line.
    assert_eq!(events, 2);
}

/// Commands that exercise most sections, addressed by index from proptest.
fn command_pool(app: &Application) -> Vec<StepCommand> {
    let existing: Attorney = app.attorneys.iter().next().cloned().unwrap_or_default();
    let replacement = attorney("Jo", "Bloggs");
    vec![
        StepCommand::PutAttorney {
            party: AttorneyParty::Primary,
            attorney: attorney("Robin", "Taylor"),
            acknowledged_warning: None,
        },
        StepCommand::RemoveAttorney {
            party: AttorneyParty::Primary,
            uid: existing.uid,
        },
        StepCommand::SetDecisions {
            party: AttorneyParty::Primary,
            mode: DecisionMode::JointlyAndSeverally,
            details: String::new(),
        },
        StepCommand::SetWantReplacementAttorneys { answer: YesNo::Yes },
        StepCommand::PutAttorney {
            party: AttorneyParty::Replacement,
            attorney: replacement.clone(),
            acknowledged_warning: None,
        },
        StepCommand::SetReplacementStepIn {
            step_in: crate::domain::ReplacementStepIn::WhenOneCanNoLongerAct,
            details: String::new(),
        },
        StepCommand::SetWantReplacementAttorneys { answer: YesNo::No },
        StepCommand::SetRestrictions {
            restrictions: "None".to_string(),
        },
        StepCommand::SetCanSign { can_sign: YesNo::No },
        StepCommand::SetCanSign { can_sign: YesNo::Yes },
        StepCommand::SetWantPeopleToNotify { answer: YesNo::Yes },
        StepCommand::SetApplyingForReduction { answer: YesNo::No },
        StepCommand::RecordPayment {
            payment: payment("pay-p", FULL_FEE_PENCE),
        },
        StepCommand::Sign,
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_stored_states_always_match_derivation(
        picks in proptest::collection::vec(0usize..14, 1..25)
    ) {
        let app = reviewed();
        let pool = command_pool(&app);
        let (mut machine, _temp) = create_test_machine(app);

        for pick in picks {
            let _ = machine.apply(pool[pick].clone());
            let app = machine.application();
            prop_assert_eq!(&app.tasks, &derive_all(app));
        }
    }
}
