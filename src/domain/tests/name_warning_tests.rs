use super::*;
use crate::test_support::*;
use proptest::prelude::*;

#[test]
fn test_normalise_name() {
    assert_eq!(normalise_name("  Mary   Ann  "), "mary ann");
    assert_eq!(normalise_name("SMITH"), "smith");
    assert_eq!(normalise_name("\t"), "");
    assert!(names_equal("Jo  Smith", " jo smith"));
    assert!(!names_equal("Jo Smith", "Jo Smyth"));
}

#[test]
fn test_attorney_with_donor_name_warns() {
    let app = ready_for_review();

    let warning = find_same_name(&app, ActorKind::Attorney, ActorUid::new(), " sam ", "SMITH")
        .expect("donor name should match");

    assert_eq!(warning.entering, ActorKind::Attorney);
    assert_eq!(warning.matches, ActorKind::Donor);
    assert_eq!(
        warning.descriptor(),
        "errorAttorneyMatchesActor|theDonor|sam|SMITH"
    );
    assert_eq!(warning.to_string(), warning.descriptor());
}

#[test]
fn test_editing_a_member_does_not_match_itself() {
    let app = ready_for_review();
    let existing = app.attorneys.iter().next().cloned().unwrap();

    let own = find_same_name(
        &app,
        ActorKind::Attorney,
        existing.uid,
        &existing.first_names,
        &existing.last_name,
    );
    assert!(own.is_none());

    let other = find_same_name(
        &app,
        ActorKind::ReplacementAttorney,
        ActorUid::new(),
        &existing.first_names,
        &existing.last_name,
    )
    .unwrap();
    assert_eq!(other.matches, ActorKind::Attorney);
    assert_eq!(other.descriptor(), "errorReplacementAttorneyMatchesActor|anAttorney|Alex|Jones");
}

#[test]
fn test_blank_names_never_match() {
    let app = empty_application();

    // The empty donor would otherwise match an empty entry.
    assert!(find_same_name(&app, ActorKind::CertificateProvider, ActorUid::new(), "", "").is_none());
    assert!(find_same_name(&app, ActorKind::CertificateProvider, ActorUid::new(), "  ", "Smith")
        .is_none());
}

#[test]
fn test_matches_certificate_provider_and_people_to_notify() {
    let app = ready_for_review();

    let warning = find_same_name(
        &app,
        ActorKind::PersonToNotify,
        ActorUid::new(),
        "Charlie",
        "Brown",
    )
    .unwrap();

    assert_eq!(warning.matches, ActorKind::CertificateProvider);
    assert_eq!(
        warning.descriptor(),
        "errorPersonToNotifyMatchesActor|theCertificateProvider|Charlie|Brown"
    );
}

#[test]
fn test_acknowledgement_is_tolerant_of_formatting() {
    let warning = SameNameWarning {
        entering: ActorKind::Attorney,
        matches: ActorKind::Donor,
        first_names: "Sam".to_string(),
        last_name: "Smith".to_string(),
    };

    assert!(warning.is_acknowledged_by("errorAttorneyMatchesActor|theDonor|Sam|Smith"));
    assert!(warning.is_acknowledged_by(" ERRORATTORNEYMATCHESACTOR | thedonor |  sam | smith "));
    assert!(!warning.is_acknowledged_by("errorAttorneyMatchesActor|theDonor|Sam|Smyth"));
    assert!(!warning.is_acknowledged_by("errorAttorneyMatchesActor|anAttorney|Sam|Smith"));
    assert!(!warning.is_acknowledged_by("errorAttorneyMatchesActor|theDonor|Sam"));
    assert!(!warning.is_acknowledged_by(""));
}

#[test]
fn test_name_containing_separator_can_be_acknowledged() {
    let warning = SameNameWarning {
        entering: ActorKind::Attorney,
        matches: ActorKind::Donor,
        first_names: "Jane|Ann".to_string(),
        last_name: "Doe".to_string(),
    };

    assert!(warning.is_acknowledged_by(&warning.descriptor()));
    assert!(warning.is_acknowledged_by("errorAttorneyMatchesActor|theDonor| JANE |ann|doe"));
    assert!(!warning.is_acknowledged_by("errorAttorneyMatchesActor|theDonor|Jane|Doe"));
}

#[test]
fn test_unacknowledged_warning() {
    let app = ready_for_review();
    let uid = ActorUid::new();

    let pending = unacknowledged_warning(&app, ActorKind::Attorney, uid, "Sam", "Smith", None)
        .unwrap();
    let descriptor = pending.descriptor();

    assert!(
        unacknowledged_warning(&app, ActorKind::Attorney, uid, "Sam", "Smith", Some(&descriptor))
            .is_none()
    );
    // A descriptor for a different warning still blocks.
    assert!(unacknowledged_warning(
        &app,
        ActorKind::ReplacementAttorney,
        uid,
        "Sam",
        "Smith",
        Some(&descriptor)
    )
    .is_some());
    assert!(
        unacknowledged_warning(&app, ActorKind::Attorney, uid, "Pat", "Smith", None).is_none()
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_descriptor_acknowledges_its_own_warning(
        first in "[A-Za-z]{1,8}( [A-Za-z]{1,8})?",
        last in "[A-Za-z]{1,10}",
        pad in "[ ]{0,3}",
    ) {
        let warning = SameNameWarning {
            entering: ActorKind::CertificateProvider,
            matches: ActorKind::Attorney,
            first_names: first.clone(),
            last_name: last.clone(),
        };
        let echoed = format!("{pad}{}{pad}", warning.descriptor().to_uppercase());

        prop_assert!(warning.is_acknowledged_by(&warning.descriptor()));
        prop_assert!(warning.is_acknowledged_by(&echoed));
    }
}
