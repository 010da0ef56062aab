use super::*;
use crate::domain::actors::Attorney;
use crate::test_support::attorney;
use proptest::prelude::*;

fn names(roster: &Roster<Attorney>) -> Vec<String> {
    roster.iter().map(|a| a.first_names.clone()).collect()
}

fn create_test_roster() -> (Roster<Attorney>, [ActorUid; 3]) {
    let members = [
        attorney("Alex", "Jones"),
        attorney("Blake", "Jones"),
        attorney("Casey", "Jones"),
    ];
    let uids = [members[0].uid, members[1].uid, members[2].uid];
    (members.into_iter().collect(), uids)
}

#[test]
fn test_put_appends_then_replaces_in_place() {
    let (mut roster, uids) = create_test_roster();

    let mut edited = roster.get(uids[1]).cloned().unwrap();
    edited.first_names = "Bobbie".to_string();
    assert!(!roster.put(edited));

    assert_eq!(roster.len(), 3);
    assert_eq!(names(&roster), vec!["Alex", "Bobbie", "Casey"]);

    assert!(roster.put(attorney("Drew", "Jones")));
    assert_eq!(roster.len(), 4);
}

#[test]
fn test_uid_survives_removal_of_another_member() {
    let (mut roster, uids) = create_test_roster();

    let removed = roster.remove(uids[0]).unwrap();
    assert_eq!(removed.first_names, "Alex");

    // The member that used to be second is still found by its uid.
    assert_eq!(roster.get(uids[1]).unwrap().first_names, "Blake");
    assert_eq!(roster.uids(), &[uids[1], uids[2]]);
    assert!(roster.remove(uids[0]).is_none());
}

#[test]
fn test_reorder_keeps_unlisted_members() {
    let (mut roster, uids) = create_test_roster();

    roster.reorder(&[uids[2], ActorUid::new(), uids[2]]);

    assert_eq!(names(&roster), vec!["Casey", "Alex", "Blake"]);
    assert_eq!(roster.len(), 3);
}

#[test]
fn test_get_mut_edits_member() {
    let (mut roster, uids) = create_test_roster();

    if let Some(member) = roster.get_mut(uids[2]) {
        member.last_name = "Smith".to_string();
    }

    assert_eq!(roster.get(uids[2]).unwrap().last_name, "Smith");
    assert!(roster.contains(uids[2]));
    assert!(!roster.contains(ActorUid::new()));
}

#[test]
fn test_serializes_in_display_order() {
    let (mut roster, uids) = create_test_roster();
    roster.reorder(&[uids[1]]);

    let json = serde_json::to_string(&roster).unwrap();
    let restored: Roster<Attorney> = serde_json::from_str(&json).unwrap();

    assert!(json.starts_with('['));
    assert_eq!(names(&restored), vec!["Blake", "Alex", "Casey"]);
    assert_eq!(restored.get(uids[0]), roster.get(uids[0]));
}

#[test]
fn test_empty_roster() {
    let roster: Roster<Attorney> = Roster::new();

    assert!(roster.is_empty());
    assert_eq!(roster.iter().count(), 0);
    assert_eq!(serde_json::to_string(&roster).unwrap(), "[]");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_order_and_members_stay_in_step(ops in prop::collection::vec((0u8..3, 0usize..6), 0..30)) {
        let pool: Vec<Attorney> = (0..6).map(|i| attorney(&format!("Member{i}"), "Jones")).collect();
        let mut roster: Roster<Attorney> = Roster::new();

        for (op, index) in ops {
            let member = &pool[index];
            match op {
                0 => { roster.put(member.clone()); }
                1 => { roster.remove(member.uid); }
                _ => {
                    let mut order = roster.uids().to_vec();
                    order.reverse();
                    roster.reorder(&order);
                }
            }

            let listed: Vec<ActorUid> = roster.iter().map(|a| a.uid).collect();
            prop_assert_eq!(listed.as_slice(), roster.uids());
            prop_assert_eq!(roster.len(), listed.len());
            for uid in roster.uids() {
                prop_assert!(roster.contains(*uid));
            }
        }
    }
}
