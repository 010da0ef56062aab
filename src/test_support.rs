//! Application fixtures shared by the unit tests.
//!
//! Each builder returns an application with stored task states matching
//! `derive_all`, so guards and presenters see a consistent picture.

use chrono::{NaiveDate, TimeZone, Utc};

use crate::change_fingerprint::mark_reviewed;
use crate::derivation::derive_all;
use crate::domain::{
    ActorUid, Address, Application, Attorney, CanBeUsedWhen, CaseId, Channel, Clock, FeeType,
    IdentityOption, IdentityStatus, LpaType, PaymentRecord, RelationshipKind, TimestampUtc,
    YesNo, FULL_FEE_PENCE,
};

pub fn fixed_now() -> TimestampUtc {
    TimestampUtc(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
}

/// A clock that always reads the same instant.
pub struct FixedClock(pub TimestampUtc);

impl Clock for FixedClock {
    fn now(&self) -> TimestampUtc {
        self.0
    }
}

pub fn today() -> NaiveDate {
    fixed_now().date()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn address(line1: &str, postcode: &str) -> Address {
    Address {
        line1: line1.to_string(),
        town: "Town".to_string(),
        postcode: postcode.to_string(),
        ..Address::default()
    }
}

pub fn attorney(first: &str, last: &str) -> Attorney {
    Attorney {
        uid: ActorUid::new(),
        first_names: first.to_string(),
        last_name: last.to_string(),
        date_of_birth: Some(date(1980, 6, 1)),
        address: address("2 Attorney Road", "AT1 1AA"),
        ..Attorney::default()
    }
}

/// Re-derives every stored state.
pub fn settle(mut app: Application) -> Application {
    app.tasks = derive_all(&app);
    app
}

pub fn empty_application() -> Application {
    Application::new(CaseId::from("M-1111-2222-3333"), fixed_now())
}

/// Donor details entered, nothing else.
pub fn with_donor_details() -> Application {
    let mut app = empty_application();
    app.donor.first_names = "Sam".to_string();
    app.donor.last_name = "Smith".to_string();
    app.donor.date_of_birth = Some(date(1950, 3, 4));
    app.donor.address = address("1 Donor Street", "DN1 1AA");
    app.donor.can_sign = Some(YesNo::Yes);
    app.lpa_type = Some(LpaType::PropertyAndAffairs);
    settle(app)
}

/// Every reviewable section complete, not yet reviewed.
pub fn ready_for_review() -> Application {
    let mut app = with_donor_details();
    app.attorneys.members.put(attorney("Alex", "Jones"));
    app.normalise_decisions();
    app.want_replacement_attorneys = Some(YesNo::No);
    app.when_can_be_used = Some(CanBeUsedWhen::HasCapacity);
    app.restrictions = Some(String::new());

    let cp = &mut app.certificate_provider;
    cp.first_names = "Charlie".to_string();
    cp.last_name = "Brown".to_string();
    cp.email = "charlie@example.com".to_string();
    cp.address = address("9 Provider Lane", "CP9 9ZZ");
    cp.channel = Some(Channel::Online);
    cp.relationship = Some(RelationshipKind::Professionally);

    app.want_people_to_notify = Some(YesNo::No);
    app.add_correspondent = Some(YesNo::No);
    settle(app)
}

pub fn reviewed() -> Application {
    let mut app = ready_for_review();
    mark_reviewed(&mut app, fixed_now());
    settle(app)
}

pub fn paid() -> Application {
    let mut app = reviewed();
    app.fee.applying_for_reduction = Some(YesNo::No);
    app.fee.fee_type = Some(FeeType::FullFee);
    app.record_payment(PaymentRecord {
        payment_id: "pay-1".to_string(),
        reference: "ref-1".to_string(),
        amount: FULL_FEE_PENCE,
    });
    settle(app)
}

pub fn identity_confirmed() -> Application {
    let mut app = paid();
    app.identity.option = Some(IdentityOption::OneLogin);
    app.identity.status = Some(IdentityStatus::Confirmed);
    app.identity.first_names = app.donor.first_names.clone();
    app.identity.last_name = app.donor.last_name.clone();
    app.identity.date_of_birth = app.donor.date_of_birth;
    app.identity.checked_at = Some(fixed_now());
    settle(app)
}

/// Signed but not yet witnessed.
pub fn signed() -> Application {
    let mut app = identity_confirmed();
    app.signing.signed_at = Some(fixed_now());
    settle(app)
}

/// Signed and witnessed: every task complete.
pub fn submitted() -> Application {
    let mut app = signed();
    app.signing.witnessed_by_certificate_provider_at = Some(fixed_now());
    settle(app)
}

/// Identity check came back with insufficient evidence.
pub fn insufficient_evidence() -> Application {
    let mut app = paid();
    app.identity.option = Some(IdentityOption::OneLogin);
    app.identity.status = Some(IdentityStatus::InsufficientEvidence);
    settle(app)
}

/// A spread of fixtures covering every stage of the journey.
pub fn journey_fixtures() -> Vec<Application> {
    vec![
        empty_application(),
        with_donor_details(),
        ready_for_review(),
        reviewed(),
        paid(),
        identity_confirmed(),
        insufficient_evidence(),
        signed(),
        submitted(),
    ]
}
