//! Change fingerprinting for reviewed application content.
//!
//! The applicant reviews their document before it goes to the certificate
//! provider. A fingerprint of the reviewable content is stored at that moment,
//! so later requests can tell whether anything the document says has changed.
//! Administrative data (timestamps, payments, identity results, task states)
//! is not part of the fingerprint.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::domain::{
    Application, Attorneys, AuthorisedSignatory, CanBeUsedWhen, CertificateProvider,
    ContentHash, Correspondent, DecisionMode, Decisions, Donor, IndependentWitness,
    LifeSustainingTreatment, LpaType, PersonToNotify, ReplacementStepIn, Roster, TimestampUtc,
    YesNo,
};
use crate::domain::name_warning::normalise_name;

/// Bumped whenever the fingerprinted shape changes, so old fingerprints never
/// collide with new ones.
const FINGERPRINT_VERSION: u8 = 1;

#[derive(Serialize)]
struct DecisionsContent<'a> {
    mode: Option<DecisionMode>,
    details: &'a str,
}

impl<'a> From<&'a Decisions> for DecisionsContent<'a> {
    fn from(d: &'a Decisions) -> Self {
        Self {
            mode: d.mode,
            details: &d.details,
        }
    }
}

#[derive(Serialize)]
struct ReviewableContent<'a> {
    lpa_type: Option<LpaType>,
    donor: &'a Donor,
    attorneys: &'a Attorneys,
    attorney_decisions: DecisionsContent<'a>,
    want_replacement_attorneys: Option<YesNo>,
    replacement_attorneys: &'a Attorneys,
    replacement_attorney_decisions: DecisionsContent<'a>,
    replacement_step_in: Option<ReplacementStepIn>,
    replacement_step_in_details: &'a str,
    when_can_be_used: Option<CanBeUsedWhen>,
    life_sustaining_treatment: Option<LifeSustainingTreatment>,
    restrictions: Option<&'a str>,
    certificate_provider: &'a CertificateProvider,
    want_people_to_notify: Option<YesNo>,
    people_to_notify: &'a Roster<PersonToNotify>,
    add_correspondent: Option<YesNo>,
    correspondent: &'a Correspondent,
    authorised_signatory: &'a AuthorisedSignatory,
    independent_witness: &'a IndependentWitness,
}

impl<'a> From<&'a Application> for ReviewableContent<'a> {
    fn from(app: &'a Application) -> Self {
        Self {
            lpa_type: app.lpa_type,
            donor: &app.donor,
            attorneys: &app.attorneys,
            attorney_decisions: (&app.attorney_decisions).into(),
            want_replacement_attorneys: app.want_replacement_attorneys,
            replacement_attorneys: &app.replacement_attorneys,
            replacement_attorney_decisions: (&app.replacement_attorney_decisions).into(),
            replacement_step_in: app.replacement_step_in,
            replacement_step_in_details: &app.replacement_step_in_details,
            when_can_be_used: app.when_can_be_used,
            life_sustaining_treatment: app.life_sustaining_treatment,
            restrictions: app.restrictions.as_deref(),
            certificate_provider: &app.certificate_provider,
            want_people_to_notify: app.want_people_to_notify,
            people_to_notify: &app.people_to_notify,
            add_correspondent: app.add_correspondent,
            correspondent: &app.correspondent,
            authorised_signatory: &app.authorised_signatory,
            independent_witness: &app.independent_witness,
        }
    }
}

#[derive(Serialize)]
struct RelationshipContent<'a> {
    certificate_provider: &'a CertificateProvider,
    donor: &'a Donor,
    attorneys: &'a Attorneys,
    replacement_attorneys: &'a Attorneys,
}

fn fingerprint(domain: &[u8], content: &impl Serialize) -> ContentHash {
    let mut hasher = Sha256::new();
    hasher.update([FINGERPRINT_VERSION]);
    hasher.update(domain);
    // A serialisation failure still hashes whatever was written before it.
    if let Err(err) = serde_json::to_writer(&mut hasher, content) {
        tracing::error!(error = %err, "fingerprint content failed to serialise");
    }

    // Convert first 8 bytes of SHA256 to u64
    let result = hasher.finalize();
    let mut first = [0u8; 8];
    first.copy_from_slice(&result[..8]);
    ContentHash(u64::from_le_bytes(first))
}

/// Fingerprint of everything that ends up in the generated document.
pub fn compute_hash(app: &Application) -> ContentHash {
    fingerprint(b"reviewable", &ReviewableContent::from(app))
}

/// True if the application was never reviewed, or its content has changed
/// since the review.
pub fn has_changed_since_review(app: &Application) -> bool {
    match app.review.checked_at {
        None => true,
        Some(_) => compute_hash(app) != app.review.content_hash,
    }
}

/// Records a review of the current content.
pub fn mark_reviewed(app: &mut Application, now: TimestampUtc) {
    app.review.checked_at = Some(now);
    app.review.content_hash = compute_hash(app);
}

/// Fingerprint of the parties compared when deciding whether the certificate
/// provider may be related to the donor or an attorney.
pub fn compute_relationship_hash(app: &Application) -> ContentHash {
    fingerprint(
        b"certificate_provider_not_related",
        &RelationshipContent {
            certificate_provider: &app.certificate_provider,
            donor: &app.donor,
            attorneys: &app.attorneys,
            replacement_attorneys: &app.replacement_attorneys,
        },
    )
}

/// Records the applicant's confirmation that the certificate provider is not
/// related to anyone they share details with.
pub fn mark_certificate_provider_not_related(app: &mut Application, now: TimestampUtc) {
    app.certificate_provider_not_related.checked_at = Some(now);
    app.certificate_provider_not_related.content_hash = compute_relationship_hash(app);
}

fn last_name_parts(last_name: &str) -> Vec<String> {
    last_name
        .split('-')
        .map(normalise_name)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Whether the certificate provider shares a surname part or an address with
/// the donor or an attorney, and the applicant has not already confirmed
/// those same details are unrelated.
pub fn certificate_provider_shares_details(app: &Application) -> bool {
    let confirmed = app.certificate_provider_not_related;
    if confirmed.is_reviewed() && confirmed.content_hash == compute_relationship_hash(app) {
        return false;
    }

    let cp = &app.certificate_provider;
    let cp_parts = last_name_parts(&cp.last_name);
    let cp_line1 = normalise_name(&cp.address.line1);
    let cp_postcode = normalise_name(&cp.address.postcode);

    let shares_name = |last_name: &str| {
        last_name_parts(last_name)
            .iter()
            .any(|part| cp_parts.contains(part))
    };
    let shares_address = |line1: &str, postcode: &str| {
        !cp_line1.is_empty()
            && cp_line1 == normalise_name(line1)
            && cp_postcode == normalise_name(postcode)
    };

    let donor = &app.donor;
    if shares_name(&donor.last_name)
        || shares_address(&donor.address.line1, &donor.address.postcode)
    {
        return true;
    }

    app.attorneys
        .iter()
        .chain(app.replacement_attorneys.iter())
        .any(|a| shares_name(&a.last_name) || shares_address(&a.address.line1, &a.address.postcode))
}

#[cfg(test)]
#[path = "tests/change_fingerprint_tests.rs"]
mod tests;
