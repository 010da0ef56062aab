//! Same-name warnings raised when a party is entered with another party's name.
//!
//! A warning interrupts the submission once. The page echoes the warning's
//! descriptor back in a hidden field, and a later submission carrying an
//! equivalent descriptor acknowledges it. Equivalence ignores case, leading and
//! trailing whitespace, and the width of internal whitespace runs in each of the
//! four `|`-separated parts. A descriptor for any other warning does not count.

use serde::{Deserialize, Serialize};

use crate::domain::application::Application;
use crate::domain::types::ActorUid;

/// Lowercased, trimmed, with internal whitespace collapsed to single spaces.
pub fn normalise_name(s: &str) -> String {
    s.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn names_equal(a: &str, b: &str) -> bool {
    normalise_name(a) == normalise_name(b)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    Donor,
    Attorney,
    ReplacementAttorney,
    CertificateProvider,
    PersonToNotify,
    AuthorisedSignatory,
    IndependentWitness,
}

impl ActorKind {
    pub fn error_key(self) -> &'static str {
        match self {
            ActorKind::Donor => "errorDonorMatchesActor",
            ActorKind::Attorney => "errorAttorneyMatchesActor",
            ActorKind::ReplacementAttorney => "errorReplacementAttorneyMatchesActor",
            ActorKind::CertificateProvider => "errorCertificateProviderMatchesActor",
            ActorKind::PersonToNotify => "errorPersonToNotifyMatchesActor",
            ActorKind::AuthorisedSignatory => "errorAuthorisedSignatoryMatchesActor",
            ActorKind::IndependentWitness => "errorIndependentWitnessMatchesActor",
        }
    }

    pub fn article(self) -> &'static str {
        match self {
            ActorKind::Donor => "theDonor",
            ActorKind::Attorney => "anAttorney",
            ActorKind::ReplacementAttorney => "aReplacementAttorney",
            ActorKind::CertificateProvider => "theCertificateProvider",
            ActorKind::PersonToNotify => "aPersonToNotify",
            ActorKind::AuthorisedSignatory => "theAuthorisedSignatory",
            ActorKind::IndependentWitness => "theIndependentWitness",
        }
    }
}

/// The party being entered shares a name with `matches`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SameNameWarning {
    pub entering: ActorKind,
    pub matches: ActorKind,
    pub first_names: String,
    pub last_name: String,
}

impl SameNameWarning {
    /// `<errorKey>|<actorArticle>|<firstNames>|<lastName>`
    pub fn descriptor(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.entering.error_key(),
            self.matches.article(),
            self.first_names,
            self.last_name
        )
    }

    /// Whether an echoed descriptor acknowledges exactly this warning.
    pub fn is_acknowledged_by(&self, echoed: &str) -> bool {
        let expected = self.descriptor();
        let ours: Vec<String> = expected.split('|').map(normalise_name).collect();
        let theirs: Vec<String> = echoed.split('|').map(normalise_name).collect();
        ours == theirs
    }
}

impl std::fmt::Display for SameNameWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.descriptor())
    }
}

fn named_parties(app: &Application) -> Vec<(ActorKind, ActorUid, &str, &str)> {
    let mut parties = vec![(
        ActorKind::Donor,
        app.donor.uid,
        app.donor.first_names.as_str(),
        app.donor.last_name.as_str(),
    )];
    let attorneys = app
        .attorneys
        .iter()
        .map(|a| (ActorKind::Attorney, a.uid, &a.first_names, &a.last_name));
    let replacements = app
        .replacement_attorneys
        .iter()
        .map(|a| (ActorKind::ReplacementAttorney, a.uid, &a.first_names, &a.last_name));
    let people = app
        .people_to_notify
        .iter()
        .map(|p| (ActorKind::PersonToNotify, p.uid, &p.first_names, &p.last_name));
    let cp = &app.certificate_provider;
    let signatory = &app.authorised_signatory;
    let witness = &app.independent_witness;
    let singles = [
        (ActorKind::CertificateProvider, cp.uid, &cp.first_names, &cp.last_name),
        (
            ActorKind::AuthorisedSignatory,
            signatory.uid,
            &signatory.first_names,
            &signatory.last_name,
        ),
        (
            ActorKind::IndependentWitness,
            witness.uid,
            &witness.first_names,
            &witness.last_name,
        ),
    ];

    parties.extend(
        attorneys
            .chain(replacements)
            .chain(people)
            .chain(singles)
            .map(|(kind, uid, first, last)| (kind, uid, first.as_str(), last.as_str())),
    );
    parties
}

/// Looks for another party with the same names as the one being entered.
///
/// `uid` identifies the party being entered so that editing a member does not
/// match itself. Blank names never match.
pub fn find_same_name(
    app: &Application,
    entering: ActorKind,
    uid: ActorUid,
    first_names: &str,
    last_name: &str,
) -> Option<SameNameWarning> {
    if normalise_name(first_names).is_empty() || normalise_name(last_name).is_empty() {
        return None;
    }

    named_parties(app)
        .into_iter()
        .filter(|(_, other_uid, _, _)| *other_uid != uid)
        .find(|(_, _, f, l)| names_equal(f, first_names) && names_equal(l, last_name))
        .map(|(matches, _, _, _)| SameNameWarning {
            entering,
            matches,
            first_names: first_names.trim().to_string(),
            last_name: last_name.trim().to_string(),
        })
}

/// Returns the warning that still needs acknowledging, if any.
pub fn unacknowledged_warning(
    app: &Application,
    entering: ActorKind,
    uid: ActorUid,
    first_names: &str,
    last_name: &str,
    acknowledged: Option<&str>,
) -> Option<SameNameWarning> {
    let warning = find_same_name(app, entering, uid, first_names, last_name)?;
    match acknowledged {
        Some(echoed) if warning.is_acknowledged_by(echoed) => None,
        _ => Some(warning),
    }
}

#[cfg(test)]
#[path = "tests/name_warning_tests.rs"]
mod tests;
