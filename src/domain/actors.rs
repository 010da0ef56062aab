//! The people (and organisations) named in an application.
//!
//! Each party type decides for itself which attributes it needs before the
//! section it belongs to can be completed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::roster::{Member, Roster};
use crate::domain::types::{
    ActorUid, Channel, RelationshipKind, RelationshipLength, YesNo,
};

fn filled(s: &str) -> bool {
    !s.trim().is_empty()
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Address {
    pub line1: String,
    #[serde(default)]
    pub line2: String,
    #[serde(default)]
    pub line3: String,
    #[serde(default)]
    pub town: String,
    #[serde(default)]
    pub postcode: String,
    #[serde(default)]
    pub country: String,
}

impl Address {
    pub fn is_present(&self) -> bool {
        filled(&self.line1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Donor {
    pub uid: ActorUid,
    pub first_names: String,
    pub last_name: String,
    #[serde(default)]
    pub other_names: String,
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub mobile: String,
    pub can_sign: Option<YesNo>,
}

impl Donor {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_names, self.last_name)
    }

    pub fn has_any_detail(&self) -> bool {
        filled(&self.first_names)
            || filled(&self.last_name)
            || self.date_of_birth.is_some()
            || self.address.is_present()
    }

    pub fn cannot_sign(&self) -> bool {
        self.can_sign == Some(YesNo::No)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Attorney {
    pub uid: ActorUid,
    pub first_names: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub mobile: String,
}

impl Attorney {
    /// Names, date of birth and address are all required.
    pub fn is_complete(&self) -> bool {
        filled(&self.first_names)
            && filled(&self.last_name)
            && self.date_of_birth.is_some()
            && self.address.is_present()
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_names, self.last_name)
    }

    /// Whole years of age on `today`, or `None` without a date of birth.
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        self.date_of_birth.and_then(|dob| today.years_since(dob))
    }
}

impl Member for Attorney {
    fn uid(&self) -> ActorUid {
        self.uid
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrustCorporation {
    pub uid: ActorUid,
    pub name: String,
    #[serde(default)]
    pub company_number: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: Address,
}

impl TrustCorporation {
    pub fn is_complete(&self) -> bool {
        filled(&self.name) && self.address.is_present()
    }
}

/// A collection of attorneys: individuals plus at most one trust corporation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Attorneys {
    #[serde(default)]
    pub members: Roster<Attorney>,
    #[serde(default)]
    pub trust_corporation: Option<TrustCorporation>,
}

impl Attorneys {
    pub fn len(&self) -> usize {
        self.members.len() + usize::from(self.trust_corporation.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every member, including the trust corporation, has its required attributes.
    pub fn is_complete(&self) -> bool {
        self.members.iter().all(Attorney::is_complete)
            && self.trust_corporation.iter().all(TrustCorporation::is_complete)
    }

    pub fn get(&self, uid: ActorUid) -> Option<&Attorney> {
        self.members.get(uid)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attorney> + '_ {
        self.members.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CertificateProvider {
    pub uid: ActorUid,
    pub first_names: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub address: Address,
    pub channel: Option<Channel>,
    pub relationship: Option<RelationshipKind>,
    pub relationship_length: Option<RelationshipLength>,
}

impl CertificateProvider {
    pub fn is_named(&self) -> bool {
        filled(&self.first_names) || filled(&self.last_name)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_names, self.last_name)
    }

    /// The online channel needs a contact email; a personal relationship must
    /// be at least two years old.
    pub fn is_complete(&self) -> bool {
        let channel_ok = match self.channel {
            Some(Channel::Online) => filled(&self.email),
            Some(Channel::Paper) => true,
            None => false,
        };
        let relationship_ok = match self.relationship {
            Some(RelationshipKind::Professionally) => true,
            Some(RelationshipKind::Personally) => {
                self.relationship_length == Some(RelationshipLength::GreaterThanEqualToTwoYears)
            }
            None => false,
        };
        filled(&self.first_names)
            && filled(&self.last_name)
            && self.address.is_present()
            && channel_ok
            && relationship_ok
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersonToNotify {
    pub uid: ActorUid,
    pub first_names: String,
    pub last_name: String,
    #[serde(default)]
    pub address: Address,
}

impl PersonToNotify {
    pub fn is_complete(&self) -> bool {
        filled(&self.first_names) && filled(&self.last_name) && self.address.is_present()
    }
}

impl Member for PersonToNotify {
    fn uid(&self) -> ActorUid {
        self.uid
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Correspondent {
    pub uid: ActorUid,
    pub first_names: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub organisation: String,
    #[serde(default)]
    pub address: Address,
}

impl Correspondent {
    pub fn is_complete(&self) -> bool {
        filled(&self.first_names) && filled(&self.last_name) && filled(&self.email)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuthorisedSignatory {
    pub uid: ActorUid,
    pub first_names: String,
    pub last_name: String,
}

impl AuthorisedSignatory {
    pub fn is_complete(&self) -> bool {
        filled(&self.first_names) && filled(&self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IndependentWitness {
    pub uid: ActorUid,
    pub first_names: String,
    pub last_name: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub address: Address,
}

impl IndependentWitness {
    pub fn is_complete(&self) -> bool {
        filled(&self.first_names) && filled(&self.last_name) && self.address.is_present()
    }
}

/// Someone who vouches for the donor's identity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Voucher {
    pub uid: ActorUid,
    pub first_names: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub allowed: bool,
}

impl Voucher {
    pub fn is_named(&self) -> bool {
        filled(&self.first_names)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_names, self.last_name)
    }
}
