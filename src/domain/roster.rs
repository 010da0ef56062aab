//! Ordered member storage keyed by stable identifiers.
//!
//! Members live in a map keyed by [`ActorUid`]; a separate order vector gives
//! display order. References held by in-flight sub-steps stay valid when the
//! roster is reordered or another member is removed.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

use crate::domain::types::ActorUid;

/// Anything stored in a roster carries its own stable identifier.
pub trait Member {
    fn uid(&self) -> ActorUid;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Roster<T> {
    order: Vec<ActorUid>,
    members: HashMap<ActorUid, T>,
}

impl<T> Default for Roster<T> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            members: HashMap::new(),
        }
    }
}

impl<T: Member> Roster<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new member at the end, or replaces the member with the same uid
    /// in place. Returns true when the member was newly added.
    pub fn put(&mut self, member: T) -> bool {
        let uid = member.uid();
        let added = self.members.insert(uid, member).is_none();
        if added {
            self.order.push(uid);
        }
        added
    }

    pub fn get(&self, uid: ActorUid) -> Option<&T> {
        self.members.get(&uid)
    }

    pub fn get_mut(&mut self, uid: ActorUid) -> Option<&mut T> {
        self.members.get_mut(&uid)
    }

    pub fn contains(&self, uid: ActorUid) -> bool {
        self.members.contains_key(&uid)
    }

    pub fn remove(&mut self, uid: ActorUid) -> Option<T> {
        let removed = self.members.remove(&uid)?;
        self.order.retain(|u| *u != uid);
        Some(removed)
    }

    /// Applies a new display order. Uids not present are ignored; members
    /// missing from `order` keep their relative position after the listed ones.
    pub fn reorder(&mut self, order: &[ActorUid]) {
        let mut next: Vec<ActorUid> = Vec::with_capacity(self.order.len());
        for uid in order {
            if self.members.contains_key(uid) && !next.contains(uid) {
                next.push(*uid);
            }
        }
        for uid in &self.order {
            if !next.contains(uid) {
                next.push(*uid);
            }
        }
        self.order = next;
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.order.iter().filter_map(|uid| self.members.get(uid))
    }

    pub fn uids(&self) -> &[ActorUid] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<T: Member> FromIterator<T> for Roster<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut roster = Roster::new();
        for member in iter {
            roster.put(member);
        }
        roster
    }
}

impl<T: Member + Serialize> Serialize for Roster<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de, T: Member + Deserialize<'de>> Deserialize<'de> for Roster<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let members = Vec::<T>::deserialize(deserializer)?;
        Ok(members.into_iter().collect())
    }
}

#[cfg(test)]
#[path = "tests/roster_tests.rs"]
mod tests;
