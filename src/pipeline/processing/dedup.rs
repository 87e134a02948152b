use serde::{Serialize, Serializer};
use std::collections::HashSet;

use super::normalize::collapse_whitespace;
use crate::domain::Owner;

/// Equality key for an owner; only ever compared, never displayed.
/// Prefix and suffix do not take part.
pub fn identity_key(owner: &Owner) -> String {
    let key = match owner {
        Owner::Company(company) => company.name.clone(),
        Owner::Person(person) => match &person.middle_name {
            Some(middle) => format!("{} {} {}", person.first_name, middle, person.last_name),
            None => format!("{} {}", person.first_name, person.last_name),
        },
    };
    collapse_whitespace(&key).to_lowercase()
}

/// Owners of one date bucket, unique by [`identity_key`]. The first owner
/// seen for a key wins and keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnerSet {
    owners: Vec<Owner>,
    keys: HashSet<String>,
}

impl OwnerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when an owner with the same key is already present
    pub fn insert(&mut self, owner: Owner) -> bool {
        if !self.keys.insert(identity_key(&owner)) {
            return false;
        }
        self.owners.push(owner);
        true
    }

    /// Insert every owner, returning how many were duplicates
    pub fn extend<I: IntoIterator<Item = Owner>>(&mut self, owners: I) -> usize {
        let mut dropped = 0;
        for owner in owners {
            if !self.insert(owner) {
                dropped += 1;
            }
        }
        dropped
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Owner> {
        self.owners.iter()
    }

    pub fn as_slice(&self) -> &[Owner] {
        &self.owners
    }

    pub fn into_vec(self) -> Vec<Owner> {
        self.owners
    }
}

impl FromIterator<Owner> for OwnerSet {
    fn from_iter<I: IntoIterator<Item = Owner>>(iter: I) -> Self {
        let mut set = OwnerSet::new();
        set.extend(iter);
        set
    }
}

impl Serialize for OwnerSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.owners.serialize(serializer)
    }
}
