//! Change planning for [`ZoneReconciler::set_records`](super::ZoneReconciler::set_records)
//!
//! Pure set-diffing: no I/O, no codec. Given the provider's current records
//! and the caller's desired records, decide what to remove and what to add.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::record::Record;

/// Which fields make two records "the same entry" when diffing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityPolicy {
    /// `(type, value)`; name and TTL are ignored
    #[default]
    TypeValue,
    /// `(type, name, value)`; TTL is ignored
    TypeNameValue,
}

impl IdentityPolicy {
    /// The identity key of a record under this policy
    pub fn key(self, record: &Record) -> String {
        match self {
            IdentityPolicy::TypeValue => format!("{}:{}", record.record_type, record.value),
            IdentityPolicy::TypeNameValue => format!(
                "{}:{}:{}",
                record.record_type, record.name, record.value
            ),
        }
    }
}

/// Records to remove and add, in submission order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Existing records to remove (as the provider reported them)
    pub removals: Vec<Record>,
    /// Desired records to add
    pub additions: Vec<Record>,
}

impl ChangeSet {
    /// Whether there is nothing to remove and nothing to add
    pub fn is_empty(&self) -> bool {
        self.removals.is_empty() && self.additions.is_empty()
    }
}

/// Plan the changes that turn `current` into `desired`
///
/// Every desired record is added. When a current record shares its identity
/// key, that current record is removed first, even if name and TTL are
/// unchanged. If several current records share a key, only the last one is
/// matched.
pub fn plan_changes(current: &[Record], desired: &[Record], identity: IdentityPolicy) -> ChangeSet {
    let existing: HashMap<String, &Record> = current
        .iter()
        .map(|record| (identity.key(record), record))
        .collect();

    let mut changes = ChangeSet::default();
    for record in desired {
        if let Some(old) = existing.get(&identity.key(record)) {
            changes.removals.push((*old).clone());
        }
        changes.additions.push(record.clone());
    }
    changes
}
