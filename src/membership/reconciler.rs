//! Membership delta computation.
//!
//! Pure set arithmetic over entity ids. Nothing here knows about PATCH body
//! formats; see [`super::format`] for serialization.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

/// A reference to a user, group or role by id.
///
/// Equality and hashing use `id` only, so a changed display name never counts
/// as a membership change.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    #[serde(alias = "value")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl EntityRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display: None,
        }
    }

    pub fn with_display(id: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display: Some(display.into()),
        }
    }
}

impl PartialEq for EntityRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Hash for EntityRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Entities to add and remove to move a membership list to its desired state.
///
/// `added` and `removed` never share an id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipDelta {
    pub added: Vec<EntityRef>,
    pub removed: Vec<EntityRef>,
}

impl MembershipDelta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// The delta that undoes this one.
    pub fn inverse(&self) -> Self {
        Self {
            added: self.removed.clone(),
            removed: self.added.clone(),
        }
    }
}

/// Compute the delta from `current` to `desired` membership.
///
/// Order within each list follows the input order; repeated ids are reported
/// once.
///
/// # Examples
///
/// ```rust
/// use scim_console::membership::{EntityRef, reconcile};
///
/// let current = vec![EntityRef::new("u1"), EntityRef::new("u2")];
/// let desired = vec![EntityRef::new("u2"), EntityRef::new("u3")];
/// let delta = reconcile(&current, &desired);
///
/// assert_eq!(delta.added, vec![EntityRef::new("u3")]);
/// assert_eq!(delta.removed, vec![EntityRef::new("u1")]);
/// ```
pub fn reconcile(current: &[EntityRef], desired: &[EntityRef]) -> MembershipDelta {
    let delta = MembershipDelta {
        added: difference(desired, current),
        removed: difference(current, desired),
    };
    debug!(
        "Reconciled membership: {} current, {} desired, +{} -{}",
        current.len(),
        desired.len(),
        delta.added.len(),
        delta.removed.len()
    );
    delta
}

/// Entries of `from` whose id is absent from `exclude`, first occurrence only.
fn difference(from: &[EntityRef], exclude: &[EntityRef]) -> Vec<EntityRef> {
    let excluded: HashSet<&str> = exclude.iter().map(|e| e.id.as_str()).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    from.iter()
        .filter(|e| !excluded.contains(e.id.as_str()) && seen.insert(e.id.as_str()))
        .cloned()
        .collect()
}
