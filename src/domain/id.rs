use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque, collision-resistant identifier assigned to every entity.
///
/// Identifiers are stable once assigned and carry no semantic structure
/// that the rest of the system may rely on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Generates a fresh identifier from a cryptographically random UUID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A missing identifier in persisted data is filled with a fresh one.
impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for EntityId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&str> for EntityId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

/// Access to the identifier of an owned entity.
///
/// All lookups scan the owning collection for a matching id; there are no
/// back-references between entities.
pub trait Identified {
    /// The entity's identifier.
    fn id(&self) -> &EntityId;
}

/// Inserts a new entity at the front of its collection (newest-first).
pub(crate) fn prepend<T: Identified>(items: &mut Vec<T>, item: T) {
    items.insert(0, item);
}

/// Applies `apply` to the entity with a matching id.
///
/// Returns `false` (a no-op, not an error) when no entity matches.
pub(crate) fn patch_entity<T: Identified>(
    items: &mut [T],
    id: &EntityId,
    apply: impl FnOnce(&mut T),
) -> bool {
    items
        .iter_mut()
        .find(|item| item.id() == id)
        .map(apply)
        .is_some()
}

/// Removes the entity with a matching id, if present.
///
/// Returns `false` (a no-op, not an error) when no entity matches.
pub(crate) fn remove_entity<T: Identified>(items: &mut Vec<T>, id: &EntityId) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != id);
    items.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_do_not_collide() {
        let ids: std::collections::HashSet<_> = (0..1000).map(|_| EntityId::new()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn serializes_as_a_plain_string() {
        let id = EntityId::from("abc-123");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abc-123\"");
    }

    #[test]
    fn round_trips_through_serde() {
        let id = EntityId::new();
        let json = serde_json::to_string(&id).unwrap();
        let back: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
