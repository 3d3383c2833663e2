//! Persisted record of delivered comics.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::ComicId;

/// Set of comic ids already delivered.
///
/// Serialized as `{"visited": [..]}`; unknown fields are ignored on read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitedSet {
    visited: BTreeSet<ComicId>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }

    pub fn contains(&self, id: ComicId) -> bool {
        self.visited.contains(&id)
    }

    /// Record a delivered comic. Returns false if it was already present.
    pub fn insert(&mut self, id: ComicId) -> bool {
        self.visited.insert(id)
    }

    pub fn clear(&mut self) {
        self.visited.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = ComicId> + '_ {
        self.visited.iter().copied()
    }

    /// True once every id up to `latest_id` has been delivered.
    pub fn is_exhausted(&self, latest_id: ComicId) -> bool {
        self.visited.len() == latest_id as usize
    }

    /// Ids in `1..=latest_id` not yet delivered, ascending.
    pub fn unvisited(&self, latest_id: ComicId) -> Vec<ComicId> {
        (1..=latest_id).filter(|id| !self.contains(*id)).collect()
    }
}

impl FromIterator<ComicId> for VisitedSet {
    fn from_iter<I: IntoIterator<Item = ComicId>>(iter: I) -> Self {
        Self {
            visited: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhaustion() {
        let set: VisitedSet = (1..=5).collect();
        assert!(set.is_exhausted(5));
        assert!(!set.is_exhausted(6));
        assert!(set.unvisited(5).is_empty());
        assert_eq!(set.unvisited(7), vec![6, 7]);
    }

    #[test]
    fn test_unvisited_skips_seen() {
        let set: VisitedSet = [2, 4].into_iter().collect();
        assert_eq!(set.unvisited(5), vec![1, 3, 5]);
    }

    #[test]
    fn test_json_shape() {
        let mut set = VisitedSet::new();
        set.insert(57);
        set.insert(3);
        assert!(!set.insert(3));
        assert_eq!(
            serde_json::to_string(&set).unwrap(),
            r#"{"visited":[3,57]}"#
        );
    }

    #[test]
    fn test_unknown_fields_tolerated() {
        let set: VisitedSet =
            serde_json::from_str(r#"{"visited": [1, 2], "note": "hi"}"#).unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_missing_field_rejected() {
        assert!(serde_json::from_str::<VisitedSet>(r#"{"seen": []}"#).is_err());
    }
}
