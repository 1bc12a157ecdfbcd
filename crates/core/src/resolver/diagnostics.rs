// Diagnostic types for mapping builds
// Defines CorrespondenceMap, MappingResult, and related records

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which resolution strategy produced a correspondence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    CanonicalRole,
    AncestorRolePath,
    RelativePath,
    ForwardRemappedPath,
    ForwardRemappedLeaf,
    ReverseRemappedPath,
    ReverseRemappedLeaf,
    LeafName,
    ExistingChild,
    SynthesizedHelper,
}

/// Source-to-destination bone pairs. Keys are unique; an entry, once
/// recorded, is never overwritten.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CorrespondenceMap {
    entries: BTreeMap<Uuid, Uuid>,
}

impl CorrespondenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pair. Returns false and leaves the map unchanged when the
    /// source bone already has an entry.
    pub fn record(&mut self, source: Uuid, destination: Uuid) -> bool {
        match self.entries.entry(source) {
            Entry::Vacant(entry) => {
                entry.insert(destination);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    pub fn destination(&self, source: Uuid) -> Option<Uuid> {
        self.entries.get(&source).copied()
    }

    pub fn contains(&self, source: Uuid) -> bool {
        self.entries.contains_key(&source)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Uuid, Uuid)> + '_ {
        self.entries.iter().map(|(source, dest)| (*source, *dest))
    }
}

/// One resolved pair together with the strategy that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchedEntry {
    pub source: Uuid,
    pub source_name: String,
    pub destination: Uuid,
    pub strategy: MatchStrategy,
}

/// One source bone that no strategy could place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnresolvedEntry {
    pub source: Uuid,
    pub source_name: String,
    pub reason: String,
}

/// Instruction for the relocation collaborator: create a node called
/// `name` under `parent`. `node_id` is the identity the correspondence
/// map already refers to; the resolver itself never creates nodes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HelperRequest {
    pub parent: Uuid,
    pub node_id: Uuid,
    pub name: String,
}

/// Full accounting of one mapping build.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MappingDiagnostic {
    pub matched: Vec<MatchedEntry>,
    pub unresolved: Vec<UnresolvedEntry>,
    pub helper_requests: Vec<HelperRequest>,
}

/// Output of a whole-skeleton mapping build.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MappingResult {
    pub map: CorrespondenceMap,
    pub diagnostic: MappingDiagnostic,
}

impl MappingResult {
    pub fn fully_resolved(&self) -> bool {
        self.diagnostic.unresolved.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_never_overwrites() {
        let mut map = CorrespondenceMap::new();
        let source = Uuid::now_v7();
        let first = Uuid::now_v7();
        let second = Uuid::now_v7();

        assert!(map.record(source, first));
        assert!(!map.record(source, second));
        assert_eq!(map.destination(source), Some(first));
        assert_eq!(map.len(), 1);
    }
}
