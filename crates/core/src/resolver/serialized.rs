// Degraded-mode resolution over captured path snapshots
// The destination tree is live; the source side exists only as
// SerializedBoneReference records

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::model::{PathRemapRule, SerializedBoneReference, Skeleton};
use crate::resolver::diagnostics::{HelperRequest, MatchStrategy};
use crate::resolver::node::NodeMatch;
use crate::resolver::rewrite::{apply_forward, apply_reverse};

/// One reference that found a destination bone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedReference {
    pub path: String,
    pub destination: Uuid,
    pub strategy: MatchStrategy,
}

/// One reference no strategy could place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnresolvedReference {
    pub path: String,
    pub reason: String,
}

/// Output of a batch resolution over serialized references.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SerializedMappingResult {
    pub resolved: Vec<ResolvedReference>,
    pub unresolved: Vec<UnresolvedReference>,
    pub helper_requests: Vec<HelperRequest>,
}

impl SerializedMappingResult {
    pub fn fully_resolved(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Resolve one reference without remap rules.
pub fn resolve_reference(
    reference: &SerializedBoneReference,
    destination: &Skeleton,
) -> Option<NodeMatch> {
    resolve_impl(reference, destination, None)
}

/// Resolve one reference, bridging naming conventions with the rule list.
/// Strategy ladder: canonical role, ancestor role plus stored sub-path,
/// full stored path (direct, forward remap, reverse remap), leaf name
/// (forward, then reverse when it differs).
pub fn resolve_reference_with_rules(
    reference: &SerializedBoneReference,
    destination: &Skeleton,
    rules: &[PathRemapRule],
) -> Option<NodeMatch> {
    resolve_impl(reference, destination, Some(rules))
}

fn resolve_impl(
    reference: &SerializedBoneReference,
    destination: &Skeleton,
    rules: Option<&[PathRemapRule]>,
) -> Option<NodeMatch> {
    // 1. canonical role
    if let Some(role) = reference.role {
        if let Some(dest) = destination.role_bone(role) {
            return Some(NodeMatch {
                destination: dest,
                strategy: MatchStrategy::CanonicalRole,
            });
        }
    }

    // 2. canonical ancestor plus the stored sub-path beneath it
    if let (Some(ancestor_role), Some(from_ancestor)) = (
        reference.nearest_ancestor_role,
        reference.path_from_ancestor.as_deref(),
    ) {
        if let Some(ancestor) = destination.role_bone(ancestor_role) {
            if let Some(dest) = destination.find_descendant(ancestor, from_ancestor) {
                return Some(NodeMatch {
                    destination: dest,
                    strategy: MatchStrategy::AncestorRolePath,
                });
            }
        }
    }

    // 3. full stored path: direct, then forward remap, then reverse remap
    if let Some(dest) = destination.find_by_path(&reference.path) {
        return Some(NodeMatch {
            destination: dest,
            strategy: MatchStrategy::RelativePath,
        });
    }

    let forward = rules.map(|rules| apply_forward(&reference.path, rules));
    if let Some(forward) = &forward {
        if let Some(dest) = destination.find_by_path(forward) {
            return Some(NodeMatch {
                destination: dest,
                strategy: MatchStrategy::ForwardRemappedPath,
            });
        }
    }

    let reverse = rules.map(|rules| apply_reverse(&reference.path, rules));
    let reverse_differs = matches!((&forward, &reverse), (Some(f), Some(r)) if f != r);
    if reverse_differs {
        if let Some(reverse) = &reverse {
            if let Some(dest) = destination.find_by_path(reverse) {
                return Some(NodeMatch {
                    destination: dest,
                    strategy: MatchStrategy::ReverseRemappedPath,
                });
            }
        }
    }

    // 4. leaf name, forward-remapped then reverse-remapped
    let forward_differs = forward.as_deref().is_some_and(|f| f != reference.path);
    let forward_leaf = leaf_of(forward.as_deref().unwrap_or(&reference.path));
    if let Some(dest) = destination.find_by_name(forward_leaf) {
        return Some(NodeMatch {
            destination: dest,
            strategy: if forward_differs {
                MatchStrategy::ForwardRemappedLeaf
            } else {
                MatchStrategy::LeafName
            },
        });
    }
    if reverse_differs {
        if let Some(reverse) = &reverse {
            if let Some(dest) = destination.find_by_name(leaf_of(reverse)) {
                return Some(NodeMatch {
                    destination: dest,
                    strategy: MatchStrategy::ReverseRemappedLeaf,
                });
            }
        }
    }

    None
}

fn leaf_of(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Batch resolution with a helper-synthesis pass mirroring the live-tree
/// mapper: references are deduplicated by stored path, resolved
/// individually, and the failures that are not skinned bones are then
/// synthesized shallowest-first, resolving parents through their stored
/// parent paths.
pub fn resolve_references(
    references: &[SerializedBoneReference],
    destination: &Skeleton,
    rules: &[PathRemapRule],
) -> SerializedMappingResult {
    let mut result = SerializedMappingResult::default();
    // destination ids keyed by stored path, including minted helper ids,
    // so a child can chain onto a parent synthesized in the same pass
    let mut by_path: BTreeMap<String, Uuid> = BTreeMap::new();
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    let mut pending: Vec<&SerializedBoneReference> = Vec::new();

    for reference in references {
        if !seen.insert(reference.path.as_str()) {
            continue;
        }
        match resolve_impl(reference, destination, Some(rules)) {
            Some(found) => {
                by_path.insert(reference.path.clone(), found.destination);
                result.resolved.push(ResolvedReference {
                    path: reference.path.clone(),
                    destination: found.destination,
                    strategy: found.strategy,
                });
            }
            None => pending.push(reference),
        }
    }

    if pending.is_empty() {
        return result;
    }

    // shallowest first, so parent synthesis precedes child synthesis
    pending.sort_by_key(|reference| reference.depth());
    debug!(
        pending = pending.len(),
        "running serialized helper synthesis pass"
    );

    for reference in pending {
        let leaf = reference.leaf_name().to_string();
        if reference.is_skeleton_bone {
            result.unresolved.push(UnresolvedReference {
                path: reference.path.clone(),
                reason: format!("no resolution strategy matched skinned bone '{leaf}'"),
            });
            continue;
        }
        if reference.path.is_empty() {
            result.unresolved.push(UnresolvedReference {
                path: reference.path.clone(),
                reason: "reference has an empty path".to_string(),
            });
            continue;
        }

        // the single-segment case parents onto the destination root via
        // the empty parent path
        let parent_path = reference.parent_path().unwrap_or("");
        let parent = by_path
            .get(parent_path)
            .copied()
            .or_else(|| lookup_parent(parent_path, destination, rules));
        let Some(parent) = parent else {
            result.unresolved.push(UnresolvedReference {
                path: reference.path.clone(),
                reason: format!("destination parent of '{leaf}' is unresolved"),
            });
            continue;
        };

        let existing = destination.bone(parent).and_then(|parent_bone| {
            parent_bone
                .children
                .iter()
                .copied()
                .find(|child| destination.bone(*child).is_some_and(|b| b.name == leaf))
        });

        let (dest_id, strategy) = match existing {
            Some(existing) => (existing, MatchStrategy::ExistingChild),
            None => {
                let minted = Uuid::now_v7();
                result.helper_requests.push(HelperRequest {
                    parent,
                    node_id: minted,
                    name: leaf.clone(),
                });
                (minted, MatchStrategy::SynthesizedHelper)
            }
        };
        by_path.insert(reference.path.clone(), dest_id);
        result.resolved.push(ResolvedReference {
            path: reference.path.clone(),
            destination: dest_id,
            strategy,
        });
    }

    result
}

/// Resolve a stored parent path against the live destination tree: direct
/// lookup, then forward remap, then reverse remap.
fn lookup_parent(parent_path: &str, destination: &Skeleton, rules: &[PathRemapRule]) -> Option<Uuid> {
    if let Some(dest) = destination.find_by_path(parent_path) {
        return Some(dest);
    }
    let forward = apply_forward(parent_path, rules);
    if let Some(dest) = destination.find_by_path(&forward) {
        return Some(dest);
    }
    let reverse = apply_reverse(parent_path, rules);
    if reverse != forward {
        if let Some(dest) = destination.find_by_path(&reverse) {
            return Some(dest);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoneKind, CanonicalRole, RemapMode};

    fn reference(path: &str, is_skeleton_bone: bool) -> SerializedBoneReference {
        SerializedBoneReference {
            path: path.to_string(),
            role: None,
            nearest_ancestor_role: None,
            path_from_ancestor: None,
            is_skeleton_bone,
        }
    }

    fn destination() -> (Skeleton, Uuid, Uuid) {
        let mut skeleton = Skeleton::new("Armature");
        let hips = skeleton
            .add_bone(skeleton.root(), "Hips", BoneKind::SkeletalBone)
            .unwrap();
        let head = skeleton.add_bone(hips, "Head", BoneKind::SkeletalBone).unwrap();
        (skeleton, hips, head)
    }

    #[test]
    fn role_lookup_wins_over_path() {
        let (mut skeleton, hips, _) = destination();
        skeleton.set_role(CanonicalRole::Hips, hips).unwrap();

        let mut reference = reference("Totally/Wrong/Path", true);
        reference.role = Some(CanonicalRole::Hips);

        let found = resolve_reference(&reference, &skeleton).unwrap();
        assert_eq!(found.destination, hips);
        assert_eq!(found.strategy, MatchStrategy::CanonicalRole);
    }

    #[test]
    fn ancestor_role_plus_sub_path() {
        let (mut skeleton, hips, head) = destination();
        skeleton.set_role(CanonicalRole::Hips, hips).unwrap();

        let mut reference = reference("OldRoot/OldHips/Head", false);
        reference.nearest_ancestor_role = Some(CanonicalRole::Hips);
        reference.path_from_ancestor = Some("Head".to_string());

        let found = resolve_reference(&reference, &skeleton).unwrap();
        assert_eq!(found.destination, head);
        assert_eq!(found.strategy, MatchStrategy::AncestorRolePath);
    }

    #[test]
    fn stored_path_direct_match() {
        let (skeleton, _, head) = destination();
        let found = resolve_reference(&reference("Hips/Head", true), &skeleton).unwrap();
        assert_eq!(found.destination, head);
        assert_eq!(found.strategy, MatchStrategy::RelativePath);
    }

    #[test]
    fn forward_remapped_path_match() {
        let (skeleton, _, head) = destination();
        let rules = vec![PathRemapRule::new(RemapMode::PrefixReplace, "J_Bip_C_", "")];
        let found = resolve_reference_with_rules(
            &reference("J_Bip_C_Hips/J_Bip_C_Head", true),
            &skeleton,
            &rules,
        )
        .unwrap();
        assert_eq!(found.destination, head);
        assert_eq!(found.strategy, MatchStrategy::ForwardRemappedPath);
    }

    #[test]
    fn leaf_name_is_the_last_resort() {
        let (skeleton, _, head) = destination();
        let found = resolve_reference(&reference("Another/Nesting/Head", true), &skeleton).unwrap();
        assert_eq!(found.destination, head);
        assert_eq!(found.strategy, MatchStrategy::LeafName);
    }

    #[test]
    fn skinned_references_are_never_synthesized() {
        let (skeleton, _, _) = destination();
        let result = resolve_references(&[reference("Hips/Tail", true)], &skeleton, &[]);
        assert_eq!(result.unresolved.len(), 1);
        assert!(result.helper_requests.is_empty());
    }

    #[test]
    fn auxiliary_reference_is_synthesized_from_parent_path() {
        let (skeleton, hips, _) = destination();
        let result = resolve_references(&[reference("Hips/SpringOffset", false)], &skeleton, &[]);
        assert!(result.fully_resolved());
        assert_eq!(result.helper_requests.len(), 1);
        assert_eq!(result.helper_requests[0].parent, hips);
        assert_eq!(result.helper_requests[0].name, "SpringOffset");
    }

    #[test]
    fn chained_synthesis_orders_parent_before_child() {
        let (skeleton, _, _) = destination();
        let references = vec![
            reference("Hips/SpringOffset/SpringTip", false),
            reference("Hips/SpringOffset", false),
        ];
        let result = resolve_references(&references, &skeleton, &[]);
        assert!(result.fully_resolved());
        assert_eq!(result.helper_requests.len(), 2);
        assert_eq!(result.helper_requests[0].name, "SpringOffset");
        assert_eq!(result.helper_requests[1].name, "SpringTip");
        // the child's request parents onto the id minted for its parent
        assert_eq!(
            result.helper_requests[1].parent,
            result.helper_requests[0].node_id
        );
    }

    #[test]
    fn duplicate_paths_are_resolved_once() {
        let (skeleton, _, _) = destination();
        let references = vec![reference("Hips/Head", true), reference("Hips/Head", true)];
        let result = resolve_references(&references, &skeleton, &[]);
        assert_eq!(result.resolved.len(), 1);
    }
}
