// Skeleton mapper - whole-tree correspondence build
// Role seeding, a per-bone resolution sweep, then depth-ordered helper
// synthesis for unresolved auxiliary nodes

use tracing::debug;
use uuid::Uuid;

use crate::model::{BoneKind, PathRemapRule, Skeleton};
use crate::resolver::diagnostics::{
    CorrespondenceMap, HelperRequest, MappingDiagnostic, MappingResult, MatchStrategy, MatchedEntry,
    UnresolvedEntry,
};
use crate::resolver::node::{self, UnresolvedReason};

/// Build a full correspondence map without remap rules.
pub fn build_map(source: &Skeleton, destination: &Skeleton) -> MappingResult {
    build(source, destination, None)
}

/// Build a full correspondence map, bridging naming conventions with the
/// given rule list.
pub fn build_map_with_rules(
    source: &Skeleton,
    destination: &Skeleton,
    rules: &[PathRemapRule],
) -> MappingResult {
    build(source, destination, Some(rules))
}

fn build(
    source: &Skeleton,
    destination: &Skeleton,
    rules: Option<&[PathRemapRule]>,
) -> MappingResult {
    let mut map = CorrespondenceMap::new();
    let mut diagnostic = MappingDiagnostic::default();

    seed_roles(source, destination, &mut map, &mut diagnostic);

    // Per-bone sweep. Individual failures never abort the build; they are
    // collected and reported.
    let mut failures: Vec<(Uuid, UnresolvedReason)> = Vec::new();
    for id in source.preorder() {
        if map.contains(id) {
            continue;
        }
        let outcome = match rules {
            Some(rules) => node::resolve_with_rules(id, source, destination, rules),
            None => node::resolve(id, source, destination),
        };
        match outcome {
            Ok(found) => {
                if map.record(id, found.destination) {
                    diagnostic.matched.push(MatchedEntry {
                        source: id,
                        source_name: bone_name(source, id),
                        destination: found.destination,
                        strategy: found.strategy,
                    });
                }
            }
            Err(reason) => failures.push((id, reason)),
        }
    }

    synthesize_helpers(source, destination, &mut map, &mut diagnostic, &mut failures);

    for (id, reason) in failures {
        diagnostic.unresolved.push(UnresolvedEntry {
            source: id,
            source_name: bone_name(source, id),
            reason: reason.to_string(),
        });
    }

    MappingResult { map, diagnostic }
}

/// Pair every shared canonical role before any per-bone resolution runs,
/// so canonical joints always win over path and name heuristics.
fn seed_roles(
    source: &Skeleton,
    destination: &Skeleton,
    map: &mut CorrespondenceMap,
    diagnostic: &mut MappingDiagnostic,
) {
    let (Some(source_roles), Some(_)) = (source.role_map(), destination.role_map()) else {
        return;
    };
    let mut seeded = 0usize;
    for (role, source_bone) in source_roles {
        if let Some(dest) = destination.role_bone(*role) {
            if map.record(*source_bone, dest) {
                diagnostic.matched.push(MatchedEntry {
                    source: *source_bone,
                    source_name: bone_name(source, *source_bone),
                    destination: dest,
                    strategy: MatchStrategy::CanonicalRole,
                });
                seeded += 1;
            }
        }
    }
    debug!(seeded, "seeded correspondence map from canonical roles");
}

/// Synthesis pass over unresolved auxiliary nodes, shallowest first.
///
/// A parent must already have a destination counterpart, mapped or
/// synthesized earlier in this pass, before its child can be synthesized;
/// the ascending depth order guarantees that within a single pass.
/// Skinned bones are never candidates; they stay unresolved.
fn synthesize_helpers(
    source: &Skeleton,
    destination: &Skeleton,
    map: &mut CorrespondenceMap,
    diagnostic: &mut MappingDiagnostic,
    failures: &mut Vec<(Uuid, UnresolvedReason)>,
) {
    let mut candidates: Vec<Uuid> = failures
        .iter()
        .filter(|(id, _)| {
            source
                .bone(*id)
                .is_some_and(|bone| bone.kind == BoneKind::AuxiliaryNode)
        })
        .map(|(id, _)| *id)
        .collect();
    // the tree walk already yields unique ids; this guards callers that
    // feed repeated failures
    candidates.dedup();
    // stable sort: equal depths keep walk order
    candidates.sort_by_key(|id| source.depth(*id).unwrap_or(usize::MAX));

    if candidates.is_empty() {
        return;
    }
    debug!(candidates = candidates.len(), "running helper synthesis pass");

    for id in candidates {
        if map.contains(id) {
            continue;
        }
        let Some(bone) = source.bone(id) else {
            continue;
        };
        let Some(parent) = bone.parent else {
            continue;
        };
        let Some(dest_parent) = map.destination(parent) else {
            // parent not resolvable yet: skip silently, the candidate stays
            // in the unresolved list
            replace_reason(
                failures,
                id,
                UnresolvedReason::UnresolvedParent {
                    name: bone.name.clone(),
                },
            );
            continue;
        };

        // reuse a same-named child when the destination parent is a real
        // node of the destination tree
        let existing = destination.bone(dest_parent).and_then(|parent_bone| {
            parent_bone
                .children
                .iter()
                .copied()
                .find(|child| destination.bone(*child).is_some_and(|b| b.name == bone.name))
        });

        let (dest_id, strategy) = match existing {
            Some(existing) => (existing, MatchStrategy::ExistingChild),
            None => {
                let minted = Uuid::now_v7();
                diagnostic.helper_requests.push(HelperRequest {
                    parent: dest_parent,
                    node_id: minted,
                    name: bone.name.clone(),
                });
                (minted, MatchStrategy::SynthesizedHelper)
            }
        };

        if map.record(id, dest_id) {
            diagnostic.matched.push(MatchedEntry {
                source: id,
                source_name: bone.name.clone(),
                destination: dest_id,
                strategy,
            });
            failures.retain(|(failed, _)| *failed != id);
        }
    }
}

fn bone_name(skeleton: &Skeleton, id: Uuid) -> String {
    skeleton
        .bone(id)
        .map(|bone| bone.name.clone())
        .unwrap_or_default()
}

fn replace_reason(failures: &mut [(Uuid, UnresolvedReason)], id: Uuid, reason: UnresolvedReason) {
    if let Some(entry) = failures.iter_mut().find(|(failed, _)| *failed == id) {
        entry.1 = reason;
    }
}
