// Single-node resolution - fixed strategy ladder
// First success wins; no backtracking once a match is returned

use thiserror::Error;
use uuid::Uuid;

use crate::model::{PathRemapRule, Skeleton};
use crate::resolver::diagnostics::MatchStrategy;
use crate::resolver::rewrite::{apply_forward, apply_reverse};

/// Successful resolution of one source bone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeMatch {
    pub destination: Uuid,
    pub strategy: MatchStrategy,
}

/// Why a source bone could not be placed. Carried as a value; callers
/// branch on the `Result` rather than catching anything.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UnresolvedReason {
    #[error("bone {0} is not part of the source skeleton")]
    SourceBoneNotFound(Uuid),

    #[error("'{name}' has no relative path from the source root")]
    NoRelativePath { name: String },

    #[error("no resolution strategy matched '{name}'")]
    NoStrategyMatched { name: String },

    #[error("destination parent of '{name}' is unresolved")]
    UnresolvedParent { name: String },
}

/// Resolve without remap rules: canonical role, direct relative path, then
/// a whole-tree leaf-name search as the last resort.
pub fn resolve(
    source_bone: Uuid,
    source: &Skeleton,
    destination: &Skeleton,
) -> Result<NodeMatch, UnresolvedReason> {
    resolve_impl(source_bone, source, destination, None)
}

/// Resolve with remap rules: canonical role, direct relative path, then
/// forward-remapped path and leaf name, then reverse-remapped path and
/// leaf name. The reverse pass runs only when it would differ from the
/// forward pass.
pub fn resolve_with_rules(
    source_bone: Uuid,
    source: &Skeleton,
    destination: &Skeleton,
    rules: &[PathRemapRule],
) -> Result<NodeMatch, UnresolvedReason> {
    resolve_impl(source_bone, source, destination, Some(rules))
}

fn resolve_impl(
    source_bone: Uuid,
    source: &Skeleton,
    destination: &Skeleton,
    rules: Option<&[PathRemapRule]>,
) -> Result<NodeMatch, UnresolvedReason> {
    let bone = source
        .bone(source_bone)
        .ok_or(UnresolvedReason::SourceBoneNotFound(source_bone))?;

    // Canonical role match, only when both sides expose role maps
    if source.role_map().is_some() && destination.role_map().is_some() {
        if let Some(role) = source
            .role_map()
            .and_then(|roles| roles.iter().find(|(_, id)| **id == source_bone))
            .map(|(role, _)| *role)
        {
            if let Some(dest) = destination.role_bone(role) {
                return Ok(NodeMatch {
                    destination: dest,
                    strategy: MatchStrategy::CanonicalRole,
                });
            }
        }
    }

    let path = source.relative_path(source_bone);

    // Direct relative path match, exact and case-sensitive
    if let Some(path) = &path {
        if let Some(dest) = destination.find_by_path(path) {
            return Ok(NodeMatch {
                destination: dest,
                strategy: MatchStrategy::RelativePath,
            });
        }
    }

    let Some(rules) = rules else {
        // Unremapped leaf-name match: absolute name search works even for
        // bones without a relative path
        if let Some(dest) = destination.find_by_name(&bone.name) {
            return Ok(NodeMatch {
                destination: dest,
                strategy: MatchStrategy::LeafName,
            });
        }
        return Err(UnresolvedReason::NoStrategyMatched {
            name: bone.name.clone(),
        });
    };

    let Some(path) = path else {
        return Err(UnresolvedReason::NoRelativePath {
            name: bone.name.clone(),
        });
    };

    let forward = apply_forward(&path, rules);
    if let Some(found) = match_remapped(destination, &forward, true) {
        return Ok(found);
    }

    let reverse = apply_reverse(&path, rules);
    if reverse != forward {
        if let Some(found) = match_remapped(destination, &reverse, false) {
            return Ok(found);
        }
    }

    Err(UnresolvedReason::NoStrategyMatched {
        name: bone.name.clone(),
    })
}

/// Exact path lookup, then a whole-tree search for the final segment.
/// Preorder first match wins; duplicate names are not disambiguated.
fn match_remapped(destination: &Skeleton, remapped: &str, forward: bool) -> Option<NodeMatch> {
    if let Some(dest) = destination.find_by_path(remapped) {
        return Some(NodeMatch {
            destination: dest,
            strategy: if forward {
                MatchStrategy::ForwardRemappedPath
            } else {
                MatchStrategy::ReverseRemappedPath
            },
        });
    }
    let leaf = remapped.rsplit('/').next().unwrap_or(remapped);
    destination.find_by_name(leaf).map(|dest| NodeMatch {
        destination: dest,
        strategy: if forward {
            MatchStrategy::ForwardRemappedLeaf
        } else {
            MatchStrategy::ReverseRemappedLeaf
        },
    })
}
