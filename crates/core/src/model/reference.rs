use serde::{Deserialize, Serialize};

use crate::model::role::CanonicalRole;

/// Offline snapshot of one external bone reference, captured while the
/// source tree was still live.
///
/// `path` is relative to the source skeleton root, `/`-separated. A literal
/// `/` inside a bone name is not escaped; such a name reads back as extra
/// path segments. This is a wire-format limitation, not a resolver bug.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SerializedBoneReference {
    pub path: String,
    #[serde(default)]
    pub role: Option<CanonicalRole>,
    #[serde(default)]
    pub nearest_ancestor_role: Option<CanonicalRole>,
    #[serde(default)]
    pub path_from_ancestor: Option<String>,
    pub is_skeleton_bone: bool,
}

impl SerializedBoneReference {
    /// Final segment of the stored path.
    pub fn leaf_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or("")
    }

    /// Stored path minus its final segment, if the path has more than one
    /// segment.
    pub fn parent_path(&self) -> Option<&str> {
        self.path.rsplit_once('/').map(|(parent, _)| parent)
    }

    /// Number of path segments; the ordering key for helper synthesis.
    pub fn depth(&self) -> usize {
        if self.path.is_empty() {
            0
        } else {
            self.path.split('/').count()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(path: &str) -> SerializedBoneReference {
        SerializedBoneReference {
            path: path.to_string(),
            role: None,
            nearest_ancestor_role: None,
            path_from_ancestor: None,
            is_skeleton_bone: false,
        }
    }

    #[test]
    fn leaf_name_is_final_segment() {
        assert_eq!(reference("Hips/Spine/Chest").leaf_name(), "Chest");
        assert_eq!(reference("Hips").leaf_name(), "Hips");
    }

    #[test]
    fn parent_path_drops_final_segment() {
        assert_eq!(reference("Hips/Spine/Chest").parent_path(), Some("Hips/Spine"));
        assert_eq!(reference("Hips").parent_path(), None);
    }

    #[test]
    fn depth_counts_segments() {
        assert_eq!(reference("").depth(), 0);
        assert_eq!(reference("Hips").depth(), 1);
        assert_eq!(reference("Hips/Spine/Chest").depth(), 3);
    }
}
