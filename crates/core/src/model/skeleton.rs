// Skeleton tree model
// Read-only arena of named bones with parent/child links and optional
// world-space transforms

use std::collections::BTreeMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::model::role::{CanonicalRole, RoleMap};

/// Whether a node belongs to the formal skinned skeleton set.
///
/// Skinned bones are never eligible for auto-synthesis on the destination
/// side; auxiliary nodes (offset objects and similar helpers) are.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BoneKind {
    SkeletalBone,
    AuxiliaryNode,
}

/// One node of a skeleton tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoneNode {
    pub id: Uuid,
    pub name: String,
    pub kind: BoneKind,
    #[serde(default)]
    pub parent: Option<Uuid>,
    #[serde(default)]
    pub children: Vec<Uuid>,
    #[serde(default)]
    pub world_position: Option<Vec3>,
    #[serde(default)]
    pub world_scale: Option<Vec3>,
}

/// A rooted tree of named bones plus an optional canonical-role map.
///
/// Resolution only ever reads a skeleton. The mutating methods exist for
/// the collaborators that assemble trees before a resolution pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Skeleton {
    root: Uuid,
    bones: BTreeMap<Uuid, BoneNode>,
    role_map: Option<RoleMap>,
}

impl Skeleton {
    /// Create a skeleton holding a single skeletal root bone.
    pub fn new(root_name: impl Into<String>) -> Self {
        let root = BoneNode {
            id: Uuid::now_v7(),
            name: root_name.into(),
            kind: BoneKind::SkeletalBone,
            parent: None,
            children: Vec::new(),
            world_position: None,
            world_scale: None,
        };
        let root_id = root.id;
        let mut bones = BTreeMap::new();
        bones.insert(root_id, root);
        Self {
            root: root_id,
            bones,
            role_map: None,
        }
    }

    /// Attach a new bone under `parent` and return its id.
    pub fn add_bone(
        &mut self,
        parent: Uuid,
        name: impl Into<String>,
        kind: BoneKind,
    ) -> Result<Uuid> {
        if !self.bones.contains_key(&parent) {
            return Err(CoreError::UnknownBone(parent));
        }
        let bone = BoneNode {
            id: Uuid::now_v7(),
            name: name.into(),
            kind,
            parent: Some(parent),
            children: Vec::new(),
            world_position: None,
            world_scale: None,
        };
        let id = bone.id;
        self.bones.insert(id, bone);
        if let Some(parent_bone) = self.bones.get_mut(&parent) {
            parent_bone.children.push(id);
        }
        Ok(id)
    }

    pub fn set_world_position(&mut self, id: Uuid, position: Vec3) -> Result<()> {
        let bone = self.bones.get_mut(&id).ok_or(CoreError::UnknownBone(id))?;
        bone.world_position = Some(position);
        Ok(())
    }

    pub fn set_world_scale(&mut self, id: Uuid, scale: Vec3) -> Result<()> {
        let bone = self.bones.get_mut(&id).ok_or(CoreError::UnknownBone(id))?;
        bone.world_scale = Some(scale);
        Ok(())
    }

    /// Assign a canonical role to a bone. The previous holder of the role,
    /// if any, loses it; a role maps to at most one bone.
    pub fn set_role(&mut self, role: CanonicalRole, id: Uuid) -> Result<()> {
        if !self.bones.contains_key(&id) {
            return Err(CoreError::UnknownBone(id));
        }
        self.role_map.get_or_insert_with(RoleMap::new).insert(role, id);
        Ok(())
    }

    pub fn root(&self) -> Uuid {
        self.root
    }

    pub fn bone(&self, id: Uuid) -> Option<&BoneNode> {
        self.bones.get(&id)
    }

    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    pub fn role_map(&self) -> Option<&RoleMap> {
        self.role_map.as_ref()
    }

    /// Bone currently assigned to `role`, if the skeleton has a role map.
    pub fn role_bone(&self, role: CanonicalRole) -> Option<Uuid> {
        self.role_map.as_ref()?.get(&role).copied()
    }

    /// `/`-joined segment path from the root down to `id`, excluding the
    /// root's own name. The root itself has the empty path.
    ///
    /// Returns `None` when the bone is unknown or its ancestry does not
    /// reach the root.
    pub fn relative_path(&self, id: Uuid) -> Option<String> {
        let mut segments = Vec::new();
        let mut current = self.bones.get(&id)?;
        while let Some(parent) = current.parent {
            segments.push(current.name.as_str());
            current = self.bones.get(&parent)?;
        }
        if current.id != self.root {
            return None;
        }
        segments.reverse();
        Some(segments.join("/"))
    }

    /// Exact segment-by-segment path lookup under the root. Case-sensitive;
    /// the empty path resolves to the root. When siblings share a name the
    /// first child in stored order wins.
    pub fn find_by_path(&self, path: &str) -> Option<Uuid> {
        self.find_descendant(self.root, path)
    }

    /// Same lookup starting from an arbitrary bone instead of the root.
    pub fn find_descendant(&self, from: Uuid, path: &str) -> Option<Uuid> {
        if !self.bones.contains_key(&from) {
            return None;
        }
        if path.is_empty() {
            return Some(from);
        }
        let mut current = from;
        for segment in path.split('/') {
            let bone = self.bones.get(&current)?;
            current = bone
                .children
                .iter()
                .copied()
                .find(|child| self.bones.get(child).is_some_and(|b| b.name == segment))?;
        }
        Some(current)
    }

    /// First bone with the given name in preorder tree-walk order,
    /// including the root. Duplicate names are not disambiguated.
    pub fn find_by_name(&self, name: &str) -> Option<Uuid> {
        self.preorder()
            .into_iter()
            .find(|id| self.bones.get(id).is_some_and(|b| b.name == name))
    }

    /// Number of edges between the root and `id`; the root has depth 0.
    pub fn depth(&self, id: Uuid) -> Option<usize> {
        let mut depth = 0;
        let mut current = self.bones.get(&id)?;
        while let Some(parent) = current.parent {
            depth += 1;
            current = self.bones.get(&parent)?;
        }
        (current.id == self.root).then_some(depth)
    }

    /// Depth-first preorder walk, children in stored order. This is the
    /// tree-walk order used by first-match name searches.
    pub fn preorder(&self) -> Vec<Uuid> {
        let mut order = Vec::with_capacity(self.bones.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some(bone) = self.bones.get(&id) {
                for child in bone.children.iter().rev() {
                    stack.push(*child);
                }
            }
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_skeleton() -> (Skeleton, Uuid, Uuid, Uuid) {
        let mut skeleton = Skeleton::new("Armature");
        let hips = skeleton
            .add_bone(skeleton.root(), "Hips", BoneKind::SkeletalBone)
            .unwrap();
        let spine = skeleton.add_bone(hips, "Spine", BoneKind::SkeletalBone).unwrap();
        let chest = skeleton.add_bone(spine, "Chest", BoneKind::SkeletalBone).unwrap();
        (skeleton, hips, spine, chest)
    }

    #[test]
    fn relative_path_walks_up_to_root() {
        let (skeleton, hips, _, chest) = sample_skeleton();
        assert_eq!(skeleton.relative_path(hips).unwrap(), "Hips");
        assert_eq!(skeleton.relative_path(chest).unwrap(), "Hips/Spine/Chest");
    }

    #[test]
    fn root_path_is_empty_and_resolves_back() {
        let (skeleton, _, _, _) = sample_skeleton();
        assert_eq!(skeleton.relative_path(skeleton.root()).unwrap(), "");
        assert_eq!(skeleton.find_by_path(""), Some(skeleton.root()));
    }

    #[test]
    fn find_by_path_matches_exact_segments() {
        let (skeleton, _, spine, chest) = sample_skeleton();
        assert_eq!(skeleton.find_by_path("Hips/Spine"), Some(spine));
        assert_eq!(skeleton.find_by_path("Hips/Spine/Chest"), Some(chest));
        assert_eq!(skeleton.find_by_path("Hips/spine"), None);
        assert_eq!(skeleton.find_by_path("Hips/Missing"), None);
    }

    #[test]
    fn find_by_name_returns_first_preorder_match() {
        let mut skeleton = Skeleton::new("Armature");
        let left = skeleton
            .add_bone(skeleton.root(), "Left", BoneKind::SkeletalBone)
            .unwrap();
        let right = skeleton
            .add_bone(skeleton.root(), "Right", BoneKind::SkeletalBone)
            .unwrap();
        let twin_under_left = skeleton.add_bone(left, "Twin", BoneKind::SkeletalBone).unwrap();
        let _twin_under_right = skeleton.add_bone(right, "Twin", BoneKind::SkeletalBone).unwrap();

        assert_eq!(skeleton.find_by_name("Twin"), Some(twin_under_left));
    }

    #[test]
    fn depth_counts_edges_from_root() {
        let (skeleton, hips, _, chest) = sample_skeleton();
        assert_eq!(skeleton.depth(skeleton.root()), Some(0));
        assert_eq!(skeleton.depth(hips), Some(1));
        assert_eq!(skeleton.depth(chest), Some(3));
    }

    #[test]
    fn add_bone_rejects_unknown_parent() {
        let mut skeleton = Skeleton::new("Armature");
        let result = skeleton.add_bone(Uuid::now_v7(), "Orphan", BoneKind::SkeletalBone);
        assert!(matches!(result, Err(CoreError::UnknownBone(_))));
    }

    #[test]
    fn set_role_replaces_previous_holder() {
        let (mut skeleton, hips, spine, _) = sample_skeleton();
        skeleton.set_role(CanonicalRole::Hips, hips).unwrap();
        skeleton.set_role(CanonicalRole::Hips, spine).unwrap();
        assert_eq!(skeleton.role_bone(CanonicalRole::Hips), Some(spine));
        assert_eq!(skeleton.role_map().unwrap().len(), 1);
    }
}
