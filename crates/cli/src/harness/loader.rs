use std::path::Path;

use anyhow::{bail, Context, Result};
use bonemap_core::model::{
    BoneKind, CanonicalRole, PathRemapRule, SerializedBoneReference, Skeleton,
};
use bonemap_core::validation::{validate_rules, validate_skeleton};
use glam::Vec3;
use serde::Deserialize;
use uuid::Uuid;

/// One node of a nested skeleton file.
///
/// Bone names containing a literal `/` are not escaped anywhere in the
/// path format; they will behave as extra path segments.
#[derive(Debug, Clone, Deserialize)]
struct BoneSpec {
    name: String,
    #[serde(default = "default_kind")]
    kind: BoneKind,
    #[serde(default)]
    role: Option<CanonicalRole>,
    #[serde(default)]
    world_position: Option<[f32; 3]>,
    #[serde(default)]
    world_scale: Option<[f32; 3]>,
    #[serde(default)]
    children: Vec<BoneSpec>,
}

fn default_kind() -> BoneKind {
    BoneKind::SkeletalBone
}

/// Load a skeleton from a nested JSON or YAML file and validate its
/// structure.
pub fn load_skeleton(path: &Path) -> Result<Skeleton> {
    let spec: BoneSpec = read_file(path)?;
    let skeleton = build_skeleton(&spec)
        .with_context(|| format!("failed to assemble skeleton from {}", path.display()))?;
    validate_skeleton(&skeleton)
        .with_context(|| format!("invalid skeleton in {}", path.display()))?;
    Ok(skeleton)
}

/// Load and validate an ordered remap rule list from YAML.
pub fn load_rules(path: &Path) -> Result<Vec<PathRemapRule>> {
    let rules: Vec<PathRemapRule> = read_file(path)?;
    validate_rules(&rules).with_context(|| format!("invalid rule list in {}", path.display()))?;
    Ok(rules)
}

/// Load a captured bone reference list from YAML.
pub fn load_references(path: &Path) -> Result<Vec<SerializedBoneReference>> {
    read_file(path)
}

fn build_skeleton(spec: &BoneSpec) -> Result<Skeleton> {
    let mut skeleton = Skeleton::new(spec.name.clone());
    let root = skeleton.root();
    apply_node(&mut skeleton, root, spec)?;
    for child in &spec.children {
        add_subtree(&mut skeleton, root, child)?;
    }
    Ok(skeleton)
}

fn apply_node(skeleton: &mut Skeleton, id: Uuid, spec: &BoneSpec) -> Result<()> {
    if let Some(position) = spec.world_position {
        skeleton.set_world_position(id, Vec3::from(position))?;
    }
    if let Some(scale) = spec.world_scale {
        skeleton.set_world_scale(id, Vec3::from(scale))?;
    }
    if let Some(role) = spec.role {
        skeleton.set_role(role, id)?;
    }
    Ok(())
}

fn add_subtree(skeleton: &mut Skeleton, parent: Uuid, spec: &BoneSpec) -> Result<()> {
    let id = skeleton.add_bone(parent, spec.name.clone(), spec.kind)?;
    apply_node(skeleton, id, spec)?;
    for child in &spec.children {
        add_subtree(skeleton, id, child)?;
    }
    Ok(())
}

/// Read and deserialize a file, JSON or YAML by extension, with
/// field-level error locations.
fn read_file<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    if !path.exists() {
        bail!(
            "file not found: {}\nPlease check the file path and try again.",
            path.display()
        );
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        let mut deserializer = serde_json::Deserializer::from_str(&content);
        serde_path_to_error::deserialize(&mut deserializer)
            .with_context(|| format!("failed to parse JSON from {}", path.display()))
    } else {
        let deserializer = serde_yaml::Deserializer::from_str(&content);
        serde_path_to_error::deserialize(deserializer)
            .with_context(|| format!("failed to parse YAML from {}", path.display()))
    }
}
