// Remap rule and skeleton validation
// Advisory checks for user configuration; resolution itself never calls
// these and stays total even on inputs they would reject

use anyhow::{bail, Result};
use regex::Regex;

use crate::model::{PathRemapRule, RemapMode, Skeleton};

/// Validation submodule identifier.
pub fn module_name() -> &'static str {
    "validation"
}

/// Check one rule. Disabled rules always pass.
pub fn validate_rule(rule: &PathRemapRule) -> Result<()> {
    if !rule.enabled {
        return Ok(());
    }
    if rule.source_pattern.is_empty() {
        bail!("source pattern cannot be empty");
    }
    if rule.mode == RemapMode::RegexReplace {
        // both directions compile their own pattern: forward matches the
        // source pattern, reverse matches the destination pattern
        if let Err(error) = Regex::new(&rule.source_pattern) {
            bail!("forward pattern '{}' is not a valid regex: {error}", rule.source_pattern);
        }
        if let Err(error) = Regex::new(&rule.destination_pattern) {
            bail!(
                "reverse pattern '{}' is not a valid regex: {error}",
                rule.destination_pattern
            );
        }
    }
    Ok(())
}

/// Check an ordered rule list, naming the offending rule by index.
pub fn validate_rules(rules: &[PathRemapRule]) -> Result<()> {
    for (index, rule) in rules.iter().enumerate() {
        if let Err(error) = validate_rule(rule) {
            bail!("rule {index}: {error}");
        }
    }
    Ok(())
}

/// Structural checks over an assembled skeleton: parent/child links agree
/// and every role points at a bone the arena actually holds.
pub fn validate_skeleton(skeleton: &Skeleton) -> Result<()> {
    for id in skeleton.preorder() {
        let Some(bone) = skeleton.bone(id) else {
            bail!("bone {id} is linked but missing from the arena");
        };
        for child in &bone.children {
            match skeleton.bone(*child) {
                None => bail!("child {child} of '{}' is missing from the arena", bone.name),
                Some(child_bone) if child_bone.parent != Some(id) => {
                    bail!(
                        "child '{}' of '{}' does not link back to its parent",
                        child_bone.name,
                        bone.name
                    );
                }
                Some(_) => {}
            }
        }
    }
    if let Some(roles) = skeleton.role_map() {
        for (role, id) in roles {
            if skeleton.bone(*id).is_none() {
                bail!("role {role:?} points at bone {id}, which is not in the arena");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoneKind;

    #[test]
    fn valid_rules_pass() {
        let rules = vec![
            PathRemapRule::new(RemapMode::PrefixReplace, "J_Bip_C_", ""),
            PathRemapRule::new(RemapMode::RegexReplace, r"^mixamorig:(.*)$", "$1"),
        ];
        assert!(validate_rules(&rules).is_ok());
    }

    #[test]
    fn empty_source_pattern_is_rejected() {
        let rules = vec![PathRemapRule::new(RemapMode::CharacterSubstitution, "", ".L")];
        let error = validate_rules(&rules).unwrap_err();
        assert!(error.to_string().contains("rule 0"));
    }

    #[test]
    fn invalid_regex_is_rejected_with_rule_index() {
        let rules = vec![
            PathRemapRule::new(RemapMode::CharacterSubstitution, "_L", ".L"),
            PathRemapRule::new(RemapMode::RegexReplace, "(unclosed", "x"),
        ];
        let error = validate_rules(&rules).unwrap_err();
        assert!(error.to_string().contains("rule 1"));
    }

    #[test]
    fn disabled_rules_are_not_checked() {
        let mut rule = PathRemapRule::new(RemapMode::RegexReplace, "(unclosed", "x");
        rule.enabled = false;
        assert!(validate_rules(&[rule]).is_ok());
    }

    #[test]
    fn reverse_regex_pattern_is_checked_too() {
        let rules = vec![PathRemapRule::new(RemapMode::RegexReplace, "valid", "(unclosed")];
        assert!(validate_rules(&rules).is_err());
    }

    #[test]
    fn well_formed_skeleton_passes() {
        let mut skeleton = Skeleton::new("Armature");
        let hips = skeleton
            .add_bone(skeleton.root(), "Hips", BoneKind::SkeletalBone)
            .unwrap();
        skeleton.add_bone(hips, "Spine", BoneKind::SkeletalBone).unwrap();
        assert!(validate_skeleton(&skeleton).is_ok());
    }
}
