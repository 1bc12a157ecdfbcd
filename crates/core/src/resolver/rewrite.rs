// Path rewrite engine - ordered bidirectional rename rules
// Every enabled rule is applied to each `/`-delimited segment in list
// order, feeding one rule's output into the next

use regex::Regex;

use crate::model::{PathRemapRule, RemapMode};

/// Which pattern role each rule plays during one application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteDirection {
    Forward,
    Reverse,
}

/// Apply the rule list to every segment of `path`.
pub fn apply_forward(path: &str, rules: &[PathRemapRule]) -> String {
    apply(path, rules, RewriteDirection::Forward)
}

/// Same as [`apply_forward`] with every rule's pattern roles swapped.
pub fn apply_reverse(path: &str, rules: &[PathRemapRule]) -> String {
    apply(path, rules, RewriteDirection::Reverse)
}

/// Rewrite a `/`-delimited path. The empty path and the empty rule list
/// are both identities.
pub fn apply(path: &str, rules: &[PathRemapRule], direction: RewriteDirection) -> String {
    if path.is_empty() || rules.is_empty() {
        return path.to_string();
    }
    let compiled = compile(rules, direction);
    path.split('/')
        .map(|segment| rewrite_segment(segment, &compiled))
        .collect::<Vec<_>>()
        .join("/")
}

struct CompiledRule<'a> {
    mode: RemapMode,
    pattern: &'a str,
    replacement: &'a str,
    // RegexReplace only; None when the pattern does not compile, which
    // leaves the rule inert (validation::validate_rules surfaces it)
    regex: Option<Regex>,
}

fn compile<'a>(rules: &'a [PathRemapRule], direction: RewriteDirection) -> Vec<CompiledRule<'a>> {
    rules
        .iter()
        .filter(|rule| rule.enabled)
        .map(|rule| {
            let (pattern, replacement) = match direction {
                RewriteDirection::Forward => {
                    (rule.source_pattern.as_str(), rule.destination_pattern.as_str())
                }
                RewriteDirection::Reverse => {
                    (rule.destination_pattern.as_str(), rule.source_pattern.as_str())
                }
            };
            let regex = match rule.mode {
                RemapMode::RegexReplace => Regex::new(pattern).ok(),
                _ => None,
            };
            CompiledRule {
                mode: rule.mode,
                pattern,
                replacement,
                regex,
            }
        })
        .collect()
}

fn rewrite_segment(segment: &str, rules: &[CompiledRule<'_>]) -> String {
    let mut current = segment.to_string();
    for rule in rules {
        current = match rule.mode {
            RemapMode::PrefixReplace => match current.strip_prefix(rule.pattern) {
                Some(rest) => format!("{}{}", rule.replacement, rest),
                None => current,
            },
            // an empty pattern would insert the replacement between every
            // character; treat it as inert instead
            RemapMode::CharacterSubstitution if rule.pattern.is_empty() => current,
            RemapMode::CharacterSubstitution => current.replace(rule.pattern, rule.replacement),
            RemapMode::RegexReplace => match &rule.regex {
                Some(regex) => regex.replace(&current, rule.replacement).into_owned(),
                None => current,
            },
        };
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_rule_list_is_identity() {
        let path = "Hips/Spine/LeftUpperArm";
        assert_eq!(apply_forward(path, &[]), path);
        assert_eq!(apply_reverse(path, &[]), path);
    }

    #[test]
    fn empty_path_is_returned_unchanged() {
        let rules = vec![PathRemapRule::new(
            RemapMode::CharacterSubstitution,
            "_L",
            ".L",
        )];
        assert_eq!(apply_forward("", &rules), "");
    }

    #[test]
    fn prefix_replace_strips_and_prepends() {
        let rules = vec![PathRemapRule::new(RemapMode::PrefixReplace, "J_Bip_C_", "")];
        assert_eq!(apply_forward("J_Bip_C_Hips", &rules), "Hips");
        assert_eq!(apply_forward("Spine", &rules), "Spine");
    }

    #[test]
    fn prefix_replace_reverse_restores_prefix() {
        let rules = vec![PathRemapRule::new(RemapMode::PrefixReplace, "J_Bip_C_", "")];
        // reverse of strip-prefix is add-prefix: the empty destination
        // pattern matches every segment
        assert_eq!(apply_reverse("Hips", &rules), "J_Bip_C_Hips");
    }

    #[test]
    fn character_substitution_replaces_all_occurrences() {
        let rules = vec![PathRemapRule::new(
            RemapMode::CharacterSubstitution,
            "_L",
            ".L",
        )];
        assert_eq!(apply_forward("Arm_L/Hand_L", &rules), "Arm.L/Hand.L");
        assert_eq!(apply_forward("Arm_L_Twist_L", &rules), "Arm.L_Twist.L");
    }

    #[test]
    fn regex_replace_applies_once_per_segment() {
        let rules = vec![PathRemapRule::new(
            RemapMode::RegexReplace,
            r"^mixamorig:(.*)$",
            "$1",
        )];
        assert_eq!(
            apply_forward("mixamorig:Hips/mixamorig:Spine", &rules),
            "Hips/Spine"
        );
    }

    #[test]
    fn invalid_regex_leaves_segment_untouched() {
        let rules = vec![PathRemapRule::new(RemapMode::RegexReplace, "(unclosed", "x")];
        assert_eq!(apply_forward("Hips/Spine", &rules), "Hips/Spine");
    }

    #[test]
    fn disabled_rules_are_skipped_in_both_directions() {
        let mut rule = PathRemapRule::new(RemapMode::CharacterSubstitution, "_L", ".L");
        rule.enabled = false;
        let rules = vec![rule];
        assert_eq!(apply_forward("Arm_L", &rules), "Arm_L");
        assert_eq!(apply_reverse("Arm.L", &rules), "Arm.L");
    }

    #[test]
    fn rules_compose_left_to_right_per_segment() {
        let rules = vec![
            PathRemapRule::new(RemapMode::PrefixReplace, "J_Bip_C_", ""),
            PathRemapRule::new(RemapMode::CharacterSubstitution, "_L", ".L"),
        ];
        // the second rule sees the first rule's output, and both rules run
        // on every segment
        assert_eq!(
            apply_forward("J_Bip_C_Hips/J_Bip_L_UpperArm", &rules),
            "Hips/J_Bip.L_UpperArm"
        );
    }

    #[test]
    fn reverse_swaps_pattern_roles() {
        let rules = vec![PathRemapRule::new(
            RemapMode::CharacterSubstitution,
            "_L",
            ".L",
        )];
        assert_eq!(apply_reverse("Arm.L", &rules), "Arm_L");
    }
}
