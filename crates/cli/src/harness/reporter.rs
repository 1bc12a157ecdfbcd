use std::str::FromStr;

use anyhow::{bail, Result};
use bonemap_core::model::Skeleton;
use bonemap_core::resolver::diagnostics::{HelperRequest, MappingResult, MatchStrategy};
use bonemap_core::resolver::serialized::SerializedMappingResult;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => bail!("unknown output format '{other}' (expected human or json)"),
        }
    }
}

/// Report a whole-skeleton mapping build.
pub fn report_mapping(
    result: &MappingResult,
    destination: &Skeleton,
    format: OutputFormat,
) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    println!("Correspondences: {}", result.map.len());
    for entry in &result.diagnostic.matched {
        println!(
            "  ✓ {} -> {} [{}]",
            entry.source_name,
            destination_name(destination, entry.destination, &result.diagnostic.helper_requests),
            strategy_label(entry.strategy)
        );
    }

    if !result.diagnostic.helper_requests.is_empty() {
        println!();
        println!(
            "Nodes to create ({}):",
            result.diagnostic.helper_requests.len()
        );
        for request in &result.diagnostic.helper_requests {
            println!(
                "  + {} under {}",
                request.name,
                destination_name(destination, request.parent, &result.diagnostic.helper_requests)
            );
        }
    }

    if !result.diagnostic.unresolved.is_empty() {
        println!();
        println!("Unresolved ({}):", result.diagnostic.unresolved.len());
        for entry in &result.diagnostic.unresolved {
            println!("  ✗ {}: {}", entry.source_name, entry.reason);
        }
    }

    Ok(())
}

/// Report a degraded-mode batch resolution.
pub fn report_serialized(
    result: &SerializedMappingResult,
    destination: &Skeleton,
    format: OutputFormat,
) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    println!("Resolved references: {}", result.resolved.len());
    for entry in &result.resolved {
        println!(
            "  ✓ {} -> {} [{}]",
            entry.path,
            destination_name(destination, entry.destination, &result.helper_requests),
            strategy_label(entry.strategy)
        );
    }

    if !result.helper_requests.is_empty() {
        println!();
        println!("Nodes to create ({}):", result.helper_requests.len());
        for request in &result.helper_requests {
            println!(
                "  + {} under {}",
                request.name,
                destination_name(destination, request.parent, &result.helper_requests)
            );
        }
    }

    if !result.unresolved.is_empty() {
        println!();
        println!("Unresolved ({}):", result.unresolved.len());
        for entry in &result.unresolved {
            println!("  ✗ {}: {}", entry.path, entry.reason);
        }
    }

    Ok(())
}

/// Bone name on the live destination side, or the pending name of a node
/// that is yet to be created.
fn destination_name(destination: &Skeleton, id: Uuid, requests: &[HelperRequest]) -> String {
    if let Some(bone) = destination.bone(id) {
        return bone.name.clone();
    }
    requests
        .iter()
        .find(|request| request.node_id == id)
        .map(|request| format!("{} (new)", request.name))
        .unwrap_or_else(|| id.to_string())
}

fn strategy_label(strategy: MatchStrategy) -> &'static str {
    match strategy {
        MatchStrategy::CanonicalRole => "role",
        MatchStrategy::AncestorRolePath => "ancestor role",
        MatchStrategy::RelativePath => "path",
        MatchStrategy::ForwardRemappedPath => "remapped path",
        MatchStrategy::ForwardRemappedLeaf => "remapped name",
        MatchStrategy::ReverseRemappedPath => "reverse remapped path",
        MatchStrategy::ReverseRemappedLeaf => "reverse remapped name",
        MatchStrategy::LeafName => "name",
        MatchStrategy::ExistingChild => "existing child",
        MatchStrategy::SynthesizedHelper => "synthesized",
    }
}
