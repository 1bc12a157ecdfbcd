use std::path::PathBuf;

use anyhow::Result;
use bonemap_core::model::{PathRemapRule, SerializedBoneReference, Skeleton};
use bonemap_core::resolver::serialized::resolve_references;
use clap::Parser;

use crate::harness::{load_references, load_rules, load_skeleton, report_serialized, OutputFormat};

/// Re-resolve captured bone references against a live destination rig
#[derive(Debug, Parser)]
pub struct RelinkCommand {
    /// Path to the captured reference list (YAML)
    #[arg(value_name = "REFS")]
    pub references: PathBuf,

    /// Path to the destination skeleton file (JSON or YAML)
    #[arg(value_name = "DEST")]
    pub destination: PathBuf,

    /// Ordered remap rule list (YAML)
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Output format (human, json)
    #[arg(long, value_name = "FORMAT", default_value = "human")]
    pub output: String,
}

impl RelinkCommand {
    pub fn execute(&self) -> Result<i32> {
        let output: OutputFormat = self.output.parse()?;

        let (references, destination, rules) = match self.load_inputs() {
            Ok(inputs) => inputs,
            Err(error) => {
                eprintln!("{error:#}");
                return Ok(2);
            }
        };

        let result = resolve_references(&references, &destination, &rules);

        report_serialized(&result, &destination, output)?;
        Ok(if result.fully_resolved() { 0 } else { 1 })
    }

    fn load_inputs(
        &self,
    ) -> Result<(Vec<SerializedBoneReference>, Skeleton, Vec<PathRemapRule>)> {
        let references = load_references(&self.references)?;
        let destination = load_skeleton(&self.destination)?;
        let rules = self
            .rules
            .as_deref()
            .map(load_rules)
            .transpose()?
            .unwrap_or_default();
        Ok((references, destination, rules))
    }
}
