use std::path::PathBuf;

use anyhow::Result;
use bonemap_core::model::{PathRemapRule, Skeleton};
use bonemap_core::resolver::mapper::{build_map, build_map_with_rules};
use clap::Parser;

use crate::harness::{load_rules, load_skeleton, report_mapping, OutputFormat};

/// Build a source-to-destination correspondence map
#[derive(Debug, Parser)]
pub struct MapCommand {
    /// Path to the source skeleton file (JSON or YAML)
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

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

impl MapCommand {
    pub fn execute(&self) -> Result<i32> {
        let output: OutputFormat = self.output.parse()?;

        let (source, destination, rules) = match self.load_inputs() {
            Ok(inputs) => inputs,
            Err(error) => {
                eprintln!("{error:#}");
                return Ok(2);
            }
        };

        let result = match &rules {
            Some(rules) => build_map_with_rules(&source, &destination, rules),
            None => build_map(&source, &destination),
        };

        report_mapping(&result, &destination, output)?;
        Ok(if result.fully_resolved() { 0 } else { 1 })
    }

    fn load_inputs(&self) -> Result<(Skeleton, Skeleton, Option<Vec<PathRemapRule>>)> {
        let source = load_skeleton(&self.source)?;
        let destination = load_skeleton(&self.destination)?;
        let rules = self.rules.as_deref().map(load_rules).transpose()?;
        Ok((source, destination, rules))
    }
}
