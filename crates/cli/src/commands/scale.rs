use std::path::PathBuf;

use anyhow::Result;
use bonemap_core::resolver::scale::compute_scale_factor;
use clap::Parser;

use crate::harness::load_skeleton;

/// Compute the size ratio between two rigs
#[derive(Debug, Parser)]
pub struct ScaleCommand {
    /// Path to the source skeleton file (JSON or YAML)
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Path to the destination skeleton file (JSON or YAML)
    #[arg(value_name = "DEST")]
    pub destination: PathBuf,
}

impl ScaleCommand {
    pub fn execute(&self) -> Result<i32> {
        let (source, destination) = match (
            load_skeleton(&self.source),
            load_skeleton(&self.destination),
        ) {
            (Ok(source), Ok(destination)) => (source, destination),
            (Err(error), _) | (_, Err(error)) => {
                eprintln!("{error:#}");
                return Ok(2);
            }
        };

        let factor = compute_scale_factor(&source, &destination);
        println!("{factor}");
        Ok(0)
    }
}
