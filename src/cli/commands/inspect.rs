//! Inspect command - print a stored weight file

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;

use crate::{
    adapters::text_weight_store::read_weights,
    cli::output::{format_weights, print_section},
    q_learning::FEATURE_COUNT,
};

#[derive(Parser, Debug)]
#[command(about = "Print stored weights with their feature names")]
pub struct InspectArgs {
    /// Weight file (one value per line)
    #[arg(default_value = "agent_weights/weights.txt")]
    pub path: PathBuf,

    /// Emit JSON instead of a table
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let Some(weights) = read_weights(&args.path)
        .with_context(|| format!("Failed to read weights from {}", args.path.display()))?
    else {
        bail!("No weight file at {}", args.path.display());
    };

    if weights.len() != FEATURE_COUNT {
        bail!(
            "{} holds {} weights, expected {}",
            args.path.display(),
            weights.len(),
            FEATURE_COUNT
        );
    }

    if args.json {
        let named: serde_json::Map<String, serde_json::Value> = weights
            .named()
            .map(|(feature, w)| (feature.name().to_string(), w.into()))
            .collect();
        println!("{}", serde_json::to_string_pretty(&named)?);
    } else {
        print_section(&format!("Weights: {}", args.path.display()));
        print!("{}", format_weights(&weights));
    }
    Ok(())
}
