//! Init command - write fresh random weights

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    adapters::{TextWeightStore, text_weight_store::DEFAULT_WEIGHTS_DIR},
    cli::output::{format_weights, print_kv},
    ports::WeightStore,
    q_learning::{FEATURE_COUNT, WeightVector},
};

#[derive(Parser, Debug)]
#[command(about = "Write uniform random weights in [-1, 1)")]
pub struct InitArgs {
    /// Directory holding weights.txt and bestweights.data
    #[arg(long, default_value = DEFAULT_WEIGHTS_DIR)]
    pub weights_dir: PathBuf,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Also write the weights as the best weights
    #[arg(long, default_value_t = false)]
    pub best: bool,

    /// Overwrite an existing weight file
    #[arg(long, default_value_t = false)]
    pub force: bool,
}

pub fn execute(args: InitArgs) -> Result<()> {
    let store = TextWeightStore::in_dir(&args.weights_dir);
    if store.weights_path().exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            store.weights_path().display()
        );
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    let weights = WeightVector::random(FEATURE_COUNT, &mut rng);

    store
        .save(&weights)
        .with_context(|| format!("Failed to write {}", store.weights_path().display()))?;
    print_kv("Wrote", &store.weights_path().display().to_string());

    if args.best {
        store
            .save_best(&weights)
            .with_context(|| format!("Failed to write {}", store.best_path().display()))?;
        print_kv("Wrote", &store.best_path().display().to_string());
    }

    println!();
    print!("{}", format_weights(&weights));
    Ok(())
}
