//! Combo Ensemble CLI
//!
//! Combines a scored candidate pool into one weighted combo program.

use anyhow::{Context, Result};
use clap::Parser;
use combo_core::{OutputFormat, RenderOptions};
use combo_ensemble::{
    BehaviorTable, CandidatePool, Ensemble, EnsembleManifest, EnsembleParams, ParamOverrides,
};
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "combo-ensemble")]
#[command(author = "Combo Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Combine scored combo trees into a boosted ensemble", long_about = None)]
struct Args {
    /// Input JSON candidate pool
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory for the ensemble, manifest and hash
    #[arg(short, long, default_value = "ensemble")]
    output: PathBuf,

    /// TOML parameter file; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Use row-selecting experts instead of AdaBoost
    #[arg(long)]
    experts: bool,

    /// Admit only perfect experts
    #[arg(long)]
    exact_experts: Option<bool>,

    /// Reweighting multiplier for exact experts
    #[arg(long)]
    expalpha: Option<f64>,

    /// Maximum number of candidates to promote
    #[arg(long)]
    num_to_promote: Option<usize>,

    /// Scale for the inexact-expert voting threshold
    #[arg(long)]
    bias_scale: Option<f64>,

    /// Enable the experimental inexact-expert mode
    #[arg(long)]
    experimental_inexact_experts: bool,

    /// Disable boosting; no candidate is promoted
    #[arg(long)]
    no_boosting: bool,

    /// Output syntax: combo, python or scheme
    #[arg(short, long, default_value = "combo")]
    format: OutputFormat,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// File or default parameters with the flags applied on top, validated.
    fn params(&self) -> Result<EnsembleParams> {
        let base = match &self.config {
            Some(path) => EnsembleParams::from_toml_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => EnsembleParams::default(),
        };

        let overrides = ParamOverrides {
            experts: self.experts,
            exact_experts: self.exact_experts,
            expalpha: self.expalpha,
            num_to_promote: self.num_to_promote,
            bias_scale: self.bias_scale,
            experimental_inexact_experts: self.experimental_inexact_experts,
            no_boosting: self.no_boosting,
        };
        overrides
            .apply(base)
            .context("Invalid ensemble parameters")
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("Combo Ensemble v{}", env!("CARGO_PKG_VERSION"));

    let params = args.params()?;

    // Load pool
    info!("Loading candidate pool from: {}", args.input.display());
    let pool = CandidatePool::from_json_file(&args.input).context("Failed to load pool")?;
    let mut cands = pool.candidates().context("Invalid candidate pool")?;
    info!("Loaded {} candidates over {} rows", cands.len(), pool.rows);

    info!("Ensemble configuration:");
    info!("  Boosting: {}", params.do_boosting);
    info!("  Experts: {}", params.experts);
    info!("  Format: {}", args.format);

    let scorer = BehaviorTable::new(pool.rows).context("Failed to build scorer")?;
    let mut ensemble = Ensemble::new(scorer, params).context("Failed to create ensemble")?;
    ensemble
        .add_candidates(&mut cands)
        .context("Failed to build ensemble")?;

    info!("Ensemble has {} members", ensemble.len());
    info!("  Flat score: {}", ensemble.flat_score()?);

    std::fs::create_dir_all(&args.output).context("Failed to create output directory")?;

    let opts = RenderOptions::with_labels(&pool.labels);
    let manifest = EnsembleManifest::from_ensemble(&ensemble, args.format, &opts)
        .context("Failed to render ensemble")?;

    match &manifest.composite {
        Some(text) => {
            let program_path = args
                .output
                .join(format!("ensemble.{}", args.format.extension()));
            info!("Saving ensemble to: {}", program_path.display());
            std::fs::write(&program_path, text).context("Failed to write ensemble file")?;
        }
        None => warn!("Ensemble is empty, no program written"),
    }

    let manifest_path = args.output.join("ensemble.json");
    info!("Saving manifest to: {}", manifest_path.display());
    let canonical_json = manifest
        .to_canonical_json()
        .context("Failed to serialize manifest")?;
    std::fs::write(&manifest_path, &canonical_json).context("Failed to write manifest file")?;

    let hash_hex = hex::encode(blake3::hash(canonical_json.as_bytes()).as_bytes());
    let hash_path = args.output.join("ensemble.hash");
    info!("Saving hash to: {}", hash_path.display());
    std::fs::write(&hash_path, &hash_hex).context("Failed to write hash file")?;

    info!("Ensemble completed successfully");
    info!("  Hash: {} ({})", hash_path.display(), hash_hex);

    Ok(())
}
