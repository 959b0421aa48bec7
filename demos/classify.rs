//! Brain MRI Classification Demo
//!
//! This demo runs the full inference pipeline on one or more image files:
//! decode and normalize, lazy one-time model load, forward pass, and ranked
//! report printing.
//!
//! Usage:
//! ```
//! cargo run --example classify -- --model-path <path_to_onnx_model> <image_paths>...
//! ```
//!
//! A JSON configuration file can be supplied instead of the model path:
//! ```
//! cargo run --example classify -- --config classifier.json <image_paths>...
//! ```

use clap::Parser;
use neuroscan::core::init_tracing;
use neuroscan::prelude::*;
use tracing::{error, info};

/// Command-line arguments for the classification demo
#[derive(Parser)]
#[command(name = "classify")]
#[command(about = "Brain MRI Classification Demo - ranks tumor classes for MRI images")]
struct Args {
    /// Path to the ONNX model file
    #[arg(short, long, conflicts_with = "config")]
    model_path: Option<String>,

    /// Path to a JSON pipeline configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Normalization policy: "mean-centered-bgr" or "unit-scaled-rgb"
    #[arg(short, long)]
    policy: Option<String>,

    /// Image file paths to classify
    #[arg(required = true)]
    images: Vec<String>,
}

fn build_config(args: &Args) -> Result<ClassifierConfig, Box<dyn std::error::Error>> {
    let mut config = match (&args.config, &args.model_path) {
        (Some(path), _) => ClassifierConfig::from_json_file(path)?,
        (None, Some(model_path)) => ClassifierConfig::new(model_path),
        (None, None) => return Err("either --model-path or --config is required".into()),
    };

    if let Some(policy) = &args.policy {
        config.policy = serde_json::from_value(serde_json::Value::String(policy.clone()))?;
    }

    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args = Args::parse();
    let config = build_config(&args)?;
    let classifier = Classifier::from_config(config)?;

    for path in &args.images {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("failed to read {}: {}", path, e);
                continue;
            }
        };

        match classifier.classify(&bytes) {
            Ok(report) => {
                info!("{}: {} ({:.1}%)", path, report.label, report.confidence);
                for record in &report.records {
                    info!(
                        "  {:<12} {:>6.2}%{}",
                        record.label,
                        record.probability,
                        if record.is_top { "  <- top" } else { "" }
                    );
                }
            }
            Err(e) => {
                error!("classification failed for {}: {}", path, e);
            }
        }
    }

    Ok(())
}
