//! `classify` command implementation.

use anyhow::{Context, Result};
use contracts::ClassificationResult;
use tracing::info;

use super::analyze::load_config;
use crate::cli::ClassifyArgs;
use crate::error::CliError;
use crate::pipeline::{ClassificationOutcome, TripPipeline};

/// Execute the `classify` command
pub fn run_classify(args: &ClassifyArgs) -> Result<()> {
    info!(samples = %args.samples.display(), "Classifying sample window");

    if !args.samples.exists() {
        return Err(CliError::input_not_found(args.samples.display().to_string()).into());
    }

    let config = load_config(args.config.as_deref())?;
    let window = config_loader::load_samples(&args.samples)
        .with_context(|| format!("Failed to load samples from {}", args.samples.display()))?;

    let outcome = TripPipeline::new(&config).classify(&window.samples, window.history);

    if args.json {
        let json = serde_json::to_string_pretty(&outcome)
            .context("Failed to serialize classification")?;
        println!("{}", json);
    } else {
        print_outcome(&outcome, window.samples.len());
    }

    Ok(())
}

fn print_result(prefix: &str, label: &str, result: &ClassificationResult) {
    let details = &result.details;
    println!(
        "   {} {}: {} ({:.2})  stationary {:.2} / walking {:.2} / vehicle {:.2}",
        prefix,
        label,
        result.movement_type,
        result.confidence,
        details.stationary_confidence,
        details.walking_confidence,
        details.vehicle_confidence
    );
}

fn print_outcome(outcome: &ClassificationOutcome, samples: usize) {
    let signature = &outcome.raw.details.frequency_signature;

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                   Movement Classification                    ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("📈 Signal ({} samples)", samples);
    match signature.peak_frequency {
        Some(peak) => println!("   ├─ Peak frequency: {:.2} Hz", peak),
        None => println!("   ├─ Peak frequency: n/a"),
    }
    println!("   ├─ Energy: {:.3} m/s²", signature.spectral_energy);
    println!(
        "   ├─ Dominant: {:?} Hz (centroid {:.2})",
        signature
            .dominant_frequencies
            .iter()
            .map(|f| format!("{f:.2}"))
            .collect::<Vec<_>>(),
        signature.spectral_centroid
    );
    let matches = &outcome.raw.details.pattern_matches;
    println!(
        "   └─ Pattern match: vehicle {:.2} / walking {:.2}",
        matches.vehicle_pattern_match, matches.walking_pattern_match
    );

    println!("\n🧭 Result");
    print_result("├─", "Raw", &outcome.raw);
    print_result("└─", "Smoothed", &outcome.smoothed);
    if outcome.overridden {
        println!("\n   History overrode the raw classification");
    }

    println!();
}
