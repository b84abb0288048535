//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::AnalysisConfig;
use motion_classifier::{PatternBand, VEHICLE_PATTERNS, WALKING_PATTERNS};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;
use crate::error::CliError;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo<'a> {
    source: String,
    config: &'a AnalysisConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    patterns: Option<PatternInfo>,
}

#[derive(Serialize)]
struct PatternInfo {
    vehicle: Vec<BandInfo>,
    walking: Vec<BandInfo>,
}

#[derive(Serialize)]
struct BandInfo {
    name: &'static str,
    frequency_hz: [f64; 2],
    energy_ms2: [f64; 2],
    weight: f64,
}

impl From<&PatternBand> for BandInfo {
    fn from(band: &PatternBand) -> Self {
        Self {
            name: band.name,
            frequency_hz: [band.min_freq, band.max_freq],
            energy_ms2: [band.min_energy, band.max_energy],
            weight: band.weight,
        }
    }
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    let source = match &args.config {
        Some(path) => path.display().to_string(),
        None => "built-in defaults".to_string(),
    };
    info!(source = %source, "Loading configuration info");

    if let Some(path) = &args.config {
        if !path.exists() {
            return Err(CliError::input_not_found(path.display().to_string()).into());
        }
    }

    let config = config_loader::ConfigLoader::load_or_default(args.config.as_deref())
        .map_err(|e| CliError::config(&source, e))?;

    if args.json {
        let info = ConfigInfo {
            source,
            config: &config,
            patterns: args.patterns.then(|| PatternInfo {
                vehicle: VEHICLE_PATTERNS.iter().map(BandInfo::from).collect(),
                walking: WALKING_PATTERNS.iter().map(BandInfo::from).collect(),
            }),
        };
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&source, &config, args.patterns);
    }

    Ok(())
}

fn print_config_info(source: &str, config: &AnalysisConfig, patterns: bool) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                Trip Telemetry Configuration                  ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("📄 Source: {} ({:?})", source, config.version);

    let filter = &config.filter;
    println!("\n🛰️  Location Filter");
    println!("   ├─ Max speed: {} km/h", filter.max_speed_kmh);
    println!("   ├─ Max acceleration: {} m/s²", filter.max_acceleration_ms2);
    println!("   └─ Accuracy cut-off: {} m", filter.min_accuracy_meters);

    println!("\n📏 Distance");
    match config.distance.max_segment_km {
        Some(cap) => println!("   └─ Segment cap: {} km", cap),
        None => println!("   └─ Segment cap: none"),
    }

    let stops = &config.stops;
    println!("\n🅿️  Stop Detection");
    println!(
        "   ├─ Min duration: {:.1} min",
        stops.min_duration_ms as f64 / 60_000.0
    );
    println!("   ├─ Max radius: {} m", stops.max_radius_meters);
    println!("   └─ Min confidence: {}", stops.min_confidence);

    let classifier = &config.classifier;
    println!("\n🧭 Classifier");
    println!(
        "   ├─ Stationary magnitude threshold: {} m/s²",
        classifier.stationary_magnitude_threshold
    );
    println!(
        "   ├─ Stationary cut-off: {}",
        classifier.stationary_confidence_cutoff
    );
    println!(
        "   ├─ Pattern match threshold: {}",
        classifier.pattern_match_threshold
    );
    println!("   └─ Unknown confidence: {}", classifier.unknown_confidence);

    let smoothing = &config.smoothing;
    println!("\n🔁 Smoothing");
    println!(
        "   ├─ History: {} to {} entries",
        smoothing.min_history, smoothing.history_capacity
    );
    println!("   ├─ Override share: > {}", smoothing.override_share);
    println!("   ├─ Max confidence: {}", smoothing.max_confidence);
    println!("   └─ Dampening: x{}", smoothing.dampening_factor);

    let completion = &config.completion;
    println!("\n🏁 Auto-completion");
    println!("   ├─ Return radius: {} m", completion.return_radius_meters);
    println!("   ├─ Min distance: {} km", completion.min_trip_distance_km);
    println!(
        "   └─ Min classification confidence: {}",
        completion.min_classification_confidence
    );

    if patterns {
        print_bands("🚗 Vehicle Bands", &VEHICLE_PATTERNS);
        print_bands("🚶 Walking Bands", &WALKING_PATTERNS);
    }

    println!();
}

fn print_bands(title: &str, bands: &[PatternBand]) {
    println!("\n{} ({})", title, bands.len());
    for (i, band) in bands.iter().enumerate() {
        let prefix = if i == bands.len() - 1 { "└─" } else { "├─" };
        println!(
            "   {} {:<18} {:>5.1}-{:<5.1} Hz  energy {:.2}-{:.2}  weight {:.2}",
            prefix,
            band.name,
            band.min_freq,
            band.max_freq,
            band.min_energy,
            band.max_energy,
            band.weight
        );
    }
}
