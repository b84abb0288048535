//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::AnalysisConfig;
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    max_speed_kmh: f64,
    max_segment_km: Option<f64>,
    stop_min_duration_min: f64,
    stop_radius_m: f64,
    min_history: usize,
    history_capacity: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => {
            let warnings = collect_warnings(&config);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(summarize(&config)),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

fn summarize(config: &AnalysisConfig) -> ConfigSummary {
    ConfigSummary {
        version: format!("{:?}", config.version),
        max_speed_kmh: config.filter.max_speed_kmh,
        max_segment_km: config.distance.max_segment_km,
        stop_min_duration_min: config.stops.min_duration_ms as f64 / 60_000.0,
        stop_radius_m: config.stops.max_radius_meters,
        min_history: config.smoothing.min_history,
        history_capacity: config.smoothing.history_capacity,
    }
}

/// Collect configuration warnings (valid but probably unintended settings)
fn collect_warnings(config: &AnalysisConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if let Some(cap) = config.distance.max_segment_km {
        // Segments the filter lets through at full speed for one minute
        let filtered_minute_km = config.filter.max_speed_kmh / 60.0;
        if cap < filtered_minute_km {
            warnings.push(format!(
                "distance.max_segment_km ({cap}) is below one minute at filter.max_speed_kmh; \
                 sparse traces will lose distance"
            ));
        }
    }

    if config.completion.return_radius_meters < config.stops.max_radius_meters {
        warnings.push(
            "completion.return_radius_meters is smaller than stops.max_radius_meters - \
             a vehicle parked at its start may never auto-complete"
                .to_string(),
        );
    }

    if config.smoothing.override_share < 0.5 {
        warnings.push(
            "smoothing.override_share below 0.5 lets a minority of history override the current \
             classification"
                .to_string(),
        );
    }

    if config.stops.min_confidence == 0.0 {
        warnings.push("stops.min_confidence is 0 - every dwell becomes a stop".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Max speed: {} km/h", summary.max_speed_kmh);
            match summary.max_segment_km {
                Some(cap) => println!("  Segment cap: {} km", cap),
                None => println!("  Segment cap: none"),
            }
            println!(
                "  Stops: >= {:.1} min within {} m",
                summary.stop_min_duration_min, summary.stop_radius_m
            );
            println!(
                "  Smoothing: {} to {} entries",
                summary.min_history, summary.history_capacity
            );
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
