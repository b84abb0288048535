//! `analyze` command implementation.

use anyhow::{Context, Result};
use contracts::{AnalysisConfig, CompletionStatus, TripReport};
use tracing::info;

use crate::cli::AnalyzeArgs;
use crate::error::CliError;
use crate::pipeline::{TripOutcome, TripPipeline};

/// Load the configuration named on the command line, or defaults
pub(crate) fn load_config(path: Option<&std::path::Path>) -> Result<AnalysisConfig> {
    let config = config_loader::ConfigLoader::load_or_default(path).map_err(|e| {
        let source = path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "defaults".to_string());
        CliError::config(source, e)
    })?;
    Ok(config)
}

/// Execute the `analyze` command
pub fn run_analyze(args: &AnalyzeArgs) -> Result<()> {
    info!(trace = %args.trace.display(), "Analyzing trip");

    if !args.trace.exists() {
        return Err(CliError::input_not_found(args.trace.display().to_string()).into());
    }

    let config = load_config(args.config.as_deref())?;
    let mut input = config_loader::load_trip(&args.trace)
        .with_context(|| format!("Failed to load trip from {}", args.trace.display()))?;
    input.ended |= args.ended;

    let outcome = TripPipeline::new(&config).process(input);

    if args.json {
        let json =
            serde_json::to_string_pretty(&outcome).context("Failed to serialize trip report")?;
        println!("{}", json);
    } else {
        print_outcome(&outcome, args.route);
    }

    Ok(())
}

fn status_label(status: CompletionStatus) -> &'static str {
    match status {
        CompletionStatus::InProgress => "in progress",
        CompletionStatus::Completed => "completed",
        CompletionStatus::AutoCompleted => "auto-completed",
    }
}

fn format_duration(ms: i64) -> String {
    let secs = ms / 1000;
    format!("{}h {:02}m {:02}s", secs / 3600, (secs % 3600) / 60, secs % 60)
}

fn print_outcome(outcome: &TripOutcome, route: bool) {
    let report: &TripReport = &outcome.report;

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                         Trip Report                          ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("🚗 Vehicle: {}", report.vehicle_id);
    println!("   └─ Status: {}", status_label(report.completion_status));

    println!("\n🛰️  Samples");
    println!("   ├─ Received: {}", report.raw_point_count);
    println!("   ├─ Retained: {}", report.retained_point_count());
    if report.rejections.is_empty() {
        println!("   └─ Rejected: 0");
    } else {
        println!("   └─ Rejected: {}", report.rejected_point_count());
        for (reason, count) in &report.rejections {
            println!("        • {}: {}", reason.as_str(), count);
        }
    }

    println!("\n📏 Movement");
    println!("   ├─ Distance: {:.3} km", report.distance_km);
    if report.skipped_segments > 0 {
        println!("   ├─ Skipped segments: {}", report.skipped_segments);
    }
    println!("   ├─ Duration: {}", format_duration(report.duration_ms));
    println!("   ├─ Moving: {}", format_duration(report.moving_duration_ms));
    println!("   ├─ Average speed: {:.1} km/h", report.average_speed_kmh);
    println!("   └─ Max speed: {:.1} km/h", report.max_speed_kmh);

    println!("\n🅿️  Stops ({})", report.stops.len());
    for (i, stop) in report.stops.iter().enumerate() {
        let prefix = if i == report.stops.len() - 1 { "└─" } else { "├─" };
        println!(
            "   {} {:.6}, {:.6}  {:.1} min  confidence {:.2}",
            prefix,
            stop.latitude,
            stop.longitude,
            stop.duration_minutes(),
            stop.confidence
        );
    }

    if let Some(classification) = &outcome.classification {
        println!("\n🧭 Movement Classification");
        println!(
            "   ├─ Raw: {} ({:.2})",
            classification.raw.movement_type, classification.raw.confidence
        );
        let marker = if classification.overridden {
            " (history override)"
        } else {
            ""
        };
        println!(
            "   └─ Smoothed: {} ({:.2}){}",
            classification.smoothed.movement_type, classification.smoothed.confidence, marker
        );
    }

    if route {
        let points = report.route_points.points();
        println!("\n🗺️  Route ({} points)", points.len());
        for point in points {
            println!(
                "   {}  {:.6}, {:.6}",
                point.timestamp.to_rfc3339(),
                point.latitude,
                point.longitude
            );
        }
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0h 00m 00s");
        assert_eq!(format_duration(3_723_000), "1h 02m 03s");
    }

    #[test]
    fn test_load_config_defaults() {
        assert_eq!(load_config(None).unwrap(), AnalysisConfig::default());
    }

    #[test]
    fn test_run_analyze_missing_trace() {
        let args = AnalyzeArgs {
            trace: "/nonexistent/trip.json".into(),
            config: None,
            ended: false,
            route: false,
            json: true,
        };
        let err = run_analyze(&args).unwrap_err();
        assert!(err.to_string().contains("Input not found"));
    }
}
