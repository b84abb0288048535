//! Configuration validation
//!
//! Rules:
//! - field ranges declared on the contract structs (`validator` derive)
//! - smoothing history capacity can hold the smoothing floor
//! - walking/vehicle threshold stays above the UNKNOWN confidence

use std::borrow::Cow;

use contracts::{AnalysisConfig, ContractError};
use ::validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

/// Validate an `AnalysisConfig`.
///
/// Returns the first error encountered (field paths in sorted order), or Ok(()).
pub fn validate(config: &AnalysisConfig) -> Result<(), ContractError> {
    validate_field_ranges(config)?;
    validate_smoothing(config)?;
    validate_classifier(config)?;
    Ok(())
}

/// Run the derived field checks and report the first violation
fn validate_field_ranges(config: &AnalysisConfig) -> Result<(), ContractError> {
    let Err(errors) = config.validate() else {
        return Ok(());
    };

    let mut issues = Vec::new();
    flatten("", &errors, &mut issues);
    issues.sort();

    match issues.into_iter().next() {
        Some((field, message)) => Err(ContractError::config_validation(field, message)),
        None => Err(ContractError::config_validation("<root>", errors.to_string())),
    }
}

/// Collect `(dotted.path, message)` pairs from nested validation errors
fn flatten(prefix: &str, errors: &ValidationErrors, out: &mut Vec<(String, String)>) {
    for (field, kind) in errors.errors() {
        let path = join(prefix, field);
        match kind {
            ValidationErrorsKind::Field(list) => {
                for error in list {
                    let message = error
                        .message
                        .clone()
                        .unwrap_or_else(|| Cow::Owned(describe(error)));
                    out.push((path.clone(), message.into_owned()));
                }
            }
            ValidationErrorsKind::Struct(inner) => flatten(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (idx, inner) in items {
                    flatten(&format!("{path}[{idx}]"), inner, out);
                }
            }
        }
    }
}

fn join(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{prefix}.{field}")
    }
}

/// Human-readable text for a message-less error, e.g. "range violation (value = -1)"
fn describe(error: &ValidationError) -> String {
    let mut params: Vec<String> = error
        .params
        .iter()
        .map(|(k, v)| format!("{k} = {v}"))
        .collect();
    params.sort();
    if params.is_empty() {
        format!("{} violation", error.code)
    } else {
        format!("{} violation ({})", error.code, params.join(", "))
    }
}

/// History must be able to reach the smoothing floor
fn validate_smoothing(config: &AnalysisConfig) -> Result<(), ContractError> {
    let smoothing = &config.smoothing;
    if smoothing.history_capacity < smoothing.min_history {
        return Err(ContractError::config_validation(
            "smoothing.history_capacity / smoothing.min_history",
            format!(
                "history_capacity ({}) must be >= min_history ({})",
                smoothing.history_capacity, smoothing.min_history
            ),
        ));
    }
    Ok(())
}

/// A matched pattern must outrank the UNKNOWN fallback
fn validate_classifier(config: &AnalysisConfig) -> Result<(), ContractError> {
    let classifier = &config.classifier;
    if classifier.unknown_confidence > classifier.pattern_match_threshold {
        return Err(ContractError::config_validation(
            "classifier.unknown_confidence",
            format!(
                "unknown_confidence ({}) must be <= pattern_match_threshold ({})",
                classifier.unknown_confidence, classifier.pattern_match_threshold
            ),
        ));
    }
    Ok(())
}
