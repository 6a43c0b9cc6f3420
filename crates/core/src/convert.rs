use serde::{Deserialize, Serialize};

use crate::platform::Platform;

/// Request body for `POST /convert`
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ConversionRequest {
    pub source_content: String,
    pub source_platform: Platform,
    pub target_platform: Platform,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
}

/// Response body shared by `POST /convert` and `POST /upload-convert`
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ConversionResponse {
    pub converted_content: String,
    #[serde(default)]
    pub conversion_notes: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub incompatible_features: Vec<String>,
    #[serde(default)]
    pub confidence_score: f64,
}

/// Complete conversion result as rendered by the CLI
#[derive(Debug, Serialize, Clone)]
pub struct ConversionOutput {
    pub source_platform: Platform,
    pub target_platform: Platform,
    pub converted_content: String,
    pub conversion_notes: Vec<String>,
    pub warnings: Vec<String>,
    pub incompatible_features: Vec<String>,
    pub confidence_score: f64,
    pub confidence_percent: String,
    pub suggested_filename: String,
}

/// Reject empty skill content before any request is issued
pub fn validate_content(content: &str) -> Result<(), String> {
    if content.trim().is_empty() {
        return Err(
            "Skill content is empty. Paste it as an argument, use --input, or pipe it on stdin."
                .to_string(),
        );
    }
    Ok(())
}

/// Clamp a confidence score to [0.0, 1.0]
///
/// The service promises a score in range, but the value is rendered as a
/// bar width so an out-of-range or non-finite score must not panic.
pub fn clamp_confidence(score: f64) -> f64 {
    if !score.is_finite() {
        return 0.0;
    }
    score.clamp(0.0, 1.0)
}

/// Format a confidence score as a whole percentage, e.g. "85%"
pub fn confidence_percent(score: f64) -> String {
    format!("{:.0}%", clamp_confidence(score) * 100.0)
}

/// Render a confidence score as a fixed-width bar, e.g. "████████░░"
pub fn confidence_bar(score: f64, width: usize) -> String {
    let filled = (clamp_confidence(score) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Default filename for saving converted content
///
/// Claude skills are Markdown documents; everything else is plain text.
pub fn output_filename(target: Platform) -> String {
    format!("converted-skill-{}.{}", target, target.output_extension())
}

/// Extract the `detail` field from a JSON error body
///
/// The conversion service reports failures as `{"detail": "..."}`. Returns
/// `None` for non-JSON bodies or bodies without a string `detail`.
pub fn error_detail(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("detail")
                .and_then(|detail| detail.as_str())
                .map(|detail| detail.to_string())
        })
}

/// Transform a service response into the record rendered by the CLI
pub fn transform_conversion(
    response: ConversionResponse,
    source: Platform,
    target: Platform,
) -> ConversionOutput {
    let score = clamp_confidence(response.confidence_score);

    ConversionOutput {
        source_platform: source,
        target_platform: target,
        converted_content: response.converted_content,
        conversion_notes: response.conversion_notes,
        warnings: response.warnings,
        incompatible_features: response.incompatible_features,
        confidence_score: score,
        confidence_percent: confidence_percent(score),
        suggested_filename: output_filename(target),
    }
}
