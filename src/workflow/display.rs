//! Display models derived from service analysis results.
//!
//! Scores are kept exactly as derived (confidence × 100, with the detail
//! view's offset where it applies). Only [`gauge_percent`] clamps, because
//! a gauge cannot draw outside 0..=100.

use crate::api::AnalysisResult;
use chrono::{DateTime, Utc};

/// Shown in place of values the service does not provide yet.
pub const PLACEHOLDER: &str = "N/A";

/// Verification text for an analysis loaded with its article.
pub const STORED_VERIFICATION: &str = "Stored Analysis";

/// Verification text for an analysis requested from the detail view.
pub const CREATED_VERIFICATION: &str = "Auto-generated";

/// Offset subtracted from the stored analysis' bias score in the detail view.
const STORED_BIAS_OFFSET: f64 = 10.0;

/// Bias score above which an analysis result is flagged.
const HIGH_BIAS_THRESHOLD: f64 = 60.0;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisDisplay {
    /// The service's raw bias label.
    pub bias_direction: String,
    /// Percentage; may fall outside 0..=100.
    pub bias_score: f64,
    /// Percentage, or `None` when the service offers no credibility figure.
    pub credibility_score: Option<f64>,
    pub summary: String,
    pub key_points: Vec<String>,
    pub source_verification: String,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisDisplay {
    /// Result of an ad hoc text analysis.
    ///
    /// The bias score is the rounded confidence percentage. Credibility and
    /// source verification are not provided by the service and carry
    /// placeholders.
    pub fn from_text_result(result: &AnalysisResult) -> Self {
        Self {
            bias_direction: result.bias.clone(),
            bias_score: (result.bias_confidence * 100.0).round(),
            credibility_score: None,
            summary: result.summary.clone(),
            key_points: result.key_points.clone(),
            source_verification: PLACEHOLDER.to_string(),
            analyzed_at: result.analyzed_at,
        }
    }

    /// The latest stored analysis shown when an article detail loads.
    pub fn from_stored(result: &AnalysisResult) -> Self {
        let percent = result.bias_confidence * 100.0;
        Self {
            bias_direction: result.bias.clone(),
            bias_score: percent - STORED_BIAS_OFFSET,
            credibility_score: Some(percent),
            summary: result.summary.clone(),
            key_points: result.key_points.clone(),
            source_verification: STORED_VERIFICATION.to_string(),
            analyzed_at: result.analyzed_at,
        }
    }

    /// An analysis just created from the detail view. No offset here.
    pub fn from_created(result: &AnalysisResult) -> Self {
        let percent = result.bias_confidence * 100.0;
        Self {
            bias_direction: result.bias.clone(),
            bias_score: percent,
            credibility_score: Some(percent),
            summary: result.summary.clone(),
            key_points: result.key_points.clone(),
            source_verification: CREATED_VERIFICATION.to_string(),
            analyzed_at: result.analyzed_at,
        }
    }

    pub fn verdict(&self) -> Verdict {
        Verdict::from_label(Some(&self.bias_direction))
    }

    pub fn bias_level(&self) -> BiasLevel {
        BiasLevel::from_score(self.bias_score)
    }

    pub fn is_high_bias(&self) -> bool {
        self.bias_score > HIGH_BIAS_THRESHOLD
    }

    /// Credibility as text, or the placeholder.
    pub fn credibility_label(&self) -> String {
        self.credibility_score
            .map(|score| format!("{}/100", format_score(score)))
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    }

    pub fn bias_label(&self) -> String {
        format!("{}/100", format_score(self.bias_score))
    }
}

/// Whole numbers print without decimals, everything else with one.
pub fn format_score(score: f64) -> String {
    if (score - score.round()).abs() < 1e-9 {
        format!("{:.0}", score)
    } else {
        format!("{:.1}", score)
    }
}

/// Percentage for a gauge widget, clamped to 0..=100.
pub fn gauge_percent(score: f64) -> u16 {
    if score.is_nan() {
        return 0;
    }
    score.round().clamp(0.0, 100.0) as u16
}

/// Factuality verdict from the service's label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Factual,
    Misleading,
    False,
    Unknown,
}

impl Verdict {
    /// Case-insensitive mapping; unrecognised or missing labels are `Unknown`.
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(str::to_ascii_lowercase).as_deref() {
            Some("true") => Verdict::Factual,
            Some("misleading") => Verdict::Misleading,
            Some("false") => Verdict::False,
            _ => Verdict::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Verdict::Factual => "Factual",
            Verdict::Misleading => "Misleading",
            Verdict::False => "False Information",
            Verdict::Unknown => "Unknown",
        }
    }
}

/// Coarse bias bucket, shown as a badge in the article list and in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiasLevel {
    Neutral,
    Moderate,
    High,
}

impl BiasLevel {
    pub fn from_score(score: f64) -> Self {
        if score < 30.0 {
            BiasLevel::Neutral
        } else if score < 60.0 {
            BiasLevel::Moderate
        } else {
            BiasLevel::High
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BiasLevel::Neutral => "Neutral",
            BiasLevel::Moderate => "Moderate",
            BiasLevel::High => "High Bias",
        }
    }
}
