//! Wire types for the analysis service.
//!
//! Field names follow the service's JSON (a mix of snake_case and camelCase),
//! renamed to Rust conventions on the struct side.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Articles
// ============================================================================

/// A news article as stored by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    #[serde(default)]
    pub source_id: Option<String>,
    pub source_name: String,
    #[serde(default)]
    pub author: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
    #[serde(rename = "urlToImage", default)]
    pub url_to_image: Option<String>,
    #[serde(rename = "publishedAt", deserialize_with = "timestamp")]
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub content: Option<String>,
    /// Topic label. Older rows carry none.
    #[serde(default)]
    pub topic: Option<String>,
    /// Precomputed bias percentage, when the listing endpoint provides one.
    #[serde(rename = "biasScore", default)]
    pub bias_score: Option<f64>,
    #[serde(rename = "hasAnalysis", default, deserialize_with = "null_as_default")]
    pub has_analysis: bool,
}

/// Optional server-side filters for the article listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticleFilters {
    pub topic: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
}

impl ArticleFilters {
    /// Query parameters in the service's naming. Absent filters are omitted.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(topic) = &self.topic {
            pairs.push(("topic", topic.clone()));
        }
        if let Some(date_from) = &self.date_from {
            pairs.push(("date_from", date_from.to_rfc3339()));
        }
        pairs
    }

    pub fn is_empty(&self) -> bool {
        self.topic.is_none() && self.date_from.is_none()
    }
}

// ============================================================================
// Analyses
// ============================================================================

/// The service's bias/credibility assessment of an article or of free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub id: i64,
    /// Owning article. Ad hoc text analyses come back as `-1` or null.
    #[serde(default, deserialize_with = "article_ref")]
    pub article_id: Option<i64>,
    pub bias: String,
    pub bias_confidence: f64,
    pub summary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub key_points: Vec<String>,
    #[serde(rename = "analyzedAt", deserialize_with = "timestamp")]
    pub analyzed_at: DateTime<Utc>,
}

/// What an analysis request refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyzeRequest {
    /// Free text pasted by the user.
    Text(String),
    /// A stored article, analysed server-side from its own fields.
    Article(i64),
}

/// JSON body of `POST /analyze`. Article references send `{"text": null}`.
#[derive(Debug, Serialize)]
pub(crate) struct AnalyzeBody<'a> {
    pub text: Option<&'a str>,
}

impl AnalyzeRequest {
    pub(crate) fn body(&self) -> AnalyzeBody<'_> {
        match self {
            AnalyzeRequest::Text(text) => AnalyzeBody { text: Some(text) },
            AnalyzeRequest::Article(_) => AnalyzeBody { text: None },
        }
    }

    pub fn article_id(&self) -> Option<i64> {
        match self {
            AnalyzeRequest::Text(_) => None,
            AnalyzeRequest::Article(id) => Some(*id),
        }
    }
}

/// Error body produced by the service on non-2xx responses.
///
/// `detail` is usually a string but validation failures carry a list.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

// ============================================================================
// Serde helpers
// ============================================================================

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn article_ref<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<i64>::deserialize(deserializer)?.filter(|id| *id >= 0))
}

/// Accepts RFC 3339 timestamps and offset-less ISO timestamps (read as UTC).
fn timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("invalid timestamp '{}'", raw))
    })
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn article_json() -> serde_json::Value {
        serde_json::json!({
            "id": 7,
            "source_id": "bbc-news",
            "source_name": "BBC News",
            "author": null,
            "title": "Rivers rise",
            "description": "Flooding across the region",
            "url": "https://example.com/rivers",
            "urlToImage": null,
            "publishedAt": "2025-03-01T08:30:00+00:00",
            "content": "Body",
            "topic": "Environment",
            "hasAnalysis": true
        })
    }

    #[test]
    fn test_article_decodes_service_names() {
        let article: Article = serde_json::from_value(article_json()).unwrap();
        assert_eq!(article.id, 7);
        assert_eq!(article.source_name, "BBC News");
        assert_eq!(article.topic.as_deref(), Some("Environment"));
        assert!(article.has_analysis);
        assert_eq!(
            article.published_at,
            Utc.with_ymd_and_hms(2025, 3, 1, 8, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_article_null_has_analysis_reads_false() {
        let mut json = article_json();
        json["hasAnalysis"] = serde_json::Value::Null;
        let article: Article = serde_json::from_value(json).unwrap();
        assert!(!article.has_analysis);
    }

    #[test]
    fn test_article_missing_optional_fields() {
        let json = serde_json::json!({
            "id": 1,
            "source_name": "Wire",
            "title": "T",
            "url": "https://example.com/t",
            "publishedAt": "2025-03-01T08:30:00"
        });
        let article: Article = serde_json::from_value(json).unwrap();
        assert!(article.topic.is_none());
        assert!(article.content.is_none());
        assert!(!article.has_analysis);
    }

    #[test]
    fn test_analysis_negative_article_id_is_none() {
        let json = serde_json::json!({
            "id": -1,
            "article_id": -1,
            "bias": "True",
            "bias_confidence": 0.9,
            "summary": "s",
            "key_points": null,
            "analyzedAt": "2025-03-01T08:30:00.123456Z"
        });
        let analysis: AnalysisResult = serde_json::from_value(json).unwrap();
        assert_eq!(analysis.article_id, None);
        assert!(analysis.key_points.is_empty());
    }

    #[test]
    fn test_invalid_timestamp_rejected() {
        let mut json = article_json();
        json["publishedAt"] = serde_json::json!("yesterday");
        assert!(serde_json::from_value::<Article>(json).is_err());
    }

    #[test]
    fn test_filters_query_pairs() {
        let filters = ArticleFilters {
            topic: Some("Economy".to_string()),
            date_from: Some(Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap()),
        };
        assert_eq!(
            filters.query_pairs(),
            vec![
                ("topic", "Economy".to_string()),
                ("date_from", "2025-01-02T00:00:00+00:00".to_string()),
            ]
        );
        assert!(ArticleFilters::default().query_pairs().is_empty());
    }

    #[test]
    fn test_analyze_body_shapes() {
        let text = AnalyzeRequest::Text("hello".to_string());
        let article = AnalyzeRequest::Article(4);
        assert_eq!(
            serde_json::to_string(&text.body()).unwrap(),
            r#"{"text":"hello"}"#
        );
        assert_eq!(
            serde_json::to_string(&article.body()).unwrap(),
            r#"{"text":null}"#
        );
        assert_eq!(article.article_id(), Some(4));
        assert_eq!(text.article_id(), None);
    }
}
