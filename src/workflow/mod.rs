//! Request workflows between the views and the analysis service.
//!
//! Each workflow owns an explicit lifecycle state and a pending request
//! ticket. Issuing a request and accepting its response are separate steps,
//! so the terminal front end can run the request on a background task and
//! tests can drive every transition without a terminal.
//!
//! - `analysis` - Ad hoc text or stored-article analysis requests
//! - `detail` - Article detail load and on-demand analysis creation
//! - `display` - Normalized display models for analysis results

pub mod analysis;
pub mod detail;
pub mod display;

pub use analysis::AnalysisWorkflow;
pub use detail::{ArticleDetailWorkflow, ArticleView, DetailState};
pub use display::{AnalysisDisplay, BiasLevel, Verdict};

use crate::api::ApiError;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

/// Identifies one issued request.
///
/// Tickets are unique across the process, so a response can only ever be
/// accepted by the workflow instance that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub(crate) fn issue() -> Self {
        Ticket(NEXT_TICKET.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

/// Lifecycle of one request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestState<T> {
    Idle,
    Pending(Ticket),
    Success(T),
    Failure(String),
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        RequestState::Idle
    }
}

impl<T> RequestState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestState::Pending(_))
    }

    pub fn pending_ticket(&self) -> Option<Ticket> {
        match self {
            RequestState::Pending(ticket) => Some(*ticket),
            _ => None,
        }
    }

    /// True when `ticket` is the request this state is waiting on.
    pub fn awaits(&self, ticket: Ticket) -> bool {
        self.pending_ticket() == Some(ticket)
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            RequestState::Success(value) => Some(value),
            _ => None,
        }
    }
}

/// Why a workflow action did not go through.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Client-side validation: nothing to analyse.
    #[error("Enter some text to analyze")]
    BlankInput,
    #[error("A request is already in progress")]
    AlreadyPending,
    #[error("This article already has an analysis")]
    AnalysisExists,
    #[error("The article is not loaded")]
    NotLoaded,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// What happened when a response was handed to a workflow.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// The response was applied and the workflow holds the result.
    Applied,
    /// The request failed; the message is meant for the user.
    Failed(String),
    /// The ticket was stale and the response was ignored.
    Discarded,
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted `NewsApi` fake shared by the workflow tests.

    use crate::api::{AnalysisResult, AnalyzeRequest, ApiError, Article, ArticleFilters, NewsApi};
    use chrono::{DateTime, TimeZone, Utc};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct FakeApi {
        pub articles: Mutex<Vec<Article>>,
        pub analyses: Mutex<Vec<AnalysisResult>>,
        pub analyze_results: Mutex<VecDeque<Result<AnalysisResult, ApiError>>>,
        pub requests: Mutex<Vec<AnalyzeRequest>>,
        pub calls: AtomicUsize,
    }

    impl FakeApi {
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn push_analyze(&self, result: Result<AnalysisResult, ApiError>) {
            self.analyze_results.lock().unwrap().push_back(result);
        }
    }

    impl NewsApi for FakeApi {
        async fn list_articles(&self, _filters: &ArticleFilters) -> Result<Vec<Article>, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.articles.lock().unwrap().clone())
        }

        async fn get_article(&self, id: i64) -> Result<Article, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.articles
                .lock()
                .unwrap()
                .iter()
                .find(|a| a.id == id)
                .cloned()
                .ok_or_else(|| ApiError::NotFound {
                    detail: "Article not found".to_string(),
                })
        }

        async fn get_analyses(&self, article_id: i64) -> Result<Vec<AnalysisResult>, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .analyses
                .lock()
                .unwrap()
                .iter()
                .filter(|a| a.article_id == Some(article_id))
                .cloned()
                .collect())
        }

        async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisResult, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request.clone());
            self.analyze_results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| {
                    Err(ApiError::Service {
                        status: 500,
                        detail: "no scripted response".to_string(),
                    })
                })
        }
    }

    pub fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 1, hour, 0, 0).unwrap()
    }

    pub fn article(id: i64) -> Article {
        Article {
            id,
            source_id: None,
            source_name: "Reuters".to_string(),
            author: Some("J. Doe".to_string()),
            title: format!("Article {id}"),
            description: Some("A description".to_string()),
            url: format!("https://example.com/{id}"),
            url_to_image: None,
            published_at: at(6),
            content: Some("Body text".to_string()),
            topic: Some("Economy".to_string()),
            bias_score: None,
            has_analysis: false,
        }
    }

    pub fn analysis(
        id: i64,
        article_id: Option<i64>,
        confidence: f64,
        analyzed_at: DateTime<Utc>,
    ) -> AnalysisResult {
        AnalysisResult {
            id,
            article_id,
            bias: "left".to_string(),
            bias_confidence: confidence,
            summary: "Summary".to_string(),
            key_points: vec!["a".to_string(), "b".to_string()],
            analyzed_at,
        }
    }
}
