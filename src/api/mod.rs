//! Client for the FactLens analysis service.
//!
//! - `types` - Wire models (`Article`, `AnalysisResult`) and request shapes
//! - `client` - reqwest-backed `ApiClient` and the `ApiError` taxonomy
//!
//! Views and workflows talk to the service through the [`NewsApi`] trait so
//! they can be driven by a scripted fake in tests.

mod client;
mod types;

pub use client::{parse_base_url, ApiClient, ApiError};
pub use types::{parse_timestamp, AnalysisResult, AnalyzeRequest, Article, ArticleFilters};

use std::future::Future;

/// The four REST operations the client consumes.
///
/// Every call is single-attempt: no retry, no cancellation of the exchange.
pub trait NewsApi {
    /// `GET /articles`, in service order.
    fn list_articles(
        &self,
        filters: &ArticleFilters,
    ) -> impl Future<Output = Result<Vec<Article>, ApiError>> + Send;

    /// `GET /articles/{id}`. A 404 yields [`ApiError::NotFound`].
    fn get_article(&self, id: i64) -> impl Future<Output = Result<Article, ApiError>> + Send;

    /// `GET /articles/{id}/analyses`, in delivery order.
    fn get_analyses(
        &self,
        article_id: i64,
    ) -> impl Future<Output = Result<Vec<AnalysisResult>, ApiError>> + Send;

    /// `POST /analyze`, optionally with `?article_id=`.
    fn analyze(
        &self,
        request: &AnalyzeRequest,
    ) -> impl Future<Output = Result<AnalysisResult, ApiError>> + Send;
}
