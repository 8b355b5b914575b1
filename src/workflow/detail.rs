//! Article detail: load an article with its latest analysis, and create an
//! analysis on demand when it has none.

use super::display::AnalysisDisplay;
use super::{Completion, RequestState, Ticket, WorkflowError};
use crate::api::{AnalysisResult, AnalyzeRequest, ApiError, Article, NewsApi};

/// A loaded article and the analysis shown beside it.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleView {
    pub article: Article,
    pub analysis: Option<AnalysisDisplay>,
    /// Raw record behind `analysis`.
    pub latest: Option<AnalysisResult>,
}

impl ArticleView {
    fn new(mut article: Article, analyses: &[AnalysisResult]) -> Self {
        let latest = latest_analysis(analyses).cloned();
        article.has_analysis = latest.is_some();
        Self {
            article,
            analysis: latest.as_ref().map(AnalysisDisplay::from_stored),
            latest,
        }
    }

    pub fn has_analysis(&self) -> bool {
        self.article.has_analysis
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Idle,
    Loading(Ticket),
    Loaded(ArticleView),
    /// Terminal: the only way out is back to the list.
    NotFound { reason: String },
}

/// The most recent analysis by timestamp. Ties go to the earliest delivered.
pub fn latest_analysis(analyses: &[AnalysisResult]) -> Option<&AnalysisResult> {
    analyses.iter().fold(None, |best: Option<&AnalysisResult>, candidate| match best {
        Some(current) if candidate.analyzed_at <= current.analyzed_at => Some(current),
        _ => Some(candidate),
    })
}

/// Fetch an article then its analyses, in that order.
pub async fn fetch_article<A: NewsApi>(
    api: &A,
    article_id: i64,
) -> Result<(Article, Vec<AnalysisResult>), ApiError> {
    let article = api.get_article(article_id).await?;
    let analyses = api.get_analyses(article_id).await?;
    Ok((article, analyses))
}

#[derive(Debug)]
pub struct ArticleDetailWorkflow {
    article_id: i64,
    state: DetailState,
    create: RequestState<()>,
}

impl ArticleDetailWorkflow {
    pub fn new(article_id: i64) -> Self {
        Self {
            article_id,
            state: DetailState::Idle,
            create: RequestState::Idle,
        }
    }

    pub fn article_id(&self) -> i64 {
        self.article_id
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn view(&self) -> Option<&ArticleView> {
        match &self.state {
            DetailState::Loaded(view) => Some(view),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, DetailState::Loading(_))
    }

    pub fn is_creating(&self) -> bool {
        self.create.is_pending()
    }

    /// Message from the last failed create-analysis attempt.
    pub fn create_error(&self) -> Option<&str> {
        match &self.create {
            RequestState::Failure(message) => Some(message),
            _ => None,
        }
    }

    /// Whether the create-analysis action is offered.
    pub fn can_create_analysis(&self) -> bool {
        self.view().is_some_and(|view| view.analysis.is_none()) && !self.create.is_pending()
    }

    // ========================================================================
    // Load
    // ========================================================================

    /// Enter the loading state. A previous load in flight is superseded.
    pub fn begin_load(&mut self) -> Ticket {
        let ticket = Ticket::issue();
        tracing::debug!(article_id = self.article_id, ticket = ticket.value(), "Loading article");
        self.state = DetailState::Loading(ticket);
        self.create = RequestState::Idle;
        ticket
    }

    pub fn finish_load(
        &mut self,
        ticket: Ticket,
        result: Result<(Article, Vec<AnalysisResult>), ApiError>,
    ) -> Completion {
        if self.state != DetailState::Loading(ticket) {
            tracing::debug!(ticket = ticket.value(), "Discarding stale article load");
            return Completion::Discarded;
        }

        match result {
            Ok((article, analyses)) => {
                tracing::debug!(
                    article_id = self.article_id,
                    analyses = analyses.len(),
                    "Article loaded"
                );
                self.state = DetailState::Loaded(ArticleView::new(article, &analyses));
                Completion::Applied
            }
            Err(e) => {
                tracing::error!(article_id = self.article_id, error = %e, "Failed to load article");
                let reason = e.detail();
                self.state = DetailState::NotFound {
                    reason: reason.clone(),
                };
                Completion::Failed(reason)
            }
        }
    }

    pub async fn load<A: NewsApi>(&mut self, api: &A) -> Completion {
        let ticket = self.begin_load();
        let result = fetch_article(api, self.article_id).await;
        self.finish_load(ticket, result)
    }

    // ========================================================================
    // Create analysis
    // ========================================================================

    pub fn begin_create_analysis(&mut self) -> Result<(Ticket, AnalyzeRequest), WorkflowError> {
        let view = self.view().ok_or(WorkflowError::NotLoaded)?;
        if view.analysis.is_some() {
            return Err(WorkflowError::AnalysisExists);
        }
        if self.create.is_pending() {
            return Err(WorkflowError::AlreadyPending);
        }
        let ticket = Ticket::issue();
        tracing::debug!(article_id = self.article_id, ticket = ticket.value(), "Creating analysis");
        self.create = RequestState::Pending(ticket);
        Ok((ticket, AnalyzeRequest::Article(self.article_id)))
    }

    pub fn finish_create_analysis(
        &mut self,
        ticket: Ticket,
        result: Result<AnalysisResult, ApiError>,
    ) -> Completion {
        if !self.create.awaits(ticket) {
            tracing::debug!(ticket = ticket.value(), "Discarding stale analysis response");
            return Completion::Discarded;
        }
        let DetailState::Loaded(view) = &mut self.state else {
            self.create = RequestState::Idle;
            return Completion::Discarded;
        };

        match result {
            Ok(analysis) => {
                view.analysis = Some(AnalysisDisplay::from_created(&analysis));
                view.latest = Some(analysis);
                view.article.has_analysis = true;
                self.create = RequestState::Success(());
                Completion::Applied
            }
            Err(e) => {
                tracing::warn!(
                    article_id = self.article_id,
                    error = %e,
                    "Analysis creation failed"
                );
                let message = format!("Analysis failed: {}", e.detail());
                self.create = RequestState::Failure(message.clone());
                Completion::Failed(message)
            }
        }
    }

    pub async fn create_analysis<A: NewsApi>(
        &mut self,
        api: &A,
    ) -> Result<Completion, WorkflowError> {
        let (ticket, request) = self.begin_create_analysis()?;
        let result = api.analyze(&request).await;
        Ok(self.finish_create_analysis(ticket, result))
    }

    /// End an in-flight load on the not-found screen without a response.
    pub fn abandon_load(&mut self, reason: impl Into<String>) {
        if self.is_loading() {
            self.state = DetailState::NotFound {
                reason: reason.into(),
            };
        }
    }

    /// Fail an in-flight create-analysis request; the prompt offers a retry.
    pub fn abandon_create(&mut self, message: impl Into<String>) {
        if self.create.is_pending() {
            self.create = RequestState::Failure(message.into());
        }
    }

    /// Drop interest in every request in flight.
    pub fn cancel(&mut self) {
        if self.is_loading() {
            self.state = DetailState::Idle;
        }
        if self.create.is_pending() {
            self.create = RequestState::Idle;
        }
    }
}
