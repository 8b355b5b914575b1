//! One user-triggered analysis request at a time.
//!
//! `idle -> pending` on submit, `pending -> success` on a resolved response,
//! `pending -> idle` with a recorded message on a rejected one. A later submit
//! restarts the cycle and clears the previous outcome.

use super::display::AnalysisDisplay;
use super::{Completion, RequestState, Ticket, WorkflowError};
use crate::api::{AnalysisResult, AnalyzeRequest, ApiError, NewsApi};

#[derive(Debug, Default)]
pub struct AnalysisWorkflow {
    state: RequestState<AnalysisDisplay>,
    /// Raw record behind the current success, for `--json` output.
    raw: Option<AnalysisResult>,
    last_error: Option<String>,
}

impl AnalysisWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RequestState<AnalysisDisplay> {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    pub fn result(&self) -> Option<&AnalysisDisplay> {
        self.state.success()
    }

    pub fn raw_result(&self) -> Option<&AnalysisResult> {
        self.raw.as_ref()
    }

    /// Message of the most recent failure, cleared by the next submit.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Start an ad hoc text analysis.
    ///
    /// Blank or whitespace-only text is rejected before any request is
    /// issued and the state is left untouched.
    pub fn submit(&mut self, text: &str) -> Result<(Ticket, AnalyzeRequest), WorkflowError> {
        if text.trim().is_empty() {
            return Err(WorkflowError::BlankInput);
        }
        self.begin(AnalyzeRequest::Text(text.to_string()))
    }

    /// Start an analysis of a stored article.
    pub fn submit_article(
        &mut self,
        article_id: i64,
    ) -> Result<(Ticket, AnalyzeRequest), WorkflowError> {
        self.begin(AnalyzeRequest::Article(article_id))
    }

    fn begin(
        &mut self,
        request: AnalyzeRequest,
    ) -> Result<(Ticket, AnalyzeRequest), WorkflowError> {
        if self.state.is_pending() {
            return Err(WorkflowError::AlreadyPending);
        }
        let ticket = Ticket::issue();
        tracing::debug!(
            ticket = ticket.value(),
            article_id = ?request.article_id(),
            "Analysis requested"
        );
        self.state = RequestState::Pending(ticket);
        self.raw = None;
        self.last_error = None;
        Ok((ticket, request))
    }

    /// Hand the response for `ticket` to the workflow.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        result: Result<AnalysisResult, ApiError>,
    ) -> Completion {
        if !self.state.awaits(ticket) {
            tracing::debug!(ticket = ticket.value(), "Discarding stale analysis response");
            return Completion::Discarded;
        }

        match result {
            Ok(analysis) => {
                self.state = RequestState::Success(AnalysisDisplay::from_text_result(&analysis));
                self.raw = Some(analysis);
                Completion::Applied
            }
            Err(e) => {
                tracing::warn!(ticket = ticket.value(), error = %e, "Analysis failed");
                let message = format!("Analysis failed: {}", e.detail());
                self.state = RequestState::Idle;
                self.last_error = Some(message.clone());
                Completion::Failed(message)
            }
        }
    }

    /// Forget the pending request. Its response will be discarded.
    pub fn cancel(&mut self) {
        if let Some(ticket) = self.state.pending_ticket() {
            tracing::debug!(ticket = ticket.value(), "Analysis cancelled");
            self.state = RequestState::Idle;
        }
    }

    /// Submit `text` and wait for the response in place.
    pub async fn run<A: NewsApi>(
        &mut self,
        api: &A,
        text: &str,
    ) -> Result<Completion, WorkflowError> {
        let (ticket, request) = self.submit(text)?;
        let result = api.analyze(&request).await;
        Ok(self.complete(ticket, result))
    }

    /// Like [`run`](Self::run) for a stored article.
    pub async fn run_article<A: NewsApi>(
        &mut self,
        api: &A,
        article_id: i64,
    ) -> Result<Completion, WorkflowError> {
        let (ticket, request) = self.submit_article(article_id)?;
        let result = api.analyze(&request).await;
        Ok(self.complete(ticket, result))
    }
}
