use crate::api::{AnalysisResult, AnalyzeRequest, ApiClient, ApiError, Article, ArticleFilters};
use crate::collection::ArticleCollection;
use crate::theme::{ColorPalette, ThemeVariant};
use crate::workflow::{
    AnalysisWorkflow, ArticleDetailWorkflow, Completion, Ticket, WorkflowError,
};
use std::borrow::Cow;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Maximum scroll offset for the detail view (ratatui u16 limit).
pub const MAX_SCROLL: usize = u16::MAX as usize;

/// Longest text accepted in the analyze screen.
pub const MAX_ANALYZE_INPUT: usize = 100_000;

// ============================================================================
// View and Event Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Filter bar and article list.
    Articles,
    /// One article with its analysis.
    Detail,
    /// Ad hoc text analysis.
    Analyze,
}

/// Lifecycle of the article list fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionState {
    Loading,
    Ready,
    Failed(String),
}

/// Events from background tasks.
///
/// Every request result carries the generation or ticket it was issued
/// under; the receiving side drops results that no longer match.
#[derive(Debug)]
pub enum AppEvent {
    ArticlesLoaded {
        generation: u64,
        result: Result<Vec<Article>, ApiError>,
    },
    DetailLoaded {
        ticket: Ticket,
        result: Result<(Article, Vec<AnalysisResult>), ApiError>,
    },
    /// Response to an analyze-screen submission.
    AnalysisCompleted {
        ticket: Ticket,
        result: Result<AnalysisResult, ApiError>,
    },
    /// Response to a create-analysis request from the detail view.
    DetailAnalysisCompleted {
        ticket: Ticket,
        result: Result<AnalysisResult, ApiError>,
    },
    /// A background task panicked.
    TaskPanicked { task: &'static str, error: String },
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state. Owned by the UI task; never shared.
pub struct App {
    pub api: ApiClient,

    pub theme_variant: ThemeVariant,
    pub theme: ColorPalette,

    pub view: View,

    // Article list
    pub collection: ArticleCollection,
    pub collection_state: CollectionState,
    /// Server-side filters applied when (re)loading the list.
    pub list_filters: ArticleFilters,
    /// Index into the visible subset.
    pub selected_article: usize,
    pub search_mode: bool,

    // Detail
    pub detail: Option<ArticleDetailWorkflow>,
    pub scroll_offset: usize,
    /// Visible lines in the detail body, recorded at render time.
    pub detail_visible_lines: usize,
    /// Total wrapped lines in the detail body, recorded at render time.
    pub detail_content_lines: usize,

    // Analyze
    pub analyze_input: String,
    pub analysis: AnalysisWorkflow,

    /// Status message with the time it was set; expires after 3 seconds.
    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// Dirty flag to skip unnecessary frame renders.
    pub needs_redraw: bool,

    /// Loading spinner frame, advanced by the tick handler.
    pub spinner_frame: usize,

    /// Generation counter for list loads. A reload bumps it so the results
    /// of an earlier load in flight are ignored.
    pub articles_generation: u64,
    pub articles_handle: Option<JoinHandle<()>>,
    pub detail_handle: Option<JoinHandle<()>>,
    pub detail_create_handle: Option<JoinHandle<()>>,
    pub analysis_handle: Option<JoinHandle<()>>,
}

impl App {
    pub fn new(api: ApiClient, theme_variant: ThemeVariant) -> Self {
        Self {
            api,
            theme_variant,
            theme: theme_variant.palette(),
            view: View::Articles,
            collection: ArticleCollection::default(),
            collection_state: CollectionState::Loading,
            list_filters: ArticleFilters::default(),
            selected_article: 0,
            search_mode: false,
            detail: None,
            scroll_offset: 0,
            detail_visible_lines: 0,
            detail_content_lines: 0,
            analyze_input: String::new(),
            analysis: AnalysisWorkflow::new(),
            status_message: None,
            needs_redraw: true,
            spinner_frame: 0,
            articles_generation: 0,
            articles_handle: None,
            detail_handle: None,
            detail_create_handle: None,
            analysis_handle: None,
        }
    }

    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = variant.palette();
        self.needs_redraw = true;
    }

    /// Cycle to the next theme variant and return its name.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = self.theme_variant.next();
        self.set_theme(next);
        next.name()
    }

    // ========================================================================
    // Status bar
    // ========================================================================

    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear the status message once it is 3 seconds old.
    /// Returns true if a message was actually cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= 3 {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    /// Whether any request is in flight, for the spinner.
    pub fn is_busy(&self) -> bool {
        self.collection_state == CollectionState::Loading
            || self.analysis.is_pending()
            || self
                .detail
                .as_ref()
                .is_some_and(|d| d.is_loading() || d.is_creating())
    }

    // ========================================================================
    // Article list
    // ========================================================================

    pub fn selected_article(&self) -> Option<&Article> {
        self.collection.visible_at(self.selected_article)
    }

    pub fn nav_up(&mut self) {
        self.selected_article = self.selected_article.saturating_sub(1);
    }

    pub fn nav_down(&mut self) {
        let len = self.collection.visible_len();
        if len > 0 {
            self.selected_article = self.selected_article.saturating_add(1).min(len - 1);
        }
    }

    /// Keep the selection inside the visible subset after a filter change.
    pub fn clamp_selection(&mut self) {
        let len = self.collection.visible_len();
        self.selected_article = if len == 0 {
            0
        } else {
            self.selected_article.min(len - 1)
        };
    }

    /// Start a list (re)load and return its generation.
    ///
    /// Aborts a load already in flight.
    pub fn begin_articles_load(&mut self) -> u64 {
        if let Some(handle) = self.articles_handle.take() {
            handle.abort();
            tracing::debug!("Aborted previous article list load");
        }
        self.articles_generation = self.articles_generation.wrapping_add(1);
        self.collection_state = CollectionState::Loading;
        self.articles_generation
    }

    /// Apply a list load result. Returns false when the result was stale.
    pub fn apply_articles_loaded(
        &mut self,
        generation: u64,
        result: Result<Vec<Article>, ApiError>,
    ) -> bool {
        if generation != self.articles_generation {
            tracing::debug!(
                generation,
                current = self.articles_generation,
                "Discarding stale article list"
            );
            return false;
        }
        self.articles_handle = None;

        match result {
            Ok(articles) => {
                tracing::info!(count = articles.len(), "Loaded article collection");
                self.collection.replace(articles);
                self.collection_state = CollectionState::Ready;
                self.clamp_selection();
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load articles");
                let message = format!("Failed to load articles: {}", e.detail());
                self.set_status(message.clone());
                self.collection_state = CollectionState::Failed(message);
            }
        }
        true
    }

    // ========================================================================
    // Detail
    // ========================================================================

    /// Open the detail view for the selected article.
    ///
    /// Returns the load ticket and article id to spawn the fetch with.
    pub fn open_detail(&mut self) -> Option<(Ticket, i64)> {
        let article_id = self.selected_article()?.id;
        self.close_detail_requests();
        let mut detail = ArticleDetailWorkflow::new(article_id);
        let ticket = detail.begin_load();
        self.detail = Some(detail);
        self.view = View::Detail;
        self.scroll_offset = 0;
        self.detail_content_lines = 0;
        Some((ticket, article_id))
    }

    pub fn apply_detail_loaded(
        &mut self,
        ticket: Ticket,
        result: Result<(Article, Vec<AnalysisResult>), ApiError>,
    ) -> Completion {
        let Some(detail) = self.detail.as_mut() else {
            return Completion::Discarded;
        };
        let completion = detail.finish_load(ticket, result);
        if completion != Completion::Discarded {
            self.detail_handle = None;
        }
        completion
    }

    pub fn begin_detail_analysis(&mut self) -> Result<(Ticket, AnalyzeRequest), WorkflowError> {
        self.detail
            .as_mut()
            .ok_or(WorkflowError::NotLoaded)?
            .begin_create_analysis()
    }

    /// Merge a create-analysis response and keep the list in step.
    pub fn apply_detail_analysis(
        &mut self,
        ticket: Ticket,
        result: Result<AnalysisResult, ApiError>,
    ) -> Completion {
        let Some(detail) = self.detail.as_mut() else {
            return Completion::Discarded;
        };
        let completion = detail.finish_create_analysis(ticket, result);
        match &completion {
            Completion::Applied => {
                self.detail_create_handle = None;
                let article_id = detail.article_id();
                self.collection.mark_analyzed(article_id);
                self.set_status("Analysis created");
            }
            Completion::Failed(message) => {
                self.detail_create_handle = None;
                self.set_status(message.clone());
            }
            Completion::Discarded => {}
        }
        completion
    }

    /// Leave the detail view, abandoning its requests.
    pub fn close_detail(&mut self) {
        self.close_detail_requests();
        self.detail = None;
        self.view = View::Articles;
        self.scroll_offset = 0;
    }

    fn close_detail_requests(&mut self) {
        for handle in [self.detail_handle.take(), self.detail_create_handle.take()]
            .into_iter()
            .flatten()
        {
            handle.abort();
            tracing::debug!("Aborted detail request on view exit");
        }
        if let Some(detail) = self.detail.as_mut() {
            detail.cancel();
        }
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
        self.clamp_scroll();
    }

    /// Keep the scroll offset within the content rendered last frame.
    pub fn clamp_scroll(&mut self) {
        let max_scroll = self
            .detail_content_lines
            .saturating_sub(self.detail_visible_lines);
        self.scroll_offset = self.scroll_offset.min(max_scroll).min(MAX_SCROLL);
    }

    // ========================================================================
    // Analyze
    // ========================================================================

    pub fn enter_analyze(&mut self) {
        self.view = View::Analyze;
    }

    /// Leave the analyze screen. A request in flight is abandoned; the typed
    /// text stays for the next visit.
    pub fn exit_analyze(&mut self) {
        if let Some(handle) = self.analysis_handle.take() {
            handle.abort();
            tracing::debug!("Aborted analysis request on view exit");
        }
        self.analysis.cancel();
        self.view = View::Articles;
    }

    /// Append typed or pasted text. The buffer never exceeds `MAX_ANALYZE_INPUT` bytes.
    pub fn push_analyze_char(&mut self, c: char) {
        if self.analyze_input.len() + c.len_utf8() <= MAX_ANALYZE_INPUT {
            self.analyze_input.push(c);
        }
    }

    pub fn submit_analysis(&mut self) -> Result<(Ticket, AnalyzeRequest), WorkflowError> {
        self.analysis.submit(&self.analyze_input)
    }

    pub fn apply_analysis(
        &mut self,
        ticket: Ticket,
        result: Result<AnalysisResult, ApiError>,
    ) -> Completion {
        let completion = self.analysis.complete(ticket, result);
        match &completion {
            Completion::Applied => {
                self.analysis_handle = None;
                if self.analysis.result().is_some_and(|r| r.is_high_bias()) {
                    self.set_status("High bias detected");
                }
            }
            Completion::Failed(message) => {
                self.analysis_handle = None;
                self.set_status(message.clone());
            }
            Completion::Discarded => {}
        }
        completion
    }
}

// ============================================================================
// Resource Cleanup
// ============================================================================

/// Abort all in-flight tasks so none outlive the event loop.
impl Drop for App {
    fn drop(&mut self) {
        for handle in [
            self.articles_handle.take(),
            self.detail_handle.take(),
            self.detail_create_handle.take(),
            self.analysis_handle.take(),
        ]
        .into_iter()
        .flatten()
        {
            handle.abort();
        }
    }
}
