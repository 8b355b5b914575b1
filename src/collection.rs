//! In-memory article collection with client-side filtering.
//!
//! The collection is fetched once. Topic and source choices are derived from
//! it, and three independent predicates (search, topic, source) select the
//! visible subset. Filtering never goes back to the service.

use crate::api::{ApiError, Article, ArticleFilters, NewsApi};
use std::sync::Arc;

/// Sentinel entry meaning "no restriction" in the topic and source lists.
pub const ALL: &str = "all";

/// Shown when no article passes the filters, including an empty collection.
pub const NO_ARTICLES_FOUND: &str = "No articles found";

/// User-controlled filter fields. Reset only by explicit user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub search_term: String,
    pub topic: String,
    pub source: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            topic: ALL.to_string(),
            source: ALL.to_string(),
        }
    }
}

impl FilterState {
    /// True when `article` passes all three predicates.
    pub fn matches(&self, article: &Article) -> bool {
        self.matches_search(article) && self.matches_topic(article) && self.matches_source(article)
    }

    fn matches_search(&self, article: &Article) -> bool {
        if self.search_term.is_empty() {
            return true;
        }
        let needle = self.search_term.to_lowercase();
        article.title.to_lowercase().contains(&needle)
            || article
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
    }

    fn matches_topic(&self, article: &Article) -> bool {
        self.topic == ALL || article.topic.as_deref() == Some(self.topic.as_str())
    }

    fn matches_source(&self, article: &Article) -> bool {
        self.source == ALL || article.source_name == self.source
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// The article list view: loaded articles, derived choices, and filters.
#[derive(Debug, Clone)]
pub struct ArticleCollection {
    articles: Arc<Vec<Article>>,
    topics: Vec<String>,
    sources: Vec<String>,
    filters: FilterState,
    /// Indices into `articles` that pass the current filters, in order.
    visible: Vec<usize>,
}

impl Default for ArticleCollection {
    fn default() -> Self {
        Self::from_articles(Vec::new())
    }
}

impl ArticleCollection {
    pub fn from_articles(articles: Vec<Article>) -> Self {
        let topics = distinct_with_sentinel(articles.iter().filter_map(|a| a.topic.as_deref()));
        let sources = distinct_with_sentinel(articles.iter().map(|a| a.source_name.as_str()));
        let mut collection = Self {
            articles: Arc::new(articles),
            topics,
            sources,
            filters: FilterState::default(),
            visible: Vec::new(),
        };
        collection.refilter();
        collection
    }

    /// Fetch the full collection from the service.
    pub async fn load<A: NewsApi>(api: &A) -> Result<Self, ApiError> {
        let articles = api.list_articles(&ArticleFilters::default()).await?;
        tracing::info!(count = articles.len(), "Loaded article collection");
        Ok(Self::from_articles(articles))
    }

    /// Swap in a freshly fetched list, keeping the user's filters.
    ///
    /// A topic or source that no longer exists falls back to "all".
    pub fn replace(&mut self, articles: Vec<Article>) {
        let filters = std::mem::take(&mut self.filters);
        *self = Self::from_articles(articles);
        self.filters.search_term = filters.search_term;
        if self.topics.contains(&filters.topic) {
            self.filters.topic = filters.topic;
        }
        if self.sources.contains(&filters.source) {
            self.filters.source = filters.source;
        }
        self.refilter();
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// `"all"` followed by each distinct topic in first-seen order.
    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    /// `"all"` followed by each distinct source name in first-seen order.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.filters.search_term = term.into();
        self.refilter();
    }

    pub fn set_topic(&mut self, topic: impl Into<String>) {
        self.filters.topic = topic.into();
        self.refilter();
    }

    pub fn set_source(&mut self, source: impl Into<String>) {
        self.filters.source = source.into();
        self.refilter();
    }

    pub fn clear_filters(&mut self) {
        self.filters = FilterState::default();
        self.refilter();
    }

    /// Select the next topic, wrapping back to "all". Returns the new topic.
    pub fn cycle_topic(&mut self) -> &str {
        let next = next_choice(&self.topics, &self.filters.topic);
        self.set_topic(next);
        &self.filters.topic
    }

    /// Select the next source, wrapping back to "all". Returns the new source.
    pub fn cycle_source(&mut self) -> &str {
        let next = next_choice(&self.sources, &self.filters.source);
        self.set_source(next);
        &self.filters.source
    }

    /// Articles passing all active filters, in collection order.
    pub fn visible_articles(&self) -> Vec<&Article> {
        self.visible.iter().map(|&i| &self.articles[i]).collect()
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// The `index`-th visible article.
    pub fn visible_at(&self, index: usize) -> Option<&Article> {
        self.visible.get(index).map(|&i| &self.articles[i])
    }

    /// Placeholder text for an empty visible set.
    pub fn empty_message(&self) -> Option<&'static str> {
        self.visible.is_empty().then_some(NO_ARTICLES_FOUND)
    }

    /// Record that the service now holds an analysis for `article_id`.
    pub fn mark_analyzed(&mut self, article_id: i64) {
        let articles = Arc::make_mut(&mut self.articles);
        if let Some(article) = articles.iter_mut().find(|a| a.id == article_id) {
            article.has_analysis = true;
        }
    }

    fn refilter(&mut self) {
        self.visible = self
            .articles
            .iter()
            .enumerate()
            .filter(|(_, article)| self.filters.matches(article))
            .map(|(i, _)| i)
            .collect();
    }
}

/// Sentinel first, then distinct non-empty values in first-seen order.
fn distinct_with_sentinel<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out = vec![ALL.to_string()];
    for value in values {
        if value.is_empty() || out.iter().any(|seen| seen == value) {
            continue;
        }
        out.push(value.to_string());
    }
    out
}

fn next_choice(choices: &[String], current: &str) -> String {
    let next = choices
        .iter()
        .position(|c| c == current)
        .map(|i| (i + 1) % choices.len())
        .unwrap_or(0);
    choices
        .get(next)
        .cloned()
        .unwrap_or_else(|| ALL.to_string())
}
