//! Background request spawning shared across the UI layer.
//!
//! Every remote call runs on its own tokio task and reports back through the
//! `AppEvent` channel, tagged with the ticket or generation it was issued
//! under. Handles are kept on `App` so leaving a view can abort them.

use crate::api::{AnalyzeRequest, ApiClient, ArticleFilters, NewsApi};
use crate::app::{App, AppEvent};
use crate::workflow::detail::fetch_article;
use crate::workflow::Ticket;
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Wraps a future to catch panics and convert them to errors.
///
/// A panic inside a spawned task would otherwise vanish into the runtime
/// and leave its workflow pending forever.
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                format!("Unknown panic: {:?}", (*panic).type_id())
            }
        })
}

/// Spawn `work` and deliver the event it produces, or `TaskPanicked`.
fn spawn_reporting<F>(
    task: &'static str,
    tx: mpsc::Sender<AppEvent>,
    work: F,
) -> JoinHandle<()>
where
    F: Future<Output = AppEvent> + Send + 'static,
{
    tokio::spawn(async move {
        let event = match catch_task_panic(work).await {
            Ok(event) => event,
            Err(error) => {
                tracing::error!(task, error = %error, "Background task panicked");
                AppEvent::TaskPanicked { task, error }
            }
        };
        if let Err(e) = tx.send(event).await {
            tracing::warn!(task, error = %e, "Channel send failed (receiver dropped)");
        }
    })
}

/// (Re)load the article list.
pub(super) fn spawn_articles_load(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    let generation = app.begin_articles_load();
    let api = app.api.clone();
    let filters = app.list_filters.clone();
    tracing::debug!(generation, "Spawning article list load");
    app.articles_handle = Some(spawn_reporting(
        "articles_load",
        event_tx.clone(),
        load_articles(api, filters, generation),
    ));
}

async fn load_articles(api: ApiClient, filters: ArticleFilters, generation: u64) -> AppEvent {
    let result = api.list_articles(&filters).await;
    AppEvent::ArticlesLoaded { generation, result }
}

/// Open the selected article and fetch it with its analyses.
pub(super) fn spawn_detail_load(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    let Some((ticket, article_id)) = app.open_detail() else {
        return;
    };
    let api = app.api.clone();
    tracing::debug!(article_id, ticket = ticket.value(), "Spawning article detail load");
    app.detail_handle = Some(spawn_reporting(
        "detail_load",
        event_tx.clone(),
        async move {
            let result = fetch_article(&api, article_id).await;
            AppEvent::DetailLoaded { ticket, result }
        },
    ));
}

/// Request an analysis of the article open in the detail view.
pub(super) fn spawn_detail_analysis(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    match app.begin_detail_analysis() {
        Ok((ticket, request)) => {
            app.set_status("Requesting analysis...");
            app.detail_create_handle = Some(spawn_reporting(
                "detail_analysis",
                event_tx.clone(),
                run_analysis(app.api.clone(), request, ticket, true),
            ));
        }
        Err(e) => app.set_status(e.to_string()),
    }
}

/// Submit the analyze screen's text.
pub(super) fn spawn_text_analysis(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    match app.submit_analysis() {
        Ok((ticket, request)) => {
            app.analysis_handle = Some(spawn_reporting(
                "analysis",
                event_tx.clone(),
                run_analysis(app.api.clone(), request, ticket, false),
            ));
        }
        Err(e) => app.set_status(e.to_string()),
    }
}

async fn run_analysis(
    api: ApiClient,
    request: AnalyzeRequest,
    ticket: Ticket,
    from_detail: bool,
) -> AppEvent {
    let result = api.analyze(&request).await;
    if from_detail {
        AppEvent::DetailAnalysisCompleted { ticket, result }
    } else {
        AppEvent::AnalysisCompleted { ticket, result }
    }
}
