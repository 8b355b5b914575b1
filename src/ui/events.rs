//! Application event handling.
//!
//! Applies background task results to the application state. Stale results
//! are filtered out by the workflows themselves.

use crate::app::{App, AppEvent, CollectionState};
use crate::workflow::Completion;

pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::ArticlesLoaded { generation, result } => {
            app.apply_articles_loaded(generation, result);
        }
        AppEvent::DetailLoaded { ticket, result } => {
            if let Completion::Failed(reason) = app.apply_detail_loaded(ticket, result) {
                tracing::debug!(reason = %reason, "Detail view degraded to not found");
            }
        }
        AppEvent::AnalysisCompleted { ticket, result } => {
            if app.apply_analysis(ticket, result) == Completion::Discarded {
                tracing::debug!(ticket = ticket.value(), "Ignored stale analysis result");
            }
        }
        AppEvent::DetailAnalysisCompleted { ticket, result } => {
            if app.apply_detail_analysis(ticket, result) == Completion::Discarded {
                tracing::debug!(ticket = ticket.value(), "Ignored stale detail analysis result");
            }
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::debug!(task, error = %error, "Resetting state after task panic");
            match task {
                "articles_load" => {
                    app.collection_state =
                        CollectionState::Failed("Article list load crashed".into());
                }
                "analysis" => app.analysis.cancel(),
                "detail_load" => {
                    if let Some(detail) = app.detail.as_mut() {
                        detail.abandon_load("Internal error while loading the article");
                    }
                }
                "detail_analysis" => {
                    if let Some(detail) = app.detail.as_mut() {
                        detail.abandon_create("Analysis failed: internal error");
                    }
                }
                _ => {}
            }
            app.set_status(format!("Internal error in {} task", task));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiClient, ApiError};
    use crate::theme::ThemeVariant;
    use crate::workflow::testing::article;
    use crate::workflow::DetailState;

    fn test_app() -> App {
        let api = ApiClient::new("http://127.0.0.1:9/api", None).unwrap();
        App::new(api, ThemeVariant::Dark)
    }

    #[test]
    fn test_articles_loaded_event_fills_collection() {
        let mut app = test_app();
        let generation = app.begin_articles_load();
        handle_app_event(
            &mut app,
            AppEvent::ArticlesLoaded {
                generation,
                result: Ok(vec![article(1), article(2)]),
            },
        );
        assert_eq!(app.collection.visible_len(), 2);
    }

    #[test]
    fn test_detail_load_failure_leaves_not_found_state() {
        let mut app = test_app();
        let generation = app.begin_articles_load();
        app.apply_articles_loaded(generation, Ok(vec![article(1)]));
        let (ticket, _) = app.open_detail().unwrap();

        handle_app_event(
            &mut app,
            AppEvent::DetailLoaded {
                ticket,
                result: Err(ApiError::NotFound {
                    detail: "Article not found".to_string(),
                }),
            },
        );
        assert!(matches!(
            app.detail.as_ref().unwrap().state(),
            DetailState::NotFound { .. }
        ));
    }

    #[test]
    fn test_panic_in_list_load_marks_failure() {
        let mut app = test_app();
        app.begin_articles_load();
        handle_app_event(
            &mut app,
            AppEvent::TaskPanicked {
                task: "articles_load",
                error: "boom".to_string(),
            },
        );
        assert!(matches!(app.collection_state, CollectionState::Failed(_)));
        assert_eq!(
            app.status_message.as_ref().map(|(m, _)| m.as_ref()),
            Some("Internal error in articles_load task")
        );
    }

    #[test]
    fn test_panic_in_analysis_unblocks_workflow() {
        let mut app = test_app();
        app.analyze_input = "text".to_string();
        app.submit_analysis().unwrap();
        handle_app_event(
            &mut app,
            AppEvent::TaskPanicked {
                task: "analysis",
                error: "boom".to_string(),
            },
        );
        assert!(!app.analysis.is_pending());
    }

    #[test]
    fn test_panic_in_detail_load_ends_not_found() {
        let mut app = test_app();
        let generation = app.begin_articles_load();
        app.apply_articles_loaded(generation, Ok(vec![article(7)]));
        app.open_detail().unwrap();
        handle_app_event(
            &mut app,
            AppEvent::TaskPanicked {
                task: "detail_load",
                error: "boom".to_string(),
            },
        );
        assert_eq!(
            app.detail.as_ref().map(|d| d.state().clone()),
            Some(DetailState::NotFound {
                reason: "Internal error while loading the article".to_string()
            })
        );
    }
}
