//! End-to-end tests: workflows and the article collection driven through the
//! real HTTP client against a mock analysis service.
//!
//! Each test starts its own wiremock server for isolation.

use factlens::api::{ApiClient, ApiError, NewsApi};
use factlens::collection::ArticleCollection;
use factlens::workflow::{
    AnalysisWorkflow, ArticleDetailWorkflow, Completion, DetailState, WorkflowError,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn article_json(id: i64, title: &str, topic: &str, source: &str) -> Value {
    json!({
        "id": id,
        "source_id": null,
        "source_name": source,
        "author": "A. Writer",
        "title": title,
        "description": "desc",
        "url": format!("https://news.example/{id}"),
        "urlToImage": null,
        "publishedAt": "2025-02-10T12:00:00+00:00",
        "content": "body",
        "topic": topic,
        "hasAnalysis": false
    })
}

fn analysis_json(id: i64, article_id: i64, confidence: f64, analyzed_at: &str) -> Value {
    json!({
        "id": id,
        "article_id": article_id,
        "bias": "misleading",
        "bias_confidence": confidence,
        "summary": "Leans on a single source",
        "key_points": ["Single source", "Loaded wording"],
        "analyzedAt": analyzed_at
    })
}

async fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(&format!("{}/api", server.uri()), None).unwrap()
}

// ============================================================================
// Article Collection
// ============================================================================

#[tokio::test]
async fn test_empty_collection_shows_placeholder() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let collection = ArticleCollection::load(&client_for(&server).await)
        .await
        .unwrap();
    assert!(collection.is_empty());
    assert_eq!(collection.empty_message(), Some("No articles found"));
    assert_eq!(collection.topics(), ["all"]);
}

#[tokio::test]
async fn test_collection_filters_compose() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            article_json(1, "Rates rise again", "Economy", "Reuters"),
            article_json(2, "Election recount", "Politics", "AP"),
            article_json(3, "Rates on hold", "Economy", "AP"),
        ])))
        .mount(&server)
        .await;

    let mut collection = ArticleCollection::load(&client_for(&server).await)
        .await
        .unwrap();
    assert_eq!(collection.topics(), ["all", "Economy", "Politics"]);
    assert_eq!(collection.sources(), ["all", "Reuters", "AP"]);

    collection.set_search_term("RATES");
    collection.set_source("AP");
    let ids: Vec<i64> = collection.visible_articles().iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![3]);

    collection.set_topic("Politics");
    assert_eq!(collection.empty_message(), Some("No articles found"));

    collection.clear_filters();
    assert_eq!(collection.visible_len(), 3);
}

// ============================================================================
// Article Detail
// ============================================================================

#[tokio::test]
async fn test_detail_load_derives_stored_scores() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/articles/7"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(article_json(7, "Rates", "Economy", "AP")),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/articles/7/analyses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            analysis_json(1, 7, 0.2, "2025-02-11T08:00:00+00:00"),
            analysis_json(2, 7, 0.6, "2025-02-11T09:00:00+00:00"),
        ])))
        .mount(&server)
        .await;

    let api = client_for(&server).await;
    let mut detail = ArticleDetailWorkflow::new(7);
    assert_eq!(detail.load(&api).await, Completion::Applied);

    let view = detail.view().unwrap();
    assert!(view.has_analysis());
    assert!(!detail.can_create_analysis());
    let display = view.analysis.as_ref().unwrap();
    assert_eq!(display.credibility_label(), "60/100");
    assert_eq!(display.bias_label(), "50/100");
    assert_eq!(display.source_verification, "Stored Analysis");
}

#[tokio::test]
async fn test_missing_article_ends_in_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/articles/404"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "Article not found"})),
        )
        .mount(&server)
        .await;

    let api = client_for(&server).await;
    let mut detail = ArticleDetailWorkflow::new(404);
    detail.load(&api).await;

    assert_eq!(
        detail.state(),
        &DetailState::NotFound {
            reason: "Article not found".to_string()
        }
    );
    assert!(matches!(
        detail.create_analysis(&api).await,
        Err(WorkflowError::NotLoaded)
    ));
}

#[tokio::test]
async fn test_failed_analyses_fetch_ends_in_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/articles/8"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(article_json(8, "Budget", "Economy", "AP")),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/articles/8/analyses"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"detail": "database offline"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = client_for(&server).await;
    let mut detail = ArticleDetailWorkflow::new(8);
    assert_eq!(
        detail.load(&api).await,
        Completion::Failed("database offline".to_string())
    );

    assert_eq!(
        detail.state(),
        &DetailState::NotFound {
            reason: "database offline".to_string()
        }
    );
    assert!(detail.view().is_none());
    assert!(!detail.can_create_analysis());
}

#[tokio::test]
async fn test_malformed_analyses_end_in_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/articles/8"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(article_json(8, "Budget", "Economy", "AP")),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/articles/8/analyses"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let api = client_for(&server).await;
    let mut detail = ArticleDetailWorkflow::new(8);
    detail.load(&api).await;

    match detail.state() {
        DetailState::NotFound { reason } => assert!(reason.starts_with("Malformed response")),
        other => panic!("expected not found, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_analysis_merges_into_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/articles/9"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(article_json(9, "Budget", "Economy", "AP")),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/articles/9/analyses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .and(query_param("article_id", "9"))
        .and(body_json(json!({"text": null})))
        .respond_with(ResponseTemplate::new(200).set_body_json(analysis_json(
            5,
            9,
            0.45,
            "2025-02-12T10:00:00+00:00",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let api = client_for(&server).await;
    let mut detail = ArticleDetailWorkflow::new(9);
    detail.load(&api).await;
    assert!(detail.can_create_analysis());

    assert_eq!(
        detail.create_analysis(&api).await.unwrap(),
        Completion::Applied
    );
    let view = detail.view().unwrap();
    assert!(view.has_analysis());
    let display = view.analysis.as_ref().unwrap();
    assert_eq!(display.credibility_label(), "45/100");
    assert_eq!(display.bias_label(), "45/100");
    assert_eq!(display.source_verification, "Auto-generated");
    assert!(!detail.can_create_analysis());
}

// ============================================================================
// Analysis Workflow
// ============================================================================

#[tokio::test]
async fn test_text_analysis_rounds_bias_score() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .and(body_json(json!({"text": "Some article text"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": -1,
            "article_id": -1,
            "bias": "true",
            "bias_confidence": 0.736,
            "summary": "Balanced",
            "key_points": [],
            "analyzedAt": "2025-02-12T10:00:00Z"
        })))
        .mount(&server)
        .await;

    let api = client_for(&server).await;
    let mut workflow = AnalysisWorkflow::new();
    assert_eq!(
        workflow.run(&api, "Some article text").await.unwrap(),
        Completion::Applied
    );

    let display = workflow.result().unwrap();
    assert_eq!(display.bias_score, 74.0);
    assert_eq!(display.credibility_label(), "N/A");
    assert_eq!(display.verdict().label(), "Factual");
    assert!(display.is_high_bias());
    assert_eq!(workflow.raw_result().unwrap().article_id, None);
}

#[tokio::test]
async fn test_rejected_analysis_surfaces_detail_and_returns_to_idle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"detail": "text too short"})),
        )
        .mount(&server)
        .await;

    let api = client_for(&server).await;
    let mut workflow = AnalysisWorkflow::new();
    let completion = workflow.run(&api, "hi").await.unwrap();

    assert_eq!(
        completion,
        Completion::Failed("Analysis failed: text too short".to_string())
    );
    assert!(!workflow.is_pending());
    assert!(workflow.result().is_none());
    assert_eq!(workflow.last_error(), Some("Analysis failed: text too short"));
}

#[tokio::test]
async fn test_blank_text_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let api = client_for(&server).await;
    let mut workflow = AnalysisWorkflow::new();
    assert!(matches!(
        workflow.run(&api, "  \n\t ").await,
        Err(WorkflowError::BlankInput)
    ));
}

#[tokio::test]
async fn test_unreachable_service_is_transport_failure() {
    // Nothing listens on the discard port.
    let api = ApiClient::new("http://127.0.0.1:9/api", None).unwrap();
    let err = api.get_article(1).await.unwrap_err();
    assert!(err.is_transport());
    assert!(matches!(err, ApiError::Transport(_)));
}
