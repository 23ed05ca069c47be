use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use question_uploader::{QuestionApi, QuestionRecord, UploadError};
use secrecy::SecretString;
use serde_json::{json, Value};
use url::Url;

#[derive(Clone, Default)]
struct Hits(Arc<AtomicUsize>);

impl Hits {
    fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

async fn serve(router: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    Url::parse(&format!("http://{addr}/api")).unwrap()
}

fn record(text: &str) -> QuestionRecord {
    serde_json::from_value(json!({
        "question_type_id": "qt_single",
        "category_id": "cat_objective",
        "question_text": text,
        "concepts": [],
        "difficulty_level": 1,
        "max_score": 1.0,
        "time_limit": 60,
        "options": [{"text": "Paris", "is_correct": true, "order": 1}],
        "correct_answers": ["Paris"]
    }))
    .unwrap()
}

async fn accept_all(State(hits): State<Hits>, Json(body): Json<Vec<Value>>) -> Json<Value> {
    hits.0.fetch_add(1, Ordering::SeqCst);

    Json(json!({"success": true, "data": body}))
}

#[tokio::test]
async fn submits_batch_and_reports_count() {
    let hits = Hits::default();
    let router = Router::new()
        .route("/api/questions/bulk", post(accept_all))
        .with_state(hits.clone());
    let api = QuestionApi::new(serve(router).await, None).unwrap();

    let summary = api.submit(&[record("One"), record("Two")]).await.unwrap();

    assert_eq!(summary.created, 2);
    assert_eq!(summary.message(), "2 questions added");
    assert_eq!(hits.count(), 1);
}

#[tokio::test]
async fn empty_batch_never_reaches_the_server() {
    let hits = Hits::default();
    let router = Router::new()
        .route("/api/questions/bulk", post(accept_all))
        .with_state(hits.clone());
    let api = QuestionApi::new(serve(router).await, None).unwrap();

    let err = api.submit(&[]).await.unwrap_err();

    assert!(matches!(err, UploadError::NoValidQuestions));
    assert_eq!(err.to_string(), "No valid questions found");
    assert_eq!(hits.count(), 0);
}

#[tokio::test]
async fn validation_errors_surface_server_detail() {
    let router = Router::new().route(
        "/api/questions/bulk",
        post(|| async {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "detail": [{"loc": ["body", 0, "category_id"], "msg": "unknown category"}]
                })),
            )
        }),
    );
    let api = QuestionApi::new(serve(router).await, None).unwrap();

    let err = api.submit(&[record("One")]).await.unwrap_err();

    match err {
        UploadError::Rejected { status, message } => {
            assert_eq!(status, 422);
            assert_eq!(message, "body.0.category_id: unknown category");
        }
        other => panic!("expected a rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn opaque_failures_use_generic_message() {
    let router = Router::new().route(
        "/api/questions/bulk",
        post(|| async { (StatusCode::BAD_GATEWAY, "upstream went away") }),
    );
    let api = QuestionApi::new(serve(router).await, None).unwrap();

    let err = api.submit(&[record("One")]).await.unwrap_err();

    assert_eq!(err.to_string(), "Failed to upload questions");
}

#[tokio::test]
async fn success_flag_false_is_a_failure() {
    let router = Router::new().route(
        "/api/questions/bulk",
        post(|| async { Json(json!({"success": false, "message": "Duplicate questions"})) }),
    );
    let api = QuestionApi::new(serve(router).await, None).unwrap();

    let err = api.submit(&[record("One")]).await.unwrap_err();

    assert!(matches!(err, UploadError::Rejected { status: 200, .. }));
    assert_eq!(err.to_string(), "Duplicate questions");
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let api = QuestionApi::new(Url::parse(&format!("http://{addr}/")).unwrap(), None).unwrap();

    let err = api.submit(&[record("One")]).await.unwrap_err();

    assert!(matches!(err, UploadError::Transport(_)));
}

#[tokio::test]
async fn fetches_catalog_with_token_from_loose_listings() {
    let router = Router::new()
        .route(
            "/api/question-types",
            get(|headers: HeaderMap| async move {
                let authorized = headers
                    .get("authorization")
                    .and_then(|value| value.to_str().ok())
                    == Some("Bearer s3cret");
                if !authorized {
                    return (StatusCode::UNAUTHORIZED, Json(json!({"detail": "Not authenticated"})));
                }

                (
                    StatusCode::OK,
                    Json(json!({"data": {"items": [
                        {"id": "qt_single", "label": "Single Choice", "code": "single_choice", "category_id": "cat_objective"}
                    ]}})),
                )
            }),
        )
        .route(
            "/api/categories",
            get(|| async { Json(json!([{"id": 4, "label": "Objective", "code": "objective"}])) }),
        );
    let base = serve(router).await;

    let api = QuestionApi::new(base.clone(), Some(SecretString::new("s3cret".to_owned()))).unwrap();
    let catalog = api.fetch_catalog().await.unwrap();

    assert_eq!(catalog.question_types[0].id, "qt_single");
    assert_eq!(catalog.categories[0].id, "4");

    let anonymous = QuestionApi::new(base, None).unwrap();
    let err = anonymous.fetch_catalog().await.unwrap_err();
    assert_eq!(err.to_string(), "Not authenticated");
}
