use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum_test::TestServer;
use onwave::catalog::{self, QuizOption};
use onwave::constants::{ANALYZING_MESSAGE, KICKOFF_MESSAGE};
use onwave::inference::{CompletionShape, HttpInferenceClient, InferenceClient, InferenceError};
use onwave::resolver::Resolver;
use onwave::web_server::{router, AppState};
use serde_json::{json, Value};
use tokio::sync::Notify;
use tower::ServiceExt;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

struct AlwaysDown;

#[async_trait]
impl InferenceClient for AlwaysDown {
    async fn complete(&self, _prompt: &str) -> Result<CompletionShape, InferenceError> {
        Err(InferenceError::Status { status: 503, body: "down".to_string() })
    }
}

fn test_server(resolver: Resolver) -> TestServer {
    TestServer::new(router(AppState::new(resolver))).unwrap()
}

async fn create_session(server: &TestServer) -> String {
    let res = server.post("/api/sessions").await;
    res.assert_status(StatusCode::CREATED);
    let snapshot: Value = res.json();
    snapshot["id"].as_str().unwrap().to_string()
}

fn first_value(options: &[QuizOption]) -> &'static str {
    options[0].value
}

// Answers every question with its first option, committing multi-selects.
async fn complete_questionnaire(server: &TestServer, id: &str) -> Value {
    let mut snapshot = Value::Null;
    for question in catalog::SECTIONS.iter().flat_map(|s| s.questions.iter()) {
        let value = first_value(question.options);
        snapshot = if question.is_multi_select() {
            server
                .post(&format!("/api/sessions/{}/toggle", id))
                .json(&json!({ "value": value }))
                .await
                .json::<Value>();
            server.post(&format!("/api/sessions/{}/continue", id)).await.json()
        } else {
            server
                .post(&format!("/api/sessions/{}/answer", id))
                .json(&json!({ "value": value }))
                .await
                .json()
        };
    }
    snapshot
}

#[tokio::test]
async fn test_catalog_endpoint() {
    let server = test_server(Resolver::new(Arc::new(AlwaysDown)));
    let catalog: Value = server.get("/api/catalog").await.json();

    let sections = catalog.as_array().unwrap();
    assert_eq!(sections.len(), 5);
    assert_eq!(sections[0]["title"], "Startup Basics");
    assert_eq!(sections[0]["questions"][0]["id"], "fundingStage");
    assert_eq!(sections[1]["questions"][0]["maxSelections"], 3);
}

#[tokio::test]
async fn test_full_questionnaire_with_model_reply() {
    let model = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "generated_text": "<s>[INST] ... [/INST] 1. Support bots with Intercom Fin.</s>" }])),
        )
        .expect(1)
        .mount(&model)
        .await;
    let client = HttpInferenceClient::new(model.uri()).with_api_key("k");
    let server = test_server(Resolver::new(Arc::new(client)));
    let id = create_session(&server).await;

    let snapshot = complete_questionnaire(&server, &id).await;

    assert_eq!(snapshot["quizCompleted"], true);
    assert_eq!(snapshot["initialResponseGenerated"], true);
    assert!(snapshot["currentQuestion"].is_null());
    assert_eq!(snapshot["progress"]["completed"], 18);
    assert_eq!(snapshot["profile"]["fundingStage"], "bootstrapped");
    assert_eq!(snapshot["profile"]["currentChallenges"], json!(["userAcquisition"]));

    let transcript = snapshot["transcript"].as_array().unwrap();
    assert_eq!(transcript.len(), 3);
    assert_eq!(transcript[0]["content"], ANALYZING_MESSAGE);
    assert_eq!(transcript[1]["role"], "user");
    assert_eq!(transcript[1]["content"], KICKOFF_MESSAGE);
    assert_eq!(transcript[2]["content"], "1. Support bots with Intercom Fin.");
}

#[tokio::test]
async fn test_chat_falls_back_when_model_is_down() {
    let server = test_server(Resolver::new(Arc::new(AlwaysDown)));
    let id = create_session(&server).await;

    let reply: Value = server
        .post(&format!("/api/sessions/{}/messages", id))
        .json(&json!({ "content": "Any suggestion?" }))
        .await
        .json();
    assert_eq!(reply["role"], "assistant");
    assert!(reply["content"].as_str().unwrap().contains("Project Management AI"));

    let snapshot: Value = server.get(&format!("/api/sessions/{}", id)).await.json();
    assert_eq!(snapshot["transcript"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_invalid_input_is_rejected() {
    let server = test_server(Resolver::new(Arc::new(AlwaysDown)));
    let id = create_session(&server).await;

    let res = server
        .post(&format!("/api/sessions/{}/answer", id))
        .json(&json!({ "value": "unicorn" }))
        .await;
    res.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json();
    assert!(body["error"].as_str().unwrap().contains("unicorn"));

    server
        .post(&format!("/api/sessions/{}/continue", id))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    server
        .post(&format!("/api/sessions/{}/messages", id))
        .json(&json!({ "content": "   " }))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_unknown_session() {
    let server = test_server(Resolver::new(Arc::new(AlwaysDown)));
    server
        .get(&format!("/api/sessions/{}", uuid::Uuid::new_v4()))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_body_gets_json_error() {
    let server = test_server(Resolver::new(Arc::new(AlwaysDown)));
    let id = create_session(&server).await;

    let res = server
        .post(&format!("/api/sessions/{}/answer", id))
        .json(&json!({ "val": "seed" }))
        .await;
    res.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json();
    assert!(body["error"].as_str().unwrap().contains("missing field `value`"));

    let res = server
        .post(&format!("/api/sessions/{}/messages", id))
        .text("not json")
        .await;
    res.assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let body: Value = res.json();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_delete_ends_session() {
    let server = test_server(Resolver::new(Arc::new(AlwaysDown)));
    let id = create_session(&server).await;

    server
        .delete(&format!("/api/sessions/{}", id))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .get(&format!("/api/sessions/{}", id))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let res = server.delete(&format!("/api/sessions/{}", id)).await;
    res.assert_status(StatusCode::NOT_FOUND);
    let body: Value = res.json();
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn test_back_and_resets() {
    let server = test_server(Resolver::new(Arc::new(AlwaysDown)));
    let id = create_session(&server).await;

    server
        .post(&format!("/api/sessions/{}/answer", id))
        .json(&json!({ "value": "seed" }))
        .await
        .assert_status_ok();
    let snapshot: Value = server.post(&format!("/api/sessions/{}/back", id)).await.json();
    assert_eq!(snapshot["currentQuestion"]["id"], "fundingStage");
    assert_eq!(snapshot["profile"]["fundingStage"], "seed");

    server
        .post(&format!("/api/sessions/{}/messages", id))
        .json(&json!({ "content": "hello" }))
        .await
        .assert_status_ok();

    let snapshot: Value = server.post(&format!("/api/sessions/{}/reset-quiz", id)).await.json();
    assert_eq!(snapshot["profile"]["fundingStage"], "");
    assert_eq!(snapshot["transcript"].as_array().unwrap().len(), 2);

    let snapshot: Value = server.post(&format!("/api/sessions/{}/reset-chat", id)).await.json();
    assert!(snapshot["transcript"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_toggle_reports_pending_selection() {
    let server = test_server(Resolver::new(Arc::new(AlwaysDown)));
    let id = create_session(&server).await;
    for value in ["seed", "micro", "saas", "mvp"] {
        server
            .post(&format!("/api/sessions/{}/answer", id))
            .json(&json!({ "value": value }))
            .await
            .assert_status_ok();
    }

    let mut snapshot = Value::Null;
    for value in ["hiring", "fundraising", "regulation", "operations"] {
        snapshot = server
            .post(&format!("/api/sessions/{}/toggle", id))
            .json(&json!({ "value": value }))
            .await
            .json();
    }
    assert_eq!(snapshot["pendingSelections"], json!(["fundraising", "regulation", "operations"]));
    assert_eq!(snapshot["progress"]["completed"], 4);
}

struct Gate {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

#[async_trait]
impl InferenceClient for Gate {
    async fn complete(&self, _prompt: &str) -> Result<CompletionShape, InferenceError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(CompletionShape::Text("done".to_string()))
    }
}

#[tokio::test]
async fn test_second_submission_while_pending_is_rejected() {
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let gate = Gate { entered: entered.clone(), release: release.clone() };
    let app = router(AppState::new(Resolver::new(Arc::new(gate))));

    let res = app
        .clone()
        .oneshot(Request::post("/api/sessions").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let snapshot: Value = serde_json::from_slice(&bytes).unwrap();
    let id = snapshot["id"].as_str().unwrap().to_string();

    let message = || {
        Request::post(format!("/api/sessions/{}/messages", id))
            .header("content-type", "application/json")
            .body(Body::from(r#"{"content":"hello"}"#))
            .unwrap()
    };

    let pending = tokio::spawn(app.clone().oneshot(message()));
    entered.notified().await;

    let res = app.clone().oneshot(message()).await.unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    release.notify_one();
    let res = pending.await.unwrap().unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}
