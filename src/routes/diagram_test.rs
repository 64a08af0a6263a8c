use super::*;
use crate::llm::LlmChat;
use crate::llm::types::{ChatResponse, ContentBlock, LlmError, Message};
use crate::state::test_helpers;
use serde_json::Value;
use std::sync::{Arc, Mutex};

struct MockLlm {
    response: Mutex<Option<Result<ChatResponse, LlmError>>>,
    calls: Mutex<usize>,
}

impl MockLlm {
    fn new(response: Result<ChatResponse, LlmError>) -> Arc<Self> {
        Arc::new(Self { response: Mutex::new(Some(response)), calls: Mutex::new(0) })
    }

    fn replying(text: &str) -> Arc<Self> {
        Self::new(Ok(ChatResponse {
            content: vec![ContentBlock::Text { text: text.into() }],
            model: "mock".into(),
            stop_reason: "end_turn".into(),
            input_tokens: 0,
            output_tokens: 0,
        }))
    }

    fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl LlmChat for MockLlm {
    async fn chat(&self, _messages: &[Message]) -> Result<ChatResponse, LlmError> {
        *self.calls.lock().unwrap() += 1;
        self.response
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Err(LlmError::EmptyResponse))
    }
}

async fn post(llm: Arc<MockLlm>, body: &str) -> (StatusCode, Value) {
    let state = test_helpers::test_app_state_with_llm(llm);
    let response = generate_diagram(State(state), Bytes::from(body.to_string()))
        .await
        .into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// =============================================================================
// Success
// =============================================================================

#[tokio::test]
async fn returns_mermaid_syntax() {
    let llm = MockLlm::replying("```mermaid\nflowchart TD\n  A[\"Start\"] --> B[End]\n```");
    let (status, body) = post(llm, r#"{"prompt":"start then end","diagram_type":"flowchart"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "mermaid_syntax": "flowchart TD\n  A[Start] --> B[End]" }));
}

#[tokio::test]
async fn accepts_description_and_category_aliases() {
    let llm = MockLlm::replying("sequenceDiagram\n  A->>B: hi");
    let (status, _) = post(llm, r#"{"description":"A greets B","category":"sequenceDiagram"}"#).await;
    assert_eq!(status, StatusCode::OK);
}

#[test]
fn missing_or_null_diagram_type_defaults_to_flowchart() {
    let request = decode_body(br#"{"prompt":"x"}"#).unwrap();
    assert_eq!(request.category, "flowchart");
    let request = decode_body(br#"{"prompt":"x","diagram_type":null}"#).unwrap();
    assert_eq!(request.category, "flowchart");
}

// =============================================================================
// Bad request
// =============================================================================

#[tokio::test]
async fn malformed_json_is_bad_request_without_backend_call() {
    let llm = MockLlm::replying("graph TD");
    let (status, body) = post(llm.clone(), r#"{"prompt": "#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E_MALFORMED_BODY");
    assert!(body["detail"].as_str().unwrap().starts_with("malformed request body"));
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn missing_prompt_is_invalid_input() {
    let llm = MockLlm::replying("graph TD");
    let (status, body) = post(llm.clone(), r#"{"diagram_type":"flowchart"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E_INVALID_INPUT");
    assert!(body["detail"].as_str().unwrap().contains("prompt"));
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn wrong_shape_is_invalid_input_not_malformed() {
    for raw in ["42", "[]", r#"{"prompt": 7}"#] {
        let (status, body) = post(MockLlm::replying("graph TD"), raw).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {raw}");
        assert_eq!(body["code"], "E_INVALID_INPUT", "body {raw}");
    }
}

#[tokio::test]
async fn unsupported_category_is_bad_request() {
    let llm = MockLlm::replying("graph TD");
    let (status, body) = post(llm.clone(), r#"{"prompt":"x","diagram_type":"gantt"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "unsupported diagram category: gantt");
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn validator_rejection_is_bad_request() {
    let llm = MockLlm::replying("Here is your diagram: flowchart TD...");
    let (status, body) = post(llm, r#"{"prompt":"x"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Output must be valid Mermaid syntax");
    assert_eq!(body["retryable"], false);
}

// =============================================================================
// Server error
// =============================================================================

#[tokio::test]
async fn backend_failure_is_server_error_with_message() {
    let llm = MockLlm::new(Err(LlmError::ApiResponse { status: 401, body: "invalid api key".into() }));
    let (status, body) = post(llm, r#"{"prompt":"x"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "E_BACKEND_FAILURE");
    assert!(body["detail"].as_str().unwrap().contains("invalid api key"));
}

#[tokio::test]
async fn transport_failure_is_marked_retryable() {
    let llm = MockLlm::new(Err(LlmError::ApiRequest("connection reset".into())));
    let (status, body) = post(llm, r#"{"prompt":"x"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["retryable"], true);
}
