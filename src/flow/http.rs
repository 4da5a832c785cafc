//! `SessionTransport` over HTTP.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::FlowError;

use super::transport::{
    NextQuestionRequest, NextQuestionResponse, SessionTransport, StartSessionRequest,
    StartSessionResponse,
};

pub const START_SESSION_PATH: &str = "/start_session";
pub const NEXT_QUESTION_PATH: &str = "/get_next_question";
/// Older name for [`NEXT_QUESTION_PATH`], still served.
pub const LEGACY_NEXT_QUESTION_PATH: &str = "/submit_answer";

/// Talks to a coach server with JSON POSTs.
#[derive(Debug, Clone)]
pub struct HttpSessionTransport {
    client: reqwest::Client,
    base_url: String,
    next_question_path: &'static str,
}

impl HttpSessionTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            next_question_path: NEXT_QUESTION_PATH,
        }
    }

    /// Send answers to `/submit_answer` instead of `/get_next_question`.
    pub fn with_legacy_submit_path(mut self, legacy: bool) -> Self {
        self.next_question_path = if legacy {
            LEGACY_NEXT_QUESTION_PATH
        } else {
            NEXT_QUESTION_PATH
        };
        self
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, FlowError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| FlowError::Transport(format!("POST {path} failed: {e}")))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FlowError::Transport(format!("Failed to read {path} response: {e}")))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<serde_json::Value>(&bytes)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string));
            tracing::warn!(path = path, status = %status, "Coach server returned an error");
            return Err(match message {
                Some(message) => FlowError::ServerReported(message),
                None => FlowError::Transport(format!("{path} returned HTTP {status}")),
            });
        }

        serde_json::from_slice(&bytes)
            .map_err(|e| FlowError::Transport(format!("Malformed {path} response: {e}")))
    }
}

#[async_trait]
impl SessionTransport for HttpSessionTransport {
    async fn start_session(
        &self,
        request: &StartSessionRequest,
    ) -> Result<StartSessionResponse, FlowError> {
        self.post(START_SESSION_PATH, request).await
    }

    async fn next_question(
        &self,
        request: &NextQuestionRequest,
    ) -> Result<NextQuestionResponse, FlowError> {
        self.post(self.next_question_path, request).await
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn next_request() -> NextQuestionRequest {
        NextQuestionRequest {
            thread_id: Some("thread_1".to_string()),
            answer: "Yes".to_string(),
            question_number: 0,
        }
    }

    #[tokio::test]
    async fn posts_camel_case_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/get_next_question"))
            .and(body_json(serde_json::json!({
                "threadId": "thread_1",
                "answer": "Yes",
                "questionNumber": 0
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "question": "[TEXT] Why?",
                "questionNumber": 2,
                "threadId": "thread_1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpSessionTransport::new(server.uri());
        let response = transport.next_question(&next_request()).await.unwrap();
        assert_eq!(response.question.as_deref(), Some("[TEXT] Why?"));
        assert_eq!(response.question_number, Some(2));
    }

    #[tokio::test]
    async fn legacy_path_is_used_when_asked() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/submit_answer"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"resolution": "# Plan", "isComplete": true})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpSessionTransport::new(format!("{}/", server.uri()))
            .with_legacy_submit_path(true);
        let response = transport.next_question(&next_request()).await.unwrap();
        assert!(response.is_terminal());
    }

    #[tokio::test]
    async fn error_status_with_body_is_server_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/start_session"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(serde_json::json!({"error": "Assistant unavailable"})),
            )
            .mount(&server)
            .await;

        let transport = HttpSessionTransport::new(server.uri());
        let request = StartSessionRequest {
            name: "Ana".into(),
            location: "Rome".into(),
            resolution_type: "Health & Fitness".into(),
            specific_resolution: "Start a Consistent Exercise Routine".into(),
        };
        let err = transport.start_session(&request).await.unwrap_err();
        assert_eq!(err, FlowError::ServerReported("Assistant unavailable".into()));
    }

    #[tokio::test]
    async fn error_status_without_body_is_transport() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let transport = HttpSessionTransport::new(server.uri());
        let err = transport.next_question(&next_request()).await.unwrap_err();
        assert!(matches!(err, FlowError::Transport(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_transport() {
        // Nothing listens on port 9 locally.
        let transport = HttpSessionTransport::new("http://127.0.0.1:9");
        let err = transport.next_question(&next_request()).await.unwrap_err();
        assert!(matches!(err, FlowError::Transport(_)));
    }
}
