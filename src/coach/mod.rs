//! Coach server: the service behind `/start_session` and
//! `/get_next_question`.
//!
//! Each session is a conversation thread. Questions come from the question
//! coach prompt; once enough answers are in, the resolution coach writes the
//! plan from the whole thread.

pub mod prompts;
pub mod routes;
pub mod service;
pub mod threads;

pub use routes::{CoachRouteState, coach_routes};
pub use service::CoachService;
pub use threads::{Thread, ThreadStore, spawn_prune_task};

use std::time::Duration;

/// Question and resolution generation settings.
#[derive(Debug, Clone)]
pub struct CoachConfig {
    /// Questions asked before the plan is generated.
    pub max_questions: usize,
    pub question_timeout: Duration,
    pub resolution_timeout: Duration,
    /// Longest question kept, in words, type tag included.
    pub question_word_limit: usize,
    /// Threads untouched for this long are dropped.
    pub max_idle: Duration,
    pub temperature: f32,
    pub question_max_tokens: u32,
    pub resolution_max_tokens: u32,
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            max_questions: 10,
            question_timeout: Duration::from_secs(30),
            resolution_timeout: Duration::from_secs(60),
            question_word_limit: 20,
            max_idle: Duration::from_secs(2 * 60 * 60),
            temperature: 0.7,
            question_max_tokens: 150,
            resolution_max_tokens: 3000,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::error::LlmError;
    use crate::llm::{CompletionRequest, CompletionResponse, FinishReason, LlmProvider};

    /// Replays scripted completions and records every request.
    #[derive(Default)]
    pub struct StubLlm {
        pub replies: Mutex<VecDeque<Result<String, LlmError>>>,
        pub requests: Mutex<Vec<CompletionRequest>>,
        pub delay: Option<Duration>,
    }

    impl StubLlm {
        pub fn with_replies<I, S>(replies: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self {
                replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
                ..Default::default()
            }
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        pub fn last_request(&self) -> Option<CompletionRequest> {
            self.requests.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl LlmProvider for StubLlm {
        fn model_name(&self) -> &str {
            "stub"
        }

        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            self.requests.lock().unwrap().push(request);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let reply = self.replies.lock().unwrap().pop_front().unwrap_or_else(|| {
                Err(LlmError::InvalidResponse {
                    provider: "stub".to_string(),
                    reason: "no scripted reply".to_string(),
                })
            })?;
            Ok(CompletionResponse {
                content: reply,
                input_tokens: 0,
                output_tokens: 0,
                finish_reason: FinishReason::Stop,
            })
        }
    }
}
