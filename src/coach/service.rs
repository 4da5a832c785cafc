//! Session lifecycle: open a thread, ask questions, write the plan.

use std::sync::Arc;
use std::time::Duration;

use crate::error::CoachError;
use crate::flow::{
    NextQuestionRequest, NextQuestionResponse, StartSessionRequest, StartSessionResponse,
};
use crate::intake::Profile;
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider};

use super::CoachConfig;
use super::prompts;
use super::threads::ThreadStore;

/// Name used when the client sends none.
const DEFAULT_NAME: &str = "User";

pub struct CoachService {
    llm: Arc<dyn LlmProvider>,
    threads: Arc<ThreadStore>,
    config: CoachConfig,
}

impl CoachService {
    pub fn new(llm: Arc<dyn LlmProvider>, threads: Arc<ThreadStore>, config: CoachConfig) -> Self {
        Self {
            llm,
            threads,
            config,
        }
    }

    pub fn threads(&self) -> &Arc<ThreadStore> {
        &self.threads
    }

    pub fn config(&self) -> &CoachConfig {
        &self.config
    }

    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }

    /// Open a thread for the profile and ask the first question.
    pub async fn start_session(
        &self,
        request: StartSessionRequest,
    ) -> Result<StartSessionResponse, CoachError> {
        let name = request.name.trim();
        let profile = Profile {
            name: if name.is_empty() { DEFAULT_NAME } else { name }.to_string(),
            location: request.location.trim().to_string(),
            category: request.resolution_type.trim().to_string(),
            sub_category: request.specific_resolution.trim().to_string(),
        };
        tracing::info!(
            category = %profile.category,
            sub_category = %profile.sub_category,
            "Starting session"
        );

        let initial = ChatMessage::user(prompts::initial_message(&profile));
        let instructions = prompts::first_question_instructions(&profile);
        let thread_id = self.threads.create(profile, initial).await;

        let question = self.ask_question(&thread_id, instructions).await?;
        Ok(StartSessionResponse {
            thread_id: Some(thread_id),
            question: Some(question),
            question_number: Some(1),
            error: None,
        })
    }

    /// Record an answer, then ask the next question or write the plan.
    ///
    /// `question_number` is the zero-based number of the question answered.
    /// The response echoes `question_number + 1`, which existing clients
    /// expect; the prompt asks for the 1-based question `question_number + 2`.
    pub async fn next_question(
        &self,
        request: NextQuestionRequest,
    ) -> Result<NextQuestionResponse, CoachError> {
        let thread_id = request
            .thread_id
            .filter(|id| !id.trim().is_empty())
            .ok_or(CoachError::MissingThreadId)?;
        let answered = request.question_number;
        tracing::info!(thread_id = %thread_id, question_number = answered, "Answer received");

        self.threads
            .append(&thread_id, ChatMessage::user(request.answer))
            .await?;

        if (answered as usize).saturating_add(1) >= self.config.max_questions {
            tracing::info!(thread_id = %thread_id, "Final answer received, generating resolution");
            return self.generate_resolution(&thread_id).await;
        }

        let question = self
            .ask_question(
                &thread_id,
                prompts::next_question_instructions(answered.saturating_add(2)),
            )
            .await?;
        Ok(NextQuestionResponse::question(
            question,
            answered.saturating_add(1),
            &thread_id,
        ))
    }

    /// Write the resolution plan from everything in the thread.
    pub async fn generate_resolution(
        &self,
        thread_id: &str,
    ) -> Result<NextQuestionResponse, CoachError> {
        let thread = self.threads.get(thread_id).await?;

        let mut messages = Vec::with_capacity(thread.messages.len() + 2);
        messages.push(ChatMessage::system(prompts::RESOLUTION_COACH_PROMPT));
        messages.extend(thread.messages);
        messages.push(ChatMessage::system(prompts::RESOLUTION_INSTRUCTIONS));

        let request = CompletionRequest::new(messages)
            .with_temperature(self.config.temperature)
            .with_max_tokens(self.config.resolution_max_tokens);
        let text = self
            .complete(request, self.config.resolution_timeout)
            .await?;

        let resolution = text.replace("\\*", "*");
        if resolution.trim().is_empty() {
            return Err(CoachError::EmptyResolution);
        }
        self.threads
            .append(thread_id, ChatMessage::assistant(resolution.clone()))
            .await?;

        tracing::info!(thread_id = %thread_id, len = resolution.len(), "Resolution generated");
        Ok(NextQuestionResponse::resolution(resolution, thread_id))
    }

    async fn ask_question(&self, thread_id: &str, instructions: String) -> Result<String, CoachError> {
        let thread = self.threads.get(thread_id).await?;

        let mut messages = Vec::with_capacity(thread.messages.len() + 2);
        messages.push(ChatMessage::system(prompts::QUESTION_COACH_PROMPT));
        messages.extend(thread.messages);
        messages.push(ChatMessage::system(instructions));

        let request = CompletionRequest::new(messages)
            .with_temperature(self.config.temperature)
            .with_max_tokens(self.config.question_max_tokens);
        let raw = self.complete(request, self.config.question_timeout).await?;
        if raw.trim().is_empty() {
            return Err(CoachError::EmptyQuestion);
        }

        let question = prompts::normalize_question(&raw, self.config.question_word_limit);
        self.threads
            .append(thread_id, ChatMessage::assistant(question.clone()))
            .await?;
        tracing::debug!(thread_id = %thread_id, question = %question, "Question generated");
        Ok(question)
    }

    async fn complete(&self, request: CompletionRequest, limit: Duration) -> Result<String, CoachError> {
        let response = tokio::time::timeout(limit, self.llm.complete(request))
            .await
            .map_err(|_| {
                tracing::warn!(after = ?limit, "Assistant response took too long");
                CoachError::Timeout { after: limit }
            })??;
        Ok(response.content)
    }
}
