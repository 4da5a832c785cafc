//! The question-flow engine.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::error::FlowError;
use crate::intake::Profile;
use crate::question::{self, Question};

use super::session::Session;
use super::state::FlowState;
use super::transport::{NextQuestionRequest, SessionTransport, StartSessionRequest};

/// Engine settings.
#[derive(Debug, Clone, Default)]
pub struct FlowConfig {
    /// Upper bound for each request. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

/// Drives one questionnaire against a [`SessionTransport`].
pub struct QuestionFlowEngine {
    transport: Arc<dyn SessionTransport>,
    config: FlowConfig,
    state: FlowState,
    session: Session,
}

impl QuestionFlowEngine {
    pub fn new(transport: Arc<dyn SessionTransport>) -> Self {
        Self::with_config(transport, FlowConfig::default())
    }

    pub fn with_config(transport: Arc<dyn SessionTransport>, config: FlowConfig) -> Self {
        Self {
            transport,
            config,
            state: FlowState::default(),
            session: Session::default(),
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.state.question()
    }

    /// Open a session for `profile` and wait for the first question.
    pub async fn start(&mut self, profile: &Profile) -> Result<&FlowState, FlowError> {
        self.transition(FlowState::AwaitingFirstQuestion, "start")?;
        tracing::info!(category = %profile.category, "Starting coaching session");

        let request = StartSessionRequest::from(profile);
        let outcome = with_timeout(
            self.config.request_timeout,
            self.transport.start_session(&request),
        )
        .await;
        let response = match outcome {
            Ok(response) => response,
            Err(e) => return Err(self.fail(e)),
        };

        if let Some(error) = response.error {
            return Err(self.fail(FlowError::ServerReported(error)));
        }
        self.session.adopt_id(response.thread_id);

        match response.question.filter(|q| !q.trim().is_empty()) {
            Some(raw) => {
                self.receive_question(&raw)?;
                Ok(&self.state)
            }
            None => Err(self.fail(FlowError::Transport(
                "Session started without a question".to_string(),
            ))),
        }
    }

    /// Parse a raw tagged question and present it.
    pub fn receive_question(&mut self, raw: &str) -> Result<&Question, FlowError> {
        let question = question::parse(raw);
        self.transition(FlowState::AwaitingAnswer(question), "receive a question")?;
        tracing::debug!(
            index = self.session.current_question_index,
            "Awaiting answer"
        );
        self.state
            .question()
            .ok_or_else(|| FlowError::InvalidTransition {
                state: self.state.to_string(),
                action: "receive a question".to_string(),
            })
    }

    /// Answer the current question and fetch whatever comes next.
    ///
    /// Invalid answers are rejected without touching the session or the
    /// network. Otherwise exactly one request is issued.
    pub async fn submit_answer(&mut self, value: &str) -> Result<&FlowState, FlowError> {
        let Some(question) = self.state.question() else {
            return Err(FlowError::InvalidTransition {
                state: self.state.to_string(),
                action: "submit an answer".to_string(),
            });
        };
        let answer = question
            .validate_answer(value)
            .map_err(|reason| FlowError::InvalidAnswer { reason })?;

        let question_number = self.session.record_answer(answer.clone());
        tracing::info!(
            session_id = self.session.session_id.as_deref().unwrap_or("-"),
            question_number,
            "Answer submitted"
        );

        let request = NextQuestionRequest {
            thread_id: self.session.session_id.clone(),
            answer,
            question_number,
        };
        let outcome = with_timeout(
            self.config.request_timeout,
            self.transport.next_question(&request),
        )
        .await;
        let response = match outcome {
            Ok(response) => response,
            Err(e) => return Err(self.fail(e)),
        };

        if let Some(error) = response.error.clone() {
            return Err(self.fail(FlowError::ServerReported(error)));
        }
        self.session.adopt_id(response.thread_id.clone());

        if response.is_terminal() {
            let resolution = response.resolution.flatten().unwrap_or_default();
            if resolution.trim().is_empty() {
                return Err(self.fail(FlowError::EmptyResult));
            }
            tracing::info!(answers = self.session.answers.len(), "Resolution received");
            self.transition(FlowState::Terminal(resolution), "finish")?;
            return Ok(&self.state);
        }

        match response.question.filter(|q| !q.trim().is_empty()) {
            Some(raw) => {
                self.receive_question(&raw)?;
                Ok(&self.state)
            }
            None => Err(self.fail(FlowError::Transport(
                "Response contained neither a question nor a resolution".to_string(),
            ))),
        }
    }

    /// Discard the session and go back to the beginning.
    pub fn restart(&mut self) {
        tracing::info!(from = %self.state, "Restarting questionnaire");
        self.state = FlowState::Idle;
        self.session = Session::default();
    }

    fn transition(&mut self, target: FlowState, action: &str) -> Result<(), FlowError> {
        if !self.state.can_transition_to(&target) {
            return Err(FlowError::InvalidTransition {
                state: self.state.to_string(),
                action: action.to_string(),
            });
        }
        self.state = target;
        Ok(())
    }

    fn fail(&mut self, error: FlowError) -> FlowError {
        tracing::error!(error = %error, state = %self.state, "Question flow failed");
        if !self.state.is_terminal() {
            self.state = FlowState::Failed(error.to_string());
        }
        error
    }
}

async fn with_timeout<T, F>(limit: Option<Duration>, request: F) -> Result<T, FlowError>
where
    F: Future<Output = Result<T, FlowError>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, request)
            .await
            .map_err(|_| FlowError::Transport(format!("Request timed out after {limit:?}")))?,
        None => request.await,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::flow::transport::{NextQuestionResponse, StartSessionResponse};
    use crate::question::{AnswerDraft, InputControl, QuestionKind};

    /// Transport that replays scripted responses and records every request.
    #[derive(Default)]
    struct ScriptedTransport {
        start: Mutex<VecDeque<Result<StartSessionResponse, FlowError>>>,
        next: Mutex<VecDeque<Result<NextQuestionResponse, FlowError>>>,
        start_calls: Mutex<Vec<StartSessionRequest>>,
        next_calls: Mutex<Vec<NextQuestionRequest>>,
        delay: Option<Duration>,
    }

    impl ScriptedTransport {
        fn with_first_question(raw: &str) -> Self {
            let t = Self::default();
            t.start.lock().unwrap().push_back(Ok(StartSessionResponse {
                thread_id: Some("thread_abc".to_string()),
                question: Some(raw.to_string()),
                question_number: Some(1),
                error: None,
            }));
            t
        }

        fn then(self, response: Result<NextQuestionResponse, FlowError>) -> Self {
            self.next.lock().unwrap().push_back(response);
            self
        }

        fn requests(&self) -> usize {
            self.start_calls.lock().unwrap().len() + self.next_calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl SessionTransport for ScriptedTransport {
        async fn start_session(
            &self,
            request: &StartSessionRequest,
        ) -> Result<StartSessionResponse, FlowError> {
            self.start_calls.lock().unwrap().push(request.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.start
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(FlowError::Transport("no scripted response".into())))
        }

        async fn next_question(
            &self,
            request: &NextQuestionRequest,
        ) -> Result<NextQuestionResponse, FlowError> {
            self.next_calls.lock().unwrap().push(request.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.next
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(FlowError::Transport("no scripted response".into())))
        }
    }

    fn ana() -> Profile {
        Profile {
            name: "Ana".to_string(),
            location: "Rome".to_string(),
            category: "Health & Fitness".to_string(),
            sub_category: "Start a Consistent Exercise Routine".to_string(),
        }
    }

    fn engine(transport: &Arc<ScriptedTransport>) -> QuestionFlowEngine {
        QuestionFlowEngine::new(transport.clone())
    }

    #[tokio::test]
    async fn start_sends_profile_once_and_awaits_answer() {
        let transport = Arc::new(ScriptedTransport::with_first_question(
            "[YES/NO] Do you exercise weekly?",
        ));
        let mut engine = engine(&transport);

        engine.start(&ana()).await.unwrap();

        let calls = transport.start_calls.lock().unwrap().clone();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            StartSessionRequest {
                name: "Ana".into(),
                location: "Rome".into(),
                resolution_type: "Health & Fitness".into(),
                specific_resolution: "Start a Consistent Exercise Routine".into(),
            }
        );
        let question = engine.current_question().unwrap();
        assert_eq!(question.kind, QuestionKind::YesNo);
        assert_eq!(engine.session().session_id.as_deref(), Some("thread_abc"));
    }

    #[tokio::test]
    async fn yes_no_click_submits_exactly_once() {
        let transport = Arc::new(
            ScriptedTransport::with_first_question("[YES/NO] Do you exercise weekly?").then(Ok(
                NextQuestionResponse::question(
                    "[CHOICE] When could you train? (Mornings, Evenings, or Weekends)",
                    2,
                    "thread_abc",
                ),
            )),
        );
        let mut engine = engine(&transport);
        engine.start(&ana()).await.unwrap();

        let mut draft = AnswerDraft::new(engine.current_question().unwrap());
        assert_eq!(draft.control().buttons(), ["Yes", "No"]);
        assert!(draft.select("No"));
        let answer = draft.continue_answer().unwrap();
        engine.submit_answer(&answer).await.unwrap();

        let calls = transport.next_calls.lock().unwrap().clone();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].answer, "No");
        assert_eq!(calls[0].question_number, 0);
        assert_eq!(calls[0].thread_id.as_deref(), Some("thread_abc"));

        match InputControl::for_question(engine.current_question().unwrap()) {
            InputControl::ExclusiveChoice { options } => {
                assert_eq!(options, ["Mornings", "Evenings", "Weekends", "Other"])
            }
            other => panic!("Expected choice control, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_resolution_is_an_error_not_a_result() {
        let transport = Arc::new(
            ScriptedTransport::with_first_question("[TEXT] What's your biggest obstacle?")
                .then(Ok(NextQuestionResponse::resolution("", "thread_abc"))),
        );
        let mut engine = engine(&transport);
        engine.start(&ana()).await.unwrap();

        let err = engine.submit_answer("Time").await.unwrap_err();
        assert_eq!(err, FlowError::EmptyResult);
        assert!(matches!(engine.state(), FlowState::Failed(_)));
        assert!(engine.state().result().is_none());
    }

    #[tokio::test]
    async fn server_error_fails_and_blocks_further_requests() {
        let transport = Arc::new(
            ScriptedTransport::with_first_question("[TEXT] What's your biggest obstacle?").then(
                Ok(NextQuestionResponse {
                    error: Some("rate limited".to_string()),
                    ..Default::default()
                }),
            ),
        );
        let mut engine = engine(&transport);
        engine.start(&ana()).await.unwrap();

        let err = engine.submit_answer("Time").await.unwrap_err();
        assert_eq!(err, FlowError::ServerReported("rate limited".to_string()));
        assert_eq!(engine.state(), &FlowState::Failed("rate limited".to_string()));
        let before = transport.requests();

        let err = engine.submit_answer("Again").await.unwrap_err();
        assert!(matches!(err, FlowError::InvalidTransition { .. }));
        let err = engine.start(&ana()).await.unwrap_err();
        assert!(matches!(err, FlowError::InvalidTransition { .. }));
        assert_eq!(transport.requests(), before);
    }

    #[tokio::test]
    async fn start_error_fails() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.start.lock().unwrap().push_back(Ok(StartSessionResponse {
            error: Some("rate limited".to_string()),
            ..Default::default()
        }));
        let mut engine = engine(&transport);

        let err = engine.start(&ana()).await.unwrap_err();
        assert_eq!(err, FlowError::ServerReported("rate limited".to_string()));
        assert_eq!(engine.state(), &FlowState::Failed("rate limited".to_string()));
    }

    #[tokio::test]
    async fn restart_allows_a_new_session() {
        let transport = Arc::new(
            ScriptedTransport::with_first_question("[TEXT] Why now?")
                .then(Err(FlowError::Transport("connection reset".into()))),
        );
        transport.start.lock().unwrap().push_back(Ok(StartSessionResponse {
            thread_id: Some("thread_def".to_string()),
            question: Some("[TEXT] Why now?".to_string()),
            question_number: Some(1),
            error: None,
        }));
        let mut engine = engine(&transport);
        engine.start(&ana()).await.unwrap();
        assert!(engine.submit_answer("Because").await.is_err());
        assert!(engine.state().is_terminal());

        engine.restart();
        assert_eq!(engine.state(), &FlowState::Idle);
        assert_eq!(engine.session(), &Session::default());

        engine.start(&ana()).await.unwrap();
        assert_eq!(engine.session().session_id.as_deref(), Some("thread_def"));
    }

    #[tokio::test]
    async fn invalid_answers_change_nothing() {
        let transport = Arc::new(ScriptedTransport::with_first_question(
            "[SCALE] How motivated are you?",
        ));
        let mut engine = engine(&transport);
        engine.start(&ana()).await.unwrap();
        let before = transport.requests();

        for bad in ["", "   ", "\t\n"] {
            let err = engine.submit_answer(bad).await.unwrap_err();
            assert!(matches!(err, FlowError::InvalidAnswer { .. }), "{bad:?}");
        }
        assert_eq!(transport.requests(), before);
        assert_eq!(engine.session().current_question_index, 0);
        assert!(engine.session().answers.is_empty());
        assert_eq!(
            engine.current_question().map(|q| q.kind),
            Some(QuestionKind::Scale)
        );
    }

    #[tokio::test]
    async fn scale_answer_outside_slider_range_is_not_blocked() {
        let transport = Arc::new(
            ScriptedTransport::with_first_question("[SCALE] How many minutes a day (0-60)?").then(
                Ok(NextQuestionResponse::resolution("## Vision\nMove daily.", "thread_abc")),
            ),
        );
        let mut engine = engine(&transport);
        engine.start(&ana()).await.unwrap();

        engine.submit_answer("30").await.unwrap();
        assert_eq!(engine.session().answers, ["30"]);
        assert!(matches!(engine.state(), FlowState::Terminal(_)));
    }

    #[tokio::test]
    async fn each_accepted_answer_costs_one_request() {
        let transport = Arc::new(
            ScriptedTransport::with_first_question("[YES/NO] Have you tried before?")
                .then(Ok(NextQuestionResponse::question(
                    "[CHOICE] Where? (Gym, Home)",
                    2,
                    "thread_abc",
                )))
                .then(Ok(NextQuestionResponse::question(
                    "[NUMBER] How many days a week?",
                    3,
                    "thread_abc",
                )))
                .then(Ok(NextQuestionResponse::resolution(
                    "## Vision\nMove every day.",
                    "thread_abc",
                ))),
        );
        let mut engine = engine(&transport);
        engine.start(&ana()).await.unwrap();

        for (i, answer) in ["Yes", "Other: Park", "3"].into_iter().enumerate() {
            let before = transport.requests();
            engine.submit_answer(answer).await.unwrap();
            assert_eq!(transport.requests(), before + 1);
            let session = engine.session();
            assert_eq!(session.answers.len() as u32, session.current_question_index);
            assert_eq!(session.current_question_index, i as u32 + 1);
        }

        let numbers: Vec<u32> = transport
            .next_calls
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.question_number)
            .collect();
        assert_eq!(numbers, [0, 1, 2]);
        assert_eq!(engine.state().result(), Some("## Vision\nMove every day."));
    }

    #[tokio::test]
    async fn complete_flag_without_resolution_is_empty() {
        let transport = Arc::new(
            ScriptedTransport::with_first_question("[TEXT] Anything else?").then(Ok(
                NextQuestionResponse {
                    is_complete: Some(true),
                    ..Default::default()
                },
            )),
        );
        let mut engine = engine(&transport);
        engine.start(&ana()).await.unwrap();
        assert_eq!(
            engine.submit_answer("No").await.unwrap_err(),
            FlowError::EmptyResult
        );
        assert!(matches!(engine.state(), FlowState::Failed(_)));
    }

    #[tokio::test]
    async fn done_flag_without_resolution_is_empty() {
        let transport = Arc::new(
            ScriptedTransport::with_first_question("[TEXT] Anything else?").then(Ok(
                NextQuestionResponse {
                    done: Some(true),
                    ..Default::default()
                },
            )),
        );
        let mut engine = engine(&transport);
        engine.start(&ana()).await.unwrap();
        assert_eq!(
            engine.submit_answer("No").await.unwrap_err(),
            FlowError::EmptyResult
        );
    }

    #[tokio::test]
    async fn degraded_question_still_accepts_text() {
        let transport = Arc::new(ScriptedTransport::with_first_question(
            "[CHOICE] What motivates you most?",
        ));
        let mut engine = engine(&transport);
        engine.start(&ana()).await.unwrap();
        let question = engine.current_question().unwrap();
        assert_eq!(question.kind, QuestionKind::Text);
        assert_eq!(question.prompt, "What motivates you most?");
    }

    #[tokio::test(start_paused = true)]
    async fn request_timeout_fails_the_session() {
        let transport = Arc::new(ScriptedTransport {
            delay: Some(Duration::from_secs(120)),
            ..ScriptedTransport::with_first_question("[TEXT] Why?")
        });
        let mut engine = QuestionFlowEngine::with_config(
            transport.clone(),
            FlowConfig {
                request_timeout: Some(Duration::from_secs(30)),
            },
        );

        let err = engine.start(&ana()).await.unwrap_err();
        assert!(matches!(err, FlowError::Transport(_)));
        assert!(matches!(engine.state(), FlowState::Failed(_)));
    }

    #[tokio::test]
    async fn submit_before_start_is_rejected() {
        let transport = Arc::new(ScriptedTransport::default());
        let mut engine = engine(&transport);
        let err = engine.submit_answer("Yes").await.unwrap_err();
        assert!(matches!(err, FlowError::InvalidTransition { .. }));
        assert_eq!(transport.requests(), 0);
    }
}
