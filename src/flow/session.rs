//! Per-questionnaire session record.

use serde::{Deserialize, Serialize};

/// One questionnaire run, owned by the engine.
///
/// `answers.len() == current_question_index` holds until the result arrives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Opaque id issued by the server (the thread id).
    pub session_id: Option<String>,
    pub current_question_index: u32,
    pub answers: Vec<String>,
}

impl Session {
    /// Record an accepted answer. Returns the zero-based number of the
    /// question it answers.
    pub fn record_answer(&mut self, answer: String) -> u32 {
        self.answers.push(answer);
        self.current_question_index += 1;
        self.current_question_index - 1
    }

    /// Adopt a session id from the server, keeping an existing one when the
    /// server omits it.
    pub fn adopt_id(&mut self, id: Option<String>) {
        if let Some(id) = id.filter(|id| !id.is_empty()) {
            self.session_id = Some(id);
        }
    }
}
