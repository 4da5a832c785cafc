//! Question-flow state machine.

use crate::question::Question;

/// Where the questionnaire stands.
///
/// Progresses linearly: Idle → AwaitingFirstQuestion → AwaitingAnswer (loop)
/// → Terminal. Any non-terminal state may drop into Failed. Terminal and
/// Failed absorb everything; only a restart leaves them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FlowState {
    /// No session started yet.
    #[default]
    Idle,
    /// `start_session` issued, first question not yet received.
    AwaitingFirstQuestion,
    /// A question is on screen.
    AwaitingAnswer(Question),
    /// The finished resolution plan.
    Terminal(String),
    /// Unrecoverable failure with its reason.
    Failed(String),
}

impl FlowState {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &FlowState) -> bool {
        use FlowState::*;
        matches!(
            (self, target),
            (Idle, AwaitingFirstQuestion)
                | (AwaitingFirstQuestion, AwaitingAnswer(_))
                | (AwaitingAnswer(_), AwaitingAnswer(_))
                | (AwaitingAnswer(_), Terminal(_))
                | (Idle | AwaitingFirstQuestion | AwaitingAnswer(_), Failed(_))
        )
    }

    /// Whether the questionnaire has ended, successfully or not.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal(_) | Self::Failed(_))
    }

    /// The question currently awaiting an answer.
    pub fn question(&self) -> Option<&Question> {
        match self {
            Self::AwaitingAnswer(q) => Some(q),
            _ => None,
        }
    }

    /// The finished plan, once reached.
    pub fn result(&self) -> Option<&str> {
        match self {
            Self::Terminal(text) => Some(text),
            _ => None,
        }
    }
}

impl std::fmt::Display for FlowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::AwaitingFirstQuestion => "awaiting_first_question",
            Self::AwaitingAnswer(_) => "awaiting_answer",
            Self::Terminal(_) => "terminal",
            Self::Failed(_) => "failed",
        };
        write!(f, "{s}")
    }
}
