//! Render dispatch: which input control a question gets, and the state of
//! the user's in-progress answer.

use super::model::{OTHER_OPTION, Question, QuestionKind, SCALE_RANGE};

/// Placeholder for free-text answers.
pub const TEXT_PLACEHOLDER: &str = "Type your answer here...";
/// Placeholder for the "Other" sub-field.
pub const OTHER_PLACEHOLDER: &str = "Please specify...";

/// The presentation mode for a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputControl {
    /// Two buttons, labelled exactly "Yes" and "No".
    Binary { labels: [&'static str; 2] },
    /// One button per option. Activating "Other" reveals a text field.
    ExclusiveChoice { options: Vec<String> },
    /// Numeric slider for scale questions.
    Slider { min: i64, max: i64, initial: i64 },
    /// Number entry.
    Numeric,
    /// Single-line free text.
    FreeText { placeholder: &'static str },
}

impl InputControl {
    pub fn for_question(question: &Question) -> Self {
        match question.kind {
            QuestionKind::YesNo => Self::Binary {
                labels: ["Yes", "No"],
            },
            QuestionKind::Choice if !question.options.is_empty() => Self::ExclusiveChoice {
                options: question.options.clone(),
            },
            QuestionKind::Scale => Self::Slider {
                min: *SCALE_RANGE.start(),
                max: *SCALE_RANGE.end(),
                initial: 5,
            },
            QuestionKind::Number => Self::Numeric,
            QuestionKind::Choice | QuestionKind::Text => Self::FreeText {
                placeholder: TEXT_PLACEHOLDER,
            },
        }
    }

    /// Button labels, empty for text-entry controls.
    pub fn buttons(&self) -> Vec<&str> {
        match self {
            Self::Binary { labels } => labels.to_vec(),
            Self::ExclusiveChoice { options } => options.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

/// The user's answer while they are still composing it.
///
/// Picking an option or typing text enables the single "continue" action;
/// [`AnswerDraft::continue_answer`] yields the value to submit.
#[derive(Debug, Clone)]
pub struct AnswerDraft {
    control: InputControl,
    selected: Option<String>,
    other_active: bool,
    text: String,
}

impl AnswerDraft {
    pub fn new(question: &Question) -> Self {
        Self {
            control: InputControl::for_question(question),
            selected: None,
            other_active: false,
            text: String::new(),
        }
    }

    pub fn control(&self) -> &InputControl {
        &self.control
    }

    /// Whether the "Other" text field is currently revealed.
    pub fn other_active(&self) -> bool {
        self.other_active
    }

    /// Pick a button. Returns false if `label` is not offered.
    pub fn select(&mut self, label: &str) -> bool {
        let offered = match &self.control {
            InputControl::Binary { labels } => labels.contains(&label),
            InputControl::ExclusiveChoice { options } => options.iter().any(|o| o == label),
            _ => false,
        };
        if !offered {
            return false;
        }
        if label == OTHER_OPTION && matches!(self.control, InputControl::ExclusiveChoice { .. }) {
            self.other_active = !self.other_active;
            self.selected = None;
        } else {
            self.other_active = false;
            self.selected = Some(label.to_string());
        }
        true
    }

    /// Replace the typed text (free text, number, slider value, or the
    /// "Other" sub-field).
    pub fn type_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    pub fn can_continue(&self) -> bool {
        self.continue_answer().is_some()
    }

    /// The answer to submit, or `None` while "continue" is disabled.
    pub fn continue_answer(&self) -> Option<String> {
        let typed = self.text.trim();
        match &self.control {
            InputControl::Binary { .. } => self.selected.clone(),
            InputControl::ExclusiveChoice { .. } if self.other_active => {
                (!typed.is_empty()).then(|| Question::other_answer(typed))
            }
            InputControl::ExclusiveChoice { .. } => self.selected.clone(),
            InputControl::Slider { min, max, .. } => typed
                .parse::<i64>()
                .ok()
                .filter(|n| (*min..=*max).contains(n))
                .map(|n| n.to_string()),
            InputControl::Numeric => typed
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(|_| typed.to_string()),
            InputControl::FreeText { .. } => (!typed.is_empty()).then(|| typed.to_string()),
        }
    }
}
