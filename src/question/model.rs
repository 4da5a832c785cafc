//! Parsed question types.

use serde::{Deserialize, Serialize};

/// Label of the synthetic free-text entry appended to every choice list.
pub const OTHER_OPTION: &str = "Other";

/// Prefix used when the user answers a choice question through "Other".
pub const OTHER_ANSWER_PREFIX: &str = "Other: ";

/// Inclusive range accepted by scale questions.
pub const SCALE_RANGE: std::ops::RangeInclusive<i64> = 1..=10;

/// The input a question expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    YesNo,
    Choice,
    Text,
    Scale,
    Number,
}

impl std::fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::YesNo => "YES/NO",
            Self::Choice => "CHOICE",
            Self::Text => "TEXT",
            Self::Scale => "SCALE",
            Self::Number => "NUMBER",
        };
        write!(f, "{s}")
    }
}

/// A question ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub kind: QuestionKind,
    pub prompt: String,
    /// Only populated for `Choice`; always ends with [`OTHER_OPTION`].
    pub options: Vec<String>,
}

impl Question {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            kind: QuestionKind::Text,
            prompt: prompt.into(),
            options: Vec::new(),
        }
    }

    /// The real options of a choice question, without the trailing "Other".
    pub fn listed_options(&self) -> impl Iterator<Item = &str> {
        self.options
            .iter()
            .map(String::as_str)
            .filter(|o| *o != OTHER_OPTION)
    }

    /// Format an "Other" answer for a choice question.
    pub fn other_answer(text: &str) -> String {
        format!("{OTHER_ANSWER_PREFIX}{}", text.trim())
    }

    /// Check `value` against this question's constraints and return the
    /// answer as it should be sent.
    pub fn validate_answer(&self, value: &str) -> Result<String, String> {
        match self.kind {
            QuestionKind::YesNo => match value {
                "Yes" | "No" => Ok(value.to_string()),
                _ => Err(format!("expected \"Yes\" or \"No\", got {value:?}")),
            },
            QuestionKind::Choice => {
                if self.listed_options().any(|o| o == value) {
                    return Ok(value.to_string());
                }
                match value.strip_prefix(OTHER_ANSWER_PREFIX) {
                    Some(text) if !text.trim().is_empty() => Ok(Self::other_answer(text)),
                    Some(_) => Err("\"Other\" needs a description".to_string()),
                    None => Err(format!("{value:?} is not one of the offered options")),
                }
            }
            // The slider and number widgets constrain what they produce;
            // typed answers to scale and number questions are free text.
            QuestionKind::Text | QuestionKind::Scale | QuestionKind::Number => non_empty(value),
        }
    }
}

fn non_empty(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err("answer must not be empty".to_string())
    } else {
        Ok(trimmed.to_string())
    }
}
