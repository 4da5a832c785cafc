//! Parser for the bracket-tagged question format.
//!
//! ```text
//! [YES/NO] Have you tried this before?
//! [CHOICE] When can you work on this? (Mornings, Evenings, or Weekends)
//! [TEXT] What's your biggest obstacle?
//! ```
//!
//! Parsing is permissive: anything that cannot be understood becomes a
//! plain text question so a formatting glitch upstream never blocks the user.

use std::sync::LazyLock;

use regex::Regex;

use super::model::{OTHER_OPTION, Question, QuestionKind};

static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^\s*\[\s*(YES\s*/\s*NO|CHOICE|TEXT|SCALE|NUMBER)\s*\]\s*(.*)$").unwrap()
});

static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\[([^\]]*)\]").unwrap());

/// Parenthesized group at the end of the text, allowing trailing punctuation.
static TRAILING_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\(([^()]*)\)[\s?.!:;]*$").unwrap());

/// Comma (optionally followed by "and"/"or"), or "and"/"or" between spaces.
static OPTION_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*,\s*(?:(?:or|and)\s+)?|\s+(?:or|and)\s+").unwrap());

/// Why a raw question could not be parsed as written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuestionParseError {
    #[error("no type tag")]
    MissingTag,

    #[error("unrecognized type tag [{0}]")]
    UnknownTag(String),

    #[error("choice question without an option list")]
    MissingOptions,

    #[error("choice question with only {found} usable option(s)")]
    TooFewOptions { found: usize },
}

/// Strictly parse a raw question.
pub fn try_parse(raw: &str) -> Result<Question, QuestionParseError> {
    let (question, error) = parse_with_fallback(raw);
    match error {
        Some(e) => Err(e),
        None => Ok(question),
    }
}

/// Parse a raw question, degrading to a text question on any failure.
pub fn parse(raw: &str) -> Question {
    let (question, error) = parse_with_fallback(raw);
    if let Some(e) = error {
        tracing::warn!(error = %e, raw = raw, "Question degraded to text");
    } else {
        tracing::debug!(kind = %question.kind, options = question.options.len(), "Question parsed");
    }
    question
}

fn parse_with_fallback(raw: &str) -> (Question, Option<QuestionParseError>) {
    let Some(caps) = TAG.captures(raw) else {
        let error = match ANY_TAG.captures(raw) {
            Some(tag) => QuestionParseError::UnknownTag(tag[1].trim().to_string()),
            None => QuestionParseError::MissingTag,
        };
        return (Question::text(raw.trim()), Some(error));
    };

    let tag = caps[1].to_ascii_uppercase();
    let body = caps[2].trim();

    let kind = match tag.as_str() {
        "CHOICE" => QuestionKind::Choice,
        "TEXT" => QuestionKind::Text,
        "SCALE" => QuestionKind::Scale,
        "NUMBER" => QuestionKind::Number,
        // YES/NO, possibly with spaces around the slash
        _ => QuestionKind::YesNo,
    };

    if kind != QuestionKind::Choice {
        return (
            Question {
                kind,
                prompt: body.to_string(),
                options: Vec::new(),
            },
            None,
        );
    }

    let Some(group) = TRAILING_GROUP.captures(body) else {
        return (Question::text(body), Some(QuestionParseError::MissingOptions));
    };

    let mut options = split_options(&group[1]);
    if options.len() < 2 {
        let found = options.len();
        return (
            Question::text(body),
            Some(QuestionParseError::TooFewOptions { found }),
        );
    }
    options.push(OTHER_OPTION.to_string());

    let start = group.get(0).map_or(body.len(), |m| m.start());
    (
        Question {
            kind,
            prompt: body[..start].trim().to_string(),
            options,
        },
        None,
    )
}

/// Split an option list, dropping blanks and any listed "Other".
fn split_options(list: &str) -> Vec<String> {
    OPTION_SEPARATOR
        .split(list)
        .map(str::trim)
        .filter(|o| !o.is_empty() && !o.eq_ignore_ascii_case(OTHER_OPTION))
        .map(str::to_string)
        .collect()
}
