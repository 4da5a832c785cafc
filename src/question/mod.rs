//! Tagged questions: the `[KIND] prompt (options)` convention the coach uses
//! to describe what kind of input a question expects.
//!
//! Raw strings are parsed into a [`Question`] as soon as they arrive, and
//! the rest of the client only ever sees the typed form.

pub mod control;
pub mod model;
pub mod parser;

pub use control::{AnswerDraft, InputControl};
pub use model::{OTHER_OPTION, Question, QuestionKind};
pub use parser::{QuestionParseError, parse, try_parse};
