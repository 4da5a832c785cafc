//! Resolution coach: a short adaptive questionnaire that turns a New Year's
//! resolution into a personalized plan.

pub mod coach;
pub mod config;
pub mod error;
pub mod flow;
pub mod intake;
pub mod llm;
pub mod question;
pub mod render;
pub mod terminal;
