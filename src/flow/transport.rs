//! Session protocol: wire types for the two coach endpoints and the trait
//! the engine uses to reach them.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::FlowError;
use crate::intake::Profile;

/// `POST /start_session` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: String,
    /// The intake category.
    #[serde(default)]
    pub resolution_type: String,
    /// The intake sub-category.
    #[serde(default)]
    pub specific_resolution: String,
}

impl From<&Profile> for StartSessionRequest {
    fn from(profile: &Profile) -> Self {
        Self {
            name: profile.name.clone(),
            location: profile.location.clone(),
            resolution_type: profile.category.clone(),
            specific_resolution: profile.sub_category.clone(),
        }
    }
}

/// `POST /start_session` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `POST /get_next_question` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextQuestionRequest {
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub answer: String,
    /// Zero-based number of the question being answered.
    #[serde(default)]
    pub question_number: u32,
}

/// `POST /get_next_question` response: either another question or the
/// finished resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextQuestionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    /// Outer `Some` when the key is present at all, even as `""` or `null`.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub resolution: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_complete: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NextQuestionResponse {
    pub fn question(question: impl Into<String>, number: u32, thread_id: &str) -> Self {
        Self {
            question: Some(question.into()),
            question_number: Some(number),
            thread_id: Some(thread_id.to_string()),
            ..Default::default()
        }
    }

    pub fn resolution(resolution: impl Into<String>, thread_id: &str) -> Self {
        Self {
            resolution: Some(Some(resolution.into())),
            thread_id: Some(thread_id.to_string()),
            is_complete: Some(true),
            ..Default::default()
        }
    }

    /// Whether this response ends the question loop.
    pub fn is_terminal(&self) -> bool {
        self.resolution.is_some() || self.done == Some(true) || self.is_complete == Some(true)
    }
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Transport for the session protocol.
///
/// Implementations report transport-level failures as
/// [`FlowError::Transport`] and may map a non-2xx status whose body carries
/// an `error` field to [`FlowError::ServerReported`]. An `error` field in a
/// 2xx body is returned as-is for the engine to interpret.
#[async_trait]
pub trait SessionTransport: Send + Sync {
    async fn start_session(
        &self,
        request: &StartSessionRequest,
    ) -> Result<StartSessionResponse, FlowError>;

    async fn next_question(
        &self,
        request: &NextQuestionRequest,
    ) -> Result<NextQuestionResponse, FlowError>;
}
