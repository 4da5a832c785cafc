//! Question-flow engine: drives a coaching session from the first question
//! to the finished resolution plan.
//!
//! The engine owns the session state and the tag parser, and talks to the
//! coach server through a [`SessionTransport`]. Exactly one request is in
//! flight at a time; every mutating operation takes `&mut self`.

pub mod engine;
pub mod http;
pub mod session;
pub mod state;
pub mod transport;

pub use engine::{FlowConfig, QuestionFlowEngine};
pub use http::HttpSessionTransport;
pub use session::Session;
pub use state::FlowState;
pub use transport::{
    NextQuestionRequest, NextQuestionResponse, SessionTransport, StartSessionRequest,
    StartSessionResponse,
};
