//! Intake: the fixed up-front profile questions asked before any AI
//! interaction.
//!
//! Four fields are collected in order (name, location, category,
//! sub-category). Once the last one is accepted the collector hands back a
//! complete [`Profile`], which starts a question-flow session.

pub mod catalog;
pub mod collector;
pub mod model;

pub use catalog::{CATEGORIES, Category, SubCategory, find_category};
pub use collector::{FieldId, FieldKind, FieldSpec, IntakeCollector, IntakeStep};
pub use model::Profile;
