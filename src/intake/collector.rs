//! Intake collector: sequential single-field prompts that build a `Profile`.

use serde::{Deserialize, Serialize};

use crate::error::IntakeError;

use super::catalog::{CATEGORIES, Category, find_category};
use super::model::Profile;

/// The intake fields, in the order they are asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldId {
    Name,
    Location,
    Category,
    SubCategory,
}

impl FieldId {
    pub const ALL: [FieldId; 4] = [
        FieldId::Name,
        FieldId::Location,
        FieldId::Category,
        FieldId::SubCategory,
    ];

    /// Field that follows this one, if any.
    pub fn next(&self) -> Option<FieldId> {
        match self {
            Self::Name => Some(Self::Location),
            Self::Location => Some(Self::Category),
            Self::Category => Some(Self::SubCategory),
            Self::SubCategory => None,
        }
    }

    /// 1-based position in the intake sequence.
    pub fn step(&self) -> usize {
        match self {
            Self::Name => 1,
            Self::Location => 2,
            Self::Category => 3,
            Self::SubCategory => 4,
        }
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Name => "name",
            Self::Location => "location",
            Self::Category => "category",
            Self::SubCategory => "subCategory",
        };
        write!(f, "{s}")
    }
}

/// How a field is answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text { placeholder: &'static str },
    Select { options: Vec<String> },
}

/// Everything needed to present one intake field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub id: FieldId,
    pub prompt: &'static str,
    pub kind: FieldKind,
    pub step: usize,
    pub total_steps: usize,
}

/// Result of accepting a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeStep {
    /// Ask this field next.
    Next(FieldId),
    /// All fields collected.
    Done(Profile),
}

/// Accumulates intake answers. Performs no I/O.
#[derive(Debug, Default)]
pub struct IntakeCollector {
    name: Option<String>,
    location: Option<String>,
    category: Option<&'static Category>,
    completed: bool,
}

impl IntakeCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// The field currently awaiting a value, or `None` once complete.
    pub fn current_field(&self) -> Option<FieldId> {
        if self.completed {
            None
        } else if self.name.is_none() {
            Some(FieldId::Name)
        } else if self.location.is_none() {
            Some(FieldId::Location)
        } else if self.category.is_none() {
            Some(FieldId::Category)
        } else {
            Some(FieldId::SubCategory)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Presentation details for the current field.
    pub fn current_spec(&self) -> Option<FieldSpec> {
        let id = self.current_field()?;
        let (prompt, kind) = match id {
            FieldId::Name => (
                "👋 What's your name?",
                FieldKind::Text {
                    placeholder: "Enter your name",
                },
            ),
            FieldId::Location => (
                "🌍 Where are you located?",
                FieldKind::Text {
                    placeholder: "Enter your city, state/province, or country",
                },
            ),
            FieldId::Category => (
                "🎯 What type of resolution would you like to focus on?",
                FieldKind::Select {
                    options: CATEGORIES.iter().map(|c| c.name.to_string()).collect(),
                },
            ),
            FieldId::SubCategory => (
                "✨ Choose your specific resolution focus:",
                FieldKind::Select {
                    options: self
                        .category
                        .map(|c| {
                            c.sub_categories
                                .iter()
                                .map(|s| s.title.to_string())
                                .collect()
                        })
                        .unwrap_or_default(),
                },
            ),
        };
        Some(FieldSpec {
            id,
            prompt,
            kind,
            step: id.step(),
            total_steps: FieldId::ALL.len(),
        })
    }

    /// Accept a value for `field`.
    ///
    /// Fields must arrive in order. Free-text values are trimmed and must be
    /// non-empty; selections must match an offered option exactly.
    pub fn submit_field(&mut self, field: FieldId, value: &str) -> Result<IntakeStep, IntakeError> {
        let expected = self.current_field().ok_or(IntakeError::AlreadyComplete)?;
        if field != expected {
            return Err(IntakeError::UnexpectedField {
                expected: expected.to_string(),
                got: field.to_string(),
            });
        }

        let value = value.trim();
        if value.is_empty() {
            return Err(IntakeError::EmptyValue {
                field: field.to_string(),
            });
        }

        match field {
            FieldId::Name => self.name = Some(value.to_string()),
            FieldId::Location => self.location = Some(value.to_string()),
            FieldId::Category => {
                let category = find_category(value).ok_or_else(|| IntakeError::NotAnOption {
                    field: field.to_string(),
                    value: value.to_string(),
                })?;
                self.category = Some(category);
            }
            FieldId::SubCategory => {
                let category = self.category.ok_or(IntakeError::AlreadyComplete)?;
                let sub = category
                    .sub_category(value)
                    .ok_or_else(|| IntakeError::NotAnOption {
                        field: field.to_string(),
                        value: value.to_string(),
                    })?;
                return self.finish(category, sub.title);
            }
        }

        tracing::debug!(field = %field, "Intake field accepted");
        // Name/Location/Category always have a successor.
        Ok(IntakeStep::Next(field.next().unwrap_or(FieldId::SubCategory)))
    }

    fn finish(
        &mut self,
        category: &'static Category,
        sub_category: &str,
    ) -> Result<IntakeStep, IntakeError> {
        let (Some(name), Some(location)) = (self.name.clone(), self.location.clone()) else {
            return Err(IntakeError::UnexpectedField {
                expected: FieldId::Name.to_string(),
                got: FieldId::SubCategory.to_string(),
            });
        };
        self.completed = true;
        let profile = Profile {
            name,
            location,
            category: category.name.to_string(),
            sub_category: sub_category.to_string(),
        };
        tracing::info!(category = %profile.category, "Intake complete");
        Ok(IntakeStep::Done(profile))
    }
}
