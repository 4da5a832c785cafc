//! Profile collected during intake.

use serde::{Deserialize, Serialize};

/// The user's up-front answers. Immutable once intake completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub location: String,
    pub category: String,
    pub sub_category: String,
}

impl Profile {
    /// One-line description used when seeding a coaching conversation.
    pub fn summary(&self) -> String {
        format!(
            "{} from {}, {} / {}",
            self.name, self.location, self.category, self.sub_category
        )
    }
}
