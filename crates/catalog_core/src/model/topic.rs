//! Topic entity.
//!
//! # Invariants
//! - Topic is the non-owning side of the course/topic relationship: the
//!   `topic` table carries no join column and saving a topic never touches
//!   `course_topic`.

use crate::model::identity::{same_identity, EntityId};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Store-assigned topic identifier.
pub type TopicId = EntityId;

/// Subject area that courses can be filed under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    /// `None` until the first successful save.
    pub id: Option<TopicId>,
    pub name: String,
}

impl Topic {
    /// Creates a not-yet-persisted topic.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    /// Returns whether the store has assigned an id to this topic.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

impl PartialEq for Topic {
    fn eq(&self, other: &Self) -> bool {
        same_identity(self, self.id, other, other.id)
    }
}

impl Eq for Topic {}

impl Hash for Topic {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
