use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use devex_store::Document;
use devex_types::{QuestionId, TagId};

/// A content tag.
///
/// Tag names are unique under case-insensitive comparison; lookups go
/// through [`Tag::matches_name`] so "Rust" and "rust" resolve to the same
/// record. The stored name keeps the casing of the first submission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub questions: BTreeSet<QuestionId>,
    pub created_at: DateTime<Utc>,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: TagId::new(),
            name: name.into(),
            questions: BTreeSet::new(),
            created_at: Utc::now(),
        }
    }

    /// Case-insensitive exact name match.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

impl Document for Tag {
    type Id = TagId;

    fn id(&self) -> TagId {
        self.id
    }
}
