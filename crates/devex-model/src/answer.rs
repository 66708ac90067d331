use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use devex_store::Document;
use devex_types::{AnswerId, QuestionId, UserId};

/// An answer posted under a question.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub id: AnswerId,
    pub content: String,
    pub question: QuestionId,
    pub author: UserId,
    pub upvotes: BTreeSet<UserId>,
    pub downvotes: BTreeSet<UserId>,
    pub created_at: DateTime<Utc>,
}

impl Answer {
    pub fn new(content: impl Into<String>, question: QuestionId, author: UserId) -> Self {
        Self {
            id: AnswerId::new(),
            content: content.into(),
            question,
            author,
            upvotes: BTreeSet::new(),
            downvotes: BTreeSet::new(),
            created_at: Utc::now(),
        }
    }

    pub fn has_upvoted(&self, user: UserId) -> bool {
        self.upvotes.contains(&user)
    }

    pub fn has_downvoted(&self, user: UserId) -> bool {
        self.downvotes.contains(&user)
    }

    pub fn upvote_count(&self) -> usize {
        self.upvotes.len()
    }
}

impl Document for Answer {
    type Id = AnswerId;

    fn id(&self) -> AnswerId {
        self.id
    }
}
