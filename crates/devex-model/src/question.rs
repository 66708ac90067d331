use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use devex_store::Document;
use devex_types::{QuestionId, TagId, UserId};

/// A posted question.
///
/// Vote sets are mutually exclusive per user — the query/update layer keeps
/// a voter in at most one of `upvotes`/`downvotes`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub title: String,
    pub content: String,
    /// Linked tags, in the order supplied at creation.
    pub tags: Vec<TagId>,
    pub author: UserId,
    pub upvotes: BTreeSet<UserId>,
    pub downvotes: BTreeSet<UserId>,
    pub views: u64,
    pub created_at: DateTime<Utc>,
}

impl Question {
    /// Create a question with a fresh id and timestamp. Tags are linked
    /// afterwards by the creation operation.
    pub fn new(title: impl Into<String>, content: impl Into<String>, author: UserId) -> Self {
        Self {
            id: QuestionId::new(),
            title: title.into(),
            content: content.into(),
            tags: Vec::new(),
            author,
            upvotes: BTreeSet::new(),
            downvotes: BTreeSet::new(),
            views: 0,
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

impl Document for Question {
    type Id = QuestionId;

    fn id(&self) -> QuestionId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_question_starts_unvoted() {
        let q = Question::new("How do I?", "body", UserId::new());
        assert!(q.upvotes.is_empty());
        assert!(q.downvotes.is_empty());
        assert_eq!(q.views, 0);
        assert!(q.tags.is_empty());
    }

    #[test]
    fn vote_membership_helpers() {
        let mut q = Question::new("t", "c", UserId::new());
        let voter = UserId::new();
        assert!(!q.has_upvoted(voter));
        q.upvotes.insert(voter);
        assert!(q.has_upvoted(voter));
        assert!(!q.has_downvoted(voter));
        assert_eq!(q.upvote_count(), 1);
    }

    #[test]
    fn serde_roundtrip() {
        let q = Question::new("t", "c", UserId::new());
        let json = serde_json::to_string(&q).unwrap();
        let parsed: Question = serde_json::from_str(&json).unwrap();
        assert_eq!(q, parsed);
    }
}
