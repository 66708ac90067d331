use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use devex_store::Document;
use devex_types::{AuthId, QuestionId, UserId};

/// A community member.
///
/// Created on first external-auth sign-in. `username`, `email`, and
/// `auth_id` are unique across the user collection (enforced by the
/// query/update layer). `joined_at` is immutable after creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub auth_id: AuthId,
    pub name: String,
    pub username: String,
    pub email: String,
    pub picture: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub portfolio: Option<String>,
    /// Accumulated reputation. Adjusted by the reputation policy; may go
    /// negative.
    pub reputation: i64,
    /// Questions this user has saved. Set semantics: each question at most
    /// once.
    pub saved: BTreeSet<QuestionId>,
    pub joined_at: DateTime<Utc>,
}

impl User {
    /// Create a user record with a fresh store-assigned id and join
    /// timestamp. Optional profile fields start empty.
    pub fn new(
        auth_id: AuthId,
        name: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
        picture: impl Into<String>,
    ) -> Self {
        Self {
            id: UserId::new(),
            auth_id,
            name: name.into(),
            username: username.into(),
            email: email.into(),
            picture: picture.into(),
            bio: None,
            location: None,
            portfolio: None,
            reputation: 0,
            saved: BTreeSet::new(),
            joined_at: Utc::now(),
        }
    }

    /// Whether this user has saved the given question.
    pub fn has_saved(&self, question: QuestionId) -> bool {
        self.saved.contains(&question)
    }
}

impl Document for User {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }
}
