//! Resolved result shapes.
//!
//! Operations return views with cross-references expanded into embedded
//! summaries, the way callers consume them: a question carries its tags
//! (id + name) and author (id, auth id, name, picture) instead of opaque
//! identifiers. Resolution restricts fields to what the summary names —
//! callers never receive another user's email through a view.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use devex_model::{Answer, Database, Question, Tag, User};
use devex_types::{AnswerId, AuthId, QuestionId, TagId, UserId};

use crate::error::{ActionError, ActionResult};

/// Tag reference restricted to id + name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSummary {
    pub id: TagId,
    pub name: String,
}

impl TagSummary {
    pub(crate) fn of(tag: &Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name.clone(),
        }
    }
}

/// Author reference restricted to id, external-auth id, name, and picture.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: UserId,
    pub auth_id: AuthId,
    pub name: String,
    pub picture: String,
}

impl AuthorSummary {
    pub(crate) fn of(user: &User) -> Self {
        Self {
            id: user.id,
            auth_id: user.auth_id.clone(),
            name: user.name.clone(),
            picture: user.picture.clone(),
        }
    }
}

/// Tag with its aggregate question count, for tag listings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagView {
    pub id: TagId,
    pub name: String,
    pub question_count: usize,
    pub created_at: DateTime<Utc>,
}

impl TagView {
    pub(crate) fn of(tag: &Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name.clone(),
            question_count: tag.question_count(),
            created_at: tag.created_at,
        }
    }
}

/// A question with tags and author resolved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuestionView {
    pub id: QuestionId,
    pub title: String,
    pub content: String,
    pub tags: Vec<TagSummary>,
    pub author: AuthorSummary,
    pub upvotes: BTreeSet<UserId>,
    pub downvotes: BTreeSet<UserId>,
    pub views: u64,
    pub answer_count: usize,
    pub created_at: DateTime<Utc>,
}

/// Question reference restricted to id + title, for answer views.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSummary {
    pub id: QuestionId,
    pub title: String,
}

/// An answer with its parent question and author resolved.
///
/// `author` is optional: an answer can outlive its author, since user
/// deletion does not cascade to answers on other users' questions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnswerView {
    pub id: AnswerId,
    pub content: String,
    pub question: QuestionSummary,
    pub author: Option<AuthorSummary>,
    pub upvotes: BTreeSet<UserId>,
    pub downvotes: BTreeSet<UserId>,
    pub created_at: DateTime<Utc>,
}

/// Resolve a question's tag and author references.
///
/// Tag ids that no longer resolve are dropped from the view; a missing
/// author is an integrity error (question deletion cascades from user
/// deletion, so a live question always has a live author).
pub(crate) fn resolve_question(db: &Database, question: &Question) -> ActionResult<QuestionView> {
    let author = db.users().get(question.author).ok_or_else(|| {
        warn!(
            question = %question.id.short_id(),
            author = %question.author.short_id(),
            "question author missing"
        );
        ActionError::UserNotFound
    })?;

    let tags = question
        .tags
        .iter()
        .filter_map(|id| db.tags().get(*id))
        .map(|tag| TagSummary::of(&tag))
        .collect();

    Ok(QuestionView {
        id: question.id,
        title: question.title.clone(),
        content: question.content.clone(),
        tags,
        author: AuthorSummary::of(&author),
        upvotes: question.upvotes.clone(),
        downvotes: question.downvotes.clone(),
        views: question.views,
        answer_count: db.answers().count(|a| a.question == question.id),
        created_at: question.created_at,
    })
}

pub(crate) fn resolve_questions(
    db: &Database,
    questions: &[Question],
) -> ActionResult<Vec<QuestionView>> {
    questions.iter().map(|q| resolve_question(db, q)).collect()
}

/// Resolve an answer's parent question and (possibly absent) author.
pub(crate) fn resolve_answer(db: &Database, answer: &Answer) -> ActionResult<AnswerView> {
    let question = db.questions().get(answer.question).ok_or_else(|| {
        warn!(
            answer = %answer.id.short_id(),
            question = %answer.question.short_id(),
            "answer parent question missing"
        );
        ActionError::QuestionNotFound
    })?;

    let author = db.users().get(answer.author).map(|u| AuthorSummary::of(&u));

    Ok(AnswerView {
        id: answer.id,
        content: answer.content.clone(),
        question: QuestionSummary {
            id: question.id,
            title: question.title,
        },
        author,
        upvotes: answer.upvotes.clone(),
        downvotes: answer.downvotes.clone(),
        created_at: answer.created_at,
    })
}
