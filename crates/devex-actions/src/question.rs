//! Question operations: listing, creation with tag find-or-create, voting,
//! views, editing, deletion, and the tag-link repair sweep.

use tracing::{debug, info, warn};

use devex_model::{Question, Tag};
use devex_store::Query;
use devex_types::{QuestionId, TagId, UserId};

use crate::error::{ActionError, ActionResult};
use crate::exchange::DevExchange;
use crate::reputation;
use crate::views::{self, QuestionView};
use crate::vote::{self, VoteDirection, VoteOutcome};

/// Most tags a single question may carry.
pub const MAX_TAGS_PER_QUESTION: usize = 5;

/// How many questions [`DevExchange::hot_questions`] returns.
pub const HOT_QUESTION_LIMIT: usize = 5;

/// Parameters for [`DevExchange::create_question`].
#[derive(Clone, Debug)]
pub struct CreateQuestionParams {
    pub title: String,
    pub content: String,
    /// Tag names. Attached by case-insensitive find-or-create; duplicates
    /// within one submission collapse to a single tag.
    pub tags: Vec<String>,
    pub author: UserId,
}

/// Parameters for [`DevExchange::edit_question`].
#[derive(Clone, Debug)]
pub struct EditQuestionParams {
    pub question_id: QuestionId,
    pub title: String,
    pub content: String,
}

/// Parameters for [`DevExchange::upvote_question`] and
/// [`DevExchange::downvote_question`].
#[derive(Clone, Copy, Debug)]
pub struct QuestionVoteParams {
    pub question_id: QuestionId,
    pub user_id: UserId,
}

/// What a [`DevExchange::repair_tag_links`] sweep changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Tag references removed from questions because the tag is gone.
    pub dangling_tag_links: usize,
    /// Question references removed from tags because the question is gone.
    pub dangling_question_links: usize,
    /// Questions whose tag list was completed from the tag side.
    pub relinked_questions: usize,
}

impl RepairReport {
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

// ---- Question operations ----

impl DevExchange {
    /// All questions, newest first, with tags and author resolved.
    ///
    /// Deliberately unpaginated: this is the home-feed listing and returns
    /// the full set.
    pub fn get_questions(&self) -> ActionResult<Vec<QuestionView>> {
        let questions = self.db.questions().find(
            Query::new().sort_by(|a: &Question, b: &Question| b.created_at.cmp(&a.created_at)),
        );
        views::resolve_questions(&self.db, &questions)
    }

    /// Insert a question and attach its tags.
    ///
    /// Tag attachment is find-or-create under case-insensitive exact match:
    /// a submission naming "Rust" attaches to an existing "rust" tag rather
    /// than duplicating it. The insert, the per-tag linkage, and the final
    /// tag-list write are separate store operations; a crash partway leaves
    /// a half-linked question that [`DevExchange::repair_tag_links`]
    /// reconciles. Awards the ask reputation to the author.
    pub fn create_question(&self, params: CreateQuestionParams) -> ActionResult<Question> {
        let CreateQuestionParams {
            title,
            content,
            tags,
            author,
        } = params;

        let title = title.trim().to_owned();
        let content = content.trim().to_owned();
        if title.is_empty() {
            return Err(ActionError::validation("question title must not be empty"));
        }
        if content.is_empty() {
            return Err(ActionError::validation("question content must not be empty"));
        }

        // Trim, drop empties, and collapse case-insensitive duplicates
        // while keeping submission order.
        let mut names: Vec<String> = Vec::new();
        for tag in &tags {
            let tag = tag.trim();
            if tag.is_empty() {
                continue;
            }
            if !names.iter().any(|seen| seen.eq_ignore_ascii_case(tag)) {
                names.push(tag.to_owned());
            }
        }
        if names.is_empty() {
            return Err(ActionError::validation("a question needs at least one tag"));
        }
        if names.len() > MAX_TAGS_PER_QUESTION {
            return Err(ActionError::validation(format!(
                "a question takes at most {MAX_TAGS_PER_QUESTION} tags"
            )));
        }

        if !self.db.users().contains(author) {
            warn!(author = %author.short_id(), "question author not found");
            return Err(ActionError::UserNotFound);
        }

        let question = Question::new(title, content, author);
        let question_id = self.db.questions().insert(question)?;

        let mut tag_ids: Vec<TagId> = Vec::with_capacity(names.len());
        for name in &names {
            let (tag, created) = self
                .db
                .tags()
                .get_or_insert_with(|t: &Tag| t.matches_name(name), || Tag::new(name.clone()))?;
            let _ = self.db.tags().update(tag.id, |t| {
                t.questions.insert(question_id);
            });
            if created {
                debug!(tag = %tag.id.short_id(), name = %tag.name, "tag created");
            }
            tag_ids.push(tag.id);
        }

        let (question, _) = self
            .db
            .questions()
            .update(question_id, |q| q.tags = tag_ids.clone())
            .ok_or(ActionError::QuestionNotFound)?;

        reputation::adjust(&self.db, author, self.reputation.question_created);
        debug!(
            question = %question_id.short_id(),
            author = %author.short_id(),
            tags = question.tags.len(),
            "question created"
        );
        Ok(question)
    }

    /// One question with tags (id + name) and author (id, auth id, name,
    /// picture) resolved.
    pub fn get_question(&self, question_id: QuestionId) -> ActionResult<QuestionView> {
        let question = self.db.questions().get(question_id).ok_or_else(|| {
            warn!(question = %question_id.short_id(), "question not found");
            ActionError::QuestionNotFound
        })?;
        views::resolve_question(&self.db, &question)
    }

    /// Toggle the caller's upvote. See [`VoteOutcome`] for the three-way
    /// branch; the author's reputation moves with the outcome unless the
    /// caller is the author.
    pub fn upvote_question(&self, params: QuestionVoteParams) -> ActionResult<VoteOutcome> {
        self.vote_question(params, VoteDirection::Up)
    }

    /// Toggle the caller's downvote.
    pub fn downvote_question(&self, params: QuestionVoteParams) -> ActionResult<VoteOutcome> {
        self.vote_question(params, VoteDirection::Down)
    }

    fn vote_question(
        &self,
        params: QuestionVoteParams,
        direction: VoteDirection,
    ) -> ActionResult<VoteOutcome> {
        let QuestionVoteParams {
            question_id,
            user_id,
        } = params;
        let (question, outcome) = self
            .db
            .questions()
            .update(question_id, |q| {
                vote::toggle(&mut q.upvotes, &mut q.downvotes, user_id, direction)
            })
            .ok_or_else(|| {
                warn!(question = %question_id.short_id(), "question not found for vote");
                ActionError::QuestionNotFound
            })?;
        debug!(
            question = %question_id.short_id(),
            voter = %user_id.short_id(),
            ?direction,
            ?outcome,
            "question vote toggled"
        );
        if question.author != user_id {
            reputation::adjust(
                &self.db,
                question.author,
                self.reputation.question_vote_delta(direction, outcome),
            );
        }
        Ok(outcome)
    }

    /// Bump the view counter. Returns the new count.
    pub fn record_view(&self, question_id: QuestionId) -> ActionResult<u64> {
        let (question, _) = self
            .db
            .questions()
            .update(question_id, |q| q.views += 1)
            .ok_or_else(|| {
                warn!(question = %question_id.short_id(), "question not found for view");
                ActionError::QuestionNotFound
            })?;
        Ok(question.views)
    }

    /// Replace a question's title and content. Tags are not editable here.
    pub fn edit_question(&self, params: EditQuestionParams) -> ActionResult<Question> {
        let EditQuestionParams {
            question_id,
            title,
            content,
        } = params;
        let title = title.trim().to_owned();
        let content = content.trim().to_owned();
        if title.is_empty() {
            return Err(ActionError::validation("question title must not be empty"));
        }
        if content.is_empty() {
            return Err(ActionError::validation("question content must not be empty"));
        }
        let (question, _) = self
            .db
            .questions()
            .update(question_id, |q| {
                q.title = title.clone();
                q.content = content.clone();
            })
            .ok_or_else(|| {
                warn!(question = %question_id.short_id(), "question not found for edit");
                ActionError::QuestionNotFound
            })?;
        debug!(question = %question_id.short_id(), "question edited");
        Ok(question)
    }

    /// Delete a question, its answers, its tag links, and any saved
    /// references to it. Returns the deleted record.
    pub fn delete_question(&self, question_id: QuestionId) -> ActionResult<Question> {
        let question = self.db.questions().get(question_id).ok_or_else(|| {
            warn!(question = %question_id.short_id(), "question not found for delete");
            ActionError::QuestionNotFound
        })?;
        self.remove_question_record(&question);
        Ok(question)
    }

    /// Cascade used by question and user deletion: answers go, tag links and
    /// saved references are pulled, then the record itself is removed.
    pub(crate) fn remove_question_record(&self, question: &Question) {
        let id = question.id;
        let answers = self.db.answers().delete_many(|a| a.question == id);
        self.db.tags().update_many(
            |t| t.questions.contains(&id),
            |t| {
                t.questions.remove(&id);
            },
        );
        self.db.users().update_many(
            |u| u.saved.contains(&id),
            |u| {
                u.saved.remove(&id);
            },
        );
        self.db.questions().delete(id);
        debug!(question = %id.short_id(), answers, "question deleted");
    }

    /// The five most viewed questions, ties broken by upvote count.
    pub fn hot_questions(&self) -> ActionResult<Vec<QuestionView>> {
        let hot = self.db.questions().find(
            Query::new()
                .sort_by(|a: &Question, b: &Question| {
                    b.views
                        .cmp(&a.views)
                        .then(b.upvote_count().cmp(&a.upvote_count()))
                })
                .limit(HOT_QUESTION_LIMIT),
        );
        views::resolve_questions(&self.db, &hot)
    }

    /// Reconcile tag/question cross-references.
    ///
    /// Question creation is multi-step, so an interrupted create can leave a
    /// tag pointing at a question that never got the back link. This sweep
    /// drops references to records that no longer exist on both sides and
    /// completes half-links from the tag side (the side written first).
    pub fn repair_tag_links(&self) -> RepairReport {
        let mut report = RepairReport::default();

        for question in self.db.questions().export() {
            let live: Vec<TagId> = question
                .tags
                .iter()
                .copied()
                .filter(|id| self.db.tags().contains(*id))
                .collect();
            if live.len() != question.tags.len() {
                report.dangling_tag_links += question.tags.len() - live.len();
                let _ = self.db.questions().update(question.id, |q| q.tags = live.clone());
            }
        }

        for tag in self.db.tags().export() {
            for question_id in tag.questions {
                match self.db.questions().get(question_id) {
                    None => {
                        let _ = self.db.tags().update(tag.id, |t| {
                            t.questions.remove(&question_id);
                        });
                        report.dangling_question_links += 1;
                    }
                    Some(q) if !q.tags.contains(&tag.id) => {
                        let _ = self.db.questions().update(question_id, |q| q.tags.push(tag.id));
                        report.relinked_questions += 1;
                    }
                    Some(_) => {}
                }
            }
        }

        if !report.is_clean() {
            info!(?report, "tag links repaired");
        }
        report
    }
}
