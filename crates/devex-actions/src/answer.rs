//! Answer operations: posting, listing under a question, and voting.

use tracing::{debug, warn};

use devex_model::Answer;
use devex_store::Query;
use devex_types::{AnswerId, Paged, Pagination, QuestionId, UserId};

use crate::error::{ActionError, ActionResult};
use crate::exchange::DevExchange;
use crate::reputation;
use crate::views::{self, AnswerView};
use crate::vote::{self, VoteDirection, VoteOutcome};

/// Parameters for [`DevExchange::create_answer`].
#[derive(Clone, Debug)]
pub struct CreateAnswerParams {
    pub content: String,
    pub author: UserId,
    pub question: QuestionId,
}

/// Orderings for [`DevExchange::get_answers`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AnswerSort {
    HighestUpvotes,
    LowestUpvotes,
    #[default]
    Recent,
    Old,
}

/// Parameters for [`DevExchange::get_answers`].
#[derive(Clone, Debug)]
pub struct GetAnswersParams {
    pub question_id: QuestionId,
    pub sort: AnswerSort,
    pub pagination: Pagination,
}

/// Parameters for [`DevExchange::upvote_answer`] and
/// [`DevExchange::downvote_answer`].
#[derive(Clone, Copy, Debug)]
pub struct AnswerVoteParams {
    pub answer_id: AnswerId,
    pub user_id: UserId,
}

// ---- Answer operations ----

impl DevExchange {
    /// Post an answer under a question. Awards the answer reputation to the
    /// author.
    pub fn create_answer(&self, params: CreateAnswerParams) -> ActionResult<Answer> {
        let CreateAnswerParams {
            content,
            author,
            question,
        } = params;
        let content = content.trim().to_owned();
        if content.is_empty() {
            return Err(ActionError::validation("answer content must not be empty"));
        }
        if !self.db.users().contains(author) {
            warn!(author = %author.short_id(), "answer author not found");
            return Err(ActionError::UserNotFound);
        }
        if !self.db.questions().contains(question) {
            warn!(question = %question.short_id(), "answered question not found");
            return Err(ActionError::QuestionNotFound);
        }

        let answer = Answer::new(content, question, author);
        let answer_id = self.db.answers().insert(answer.clone())?;
        reputation::adjust(&self.db, author, self.reputation.answer_created);
        debug!(
            answer = %answer_id.short_id(),
            question = %question.short_id(),
            author = %author.short_id(),
            "answer created"
        );
        Ok(answer)
    }

    /// Answers under one question, sorted and paginated, with the parent
    /// question and author resolved.
    pub fn get_answers(&self, params: GetAnswersParams) -> ActionResult<Paged<AnswerView>> {
        let GetAnswersParams {
            question_id,
            sort,
            pagination,
        } = params;
        if !self.db.questions().contains(question_id) {
            warn!(question = %question_id.short_id(), "question not found for answers");
            return Err(ActionError::QuestionNotFound);
        }

        let under_question = |a: &Answer| a.question == question_id;
        let total = self.db.answers().count(under_question);
        let answers = self.db.answers().find(
            Query::new()
                .filter(under_question)
                .sort_by(move |a: &Answer, b: &Answer| match sort {
                    AnswerSort::HighestUpvotes => b.upvote_count().cmp(&a.upvote_count()),
                    AnswerSort::LowestUpvotes => a.upvote_count().cmp(&b.upvote_count()),
                    AnswerSort::Recent => b.created_at.cmp(&a.created_at),
                    AnswerSort::Old => a.created_at.cmp(&b.created_at),
                })
                .paginate(&pagination),
        );
        let items = answers
            .iter()
            .map(|a| views::resolve_answer(&self.db, a))
            .collect::<ActionResult<Vec<_>>>()?;
        Ok(Paged::new(items, total, &pagination))
    }

    /// Toggle the caller's upvote on an answer. Reputation moves with the
    /// outcome unless the caller wrote the answer.
    pub fn upvote_answer(&self, params: AnswerVoteParams) -> ActionResult<VoteOutcome> {
        self.vote_answer(params, VoteDirection::Up)
    }

    /// Toggle the caller's downvote on an answer.
    pub fn downvote_answer(&self, params: AnswerVoteParams) -> ActionResult<VoteOutcome> {
        self.vote_answer(params, VoteDirection::Down)
    }

    fn vote_answer(
        &self,
        params: AnswerVoteParams,
        direction: VoteDirection,
    ) -> ActionResult<VoteOutcome> {
        let AnswerVoteParams { answer_id, user_id } = params;
        let (answer, outcome) = self
            .db
            .answers()
            .update(answer_id, |a| {
                vote::toggle(&mut a.upvotes, &mut a.downvotes, user_id, direction)
            })
            .ok_or_else(|| {
                warn!(answer = %answer_id.short_id(), "answer not found for vote");
                ActionError::AnswerNotFound
            })?;
        debug!(
            answer = %answer_id.short_id(),
            voter = %user_id.short_id(),
            ?direction,
            ?outcome,
            "answer vote toggled"
        );
        if answer.author != user_id {
            reputation::adjust(
                &self.db,
                answer.author,
                self.reputation.answer_vote_delta(direction, outcome),
            );
        }
        Ok(outcome)
    }
}
