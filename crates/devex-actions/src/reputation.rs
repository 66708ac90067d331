use serde::{Deserialize, Serialize};
use tracing::debug;

use devex_model::Database;
use devex_types::UserId;

use crate::vote::{VoteDirection, VoteOutcome};

/// Fixed reputation deltas per action type.
///
/// Every delta is configurable; defaults follow the original deployment's
/// point scheme (+5 ask, +10 answer, +5 per received question upvote).
/// Deltas are applied to the *author* of the affected record when a vote is
/// cast and reversed when it is retracted; a direction switch applies both.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReputationPolicy {
    pub question_created: i64,
    pub answer_created: i64,
    pub question_upvote_received: i64,
    pub question_downvote_received: i64,
    pub answer_upvote_received: i64,
    pub answer_downvote_received: i64,
}

impl Default for ReputationPolicy {
    fn default() -> Self {
        Self {
            question_created: 5,
            answer_created: 10,
            question_upvote_received: 5,
            question_downvote_received: -2,
            answer_upvote_received: 5,
            answer_downvote_received: -2,
        }
    }
}

impl ReputationPolicy {
    /// Author delta for a vote on a question.
    pub fn question_vote_delta(&self, direction: VoteDirection, outcome: VoteOutcome) -> i64 {
        vote_delta(
            self.question_upvote_received,
            self.question_downvote_received,
            direction,
            outcome,
        )
    }

    /// Author delta for a vote on an answer.
    pub fn answer_vote_delta(&self, direction: VoteDirection, outcome: VoteOutcome) -> i64 {
        vote_delta(
            self.answer_upvote_received,
            self.answer_downvote_received,
            direction,
            outcome,
        )
    }
}

fn vote_delta(up: i64, down: i64, direction: VoteDirection, outcome: VoteOutcome) -> i64 {
    let (cast, reversed) = match direction {
        VoteDirection::Up => (up, down),
        VoteDirection::Down => (down, up),
    };
    match outcome {
        VoteOutcome::Cast => cast,
        VoteOutcome::Retracted => -cast,
        VoteOutcome::Switched => cast - reversed,
    }
}

/// Adjust a user's reputation. A zero delta or a missing user (deleted
/// between the vote and the adjustment) is a no-op.
pub(crate) fn adjust(db: &Database, user: UserId, delta: i64) {
    if delta == 0 {
        return;
    }
    if let Some((updated, _)) = db.users().update(user, |u| u.reputation += delta) {
        debug!(user = %user.short_id(), delta, reputation = updated.reputation, "reputation adjusted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_point_scheme() {
        let p = ReputationPolicy::default();
        assert_eq!(p.question_created, 5);
        assert_eq!(p.answer_created, 10);
        assert_eq!(p.question_upvote_received, 5);
        assert_eq!(p.question_downvote_received, -2);
    }

    #[test]
    fn cast_and_retract_cancel_out() {
        let p = ReputationPolicy::default();
        let cast = p.question_vote_delta(VoteDirection::Up, VoteOutcome::Cast);
        let retract = p.question_vote_delta(VoteDirection::Up, VoteOutcome::Retracted);
        assert_eq!(cast + retract, 0);
    }

    #[test]
    fn switch_is_reverse_plus_cast() {
        let p = ReputationPolicy::default();
        // Down (-2) switched to Up (+5): author recovers the 2 and gains 5.
        let delta = p.question_vote_delta(VoteDirection::Up, VoteOutcome::Switched);
        assert_eq!(delta, 7);
        // Up switched to Down: -5 - 2.
        let delta = p.question_vote_delta(VoteDirection::Down, VoteOutcome::Switched);
        assert_eq!(delta, -7);
    }

    #[test]
    fn downvote_cast_applies_penalty() {
        let p = ReputationPolicy::default();
        assert_eq!(p.answer_vote_delta(VoteDirection::Down, VoteOutcome::Cast), -2);
        assert_eq!(
            p.answer_vote_delta(VoteDirection::Down, VoteOutcome::Retracted),
            2
        );
    }

    #[test]
    fn serde_partial_config_fills_defaults() {
        let p: ReputationPolicy =
            serde_json::from_str(r#"{"question_created": 3}"#).unwrap();
        assert_eq!(p.question_created, 3);
        assert_eq!(p.answer_created, 10);
    }
}
