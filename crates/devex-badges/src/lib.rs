//! Badge assignment for DevExchange.
//!
//! A pure mapping from accumulated activity counts to tiered achievement
//! credits: each criterion carries ascending per-tier thresholds, every tier
//! a count reaches earns one credit, and credits sum across criteria into a
//! single per-tier total. Deterministic, no I/O.

use serde::{Deserialize, Serialize};

/// Achievement tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BadgeTier {
    Bronze,
    Silver,
    Gold,
}

/// Activity counter a badge can be earned on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BadgeCriterion {
    QuestionCount,
    AnswerCount,
    QuestionUpvotes,
    AnswerUpvotes,
    TotalViews,
}

impl BadgeCriterion {
    /// Every criterion, in the order stats are assembled.
    pub const ALL: [BadgeCriterion; 5] = [
        BadgeCriterion::QuestionCount,
        BadgeCriterion::AnswerCount,
        BadgeCriterion::QuestionUpvotes,
        BadgeCriterion::AnswerUpvotes,
        BadgeCriterion::TotalViews,
    ];
}

/// One accumulated count for a criterion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionCount {
    pub criterion: BadgeCriterion,
    pub count: u64,
}

impl CriterionCount {
    pub fn new(criterion: BadgeCriterion, count: u64) -> Self {
        Self { criterion, count }
    }
}

/// Ascending per-tier thresholds for one criterion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub bronze: u64,
    pub silver: u64,
    pub gold: u64,
}

impl TierThresholds {
    pub const fn new(bronze: u64, silver: u64, gold: u64) -> Self {
        Self {
            bronze,
            silver,
            gold,
        }
    }
}

/// The thresholds table, per criterion.
///
/// Defaults mirror the original deployment's configuration; callers may
/// override any entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BadgeThresholds {
    pub question_count: TierThresholds,
    pub answer_count: TierThresholds,
    pub question_upvotes: TierThresholds,
    pub answer_upvotes: TierThresholds,
    pub total_views: TierThresholds,
}

impl BadgeThresholds {
    pub fn for_criterion(&self, criterion: BadgeCriterion) -> TierThresholds {
        match criterion {
            BadgeCriterion::QuestionCount => self.question_count,
            BadgeCriterion::AnswerCount => self.answer_count,
            BadgeCriterion::QuestionUpvotes => self.question_upvotes,
            BadgeCriterion::AnswerUpvotes => self.answer_upvotes,
            BadgeCriterion::TotalViews => self.total_views,
        }
    }
}

impl Default for BadgeThresholds {
    fn default() -> Self {
        Self {
            question_count: TierThresholds::new(10, 50, 100),
            answer_count: TierThresholds::new(10, 50, 100),
            question_upvotes: TierThresholds::new(10, 50, 100),
            answer_upvotes: TierThresholds::new(10, 50, 100),
            total_views: TierThresholds::new(1_000, 10_000, 100_000),
        }
    }
}

/// Badge credits per tier, summed across all criteria.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeCounts {
    pub bronze: u32,
    pub silver: u32,
    pub gold: u32,
}

impl BadgeCounts {
    pub fn total(&self) -> u32 {
        self.bronze + self.silver + self.gold
    }

    fn credit(&mut self, tier: BadgeTier) {
        match tier {
            BadgeTier::Bronze => self.bronze += 1,
            BadgeTier::Silver => self.silver += 1,
            BadgeTier::Gold => self.gold += 1,
        }
    }
}

/// Assign badge credits for a set of accumulated counts.
///
/// For each criterion, each tier whose threshold the count reaches earns one
/// credit; a count past Gold therefore earns Bronze, Silver, and Gold at
/// once. Credits from all criteria are summed into one result.
pub fn assign_badges(criteria: &[CriterionCount], thresholds: &BadgeThresholds) -> BadgeCounts {
    let mut counts = BadgeCounts::default();
    for item in criteria {
        let t = thresholds.for_criterion(item.criterion);
        if item.count >= t.bronze {
            counts.credit(BadgeTier::Bronze);
        }
        if item.count >= t.silver {
            counts.credit(BadgeTier::Silver);
        }
        if item.count >= t.gold {
            counts.credit(BadgeTier::Gold);
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn question_count(n: u64) -> Vec<CriterionCount> {
        vec![CriterionCount::new(BadgeCriterion::QuestionCount, n)]
    }

    #[test]
    fn below_bronze_earns_nothing() {
        let counts = assign_badges(&question_count(9), &BadgeThresholds::default());
        assert_eq!(counts, BadgeCounts::default());
    }

    #[test]
    fn twelve_questions_is_one_bronze_zero_silver() {
        let counts = assign_badges(&question_count(12), &BadgeThresholds::default());
        assert_eq!(counts.bronze, 1);
        assert_eq!(counts.silver, 0);
        assert_eq!(counts.gold, 0);
    }

    #[test]
    fn exact_threshold_counts() {
        let counts = assign_badges(&question_count(10), &BadgeThresholds::default());
        assert_eq!(counts.bronze, 1);
        let counts = assign_badges(&question_count(50), &BadgeThresholds::default());
        assert_eq!((counts.bronze, counts.silver), (1, 1));
    }

    #[test]
    fn past_gold_earns_all_three() {
        let counts = assign_badges(&question_count(150), &BadgeThresholds::default());
        assert_eq!(counts, BadgeCounts { bronze: 1, silver: 1, gold: 1 });
    }

    #[test]
    fn credits_sum_across_criteria() {
        let criteria = vec![
            CriterionCount::new(BadgeCriterion::QuestionCount, 12),
            CriterionCount::new(BadgeCriterion::AnswerCount, 55),
            CriterionCount::new(BadgeCriterion::TotalViews, 2_000),
        ];
        let counts = assign_badges(&criteria, &BadgeThresholds::default());
        // 12 questions: bronze. 55 answers: bronze + silver. 2000 views: bronze.
        assert_eq!(counts.bronze, 3);
        assert_eq!(counts.silver, 1);
        assert_eq!(counts.gold, 0);
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn views_use_their_own_scale() {
        // 100 would be Gold for question counts, but is far below the
        // Bronze threshold for views.
        let criteria = vec![CriterionCount::new(BadgeCriterion::TotalViews, 100)];
        let counts = assign_badges(&criteria, &BadgeThresholds::default());
        assert_eq!(counts, BadgeCounts::default());
    }

    #[test]
    fn custom_thresholds_are_honored() {
        let thresholds = BadgeThresholds {
            question_count: TierThresholds::new(1, 2, 3),
            ..BadgeThresholds::default()
        };
        let counts = assign_badges(&question_count(2), &thresholds);
        assert_eq!((counts.bronze, counts.silver, counts.gold), (1, 1, 0));
    }

    #[test]
    fn empty_criteria_earn_nothing() {
        let counts = assign_badges(&[], &BadgeThresholds::default());
        assert_eq!(counts.total(), 0);
    }

    #[test]
    fn serde_roundtrip() {
        let t = BadgeThresholds::default();
        let json = serde_json::to_string(&t).unwrap();
        let parsed: BadgeThresholds = serde_json::from_str(&json).unwrap();
        assert_eq!(t, parsed);
    }

    proptest! {
        // A larger count never earns fewer credits.
        #[test]
        fn assignment_is_monotone(count in 0u64..200_000, bump in 0u64..200_000) {
            let thresholds = BadgeThresholds::default();
            for criterion in BadgeCriterion::ALL {
                let lo = assign_badges(
                    &[CriterionCount::new(criterion, count)], &thresholds);
                let hi = assign_badges(
                    &[CriterionCount::new(criterion, count + bump)], &thresholds);
                prop_assert!(hi.bronze >= lo.bronze);
                prop_assert!(hi.silver >= lo.silver);
                prop_assert!(hi.gold >= lo.gold);
            }
        }

        // Per-criterion credits are independent: summing inputs sums outputs.
        #[test]
        fn credits_are_additive(a in 0u64..1_000, b in 0u64..1_000) {
            let thresholds = BadgeThresholds::default();
            let qa = CriterionCount::new(BadgeCriterion::QuestionCount, a);
            let ab = CriterionCount::new(BadgeCriterion::AnswerCount, b);
            let together = assign_badges(&[qa, ab], &thresholds);
            let apart_q = assign_badges(&[qa], &thresholds);
            let apart_a = assign_badges(&[ab], &thresholds);
            prop_assert_eq!(together.bronze, apart_q.bronze + apart_a.bronze);
            prop_assert_eq!(together.silver, apart_q.silver + apart_a.silver);
            prop_assert_eq!(together.gold, apart_q.gold + apart_a.gold);
        }
    }
}
