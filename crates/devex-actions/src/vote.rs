use std::collections::BTreeSet;

use devex_types::UserId;

/// Direction of a vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoteDirection {
    Up,
    Down,
}

/// What a toggle did to the voter's membership.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoteOutcome {
    /// No prior vote; the vote was added.
    Cast,
    /// A same-direction vote existed; it was removed.
    Retracted,
    /// An opposite-direction vote existed; it was replaced.
    Switched,
}

/// Apply one toggle-vote to a record's vote sets.
///
/// Keeps the invariant that a voter is in at most one of the two sets:
/// voting the current direction retracts, voting the opposite direction
/// switches, and a first vote casts. Runs inside the record's atomic
/// update, so concurrent toggles serialize.
pub fn toggle(
    upvotes: &mut BTreeSet<UserId>,
    downvotes: &mut BTreeSet<UserId>,
    voter: UserId,
    direction: VoteDirection,
) -> VoteOutcome {
    let (same, opposite) = match direction {
        VoteDirection::Up => (upvotes, downvotes),
        VoteDirection::Down => (downvotes, upvotes),
    };
    if same.remove(&voter) {
        return VoteOutcome::Retracted;
    }
    let switched = opposite.remove(&voter);
    same.insert(voter);
    if switched {
        VoteOutcome::Switched
    } else {
        VoteOutcome::Cast
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sets() -> (BTreeSet<UserId>, BTreeSet<UserId>) {
        (BTreeSet::new(), BTreeSet::new())
    }

    #[test]
    fn first_vote_casts() {
        let (mut up, mut down) = sets();
        let u = UserId::new();
        assert_eq!(toggle(&mut up, &mut down, u, VoteDirection::Up), VoteOutcome::Cast);
        assert!(up.contains(&u));
        assert!(down.is_empty());
    }

    #[test]
    fn same_direction_retracts() {
        let (mut up, mut down) = sets();
        let u = UserId::new();
        toggle(&mut up, &mut down, u, VoteDirection::Up);
        assert_eq!(
            toggle(&mut up, &mut down, u, VoteDirection::Up),
            VoteOutcome::Retracted
        );
        assert!(up.is_empty());
        assert!(down.is_empty());
    }

    #[test]
    fn opposite_direction_switches() {
        let (mut up, mut down) = sets();
        let u = UserId::new();
        toggle(&mut up, &mut down, u, VoteDirection::Up);
        assert_eq!(
            toggle(&mut up, &mut down, u, VoteDirection::Down),
            VoteOutcome::Switched
        );
        assert!(up.is_empty());
        assert!(down.contains(&u));
    }

    #[test]
    fn voters_stay_independent() {
        let (mut up, mut down) = sets();
        let a = UserId::new();
        let b = UserId::new();
        toggle(&mut up, &mut down, a, VoteDirection::Up);
        toggle(&mut up, &mut down, b, VoteDirection::Down);
        assert_eq!(toggle(&mut up, &mut down, a, VoteDirection::Up), VoteOutcome::Retracted);
        assert!(down.contains(&b));
        assert_eq!(up.len(), 0);
        assert_eq!(down.len(), 1);
    }

    #[test]
    fn down_then_down_retracts() {
        let (mut up, mut down) = sets();
        let u = UserId::new();
        toggle(&mut up, &mut down, u, VoteDirection::Down);
        assert_eq!(
            toggle(&mut up, &mut down, u, VoteDirection::Down),
            VoteOutcome::Retracted
        );
        assert!(down.is_empty());
    }
}
