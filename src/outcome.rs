//! Win/loss/draw derivation from a goal pair.

use std::cmp::Ordering;

use crate::types::MatchResult;

/// Derive `(home_result, away_result)` from the goal counts.
///
/// Unknown goals on either side leave both results unknown.
pub fn match_outcome(
    home_goals: Option<u32>,
    away_goals: Option<u32>,
) -> (Option<MatchResult>, Option<MatchResult>) {
    let (Some(home), Some(away)) = (home_goals, away_goals) else {
        return (None, None);
    };

    let (h, a) = match home.cmp(&away) {
        Ordering::Greater => (MatchResult::Winner, MatchResult::Loser),
        Ordering::Less => (MatchResult::Loser, MatchResult::Winner),
        Ordering::Equal => (MatchResult::Draw, MatchResult::Draw),
    };
    (Some(h), Some(a))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_win() {
        assert_eq!(
            match_outcome(Some(3), Some(1)),
            (Some(MatchResult::Winner), Some(MatchResult::Loser))
        );
    }

    #[test]
    fn test_away_win() {
        assert_eq!(
            match_outcome(Some(0), Some(2)),
            (Some(MatchResult::Loser), Some(MatchResult::Winner))
        );
    }

    #[test]
    fn test_draw() {
        assert_eq!(
            match_outcome(Some(2), Some(2)),
            (Some(MatchResult::Draw), Some(MatchResult::Draw))
        );
    }

    #[test]
    fn test_null_goals_propagate() {
        assert_eq!(match_outcome(None, Some(1)), (None, None));
        assert_eq!(match_outcome(Some(1), None), (None, None));
        assert_eq!(match_outcome(None, None), (None, None));
    }

    #[test]
    fn test_results_mutually_exclusive() {
        for h in 0..8u32 {
            for a in 0..8u32 {
                let (home, away) = match_outcome(Some(h), Some(a));
                let (home, away) = (home.unwrap(), away.unwrap());
                match home {
                    MatchResult::Winner => assert_eq!(away, MatchResult::Loser),
                    MatchResult::Loser => assert_eq!(away, MatchResult::Winner),
                    MatchResult::Draw => assert_eq!(away, MatchResult::Draw),
                }
            }
        }
    }
}
