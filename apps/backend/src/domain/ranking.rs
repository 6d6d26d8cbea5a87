//! Ranking of a finished round.
//!
//! Fewer rolls rank higher; equal roll counts are split by the shorter
//! duration. Ranks are dense and sequential (1..=N) in that order.

use std::cmp::Ordering;

/// One racer's frozen result for a round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundResult {
    pub user_id: i64,
    pub username: String,
    pub won: bool,
    pub roll_count: i32,
    pub duration_seconds: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankingEntry {
    pub rank: u32,
    pub user_id: i64,
    pub username: String,
    pub won: bool,
    /// Derived as `!won`: every finisher who did not win is reported as out of condition.
    pub game_over: bool,
    pub roll_count: i32,
    pub duration_seconds: f64,
}

fn rank_order(a: &RoundResult, b: &RoundResult) -> Ordering {
    a.roll_count
        .cmp(&b.roll_count)
        .then_with(|| a.duration_seconds.total_cmp(&b.duration_seconds))
}

pub fn rank_results(mut results: Vec<RoundResult>) -> Vec<RankingEntry> {
    // stable: equal keys keep storage order
    results.sort_by(rank_order);

    results
        .into_iter()
        .zip(1u32..)
        .map(|(r, rank)| RankingEntry {
            rank,
            user_id: r.user_id,
            username: r.username,
            won: r.won,
            game_over: !r.won,
            roll_count: r.roll_count,
            duration_seconds: r.duration_seconds,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(user_id: i64, name: &str, rolls: i32, dur: f64, won: bool) -> RoundResult {
        RoundResult {
            user_id,
            username: name.to_string(),
            won,
            roll_count: rolls,
            duration_seconds: dur,
        }
    }

    #[test]
    fn fewer_rolls_then_faster_wins() {
        let ranked = rank_results(vec![
            result(1, "A", 3, 10.0, true),
            result(2, "B", 5, 1.0, true),
            result(3, "C", 3, 5.0, true),
        ]);

        let order: Vec<(&str, u32)> = ranked.iter().map(|e| (e.username.as_str(), e.rank)).collect();
        assert_eq!(order, vec![("C", 1), ("A", 2), ("B", 3)]);
    }

    #[test]
    fn game_over_is_negation_of_won() {
        let ranked = rank_results(vec![result(1, "A", 6, 3.0, false), result(2, "B", 11, 9.0, true)]);
        assert_eq!(ranked[0].username, "A");
        assert!(ranked[0].game_over);
        assert!(!ranked[1].game_over);
    }

    #[test]
    fn ranks_are_sequential_even_on_full_ties() {
        let ranked = rank_results(vec![
            result(1, "A", 4, 2.0, true),
            result(2, "B", 4, 2.0, true),
        ]);
        assert_eq!(ranked.iter().map(|e| e.rank).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(ranked[0].user_id, 1);
    }

    #[test]
    fn empty_input_yields_empty_ranking() {
        assert!(rank_results(Vec::new()).is_empty());
    }
}
