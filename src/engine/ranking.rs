use crate::engine::valuation::Valuation;

/// Filter by minimum EV, rank by EV descending, truncate to the top n.
///
/// The sort is stable: results with equal EV keep their generation order
/// (leg count ascending, then enumeration order), so identical inputs
/// always produce identical output. An empty result is the normal
/// "no qualifying combination" terminal state, not an error.
pub fn filter_and_rank(results: Vec<Valuation>, ev_min: f64, top_n: usize) -> Vec<Valuation> {
    let mut kept: Vec<Valuation> = results
        .into_iter()
        .filter(|v| v.expected_value_percent >= ev_min)
        .collect();

    kept.sort_by(|a, b| {
        b.expected_value_percent
            .total_cmp(&a.expected_value_percent)
    });

    kept.truncate(top_n.max(1));
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::combine::Combination;
    use smallvec::smallvec;

    fn valuation(tag: &str, ev: f64) -> Valuation {
        Valuation {
            combination: Combination {
                legs: smallvec![tag.to_string()],
                leg_count: 2,
                market_price: 3.0,
                fair_price: 2.8,
                fair_probability: 1.0 / 2.8,
            },
            expected_value_percent: ev,
            estimated_profit: ev,
            suggested_stake_percent: 0.25,
            suggested_stake_amount: 0.0,
        }
    }

    #[test]
    fn test_filter_threshold_and_stable_ties() {
        let results = vec![
            valuation("first-five", 5.0),
            valuation("second-five", 5.0),
            valuation("three", 3.0),
            valuation("seven", 7.0),
        ];
        let ranked = filter_and_rank(results, 4.0, 20);
        let tags: Vec<&str> = ranked
            .iter()
            .map(|v| v.combination.legs[0].as_str())
            .collect();
        assert_eq!(tags, vec!["seven", "first-five", "second-five"]);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let results = vec![valuation("edge", 4.0), valuation("below", 3.999)];
        let ranked = filter_and_rank(results, 4.0, 20);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].combination.legs[0], "edge");
    }

    #[test]
    fn test_truncates_to_top_n() {
        let results = (0..10).map(|i| valuation("v", i as f64)).collect();
        let ranked = filter_and_rank(results, 0.0, 3);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].expected_value_percent, 9.0);
        assert_eq!(ranked[2].expected_value_percent, 7.0);
    }

    #[test]
    fn test_top_n_beyond_count_returns_all() {
        let results = vec![valuation("a", 1.0), valuation("b", 2.0)];
        assert_eq!(filter_and_rank(results, 0.0, 50).len(), 2);
    }

    #[test]
    fn test_nothing_survives_is_empty_not_error() {
        let results = vec![valuation("a", 1.0), valuation("b", 2.0)];
        assert!(filter_and_rank(results, 10.0, 20).is_empty());
    }
}
