use crate::engine::valuation::Valuation;

/// Plain-text rendering of ranked valuations, one block per combination.
/// Pure function over the ranked results; the transport decides where the
/// text ends up (API response field, chat message, terminal).
pub fn render(results: &[Valuation], stake_base: f64, bankroll: f64) -> String {
    if results.is_empty() {
        return "No combination reached the minimum EV.".to_string();
    }

    let mut out = String::from("TOP EV+ MULTIPLES\n\n");
    for (i, r) in results.iter().enumerate() {
        let rank = i + 1;
        let c = &r.combination;
        let legs = c.legs.join(" / ");

        out.push_str(&format!("#{rank} -- {} legs\n", c.leg_count));
        out.push_str(&format!("{legs}\n"));
        out.push_str(&format!(
            "Hit probability: {:.2}%\n",
            c.fair_probability * 100.0
        ));
        out.push_str(&format!("Fair price: {:.3}\n", c.fair_price));
        out.push_str(&format!("Market price: {:.3}\n", c.market_price));
        out.push_str(&format!("EV: {:.2}%\n", r.expected_value_percent));
        out.push_str(&format!(
            "Expected profit at {stake_base:.2} stake: {:.2}\n",
            r.estimated_profit
        ));
        out.push_str(&format!(
            "Suggested stake: {:.2}% of bankroll\n",
            r.suggested_stake_percent
        ));
        if r.suggested_stake_amount > 0.0 {
            out.push_str(&format!(
                "Suggested stake (bankroll {bankroll:.2}): {:.2}\n",
                r.suggested_stake_amount
            ));
        }
        out.push_str("------------------------\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{self, EvalParams};
    use crate::selection::Selection;

    fn ranked(bankroll: f64) -> Vec<crate::engine::valuation::Valuation> {
        let pool = vec![
            Selection::new("Curry over 27.5", 1.90, 1.71).unwrap(),
            Selection::new("Warriors +3.5", 2.00, 1.83).unwrap(),
        ];
        engine::evaluate_pool(
            &pool,
            &EvalParams {
                min_legs: 2,
                max_legs: 2,
                ev_min: 0.0,
                stake_base: 100.0,
                top_n: 20,
                bankroll,
            },
        )
    }

    #[test]
    fn test_render_contains_combination_facts() {
        let text = render(&ranked(0.0), 100.0, 0.0);
        assert!(text.contains("#1 -- 2 legs"));
        assert!(text.contains("Curry over 27.5 / Warriors +3.5"));
        assert!(text.contains("Market price: 3.800"));
        assert!(text.contains("EV: 21.4"));
        assert!(
            !text.contains("bankroll 0"),
            "no monetary stake line without a bankroll"
        );
    }

    #[test]
    fn test_render_with_bankroll_adds_amount_line() {
        let text = render(&ranked(2000.0), 100.0, 2000.0);
        assert!(text.contains("Suggested stake (bankroll 2000.00)"));
    }

    #[test]
    fn test_render_empty_is_no_qualifier_message() {
        assert_eq!(render(&[], 100.0, 0.0), "No combination reached the minimum EV.");
    }
}
