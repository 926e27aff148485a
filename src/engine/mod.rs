pub mod combine;
pub mod ranking;
pub mod valuation;

use crate::selection::Selection;
use valuation::Valuation;

/// Evaluation parameters, range-defaulted by the caller before they reach
/// the core. Stack-allocated, Copy.
#[derive(Debug, Clone, Copy)]
pub struct EvalParams {
    pub min_legs: usize,
    pub max_legs: usize,
    pub ev_min: f64,
    pub stake_base: f64,
    pub top_n: usize,
    pub bankroll: f64,
}

/// Run the full pipeline over an immutable snapshot of the pool:
/// generate -> evaluate each -> filter_and_rank.
///
/// Synchronous and side-effect-free; safe to run concurrently across
/// sessions as long as each session's pool is not mutated mid-call.
pub fn evaluate_pool(selections: &[Selection], params: &EvalParams) -> Vec<Valuation> {
    let combinations = combine::generate(selections, params.min_legs, params.max_legs);
    let results: Vec<Valuation> = combinations
        .into_iter()
        .map(|c| valuation::evaluate(c, params.stake_base, params.bankroll))
        .collect();
    ranking::filter_and_rank(results, params.ev_min, params.top_n)
}
