use crate::engine::combine::Combination;

/// Expected value and stake sizing for one combination.
///
/// EV% = (market_price * fair_probability - 1) * 100
///
/// Stake (fixed calibration, % of bankroll):
///
///   raw   = (((1 / fair_price) * market_price - 1) / (market_price - 1)) * 0.2
///   stake = round(raw / 0.0025) * 0.25
///
/// The 0.2 factor caps aggressiveness at one fifth of the
/// edge-proportional stake and the output snaps to 0.25% increments for
/// bet-slip entry. This is intentionally not plain Kelly; the calibration
/// is given and reproduced as-is. All inputs are f64. Pure functions.

/// A combination annotated with EV and stake sizing. Ephemeral.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Valuation {
    #[serde(flatten)]
    pub combination: Combination,
    pub expected_value_percent: f64,
    pub estimated_profit: f64,
    pub suggested_stake_percent: f64,
    pub suggested_stake_amount: f64,
}

/// Annotate a combination with EV, flat-stake profit, and suggested stake.
///
/// `stake_base` is the hypothetical flat stake behind `estimated_profit`;
/// `bankroll <= 0.0` means "unknown", which suppresses the monetary stake
/// suggestion (percent is still computed).
pub fn evaluate(combination: Combination, stake_base: f64, bankroll: f64) -> Valuation {
    let expected_value_percent =
        (combination.market_price * combination.fair_probability - 1.0) * 100.0;
    let estimated_profit = stake_base * (expected_value_percent / 100.0);

    let suggested_stake_percent =
        stake_percent(combination.fair_price, combination.market_price);
    let suggested_stake_amount = if bankroll > 0.0 {
        bankroll * (suggested_stake_percent / 100.0)
    } else {
        0.0
    };

    Valuation {
        combination,
        expected_value_percent,
        estimated_profit,
        suggested_stake_percent,
        suggested_stake_amount,
    }
}

/// Suggested stake in percent of bankroll.
///
/// Degenerate prices (<= 1.0 anywhere) yield 0.0 rather than an error or
/// negative sizing. market_price == 1.0 would divide by zero in the raw
/// formula; any valid multi-leg combination is strictly > 1.0, but the
/// guard holds regardless of input.
#[inline]
pub fn stake_percent(fair_price: f64, market_price: f64) -> f64 {
    if fair_price <= 1.0 || market_price <= 1.0 {
        return 0.0;
    }
    let stake = quantize_stake_percent(raw_stake_fraction(fair_price, market_price));
    if stake <= 0.0 {
        return 0.0;
    }
    stake
}

/// Unquantized stake fraction: fractional edge-over-odds sizing with the
/// 0.2 aggressiveness cap. May be negative for EV- combinations.
#[inline]
fn raw_stake_fraction(fair_price: f64, market_price: f64) -> f64 {
    (((1.0 / fair_price) * market_price - 1.0) / (market_price - 1.0)) * 0.2
}

/// Snap a raw stake fraction to the nearest 0.25% increment.
/// Ties round half away from zero (f64::round).
#[inline]
fn quantize_stake_percent(raw: f64) -> f64 {
    (raw / 0.0025).round() * 0.25
}
