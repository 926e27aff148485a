use crate::selection::Selection;
use smallvec::SmallVec;

/// Combination enumeration.
///
/// For every leg count r in [min_legs, max_legs], emit every size-r subset
/// of the selection pool (C(n, r) per leg count, order-irrelevant) with:
///
///   market_price     = prod(price_market)     over legs
///   fair_probability = prod(1/price_reference) over legs
///   fair_price       = 1 / fair_probability
///
/// Legs are assumed statistically independent; the products are a modeling
/// choice inherent to the domain, not something the caller must verify.
///
/// Output order is deterministic: leg count ascending, then lexicographic
/// index order within a leg count. Downstream ranking uses this order as
/// its tie-break, so it must never change silently.

/// An evaluated parlay candidate. Ephemeral: built fresh per request,
/// never stored.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Combination {
    /// Leg names, for display (identity is not unique-constrained).
    pub legs: SmallVec<[String; 4]>,
    pub leg_count: usize,
    pub market_price: f64,
    pub fair_price: f64,
    pub fair_probability: f64,
}

/// Enumerate all combinations in the coerced leg-count range.
///
/// Coercions: `min_legs` is floored at 2 (this is a multiples-only
/// engine), `max_legs` is raised to `min_legs` and clamped to the pool
/// size. A pool smaller than `min_legs` yields an empty vec -- enumerating
/// zero combinations is a valid terminal outcome, not an error.
pub fn generate(selections: &[Selection], min_legs: usize, max_legs: usize) -> Vec<Combination> {
    let n = selections.len();
    let min_legs = min_legs.max(2);
    let max_legs = max_legs.max(min_legs).min(n);

    if min_legs > n {
        return Vec::new();
    }

    let mut out = Vec::new();
    for r in min_legs..=max_legs {
        for_each_subset(n, r, |idx| {
            let mut legs: SmallVec<[String; 4]> = SmallVec::with_capacity(r);
            let mut market_price = 1.0;
            let mut fair_probability = 1.0;
            for &i in idx {
                let s = &selections[i];
                legs.push(s.name.clone());
                market_price *= s.price_market;
                fair_probability *= s.fair_probability();
            }
            out.push(Combination {
                legs,
                leg_count: r,
                market_price,
                fair_price: 1.0 / fair_probability,
                fair_probability,
            });
        });
    }
    out
}

/// Visit every size-r index subset of 0..n in lexicographic order.
fn for_each_subset(n: usize, r: usize, mut visit: impl FnMut(&[usize])) {
    if r == 0 || r > n {
        return;
    }
    let mut idx: Vec<usize> = (0..r).collect();
    loop {
        visit(&idx);

        // Lexicographic successor: bump the rightmost index that has room.
        let mut i = r;
        while i > 0 && idx[i - 1] == n - r + (i - 1) {
            i -= 1;
        }
        if i == 0 {
            return;
        }
        idx[i - 1] += 1;
        for j in i..r {
            idx[j] = idx[j - 1] + 1;
        }
    }
}
