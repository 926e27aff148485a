use crate::errors::{EngineError, EngineResult};

/// A single priced betting outcome carrying two independent prices:
/// the market price being evaluated for value and the reference price
/// treated as ground truth for deriving the hit probability.
///
/// Immutable value object. Both prices are validated strictly > 1.0 at
/// construction; a valid Selection can never produce a degenerate
/// probability later.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Selection {
    pub name: String,
    pub price_market: f64,
    pub price_reference: f64,
}

impl Selection {
    pub fn new(
        name: impl Into<String>,
        price_market: f64,
        price_reference: f64,
    ) -> EngineResult<Self> {
        let name = name.into();
        if !(price_market > 1.0) {
            return Err(EngineError::InvalidPrice {
                label: format!("{name} (market)"),
                price: price_market,
            });
        }
        if !(price_reference > 1.0) {
            return Err(EngineError::InvalidPrice {
                label: format!("{name} (reference)"),
                price: price_reference,
            });
        }
        Ok(Self {
            name,
            price_market,
            price_reference,
        })
    }

    /// Implied "true" hit probability from the reference price.
    #[inline]
    pub fn fair_probability(&self) -> f64 {
        1.0 / self.price_reference
    }

    /// Fair price. Numerically equal to the reference price, but kept as
    /// a distinct derived concept since it is recomposed per combination.
    #[inline]
    pub fn fair_price(&self) -> f64 {
        1.0 / self.fair_probability()
    }

    /// Informational single-leg EV percent (not part of the parlay math).
    #[inline]
    pub fn single_ev_percent(&self) -> f64 {
        (self.price_market / self.fair_price() - 1.0) * 100.0
    }

    /// Parse the one-line submission format `name;market;reference`,
    /// e.g. `Curry over 27.5;1.90;1.71`. Commas are accepted as decimal
    /// separators in the price fields.
    pub fn parse_line(line: &str) -> EngineResult<Self> {
        let parts: Vec<&str> = line.split(';').map(str::trim).collect();
        if parts.len() < 3 {
            return Err(EngineError::Parse(format!(
                "expected `name;market;reference`, got: {line}"
            )));
        }

        let name = parts[0];
        if name.is_empty() {
            return Err(EngineError::Parse("selection name is empty".into()));
        }

        let price_market = parse_price(parts[1])?;
        let price_reference = parse_price(parts[2])?;

        Self::new(name, price_market, price_reference)
    }
}

fn parse_price(raw: &str) -> EngineResult<f64> {
    raw.replace(',', ".")
        .parse::<f64>()
        .map_err(|_| EngineError::Parse(format!("not a price: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_selection() {
        let s = Selection::new("Curry over 27.5", 1.90, 1.71).unwrap();
        assert!((s.fair_probability() - 1.0 / 1.71).abs() < 1e-12);
        assert!((s.fair_price() - 1.71).abs() < 1e-9);
    }

    #[test]
    fn test_market_price_at_one_rejected() {
        let err = Selection::new("bad", 1.0, 1.71).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPrice { price, .. } if price == 1.0));
    }

    #[test]
    fn test_reference_price_below_one_rejected() {
        let err = Selection::new("bad", 1.90, 0.95).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPrice { .. }));
    }

    #[test]
    fn test_nan_price_rejected() {
        assert!(Selection::new("bad", f64::NAN, 1.71).is_err());
    }

    #[test]
    fn test_single_ev_sign() {
        let value = Selection::new("value", 1.90, 1.71).unwrap();
        assert!(value.single_ev_percent() > 0.0, "market above fair should be EV+");
        let dead = Selection::new("dead", 1.50, 1.71).unwrap();
        assert!(dead.single_ev_percent() < 0.0, "market below fair should be EV-");
    }

    #[test]
    fn test_parse_line() {
        let s = Selection::parse_line("Curry over 27.5;1.90;1.71").unwrap();
        assert_eq!(s.name, "Curry over 27.5");
        assert_eq!(s.price_market, 1.90);
        assert_eq!(s.price_reference, 1.71);
    }

    #[test]
    fn test_parse_line_comma_decimals() {
        let s = Selection::parse_line("Warriors +3.5; 2,00 ; 1,83").unwrap();
        assert_eq!(s.price_market, 2.00);
        assert_eq!(s.price_reference, 1.83);
    }

    #[test]
    fn test_parse_line_missing_fields() {
        let err = Selection::parse_line("Curry over 27.5;1.90").unwrap_err();
        assert!(matches!(err, EngineError::Parse(_)));
    }

    #[test]
    fn test_parse_line_bad_price_propagates_invalid() {
        let err = Selection::parse_line("foo;0.90;1.71").unwrap_err();
        assert!(matches!(err, EngineError::InvalidPrice { .. }));
    }
}
