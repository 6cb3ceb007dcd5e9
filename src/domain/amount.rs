use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// Inclusive range of accepted transaction amounts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmountBounds {
    pub min: Decimal,
    pub max: Decimal,
}

impl AmountBounds {
    pub fn new(min: Decimal, max: Decimal) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: Decimal) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Represents a transaction amount that has passed the configured bounds check.
///
/// Wraps `rust_decimal::Decimal` so boundary comparisons are exact; `0.01` and
/// `999999.99` never drift the way binary floats do.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Amount(Decimal);

impl Amount {
    /// Builds an `Amount` from a raw payload value, returning `None` when the
    /// value is not numeric or falls outside `bounds`.
    pub fn from_json(value: &Value, bounds: &AmountBounds) -> Option<Self> {
        let decimal = parse_decimal(value)?;
        bounds.contains(decimal).then_some(Self(decimal))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// Accepts JSON numbers and numeric strings. Booleans, null and containers
/// are not numeric.
fn parse_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_str(&n.to_string()),
        Value::String(s) => parse_str(s.trim()),
        _ => None,
    }
}

fn parse_str(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}
