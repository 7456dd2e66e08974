//! Parsed sample values.

use std::fmt;

/// A numeric token read from a data column.
///
/// Integers are kept exact so they render without a fractional part; anything
/// else that parses as a floating-point number is stored as `f64`.
///
/// # Examples
/// ```
/// use cdfplot_core::SampleValue;
///
/// assert_eq!(SampleValue::parse("42"), Some(SampleValue::Int(42)));
/// assert_eq!(SampleValue::parse("4.5"), Some(SampleValue::Float(4.5)));
/// assert_eq!(SampleValue::parse("n/a"), None);
/// assert_eq!(SampleValue::Float(5.0).to_string(), "5.0");
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SampleValue {
    /// A token that parsed as a signed integer.
    Int(i64),
    /// A token that parsed as a floating-point number.
    Float(f64),
}

impl SampleValue {
    /// Sentinel used for statistics that were not computed.
    pub const ZERO: Self = Self::Int(0);

    /// Parses `token`, trying an integer first and a float second.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        let trimmed = token.trim();
        if let Ok(value) = trimmed.parse::<i64>() {
            return Some(Self::Int(value));
        }
        trimmed.parse::<f64>().ok().map(Self::Float)
    }

    /// Returns the value widened to `f64` for comparisons.
    #[expect(
        clippy::cast_precision_loss,
        reason = "comparisons against the mean happen in floating point"
    )]
    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(value) => value as f64,
            Self::Float(value) => value,
        }
    }
}

impl Default for SampleValue {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<f64> for SampleValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<i64> for SampleValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl fmt::Display for SampleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            // `Debug` keeps the trailing `.0` and switches to exponent form
            // for very large or small magnitudes.
            Self::Float(value) => write!(f, "{value:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case("7", SampleValue::Int(7))]
    #[case(" -3 ", SampleValue::Int(-3))]
    #[case("+12", SampleValue::Int(12))]
    #[case("0.25", SampleValue::Float(0.25))]
    #[case("1e3", SampleValue::Float(1000.0))]
    #[case("99999999999999999999", SampleValue::Float(1e20))]
    fn parse_prefers_integers(#[case] token: &str, #[case] expected: SampleValue) {
        assert_eq!(SampleValue::parse(token), Some(expected));
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("1,5")]
    fn parse_rejects_non_numbers(#[case] token: &str) {
        assert_eq!(SampleValue::parse(token), None);
    }

    #[rstest]
    #[case(SampleValue::Int(5), "5")]
    #[case(SampleValue::Float(5.0), "5.0")]
    #[case(SampleValue::Float(5.5), "5.5")]
    #[case(SampleValue::Float(-0.125), "-0.125")]
    fn display_matches_default_rendering(#[case] value: SampleValue, #[case] expected: &str) {
        assert_eq!(value.to_string(), expected);
    }
}
