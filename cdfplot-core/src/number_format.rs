//! printf-style rendering of statistics embedded in the plot script.

use std::fmt;

use thiserror::Error;

use crate::value::SampleValue;

/// Largest width or precision a pattern may request.
pub const MAX_PATTERN_FIELD: usize = 4096;

/// Reasons a number pattern is rejected.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum PatternError {
    /// The pattern has no `%` conversion.
    #[error("pattern has no conversion such as `%d` or `%.2f`")]
    MissingConversion,
    /// The pattern has more than one conversion.
    #[error("pattern has more than one conversion")]
    MultipleConversions,
    /// The pattern ends inside a conversion.
    #[error("pattern ends inside a conversion")]
    Truncated,
    /// The conversion character is not supported.
    #[error("unsupported conversion `%{0}`")]
    UnsupportedConversion(char),
    /// A width or precision is larger than [`MAX_PATTERN_FIELD`].
    #[error("width or precision exceeds {limit}")]
    FieldTooLarge {
        /// The largest accepted value.
        limit: usize,
    },
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
struct Flags {
    left: bool,
    plus: bool,
    space: bool,
    zero: bool,
    alternate: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Conversion {
    Decimal,
    Fixed { upper: bool },
    Exponent { upper: bool },
    General { upper: bool },
    Hex { upper: bool },
    Octal,
    Text,
}

impl Conversion {
    const fn from_char(conversion: char) -> Option<Self> {
        Some(match conversion {
            'd' | 'i' | 'u' => Self::Decimal,
            'f' => Self::Fixed { upper: false },
            'F' => Self::Fixed { upper: true },
            'e' => Self::Exponent { upper: false },
            'E' => Self::Exponent { upper: true },
            'g' => Self::General { upper: false },
            'G' => Self::General { upper: true },
            'x' => Self::Hex { upper: false },
            'X' => Self::Hex { upper: true },
            'o' => Self::Octal,
            's' => Self::Text,
            _ => return None,
        })
    }

    const fn is_upper(self) -> bool {
        matches!(
            self,
            Self::Fixed { upper: true }
                | Self::Exponent { upper: true }
                | Self::General { upper: true }
                | Self::Hex { upper: true }
        )
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Spec {
    flags: Flags,
    width: Option<usize>,
    precision: Option<usize>,
    conversion: Conversion,
}

/// A compiled printf-style pattern with exactly one numeric conversion.
///
/// Supported syntax is `%[flags][width][.precision]conversion` with flags
/// `-`, `+`, space, `0` and `#`, and conversions `d i u f F e E g G x X o s`.
/// Text around the conversion is copied verbatim and `%%` renders a literal
/// percent sign.
///
/// # Examples
/// ```
/// use cdfplot_core::{NumberPattern, SampleValue};
///
/// let pattern = NumberPattern::parse("%.2f")?;
/// assert_eq!(pattern.render(SampleValue::Float(3.14159)), "3.14");
///
/// let pattern = NumberPattern::parse("%d")?;
/// assert_eq!(pattern.render(SampleValue::Float(5.7)), "5");
/// # Ok::<(), cdfplot_core::PatternError>(())
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NumberPattern {
    source: String,
    prefix: String,
    spec: Spec,
    suffix: String,
}

impl NumberPattern {
    /// Compiles `pattern`.
    ///
    /// # Errors
    /// Returns a [`PatternError`] when the pattern has no conversion, more
    /// than one, an unknown conversion character, a width or precision above
    /// [`MAX_PATTERN_FIELD`], or ends mid-conversion.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let mut prefix = String::new();
        let mut suffix = String::new();
        let mut spec = None;
        let mut chars = pattern.chars().peekable();

        while let Some(current) = chars.next() {
            let literal = if spec.is_some() {
                &mut suffix
            } else {
                &mut prefix
            };
            if current != '%' {
                literal.push(current);
                continue;
            }
            if chars.peek() == Some(&'%') {
                chars.next();
                literal.push('%');
                continue;
            }
            if spec.is_some() {
                return Err(PatternError::MultipleConversions);
            }

            let mut flags = Flags::default();
            while let Some(&flag) = chars.peek() {
                match flag {
                    '-' => flags.left = true,
                    '+' => flags.plus = true,
                    ' ' => flags.space = true,
                    '0' => flags.zero = true,
                    '#' => flags.alternate = true,
                    _ => break,
                }
                chars.next();
            }
            let width = take_number(&mut chars)?;
            let precision = if chars.peek() == Some(&'.') {
                chars.next();
                Some(take_number(&mut chars)?.unwrap_or(0))
            } else {
                None
            };
            while chars.peek().is_some_and(|modifier| matches!(modifier, 'h' | 'l' | 'L')) {
                chars.next();
            }
            let conversion_char = chars.next().ok_or(PatternError::Truncated)?;
            let conversion = Conversion::from_char(conversion_char)
                .ok_or(PatternError::UnsupportedConversion(conversion_char))?;
            spec = Some(Spec {
                flags,
                width,
                precision,
                conversion,
            });
        }

        let spec = spec.ok_or(PatternError::MissingConversion)?;
        Ok(Self {
            source: pattern.to_owned(),
            prefix,
            spec,
            suffix,
        })
    }

    /// The pattern as supplied.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Renders `value` through the pattern.
    #[must_use]
    pub fn render(&self, value: SampleValue) -> String {
        let Spec {
            flags,
            width,
            precision,
            conversion,
        } = self.spec;

        let (negative, body, numeric) = match value {
            SampleValue::Float(raw) if !raw.is_finite() && conversion != Conversion::Text => {
                let word = if raw.is_nan() { "nan" } else { "inf" };
                let cased = if conversion.is_upper() {
                    word.to_ascii_uppercase()
                } else {
                    word.to_owned()
                };
                (raw.is_sign_negative() && !raw.is_nan(), cased, false)
            }
            _ => match conversion {
                Conversion::Text => {
                    let text = value.to_string();
                    let clipped = match precision {
                        Some(limit) => text.chars().take(limit).collect(),
                        None => text,
                    };
                    (false, clipped, false)
                }
                Conversion::Decimal => {
                    let (negative, digits) = integer_digits(value);
                    (negative, pad_digits(digits, precision), true)
                }
                Conversion::Hex { upper } => {
                    let (negative, magnitude) = integer_magnitude(value);
                    let digits = if upper {
                        format!("{magnitude:X}")
                    } else {
                        format!("{magnitude:x}")
                    };
                    let prefix = match (flags.alternate, upper) {
                        (true, false) => "0x",
                        (true, true) => "0X",
                        (false, _) => "",
                    };
                    (negative, format!("{prefix}{}", pad_digits(digits, precision)), true)
                }
                Conversion::Octal => {
                    let (negative, magnitude) = integer_magnitude(value);
                    let prefix = if flags.alternate { "0o" } else { "" };
                    (
                        negative,
                        format!("{prefix}{}", pad_digits(format!("{magnitude:o}"), precision)),
                        true,
                    )
                }
                Conversion::Fixed { .. } => {
                    let raw = value.as_f64();
                    let body = fixed(raw.abs(), precision.unwrap_or(6), flags.alternate);
                    (raw.is_sign_negative() && raw != 0.0, body, true)
                }
                Conversion::Exponent { upper } => {
                    let raw = value.as_f64();
                    let body = exponent(raw.abs(), precision.unwrap_or(6), flags.alternate, upper);
                    (raw.is_sign_negative() && raw != 0.0, body, true)
                }
                Conversion::General { upper } => {
                    let raw = value.as_f64();
                    let body = general(raw.abs(), precision.unwrap_or(6), flags.alternate, upper);
                    (raw.is_sign_negative() && raw != 0.0, body, true)
                }
            },
        };

        let sign = if negative {
            "-"
        } else if flags.plus && conversion != Conversion::Text {
            "+"
        } else if flags.space && conversion != Conversion::Text {
            " "
        } else {
            ""
        };

        let field = pad_field(sign, &body, width, flags, numeric);
        format!("{}{field}{}", self.prefix, self.suffix)
    }
}

impl fmt::Display for NumberPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn take_number(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> Result<Option<usize>, PatternError> {
    let mut number: Option<usize> = None;
    while let Some(digit) = chars.peek().and_then(|next| next.to_digit(10)) {
        chars.next();
        let current = number.unwrap_or(0) * 10 + digit as usize;
        if current > MAX_PATTERN_FIELD {
            return Err(PatternError::FieldTooLarge { limit: MAX_PATTERN_FIELD });
        }
        number = Some(current);
    }
    Ok(number)
}

fn pad_field(sign: &str, body: &str, width: Option<usize>, flags: Flags, numeric: bool) -> String {
    let used = sign.len() + body.chars().count();
    let fill = width.map_or(0, |target| target.saturating_sub(used));
    if fill == 0 {
        return format!("{sign}{body}");
    }
    if flags.left {
        format!("{sign}{body}{}", " ".repeat(fill))
    } else if flags.zero && numeric {
        // Zeros go between any radix prefix and the digits.
        let split = ["0x", "0X", "0o"]
            .iter()
            .find_map(|radix| body.strip_prefix(radix).map(|rest| (*radix, rest)));
        match split {
            Some((radix, rest)) => format!("{sign}{radix}{}{rest}", "0".repeat(fill)),
            None => format!("{sign}{}{body}", "0".repeat(fill)),
        }
    } else {
        format!("{}{sign}{body}", " ".repeat(fill))
    }
}

fn pad_digits(digits: String, precision: Option<usize>) -> String {
    match precision {
        Some(min) if digits.len() < min => format!("{}{digits}", "0".repeat(min - digits.len())),
        _ => digits,
    }
}

/// Sign and decimal digits of `value` truncated toward zero.
fn integer_digits(value: SampleValue) -> (bool, String) {
    match value {
        SampleValue::Int(int) => (int < 0, int.unsigned_abs().to_string()),
        SampleValue::Float(raw) => {
            let truncated = raw.trunc();
            (truncated < 0.0, format!("{:.0}", truncated.abs()))
        }
    }
}

/// Sign and magnitude of `value` truncated toward zero, saturating at
/// `u64::MAX`.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "float to integer casts saturate, which is the intended clamp"
)]
fn integer_magnitude(value: SampleValue) -> (bool, u64) {
    match value {
        SampleValue::Int(int) => (int < 0, int.unsigned_abs()),
        SampleValue::Float(raw) => {
            let truncated = raw.trunc();
            (truncated < 0.0, truncated.abs() as u64)
        }
    }
}

fn fixed(magnitude: f64, precision: usize, alternate: bool) -> String {
    let mut text = format!("{magnitude:.precision$}");
    if alternate && precision == 0 {
        text.push('.');
    }
    text
}

/// `{:e}` output rewritten to C style: `1.500000e+00`.
fn exponent(magnitude: f64, precision: usize, alternate: bool, upper: bool) -> String {
    let raw = format!("{magnitude:.precision$e}");
    let (mantissa, digits) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
    let power: i32 = digits.parse().unwrap_or(0);
    let marker = if upper { 'E' } else { 'e' };
    let sign = if power < 0 { '-' } else { '+' };
    let point = if alternate && precision == 0 { "." } else { "" };
    format!("{mantissa}{point}{marker}{sign}{:02}", power.unsigned_abs())
}

/// C `%g`: exponent form when the decimal exponent is below -4 or at least
/// the precision, fixed form otherwise, trailing zeros removed unless `#`.
fn general(magnitude: f64, precision: usize, alternate: bool, upper: bool) -> String {
    let significant = precision.max(1);
    let exponent_digits = significant - 1;
    let probe = format!("{magnitude:.exponent_digits$e}");
    let power: i64 = probe
        .split_once('e')
        .and_then(|(_, power)| power.parse().ok())
        .unwrap_or(0);

    let significant_i64 = i64::try_from(significant).unwrap_or(i64::MAX);
    let text = if power < -4 || power >= significant_i64 {
        exponent(magnitude, exponent_digits, alternate, upper)
    } else {
        let decimals = usize::try_from(significant_i64 - 1 - power).unwrap_or(0);
        fixed(magnitude, decimals, alternate)
    };
    if alternate {
        text
    } else {
        strip_trailing_zeros(&text)
    }
}

fn strip_trailing_zeros(text: &str) -> String {
    let (mantissa, tail) = match text.find(['e', 'E']) {
        Some(position) => text.split_at(position),
        None => (text, ""),
    };
    if !mantissa.contains('.') {
        return text.to_owned();
    }
    let trimmed = mantissa.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed}{tail}")
}

/// How statistics are turned into script text.
///
/// # Examples
/// ```
/// use cdfplot_core::{NumberFormat, SampleValue};
///
/// let plain = NumberFormat::from_pattern(None)?;
/// assert_eq!(plain.format(SampleValue::Float(2.5)), "2.5");
///
/// let pattern = NumberFormat::from_pattern(Some("%.1e"))?;
/// assert_eq!(pattern.format(SampleValue::Int(1500)), "1.5e+03");
/// # Ok::<(), cdfplot_core::PatternError>(())
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum NumberFormat {
    /// The value's default rendering.
    #[default]
    Plain,
    /// A user-supplied printf-style pattern.
    Pattern(NumberPattern),
}

impl NumberFormat {
    /// Builds a format from an optional pattern string.
    ///
    /// # Errors
    /// Returns a [`PatternError`] when `pattern` does not compile.
    pub fn from_pattern(pattern: Option<&str>) -> Result<Self, PatternError> {
        pattern.map_or(Ok(Self::Plain), |raw| NumberPattern::parse(raw).map(Self::Pattern))
    }

    /// Renders `value`.
    #[must_use]
    pub fn format(&self, value: SampleValue) -> String {
        match self {
            Self::Plain => value.to_string(),
            Self::Pattern(pattern) => pattern.render(value),
        }
    }
}
