//! Exact resource quantities.
//!
//! Parses and renders Kubernetes quantity strings ("100m", "400Mi", "1e3")
//! and supports addition. `k8s_openapi`'s `Quantity` is only a string
//! wrapper, so arithmetic lives here.
//!
//! Values are stored as a signed count of nano units. Anything finer than
//! one nano unit is rounded away from zero when parsing.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use k8s_openapi::apimachinery::pkg::api::resource::Quantity as K8sQuantity;
use thiserror::Error;

const NANOS_PER_UNIT: i128 = 1_000_000_000;

/// Binary suffixes, indexed by power of 1024.
const BINARY_SUFFIXES: [&str; 7] = ["", "Ki", "Mi", "Gi", "Ti", "Pi", "Ei"];

/// Errors produced while parsing or combining quantities.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    #[error("empty quantity string")]
    Empty,

    #[error("invalid number in quantity {0:?}")]
    InvalidNumber(String),

    #[error("unknown suffix in quantity {0:?}")]
    InvalidSuffix(String),

    #[error("quantity {0:?} is out of range")]
    Overflow(String),
}

/// Serialization format carried by a quantity.
///
/// Addition keeps the format of the left operand, so "2Gi" + "20Gi"
/// renders in binary and "100m" + "1" renders in decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    /// Decimal SI suffixes (`m`, `k`, `M`, `G`, ...).
    #[default]
    DecimalSI,
    /// Power-of-two suffixes (`Ki`, `Mi`, `Gi`, ...).
    BinarySI,
    /// Scientific notation (`1e3`).
    DecimalExponent,
}

/// An exact numeric-with-unit resource amount.
#[derive(Debug, Clone, Copy, Default)]
pub struct Quantity {
    nanos: i128,
    format: Format,
}

impl Quantity {
    /// The zero quantity.
    pub const fn zero() -> Self {
        Self {
            nanos: 0,
            format: Format::DecimalSI,
        }
    }

    /// Build a quantity from a whole number of units.
    pub fn from_units(units: i64, format: Format) -> Self {
        Self {
            nanos: i128::from(units) * NANOS_PER_UNIT,
            format,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.nanos == 0
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// Value in nano units.
    pub fn as_nanos(&self) -> i128 {
        self.nanos
    }

    /// Add two quantities.
    ///
    /// The result takes the left operand's format unless the left operand is
    /// zero, in which case the right operand's format wins.
    pub fn checked_add(&self, other: &Quantity) -> Result<Quantity, QuantityError> {
        let nanos = self
            .nanos
            .checked_add(other.nanos)
            .ok_or_else(|| QuantityError::Overflow(format!("{} + {}", self, other)))?;
        let format = if self.is_zero() {
            other.format
        } else {
            self.format
        };
        Ok(Quantity { nanos, format })
    }

    /// Sum an iterator of quantities, starting from zero.
    pub fn checked_sum<'a, I>(iter: I) -> Result<Quantity, QuantityError>
    where
        I: IntoIterator<Item = &'a Quantity>,
    {
        iter.into_iter()
            .try_fold(Quantity::zero(), |acc, q| acc.checked_add(q))
    }

    /// Render as a `k8s_openapi` quantity.
    pub fn to_k8s(&self) -> K8sQuantity {
        K8sQuantity(self.to_string())
    }

    fn parse(input: &str) -> Result<Self, QuantityError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(QuantityError::Empty);
        }

        let (negative, rest) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };

        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, suffix) = rest.split_at(number_len);

        let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
        if (whole.is_empty() && fraction.is_empty()) || fraction.contains('.') {
            return Err(QuantityError::InvalidNumber(input.to_string()));
        }

        let overflow = || QuantityError::Overflow(input.to_string());

        let mut digits: i128 = 0;
        for c in whole.chars().chain(fraction.chars()) {
            let d = i128::from(c as u8 - b'0');
            digits = digits
                .checked_mul(10)
                .and_then(|v| v.checked_add(d))
                .ok_or_else(overflow)?;
        }
        let fraction_len = fraction.len() as i32;

        let (scaled, format) = match parse_suffix(suffix) {
            Some(Scale::Decimal(exp, format)) => {
                let shift = exp.saturating_add(9).saturating_sub(fraction_len);
                (shift_decimal(digits, shift).ok_or_else(overflow)?, format)
            }
            Some(Scale::Binary(power)) => {
                let factor = 1i128 << (10 * power);
                let value = digits
                    .checked_mul(factor)
                    .and_then(|v| v.checked_mul(NANOS_PER_UNIT))
                    .ok_or_else(overflow)?;
                (
                    shift_decimal(value, -fraction_len).ok_or_else(overflow)?,
                    Format::BinarySI,
                )
            }
            None => return Err(QuantityError::InvalidSuffix(input.to_string())),
        };

        Ok(Quantity {
            nanos: if negative { -scaled } else { scaled },
            format,
        })
    }
}

enum Scale {
    Decimal(i32, Format),
    Binary(u32),
}

fn parse_suffix(suffix: &str) -> Option<Scale> {
    let decimal = |exp| Some(Scale::Decimal(exp, Format::DecimalSI));
    match suffix {
        "" => decimal(0),
        "n" => decimal(-9),
        "u" => decimal(-6),
        "m" => decimal(-3),
        "k" => decimal(3),
        "M" => decimal(6),
        "G" => decimal(9),
        "T" => decimal(12),
        "P" => decimal(15),
        "E" => decimal(18),
        "Ki" => Some(Scale::Binary(1)),
        "Mi" => Some(Scale::Binary(2)),
        "Gi" => Some(Scale::Binary(3)),
        "Ti" => Some(Scale::Binary(4)),
        "Pi" => Some(Scale::Binary(5)),
        "Ei" => Some(Scale::Binary(6)),
        _ => {
            let exponent = suffix
                .strip_prefix('e')
                .or_else(|| suffix.strip_prefix('E'))?;
            let exp: i32 = exponent.parse().ok()?;
            Some(Scale::Decimal(exp, Format::DecimalExponent))
        }
    }
}

/// Multiply by `10^shift`, or divide rounding away from zero when `shift` is
/// negative.
fn shift_decimal(value: i128, shift: i32) -> Option<i128> {
    if value == 0 {
        return Some(0);
    }
    if shift >= 0 {
        let factor = 10i128.checked_pow(shift.unsigned_abs())?;
        value.checked_mul(factor)
    } else {
        match 10i128.checked_pow(shift.unsigned_abs()) {
            Some(divisor) => {
                let quotient = value / divisor;
                if value % divisor == 0 {
                    Some(quotient)
                } else {
                    Some(quotient + value.signum())
                }
            }
            // Smaller than one nano unit
            None => Some(value.signum()),
        }
    }
}

fn decimal_suffix(exp: i32) -> &'static str {
    match exp {
        -9 => "n",
        -6 => "u",
        -3 => "m",
        3 => "k",
        6 => "M",
        9 => "G",
        12 => "T",
        15 => "P",
        18 => "E",
        _ => "",
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nanos == 0 {
            return f.write_str("0");
        }

        let mut format = self.format;
        if format == Format::BinarySI
            && (self.nanos % NANOS_PER_UNIT != 0 || self.nanos.abs() < 1024 * NANOS_PER_UNIT)
        {
            format = Format::DecimalSI;
        }

        if format == Format::BinarySI {
            let mut units = self.nanos / NANOS_PER_UNIT;
            let mut power = 0;
            while power < BINARY_SUFFIXES.len() - 1 && units % 1024 == 0 {
                units /= 1024;
                power += 1;
            }
            let suffix = BINARY_SUFFIXES.get(power).copied().unwrap_or_default();
            return write!(f, "{}{}", units, suffix);
        }

        let mut mantissa = self.nanos;
        let mut exp: i32 = -9;
        while mantissa % 10 == 0 {
            mantissa /= 10;
            exp += 1;
        }
        while exp.rem_euclid(3) != 0 {
            mantissa *= 10;
            exp -= 1;
        }

        match format {
            Format::DecimalExponent => {
                if exp == 0 {
                    write!(f, "{}", mantissa)
                } else {
                    write!(f, "{}e{}", mantissa, exp)
                }
            }
            _ => {
                while exp > 18 {
                    mantissa *= 10;
                    exp -= 1;
                }
                write!(f, "{}{}", mantissa, decimal_suffix(exp))
            }
        }
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Quantity::parse(s)
    }
}

impl TryFrom<&K8sQuantity> for Quantity {
    type Error = QuantityError;

    fn try_from(value: &K8sQuantity) -> Result<Self, Self::Error> {
        value.0.parse()
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.nanos == other.nanos
    }
}

impl Eq for Quantity {}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Quantity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.nanos.cmp(&other.nanos)
    }
}
