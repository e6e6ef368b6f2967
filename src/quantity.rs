// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Kubernetes resource quantity parsing and rendering.
//!
//! Node capacities arrive as quantity strings (`"4"`, `"500m"`, `"8Gi"`,
//! `"1e3"`). They are parsed into an exact integer count of nano-units so
//! sums across nodes never lose precision, then rendered back in the formats
//! the status exposes.

use crate::errors::FactError;

const NANOS_PER_UNIT: i128 = 1_000_000_000;
const BYTES_PER_MIB: i128 = 1024 * 1024;

/// A parsed quantity, stored as nano-units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quantity {
    nanos: i128,
}

impl Quantity {
    /// Zero.
    pub const ZERO: Self = Self { nanos: 0 };

    /// Parse a Kubernetes quantity string.
    ///
    /// Supports binary suffixes (`Ki`..`Ei`), decimal suffixes (`n`, `u`, `m`,
    /// `k`, `M`..`E`), decimal exponents (`1e3`, `2E-3`) and plain numbers
    /// with an optional fractional part.
    ///
    /// # Errors
    ///
    /// Returns [`FactError::InvalidQuantity`] when the string is malformed.
    pub fn parse(value: &str) -> Result<Self, FactError> {
        let invalid = |reason: &str| FactError::InvalidQuantity {
            value: value.to_string(),
            reason: reason.to_string(),
        };

        let s = value.trim();
        if s.is_empty() {
            return Err(invalid("empty quantity"));
        }

        let number_end = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '+' || c == '-'))
            .unwrap_or(s.len());
        let (number, suffix) = s.split_at(number_end);

        let (negative, digits) = match number.as_bytes().first() {
            Some(b'-') => (true, &number[1..]),
            Some(b'+') => (false, &number[1..]),
            _ => (false, number),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid("missing number"));
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid("malformed number"));
        }

        // mantissa / 10^scale is the numeric part
        let mut mantissa: i128 = 0;
        for b in whole.bytes().chain(fraction.bytes()) {
            mantissa = mantissa
                .checked_mul(10)
                .and_then(|m| m.checked_add(i128::from(b - b'0')))
                .ok_or_else(|| invalid("number too large"))?;
        }
        let scale = u32::try_from(fraction.len()).map_err(|_| invalid("number too long"))?;

        let (num, den) = multiplier(suffix).ok_or_else(|| invalid("unknown suffix"))?;

        let numerator = mantissa
            .checked_mul(NANOS_PER_UNIT)
            .and_then(|v| v.checked_mul(num))
            .ok_or_else(|| invalid("quantity too large"))?;
        let denominator = 10_i128
            .checked_pow(scale)
            .and_then(|v| v.checked_mul(den))
            .ok_or_else(|| invalid("too many fractional digits"))?;

        // Round up like the API server does for sub-nano precision
        let mut nanos = numerator / denominator;
        if numerator % denominator != 0 {
            nanos += 1;
        }
        if negative {
            nanos = -nanos;
        }
        Ok(Self { nanos })
    }

    /// Sum of two quantities.
    #[must_use]
    pub fn saturating_add(self, other: Self) -> Self {
        Self {
            nanos: self.nanos.saturating_add(other.nanos),
        }
    }

    /// Value in milli-units, rounded up.
    #[must_use]
    pub fn millis(self) -> i128 {
        ceil_div(self.nanos, 1_000_000)
    }

    /// Value in whole units, rounded up.
    #[must_use]
    pub fn value(self) -> i128 {
        ceil_div(self.nanos, NANOS_PER_UNIT)
    }

    /// Render as a CPU count: whole cores as an integer, otherwise millicores.
    ///
    /// `6` cores renders `"6"`, two and a half cores renders `"2500m"`.
    #[must_use]
    pub fn to_cpu_string(self) -> String {
        let millis = self.millis();
        if millis % 1000 == 0 {
            (millis / 1000).to_string()
        } else {
            format!("{millis}m")
        }
    }

    /// Render a byte quantity as whole mebibytes (`"12288Mi"`), rounded to nearest.
    #[must_use]
    pub fn to_mib_string(self) -> String {
        let bytes = self.value();
        let mib = (bytes + BYTES_PER_MIB / 2).div_euclid(BYTES_PER_MIB);
        format!("{mib}Mi")
    }

    /// Render as a plain integer count, rounded up.
    #[must_use]
    pub fn to_count_string(self) -> String {
        self.value().to_string()
    }
}

impl std::iter::Sum for Quantity {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

/// Multiplier of a suffix as a `(numerator, denominator)` pair.
fn multiplier(suffix: &str) -> Option<(i128, i128)> {
    let pair = match suffix {
        "" => (1, 1),
        "n" => (1, 1_000_000_000),
        "u" => (1, 1_000_000),
        "m" => (1, 1_000),
        "k" => (1_000, 1),
        "M" => (1_000_000, 1),
        "G" => (1_000_000_000, 1),
        "T" => (1_000_000_000_000, 1),
        "P" => (1_000_000_000_000_000, 1),
        "E" => (1_000_000_000_000_000_000, 1),
        "Ki" => (1 << 10, 1),
        "Mi" => (1 << 20, 1),
        "Gi" => (1 << 30, 1),
        "Ti" => (1 << 40, 1),
        "Pi" => (1 << 50, 1),
        "Ei" => (1 << 60, 1),
        _ => return exponent(suffix),
    };
    Some(pair)
}

/// Decimal exponent suffix such as `e3` or `E-2`.
fn exponent(suffix: &str) -> Option<(i128, i128)> {
    let rest = suffix.strip_prefix(['e', 'E'])?;
    let exp: i32 = rest.parse().ok()?;
    let pow = 10_i128.checked_pow(exp.unsigned_abs())?;
    if exp >= 0 {
        Some((pow, 1))
    } else {
        Some((1, pow))
    }
}

fn ceil_div(value: i128, divisor: i128) -> i128 {
    let q = value.div_euclid(divisor);
    if value.rem_euclid(divisor) == 0 {
        q
    } else {
        q + 1
    }
}

#[cfg(test)]
#[path = "quantity_tests.rs"]
mod quantity_tests;
