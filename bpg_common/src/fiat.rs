use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Sub},
    str::FromStr,
};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

//--------------------------------------     FiatAmount       ---------------------------------------------------------
/// A fiat currency amount in integer cents.
///
/// The remote payment API expresses fiat amounts as decimal strings ("24.99"), so the wire format is a string via
/// [`Display`], while all arithmetic happens on the integer cent count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct FiatAmount(i64);

#[derive(Debug, Clone, Error)]
#[error("Invalid fiat amount: {0}")]
pub struct FiatAmountError(String);

impl FiatAmount {
    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub fn cents(&self) -> i64 {
        self.0
    }
}

impl Add for FiatAmount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for FiatAmount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Sum for FiatAmount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl Display for FiatAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.abs();
        write!(f, "{sign}{}.{:02}", cents / 100, cents % 100)
    }
}

impl FromStr for FiatAmount {
    type Err = FiatAmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (s, negative) = match s.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (s, false),
        };
        let mut parts = s.split('.');
        let whole_units = parts
            .next()
            .ok_or_else(|| FiatAmountError(s.to_string()))?
            .parse::<i64>()
            .map_err(|e| FiatAmountError(format!("Invalid amount: {s}. {e}")))?;
        let cents = match parts.next() {
            None | Some("") => 0,
            Some(frac) if frac.len() <= 2 && frac.chars().all(|c| c.is_ascii_digit()) => {
                // "24.9" means 90 cents, not 9
                let padded = format!("{frac:0<2}");
                padded.parse::<i64>().map_err(|e| FiatAmountError(format!("Invalid amount: {s}. {e}")))?
            },
            Some(frac) => return Err(FiatAmountError(format!("Invalid amount: {s}. Too many decimals in '{frac}'"))),
        };
        if parts.next().is_some() {
            return Err(FiatAmountError(format!("Invalid amount: {s}")));
        }
        let total = 100 * whole_units + cents;
        Ok(Self(if negative { -total } else { total }))
    }
}

impl Serialize for FiatAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for FiatAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
