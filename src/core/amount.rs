//! Native and issued amounts
//!
//! Native value is always carried as an integer number of drops. Display
//! units (XRP) only exist at the edges: user input and printing.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Drops per whole native unit
pub const DROPS_PER_XRP: u64 = 1_000_000;

/// Maximum fractional digits in a display amount
pub const MAX_XRP_DECIMALS: usize = 6;

/// Amount parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("Amount is empty")]
    Empty,
    #[error("Amount must not be negative: {0}")]
    Negative(String),
    #[error("Amount is not a number: {0}")]
    NotNumeric(String),
    #[error("Amount has more than {} decimal places: {0}", MAX_XRP_DECIMALS)]
    TooPrecise(String),
    #[error("Amount is too large: {0}")]
    Overflow(String),
}

/// Native currency in minor units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Drops(pub u64);

impl Drops {
    pub const ZERO: Drops = Drops(0);

    /// Parse a display-unit string such as `"12.5"` into drops
    pub fn from_xrp(input: &str) -> Result<Self, AmountError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }
        if trimmed.starts_with('-') {
            return Err(AmountError::Negative(input.to_string()));
        }

        let (whole, fraction) = match trimmed.split_once('.') {
            Some((w, f)) => (w, f),
            None => (trimmed, ""),
        };

        let is_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction)
        {
            return Err(AmountError::NotNumeric(input.to_string()));
        }
        if fraction.len() > MAX_XRP_DECIMALS {
            return Err(AmountError::TooPrecise(input.to_string()));
        }

        let overflow = || AmountError::Overflow(input.to_string());

        let whole_value: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };
        let fraction_value: u64 = if fraction.is_empty() {
            0
        } else {
            let padded = format!("{:0<width$}", fraction, width = MAX_XRP_DECIMALS);
            padded.parse().map_err(|_| overflow())?
        };

        whole_value
            .checked_mul(DROPS_PER_XRP)
            .and_then(|d| d.checked_add(fraction_value))
            .map(Drops)
            .ok_or_else(overflow)
    }

    /// Parse a drops string such as `"12"`
    pub fn from_drops_str(input: &str) -> Result<Self, AmountError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }
        if trimmed.starts_with('-') {
            return Err(AmountError::Negative(input.to_string()));
        }
        if !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(AmountError::NotNumeric(input.to_string()));
        }
        trimmed
            .parse()
            .map(Drops)
            .map_err(|_| AmountError::Overflow(input.to_string()))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Render in display units without trailing zeros
    pub fn to_xrp(&self) -> String {
        let whole = self.0 / DROPS_PER_XRP;
        let fraction = self.0 % DROPS_PER_XRP;
        if fraction == 0 {
            whole.to_string()
        } else {
            let digits = format!("{:06}", fraction);
            format!("{}.{}", whole, digits.trim_end_matches('0'))
        }
    }

    pub fn saturating_add(self, other: Drops) -> Drops {
        Drops(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Drops) -> Drops {
        Drops(self.0.saturating_sub(other.0))
    }

    pub fn saturating_mul(self, factor: u64) -> Drops {
        Drops(self.0.saturating_mul(factor))
    }
}

impl fmt::Display for Drops {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Drops {
    fn from(value: u64) -> Self {
        Drops(value)
    }
}

// Drops travel as decimal strings on the wire
impl Serialize for Drops {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Drops {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DropsVisitor;

        impl<'de> Visitor<'de> for DropsVisitor {
            type Value = Drops;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a drops amount as string or unsigned integer")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Drops, E> {
                Ok(Drops(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Drops, E> {
                u64::try_from(v)
                    .map(Drops)
                    .map_err(|_| E::custom(format!("negative drops: {}", v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Drops, E> {
                Drops::from_drops_str(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(DropsVisitor)
    }
}

/// Issued (trust line) currency amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedAmount {
    pub currency: String,
    pub issuer: String,
    pub value: String,
}

/// Multi-purpose token amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MptAmount {
    pub mpt_issuance_id: String,
    pub value: String,
}

/// Any amount a transaction field can carry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Native(Drops),
    Issued(IssuedAmount),
    Mpt(MptAmount),
}

impl Amount {
    /// Drops when this is native currency
    pub fn as_native(&self) -> Option<Drops> {
        match self {
            Amount::Native(drops) => Some(*drops),
            _ => None,
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Amount::Native(_))
    }
}

impl From<Drops> for Amount {
    fn from(drops: Drops) -> Self {
        Amount::Native(drops)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Native(drops) => write!(f, "{} XRP", drops.to_xrp()),
            Amount::Issued(a) => write!(f, "{} {} ({})", a.value, a.currency, a.issuer),
            Amount::Mpt(a) => write!(f, "{} MPT {}", a.value, a.mpt_issuance_id),
        }
    }
}

/// Asset identifier used by AMM transactions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
}

impl Issue {
    pub fn xrp() -> Self {
        Self {
            currency: "XRP".to_string(),
            issuer: None,
        }
    }
}
