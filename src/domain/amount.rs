//! Validated value types shared by inventory, requirements and favourites
//!
//! Every constructor here is a validation boundary: a negative amount or an
//! out-of-range rating can't be represented once it has been built, and
//! deserialization goes through the same checks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ValueError {
    #[error("Invalid amount: {0} (must be a finite, non-negative number)")]
    InvalidAmount(String),

    #[error("Invalid rating: {0} (must be between {min} and {max})", min = Rating::MIN, max = Rating::MAX)]
    InvalidRating(String),

    #[error("Unit must not be empty")]
    EmptyUnit,

    #[error("Name must not be empty")]
    EmptyName,
}

/// Trims a display name and rejects it if nothing is left
pub fn validate_name(name: &str) -> Result<String, ValueError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(ValueError::EmptyName)
    } else {
        Ok(trimmed.to_string())
    }
}

/// A non-negative quantity in caller-defined units
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Amount(f64);

impl Amount {
    pub const ZERO: Amount = Amount(0.0);

    /// Creates an amount, rejecting negative, NaN and infinite values
    pub fn new(value: f64) -> Result<Self, ValueError> {
        if value.is_finite() && value >= 0.0 {
            // Normalizes -0.0
            Ok(Self(value + 0.0))
        } else {
            Err(ValueError::InvalidAmount(value.to_string()))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }

    /// Applies a signed delta, failing if the result would drop below zero
    pub fn adjusted(self, delta: f64) -> Result<Self, ValueError> {
        Self::new(self.0 + delta)
    }

    /// Subtracts `other`, failing if it exceeds this amount
    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        Self::new(self.0 - other.0).ok()
    }
}

impl TryFrom<f64> for Amount {
    type Error = ValueError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for f64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl FromStr for Amount {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|_| ValueError::InvalidAmount(s.trim().to_string()))?;
        Self::new(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An opaque measurement unit label (`g`, `ml`, `tablespoon`, ...)
///
/// Units are never converted; two amounts are compared as raw numbers
/// whatever their labels say.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Unit(String);

impl Unit {
    pub fn new(label: &str) -> Result<Self, ValueError> {
        let label = label.trim();
        if label.is_empty() {
            Err(ValueError::EmptyUnit)
        } else {
            Ok(Self(label.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Unit {
    fn default() -> Self {
        Self("g".to_string())
    }
}

impl FromStr for Unit {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Unit {
    type Error = ValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Unit> for String {
    fn from(unit: Unit) -> Self {
        unit.0
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A favourite's rating, 1 to 10 inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(value: u8) -> Result<Self, ValueError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValueError::InvalidRating(value.to_string()))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl FromStr for Rating {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u8 = s
            .trim()
            .parse()
            .map_err(|_| ValueError::InvalidRating(s.trim().to_string()))?;
        Self::new(value)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}
