//! Prefixed hash IDs for homes, recipes and ingredients
//!
//! ID Format:
//! - Home IDs: `h-{7-char-hash}` (e.g., `h-7f2b4c1`)
//! - Recipe IDs: `r-{7-char-hash}` (e.g., `r-9d3e5f2`)
//! - Ingredient IDs: `i-{7-char-hash}` (e.g., `i-0a1b2c3`)
//!
//! Hash is derived from name + creation timestamp, so the same name created
//! twice produces two distinct IDs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Invalid home ID: expected 'h-{{7-char-hash}}', got '{0}'")]
    InvalidHomeId(String),

    #[error("Invalid recipe ID: expected 'r-{{7-char-hash}}', got '{0}'")]
    InvalidRecipeId(String),

    #[error("Invalid ingredient ID: expected 'i-{{7-char-hash}}', got '{0}'")]
    InvalidIngredientId(String),
}

const HASH_LEN: usize = 7;

/// Generates a 7-character hash from a name and timestamp
fn generate_hash(name: &str, timestamp: DateTime<Utc>) -> String {
    let input = format!("{}{}", name, timestamp.timestamp_nanos_opt().unwrap_or(0));
    let hash = blake3::hash(input.as_bytes());
    hash.to_hex()[..HASH_LEN].to_string()
}

/// Returns the hash part of `s` if it carries `prefix` and a valid hash
fn parse_hash<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let hash = s.strip_prefix(prefix)?;
    if hash.len() == HASH_LEN && hash.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(hash)
    } else {
        None
    }
}

macro_rules! hash_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal, $err:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name {
            hash: String,
        }

        impl $name {
            /// Creates a new ID from a name and timestamp
            pub fn new(name: &str, timestamp: DateTime<Utc>) -> Self {
                Self {
                    hash: generate_hash(name, timestamp),
                }
            }

            /// Returns the hash portion of the ID
            pub fn hash(&self) -> &str {
                &self.hash
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&format!("{}{}", $prefix, self.hash))
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                parse_hash(s, $prefix)
                    .map(|hash| Self {
                        hash: hash.to_ascii_lowercase(),
                    })
                    .ok_or_else(|| IdError::$err(s.to_string()))
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.to_string()
            }
        }
    };
}

hash_id!(
    /// Home ID in the format `h-{7-char-hash}`
    HomeId,
    "h-",
    InvalidHomeId
);

hash_id!(
    /// Recipe ID in the format `r-{7-char-hash}`
    RecipeId,
    "r-",
    InvalidRecipeId
);

hash_id!(
    /// Ingredient ID in the format `i-{7-char-hash}`
    IngredientId,
    "i-",
    InvalidIngredientId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipe_id_format() {
        let id = RecipeId::new("Butter Paneer", Utc::now());
        let s = id.to_string();

        assert!(s.starts_with("r-"));
        assert_eq!(s.len(), 9);
    }

    #[test]
    fn same_name_different_time_differs() {
        let t1 = Utc::now();
        let t2 = t1 + chrono::Duration::nanoseconds(1);

        assert_ne!(IngredientId::new("Onion", t1), IngredientId::new("Onion", t2));
    }

    #[test]
    fn parse_round_trip() {
        let id: HomeId = "h-7f2b4c1".parse().unwrap();
        assert_eq!(id.hash(), "7f2b4c1");
        assert_eq!(id.to_string(), "h-7f2b4c1");
    }

    #[test]
    fn parse_trims_whitespace() {
        let id: IngredientId = "  i-0a1b2c3 ".parse().unwrap();
        assert_eq!(id.to_string(), "i-0a1b2c3");
    }

    #[test]
    fn wrong_prefix_rejected() {
        assert_eq!(
            "h-7f2b4c1".parse::<RecipeId>(),
            Err(IdError::InvalidRecipeId("h-7f2b4c1".to_string()))
        );
    }

    #[test]
    fn bad_hash_rejected() {
        assert!("r-123".parse::<RecipeId>().is_err());
        assert!("r-zzzzzzz".parse::<RecipeId>().is_err());
        assert!("r-12345678".parse::<RecipeId>().is_err());
        assert!("".parse::<HomeId>().is_err());
    }

    #[test]
    fn serde_uses_string_form() {
        let id: RecipeId = "r-abcdef0".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"r-abcdef0\"");

        let back: RecipeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        assert!(serde_json::from_str::<RecipeId>("\"i-abcdef0\"").is_err());
    }

    #[test]
    fn display_honours_width() {
        let id: RecipeId = "r-abcdef0".parse().unwrap();
        assert_eq!(format!("{:<12}|", id), "r-abcdef0   |");
        assert_eq!(format!("{:>11}", id), "  r-abcdef0");
    }

    #[test]
    fn ordering_follows_hash() {
        let a: RecipeId = "r-0000001".parse().unwrap();
        let b: RecipeId = "r-0000002".parse().unwrap();
        assert!(a < b);
    }
}
