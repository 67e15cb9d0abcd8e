use crate::error::CoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifies the owner of a set of transactions.
///
/// The range is not validated here; any `i64` is accepted and the lookup
/// simply finds nothing for identifiers that were never recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(UserId)
            .map_err(|e| CoreError::InvalidInput("user_id".to_string(), e.to_string()))
    }
}

/// A single recorded transaction amount. Rows are immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Transaction {
    /// Monotonic record id; this is the ordering key for a user's amounts.
    pub id: i64,
    pub user_id: UserId,
    pub amount: f64,
    pub recorded_at: DateTime<Utc>,
}

/// Checks that an amount can be recorded: finite and non-negative.
pub fn validate_amount(amount: f64) -> Result<f64, CoreError> {
    if !amount.is_finite() {
        return Err(CoreError::InvalidInput(
            "amount".to_string(),
            format!("{amount} is not a finite number"),
        ));
    }
    if amount < 0.0 {
        return Err(CoreError::InvalidInput(
            "amount".to_string(),
            format!("{amount} is negative"),
        ));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_parses_and_displays() {
        let id: UserId = " 100 ".parse().unwrap();
        assert_eq!(id, UserId(100));
        assert_eq!(id.to_string(), "100");
        assert!("abc".parse::<UserId>().is_err());
    }

    #[test]
    fn user_id_serializes_as_plain_integer() {
        assert_eq!(serde_json::to_string(&UserId(42)).unwrap(), "42");
    }

    #[test]
    fn amounts_must_be_finite_and_non_negative() {
        assert_eq!(validate_amount(0.0), Ok(0.0));
        assert_eq!(validate_amount(1234.56), Ok(1234.56));
        assert!(validate_amount(-0.01).is_err());
        assert!(validate_amount(f64::NAN).is_err());
        assert!(validate_amount(f64::INFINITY).is_err());
    }
}
