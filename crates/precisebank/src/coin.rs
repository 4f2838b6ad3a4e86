//! Denominated amounts in the ledger's wire and display format.
//!
//! A [`Coin`] renders as `{amount}{denom}` and a [`Coins`] set as a comma
//! separated list of coins sorted by denomination. Both forms appear verbatim
//! inside ledger error messages and event attributes.

use crate::error::BankError;
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum and maximum denomination lengths accepted by the ledger.
const DENOM_MIN_LEN: usize = 3;
const DENOM_MAX_LEN: usize = 128;

/// Checks a denomination against `[a-zA-Z][a-zA-Z0-9/:._-]{2,127}`.
pub fn validate_denom(denom: &str) -> Result<(), String> {
    let bytes = denom.as_bytes();
    let well_formed = (DENOM_MIN_LEN..=DENOM_MAX_LEN).contains(&bytes.len())
        && bytes[0].is_ascii_alphabetic()
        && bytes[1..]
            .iter()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'/' | b':' | b'.' | b'_' | b'-'));
    if well_formed {
        Ok(())
    } else {
        Err(format!("invalid denom: {denom}"))
    }
}

/// A single amount of one denomination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    /// Denomination.
    pub denom: String,
    /// Amount in the smallest unit of `denom`.
    #[serde(with = "decimal_amount")]
    pub amount: U256,
}

impl Coin {
    /// Creates a new coin.
    pub fn new(denom: impl Into<String>, amount: U256) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    /// Creates a coin of `denom` with a zero amount.
    pub fn zero(denom: impl Into<String>) -> Self {
        Self::new(denom, U256::ZERO)
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Validates the denomination and that the amount is positive.
    pub fn validate(&self) -> Result<(), String> {
        validate_denom(&self.denom)?;
        if self.amount.is_zero() {
            return Err(format!("coin {self} amount is not positive"));
        }
        Ok(())
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// A set of coins.
///
/// A *valid* set is sorted by denomination, holds no duplicate denominations
/// and only positive amounts. [`Coins::new`] produces valid sets; invalid ones
/// can only be built through [`Coins::from_unchecked`] and are rejected by the
/// ledger with an invalid coins error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coins(Vec<Coin>);

impl Coins {
    /// Builds a sanitized set: zero coins are dropped and the rest sorted.
    pub fn new(coins: impl IntoIterator<Item = Coin>) -> Result<Self, BankError> {
        let mut coins: Vec<Coin> = coins.into_iter().filter(|c| !c.is_zero()).collect();
        coins.sort_by(|a, b| a.denom.cmp(&b.denom));
        let coins = Self(coins);
        coins
            .validate()
            .map_err(|_| BankError::InvalidCoins(coins.to_string()))?;
        Ok(coins)
    }

    /// Wraps coins as given, without sorting or validation.
    pub const fn from_unchecked(coins: Vec<Coin>) -> Self {
        Self(coins)
    }

    /// Returns an empty set.
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Validates the set, returning the first violation found.
    pub fn validate(&self) -> Result<(), String> {
        let mut prev: Option<&str> = None;
        for coin in &self.0 {
            coin.validate()?;
            if let Some(prev) = prev {
                match prev.cmp(coin.denom.as_str()) {
                    std::cmp::Ordering::Equal => {
                        return Err(format!("duplicate denomination {}", coin.denom))
                    }
                    std::cmp::Ordering::Greater => {
                        return Err(format!("denomination {} is not sorted", coin.denom))
                    }
                    std::cmp::Ordering::Less => {}
                }
            }
            prev = Some(coin.denom.as_str());
        }
        Ok(())
    }

    /// Returns true if [`Self::validate`] succeeds.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Amount of `denom` in the set, zero when absent. Only the first coin of
    /// `denom` counts; a valid set holds at most one.
    pub fn amount_of(&self, denom: &str) -> U256 {
        self.0
            .iter()
            .find(|c| c.denom == denom)
            .map(|c| c.amount)
            .unwrap_or_default()
    }

    /// The set with every coin of `denom` removed.
    pub fn without(&self, denom: &str) -> Self {
        Self(
            self.0
                .iter()
                .filter(|c| c.denom != denom)
                .cloned()
                .collect(),
        )
    }

    /// Returns true when the set holds no coin.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true when every amount in the set is zero.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(Coin::is_zero)
    }

    /// Number of coins in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates the coins in set order.
    pub fn iter(&self) -> std::slice::Iter<'_, Coin> {
        self.0.iter()
    }
}

impl From<Coin> for Coins {
    fn from(coin: Coin) -> Self {
        if coin.is_zero() {
            Self::empty()
        } else {
            Self(vec![coin])
        }
    }
}

impl<'a> IntoIterator for &'a Coins {
    type Item = &'a Coin;
    type IntoIter = std::slice::Iter<'a, Coin>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, coin) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{coin}")?;
        }
        Ok(())
    }
}

/// Serializes amounts as decimal strings, accepting decimal or `0x` hex input.
pub(crate) mod decimal_amount {
    use alloy_primitives::U256;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    pub(crate) fn serialize<S: Serializer>(
        amount: &U256,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(amount)
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<U256, D::Error> {
        let raw = String::deserialize(deserializer)?;
        U256::from_str(raw.trim()).map_err(D::Error::custom)
    }
}
