//! Conversion between the integer denomination and its 18 decimal extension.
//!
//! With a native coin of `d` decimals, one integer unit equals
//! `10^(18 - d)` extended units. That ratio is the conversion factor and it
//! bounds every fractional amount the module stores.

use crate::{
    coin::{validate_denom, Coin, Coins},
    config::ConfigError,
    error::BankError,
};
use alloy_primitives::U256;
use thiserror::Error;

/// Decimals of the extended denomination.
pub const EXTENDED_DECIMALS: u8 = 18;

/// Largest native decimal count with a conversion factor of at least 2.
pub const MAX_INTEGER_DECIMALS: u8 = EXTENDED_DECIMALS - 1;

/// Range violations of fractional and remainder amounts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FractionalAmountError {
    /// Stored fractional balances are strictly positive.
    #[error("non-positive amount {0}")]
    NonPositive(U256),
    /// A fractional balance reached the conversion factor.
    #[error("amount {amount} exceeds max of {max}")]
    ExceedsMax {
        /// Offending amount.
        amount: U256,
        /// Largest valid amount, the conversion factor minus one.
        max: U256,
    },
    /// The remainder reached the conversion factor.
    #[error("remainder {amount} exceeds max of {max}")]
    RemainderExceedsMax {
        /// Offending remainder.
        amount: U256,
        /// Largest valid remainder, the conversion factor minus one.
        max: U256,
    },
}

/// Denominations and conversion factor of a precise bank deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinInfo {
    integer_denom: String,
    extended_denom: String,
    decimals: u8,
    conversion_factor: U256,
}

impl CoinInfo {
    /// Builds the constants for a native coin with `decimals` decimals.
    ///
    /// Fails if `decimals` leaves a conversion factor below 2, if either
    /// denomination is malformed or if both denominations are equal.
    pub fn new(
        integer_denom: impl Into<String>,
        extended_denom: impl Into<String>,
        decimals: u8,
    ) -> Result<Self, ConfigError> {
        let integer_denom = integer_denom.into();
        let extended_denom = extended_denom.into();

        if decimals > MAX_INTEGER_DECIMALS {
            return Err(ConfigError::Invalid(format!(
                "decimals {decimals} must be at most {MAX_INTEGER_DECIMALS}"
            )));
        }
        validate_denom(&integer_denom).map_err(ConfigError::Invalid)?;
        validate_denom(&extended_denom).map_err(ConfigError::Invalid)?;
        if integer_denom == extended_denom {
            return Err(ConfigError::Invalid(format!(
                "integer and extended denominations must differ, both are {integer_denom}"
            )));
        }

        let exponent = U256::from(EXTENDED_DECIMALS - decimals);
        let conversion_factor = U256::from(10u64).pow(exponent);

        Ok(Self {
            integer_denom,
            extended_denom,
            decimals,
            conversion_factor,
        })
    }

    /// Denomination managed by the integer ledger.
    pub fn integer_denom(&self) -> &str {
        &self.integer_denom
    }

    /// 18 decimal denomination exposed to EVM-facing callers.
    pub fn extended_denom(&self) -> &str {
        &self.extended_denom
    }

    /// Native decimals of the integer denomination.
    pub const fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Extended units per integer unit.
    pub const fn conversion_factor(&self) -> U256 {
        self.conversion_factor
    }

    /// Largest valid fractional balance or remainder.
    pub fn max_fractional_amount(&self) -> U256 {
        self.conversion_factor - U256::from(1)
    }

    /// Splits an extended amount into whole integer units and the fraction.
    pub fn split(&self, extended: U256) -> (U256, U256) {
        (extended / self.conversion_factor, extended % self.conversion_factor)
    }

    /// Extended value of `integer` units, `None` when it exceeds 256 bits.
    pub fn to_extended(&self, integer: U256) -> Option<U256> {
        integer.checked_mul(self.conversion_factor)
    }

    /// Composes integer units and a fraction into one extended amount,
    /// `None` when it exceeds 256 bits.
    pub fn compose(&self, integer: U256, fractional: U256) -> Option<U256> {
        self.to_extended(integer)?.checked_add(fractional)
    }

    /// Error for `integer` units that have no extended representation.
    pub fn extended_overflow(&self, integer: U256) -> BankError {
        BankError::Overflow(format!(
            "{integer}{} exceeds the range of {}",
            self.integer_denom, self.extended_denom
        ))
    }

    /// Creates a coin of the extended denomination.
    pub fn extended_coin(&self, amount: U256) -> Coin {
        Coin::new(self.extended_denom.clone(), amount)
    }

    /// Creates a coin of the integer denomination.
    pub fn integer_coin(&self, amount: U256) -> Coin {
        Coin::new(self.integer_denom.clone(), amount)
    }

    /// Full extended value of `coins`, counting both its integer and its
    /// extended denomination. Other denominations are ignored.
    pub fn sum_extended_coin(&self, coins: &Coins) -> Result<Coin, BankError> {
        let integer = coins.amount_of(&self.integer_denom);
        let extended = coins.amount_of(&self.extended_denom);
        self.compose(integer, extended)
            .map(|amount| self.extended_coin(amount))
            .ok_or_else(|| self.extended_overflow(integer))
    }

    /// Checks `0 < amount < conversion factor`.
    pub fn validate_fractional_amount(&self, amount: U256) -> Result<(), FractionalAmountError> {
        if amount.is_zero() {
            return Err(FractionalAmountError::NonPositive(amount));
        }
        if amount >= self.conversion_factor {
            return Err(FractionalAmountError::ExceedsMax {
                amount,
                max: self.max_fractional_amount(),
            });
        }
        Ok(())
    }

    /// Checks `amount < conversion factor`; zero is a valid remainder.
    pub fn validate_remainder_amount(&self, amount: U256) -> Result<(), FractionalAmountError> {
        if amount >= self.conversion_factor {
            return Err(FractionalAmountError::RemainderExceedsMax {
                amount,
                max: self.max_fractional_amount(),
            });
        }
        Ok(())
    }
}
