use super::Keeper;
use crate::{
    conversion::FractionalAmountError,
    ledger::{BankKeeper, Ledger},
    store::KvStore,
};
use alloy_primitives::{Address, U256};
use thiserror::Error;

/// A broken module invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantError {
    /// The reserve does not hold exactly the integer units backing all
    /// fractional balances and the remainder.
    #[error(
        "{denom} reserve balance {reserve} mismatches {required} (fractional balances {fractional} + remainder {remainder})"
    )]
    ReserveMismatch {
        /// Extended denomination.
        denom: String,
        /// Reserve integer balance expressed in extended units.
        reserve: U256,
        /// Sum of fractional balances and remainder.
        required: U256,
        /// Sum of fractional balances.
        fractional: U256,
        /// Remainder amount.
        remainder: U256,
    },

    /// The extended supply derived from all balances differs from the integer
    /// supply in extended units.
    #[error(
        "total supply {extended}{denom} does not match integer total supply {integer}{denom}"
    )]
    TotalSupplyMismatch {
        /// Extended denomination.
        denom: String,
        /// Sum of every non-reserve balance plus fractions and remainder.
        extended: U256,
        /// Integer supply times the conversion factor.
        integer: U256,
    },

    /// Some stored fractional balances are out of range.
    #[error(
        "{count} accounts with invalid fractional balances, first {address}: {source}"
    )]
    InvalidFractionalBalances {
        /// Number of offending entries.
        count: usize,
        /// First offending address.
        address: Address,
        /// Range violation of the first offending entry.
        source: FractionalAmountError,
    },

    /// The stored remainder is out of range.
    #[error("invalid remainder amount: {0}")]
    InvalidRemainder(FractionalAmountError),

    /// An integer amount has no extended representation in 256 bits.
    #[error("{integer}{denom} overflows the extended denomination")]
    Overflow {
        /// Integer denomination.
        denom: String,
        /// Integer amount that could not be converted.
        integer: U256,
    },
}

impl<S: KvStore, L: Ledger> Keeper<S, L> {
    /// Checks that the reserve backs every fractional balance and the remainder.
    pub fn check_reserve_backs_fractions(&self) -> Result<(), InvariantError> {
        let reserve_integer = self
            .reserve_address()
            .map(|reserve| {
                self.ledger
                    .get_balance(reserve, self.coin_info.integer_denom())
                    .amount
            })
            .unwrap_or_default();
        let reserve = self
            .coin_info
            .to_extended(reserve_integer)
            .ok_or_else(|| self.overflow(reserve_integer))?;

        let fractional = self.total_fractional_balances();
        let remainder = self.get_remainder_amount();
        let required = fractional + remainder;

        if reserve != required {
            return Err(InvariantError::ReserveMismatch {
                denom: self.coin_info.extended_denom().to_string(),
                reserve,
                required,
                fractional,
                remainder,
            });
        }
        Ok(())
    }

    /// Checks that the extended supply derived from balances equals the
    /// integer supply times the conversion factor.
    ///
    /// The reserve's integer balance is excluded since it is already counted
    /// through the fractions and remainder it backs.
    pub fn check_total_supply(&self) -> Result<(), InvariantError> {
        let integer_denom = self.coin_info.integer_denom();
        let reserve = self.reserve_address();

        let supply = self.ledger.get_supply(integer_denom).amount;
        let integer = self
            .coin_info
            .to_extended(supply)
            .ok_or_else(|| self.overflow(supply))?;

        let integer_held = self
            .ledger
            .all_balances()
            .into_iter()
            .filter(|(address, _)| Some(*address) != reserve)
            .map(|(_, coins)| coins.amount_of(integer_denom))
            .try_fold(U256::ZERO, |acc, amount| acc.checked_add(amount))
            .ok_or_else(|| self.overflow(supply))?;

        let extended = self
            .coin_info
            .to_extended(integer_held)
            .and_then(|held| held.checked_add(self.total_fractional_balances()))
            .and_then(|held| held.checked_add(self.get_remainder_amount()))
            .ok_or_else(|| self.overflow(integer_held))?;

        if extended != integer {
            return Err(InvariantError::TotalSupplyMismatch {
                denom: self.coin_info.extended_denom().to_string(),
                extended,
                integer,
            });
        }
        Ok(())
    }

    /// Checks that every stored fractional balance is in `(0, conversion factor)`.
    pub fn check_valid_fractional_balances(&self) -> Result<(), InvariantError> {
        let mut count = 0;
        let mut first = None;
        self.iterate_fractional_balances(|address, amount| {
            if let Err(err) = self.coin_info.validate_fractional_amount(amount) {
                count += 1;
                first.get_or_insert((address, err));
            }
            false
        });

        match first {
            Some((address, source)) => {
                Err(InvariantError::InvalidFractionalBalances {
                    count,
                    address,
                    source,
                })
            }
            None => Ok(()),
        }
    }

    /// Checks that the stored remainder is below the conversion factor.
    pub fn check_valid_remainder(&self) -> Result<(), InvariantError> {
        self.coin_info
            .validate_remainder_amount(self.get_remainder_amount())
            .map_err(InvariantError::InvalidRemainder)
    }

    fn overflow(&self, integer: U256) -> InvariantError {
        InvariantError::Overflow {
            denom: self.coin_info.integer_denom().to_string(),
            integer,
        }
    }

    /// Runs every invariant, returning the first violation.
    pub fn check_all_invariants(&self) -> Result<(), InvariantError> {
        self.check_valid_remainder()?;
        self.check_valid_fractional_balances()?;
        self.check_reserve_backs_fractions()?;
        self.check_total_supply()
    }
}
