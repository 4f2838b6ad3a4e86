//! Genesis import and export of the fractional balance and remainder stores.
//!
//! A genesis state is only importable if its fractional balances plus the
//! remainder add up to whole integer units, and the reserve already holds
//! exactly that many units in the ledger.

use crate::{
    coin::decimal_amount,
    conversion::{CoinInfo, FractionalAmountError},
    keeper::{Keeper, MODULE_NAME},
    ledger::{AccountKeeper, BankKeeper, Ledger, Permission},
    store::KvStore,
};
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use tracing::info;

/// Fractional balance of a single account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FractionalBalance {
    /// Account address.
    pub address: Address,
    /// Fractional amount, in `(0, conversion factor)`.
    #[serde(with = "decimal_amount")]
    pub amount: U256,
}

impl FractionalBalance {
    /// Creates a new entry.
    pub const fn new(address: Address, amount: U256) -> Self {
        Self { address, amount }
    }
}

/// Reasons a genesis state is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenesisError {
    /// A balance is zero or not below the conversion factor.
    #[error("invalid balances: invalid fractional balance for {address}: {source}")]
    InvalidBalance {
        /// Offending account.
        address: Address,
        /// Range violation.
        source: FractionalAmountError,
    },
    /// An address appears more than once.
    #[error("invalid balances: duplicate address {0}")]
    DuplicateAddress(Address),
    /// The remainder is not below the conversion factor.
    #[error(transparent)]
    InvalidRemainder(FractionalAmountError),
    /// Balances and remainder do not add up to whole integer units.
    #[error(
        "sum of fractional balances {balances} + remainder {remainder} is not a multiple of {conversion_factor}"
    )]
    NotWholeUnits {
        /// Sum of fractional balances.
        balances: U256,
        /// Remainder amount.
        remainder: U256,
        /// Conversion factor.
        conversion_factor: U256,
    },
}

/// Persisted state of the module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    /// Non-zero fractional balances.
    pub balances: Vec<FractionalBalance>,
    /// Remainder amount.
    #[serde(with = "decimal_amount")]
    pub remainder: U256,
}

impl GenesisState {
    /// Creates a new genesis state.
    pub const fn new(balances: Vec<FractionalBalance>, remainder: U256) -> Self {
        Self {
            balances,
            remainder,
        }
    }

    /// Sum of every fractional balance.
    pub fn sum_balances(&self) -> U256 {
        self.balances
            .iter()
            .fold(U256::ZERO, |acc, b| acc.saturating_add(b.amount))
    }

    /// Sum of every fractional balance and the remainder.
    pub fn total_amount_with_remainder(&self) -> U256 {
        self.sum_balances().saturating_add(self.remainder)
    }

    /// Validates ranges, uniqueness and that the total is whole integer units.
    pub fn validate(&self, coin_info: &CoinInfo) -> Result<(), GenesisError> {
        let mut seen = HashSet::with_capacity(self.balances.len());
        for balance in &self.balances {
            coin_info.validate_fractional_amount(balance.amount).map_err(|source| {
                GenesisError::InvalidBalance {
                    address: balance.address,
                    source,
                }
            })?;
            if !seen.insert(balance.address) {
                return Err(GenesisError::DuplicateAddress(balance.address));
            }
        }

        coin_info
            .validate_remainder_amount(self.remainder)
            .map_err(GenesisError::InvalidRemainder)?;

        let balances = self.sum_balances();
        let conversion_factor = coin_info.conversion_factor();
        if !(balances.saturating_add(self.remainder) % conversion_factor).is_zero() {
            return Err(GenesisError::NotWholeUnits {
                balances,
                remainder: self.remainder,
                conversion_factor,
            });
        }
        Ok(())
    }
}

/// Loads `state` into the keeper.
///
/// The reserve module account is registered with the minter and burner
/// permissions when the ledger does not know it yet.
///
/// # Panics
///
/// - if the state is invalid
/// - if the reserve's integer balance does not match the imported total
pub fn init_genesis<S, L>(keeper: &mut Keeper<S, L>, state: &GenesisState)
where
    S: KvStore,
    L: Ledger,
{
    if let Err(err) = state.validate(keeper.coin_info()) {
        panic!("failed to validate precisebank genesis state: {err}");
    }

    let reserve = keeper
        .ledger_mut()
        .ensure_module_account(MODULE_NAME, &[Permission::Minter, Permission::Burner])
        .address;

    for balance in &state.balances {
        keeper.set_fractional_balance(balance.address, balance.amount);
    }
    keeper.set_remainder_amount(state.remainder);

    let info = keeper.coin_info();
    let total = state.total_amount_with_remainder();
    let reserve_balance = keeper.ledger().get_balance(reserve, info.integer_denom());
    assert!(
        info.to_extended(reserve_balance.amount) == Some(total),
        "module account balance does not match sum of fractional balances and remainder, balance is {reserve_balance} but expected {total}{} ({}{})",
        info.extended_denom(),
        total / info.conversion_factor(),
        info.integer_denom(),
    );

    info!(
        target: "precisebank",
        balances = state.balances.len(),
        remainder = %state.remainder,
        "imported precisebank genesis"
    );
}

/// Exports the stores, balances ordered by address.
pub fn export_genesis<S: KvStore, L>(keeper: &Keeper<S, L>) -> GenesisState {
    let balances = keeper
        .fractional_balances()
        .into_iter()
        .map(|(address, amount)| FractionalBalance::new(address, amount))
        .collect();
    GenesisState::new(balances, keeper.get_remainder_amount())
}
