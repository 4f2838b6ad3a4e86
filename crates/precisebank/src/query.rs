use crate::{coin::Coin, keeper::Keeper, store::KvStore};
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Errors returned by the read-only queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// No address was given.
    #[error("empty address string is not allowed")]
    EmptyAddress,
    /// The address could not be parsed.
    #[error("invalid address {address}: {reason}")]
    InvalidAddress {
        /// Input as received.
        address: String,
        /// Parser error.
        reason: String,
    },
}

/// Response of [`Keeper::query_remainder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemainderResponse {
    /// Remainder in the extended denomination.
    pub remainder: Coin,
}

/// Response of [`Keeper::query_fractional_balance`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FractionalBalanceResponse {
    /// Fractional balance in the extended denomination.
    pub fractional_balance: Coin,
}

/// Response of [`Keeper::query_total_fractional_balances`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalFractionalBalancesResponse {
    /// Sum of all fractional balances in the extended denomination.
    pub total: Coin,
}

impl<S: KvStore, L> Keeper<S, L> {
    /// Current remainder.
    pub fn query_remainder(&self) -> RemainderResponse {
        RemainderResponse {
            remainder: self.coin_info().extended_coin(self.get_remainder_amount()),
        }
    }

    /// Fractional balance of a hex encoded address.
    pub fn query_fractional_balance(
        &self,
        address: &str,
    ) -> Result<FractionalBalanceResponse, QueryError> {
        let address = parse_address(address)?;
        Ok(FractionalBalanceResponse {
            fractional_balance: self
                .coin_info()
                .extended_coin(self.get_fractional_balance(address)),
        })
    }

    /// Sum of all fractional balances.
    pub fn query_total_fractional_balances(&self) -> TotalFractionalBalancesResponse {
        TotalFractionalBalancesResponse {
            total: self
                .coin_info()
                .extended_coin(self.total_fractional_balances()),
        }
    }
}

fn parse_address(raw: &str) -> Result<Address, QueryError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(QueryError::EmptyAddress);
    }
    Address::from_str(trimmed).map_err(|e| QueryError::InvalidAddress {
        address: raw.to_string(),
        reason: e.to_string(),
    })
}
