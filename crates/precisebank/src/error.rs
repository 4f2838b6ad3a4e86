use thiserror::Error;

/// Errors returned by the integer ledger and reproduced by the precise keeper.
///
/// Every variant renders as `"{detail}: {kind}"`, the shape callers of the
/// ledger already match on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BankError {
    /// The coin set is malformed (unsorted, duplicated, zero or bad denom).
    #[error("{0}: invalid coins")]
    InvalidCoins(String),

    /// The spendable balance does not cover the requested amount.
    #[error("{0}: insufficient funds")]
    InsufficientFunds(String),

    /// The caller or counterparty is not allowed to perform the operation.
    #[error("{0}: unauthorized")]
    Unauthorized(String),

    /// A module account or address could not be resolved.
    #[error("{0}: unknown address")]
    UnknownAddress(String),

    /// A balance or supply update would overflow 256 bits.
    #[error("{0}: arithmetic overflow")]
    Overflow(String),
}

impl BankError {
    /// Returns true for the insufficient funds kind.
    pub const fn is_insufficient_funds(&self) -> bool {
        matches!(self, Self::InsufficientFunds(_))
    }

    /// Returns true for the unauthorized kind.
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// Returns true for the invalid coins kind.
    pub const fn is_invalid_coins(&self) -> bool {
        matches!(self, Self::InvalidCoins(_))
    }
}
