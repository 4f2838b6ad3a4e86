//! Precise bank keeper.
//!
//! [`Keeper`] wraps an integer ledger and extends its native denomination to
//! 18 decimals. Integer units stay in the ledger. Sub-unit amounts live in two
//! stores owned by the keeper:
//!
//! - the per-account fractional balance, always in `(0, conversion factor)`
//! - a single remainder, always in `[0, conversion factor)`
//!
//! The integer balance of the reserve (the `precisebank` module account) backs
//! both of them at all times:
//!
//! ```text
//! reserve * conversion_factor == sum(fractional balances) + remainder
//! ```
//!
//! Every mint, burn and send keeps that equation by moving at most one extra
//! integer unit between the reserve and the accounts involved.

mod bank;
mod burn;
mod fractional_balance;
mod invariants;
mod mint;
mod remainder;
mod send;
mod view;

pub use invariants::InvariantError;

use crate::{
    coin::Coins,
    conversion::CoinInfo,
    error::BankError,
    events::{Event, EventManager},
    ledger::AccountKeeper,
};
use alloy_primitives::{Address, U256};

/// Name of the reserve module account.
pub const MODULE_NAME: &str = "precisebank";

/// Precise bank keeper over a fractional store `S` and an integer ledger `L`.
#[derive(Debug)]
pub struct Keeper<S, L> {
    store: S,
    ledger: L,
    coin_info: CoinInfo,
    events: EventManager,
}

impl<S, L> Keeper<S, L> {
    /// Creates a keeper. The reserve module account is created by genesis
    /// import, not here.
    pub const fn new(store: S, ledger: L, coin_info: CoinInfo) -> Self {
        Self {
            store,
            ledger,
            coin_info,
            events: EventManager::new(),
        }
    }

    /// Denominations and conversion factor.
    pub const fn coin_info(&self) -> &CoinInfo {
        &self.coin_info
    }

    /// The underlying integer ledger.
    pub const fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Mutable access to the underlying integer ledger.
    ///
    /// Writes through this handle bypass every guarantee of the keeper.
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    /// The fractional store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the fractional store.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Events emitted by the keeper so far.
    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    /// Drains the events emitted by the keeper.
    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take()
    }

    /// Splits the keeper into its store and ledger.
    pub fn into_parts(self) -> (S, L) {
        (self.store, self.ledger)
    }

    fn integer_coins(&self, amount: U256) -> Coins {
        Coins::from(self.coin_info.integer_coin(amount))
    }

    fn is_extended_denom(&self, denom: &str) -> bool {
        denom == self.coin_info.extended_denom()
    }
}

impl<S, L: AccountKeeper> Keeper<S, L> {
    /// Address of the reserve, `None` until the module account is registered.
    pub fn reserve_address(&self) -> Option<Address> {
        self.ledger.module_address(MODULE_NAME)
    }

    fn reserve_address_or_panic(&self) -> Address {
        self.resolve_module(MODULE_NAME)
    }

    fn resolve_module(&self, name: &str) -> Address {
        match self.ledger.module_address(name) {
            Some(address) => address,
            None => panic!(
                "{}",
                BankError::UnknownAddress(format!("module account {name} does not exist"))
            ),
        }
    }

    fn is_reserve(&self, address: Address) -> bool {
        self.reserve_address() == Some(address)
    }
}

fn send_not_allowed() -> BankError {
    BankError::Unauthorized(format!(
        "module account {MODULE_NAME} is not allowed to send funds"
    ))
}

fn receive_not_allowed() -> BankError {
    BankError::Unauthorized(format!(
        "module account {MODULE_NAME} is not allowed to receive funds"
    ))
}
