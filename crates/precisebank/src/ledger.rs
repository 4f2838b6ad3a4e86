//! Interface of the integer-denomination ledger.
//!
//! The precise keeper never touches integer balances directly. It drives the
//! ledger through these traits and relies on their exact error and panic
//! contract, which it reproduces for its own callers:
//!
//! - mint/burn on an unregistered module panics with an unknown address error
//! - mint/burn without the matching permission panics with an unauthorized error
//! - malformed coin sets are rejected with `"{coins}: invalid coins"`
//! - spending more than the spendable balance fails with
//!   `"spendable balance {balance} is smaller than {coin}: insufficient funds"`
//! - module-to-account sends to a blocked address fail with
//!   `"{address} is not allowed to receive funds: unauthorized"`

use crate::{
    coin::{Coin, Coins},
    error::BankError,
};
use alloy_primitives::{keccak256, Address};
use std::fmt;

/// Capability of a module account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// May mint coins into its own account.
    Minter,
    /// May burn coins from its own account.
    Burner,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minter => f.write_str("minter"),
            Self::Burner => f.write_str("burner"),
        }
    }
}

/// An account owned by a module rather than a key holder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleAccount {
    /// Module name.
    pub name: String,
    /// Derived address, see [`module_address_for`].
    pub address: Address,
    /// Granted permissions.
    pub permissions: Vec<Permission>,
}

impl ModuleAccount {
    /// Creates a module account at its derived address.
    pub fn new(name: impl Into<String>, permissions: Vec<Permission>) -> Self {
        let name = name.into();
        let address = module_address_for(&name);
        Self {
            name,
            address,
            permissions,
        }
    }

    /// Returns true if `permission` was granted.
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }
}

/// Deterministic address of the module named `name`: the last 20 bytes of
/// `keccak256(name)`.
pub fn module_address_for(name: &str) -> Address {
    Address::from_slice(&keccak256(name.as_bytes())[12..])
}

/// Module account registry.
pub trait AccountKeeper {
    /// Address of a registered module, `None` if the module is unknown.
    fn module_address(&self, name: &str) -> Option<Address>;

    /// The module account of a registered module.
    fn module_account(&self, name: &str) -> Option<ModuleAccount>;

    /// Returns the module account, registering it with `permissions` when
    /// absent. An existing account keeps the permissions it was created with.
    fn ensure_module_account(&mut self, name: &str, permissions: &[Permission]) -> ModuleAccount;
}

/// Integer ledger operations.
pub trait BankKeeper {
    /// Balance of `denom` held by `address`.
    fn get_balance(&self, address: Address, denom: &str) -> Coin;

    /// All balances held by `address`.
    fn get_all_balances(&self, address: Address) -> Coins;

    /// Balance of `denom` held by `address` minus its locked amount.
    fn spendable_coin(&self, address: Address, denom: &str) -> Coin;

    /// Total supply of `denom`.
    fn get_supply(&self, denom: &str) -> Coin;

    /// Total supply of every denomination.
    fn total_supply(&self) -> Coins;

    /// Every account with a non-empty balance, ordered by address.
    fn all_balances(&self) -> Vec<(Address, Coins)>;

    /// Returns true if `address` may not receive funds from modules.
    fn blocked_addr(&self, address: Address) -> bool;

    /// Moves `amount` from `from` to `to`.
    fn send_coins(&mut self, from: Address, to: Address, amount: &Coins) -> Result<(), BankError>;

    /// Moves `amount` from an account to a module. Panics if the module is unknown.
    fn send_coins_from_account_to_module(
        &mut self,
        from: Address,
        recipient_module: &str,
        amount: &Coins,
    ) -> Result<(), BankError>;

    /// Moves `amount` from a module to an account. Panics if the module is unknown.
    fn send_coins_from_module_to_account(
        &mut self,
        sender_module: &str,
        to: Address,
        amount: &Coins,
    ) -> Result<(), BankError>;

    /// Moves `amount` between two modules. Panics if either module is unknown.
    fn send_coins_from_module_to_module(
        &mut self,
        sender_module: &str,
        recipient_module: &str,
        amount: &Coins,
    ) -> Result<(), BankError>;

    /// Mints `amount` into a module account.
    fn mint_coins(&mut self, module: &str, amount: &Coins) -> Result<(), BankError>;

    /// Burns `amount` from a module account.
    fn burn_coins(&mut self, module: &str, amount: &Coins) -> Result<(), BankError>;
}

/// A ledger exposing both module accounts and balances.
pub trait Ledger: BankKeeper + AccountKeeper {}

impl<T: BankKeeper + AccountKeeper> Ledger for T {}
