//! In-memory integer ledger.
//!
//! [`MemoryLedger`] implements [`BankKeeper`] and [`AccountKeeper`] with the
//! full error and panic contract of the production ledger: module account
//! permissions, blocked recipients, locked (vesting) amounts and supply
//! accounting. It backs tests, simulations and benchmarks of the precise
//! keeper.

use crate::{
    coin::{Coin, Coins},
    error::BankError,
    events::{Event, EventManager},
    ledger::{AccountKeeper, BankKeeper, ModuleAccount, Permission},
};
use alloy_primitives::{Address, U256};
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

type Balances = BTreeMap<String, U256>;

/// Ordered in-memory ledger.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    balances: BTreeMap<Address, Balances>,
    locked: BTreeMap<Address, Balances>,
    supply: Balances,
    modules: BTreeMap<String, ModuleAccount>,
    blocked: BTreeSet<Address>,
    events: EventManager,
}

impl MemoryLedger {
    /// Creates an empty ledger with no module accounts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Self::register_module_account`].
    pub fn with_module_account(mut self, name: &str, permissions: Vec<Permission>) -> Self {
        self.register_module_account(name, permissions);
        self
    }

    /// Registers a module account, replacing the permissions of an existing one.
    pub fn register_module_account(&mut self, name: &str, permissions: Vec<Permission>) -> Address {
        let account = ModuleAccount::new(name, permissions);
        let address = account.address;
        self.modules.insert(name.to_string(), account);
        address
    }

    /// Marks `address` as unable to receive funds from modules.
    pub fn block_address(&mut self, address: Address) {
        self.blocked.insert(address);
    }

    /// Sets the locked amounts of `address`, replacing previous locks.
    pub fn set_locked(&mut self, address: Address, locked: &Coins) {
        let locks: Balances = locked.iter().map(|c| (c.denom.clone(), c.amount)).collect();
        if locks.is_empty() {
            self.locked.remove(&address);
        } else {
            self.locked.insert(address, locks);
        }
    }

    /// Credits `amount` to `address`, increasing the supply accordingly.
    pub fn fund_account(&mut self, address: Address, amount: &Coins) -> Result<(), BankError> {
        if !amount.is_valid() {
            return Err(BankError::InvalidCoins(amount.to_string()));
        }
        self.add_coins(address, amount)?;
        self.increase_supply(amount)
    }

    /// Credits `amount` to the account of module `name`.
    ///
    /// # Panics
    ///
    /// If the module is not registered.
    pub fn fund_module_account(&mut self, name: &str, amount: &Coins) -> Result<(), BankError> {
        let address = self.module_account_or_panic(name).address;
        self.fund_account(address, amount)
    }

    /// Events emitted so far.
    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    /// Drains the emitted events.
    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take()
    }

    fn balance_of(&self, address: Address, denom: &str) -> U256 {
        self.balances
            .get(&address)
            .and_then(|b| b.get(denom))
            .copied()
            .unwrap_or_default()
    }

    fn locked_of(&self, address: Address, denom: &str) -> U256 {
        self.locked
            .get(&address)
            .and_then(|b| b.get(denom))
            .copied()
            .unwrap_or_default()
    }

    fn module_account_or_panic(&self, name: &str) -> &ModuleAccount {
        match self.modules.get(name) {
            Some(account) => account,
            None => panic!(
                "{}",
                BankError::UnknownAddress(format!("module account {name} does not exist"))
            ),
        }
    }

    fn add_coins(&mut self, address: Address, amount: &Coins) -> Result<(), BankError> {
        for coin in amount {
            let updated = self
                .balance_of(address, &coin.denom)
                .checked_add(coin.amount)
                .ok_or_else(|| BankError::Overflow(format!("balance of {address} plus {coin}")))?;
            self.balances
                .entry(address)
                .or_default()
                .insert(coin.denom.clone(), updated);
        }
        self.events.emit(Event::coin_received(address, amount));
        Ok(())
    }

    fn sub_unlocked_coins(&mut self, address: Address, amount: &Coins) -> Result<(), BankError> {
        if !amount.is_valid() {
            return Err(BankError::InvalidCoins(amount.to_string()));
        }
        for coin in amount {
            let spendable = self.spendable_coin(address, &coin.denom);
            if spendable.amount < coin.amount {
                return Err(BankError::InsufficientFunds(format!(
                    "spendable balance {spendable} is smaller than {coin}"
                )));
            }
        }
        for coin in amount {
            let updated = self.balance_of(address, &coin.denom) - coin.amount;
            let balances = self.balances.entry(address).or_default();
            if updated.is_zero() {
                balances.remove(&coin.denom);
            } else {
                balances.insert(coin.denom.clone(), updated);
            }
            if balances.is_empty() {
                self.balances.remove(&address);
            }
        }
        self.events.emit(Event::coin_spent(address, amount));
        Ok(())
    }

    fn increase_supply(&mut self, amount: &Coins) -> Result<(), BankError> {
        for coin in amount {
            let supply = self.supply.entry(coin.denom.clone()).or_default();
            *supply = supply
                .checked_add(coin.amount)
                .ok_or_else(|| BankError::Overflow(format!("supply of {}", coin.denom)))?;
        }
        Ok(())
    }

    fn decrease_supply(&mut self, amount: &Coins) {
        for coin in amount {
            let supply = self.supply.entry(coin.denom.clone()).or_default();
            *supply = supply.saturating_sub(coin.amount);
        }
    }

    fn module_with_permission(&self, name: &str, permission: Permission, action: &str) -> Address {
        let account = self.module_account_or_panic(name);
        assert!(
            account.has_permission(permission),
            "{}",
            BankError::Unauthorized(format!(
                "module account {name} does not have permissions to {action} tokens"
            ))
        );
        account.address
    }
}

impl AccountKeeper for MemoryLedger {
    fn module_address(&self, name: &str) -> Option<Address> {
        self.modules.get(name).map(|m| m.address)
    }

    fn module_account(&self, name: &str) -> Option<ModuleAccount> {
        self.modules.get(name).cloned()
    }

    fn ensure_module_account(&mut self, name: &str, permissions: &[Permission]) -> ModuleAccount {
        self.modules
            .entry(name.to_string())
            .or_insert_with(|| ModuleAccount::new(name, permissions.to_vec()))
            .clone()
    }
}

impl BankKeeper for MemoryLedger {
    fn get_balance(&self, address: Address, denom: &str) -> Coin {
        Coin::new(denom, self.balance_of(address, denom))
    }

    fn get_all_balances(&self, address: Address) -> Coins {
        self.balances
            .get(&address)
            .map(|b| {
                Coins::from_unchecked(
                    b.iter()
                        .map(|(denom, amount)| Coin::new(denom.clone(), *amount))
                        .collect(),
                )
            })
            .unwrap_or_default()
    }

    fn spendable_coin(&self, address: Address, denom: &str) -> Coin {
        let spendable = self
            .balance_of(address, denom)
            .saturating_sub(self.locked_of(address, denom));
        Coin::new(denom, spendable)
    }

    fn get_supply(&self, denom: &str) -> Coin {
        Coin::new(denom, self.supply.get(denom).copied().unwrap_or_default())
    }

    fn total_supply(&self) -> Coins {
        Coins::from_unchecked(
            self.supply
                .iter()
                .filter(|(_, amount)| !amount.is_zero())
                .map(|(denom, amount)| Coin::new(denom.clone(), *amount))
                .collect(),
        )
    }

    fn all_balances(&self) -> Vec<(Address, Coins)> {
        self.balances
            .keys()
            .map(|address| (*address, self.get_all_balances(*address)))
            .collect()
    }

    fn blocked_addr(&self, address: Address) -> bool {
        self.blocked.contains(&address)
    }

    fn send_coins(&mut self, from: Address, to: Address, amount: &Coins) -> Result<(), BankError> {
        self.sub_unlocked_coins(from, amount)?;
        self.add_coins(to, amount)?;
        self.events.emit(Event::transfer(to, from, amount));
        trace!(target: "precisebank::ledger", %from, %to, %amount, "sent coins");
        Ok(())
    }

    fn send_coins_from_account_to_module(
        &mut self,
        from: Address,
        recipient_module: &str,
        amount: &Coins,
    ) -> Result<(), BankError> {
        let to = self.module_account_or_panic(recipient_module).address;
        self.send_coins(from, to, amount)
    }

    fn send_coins_from_module_to_account(
        &mut self,
        sender_module: &str,
        to: Address,
        amount: &Coins,
    ) -> Result<(), BankError> {
        let from = self.module_account_or_panic(sender_module).address;
        if self.blocked_addr(to) {
            return Err(BankError::Unauthorized(format!(
                "{to} is not allowed to receive funds"
            )));
        }
        self.send_coins(from, to, amount)
    }

    fn send_coins_from_module_to_module(
        &mut self,
        sender_module: &str,
        recipient_module: &str,
        amount: &Coins,
    ) -> Result<(), BankError> {
        let from = self.module_account_or_panic(sender_module).address;
        let to = self.module_account_or_panic(recipient_module).address;
        self.send_coins(from, to, amount)
    }

    fn mint_coins(&mut self, module: &str, amount: &Coins) -> Result<(), BankError> {
        let address = self.module_with_permission(module, Permission::Minter, "mint");
        if !amount.is_valid() {
            return Err(BankError::InvalidCoins(amount.to_string()));
        }
        self.add_coins(address, amount)?;
        self.increase_supply(amount)?;
        self.events.emit(Event::coinbase(address, amount));
        trace!(target: "precisebank::ledger", module, %amount, "minted coins");
        Ok(())
    }

    fn burn_coins(&mut self, module: &str, amount: &Coins) -> Result<(), BankError> {
        let address = self.module_with_permission(module, Permission::Burner, "burn");
        if !amount.is_valid() {
            return Err(BankError::InvalidCoins(amount.to_string()));
        }
        self.sub_unlocked_coins(address, amount)?;
        self.decrease_supply(amount);
        self.events.emit(Event::burn(address, amount));
        trace!(target: "precisebank::ledger", module, %amount, "burned coins");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const DENOM: &str = "uatom";

    fn coins(amount: u64) -> Coins {
        Coins::from(Coin::new(DENOM, U256::from(amount)))
    }

    fn ledger() -> MemoryLedger {
        MemoryLedger::new()
            .with_module_account("mint", vec![Permission::Minter])
            .with_module_account("burner", vec![Permission::Burner])
            .with_module_account("plain", vec![])
    }

    #[test]
    fn mint_tracks_supply_and_events() {
        let mut ledger = ledger();
        ledger.mint_coins("mint", &coins(100)).unwrap();

        let addr = ledger.module_address("mint").unwrap();
        assert_eq!(ledger.get_balance(addr, DENOM).amount, U256::from(100));
        assert_eq!(ledger.get_supply(DENOM).amount, U256::from(100));

        let kinds: Vec<_> = ledger.events().iter().map(|e| e.kind.as_str()).collect();
        assert_eq!(kinds, ["coin_received", "coinbase"]);
    }

    #[test]
    #[should_panic(expected = "module account missing does not exist: unknown address")]
    fn mint_unknown_module_panics() {
        let _ = ledger().mint_coins("missing", &coins(1));
    }

    #[test]
    #[should_panic(
        expected = "module account plain does not have permissions to mint tokens: unauthorized"
    )]
    fn mint_without_permission_panics() {
        let _ = ledger().mint_coins("plain", &coins(1));
    }

    #[test]
    fn invalid_coins_are_rejected() {
        let mut ledger = ledger();
        let bad = Coins::from_unchecked(vec![Coin::zero(DENOM)]);
        let err = ledger.mint_coins("mint", &bad).unwrap_err();
        assert_eq!(err.to_string(), "0uatom: invalid coins");
    }

    #[test]
    fn send_respects_locked_amounts() {
        let mut ledger = ledger();
        let alice = address!("0x00000000000000000000000000000000000a11ce");
        let bob = address!("0x0000000000000000000000000000000000000b0b");
        ledger.fund_account(alice, &coins(10)).unwrap();
        ledger.set_locked(alice, &coins(4));

        assert_eq!(ledger.spendable_coin(alice, DENOM).amount, U256::from(6));
        let err = ledger.send_coins(alice, bob, &coins(7)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "spendable balance 6uatom is smaller than 7uatom: insufficient funds"
        );

        ledger.send_coins(alice, bob, &coins(6)).unwrap();
        assert_eq!(ledger.get_balance(alice, DENOM).amount, U256::from(4));
        assert_eq!(ledger.get_balance(bob, DENOM).amount, U256::from(6));
    }

    #[test]
    fn zero_balance_error_format() {
        let mut ledger = ledger();
        let alice = address!("0x00000000000000000000000000000000000a11ce");
        let err = ledger.send_coins(alice, alice, &coins(1)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "spendable balance 0uatom is smaller than 1uatom: insufficient funds"
        );
    }

    #[test]
    fn module_to_blocked_account_fails() {
        let mut ledger = ledger();
        let blocked = address!("0x00000000000000000000000000000000000000bb");
        ledger.block_address(blocked);
        ledger.mint_coins("mint", &coins(5)).unwrap();

        let err = ledger
            .send_coins_from_module_to_account("mint", blocked, &coins(1))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("{blocked} is not allowed to receive funds: unauthorized")
        );

        // plain account sends are not subject to the block list
        let mint = ledger.module_address("mint").unwrap();
        ledger.send_coins(mint, blocked, &coins(1)).unwrap();
    }

    #[test]
    fn burn_reduces_supply() {
        let mut ledger = ledger();
        ledger.fund_module_account("burner", &coins(9)).unwrap();
        ledger.burn_coins("burner", &coins(9)).unwrap();

        assert_eq!(ledger.get_supply(DENOM).amount, U256::ZERO);
        assert!(ledger.total_supply().is_empty());
        assert!(ledger.all_balances().is_empty());
    }

    #[test]
    fn ensure_module_account_creates_once() {
        let mut ledger = MemoryLedger::new();
        assert!(ledger.module_address("precisebank").is_none());
        let created = ledger.ensure_module_account("precisebank", &[Permission::Minter]);
        assert!(created.has_permission(Permission::Minter));
        assert!(!created.has_permission(Permission::Burner));
        assert_eq!(ledger.module_address("precisebank"), Some(created.address));

        let existing = ledger.ensure_module_account("precisebank", &[Permission::Burner]);
        assert_eq!(existing, created);
    }
}
