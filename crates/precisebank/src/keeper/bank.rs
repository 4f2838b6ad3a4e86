//! [`BankKeeper`] implementation so the keeper can stand in for the integer
//! ledger wherever EVM-facing code expects one.

use super::Keeper;
use crate::{
    coin::{Coin, Coins},
    error::BankError,
    ledger::{BankKeeper, Ledger},
    store::KvStore,
};
use alloy_primitives::Address;
use std::collections::BTreeSet;

impl<S: KvStore, L: Ledger> Keeper<S, L> {
    /// Circulating supply of the extended denomination: every integer unit
    /// in extended terms minus the remainder not yet assigned to an account.
    ///
    /// # Panics
    ///
    /// If the integer supply has no extended representation or the remainder
    /// exceeds it.
    pub fn extended_supply(&self) -> Coin {
        let integer = self
            .ledger
            .get_supply(self.coin_info.integer_denom())
            .amount;
        let Some(total) = self.coin_info.to_extended(integer) else {
            panic!("{}", self.coin_info.extended_overflow(integer));
        };
        let remainder = self.get_remainder_amount();
        let Some(circulating) = total.checked_sub(remainder) else {
            panic!("remainder {remainder} exceeds extended supply {total}");
        };
        self.coin_info.extended_coin(circulating)
    }
}

impl<S: KvStore, L: Ledger> BankKeeper for Keeper<S, L> {
    fn get_balance(&self, address: Address, denom: &str) -> Coin {
        Self::get_balance(self, address, denom)
    }

    fn get_all_balances(&self, address: Address) -> Coins {
        let extended = Self::get_balance(self, address, self.coin_info.extended_denom());
        let mut coins: Vec<Coin> = self
            .ledger
            .get_all_balances(address)
            .iter()
            .cloned()
            .collect();
        if !extended.is_zero() {
            coins.push(extended);
            coins.sort_by(|a, b| a.denom.cmp(&b.denom));
        }
        Coins::from_unchecked(coins)
    }

    fn spendable_coin(&self, address: Address, denom: &str) -> Coin {
        Self::spendable_coin(self, address, denom)
    }

    fn get_supply(&self, denom: &str) -> Coin {
        if self.is_extended_denom(denom) {
            return self.extended_supply();
        }
        self.ledger.get_supply(denom)
    }

    fn total_supply(&self) -> Coins {
        let mut coins: Vec<Coin> = self.ledger.total_supply().iter().cloned().collect();
        let extended = self.extended_supply();
        if !extended.is_zero() {
            coins.push(extended);
            coins.sort_by(|a, b| a.denom.cmp(&b.denom));
        }
        Coins::from_unchecked(coins)
    }

    fn all_balances(&self) -> Vec<(Address, Coins)> {
        let mut addresses: BTreeSet<Address> = self
            .ledger
            .all_balances()
            .into_iter()
            .map(|(address, _)| address)
            .collect();
        self.iterate_fractional_balances(|address, _| {
            addresses.insert(address);
            false
        });
        addresses
            .into_iter()
            .map(|address| (address, BankKeeper::get_all_balances(self, address)))
            .filter(|(_, coins)| !coins.is_empty())
            .collect()
    }

    fn blocked_addr(&self, address: Address) -> bool {
        self.ledger.blocked_addr(address)
    }

    fn send_coins(&mut self, from: Address, to: Address, amount: &Coins) -> Result<(), BankError> {
        Self::send_coins(self, from, to, amount)
    }

    fn send_coins_from_account_to_module(
        &mut self,
        from: Address,
        recipient_module: &str,
        amount: &Coins,
    ) -> Result<(), BankError> {
        Self::send_coins_from_account_to_module(self, from, recipient_module, amount)
    }

    fn send_coins_from_module_to_account(
        &mut self,
        sender_module: &str,
        to: Address,
        amount: &Coins,
    ) -> Result<(), BankError> {
        Self::send_coins_from_module_to_account(self, sender_module, to, amount)
    }

    fn send_coins_from_module_to_module(
        &mut self,
        sender_module: &str,
        recipient_module: &str,
        amount: &Coins,
    ) -> Result<(), BankError> {
        Self::send_coins_from_module_to_module(self, sender_module, recipient_module, amount)
    }

    fn mint_coins(&mut self, module: &str, amount: &Coins) -> Result<(), BankError> {
        Self::mint_coins(self, module, amount)
    }

    fn burn_coins(&mut self, module: &str, amount: &Coins) -> Result<(), BankError> {
        Self::burn_coins(self, module, amount)
    }
}
