use super::Keeper;
use crate::{
    coin::Coin,
    ledger::{BankKeeper, Ledger},
    store::KvStore,
};
use alloy_primitives::{Address, U256};

impl<S: KvStore, L: Ledger> Keeper<S, L> {
    /// Balance of `denom` held by `address`.
    ///
    /// The extended denomination composes the integer balance with the
    /// fractional balance. The reserve always reports a zero extended balance
    /// since its integer units only back other accounts' fractions. Every
    /// other denomination is answered by the ledger.
    ///
    /// # Panics
    ///
    /// If the composed extended balance does not fit in 256 bits. Mints
    /// through the keeper never let the supply grow that large.
    pub fn get_balance(&self, address: Address, denom: &str) -> Coin {
        if !self.is_extended_denom(denom) {
            return self.ledger.get_balance(address, denom);
        }
        if self.is_reserve(address) {
            return Coin::zero(denom);
        }
        let integer = self
            .ledger
            .get_balance(address, self.coin_info.integer_denom())
            .amount;
        self.compose_balance(address, integer)
    }

    /// Same as [`Self::get_balance`] but from the spendable integer balance.
    ///
    /// # Panics
    ///
    /// Under the same condition as [`Self::get_balance`].
    pub fn spendable_coin(&self, address: Address, denom: &str) -> Coin {
        if !self.is_extended_denom(denom) {
            return self.ledger.spendable_coin(address, denom);
        }
        if self.is_reserve(address) {
            return Coin::zero(denom);
        }
        let integer = self
            .ledger
            .spendable_coin(address, self.coin_info.integer_denom())
            .amount;
        self.compose_balance(address, integer)
    }

    fn compose_balance(&self, address: Address, integer: U256) -> Coin {
        let fractional = self.get_fractional_balance(address);
        match self.coin_info.compose(integer, fractional) {
            Some(amount) => self.coin_info.extended_coin(amount),
            None => panic!("{}", self.coin_info.extended_overflow(integer)),
        }
    }
}
