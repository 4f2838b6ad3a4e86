use super::Keeper;
use crate::store::{
    address_from_key, decode_amount, encode_amount, fractional_balance_key, KvStore,
    FRACTIONAL_BALANCE_PREFIX,
};
use alloy_primitives::{Address, U256};

impl<S: KvStore, L> Keeper<S, L> {
    /// Fractional balance of `address`, zero when nothing is stored.
    pub fn get_fractional_balance(&self, address: Address) -> U256 {
        self.store
            .get(&fractional_balance_key(address))
            .map(|bytes| decode_fractional(address, &bytes))
            .unwrap_or_default()
    }

    /// Stores the fractional balance of `address`. A zero amount deletes it.
    ///
    /// # Panics
    ///
    /// If `amount` is not below the conversion factor.
    pub fn set_fractional_balance(&mut self, address: Address, amount: U256) {
        if amount.is_zero() {
            self.delete_fractional_balance(address);
            return;
        }
        if let Err(err) = self.coin_info.validate_fractional_amount(amount) {
            panic!("amount is invalid: {err}");
        }
        self.store
            .set(&fractional_balance_key(address), encode_amount(amount));
    }

    /// Removes the fractional balance of `address`.
    pub fn delete_fractional_balance(&mut self, address: Address) {
        self.store.delete(&fractional_balance_key(address));
    }

    /// Visits every stored fractional balance in address order until `f`
    /// returns `true`.
    pub fn iterate_fractional_balances(&self, mut f: impl FnMut(Address, U256) -> bool) {
        for (key, value) in self.store.prefix_iter(&[FRACTIONAL_BALANCE_PREFIX]) {
            let Some(address) = address_from_key(&key) else {
                panic!("malformed fractional balance key {key:?}");
            };
            if f(address, decode_fractional(address, &value)) {
                break;
            }
        }
    }

    /// Every stored fractional balance in address order.
    pub fn fractional_balances(&self) -> Vec<(Address, U256)> {
        let mut balances = Vec::new();
        self.iterate_fractional_balances(|address, amount| {
            balances.push((address, amount));
            false
        });
        balances
    }

    /// Sum of all stored fractional balances.
    pub fn total_fractional_balances(&self) -> U256 {
        let mut total = U256::ZERO;
        self.iterate_fractional_balances(|_, amount| {
            total += amount;
            false
        });
        total
    }
}

fn decode_fractional(address: Address, bytes: &[u8]) -> U256 {
    match decode_amount(bytes) {
        Some(amount) => amount,
        None => panic!("corrupt fractional balance for {address}"),
    }
}
