use super::Keeper;
use crate::store::{decode_amount, encode_amount, KvStore, REMAINDER_KEY};
use alloy_primitives::U256;

impl<S: KvStore, L> Keeper<S, L> {
    /// Current remainder, zero when nothing is stored.
    pub fn get_remainder_amount(&self) -> U256 {
        match self.store.get(REMAINDER_KEY) {
            Some(bytes) => match decode_amount(&bytes) {
                Some(amount) => amount,
                None => panic!("corrupt remainder amount"),
            },
            None => U256::ZERO,
        }
    }

    /// Stores the remainder. Zero deletes the entry.
    ///
    /// # Panics
    ///
    /// If `amount` is not below the conversion factor.
    pub fn set_remainder_amount(&mut self, amount: U256) {
        if amount.is_zero() {
            self.delete_remainder_amount();
            return;
        }
        if let Err(err) = self.coin_info.validate_remainder_amount(amount) {
            panic!("remainder amount is invalid: {err}");
        }
        self.store.set(REMAINDER_KEY, encode_amount(amount));
    }

    /// Removes the stored remainder.
    pub fn delete_remainder_amount(&mut self) {
        self.store.delete(REMAINDER_KEY);
    }
}
