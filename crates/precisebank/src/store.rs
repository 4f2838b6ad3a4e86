//! Key/value storage backing the fractional balance and remainder state.
//!
//! Layout:
//! - `0x01 || address` : fractional balance of `address`, 32 byte big-endian
//! - `0x02`            : remainder amount, 32 byte big-endian
//!
//! Zero values are never written; the setters delete the key instead.

use alloy_primitives::{Address, U256};
use std::collections::BTreeMap;

/// Key prefix of fractional balances.
pub const FRACTIONAL_BALANCE_PREFIX: u8 = 0x01;

const ADDRESS_LEN: usize = 20;

/// Key of the remainder amount.
pub const REMAINDER_KEY: &[u8] = &[0x02];

/// Ordered byte key/value store.
///
/// Iteration must follow key order so that exports and invariant reports are
/// deterministic.
pub trait KvStore {
    /// Returns the value stored at `key`.
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    /// Writes `value` at `key`.
    fn set(&mut self, key: &[u8], value: Vec<u8>);

    /// Removes `key`, if present.
    fn delete(&mut self, key: &[u8]);

    /// Iterates every entry whose key starts with `prefix`, in key order.
    fn prefix_iter<'a>(&'a self, prefix: &[u8])
        -> Box<dyn Iterator<Item = (Vec<u8>, Vec<u8>)> + 'a>;
}

/// In-memory [`KvStore`] over a [`BTreeMap`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &[u8], value: Vec<u8>) {
        self.entries.insert(key.to_vec(), value);
    }

    fn delete(&mut self, key: &[u8]) {
        self.entries.remove(key);
    }

    fn prefix_iter<'a>(
        &'a self,
        prefix: &[u8],
    ) -> Box<dyn Iterator<Item = (Vec<u8>, Vec<u8>)> + 'a> {
        let prefix = prefix.to_vec();
        Box::new(
            self.entries
                .range(prefix.clone()..)
                .take_while(move |(key, _)| key.starts_with(&prefix))
                .map(|(key, value)| (key.clone(), value.clone())),
        )
    }
}

/// Store key of the fractional balance of `address`.
pub fn fractional_balance_key(address: Address) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + ADDRESS_LEN);
    key.push(FRACTIONAL_BALANCE_PREFIX);
    key.extend_from_slice(address.as_slice());
    key
}

/// Address encoded in a fractional balance key.
pub fn address_from_key(key: &[u8]) -> Option<Address> {
    match key.split_first() {
        Some((&FRACTIONAL_BALANCE_PREFIX, rest)) if rest.len() == ADDRESS_LEN => {
            Some(Address::from_slice(rest))
        }
        _ => None,
    }
}

/// Encodes an amount as 32 big-endian bytes.
pub fn encode_amount(amount: U256) -> Vec<u8> {
    amount.to_be_bytes::<32>().to_vec()
}

/// Decodes an amount written by [`encode_amount`].
pub fn decode_amount(bytes: &[u8]) -> Option<U256> {
    U256::try_from_be_slice(bytes)
}
