//! Shared fixtures for the precise bank integration tests.

#![allow(dead_code)]

use alloy_primitives::{Address, U256};
use ev_precisebank::{
    AccountKeeper, Coin, CoinInfo, Coins, Keeper, MemoryLedger, MemoryStore, Permission,
    MODULE_NAME,
};

pub type TestKeeper = Keeper<MemoryStore, MemoryLedger>;

pub const INTEGER_DENOM: &str = "uatom";
pub const EXTENDED_DENOM: &str = "aatom";
pub const MINTER: &str = "minter";
pub const BURNER: &str = "burner";

/// Keeper over an in-memory ledger with the reserve, a module allowed to mint
/// and burn, and a burn-only module registered.
pub fn setup(decimals: u8) -> TestKeeper {
    let ledger = MemoryLedger::new()
        .with_module_account(MODULE_NAME, vec![Permission::Minter, Permission::Burner])
        .with_module_account(MINTER, vec![Permission::Minter, Permission::Burner])
        .with_module_account(BURNER, vec![Permission::Burner]);
    let info = CoinInfo::new(INTEGER_DENOM, EXTENDED_DENOM, decimals).unwrap();
    Keeper::new(MemoryStore::new(), ledger, info)
}

pub fn cf(keeper: &TestKeeper) -> U256 {
    keeper.coin_info().conversion_factor()
}

pub fn ext(amount: U256) -> Coins {
    Coins::from(Coin::new(EXTENDED_DENOM, amount))
}

pub fn int(amount: u64) -> Coins {
    Coins::from(Coin::new(INTEGER_DENOM, U256::from(amount)))
}

pub fn module_addr(keeper: &TestKeeper, name: &str) -> Address {
    keeper.ledger().module_address(name).unwrap()
}

pub fn extended_balance(keeper: &TestKeeper, address: Address) -> U256 {
    keeper.get_balance(address, EXTENDED_DENOM).amount
}
