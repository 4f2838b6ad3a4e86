//! Moving state between keepers through genesis export and import.

mod common;

use alloy_primitives::{address, Address, U256};
use common::*;
use ev_precisebank::{
    export_genesis, init_genesis, BankKeeper, CoinInfo, GenesisState, Keeper, MemoryLedger,
    MemoryStore, Permission, MODULE_NAME,
};

const ALICE: Address = address!("0x00000000000000000000000000000000000a11ce");
const BOB: Address = address!("0x0000000000000000000000000000000000000b0b");

fn populated() -> TestKeeper {
    let mut keeper = setup(6);
    let cf = cf(&keeper);
    keeper
        .mint_coins(MINTER, &ext(cf * U256::from(3) + U256::from(123)))
        .unwrap();
    keeper
        .send_coins_from_module_to_account(MINTER, ALICE, &ext(cf + U256::from(100)))
        .unwrap();
    keeper
        .send_coins(ALICE, BOB, &ext(U256::from(999)))
        .unwrap();
    keeper.burn_coins(MINTER, &ext(U256::from(50))).unwrap();
    keeper.check_all_invariants().unwrap();
    keeper
}

#[test]
fn exported_state_imports_into_a_fresh_store() {
    let source = populated();
    let exported = export_genesis(&source);
    let balances: Vec<_> = [ALICE, BOB].iter().map(|a| extended_balance(&source, *a)).collect();

    let info = source.coin_info().clone();
    let (_, ledger) = source.into_parts();
    let mut target = Keeper::new(MemoryStore::new(), ledger, info);
    init_genesis(&mut target, &exported);

    assert_eq!(export_genesis(&target), exported);
    target.check_all_invariants().unwrap();
    let imported: Vec<_> = [ALICE, BOB].iter().map(|a| extended_balance(&target, *a)).collect();
    assert_eq!(imported, balances);
}

#[test]
fn exported_state_survives_json() {
    let keeper = populated();
    let exported = export_genesis(&keeper);

    let json = serde_json::to_string(&exported).unwrap();
    let decoded: GenesisState = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, exported);
    decoded.validate(keeper.coin_info()).unwrap();
}

#[test]
#[should_panic(
    expected = "module account balance does not match sum of fractional balances and remainder"
)]
fn import_without_reserve_backing_panics() {
    let source = populated();
    let exported = export_genesis(&source);
    let mut empty = setup(6);
    init_genesis(&mut empty, &exported);
}

#[test]
fn genesis_registers_a_reserve_able_to_mint_and_burn() {
    let ledger = MemoryLedger::new()
        .with_module_account(MINTER, vec![Permission::Minter, Permission::Burner]);
    let info = CoinInfo::new(INTEGER_DENOM, EXTENDED_DENOM, 6).unwrap();
    let mut keeper = Keeper::new(MemoryStore::new(), ledger, info);
    init_genesis(&mut keeper, &GenesisState::default());

    let cf = cf(&keeper);
    keeper.mint_coins(MINTER, &ext(cf / U256::from(4))).unwrap();
    keeper.mint_coins(MINTER, &ext(cf)).unwrap();
    keeper.burn_coins(MINTER, &ext(cf / U256::from(2))).unwrap();
    keeper.burn_coins(MINTER, &ext(cf / U256::from(2))).unwrap();

    let minter = module_addr(&keeper, MINTER);
    assert_eq!(extended_balance(&keeper, minter), cf / U256::from(4));
    keeper.check_all_invariants().unwrap();

    // the last fraction fills the remainder, which burns the reserve's unit
    keeper.burn_coins(MINTER, &ext(cf / U256::from(4))).unwrap();
    let reserve = module_addr(&keeper, MODULE_NAME);
    assert_eq!(
        keeper.ledger().get_balance(reserve, INTEGER_DENOM).amount,
        U256::ZERO
    );
    assert_eq!(keeper.get_remainder_amount(), U256::ZERO);
    keeper.check_all_invariants().unwrap();
}
