//! End-to-end behavior with 6 native decimals, a conversion factor of 10^12.

mod common;

use alloy_primitives::{address, Address, U256};
use common::*;
use ev_precisebank::{BankError, BankKeeper, Coin, Coins, InvariantError, MODULE_NAME};

const ALICE: Address = address!("0x00000000000000000000000000000000000a11ce");
const BOB: Address = address!("0x0000000000000000000000000000000000000b0b");

#[test]
fn integer_mint_is_visible_in_extended_units() {
    let mut keeper = setup(6);
    keeper.mint_coins(MINTER, &int(1000)).unwrap();

    let minter = module_addr(&keeper, MINTER);
    let reserve = module_addr(&keeper, MODULE_NAME);
    assert_eq!(
        extended_balance(&keeper, minter),
        U256::from(1000) * cf(&keeper)
    );
    assert_eq!(cf(&keeper), U256::from(1_000_000_000_000u64));
    assert_eq!(keeper.get_fractional_balance(minter), U256::ZERO);
    assert_eq!(
        keeper.ledger().get_balance(reserve, INTEGER_DENOM).amount,
        U256::ZERO
    );
    keeper.check_all_invariants().unwrap();
}

#[test]
fn fractional_mints_carry_into_an_integer_unit() {
    let mut keeper = setup(6);
    let cf = cf(&keeper);
    keeper
        .mint_coins(MINTER, &ext(cf / U256::from(4) * U256::from(3)))
        .unwrap();
    keeper.mint_coins(MINTER, &ext(cf / U256::from(2))).unwrap();

    let minter = module_addr(&keeper, MINTER);
    assert_eq!(keeper.get_fractional_balance(minter), cf / U256::from(4));
    assert_eq!(
        keeper.ledger().get_balance(minter, INTEGER_DENOM).amount,
        U256::from(1)
    );
    keeper.check_all_invariants().unwrap();
}

#[test]
fn burning_more_than_the_composed_balance_fails() {
    let mut keeper = setup(6);
    let cf = cf(&keeper);
    keeper.mint_coins(MINTER, &ext(cf)).unwrap();

    let err = keeper
        .burn_coins(MINTER, &ext(cf * U256::from(2)))
        .unwrap_err();
    assert!(err.is_insufficient_funds());
    assert_eq!(
        err.to_string(),
        "spendable balance 1000000000000aatom is smaller than 2000000000000aatom: insufficient funds"
    );
    keeper.check_all_invariants().unwrap();
}

#[test]
fn sending_one_unit_borrows_from_integer_balance() {
    let mut keeper = setup(6);
    let cf = cf(&keeper);
    keeper.mint_coins(MINTER, &int(1)).unwrap();
    keeper
        .send_coins_from_module_to_account(MINTER, ALICE, &int(1))
        .unwrap();
    assert_eq!(keeper.get_fractional_balance(ALICE), U256::ZERO);

    keeper.send_coins(ALICE, BOB, &ext(U256::from(1))).unwrap();

    assert_eq!(keeper.get_fractional_balance(ALICE), cf - U256::from(1));
    assert_eq!(
        keeper.ledger().get_balance(ALICE, INTEGER_DENOM).amount,
        U256::ZERO
    );
    assert_eq!(extended_balance(&keeper, ALICE), cf - U256::from(1));
    assert_eq!(extended_balance(&keeper, BOB), U256::from(1));
    keeper.check_all_invariants().unwrap();
}

#[test]
fn sending_to_the_reserve_is_rejected_before_the_ledger() {
    let mut keeper = setup(6);
    keeper.mint_coins(MINTER, &int(5)).unwrap();
    keeper
        .send_coins_from_module_to_account(MINTER, ALICE, &int(5))
        .unwrap();
    keeper.take_events();
    keeper.ledger_mut().take_events();

    let reserve = module_addr(&keeper, MODULE_NAME);
    let err = keeper
        .send_coins(ALICE, reserve, &ext(U256::from(1)))
        .unwrap_err();
    assert_eq!(
        err,
        BankError::Unauthorized(
            "module account precisebank is not allowed to receive funds".to_string()
        )
    );
    assert_eq!(
        err.to_string(),
        "module account precisebank is not allowed to receive funds: unauthorized"
    );

    // nothing reached the ledger
    assert!(keeper.ledger().events().is_empty());
    assert!(keeper.events().is_empty());
    assert_eq!(
        keeper.ledger().get_balance(ALICE, INTEGER_DENOM).amount,
        U256::from(5)
    );
}

#[test]
fn reserve_reports_no_extended_balance() {
    let mut keeper = setup(6);
    keeper.mint_coins(MINTER, &ext(U256::from(10))).unwrap();

    let reserve = module_addr(&keeper, MODULE_NAME);
    assert_eq!(
        keeper.ledger().get_balance(reserve, INTEGER_DENOM).amount,
        U256::from(1)
    );
    assert_eq!(extended_balance(&keeper, reserve), U256::ZERO);
    assert_eq!(
        keeper.spendable_coin(reserve, EXTENDED_DENOM).amount,
        U256::ZERO
    );
}

#[test]
fn blocked_recipient_is_rejected() {
    let mut keeper = setup(6);
    keeper.mint_coins(MINTER, &int(1)).unwrap();
    keeper.ledger_mut().block_address(BOB);

    let err = keeper
        .send_coins_from_module_to_account(MINTER, BOB, &int(1))
        .unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(
        err.to_string(),
        format!("{BOB} is not allowed to receive funds: unauthorized")
    );
}

#[test]
fn locked_coins_limit_extended_spending() {
    let mut keeper = setup(6);
    let cf = cf(&keeper);
    keeper.mint_coins(MINTER, &int(2)).unwrap();
    keeper
        .send_coins_from_module_to_account(MINTER, ALICE, &int(2))
        .unwrap();
    keeper.ledger_mut().set_locked(ALICE, &int(1));

    assert_eq!(keeper.spendable_coin(ALICE, EXTENDED_DENOM).amount, cf);
    let err = keeper
        .send_coins(ALICE, BOB, &ext(cf + U256::from(1)))
        .unwrap_err();
    assert!(err.is_insufficient_funds());
    keeper.send_coins(ALICE, BOB, &ext(cf)).unwrap();
    keeper.check_all_invariants().unwrap();
}

#[test]
fn non_extended_denominations_pass_through() {
    let mut keeper = setup(6);
    let stake = Coins::from(Coin::new("stake", U256::from(40)));
    keeper.mint_coins(MINTER, &stake).unwrap();
    keeper
        .send_coins_from_module_to_account(MINTER, ALICE, &stake)
        .unwrap();

    assert_eq!(keeper.get_balance(ALICE, "stake").amount, U256::from(40));
    let too_much = Coins::from(Coin::new("stake", U256::from(41)));
    let err = keeper.send_coins(ALICE, BOB, &too_much).unwrap_err();
    assert!(err.is_insufficient_funds());
    keeper.check_all_invariants().unwrap();
}

#[test]
fn module_transfers_keep_fractions() {
    let mut keeper = setup(6);
    let cf = cf(&keeper);
    keeper.mint_coins(MINTER, &ext(cf + U256::from(7))).unwrap();
    keeper
        .send_coins_from_module_to_module(MINTER, BURNER, &ext(U256::from(7)))
        .unwrap();
    keeper.burn_coins(BURNER, &ext(U256::from(7))).unwrap();

    let minter = module_addr(&keeper, MINTER);
    let burner = module_addr(&keeper, BURNER);
    assert_eq!(extended_balance(&keeper, minter), cf);
    assert_eq!(extended_balance(&keeper, burner), U256::ZERO);
    keeper.check_all_invariants().unwrap();
}

#[test]
fn supply_beyond_the_extended_range_is_never_clamped() {
    let mut keeper = setup(6);
    let units = U256::MAX / cf(&keeper) + U256::from(1);
    let amount = Coins::from(Coin::new(INTEGER_DENOM, units));

    let err = keeper.mint_coins(MINTER, &amount).unwrap_err();
    assert_eq!(
        err,
        BankError::Overflow(format!("{units}uatom exceeds the range of aatom"))
    );
    keeper.check_all_invariants().unwrap();

    // funding the ledger directly bypasses the mint guard
    keeper
        .ledger_mut()
        .fund_module_account(MINTER, &amount)
        .unwrap();
    let result = keeper.check_total_supply();
    assert!(matches!(result, Err(InvariantError::Overflow { .. })));
}
