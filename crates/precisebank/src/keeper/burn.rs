use super::{Keeper, MODULE_NAME};
use crate::{
    coin::Coins,
    error::BankError,
    events::Event,
    ledger::{AccountKeeper, BankKeeper, Ledger, Permission},
    store::KvStore,
};
use alloy_primitives::{Address, U256};
use tracing::{debug, trace};

impl<S: KvStore, L: Ledger> Keeper<S, L> {
    /// Burns `amount` from the account of `module`.
    ///
    /// Burned fractions are added to the remainder; once it reaches a whole
    /// integer unit that unit is burned from the reserve.
    ///
    /// # Panics
    ///
    /// - when burning from the reserve itself
    /// - when `module` is not registered
    /// - when `module` lacks the burner permission
    pub fn burn_coins(&mut self, module: &str, amount: &Coins) -> Result<(), BankError> {
        assert!(
            module != MODULE_NAME,
            "{}",
            BankError::Unauthorized(format!("module account {module} cannot be burned from"))
        );

        let Some(account) = self.ledger.module_account(module) else {
            panic!(
                "{}",
                BankError::UnknownAddress(format!("module account {module} does not exist"))
            );
        };
        assert!(
            account.has_permission(Permission::Burner),
            "{}",
            BankError::Unauthorized(format!(
                "module account {module} does not have permissions to burn tokens"
            ))
        );

        if !amount.is_valid() {
            return Err(BankError::InvalidCoins(amount.to_string()));
        }
        let full = self.coin_info.sum_extended_coin(amount)?;

        let extended_amount = amount.amount_of(self.coin_info.extended_denom());
        let passthrough = amount.without(self.coin_info.extended_denom());
        debug!(target: "precisebank", module, %amount, "burning coins");

        if !passthrough.is_empty() {
            self.ledger.burn_coins(module, &passthrough)?;
        }
        if !extended_amount.is_zero() {
            self.burn_extended_coin(module, account.address, extended_amount)?;
        }

        let full = Coins::from(full);
        if !full.is_empty() {
            self.events.emit_all([
                Event::coin_spent(account.address, &full),
                Event::burn(account.address, &full),
            ]);
        }
        Ok(())
    }

    fn burn_extended_coin(
        &mut self,
        module: &str,
        holder: Address,
        amount: U256,
    ) -> Result<(), BankError> {
        let spendable = self.spendable_coin(holder, self.coin_info.extended_denom());
        if spendable.amount < amount {
            return Err(BankError::InsufficientFunds(format!(
                "spendable balance {spendable} is smaller than {}",
                self.coin_info.extended_coin(amount)
            )));
        }

        let cf = self.coin_info.conversion_factor();
        let (integer_burn, fractional_burn) = self.coin_info.split(amount);

        let prev_fractional = self.get_fractional_balance(holder);
        let borrow = prev_fractional < fractional_burn;
        let new_fractional = if borrow {
            prev_fractional + (cf - fractional_burn)
        } else {
            prev_fractional - fractional_burn
        };

        let mut new_remainder = self.get_remainder_amount() + fractional_burn;
        let overflow = new_remainder >= cf;
        if overflow {
            new_remainder -= cf;
        }

        trace!(
            target: "precisebank",
            module,
            %integer_burn,
            %fractional_burn,
            borrow,
            overflow,
            "burn decomposition"
        );

        let one = self.integer_coins(U256::from(1));
        let mut integer_from_module = integer_burn;
        match (borrow, overflow) {
            (true, false) => {
                self.ledger
                    .send_coins_from_module_to_module(module, MODULE_NAME, &one)?
            }
            (false, true) => self.ledger.burn_coins(MODULE_NAME, &one)?,
            // the borrowed unit is exactly the one the reserve would burn
            (true, true) => integer_from_module += U256::from(1),
            (false, false) => {}
        }

        if !integer_from_module.is_zero() {
            self.ledger
                .burn_coins(module, &self.integer_coins(integer_from_module))?;
        }

        self.set_fractional_balance(holder, new_fractional);
        self.set_remainder_amount(new_remainder);
        Ok(())
    }
}
