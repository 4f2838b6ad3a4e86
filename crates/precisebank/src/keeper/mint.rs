use super::{Keeper, MODULE_NAME};
use crate::{
    coin::{Coin, Coins},
    error::BankError,
    events::Event,
    ledger::{AccountKeeper, BankKeeper, Ledger, Permission},
    store::KvStore,
};
use alloy_primitives::{Address, U256};
use tracing::{debug, trace};

impl<S: KvStore, L: Ledger> Keeper<S, L> {
    /// Mints `amount` into the account of `module`.
    ///
    /// Denominations other than the extended one are minted by the ledger
    /// unchanged. The extended amount is split into integer units minted to the
    /// module and a fraction added to the module's fractional balance, with the
    /// reserve adjusted so it keeps backing every fraction.
    ///
    /// # Panics
    ///
    /// - when minting to the reserve itself
    /// - when `module` is not registered
    /// - when `module` lacks the minter permission
    pub fn mint_coins(&mut self, module: &str, amount: &Coins) -> Result<(), BankError> {
        assert!(
            module != MODULE_NAME,
            "{}",
            BankError::Unauthorized(format!("module account {module} cannot be minted to"))
        );

        let Some(account) = self.ledger.module_account(module) else {
            panic!(
                "{}",
                BankError::UnknownAddress(format!("module account {module} does not exist"))
            );
        };
        assert!(
            account.has_permission(Permission::Minter),
            "{}",
            BankError::Unauthorized(format!(
                "module account {module} does not have permissions to mint tokens"
            ))
        );

        if !amount.is_valid() {
            return Err(BankError::InvalidCoins(amount.to_string()));
        }
        let full = self.coin_info.sum_extended_coin(amount)?;
        self.ensure_supply_fits(&full)?;

        let extended_amount = amount.amount_of(self.coin_info.extended_denom());
        let passthrough = amount.without(self.coin_info.extended_denom());
        debug!(target: "precisebank", module, %amount, "minting coins");

        if !passthrough.is_empty() {
            self.ledger.mint_coins(module, &passthrough)?;
        }
        if !extended_amount.is_zero() {
            self.mint_extended_coin(module, account.address, extended_amount)?;
        }

        let full = Coins::from(full);
        if !full.is_empty() {
            self.events.emit_all([
                Event::coin_received(account.address, &full),
                Event::coinbase(account.address, &full),
            ]);
        }
        Ok(())
    }

    /// Rejects a mint after which the integer supply, plus one spare reserve
    /// unit, would have no extended representation. Every balance is bounded
    /// by the supply, so balances stay representable too.
    fn ensure_supply_fits(&self, minted: &Coin) -> Result<(), BankError> {
        if minted.is_zero() {
            return Ok(());
        }
        let integer_denom = self.coin_info.integer_denom();
        let supply = self.ledger.get_supply(integer_denom).amount;
        let fits = self
            .coin_info
            .to_extended(supply)
            .and_then(|total| total.checked_add(minted.amount))
            .and_then(|total| total.checked_add(self.coin_info.conversion_factor()))
            .is_some();
        if !fits {
            return Err(BankError::Overflow(format!(
                "minting {minted} on top of a supply of {supply}{integer_denom}"
            )));
        }
        Ok(())
    }

    fn mint_extended_coin(
        &mut self,
        module: &str,
        recipient: Address,
        amount: U256,
    ) -> Result<(), BankError> {
        let cf = self.coin_info.conversion_factor();
        let (integer_mint, fractional_mint) = self.coin_info.split(amount);

        let mut new_fractional = self.get_fractional_balance(recipient) + fractional_mint;
        let carry = new_fractional >= cf;
        if carry {
            new_fractional -= cf;
        }

        // The minted fraction is taken out of the remainder. A remainder that is
        // too small gets one fresh integer unit of reserve backing first.
        let remainder = self.get_remainder_amount();
        let borrow_remainder = fractional_mint > remainder;
        let new_remainder = if borrow_remainder {
            remainder + (cf - fractional_mint)
        } else {
            remainder - fractional_mint
        };

        trace!(
            target: "precisebank",
            module,
            %integer_mint,
            %fractional_mint,
            carry,
            borrow_remainder,
            "mint decomposition"
        );

        let one = self.integer_coins(U256::from(1));
        let mut integer_to_module = integer_mint;
        match (carry, borrow_remainder) {
            (true, false) => {
                self.ledger
                    .send_coins_from_module_to_module(MODULE_NAME, module, &one)?
            }
            // the new reserve unit would leave again for the carry, so mint it
            // straight to the module
            (true, true) => integer_to_module += U256::from(1),
            (false, true) => self.ledger.mint_coins(MODULE_NAME, &one)?,
            (false, false) => {}
        }

        if !integer_to_module.is_zero() {
            self.ledger
                .mint_coins(module, &self.integer_coins(integer_to_module))?;
        }

        self.set_fractional_balance(recipient, new_fractional);
        self.set_remainder_amount(new_remainder);
        Ok(())
    }
}
