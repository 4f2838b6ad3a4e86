use super::{receive_not_allowed, send_not_allowed, Keeper, MODULE_NAME};
use crate::{
    coin::Coins,
    error::BankError,
    events::Event,
    ledger::{BankKeeper, Ledger},
    store::KvStore,
};
use alloy_primitives::{Address, U256};
use tracing::{debug, trace};

impl<S: KvStore, L: Ledger> Keeper<S, L> {
    /// Moves `amount` from `from` to `to`.
    ///
    /// The reserve can be neither sender nor recipient. Other denominations
    /// are moved by the ledger; the extended amount moves whole integer units
    /// directly and settles the fraction against both fractional balances.
    pub fn send_coins(
        &mut self,
        from: Address,
        to: Address,
        amount: &Coins,
    ) -> Result<(), BankError> {
        if let Some(reserve) = self.reserve_address() {
            if from == reserve {
                return Err(send_not_allowed());
            }
            if to == reserve {
                return Err(receive_not_allowed());
            }
        }

        if !amount.is_valid() {
            return Err(BankError::InvalidCoins(amount.to_string()));
        }
        let full = self.coin_info.sum_extended_coin(amount)?;

        let extended_amount = amount.amount_of(self.coin_info.extended_denom());
        let passthrough = amount.without(self.coin_info.extended_denom());
        debug!(target: "precisebank", %from, %to, %amount, "sending coins");

        if !passthrough.is_empty() {
            self.ledger.send_coins(from, to, &passthrough)?;
        }
        if !extended_amount.is_zero() {
            self.send_extended_coin(from, to, extended_amount)?;
        }

        let full = Coins::from(full);
        if !full.is_empty() {
            self.events.emit_all([
                Event::coin_spent(from, &full),
                Event::coin_received(to, &full),
                Event::transfer(to, from, &full),
            ]);
        }
        Ok(())
    }

    /// Moves `amount` from an account to a module.
    ///
    /// # Panics
    ///
    /// When `recipient_module` is not registered.
    pub fn send_coins_from_account_to_module(
        &mut self,
        from: Address,
        recipient_module: &str,
        amount: &Coins,
    ) -> Result<(), BankError> {
        let to = self.resolve_module(recipient_module);
        if recipient_module == MODULE_NAME {
            return Err(receive_not_allowed());
        }
        self.send_coins(from, to, amount)
    }

    /// Moves `amount` from a module to an account that is not blocked.
    ///
    /// # Panics
    ///
    /// When `sender_module` is not registered.
    pub fn send_coins_from_module_to_account(
        &mut self,
        sender_module: &str,
        to: Address,
        amount: &Coins,
    ) -> Result<(), BankError> {
        let from = self.resolve_module(sender_module);
        if sender_module == MODULE_NAME {
            return Err(send_not_allowed());
        }
        if self.is_reserve(to) {
            return Err(receive_not_allowed());
        }
        if self.ledger.blocked_addr(to) {
            return Err(BankError::Unauthorized(format!(
                "{to} is not allowed to receive funds"
            )));
        }
        self.send_coins(from, to, amount)
    }

    /// Moves `amount` between two modules.
    ///
    /// # Panics
    ///
    /// When either module is not registered.
    pub fn send_coins_from_module_to_module(
        &mut self,
        sender_module: &str,
        recipient_module: &str,
        amount: &Coins,
    ) -> Result<(), BankError> {
        let from = self.resolve_module(sender_module);
        let to = self.resolve_module(recipient_module);
        if sender_module == MODULE_NAME {
            return Err(send_not_allowed());
        }
        if recipient_module == MODULE_NAME {
            return Err(receive_not_allowed());
        }
        self.send_coins(from, to, amount)
    }

    fn send_extended_coin(
        &mut self,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), BankError> {
        let spendable = self.spendable_coin(from, self.coin_info.extended_denom());
        if spendable.amount < amount {
            return Err(BankError::InsufficientFunds(format!(
                "spendable balance {spendable} is smaller than {}",
                self.coin_info.extended_coin(amount)
            )));
        }
        if from == to {
            trace!(
                target: "precisebank",
                %from,
                %amount,
                "self transfer leaves balances unchanged"
            );
            return Ok(());
        }

        let cf = self.coin_info.conversion_factor();
        let (integer_amount, fractional_amount) = self.coin_info.split(amount);

        let sender_fractional = self.get_fractional_balance(from);
        let borrow = sender_fractional < fractional_amount;
        let new_sender_fractional = if borrow {
            sender_fractional + (cf - fractional_amount)
        } else {
            sender_fractional - fractional_amount
        };

        let mut new_receiver_fractional = self.get_fractional_balance(to) + fractional_amount;
        let carry = new_receiver_fractional >= cf;
        if carry {
            new_receiver_fractional -= cf;
        }

        trace!(
            target: "precisebank",
            %integer_amount,
            %fractional_amount,
            borrow,
            carry,
            "send decomposition"
        );

        let mut integer_transfer = integer_amount;
        match (borrow, carry) {
            // the unit the sender borrows is the unit the receiver carries
            (true, true) => integer_transfer += U256::from(1),
            (true, false) => self.ledger.send_coins_from_account_to_module(
                from,
                MODULE_NAME,
                &self.integer_coins(U256::from(1)),
            )?,
            (false, true) => {
                let reserve = self.reserve_address_or_panic();
                self.ledger
                    .send_coins(reserve, to, &self.integer_coins(U256::from(1)))?;
            }
            (false, false) => {}
        }

        if !integer_transfer.is_zero() {
            self.ledger
                .send_coins(from, to, &self.integer_coins(integer_transfer))?;
        }

        self.set_fractional_balance(from, new_sender_fractional);
        self.set_fractional_balance(to, new_receiver_fractional);
        Ok(())
    }
}
