use crate::coin::Coins;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Event type emitted when coins leave an account.
pub const EVENT_TYPE_COIN_SPENT: &str = "coin_spent";
/// Event type emitted when coins arrive at an account.
pub const EVENT_TYPE_COIN_RECEIVED: &str = "coin_received";
/// Event type emitted for newly minted coins.
pub const EVENT_TYPE_COINBASE: &str = "coinbase";
/// Event type emitted for burned coins.
pub const EVENT_TYPE_BURN: &str = "burn";
/// Event type emitted for transfers between two accounts.
pub const EVENT_TYPE_TRANSFER: &str = "transfer";

/// A key/value attribute of an [`Event`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute key.
    pub key: String,
    /// Attribute value.
    pub value: String,
}

/// A typed event with ordered attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Event type, one of the `EVENT_TYPE_*` constants for ledger events.
    pub kind: String,
    /// Ordered attributes.
    pub attributes: Vec<Attribute>,
}

impl Event {
    /// Creates an event with no attributes.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attributes: Vec::new(),
        }
    }

    /// Appends an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.attributes.push(Attribute {
            key: key.into(),
            value: value.to_string(),
        });
        self
    }

    /// Value of the first attribute named `key`.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }

    /// `coin_spent{spender, amount}`.
    pub fn coin_spent(spender: Address, amount: &Coins) -> Self {
        Self::new(EVENT_TYPE_COIN_SPENT)
            .with_attribute("spender", spender)
            .with_attribute("amount", amount)
    }

    /// `coin_received{receiver, amount}`.
    pub fn coin_received(receiver: Address, amount: &Coins) -> Self {
        Self::new(EVENT_TYPE_COIN_RECEIVED)
            .with_attribute("receiver", receiver)
            .with_attribute("amount", amount)
    }

    /// `coinbase{minter, amount}`.
    pub fn coinbase(minter: Address, amount: &Coins) -> Self {
        Self::new(EVENT_TYPE_COINBASE)
            .with_attribute("minter", minter)
            .with_attribute("amount", amount)
    }

    /// `burn{burner, amount}`.
    pub fn burn(burner: Address, amount: &Coins) -> Self {
        Self::new(EVENT_TYPE_BURN)
            .with_attribute("burner", burner)
            .with_attribute("amount", amount)
    }

    /// `transfer{recipient, sender, amount}`.
    pub fn transfer(recipient: Address, sender: Address, amount: &Coins) -> Self {
        Self::new(EVENT_TYPE_TRANSFER)
            .with_attribute("recipient", recipient)
            .with_attribute("sender", sender)
            .with_attribute("amount", amount)
    }
}

/// Append-only event sink.
///
/// Events are kept in emission order. The caller drains them with
/// [`EventManager::take`] after each operation.
#[derive(Debug, Clone, Default)]
pub struct EventManager {
    events: Vec<Event>,
}

impl EventManager {
    /// Creates an empty sink.
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Appends a single event.
    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Appends several events, preserving their order.
    pub fn emit_all(&mut self, events: impl IntoIterator<Item = Event>) {
        self.events.extend(events);
    }

    /// Events emitted so far.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Drains all events emitted so far.
    pub fn take(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coin::Coin;
    use alloy_primitives::{address, U256};

    #[test]
    fn transfer_event_attributes() {
        let sender = address!("0x1000000000000000000000000000000000000001");
        let recipient = address!("0x2000000000000000000000000000000000000002");
        let amount = Coins::from(Coin::new("aatom", U256::from(5)));

        let event = Event::transfer(recipient, sender, &amount);
        assert_eq!(event.kind, EVENT_TYPE_TRANSFER);
        assert_eq!(event.attribute("amount"), Some("5aatom"));
        assert_eq!(event.attribute("sender"), Some(sender.to_string().as_str()));
        assert_eq!(
            event.attribute("recipient"),
            Some(recipient.to_string().as_str())
        );
        assert_eq!(event.attribute("missing"), None);
    }

    #[test]
    fn manager_preserves_order_and_drains() {
        let mut manager = EventManager::new();
        manager.emit(Event::new("a"));
        manager.emit_all([Event::new("b"), Event::new("c")]);
        let kinds: Vec<_> = manager.events().iter().map(|e| e.kind.clone()).collect();
        assert_eq!(kinds, ["a", "b", "c"]);

        assert_eq!(manager.take().len(), 3);
        assert!(manager.events().is_empty());
    }
}
