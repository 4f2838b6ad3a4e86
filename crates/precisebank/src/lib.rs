//! Precise bank for ev-reth
//!
//! The native coin of the underlying ledger may carry fewer than 18 decimals
//! while EVM-facing code expects 18. This crate bridges the gap:
//! - Exposes an extended 18 decimal denomination on top of the integer ledger
//! - Tracks sub-unit fractional balances per account plus a global remainder
//! - Keeps a reserve module account whose integer balance backs every fraction
//! - Reproduces the ledger's error and panic contract for mint, burn and send
//! - Imports, exports and checks its state through genesis and invariants

/// Denominated amounts and coin sets.
pub mod coin;

/// Configuration of the bridged denominations.
pub mod config;

/// Conversion factor and fractional amount rules.
pub mod conversion;

/// Ledger error taxonomy.
pub mod error;

/// Ledger events.
pub mod events;

/// Genesis import and export.
pub mod genesis;

/// The precise bank keeper.
pub mod keeper;

/// Traits of the integer ledger.
pub mod ledger;

/// In-memory integer ledger.
pub mod memory;

/// Read-only queries.
pub mod query;

/// RPC modules for the precise bank.
pub mod rpc;

/// Fractional balance and remainder storage.
pub mod store;

// Re-export public types
pub use coin::{Coin, Coins};
pub use config::{parse_precisebank_config, ConfigError, PreciseBankConfig};
pub use conversion::{CoinInfo, FractionalAmountError};
pub use error::BankError;
pub use events::{Event, EventManager};
pub use genesis::{export_genesis, init_genesis, FractionalBalance, GenesisError, GenesisState};
pub use keeper::{InvariantError, Keeper, MODULE_NAME};
pub use ledger::{AccountKeeper, BankKeeper, Ledger, ModuleAccount, Permission};
pub use memory::MemoryLedger;
pub use query::{
    FractionalBalanceResponse, QueryError, RemainderResponse, TotalFractionalBalancesResponse,
};
pub use rpc::{create_precisebank_module, PreciseBankApiImpl, PreciseBankApiServer};
pub use store::{KvStore, MemoryStore};
