//! Multi-suit mana economy.
//!
//! Cards fund the economy (one unit of the card's suit per card), abilities
//! spend it. The ledger enforces the per-suit bounds and refuses partial
//! debits of multi-suit costs.

mod cost;
mod ledger;
mod suit;

pub use cost::ManaCost;
pub use ledger::{LedgerError, ManaChange, ManaLedger, ManaSnapshot};
pub use suit::Suit;
