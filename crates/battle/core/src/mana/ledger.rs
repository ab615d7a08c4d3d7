//! Per-suit mana accounting.
//!
//! The ledger is pure bookkeeping: it never publishes anything itself. Every
//! mutating call returns the [`ManaChange`]s it produced so the owning
//! aggregate can announce them after the fact.

use core::fmt;

use super::{ManaCost, Suit};
use crate::card::Card;
use crate::config::BattleConfig;
use crate::error::{BattleError, ErrorSeverity};

/// One suit's balance before and after a mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ManaChange {
    pub suit: Suit,
    pub before: u8,
    pub after: u8,
}

/// Read-only copy of every suit's balance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ManaSnapshot {
    balances: [u8; BattleConfig::SUIT_COUNT],
}

impl ManaSnapshot {
    pub const fn get(&self, suit: Suit) -> u8 {
        self.balances[suit.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Suit, u8)> + '_ {
        Suit::ALL.into_iter().map(|suit| (suit, self.get(suit)))
    }
}

impl fmt::Display for ManaSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (suit, amount)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}:{}", suit.symbol(), amount)?;
        }
        Ok(())
    }
}

/// Per-suit mana counters with `0 <= balance <= cap` for every suit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManaLedger {
    balances: [u8; BattleConfig::SUIT_COUNT],
    cap: u8,
    per_card: u8,
}

impl ManaLedger {
    /// Creates an empty ledger. `cap` is clamped to [`BattleConfig::MAX_MANA`].
    pub fn new(cap: u8) -> Self {
        Self {
            balances: [0; BattleConfig::SUIT_COUNT],
            cap: cap.min(BattleConfig::MAX_MANA),
            per_card: BattleConfig::DEFAULT_MANA_PER_CARD,
        }
    }

    pub fn from_config(config: &BattleConfig) -> Self {
        Self {
            per_card: config.mana_per_card,
            ..Self::new(config.effective_mana_cap())
        }
    }

    pub fn cap(&self) -> u8 {
        self.cap
    }

    pub fn balance(&self, suit: Suit) -> u8 {
        self.balances[suit.index()]
    }

    pub fn snapshot(&self) -> ManaSnapshot {
        ManaSnapshot {
            balances: self.balances,
        }
    }

    /// Adds mana to one suit, saturating at the cap. Always succeeds.
    pub fn credit(&mut self, suit: Suit, amount: u8) -> ManaChange {
        let before = self.balance(suit);
        let after = before.saturating_add(amount).min(self.cap);
        self.balances[suit.index()] = after;
        ManaChange {
            suit,
            before,
            after,
        }
    }

    /// Funds the ledger from played cards: each card credits its face suit,
    /// regardless of rank.
    pub fn credit_cards(&mut self, cards: &[Card]) -> Vec<ManaChange> {
        let per_card = self.per_card;
        cards
            .iter()
            .map(|card| self.credit(card.suit, per_card))
            .collect()
    }

    /// Subtracts from a single suit iff the balance covers it.
    ///
    /// Returns `false` without mutating anything otherwise.
    pub fn debit(&mut self, suit: Suit, amount: u8) -> bool {
        let balance = self.balance(suit);
        if balance < amount {
            return false;
        }
        self.balances[suit.index()] = balance - amount;
        true
    }

    /// True iff every suit in `cost` is covered by the current balance.
    pub fn can_afford(&self, cost: &ManaCost) -> bool {
        self.shortfall(cost).is_none()
    }

    /// First suit (in ledger order) the balance cannot cover.
    pub fn shortfall(&self, cost: &ManaCost) -> Option<LedgerError> {
        cost.iter().find_map(|(suit, required)| {
            let available = self.balance(suit);
            (available < required).then_some(LedgerError::Overdraw {
                suit,
                required,
                available,
            })
        })
    }

    /// Debits a multi-suit cost all-or-nothing.
    ///
    /// Every suit is checked before any is subtracted; on failure the ledger is
    /// untouched.
    pub fn debit_cost(&mut self, cost: &ManaCost) -> Result<Vec<ManaChange>, LedgerError> {
        if let Some(err) = self.shortfall(cost) {
            tracing::warn!(%cost, balances = %self.snapshot(), "refused mana overdraw");
            return Err(err);
        }

        let changes = cost
            .iter()
            .map(|(suit, amount)| {
                let before = self.balance(suit);
                let after = before - amount;
                self.balances[suit.index()] = after;
                ManaChange {
                    suit,
                    before,
                    after,
                }
            })
            .collect();

        Ok(changes)
    }

    /// Zeroes every suit. Returns only the suits that actually changed.
    pub fn reset(&mut self) -> Vec<ManaChange> {
        let changes = Suit::ALL
            .into_iter()
            .filter(|&suit| self.balance(suit) != 0)
            .map(|suit| ManaChange {
                suit,
                before: self.balance(suit),
                after: 0,
            })
            .collect();
        self.balances = [0; BattleConfig::SUIT_COUNT];
        changes
    }
}

impl Default for ManaLedger {
    fn default() -> Self {
        Self::from_config(&BattleConfig::default())
    }
}

/// Errors raised by the ledger.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LedgerError {
    /// A cost exceeded the balance of at least one suit.
    #[error("insufficient {suit} mana: need {required}, have {available}")]
    Overdraw {
        suit: Suit,
        required: u8,
        available: u8,
    },
}

impl BattleError for LedgerError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Overdraw { .. } => "LEDGER_OVERDRAW",
        }
    }
}
