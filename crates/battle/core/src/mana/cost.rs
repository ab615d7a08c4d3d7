use core::fmt;

use super::Suit;
use crate::config::BattleConfig;

/// Per-suit mana requirement of an ability.
///
/// Indexed by [`Suit`], so every suit is always covered; suits an ability does
/// not need simply hold zero. A cost of zero in every suit is legal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ManaCost {
    amounts: [u8; BattleConfig::SUIT_COUNT],
}

impl ManaCost {
    pub const FREE: Self = Self {
        amounts: [0; BattleConfig::SUIT_COUNT],
    };

    pub const fn new() -> Self {
        Self::FREE
    }

    /// Sets the requirement for one suit (builder pattern).
    #[must_use]
    pub const fn with(mut self, suit: Suit, amount: u8) -> Self {
        self.amounts[suit.index()] = amount;
        self
    }

    pub const fn amount(&self, suit: Suit) -> u8 {
        self.amounts[suit.index()]
    }

    pub fn is_free(&self) -> bool {
        self.amounts.iter().all(|&amount| amount == 0)
    }

    /// Iterates over the suits this cost actually draws from.
    pub fn iter(&self) -> impl Iterator<Item = (Suit, u8)> + '_ {
        Suit::ALL
            .into_iter()
            .map(|suit| (suit, self.amount(suit)))
            .filter(|&(_, amount)| amount > 0)
    }

    pub fn total(&self) -> u32 {
        self.amounts.iter().map(|&amount| u32::from(amount)).sum()
    }
}

impl FromIterator<(Suit, u8)> for ManaCost {
    /// Repeated suits accumulate.
    fn from_iter<I: IntoIterator<Item = (Suit, u8)>>(iter: I) -> Self {
        let mut cost = Self::FREE;
        for (suit, amount) in iter {
            let slot = &mut cost.amounts[suit.index()];
            *slot = slot.saturating_add(amount);
        }
        cost
    }
}

impl fmt::Display for ManaCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_free() {
            return f.write_str("free");
        }
        let mut first = true;
        for (suit, amount) in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{}{}", amount, suit.symbol())?;
            first = false;
        }
        Ok(())
    }
}
