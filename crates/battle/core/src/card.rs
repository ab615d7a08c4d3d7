//! Played cards and the hand descriptions the damage pipeline reads.
//!
//! Hand evaluation (deciding that five cards form a flush) happens outside the
//! core. The core only consumes the result as a [`HandDescription`].

use core::fmt;

use crate::mana::Suit;

/// Card rank. Ranks never affect mana funding.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rank {
    #[strum(serialize = "2")]
    Two = 2,
    #[strum(serialize = "3")]
    Three,
    #[strum(serialize = "4")]
    Four,
    #[strum(serialize = "5")]
    Five,
    #[strum(serialize = "6")]
    Six,
    #[strum(serialize = "7")]
    Seven,
    #[strum(serialize = "8")]
    Eight,
    #[strum(serialize = "9")]
    Nine,
    #[strum(serialize = "10")]
    Ten,
    #[strum(serialize = "J")]
    Jack,
    #[strum(serialize = "Q")]
    Queen,
    #[strum(serialize = "K")]
    King,
    #[strum(serialize = "A")]
    Ace,
}

impl Rank {
    pub const fn value(self) -> u8 {
        self as u8
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { suit, rank }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit.symbol())
    }
}

/// Poker-style category of a played hand, weakest first.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum HandKind {
    #[default]
    HighCard,
    Pair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
    RoyalFlush,
}

/// A hand as evaluated by the external hand evaluator: its category plus the
/// cards that contribute to it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandDescription {
    pub kind: HandKind,
    pub cards: Vec<Card>,
}

impl HandDescription {
    pub fn new(kind: HandKind, cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            kind,
            cards: cards.into_iter().collect(),
        }
    }

    /// Number of contributing cards of the given suit.
    pub fn count_suit(&self, suit: Suit) -> usize {
        self.cards.iter().filter(|card| card.suit == suit).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_display() {
        assert_eq!(Card::new(Rank::Ace, Suit::Spades).to_string(), "A♠");
        assert_eq!(Card::new(Rank::Ten, Suit::Hearts).to_string(), "10♥");
    }

    #[test]
    fn rank_values() {
        assert_eq!(Rank::Two.value(), 2);
        assert_eq!(Rank::Ace.value(), 14);
        assert!(Rank::King < Rank::Ace);
    }

    #[test]
    fn counts_suits_in_hand() {
        let hand = HandDescription::new(
            HandKind::Pair,
            [
                Card::new(Rank::Nine, Suit::Hearts),
                Card::new(Rank::Nine, Suit::Clubs),
                Card::new(Rank::Two, Suit::Hearts),
            ],
        );
        assert_eq!(hand.count_suit(Suit::Hearts), 2);
        assert_eq!(hand.count_suit(Suit::Spades), 0);
    }
}
