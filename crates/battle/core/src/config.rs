/// How hotkey digits map onto the flattened ability list.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum HotkeyOrigin {
    /// Key '0' selects the first ability.
    ZeroBased,
    /// Key '1' selects the first ability.
    #[default]
    OneBased,
}

impl HotkeyOrigin {
    /// Converts a pressed digit into a 0-based flattened ability index.
    ///
    /// Returns `None` for digits that do not address any slot ('0' when
    /// one-based).
    pub const fn index_for(self, digit: u32) -> Option<usize> {
        match self {
            Self::ZeroBased => Some(digit as usize),
            Self::OneBased => {
                if digit == 0 {
                    None
                } else {
                    Some(digit as usize - 1)
                }
            }
        }
    }
}

/// Battle configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Per-suit mana ceiling. Never exceeds [`BattleConfig::MAX_MANA`].
    pub mana_cap: u8,
    /// Mana credited to a card's suit for every card played.
    pub mana_per_card: u8,
    /// Digit origin used by the hotkey input path.
    pub hotkey_origin: HotkeyOrigin,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    pub const SUIT_COUNT: usize = 4;
    pub const MAX_MANA: u8 = 10;
    pub const MAX_PARTY_SIZE: usize = 4;
    pub const MAX_ABILITIES_PER_HERO: usize = 4;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MANA_PER_CARD: u8 = 1;

    pub fn new() -> Self {
        Self {
            mana_cap: Self::MAX_MANA,
            mana_per_card: Self::DEFAULT_MANA_PER_CARD,
            hotkey_origin: HotkeyOrigin::default(),
        }
    }

    #[must_use]
    pub fn with_mana_cap(mut self, mana_cap: u8) -> Self {
        self.mana_cap = mana_cap;
        self
    }

    #[must_use]
    pub fn with_mana_per_card(mut self, mana_per_card: u8) -> Self {
        self.mana_per_card = mana_per_card;
        self
    }

    #[must_use]
    pub fn with_hotkey_origin(mut self, hotkey_origin: HotkeyOrigin) -> Self {
        self.hotkey_origin = hotkey_origin;
        self
    }

    /// Mana cap actually enforced by the ledger.
    pub fn effective_mana_cap(&self) -> u8 {
        self.mana_cap.min(Self::MAX_MANA)
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
