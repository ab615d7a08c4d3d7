//! Input events accepted from the presentation layer.
//!
//! Hotkey numbers select abilities by their position in the flattened roster
//! order; a click resolves or ignores a pending target; cancel closes the
//! targeting session. Single digit keys are accepted as a shorthand for
//! hotkeys 0 through 9.

use super::context::EnemyId;
use crate::config::HotkeyOrigin;
use crate::error::{BattleError, ErrorContext, ErrorSeverity};

/// Raw input routed into the battle core.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InputEvent {
    /// Hotkey N pressed, counted from the configured origin.
    HotkeyNumber(u32),
    /// A raw key press. Only ASCII digits select abilities.
    Hotkey(char),
    /// A click on the battlefield. `None` means empty space.
    TargetClicked(Option<EnemyId>),
    Cancel,
}

/// Whether the core consumed an input event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputOutcome {
    Handled,
    /// Consumed but refused; carries the human-readable reason.
    Rejected(String),
    /// Not meaningful in the current state. Callers may route it elsewhere.
    Unhandled,
}

impl InputOutcome {
    pub fn is_handled(&self) -> bool {
        matches!(self, Self::Handled)
    }
}

/// Errors raised while turning a key press into an ability index.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HotkeyError {
    #[error("no ability at index {index} ({available} available)")]
    OutOfRange {
        index: usize,
        available: usize,
        #[cfg_attr(feature = "serde", serde(skip))]
        context: ErrorContext,
    },

    #[error("hotkey {number} is not valid under {origin} hotkeys")]
    InvalidNumber {
        number: u32,
        origin: HotkeyOrigin,
        #[cfg_attr(feature = "serde", serde(skip))]
        context: ErrorContext,
    },

    #[error("key {key:?} is not an ability hotkey")]
    UnrecognizedKey {
        key: char,
        #[cfg_attr(feature = "serde", serde(skip))]
        context: ErrorContext,
    },
}

impl HotkeyError {
    pub fn out_of_range(index: usize, available: usize, turn: u32) -> Self {
        Self::OutOfRange {
            index,
            available,
            context: ErrorContext::new(turn),
        }
    }

    pub fn invalid_number(number: u32, origin: HotkeyOrigin, turn: u32) -> Self {
        Self::InvalidNumber {
            number,
            origin,
            context: ErrorContext::new(turn),
        }
    }

    pub fn unrecognized(key: char, turn: u32) -> Self {
        Self::UnrecognizedKey {
            key,
            context: ErrorContext::new(turn),
        }
    }
}

impl BattleError for HotkeyError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::OutOfRange { context, .. }
            | Self::InvalidNumber { context, .. }
            | Self::UnrecognizedKey { context, .. } => Some(context),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::OutOfRange { .. } => "HOTKEY_OUT_OF_RANGE",
            Self::InvalidNumber { .. } => "HOTKEY_INVALID_NUMBER",
            Self::UnrecognizedKey { .. } => "HOTKEY_UNRECOGNIZED",
        }
    }
}

/// Maps a hotkey number to a 0-based flattened ability index.
///
/// Any number is accepted except 0 under a one-based origin; whether an
/// ability sits at the index is checked on selection.
pub fn hotkey_number_index(
    number: u32,
    origin: HotkeyOrigin,
    turn: u32,
) -> Result<usize, HotkeyError> {
    origin.index_for(number).ok_or_else(|| {
        let err = HotkeyError::invalid_number(number, origin, turn);
        tracing::warn!(number, %origin, %err, "invalid hotkey number");
        err
    })
}

/// Maps a digit key to a 0-based flattened ability index.
pub fn hotkey_index(key: char, origin: HotkeyOrigin, turn: u32) -> Result<usize, HotkeyError> {
    let index = key
        .to_digit(10)
        .and_then(|digit| origin.index_for(digit))
        .ok_or_else(|| HotkeyError::unrecognized(key, turn));

    if let Err(err) = &index {
        tracing::warn!(%key, %origin, %err, "unrecognized hotkey");
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_based_digits_map_to_indices() {
        assert_eq!(hotkey_index('1', HotkeyOrigin::OneBased, 0), Ok(0));
        assert_eq!(hotkey_index('9', HotkeyOrigin::OneBased, 0), Ok(8));
        assert!(matches!(
            hotkey_index('0', HotkeyOrigin::OneBased, 0),
            Err(HotkeyError::UnrecognizedKey { key: '0', .. })
        ));
    }

    #[test]
    fn zero_based_digits_map_to_indices() {
        assert_eq!(hotkey_index('0', HotkeyOrigin::ZeroBased, 0), Ok(0));
        assert_eq!(hotkey_index('3', HotkeyOrigin::ZeroBased, 0), Ok(3));
    }

    #[test]
    fn non_digits_are_rejected() {
        for key in ['q', ' ', '#'] {
            let err = hotkey_index(key, HotkeyOrigin::OneBased, 2).unwrap_err();
            assert_eq!(err.error_code(), "HOTKEY_UNRECOGNIZED");
            assert_eq!(err.context().map(|c| c.turn), Some(2));
        }
    }

    #[test]
    fn hotkey_numbers_reach_past_single_digits() {
        assert_eq!(hotkey_number_index(16, HotkeyOrigin::OneBased, 0), Ok(15));
        assert_eq!(hotkey_number_index(15, HotkeyOrigin::ZeroBased, 0), Ok(15));
        assert_eq!(hotkey_number_index(0, HotkeyOrigin::ZeroBased, 0), Ok(0));

        let err = hotkey_number_index(0, HotkeyOrigin::OneBased, 3).unwrap_err();
        assert_eq!(err.error_code(), "HOTKEY_INVALID_NUMBER");
        assert_eq!(err.to_string(), "hotkey 0 is not valid under one_based hotkeys");
    }

    #[test]
    fn out_of_range_reports_available_count() {
        let err = HotkeyError::out_of_range(6, 4, 1);
        assert_eq!(err.to_string(), "no ability at index 6 (4 available)");
        assert_eq!(err.severity(), ErrorSeverity::Validation);
    }
}
