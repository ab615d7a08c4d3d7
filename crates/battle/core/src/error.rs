//! Common error infrastructure for battle-core.
//!
//! Domain-specific errors (`LedgerError`, `CastError`, `HotkeyError`, ...) are
//! defined next to the operations that validate them. This module holds the
//! shared severity classification and context types.
//!
//! Nothing in the core is fatal: every failure degrades to "no mutation plus a
//! reported reason", so the severity scale stops at [`ErrorSeverity::Internal`].

use crate::hero::HeroId;

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The same request may succeed later (cooldown elapses, mana arrives).
    Recoverable,

    /// The request itself is malformed (unknown hotkey, duplicate hero).
    Validation,

    /// Core bookkeeping disagreed with itself. Indicates a bug.
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Contextual information attached to errors for diagnostics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorContext {
    /// Hero involved in the failure (if applicable).
    pub hero: Option<HeroId>,

    /// Ability slot on that hero (if applicable).
    pub slot: Option<u8>,

    /// Turn number at the time of the error.
    pub turn: u32,

    /// Optional static message providing additional context.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub message: Option<&'static str>,
}

impl ErrorContext {
    /// Creates a new error context for the given turn.
    #[must_use]
    pub const fn new(turn: u32) -> Self {
        Self {
            hero: None,
            slot: None,
            turn,
            message: None,
        }
    }

    /// Attaches a hero to this context (builder pattern).
    #[must_use]
    pub const fn with_hero(mut self, hero: HeroId) -> Self {
        self.hero = Some(hero);
        self
    }

    /// Attaches an ability slot to this context (builder pattern).
    #[must_use]
    pub const fn with_slot(mut self, slot: u8) -> Self {
        self.slot = Some(slot);
        self
    }

    /// Attaches a static message to this context (builder pattern).
    #[must_use]
    pub const fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

/// Common trait for all battle-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for the Display/Error impl
/// - Include `ErrorContext` in variants that need debugging info
/// - Classify severity based on recoverability, not impact
pub trait BattleError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns the context information for this error, if available.
    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Returns a stable identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
