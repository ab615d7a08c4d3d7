//! Synchronous, topic-filtered observer bus.
//!
//! Handlers run on the publishing thread, in registration order, after the
//! mutation that produced the event has completed. A handler only receives
//! the event by reference, so it cannot re-enter the core while it runs.

use core::fmt;

use crate::ability::CastEligibility;
use crate::battle::{CastId, DamageComposition, EnemyId, TargetingMode};
use crate::hero::{AbilityRef, HeroId};
use crate::mana::{ManaChange, ManaSnapshot};

/// Topics for event routing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Topic {
    /// Ledger balance changes.
    Mana,
    /// Per-ability cast eligibility.
    Eligibility,
    /// Targeting mode changes and resolved casts.
    Targeting,
    /// Damage compositions and passive activations.
    Damage,
    /// Battle lifecycle, turns, and active hero.
    Battle,
    /// Asynchronous effect completions reported by the host runtime.
    Effects,
}

/// Eligibility of one ability, as shown on its button.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityEligibility {
    pub ability: AbilityRef,
    pub name: String,
    pub cooldown_remaining: u32,
    pub eligibility: CastEligibility,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleEvent {
    ManaChanged {
        changes: Vec<ManaChange>,
        balances: ManaSnapshot,
    },
    EligibilityChanged(Vec<AbilityEligibility>),
    TargetingChanged(TargetingMode),
    CastResolved {
        cast: CastId,
        ability: AbilityRef,
        target: EnemyId,
        pending_effect: bool,
    },
    HeroesActivated(DamageComposition),
    BattleStarted,
    BattleEnded,
    ActiveHeroChanged {
        index: usize,
        hero: Option<HeroId>,
    },
    TurnStarted {
        turn: u32,
    },
    TurnEnded {
        turn: u32,
    },
    EffectCompleted {
        cast: CastId,
    },
}

impl BattleEvent {
    pub fn topic(&self) -> Topic {
        match self {
            Self::ManaChanged { .. } => Topic::Mana,
            Self::EligibilityChanged(_) => Topic::Eligibility,
            Self::TargetingChanged(_) | Self::CastResolved { .. } => Topic::Targeting,
            Self::HeroesActivated(_) => Topic::Damage,
            Self::BattleStarted
            | Self::BattleEnded
            | Self::ActiveHeroChanged { .. }
            | Self::TurnStarted { .. }
            | Self::TurnEnded { .. } => Topic::Battle,
            Self::EffectCompleted { .. } => Topic::Effects,
        }
    }
}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

pub type EventHandler = Box<dyn FnMut(&BattleEvent) + Send>;

struct Subscription {
    id: SubscriptionId,
    topic: Option<Topic>,
    handler: EventHandler,
}

#[derive(Default)]
pub struct EventBus {
    subscriptions: Vec<Subscription>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for one topic.
    pub fn subscribe<F>(&mut self, topic: Topic, handler: F) -> SubscriptionId
    where
        F: FnMut(&BattleEvent) + Send + 'static,
    {
        self.register(Some(topic), Box::new(handler))
    }

    /// Registers a handler for every topic.
    pub fn subscribe_all<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&BattleEvent) + Send + 'static,
    {
        self.register(None, Box::new(handler))
    }

    fn register(&mut self, topic: Option<Topic>, handler: EventHandler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription { id, topic, handler });
        id
    }

    /// Removes a handler. Returns false when the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|subscription| subscription.id != id);
        self.subscriptions.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Delivers the event to every matching handler, in registration order.
    pub fn publish(&mut self, event: &BattleEvent) {
        let topic = event.topic();
        let mut delivered = 0usize;
        for subscription in &mut self.subscriptions {
            if subscription.topic.is_none_or(|wanted| wanted == topic) {
                (subscription.handler)(event);
                delivered += 1;
            }
        }
        if delivered == 0 {
            tracing::trace!(%topic, "no subscribers for topic");
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.subscriptions.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}
