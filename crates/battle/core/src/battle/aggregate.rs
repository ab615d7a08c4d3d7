//! The per-battle aggregate owning every piece of mutable core state.
//!
//! `BattleCore` is the only writer of the ledger, the roster's cooldowns, and
//! the targeting session. Every public mutation publishes its events on the
//! owned [`EventBus`] after the state change is complete, so observers always
//! see a consistent post-mutation view.

use super::context::{BattleContext, EnemyId, EnemyView};
use super::damage::{DamageComposer, DamageComposition};
use super::input::{HotkeyError, InputEvent, InputOutcome, hotkey_index, hotkey_number_index};
use super::targeting::{
    CastId, SelectError, SelectOutcome, TargetOutcome, TargetingMode, TargetingSession,
};
use super::turn::{TurnCycle, TurnError};
use crate::ability::CastError;
use crate::card::{Card, HandDescription};
use crate::config::BattleConfig;
use crate::events::{AbilityEligibility, BattleEvent, EventBus};
use crate::hero::{AbilityRef, HeroId, HeroRoster, RosterError};
use crate::mana::{ManaChange, ManaLedger, Suit};

/// Notifications the surrounding battle orchestrator feeds into the core.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OrchestratorEvent {
    HandPlayed { cards: Vec<Card> },
    BattleStart,
    BattleEnd,
    ActiveHeroChanged(usize),
}

#[derive(Debug)]
pub struct BattleCore {
    config: BattleConfig,
    ledger: ManaLedger,
    roster: HeroRoster,
    session: TargetingSession,
    turns: TurnCycle,
    bus: EventBus,
    in_battle: bool,
}

impl BattleCore {
    pub fn new(roster: HeroRoster) -> Self {
        Self::with_config(BattleConfig::default(), roster)
    }

    pub fn with_config(config: BattleConfig, roster: HeroRoster) -> Self {
        Self {
            ledger: ManaLedger::from_config(&config),
            config,
            roster,
            session: TargetingSession::new(),
            turns: TurnCycle::new(),
            bus: EventBus::new(),
            in_battle: false,
        }
    }

    // ========================================================================
    // Read access
    // ========================================================================

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn ledger(&self) -> &ManaLedger {
        &self.ledger
    }

    pub fn roster(&self) -> &HeroRoster {
        &self.roster
    }

    /// Mutable roster access for between-battle party management.
    ///
    /// Refused while a battle runs: cooldowns then move only through casts and
    /// [`BattleCore::on_turn_end`].
    pub fn roster_mut(&mut self) -> Result<&mut HeroRoster, RosterError> {
        if self.in_battle {
            return Err(RosterError::in_battle(self.turns.turn()));
        }
        Ok(&mut self.roster)
    }

    pub fn targeting_mode(&self) -> TargetingMode {
        self.session.mode()
    }

    pub fn turn(&self) -> u32 {
        self.turns.turn()
    }

    pub fn turns(&self) -> &TurnCycle {
        &self.turns
    }

    pub fn is_in_battle(&self) -> bool {
        self.in_battle
    }

    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// Eligibility of every ability in flattened roster order.
    pub fn eligibility(&self) -> Vec<AbilityEligibility> {
        self.roster
            .ability_refs()
            .into_iter()
            .filter_map(|ability| {
                let active = self.roster.ability(ability)?;
                Some(AbilityEligibility {
                    ability,
                    name: active.name().to_owned(),
                    cooldown_remaining: active.cooldown_remaining(),
                    eligibility: active.can_cast(&self.ledger),
                })
            })
            .collect()
    }

    // ========================================================================
    // Battle lifecycle
    // ========================================================================

    /// Zeroes the ledger, closes any session, and locks the party.
    pub fn start_battle(&mut self) {
        if self.in_battle {
            tracing::warn!(turn = self.turns.turn(), "battle restarted while in progress");
        }
        let cancelled = self.session.cancel();
        let changes = self.ledger.reset();
        self.turns.reset();
        self.roster.set_locked(true);
        self.in_battle = true;
        tracing::info!(heroes = self.roster.len(), "battle started");

        self.publish(BattleEvent::BattleStarted);
        self.publish_mana(changes);
        if cancelled.is_some() {
            self.publish(BattleEvent::TargetingChanged(TargetingMode::Idle));
        }
        self.publish_eligibility();
    }

    /// Zeroes the ledger, closes any session, and unlocks the party.
    pub fn end_battle(&mut self) {
        let cancelled = self.session.cancel();
        let changes = self.ledger.reset();
        self.roster.set_locked(false);
        self.in_battle = false;
        tracing::info!(turn = self.turns.turn(), "battle ended");

        self.publish(BattleEvent::BattleEnded);
        self.publish_mana(changes);
        if cancelled.is_some() {
            self.publish(BattleEvent::TargetingChanged(TargetingMode::Idle));
        }
        self.publish_eligibility();
    }

    // ========================================================================
    // Mana
    // ========================================================================

    pub fn credit(&mut self, suit: Suit, amount: u8) -> ManaChange {
        let change = self.ledger.credit(suit, amount);
        self.publish_mana(vec![change]);
        self.publish_eligibility();
        change
    }

    /// Funds the ledger from played cards: one `mana_per_card` unit per card.
    pub fn play_cards(&mut self, cards: &[Card]) -> Vec<ManaChange> {
        let changes = self.ledger.credit_cards(cards);
        tracing::debug!(cards = cards.len(), balances = %self.ledger.snapshot(), "hand funded");
        self.publish_mana(changes.clone());
        self.publish_eligibility();
        changes
    }

    // ========================================================================
    // Targeting
    // ========================================================================

    pub fn select_ability(&mut self, ability: AbilityRef) -> Result<SelectOutcome, CastError> {
        let outcome =
            self.session
                .select_ability(&self.roster, &self.ledger, ability, self.turns.turn())?;
        self.publish(BattleEvent::TargetingChanged(self.session.mode()));
        Ok(outcome)
    }

    /// Selects the n-th (0-based) ability in flattened roster order.
    pub fn cast_by_index(&mut self, index: usize) -> Result<SelectOutcome, SelectError> {
        let outcome =
            self.session
                .cast_by_index(&self.roster, &self.ledger, index, self.turns.turn())?;
        self.publish(BattleEvent::TargetingChanged(self.session.mode()));
        Ok(outcome)
    }

    /// Selects by hotkey number, using the configured origin.
    pub fn press_hotkey_number(&mut self, number: u32) -> Result<SelectOutcome, SelectError> {
        let index = hotkey_number_index(number, self.config.hotkey_origin, self.turns.turn())?;
        self.cast_by_index(index)
    }

    /// Single digit key shorthand for [`BattleCore::press_hotkey_number`].
    pub fn press_hotkey(&mut self, key: char) -> Result<SelectOutcome, SelectError> {
        let index = hotkey_index(key, self.config.hotkey_origin, self.turns.turn())?;
        self.cast_by_index(index)
    }

    /// Routes a target click into the session.
    ///
    /// On a resolved cast the mana and cooldown state are final before this
    /// returns, even when the effect itself is still pending.
    pub fn choose_target(
        &mut self,
        target: Option<EnemyId>,
        ctx: &mut dyn BattleContext,
    ) -> TargetOutcome {
        let outcome = self.session.on_target_chosen(
            &mut self.roster,
            &mut self.ledger,
            target,
            ctx,
            self.turns.turn(),
        );

        match &outcome {
            TargetOutcome::Handled(report) => {
                let resolved = BattleEvent::CastResolved {
                    cast: report.id,
                    ability: report.ability,
                    target: report.target,
                    pending_effect: report.completion.is_pending(),
                };
                self.publish_mana(report.mana_changes.clone());
                self.publish(BattleEvent::TargetingChanged(TargetingMode::Idle));
                self.publish(resolved);
                self.publish_eligibility();
            }
            TargetOutcome::Aborted(err) => {
                tracing::warn!(%err, "pending cast aborted");
                self.publish(BattleEvent::TargetingChanged(TargetingMode::Idle));
                self.publish_eligibility();
            }
            TargetOutcome::NotTargeting | TargetOutcome::Ignored => {}
        }
        outcome
    }

    pub fn cancel_targeting(&mut self) -> Option<AbilityRef> {
        let cancelled = self.session.cancel();
        if cancelled.is_some() {
            self.publish(BattleEvent::TargetingChanged(TargetingMode::Idle));
        }
        cancelled
    }

    // ========================================================================
    // Turns
    // ========================================================================

    pub fn on_turn_start(&mut self) -> u32 {
        let turn = self.turns.on_turn_start();
        self.publish(BattleEvent::TurnStarted { turn });
        self.publish_eligibility();
        turn
    }

    pub fn on_turn_end(&mut self) -> Result<u32, TurnError> {
        let turn = self.turns.on_turn_end(&mut self.roster)?;
        self.publish(BattleEvent::TurnEnded { turn });
        self.publish_eligibility();
        Ok(turn)
    }

    // ========================================================================
    // Damage
    // ========================================================================

    /// Composes a hand's damage and publishes which heroes activated.
    pub fn compose_damage(
        &mut self,
        base_damage: u32,
        hand: &HandDescription,
        target: Option<EnemyView>,
    ) -> DamageComposition {
        let composition = DamageComposer::compose(&mut self.roster, base_damage, hand, target);
        self.publish(BattleEvent::HeroesActivated(composition.clone()));
        composition
    }

    // ========================================================================
    // External notifications and input
    // ========================================================================

    pub fn set_active_hero(&mut self, index: usize) -> Result<(), RosterError> {
        self.roster.set_active(index)?;
        let hero = self.roster.active_hero().map(|hero| hero.id());
        self.publish(BattleEvent::ActiveHeroChanged { index, hero });
        Ok(())
    }

    /// Mirrors a hero's health from the orchestrator's damage system.
    pub fn set_hero_health(&mut self, hero: HeroId, current: u32) -> Result<(), RosterError> {
        let member = self
            .roster
            .get_mut(hero)
            .ok_or_else(|| RosterError::not_found(hero))?;
        member.set_health(current);
        tracing::debug!(%hero, current, "hero health updated");
        Ok(())
    }

        /// Reports an asynchronous effect as finished.
    pub fn complete_effect(&mut self, cast: CastId) {
        tracing::debug!(%cast, "effect completed");
        self.publish(BattleEvent::EffectCompleted { cast });
    }

    pub fn handle(&mut self, event: OrchestratorEvent) -> Result<(), RosterError> {
        match event {
            OrchestratorEvent::HandPlayed { cards } => {
                self.play_cards(&cards);
            }
            OrchestratorEvent::BattleStart => self.start_battle(),
            OrchestratorEvent::BattleEnd => self.end_battle(),
            OrchestratorEvent::ActiveHeroChanged(index) => self.set_active_hero(index)?,
        }
        Ok(())
    }

    /// Device-agnostic input routing.
    ///
    /// `Handled` tells upstream routing to suppress any other interpretation
    /// of the same input. Raw keys that are not digits and clicks that
    /// resolve nothing come back `Unhandled`.
    pub fn handle_input(
        &mut self,
        input: InputEvent,
        ctx: &mut dyn BattleContext,
    ) -> InputOutcome {
        match input {
            InputEvent::HotkeyNumber(number) => {
                selection_outcome(self.press_hotkey_number(number))
            }
            InputEvent::Hotkey(key) => selection_outcome(self.press_hotkey(key)),
            InputEvent::TargetClicked(target) => match self.choose_target(target, ctx) {
                TargetOutcome::Handled(_) => InputOutcome::Handled,
                TargetOutcome::Aborted(err) => InputOutcome::Rejected(rejection_reason(&err)),
                TargetOutcome::NotTargeting | TargetOutcome::Ignored => InputOutcome::Unhandled,
            },
            InputEvent::Cancel => match self.cancel_targeting() {
                Some(_) => InputOutcome::Handled,
                None => InputOutcome::Unhandled,
            },
        }
    }

    // ========================================================================
    // Publishing
    // ========================================================================

    fn publish(&mut self, event: BattleEvent) {
        self.bus.publish(&event);
    }

    fn publish_mana(&mut self, mut changes: Vec<ManaChange>) {
        changes.retain(|change| change.before != change.after);
        if changes.is_empty() {
            return;
        }
        let balances = self.ledger.snapshot();
        self.publish(BattleEvent::ManaChanged { changes, balances });
    }

    fn publish_eligibility(&mut self) {
        let eligibility = self.eligibility();
        self.publish(BattleEvent::EligibilityChanged(eligibility));
    }
}

fn selection_outcome(result: Result<SelectOutcome, SelectError>) -> InputOutcome {
    match result {
        Ok(_) => InputOutcome::Handled,
        Err(SelectError::Hotkey(HotkeyError::UnrecognizedKey { .. })) => InputOutcome::Unhandled,
        Err(SelectError::Hotkey(err)) => InputOutcome::Rejected(err.to_string()),
        Err(SelectError::Cast(err)) => InputOutcome::Rejected(rejection_reason(&err)),
    }
}

/// Short presentation reason: "on cooldown" / "insufficient mana" when the
/// failure is an eligibility failure, the full message otherwise.
fn rejection_reason(err: &CastError) -> String {
    err.reason()
        .map_or_else(|| err.to_string(), |reason| reason.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::{ActiveAbility, Strike};
    use crate::battle::Encounter;
    use crate::config::HotkeyOrigin;
    use crate::hero::{Hero, HeroId};
    use crate::mana::ManaCost;

    fn core() -> BattleCore {
        let hero = Hero::new(HeroId(1), "Duelist", 30)
            .with_ability(ActiveAbility::new(
                "Lunge",
                ManaCost::new().with(Suit::Diamonds, 1),
                2,
                Strike { damage: 12 },
            ))
            .unwrap();
        BattleCore::new(HeroRoster::from_heroes([hero]).unwrap())
    }

    #[test]
    fn start_battle_locks_roster_and_zeroes_ledger() {
        let mut core = core();
        core.credit(Suit::Hearts, 4);

        core.start_battle();

        assert!(core.is_in_battle());
        assert!(core.roster().is_locked());
        assert_eq!(core.ledger().balance(Suit::Hearts), 0);

        core.end_battle();
        assert!(!core.roster().is_locked());
    }

    #[test]
    fn hotkeys_follow_configured_origin() {
        let mut core = core();
        let mut ctx = Encounter::new([EnemyView::new(EnemyId(1), 20)]);
        core.start_battle();
        core.credit(Suit::Diamonds, 1);

        assert_eq!(
            core.handle_input(InputEvent::Hotkey('1'), &mut ctx),
            InputOutcome::Handled
        );
        assert_eq!(
            core.handle_input(InputEvent::Hotkey('x'), &mut ctx),
            InputOutcome::Unhandled
        );
        assert!(matches!(
            core.handle_input(InputEvent::Hotkey('7'), &mut ctx),
            InputOutcome::Rejected(_)
        ));
        assert_eq!(
            core.targeting_mode(),
            TargetingMode::AwaitingTarget(AbilityRef::new(HeroId(1), 0))
        );
    }

    #[test]
    fn rejected_cast_reports_short_reason() {
        let mut core = core();
        let mut ctx = Encounter::new([EnemyView::new(EnemyId(1), 20)]);
        core.start_battle();

        assert_eq!(
            core.handle_input(InputEvent::Hotkey('1'), &mut ctx),
            InputOutcome::Rejected("insufficient mana".to_owned())
        );
        assert_eq!(core.targeting_mode(), TargetingMode::Idle);
    }

    #[test]
    fn click_flow_resolves_and_cancel_is_unhandled_when_idle() {
        let mut core = core();
        let mut ctx = Encounter::new([EnemyView::new(EnemyId(1), 20)]);
        core.start_battle();
        core.play_cards(&[Card::new(crate::card::Rank::King, Suit::Diamonds)]);

        core.handle_input(InputEvent::Hotkey('1'), &mut ctx);
        assert_eq!(
            core.handle_input(InputEvent::TargetClicked(None), &mut ctx),
            InputOutcome::Unhandled
        );
        assert_eq!(
            core.handle_input(InputEvent::TargetClicked(Some(EnemyId(1))), &mut ctx),
            InputOutcome::Handled
        );
        assert_eq!(ctx.enemy(EnemyId(1)).unwrap().current_health, 8);
        assert_eq!(
            core.handle_input(InputEvent::Cancel, &mut ctx),
            InputOutcome::Unhandled
        );
    }

    fn full_party() -> BattleCore {
        let heroes = (1..=4).map(|id| {
            (0..4).fold(Hero::new(HeroId(id), format!("Hero {id}"), 20), |hero, slot| {
                hero.with_ability(ActiveAbility::new(
                    format!("Move {slot}"),
                    ManaCost::FREE,
                    1,
                    Strike { damage: 1 },
                ))
                .unwrap()
            })
        });
        BattleCore::new(HeroRoster::from_heroes(heroes).unwrap())
    }

    #[test]
    fn hotkey_numbers_reach_every_ability() {
        let mut core = full_party();
        let mut ctx = Encounter::new([EnemyView::new(EnemyId(1), 20)]);
        core.start_battle();
        assert_eq!(core.roster().ability_count(), 16);

        for number in 1..=16 {
            assert_eq!(
                core.handle_input(InputEvent::HotkeyNumber(number), &mut ctx),
                InputOutcome::Handled,
                "hotkey {number}"
            );
        }
        assert_eq!(
            core.targeting_mode(),
            TargetingMode::AwaitingTarget(AbilityRef::new(HeroId(4), 3))
        );

        assert!(matches!(
            core.handle_input(InputEvent::HotkeyNumber(17), &mut ctx),
            InputOutcome::Rejected(_)
        ));
        assert!(matches!(
            core.handle_input(InputEvent::HotkeyNumber(0), &mut ctx),
            InputOutcome::Rejected(_)
        ));
    }

    #[test]
    fn zero_based_hotkey_numbers_select_last_ability() {
        let mut core = full_party();
        core.config = BattleConfig::new().with_hotkey_origin(HotkeyOrigin::ZeroBased);
        core.start_battle();

        let outcome = core.press_hotkey_number(15).unwrap();
        assert_eq!(outcome.selected, AbilityRef::new(HeroId(4), 3));
        assert!(matches!(
            core.press_hotkey_number(16),
            Err(SelectError::Hotkey(HotkeyError::OutOfRange { index: 16, available: 16, .. }))
        ));
    }

    #[test]
    fn direct_hotkey_out_of_range_is_reported() {
        let mut core = core();
        core.start_battle();

        let err = core.press_hotkey('4').unwrap_err();

        assert!(matches!(
            err,
            SelectError::Hotkey(HotkeyError::OutOfRange { index: 3, available: 1, .. })
        ));
        assert_eq!(core.targeting_mode(), TargetingMode::Idle);
    }

    #[test]
    fn roster_is_read_only_during_battle() {
        let mut core = core();
        let lunge = AbilityRef::new(HeroId(1), 0);
        let mut ctx = Encounter::new([EnemyView::new(EnemyId(1), 20)]);
        core.start_battle();
        core.credit(Suit::Diamonds, 1);
        core.select_ability(lunge).unwrap();
        assert!(core.choose_target(Some(EnemyId(1)), &mut ctx).is_handled());
        core.on_turn_start();
        core.on_turn_end().unwrap();

        assert!(matches!(core.roster_mut(), Err(RosterError::Locked { .. })));
        assert_eq!(core.roster().ability(lunge).unwrap().cooldown_remaining(), 1);

        core.set_hero_health(HeroId(1), 11).unwrap();
        assert_eq!(core.roster().get(HeroId(1)).unwrap().health().current, 11);
        assert!(matches!(
            core.set_hero_health(HeroId(9), 1),
            Err(RosterError::HeroNotFound { .. })
        ));

        core.end_battle();
        assert!(core.roster_mut().is_ok());
    }

    #[test]
    fn orchestrator_events_drive_lifecycle() {
        let mut core = core();
        core.handle(OrchestratorEvent::BattleStart).unwrap();
        core.handle(OrchestratorEvent::HandPlayed {
            cards: vec![
                Card::new(crate::card::Rank::Two, Suit::Clubs),
                Card::new(crate::card::Rank::Three, Suit::Clubs),
            ],
        })
        .unwrap();
        assert_eq!(core.ledger().balance(Suit::Clubs), 2);

        assert!(core.handle(OrchestratorEvent::ActiveHeroChanged(3)).is_err());
        core.handle(OrchestratorEvent::BattleEnd).unwrap();
        assert_eq!(core.ledger().balance(Suit::Clubs), 0);
    }
}
