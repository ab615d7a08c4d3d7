use battle_core::{
    AbilityRef, ActiveAbility, BattleCore, Encounter, EnemyId, EnemyView, Hero, HeroId,
    HeroRoster, ManaCost, Strike, Suit, TargetOutcome, TargetingMode,
};
use proptest::prelude::*;

fn roster(cost: [u8; 4], cooldown_remaining: u32) -> HeroRoster {
    let cost = Suit::ALL
        .into_iter()
        .map(|suit| (suit, cost[suit.index()]))
        .collect::<ManaCost>();
    let hero = Hero::new(HeroId(1), "Subject", 10)
        .with_ability(
            ActiveAbility::new("Probe", cost, 5, Strike { damage: 1 })
                .with_cooldown_remaining(cooldown_remaining),
        )
        .unwrap()
        .with_ability(ActiveAbility::new(
            "Free Jab",
            ManaCost::FREE,
            1,
            Strike { damage: 1 },
        ))
        .unwrap();
    HeroRoster::from_heroes([hero]).unwrap()
}

fn balances(core: &BattleCore) -> [u8; 4] {
    Suit::ALL.map(|suit| core.ledger().balance(suit))
}

proptest! {
    #[test]
    fn ineligible_selection_is_a_no_op(
        cost in prop::array::uniform4(0u8..=6),
        funds in prop::array::uniform4(0u8..=6),
        cooldown in 0u32..=5,
        pending_first in any::<bool>(),
    ) {
        let probe = AbilityRef::new(HeroId(1), 0);
        let jab = AbilityRef::new(HeroId(1), 1);
        let mut core = BattleCore::new(roster(cost, cooldown));
        core.start_battle();
        for suit in Suit::ALL {
            core.credit(suit, funds[suit.index()]);
        }
        if pending_first {
            core.select_ability(jab).unwrap();
        }

        let affordable = Suit::ALL.iter().all(|suit| funds[suit.index()] >= cost[suit.index()]);
        let eligible = cooldown == 0 && affordable;
        let mode_before = core.targeting_mode();
        let ledger_before = balances(&core);

        let result = core.select_ability(probe);

        prop_assert_eq!(result.is_ok(), eligible);
        if !eligible {
            prop_assert_eq!(core.targeting_mode(), mode_before);
        } else {
            prop_assert_eq!(core.targeting_mode(), TargetingMode::AwaitingTarget(probe));
        }
        prop_assert_eq!(balances(&core), ledger_before);
    }

    #[test]
    fn resolution_debits_exact_cost_once(
        cost in prop::array::uniform4(0u8..=4),
        extra in prop::array::uniform4(0u8..=4),
    ) {
        let probe = AbilityRef::new(HeroId(1), 0);
        let mut core = BattleCore::new(roster(cost, 0));
        let mut ctx = Encounter::new([EnemyView::new(EnemyId(1), 50)]);
        core.start_battle();
        for suit in Suit::ALL {
            core.credit(suit, cost[suit.index()] + extra[suit.index()]);
        }

        core.select_ability(probe).unwrap();
        let outcome = core.choose_target(Some(EnemyId(1)), &mut ctx);

        prop_assert!(matches!(outcome, TargetOutcome::Handled(_)));
        prop_assert_eq!(balances(&core), extra);
        prop_assert_eq!(core.roster().ability(probe).unwrap().cooldown_remaining(), 5);
        prop_assert_eq!(core.targeting_mode(), TargetingMode::Idle);
    }

    #[test]
    fn misclicks_never_spend(
        clicks in prop::collection::vec(prop::option::of(2u32..6), 1..8),
    ) {
        let probe = AbilityRef::new(HeroId(1), 0);
        let mut core = BattleCore::new(roster([1, 0, 0, 0], 0));
        let mut ctx = Encounter::new([
            EnemyView::new(EnemyId(1), 50),
            EnemyView { id: EnemyId(2), current_health: 0, max_health: 50 },
        ]);
        core.start_battle();
        core.credit(Suit::Spades, 1);
        core.select_ability(probe).unwrap();

        for click in clicks {
            let outcome = core.choose_target(click.map(EnemyId), &mut ctx);
            prop_assert!(matches!(outcome, TargetOutcome::Ignored));
        }

        prop_assert_eq!(balances(&core), [1, 0, 0, 0]);
        prop_assert_eq!(core.targeting_mode(), TargetingMode::AwaitingTarget(probe));
    }
}
