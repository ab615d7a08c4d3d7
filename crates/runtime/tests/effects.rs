use std::sync::{Arc, Mutex};

use battle_core::{
    AbilityRef, ActiveAbility, BattleCore, BattleEvent, CastId, EffectCompletion, Encounter,
    EnemyId, EnemyView, FnEffect, Hero, HeroId, HeroRoster, InputEvent, InputOutcome, ManaCost,
    Strike, Suit, TargetOutcome, TargetingMode, Topic,
};
use battle_runtime::{BattleRuntime, RuntimeConfig};
use tokio::sync::oneshot;

const VOLLEY: AbilityRef = AbilityRef::new(HeroId(1), 0);
const JAB: AbilityRef = AbilityRef::new(HeroId(1), 1);

/// One slow effect gated on `release`, one immediate strike.
fn core(release: oneshot::Receiver<()>) -> BattleCore {
    let release = Arc::new(Mutex::new(Some(release)));
    let hero = Hero::new(HeroId(1), "Archer", 30)
        .with_ability(ActiveAbility::new(
            "Volley",
            ManaCost::new().with(Suit::Clubs, 2),
            2,
            FnEffect::new("volley", move |target, ctx| {
                ctx.damage_enemy(target, 6);
                let gate = release.lock().unwrap().take();
                EffectCompletion::pending(async move {
                    if let Some(gate) = gate {
                        let _ = gate.await;
                    }
                })
            }),
        ))
        .unwrap()
        .with_ability(ActiveAbility::new(
            "Jab",
            ManaCost::FREE,
            0,
            Strike { damage: 1 },
        ))
        .unwrap();
    BattleCore::new(HeroRoster::from_heroes([hero]).unwrap())
}

fn effect_log(core: &mut BattleCore) -> Arc<Mutex<Vec<CastId>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    core.bus_mut().subscribe(Topic::Effects, move |event| {
        if let BattleEvent::EffectCompleted { cast } = event {
            sink.lock().unwrap().push(*cast);
        }
    });
    log
}

#[tokio::test]
async fn economy_is_final_before_effect_completes() {
    let (release_tx, release_rx) = oneshot::channel();
    let mut core = core(release_rx);
    let log = effect_log(&mut core);
    core.start_battle();
    core.credit(Suit::Clubs, 3);

    let mut runtime = BattleRuntime::new(core, RuntimeConfig::default()).unwrap();
    let battle = runtime.battle();
    let mut ctx = Encounter::new([EnemyView::new(EnemyId(1), 40)]);

    battle.try_with(|core| core.select_ability(VOLLEY)).unwrap();
    let outcome = runtime.choose_target(Some(EnemyId(1)), &mut ctx).unwrap();
    let TargetOutcome::Handled(report) = outcome else {
        panic!("volley should resolve");
    };

    assert!(!report.completion.is_pending());
    assert_eq!(runtime.in_flight(), 1);
    battle
        .with(|core| {
            assert_eq!(core.ledger().balance(Suit::Clubs), 1);
            assert_eq!(core.roster().ability(VOLLEY).unwrap().cooldown_remaining(), 2);
            assert_eq!(core.targeting_mode(), TargetingMode::Idle);
        })
        .unwrap();

    // A new selection is accepted while the volley is still in flight.
    battle.try_with(|core| core.select_ability(JAB)).unwrap();
    assert_eq!(runtime.pump().unwrap(), 0);
    assert!(log.lock().unwrap().is_empty());

    release_tx.send(()).unwrap();
    assert_eq!(runtime.settle().await.unwrap(), 1);
    assert_eq!(*log.lock().unwrap(), vec![report.id]);
    assert_eq!(runtime.in_flight(), 0);
}

#[tokio::test]
async fn input_routing_tracks_pending_effects() {
    let (release_tx, release_rx) = oneshot::channel();
    let mut core = core(release_rx);
    let log = effect_log(&mut core);
    core.start_battle();
    core.credit(Suit::Clubs, 2);

    let mut runtime = BattleRuntime::new(core, RuntimeConfig::default()).unwrap();
    let mut ctx = Encounter::new([EnemyView::new(EnemyId(1), 40)]);

    assert_eq!(
        runtime.handle_input(InputEvent::Hotkey('1'), &mut ctx).unwrap(),
        InputOutcome::Handled
    );
    assert_eq!(
        runtime
            .handle_input(InputEvent::TargetClicked(Some(EnemyId(9))), &mut ctx)
            .unwrap(),
        InputOutcome::Unhandled
    );
    assert_eq!(
        runtime
            .handle_input(InputEvent::TargetClicked(Some(EnemyId(1))), &mut ctx)
            .unwrap(),
        InputOutcome::Handled
    );
    assert_eq!(runtime.in_flight(), 1);

    release_tx.send(()).unwrap();
    runtime.settle().await.unwrap();
    assert_eq!(log.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn immediate_effects_publish_no_completion() {
    let (_release_tx, release_rx) = oneshot::channel();
    let mut core = core(release_rx);
    let log = effect_log(&mut core);
    core.start_battle();

    let mut runtime = BattleRuntime::new(core, RuntimeConfig::default()).unwrap();
    let mut ctx = Encounter::new([EnemyView::new(EnemyId(1), 40)]);

    runtime
        .battle()
        .try_with(|core| core.select_ability(JAB))
        .unwrap();
    runtime.choose_target(Some(EnemyId(1)), &mut ctx).unwrap();

    assert_eq!(runtime.in_flight(), 0);
    assert_eq!(runtime.settle().await.unwrap(), 0);
    assert!(log.lock().unwrap().is_empty());
}
