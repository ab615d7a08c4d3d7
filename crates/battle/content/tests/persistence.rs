use battle_content::{ContentFactory, HeroCatalog, RosterStore};
use battle_core::{
    BattleCore, EnemyId, EnemyView, Encounter, HeroId, HeroRoster, HotkeyOrigin, InputEvent,
    InputOutcome, RosterSnapshot, Suit,
};

fn party(catalog: &HeroCatalog, ids: &[u32]) -> HeroRoster {
    HeroRoster::from_heroes(ids.iter().map(|&id| catalog.hero(HeroId(id)).unwrap())).unwrap()
}

#[test]
fn roster_survives_save_and_load_in_both_formats() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = HeroCatalog::builtin().unwrap();
    let mut roster = party(&catalog, &[4, 1, 3]);
    roster.set_active(2).unwrap();
    let snapshot = roster.snapshot();

    for file in ["party.ron", "party.json"] {
        let path = dir.path().join(file);
        RosterStore::save(&path, &snapshot).unwrap();

        let loaded = RosterStore::load(&path).unwrap();
        assert_eq!(loaded, snapshot, "{file}");

        let rebuilt = catalog.build_roster(&loaded).unwrap();
        assert_eq!(rebuilt.snapshot(), snapshot);
        assert_eq!(rebuilt.active_hero().unwrap().name(), "Rogue");
    }
}

#[test]
fn factory_builds_battle_from_data_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("battle.toml"),
        "mana_cap = 5\nhotkey_origin = \"zero_based\"\n",
    )
    .unwrap();
    let save = dir.path().join("party.json");
    RosterStore::save(
        &save,
        &RosterSnapshot {
            heroes: vec![HeroId(2), HeroId(5)],
            active: 0,
        },
    )
    .unwrap();

    let factory = ContentFactory::new(dir.path());
    let mut core: BattleCore = factory.load_battle(&save).unwrap();

    assert_eq!(core.config().hotkey_origin, HotkeyOrigin::ZeroBased);
    assert_eq!(core.ledger().cap(), 5);

    core.start_battle();
    core.credit(Suit::Hearts, 9);
    assert_eq!(core.ledger().balance(Suit::Hearts), 5);

    // Zero-based: '0' is the Cleric's Smite.
    let mut ctx = Encounter::new([EnemyView::new(EnemyId(1), 30)]);
    assert_eq!(
        core.handle_input(InputEvent::Hotkey('0'), &mut ctx),
        InputOutcome::Handled
    );
    assert_eq!(
        core.handle_input(InputEvent::TargetClicked(Some(EnemyId(1))), &mut ctx),
        InputOutcome::Handled
    );
    assert_eq!(core.ledger().balance(Suit::Hearts), 3);
}

#[test]
fn factory_saves_current_party() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = HeroCatalog::builtin().unwrap();
    let core = BattleCore::new(party(&catalog, &[5, 2]));
    let factory = ContentFactory::new(dir.path());
    let save = dir.path().join("party.ron");

    let written = factory.save_party(&core, &save).unwrap();

    assert_eq!(written.heroes, vec![HeroId(5), HeroId(2)]);
    assert_eq!(RosterStore::load(&save).unwrap(), written);
}

#[test]
fn missing_data_files_fall_back_to_builtin_content() {
    let dir = tempfile::tempdir().unwrap();
    let factory = ContentFactory::new(dir.path());

    assert_eq!(factory.load_config().unwrap(), battle_core::BattleConfig::default());
    assert_eq!(factory.load_heroes().unwrap(), HeroCatalog::builtin().unwrap());
}

#[test]
fn corrupt_save_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let save = dir.path().join("party.json");
    std::fs::write(&save, "{ not json").unwrap();

    let err = RosterStore::load(&save).unwrap_err();
    assert!(format!("{err:#}").contains("party.json"));
}
