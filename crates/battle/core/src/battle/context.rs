//! View of the battle owned by the external orchestrator.
//!
//! The core never owns enemies. It reads them through [`BattleContext`] and
//! lets ability effects act on them through the same trait.

use core::fmt;

/// Identifier of an enemy in the current encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyId(pub u32);

impl fmt::Display for EnemyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "enemy#{}", self.0)
    }
}

/// Snapshot of one enemy as the orchestrator currently sees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyView {
    pub id: EnemyId,
    pub current_health: u32,
    pub max_health: u32,
}

impl EnemyView {
    pub const fn new(id: EnemyId, max_health: u32) -> Self {
        Self {
            id,
            current_health: max_health,
            max_health,
        }
    }

    pub const fn is_alive(&self) -> bool {
        self.current_health > 0
    }

    /// Remaining health as a whole percentage of max health.
    pub fn health_percent(&self) -> u32 {
        if self.max_health == 0 {
            return 0;
        }
        ((u64::from(self.current_health) * 100) / u64::from(self.max_health)) as u32
    }
}

/// Battle state supplied by the orchestrator.
pub trait BattleContext {
    /// Every enemy in the encounter, alive or not, in display order.
    fn enemies(&self) -> Vec<EnemyView>;

    fn enemy(&self, id: EnemyId) -> Option<EnemyView> {
        self.enemies().into_iter().find(|enemy| enemy.id == id)
    }

    /// Enemy currently selected as the default target, if any.
    fn current_target(&self) -> Option<EnemyId>;

    /// Applies damage to an enemy and returns the amount actually dealt.
    fn damage_enemy(&mut self, id: EnemyId, amount: u32) -> u32;
}

/// Minimal in-memory [`BattleContext`] for hosts without their own enemy model.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Encounter {
    enemies: Vec<EnemyView>,
    current_target: Option<EnemyId>,
}

impl Encounter {
    pub fn new(enemies: impl IntoIterator<Item = EnemyView>) -> Self {
        let enemies: Vec<_> = enemies.into_iter().collect();
        let current_target = enemies.first().map(|enemy| enemy.id);
        Self {
            enemies,
            current_target,
        }
    }

    pub fn set_current_target(&mut self, target: Option<EnemyId>) {
        self.current_target = target;
    }

    pub fn living(&self) -> impl Iterator<Item = &EnemyView> {
        self.enemies.iter().filter(|enemy| enemy.is_alive())
    }
}

impl BattleContext for Encounter {
    fn enemies(&self) -> Vec<EnemyView> {
        self.enemies.clone()
    }

    fn enemy(&self, id: EnemyId) -> Option<EnemyView> {
        self.enemies.iter().copied().find(|enemy| enemy.id == id)
    }

    fn current_target(&self) -> Option<EnemyId> {
        self.current_target
    }

    fn damage_enemy(&mut self, id: EnemyId, amount: u32) -> u32 {
        let Some(enemy) = self.enemies.iter_mut().find(|enemy| enemy.id == id) else {
            return 0;
        };
        let dealt = amount.min(enemy.current_health);
        enemy.current_health -= dealt;
        dealt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_is_capped_by_remaining_health() {
        let mut encounter = Encounter::new([EnemyView::new(EnemyId(1), 30)]);

        assert_eq!(encounter.damage_enemy(EnemyId(1), 20), 20);
        assert_eq!(encounter.damage_enemy(EnemyId(1), 20), 10);

        let enemy = encounter.enemy(EnemyId(1)).unwrap();
        assert!(!enemy.is_alive());
        assert_eq!(encounter.living().count(), 0);
    }

    #[test]
    fn unknown_enemy_takes_no_damage() {
        let mut encounter = Encounter::new([EnemyView::new(EnemyId(1), 30)]);
        assert_eq!(encounter.damage_enemy(EnemyId(9), 5), 0);
    }

    #[test]
    fn first_enemy_is_default_target() {
        let encounter = Encounter::new([
            EnemyView::new(EnemyId(4), 10),
            EnemyView::new(EnemyId(5), 10),
        ]);
        assert_eq!(encounter.current_target(), Some(EnemyId(4)));
    }

    #[test]
    fn health_percent_rounds_down() {
        let enemy = EnemyView {
            id: EnemyId(1),
            current_health: 1,
            max_health: 3,
        };
        assert_eq!(enemy.health_percent(), 33);
    }
}
