//! Live unit rosters for both sides of an episode.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    ports::WorldSnapshot,
    types::{DeathEvent, Side, UnitId},
};

/// Own and enemy unit identifiers, in world enumeration order.
///
/// Built once per episode, then only shrinks as deaths are observed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    own: Vec<UnitId>,
    enemy: Vec<UnitId>,
    own_start: usize,
    enemy_start: usize,
}

impl Roster {
    /// Build rosters from explicit identifier lists.
    pub fn new(own: Vec<UnitId>, enemy: Vec<UnitId>) -> Self {
        let own_start = own.len();
        let enemy_start = enemy.len();
        Self {
            own,
            enemy,
            own_start,
            enemy_start,
        }
    }

    /// Snapshot the live units of `kind` on both sides.
    ///
    /// Units of any other kind are skipped with a warning.
    pub fn from_world(world: &dyn WorldSnapshot, kind: &str) -> Self {
        let collect = |side: Side| -> Vec<UnitId> {
            world
                .unit_ids(side)
                .into_iter()
                .filter(|&id| match world.unit(id) {
                    Some(view) if view.kind.eq_ignore_ascii_case(kind) => true,
                    Some(view) => {
                        warn!(unit = %id, side = %side, kind = %view.kind, "skipping unit of unknown type");
                        false
                    }
                    None => false,
                })
                .collect()
        };
        Self::new(collect(Side::Own), collect(Side::Enemy))
    }

    pub fn own(&self) -> &[UnitId] {
        &self.own
    }

    pub fn enemies(&self) -> &[UnitId] {
        &self.enemy
    }

    /// Size of `side` when the roster was built.
    pub fn starting_size(&self, side: Side) -> usize {
        match side {
            Side::Own => self.own_start,
            Side::Enemy => self.enemy_start,
        }
    }

    /// Remove a unit from whichever side holds it.
    ///
    /// Returns the side it was removed from, or `None` if it was already
    /// absent. Removing twice is a no-op.
    pub fn remove(&mut self, id: UnitId) -> Option<Side> {
        if let Some(pos) = self.own.iter().position(|&u| u == id) {
            self.own.remove(pos);
            return Some(Side::Own);
        }
        if let Some(pos) = self.enemy.iter().position(|&u| u == id) {
            self.enemy.remove(pos);
            return Some(Side::Enemy);
        }
        None
    }

    /// Remove every unit named in `deaths`; returns the own units removed.
    pub fn apply_deaths(&mut self, deaths: &[DeathEvent]) -> Vec<UnitId> {
        deaths
            .iter()
            .filter(|death| self.remove(death.unit) == Some(Side::Own))
            .map(|death| death.unit)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::q_learning::features::test_support::GridWorld;

    fn id(v: u32) -> UnitId {
        UnitId::new(v)
    }

    #[test]
    fn test_from_world_preserves_order() {
        let world = GridWorld::default()
            .with_unit(3, Side::Own, 0, 0, 10)
            .with_unit(1, Side::Own, 0, 1, 10)
            .with_unit(20, Side::Enemy, 5, 5, 10);
        let roster = Roster::from_world(&world, "footman");
        assert_eq!(roster.own(), &[id(3), id(1)]);
        assert_eq!(roster.enemies(), &[id(20)]);
    }

    #[test]
    fn test_from_world_skips_other_kinds() {
        let mut world = GridWorld::default()
            .with_unit(1, Side::Own, 0, 0, 10)
            .with_unit(2, Side::Own, 0, 1, 10);
        world.units.get_mut(&id(2)).unwrap().kind = "archer".to_string();
        let roster = Roster::from_world(&world, "Footman");
        assert_eq!(roster.own(), &[id(1)]);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut roster = Roster::new(vec![id(1), id(2)], vec![id(10)]);
        assert_eq!(roster.remove(id(2)), Some(Side::Own));
        assert_eq!(roster.remove(id(2)), None);
        assert_eq!(roster.remove(id(99)), None);
        assert_eq!(roster.own(), &[id(1)]);
        assert!(roster.own().len() <= roster.starting_size(Side::Own));
    }

    #[test]
    fn test_apply_deaths_reports_own_losses() {
        let mut roster = Roster::new(vec![id(1), id(2)], vec![id(10), id(11)]);
        let deaths = [
            DeathEvent {
                unit: id(2),
                side: Side::Own,
            },
            DeathEvent {
                unit: id(11),
                side: Side::Enemy,
            },
            DeathEvent {
                unit: id(2),
                side: Side::Own,
            },
        ];
        assert_eq!(roster.apply_deaths(&deaths), vec![id(2)]);
        assert_eq!(roster.own(), &[id(1)]);
        assert_eq!(roster.enemies(), &[id(10)]);
        assert_eq!(roster.starting_size(Side::Enemy), 2);
    }
}
