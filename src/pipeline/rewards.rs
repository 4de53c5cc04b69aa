//! Combat reward accounting
//!
//! Rewards are computed per own unit from the damage and death events of
//! the previous tick, then summed into one ledger entry per learning tick.

use serde::{Deserialize, Serialize};

use crate::types::{DamageEvent, DeathEvent, UnitId};

/// Reward constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Charged to every unit on every learning tick.
    pub step_cost: f64,
    /// Extra penalty when the unit died from the damage it took.
    pub death_penalty: f64,
    /// Extra bonus when the unit's victim died.
    pub kill_bonus: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            step_cost: 0.1,
            death_penalty: 100.0,
            kill_bonus: 100.0,
        }
    }
}

/// Which own units contribute to the ledger on a learning tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardScope {
    /// Only units still alive after last tick's deaths are pruned.
    #[default]
    Survivors,
    /// Survivors plus the own units that died last tick, so the death
    /// penalty reaches the ledger.
    PreviousRoster,
}

impl RewardScope {
    pub fn label(&self) -> &'static str {
        match self {
            RewardScope::Survivors => "survivors",
            RewardScope::PreviousRoster => "previous-roster",
        }
    }
}

/// Immediate reward of `unit` for one tick of events.
///
/// Every damage event involving the unit contributes; nothing is
/// deduplicated.
pub fn unit_reward(
    unit: UnitId,
    damage: &[DamageEvent],
    deaths: &[DeathEvent],
    config: &RewardConfig,
) -> f64 {
    let died = |id: UnitId| deaths.iter().any(|d| d.unit == id);
    let mut reward = -config.step_cost;

    for event in damage {
        if event.defender == unit {
            reward -= event.amount;
            if died(unit) {
                reward -= config.death_penalty;
            }
        }
        if event.attacker == unit {
            reward += event.amount;
            if died(event.defender) {
                reward += config.kill_bonus;
            }
        }
    }

    reward
}

/// Reward events of the running episode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardLedger {
    events: Vec<f64>,
}

impl RewardLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, reward: f64) {
        self.events.push(reward);
    }

    pub fn events(&self) -> &[f64] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.events.iter().sum()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
