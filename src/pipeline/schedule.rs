//! Alternating Testing / Evaluating episode schedule
//!
//! Training runs in blocks: a block of Testing episodes in which the
//! weights are updated, followed by a block of Evaluating episodes with
//! frozen weights whose rewards measure the current policy.

use serde::{Deserialize, Serialize};

/// Phase of the episode currently being played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodePhase {
    /// Weights are updated on every learning event.
    Testing,
    /// Weights are frozen; rewards feed the evaluation average.
    Evaluating,
}

impl EpisodePhase {
    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            EpisodePhase::Testing => "Testing",
            EpisodePhase::Evaluating => "Evaluating",
        }
    }

    /// Get short label
    pub fn label(&self) -> &'static str {
        match self {
            EpisodePhase::Testing => "testing",
            EpisodePhase::Evaluating => "evaluating",
        }
    }

    pub fn is_learning(&self) -> bool {
        matches!(self, EpisodePhase::Testing)
    }
}

/// Block lengths of the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseSchedule {
    /// Completed Testing episodes before switching to Evaluating.
    pub testing_episodes: usize,
    /// Completed Evaluating episodes before switching back to Testing.
    pub evaluation_episodes: usize,
}

impl PhaseSchedule {
    pub fn new(testing_episodes: usize, evaluation_episodes: usize) -> Self {
        Self {
            testing_episodes,
            evaluation_episodes,
        }
    }

    /// Length of a block of `phase`.
    pub fn block_len(&self, phase: EpisodePhase) -> usize {
        match phase {
            EpisodePhase::Testing => self.testing_episodes,
            EpisodePhase::Evaluating => self.evaluation_episodes,
        }
    }

    /// Phase of the `episode`-th episode (0-based) of a fresh run.
    pub fn phase_of(&self, episode: usize) -> EpisodePhase {
        let cycle = self.testing_episodes + self.evaluation_episodes;
        if cycle == 0 || episode % cycle < self.testing_episodes {
            EpisodePhase::Testing
        } else {
            EpisodePhase::Evaluating
        }
    }
}

impl Default for PhaseSchedule {
    fn default() -> Self {
        Self::new(10, 5)
    }
}

/// Current phase plus the number of episodes completed in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTracker {
    phase: EpisodePhase,
    completed_in_phase: usize,
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self {
            phase: EpisodePhase::Testing,
            completed_in_phase: 0,
        }
    }

    pub fn phase(&self) -> EpisodePhase {
        self.phase
    }

    pub fn completed_in_phase(&self) -> usize {
        self.completed_in_phase
    }

    /// Count one completed episode and switch phase when the block is full.
    ///
    /// Returns the new phase if a transition happened. The counter resets
    /// on entry to the new phase.
    pub fn complete_episode(&mut self, schedule: &PhaseSchedule) -> Option<EpisodePhase> {
        self.completed_in_phase += 1;
        if self.completed_in_phase < schedule.block_len(self.phase) {
            return None;
        }
        self.phase = match self.phase {
            EpisodePhase::Testing => EpisodePhase::Evaluating,
            EpisodePhase::Evaluating => EpisodePhase::Testing,
        };
        self.completed_in_phase = 0;
        Some(self.phase)
    }
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_in_testing() {
        assert_eq!(PhaseTracker::new().phase(), EpisodePhase::Testing);
    }

    #[test]
    fn test_ten_testing_then_five_evaluating() {
        let schedule = PhaseSchedule::default();
        let mut tracker = PhaseTracker::new();

        for _ in 0..9 {
            assert_eq!(tracker.complete_episode(&schedule), None);
            assert_eq!(tracker.phase(), EpisodePhase::Testing);
        }
        assert_eq!(
            tracker.complete_episode(&schedule),
            Some(EpisodePhase::Evaluating)
        );
        assert_eq!(tracker.completed_in_phase(), 0);

        for _ in 0..4 {
            assert_eq!(tracker.complete_episode(&schedule), None);
            assert_eq!(tracker.phase(), EpisodePhase::Evaluating);
        }
        assert_eq!(
            tracker.complete_episode(&schedule),
            Some(EpisodePhase::Testing)
        );
    }

    #[test]
    fn test_tracker_agrees_with_phase_of() {
        let schedule = PhaseSchedule::new(3, 2);
        let mut tracker = PhaseTracker::new();
        for episode in 0..20 {
            assert_eq!(tracker.phase(), schedule.phase_of(episode), "episode {episode}");
            tracker.complete_episode(&schedule);
        }
    }

    #[test]
    fn test_phase_labels() {
        assert_eq!(EpisodePhase::Testing.label(), "testing");
        assert_eq!(EpisodePhase::Evaluating.name(), "Evaluating");
        assert!(EpisodePhase::Testing.is_learning());
        assert!(!EpisodePhase::Evaluating.is_learning());
    }
}
