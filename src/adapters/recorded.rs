//! Recorded battle replay.
//!
//! A recording is a JSON document of episodes, each a sequence of frames.
//! A frame holds the live units at the start of a turn and the events the
//! engine logged during that turn. [`ReplayEngine`] steps through the
//! frames and collects the commands it receives without executing them,
//! which is enough to drive the training loop offline.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    error::Error,
    ports::{Engine, EventHistory, WorldSnapshot},
    types::{ActionReport, AttackCommand, DamageEvent, DeathEvent, Side, UnitId, UnitView},
};

/// One turn of a recorded episode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub turn: u64,
    /// Live units at the start of the turn, in engine order
    pub units: Vec<UnitView>,
    #[serde(default)]
    pub deaths: Vec<DeathEvent>,
    #[serde(default)]
    pub damage: Vec<DamageEvent>,
    /// Feedback on own commands running during the turn
    #[serde(default)]
    pub own_feedback: Vec<ActionReport>,
    /// Feedback on enemy commands running during the turn
    #[serde(default)]
    pub enemy_feedback: Vec<ActionReport>,
}

impl WorldSnapshot for Frame {
    fn turn(&self) -> u64 {
        self.turn
    }

    fn unit_ids(&self, side: Side) -> Vec<UnitId> {
        self.units
            .iter()
            .filter(|u| u.side == side)
            .map(|u| u.id)
            .collect()
    }

    fn unit(&self, id: UnitId) -> Option<UnitView> {
        self.units.iter().find(|u| u.id == id).cloned()
    }
}

/// A recorded episode; also serves as its own event history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordedEpisode {
    pub frames: Vec<Frame>,
}

impl RecordedEpisode {
    fn frame_at(&self, turn: u64) -> Option<&Frame> {
        self.frames.iter().find(|f| f.turn == turn)
    }
}

impl EventHistory for RecordedEpisode {
    fn deaths(&self, turn: u64) -> Vec<DeathEvent> {
        self.frame_at(turn).map(|f| f.deaths.clone()).unwrap_or_default()
    }

    fn damage(&self, turn: u64) -> Vec<DamageEvent> {
        self.frame_at(turn).map(|f| f.damage.clone()).unwrap_or_default()
    }

    fn action_feedback(&self, side: Side, turn: u64) -> Vec<ActionReport> {
        self.frame_at(turn)
            .map(|f| match side {
                Side::Own => f.own_feedback.clone(),
                Side::Enemy => f.enemy_feedback.clone(),
            })
            .unwrap_or_default()
    }
}

/// A complete recording.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordedBattle {
    pub episodes: Vec<RecordedEpisode>,
}

impl RecordedBattle {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read recording {}", path.display()),
            source,
        })?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| Error::Io {
            operation: format!("write recording {}", path.display()),
            source,
        })
    }
}

/// A command received by the replay engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedCommand {
    /// 0-based index of the recorded episode
    pub episode: usize,
    pub turn: u64,
    pub command: AttackCommand,
}

/// Replays recorded episodes in order, cycling when the recording runs out.
#[derive(Debug, Clone)]
pub struct ReplayEngine {
    battle: RecordedBattle,
    episode: usize,
    frame: usize,
    started: bool,
    issued: Vec<IssuedCommand>,
}

impl ReplayEngine {
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the recording has no
    /// episodes or an episode has no frames.
    pub fn new(battle: RecordedBattle) -> Result<Self> {
        if battle.episodes.is_empty() {
            return Err(Error::InvalidConfiguration {
                message: "recording contains no episodes".to_string(),
            });
        }
        if let Some(index) = battle.episodes.iter().position(|e| e.frames.is_empty()) {
            return Err(Error::InvalidConfiguration {
                message: format!("recorded episode {index} has no frames"),
            });
        }
        Ok(Self {
            battle,
            episode: 0,
            frame: 0,
            started: false,
            issued: Vec::new(),
        })
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(RecordedBattle::from_json_file(path)?)
    }

    /// Index of the recorded episode being replayed.
    pub fn episode_index(&self) -> usize {
        self.episode
    }

    /// Every command received so far.
    pub fn issued(&self) -> &[IssuedCommand] {
        &self.issued
    }

    fn current(&self) -> &RecordedEpisode {
        &self.battle.episodes[self.episode]
    }
}

impl Engine for ReplayEngine {
    type World = Frame;
    type History = RecordedEpisode;

    fn begin_episode(&mut self) -> Result<()> {
        if self.started {
            self.episode = (self.episode + 1) % self.battle.episodes.len();
        }
        self.started = true;
        self.frame = 0;
        Ok(())
    }

    fn world(&self) -> &Frame {
        &self.current().frames[self.frame]
    }

    fn history(&self) -> &RecordedEpisode {
        self.current()
    }

    fn is_over(&self) -> bool {
        self.frame + 1 >= self.current().frames.len()
    }

    fn advance(&mut self, commands: &[AttackCommand]) -> Result<()> {
        let turn = self.world().turn;
        let episode = self.episode;
        self.issued
            .extend(commands.iter().map(|&command| IssuedCommand {
                episode,
                turn,
                command,
            }));
        if !self.is_over() {
            self.frame += 1;
        }
        Ok(())
    }
}
