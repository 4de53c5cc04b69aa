//! Common fixtures for the skirmish test suite.
//!
//! Builders for recorded battles. Events attached to a frame are the events
//! the engine logged during that frame's turn; the controller reads them on
//! the following tick.

#![allow(dead_code)]

use skirmish::{
    adapters::{Frame, RecordedBattle, RecordedEpisode},
    types::{
        ActionOutcome, ActionReport, AttackCommand, DamageEvent, DeathEvent, Position, Side,
        UnitId, UnitView,
    },
};

pub fn id(value: u32) -> UnitId {
    UnitId::new(value)
}

pub fn footman(value: u32, side: Side, row: i32, col: i32, health: i32) -> UnitView {
    UnitView {
        id: id(value),
        side,
        kind: "footman".to_string(),
        position: Position::new(row, col),
        health,
    }
}

/// Builds one recorded episode frame by frame.
#[derive(Default)]
pub struct EpisodeBuilder {
    frames: Vec<Frame>,
}

impl EpisodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame; its turn is its index.
    pub fn frame(mut self, units: Vec<UnitView>) -> Self {
        let turn = self.frames.len() as u64;
        self.frames.push(Frame {
            turn,
            units,
            ..Default::default()
        });
        self
    }

    fn last(&mut self) -> &mut Frame {
        self.frames.last_mut().expect("frame() must come first")
    }

    fn side_of(&self, unit: u32) -> Side {
        self.frames
            .iter()
            .rev()
            .flat_map(|f| f.units.iter())
            .find(|u| u.id == id(unit))
            .map(|u| u.side)
            .expect("unit must appear in a frame")
    }

    pub fn damage(mut self, attacker: u32, defender: u32, amount: f64) -> Self {
        let attacker_side = self.side_of(attacker);
        let defender_side = self.side_of(defender);
        self.last().damage.push(DamageEvent {
            attacker: id(attacker),
            attacker_side,
            defender: id(defender),
            defender_side,
            amount,
        });
        self
    }

    pub fn death(mut self, unit: u32) -> Self {
        let side = self.side_of(unit);
        self.last().deaths.push(DeathEvent {
            unit: id(unit),
            side,
        });
        self
    }

    pub fn own_feedback(mut self, unit: u32, target: u32, outcome: ActionOutcome) -> Self {
        self.last().own_feedback.push(ActionReport::new(
            AttackCommand::new(id(unit), id(target)),
            outcome,
        ));
        self
    }

    pub fn build(self) -> RecordedEpisode {
        RecordedEpisode {
            frames: self.frames,
        }
    }
}

/// Reward of [`winning_episode`] under the default reward settings.
pub const WINNING_REWARD: f64 = -5.2 + 241.8 - 8.2;

/// Two own footmen beat two enemy footmen in four ticks.
///
/// Learning ticks: own unit 1 hit for 5; both enemies' kills on 11; own
/// unit 2 hit for 8. The last frame is terminal.
pub fn winning_episode() -> RecordedEpisode {
    let own = |h1, h2| {
        vec![
            footman(1, Side::Own, 0, 0, h1),
            footman(2, Side::Own, 0, 1, h2),
        ]
    };
    let with = |mut units: Vec<UnitView>, extra: Vec<UnitView>| {
        units.extend(extra);
        units
    };

    EpisodeBuilder::new()
        .frame(with(
            own(100, 100),
            vec![
                footman(10, Side::Enemy, 3, 3, 50),
                footman(11, Side::Enemy, 3, 4, 40),
            ],
        ))
        .damage(10, 1, 5.0)
        .frame(with(
            own(95, 100),
            vec![
                footman(10, Side::Enemy, 1, 1, 50),
                footman(11, Side::Enemy, 1, 2, 40),
            ],
        ))
        .damage(1, 11, 12.0)
        .damage(2, 11, 30.0)
        .death(11)
        .frame(with(own(95, 100), vec![footman(10, Side::Enemy, 1, 1, 50)]))
        .damage(10, 2, 8.0)
        .frame(with(own(95, 92), vec![footman(10, Side::Enemy, 1, 1, 50)]))
        .damage(1, 10, 50.0)
        .death(10)
        .frame(own(95, 92))
        .build()
}

/// Two own footmen die to a single enemy in two ticks.
pub fn losing_episode() -> RecordedEpisode {
    EpisodeBuilder::new()
        .frame(vec![
            footman(1, Side::Own, 0, 0, 100),
            footman(2, Side::Own, 0, 1, 100),
            footman(10, Side::Enemy, 1, 1, 300),
        ])
        .damage(10, 2, 100.0)
        .death(2)
        .frame(vec![
            footman(1, Side::Own, 0, 0, 100),
            footman(10, Side::Enemy, 1, 1, 300),
        ])
        .damage(10, 1, 100.0)
        .death(1)
        .frame(vec![footman(10, Side::Enemy, 1, 1, 300)])
        .build()
}

pub fn battle(episodes: Vec<RecordedEpisode>) -> RecordedBattle {
    RecordedBattle { episodes }
}
