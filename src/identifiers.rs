//! Identifier types for combat units.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Engine-assigned identifier of a single unit.
///
/// Identifiers are opaque to the controller: they are only compared,
/// hashed and echoed back to the engine inside commands.
///
/// # Examples
///
/// ```
/// use skirmish::identifiers::UnitId;
///
/// let id = UnitId::new(7);
/// assert_eq!(id.value(), 7);
/// assert_eq!(id.to_string(), "#7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(u32);

impl UnitId {
    /// Create a new unit identifier.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the raw engine value.
    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for UnitId {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<UnitId> for u32 {
    fn from(id: UnitId) -> Self {
        id.0
    }
}

/// The two sides of an engagement, from the controller's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Units commanded by this controller.
    Own,
    /// Units of the opposing player.
    Enemy,
}

impl Side {
    /// The opposing side.
    pub fn opponent(&self) -> Side {
        match self {
            Side::Own => Side::Enemy,
            Side::Enemy => Side::Own,
        }
    }

    /// Short label used in logs and recordings.
    pub fn label(&self) -> &'static str {
        match self {
            Side::Own => "own",
            Side::Enemy => "enemy",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
