use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identity of a user, derived from the bearer credential.
pub type UserId = String;
pub type MatchId = Uuid;
pub type CellId = u32;
pub type CharacterId = u32;
pub type EventId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub fn manhattan(&self, other: Position) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Terrain of a cell. Serialized as the single-character token clients render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellType {
    #[serde(rename = "-")]
    Empty,
    #[serde(rename = "X")]
    Obstacle,
    #[serde(rename = "D")]
    Door,
    #[serde(rename = "B")]
    Blocked,
}

impl CellType {
    pub fn from_token(token: char) -> Option<Self> {
        match token {
            '-' => Some(Self::Empty),
            'X' => Some(Self::Obstacle),
            'D' => Some(Self::Door),
            'B' => Some(Self::Blocked),
            _ => None,
        }
    }

    pub fn token(&self) -> char {
        match self {
            Self::Empty => '-',
            Self::Obstacle => 'X',
            Self::Door => 'D',
            Self::Blocked => 'B',
        }
    }

    /// Whether a character may stand on or walk through this cell.
    pub fn is_traversable(&self) -> bool {
        matches!(self, Self::Empty | Self::Blocked)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub id: CellId,
    pub x: usize,
    pub y: usize,
    #[serde(rename = "type")]
    pub cell_type: CellType,
}

impl Cell {
    pub fn pos(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterClass {
    Knight,
    Archer,
    Mage,
    Dwarf,
    Druid,
    Elf,
}

impl CharacterClass {
    pub const ALL: [CharacterClass; 6] = [
        CharacterClass::Knight,
        CharacterClass::Archer,
        CharacterClass::Mage,
        CharacterClass::Dwarf,
        CharacterClass::Druid,
        CharacterClass::Elf,
    ];
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CharacterClass::Knight => "Knight",
            CharacterClass::Archer => "Archer",
            CharacterClass::Mage => "Mage",
            CharacterClass::Dwarf => "Dwarf",
            CharacterClass::Druid => "Druid",
            CharacterClass::Elf => "Elf",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: CharacterId,
    pub user_id: UserId,
    pub name: String,
    pub class: CharacterClass,
    pub cell_id: CellId,
    /// Event resolutions left in the current turn.
    pub actions: u32,
    pub inventory_id: Uuid,
    pub stats_id: Uuid,
    /// Set when the character lost a combat; the next turn is skipped.
    #[serde(default)]
    pub stunned: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Treasure,
    Trap,
    Shrine,
    Monster,
    Rubble,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellEvent {
    pub id: EventId,
    pub cell_id: CellId,
    pub name: String,
    pub kind: EventKind,
    pub resolved: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Waiting,
    Active,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    AwaitingMove,
    ActionPhase,
    TurnComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatOutcome {
    Victory,
    Defeat,
    /// The external session did not report back in time.
    Abandoned,
}

/// A combat sub-session requested by a resolved event, awaiting its external outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatTicket {
    pub id: Uuid,
    pub match_id: MatchId,
    pub character_id: CharacterId,
    pub event_id: EventId,
    pub event_name: String,
}
