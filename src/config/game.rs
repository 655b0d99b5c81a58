//! Game configuration constants.
//!
//! This module defines the main gameplay parameters such as board dimensions,
//! per-turn action allowance and event density.
use crate::game::types::{CharacterClass, EventKind};

/// Number of columns of a generated board.
pub const BOARD_WIDTH: usize = 8;

/// Number of rows of a generated board.
pub const BOARD_HEIGHT: usize = 8;

/// Number of event resolutions a character may perform in one action phase.
pub const ACTIONS_PER_TURN: u32 = 3;

/// Share of generated cells turned into obstacles (percent).
pub const OBSTACLE_RATIO: u32 = 15;

/// Share of generated cells turned into blocked-but-enterable rubble (percent).
pub const RUBBLE_RATIO: u32 = 8;

/// Number of doors placed on the border of a generated board.
pub const DOOR_COUNT: usize = 2;

/// Number of events bound to cells when a board is generated.
pub const EVENT_COUNT: usize = 10;

/// Labels picked for generated boards.
pub const BOARD_TYPES: [&str; 4] = ["forest", "dungeon", "ruins", "swamp"];

/// Event templates used by the board generator.
pub const EVENT_TEMPLATES: [(&str, EventKind); 6] = [
    ("Treasure chest", EventKind::Treasure),
    ("Hidden trap", EventKind::Trap),
    ("Ancient shrine", EventKind::Shrine),
    ("Goblin ambush", EventKind::Monster),
    ("Sleeping troll", EventKind::Monster),
    ("Abandoned pack", EventKind::Treasure),
];

/// Name of the event seeded the first time a rubble cell is entered.
pub const RUBBLE_EVENT_NAME: &str = "Search the rubble";

/// Movement budget per character class (orthogonal steps per move).
pub fn movement_budget(class: CharacterClass) -> u32 {
    match class {
        CharacterClass::Knight => 3,
        CharacterClass::Archer => 4,
        CharacterClass::Mage => 3,
        CharacterClass::Dwarf => 2,
        CharacterClass::Druid => 3,
        CharacterClass::Elf => 4,
    }
}

/// Gameplay parameters handed to every new match.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub board_width: usize,
    pub board_height: usize,
    pub actions_per_turn: u32,
    pub event_count: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: BOARD_WIDTH,
            board_height: BOARD_HEIGHT,
            actions_per_turn: ACTIONS_PER_TURN,
            event_count: EVENT_COUNT,
        }
    }
}
