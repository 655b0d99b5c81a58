//! Board blueprints: textual layouts and the random board generator.
use std::collections::VecDeque;

use rand::Rng;
use rand::seq::IndexedRandom;

use super::board::Board;
use super::error::{GameError, Result};
use super::events::EventResolver;
use super::types::{CellId, CellType, EventKind, MatchId, Position};
use crate::config::game::{
    BOARD_TYPES, DOOR_COUNT, EVENT_TEMPLATES, GameConfig, OBSTACLE_RATIO, RUBBLE_RATIO,
};
use crate::config::matchmaking::MAX_SEATS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSeed {
    pub pos: Position,
    pub name: String,
    pub kind: EventKind,
}

/// Everything needed to lay out a match board before it exists.
#[derive(Debug, Clone)]
pub struct Blueprint {
    pub board_type: String,
    pub width: usize,
    pub height: usize,
    /// Row-major cell types.
    pub types: Vec<CellType>,
    /// Starting cells in seat order.
    pub spawns: Vec<Position>,
    pub events: Vec<EventSeed>,
}

impl Blueprint {
    /// Parse rows of `-XDB` tokens. Digits mark spawn points (empty cells), `1` being
    /// the first seat.
    pub fn from_layout(board_type: &str, rows: &[&str]) -> Result<Self> {
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        if width == 0 {
            return Err(GameError::InvalidConfig("layout is empty".to_string()));
        }
        let mut types = Vec::with_capacity(width * rows.len());
        let mut spawns: Vec<(u32, Position)> = Vec::new();
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(GameError::InvalidConfig(format!("layout row {} has a different width", y)));
            }
            for (x, token) in row.chars().enumerate() {
                if let Some(seat) = token.to_digit(10) {
                    spawns.push((seat, Position::new(x, y)));
                    types.push(CellType::Empty);
                    continue;
                }
                let cell_type = CellType::from_token(token).ok_or_else(|| {
                    GameError::InvalidConfig(format!("unknown cell token '{}' at ({}, {})", token, x, y))
                })?;
                types.push(cell_type);
            }
        }
        spawns.sort_by_key(|(seat, _)| *seat);
        Ok(Self {
            board_type: board_type.to_string(),
            width,
            height: rows.len(),
            types,
            spawns: spawns.into_iter().map(|(_, pos)| pos).collect(),
            events: Vec::new(),
        })
    }

    /// Bind an event to the cell at (x, y).
    pub fn with_event(mut self, x: usize, y: usize, name: &str, kind: EventKind) -> Self {
        self.events.push(EventSeed {
            pos: Position::new(x, y),
            name: name.to_string(),
            kind,
        });
        self
    }

    /// Generate a random board: scattered obstacles and rubble, doors on the border,
    /// unreachable pockets walled off, spawn points and events on empty cells.
    pub fn generate<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Self {
        let (width, height) = (config.board_width.max(1), config.board_height.max(1));
        let mut types: Vec<CellType> = (0..width * height)
            .map(|_| {
                let roll = rng.random_range(0..100);
                if roll < OBSTACLE_RATIO {
                    CellType::Obstacle
                } else if roll < OBSTACLE_RATIO + RUBBLE_RATIO {
                    CellType::Blocked
                } else {
                    CellType::Empty
                }
            })
            .collect();

        let border: Vec<usize> = (0..width * height)
            .filter(|i| {
                let (x, y) = (i % width, i / width);
                x == 0 || y == 0 || x == width - 1 || y == height - 1
            })
            .collect();
        for idx in border.choose_multiple(rng, DOOR_COUNT) {
            types[*idx] = CellType::Door;
        }

        wall_off_unreachable(&mut types, width, height);

        let empties: Vec<usize> = types
            .iter()
            .enumerate()
            .filter(|(_, t)| **t == CellType::Empty)
            .map(|(i, _)| i)
            .collect();
        let picks: Vec<usize> = empties
            .choose_multiple(rng, MAX_SEATS + config.event_count)
            .copied()
            .collect();
        let to_pos = |i: usize| Position::new(i % width, i / width);
        let spawns = picks.iter().take(MAX_SEATS).map(|i| to_pos(*i)).collect();
        let events = picks
            .iter()
            .skip(MAX_SEATS)
            .filter_map(|i| {
                EVENT_TEMPLATES.choose(rng).map(|(name, kind)| EventSeed {
                    pos: to_pos(*i),
                    name: name.to_string(),
                    kind: *kind,
                })
            })
            .collect();

        let board_type = BOARD_TYPES.choose(rng).copied().unwrap_or("forest");
        Self {
            board_type: board_type.to_string(),
            width,
            height,
            types,
            spawns,
            events,
        }
    }

    /// Materialize the board and its event table. Returns the spawn cell ids in seat order.
    pub fn build(self, match_id: MatchId) -> Result<(Board, EventResolver, Vec<CellId>)> {
        if self.types.len() != self.width * self.height {
            return Err(GameError::InvalidConfig("cell count does not match board size".to_string()));
        }
        let board = Board::new(match_id, self.board_type, self.width, self.height, &self.types);

        let mut spawns = Vec::with_capacity(self.spawns.len());
        for pos in &self.spawns {
            match board.cell_at_pos(*pos) {
                Some(cell) if cell.cell_type == CellType::Empty => spawns.push(cell.id),
                _ => {
                    return Err(GameError::InvalidConfig(format!(
                        "spawn ({}, {}) is not an empty cell",
                        pos.x, pos.y
                    )));
                }
            }
        }

        let mut events = EventResolver::default();
        for seed in self.events {
            let cell = board
                .cell_at_pos(seed.pos)
                .filter(|c| c.cell_type.is_traversable())
                .ok_or_else(|| {
                    GameError::InvalidConfig(format!(
                        "event '{}' at ({}, {}) is not on an enterable cell",
                        seed.name, seed.pos.x, seed.pos.y
                    ))
                })?;
            events.bind(cell.id, &seed.name, seed.kind);
        }
        Ok((board, events, spawns))
    }
}

/// Turn every traversable cell outside the largest connected region into an obstacle,
/// so that any two enterable cells can reach each other.
fn wall_off_unreachable(types: &mut [CellType], width: usize, height: usize) {
    let mut region = vec![usize::MAX; types.len()];
    let mut sizes: Vec<usize> = Vec::new();
    for start in 0..types.len() {
        if !types[start].is_traversable() || region[start] != usize::MAX {
            continue;
        }
        let id = sizes.len();
        let mut size = 0;
        let mut queue = VecDeque::from([start]);
        region[start] = id;
        while let Some(idx) = queue.pop_front() {
            size += 1;
            let (x, y) = (idx % width, idx / width);
            let mut visit = |n: usize| {
                if types[n].is_traversable() && region[n] == usize::MAX {
                    region[n] = id;
                    queue.push_back(n);
                }
            };
            if x > 0 {
                visit(idx - 1);
            }
            if x + 1 < width {
                visit(idx + 1);
            }
            if y > 0 {
                visit(idx - width);
            }
            if y + 1 < height {
                visit(idx + width);
            }
        }
        sizes.push(size);
    }
    let Some(largest) = (0..sizes.len()).max_by_key(|id| sizes[*id]) else {
        return;
    };
    for (idx, cell_type) in types.iter_mut().enumerate() {
        if cell_type.is_traversable() && region[idx] != largest {
            *cell_type = CellType::Obstacle;
        }
    }
}
