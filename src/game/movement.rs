//! Movement legality.
//!
//! Decides whether a character may move onto a target cell. Only feasibility is
//! reported; the path itself is never needed.
use std::collections::{HashSet, VecDeque};

use super::board::Board;
use super::error::GameError;
use super::types::{Cell, CellId, Character};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalMove {
    OutOfReach,
    BlockedByObstacle,
    OccupiedCell,
    WrongCellType,
}

impl From<IllegalMove> for GameError {
    fn from(reason: IllegalMove) -> Self {
        match reason {
            IllegalMove::OutOfReach => GameError::OutOfReach,
            IllegalMove::BlockedByObstacle => GameError::BlockedByObstacle,
            IllegalMove::OccupiedCell => GameError::OccupiedCell,
            IllegalMove::WrongCellType => GameError::WrongCellType,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveCheck {
    Legal,
    Illegal(IllegalMove),
}

impl MoveCheck {
    pub fn into_result(self) -> Result<(), GameError> {
        match self {
            MoveCheck::Legal => Ok(()),
            MoveCheck::Illegal(reason) => Err(reason.into()),
        }
    }
}

/// Check a move of `character` onto `target` within `budget` orthogonal steps.
///
/// Checks run in a fixed order: cell type, occupancy (regardless of distance),
/// straight-line reach, then a breadth-first search over traversable cells.
/// Other characters do not block the cells they are merely passed over.
pub fn can_move(character: &Character, target: &Cell, board: &Board, budget: u32) -> MoveCheck {
    if !target.cell_type.is_traversable() {
        return MoveCheck::Illegal(IllegalMove::WrongCellType);
    }
    if board.character_on(target.id).is_some_and(|c| c.id != character.id) {
        return MoveCheck::Illegal(IllegalMove::OccupiedCell);
    }
    let Some(start) = board.cell(character.cell_id) else {
        return MoveCheck::Illegal(IllegalMove::OutOfReach);
    };
    if start.id == target.id {
        return MoveCheck::Legal;
    }
    if start.pos().manhattan(target.pos()) > budget as usize {
        return MoveCheck::Illegal(IllegalMove::OutOfReach);
    }
    match steps_between(board, start, target, budget) {
        Some(_) => MoveCheck::Legal,
        None => MoveCheck::Illegal(IllegalMove::BlockedByObstacle),
    }
}

/// Shortest number of steps from `start` to `target` over traversable cells, if it
/// does not exceed `budget`.
fn steps_between(board: &Board, start: &Cell, target: &Cell, budget: u32) -> Option<u32> {
    let mut seen: HashSet<CellId> = HashSet::from([start.id]);
    let mut queue = VecDeque::from([(start.id, 0u32)]);
    while let Some((cell_id, steps)) = queue.pop_front() {
        if cell_id == target.id {
            return Some(steps);
        }
        if steps == budget {
            continue;
        }
        let cell = board.cell(cell_id)?;
        for next in board.neighbours(cell) {
            if next.cell_type.is_traversable() && seen.insert(next.id) {
                queue.push_back((next.id, steps + 1));
            }
        }
    }
    None
}
