//! Board model: the cell grid of a match and the characters standing on it.
//!
//! Lookups are public; the only mutators are crate-private and called by the
//! turn coordinator, which keeps occupancy consistent with character state.
use serde::Serialize;

use super::error::{GameError, Result};
use super::types::{Cell, CellId, CellType, Character, CharacterId, MatchId, Position};

#[derive(Debug, Clone)]
pub struct Board {
    match_id: MatchId,
    board_type: String,
    width: usize,
    height: usize,
    /// Row-major; the cell at (x, y) has id `y * width + x + 1`.
    cells: Vec<Cell>,
    /// Seat order.
    characters: Vec<Character>,
}

impl Board {
    /// Build a board from row-major cell types. `types.len()` must equal `width * height`.
    pub(crate) fn new(
        match_id: MatchId,
        board_type: String,
        width: usize,
        height: usize,
        types: &[CellType],
    ) -> Self {
        let cells = types
            .iter()
            .enumerate()
            .map(|(i, cell_type)| Cell {
                id: (i + 1) as CellId,
                x: i % width,
                y: i / width,
                cell_type: *cell_type,
            })
            .collect();
        Self {
            match_id,
            board_type,
            width,
            height,
            cells,
            characters: Vec::new(),
        }
    }

    pub fn match_id(&self) -> MatchId {
        self.match_id
    }

    pub fn board_type(&self) -> &str {
        &self.board_type
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        (id as usize).checked_sub(1).and_then(|idx| self.cells.get(idx))
    }

    pub fn cell_at(&self, x: usize, y: usize) -> Option<&Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(y * self.width + x)
    }

    pub fn cell_at_pos(&self, pos: Position) -> Option<&Cell> {
        self.cell_at(pos.x, pos.y)
    }

    pub fn character(&self, id: CharacterId) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }

    pub fn character_of(&self, user_id: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.user_id == user_id)
    }

    pub fn character_on(&self, cell_id: CellId) -> Option<&Character> {
        self.characters.iter().find(|c| c.cell_id == cell_id)
    }

    pub fn cells_of_type(&self, cell_type: CellType) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(move |c| c.cell_type == cell_type)
    }

    /// Orthogonally adjacent cells, whatever their type.
    pub fn neighbours(&self, cell: &Cell) -> impl Iterator<Item = &Cell> {
        let (x, y) = (cell.x as isize, cell.y as isize);
        [(0, -1), (1, 0), (0, 1), (-1, 0)]
            .into_iter()
            .filter_map(move |(dx, dy)| {
                let (nx, ny) = (x + dx, y + dy);
                if nx < 0 || ny < 0 {
                    return None;
                }
                self.cell_at(nx as usize, ny as usize)
            })
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            board: BoardInfo {
                board_type: self.board_type.clone(),
                width: self.width,
                height: self.height,
            },
            cells: self.cells.clone(),
            characters: self.characters.clone(),
        }
    }

    pub(crate) fn place_characters(&mut self, characters: Vec<Character>) {
        self.characters = characters;
    }

    pub(crate) fn character_mut(&mut self, id: CharacterId) -> Option<&mut Character> {
        self.characters.iter_mut().find(|c| c.id == id)
    }

    pub(crate) fn character_at_seat_mut(&mut self, seat: usize) -> Option<&mut Character> {
        self.characters.get_mut(seat)
    }

    /// Move a character onto `cell_id`, keeping one character per cell.
    pub(crate) fn relocate(&mut self, id: CharacterId, cell_id: CellId) -> Result<&Character> {
        if self.cell(cell_id).is_none() {
            return Err(GameError::CellNotFound);
        }
        if self.character_on(cell_id).is_some_and(|c| c.id != id) {
            return Err(GameError::OccupiedCell);
        }
        let character = self
            .character_mut(id)
            .ok_or(GameError::CharacterNotFound(id))?;
        character.cell_id = cell_id;
        Ok(&*character)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BoardInfo {
    #[serde(rename = "type")]
    pub board_type: String,
    pub width: usize,
    pub height: usize,
}

/// Read-only copy of a board handed to clients.
#[derive(Debug, Clone, Serialize)]
pub struct BoardSnapshot {
    pub board: BoardInfo,
    pub cells: Vec<Cell>,
    pub characters: Vec<Character>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn board_3x2() -> Board {
        use CellType::*;
        Board::new(
            Uuid::new_v4(),
            "test".to_string(),
            3,
            2,
            &[Empty, Obstacle, Empty, Blocked, Empty, Door],
        )
    }

    #[test]
    fn cell_ids_are_row_major() {
        let board = board_3x2();
        let cell = board.cell_at(2, 1).unwrap();
        assert_eq!(cell.id, 6);
        assert_eq!(cell.cell_type, CellType::Door);
        assert_eq!(board.cell(6), Some(cell));
        assert!(board.cell(0).is_none());
        assert!(board.cell(7).is_none());
        assert!(board.cell_at(3, 0).is_none());
    }

    #[test]
    fn cells_of_type_filters() {
        let board = board_3x2();
        let empty: Vec<CellId> = board.cells_of_type(CellType::Empty).map(|c| c.id).collect();
        assert_eq!(empty, vec![1, 3, 5]);
    }

    #[test]
    fn neighbours_stay_inside_the_grid() {
        let board = board_3x2();
        let corner = *board.cell_at(0, 0).unwrap();
        let ids: Vec<CellId> = board.neighbours(&corner).map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 4]);
    }
}
