//! Core data types for the minesweeper engine.
//!
//! The board is stored as a flat `Vec` in row-major layout:
//! `cells[row * cols + col]`. Every type that crosses the wasm boundary
//! derives serde with the field/variant names the JS host renders from
//! (`camelCase` fields, `snake_case` enum variants).

use serde::{Deserialize, Serialize};

/// Per-cell display state.
///
/// `AutoFlagged` is rule-equivalent to `Flagged`; it only records that the
/// flag was placed by the solver rather than the player. `MineRevealed` and
/// `WrongFlag` appear only once the game has ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellState {
    Hidden,
    Revealed,
    Flagged,
    AutoFlagged,
    MineRevealed,
    WrongFlag,
}

impl CellState {
    /// Player- or solver-placed flag.
    #[inline(always)]
    pub fn is_flag(self) -> bool {
        matches!(self, CellState::Flagged | CellState::AutoFlagged)
    }
}

/// Whole-game status.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    NotStarted,
    Playing,
    Won,
    Lost,
}

/// A single board cell. `adjacent_mines` is fixed at generation time.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub is_mine: bool,
    pub state: CellState,
    pub adjacent_mines: u8,
    pub row: usize,
    pub col: usize,
}

/// The playing field.
///
/// A board starts *unmaterialized* (`cells` empty, dimensions known) so the
/// host can render a placeholder grid before the first reveal fixes the mine
/// layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<Cell>,
}

impl Board {
    /// Dimensions only, no cells. Mine placement happens on the first reveal.
    pub fn unmaterialized(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: Vec::new(),
        }
    }

    /// A fully materialized board of hidden, mine-free cells.
    pub fn blank(rows: usize, cols: usize) -> Self {
        let cells = (0..rows * cols)
            .map(|i| Cell {
                is_mine: false,
                state: CellState::Hidden,
                adjacent_mines: 0,
                row: i / cols,
                col: i % cols,
            })
            .collect();
        Self { rows, cols, cells }
    }

    #[inline(always)]
    pub fn is_materialized(&self) -> bool {
        !self.cells.is_empty()
    }

    #[inline(always)]
    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    #[inline(always)]
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// `None` when out of bounds or the board is unmaterialized.
    #[inline(always)]
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        if self.in_bounds(row, col) {
            self.cells.get(self.index(row, col))
        } else {
            None
        }
    }

    #[inline(always)]
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        if self.in_bounds(row, col) {
            let idx = self.index(row, col);
            self.cells.get_mut(idx)
        } else {
            None
        }
    }

    /// Coordinates of the up-to-8 neighbors of `(row, col)`, clipped to the
    /// board edges. No wraparound.
    pub fn neighbors(&self, row: usize, col: usize) -> Vec<(usize, usize)> {
        let mut out = Vec::with_capacity(8);
        for dr in -1i64..=1 {
            for dc in -1i64..=1 {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let nr = row as i64 + dr;
                let nc = col as i64 + dc;
                if nr >= 0 && nr < self.rows as i64 && nc >= 0 && nc < self.cols as i64 {
                    out.push((nr as usize, nc as usize));
                }
            }
        }
        out
    }

    /// Player- and solver-placed flags currently on the board.
    pub fn flag_count(&self) -> usize {
        self.cells.iter().filter(|c| c.state.is_flag()).count()
    }
}

/// Host-supplied game parameters. Invariant `0 < mines < rows * cols`,
/// enforced by `game::initialize_game`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettings {
    pub rows: usize,
    pub cols: usize,
    pub mines: usize,
    pub safe_first_click: bool,
}

/// The full game value. Every engine operation consumes a `GameState` by
/// reference and returns a fresh one; nothing is mutated in place from the
/// caller's point of view.
///
/// Timestamps are epoch milliseconds (`Date.now()` on the JS side) so the
/// host timer can show elapsed seconds during and after a game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub board: Board,
    pub status: GameStatus,
    pub mines_remaining: i32,
    pub cells_revealed: usize,
    pub settings: GameSettings,
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_board_cells_know_their_coordinates() {
        let board = Board::blank(3, 4);
        assert_eq!(board.cells.len(), 12);
        for row in 0..3 {
            for col in 0..4 {
                let cell = board.get(row, col).unwrap();
                assert_eq!((cell.row, cell.col), (row, col));
                assert_eq!(cell.state, CellState::Hidden);
                assert!(!cell.is_mine);
            }
        }
    }

    #[test]
    fn unmaterialized_board_has_no_cells() {
        let board = Board::unmaterialized(5, 7);
        assert!(!board.is_materialized());
        assert_eq!((board.rows, board.cols), (5, 7));
        assert!(board.get(0, 0).is_none());
    }

    #[test]
    fn neighbor_counts_at_corner_edge_center() {
        let board = Board::blank(5, 5);
        assert_eq!(board.neighbors(0, 0).len(), 3);
        assert_eq!(board.neighbors(0, 2).len(), 5);
        assert_eq!(board.neighbors(2, 2).len(), 8);
        assert_eq!(board.neighbors(4, 4).len(), 3);
    }

    #[test]
    fn neighbors_stay_adjacent_and_in_bounds() {
        let board = Board::blank(4, 6);
        for (nr, nc) in board.neighbors(2, 3) {
            assert!(board.in_bounds(nr, nc));
            assert!(nr.abs_diff(2) <= 1 && nc.abs_diff(3) <= 1);
            assert!((nr, nc) != (2, 3));
        }
    }

    #[test]
    fn out_of_bounds_get_is_none() {
        let board = Board::blank(2, 2);
        assert!(board.get(2, 0).is_none());
        assert!(board.get(0, 2).is_none());
    }

    #[test]
    fn flag_count_sees_both_flag_kinds() {
        let mut board = Board::blank(2, 2);
        board.get_mut(0, 0).unwrap().state = CellState::Flagged;
        board.get_mut(1, 1).unwrap().state = CellState::AutoFlagged;
        board.get_mut(0, 1).unwrap().state = CellState::Revealed;
        assert_eq!(board.flag_count(), 2);
    }
}
