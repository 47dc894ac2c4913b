//! Board generation: mine placement and adjacent-count calculation.
//!
//! Placement is rejection sampling over the whole grid, optionally excluding
//! the first-clicked cell so an opening reveal can never detonate. Counting
//! fills `adjacent_mines` for every non-mine cell from its 8-neighborhood.

use log::debug;

use crate::rng::MineRng;
use crate::types::{Board, GameSettings};

/// Build a board with exactly `settings.mines` mines placed uniformly at
/// random among all cells except `first_click` (when given).
///
/// Termination: `initialize_game` guarantees `mines < rows * cols`, so at
/// least one free cell remains even with the first click excluded and the
/// rejection loop always finishes.
pub fn create_board(
    settings: &GameSettings,
    first_click: Option<(usize, usize)>,
    rng: &mut MineRng,
) -> Board {
    let mut board = Board::blank(settings.rows, settings.cols);

    let mut placed = 0;
    while placed < settings.mines {
        let row = rng.pick(settings.rows);
        let col = rng.pick(settings.cols);
        if Some((row, col)) == first_click {
            continue;
        }
        let cell = &mut board.cells[row * settings.cols + col];
        if cell.is_mine {
            continue;
        }
        cell.is_mine = true;
        placed += 1;
    }

    count_adjacent(&mut board);
    debug!(
        "generated {}x{} board with {} mines (first click {:?})",
        settings.rows, settings.cols, settings.mines, first_click
    );
    board
}

/// Materialize a board from an explicit mine list. Out-of-range entries are
/// ignored; duplicates collapse to one mine.
pub fn with_mines(rows: usize, cols: usize, mines: &[(usize, usize)]) -> Board {
    let mut board = Board::blank(rows, cols);
    for &(row, col) in mines {
        if board.in_bounds(row, col) {
            board.cells[row * cols + col].is_mine = true;
        }
    }
    count_adjacent(&mut board);
    board
}

fn count_adjacent(board: &mut Board) {
    for idx in 0..board.cells.len() {
        if board.cells[idx].is_mine {
            continue;
        }
        let (row, col) = (board.cells[idx].row, board.cells[idx].col);
        let count = board
            .neighbors(row, col)
            .into_iter()
            .filter(|&(nr, nc)| board.cells[nr * board.cols + nc].is_mine)
            .count();
        board.cells[idx].adjacent_mines = count as u8;
    }
}
