//! Cell state machine and reveal engine.
//!
//! `initialize_game` produces a `NotStarted` state with an unmaterialized
//! board; the first `reveal_cell` places mines (avoiding the clicked cell
//! when `safe_first_click` is set), starts the clock, and reveals. Every
//! operation is state-in, state-out: the input is cloned, the clone is
//! mutated, and invalid requests return the input unchanged.

use anyhow::{bail, Result};
use log::debug;

use crate::board;
use crate::rng::MineRng;
use crate::types::{Board, CellState, GameSettings, GameState, GameStatus};

#[cfg(target_arch = "wasm32")]
fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0)
}

/// Create a fresh `NotStarted` game. The board stays empty until the first
/// reveal so mine placement can exclude the opening click.
pub fn initialize_game(settings: &GameSettings) -> Result<GameState> {
    if settings.rows == 0 || settings.cols == 0 {
        bail!("board must have at least one row and one column");
    }
    if settings.mines == 0 || settings.mines >= settings.rows * settings.cols {
        bail!(
            "mine count {} must be between 1 and {} for a {}x{} board",
            settings.mines,
            settings.rows * settings.cols - 1,
            settings.rows,
            settings.cols
        );
    }
    Ok(GameState {
        board: Board::unmaterialized(settings.rows, settings.cols),
        status: GameStatus::NotStarted,
        mines_remaining: settings.mines as i32,
        cells_revealed: 0,
        settings: *settings,
        start_time: None,
        end_time: None,
    })
}

/// Reveal `(row, col)`, using an entropy-seeded source if this is the first
/// reveal of the game.
pub fn reveal_cell(state: &GameState, row: usize, col: usize) -> GameState {
    reveal_cell_with_rng(state, row, col, &mut MineRng::from_entropy())
}

/// Reveal with an explicit random source; only the first reveal of a game
/// consumes randomness (for mine placement).
pub fn reveal_cell_with_rng(
    state: &GameState,
    row: usize,
    col: usize,
    rng: &mut MineRng,
) -> GameState {
    if !state.board.in_bounds(row, col) {
        return state.clone();
    }

    let mut next = state.clone();
    if next.status == GameStatus::NotStarted {
        let exclude = next.settings.safe_first_click.then_some((row, col));
        next.board = board::create_board(&next.settings, exclude, rng);
        next.status = GameStatus::Playing;
        next.start_time = Some(now_ms());
    }
    reveal_into(&mut next, row, col);
    next
}

/// Reveal within an already-running game. Shared with the auto-play
/// orchestrator, which applies solver-deduced safe cells through the same
/// transitions.
pub(crate) fn reveal_into(state: &mut GameState, row: usize, col: usize) {
    if state.status != GameStatus::Playing {
        return;
    }
    let Some(cell) = state.board.get(row, col) else {
        return;
    };
    if cell.state != CellState::Hidden {
        return;
    }

    if cell.is_mine {
        detonate(state, row, col);
        return;
    }

    // Worklist flood fill. Numbered cells terminate a branch; a cell that is
    // no longer hidden is never revisited. Zero-count cells have no mined
    // neighbors, so the fill cannot detonate.
    let mut stack = vec![(row, col)];
    while let Some((r, c)) = stack.pop() {
        let Some(cell) = state.board.get_mut(r, c) else {
            continue;
        };
        if cell.state != CellState::Hidden || cell.is_mine {
            continue;
        }
        cell.state = CellState::Revealed;
        state.cells_revealed += 1;
        if cell.adjacent_mines == 0 {
            stack.extend(state.board.neighbors(r, c));
        }
    }

    let safe_total = state.board.rows * state.board.cols - state.settings.mines;
    if state.cells_revealed == safe_total {
        finish_won(state);
    }
}

fn detonate(state: &mut GameState, row: usize, col: usize) {
    for cell in &mut state.board.cells {
        if cell.is_mine && !cell.state.is_flag() {
            cell.state = CellState::MineRevealed;
        } else if !cell.is_mine && cell.state.is_flag() {
            cell.state = CellState::WrongFlag;
        }
    }
    state.status = GameStatus::Lost;
    state.end_time = Some(now_ms());
    debug!("mine detonated at ({row}, {col}); game lost");
}

fn finish_won(state: &mut GameState) {
    for cell in &mut state.board.cells {
        if cell.is_mine && cell.state == CellState::Hidden {
            cell.state = CellState::AutoFlagged;
        }
    }
    state.mines_remaining = 0;
    state.status = GameStatus::Won;
    state.end_time = Some(now_ms());
    debug!("all safe cells revealed; game won");
}

/// Toggle a flag on `(row, col)`.
///
/// Placing a flag is refused once the counter reaches zero (soft cap), and
/// the counter never leaves `[0, settings.mines]` even after the solver has
/// auto-flagged with a saturated counter.
pub fn toggle_flag(state: &GameState, row: usize, col: usize) -> GameState {
    if state.status != GameStatus::Playing {
        return state.clone();
    }
    let mut next = state.clone();
    let cap = next.settings.mines as i32;
    let Some(cell) = next.board.get_mut(row, col) else {
        return next;
    };
    match cell.state {
        CellState::Hidden if next.mines_remaining > 0 => {
            cell.state = CellState::Flagged;
            next.mines_remaining -= 1;
        }
        CellState::Flagged | CellState::AutoFlagged => {
            cell.state = CellState::Hidden;
            next.mines_remaining = (next.mines_remaining + 1).min(cap);
        }
        // Revealed cells, terminal markers, and capped flag placement.
        _ => {}
    }
    next
}
