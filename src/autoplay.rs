//! Auto-play orchestration: drives the deduction engine and the reveal
//! engine to a fixed point, plus the partial one-shot variants.
//!
//! Every entry point is state-in, state-out like the rest of the engine, and
//! a no-op unless the game is running on a materialized board. Solver flags
//! are placed as `AutoFlagged` so the host can tell them apart from player
//! flags.

use log::debug;

use crate::game;
use crate::solver::{self, Coord};
use crate::types::{CellState, GameState, GameStatus};

fn can_solve(state: &GameState) -> bool {
    state.status == GameStatus::Playing && state.board.is_materialized()
}

/// Row-major application order, for deterministic results.
fn sorted(cells: impl IntoIterator<Item = Coord>) -> Vec<Coord> {
    let mut out: Vec<Coord> = cells.into_iter().collect();
    out.sort_unstable();
    out
}

/// Flag a deduced mine. The counter saturates at zero: a player who spent
/// the counter on wrong flags elsewhere does not push it negative here.
fn flag_deduced(state: &mut GameState, (row, col): Coord) -> bool {
    let Some(cell) = state.board.get_mut(row, col) else {
        return false;
    };
    if cell.state != CellState::Hidden {
        return false;
    }
    cell.state = CellState::AutoFlagged;
    state.mines_remaining = (state.mines_remaining - 1).max(0);
    true
}

/// Reveal a deduced safe cell through the ordinary reveal transitions
/// (cascades and win detection included).
fn open_deduced(state: &mut GameState, (row, col): Coord) -> bool {
    if state.status != GameStatus::Playing {
        return false;
    }
    let hidden = matches!(
        state.board.get(row, col),
        Some(cell) if cell.state == CellState::Hidden
    );
    if !hidden {
        return false;
    }
    game::reveal_into(state, row, col);
    true
}

/// One full solver pass: local mine flags, local safe reveals, then the
/// pairwise/triple conclusions on the updated board. Reports whether the
/// pass changed anything.
fn calc_pass(state: &mut GameState) -> bool {
    let mut acted = false;

    let local = solver::deduce_local(&solver::collect_constraints(&state.board));
    for cell in sorted(local.mines) {
        acted |= flag_deduced(state, cell);
    }
    for cell in sorted(local.safe) {
        acted |= open_deduced(state, cell);
    }
    if state.status != GameStatus::Playing {
        return acted;
    }

    let paired = solver::deduce_paired(&solver::collect_constraints(&state.board));
    for cell in sorted(paired.mines) {
        acted |= flag_deduced(state, cell);
    }
    for cell in sorted(paired.safe) {
        acted |= open_deduced(state, cell);
    }

    acted
}

/// Repeat solver passes until one changes nothing or the game ends. Each
/// productive pass strictly shrinks the hidden set, which bounds the loop by
/// the cell count.
pub fn auto_calc(state: &GameState) -> GameState {
    if !can_solve(state) {
        return state.clone();
    }
    let mut next = state.clone();
    let mut passes = 0u32;
    loop {
        passes += 1;
        if !calc_pass(&mut next) || next.status != GameStatus::Playing {
            break;
        }
    }
    debug!("auto-calc finished after {passes} passes, status {:?}", next.status);
    next
}

/// Flag every cell the local mine rule pins down. One pass, no reveals.
pub fn auto_flag_certain_mines(state: &GameState) -> GameState {
    if !can_solve(state) {
        return state.clone();
    }
    let mut next = state.clone();
    let local = solver::deduce_local(&solver::collect_constraints(&next.board));
    for cell in sorted(local.mines) {
        flag_deduced(&mut next, cell);
    }
    next
}

/// Flag the first (row-major) cell the local mine rule pins down.
pub fn flag_one_certain_mine(state: &GameState) -> GameState {
    if !can_solve(state) {
        return state.clone();
    }
    let mut next = state.clone();
    let local = solver::deduce_local(&solver::collect_constraints(&next.board));
    if let Some(&cell) = local.mines.iter().min() {
        flag_deduced(&mut next, cell);
    }
    next
}

/// Reveal the first (row-major) cell the local safe rule pins down.
pub fn open_one_certain_empty_cell(state: &GameState) -> GameState {
    if !can_solve(state) {
        return state.clone();
    }
    let mut next = state.clone();
    let local = solver::deduce_local(&solver::collect_constraints(&next.board));
    if let Some(&cell) = local.safe.iter().min() {
        open_deduced(&mut next, cell);
    }
    next
}

/// Reveal every cell the local safe rule pins down. One pass.
pub fn open_all_certain_empty_cells(state: &GameState) -> GameState {
    if !can_solve(state) {
        return state.clone();
    }
    let mut next = state.clone();
    let local = solver::deduce_local(&solver::collect_constraints(&next.board));
    for cell in sorted(local.safe) {
        open_deduced(&mut next, cell);
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board;
    use crate::game::fixtures::playing_state;
    use crate::game::{initialize_game, reveal_cell, reveal_cell_with_rng, toggle_flag};
    use crate::rng::MineRng;
    use crate::types::{Board, GameSettings};

    fn reveal_raw(board: &mut Board, cells: &[(usize, usize)]) {
        for &(r, c) in cells {
            board.get_mut(r, c).unwrap().state = CellState::Revealed;
        }
    }

    /// 4x4, single mine at (0,0), everything else revealed except (0,0) and
    /// the given holdouts.
    fn corner_mine_state(holdouts: &[(usize, usize)]) -> GameState {
        let mut b = board::with_mines(4, 4, &[(0, 0)]);
        let open: Vec<(usize, usize)> = (0..4)
            .flat_map(|r| (0..4).map(move |c| (r, c)))
            .filter(|&p| p != (0, 0) && !holdouts.contains(&p))
            .collect();
        reveal_raw(&mut b, &open);
        playing_state(b, 1)
    }

    #[test]
    fn all_entry_points_are_noops_before_first_reveal() {
        let settings = GameSettings {
            rows: 5,
            cols: 5,
            mines: 4,
            safe_first_click: true,
        };
        let state = initialize_game(&settings).unwrap();
        assert_eq!(auto_calc(&state), state);
        assert_eq!(auto_flag_certain_mines(&state), state);
        assert_eq!(flag_one_certain_mine(&state), state);
        assert_eq!(open_one_certain_empty_cell(&state), state);
        assert_eq!(open_all_certain_empty_cells(&state), state);
    }

    #[test]
    fn all_entry_points_are_noops_after_game_end() {
        let b = board::with_mines(3, 3, &[(1, 1)]);
        let lost = reveal_cell(&playing_state(b, 1), 1, 1);
        assert_eq!(lost.status, GameStatus::Lost);
        assert_eq!(auto_calc(&lost), lost);
        assert_eq!(auto_flag_certain_mines(&lost), lost);
        assert_eq!(flag_one_certain_mine(&lost), lost);
        assert_eq!(open_one_certain_empty_cell(&lost), lost);
        assert_eq!(open_all_certain_empty_cells(&lost), lost);
    }

    #[test]
    fn auto_flag_flags_saturated_constraints() {
        // Three revealed 1s around the corner mine: each sees only (0,0).
        let state = corner_mine_state(&[(2, 2), (2, 3), (3, 2), (3, 3)]);
        let next = auto_flag_certain_mines(&state);
        assert_eq!(next.board.get(0, 0).unwrap().state, CellState::AutoFlagged);
        assert_eq!(next.mines_remaining, 0);
        // Flag only, never reveal.
        assert_eq!(next.cells_revealed, state.cells_revealed);
    }

    #[test]
    fn flag_one_takes_the_first_certain_mine_in_row_major_order() {
        let mut b = board::with_mines(4, 4, &[(0, 0), (3, 3)]);
        let open: Vec<(usize, usize)> = (0..4)
            .flat_map(|r| (0..4).map(move |c| (r, c)))
            .filter(|&p| p != (0, 0) && p != (3, 3))
            .collect();
        reveal_raw(&mut b, &open);
        let state = playing_state(b, 2);

        let one = flag_one_certain_mine(&state);
        assert_eq!(one.board.get(0, 0).unwrap().state, CellState::AutoFlagged);
        assert_eq!(one.board.get(3, 3).unwrap().state, CellState::Hidden);
        assert_eq!(one.mines_remaining, 1);

        let two = flag_one_certain_mine(&one);
        assert_eq!(two.board.get(3, 3).unwrap().state, CellState::AutoFlagged);
        assert_eq!(two.mines_remaining, 0);
    }

    #[test]
    fn open_variants_reveal_cells_cleared_by_spent_constraints() {
        // Mine flagged, center revealed: every hidden neighbor of the
        // center is provably safe.
        let mut b = board::with_mines(3, 3, &[(0, 0)]);
        b.get_mut(0, 0).unwrap().state = CellState::Flagged;
        reveal_raw(&mut b, &[(1, 1)]);
        let state = playing_state(b, 1);

        let one = open_one_certain_empty_cell(&state);
        assert_eq!(one.board.get(0, 1).unwrap().state, CellState::Revealed);
        assert_eq!(one.cells_revealed, 2);
        assert_eq!(one.status, GameStatus::Playing);

        // Opening every certain cell clears the whole board and wins.
        let all = open_all_certain_empty_cells(&state);
        assert_eq!(all.status, GameStatus::Won);
        assert_eq!(all.cells_revealed, 8);
        assert_eq!(all.mines_remaining, 0);
    }

    #[test]
    fn open_one_is_a_noop_without_certain_cells() {
        let mut b = board::with_mines(3, 3, &[(0, 0)]);
        reveal_raw(&mut b, &[(1, 1)]);
        let state = playing_state(b, 1);
        assert_eq!(open_one_certain_empty_cell(&state), state);
        assert_eq!(flag_one_certain_mine(&state), state);
    }

    #[test]
    fn auto_calc_flags_a_mine_wall_and_stops() {
        // Mines fill column 2; the left half is revealed. The solver can
        // prove the wall but has no information about the right half.
        let mines: Vec<(usize, usize)> = (0..5).map(|r| (r, 2)).collect();
        let b = board::with_mines(5, 5, &mines);
        let opened = reveal_cell(&playing_state(b, 5), 2, 0);
        assert_eq!(opened.cells_revealed, 10);

        let solved = auto_calc(&opened);
        for r in 0..5 {
            assert_eq!(solved.board.get(r, 2).unwrap().state, CellState::AutoFlagged);
        }
        assert_eq!(solved.mines_remaining, 0);
        assert_eq!(solved.status, GameStatus::Playing);
        // Right half untouched: nothing is deducible there.
        for r in 0..5 {
            for c in 3..5 {
                assert_eq!(solved.board.get(r, c).unwrap().state, CellState::Hidden);
            }
        }
    }

    #[test]
    fn auto_calc_wins_through_pairwise_iteration() {
        // 2x3 with mines at the top corners. From the bottom row, the
        // subset rule pins both mines, then the freed constraint clears
        // (0,1) and the game completes: deduction, not luck.
        let mut b = board::with_mines(2, 3, &[(0, 0), (0, 2)]);
        reveal_raw(&mut b, &[(1, 0), (1, 1), (1, 2)]);
        let state = playing_state(b, 2);

        let solved = auto_calc(&state);
        assert_eq!(solved.status, GameStatus::Won);
        assert_eq!(solved.board.get(0, 0).unwrap().state, CellState::AutoFlagged);
        assert_eq!(solved.board.get(0, 2).unwrap().state, CellState::AutoFlagged);
        assert_eq!(solved.board.get(0, 1).unwrap().state, CellState::Revealed);
        assert_eq!(solved.mines_remaining, 0);
    }

    #[test]
    fn auto_calc_is_idempotent_at_its_fixed_point() {
        let settings = GameSettings {
            rows: 6,
            cols: 6,
            mines: 6,
            safe_first_click: true,
        };
        for seed in 0..40 {
            let state = initialize_game(&settings).unwrap();
            let mut rng = MineRng::seeded(seed);
            let opened = reveal_cell_with_rng(&state, 3, 3, &mut rng);
            let solved = auto_calc(&opened);
            assert_eq!(auto_calc(&solved), solved, "seed {seed}");
        }
    }

    #[test]
    fn auto_calc_never_detonates() {
        // Soundness end to end: the solver must not reveal a mine, on any
        // seed.
        let settings = GameSettings {
            rows: 8,
            cols: 8,
            mines: 12,
            safe_first_click: true,
        };
        for seed in 0..60 {
            let state = initialize_game(&settings).unwrap();
            let mut rng = MineRng::seeded(seed);
            let opened = reveal_cell_with_rng(&state, 4, 4, &mut rng);
            let solved = auto_calc(&opened);
            assert_ne!(solved.status, GameStatus::Lost, "seed {seed}");
        }
    }

    #[test]
    fn auto_flag_saturates_counter_after_player_overflagging() {
        // The player wasted the whole counter on a wrong flag far from the
        // action; solver flags still land, the counter just stays at zero.
        let mut b = board::with_mines(4, 4, &[(0, 0)]);
        let open: Vec<(usize, usize)> = (0..4)
            .flat_map(|r| (0..4).map(move |c| (r, c)))
            .filter(|&p| p != (0, 0) && p != (3, 3))
            .collect();
        reveal_raw(&mut b, &open);
        let mut state = playing_state(b, 1);
        state = toggle_flag(&state, 3, 3);
        assert_eq!(state.mines_remaining, 0);

        let next = auto_flag_certain_mines(&state);
        assert_eq!(next.board.get(0, 0).unwrap().state, CellState::AutoFlagged);
        assert_eq!(next.mines_remaining, 0);
    }

    #[test]
    fn solver_flags_are_distinct_but_removable_like_player_flags() {
        let state = corner_mine_state(&[(2, 2), (2, 3), (3, 2), (3, 3)]);
        let flagged = auto_flag_certain_mines(&state);
        assert_eq!(flagged.board.get(0, 0).unwrap().state, CellState::AutoFlagged);
        let unflagged = toggle_flag(&flagged, 0, 0);
        assert_eq!(unflagged.board.get(0, 0).unwrap().state, CellState::Hidden);
        assert_eq!(unflagged.mines_remaining, 1);
    }
}
