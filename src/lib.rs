//! Minesweeper engine for the browser games collection.
//!
//! The JavaScript shell owns rendering, routing, and settings; this crate
//! owns the rules: board generation with deferred mine placement, the
//! reveal/flag state machine with worklist flood fill, and the
//! automatic-deduction solver that classifies hidden cells from the revealed
//! numbers. Every operation takes a game state and returns a new one, and
//! states cross the wasm boundary as plain objects via serde.

pub mod autoplay;
pub mod board;
pub mod game;
pub mod rng;
pub mod solver;
pub mod types;

pub use autoplay::{
    auto_calc, auto_flag_certain_mines, flag_one_certain_mine, open_all_certain_empty_cells,
    open_one_certain_empty_cell,
};
pub use game::{initialize_game, reveal_cell, toggle_flag};
pub use types::{Board, Cell, CellState, GameSettings, GameState, GameStatus};

// ─── WASM exports (only compiled for the wasm32 target) ─────────────────────

#[cfg(target_arch = "wasm32")]
mod wasm_exports {
    use wasm_bindgen::prelude::*;

    use crate::types::{GameSettings, GameState};
    use crate::{autoplay, game};

    fn state_in(value: JsValue) -> Result<GameState, JsValue> {
        Ok(serde_wasm_bindgen::from_value(value)?)
    }

    fn state_out(state: &GameState) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(state)?)
    }

    /// Create a fresh game from host-supplied settings.
    #[wasm_bindgen(js_name = "initializeGame")]
    pub fn wasm_initialize_game(settings: JsValue) -> Result<JsValue, JsValue> {
        let settings: GameSettings = serde_wasm_bindgen::from_value(settings)?;
        let state = game::initialize_game(&settings)
            .map_err(|e| JsValue::from(JsError::new(&e.to_string())))?;
        state_out(&state)
    }

    #[wasm_bindgen(js_name = "revealCell")]
    pub fn wasm_reveal_cell(state: JsValue, row: usize, col: usize) -> Result<JsValue, JsValue> {
        state_out(&game::reveal_cell(&state_in(state)?, row, col))
    }

    #[wasm_bindgen(js_name = "toggleFlag")]
    pub fn wasm_toggle_flag(state: JsValue, row: usize, col: usize) -> Result<JsValue, JsValue> {
        state_out(&game::toggle_flag(&state_in(state)?, row, col))
    }

    /// Run the solver to its fixed point.
    #[wasm_bindgen(js_name = "autoCalc")]
    pub fn wasm_auto_calc(state: JsValue) -> Result<JsValue, JsValue> {
        state_out(&autoplay::auto_calc(&state_in(state)?))
    }

    #[wasm_bindgen(js_name = "autoFlagCertainMines")]
    pub fn wasm_auto_flag_certain_mines(state: JsValue) -> Result<JsValue, JsValue> {
        state_out(&autoplay::auto_flag_certain_mines(&state_in(state)?))
    }

    #[wasm_bindgen(js_name = "flagOneCertainMine")]
    pub fn wasm_flag_one_certain_mine(state: JsValue) -> Result<JsValue, JsValue> {
        state_out(&autoplay::flag_one_certain_mine(&state_in(state)?))
    }

    #[wasm_bindgen(js_name = "openOneCertainEmptyCell")]
    pub fn wasm_open_one_certain_empty_cell(state: JsValue) -> Result<JsValue, JsValue> {
        state_out(&autoplay::open_one_certain_empty_cell(&state_in(state)?))
    }

    #[wasm_bindgen(js_name = "openAllCertainEmptyCells")]
    pub fn wasm_open_all_certain_empty_cells(state: JsValue) -> Result<JsValue, JsValue> {
        state_out(&autoplay::open_all_certain_empty_cells(&state_in(state)?))
    }

    /// Lets the host verify the module loaded.
    #[wasm_bindgen(js_name = "ping")]
    pub fn wasm_ping() -> String {
        "minesweeper engine ready".to_string()
    }
}
