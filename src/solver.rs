//! Constraint collection and the deduction engine.
//!
//! A revealed numbered cell asserts "exactly N of these K hidden neighbors
//! are mines". This module derives those constraints from a board and runs
//! three inference rules over them:
//!
//! 1. single-constraint saturation (all-mines / all-safe),
//! 2. pairwise subset differencing,
//! 3. triple combination over a shared three-way intersection.
//!
//! The engine is a pure function from a board to forced-safe / forced-mine
//! coordinate sets; it never mutates anything. It is also intentionally
//! incomplete: it proves only what these rules can prove, not arbitrary
//! constraint satisfaction.

use std::collections::HashSet;

use itertools::Itertools;
use log::trace;

use crate::types::{Board, CellState};

pub type Coord = (usize, usize);

// ─── Constraint collection ──────────────────────────────────────────────────

/// One revealed numbered cell's statement about its hidden neighborhood.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Constraint {
    pub anchor: Coord,
    pub hidden: HashSet<Coord>,
    pub remaining_mines: i32,
}

/// Derive the current constraint set, scanning anchors in row-major order.
///
/// Anchors with no hidden neighbors carry no information and are skipped, as
/// are anchors whose neighborhood the player has over-flagged (negative
/// remainder).
pub fn collect_constraints(board: &Board) -> Vec<Constraint> {
    let mut constraints = Vec::new();
    for cell in &board.cells {
        if cell.state != CellState::Revealed || cell.adjacent_mines == 0 {
            continue;
        }

        let mut hidden = HashSet::new();
        let mut flagged = 0i32;
        for (nr, nc) in board.neighbors(cell.row, cell.col) {
            match board.cells[nr * board.cols + nc].state {
                s if s.is_flag() => flagged += 1,
                CellState::Hidden => {
                    hidden.insert((nr, nc));
                }
                _ => {}
            }
        }

        if hidden.is_empty() {
            continue;
        }
        let remaining_mines = cell.adjacent_mines as i32 - flagged;
        if remaining_mines < 0 {
            continue;
        }
        constraints.push(Constraint {
            anchor: (cell.row, cell.col),
            hidden,
            remaining_mines,
        });
    }
    constraints
}

// ─── Deductions ─────────────────────────────────────────────────────────────

/// Cells the rules could classify. Both sets are deduplicated by coordinate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Deductions {
    pub safe: HashSet<Coord>,
    pub mines: HashSet<Coord>,
}

impl Deductions {
    pub fn is_empty(&self) -> bool {
        self.safe.is_empty() && self.mines.is_empty()
    }
}

/// Rule 1 only. This is the "local" tier the partial auto-play variants use.
pub fn deduce_local(constraints: &[Constraint]) -> Deductions {
    let mut out = Deductions::default();
    single_rule(constraints, &mut out);
    out
}

/// Pairwise subset and triple combination, without the local tier.
pub fn deduce_paired(constraints: &[Constraint]) -> Deductions {
    let mut out = Deductions::default();
    subset_rule(constraints, &mut out);
    triple_rule(constraints, &mut out);
    out
}

/// All three rules.
pub fn deduce(constraints: &[Constraint]) -> Deductions {
    let mut out = Deductions::default();
    single_rule(constraints, &mut out);
    subset_rule(constraints, &mut out);
    triple_rule(constraints, &mut out);
    out
}

// ─── Rule 1: single constraint ──────────────────────────────────────────────

fn single_rule(constraints: &[Constraint], out: &mut Deductions) {
    for c in constraints {
        if c.remaining_mines == 0 {
            trace!("anchor {:?}: all hidden neighbors safe", c.anchor);
            out.safe.extend(&c.hidden);
        } else if c.remaining_mines as usize == c.hidden.len() {
            trace!("anchor {:?}: all hidden neighbors mined", c.anchor);
            out.mines.extend(&c.hidden);
        }
    }
}

// ─── Rule 2: pairwise subset ────────────────────────────────────────────────

fn subset_rule(constraints: &[Constraint], out: &mut Deductions) {
    for (a, b) in constraints.iter().tuple_combinations() {
        subset_deduce(a, b, out);
        subset_deduce(b, a, out);
    }
}

/// If `a.hidden` is a strict subset of `b.hidden`, the cells only `b` sees
/// must hold exactly `b.remaining − a.remaining` mines.
fn subset_deduce(a: &Constraint, b: &Constraint, out: &mut Deductions) {
    if a.hidden.len() >= b.hidden.len() || !a.hidden.is_subset(&b.hidden) {
        return;
    }
    let mine_diff = b.remaining_mines - a.remaining_mines;
    let diff: Vec<Coord> = b.hidden.difference(&a.hidden).copied().collect();

    if mine_diff == 0 {
        trace!("subset {:?} ⊂ {:?}: {} cells safe", a.anchor, b.anchor, diff.len());
        out.safe.extend(diff);
    } else if mine_diff > 0 && mine_diff as usize == diff.len() {
        trace!("subset {:?} ⊂ {:?}: {} cells mined", a.anchor, b.anchor, diff.len());
        out.mines.extend(diff);
    }
}

// ─── Rule 3: triple combination ─────────────────────────────────────────────

fn triple_rule(constraints: &[Constraint], out: &mut Deductions) {
    for (a, b, c) in constraints.iter().tuple_combinations() {
        triple_deduce([a, b, c], out);
    }
}

/// Three constraints whose hidden sets split into a shared three-way center
/// plus three disjoint arms. When two of the arms are empty, the collapsed
/// constraints both describe the center alone; if each of them claims a
/// single remaining mine, the center is treated as holding exactly one mine
/// and the third constraint's arm is classified against the rest of its
/// count. Firing on any looser overlap would risk an unsound conclusion, so
/// anything else is left to the other rules.
fn triple_deduce(trio: [&Constraint; 3], out: &mut Deductions) {
    let [a, b, c] = trio;
    let center: HashSet<Coord> = a
        .hidden
        .iter()
        .filter(|cell| b.hidden.contains(cell) && c.hidden.contains(cell))
        .copied()
        .collect();
    if center.is_empty() {
        return;
    }

    let arms: Vec<HashSet<Coord>> = trio
        .iter()
        .map(|con| con.hidden.difference(&center).copied().collect())
        .collect();

    // The split must be a true partition: arms may not overlap each other.
    for (x, y) in arms.iter().tuple_combinations() {
        if !x.is_disjoint(y) {
            return;
        }
    }

    let empty: Vec<usize> = (0..3).filter(|&i| arms[i].is_empty()).collect();
    if empty.len() != 2 {
        return;
    }
    let armed = (0..3).find(|i| !empty.contains(i)).unwrap_or(0);

    // Both collapsed constraints cover exactly the center; the single-mine
    // assumption is usable only when they agree on that count.
    if empty.iter().any(|&i| trio[i].remaining_mines != 1) {
        return;
    }

    let arm = &arms[armed];
    let arm_mines = trio[armed].remaining_mines - 1;
    if arm_mines == 0 {
        trace!(
            "triple {:?}/{:?}/{:?}: arm of {:?} safe",
            a.anchor, b.anchor, c.anchor, trio[armed].anchor
        );
        out.safe.extend(arm.iter().copied());
    } else if arm_mines > 0 && arm_mines as usize == arm.len() {
        trace!(
            "triple {:?}/{:?}/{:?}: arm of {:?} mined",
            a.anchor, b.anchor, c.anchor, trio[armed].anchor
        );
        out.mines.extend(arm.iter().copied());
    }
}
