//! Selection and filter state machine
//!
//! The one genuinely stateful component of Flowgrid. A [`SelectionModel`]
//! owns the set of user-selected states and a two-state view mode:
//!
//! ```text
//! UNFILTERED --apply_filter (selection non-empty)--> FILTERED
//! FILTERED   --clear_filter---------------------->  UNFILTERED
//! ```
//!
//! `toggle` is permitted in either mode and never changes the mode itself;
//! a changed selection only takes visual effect in the filtered grid once
//! `apply_filter` runs again. All operations are total: they act on
//! in-memory sets, perform no I/O, and cannot fail. Unknown state names may
//! enter the selection freely; they match no cell or label and are inert.

use std::collections::HashSet;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::matrix::TransitionMatrix;

/// Whether the grid is showing the full state set or a filtered subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewMode {
    /// Full state set rendered.
    #[default]
    Unfiltered,

    /// Rendering restricted to the subset captured at the last
    /// `apply_filter`.
    Filtered,
}

/// Per-cell and per-label emphasis flags for the current selection.
///
/// A cell is dimmed iff the selection is non-empty and neither of its
/// endpoints is selected; a label is emphasized iff its state is selected.
/// Pure function of the selection; recompute after every toggle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emphasis {
    /// Row-major (origins x states) dimmed flags.
    cell_dimmed: Vec<bool>,

    /// Emphasized flags in state-set order.
    label_emphasized: Vec<bool>,

    cols: usize,
}

impl Emphasis {
    /// Dimmed flag for the cell at (row, col).
    pub fn cell_dimmed(&self, row: usize, col: usize) -> bool {
        self.cell_dimmed.get(row * self.cols + col).copied().unwrap_or(false)
    }

    /// Emphasis flag for the label at a state-set position.
    pub fn label_emphasized(&self, position: usize) -> bool {
        self.label_emphasized.get(position).copied().unwrap_or(false)
    }
}

/// One cell of a filtered view with its visibility verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredCell {
    /// Origin state name.
    pub origin: String,

    /// Destination state name.
    pub destination: String,

    /// Transition probability.
    pub value: f64,

    /// Visible iff both endpoints belong to the filtered subset.
    pub visible: bool,

    /// (row, col) position within the filtered domain, for visible cells.
    pub grid: Option<(usize, usize)>,
}

/// Result of `apply_filter`: the kept domain and every cell's visibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredView {
    /// States to keep, in state-set display order.
    pub domain: Vec<String>,

    /// Every matrix cell with its visibility and filtered grid position.
    pub cells: Vec<FilteredCell>,
}

/// Result of `clear_filter`: the full state set, everything visible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullView {
    /// The full session state set.
    pub domain: Vec<String>,
}

/// Owned selection state, mutated only by explicit user actions.
///
/// Created empty at session start; never persisted.
#[derive(Debug, Clone, Default)]
pub struct SelectionModel {
    selected: HashSet<String>,
    mode: ViewMode,
}

impl SelectionModel {
    /// Empty selection, unfiltered view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected state names.
    pub fn selected(&self) -> &HashSet<String> {
        &self.selected
    }

    /// Membership test for a single state.
    pub fn is_selected(&self, state: &str) -> bool {
        self.selected.contains(state)
    }

    /// Current view mode.
    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// True while the view is restricted to a filtered subset.
    pub fn is_filtered(&self) -> bool {
        self.mode == ViewMode::Filtered
    }

    /// Flips membership of `state` in the selection.
    ///
    /// No cardinality constraint and no name validation: toggling a name
    /// outside the state set is accepted and simply matches nothing.
    /// Never touches the view mode.
    pub fn toggle(&mut self, state: &str) {
        if !self.selected.remove(state) {
            self.selected.insert(state.to_owned());
        }
        debug!("toggled '{}', {} selected", state, self.selected.len());
    }

    /// Computes dimmed/emphasized flags for every cell and label.
    pub fn emphasis(&self, matrix: &TransitionMatrix) -> Emphasis {
        let cols = matrix.state_count();
        let any_selected = !self.selected.is_empty();

        let cell_dimmed = matrix
            .cells()
            .map(|cell| {
                any_selected
                    && !self.selected.contains(cell.origin)
                    && !self.selected.contains(cell.destination)
            })
            .collect();

        let label_emphasized = matrix
            .states()
            .iter()
            .map(|state| self.selected.contains(state.as_str()))
            .collect();

        Emphasis {
            cell_dimmed,
            label_emphasized,
            cols,
        }
    }

    /// Restricts the view to the selected subset.
    ///
    /// No-op returning `None` while the selection is empty (the view mode
    /// stays unfiltered). Otherwise enters `Filtered` and reports, for
    /// every cell, whether it survives (both endpoints selected) and its
    /// position in a grid rebuilt over the kept domain. The domain keeps
    /// state-set order; selected names outside the state set contribute
    /// nothing to it.
    pub fn apply_filter(&mut self, matrix: &TransitionMatrix) -> Option<FilteredView> {
        if self.selected.is_empty() {
            debug!("apply_filter ignored: empty selection");
            return None;
        }

        self.mode = ViewMode::Filtered;

        let domain: Vec<String> = matrix
            .states()
            .iter()
            .filter(|s| self.selected.contains(s.as_str()))
            .cloned()
            .collect();

        let position = |state: &str| domain.iter().position(|s| s.as_str() == state);

        let cells = matrix
            .cells()
            .map(|cell| {
                let row = position(cell.origin);
                let col = position(cell.destination);
                let grid = row.zip(col);
                FilteredCell {
                    origin: cell.origin.to_owned(),
                    destination: cell.destination.to_owned(),
                    value: cell.value,
                    visible: grid.is_some(),
                    grid,
                }
            })
            .collect();

        debug!("filter applied: {} of {} states kept", domain.len(), matrix.state_count());
        Some(FilteredView { domain, cells })
    }

    /// Returns to the unfiltered view and empties the selection.
    ///
    /// The coupling (clearing the filter also clears the selection) is
    /// deliberate: it keeps the filter control disabled until the user
    /// builds a fresh selection. Idempotent.
    pub fn clear_filter(&mut self, matrix: &TransitionMatrix) -> FullView {
        self.mode = ViewMode::Unfiltered;
        self.selected.clear();
        debug!("filter cleared");
        FullView {
            domain: matrix.states().to_vec(),
        }
    }
}
