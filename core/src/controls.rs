//! Derived enablement for the two filter controls
//!
//! The only user-visible "failure" in the system is a disabled button.
//! Enablement is a pure function of the selection model and must be
//! re-derived after every mutation so the controls never drift from the
//! state they report on.

use serde::{Deserialize, Serialize};

use crate::selection::SelectionModel;

/// Enablement flags for the "filter to selected" and "clear filter"
/// controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControlState {
    /// "Filter to selected" is offered iff something is selected and the
    /// view is not already filtered.
    pub filter_enabled: bool,

    /// "Clear filter" is offered iff the view is currently filtered.
    pub clear_enabled: bool,
}

impl ControlState {
    /// Derives enablement from the current selection model.
    pub fn derive(model: &SelectionModel) -> Self {
        Self {
            filter_enabled: !model.selected().is_empty() && !model.is_filtered(),
            clear_enabled: model.is_filtered(),
        }
    }
}
