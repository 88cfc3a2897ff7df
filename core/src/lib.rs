//! Flowgrid core: transition-matrix data model and selection state machine
//!
//! This crate holds the non-visual heart of Flowgrid: an immutable
//! [`matrix::TransitionMatrix`] loaded from a record-of-objects table, the
//! [`selection::SelectionModel`] governing which states are highlighted or
//! filtered, and the [`controls::ControlState`] derived for UI affordances.
//!
//! Rendering, geometry, and event dispatch live in the companion
//! `flowgrid-visualization` crate; everything here is pure, synchronous,
//! and free of any drawing-surface dependency.

pub mod controls;
pub mod matrix;
pub mod selection;

pub use controls::ControlState;
pub use matrix::{Cell, MatrixError, MatrixResult, TransitionMatrix, TransitionRow};
pub use selection::{Emphasis, FilteredView, FullView, SelectionModel, ViewMode};
