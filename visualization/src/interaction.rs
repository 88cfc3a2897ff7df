//! Event dispatch, tooltip model, and debounced resize
//!
//! All user input funnels through one [`InteractionController`] that looks
//! events up against the current scene by stable identifier; there is no
//! per-element handler state. Every mutation path ends by re-deriving the
//! control enablement and, where the visuals changed, rebuilding the scene.
//!
//! The whole layer is single-threaded and synchronous. The only temporal
//! wrinkle is the resize debounce: a resize notification replaces any
//! pending recomputation for the burst, and [`InteractionController::poll`]
//! fires at most one rebuild once the burst goes quiet. Time is injected
//! as a plain [`Duration`] since session start, so tests drive the clock
//! directly.

use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

use flowgrid_core::controls::ControlState;
use flowgrid_core::matrix::TransitionMatrix;
use flowgrid_core::selection::SelectionModel;

use crate::geometry::Viewport;
use crate::scene::{CellId, HeatmapConfig, Scene, SceneBuilder};

/// Discrete user-input events, each handled to completion before the next.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer moved to an outer-viewport position.
    PointerMove { x: f64, y: f64 },

    /// Pointer left the chart.
    PointerLeave,

    /// Tap/click at an outer-viewport position (touch tooltip path).
    Tap { x: f64, y: f64 },

    /// Tap/click on an axis label carrying its state name.
    LabelTap { state: String },

    /// "Filter to selected" control pressed.
    FilterPressed,

    /// "Clear filter" control pressed.
    ClearPressed,

    /// Viewport resize notification (debounced).
    Resize { width: f64, height: f64 },
}

/// Tooltip content and anchor, in outer-viewport coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tooltip {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

impl Tooltip {
    fn for_cell(origin: &str, destination: &str, value: f64, pointer_x: f64, pointer_y: f64) -> Self {
        Self {
            text: format!(
                "From: {}\nTo: {}\nProbability: {:.2}%",
                origin,
                destination,
                value * 100.0
            ),
            x: pointer_x + 10.0,
            y: pointer_y - 10.0,
        }
    }
}

/// What changed while handling one event.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Update {
    /// The scene was rebuilt and should be redrawn.
    pub scene_rebuilt: bool,

    /// The tooltip appeared, moved, or disappeared.
    pub tooltip_changed: bool,

    /// Control enablement after the event.
    pub controls: ControlState,
}

/// Cancel-and-replace debounce for resize recomputation.
///
/// `notify` schedules a deferred recomputation, replacing any pending one
/// for the same burst; `poll` releases it once the deadline passes.
/// Cancellation is replacement only: nothing ever starts twice, so there
/// is no cleanup or rollback.
#[derive(Debug, Clone)]
pub struct ResizeDebouncer {
    delay: Duration,
    pending: Option<(Duration, Viewport)>,
}

impl ResizeDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Schedules a recomputation for `delay` after `now`, replacing any
    /// earlier pending one.
    pub fn notify(&mut self, now: Duration, viewport: Viewport) {
        self.pending = Some((now + self.delay, viewport));
    }

    /// Releases the pending viewport once its deadline has passed.
    pub fn poll(&mut self, now: Duration) -> Option<Viewport> {
        match self.pending {
            Some((deadline, viewport)) if now >= deadline => {
                self.pending = None;
                Some(viewport)
            }
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Default for ResizeDebouncer {
    fn default() -> Self {
        Self::new(Duration::from_millis(150))
    }
}

/// Single dispatcher owning the selection model, the rendered domain, and
/// the current scene.
///
/// The rendered domain is captured from filter/clear results, so toggling
/// while filtered updates emphasis immediately but leaves the grid subset
/// untouched until the filter is applied again.
#[derive(Debug)]
pub struct InteractionController {
    matrix: TransitionMatrix,
    model: SelectionModel,
    builder: SceneBuilder,
    domain: Vec<String>,
    scene: Scene,
    controls: ControlState,
    tooltip: Option<Tooltip>,
    debouncer: ResizeDebouncer,
}

impl InteractionController {
    /// Starts a session: empty selection, full domain, initial scene.
    pub fn new(matrix: TransitionMatrix, config: HeatmapConfig) -> Self {
        let model = SelectionModel::new();
        let builder = SceneBuilder::new(config);
        let domain = matrix.states().to_vec();
        let scene = builder.build(&matrix, &model, &domain, false);
        let controls = ControlState::derive(&model);
        Self {
            matrix,
            model,
            builder,
            domain,
            scene,
            controls,
            tooltip: None,
            debouncer: ResizeDebouncer::default(),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn controls(&self) -> ControlState {
        self.controls
    }

    pub fn model(&self) -> &SelectionModel {
        &self.model
    }

    /// Currently rendered state domain.
    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    /// Handles one input event to completion.
    pub fn handle(&mut self, event: InputEvent, now: Duration) -> Update {
        match event {
            InputEvent::PointerMove { x, y } | InputEvent::Tap { x, y } => self.point_at(x, y),
            InputEvent::PointerLeave => self.hide_tooltip(),
            InputEvent::LabelTap { state } => self.toggle(&state),
            InputEvent::FilterPressed => self.filter(),
            InputEvent::ClearPressed => self.clear(),
            InputEvent::Resize { width, height } => {
                self.debouncer.notify(now, Viewport { width, height });
                self.update(false, false)
            }
        }
    }

    /// Releases a pending debounced resize, rebuilding at most once per
    /// quiescent period.
    pub fn poll(&mut self, now: Duration) -> Update {
        match self.debouncer.poll(now) {
            Some(viewport) => {
                self.builder.set_viewport(viewport);
                self.rebuild(false);
                self.update(true, false)
            }
            None => self.update(false, false),
        }
    }

    fn point_at(&mut self, x: f64, y: f64) -> Update {
        let margins = self.builder.config().margins;
        let geometry = self.builder.geometry(&self.domain);

        let hit = geometry
            .hit_test(x - margins.left, y - margins.top)
            .map(|(origin, destination)| (origin.to_owned(), destination.to_owned()));

        let tooltip = hit.and_then(|(origin, destination)| {
            let id = CellId(
                self.matrix.origins().iter().position(|o| *o == origin)?,
                self.matrix.state_position(&destination)?,
            );
            let cell = self.scene.cells.iter().find(|c| c.id == id)?;
            Some(Tooltip::for_cell(&cell.origin, &cell.destination, cell.value, x, y))
        });

        let changed = tooltip != self.tooltip;
        self.tooltip = tooltip;
        self.update(false, changed)
    }

    fn hide_tooltip(&mut self) -> Update {
        let changed = self.tooltip.take().is_some();
        self.update(false, changed)
    }

    fn toggle(&mut self, state: &str) -> Update {
        self.model.toggle(state);
        // Emphasis changed; the rendered domain did not.
        self.rebuild(false);
        self.update(true, false)
    }

    fn filter(&mut self) -> Update {
        if !self.controls.filter_enabled {
            debug!("filter press ignored: control disabled");
            return self.update(false, false);
        }
        if let Some(view) = self.model.apply_filter(&self.matrix) {
            self.domain = view.domain;
            self.rebuild(true);
            let tooltip_hidden = self.tooltip.take().is_some();
            return self.update(true, tooltip_hidden);
        }
        self.update(false, false)
    }

    fn clear(&mut self) -> Update {
        if !self.controls.clear_enabled {
            debug!("clear press ignored: control disabled");
            return self.update(false, false);
        }
        let view = self.model.clear_filter(&self.matrix);
        self.domain = view.domain;
        self.rebuild(true);
        let tooltip_hidden = self.tooltip.take().is_some();
        self.update(true, tooltip_hidden)
    }

    fn rebuild(&mut self, animated: bool) {
        self.scene = self.builder.build(&self.matrix, &self.model, &self.domain, animated);
    }

    fn update(&mut self, scene_rebuilt: bool, tooltip_changed: bool) -> Update {
        self.controls = ControlState::derive(&self.model);
        Update {
            scene_rebuilt,
            tooltip_changed,
            controls: self.controls,
        }
    }
}
