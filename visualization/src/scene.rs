//! Declarative scene assembly
//!
//! A [`Scene`] is the full set of drawable facts for one frame of the
//! heatmap: positioned, colored cell rectangles and axis labels, each
//! carrying its emphasis state. Scenes are rebuilt wholesale after every
//! selection mutation, filter change, or (debounced) resize; drivers
//! consume them without ever seeing the selection model.
//!
//! Identifiers are positions in the *session* state set, so they stay
//! stable across filtering and resizing and can key event dispatch.

use log::debug;
use serde::{Deserialize, Serialize};

use flowgrid_core::matrix::TransitionMatrix;
use flowgrid_core::selection::SelectionModel;

use crate::color::{Rgba, SequentialScale};
use crate::geometry::{CellRect, GridGeometry, Margins, Viewport};

/// Which axis a label belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Destination axis (horizontal).
    X,
    /// Origin axis (vertical).
    Y,
}

/// Stable cell identifier: (origin, destination) positions in the session
/// state set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellId(pub usize, pub usize);

/// Stable label identifier: axis plus state position in the session state
/// set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LabelId {
    pub axis: Axis,
    pub state: usize,
}

/// Transition animation settings for filter/clear rebuilds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationSettings {
    /// Enable animated repositioning on view changes.
    pub enabled: bool,

    /// Transition duration in seconds.
    pub duration: f32,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            duration: 0.3,
        }
    }
}

/// Configuration for scene assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapConfig {
    /// Outer drawing box.
    pub viewport: Viewport,

    /// Margins reserved for axes and title.
    pub margins: Margins,

    /// Fractional band padding between cells.
    pub band_padding: f64,

    /// Probability-to-color scale.
    pub scale: SequentialScale,

    /// Opacity applied to dimmed cells.
    pub dim_opacity: f32,

    /// Chart title.
    pub title: String,

    /// Caption under the destination axis.
    pub x_caption: String,

    /// Caption beside the origin axis.
    pub y_caption: String,

    /// Transition animation settings.
    pub animation: AnimationSettings,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            margins: Margins::default(),
            band_padding: 0.01,
            scale: SequentialScale::default(),
            dim_opacity: 0.15,
            title: "Transition Probability Heatmap".to_owned(),
            x_caption: "Destination State".to_owned(),
            y_caption: "Origin State".to_owned(),
            animation: AnimationSettings::default(),
        }
    }
}

/// One drawable cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellVisual {
    pub id: CellId,
    pub origin: String,
    pub destination: String,
    pub value: f64,
    pub rect: CellRect,
    pub color: Rgba,
    pub dimmed: bool,
}

/// One drawable axis label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelVisual {
    pub id: LabelId,
    pub state: String,
    pub axis: Axis,
    /// Anchor point in content coordinates.
    pub x: f64,
    pub y: f64,
    pub emphasized: bool,
}

/// Drawable facts for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub viewport: Viewport,
    pub margins: Margins,
    pub cells: Vec<CellVisual>,
    pub labels: Vec<LabelVisual>,
    pub title: String,
    pub x_caption: String,
    pub y_caption: String,
    pub dim_opacity: f32,
    /// Hint that this rebuild follows a view change and may be animated.
    pub animated: bool,
}

/// Assembles scenes from matrix, selection, and configuration.
///
/// The rendered domain is passed in explicitly rather than derived from
/// the live selection: while filtered, the grid shows the subset captured
/// at the last `apply_filter`, not whatever has been toggled since.
#[derive(Debug, Clone, Default)]
pub struct SceneBuilder {
    config: HeatmapConfig,
}

impl SceneBuilder {
    pub fn new(config: HeatmapConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HeatmapConfig {
        &self.config
    }

    /// Updates the outer viewport (after a debounced resize).
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.config.viewport = viewport;
    }

    /// Geometry over a domain under the current viewport and margins.
    pub fn geometry(&self, domain: &[String]) -> GridGeometry {
        GridGeometry::layout(
            domain,
            self.config.viewport,
            self.config.margins,
            self.config.band_padding,
        )
    }

    /// Builds the scene for the given rendered domain.
    ///
    /// Cells with an endpoint outside the domain get no band and are
    /// omitted; emphasis is always derived from the live selection, so
    /// toggles show immediately even while filtered.
    pub fn build(
        &self,
        matrix: &TransitionMatrix,
        model: &SelectionModel,
        domain: &[String],
        animated: bool,
    ) -> Scene {
        let geometry = self.geometry(domain);
        let emphasis = model.emphasis(matrix);

        let cells: Vec<CellVisual> = matrix
            .cells()
            .filter_map(|cell| {
                let rect = geometry.cell_rect(cell.origin, cell.destination)?;
                Some(CellVisual {
                    id: CellId(cell.row, cell.col),
                    origin: cell.origin.to_owned(),
                    destination: cell.destination.to_owned(),
                    value: cell.value,
                    rect,
                    color: self.config.scale.color_for(cell.value),
                    dimmed: emphasis.cell_dimmed(cell.row, cell.col),
                })
            })
            .collect();

        let content_height = self.config.margins.content_height(self.config.viewport);
        let mut labels = Vec::with_capacity(domain.len() * 2);
        for state in domain {
            let Some(position) = matrix.state_position(state) else {
                continue;
            };
            let emphasized = emphasis.label_emphasized(position);
            if let Some(cx) = geometry.x().center(state) {
                labels.push(LabelVisual {
                    id: LabelId {
                        axis: Axis::X,
                        state: position,
                    },
                    state: state.clone(),
                    axis: Axis::X,
                    x: cx,
                    y: content_height + 12.0,
                    emphasized,
                });
            }
            if let Some(cy) = geometry.y().center(state) {
                labels.push(LabelVisual {
                    id: LabelId {
                        axis: Axis::Y,
                        state: position,
                    },
                    state: state.clone(),
                    axis: Axis::Y,
                    x: -8.0,
                    y: cy,
                    emphasized,
                });
            }
        }

        debug!(
            "scene rebuilt: {} cells, {} labels, domain {}",
            cells.len(),
            labels.len(),
            domain.len()
        );

        Scene {
            viewport: self.config.viewport,
            margins: self.config.margins,
            cells,
            labels,
            title: self.config.title.clone(),
            x_caption: self.config.x_caption.clone(),
            y_caption: self.config.y_caption.clone(),
            dim_opacity: self.config.dim_opacity,
            animated: animated && self.config.animation.enabled,
        }
    }
}
