//! Flowgrid visualization: geometry, color, scene assembly, and rendering
//!
//! Turns the declarative outputs of `flowgrid-core` into drawable facts and
//! finally into an SVG document:
//!
//! - [`geometry`] maps an ordered state domain to pixel bands (d3-style
//!   band scales behind a [`geometry::GeometryProvider`] seam).
//! - [`color`] maps probabilities in [0, 1] to gradient colors.
//! - [`scene`] combines matrix, selection, geometry, and color into
//!   [`scene::CellVisual`] / [`scene::LabelVisual`] facts.
//! - [`interaction`] dispatches pointer/tap/control/resize events through a
//!   single id-keyed controller, with tooltip and debounced-resize models.
//! - [`render`] consumes a scene through the [`render::RenderDriver`] seam;
//!   [`render::SvgRenderer`] is the shipped driver.

pub mod color;
pub mod geometry;
pub mod interaction;
pub mod render;
pub mod scene;

pub use color::SequentialScale;
pub use geometry::{BandScale, GeometryProvider, GridGeometry, Margins, Viewport};
pub use interaction::{InputEvent, InteractionController, ResizeDebouncer, Tooltip, Update};
pub use render::{RenderDriver, RenderError, SvgRenderer};
pub use scene::{CellVisual, HeatmapConfig, LabelVisual, Scene, SceneBuilder};
