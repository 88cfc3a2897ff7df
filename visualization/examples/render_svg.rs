//! Renders a small transition table to SVG on stdout, walking through a
//! select/filter/clear session.
//!
//! ```sh
//! RUST_LOG=debug cargo run --example render_svg > heatmap.svg
//! ```

use std::time::Duration;

use flowgrid_core::matrix::TransitionMatrix;
use flowgrid_visualization::render::{RenderDriver, SvgRenderer};
use flowgrid_visualization::scene::HeatmapConfig;
use flowgrid_visualization::{InputEvent, InteractionController};

const TABLE: &str = r#"[
    {"From": "CA", "CA": 0.82, "TX": 0.07, "NY": 0.06, "FL": 0.05},
    {"From": "TX", "CA": 0.05, "TX": 0.85, "NY": 0.04, "FL": 0.06},
    {"From": "NY", "CA": 0.08, "TX": 0.05, "NY": 0.77, "FL": 0.10},
    {"From": "FL", "CA": 0.04, "TX": 0.07, "NY": 0.08, "FL": 0.81}
]"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let matrix = TransitionMatrix::from_json(TABLE)?;
    let mut controller = InteractionController::new(matrix, HeatmapConfig::default());
    let mut renderer = SvgRenderer::new();

    // Narrow the view to CA and TX before rendering.
    for state in ["CA", "TX"] {
        controller.handle(
            InputEvent::LabelTap {
                state: state.to_owned(),
            },
            Duration::ZERO,
        );
    }
    controller.handle(InputEvent::FilterPressed, Duration::ZERO);

    print!("{}", renderer.render(controller.scene())?);
    Ok(())
}
