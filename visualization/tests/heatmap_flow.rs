//! Full pipeline exercise: JSON table -> controller -> filtered SVG.

use std::time::Duration;

use flowgrid_core::matrix::TransitionMatrix;
use flowgrid_visualization::render::{RenderDriver, SvgRenderer};
use flowgrid_visualization::scene::HeatmapConfig;
use flowgrid_visualization::{InputEvent, InteractionController};

const TABLE: &str = r#"[
    {"From": "A", "A": 0.5, "B": 0.5},
    {"From": "B", "A": 0.1, "B": 0.9}
]"#;

fn at(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

#[test]
fn select_filter_render_clear() {
    let matrix = TransitionMatrix::from_json(TABLE).unwrap();
    let mut controller = InteractionController::new(matrix, HeatmapConfig::default());
    let mut renderer = SvgRenderer::new();

    // Initial frame: all four cells, nothing dimmed.
    let svg = renderer.render(controller.scene()).unwrap();
    assert_eq!(svg.matches(r#"class="cell""#).count(), 4);

    // Select A via its label, then filter.
    controller.handle(
        InputEvent::LabelTap {
            state: "A".to_owned(),
        },
        at(0),
    );
    let update = controller.handle(InputEvent::FilterPressed, at(10));
    assert!(update.scene_rebuilt);
    assert_eq!(controller.domain(), ["A".to_string()]);

    let svg = renderer.render(controller.scene()).unwrap();
    assert_eq!(svg.matches(r#"class="cell""#).count(), 1);

    // Hovering the sole remaining cell produces the formatted tooltip.
    let viewport = controller.scene().viewport;
    let center_x = viewport.width / 2.0;
    let center_y = viewport.height / 2.0;
    controller.handle(
        InputEvent::PointerMove {
            x: center_x,
            y: center_y,
        },
        at(20),
    );
    let tooltip = controller.tooltip().unwrap();
    assert_eq!(tooltip.text, "From: A\nTo: A\nProbability: 50.00%");

    // A resize burst settles into exactly one recomputation.
    controller.handle(
        InputEvent::Resize {
            width: 500.0,
            height: 500.0,
        },
        at(30),
    );
    controller.handle(
        InputEvent::Resize {
            width: 640.0,
            height: 480.0,
        },
        at(60),
    );
    assert!(!controller.poll(at(100)).scene_rebuilt);
    assert!(controller.poll(at(300)).scene_rebuilt);
    assert_eq!(controller.scene().viewport.width, 640.0);
    assert!(!controller.poll(at(400)).scene_rebuilt);

    // Clearing restores all four cells and empties the selection.
    let update = controller.handle(InputEvent::ClearPressed, at(500));
    assert!(update.scene_rebuilt);
    assert!(controller.model().selected().is_empty());

    let svg = renderer.render(controller.scene()).unwrap();
    assert_eq!(svg.matches(r#"class="cell""#).count(), 4);
}
