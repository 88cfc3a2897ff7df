//! End-to-end exercise of the selection/filter lifecycle over a small
//! two-state transition table.

use flowgrid_core::{ControlState, SelectionModel, TransitionMatrix};

fn two_states() -> TransitionMatrix {
    TransitionMatrix::from_json(
        r#"[
            {"From": "A", "A": 0.5, "B": 0.5},
            {"From": "B", "A": 0.1, "B": 0.9}
        ]"#,
    )
    .unwrap()
}

#[test]
fn filter_then_clear_round_trip() {
    let matrix = two_states();
    let mut model = SelectionModel::new();

    // Select A; the filter control becomes available.
    model.toggle("A");
    assert_eq!(model.selected().len(), 1);
    assert!(ControlState::derive(&model).filter_enabled);

    // Filtering restricts the domain to [A]; only (A, A) survives.
    let filtered = model.apply_filter(&matrix).unwrap();
    assert_eq!(filtered.domain, ["A".to_string()]);

    let visible: Vec<_> = filtered.cells.iter().filter(|c| c.visible).collect();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].origin, "A");
    assert_eq!(visible[0].destination, "A");
    assert_eq!(visible[0].value, 0.5);
    assert_eq!(visible[0].grid, Some((0, 0)));

    let hidden: Vec<_> = filtered
        .cells
        .iter()
        .filter(|c| !c.visible)
        .map(|c| (c.origin.as_str(), c.destination.as_str()))
        .collect();
    assert_eq!(hidden, vec![("A", "B"), ("B", "A"), ("B", "B")]);

    let controls = ControlState::derive(&model);
    assert!(!controls.filter_enabled);
    assert!(controls.clear_enabled);

    // Clearing restores the full domain and empties the selection.
    let full = model.clear_filter(&matrix);
    assert_eq!(full.domain, ["A".to_string(), "B".to_string()]);
    assert!(model.selected().is_empty());
    assert!(!model.is_filtered());
    assert_eq!(ControlState::derive(&model), ControlState::default());
}

#[test]
fn toggle_replay_matches_symmetric_difference() {
    let mut model = SelectionModel::new();
    let replay = ["A", "B", "B", "A", "A"];
    for name in replay {
        model.toggle(name);
    }
    // A appears three times (in), B twice (out).
    assert!(model.is_selected("A"));
    assert!(!model.is_selected("B"));
    assert_eq!(model.selected().len(), 1);
}

#[test]
fn reapplying_the_filter_after_toggling_updates_the_domain() {
    let matrix = two_states();
    let mut model = SelectionModel::new();

    model.toggle("A");
    let first = model.apply_filter(&matrix).unwrap();
    assert_eq!(first.domain, ["A".to_string()]);

    // Widening the selection while filtered changes nothing until the
    // filter runs again.
    model.toggle("B");
    let second = model.apply_filter(&matrix).unwrap();
    assert_eq!(second.domain, ["A".to_string(), "B".to_string()]);
    assert!(second.cells.iter().all(|c| c.visible));
}
