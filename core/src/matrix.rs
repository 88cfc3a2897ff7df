//! Immutable transition-matrix data model
//!
//! A transition table arrives as an ordered sequence of records, each with a
//! `From` field naming the origin state and one numeric field per destination
//! state. The ordered set of destination keys of the *first* record defines
//! the state set for the whole session; every later row must carry exactly
//! the same keys.
//!
//! Key order is significant (it fixes axis order downstream), so rows are
//! deserialized with a map visitor rather than into an unordered map.

use std::collections::HashMap;
use std::fmt;

use log::warn;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Field naming the origin state in the record form.
const ORIGIN_FIELD: &str = "From";

/// Errors raised while assembling a [`TransitionMatrix`].
#[derive(Debug, Error)]
pub enum MatrixError {
    /// The record sequence was empty; no state set can be derived.
    #[error("transition table is empty")]
    Empty,

    /// A row's destination keys differ from the state set of the first row.
    #[error("row '{origin}' does not match the destination set of the first row")]
    RaggedRow { origin: String },

    /// A probability was NaN or infinite.
    #[error("non-finite probability for ({origin} -> {destination})")]
    NonFiniteValue { origin: String, destination: String },

    /// The record form could not be parsed.
    #[error("malformed transition table: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for matrix construction.
pub type MatrixResult<T> = Result<T, MatrixError>;

/// One record of the transition table: an origin plus its ordered
/// destination probabilities.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionRow {
    /// Origin state name.
    pub origin: String,

    /// Destination probabilities in input key order.
    pub values: Vec<(String, f64)>,
}

impl Serialize for TransitionRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        map.serialize_entry(ORIGIN_FIELD, &self.origin)?;
        for (destination, value) in &self.values {
            map.serialize_entry(destination, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TransitionRow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RowVisitor;

        impl<'de> Visitor<'de> for RowVisitor {
            type Value = TransitionRow;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map with a 'From' field and numeric destination fields")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut origin: Option<String> = None;
                let mut values = Vec::new();

                while let Some(key) = map.next_key::<String>()? {
                    if key == ORIGIN_FIELD {
                        if origin.is_some() {
                            return Err(de::Error::duplicate_field(ORIGIN_FIELD));
                        }
                        origin = Some(map.next_value()?);
                    } else {
                        values.push((key, map.next_value::<f64>()?));
                    }
                }

                let origin = origin.ok_or_else(|| de::Error::missing_field(ORIGIN_FIELD))?;
                Ok(TransitionRow { origin, values })
            }
        }

        deserializer.deserialize_map(RowVisitor)
    }
}

/// One logical (origin, destination, probability) entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell<'a> {
    /// Origin state name.
    pub origin: &'a str,

    /// Destination state name.
    pub destination: &'a str,

    /// Transition probability, expected (not enforced) to lie in [0, 1].
    pub value: f64,

    /// Origin position in row order.
    pub row: usize,

    /// Destination position in state-set order.
    pub col: usize,
}

/// The loaded transition table, validated and frozen.
///
/// Values are stored row-major, aligned to the state set derived from the
/// first input row, so lookups by index are O(1) and iteration order is
/// deterministic.
#[derive(Debug, Clone)]
pub struct TransitionMatrix {
    origins: Vec<String>,
    states: Vec<String>,
    values: Vec<Vec<f64>>,
    state_index: HashMap<String, usize>,
    origin_index: HashMap<String, usize>,
}

impl TransitionMatrix {
    /// Builds a matrix from pre-parsed rows.
    ///
    /// The destination-key set of the first row becomes the session state
    /// set. Rows with a different key set are rejected, as are non-finite
    /// values. Probabilities outside [0, 1] are accepted with a warning;
    /// the squareness of the matrix (origins == destinations) is assumed
    /// and not checked.
    pub fn from_rows(rows: Vec<TransitionRow>) -> MatrixResult<Self> {
        let first = rows.first().ok_or(MatrixError::Empty)?;

        let states: Vec<String> = first.values.iter().map(|(k, _)| k.clone()).collect();
        let state_index: HashMap<String, usize> = states
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), i))
            .collect();

        let mut origins = Vec::with_capacity(rows.len());
        let mut origin_index = HashMap::with_capacity(rows.len());
        let mut values = Vec::with_capacity(rows.len());

        for row in &rows {
            let mut aligned = vec![0.0; states.len()];
            let mut seen = 0usize;

            for (destination, value) in &row.values {
                let Some(&col) = state_index.get(destination) else {
                    return Err(MatrixError::RaggedRow {
                        origin: row.origin.clone(),
                    });
                };
                if !value.is_finite() {
                    return Err(MatrixError::NonFiniteValue {
                        origin: row.origin.clone(),
                        destination: destination.clone(),
                    });
                }
                if !(0.0..=1.0).contains(value) {
                    warn!(
                        "probability {} for ({} -> {}) outside [0, 1]",
                        value, row.origin, destination
                    );
                }
                aligned[col] = *value;
                seen += 1;
            }

            if seen != states.len() {
                return Err(MatrixError::RaggedRow {
                    origin: row.origin.clone(),
                });
            }

            origin_index.insert(row.origin.clone(), origins.len());
            origins.push(row.origin.clone());
            values.push(aligned);
        }

        Ok(Self {
            origins,
            states,
            values,
            state_index,
            origin_index,
        })
    }

    /// Parses the record-of-objects form (the in-memory table shape) and
    /// builds a matrix from it.
    pub fn from_json(json: &str) -> MatrixResult<Self> {
        let rows: Vec<TransitionRow> = serde_json::from_str(json)?;
        Self::from_rows(rows)
    }

    /// The session state set: ordered destination keys of the first row.
    pub fn states(&self) -> &[String] {
        &self.states
    }

    /// Origin names in row order.
    pub fn origins(&self) -> &[String] {
        &self.origins
    }

    /// Position of a state within the state set, if it is a member.
    pub fn state_position(&self, state: &str) -> Option<usize> {
        self.state_index.get(state).copied()
    }

    /// Probability for an (origin, destination) pair by name.
    pub fn value(&self, origin: &str, destination: &str) -> Option<f64> {
        let row = *self.origin_index.get(origin)?;
        let col = *self.state_index.get(destination)?;
        Some(self.values[row][col])
    }

    /// Probability by (row, column) index.
    pub fn value_at(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get(row)?.get(col).copied()
    }

    /// Iterates every cell in row-major order, diagonal included.
    pub fn cells(&self) -> impl Iterator<Item = Cell<'_>> {
        self.origins.iter().enumerate().flat_map(move |(row, origin)| {
            self.states.iter().enumerate().map(move |(col, destination)| Cell {
                origin,
                destination,
                value: self.values[row][col],
                row,
                col,
            })
        })
    }

    /// Number of states in the state set.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> TransitionMatrix {
        TransitionMatrix::from_json(
            r#"[
                {"From": "A", "A": 0.5, "B": 0.5},
                {"From": "B", "A": 0.1, "B": 0.9}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn state_set_comes_from_first_row_in_key_order() {
        let matrix = TransitionMatrix::from_json(
            r#"[{"From": "X", "Z": 0.2, "Y": 0.8}, {"From": "Y", "Z": 1.0, "Y": 0.0}]"#,
        )
        .unwrap();
        assert_eq!(matrix.states(), ["Z".to_string(), "Y".to_string()]);
    }

    #[test]
    fn value_lookup_by_name_and_index() {
        let matrix = fixture();
        assert_eq!(matrix.value("B", "A"), Some(0.1));
        assert_eq!(matrix.value_at(1, 1), Some(0.9));
        assert_eq!(matrix.value("C", "A"), None);
    }

    #[test]
    fn cells_cover_every_pair_including_diagonal() {
        let matrix = fixture();
        let cells: Vec<_> = matrix.cells().collect();
        assert_eq!(cells.len(), 4);
        assert_eq!(cells[0].origin, "A");
        assert_eq!(cells[0].destination, "A");
        assert_eq!(cells[0].value, 0.5);
        assert_eq!(cells[3].value, 0.9);
    }

    #[test]
    fn empty_table_is_rejected() {
        assert!(matches!(
            TransitionMatrix::from_rows(vec![]),
            Err(MatrixError::Empty)
        ));
    }

    #[test]
    fn ragged_row_is_rejected() {
        let result = TransitionMatrix::from_json(
            r#"[{"From": "A", "A": 0.5, "B": 0.5}, {"From": "B", "A": 1.0}]"#,
        );
        assert!(matches!(result, Err(MatrixError::RaggedRow { origin }) if origin == "B"));
    }

    #[test]
    fn unknown_destination_key_is_rejected() {
        let result = TransitionMatrix::from_json(
            r#"[{"From": "A", "A": 0.5, "B": 0.5}, {"From": "B", "A": 0.5, "C": 0.5}]"#,
        );
        assert!(matches!(result, Err(MatrixError::RaggedRow { .. })));
    }

    #[test]
    fn non_finite_value_is_rejected() {
        let rows = vec![TransitionRow {
            origin: "A".into(),
            values: vec![("A".into(), f64::NAN)],
        }];
        assert!(matches!(
            TransitionMatrix::from_rows(rows),
            Err(MatrixError::NonFiniteValue { .. })
        ));
    }

    #[test]
    fn missing_from_field_fails_to_parse() {
        assert!(matches!(
            TransitionMatrix::from_json(r#"[{"A": 0.5, "B": 0.5}]"#),
            Err(MatrixError::Parse(_))
        ));
    }

    #[test]
    fn row_round_trips_through_serde() {
        let row = TransitionRow {
            origin: "A".into(),
            values: vec![("A".into(), 0.25), ("B".into(), 0.75)],
        };
        let json = serde_json::to_string(&row).unwrap();
        let back: TransitionRow = serde_json::from_str(&json).unwrap();
        assert_eq!(back, row);
    }
}
