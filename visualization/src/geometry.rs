//! Band-scale geometry for the heatmap grid
//!
//! Maps an ordered, discrete state domain onto uniform pixel bands with
//! fractional padding, following the band-scale convention of the usual
//! charting libraries: for a domain of `n` states over range `r` with
//! padding `p`,
//!
//! ```text
//! step      = r / (n - p_inner + 2 * p_outer)
//! bandwidth = step * (1 - p_inner)
//! start     = (r - step * (n - p_inner)) * align
//! ```
//!
//! Geometry is rebuilt wholesale whenever the domain changes (filter
//! applied or cleared) or the viewport resizes; scales are cheap value
//! types and carry no caches worth preserving.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Outer drawing box in pixels, before margins are carved out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 1000.0,
        }
    }
}

/// Margins reserved for axes, labels, and the title.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 100.0,
            right: 100.0,
            bottom: 100.0,
            left: 100.0,
        }
    }
}

impl Margins {
    /// Content width left inside a viewport after margins.
    pub fn content_width(&self, viewport: Viewport) -> f64 {
        (viewport.width - self.left - self.right).max(0.0)
    }

    /// Content height left inside a viewport after margins.
    pub fn content_height(&self, viewport: Viewport) -> f64 {
        (viewport.height - self.top - self.bottom).max(0.0)
    }
}

/// Axis-band lookup seam between the selection/scene layers and whatever
/// actually computes pixel coordinates.
pub trait GeometryProvider {
    /// Ordered domain this provider was built over.
    fn domain(&self) -> &[String];

    /// Leading edge of the band for a state, if it is in the domain.
    fn position(&self, state: &str) -> Option<f64>;

    /// Width of every band.
    fn bandwidth(&self) -> f64;

    /// State whose band contains the coordinate, if any.
    fn invert(&self, coord: f64) -> Option<&str>;
}

/// Uniform band scale over an ordered discrete domain.
#[derive(Debug, Clone)]
pub struct BandScale {
    domain: Vec<String>,
    index: HashMap<String, usize>,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    /// Builds a scale over `[0, range]` with equal inner and outer padding
    /// and centered alignment.
    pub fn new(domain: Vec<String>, range: f64, padding: f64) -> Self {
        let n = domain.len() as f64;
        let divisor = (n - padding + 2.0 * padding).max(1.0);
        let step = range / divisor;
        let bandwidth = step * (1.0 - padding);
        let start = (range - step * (n - padding)) * 0.5;

        let index = domain
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), i))
            .collect();

        Self {
            domain,
            index,
            start,
            step,
            bandwidth,
        }
    }

    /// Distance between consecutive band starts.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Band center for a state, convenient for label anchors.
    pub fn center(&self, state: &str) -> Option<f64> {
        self.position(state).map(|p| p + self.bandwidth / 2.0)
    }
}

impl GeometryProvider for BandScale {
    fn domain(&self) -> &[String] {
        &self.domain
    }

    fn position(&self, state: &str) -> Option<f64> {
        self.index
            .get(state)
            .map(|&i| self.start + self.step * i as f64)
    }

    fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    fn invert(&self, coord: f64) -> Option<&str> {
        if self.domain.is_empty() || self.step <= 0.0 {
            return None;
        }
        let offset = coord - self.start;
        if offset < 0.0 {
            return None;
        }
        let slot = (offset / self.step).floor() as usize;
        let state = self.domain.get(slot)?;
        // Reject coordinates that land in the padding gap after the band.
        if offset - slot as f64 * self.step <= self.bandwidth {
            Some(state)
        } else {
            None
        }
    }
}

/// Pixel rectangle of one grid cell, in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Paired x/y band scales over the same domain: destinations along x,
/// origins along y, as in the rendered grid.
#[derive(Debug, Clone)]
pub struct GridGeometry {
    x: BandScale,
    y: BandScale,
}

impl GridGeometry {
    /// Lays the domain out inside the viewport's content area.
    pub fn layout(domain: &[String], viewport: Viewport, margins: Margins, padding: f64) -> Self {
        let width = margins.content_width(viewport);
        let height = margins.content_height(viewport);
        Self {
            x: BandScale::new(domain.to_vec(), width, padding),
            y: BandScale::new(domain.to_vec(), height, padding),
        }
    }

    /// Horizontal (destination) scale.
    pub fn x(&self) -> &BandScale {
        &self.x
    }

    /// Vertical (origin) scale.
    pub fn y(&self) -> &BandScale {
        &self.y
    }

    /// Rectangle for an (origin, destination) pair, when both are in the
    /// domain.
    pub fn cell_rect(&self, origin: &str, destination: &str) -> Option<CellRect> {
        let x = self.x.position(destination)?;
        let y = self.y.position(origin)?;
        Some(CellRect {
            x,
            y,
            width: self.x.bandwidth(),
            height: self.y.bandwidth(),
        })
    }

    /// (origin, destination) pair whose cell contains a content-space
    /// point.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<(&str, &str)> {
        let destination = self.x.invert(x)?;
        let origin = self.y.invert(y)?;
        Some((origin, destination))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bands_partition_the_range() {
        let scale = BandScale::new(domain(&["A", "B", "C", "D"]), 400.0, 0.0);
        assert_eq!(scale.position("A"), Some(0.0));
        assert_eq!(scale.position("B"), Some(100.0));
        assert_eq!(scale.position("D"), Some(300.0));
        assert_eq!(scale.bandwidth(), 100.0);
    }

    #[test]
    fn padding_shrinks_bands_and_insets_the_start() {
        let scale = BandScale::new(domain(&["A", "B"]), 210.0, 0.1);
        // step = 210 / (2 - 0.1 + 0.2) = 100
        assert!((scale.step() - 100.0).abs() < 1e-9);
        assert!((scale.bandwidth() - 90.0).abs() < 1e-9);
        // start = (210 - 100 * 1.9) / 2 = 10
        assert!((scale.position("A").unwrap() - 10.0).abs() < 1e-9);
        assert!((scale.position("B").unwrap() - 110.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_state_has_no_band() {
        let scale = BandScale::new(domain(&["A"]), 100.0, 0.0);
        assert_eq!(scale.position("Z"), None);
    }

    #[test]
    fn invert_round_trips_band_interiors() {
        let scale = BandScale::new(domain(&["A", "B", "C"]), 300.0, 0.0);
        assert_eq!(scale.invert(50.0), Some("A"));
        assert_eq!(scale.invert(150.0), Some("B"));
        assert_eq!(scale.invert(299.0), Some("C"));
        assert_eq!(scale.invert(-5.0), None);
        assert_eq!(scale.invert(301.0), None);
    }

    #[test]
    fn invert_rejects_padding_gaps() {
        let scale = BandScale::new(domain(&["A", "B"]), 210.0, 0.1);
        // Band A spans [10, 100]; 105 lies in the gap before B at 110.
        assert_eq!(scale.invert(50.0), Some("A"));
        assert_eq!(scale.invert(105.0), None);
        assert_eq!(scale.invert(115.0), Some("B"));
    }

    #[test]
    fn grid_cell_rect_and_hit_test_agree() {
        let states = domain(&["A", "B"]);
        let geometry = GridGeometry::layout(
            &states,
            Viewport {
                width: 400.0,
                height: 400.0,
            },
            Margins {
                top: 0.0,
                right: 0.0,
                bottom: 0.0,
                left: 0.0,
            },
            0.0,
        );

        let rect = geometry.cell_rect("B", "A").unwrap();
        assert_eq!(rect.x, 0.0);
        assert_eq!(rect.y, 200.0);

        let hit = geometry
            .hit_test(rect.x + rect.width / 2.0, rect.y + rect.height / 2.0)
            .unwrap();
        assert_eq!(hit, ("B", "A"));
    }

    #[test]
    fn empty_domain_never_hits() {
        let scale = BandScale::new(vec![], 100.0, 0.01);
        assert_eq!(scale.invert(50.0), None);
    }
}
