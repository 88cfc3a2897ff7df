//! Probability-to-color mapping
//!
//! A sequential scale over the probability domain [0, 1], sampling a
//! piecewise-linear gradient. Colors are plain RGBA quadruples; no
//! perceptual color-space math, just segment interpolation between stops.

use serde::{Deserialize, Serialize};

/// RGBA color with components in [0, 1].
pub type Rgba = [f32; 4];

/// Yellow-to-red gradient in the spirit of the YlOrRd palette.
pub fn yl_or_rd() -> Vec<Rgba> {
    vec![
        [1.0, 1.0, 0.8, 1.0],   // Pale yellow
        [1.0, 0.85, 0.46, 1.0], // Gold
        [0.99, 0.55, 0.24, 1.0], // Orange
        [0.89, 0.1, 0.11, 1.0], // Red
        [0.5, 0.0, 0.15, 1.0],  // Dark red
    ]
}

/// Sequential color scale: linear value-to-gradient mapping with clamping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequentialScale {
    gradient: Vec<Rgba>,
    domain: (f64, f64),
}

impl Default for SequentialScale {
    fn default() -> Self {
        Self {
            gradient: yl_or_rd(),
            domain: (0.0, 1.0),
        }
    }
}

impl SequentialScale {
    /// Scale over an explicit domain and gradient. A gradient needs at
    /// least one stop; single-stop gradients are constant.
    pub fn new(gradient: Vec<Rgba>, domain: (f64, f64)) -> Self {
        Self { gradient, domain }
    }

    /// Color for a domain value, clamped to the domain ends.
    pub fn color_for(&self, value: f64) -> Rgba {
        let (min, max) = self.domain;
        let span = max - min;
        let t = if span.abs() < f64::EPSILON {
            0.0
        } else {
            ((value - min) / span).clamp(0.0, 1.0)
        };
        self.sample(t as f32)
    }

    /// Samples the gradient at position t in [0, 1].
    fn sample(&self, t: f32) -> Rgba {
        if self.gradient.is_empty() {
            return [0.0, 0.0, 0.0, 1.0];
        }
        if self.gradient.len() == 1 {
            return self.gradient[0];
        }

        let segment_count = self.gradient.len() - 1;
        let segment_t = t.clamp(0.0, 1.0) * segment_count as f32;
        let segment_idx = segment_t as usize;
        if segment_idx >= segment_count {
            return self.gradient[segment_count];
        }
        let frac = segment_t - segment_idx as f32;

        let c0 = self.gradient[segment_idx];
        let c1 = self.gradient[segment_idx + 1];
        [
            c0[0] + (c1[0] - c0[0]) * frac,
            c0[1] + (c1[1] - c0[1]) * frac,
            c0[2] + (c1[2] - c0[2]) * frac,
            c0[3] + (c1[3] - c0[3]) * frac,
        ]
    }
}

/// Formats a color as a CSS `rgb(r, g, b)` triple with 0-255 channels.
pub fn css_rgb(color: Rgba) -> String {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "rgb({},{},{})",
        channel(color[0]),
        channel(color[1]),
        channel(color[2])
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_hit_the_gradient_ends() {
        let scale = SequentialScale::new(
            vec![[0.0, 0.0, 1.0, 1.0], [1.0, 0.0, 0.0, 1.0]],
            (0.0, 1.0),
        );
        assert_eq!(scale.color_for(0.0), [0.0, 0.0, 1.0, 1.0]);
        assert_eq!(scale.color_for(1.0), [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn midpoint_interpolates_linearly() {
        let scale = SequentialScale::new(
            vec![[0.0, 0.0, 1.0, 1.0], [1.0, 0.0, 0.0, 1.0]],
            (0.0, 1.0),
        );
        assert_eq!(scale.color_for(0.5), [0.5, 0.0, 0.5, 1.0]);
    }

    #[test]
    fn out_of_domain_values_clamp() {
        let scale = SequentialScale::default();
        assert_eq!(scale.color_for(-3.0), scale.color_for(0.0));
        assert_eq!(scale.color_for(7.0), scale.color_for(1.0));
    }

    #[test]
    fn single_stop_gradient_is_constant() {
        let scale = SequentialScale::new(vec![[0.2, 0.4, 0.6, 1.0]], (0.0, 1.0));
        assert_eq!(scale.color_for(0.0), [0.2, 0.4, 0.6, 1.0]);
        assert_eq!(scale.color_for(0.9), [0.2, 0.4, 0.6, 1.0]);
    }

    #[test]
    fn css_formatting_rounds_channels() {
        assert_eq!(css_rgb([1.0, 0.5, 0.0, 1.0]), "rgb(255,128,0)");
    }
}
