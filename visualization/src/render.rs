//! Render drivers
//!
//! A [`RenderDriver`] consumes the declarative scene contract and produces
//! whatever its surface needs; the core layers never see the surface. The
//! shipped driver, [`SvgRenderer`], assembles a standalone SVG document:
//! one `rect` per visible cell, axis labels with emphasis as font weight,
//! dimming as fill opacity, and the usual title and axis captions.

use std::fmt::Write;

use log::debug;
use thiserror::Error;

use crate::color::css_rgb;
use crate::scene::{Axis, Scene};

/// Errors raised while emitting a rendered document.
#[derive(Debug, Error)]
pub enum RenderError {
    /// String assembly failed.
    #[error("formatting failure: {0}")]
    Fmt(#[from] std::fmt::Error),
}

/// Consumer side of the scene contract.
pub trait RenderDriver {
    type Output;

    /// Renders one scene to completion.
    fn render(&mut self, scene: &Scene) -> Result<Self::Output, RenderError>;
}

/// Static SVG document emitter.
#[derive(Debug, Clone, Default)]
pub struct SvgRenderer {
    /// Optional CSS class attached to the root element.
    pub root_class: Option<String>,
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl RenderDriver for SvgRenderer {
    type Output = String;

    fn render(&mut self, scene: &Scene) -> Result<String, RenderError> {
        let margins = scene.margins;
        let width = margins.content_width(scene.viewport);
        let height = margins.content_height(scene.viewport);

        let mut svg = String::new();
        write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}""#,
            scene.viewport.width, scene.viewport.height
        )?;
        if let Some(class) = &self.root_class {
            write!(svg, r#" class="{}""#, escape(class))?;
        }
        writeln!(svg, ">")?;
        writeln!(
            svg,
            r#"<g transform="translate({},{})">"#,
            margins.left, margins.top
        )?;

        // Hidden cells are simply absent from the scene; dimmed ones keep
        // their geometry at reduced opacity.
        for cell in &scene.cells {
            write!(
                svg,
                r#"<rect class="cell" x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}""#,
                cell.rect.x,
                cell.rect.y,
                cell.rect.width,
                cell.rect.height,
                css_rgb(cell.color)
            )?;
            if cell.dimmed {
                write!(svg, r#" fill-opacity="{}""#, scene.dim_opacity)?;
            }
            writeln!(svg, "/>")?;
        }

        for label in &scene.labels {
            let weight = if label.emphasized { "bold" } else { "normal" };
            match label.axis {
                Axis::X => writeln!(
                    svg,
                    r#"<text class="axis-label" x="{:.2}" y="{:.2}" transform="rotate(-45,{:.2},{:.2})" text-anchor="end" font-weight="{}">{}</text>"#,
                    label.x,
                    label.y,
                    label.x,
                    label.y,
                    weight,
                    escape(&label.state)
                )?,
                Axis::Y => writeln!(
                    svg,
                    r#"<text class="axis-label" x="{:.2}" y="{:.2}" text-anchor="end" dominant-baseline="middle" font-weight="{}">{}</text>"#,
                    label.x,
                    label.y,
                    weight,
                    escape(&label.state)
                )?,
            }
        }

        writeln!(
            svg,
            r#"<text class="title" x="{:.2}" y="{:.2}" text-anchor="middle" font-size="16">{}</text>"#,
            width / 2.0,
            -margins.top / 2.0,
            escape(&scene.title)
        )?;
        writeln!(
            svg,
            r#"<text class="caption" x="{:.2}" y="{:.2}" text-anchor="middle">{}</text>"#,
            width / 2.0,
            height + margins.bottom - 20.0,
            escape(&scene.x_caption)
        )?;
        writeln!(
            svg,
            r#"<text class="caption" transform="rotate(-90)" x="{:.2}" y="{:.2}" text-anchor="middle">{}</text>"#,
            -height / 2.0,
            -margins.left + 20.0,
            escape(&scene.y_caption)
        )?;

        writeln!(svg, "</g>")?;
        writeln!(svg, "</svg>")?;

        debug!("rendered svg: {} cells, {} bytes", scene.cells.len(), svg.len());
        Ok(svg)
    }
}
