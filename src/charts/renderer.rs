//! Static Chart Renderer
//! Backend setup, frame geometry, axes and text on top of plotters.
//!
//! Every chart is an outer image of `width x height` pixels with a plotting
//! frame inset by its margins. Marks are positioned in frame coordinates and
//! shifted by the margin when drawn, so scales only ever see the inner size.

use crate::charts::scale::{BandScale, LinearScale};
use crate::config::ChartLayout;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle, FontTransform};
use std::path::{Path, PathBuf};
use thiserror::Error;

// Colors
pub const STEELBLUE: RGBColor = RGBColor(70, 130, 180);
pub const LIGHT_GREEN: RGBColor = RGBColor(144, 238, 144);
pub const LIGHT_BLUE: RGBColor = RGBColor(173, 216, 230);
pub const LIGHT_CORAL: RGBColor = RGBColor(240, 128, 128);

const NAMED_COLORS: [(&str, RGBColor); 12] = [
    ("black", BLACK),
    ("white", WHITE),
    ("red", RED),
    ("green", RGBColor(0, 128, 0)),
    ("blue", BLUE),
    ("steelblue", STEELBLUE),
    ("lightgreen", LIGHT_GREEN),
    ("lightblue", LIGHT_BLUE),
    ("lightcoral", LIGHT_CORAL),
    ("orange", RGBColor(255, 165, 0)),
    ("gray", RGBColor(128, 128, 128)),
    ("purple", RGBColor(128, 0, 128)),
];

/// Axis tick geometry
const TICK_SIZE: i32 = 6;
const TICK_PADDING: i32 = 3;
const TICK_FONT_SIZE: f64 = 10.0;
const Y_TICK_COUNT: usize = 10;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Drawing(String),
    #[error("Unknown colour '{0}'")]
    Color(String),
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Map any backend error into a `RenderError`.
pub fn draw_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Drawing(e.to_string())
}

/// Plotting frame inside the margins, in image pixels.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    pub fn from_layout(layout: &ChartLayout) -> Self {
        Self {
            left: layout.margin.left as f64,
            top: layout.margin.top as f64,
            width: layout.inner_width(),
            height: layout.inner_height(),
        }
    }

    /// Frame coordinates to image pixels
    #[inline]
    pub fn px(&self, x: f64, y: f64) -> (i32, i32) {
        ((self.left + x).round() as i32, (self.top + y).round() as i32)
    }
}

/// Renders charts into SVG strings or PNG files.
pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Draw into an in-memory SVG document.
    pub fn render_svg<F>(size: (u32, u32), draw: F) -> Result<String, RenderError>
    where
        F: FnOnce(&DrawingArea<SVGBackend, Shift>) -> Result<(), RenderError>,
    {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;
            draw(&root)?;
            root.present().map_err(draw_err)?;
        }
        Ok(svg)
    }

    /// Draw into a PNG file.
    pub fn render_png<F>(path: &Path, size: (u32, u32), draw: F) -> Result<(), RenderError>
    where
        F: FnOnce(&DrawingArea<BitMapBackend, Shift>) -> Result<(), RenderError>,
    {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;
        draw(&root)?;
        root.present().map_err(draw_err)?;
        Ok(())
    }

    /// Write a rendered SVG document to disk.
    pub fn write_svg(path: &Path, svg: &str) -> Result<(), RenderError> {
        std::fs::write(path, svg).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse `#rrggbb`, `#rgb` or one of the supported CSS colour names.
    pub fn parse_color(spec: &str) -> Result<RGBColor, RenderError> {
        let spec = spec.trim();
        if let Some(hex) = spec.strip_prefix('#') {
            let channel = |s: &str| u8::from_str_radix(s, 16).ok();
            let rgb = match hex.len() {
                _ if !hex.is_ascii() => (None, None, None),
                6 => (channel(&hex[0..2]), channel(&hex[2..4]), channel(&hex[4..6])),
                3 => (
                    channel(&hex[0..1].repeat(2)),
                    channel(&hex[1..2].repeat(2)),
                    channel(&hex[2..3].repeat(2)),
                ),
                _ => (None, None, None),
            };
            return match rgb {
                (Some(r), Some(g), Some(b)) => Ok(RGBColor(r, g, b)),
                _ => Err(RenderError::Color(spec.to_string())),
            };
        }

        NAMED_COLORS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(spec))
            .map(|&(_, color)| color)
            .ok_or_else(|| RenderError::Color(spec.to_string()))
    }

    pub fn text_style(size: f64) -> TextStyle<'static> {
        TextStyle::from(FontDesc::new(FontFamily::SansSerif, size, FontStyle::Normal))
            .color(&BLACK)
    }

    pub fn draw_line<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        from: (i32, i32),
        to: (i32, i32),
        style: ShapeStyle,
    ) -> Result<(), RenderError> {
        area.draw(&PathElement::new(vec![from, to], style))
            .map_err(draw_err)
    }

    pub fn draw_text<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        text: &str,
        at: (i32, i32),
        style: &TextStyle,
    ) -> Result<(), RenderError> {
        area.draw(&Text::new(text.to_string(), at, style.clone()))
            .map_err(draw_err)
    }

    /// Bottom axis with one tick per band, centred in the band.
    ///
    /// Rotated labels run down from the tick end, reading bottom to top.
    pub fn draw_band_axis<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        frame: &Frame,
        x: &BandScale,
        rotate_labels: bool,
    ) -> Result<(), RenderError> {
        let (x0, y0) = frame.px(0.0, frame.height);
        let (x1, _) = frame.px(frame.width, frame.height);
        area.draw(&PathElement::new(
            vec![(x0, y0 + TICK_SIZE), (x0, y0), (x1, y0), (x1, y0 + TICK_SIZE)],
            BLACK.stroke_width(1),
        ))
        .map_err(draw_err)?;

        let style = if rotate_labels {
            Self::text_style(TICK_FONT_SIZE)
                .pos(Pos::new(HPos::Right, VPos::Center))
                .transform(FontTransform::Rotate270)
        } else {
            Self::text_style(TICK_FONT_SIZE).pos(Pos::new(HPos::Center, VPos::Top))
        };
        for name in x.domain() {
            let Some(cx) = x.center(name) else { continue };
            let (tx, ty) = frame.px(cx, frame.height);
            Self::draw_line(area, (tx, ty), (tx, ty + TICK_SIZE), BLACK.stroke_width(1))?;
            Self::draw_text(area, name, (tx, ty + TICK_SIZE + TICK_PADDING), &style)?;
        }
        Ok(())
    }

    /// Left axis with linear ticks.
    pub fn draw_value_axis<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        frame: &Frame,
        y: &LinearScale,
    ) -> Result<(), RenderError> {
        let (x0, top) = frame.px(0.0, 0.0);
        let (_, bottom) = frame.px(0.0, frame.height);
        area.draw(&PathElement::new(
            vec![(x0 - TICK_SIZE, bottom), (x0, bottom), (x0, top), (x0 - TICK_SIZE, top)],
            BLACK.stroke_width(1),
        ))
        .map_err(draw_err)?;

        let format = y.tick_format(Y_TICK_COUNT);
        let style = Self::text_style(TICK_FONT_SIZE).pos(Pos::new(HPos::Right, VPos::Center));
        for tick in y.ticks(Y_TICK_COUNT) {
            let (tx, ty) = frame.px(0.0, y.map(tick));
            Self::draw_line(area, (tx - TICK_SIZE, ty), (tx, ty), BLACK.stroke_width(1))?;
            Self::draw_text(area, &format(tick), (tx - TICK_SIZE - TICK_PADDING, ty), &style)?;
        }
        Ok(())
    }

    /// Axis titles: x centred under the frame, y rotated along the left edge.
    pub fn draw_axis_titles<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        layout: &ChartLayout,
    ) -> Result<(), RenderError> {
        let frame = Frame::from_layout(layout);
        let size = layout.label_font_size as f64;

        let x_style = Self::text_style(size).pos(Pos::new(HPos::Center, VPos::Bottom));
        let x_at = frame.px(
            frame.width / 2.0,
            frame.height + layout.margin.bottom as f64 - 10.0,
        );
        Self::draw_text(area, &layout.x_label, x_at, &x_style)?;

        let y_style = Self::text_style(size)
            .pos(Pos::new(HPos::Center, VPos::Bottom))
            .transform(FontTransform::Rotate270);
        let y_at = (
            layout.y_label_offset as i32,
            (frame.top + frame.height / 2.0).round() as i32,
        );
        Self::draw_text(area, &layout.y_label, y_at, &y_style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!(
            StaticChartRenderer::parse_color("steelblue").unwrap(),
            STEELBLUE
        );
        assert_eq!(
            StaticChartRenderer::parse_color("LightCoral").unwrap(),
            LIGHT_CORAL
        );
        assert_eq!(
            StaticChartRenderer::parse_color("#0a0B0c").unwrap(),
            RGBColor(10, 11, 12)
        );
        assert_eq!(
            StaticChartRenderer::parse_color("#f00").unwrap(),
            RGBColor(255, 0, 0)
        );
        assert!(matches!(
            StaticChartRenderer::parse_color("#12345"),
            Err(RenderError::Color(_))
        ));
        assert!(StaticChartRenderer::parse_color("chartreuse-ish").is_err());
    }

    #[test]
    fn test_frame_offsets_by_margin() {
        let frame = Frame::from_layout(&ChartLayout::boxplot());
        assert_eq!(frame.width, 520.0);
        assert_eq!(frame.height, 300.0);
        assert_eq!(frame.px(0.0, 0.0), (50, 50));
        assert_eq!(frame.px(10.4, 299.6), (60, 350));
    }

    #[test]
    fn test_render_svg_draws_axes() {
        let layout = ChartLayout::boxplot();
        let frame = Frame::from_layout(&layout);
        let x = BandScale::new(["Twitter", "Facebook"], (0.0, frame.width), 0.4);
        let y = LinearScale::new((0.0, 1000.0), (frame.height, 0.0));

        let svg = StaticChartRenderer::render_svg((layout.width, layout.height), |area| {
            StaticChartRenderer::draw_band_axis(area, &frame, &x, layout.rotate_tick_labels)?;
            StaticChartRenderer::draw_value_axis(area, &frame, &y)?;
            StaticChartRenderer::draw_axis_titles(area, &layout)
        })
        .unwrap();

        assert!(svg.contains("<svg"));
        assert!(svg.contains("Twitter"));
        assert!(svg.contains("Facebook"));
        assert!(svg.contains("1,000"));
        assert!(svg.contains("Platform"));
        assert!(svg.contains("Number of Likes"));
        assert!(svg.contains("rotate("));
    }

    #[test]
    fn test_rotated_band_labels() {
        let frame = Frame::from_layout(&ChartLayout::lineplot());
        let x = BandScale::new(
            ["3/1/2024 (Friday)", "3/2/2024 (Saturday)"],
            (0.0, frame.width),
            0.1,
        );

        let flat = StaticChartRenderer::render_svg((800, 570), |area| {
            StaticChartRenderer::draw_band_axis(area, &frame, &x, false)
        })
        .unwrap();
        let rotated = StaticChartRenderer::render_svg((800, 570), |area| {
            StaticChartRenderer::draw_band_axis(area, &frame, &x, true)
        })
        .unwrap();

        assert!(!flat.contains("rotate("));
        assert_eq!(rotated.matches("rotate(270").count(), 2);
        assert!(rotated.contains("text-anchor=\"end\""));
        assert!(rotated.contains("3/2/2024 (Saturday)"));
    }
}
