//! Settings Module
//! Chart layout, input files and output options, loadable from JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Output image format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Svg,
    Png,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
        }
    }
}

/// Interpolation used for the line chart path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveKind {
    #[default]
    Natural,
    Linear,
}

/// Space between the outer edge of the image and the plotting frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Margin {
    pub const fn new(top: u32, right: u32, bottom: u32, left: u32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

/// Layout shared by every chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    /// CSV file name, resolved against the data directory
    pub input: String,
    /// Id of the container element in the host document, also the output file stem
    pub container: String,
    pub width: u32,
    pub height: u32,
    pub margin: Margin,
    /// Band padding of the categorical x scale
    pub padding: f64,
    pub x_label: String,
    pub y_label: String,
    pub label_font_size: u32,
    /// Distance of the rotated y title from the left edge of the image
    pub y_label_offset: u32,
    /// Draw x tick labels vertically, for long category names
    pub rotate_tick_labels: bool,
}

impl ChartLayout {
    /// Inner frame width
    pub fn inner_width(&self) -> f64 {
        self.width
            .saturating_sub(self.margin.left.saturating_add(self.margin.right)) as f64
    }

    /// Inner frame height
    pub fn inner_height(&self) -> f64 {
        self.height
            .saturating_sub(self.margin.top.saturating_add(self.margin.bottom)) as f64
    }

    pub fn boxplot() -> Self {
        Self {
            input: "socialMedia.csv".into(),
            container: "boxplot".into(),
            width: 600,
            height: 400,
            margin: Margin::new(50, 30, 50, 50),
            padding: 0.4,
            x_label: "Platform".into(),
            y_label: "Number of Likes".into(),
            label_font_size: 16,
            y_label_offset: 15,
            rotate_tick_labels: false,
        }
    }

    pub fn barplot() -> Self {
        Self {
            input: "socialMediaAvg.csv".into(),
            container: "barplot".into(),
            width: 800,
            height: 500,
            margin: Margin::new(50, 200, 50, 70),
            padding: 0.2,
            x_label: "Platform".into(),
            y_label: "Average Likes".into(),
            label_font_size: 14,
            y_label_offset: 15,
            rotate_tick_labels: false,
        }
    }

    pub fn lineplot() -> Self {
        Self {
            input: "socialMediaTime.csv".into(),
            container: "lineplot".into(),
            width: 800,
            height: 570,
            margin: Margin::new(50, 50, 150, 80),
            padding: 0.1,
            x_label: "Date".into(),
            y_label: "Average Likes".into(),
            label_font_size: 16,
            y_label_offset: 20,
            rotate_tick_labels: true,
        }
    }
}

/// Grouped bar chart layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarLayout {
    #[serde(flatten)]
    pub chart: ChartLayout,
    /// Band padding of the post type scale inside each platform band
    pub group_padding: f64,
    /// Post type colours, CSS names or `#rrggbb`
    pub palette: Vec<String>,
}

impl Default for BarLayout {
    fn default() -> Self {
        Self {
            chart: ChartLayout::barplot(),
            group_padding: 0.05,
            palette: vec!["lightgreen".into(), "lightblue".into(), "lightcoral".into()],
        }
    }
}

/// Line chart layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineLayout {
    #[serde(flatten)]
    pub chart: ChartLayout,
    pub curve: CurveKind,
    pub stroke_width: u32,
}

impl Default for LineLayout {
    fn default() -> Self {
        Self {
            chart: ChartLayout::lineplot(),
            curve: CurveKind::Natural,
            stroke_width: 2,
        }
    }
}

/// Top-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    /// Write `summary.json` with the boxplot quartiles
    pub write_summary: bool,
    pub boxplot: ChartLayout,
    pub barplot: BarLayout,
    pub lineplot: LineLayout,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            output_dir: PathBuf::from("out"),
            format: OutputFormat::Svg,
            write_summary: true,
            boxplot: ChartLayout::boxplot(),
            barplot: BarLayout::default(),
            lineplot: LineLayout::default(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file. Missing fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overlay a (possibly partial) JSON document on the defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let overlay: Value = serde_json::from_str(text)?;
        let mut merged = serde_json::to_value(Self::default())?;
        merge_json(&mut merged, overlay);
        serde_json::from_value(merged)
    }

    pub fn input_path(&self, layout: &ChartLayout) -> PathBuf {
        self.data_dir.join(&layout.input)
    }

    pub fn output_path(&self, layout: &ChartLayout) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", layout.container, self.format.extension()))
    }
}

/// Recursively replace values in `base` with those present in `overlay`.
fn merge_json(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_chart_sizes() {
        let settings = Settings::default();
        assert_eq!(settings.boxplot.inner_width(), 520.0);
        assert_eq!(settings.boxplot.inner_height(), 300.0);
        assert_eq!(settings.barplot.chart.inner_width(), 530.0);
        assert_eq!(settings.lineplot.chart.inner_width(), 670.0);
        assert_eq!(settings.lineplot.chart.inner_height(), 370.0);
        assert!(settings.lineplot.chart.rotate_tick_labels);
        assert!(!settings.boxplot.rotate_tick_labels);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r##"{
            "format": "png",
            "barplot": { "palette": ["#ff0000"], "width": 900 },
            "lineplot": { "curve": "linear" }
        }"##;
        let settings = Settings::from_json(json).unwrap();

        assert_eq!(settings.format, OutputFormat::Png);
        assert_eq!(settings.barplot.palette, vec!["#ff0000"]);
        assert_eq!(settings.barplot.chart.width, 900);
        assert_eq!(settings.barplot.chart.container, "barplot");
        assert_eq!(settings.lineplot.curve, CurveKind::Linear);
        assert_eq!(settings.boxplot, ChartLayout::boxplot());
    }

    #[test]
    fn test_oversized_margins_give_empty_frame() {
        let json = r#"{ "boxplot": { "margin": { "top": 4294967295, "right": 4294967295, "bottom": 10, "left": 10 } } }"#;
        let settings = Settings::from_json(json).unwrap();
        assert_eq!(settings.boxplot.inner_width(), 0.0);
        assert_eq!(settings.boxplot.inner_height(), 0.0);
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(Settings::from_json(r#"{ "format": "gif" }"#).is_err());
    }

    #[test]
    fn test_output_path_uses_container_and_format() {
        let settings = Settings {
            output_dir: PathBuf::from("charts"),
            format: OutputFormat::Png,
            ..Settings::default()
        };
        assert_eq!(
            settings.output_path(&settings.boxplot),
            PathBuf::from("charts/boxplot.png")
        );
    }
}
