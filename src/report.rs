//! Report Generator Module
//! Writes the host HTML document that embeds each chart in its named
//! container, and a JSON summary of the boxplot quartiles.

use crate::stats::GroupSummary;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize summary: {0}")]
    Json(#[from] serde_json::Error),
}

/// What goes inside one chart container.
#[derive(Debug, Clone)]
pub enum EmbeddedChart {
    /// Inline SVG markup
    Svg(String),
    /// Image file next to the document
    Image(String),
    /// Chart could not be produced; the container stays empty
    Missing(String),
}

/// A named container and its content, in document order.
#[derive(Debug, Clone)]
pub struct ChartSection {
    pub container: String,
    pub chart: EmbeddedChart,
}

#[derive(Serialize)]
struct SummaryFile<'a> {
    chart: &'a str,
    groups: &'a [GroupSummary],
}

/// Report generator for the rendered charts
pub struct ReportGenerator;

impl ReportGenerator {
    /// Build the host document.
    pub fn html_document(title: &str, sections: &[ChartSection]) -> String {
        let mut body = String::new();
        for section in sections {
            let id = escape_html(&section.container);
            let inner = match &section.chart {
                EmbeddedChart::Svg(svg) => strip_xml_declaration(svg).trim().to_string(),
                EmbeddedChart::Image(file) => format!(
                    r#"<img src="{}" alt="{}">"#,
                    escape_html(file),
                    id
                ),
                EmbeddedChart::Missing(reason) => {
                    format!("<!-- not rendered: {} -->", escape_html(reason).replace("--", "- -"))
                }
            };
            body.push_str(&format!("    <div id=\"{}\">\n{}\n    </div>\n", id, inner));
        }

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <style>
        body {{ font-family: sans-serif; margin: 2em; }}
        div[id] {{ margin-bottom: 2em; }}
    </style>
</head>
<body>
    <h1>{title}</h1>
{body}</body>
</html>
"#,
            title = escape_html(title),
            body = body
        )
    }

    /// Write the host document to disk.
    pub fn write_html(
        path: &Path,
        title: &str,
        sections: &[ChartSection],
    ) -> Result<(), ReportError> {
        write_file(path, &Self::html_document(title, sections))?;
        log::info!("report written: {} ({} charts)", path.display(), sections.len());
        Ok(())
    }

    /// Write the per-group quartiles as pretty JSON.
    pub fn write_summary(
        path: &Path,
        chart: &str,
        groups: &[GroupSummary],
    ) -> Result<(), ReportError> {
        let json = serde_json::to_string_pretty(&SummaryFile { chart, groups })?;
        write_file(path, &json)?;
        log::info!("summary written: {}", path.display());
        Ok(())
    }

    /// Delete a summary left behind by an earlier run, if any.
    pub fn remove_summary(path: &Path) -> Result<(), ReportError> {
        match fs::remove_file(path) {
            Ok(()) => {
                log::warn!("removed stale summary: {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(ReportError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), ReportError> {
    fs::write(path, contents).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn strip_xml_declaration(svg: &str) -> &str {
    let trimmed = svg.trim_start();
    if trimmed.starts_with("<?xml") {
        if let Some(end) = trimmed.find("?>") {
            return &trimmed[end + 2..];
        }
    }
    trimmed
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatsCalculator;

    #[test]
    fn test_html_has_named_containers_in_order() {
        let sections = vec![
            ChartSection {
                container: "boxplot".into(),
                chart: EmbeddedChart::Svg(
                    "<?xml version=\"1.0\"?>\n<svg width=\"10\"></svg>".into(),
                ),
            },
            ChartSection {
                container: "barplot".into(),
                chart: EmbeddedChart::Image("barplot.png".into()),
            },
            ChartSection {
                container: "lineplot".into(),
                chart: EmbeddedChart::Missing("socialMediaTime.csv not found".into()),
            },
        ];
        let html = ReportGenerator::html_document("Social Media <Likes>", &sections);

        let boxplot = html.find("<div id=\"boxplot\">").unwrap();
        let barplot = html.find("<div id=\"barplot\">").unwrap();
        let lineplot = html.find("<div id=\"lineplot\">").unwrap();
        assert!(boxplot < barplot && barplot < lineplot);

        assert!(html.contains("<svg width=\"10\"></svg>"));
        assert!(!html.contains("<?xml"));
        assert!(html.contains("<img src=\"barplot.png\""));
        assert!(html.contains("not rendered"));
        assert!(html.contains("Social Media &lt;Likes&gt;"));
    }

    #[test]
    fn test_remove_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        fs::write(&path, "{}").unwrap();

        ReportGenerator::remove_summary(&path).unwrap();
        assert!(!path.exists());
        // nothing to remove is fine
        ReportGenerator::remove_summary(&path).unwrap();
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a&b \"c\" <d>"), "a&amp;b &quot;c&quot; &lt;d&gt;");
    }

    #[test]
    fn test_write_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        let records = vec![("Twitter", 1.0), ("Twitter", 3.0), ("Facebook", f64::NAN)];
        let groups = StatsCalculator::rollup(&records, |r| r.0, |r| r.1);

        ReportGenerator::write_summary(&path, "boxplot", &groups).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["chart"], "boxplot");
        assert_eq!(value["groups"][0]["group"], "Twitter");
        assert_eq!(value["groups"][0]["quartiles"]["median"], 2.0);
        assert_eq!(value["groups"][0]["quartiles"]["iqr"], 1.0);
        assert!(value["groups"][1]["quartiles"].is_null());
    }
}
