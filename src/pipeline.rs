//! Chart Pipeline
//! Load each CSV, compute summaries, render the three charts and write the
//! host document. Charts are independent: one failing does not stop the rest.

use crate::charts::{ChartPlotter, RenderError, StaticChartRenderer};
use crate::config::{ChartLayout, OutputFormat, Settings};
use crate::data::{DataLoader, DataProcessor, LoaderError};
use crate::report::{ChartSection, EmbeddedChart, ReportError, ReportGenerator};
use crate::stats::{GroupSummary, StatsCalculator};
use plotters::coord::Shift;
use plotters::prelude::{BitMapBackend, DrawingArea, SVGBackend};
use std::fs;
use thiserror::Error;

/// Document title of the host page
pub const REPORT_TITLE: &str = "Social Media Engagement";

#[derive(Error, Debug)]
pub enum ChartError {
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Outcome of one run
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Containers that received a chart
    pub rendered: Vec<String>,
    /// Containers left empty, with the reason
    pub failed: Vec<(String, String)>,
}

pub struct ChartPipeline {
    settings: Settings,
}

impl ChartPipeline {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Render every chart, then write `index.html` (and `summary.json`).
    pub fn run(&self) -> Result<RunSummary, ReportError> {
        let out = &self.settings.output_dir;
        fs::create_dir_all(out).map_err(|source| ReportError::Io {
            path: out.clone(),
            source,
        })?;

        let mut summary = RunSummary::default();
        let mut sections = Vec::with_capacity(3);

        let boxplot = &self.settings.boxplot;
        let result = self.boxplot();
        if self.settings.write_summary {
            let path = out.join("summary.json");
            match &result {
                Ok((_, groups)) => {
                    ReportGenerator::write_summary(&path, &boxplot.container, groups)?
                }
                // no quartiles this run, so drop any earlier summary
                Err(_) => ReportGenerator::remove_summary(&path)?,
            }
        }
        sections.push(Self::section(boxplot, result.map(|(chart, _)| chart), &mut summary));

        let chart = self.barplot();
        sections.push(Self::section(&self.settings.barplot.chart, chart, &mut summary));

        let chart = self.lineplot();
        sections.push(Self::section(&self.settings.lineplot.chart, chart, &mut summary));

        ReportGenerator::write_html(&out.join("index.html"), REPORT_TITLE, &sections)?;
        Ok(summary)
    }

    fn section(
        layout: &ChartLayout,
        result: Result<EmbeddedChart, ChartError>,
        summary: &mut RunSummary,
    ) -> ChartSection {
        let chart = match result {
            Ok(chart) => {
                summary.rendered.push(layout.container.clone());
                chart
            }
            Err(e) => {
                log::error!("{}: {}", layout.container, e);
                summary
                    .failed
                    .push((layout.container.clone(), e.to_string()));
                EmbeddedChart::Missing(e.to_string())
            }
        };
        ChartSection {
            container: layout.container.clone(),
            chart,
        }
    }

    /// Boxplot of likes per platform; also returns the quartiles.
    pub fn boxplot(&self) -> Result<(EmbeddedChart, Vec<GroupSummary>), ChartError> {
        let layout = &self.settings.boxplot;
        let df = DataLoader::load_csv(&self.settings.input_path(layout))?;
        let records = DataProcessor::likes_records(&df)?;
        let groups = StatsCalculator::rollup(&records, |r| r.platform.as_str(), |r| r.likes);

        for group in &groups {
            if let Some(q) = &group.quartiles {
                log::debug!(
                    "{}: n={} min={} q1={} median={} q3={} max={}",
                    group.group,
                    q.count,
                    q.min,
                    q.q1,
                    q.median,
                    q.q3,
                    q.max
                );
            }
        }

        let chart = self.emit(
            layout,
            |area| ChartPlotter::draw_boxplot(area, layout, &records, &groups),
            |area| ChartPlotter::draw_boxplot(area, layout, &records, &groups),
        )?;
        Ok((chart, groups))
    }

    /// Grouped bar chart of average likes per platform and post type.
    pub fn barplot(&self) -> Result<EmbeddedChart, ChartError> {
        let layout = &self.settings.barplot;
        let df = DataLoader::load_csv(&self.settings.input_path(&layout.chart))?;
        let records = DataProcessor::avg_likes_records(&df)?;

        self.emit(
            &layout.chart,
            |area| ChartPlotter::draw_barplot(area, layout, &records),
            |area| ChartPlotter::draw_barplot(area, layout, &records),
        )
    }

    /// Line chart of average likes per day.
    pub fn lineplot(&self) -> Result<EmbeddedChart, ChartError> {
        let layout = &self.settings.lineplot;
        let df = DataLoader::load_csv(&self.settings.input_path(&layout.chart))?;
        let records = DataProcessor::time_records(&df)?;

        self.emit(
            &layout.chart,
            |area| ChartPlotter::draw_lineplot(area, layout, &records),
            |area| ChartPlotter::draw_lineplot(area, layout, &records),
        )
    }

    /// Render with the configured backend and write the chart file.
    fn emit<S, P>(
        &self,
        layout: &ChartLayout,
        draw_svg: S,
        draw_png: P,
    ) -> Result<EmbeddedChart, ChartError>
    where
        S: FnOnce(&DrawingArea<SVGBackend, Shift>) -> Result<(), RenderError>,
        P: FnOnce(&DrawingArea<BitMapBackend, Shift>) -> Result<(), RenderError>,
    {
        let path = self.settings.output_path(layout);
        let size = (layout.width, layout.height);

        let chart = match self.settings.format {
            OutputFormat::Svg => {
                let svg = StaticChartRenderer::render_svg(size, draw_svg)?;
                StaticChartRenderer::write_svg(&path, &svg)?;
                EmbeddedChart::Svg(svg)
            }
            OutputFormat::Png => {
                StaticChartRenderer::render_png(&path, size, draw_png)?;
                let file = path
                    .file_name()
                    .map(|f| f.to_string_lossy().into_owned())
                    .unwrap_or_default();
                EmbeddedChart::Image(file)
            }
        };
        log::info!("{} written: {}", layout.container, path.display());
        Ok(chart)
    }
}
