//! Chart Plotter Module
//! Boxplot, grouped bar chart and line chart marks.

use crate::charts::curve::{linear_curve, natural_curve};
use crate::charts::renderer::{draw_err, Frame, RenderError, StaticChartRenderer, STEELBLUE};
use crate::charts::scale::{BandScale, LinearScale, OrdinalScale};
use crate::config::{BarLayout, ChartLayout, CurveKind, LineLayout};
use crate::data::{AvgLikesRecord, DataProcessor, LikesRecord, TimeRecord};
use crate::stats::{GroupSummary, StatsCalculator};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

/// Legend swatch size and row spacing
const LEGEND_SWATCH: i32 = 15;
const LEGEND_ROW: i32 = 20;
const LEGEND_FONT_SIZE: f64 = 12.0;

/// Bezier samples per segment of the line chart
const CURVE_SAMPLES: usize = 16;

/// Value scale over `[0, max]`, falling back to a unit domain.
fn value_scale(max: Option<f64>, frame: &Frame) -> LinearScale {
    LinearScale::new((0.0, max.unwrap_or(1.0)), (frame.height, 0.0))
}

/// Draws the three chart kinds onto a drawing area.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Boxplot of likes per platform: whisker from min to max, box from q1
    /// to q3 and a median line. Platforms without data are skipped.
    pub fn draw_boxplot<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        layout: &ChartLayout,
        records: &[LikesRecord],
        summaries: &[GroupSummary],
    ) -> Result<(), RenderError> {
        let frame = Frame::from_layout(layout);
        let platforms =
            DataProcessor::unique_in_order(records.iter().map(|r| r.platform.as_str()));
        let x = BandScale::new(platforms, (0.0, frame.width), layout.padding);
        let y = value_scale(
            StatsCalculator::finite_max(records.iter().map(|r| r.likes)),
            &frame,
        );

        StaticChartRenderer::draw_band_axis(area, &frame, &x, layout.rotate_tick_labels)?;
        StaticChartRenderer::draw_value_axis(area, &frame, &y)?;
        StaticChartRenderer::draw_axis_titles(area, layout)?;

        let box_width = x.bandwidth();
        for summary in summaries {
            let (Some(q), Some(left)) = (summary.quartiles, x.position(&summary.group)) else {
                log::warn!("boxplot: no data for platform '{}'", summary.group);
                continue;
            };
            let center = left + box_width / 2.0;

            StaticChartRenderer::draw_line(
                area,
                frame.px(center, y.map(q.min)),
                frame.px(center, y.map(q.max)),
                BLACK.stroke_width(1),
            )?;

            area.draw(&Rectangle::new(
                [frame.px(left, y.map(q.q3)), frame.px(left + box_width, y.map(q.q1))],
                STEELBLUE.filled(),
            ))
            .map_err(draw_err)?;

            StaticChartRenderer::draw_line(
                area,
                frame.px(left, y.map(q.median)),
                frame.px(left + box_width, y.map(q.median)),
                BLACK.stroke_width(1),
            )?;
        }
        Ok(())
    }

    /// Grouped bars: platforms on the outer band scale, post types on an
    /// inner band scale within each platform band, plus a colour legend.
    pub fn draw_barplot<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        layout: &BarLayout,
        records: &[AvgLikesRecord],
    ) -> Result<(), RenderError> {
        let palette = layout
            .palette
            .iter()
            .map(|c| StaticChartRenderer::parse_color(c))
            .collect::<Result<Vec<_>, _>>()?;

        let chart = &layout.chart;
        let frame = Frame::from_layout(chart);
        let platforms =
            DataProcessor::unique_in_order(records.iter().map(|r| r.platform.as_str()));
        let post_types =
            DataProcessor::unique_in_order(records.iter().map(|r| r.post_type.as_str()));

        let x0 = BandScale::new(platforms, (0.0, frame.width), chart.padding);
        let x1 = BandScale::new(
            post_types.iter().cloned(),
            (0.0, x0.bandwidth()),
            layout.group_padding,
        );
        let y = value_scale(
            StatsCalculator::finite_max(records.iter().map(|r| r.avg_likes)),
            &frame,
        );
        let mut color = OrdinalScale::new(post_types.iter().cloned(), palette);

        StaticChartRenderer::draw_band_axis(area, &frame, &x0, chart.rotate_tick_labels)?;
        StaticChartRenderer::draw_value_axis(area, &frame, &y)?;
        StaticChartRenderer::draw_axis_titles(area, chart)?;

        for record in records {
            if !record.avg_likes.is_finite() {
                log::warn!(
                    "barplot: skipping {} / {} with non-numeric AvgLikes",
                    record.platform,
                    record.post_type
                );
                continue;
            }
            let (Some(group_left), Some(bar_left)) =
                (x0.position(&record.platform), x1.position(&record.post_type))
            else {
                continue;
            };
            let Some(fill) = color.get(&record.post_type) else {
                continue;
            };

            let left = group_left + bar_left;
            area.draw(&Rectangle::new(
                [
                    frame.px(left, y.map(record.avg_likes)),
                    frame.px(left + x1.bandwidth(), frame.height),
                ],
                fill.filled(),
            ))
            .map_err(draw_err)?;
        }

        // Legend sits right of the frame, one swatch per post type
        let (legend_x, legend_y) = frame.px(frame.width + 20.0, chart.margin.top as f64);
        let style = StaticChartRenderer::text_style(LEGEND_FONT_SIZE)
            .pos(Pos::new(HPos::Left, VPos::Center));
        for (i, post_type) in post_types.iter().enumerate() {
            let Some(fill) = color.get(post_type) else {
                break;
            };
            let top = legend_y + i as i32 * LEGEND_ROW;
            area.draw(&Rectangle::new(
                [(legend_x, top), (legend_x + LEGEND_SWATCH, top + LEGEND_SWATCH)],
                fill.filled(),
            ))
            .map_err(draw_err)?;
            StaticChartRenderer::draw_text(area, post_type, (legend_x + 20, top + 12), &style)?;
        }
        Ok(())
    }

    /// Line through the daily averages, one point per date band centre.
    pub fn draw_lineplot<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        layout: &LineLayout,
        records: &[TimeRecord],
    ) -> Result<(), RenderError> {
        let chart = &layout.chart;
        let frame = Frame::from_layout(chart);
        let dates = DataProcessor::unique_in_order(records.iter().map(|r| r.date.as_str()));
        let x = BandScale::new(dates, (0.0, frame.width), chart.padding);
        let y = value_scale(
            StatsCalculator::finite_max(records.iter().map(|r| r.avg_likes)),
            &frame,
        );

        StaticChartRenderer::draw_band_axis(area, &frame, &x, chart.rotate_tick_labels)?;
        StaticChartRenderer::draw_value_axis(area, &frame, &y)?;
        StaticChartRenderer::draw_axis_titles(area, chart)?;

        let points: Vec<(f64, f64)> = records
            .iter()
            .filter_map(|r| {
                if !r.avg_likes.is_finite() {
                    log::warn!("lineplot: skipping {} with non-numeric AvgLikes", r.date);
                    return None;
                }
                Some((x.center(&r.date)?, y.map(r.avg_likes)))
            })
            .collect();

        let path = match layout.curve {
            CurveKind::Natural => natural_curve(&points, CURVE_SAMPLES),
            CurveKind::Linear => linear_curve(&points),
        };
        if path.len() < 2 {
            return Ok(());
        }

        let pixels: Vec<(i32, i32)> = path.iter().map(|&(px, py)| frame.px(px, py)).collect();
        area.draw(&PathElement::new(
            pixels,
            BLACK.stroke_width(layout.stroke_width),
        ))
        .map_err(draw_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    fn likes(platform: &str, likes: f64) -> LikesRecord {
        LikesRecord {
            platform: platform.into(),
            likes,
        }
    }

    fn avg(platform: &str, post_type: &str, avg_likes: f64) -> AvgLikesRecord {
        AvgLikesRecord {
            platform: platform.into(),
            post_type: post_type.into(),
            avg_likes,
        }
    }

    #[test]
    fn test_boxplot_draws_one_box_per_platform_with_data() {
        let records = vec![
            likes("Twitter", 120.0),
            likes("Twitter", 480.0),
            likes("Twitter", 260.0),
            likes("Facebook", 90.0),
            likes("Facebook", 600.0),
            likes("LinkedIn", f64::NAN),
        ];
        let summaries = StatsCalculator::rollup(&records, |r| r.platform.as_str(), |r| r.likes);
        let layout = ChartLayout::boxplot();

        let svg = StaticChartRenderer::render_svg((layout.width, layout.height), |area| {
            ChartPlotter::draw_boxplot(area, &layout, &records, &summaries)
        })
        .unwrap()
        .to_lowercase();

        assert_eq!(count(&svg, "fill=\"#4682b4\""), 2);
        assert!(svg.contains("linkedin"));
        // only the y title is rotated
        assert_eq!(count(&svg, "rotate(270"), 1);
    }

    #[test]
    fn test_barplot_one_bar_per_record_and_legend() {
        let records = vec![
            avg("Twitter", "Image", 120.0),
            avg("Twitter", "Video", 250.0),
            avg("Twitter", "Text", 80.0),
            avg("Facebook", "Image", 300.0),
            avg("Facebook", "Video", 410.0),
            avg("Facebook", "Text", f64::NAN),
        ];
        let layout = BarLayout::default();

        let svg = StaticChartRenderer::render_svg(
            (layout.chart.width, layout.chart.height),
            |area| ChartPlotter::draw_barplot(area, &layout, &records),
        )
        .unwrap()
        .to_lowercase();

        // lightgreen / lightblue / lightcoral: bars plus one legend swatch each
        assert_eq!(count(&svg, "fill=\"#90ee90\""), 3);
        assert_eq!(count(&svg, "fill=\"#add8e6\""), 3);
        assert_eq!(count(&svg, "fill=\"#f08080\""), 2);
        assert!(svg.contains("video"));
    }

    #[test]
    fn test_barplot_rejects_bad_palette() {
        let layout = BarLayout {
            palette: vec!["not-a-colour".into()],
            ..BarLayout::default()
        };
        let result = StaticChartRenderer::render_svg((800, 500), |area| {
            ChartPlotter::draw_barplot(area, &layout, &[avg("Twitter", "Image", 1.0)])
        });
        assert!(matches!(result, Err(RenderError::Color(_))));
    }

    #[test]
    fn test_lineplot_draws_curve() {
        let records: Vec<TimeRecord> = ["3/1", "3/2", "3/3", "3/4", "3/5", "3/6", "3/7"]
            .iter()
            .zip([410.0, 395.5, 502.25, 460.0, f64::NAN, 530.0, 498.0])
            .map(|(date, avg_likes)| TimeRecord {
                date: date.to_string(),
                avg_likes,
            })
            .collect();
        let layout = LineLayout::default();

        let svg = StaticChartRenderer::render_svg(
            (layout.chart.width, layout.chart.height),
            |area| ChartPlotter::draw_lineplot(area, &layout, &records),
        )
        .unwrap();

        assert!(svg.contains("stroke-width=\"2\""));
        assert!(svg.contains("3/7"));
        assert!(svg.contains("Date"));
        // seven vertical date labels plus the y title
        assert_eq!(count(&svg, "rotate(270"), 8);
    }

    #[test]
    fn test_empty_inputs_render_axes_only() {
        let layout = LineLayout::default();
        let svg = StaticChartRenderer::render_svg((800, 500), |area| {
            ChartPlotter::draw_lineplot(area, &layout, &[])
        })
        .unwrap();
        assert!(!svg.contains("stroke-width=\"2\""));
        assert!(svg.contains("Average Likes"));
    }
}
