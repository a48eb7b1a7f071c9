//! Charts module - Scales, curves and chart rendering

mod curve;
mod plotter;
mod renderer;
mod scale;

pub use curve::{linear_curve, natural_curve};
pub use plotter::ChartPlotter;
pub use renderer::{Frame, RenderError, StaticChartRenderer};
pub use scale::{BandScale, LinearScale, OrdinalScale};
