//! Stats module - quartile summaries

mod calculator;

pub use calculator::{GroupSummary, Quartiles, StatsCalculator};
