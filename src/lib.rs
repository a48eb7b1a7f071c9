//! Social Charts - static statistical charts from social media CSV data
//!
//! Renders a boxplot of likes per platform, a grouped bar chart of average
//! likes per platform and post type, and a line chart of average likes per
//! day, then embeds them in a host HTML document.

pub mod charts;
pub mod config;
pub mod data;
pub mod pipeline;
pub mod report;
pub mod stats;

pub use config::Settings;
pub use pipeline::{ChartPipeline, RunSummary};
