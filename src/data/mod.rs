//! Data module - CSV loading and record extraction

mod loader;
mod processor;

pub use loader::{DataLoader, LoaderError};
pub use processor::{AvgLikesRecord, DataProcessor, LikesRecord, TimeRecord};
