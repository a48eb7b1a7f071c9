//! Data Processor Module
//! Turns loaded frames into the typed records each chart consumes.

use super::loader::{DataLoader, LoaderError};
use polars::prelude::DataFrame;
use serde::Serialize;
use std::collections::HashSet;

/// One post: platform and its like count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LikesRecord {
    pub platform: String,
    pub likes: f64,
}

/// Average likes for a platform and post type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvgLikesRecord {
    pub platform: String,
    pub post_type: String,
    pub avg_likes: f64,
}

/// Average likes for one day label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeRecord {
    pub date: String,
    pub avg_likes: f64,
}

/// Handles conversion from DataFrame columns to records.
pub struct DataProcessor;

impl DataProcessor {
    /// Columns: Platform, Likes
    pub fn likes_records(df: &DataFrame) -> Result<Vec<LikesRecord>, LoaderError> {
        let platforms = DataLoader::text_column(df, "Platform")?;
        let likes = DataLoader::numeric_column(df, "Likes")?;

        Ok(platforms
            .into_iter()
            .zip(likes)
            .map(|(platform, likes)| LikesRecord { platform, likes })
            .collect())
    }

    /// Columns: Platform, PostType, AvgLikes
    pub fn avg_likes_records(df: &DataFrame) -> Result<Vec<AvgLikesRecord>, LoaderError> {
        let platforms = DataLoader::text_column(df, "Platform")?;
        let post_types = DataLoader::text_column(df, "PostType")?;
        let avg_likes = DataLoader::numeric_column(df, "AvgLikes")?;

        Ok(platforms
            .into_iter()
            .zip(post_types)
            .zip(avg_likes)
            .map(|((platform, post_type), avg_likes)| AvgLikesRecord {
                platform,
                post_type,
                avg_likes,
            })
            .collect())
    }

    /// Columns: Date, AvgLikes
    pub fn time_records(df: &DataFrame) -> Result<Vec<TimeRecord>, LoaderError> {
        let dates = DataLoader::text_column(df, "Date")?;
        let avg_likes = DataLoader::numeric_column(df, "AvgLikes")?;

        Ok(dates
            .into_iter()
            .zip(avg_likes)
            .map(|(date, avg_likes)| TimeRecord { date, avg_likes })
            .collect())
    }

    /// Distinct values in order of first appearance.
    pub fn unique_in_order<'a, I>(values: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = HashSet::new();
        values
            .into_iter()
            .filter(|v| seen.insert(*v))
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn test_unique_in_order() {
        let values = ["Instagram", "Twitter", "Instagram", "Facebook", "Twitter"];
        assert_eq!(
            DataProcessor::unique_in_order(values),
            vec!["Instagram", "Twitter", "Facebook"]
        );
    }

    #[test]
    fn test_avg_likes_records() {
        let df = df!(
            "Platform" => ["Twitter", "Twitter"],
            "PostType" => ["Image", "Video"],
            "AvgLikes" => [120.5, 88.0],
        )
        .unwrap();

        let records = DataProcessor::avg_likes_records(&df).unwrap();
        assert_eq!(
            records[1],
            AvgLikesRecord {
                platform: "Twitter".into(),
                post_type: "Video".into(),
                avg_likes: 88.0,
            }
        );
    }

    #[test]
    fn test_likes_records_integer_column() {
        let df = df!("Platform" => ["LinkedIn"], "Likes" => [300i64]).unwrap();
        let records = DataProcessor::likes_records(&df).unwrap();
        assert_eq!(records[0].likes, 300.0);
    }

    #[test]
    fn test_time_records_missing_column() {
        let df = df!("Day" => ["3/1"], "AvgLikes" => [1.0]).unwrap();
        assert!(matches!(
            DataProcessor::time_records(&df),
            Err(LoaderError::MissingColumn(c)) if c == "Date"
        ));
    }
}
