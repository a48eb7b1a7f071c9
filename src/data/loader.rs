//! CSV Data Loader Module
//! Handles CSV file loading and typed column extraction using Polars.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
    #[error("Data file not found: {0}")]
    NotFound(PathBuf),
    #[error("Missing column '{0}'")]
    MissingColumn(String),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Handles CSV file loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file. Malformed rows are tolerated rather than failing the load.
    pub fn load_csv(path: &Path) -> Result<DataFrame, LoaderError> {
        if !path.is_file() {
            return Err(LoaderError::NotFound(path.to_path_buf()));
        }

        let csv_err = |source| LoaderError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let df = LazyCsvReader::new(path)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()
            .map_err(csv_err)?
            .collect()
            .map_err(csv_err)?;

        log::debug!(
            "loaded {} ({} rows, columns: {:?})",
            path.display(),
            df.height(),
            df.get_column_names()
        );
        Ok(df)
    }

    /// Read a column as text. Nulls become empty strings.
    pub fn text_column(df: &DataFrame, name: &str) -> Result<Vec<String>, LoaderError> {
        let column = df
            .column(name)
            .map_err(|_| LoaderError::MissingColumn(name.to_string()))?;
        let text = column.cast(&DataType::String)?;
        let ca = text.as_materialized_series().str()?;

        Ok(ca
            .into_iter()
            .map(|v| v.map(|s| s.trim().to_string()).unwrap_or_default())
            .collect())
    }

    /// Read a column as numbers. Values that do not parse become NaN.
    pub fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<f64>, LoaderError> {
        let column = df
            .column(name)
            .map_err(|_| LoaderError::MissingColumn(name.to_string()))?;
        let values = column.cast(&DataType::Float64)?;
        let ca = values.as_materialized_series().f64()?;

        Ok(ca.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_and_extract_columns() {
        let file = write_csv("Platform,Likes\nTwitter,10\nFacebook,25\n");
        let df = DataLoader::load_csv(file.path()).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(
            DataLoader::text_column(&df, "Platform").unwrap(),
            vec!["Twitter", "Facebook"]
        );
        assert_eq!(DataLoader::numeric_column(&df, "Likes").unwrap(), vec![10.0, 25.0]);
    }

    #[test]
    fn test_malformed_number_becomes_nan() {
        let file = write_csv("Date,AvgLikes\n3/1,12.5\n3/2,oops\n3/3,7\n");
        let df = DataLoader::load_csv(file.path()).unwrap();

        let values = DataLoader::numeric_column(&df, "AvgLikes").unwrap();
        assert_eq!(values.len(), 3);
        assert_eq!(values[0], 12.5);
        assert!(values[1].is_nan());
        assert_eq!(values[2], 7.0);
    }

    #[test]
    fn test_missing_column() {
        let file = write_csv("Platform,Likes\nTwitter,10\n");
        let df = DataLoader::load_csv(file.path()).unwrap();

        assert!(matches!(
            DataLoader::numeric_column(&df, "AvgLikes"),
            Err(LoaderError::MissingColumn(name)) if name == "AvgLikes"
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = DataLoader::load_csv(Path::new("/definitely/not/here.csv"));
        assert!(matches!(result, Err(LoaderError::NotFound(_))));
    }
}
