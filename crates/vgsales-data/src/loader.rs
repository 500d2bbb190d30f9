//! Delimited-file loading.

use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, instrument};
use vgsales_common::{Result, SalesError};

/// Columns the input header must contain. Any other column (such as `Rank`)
/// is ignored.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    "Name",
    "Platform",
    "Year",
    "Genre",
    "Publisher",
    "NA_Sales",
    "EU_Sales",
    "JP_Sales",
    "Other_Sales",
    "Global_Sales",
];

/// A dataset row before year normalization. Sales that are blank or not
/// numeric are `None`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRecord {
    /// Game title.
    #[serde(rename = "Name")]
    pub name: String,
    /// Platform code.
    #[serde(rename = "Platform")]
    pub platform: String,
    /// Release year exactly as written in the file.
    #[serde(rename = "Year")]
    pub year: String,
    /// Genre.
    #[serde(rename = "Genre")]
    pub genre: String,
    /// Publisher.
    #[serde(rename = "Publisher")]
    pub publisher: String,
    /// North America sales.
    #[serde(rename = "NA_Sales", deserialize_with = "csv::invalid_option")]
    pub na_sales: Option<f64>,
    /// Europe sales.
    #[serde(rename = "EU_Sales", deserialize_with = "csv::invalid_option")]
    pub eu_sales: Option<f64>,
    /// Japan sales.
    #[serde(rename = "JP_Sales", deserialize_with = "csv::invalid_option")]
    pub jp_sales: Option<f64>,
    /// Rest-of-world sales.
    #[serde(rename = "Other_Sales", deserialize_with = "csv::invalid_option")]
    pub other_sales: Option<f64>,
    /// Worldwide sales.
    #[serde(rename = "Global_Sales", deserialize_with = "csv::invalid_option")]
    pub global_sales: Option<f64>,
}

/// Reads the sales dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataLoader {
    delimiter: u8,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl DataLoader {
    /// Creates a loader for comma-separated input.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a loader splitting fields on `delimiter`.
    ///
    /// # Errors
    ///
    /// Fails when `delimiter` is not a single-byte ASCII character.
    pub fn with_delimiter(delimiter: char) -> Result<Self> {
        u8::try_from(delimiter)
            .ok()
            .filter(u8::is_ascii)
            .map(|delimiter| Self { delimiter })
            .ok_or_else(|| {
                SalesError::validation_field(
                    format!("Delimiter must be ASCII, got '{delimiter}'"),
                    "dataset.delimiter",
                )
            })
    }

    /// Loads every row of the file at `path`.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be opened, a required column is missing, or
    /// a row is structurally malformed.
    #[instrument(skip(self), fields(path = %path.as_ref().display()))]
    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> Result<Vec<RawRecord>> {
        let file = File::open(path.as_ref()).map_err(|err| {
            SalesError::data_with_source(
                format!("Cannot open dataset '{}'", path.as_ref().display()),
                err,
            )
        })?;
        let records = self.load_reader(file)?;
        info!("Loaded {} rows", records.len());
        Ok(records)
    }

    /// Loads every row from `reader`.
    ///
    /// # Errors
    ///
    /// Fails when a required column is missing or a row is structurally
    /// malformed.
    pub fn load_reader<R: Read>(&self, reader: R) -> Result<Vec<RawRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        if let Some(missing) = REQUIRED_COLUMNS
            .iter()
            .find(|column| !headers.iter().any(|header| header == **column))
        {
            return Err(SalesError::data_at_line(
                format!("Missing required column '{missing}'"),
                1,
            ));
        }
        debug!("Header: {:?}", headers);

        reader
            .deserialize()
            .map(|row| row.map_err(SalesError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "Name,Platform,Year,Genre,Publisher,NA_Sales,EU_Sales,JP_Sales,Other_Sales,Global_Sales\n";

    #[test]
    fn test_sales_parsing() {
        let csv = format!("{HEADER}Tetris,GB,1989,Puzzle,Nintendo,23.2,,N/A,0.58,30.26\n");
        let rows = DataLoader::new().load_reader(csv.as_bytes()).unwrap();

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.name, "Tetris");
        assert_eq!(row.year, "1989");
        assert_eq!(row.na_sales, Some(23.2));
        assert_eq!(row.eu_sales, None);
        assert_eq!(row.jp_sales, None);
        assert_eq!(row.global_sales, Some(30.26));
    }

    #[test]
    fn test_missing_column_is_reported() {
        let csv = "Name,Platform,Year\nTetris,GB,1989\n";
        let err = DataLoader::new().load_reader(csv.as_bytes()).unwrap_err();

        assert!(matches!(err, SalesError::Data { line: Some(1), .. }));
        assert!(err.to_string().contains("Data error"));
    }

    #[test]
    fn test_custom_delimiter() {
        let csv = HEADER.replace(',', ";")
            + "Tetris;GB;1989;Puzzle;Nintendo;23.2;2.26;4.22;0.58;30.26\n";
        let loader = DataLoader::with_delimiter(';').unwrap();
        let rows = loader.load_reader(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].platform, "GB");
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        assert!(DataLoader::with_delimiter('§').is_err());
    }

    #[test]
    fn test_ragged_row_is_an_error() {
        let csv = format!("{HEADER}Tetris,GB,1989\n");
        let err = DataLoader::new().load_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, SalesError::Data { .. }));
    }
}
