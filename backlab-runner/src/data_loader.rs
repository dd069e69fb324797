//! CSV bar loading.
//!
//! Reads daily OHLCV bars from a CSV file with a header row of
//! `date,open,high,low,close,volume`. Every row is validated on the way
//! in: malformed rows, insane OHLC geometry, and out-of-order dates all
//! fail with the offending row number, so a bad data file is diagnosable
//! without opening it.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use backlab_core::domain::Bar;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("row {row}: {source}")]
    Malformed {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("row {row}: bad OHLC geometry or non-finite field (date {date})")]
    InsaneBar { row: usize, date: NaiveDate },

    #[error("row {row}: date {date} is not after previous bar date {prev}")]
    NonMonotonicDate {
        row: usize,
        date: NaiveDate,
        prev: NaiveDate,
    },

    #[error("{path} contains no bars")]
    Empty { path: PathBuf },
}

#[derive(Debug, Deserialize)]
struct CsvBar {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
}

impl From<CsvBar> for Bar {
    fn from(row: CsvBar) -> Self {
        Bar {
            date: row.date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        }
    }
}

/// Loads and validates all bars from a CSV file.
///
/// Bars come back in file order, which must be strictly ascending by date.
/// Row numbers in errors are 1-based data rows (the header is row 0).
pub fn load_bars_csv(path: &Path) -> Result<Vec<Bar>, LoadError> {
    let mut reader = csv::Reader::from_path(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut bars: Vec<Bar> = Vec::new();
    for (i, record) in reader.deserialize::<CsvBar>().enumerate() {
        let row = i + 1;
        let bar: Bar = record
            .map_err(|source| LoadError::Malformed { row, source })?
            .into();

        if !bar.is_sane() {
            return Err(LoadError::InsaneBar {
                row,
                date: bar.date,
            });
        }
        if let Some(prev) = bars.last() {
            if bar.date <= prev.date {
                return Err(LoadError::NonMonotonicDate {
                    row,
                    date: bar.date,
                    prev: prev.date,
                });
            }
        }
        bars.push(bar);
    }

    if bars.is_empty() {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn loads_valid_file() {
        let file = write_csv(
            "date,open,high,low,close,volume\n\
             2024-01-02,100.0,101.0,99.0,100.5,1000000\n\
             2024-01-03,100.5,102.0,100.0,101.5,1200000\n",
        );
        let bars = load_bars_csv(file.path()).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(bars[1].close, 101.5);
    }

    #[test]
    fn rejects_out_of_order_dates() {
        let file = write_csv(
            "date,open,high,low,close,volume\n\
             2024-01-03,100.0,101.0,99.0,100.5,1000000\n\
             2024-01-02,100.5,102.0,100.0,101.5,1200000\n",
        );
        let err = load_bars_csv(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::NonMonotonicDate { row: 2, .. }));
    }

    #[test]
    fn rejects_bad_ohlc_geometry() {
        // high below low
        let file = write_csv(
            "date,open,high,low,close,volume\n\
             2024-01-02,100.0,99.0,101.0,100.5,1000000\n",
        );
        let err = load_bars_csv(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::InsaneBar { row: 1, .. }));
    }

    #[test]
    fn rejects_malformed_row_with_row_number() {
        let file = write_csv(
            "date,open,high,low,close,volume\n\
             2024-01-02,100.0,101.0,99.0,100.5,1000000\n\
             not-a-date,1,2,3,4,5\n",
        );
        let err = load_bars_csv(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Malformed { row: 2, .. }));
    }

    #[test]
    fn empty_file_is_an_error() {
        let file = write_csv("date,open,high,low,close,volume\n");
        let err = load_bars_csv(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Empty { .. }));
    }
}
