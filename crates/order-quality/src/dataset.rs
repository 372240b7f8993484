//! Dataset loading and typed column access.
//!
//! A [`Dataset`] is a loaded CSV held as a polars `DataFrame` plus the path it
//! came from. No schema is enforced at load time; the checks ask for the
//! columns they need and get a [`QualityError::Schema`] or
//! [`QualityError::TypeCoercion`] when those are absent or unreadable.

use crate::error::{QualityError, Result};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Order identifier, expected to be unique.
pub const ORDER_ID: &str = "OrderID";
/// Unit price.
pub const PRICE: &str = "Price";
/// Units ordered.
pub const QUANTITY: &str = "Quantity";
/// Stored order total.
pub const TOTAL_AMOUNT: &str = "TotalAmount";
/// Order date as written in the source file.
pub const ORDER_DATE: &str = "OrderDate";
/// Name of the derived `Price * Quantity` series.
pub const CALCULATED_TOTAL_AMOUNT: &str = "CalculatedTotalAmount";

/// Columns every check run depends on.
pub const REQUIRED_COLUMNS: [&str; 5] = [ORDER_ID, PRICE, QUANTITY, TOTAL_AMOUNT, ORDER_DATE];

/// Offset from a 0-based record index to its spreadsheet row number:
/// one for 1-based numbering plus one for the header row.
pub const HEADER_OFFSET: usize = 2;

/// Field values read as null in addition to empty fields.
pub const NULL_MARKERS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Spreadsheet row number for a 0-based record index.
#[inline]
pub fn row_number(index: usize) -> usize {
    index + HEADER_OFFSET
}

/// An in-memory tabular dataset.
#[derive(Debug, Clone)]
pub struct Dataset {
    df: DataFrame,
    source: PathBuf,
}

impl Dataset {
    /// Load a delimited file whose first row is the header.
    ///
    /// # Errors
    ///
    /// Returns [`QualityError::Load`] when the file is missing, unreadable or
    /// malformed (for example rows with more fields than the header).
    pub fn load(path: impl AsRef<Path>, delimiter: u8) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(QualityError::Load {
                path: path.to_path_buf(),
                reason: "file not found".to_string(),
            });
        }

        debug!("Reading '{}' with delimiter {:?}", path.display(), delimiter as char);

        let null_values = NullValues::AllColumns(NULL_MARKERS.iter().map(|m| (*m).into()).collect());
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .with_parse_options(
                CsvParseOptions::default()
                    .with_separator(delimiter)
                    .with_quote_char(Some(b'"'))
                    .with_null_values(Some(null_values)),
            )
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .and_then(|reader| reader.finish())
            .map_err(|e| QualityError::Load {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        debug!("Loaded {:?} (rows, columns) from '{}'", df.shape(), path.display());

        Ok(Self {
            df,
            source: path.to_path_buf(),
        })
    }

    /// Wrap an existing DataFrame, e.g. one built in memory.
    pub fn from_dataframe(df: DataFrame) -> Self {
        Self {
            df,
            source: PathBuf::from("<memory>"),
        }
    }

    /// Path the dataset was loaded from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Number of records, excluding the header.
    pub fn total_rows(&self) -> usize {
        self.df.height()
    }

    /// Header names in file order.
    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    /// The underlying DataFrame.
    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    /// Fail with a schema error naming the first absent column.
    pub fn require_columns(&self, columns: &[&str]) -> Result<()> {
        let present = self.column_names();
        match columns
            .iter()
            .find(|c| !present.iter().any(|p| p.as_str() == **c))
        {
            Some(missing) => Err(self.schema_error(missing)),
            None => Ok(()),
        }
    }

    fn series(&self, name: &str) -> Result<&Series> {
        self.df
            .column(name)
            .map(|column| column.as_materialized_series())
            .map_err(|_| self.schema_error(name))
    }

    fn schema_error(&self, column: &str) -> QualityError {
        QualityError::Schema {
            column: column.to_string(),
            path: self.source.clone(),
        }
    }

    /// Per-record flag: true when any field of the record is null.
    pub fn rows_with_nulls(&self) -> Vec<bool> {
        let mut flags = vec![false; self.total_rows()];
        for column in self.df.get_columns() {
            let nulls = column.as_materialized_series().is_null();
            for (flag, is_null) in flags.iter_mut().zip(nulls.into_iter()) {
                if is_null.unwrap_or(false) {
                    *flag = true;
                }
            }
        }
        flags
    }

    /// A column read as `f64`. Nulls stay null; any other value that cannot
    /// be read as a number is an error.
    pub fn numeric_column(&self, name: &str) -> Result<Float64Chunked> {
        let series = self.series(name)?;
        let numeric = series
            .strict_cast(&DataType::Float64)
            .map_err(|e| QualityError::TypeCoercion {
                column: name.to_string(),
                reason: e.to_string(),
            })?;
        Ok(numeric.f64()?.clone())
    }

    /// A column rendered as text, whatever its inferred type.
    pub fn string_column(&self, name: &str) -> Result<StringChunked> {
        let series = self.series(name)?;
        let text = series.cast(&DataType::String)?;
        Ok(text.str()?.clone())
    }

    /// The derived `Price * Quantity` series, named
    /// [`CALCULATED_TOTAL_AMOUNT`]. Null when either operand is null.
    pub fn calculated_total_amount(&self) -> Result<Series> {
        let price = self.numeric_column(PRICE)?;
        let quantity = self.numeric_column(QUANTITY)?;
        let values: Vec<Option<f64>> = price
            .into_iter()
            .zip(quantity.into_iter())
            .map(|(p, q)| Some(p? * q?))
            .collect();
        Ok(Series::new(CALCULATED_TOTAL_AMOUNT.into(), values))
    }
}
