//! In-memory tables parsed from CSV text.
//!
//! A [`Dataset`] is a single arrow `RecordBatch` whose column types are inferred
//! from the text: integers, floats and booleans become typed columns, anything
//! else stays a string. Empty fields and the usual missing-value tokens are
//! read as null.

pub mod error;

pub use error::TableError;

use arrow::array::{ArrayRef, Float64Array};
use arrow::compute::kernels::cmp;
use arrow::compute::{cast, concat_batches, filter_record_batch};
use arrow::csv::reader::Format;
use arrow::csv::{ReaderBuilder, WriterBuilder};
use arrow::datatypes::{DataType, SchemaRef};
use arrow::json::writer::JsonArray;
use arrow::record_batch::RecordBatch;
use regex::Regex;
use serde_json::{Map, Value};
use std::io::Cursor;
use std::sync::{Arc, LazyLock};

/// One row of a dataset, keyed by column name in header order.
pub type Record = Map<String, Value>;

/// Field values treated as missing, matching the pandas defaults.
static NULL_TOKENS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(|#N/A|#N/A N/A|#NA|-1\.#IND|-1\.#QNAN|-NaN|-nan|1\.#IND|1\.#QNAN",
        r"|<NA>|N/A|NA|NULL|NaN|None|n/a|nan|null)$",
    ))
    .expect("null token pattern is valid")
});

/// An immutable table of records.
#[derive(Debug, Clone)]
pub struct Dataset {
    batch: RecordBatch,
}

impl Dataset {
    /// Parse CSV text with a header row.
    ///
    /// Column types are inferred from every row before decoding. Rows shorter
    /// than the header are padded with nulls.
    pub fn parse(text: &str) -> Result<Self, TableError> {
        let (schema, _) = Format::default()
            .with_header(true)
            .with_truncated_rows(true)
            .with_null_regex(NULL_TOKENS.clone())
            .infer_schema(Cursor::new(text.as_bytes()), None)?;

        if schema.fields().is_empty() {
            return Err(TableError::EmptyHeader);
        }

        let schema = Arc::new(schema);
        let reader = ReaderBuilder::new(schema.clone())
            .with_header(true)
            .with_truncated_rows(true)
            .with_null_regex(NULL_TOKENS.clone())
            .with_batch_size(8192)
            .build(Cursor::new(text.as_bytes()))?;

        let batches = reader.collect::<Result<Vec<_>, _>>()?;
        let batch = concat_batches(&schema, &batches)?;

        Ok(Self { batch })
    }

    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    /// Column names in header order.
    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Result<&ArrayRef, TableError> {
        self.batch
            .column_by_name(name)
            .ok_or_else(|| TableError::ColumnNotFound(name.to_string()))
    }

    /// Whether the named column holds numbers.
    pub fn is_numeric(&self, name: &str) -> Result<bool, TableError> {
        Ok(self.column(name)?.data_type().is_numeric())
    }

    /// Keep only rows where `column >= threshold`.
    ///
    /// Rows with a null value in `column` never satisfy the predicate.
    pub fn filter_min(&self, column: &str, threshold: f64) -> Result<Self, TableError> {
        let values = self.column(column)?;
        let data_type = values.data_type();
        if !(data_type.is_numeric() || *data_type == DataType::Null) {
            return Err(TableError::NonNumericColumn {
                column: column.to_string(),
                data_type: data_type.clone(),
            });
        }

        let values = cast(values.as_ref(), &DataType::Float64)?;
        let mask = cmp::gt_eq(&values, &Float64Array::new_scalar(threshold))?;
        let batch = filter_record_batch(&self.batch, &mask)?;

        Ok(Self { batch })
    }

    /// Encode every row as a JSON object.
    ///
    /// Nulls are written explicitly so each record carries every column.
    pub fn to_records(&self) -> Result<Vec<Record>, TableError> {
        if self.batch.num_rows() == 0 {
            return Ok(Vec::new());
        }

        let mut writer = arrow::json::WriterBuilder::new()
            .with_explicit_nulls(true)
            .build::<_, JsonArray>(Vec::new());
        writer.write(&self.batch)?;
        writer.finish()?;

        let records = serde_json::from_slice(&writer.into_inner())?;
        Ok(records)
    }

    /// Serialize back to CSV with a header row.
    pub fn to_csv(&self) -> Result<Vec<u8>, TableError> {
        let mut writer = WriterBuilder::new().with_header(true).build(Vec::new());
        writer.write(&self.batch)?;
        Ok(writer.into_inner())
    }
}
