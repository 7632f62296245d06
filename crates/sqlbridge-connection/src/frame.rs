use crate::error::Result;
use crate::table::ArrowTable;
use crate::types::DataRow;
use arrow_array::RecordBatch;
use arrow_json::reader::{infer_json_schema_from_iterator, ReaderBuilder};
use arrow_schema::{ArrowError, DataType, Field, Schema, SchemaRef};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const BATCH_SIZE: usize = 1024;

/// Row-oriented frame of loosely typed values, as produced by dataframe
/// libraries and JSON APIs before conversion to a columnar table.
///
/// `columns` fixes the column order; keys of a row that are not listed
/// there are ignored on conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataFrame {
    pub columns: Vec<String>,
    pub rows: Vec<DataRow>,
}

impl DataFrame {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn from_rows(columns: Vec<String>, rows: Vec<DataRow>) -> Self {
        Self { columns, rows }
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Infer a schema from the row values. Columns that never hold a
    /// non-null value are typed `Null`.
    pub fn infer_schema(&self) -> Result<Schema> {
        let inferred = infer_json_schema_from_iterator(self.rows.iter().map(|row| {
            let object: serde_json::Map<String, serde_json::Value> = row
                .iter()
                .filter(|(key, _)| self.columns.contains(key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            Ok::<_, ArrowError>(serde_json::Value::Object(object))
        }))?;

        let fields: Vec<Field> = self
            .columns
            .iter()
            .map(|name| match inferred.field_with_name(name) {
                Ok(field) => field.clone(),
                Err(_) => Field::new(name, DataType::Null, true),
            })
            .collect();

        Ok(Schema::new(fields))
    }

    /// Convert to a columnar table, using `schema` when given and inferring otherwise
    pub fn to_arrow(&self, schema: Option<SchemaRef>) -> Result<ArrowTable> {
        let schema = match schema {
            Some(schema) => schema,
            None => Arc::new(self.infer_schema()?),
        };

        // Inference widens mixed scalar columns to Utf8, so numbers and
        // booleans must be accepted as strings
        let mut decoder = ReaderBuilder::new(schema.clone())
            .with_batch_size(BATCH_SIZE)
            .with_coerce_primitive(true)
            .build_decoder()?;

        let mut batches: Vec<RecordBatch> = Vec::new();
        for chunk in self.rows.chunks(BATCH_SIZE) {
            decoder.serialize(chunk)?;
            if let Some(batch) = decoder.flush()? {
                batches.push(batch);
            }
        }

        ArrowTable::try_new(schema, batches)
    }
}
