use crate::error::{DataError, Result};
use arrow_array::{ArrayRef, RecordBatch, RecordBatchOptions};
use arrow_cast::{can_cast_types, cast_with_options, CastOptions};
use arrow_schema::{Schema, SchemaRef};
use arrow_select::concat::concat_batches;
use std::sync::Arc;
use tracing::debug;

/// Columnar, schema-typed table exchanged between callers and backends
#[derive(Debug, Clone)]
pub struct ArrowTable {
    schema: SchemaRef,
    batches: Vec<RecordBatch>,
}

impl ArrowTable {
    /// Create a table, checking that every batch carries the table schema
    pub fn try_new(schema: SchemaRef, batches: Vec<RecordBatch>) -> Result<Self> {
        for (idx, batch) in batches.iter().enumerate() {
            if batch.schema_ref().fields() != schema.fields() {
                return Err(DataError::schema_mismatch(format!(
                    "batch {} has schema {} but table schema is {}",
                    idx,
                    batch.schema(),
                    schema
                )));
            }
        }
        Ok(Self { schema, batches })
    }

    pub fn from_batch(batch: RecordBatch) -> Self {
        Self {
            schema: batch.schema(),
            batches: vec![batch],
        }
    }

    /// A table with no rows
    pub fn empty(schema: SchemaRef) -> Self {
        Self {
            schema,
            batches: Vec::new(),
        }
    }

    pub fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }

    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    pub fn into_batches(self) -> Vec<RecordBatch> {
        self.batches
    }

    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(|b| b.num_rows()).sum()
    }

    pub fn num_columns(&self) -> usize {
        self.schema.fields().len()
    }

    /// Concatenate all batches into one
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        Ok(concat_batches(&self.schema, self.batches.iter())?)
    }

    /// Reconcile this table with the schema a caller expects.
    ///
    /// Columns are matched by name and reordered to the expected order.
    /// Differing types are cast when Arrow supports the conversion; values
    /// that do not survive the cast are an error rather than NULL.
    pub fn conform_to(self, expected: &Schema) -> Result<Self> {
        if self.schema.fields() == expected.fields() {
            return Ok(self);
        }

        let actual = self.schema.clone();
        if let Some(extra) = actual
            .fields()
            .iter()
            .find(|f| expected.field_with_name(f.name()).is_err())
        {
            return Err(DataError::schema_mismatch(format!(
                "unexpected column '{}' in result",
                extra.name()
            )));
        }

        // For each expected field, the index of its source column and whether it needs a cast
        let mut plan = Vec::with_capacity(expected.fields().len());
        for field in expected.fields() {
            let idx = actual.index_of(field.name()).map_err(|_| {
                DataError::schema_mismatch(format!("missing column '{}' in result", field.name()))
            })?;
            let source_type = actual.field(idx).data_type();
            let needs_cast = source_type != field.data_type();
            if needs_cast {
                if !can_cast_types(source_type, field.data_type()) {
                    return Err(DataError::schema_mismatch(format!(
                        "column '{}' has type {} which cannot be cast to {}",
                        field.name(),
                        source_type,
                        field.data_type()
                    )));
                }
                debug!(
                    "Casting column {} from {} to {}",
                    field.name(),
                    source_type,
                    field.data_type()
                );
            }
            plan.push((idx, needs_cast));
        }

        // Name matching alone would silently drop a duplicated column
        if actual.fields().len() != expected.fields().len() {
            return Err(DataError::schema_mismatch(format!(
                "result has {} columns but {} were expected",
                actual.fields().len(),
                expected.fields().len()
            )));
        }

        let target = Arc::new(expected.clone());
        let cast_options = CastOptions {
            safe: false,
            ..Default::default()
        };

        let batches = self
            .batches
            .iter()
            .map(|batch| {
                let columns = expected
                    .fields()
                    .iter()
                    .zip(&plan)
                    .map(|(field, (idx, needs_cast))| {
                        let column = batch.column(*idx);
                        if *needs_cast {
                            cast_with_options(column, field.data_type(), &cast_options).map_err(
                                |e| {
                                    DataError::schema_mismatch(format!(
                                        "failed to cast column '{}': {}",
                                        field.name(),
                                        e
                                    ))
                                },
                            )
                        } else {
                            Ok(column.clone())
                        }
                    })
                    .collect::<Result<Vec<ArrayRef>>>()?;

                let options = RecordBatchOptions::new().with_row_count(Some(batch.num_rows()));
                RecordBatch::try_new_with_options(target.clone(), columns, &options)
                    .map_err(|e| DataError::schema_mismatch(e.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            schema: target,
            batches,
        })
    }
}

/// Whether `actual` can stand in for `expected`: the same column names with
/// the same data types, ignoring column order, nullability and metadata
pub fn schemas_compatible(actual: &Schema, expected: &Schema) -> bool {
    actual.fields().len() == expected.fields().len()
        && expected.fields().iter().all(|field| {
            actual
                .field_with_name(field.name())
                .map(|f| f.data_type() == field.data_type())
                .unwrap_or(false)
        })
}
