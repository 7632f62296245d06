use crate::dialect::Dialect;
use crate::error::{DataError, Result};
use crate::frame::DataFrame;
use crate::table::ArrowTable;
use crate::types::{Capability, CsvReadOptions};
use arrow_schema::{Schema, SchemaRef};
use async_trait::async_trait;
use downcast_rs::{impl_downcast, DowncastSync};
use std::collections::HashMap;
use std::path::Path;

/// Connection to a SQL backend that stores datasets and executes queries,
/// exchanging results as Arrow tables.
///
/// `dialect`, `tables` and `fetch_query` are mandatory. Every other
/// operation is optional: its default body returns
/// [`DataError::UnsupportedOperation`] without side effects, and a backend
/// overrides exactly the operations it can honor. Callers discover support
/// by trying an operation and branching on [`DataError::is_unsupported`],
/// or up front through [`SqlConnection::supports`].
///
/// Registration is all-or-nothing: a failing `register_*` call must not
/// leave a partially registered dataset behind.
#[async_trait]
pub trait SqlConnection: DowncastSync {
    /// SQL dialect accepted by this backend
    fn dialect(&self) -> Dialect;

    /// Optional capabilities this backend overrides.
    /// Advisory only; attempting the operation is authoritative.
    fn capabilities(&self) -> Vec<Capability> {
        Vec::new()
    }

    /// Check if a specific capability is advertised
    fn supports(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    /// All datasets visible to this connection, registered or pre-existing
    async fn tables(&self) -> Result<HashMap<String, SchemaRef>>;

    /// Execute `query` and return a table conforming to `schema`.
    ///
    /// `schema` is the result schema the caller expects. Backends produce it
    /// directly or reconcile their output with [`ArrowTable::conform_to`];
    /// a result that cannot be reconciled fails with
    /// [`DataError::SchemaMismatch`]. Row order is whatever the backend yields.
    async fn fetch_query(&self, query: &str, schema: &Schema) -> Result<ArrowTable>;

    /// Drop every dataset added through `register_*`
    async fn reset_registered_datasets(&self) -> Result<()> {
        Err(DataError::unsupported(Capability::ResetRegisteredDatasets))
    }

    /// Remove a single registered dataset
    async fn unregister(&self, _name: &str) -> Result<()> {
        Err(DataError::unsupported(Capability::Unregister))
    }

    /// Register a row-oriented data frame under `name`
    async fn register_dataframe(&self, _name: &str, _frame: DataFrame) -> Result<()> {
        Err(DataError::unsupported(Capability::RegisterDataFrame))
    }

    /// Register an in-memory Arrow table under `name`
    async fn register_arrow(&self, _name: &str, _table: ArrowTable) -> Result<()> {
        Err(DataError::unsupported(Capability::RegisterArrow))
    }

    /// Register a JSON file under `name`
    async fn register_json(&self, _name: &str, _path: &Path) -> Result<()> {
        Err(DataError::unsupported(Capability::RegisterJson))
    }

    /// Register a delimited text file under `name`
    async fn register_csv(
        &self,
        _name: &str,
        _path: &Path,
        _options: &CsvReadOptions,
    ) -> Result<()> {
        Err(DataError::unsupported(Capability::RegisterCsv))
    }

    /// Register a Parquet file under `name`
    async fn register_parquet(&self, _name: &str, _path: &Path) -> Result<()> {
        Err(DataError::unsupported(Capability::RegisterParquet))
    }

    /// DataFusion session in which every dataset of this connection is an
    /// empty table with its schema, for planning queries without data
    #[cfg(feature = "datafusion")]
    async fn planning_context(&self) -> Result<datafusion::prelude::SessionContext> {
        use datafusion::datasource::empty::EmptyTable;
        use std::sync::Arc;

        let ctx = datafusion::prelude::SessionContext::new();
        for (name, schema) in self.tables().await? {
            ctx.register_table(name.as_str(), Arc::new(EmptyTable::new(schema)))?;
        }
        Ok(ctx)
    }
}

impl_downcast!(sync SqlConnection);
