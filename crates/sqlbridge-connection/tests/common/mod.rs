//! Fixture backends shared across integration tests
//!
//! - `MemoryConnection`: keeps datasets in memory, supports Arrow, JSON and
//!   Parquet registration plus removal, and answers `SELECT * FROM <name>`
//! - `ReadOnlyConnection`: only the mandatory methods
#![allow(dead_code)]

use arrow_array::{Int64Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema, SchemaRef};
use async_trait::async_trait;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use sqlbridge_connection::{
    ArrowTable, Capability, ConnectionConfig, ConnectionFactory, DataError, Dialect, Result,
    SqlConnection,
};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Install a test subscriber once; honours RUST_LOG
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Table with columns `a: Int64` and `b: Utf8`
pub fn table_a_int_b_string() -> ArrowTable {
    let schema = Arc::new(Schema::new(vec![
        Field::new("a", DataType::Int64, true),
        Field::new("b", DataType::Utf8, true),
    ]));
    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int64Array::from(vec![1, 2, 3])),
            Arc::new(StringArray::from(vec!["x", "y", "z"])),
        ],
    )
    .unwrap();
    ArrowTable::from_batch(batch)
}

/// Write `table` to a Parquet file at `path`
pub fn write_parquet(path: &Path, table: &ArrowTable) {
    let file = File::create(path).unwrap();
    let mut writer = ArrowWriter::try_new(file, table.schema(), None).unwrap();
    for batch in table.batches() {
        writer.write(batch).unwrap();
    }
    writer.close().unwrap();
}

/// Backend keeping every dataset in memory
pub struct MemoryConnection {
    builtin: HashMap<String, ArrowTable>,
    registered: RwLock<HashMap<String, ArrowTable>>,
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self {
            builtin: HashMap::new(),
            registered: RwLock::new(HashMap::new()),
        }
    }

    /// Add a table that exists before any registration call
    pub fn with_builtin(mut self, name: &str, table: ArrowTable) -> Self {
        self.builtin.insert(name.to_string(), table);
        self
    }

    async fn insert(&self, name: &str, table: ArrowTable) -> Result<()> {
        if self.builtin.contains_key(name) {
            return Err(DataError::backend(format!(
                "cannot replace built-in table {}",
                name
            )));
        }
        self.registered
            .write()
            .await
            .insert(name.to_string(), table);
        Ok(())
    }

    async fn lookup(&self, name: &str) -> Option<ArrowTable> {
        if let Some(table) = self.registered.read().await.get(name) {
            return Some(table.clone());
        }
        self.builtin.get(name).cloned()
    }
}

/// Extract the table name from `SELECT * FROM <name>`
fn select_all_target(query: &str) -> Option<String> {
    let tokens: Vec<&str> = query.split_whitespace().collect();
    match tokens.as_slice() {
        [select, "*", from, name] | [select, "*", from, name, ";"]
            if select.eq_ignore_ascii_case("select") && from.eq_ignore_ascii_case("from") =>
        {
            Some(name.trim_end_matches(';').trim_matches('"').to_string())
        }
        _ => None,
    }
}

#[async_trait]
impl SqlConnection for MemoryConnection {
    fn dialect(&self) -> Dialect {
        Dialect::DataFusion
    }

    fn capabilities(&self) -> Vec<Capability> {
        vec![
            Capability::ResetRegisteredDatasets,
            Capability::Unregister,
            Capability::RegisterArrow,
            Capability::RegisterJson,
            Capability::RegisterParquet,
        ]
    }

    async fn tables(&self) -> Result<HashMap<String, SchemaRef>> {
        let mut tables: HashMap<String, SchemaRef> = self
            .builtin
            .iter()
            .map(|(name, table)| (name.clone(), table.schema()))
            .collect();
        for (name, table) in self.registered.read().await.iter() {
            tables.insert(name.clone(), table.schema());
        }
        Ok(tables)
    }

    async fn fetch_query(&self, query: &str, schema: &Schema) -> Result<ArrowTable> {
        let name = select_all_target(query)
            .ok_or_else(|| DataError::backend(format!("unsupported query: {}", query)))?;
        let table = self
            .lookup(&name)
            .await
            .ok_or_else(|| DataError::backend(format!("table {} does not exist", name)))?;
        table.conform_to(schema)
    }

    async fn reset_registered_datasets(&self) -> Result<()> {
        self.registered.write().await.clear();
        Ok(())
    }

    async fn unregister(&self, name: &str) -> Result<()> {
        self.registered
            .write()
            .await
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| DataError::not_found(format!("registered dataset {}", name)))
    }

    async fn register_arrow(&self, name: &str, table: ArrowTable) -> Result<()> {
        self.insert(name, table).await
    }

    async fn register_json(&self, name: &str, path: &Path) -> Result<()> {
        let mut reader = BufReader::new(File::open(path).map_err(DataError::backend)?);
        let (schema, _) = arrow_json::reader::infer_json_schema(&mut reader, None)?;
        reader
            .seek(SeekFrom::Start(0))
            .map_err(DataError::backend)?;

        let schema = Arc::new(schema);
        let batches = arrow_json::ReaderBuilder::new(schema.clone())
            .build(reader)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.insert(name, ArrowTable::try_new(schema, batches)?)
            .await
    }

    async fn register_parquet(&self, name: &str, path: &Path) -> Result<()> {
        let file = File::open(path).map_err(DataError::backend)?;
        let builder =
            ParquetRecordBatchReaderBuilder::try_new(file).map_err(DataError::backend)?;
        let schema = builder.schema().clone();
        let batches = builder
            .build()
            .map_err(DataError::backend)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.insert(name, ArrowTable::try_new(schema, batches)?)
            .await
    }
}

/// Backend implementing only the mandatory methods
pub struct ReadOnlyConnection {
    tables: HashMap<String, ArrowTable>,
}

impl ReadOnlyConnection {
    pub fn new(tables: HashMap<String, ArrowTable>) -> Self {
        Self { tables }
    }
}

#[async_trait]
impl SqlConnection for ReadOnlyConnection {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    async fn tables(&self) -> Result<HashMap<String, SchemaRef>> {
        Ok(self
            .tables
            .iter()
            .map(|(name, table)| (name.clone(), table.schema()))
            .collect())
    }

    async fn fetch_query(&self, query: &str, schema: &Schema) -> Result<ArrowTable> {
        let name = select_all_target(query)
            .ok_or_else(|| DataError::backend(format!("unsupported query: {}", query)))?;
        let table = self
            .tables
            .get(&name)
            .cloned()
            .ok_or_else(|| DataError::backend(format!("table {} does not exist", name)))?;
        table.conform_to(schema)
    }
}

pub struct MemoryFactory;

impl ConnectionFactory for MemoryFactory {
    fn backend_type(&self) -> &'static str {
        "memory"
    }

    fn dialect(&self) -> Dialect {
        Dialect::DataFusion
    }

    fn create_connection(&self, _config: ConnectionConfig) -> Result<Arc<dyn SqlConnection>> {
        Ok(Arc::new(MemoryConnection::new()))
    }
}

pub struct ReadOnlyFactory;

impl ConnectionFactory for ReadOnlyFactory {
    fn backend_type(&self) -> &'static str {
        "read-only"
    }

    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    fn create_connection(&self, config: ConnectionConfig) -> Result<Arc<dyn SqlConnection>> {
        let mut tables = HashMap::new();
        if let Some(name) = config.option("seed_table") {
            tables.insert(name.to_string(), table_a_int_b_string());
        }
        Ok(Arc::new(ReadOnlyConnection::new(tables)))
    }
}
