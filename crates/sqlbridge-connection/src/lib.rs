//! # sqlbridge-connection
//!
//! Pluggable backend contract for delegating dataset storage and SQL
//! execution to interchangeable engines (an embedded analytical database, a
//! distributed SQL engine, a custom store) while exchanging results as
//! schema-typed Arrow tables.
//!
//! ## Architecture
//!
//! - **SqlConnection**: the contract. `dialect`, `tables` and `fetch_query`
//!   are mandatory; dataset registration and removal are optional and
//!   default to [`DataError::UnsupportedOperation`]
//! - **ArrowTable**: the columnar table exchanged across the boundary, with
//!   schema reconciliation for query results
//! - **CsvReadOptions**: how a backend should parse delimited text
//! - **Dialect**: the SQL dialect a backend accepts
//! - **ConnectionRegistry**: creates connections by backend type and
//!   resolves a backend's dialect before connecting
//!
//! ## Capability discovery
//!
//! A backend overrides only the optional operations it can honor. Callers
//! try an operation and fall back when it is unsupported:
//!
//! ```rust
//! use sqlbridge_connection::{DataFrame, Result, SqlConnection};
//!
//! # async fn example(conn: &dyn SqlConnection, frame: DataFrame) -> Result<()> {
//! match conn.register_dataframe("cars", frame.clone()).await {
//!     Err(err) if err.is_unsupported() => {
//!         conn.register_arrow("cars", frame.to_arrow(None)?).await?;
//!     }
//!     other => other?,
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Backend Implementation
//!
//! To implement a new backend:
//!
//! 1. Create a struct that implements `SqlConnection`
//! 2. Override the optional operations the engine supports and list them in
//!    `capabilities()`
//! 3. Create a `ConnectionFactory` implementation
//! 4. Register the factory with `ConnectionRegistry`

pub mod dialect;
pub mod error;
pub mod frame;
pub mod registry;
pub mod table;
pub mod traits;
pub mod types;

// Re-export commonly used items
pub use dialect::Dialect;
pub use error::{BoxError, DataError, Result};
pub use frame::DataFrame;
pub use registry::{ConnectionConfig, ConnectionFactory, ConnectionRegistry};
pub use table::{schemas_compatible, ArrowTable};
pub use traits::SqlConnection;
pub use types::{Capability, CsvReadOptions, DataRow};

pub use arrow_schema::{Schema, SchemaRef};
