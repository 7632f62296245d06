use crate::error::{DataError, Result};
use arrow_schema::SchemaRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Optional operations a connection may implement
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    /// Drop every dynamically registered dataset
    ResetRegisteredDatasets,
    /// Remove a single registered dataset
    Unregister,
    /// Register a row-oriented data frame
    RegisterDataFrame,
    /// Register an in-memory Arrow table
    RegisterArrow,
    /// Register a JSON file
    RegisterJson,
    /// Register a delimited text file
    RegisterCsv,
    /// Register a Parquet file
    RegisterParquet,
}

impl Capability {
    /// Every optional capability, in declaration order
    pub fn all() -> &'static [Capability] {
        &[
            Capability::ResetRegisteredDatasets,
            Capability::Unregister,
            Capability::RegisterDataFrame,
            Capability::RegisterArrow,
            Capability::RegisterJson,
            Capability::RegisterCsv,
            Capability::RegisterParquet,
        ]
    }

    /// Human readable description used in error messages
    pub fn description(&self) -> &'static str {
        match self {
            Capability::ResetRegisteredDatasets => "resetting registered datasets",
            Capability::Unregister => "un-registration",
            Capability::RegisterDataFrame => "registration of data frame datasets",
            Capability::RegisterArrow => "registration of arrow datasets",
            Capability::RegisterJson => "registration of json datasets",
            Capability::RegisterCsv => "registration of csv datasets",
            Capability::RegisterParquet => "registration of parquet datasets",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::ResetRegisteredDatasets => write!(f, "reset-registered-datasets"),
            Capability::Unregister => write!(f, "unregister"),
            Capability::RegisterDataFrame => write!(f, "register-data-frame"),
            Capability::RegisterArrow => write!(f, "register-arrow"),
            Capability::RegisterJson => write!(f, "register-json"),
            Capability::RegisterCsv => write!(f, "register-csv"),
            Capability::RegisterParquet => write!(f, "register-parquet"),
        }
    }
}

/// A row of data as key-value pairs
pub type DataRow = HashMap<String, serde_json::Value>;

/// How a backend should parse a delimited text file into typed columns.
///
/// Validating `schema` against the file's field count is left to the backend
/// at registration time, since only it reads the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvReadOptions {
    /// Whether the first row names the columns
    pub has_header: bool,
    /// Field separator
    pub delimiter: char,
    /// Expected file suffix, without the leading dot
    pub file_extension: String,
    /// Explicit column types; `None` asks the backend to infer them
    pub schema: Option<SchemaRef>,
}

impl CsvReadOptions {
    pub fn new(
        has_header: bool,
        delimiter: char,
        file_extension: impl Into<String>,
        schema: Option<SchemaRef>,
    ) -> Self {
        Self {
            has_header,
            delimiter,
            file_extension: file_extension.into(),
            schema,
        }
    }

    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_file_extension(mut self, file_extension: impl Into<String>) -> Self {
        self.file_extension = file_extension.into();
        self
    }

    pub fn with_schema(mut self, schema: SchemaRef) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Delimiter as a single byte, for byte-oriented CSV readers
    pub fn delimiter_byte(&self) -> Result<u8> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(DataError::invalid_configuration(format!(
                "CSV delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            )))
        }
    }
}

impl Default for CsvReadOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            delimiter: ',',
            file_extension: "csv".to_string(),
            schema: None,
        }
    }
}
