use crate::domain::error::SecretsError;
use crate::domain::record::Record;
use serde::Serialize;
use std::io::{self, Write};
use tabled::builder::Builder;
use tabled::settings::Style;

/// Rendering mode for command output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Aligned table with a header row
    #[default]
    Table,
    /// A single JSON document
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Table
        }
    }
}

/// Output formatting errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl From<OutputError> for SecretsError {
    fn from(err: OutputError) -> Self {
        match err {
            OutputError::JsonError(e) => Self::Serialization(e),
            OutputError::IoError(e) => Self::Io(e),
        }
    }
}

/// Output writer trait for records and messages
pub trait OutputWriter {
    /// Write a list of records; JSON renders an array.
    fn write_records<R: Record>(&mut self, records: &[R], format: OutputFormat) -> Result<(), OutputError>;
    /// Write one record; JSON renders an object, the table has one row.
    fn write_record<R: Record>(&mut self, record: &R, format: OutputFormat) -> Result<(), OutputError>;
    fn write_message(&mut self, message: &str, format: OutputFormat) -> Result<(), OutputError>;
}

/// Writes to any `io::Write`, stdout in the binary
pub struct ConsoleWriter<W: Write> {
    out: W,
}

impl ConsoleWriter<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> ConsoleWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), OutputError> {
        // Serialize fully before writing so a failure never leaves partial output.
        let output = serde_json::to_string_pretty(value)?;
        writeln!(self.out, "{}", output)?;
        Ok(())
    }

    fn write_table<R: Record>(&mut self, records: &[R]) -> Result<(), OutputError> {
        writeln!(self.out, "{}", render_table(records))?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for ConsoleWriter<W> {
    fn write_records<R: Record>(&mut self, records: &[R], format: OutputFormat) -> Result<(), OutputError> {
        match format {
            OutputFormat::Json => self.write_json(records),
            OutputFormat::Table => self.write_table(records),
        }
    }

    fn write_record<R: Record>(&mut self, record: &R, format: OutputFormat) -> Result<(), OutputError> {
        match format {
            OutputFormat::Json => self.write_json(record),
            OutputFormat::Table => self.write_table(std::slice::from_ref(record)),
        }
    }

    fn write_message(&mut self, message: &str, format: OutputFormat) -> Result<(), OutputError> {
        match format {
            OutputFormat::Json => self.write_json(&serde_json::json!({ "message": message })),
            OutputFormat::Table => {
                writeln!(self.out, "{}", message)?;
                Ok(())
            }
        }
    }
}

/// Render records as a borderless table: one header line plus one line per record.
pub fn render_table<R: Record>(records: &[R]) -> String {
    let mut builder = Builder::default();
    builder.set_header(R::HEADERS.iter().copied());
    for record in records {
        builder.push_record(record.row().iter().map(|cell| single_line(cell)));
    }

    let mut table = builder.build();
    table.with(Style::blank());
    table.to_string()
}

// Line breaks are escaped so every record stays on one table line.
fn single_line(cell: &str) -> String {
    if cell.contains(['\n', '\r']) {
        cell.replace('\r', "\\r").replace('\n', "\\n")
    } else {
        cell.to_string()
    }
}
