use std::io::{self, Write};

use parking_lot::Mutex;

use crate::error::SinkError;
use crate::record::Record;

/// Target used when records are forwarded to the `log` facade.
pub const LOG_TARGET: &str = "lifecycle";

/// Destination for formatted records.
///
/// Implementations decide how a record is printed. The logger never retries
/// and never surfaces a failure to its caller; errors are only reported
/// through `tracing`.
///
/// # Usage
///
/// ```
/// # use lifecycle_logger::{Record, Sink, SinkError};
/// struct Stderr;
///
/// impl Sink for Stderr {
///     fn write(&self, record: &Record) -> Result<(), SinkError> {
///         eprintln!("{}", record);
///         Ok(())
///     }
/// }
/// ```
pub trait Sink: Send + Sync {
    fn write(&self, record: &Record) -> Result<(), SinkError>;
}

/// Prints each record on its own line to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl Sink for StdoutSink {
    fn write(&self, record: &Record) -> Result<(), SinkError> {
        let mut out = io::stdout().lock();
        writeln!(out, "{}", record)?;
        Ok(())
    }
}

/// Writes each record as a line to any writer, e.g. a file.
#[derive(Debug)]
pub struct WriterSink<W: Write + Send>(Mutex<W>);

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self(Mutex::new(writer))
    }

    pub fn into_inner(self) -> W {
        self.0.into_inner()
    }
}

impl<W: Write + Send> Sink for WriterSink<W> {
    fn write(&self, record: &Record) -> Result<(), SinkError> {
        let mut writer = self.0.lock();
        writeln!(writer, "{}", record)?;
        writer.flush()?;
        Ok(())
    }
}

/// Keeps records in memory.
#[derive(Debug, Default)]
pub struct MemorySink(Mutex<Vec<Record>>);

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records written so far, oldest first.
    pub fn records(&self) -> Vec<Record> {
        self.0.lock().clone()
    }

    /// Records rendered as text.
    pub fn lines(&self) -> Vec<String> {
        self.0.lock().iter().map(ToString::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.0.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }

    pub fn clear(&self) {
        self.0.lock().clear();
    }
}

impl Sink for MemorySink {
    fn write(&self, record: &Record) -> Result<(), SinkError> {
        self.0.lock().push(record.clone());
        Ok(())
    }
}

/// Forwards records to the `log` facade at info level, so any `log`
/// backend (log4rs, env_logger, ...) receives them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl Sink for LogSink {
    fn write(&self, record: &Record) -> Result<(), SinkError> {
        log::info!(target: LOG_TARGET, "{}", record);
        Ok(())
    }
}
