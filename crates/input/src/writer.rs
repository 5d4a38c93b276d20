//! Append-only writer for shaped output streams.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use smoothwheel_common::error::{SmoothwheelError, SmoothwheelResult};
use smoothwheel_engine::sink::ScrollSink;
use smoothwheel_model::event::{OutputEvent, OutputStreamHeader};

/// Writes output events to a JSONL file in append-only mode.
pub struct OutputWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    events_written: u64,
    last_error: Option<SmoothwheelError>,
}

impl OutputWriter {
    /// Create a new writer, writing the header as the first line.
    pub fn new(path: PathBuf, header: &OutputStreamHeader) -> SmoothwheelResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;

        let mut writer = BufWriter::new(file);

        // Header as a comment line (prefixed with #)
        let header_json = serde_json::to_string(header)?;
        writeln!(writer, "# {header_json}")
            .map_err(|e| SmoothwheelError::input(format!("Failed to write header: {e}")))?;

        Ok(Self {
            writer,
            path,
            events_written: 0,
            last_error: None,
        })
    }

    /// Write a single event as a JSONL line.
    pub fn write_event(&mut self, event: &OutputEvent) -> SmoothwheelResult<()> {
        let json = serde_json::to_string(event)?;
        writeln!(self.writer, "{json}")
            .map_err(|e| SmoothwheelError::input(format!("Failed to write event: {e}")))?;
        self.events_written += 1;

        if self.events_written % 1000 == 0 {
            self.flush()?;
        }

        Ok(())
    }

    /// Flush buffered writes to disk.
    pub fn flush(&mut self) -> SmoothwheelResult<()> {
        self.writer
            .flush()
            .map_err(|e| SmoothwheelError::input(format!("Failed to flush events: {e}")))?;
        Ok(())
    }

    /// Take the first write error seen through the [`ScrollSink`] interface.
    pub fn take_error(&mut self) -> Option<SmoothwheelError> {
        self.last_error.take()
    }

    /// Number of events written.
    pub fn events_written(&self) -> u64 {
        self.events_written
    }

    /// Path to the output file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScrollSink for OutputWriter {
    fn post(&mut self, event: OutputEvent) {
        if let Err(e) = self.write_event(&event) {
            tracing::warn!(path = %self.path.display(), error = %e, "Dropping output event");
            self.last_error.get_or_insert(e);
        }
    }
}

impl Drop for OutputWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
