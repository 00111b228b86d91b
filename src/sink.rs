//! JSON-lines output.
//!
//! [`JsonLinesSink`] writes one JSON object per document, one document per
//! line, the format most index loaders accept for bulk import.
//!
//! ```
//! use marcsift::{Document, JsonLinesSink};
//!
//! let mut sink = JsonLinesSink::new(Vec::new());
//! let mut doc = Document::new();
//! doc.insert("id", "a1");
//! doc.insert("subject_t", vec!["Whaling", "Sea stories"]);
//! sink.write(&doc)?;
//!
//! let out = String::from_utf8(sink.into_inner()?).unwrap();
//! assert_eq!(out, "{\"id\":\"a1\",\"subject_t\":[\"Whaling\",\"Sea stories\"]}\n");
//! # Ok::<(), marcsift::SiftError>(())
//! ```

use std::io::{BufWriter, Write};

use crate::document::Document;
use crate::error::{Result, SiftError};

/// Writes documents as newline-delimited JSON.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: BufWriter<W>,
    written: usize,
}

impl<W: Write> JsonLinesSink<W> {
    /// Wrap a writer. Output is buffered.
    pub fn new(writer: W) -> Self {
        JsonLinesSink {
            writer: BufWriter::new(writer),
            written: 0,
        }
    }

    /// Write one document followed by a newline.
    ///
    /// # Errors
    ///
    /// [`SiftError::Json`] if serialization fails, [`SiftError::IoError`] if
    /// writing does.
    pub fn write(&mut self, doc: &Document) -> Result<()> {
        serde_json::to_writer(&mut self.writer, doc)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    /// Documents written so far.
    #[must_use]
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush buffered output.
    ///
    /// # Errors
    ///
    /// [`SiftError::IoError`] if flushing fails.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and return the underlying writer.
    ///
    /// # Errors
    ///
    /// [`SiftError::IoError`] if the final flush fails.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| SiftError::IoError(e.into_error()))
    }
}
