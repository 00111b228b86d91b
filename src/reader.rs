//! Reading MARC records from ISO 2709 byte streams.
//!
//! [`MarcReader`] parses one record at a time from any [`std::io::Read`]
//! source. It is also an [`Iterator`] over `MarcResult<Record>`, so it can be
//! handed straight to [`Mapper::process_results`](crate::Mapper::process_results).
//!
//! Parsing is strict: a truncated record, a malformed directory or a field
//! running past the data area is an error, and the iterator stops after the
//! first one.
//!
//! # Examples
//!
//! ```no_run
//! use marcsift::MarcReader;
//! use std::fs::File;
//!
//! let file = File::open("records.mrc")?;
//! let mut reader = MarcReader::new(file);
//!
//! while let Some(record) = reader.read_record()? {
//!     println!("Record type: {}", record.leader.record_type);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::io::{ErrorKind, Read};

use tracing::trace;

use crate::error::{MarcError, MarcResult};
use crate::leader::{Leader, LEADER_LEN};
use crate::record::{Field, Record};

const FIELD_TERMINATOR: u8 = 0x1E;
const SUBFIELD_DELIMITER: u8 = 0x1F;
const DIRECTORY_ENTRY_LEN: usize = 12;

/// Reader for ISO 2709 binary MARC.
#[derive(Debug)]
pub struct MarcReader<R: Read> {
    reader: R,
    records_read: usize,
    failed: bool,
}

impl<R: Read> MarcReader<R> {
    /// Create a reader over `reader`.
    pub fn new(reader: R) -> Self {
        MarcReader {
            reader,
            records_read: 0,
            failed: false,
        }
    }

    /// Number of records successfully read so far.
    #[must_use]
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Read the next record, or `None` at a clean end of input.
    ///
    /// # Errors
    ///
    /// - [`MarcError::InvalidLeader`] for a leader with bad lengths
    /// - [`MarcError::TruncatedRecord`] if the input ends inside a record
    /// - [`MarcError::InvalidRecord`] / [`MarcError::InvalidField`] for a
    ///   malformed directory or field
    /// - [`MarcError::IoError`] for read failures
    pub fn read_record(&mut self) -> MarcResult<Option<Record>> {
        let mut leader_bytes = [0u8; LEADER_LEN];
        match self.reader.read_exact(&mut leader_bytes) {
            Ok(()) => {},
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(MarcError::IoError(e)),
        }

        let leader = Leader::from_bytes(&leader_bytes)?;
        leader.validate_for_reading()?;

        let record_length = leader.record_length as usize;
        let base_address = leader.data_base_address as usize;

        let mut body = vec![0u8; record_length - LEADER_LEN];
        match self.reader.read_exact(&mut body) {
            Ok(()) => {},
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                return Err(MarcError::TruncatedRecord(format!(
                    "input ended inside record {} (declared length {record_length})",
                    self.records_read + 1
                )));
            },
            Err(e) => return Err(MarcError::IoError(e)),
        }

        let (directory, data) = body.split_at(base_address - LEADER_LEN);
        let mut record = Record::new(leader);

        for entry in directory_entries(directory)? {
            let DirectoryEntry { tag, length, start } = entry;
            let end = start + length;
            if end > data.len() {
                return Err(MarcError::InvalidRecord(format!(
                    "Field {tag} exceeds data area ({end} > {})",
                    data.len()
                )));
            }
            let field_data = &data[start..end];

            if is_control_tag(&tag) {
                let value = String::from_utf8_lossy(strip_terminator(field_data)).into_owned();
                record.add_control_field(tag, value);
            } else {
                let field = parse_data_field(field_data, &tag)
                    .map_err(|e| MarcError::InvalidField(format!("Tag {tag}: {e}")))?;
                record.add_field(field);
            }
        }

        self.records_read += 1;
        trace!(records_read = self.records_read, "read record");
        Ok(Some(record))
    }
}

impl<R: Read> Iterator for MarcReader<R> {
    type Item = MarcResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.read_record() {
            Ok(record) => record.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            },
        }
    }
}

#[derive(Debug)]
struct DirectoryEntry {
    tag: String,
    length: usize,
    start: usize,
}

/// Directory entries are 12 bytes each (tag, length, start) up to the field
/// terminator.
fn directory_entries(directory: &[u8]) -> MarcResult<Vec<DirectoryEntry>> {
    let end = directory
        .iter()
        .position(|&b| b == FIELD_TERMINATOR)
        .unwrap_or(directory.len());
    let entries = &directory[..end];

    if entries.len() % DIRECTORY_ENTRY_LEN != 0 {
        return Err(MarcError::InvalidRecord(format!(
            "Incomplete directory entry ({} bytes)",
            entries.len()
        )));
    }

    entries
        .chunks_exact(DIRECTORY_ENTRY_LEN)
        .map(|chunk| {
            Ok(DirectoryEntry {
                tag: String::from_utf8_lossy(&chunk[0..3]).into_owned(),
                length: parse_digits(&chunk[3..7])?,
                start: parse_digits(&chunk[7..12])?,
            })
        })
        .collect()
}

fn is_control_tag(tag: &str) -> bool {
    tag.starts_with("00") && tag.bytes().all(|b| b.is_ascii_digit())
}

fn strip_terminator(data: &[u8]) -> &[u8] {
    match data.split_last() {
        Some((&FIELD_TERMINATOR, rest)) => rest,
        _ => data,
    }
}

fn parse_data_field(data: &[u8], tag: &str) -> MarcResult<Field> {
    let [ind1, ind2, rest @ ..] = data else {
        return Err(MarcError::InvalidField(
            "Data field too short (needs indicators)".to_string(),
        ));
    };

    let mut field = Field::new(tag.to_string(), *ind1 as char, *ind2 as char);
    let body = strip_terminator(rest);
    if body.is_empty() {
        return Ok(field);
    }
    if body[0] != SUBFIELD_DELIMITER {
        return Err(MarcError::InvalidField(
            "Expected subfield delimiter".to_string(),
        ));
    }

    for chunk in body[1..].split(|&b| b == SUBFIELD_DELIMITER) {
        let Some((&code, value)) = chunk.split_first() else {
            continue;
        };
        field.add_subfield(code as char, String::from_utf8_lossy(value).into_owned());
    }
    Ok(field)
}

fn parse_digits(bytes: &[u8]) -> MarcResult<usize> {
    bytes.iter().try_fold(0usize, |acc, &b| {
        if b.is_ascii_digit() {
            Ok(acc * 10 + usize::from(b - b'0'))
        } else {
            Err(MarcError::InvalidRecord(format!(
                "Invalid numeric field: expected digits, got byte {}",
                b as char
            )))
        }
    })
}
