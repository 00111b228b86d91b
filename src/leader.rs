//! MARC record leader.
//!
//! The leader is the 24-byte fixed-length header at the start of every MARC
//! record. The mapping engine mostly reads it positionally (see
//! [`classify_format`](crate::bibliographic::classify_format)), so besides the
//! decoded struct this module renders it back to its 24-character form.
//!
//! # Structure
//!
//! - Positions 0-4: Record length (5 digits)
//! - Position 5: Record status
//! - Position 6: Record type (a = language material, c = music, etc.)
//! - Position 7: Bibliographic level (m = monograph, s = serial, etc.)
//! - Position 8: Control record type
//! - Position 9: Character coding (space = MARC-8, a = UTF-8)
//! - Position 10: Indicator count (usually 2)
//! - Position 11: Subfield code count (usually 2)
//! - Positions 12-16: Base address of data (5 digits)
//! - Positions 17-19: Encoding level, cataloging form, multipart level
//! - Positions 20-23: Reserved (usually "4500")

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{MarcError, MarcResult};

/// Length of a leader in bytes.
pub const LEADER_LEN: usize = 24;

/// MARC Leader - 24 bytes at the start of every MARC record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leader {
    /// Record length (5 digits) - positions 0-4
    pub record_length: u32,
    /// Record status (1 char) - position 5
    pub record_status: char,
    /// Type of record (1 char) - position 6
    pub record_type: char,
    /// Bibliographic level (1 char) - position 7
    pub bibliographic_level: char,
    /// Type of control record (1 char) - position 8
    pub control_record_type: char,
    /// Character coding scheme (1 char) - position 9
    pub character_coding: char,
    /// Indicator count (1 digit) - position 10
    pub indicator_count: u8,
    /// Subfield code count (1 digit) - position 11
    pub subfield_code_count: u8,
    /// Base address of data (5 digits) - positions 12-16
    pub data_base_address: u32,
    /// Encoding level (1 char) - position 17
    pub encoding_level: char,
    /// Cataloging form (1 char) - position 18
    pub cataloging_form: char,
    /// Multipart resource record level (1 char) - position 19
    pub multipart_level: char,
    /// Reserved (4 chars) - positions 20-23
    pub reserved: String,
}

impl Default for Leader {
    /// A new, UTF-8, language-material monograph leader.
    fn default() -> Self {
        Leader {
            record_length: 0,
            record_status: 'n',
            record_type: 'a',
            bibliographic_level: 'm',
            control_record_type: ' ',
            character_coding: 'a',
            indicator_count: 2,
            subfield_code_count: 2,
            data_base_address: 0,
            encoding_level: ' ',
            cataloging_form: 'a',
            multipart_level: ' ',
            reserved: "4500".to_string(),
        }
    }
}

impl Leader {
    /// Parse a leader from 24 bytes
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than 24 bytes are given or a numeric
    /// position holds non-digits.
    pub fn from_bytes(bytes: &[u8]) -> MarcResult<Self> {
        if bytes.len() < LEADER_LEN {
            return Err(MarcError::InvalidLeader(format!(
                "Leader must be at least 24 bytes, got {}",
                bytes.len()
            )));
        }

        Ok(Leader {
            record_length: parse_number(&bytes[0..5])?,
            record_status: bytes[5] as char,
            record_type: bytes[6] as char,
            bibliographic_level: bytes[7] as char,
            control_record_type: bytes[8] as char,
            character_coding: bytes[9] as char,
            indicator_count: parse_count(bytes[10], 10)?,
            subfield_code_count: parse_count(bytes[11], 11)?,
            data_base_address: parse_number(&bytes[12..17])?,
            encoding_level: bytes[17] as char,
            cataloging_form: bytes[18] as char,
            multipart_level: bytes[19] as char,
            reserved: String::from_utf8_lossy(&bytes[20..24]).to_string(),
        })
    }

    /// Parse a leader from its 24-character string form.
    ///
    /// # Errors
    ///
    /// See [`Leader::from_bytes`].
    pub fn parse(s: &str) -> MarcResult<Self> {
        Self::from_bytes(s.as_bytes())
    }

    /// Check that the lengths are large enough for binary record reading.
    ///
    /// # Errors
    ///
    /// Returns an error if `record_length` or `data_base_address` is less than 24.
    pub fn validate_for_reading(&self) -> MarcResult<()> {
        if (self.record_length as usize) < LEADER_LEN {
            return Err(MarcError::InvalidLeader(format!(
                "Record length must be at least 24, got {}",
                self.record_length
            )));
        }
        if (self.data_base_address as usize) < LEADER_LEN {
            return Err(MarcError::InvalidLeader(format!(
                "Base address of data must be at least 24, got {}",
                self.data_base_address
            )));
        }
        if self.data_base_address > self.record_length {
            return Err(MarcError::InvalidLeader(format!(
                "Base address of data {} exceeds record length {}",
                self.data_base_address, self.record_length
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Leader {
    /// Render the 24-character leader. The reserved area is padded or cut to
    /// four characters.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:05}{}{}{}{}{}{}{}{:05}{}{}{}{:<4.4}",
            self.record_length % 100_000,
            self.record_status,
            self.record_type,
            self.bibliographic_level,
            self.control_record_type,
            self.character_coding,
            self.indicator_count % 10,
            self.subfield_code_count % 10,
            self.data_base_address % 100_000,
            self.encoding_level,
            self.cataloging_form,
            self.multipart_level,
            self.reserved,
        )
    }
}

/// Parse a 5-digit ASCII number.
fn parse_number(bytes: &[u8]) -> MarcResult<u32> {
    let s = String::from_utf8_lossy(bytes);
    s.parse::<u32>()
        .map_err(|_| MarcError::InvalidLeader(format!("Invalid numeric field: '{s}'")))
}

fn parse_count(byte: u8, position: usize) -> MarcResult<u8> {
    if byte.is_ascii_digit() {
        Ok(byte - b'0')
    } else {
        Err(MarcError::InvalidLeader(format!(
            "Invalid count at position {position}: {}",
            byte as char
        )))
    }
}
