//! Common test helpers shared across the integration suite.

#![allow(dead_code)]

use marcsift::{Field, Leader, Record};

const FIELD_TERMINATOR: u8 = 0x1E;
const SUBFIELD_DELIMITER: u8 = 0x1F;
const RECORD_TERMINATOR: u8 = 0x1D;

/// Creates a leader for a book (language material, monograph).
pub fn create_test_leader() -> Leader {
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

/// An 008 whose language positions (35-37) hold `lang`.
pub fn fixed_field_008(lang: &str) -> String {
    format!("850101s1851    nyu           000 1 {lang} d")
}

/// Creates a realistic book record.
///
/// Includes 001, 008, two 020s (one with a bad check digit), 041, 100, 245,
/// 260 and two 650s.
pub fn create_book_record() -> Record {
    Record::builder(create_test_leader())
        .control_field_str("001", "ocm 00012345/")
        .control_field_str("008", &fixed_field_008("eng"))
        .field(
            Field::builder("020".to_string(), ' ', ' ')
                .subfield_str('a', "0471958697 (cloth)")
                .build(),
        )
        .field(
            Field::builder("020".to_string(), ' ', ' ')
                .subfield_str('a', "0471958690")
                .build(),
        )
        .field(
            Field::builder("041".to_string(), '1', ' ')
                .subfield_str('a', "eng")
                .subfield_str('d', "fre")
                .build(),
        )
        .field(
            Field::builder("100".to_string(), '1', ' ')
                .subfield_str('a', "Melville, Herman,")
                .build(),
        )
        .field(
            Field::builder("245".to_string(), '1', '0')
                .subfield_str('a', "Moby Dick /")
                .subfield_str('c', "Herman Melville.")
                .build(),
        )
        .field(
            Field::builder("260".to_string(), ' ', ' ')
                .subfield_str('a', "New York :")
                .build(),
        )
        .field(
            Field::builder("650".to_string(), ' ', '0')
                .subfield_str('a', "Whaling")
                .subfield_str('v', "Fiction.")
                .build(),
        )
        .field(
            Field::builder("650".to_string(), ' ', '0')
                .subfield_str('a', "Sea stories.")
                .build(),
        )
        .build()
}

/// Creates a serial record with little more than an id and a title.
pub fn create_serial_record() -> Record {
    let mut leader = create_test_leader();
    leader.bibliographic_level = 's';
    Record::builder(leader)
        .control_field_str("001", "ser-77")
        .field(
            Field::builder("245".to_string(), '0', '0')
                .subfield_str('a', "Whalemen's shipping list.")
                .build(),
        )
        .build()
}

/// Encodes a record as ISO 2709 bytes.
pub fn encode_record(record: &Record) -> Vec<u8> {
    let mut directory = Vec::new();
    let mut data = Vec::new();

    let mut push = |tag: &str, bytes: Vec<u8>| {
        directory.extend_from_slice(tag.as_bytes());
        directory.extend_from_slice(format!("{:04}{:05}", bytes.len(), data.len()).as_bytes());
        data.extend_from_slice(&bytes);
    };

    for (tag, value) in record.control_fields_iter() {
        let mut bytes = value.as_bytes().to_vec();
        bytes.push(FIELD_TERMINATOR);
        push(tag, bytes);
    }
    for field in record.fields() {
        let mut bytes = vec![field.indicator1 as u8, field.indicator2 as u8];
        for subfield in &field.subfields {
            bytes.push(SUBFIELD_DELIMITER);
            bytes.push(subfield.code as u8);
            bytes.extend_from_slice(subfield.value.as_bytes());
        }
        bytes.push(FIELD_TERMINATOR);
        push(&field.tag, bytes);
    }
    directory.push(FIELD_TERMINATOR);
    data.push(RECORD_TERMINATOR);

    let base_address = 24 + directory.len();
    let mut leader = record.leader.clone();
    leader.record_length = u32::try_from(base_address + data.len()).unwrap();
    leader.data_base_address = u32::try_from(base_address).unwrap();

    let mut out = leader.to_string().into_bytes();
    out.extend(directory);
    out.extend(data);
    out
}

/// Encodes several records back to back.
pub fn encode_records(records: &[Record]) -> Vec<u8> {
    records.iter().flat_map(encode_record).collect()
}
