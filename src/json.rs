//! JSON rendering of MARC records.
//!
//! The display field of an index document usually carries the whole source
//! record so a front end can render it without a second lookup. This module
//! produces that rendering: a JSON array whose first element holds the leader,
//! followed by one single-key object per control or data field, in record
//! order.
//!
//! ```
//! use marcsift::{json, Field, Leader, Record};
//!
//! let record = Record::builder(Leader::default())
//!     .control_field_str("001", "12345")
//!     .field(
//!         Field::builder("245".to_string(), '1', '0')
//!             .subfield_str('a', "Title")
//!             .build(),
//!     )
//!     .build();
//!
//! let rendered = json::record_to_json(&record);
//! assert_eq!(rendered[1]["001"], "12345");
//! assert_eq!(rendered[2]["245"]["subfields"][0]["a"], "Title");
//! ```

use serde_json::{json, Map, Value};

use crate::record::{Field, Record};

/// Render a record as a JSON array.
#[must_use]
pub fn record_to_json(record: &Record) -> Value {
    let mut items = Vec::with_capacity(1 + record.control_fields.len() + record.fields.len());
    items.push(json!({ "leader": record.leader.to_string() }));

    for (tag, value) in record.control_fields_iter() {
        let mut obj = Map::new();
        obj.insert(tag.to_string(), Value::String(value.to_string()));
        items.push(Value::Object(obj));
    }

    for field in record.fields() {
        let mut obj = Map::new();
        obj.insert(field.tag.clone(), field_to_json(field));
        items.push(Value::Object(obj));
    }

    Value::Array(items)
}

/// Subfields are kept as an ordered list of single-key objects, since codes
/// may repeat within a field.
fn field_to_json(field: &Field) -> Value {
    let subfields: Vec<Value> = field
        .subfields
        .iter()
        .map(|sf| {
            let mut obj = Map::new();
            obj.insert(sf.code.to_string(), Value::String(sf.value.clone()));
            Value::Object(obj)
        })
        .collect();

    json!({
        "ind1": field.indicator1.to_string(),
        "ind2": field.indicator2.to_string(),
        "subfields": subfields,
    })
}
