//! BSON conversion for the MongoDB backend.
//!
//! Records cross this backend's boundary in the generic
//! [`Value`](entitylayer_core::value::Value) model; this module holds the
//! recursive tree-walk between that model and BSON. Driver wrapper kinds map
//! to plain values on the way out: documents become records, arrays become
//! sequences, datetimes and timestamps become native date/time values, object
//! identifiers become their canonical hex strings, symbols become strings.
//! Exotic kinds with no generic counterpart (regular expressions, code,
//! min/max keys) are carried as their string form.
//!
//! The round trip `Value` -> BSON -> `Value` is identity; BSON datetimes hold
//! millisecond precision, so date/time values are exact at that granularity.

use bson::{Binary, Bson, Document, spec::BinarySubtype};
use chrono::DateTime;

use entitylayer_core::value::{Record, Value};

/// Converts a BSON value into a generic value, recursively.
pub(crate) fn to_value(value: &Bson) -> Value {
    match value {
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Boolean(b) => Value::Bool(*b),
        Bson::Int32(i) => Value::Int(*i as i64),
        Bson::Int64(i) => Value::Int(*i),
        Bson::Double(d) => Value::Double(*d),
        Bson::String(s) => Value::String(s.clone()),
        Bson::Symbol(s) => Value::String(s.clone()),
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => Value::DateTime(dt.to_chrono()),
        // Internal replication timestamps carry whole seconds only.
        Bson::Timestamp(ts) => Value::DateTime(
            DateTime::from_timestamp(ts.time as i64, 0).unwrap_or_default(),
        ),
        Bson::Binary(bin) => Value::Bytes(bin.bytes.clone()),
        Bson::Array(values) => Value::Array(values.iter().map(to_value).collect()),
        Bson::Document(doc) => Value::Record(to_record(doc)),
        Bson::Decimal128(d) => Value::String(d.to_string()),
        other => Value::String(other.to_string()),
    }
}

/// Converts a generic value into BSON, recursively.
pub(crate) fn from_value(value: &Value) -> Bson {
    match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(*b),
        Value::Int(i) => Bson::Int64(*i),
        Value::Double(d) => Bson::Double(*d),
        Value::String(s) => Bson::String(s.clone()),
        Value::Bytes(bytes) => Bson::Binary(Binary {
            subtype: BinarySubtype::Generic,
            bytes: bytes.clone(),
        }),
        Value::DateTime(dt) => Bson::DateTime(bson::DateTime::from_chrono(*dt)),
        Value::Array(values) => Bson::Array(values.iter().map(from_value).collect()),
        Value::Record(record) => Bson::Document(from_record(record)),
    }
}

/// Converts a BSON document into a record, each field converted recursively.
pub(crate) fn to_record(document: &Document) -> Record {
    document
        .iter()
        .map(|(field, value)| (field.to_string(), to_value(value)))
        .collect()
}

/// Converts a record into a BSON document.
pub(crate) fn from_record(record: &Record) -> Document {
    Document::from_iter(
        record
            .iter()
            .map(|(field, value)| (field.clone(), from_value(value))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{doc, oid::ObjectId};

    #[test]
    fn scalars_pass_through() {
        assert_eq!(to_value(&Bson::Null), Value::Null);
        assert_eq!(to_value(&Bson::Boolean(true)), Value::Bool(true));
        assert_eq!(to_value(&Bson::Int32(3)), Value::Int(3));
        assert_eq!(to_value(&Bson::Int64(3)), Value::Int(3));
        assert_eq!(to_value(&Bson::Double(1.5)), Value::Double(1.5));
        assert_eq!(to_value(&Bson::String("306".into())), Value::from("306"));
    }

    #[test]
    fn wrapper_kinds_become_plain_values() {
        let oid = ObjectId::new();
        assert_eq!(to_value(&Bson::ObjectId(oid)), Value::String(oid.to_hex()));

        assert_eq!(
            to_value(&Bson::Symbol("open".to_string())),
            Value::from("open")
        );

        let dt = DateTime::from_timestamp(1_588_336_200, 0).unwrap();
        assert_eq!(
            to_value(&Bson::DateTime(bson::DateTime::from_chrono(dt))),
            Value::DateTime(dt)
        );
    }

    #[test]
    fn documents_and_arrays_convert_recursively() {
        let oid = ObjectId::new();
        let document = doc! {
            "RoomNum": "306",
            "Floor": 3,
            "Amenities": ["wifi", { "tv": true }],
            "Booking": { "guest": oid },
        };

        let record = to_record(&document);
        assert_eq!(record.get("RoomNum"), Some(&Value::from("306")));
        assert_eq!(record.get("Floor"), Some(&Value::Int(3)));

        let amenities = record.get("Amenities").unwrap().as_array().unwrap();
        assert_eq!(amenities[0], Value::from("wifi"));
        let tv = amenities[1].as_record().unwrap();
        assert_eq!(tv.get("tv"), Some(&Value::Bool(true)));

        let booking = record.get("Booking").unwrap().as_record().unwrap();
        assert_eq!(booking.get("guest"), Some(&Value::String(oid.to_hex())));
    }

    #[test]
    fn round_trip_is_identity() {
        let mut nested = Record::new();
        nested.insert("BedSize".to_string(), Value::from("Twin"));

        let mut record = Record::new();
        record.insert("key".to_string(), Value::from("306"));
        record.insert("Floor".to_string(), Value::Int(3));
        record.insert("Rate".to_string(), Value::Double(99.5));
        record.insert("Occupied".to_string(), Value::Bool(false));
        record.insert("Nothing".to_string(), Value::Null);
        record.insert("Blob".to_string(), Value::Bytes(vec![1, 2, 3]));
        record.insert(
            "Since".to_string(),
            Value::DateTime(DateTime::from_timestamp(1_588_336_200, 0).unwrap()),
        );
        record.insert(
            "Tags".to_string(),
            Value::Array(vec![Value::from("a"), Value::Int(2)]),
        );
        record.insert("Detail".to_string(), Value::Record(nested));

        let value = Value::Record(record);
        assert_eq!(to_value(&from_value(&value)), value);
        // A second pass over the already-converted shape changes nothing.
        assert_eq!(
            to_value(&from_value(&to_value(&from_value(&value)))),
            value
        );
    }
}
