use serde::Serialize;
use serde_json::Value;

use crate::db::Record;
use crate::Error;

pub fn to_value(value: impl Into<Value>) -> Value {
    value.into()
}

/// Serializes a row into a record, yielding an empty record for non-object values.
pub fn to_record<T: Serialize>(row: &T) -> Record {
    match serde_json::to_value(row) {
        Ok(Value::Object(record)) => record,
        _ => Record::new(),
    }
}

/// Splits caller input into records: an object becomes one record, an array of objects many.
pub fn to_records<T: Serialize + ?Sized>(values: &T) -> Result<Vec<Record>, Error> {
    match serde_json::to_value(values)? {
        Value::Object(record) => Ok(vec![record]),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(record) => Ok(record),
                other => Err(Error::InvalidValues(other.to_string())),
            })
            .collect(),
        other => Err(Error::InvalidValues(other.to_string())),
    }
}

pub fn to_patch<T: Serialize + ?Sized>(patch: &T) -> Result<Record, Error> {
    match serde_json::to_value(patch)? {
        Value::Object(record) => Ok(record),
        other => Err(Error::InvalidValues(other.to_string())),
    }
}

pub(crate) fn record_i64(record: &Record, field: &str) -> Option<i64> {
    record.get(field).and_then(Value::as_i64)
}

pub(crate) fn count_record(count: i64) -> Record {
    let mut record = Record::new();
    record.insert("count".to_string(), Value::from(count));
    record
}
