//! JSON record encoder.

use crate::error::{CodecError, CodecResult};
use crate::record::Record;
use crate::value::Value;

/// Encode a record as a JSON object.
///
/// Fields are written in record order. Text is written as UTF-8 without
/// `\u` escaping of non-ASCII characters.
///
/// # Errors
///
/// Returns an error if the record holds a NaN or infinite float, which JSON
/// cannot represent.
pub fn to_json(record: &Record) -> CodecResult<String> {
    for (field, value) in record.iter() {
        if let Value::Float(f) = value {
            if !f.is_finite() {
                return Err(CodecError::NonFiniteFloat {
                    field: field.to_string(),
                });
            }
        }
    }
    serde_json::to_string(record).map_err(|e| CodecError::encoding_failed(e.to_string()))
}
