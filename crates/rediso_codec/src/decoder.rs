//! JSON record decoder.

use crate::error::{CodecError, CodecResult};
use crate::record::Record;

/// Decode a JSON object into a record.
///
/// Field order follows the document. Nested arrays and objects are rejected;
/// records hold scalars only.
///
/// # Errors
///
/// Returns [`CodecError::NotAnObject`] if the document is valid JSON but not
/// an object, and [`CodecError::DecodingFailed`] for anything else.
pub fn from_json(text: &str) -> CodecResult<Record> {
    let trimmed = text.trim_start();
    if !trimmed.starts_with('{') {
        return match serde_json::from_str::<serde_json::Value>(text) {
            Ok(_) => Err(CodecError::NotAnObject),
            Err(e) => Err(CodecError::decoding_failed(e.to_string())),
        };
    }
    serde_json::from_str(text).map_err(|e| CodecError::decoding_failed(e.to_string()))
}
