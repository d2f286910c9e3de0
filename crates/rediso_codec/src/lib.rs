//! # rediso Codec
//!
//! Record values and their stored encoding.
//!
//! Records are stored as JSON objects whose values are scalars:
//! - `null`, booleans, integers, floats and strings map to [`Value`]
//! - field order is preserved on encode and decode
//! - the `id` field ([`ID_FIELD`]) is owned by the store
//!
//! Values of different types compare loosely (see [`Value::loose_cmp`]).
//!
//! ## Usage
//!
//! ```
//! use rediso_codec::{from_json, to_json, Record, Value};
//!
//! let mut record: Record = [("name", "Alice")].into_iter().collect();
//! record.insert("id", 1);
//! let text = to_json(&record).unwrap();
//! assert_eq!(text, r#"{"name":"Alice","id":1}"#);
//!
//! let decoded = from_json(&text).unwrap();
//! assert_eq!(decoded.get("id"), Some(&Value::Integer(1)));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod compare;
mod decoder;
mod encoder;
mod error;
mod record;
mod value;

pub use decoder::from_json;
pub use encoder::to_json;
pub use error::{CodecError, CodecResult};
pub use record::{Record, ID_FIELD};
pub use compare::SortKey;
pub use value::Value;

/// Trait for types that can be encoded to their stored form.
pub trait Encode {
    /// Encode this value to its stored text.
    fn encode(&self) -> CodecResult<String>;
}

/// Trait for types that can be decoded from their stored form.
pub trait Decode: Sized {
    /// Decode this value from its stored text.
    fn decode(text: &str) -> CodecResult<Self>;
}

impl Encode for Record {
    fn encode(&self) -> CodecResult<String> {
        to_json(self)
    }
}

impl Decode for Record {
    fn decode(text: &str) -> CodecResult<Self> {
        from_json(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scalar() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::Integer),
            (-4000i32..4000).prop_map(|n| Value::Float(f64::from(n) / 4.0)),
            "[a-zA-Z0-9 |:]{0,12}".prop_map(Value::Text),
        ]
    }

    #[test]
    fn stored_document_decodes_to_the_same_record() {
        let record: Record = [
            ("key1", Value::from("value1")),
            ("n", Value::from(5)),
            ("id", Value::from(1)),
        ]
        .into_iter()
        .collect();
        let text = record.encode().unwrap();
        assert_eq!(Record::decode(&text).unwrap(), record);
    }

    proptest! {
        #[test]
        fn records_survive_storage(fields in prop::collection::vec(("[a-z]{1,6}", scalar()), 1..8)) {
            let record: Record = fields.into_iter().collect();
            let text = record.encode().unwrap();
            prop_assert_eq!(Record::decode(&text).unwrap(), record);
        }
    }
}
