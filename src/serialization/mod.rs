//! JSON encoding and decoding of request and response bodies.
//!
//! Responses arrive in one of a few envelopes: a bare object, a bare array, a
//! paged wrapper, or a result wrapper returned by mutations. The caller always
//! says which envelope it expects; nothing is inferred from the payload.

mod envelope;

pub use envelope::{
    ApiResult, BulkItemFailure, BulkItemResult, Envelope, EnvelopeShape, PagedResult,
    RESULT_CODE_PARTIAL_SUCCESS, RESULT_CODE_SUCCESS,
};

use crate::errors::{SmartsheetError, SmartsheetResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// JSON codec used by the request executor.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer {
    strict: bool,
}

impl JsonSerializer {
    /// Creates a serializer. In strict mode, response fields the target type
    /// does not model are rejected instead of ignored.
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    /// Returns true if unknown fields are rejected.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Encodes a request body.
    pub fn encode<T: Serialize + ?Sized>(&self, value: &T) -> SmartsheetResult<Vec<u8>> {
        serde_json::to_vec(value).map_err(|e| SmartsheetError::serialization(e.to_string()))
    }

    /// Decodes a response body into `T`.
    ///
    /// `status` is the status of the response that carried the body and is
    /// kept in the error for diagnostics.
    pub fn decode<T>(&self, status: u16, bytes: &[u8]) -> SmartsheetResult<T>
    where
        T: DeserializeOwned + Serialize,
    {
        if !self.strict {
            return serde_json::from_slice(bytes)
                .map_err(|e| SmartsheetError::decode(status, e.to_string()));
        }

        let original: Value = serde_json::from_slice(bytes)
            .map_err(|e| SmartsheetError::decode(status, e.to_string()))?;
        let value: T = serde_json::from_value(original.clone())
            .map_err(|e| SmartsheetError::decode(status, e.to_string()))?;
        let kept = serde_json::to_value(&value)
            .map_err(|e| SmartsheetError::decode(status, e.to_string()))?;

        if let Some(path) = first_unknown_field(&original, &kept, "") {
            return Err(SmartsheetError::decode(
                status,
                format!("unknown field `{}`", path),
            ));
        }

        Ok(value)
    }

    /// Decodes a response body wrapped in the given envelope.
    pub fn decode_envelope<T>(
        &self,
        status: u16,
        bytes: &[u8],
        shape: EnvelopeShape,
    ) -> SmartsheetResult<Envelope<T>>
    where
        T: DeserializeOwned + Serialize,
    {
        match shape {
            EnvelopeShape::Single => self.decode(status, bytes).map(Envelope::Single),
            EnvelopeShape::List => self.decode(status, bytes).map(Envelope::List),
            EnvelopeShape::Paged => self.decode(status, bytes).map(Envelope::Paged),
            EnvelopeShape::Result => self.decode(status, bytes).map(Envelope::Result),
            EnvelopeShape::Bulk => self.decode(status, bytes).map(Envelope::Bulk),
        }
    }
}

/// Finds the first non-empty field of `original` that did not survive a
/// decode/encode round-trip.
fn first_unknown_field(original: &Value, kept: &Value, prefix: &str) -> Option<String> {
    match (original, kept) {
        (Value::Object(fields), Value::Object(kept_fields)) => {
            for (key, value) in fields {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                match kept_fields.get(key) {
                    Some(kept_value) => {
                        if let Some(found) = first_unknown_field(value, kept_value, &path) {
                            return Some(found);
                        }
                    }
                    None if is_empty(value) => {}
                    None => return Some(path),
                }
            }
            None
        }
        (Value::Array(items), Value::Array(kept_items)) => items
            .iter()
            .zip(kept_items)
            .enumerate()
            .find_map(|(i, (item, kept_item))| {
                first_unknown_field(item, kept_item, &format!("{}[{}]", prefix, i))
            }),
        _ => None,
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Named {
        id: i64,
        name: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tags: Vec<String>,
    }

    #[test]
    fn test_decode_single_object() {
        let serializer = JsonSerializer::default();
        let named: Named = serializer.decode(200, br#"{"id":42,"name":"Foo"}"#).unwrap();
        assert_eq!(
            named,
            Named {
                id: 42,
                name: "Foo".to_string(),
                tags: vec![]
            }
        );
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let serializer = JsonSerializer::default();
        let error = serializer.decode::<Named>(200, b"{\"id\":").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Decode);
        assert_eq!(error.status_code(), Some(200));
    }

    #[test]
    fn test_lenient_mode_ignores_unknown_fields() {
        let serializer = JsonSerializer::new(false);
        let body = br#"{"id":1,"name":"a","owner":"x@y.com"}"#;
        assert!(serializer.decode::<Named>(200, body).is_ok());
    }

    #[test]
    fn test_strict_mode_rejects_unknown_fields() {
        let serializer = JsonSerializer::new(true);
        let body = br#"{"id":1,"name":"a","owner":"x@y.com"}"#;
        let error = serializer.decode::<Named>(200, body).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Decode);
        assert!(error.to_string().contains("owner"));
    }

    #[test]
    fn test_strict_mode_reports_nested_path() {
        let serializer = JsonSerializer::new(true);
        let body = br#"{"pageNumber":1,"totalPages":1,"totalCount":1,"data":[{"id":1,"name":"a","extra":true}]}"#;
        let error = serializer
            .decode_envelope::<Named>(200, body, EnvelopeShape::Paged)
            .unwrap_err();
        assert!(error.to_string().contains("data[0].extra"), "{}", error);
    }

    #[test]
    fn test_strict_mode_tolerates_null_and_empty() {
        let serializer = JsonSerializer::new(true);
        let body = br#"{"id":1,"name":"a","tags":[],"ignored":null}"#;
        assert!(serializer.decode::<Named>(200, body).is_ok());
    }

    #[test]
    fn test_decode_envelope_shapes() {
        let serializer = JsonSerializer::default();

        let list = serializer
            .decode_envelope::<Named>(200, br#"[{"id":1,"name":"a"},{"id":2,"name":"b"}]"#, EnvelopeShape::List)
            .unwrap();
        assert_eq!(list.into_list().len(), 2);

        let result = serializer
            .decode_envelope::<Named>(
                200,
                br#"{"message":"SUCCESS","resultCode":0,"result":{"id":3,"name":"c"},"version":7}"#,
                EnvelopeShape::Result,
            )
            .unwrap();
        match result {
            Envelope::Result(api) => {
                assert_eq!(api.version, Some(7));
                assert_eq!(api.result.unwrap().id, 3);
            }
            other => panic!("unexpected envelope: {other:?}"),
        }

        let error = serializer
            .decode_envelope::<Named>(200, br#"{"id":1,"name":"a"}"#, EnvelopeShape::List)
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_encode() {
        let serializer = JsonSerializer::default();
        let bytes = serializer
            .encode(&Named {
                id: 5,
                name: "x".to_string(),
                tags: vec![],
            })
            .unwrap();
        assert_eq!(bytes, br#"{"id":5,"name":"x"}"#.to_vec());
    }
}
