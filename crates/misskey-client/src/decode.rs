//! Turning classified response bodies into typed values.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

/// A typed, schema-validated decoding of one JSON object.
///
/// Implementors keep unrecognized wire fields in a flattened `extra` map, so
/// decoding never drops data the server sent.
pub trait Entity: DeserializeOwned {
    /// Name used in error messages and logs.
    const NAME: &'static str;
}

/// Conversion from a classified response body.
///
/// `None` is a 204 No Content response.
pub trait Decode: Sized {
    fn decode(body: Option<Value>) -> Result<Self>;
}

impl<T: Entity> Decode for T {
    fn decode(body: Option<Value>) -> Result<Self> {
        match body {
            Some(value) => decode_entity(value),
            None => Err(no_content::<T>()),
        }
    }
}

impl<T: Entity> Decode for Vec<T> {
    fn decode(body: Option<Value>) -> Result<Self> {
        match body {
            Some(value) => decode_collection(value),
            None => Err(no_content::<T>()),
        }
    }
}

impl Decode for () {
    fn decode(_body: Option<Value>) -> Result<Self> {
        Ok(())
    }
}

/// Untyped passthrough for endpoints without a modelled response.
impl Decode for Option<Value> {
    fn decode(body: Option<Value>) -> Result<Self> {
        Ok(body)
    }
}

/// Decode a single entity.
pub fn decode_entity<T: Entity>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| {
        tracing::warn!(entity = T::NAME, error = %e, "Failed to decode entity");
        Error::SchemaViolation {
            entity: T::NAME,
            message: e.to_string(),
        }
    })
}

/// Decode a JSON array element by element, preserving order.
///
/// The first element that fails aborts the whole batch.
pub fn decode_collection<T: Entity>(value: Value) -> Result<Vec<T>> {
    let Value::Array(items) = value else {
        return Err(Error::SchemaViolation {
            entity: T::NAME,
            message: "expected a JSON array".to_string(),
        });
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            decode_entity(item).map_err(|e| match e {
                Error::SchemaViolation { entity, message } => Error::SchemaViolation {
                    entity,
                    message: format!("element {index}: {message}"),
                },
                other => other,
            })
        })
        .collect()
}

fn no_content<T: Entity>() -> Error {
    Error::SchemaViolation {
        entity: T::NAME,
        message: "server returned no content".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Thing {
        id: String,
        #[serde(flatten)]
        extra: BTreeMap<String, Value>,
    }

    impl Entity for Thing {
        const NAME: &'static str = "Thing";
    }

    #[test]
    fn collection_preserves_order_and_length() {
        let things: Vec<Thing> =
            Decode::decode(Some(json!([{"id": "b"}, {"id": "a"}, {"id": "c", "x": 1}]))).unwrap();
        let ids: Vec<_> = things.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["b", "a", "c"]);
        assert_eq!(things[2].extra["x"], 1);
    }

    #[test]
    fn one_bad_element_fails_the_batch() {
        let err = <Vec<Thing>>::decode(Some(json!([{"id": "a"}, {"nope": 1}]))).unwrap_err();
        match err {
            Error::SchemaViolation { entity, message } => {
                assert_eq!(entity, "Thing");
                assert!(message.starts_with("element 1:"), "{message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn collection_requires_array() {
        assert!(matches!(
            <Vec<Thing>>::decode(Some(json!({"id": "a"}))).unwrap_err(),
            Error::SchemaViolation { .. }
        ));
    }

    #[test]
    fn entity_requires_body() {
        assert!(matches!(
            Thing::decode(None).unwrap_err(),
            Error::SchemaViolation { .. }
        ));
    }

    #[test]
    fn unit_accepts_anything() {
        assert!(<()>::decode(None).is_ok());
        assert!(<()>::decode(Some(json!({"ok": true}))).is_ok());
    }

    #[test]
    fn decoding_is_deterministic() {
        let doc = json!({"id": "a", "future": {"nested": [1, 2]}});
        let a = Thing::decode(Some(doc.clone())).unwrap();
        let b = Thing::decode(Some(doc)).unwrap();
        assert_eq!(a, b);
    }
}
