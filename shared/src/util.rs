//! Serde helpers for backend identifiers
//!
//! The backend hands out ids (and table numbers) as JSON numbers or strings
//! depending on the route. Locally everything is a `String`; numeric ids are
//! sent back as numbers.

use serde::{Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Str(String),
}

/// Accept a JSON number or string as an id.
pub fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Int(n) => n.to_string(),
        RawId::Str(s) => s,
    })
}

/// Emit an id as a JSON number when it is a canonical integer, otherwise as a string.
pub fn ser_id<S>(id: &str, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match id.parse::<i64>() {
        Ok(n) if n.to_string() == id => serializer.serialize_i64(n),
        _ => serializer.serialize_str(id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Serialize, Deserialize)]
    struct Holder {
        #[serde(deserialize_with = "de_id", serialize_with = "ser_id")]
        id: String,
    }

    #[test]
    fn test_id_accepts_number_and_string() {
        let a: Holder = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        let b: Holder = serde_json::from_str(r#"{"id": "abc-1"}"#).unwrap();
        assert_eq!(a.id, "42");
        assert_eq!(b.id, "abc-1");
    }

    #[test]
    fn test_numeric_id_serialized_as_number() {
        let numeric = serde_json::to_value(Holder { id: "7".into() }).unwrap();
        assert_eq!(numeric["id"], serde_json::json!(7));

        let padded = serde_json::to_value(Holder { id: "007".into() }).unwrap();
        assert_eq!(padded["id"], serde_json::json!("007"));
    }
}
