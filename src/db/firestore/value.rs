//! Conversion between plain JSON and Firestore's typed value encoding
//! (`{"stringValue": ...}`, `{"mapValue": {"fields": ...}}`, ...).

use serde_json::{json, Map, Number, Value};

pub fn encode(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64().unwrap_or_default() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            if items.is_empty() {
                json!({ "arrayValue": {} })
            } else {
                let values: Vec<Value> = items.iter().map(encode).collect();
                json!({ "arrayValue": { "values": values } })
            }
        }
        Value::Object(entries) => json!({ "mapValue": { "fields": encode_fields(entries) } }),
    }
}

/// Encodes the top-level fields of a document body.
pub fn encode_fields(entries: &Map<String, Value>) -> Map<String, Value> {
    entries
        .iter()
        .map(|(key, value)| (key.clone(), encode(value)))
        .collect()
}

pub fn decode(value: &Value) -> Value {
    let Some(typed) = value.as_object() else {
        return Value::Null;
    };

    if let Some(s) = typed.get("stringValue") {
        return s.clone();
    }
    if let Some(b) = typed.get("booleanValue") {
        return b.clone();
    }
    if let Some(i) = typed.get("integerValue") {
        return match i {
            Value::String(s) => s.parse::<i64>().map(Value::from).unwrap_or(Value::Null),
            other => other.clone(),
        };
    }
    if let Some(d) = typed.get("doubleValue") {
        return d
            .as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null);
    }
    if let Some(map) = typed.get("mapValue") {
        return decode_fields(map.get("fields"));
    }
    if let Some(array) = typed.get("arrayValue") {
        let values = array
            .get("values")
            .and_then(Value::as_array)
            .map(|values| values.iter().map(decode).collect())
            .unwrap_or_default();
        return Value::Array(values);
    }
    for key in ["timestampValue", "referenceValue", "bytesValue"] {
        if let Some(v) = typed.get(key) {
            return v.clone();
        }
    }
    if let Some(point) = typed.get("geoPointValue") {
        return point.clone();
    }

    Value::Null
}

/// Decodes a `fields` map into a plain JSON object; absent fields give `{}`.
pub fn decode_fields(fields: Option<&Value>) -> Value {
    let entries = fields
        .and_then(Value::as_object)
        .map(|entries| {
            entries
                .iter()
                .map(|(key, value)| (key.clone(), decode(value)))
                .collect()
        })
        .unwrap_or_default();
    Value::Object(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_nested_question_body() {
        let body = json!({
            "text": { "tr": "Soru" },
            "choices": [{ "id": "c1", "media": [] }]
        });

        let encoded = encode_fields(body.as_object().unwrap());
        assert_eq!(encoded["text"]["mapValue"]["fields"]["tr"]["stringValue"], "Soru");
        let choice = &encoded["choices"]["arrayValue"]["values"][0]["mapValue"]["fields"];
        assert_eq!(choice["id"]["stringValue"], "c1");
        assert_eq!(choice["media"], json!({ "arrayValue": {} }));
    }

    #[test]
    fn decodes_what_it_encodes() {
        let body = json!({
            "text": { "en": "What is 2 + 2?", "tr": "2 + 2 kaç eder?" },
            "choices": [
                { "id": "q3c1", "text": { "en": "3" }, "media": [] },
                { "id": "q3c2", "media": [{ "type": "image", "url": "https://placehold.co/300x200.png" }] }
            ],
            "order": 3,
            "weight": 1.5,
            "archived": false,
            "note": null
        });

        let encoded = Value::Object(encode_fields(body.as_object().unwrap()));
        assert_eq!(decode_fields(Some(&encoded)), body);
    }

    #[test]
    fn decodes_server_specific_types_loosely() {
        let value = json!({ "timestampValue": "2024-05-01T10:00:00Z" });
        assert_eq!(decode(&value), json!("2024-05-01T10:00:00Z"));
        assert_eq!(decode(&json!({ "integerValue": "12" })), json!(12));
        assert_eq!(decode(&json!({ "unknownValue": 1 })), Value::Null);
        assert_eq!(decode(&json!("bare")), Value::Null);
    }

    #[test]
    fn missing_fields_decode_to_empty_object() {
        assert_eq!(decode_fields(None), json!({}));
        assert_eq!(decode(&json!({ "mapValue": {} })), json!({}));
        assert_eq!(decode(&json!({ "arrayValue": {} })), json!([]));
    }
}
