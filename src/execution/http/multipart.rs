//! Multipart request encoding.
//!
//! A request body is a map of field name to JSON value. Primitives are sent
//! as their string form; objects, arrays and `null` are sent as JSON text.

use crate::error::AdapterError;
use crate::types::RequestBody;
use serde_json::Value;

/// One encoded text field of a multipart form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub value: String,
}

impl FormField {
    /// Encode a single body entry
    pub fn encode(name: &str, value: &Value) -> Result<Self, AdapterError> {
        let value = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Object(_) | Value::Array(_) | Value::Null => serde_json::to_string(value)?,
        };
        Ok(Self {
            name: name.to_string(),
            value,
        })
    }
}

/// Encode every body entry, in the body's iteration order
pub fn encode_form_fields(body: &RequestBody) -> Result<Vec<FormField>, AdapterError> {
    body.iter()
        .map(|(name, value)| FormField::encode(name, value))
        .collect()
}

/// Build a `reqwest` multipart form from encoded fields
pub fn build_form(fields: Vec<FormField>) -> reqwest::multipart::Form {
    fields
        .into_iter()
        .fold(reqwest::multipart::Form::new(), |form, field| {
            form.text(field.name, field.value)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> RequestBody {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test bodies are objects"),
        }
    }

    #[test]
    fn structured_values_round_trip_through_json_text() {
        let input = body(json!({
            "customer": { "name": "Ana", "tags": ["vip", 3], "nested": { "ok": true } },
            "items": [1, 2.5, "three", null],
            "empty": {},
            "nothing": null
        }));

        let fields = encode_form_fields(&input).unwrap();
        assert_eq!(fields.len(), 4);
        for field in &fields {
            let parsed: Value = serde_json::from_str(&field.value).unwrap();
            assert_eq!(&parsed, input.get(&field.name).unwrap());
        }
        assert_eq!(fields[3].value, "null");
    }

    #[test]
    fn primitives_use_their_string_form() {
        let input = body(json!({
            "msisdn": "5511999999999",
            "amount": 42,
            "ratio": 0.75,
            "negative": -3,
            "active": true,
            "blocked": false,
            "blank": ""
        }));

        let fields = encode_form_fields(&input).unwrap();
        let values: Vec<(&str, &str)> = fields
            .iter()
            .map(|f| (f.name.as_str(), f.value.as_str()))
            .collect();
        assert_eq!(
            values,
            vec![
                ("msisdn", "5511999999999"),
                ("amount", "42"),
                ("ratio", "0.75"),
                ("negative", "-3"),
                ("active", "true"),
                ("blocked", "false"),
                ("blank", ""),
            ]
        );
    }

    #[test]
    fn strings_that_look_like_json_are_not_reencoded() {
        let input = body(json!({ "raw": "{\"a\":1}" }));
        let fields = encode_form_fields(&input).unwrap();
        assert_eq!(fields[0].value, "{\"a\":1}");
    }

    #[test]
    fn build_form_produces_a_boundary() {
        let form = build_form(vec![FormField {
            name: "a".into(),
            value: "1".into(),
        }]);
        assert!(!form.boundary().is_empty());
    }
}
