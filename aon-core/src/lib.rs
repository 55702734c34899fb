//! The AON conversion engine.
//!
//! AON is a schema-typed text format for tabular JSON: a document declares
//! the schemas of its rows once, and each row is then written as a compact
//! list of values in schema order.
//!
//! ```text
//! !aon
//! count:[1]
//! schemas:{
//!   users:(id:number,name:string,profile:profile)
//!   profile:(age:number,tags:list<string>)
//! }
//! data:
//! 1,"Alice",(30,["a" ; "b"])
//! end
//! ```
//!
//! Hosts reach the engine through the C ABI in [`ffi`]; the Rust functions
//! below are what those exports wrap.

mod decode;
mod encode;
mod error;
pub mod ffi;
mod schema;
mod split;

pub use self::error::{Error, Result};
use serde_json::Value;

/// Converts a JSON document to AON.
pub fn json_to_aon(json: &str, root_schema_name: &str) -> Result<String> {
    let value = serde_json::from_str::<Value>(json)?;
    to_aon(&value, root_schema_name)
}

/// Converts an AON document to compact JSON.
pub fn aon_to_json(aon: &str) -> Result<String> {
    let value = from_aon(aon)?;
    Ok(serde_json::to_string(&value)?)
}

/// Encodes a JSON value as AON.
pub fn to_aon(value: &Value, root_schema_name: &str) -> Result<String> {
    encode::encode(value, root_schema_name)
}

/// Decodes an AON document into a JSON value.
pub fn from_aon(aon: &str) -> Result<Value> {
    decode::decode(aon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn round_trips_documents() {
        let documents = vec![
            (json!({ "name": "x" }), "Person"),
            (json!([{ "name": "x" }]), "Person"),
            (
                json!([
                    { "id": 1, "tags": ["a", "b,c"], "meta": { "ok": true, "score": 1.5 } },
                    { "id": 2, "tags": [], "meta": null },
                    { "id": 3, "tags": null, "meta": { "ok": false, "score": -2 } },
                ]),
                "rows",
            ),
            (json!({ "text": "line\nbreak \"quoted\" ; (paren) [bracket]" }), "T"),
            (json!({ "zip": "06114020", "empty": "", "unicode": "🦀 ünï" }), "U"),
            (json!({}), "Empty"),
            (json!([{ "a": "x" }, { "a": 7 }, { "a": "007" }]), "Mixed"),
            (json!([{ "c": ["1", 2, true] }, { "c": ["003"] }]), "MixedList"),
        ];

        for (value, root) in documents {
            let aon = to_aon(&value, root).unwrap();
            assert_eq!(from_aon(&aon).unwrap(), value, "{}", aon);
        }
    }

    #[test]
    fn rejects_lossy_documents() {
        for json in &[r#"[{"l":[1]},{"l":{"x":1}}]"#, r#"{"l":[[1],[2]]}"#] {
            assert!(json_to_aon(json, "R").is_err(), "{}", json);
        }
    }

    #[test]
    fn reports_json_syntax_errors() {
        let err = json_to_aon("not json", "Person").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn converts_text_both_ways() {
        let aon = json_to_aon(r#"{"name":"x"}"#, "Person").unwrap();
        assert_eq!(aon_to_json(&aon).unwrap(), r#"{"name":"x"}"#);
    }
}
