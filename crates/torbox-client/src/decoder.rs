//! Response body decoding.
//!
//! Bytes are parsed once into a JSON document. A syntax error is final. A
//! document that parses but does not match the expected payload shape is
//! handed to the fallback chain declared for the call, if any. Decoding is
//! all-or-nothing: an [`Envelope`] is only returned once every part of it
//! decoded.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::envelope::Envelope;
use crate::error::DecodeFailure;
use crate::fallback::{FallbackChain, resolve, shape_name};

const ENVELOPE_KEYS: [&str; 3] = ["success", "error", "data"];

/// Decode `bytes` into an envelope carrying a `T` payload.
pub fn decode<T: DeserializeOwned>(
    bytes: &[u8],
    fallbacks: &FallbackChain<T>,
) -> Result<Envelope<T>, DecodeFailure> {
    let document: Value =
        serde_json::from_slice(bytes).map_err(|err| DecodeFailure::syntax(err.to_string()))?;

    match as_envelope(&document) {
        Some(fields) => decode_envelope(fields, fallbacks),
        None => decode_bare(&document, fallbacks),
    }
}

fn as_envelope(document: &Value) -> Option<&Map<String, Value>> {
    document
        .as_object()
        .filter(|fields| ENVELOPE_KEYS.iter().any(|key| fields.contains_key(*key)))
}

fn decode_envelope<T: DeserializeOwned>(
    fields: &Map<String, Value>,
    fallbacks: &FallbackChain<T>,
) -> Result<Envelope<T>, DecodeFailure> {
    let success = success_flag(fields.get("success"))?;
    let error = text_field(fields.get("error"));
    let detail = text_field(fields.get("detail"));

    // A failure envelope never carries data.
    if success == Some(false) {
        return Ok(Envelope {
            success,
            error,
            detail,
            data: None,
        });
    }

    let data = match fields.get("data") {
        None | Some(Value::Null) => None,
        Some(value) => Some(decode_payload(value, fallbacks)?),
    };

    Ok(Envelope {
        success,
        error,
        detail,
        data,
    })
}

fn decode_bare<T: DeserializeOwned>(
    document: &Value,
    fallbacks: &FallbackChain<T>,
) -> Result<Envelope<T>, DecodeFailure> {
    if fallbacks.is_empty() {
        return Err(DecodeFailure::not_envelope(vec![format!(
            "Envelope<{}>",
            shape_name::<T>()
        )]));
    }

    let payload = resolve(document, fallbacks).map_err(|failure| {
        let mut attempted = vec![format!("Envelope<{}>", shape_name::<T>())];
        attempted.extend(failure.attempted);
        DecodeFailure::not_envelope(attempted)
    })?;
    tracing::warn!(
        expected = %shape_name::<T>(),
        "response had no envelope, accepted by a fallback shape"
    );
    Ok(Envelope::bare(payload))
}

fn decode_payload<T: DeserializeOwned>(
    value: &Value,
    fallbacks: &FallbackChain<T>,
) -> Result<T, DecodeFailure> {
    let primary_error = match T::deserialize(value) {
        Ok(payload) => return Ok(payload),
        Err(err) => err,
    };

    let expected = shape_name::<T>();
    if fallbacks.is_empty() {
        return Err(DecodeFailure::shape_mismatch(
            vec![expected],
            format!("payload does not match the expected shape: {primary_error}"),
        ));
    }

    match resolve(value, fallbacks) {
        Ok(payload) => {
            tracing::warn!(
                expected = %expected,
                error = %primary_error,
                "payload shape drifted, accepted by a fallback shape"
            );
            Ok(payload)
        }
        Err(failure) => {
            let mut attempted = vec![expected];
            attempted.extend(failure.attempted);
            Err(DecodeFailure::shape_mismatch(attempted, failure.message))
        }
    }
}

fn success_flag(value: Option<&Value>) -> Result<Option<bool>, DecodeFailure> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(flag)) => Ok(Some(*flag)),
        Some(Value::String(s)) if s.eq_ignore_ascii_case("true") => Ok(Some(true)),
        Some(Value::String(s)) if s.eq_ignore_ascii_case("false") => Ok(Some(false)),
        Some(other) => Err(DecodeFailure::shape_mismatch(
            vec!["Envelope".to_string()],
            format!("envelope 'success' is not a boolean: {other}"),
        )),
    }
}

/// `error` and `detail` text of a JSON object body, envelope or not.
pub(crate) fn error_fields(bytes: &[u8]) -> (Option<String>, Option<String>) {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(fields)) => (
            text_field(fields.get("error")),
            text_field(fields.get("detail")),
        ),
        _ => (None, None),
    }
}

/// Flatten a string-or-structured field into text.
fn text_field(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Object(fields) => {
            let nested = ["error", "message", "detail"]
                .iter()
                .find_map(|key| fields.get(*key).and_then(Value::as_str));
            Some(nested.map_or_else(
                || Value::Object(fields.clone()).to_string(),
                str::to_string,
            ))
        }
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeReason;
    use crate::fallback::FallbackCandidate;
    use serde::Deserialize;
    use serde::de::IgnoredAny;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: i64,
        hash: String,
    }

    fn bytes(value: &Value) -> Vec<u8> {
        value.to_string().into_bytes()
    }

    #[test]
    fn test_list_payload_decodes_unmodified() {
        let body = br#"{"success":true,"data":[{"id":1,"hash":"abc"}]}"#;
        let envelope = decode::<Vec<Item>>(body, &FallbackChain::none()).unwrap();

        assert_eq!(envelope.success, Some(true));
        assert_eq!(
            envelope.data,
            Some(vec![Item {
                id: 1,
                hash: "abc".to_string()
            }])
        );
    }

    #[test]
    fn test_failure_envelope_drops_data() {
        let body = bytes(&json!({
            "success": false,
            "error": "BAD_TOKEN",
            "detail": "expired",
            "data": {"unexpected": "shape"}
        }));
        let envelope = decode::<Vec<Item>>(&body, &FallbackChain::none()).unwrap();

        assert!(envelope.is_failure());
        assert_eq!(envelope.error.as_deref(), Some("BAD_TOKEN"));
        assert_eq!(envelope.detail.as_deref(), Some("expired"));
        assert!(envelope.data.is_none());
    }

    #[test]
    fn test_structured_error_field_is_flattened() {
        let body = bytes(&json!({
            "success": false,
            "error": {"error": "RATE_LIMITED", "error_code": 29}
        }));
        let envelope = decode::<IgnoredAny>(&body, &FallbackChain::none()).unwrap();
        assert_eq!(envelope.error.as_deref(), Some("RATE_LIMITED"));

        let body = bytes(&json!({"success": false, "error": {"code": 7}}));
        let envelope = decode::<IgnoredAny>(&body, &FallbackChain::none()).unwrap();
        assert_eq!(envelope.error.as_deref(), Some(r#"{"code":7}"#));
    }

    #[test]
    fn test_missing_or_null_data_is_absent() {
        let envelope =
            decode::<Vec<Item>>(br#"{"success":true,"data":null}"#, &FallbackChain::none())
                .unwrap();
        assert!(envelope.data.is_none());

        let envelope =
            decode::<Vec<Item>>(br#"{"success":true,"detail":"ok"}"#, &FallbackChain::none())
                .unwrap();
        assert!(envelope.data.is_none());
        assert_eq!(envelope.detail.as_deref(), Some("ok"));
    }

    #[test]
    fn test_envelope_without_success_field() {
        let envelope =
            decode::<String>(br#"{"data":"https://dl.example/file"}"#, &FallbackChain::none())
                .unwrap();
        assert_eq!(envelope.success, None);
        assert_eq!(envelope.data.as_deref(), Some("https://dl.example/file"));
    }

    #[test]
    fn test_malformed_bytes_are_syntax_failures_even_with_fallbacks() {
        let chain = FallbackChain::none().or(FallbackCandidate::new("anything", |v: Value| v));
        let failure = decode::<Value>(b"{\"success\": tru", &chain).unwrap_err();
        assert_eq!(failure.reason, DecodeReason::Syntax);

        let failure = decode::<Value>(b"", &FallbackChain::none()).unwrap_err();
        assert_eq!(failure.reason, DecodeReason::Syntax);
    }

    #[test]
    fn test_shape_mismatch_without_fallbacks_is_terminal() {
        let body = br#"{"success":true,"data":{"abc":{"id":1,"hash":"abc"}}}"#;
        let failure = decode::<Vec<Item>>(body, &FallbackChain::none()).unwrap_err();

        assert_eq!(failure.reason, DecodeReason::ShapeMismatch);
        assert_eq!(failure.attempted, vec!["Vec<Item>"]);
    }

    #[test]
    fn test_shape_mismatch_uses_declared_fallback() {
        let chain = FallbackChain::none().or(FallbackCandidate::new(
            "hash-keyed map",
            |map: std::collections::HashMap<String, Item>| map.into_values().collect::<Vec<_>>(),
        ));
        let body = br#"{"success":true,"data":{"abc":{"id":1,"hash":"abc"}}}"#;
        let envelope = decode::<Vec<Item>>(body, &chain).unwrap();

        assert_eq!(envelope.data.unwrap()[0].id, 1);
    }

    #[test]
    fn test_exhausted_fallbacks_report_every_shape() {
        let chain = FallbackChain::none().or(FallbackCandidate::new("number", |n: i64| {
            vec![Item {
                id: n,
                hash: String::new(),
            }]
        }));
        let body = br#"{"success":true,"data":"nope"}"#;
        let failure = decode::<Vec<Item>>(body, &chain).unwrap_err();

        assert_eq!(failure.reason, DecodeReason::ShapeMismatch);
        assert_eq!(failure.attempted, vec!["Vec<Item>", "number"]);
    }

    #[test]
    fn test_bare_document_needs_a_fallback() {
        let failure = decode::<Vec<String>>(br#"["a","b"]"#, &FallbackChain::none()).unwrap_err();
        assert_eq!(failure.reason, DecodeReason::NotEnvelope);

        let chain = FallbackChain::none().or(FallbackCandidate::new("bare list", |v: Vec<String>| v));
        let envelope = decode::<Vec<String>>(br#"["a","b"]"#, &chain).unwrap();
        assert_eq!(envelope.success, None);
        assert_eq!(envelope.data, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn test_object_without_envelope_keys_is_not_an_envelope() {
        let failure =
            decode::<Value>(br#"{"detail":"only detail"}"#, &FallbackChain::none()).unwrap_err();
        assert_eq!(failure.reason, DecodeReason::NotEnvelope);
    }

    #[test]
    fn test_error_fields_of_plain_object() {
        let (error, detail) = error_fields(br#"{"detail":"Not authenticated"}"#);
        assert_eq!(error, None);
        assert_eq!(detail.as_deref(), Some("Not authenticated"));

        let (error, _) = error_fields(br#"{"error":{"message":"rate limited"}}"#);
        assert_eq!(error.as_deref(), Some("rate limited"));

        assert_eq!(error_fields(b"[1, 2]"), (None, None));
        assert_eq!(error_fields(b"<html>"), (None, None));
    }

    #[test]
    fn test_non_boolean_success_is_a_mismatch() {
        let failure =
            decode::<Value>(br#"{"success":[1],"data":1}"#, &FallbackChain::none()).unwrap_err();
        assert_eq!(failure.reason, DecodeReason::ShapeMismatch);

        let envelope =
            decode::<i64>(br#"{"success":"false","data":1}"#, &FallbackChain::none()).unwrap();
        assert!(envelope.is_failure());
        assert!(envelope.data.is_none());
    }
}
