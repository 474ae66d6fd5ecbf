// JSON-P body decoding.
// Strips the `callback(...)` wrapper GitHub puts around responses when a
// `callback` query parameter is given.

use crate::error::{FeedError, Result};

use super::types::JsonpEnvelope;

/// Return the JSON argument passed to `callback` in a JSON-P body.
///
/// Accepts the `/**/` prefix GitHub emits and an optional trailing `;`.
pub fn unwrap_callback<'a>(body: &'a str, callback: &str) -> Result<&'a str> {
    let rest = body.trim();
    let rest = rest.strip_prefix("/**/").unwrap_or(rest).trim_start();

    let rest = rest
        .strip_prefix(callback)
        .ok_or_else(|| FeedError::Jsonp(format!("expected callback `{}`", callback)))?
        .trim_start();
    let rest = rest
        .strip_prefix('(')
        .ok_or_else(|| FeedError::Jsonp("missing `(` after callback name".to_string()))?;

    let rest = rest.trim_end();
    let rest = rest.strip_suffix(';').unwrap_or(rest).trim_end();
    let inner = rest
        .strip_suffix(')')
        .ok_or_else(|| FeedError::Jsonp("missing closing `)`".to_string()))?;

    Ok(inner)
}

/// Decode a JSON-P body into its `{meta, data}` envelope.
pub fn decode(body: &str, callback: &str) -> Result<JsonpEnvelope> {
    let json = unwrap_callback(body, callback)?;
    let envelope: JsonpEnvelope = serde_json::from_str(json)?;
    Ok(envelope)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwrap_github_style_body() {
        let body = "/**/tpieevents({\"meta\":{\"status\":200},\"data\":[]})\n";
        assert_eq!(
            unwrap_callback(body, "tpieevents").unwrap(),
            "{\"meta\":{\"status\":200},\"data\":[]}"
        );
    }

    #[test]
    fn test_unwrap_with_semicolon() {
        let body = "cb( {\"data\": []} );";
        assert_eq!(unwrap_callback(body, "cb").unwrap(), " {\"data\": []} ");
    }

    #[test]
    fn test_wrong_callback_name() {
        let err = unwrap_callback("other({})", "tpieevents").unwrap_err();
        assert!(matches!(err, FeedError::Jsonp(_)));
    }

    #[test]
    fn test_plain_json_is_rejected() {
        assert!(unwrap_callback("[]", "tpieevents").is_err());
    }

    #[test]
    fn test_decode_envelope() {
        let body = r#"/**/cb({"meta":{"status":404,"X-RateLimit-Remaining":"59"},"data":{"message":"Not Found"}})"#;
        let envelope = decode(body, "cb").unwrap();
        assert_eq!(envelope.meta.status, 404);
        assert_eq!(envelope.meta.ratelimit_remaining.as_deref(), Some("59"));
        assert_eq!(envelope.data["message"], "Not Found");
    }
}
