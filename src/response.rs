//! Typed API response.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ContentApiError, Result};
use crate::request::Headers;

/// A successful Content API response with a parsed JSON body.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    headers: Headers,
    raw_body: String,
    body: Value,
}

impl Response {
    /// Parse a raw response.
    ///
    /// # Errors
    ///
    /// Returns [`ContentApiError::InvalidData`] if the body is not valid JSON.
    pub fn new(status: u16, body: impl Into<String>, headers: Headers) -> Result<Self> {
        let raw_body = body.into();
        let parsed: Value = serde_json::from_str(&raw_body).map_err(|e| {
            ContentApiError::InvalidData(format!("Response body is not (valid) json: {e}"))
        })?;
        if parsed.is_null() {
            return Err(ContentApiError::InvalidData(
                "Response body is not (valid) json.".to_string(),
            ));
        }

        Ok(Self {
            status,
            headers,
            raw_body,
            body: parsed,
        })
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn raw_body(&self) -> &str {
        &self.raw_body
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Total number of results across all pages.
    ///
    /// Read from `_meta.total`; responses without metadata count their own
    /// resources.
    pub fn total_results(&self) -> u64 {
        self.body
            .pointer("/_meta/total")
            .and_then(Value::as_u64)
            .unwrap_or_else(|| match self.resources() {
                Value::Array(items) => items.len() as u64,
                _ => 1,
            })
    }

    /// The resource payload: `_items` for listings, the whole body otherwise.
    pub fn resources(&self) -> &Value {
        self.body.get("_items").unwrap_or(&self.body)
    }

    /// Decode the resource payload into `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(T::deserialize(self.resources())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_response() {
        let body = r#"{
            "_meta": {"page": 1, "max_results": 25, "total": 42},
            "_items": [{"uri": "a"}, {"uri": "b"}]
        }"#;
        let response = Response::new(200, body, Headers::new()).unwrap();

        assert_eq!(response.total_results(), 42);
        assert_eq!(response.resources().as_array().map(Vec::len), Some(2));
        assert_eq!(response.raw_body(), body);
    }

    #[test]
    fn test_single_resource_response() {
        let response =
            Response::new(200, r#"{"uri": "http://x/items/1", "headline": "Hi"}"#, Headers::new())
                .unwrap();
        assert_eq!(response.resources()["headline"], "Hi");
        assert_eq!(response.total_results(), 1);
    }

    #[test]
    fn test_total_falls_back_to_item_count() {
        let response = Response::new(200, r#"{"_items": [1, 2, 3]}"#, Headers::new()).unwrap();
        assert_eq!(response.total_results(), 3);
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        let err = Response::new(200, "<html>oops</html>", Headers::new()).unwrap_err();
        assert!(matches!(err, ContentApiError::InvalidData(_)));

        let err = Response::new(200, "null", Headers::new()).unwrap_err();
        assert!(matches!(err, ContentApiError::InvalidData(_)));
    }

    #[test]
    fn test_decode() {
        let response = Response::new(200, r#"{"_items": ["a", "b"]}"#, Headers::new()).unwrap();
        let decoded: Vec<String> = response.decode().unwrap();
        assert_eq!(decoded, vec!["a", "b"]);
    }
}
