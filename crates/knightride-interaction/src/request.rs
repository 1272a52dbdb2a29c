//! Per-call request envelope.

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde_json::Value;

use crate::error::RequestError;

/// Everything needed to issue one API call. Built per call, never retained.
#[derive(Debug, Clone)]
pub struct RequestEnvelope {
    pub method: Method,
    /// Path relative to the API base URL, starting with `/`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Extra headers, applied after the defaults and overriding them.
    pub headers: HeaderMap,
}

impl RequestEnvelope {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Serializes `body` as the JSON payload.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, RequestError> {
        let value = serde_json::to_value(body).map_err(|e| RequestError::Encode(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }

    pub fn query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query = pairs;
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::AUTHORIZATION;

    #[test]
    fn test_json_body_is_captured() {
        #[derive(Serialize)]
        struct Body {
            email: &'static str,
        }

        let envelope = RequestEnvelope::post("/auth/login")
            .json(&Body { email: "a@b.c" })
            .unwrap();

        assert_eq!(envelope.method, Method::POST);
        assert_eq!(envelope.body, Some(serde_json::json!({ "email": "a@b.c" })));
    }

    #[test]
    fn test_header_overrides_are_kept() {
        let envelope = RequestEnvelope::get("/user/profile")
            .header(AUTHORIZATION, HeaderValue::from_static("Bearer other"));

        assert_eq!(envelope.headers.get(AUTHORIZATION).unwrap(), "Bearer other");
        assert!(envelope.body.is_none());
    }
}
