//! Outbound request description.

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

use crate::error::GatewayError;

/// Per-request state carried alongside an [`HttpRequest`].
///
/// Lives and dies with one logical request, so the auth layer can tell
/// whether this particular call was already resubmitted.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    retried: bool,
    request_id: Option<String>,
}

impl RequestContext {
    /// Returns true if the request was already resubmitted after a 401/403.
    pub fn is_retried(&self) -> bool {
        self.retried
    }

    /// Marks the request as resubmitted.
    pub fn mark_retried(&mut self) {
        self.retried = true;
    }

    /// Returns the inbound request id this call belongs to, if known.
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Sets the inbound request id.
    pub fn set_request_id(&mut self, id: impl Into<String>) {
        self.request_id = Some(id.into());
    }
}

/// A request to a backend service.
///
/// The path is relative to the base URL of the transport that sends it.
///
/// # Example
///
/// ```
/// use logiflow_core::HttpRequest;
///
/// let request = HttpRequest::get("/repartidores").with_query("estado", "DISPONIBLE");
/// assert_eq!(request.path(), "/repartidores");
/// assert_eq!(request.params().len(), 1);
/// assert!(request.authorization().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct HttpRequest {
    method: Method,
    path: String,
    body: Option<Value>,
    headers: HeaderMap,
    params: Vec<(String, String)>,
    context: RequestContext,
}

impl HttpRequest {
    /// Creates a request with the given method and path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: HeaderMap::new(),
            params: Vec::new(),
            context: RequestContext::default(),
        }
    }

    /// Creates a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Creates a POST request with a JSON body.
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, path).with_body(body)
    }

    /// Creates a PATCH request.
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// Sets the JSON body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Adds a query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Adds a header.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Attaches the inbound request id to the context.
    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.context.set_request_id(id);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut RequestContext {
        &mut self.context
    }

    /// Sets the `Authorization` header, replacing any previous value.
    ///
    /// The value is flagged as sensitive so it never shows up in `Debug` output.
    pub fn set_authorization(&mut self, value: &str) -> Result<(), GatewayError> {
        let mut header = HeaderValue::from_str(value)
            .map_err(|e| GatewayError::InvalidRequest(format!("authorization header: {e}")))?;
        header.set_sensitive(true);
        self.headers.insert(AUTHORIZATION, header);
        Ok(())
    }

    /// Returns the current `Authorization` header value.
    pub fn authorization(&self) -> Option<&str> {
        self.headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builders() {
        let request = HttpRequest::post("/login", json!({ "username": "admin" }))
            .with_query("a", "1")
            .with_request_id("req-1");

        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.body(), Some(&json!({ "username": "admin" })));
        assert_eq!(request.params(), &[("a".to_string(), "1".to_string())]);
        assert_eq!(request.context().request_id(), Some("req-1"));
        assert!(!request.context().is_retried());
    }

    #[test]
    fn test_authorization_is_replaced_and_hidden() {
        let mut request = HttpRequest::get("/pedidos/1");
        request.set_authorization("Bearer old").unwrap();
        request.set_authorization("Bearer new").unwrap();

        assert_eq!(request.authorization(), Some("Bearer new"));
        assert_eq!(request.headers().get_all(AUTHORIZATION).iter().count(), 1);
        assert!(!format!("{request:?}").contains("Bearer new"));
    }

    #[test]
    fn test_invalid_authorization_value() {
        let mut request = HttpRequest::get("/");
        let err = request.set_authorization("Bearer \n").unwrap_err();
        assert!(matches!(err, GatewayError::InvalidRequest(_)));
    }

    #[test]
    fn test_retry_flag_travels_with_clone() {
        let mut request = HttpRequest::get("/vehiculos/7");
        request.context_mut().mark_retried();

        let resubmitted = request.clone();
        assert!(resubmitted.context().is_retried());
    }
}
