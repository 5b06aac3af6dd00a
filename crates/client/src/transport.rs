//! HTTP transport.
//!
//! [`Transport`] is the seam between request dispatch and the network.
//! [`HttpTransport`] implements it on `reqwest` and is responsible for
//! classifying failures, in particular the edge `cache_not_ready` signal.

use crate::error::CACHE_NOT_READY;
use crate::{ClientConfig, Error, Result};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use std::future::Future;
use tracing::debug;

const USER_AGENT: &str = concat!("warrant-rust/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

/// One outbound call.
#[derive(Debug, Clone, Copy)]
pub struct Request<'a> {
    pub method: Method,
    /// Overrides the transport's default base URL (used for edge checks).
    pub base_url: Option<&'a str>,
    pub path: &'a str,
    pub query: &'a [(&'a str, String)],
    pub body: Option<&'a Value>,
}

impl<'a> Request<'a> {
    pub fn post(path: &'a str, body: &'a Value) -> Self {
        Self {
            method: Method::Post,
            base_url: None,
            path,
            query: &[],
            body: Some(body),
        }
    }

    pub fn delete(path: &'a str, body: &'a Value) -> Self {
        Self {
            method: Method::Delete,
            ..Self::post(path, body)
        }
    }

    pub fn get(path: &'a str, query: &'a [(&'a str, String)]) -> Self {
        Self {
            method: Method::Get,
            base_url: None,
            path,
            query,
            body: None,
        }
    }

    pub fn with_base_url(mut self, base_url: &'a str) -> Self {
        self.base_url = Some(base_url);
        self
    }
}

/// A response the service considers a well-formed answer.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Value,
}

/// Trait for request transports.
///
/// Implementations return `Ok` for well-formed answers (including a negative
/// access decision) and classify everything else into [`Error`] variants.
/// An edge that is not yet synchronized must surface as
/// [`Error::CacheNotReady`].
pub trait Transport: Send + Sync {
    fn send(&self, request: Request<'_>) -> impl Future<Output = Result<Response>> + Send;
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// `reqwest`-backed transport.
pub struct HttpTransport {
    client: reqwest::Client,
    api_key: String,
    api_endpoint: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Use a preconfigured `reqwest::Client` (timeouts, proxies, TLS).
    pub fn with_client(client: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            api_endpoint: config.api_endpoint.clone(),
        }
    }

    fn url(&self, request: &Request<'_>) -> Result<Url> {
        let base = request.base_url.unwrap_or(&self.api_endpoint);
        let raw = format!("{}{}", base.trim_end_matches('/'), request.path);
        let mut url =
            Url::parse(&raw).map_err(|e| Error::Config(format!("invalid URL {raw}: {e}")))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }
        Ok(url)
    }
}

/// Statuses that carry an answer rather than a failure.
fn is_decision(status: StatusCode) -> bool {
    status.is_success() || status == StatusCode::FORBIDDEN
}

fn classify(status: StatusCode, text: &str) -> Error {
    let body: Option<ApiErrorBody> = serde_json::from_str(text).ok();
    let (code, message) = match body {
        Some(body) => (body.code, body.message),
        None => (None, None),
    };
    let message = message.unwrap_or_else(|| {
        if text.is_empty() {
            status.to_string()
        } else {
            text.to_string()
        }
    });

    if code.as_deref() == Some(CACHE_NOT_READY) {
        return Error::CacheNotReady { message };
    }
    Error::Api {
        status: status.as_u16(),
        code,
        message,
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: Request<'_>) -> Result<Response> {
        let url = self.url(&request)?;
        debug!(method = ?request.method, %url, "sending request");

        let builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
            Method::Delete => self.client.delete(url),
        };
        let mut builder = builder
            .header("Authorization", format!("ApiKey {}", self.api_key))
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json");
        if let Some(body) = request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !is_decision(status) {
            return Err(classify(status, &text));
        }

        // A decision rests on the status alone; non-JSON bodies are kept as text.
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };
        Ok(Response {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn transport(server: &mockito::Server) -> HttpTransport {
        HttpTransport::new(&ClientConfig::new("sk_test").with_api_endpoint(server.url()))
    }

    #[tokio::test]
    async fn post_sends_key_and_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v2/authorize")
            .match_header("authorization", "ApiKey sk_test")
            .match_body(Matcher::Json(json!({"warrants": []})))
            .with_status(200)
            .with_body(r#"{"code":200,"result":"Authorized"}"#)
            .create_async()
            .await;

        let body = json!({"warrants": []});
        let response = transport(&server)
            .send(Request::post("/v2/authorize", &body))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body["result"], "Authorized");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn forbidden_is_an_answer() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v2/authorize")
            .with_status(403)
            .create_async()
            .await;

        let body = json!({});
        let response = transport(&server)
            .send(Request::post("/v2/authorize", &body))
            .await
            .unwrap();
        assert_eq!(response.status, 403);
        assert_eq!(response.body, Value::Null);
    }

    #[tokio::test]
    async fn text_body_kept_as_string() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v2/authorize")
            .with_status(403)
            .with_body("Forbidden")
            .create_async()
            .await;

        let body = json!({});
        let response = transport(&server)
            .send(Request::post("/v2/authorize", &body))
            .await
            .unwrap();
        assert_eq!(response.status, 403);
        assert_eq!(response.body, json!("Forbidden"));
    }

    #[tokio::test]
    async fn cache_not_ready_classified() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v2/authorize")
            .with_status(503)
            .with_body(r#"{"code":"cache_not_ready","message":"snapshot loading"}"#)
            .create_async()
            .await;

        let body = json!({});
        let err = transport(&server)
            .send(Request::post("/v2/authorize", &body))
            .await
            .unwrap_err();
        match err {
            Error::CacheNotReady { message } => assert_eq!(message, "snapshot loading"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn other_failures_are_api_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v2/authorize")
            .with_status(401)
            .with_body(r#"{"code":"unauthorized","message":"bad key"}"#)
            .create_async()
            .await;

        let body = json!({});
        let err = transport(&server)
            .send(Request::post("/v2/authorize", &body))
            .await
            .unwrap_err();
        match err {
            Error::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 401);
                assert_eq!(code.as_deref(), Some("unauthorized"));
                assert_eq!(message, "bad key");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn base_url_override_and_query() {
        let mut primary = mockito::Server::new_async().await;
        let mut other = mockito::Server::new_async().await;
        let untouched = primary.mock("GET", Matcher::Any).expect(0).create_async().await;
        let mock = other
            .mock("GET", "/v1/query")
            .match_query(Matcher::UrlEncoded("q".into(), "select role".into()))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let query = [("q", "select role".to_string())];
        let base = other.url();
        let response = transport(&primary)
            .send(Request::get("/v1/query", &query).with_base_url(&base))
            .await
            .unwrap();

        assert_eq!(response.body, json!([]));
        mock.assert_async().await;
        untouched.assert_async().await;
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        let config = ClientConfig::new("sk_test").with_api_endpoint("http://127.0.0.1:1");
        let body = json!({});
        let err = HttpTransport::new(&config)
            .send(Request::post("/v2/authorize", &body))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }
}
