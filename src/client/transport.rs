//! How the client reaches the dispatcher: over HTTP, or by driving the
//! router in-process. Both remember the session cookie the server hands out.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode, Uri},
    Router,
};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use serde_json::Value;
use tokio::sync::Mutex;
use tower::ServiceExt;

#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one JSON request; returns the status and the decoded body
    /// (`Value::Null` for an empty body).
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> anyhow::Result<(StatusCode, Value)>;
}

/// The `name=value` pair of the last session cookie the server set.
#[derive(Default)]
pub struct CookieMemory {
    pair: Mutex<Option<String>>,
}

impl CookieMemory {
    pub async fn header(&self) -> Option<String> {
        self.pair.lock().await.clone()
    }

    pub async fn absorb(&self, headers: &HeaderMap) {
        for value in headers.get_all(header::SET_COOKIE) {
            let Ok(raw) = value.to_str() else { continue };
            let pair = raw.split(';').next().unwrap_or_default().trim();
            let cleared = pair.ends_with('=')
                || raw.to_ascii_lowercase().contains("max-age=0");
            let mut slot = self.pair.lock().await;
            *slot = if cleared { None } else { Some(pair.to_string()) };
        }
    }
}

fn decode(bytes: &[u8]) -> anyhow::Result<Value> {
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes).map_err(|e| anyhow::anyhow!("response is not JSON: {e}"))
}

fn encode(body: Option<Value>) -> Bytes {
    body.map(|b| Bytes::from(b.to_string())).unwrap_or_default()
}

/// Talks to a running server, e.g. `http://127.0.0.1:8080`.
pub struct HttpTransport {
    base: String,
    client: Client<HttpConnector, Full<Bytes>>,
    cookies: CookieMemory,
}

impl HttpTransport {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
            client: Client::builder(TokioExecutor::new()).build_http(),
            cookies: CookieMemory::default(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> anyhow::Result<(StatusCode, Value)> {
        let uri: Uri = format!("{}{}", self.base, path).parse()?;
        let mut req = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = self.cookies.header().await {
            req = req.header(header::COOKIE, cookie);
        }
        let req = req.body(Full::new(encode(body)))?;

        let res = self.client.request(req).await?;
        let status = res.status();
        self.cookies.absorb(res.headers()).await;
        let bytes = res.into_body().collect().await?.to_bytes();
        Ok((status, decode(&bytes)?))
    }
}

/// Drives an axum `Router` directly; no socket involved.
pub struct InProcessTransport {
    router: Router,
    cookies: CookieMemory,
}

impl InProcessTransport {
    pub fn new(router: Router) -> Self {
        Self { router, cookies: CookieMemory::default() }
    }
}

#[async_trait]
impl Transport for InProcessTransport {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> anyhow::Result<(StatusCode, Value)> {
        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = self.cookies.header().await {
            req = req.header(header::COOKIE, cookie);
        }
        let req = req.body(Body::from(encode(body)))?;

        let res = self.router.clone().oneshot(req).await?;
        let status = res.status();
        self.cookies.absorb(res.headers()).await;
        let bytes = res.into_body().collect().await?.to_bytes();
        Ok((status, decode(&bytes)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn set_cookie(v: &'static str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(header::SET_COOKIE, HeaderValue::from_static(v));
        h
    }

    #[tokio::test]
    async fn remembers_and_forgets_session_cookie() {
        let mem = CookieMemory::default();
        mem.absorb(&set_cookie("sid=abc; HttpOnly; Path=/; Max-Age=1800")).await;
        assert_eq!(mem.header().await.as_deref(), Some("sid=abc"));

        mem.absorb(&HeaderMap::new()).await;
        assert_eq!(mem.header().await.as_deref(), Some("sid=abc"));

        mem.absorb(&set_cookie("sid=; Path=/; Max-Age=0")).await;
        assert_eq!(mem.header().await, None);
    }

    #[tokio::test]
    async fn http_transport_carries_the_session_over_a_socket() {
        use crate::{app::build_app, state::AppState};
        use serde_json::json;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, build_app(AppState::fake())).await.unwrap();
        });

        let http = HttpTransport::new(format!("http://{addr}/"));
        let (status, _) = http
            .send(
                Method::POST,
                "/api/register",
                Some(json!({ "login": "ann", "password": "p1", "email": "a@x.com" })),
            )
            .await
            .unwrap();
        assert_eq!(status, StatusCode::OK);

        let (status, _) = http.send(Method::GET, "/api/user-movies", None).await.unwrap();
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = http
            .send(
                Method::POST,
                "/api/login",
                Some(json!({ "login": "ann", "password": "p1" })),
            )
            .await
            .unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["login"], "ann");

        let (status, body) = http.send(Method::GET, "/api/user-movies", None).await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["movies"], json!([]));

        http.send(Method::POST, "/api/logout", None).await.unwrap();
        assert_eq!(http.cookies.header().await, None);
        let (status, _) = http.send(Method::GET, "/api/user-movies", None).await.unwrap();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn empty_body_decodes_to_null() {
        assert_eq!(decode(b"").unwrap(), Value::Null);
        assert!(decode(b"<html>").is_err());
    }
}
