//! Forwarding of the login and register calls to the upstream account API.
//!
//! The gateway passes the caller's JSON body through unchanged and relays the
//! upstream status and body. Any local failure collapses into a fixed 500 reply;
//! the underlying error is logged and never returned.

use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyRoute {
    Login,
    Register,
}

impl ProxyRoute {
    pub fn path(self) -> &'static str {
        match self {
            ProxyRoute::Login => "/auth/login",
            ProxyRoute::Register => "/auth/register",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProxyResponse {
    pub status: u16,
    pub body: Value,
}

impl ProxyResponse {
    pub fn internal_error() -> Self {
        Self {
            status: 500,
            body: json!({ "error": "Internal server error" }),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Best-effort human message from an error body.
    pub fn message(&self) -> Option<&str> {
        self.body
            .get("message")
            .or_else(|| self.body.get("error"))
            .and_then(Value::as_str)
    }
}

/// Raw reply from the upstream, before JSON decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamReply {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("upstream request failed: {0}")]
    Transport(String),
    #[error("upstream returned a non-JSON body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Sends one JSON POST. Implementations must not retry.
pub trait UpstreamTransport: Send + Sync {
    fn post_json(&self, url: &str, body: &str) -> Result<UpstreamReply, GatewayError>;
}

pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, GatewayError> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|err| GatewayError::Transport(err.to_string()))?;
        Ok(Self { client })
    }
}

impl UpstreamTransport for ReqwestTransport {
    fn post_json(&self, url: &str, body: &str) -> Result<UpstreamReply, GatewayError> {
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .map_err(|err| GatewayError::Transport(err.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|err| GatewayError::Transport(err.to_string()))?;
        Ok(UpstreamReply { status, body })
    }
}

pub struct AuthGateway {
    base_url: String,
    transport: Box<dyn UpstreamTransport>,
}

impl AuthGateway {
    pub fn new(base_url: impl Into<String>, transport: Box<dyn UpstreamTransport>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    /// Gateway backed by a real HTTP client.
    pub fn http(base_url: impl Into<String>) -> Result<Self, GatewayError> {
        Ok(Self::new(base_url, Box::new(ReqwestTransport::new()?)))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, route: ProxyRoute) -> String {
        format!("{}{}", self.base_url, route.path())
    }

    pub fn forward(&self, route: ProxyRoute, body: &Value) -> ProxyResponse {
        match self.try_forward(route, body) {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(route = route.path(), error = %err, "auth proxy failed");
                ProxyResponse::internal_error()
            }
        }
    }

    fn try_forward(&self, route: ProxyRoute, body: &Value) -> Result<ProxyResponse, GatewayError> {
        let payload = serde_json::to_string(body)?;
        let reply = self.transport.post_json(&self.url_for(route), &payload)?;
        let body: Value = serde_json::from_str(&reply.body)?;
        tracing::debug!(route = route.path(), status = reply.status, "auth proxy relayed");
        Ok(ProxyResponse {
            status: reply.status,
            body,
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Transport that replays a canned reply and records what it was sent.
    pub struct FakeTransport {
        reply: Result<UpstreamReply, String>,
        pub sent: Mutex<Vec<(String, String)>>,
    }

    impl FakeTransport {
        pub fn replying(status: u16, body: &str) -> Self {
            Self {
                reply: Ok(UpstreamReply {
                    status,
                    body: body.to_string(),
                }),
                sent: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    impl UpstreamTransport for FakeTransport {
        fn post_json(&self, url: &str, body: &str) -> Result<UpstreamReply, GatewayError> {
            self.sent
                .lock()
                .unwrap()
                .push((url.to_string(), body.to_string()));
            self.reply.clone().map_err(GatewayError::Transport)
        }
    }

    impl UpstreamTransport for std::sync::Arc<FakeTransport> {
        fn post_json(&self, url: &str, body: &str) -> Result<UpstreamReply, GatewayError> {
            self.as_ref().post_json(url, body)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::testing::FakeTransport;
    use super::*;

    #[test]
    fn forwards_body_verbatim_to_route_url() {
        let fake = Arc::new(FakeTransport::replying(200, r#"{"accessToken":"abc"}"#));
        let gateway = AuthGateway::new("https://api.example.test/api/", Box::new(fake.clone()));
        let body = json!({ "email": "a@b.c", "password": "pw" });

        let response = gateway.forward(ProxyRoute::Login, &body);

        assert_eq!(response.status, 200);
        assert_eq!(response.body["accessToken"], "abc");
        let sent = fake.sent.lock().unwrap();
        assert_eq!(sent[0].0, "https://api.example.test/api/auth/login");
        let forwarded: Value = serde_json::from_str(&sent[0].1).unwrap();
        assert_eq!(forwarded, body);
    }

    #[test]
    fn upstream_error_status_is_passed_through() {
        let fake = FakeTransport::replying(401, r#"{"message":"Invalid credentials"}"#);
        let gateway = AuthGateway::new("http://upstream", Box::new(fake));
        let response = gateway.forward(ProxyRoute::Register, &json!({}));
        assert_eq!(response.status, 401);
        assert!(!response.is_success());
        assert_eq!(response.message(), Some("Invalid credentials"));
    }

    #[test]
    fn transport_failure_becomes_generic_500() {
        let gateway = AuthGateway::new(
            "http://upstream",
            Box::new(FakeTransport::failing("connection refused")),
        );
        let response = gateway.forward(ProxyRoute::Login, &json!({}));
        assert_eq!(response, ProxyResponse::internal_error());
        assert!(!response.body.to_string().contains("refused"));
    }

    #[test]
    fn non_json_upstream_body_becomes_generic_500() {
        let gateway = AuthGateway::new(
            "http://upstream",
            Box::new(FakeTransport::replying(502, "<html>Bad gateway</html>")),
        );
        let response = gateway.forward(ProxyRoute::Login, &json!({}));
        assert_eq!(response.status, 500);
        assert_eq!(response.message(), Some("Internal server error"));
    }
}
