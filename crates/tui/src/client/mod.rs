use api_types::{error::FailureBody, user::LoginRequest, user::LoginResponse};
use reqwest::{
    Method, Url,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use serde::Serialize;
use serde_json::Value;

use crate::{
    error::{AppError, Result},
    session::SessionStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A transient, user-visible note about a finished call. The app layer turns
/// these into toasts; the client never renders.
#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// What every call hands back. Never an `Err`: a transport failure is
/// `status: None` with a `Null` body, and a status >= 400 still carries the
/// parsed body. Callers inspect the body themselves (the mint flow embeds
/// failures in 200 responses).
#[derive(Debug)]
pub struct ApiReply {
    pub status: Option<u16>,
    pub body: Value,
    pub notice: Notice,
}

impl ApiReply {
    pub fn ok(&self) -> bool {
        matches!(self.status, Some(status) if status < 400)
    }

    fn failed(message: String) -> Self {
        Self {
            status: None,
            body: Value::Null,
            notice: Notice::error(message),
        }
    }
}

/// Thin wrapper over the remote minting API.
///
/// Each call locks the session's busy flag for exactly its own span and
/// unlocks on every exit path. A call arriving while another is in flight is
/// rejected without dispatching (single-user, single-window usage model; the
/// flag doubles as the signal that disables interactive controls).
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| AppError::Terminal(format!("invalid base_url: {err}")))?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    pub async fn get(&self, session: &mut SessionStore, path: &str) -> ApiReply {
        self.call(session, Method::GET, path, None::<&()>).await
    }

    pub async fn post<T: Serialize + ?Sized>(
        &self,
        session: &mut SessionStore,
        path: &str,
        body: &T,
    ) -> ApiReply {
        self.call(session, Method::POST, path, Some(body)).await
    }

    pub async fn put<T: Serialize + ?Sized>(
        &self,
        session: &mut SessionStore,
        path: &str,
        body: &T,
    ) -> ApiReply {
        self.call(session, Method::PUT, path, Some(body)).await
    }

    /// Submits credentials; on a reply carrying a token, stores it in the
    /// session. A token-less reply is a plain `false`, not an error.
    pub async fn login(&self, session: &mut SessionStore, username: &str, password: &str) -> bool {
        let payload = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let reply = self.post(session, "/v2/user/login/", &payload).await;

        let token = serde_json::from_value::<LoginResponse>(reply.body.clone())
            .ok()
            .and_then(|res| res.token);

        match token {
            Some(token) => {
                tracing::info!("logged in successfully");
                session.set_token(token);
                true
            }
            None => {
                tracing::warn!("login failed: {}", reply.notice.message);
                false
            }
        }
    }

    /// PUT with a raw binary body, for the image attachment. Bypasses the
    /// JSON path but keeps the bearer header and busy-flag discipline, and
    /// resolves with the parsed JSON reply once the transfer completes.
    pub async fn upload(
        &self,
        session: &mut SessionStore,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> ApiReply {
        if session.busy() {
            return Self::rejected(path);
        }
        let url = match self.endpoint(path) {
            Ok(url) => url,
            Err(reply) => return reply,
        };

        session.lock();
        let mut req = self
            .http
            .put(url)
            .header(CONTENT_TYPE, content_type.to_string())
            .body(bytes);
        if let Some(token) = session.token() {
            req = req.header(AUTHORIZATION, format!("bearer {token}"));
        }
        let reply = Self::finish(&Method::PUT, path, req.send().await).await;
        session.unlock();
        reply
    }

    async fn call<T: Serialize + ?Sized>(
        &self,
        session: &mut SessionStore,
        method: Method,
        path: &str,
        body: Option<&T>,
    ) -> ApiReply {
        if session.busy() {
            return Self::rejected(path);
        }
        let url = match self.endpoint(path) {
            Ok(url) => url,
            Err(reply) => return reply,
        };

        session.lock();
        let mut req = self.http.request(method.clone(), url);
        if let Some(token) = session.token() {
            req = req.header(AUTHORIZATION, format!("bearer {token}"));
        }
        if let Some(body) = body {
            req = req.json(body);
        }
        let reply = Self::finish(&method, path, req.send().await).await;
        session.unlock();
        reply
    }

    /// Resolves a `/v2/...` path against the base URL. Plain string concat:
    /// `Url::join` would drop a path prefix like `/api` from the base.
    fn endpoint(&self, path: &str) -> std::result::Result<Url, ApiReply> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}{path}")).map_err(|err| {
            tracing::error!("invalid endpoint {path}: {err}");
            ApiReply::failed(format!("Something went awry: {err}"))
        })
    }

    fn rejected(path: &str) -> ApiReply {
        tracing::warn!("rejected {path}: another request is in flight");
        ApiReply::failed("Another request is still in flight.".to_string())
    }

    async fn finish(
        method: &Method,
        path: &str,
        sent: reqwest::Result<reqwest::Response>,
    ) -> ApiReply {
        let res = match sent {
            Ok(res) => res,
            Err(err) => {
                tracing::error!("{method} {path} failed: {err}");
                return ApiReply::failed(format!("Something went awry: {err}"));
            }
        };

        let status = res.status().as_u16();
        // Some endpoints answer with empty or non-JSON bodies; treat those
        // as a null body rather than a failed call.
        let body = res.json::<Value>().await.unwrap_or(Value::Null);

        let notice = if status >= 400 {
            let failure = serde_json::from_value::<FailureBody>(body.clone()).unwrap_or_default();
            tracing::warn!("{method} {path} -> {status}: {}", failure.text());
            Notice::error(format!("Something went awry: {}", failure.text()))
        } else {
            let verb = method.as_str().to_lowercase();
            Notice::success(format!("api success: {verb} {path}"))
        };

        ApiReply {
            status: Some(status),
            body,
            notice,
        }
    }
}
