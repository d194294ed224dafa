//! Backend client - one HTTP round trip per operation, status mapped to outcome

use futures_util::StreamExt;
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::constants::{AVATAR_HEIGHT, AVATAR_WIDTH, LOGIN_PATH, LOGOUT_PATH, MAX_AVATAR_BYTES, USERS_PATH};
use crate::error::{ClientError, ClientResult};
use crate::models::{Avatar, LoginOutcome, SessionCredential, User};
use crate::network::avatar::decode_avatar;

#[derive(Serialize)]
struct LoginBody<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginReply {
    username: Option<String>,
}

/// Client for the admin backend.
///
/// Holds no session state: the credential is passed into every call that
/// needs it, and the caller decides what to keep.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    origin: Url,
}

impl ApiClient {
    /// Build a client for the configured origin with a bounded request timeout
    pub fn new(config: &Config) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ClientError::Transport)?;
        Ok(Self::with_client(http, config.base_url.clone()))
    }

    pub fn with_client(http: reqwest::Client, origin: Url) -> Self {
        ApiClient { http, origin }
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Resolve a path against the origin. Anything that lands on a different
    /// scheme, host or port is rejected so the session cookie never leaves it.
    pub fn resolve(&self, path: &str) -> ClientResult<Url> {
        let url = self
            .origin
            .join(path)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", path, e)))?;
        if url.origin() != self.origin.origin() {
            return Err(ClientError::InvalidUrl(format!("{}: not on {}", path, self.origin)));
        }
        Ok(url)
    }

    fn authorize(builder: RequestBuilder, credential: Option<&SessionCredential>) -> RequestBuilder {
        match credential {
            Some(cred) => builder.header(COOKIE, cred.cookie_header()),
            None => builder,
        }
    }

    /// `POST /api/login`
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<LoginOutcome> {
        let url = self.resolve(LOGIN_PATH)?;
        let resp = self
            .http
            .post(url)
            .json(&LoginBody { username, password })
            .send()
            .await?;

        match resp.status() {
            StatusCode::OK => {
                let cookies: Vec<String> = resp
                    .headers()
                    .get_all(SET_COOKIE)
                    .iter()
                    .filter_map(|v| v.to_str().ok())
                    .map(str::to_string)
                    .collect();
                let credential = SessionCredential::from_set_cookie(cookies.iter().map(String::as_str))
                    .ok_or_else(|| ClientError::Decode("login response carried no session cookie".to_string()))?;

                // The echoed username is informational only
                let username = resp.json::<LoginReply>().await.ok().and_then(|r| r.username);
                Ok(LoginOutcome {
                    credential,
                    username,
                })
            }
            StatusCode::UNAUTHORIZED => Err(ClientError::AuthenticationFailed),
            status => Err(ClientError::RequestFailed(status.as_u16())),
        }
    }

    /// `DELETE /api/logout`. Best effort: failures are logged and dropped.
    pub async fn logout(&self, credential: Option<&SessionCredential>) {
        let url = match self.resolve(LOGOUT_PATH) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(error = %e, "Logout skipped");
                return;
            }
        };

        match Self::authorize(self.http.delete(url), credential).send().await {
            Ok(resp) => tracing::info!(status = resp.status().as_u16(), "Logout acknowledged"),
            Err(e) => tracing::warn!(error = %ClientError::from(e), "Logout request failed"),
        }
    }

    /// `GET /api/users`, in backend order
    pub async fn list_users(&self, credential: Option<&SessionCredential>) -> ClientResult<Vec<User>> {
        let url = self.resolve(USERS_PATH)?;
        let resp = Self::authorize(self.http.get(url), credential).send().await?;

        match resp.status() {
            StatusCode::OK => Ok(resp.json::<Vec<User>>().await?),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ClientError::Unauthenticated),
            status => Err(ClientError::RequestFailed(status.as_u16())),
        }
    }

    /// `DELETE /api/users/{id}`; only 204 counts as success
    pub async fn delete_user(&self, id: i64, credential: Option<&SessionCredential>) -> ClientResult<()> {
        let url = self.resolve(&format!("{}/{}", USERS_PATH, id))?;
        let resp = Self::authorize(self.http.delete(url), credential).send().await?;

        match resp.status() {
            StatusCode::NO_CONTENT => Ok(()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ClientError::Unauthenticated),
            status => Err(ClientError::RequestFailed(status.as_u16())),
        }
    }

    /// Download an avatar and scale it to the display box
    pub async fn fetch_avatar(&self, path: &str, credential: Option<&SessionCredential>) -> ClientResult<Avatar> {
        let url = self.resolve(path)?;
        let resp = Self::authorize(self.http.get(url), credential).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::RequestFailed(status.as_u16()));
        }
        if resp.content_length().is_some_and(|len| len as usize > MAX_AVATAR_BYTES) {
            return Err(too_large());
        }

        let mut stream = resp.bytes_stream();
        let mut bytes = Vec::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if bytes.len() + chunk.len() > MAX_AVATAR_BYTES {
                return Err(too_large());
            }
            bytes.extend_from_slice(&chunk);
        }

        tokio::task::spawn_blocking(move || decode_avatar(&bytes, AVATAR_WIDTH, AVATAR_HEIGHT))
            .await
            .map_err(|e| ClientError::Decode(format!("avatar decoder stopped: {}", e)))?
    }
}

fn too_large() -> ClientError {
    ClientError::Decode(format!("avatar exceeds {} bytes", MAX_AVATAR_BYTES))
}
