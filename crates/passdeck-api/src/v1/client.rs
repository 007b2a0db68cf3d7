// REST API v1 HTTP client
//
// Wraps `reqwest::Client` with base-URL normalization, bearer-token
// injection and FastAPI error decoding. Resource endpoints (templates,
// passes, customers, ...) are inherent methods in sibling modules.

use std::sync::RwLock;

use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;
use crate::v1::types::PassFile;

/// FastAPI error body: `{"detail": "..."}` or `{"detail": [{"loc": [...], "msg": "..."}]}`.
#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    detail: Option<Value>,
}

/// Async client for the wallet-pass manager REST API.
///
/// Every request is sent relative to `{base}/api/v1/`. Once a token is
/// installed with [`set_token`](Self::set_token) it is attached as
/// `Authorization: Bearer …` to all subsequent requests.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: RwLock<Option<SecretString>>,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client from a backend URL and transport settings.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(base_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
            token: RwLock::new(None),
        })
    }

    /// Ensure the base URL ends with `/api/v1/`.
    ///
    /// `https://passes.example.com` and `https://passes.example.com/api/v1`
    /// both normalize to `https://passes.example.com/api/v1/`.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();

        if path.ends_with("/api/v1") {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/api/v1/"));
        }

        Ok(url)
    }

    /// The normalized API root (always ends with `/api/v1/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Token management ─────────────────────────────────────────────

    /// Install the bearer token used for subsequent requests.
    pub fn set_token(&self, token: SecretString) {
        debug!("installing bearer token");
        *self.token.write().expect("token lock poisoned") = Some(token);
    }

    /// Drop the bearer token (logout).
    pub fn clear_token(&self) {
        debug!("clearing bearer token");
        *self.token.write().expect("token lock poisoned") = None;
    }

    pub fn has_token(&self) -> bool {
        self.token.read().expect("token lock poisoned").is_some()
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let guard = self.token.read().expect("token lock poisoned");
        match guard.as_ref() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"templates/"`) onto the API root.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.authorize(self.http.get(url)).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self
            .authorize(self.http.get(url).query(params))
            .send()
            .await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.authorize(self.http.post(url).json(body)).send().await?;
        self.handle_response(resp).await
    }

    /// POST an empty body (action endpoints such as `passes/{id}/redeem`).
    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.authorize(self.http.post(url)).send().await?;
        self.handle_response(resp).await
    }

    /// POST an `application/x-www-form-urlencoded` body (OAuth2 login).
    pub(crate) async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url} (form)");

        let resp = self.http.post(url).form(form).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self.authorize(self.http.put(url).json(body)).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self.authorize(self.http.delete(url)).send().await?;
        self.handle_empty(resp).await
    }

    /// GET a binary payload, keeping the filename from `Content-Disposition`.
    pub(crate) async fn get_file(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<PassFile, Error> {
        let url = self.url(path)?;
        debug!("GET {url} (file) params={params:?}");

        let resp = self
            .authorize(self.http.get(url).query(params))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(self.parse_error(status, resp).await);
        }

        let headers = resp.headers();
        let filename = headers
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_disposition);
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let bytes = resp.bytes().await?.to_vec();
        trace!(len = bytes.len(), ?filename, "downloaded file");

        Ok(PassFile {
            filename,
            content_type,
            bytes,
        })
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview = &body[..body.len().min(200)];
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        let detail = extract_detail(&raw);

        if status == reqwest::StatusCode::UNAUTHORIZED {
            // Without a token this is a rejected login; with one, the session lapsed.
            return if self.has_token() {
                Error::SessionExpired
            } else {
                Error::Authentication {
                    message: detail.unwrap_or_else(|| "invalid credentials".into()),
                }
            };
        }

        Error::Api {
            status: status.as_u16(),
            detail,
            body: raw,
        }
    }
}

/// Pull a single human-readable message out of a FastAPI error body.
///
/// Validation errors (`detail` as a list) are flattened to `loc: msg`
/// pairs joined with `; `.
pub(crate) fn extract_detail(raw: &str) -> Option<String> {
    let parsed: ErrorResponse = serde_json::from_str(raw).ok()?;
    match parsed.detail? {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Array(items) => {
            let messages: Vec<String> = items.iter().filter_map(validation_message).collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        other => Some(other.to_string()),
    }
}

fn validation_message(item: &Value) -> Option<String> {
    let msg = item.get("msg")?.as_str()?;
    let loc = item
        .get("loc")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| match p {
                    Value::String(s) if s != "body" => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join(".")
        })
        .unwrap_or_default();

    if loc.is_empty() {
        Some(msg.to_owned())
    } else {
        Some(format!("{loc}: {msg}"))
    }
}

/// `attachment; filename=pass-abc.pkpass` → `pass-abc.pkpass`
fn filename_from_disposition(header: &str) -> Option<String> {
    header.split(';').map(str::trim).find_map(|part| {
        part.strip_prefix("filename=")
            .map(|name| name.trim_matches('"').to_owned())
            .filter(|name| !name.is_empty())
    })
}
