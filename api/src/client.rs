use crate::error::errors_empty;
use reqwest::{Client, Url};
use serde_json::{json, Map, Value};
use std::future::Future;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://v3.football.api-sports.io/";

const API_KEY_HEADER: &str = "x-apisports-key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Ordered request parameters: the query string of a GET, the JSON body of
/// a POST.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.0.push((key.to_owned(), value.to_string()));
        self
    }

    /// Add `key` only when there is a value for it.
    pub fn with_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Where a component's log records go. Injected into the client and the
/// service instead of each module logging under its own path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogContext {
    target: String,
}

impl LogContext {
    pub fn new(target: impl Into<String>) -> Self {
        Self { target: target.into() }
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

impl Default for LogContext {
    fn default() -> Self {
        Self::new("sporty")
    }
}

/// One authenticated round trip to the API.
///
/// Implementations never fail: a transport problem comes back as an error
/// envelope (see [`failure_envelope`]) so callers only have one error path.
pub trait Transport {
    fn request(&self, method: Method, endpoint: &str, params: &Params) -> impl Future<Output = Value>;
}

/// The envelope returned in place of a response when the request itself
/// failed.
pub fn failure_envelope(reason: &str) -> Value {
    json!({
        "results": 0,
        "errors": {"message": format!("API request failed: {reason}")},
        "response": []
    })
}

/// API-Football v3 client.
#[derive(Debug, Clone)]
pub struct FootballApi {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
    log: LogContext,
}

impl FootballApi {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent("sporty/0.1 (terminal football client)")
                .build()
                .unwrap_or_default(),
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            timeout: REQUEST_TIMEOUT,
            log: LogContext::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_log_context(mut self, log: LogContext) -> Self {
        self.log = log;
        self
    }

    fn url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    async fn send(&self, method: Method, endpoint: &str, params: &Params) -> Result<Value, String> {
        let url = self.url(endpoint);
        let builder = match method {
            Method::Get => {
                let url = if params.is_empty() {
                    Url::parse(&url)
                } else {
                    Url::parse_with_params(&url, params.iter())
                }
                .map_err(|e| format!("invalid url {url}: {e}"))?;
                log::debug!(target: self.log.target(), "GET {url}");
                self.client.get(url)
            }
            Method::Post => {
                let body: Map<String, Value> = params
                    .iter()
                    .map(|(k, v)| (k.to_owned(), Value::String(v.to_owned())))
                    .collect();
                log::debug!(target: self.log.target(), "POST {url}");
                self.client.post(&url).json(&body)
            }
        };

        let response = builder
            .header(API_KEY_HEADER, &self.api_key)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if status.is_success() {
            return response.json::<Value>().await.map_err(|e| e.to_string());
        }

        // Upstream sometimes explains a non-2xx with a regular error envelope.
        // One without any errors would read as an empty result.
        match response.json::<Value>().await {
            Ok(body) if body.get("errors").is_some_and(|e| !errors_empty(e)) => Ok(body),
            _ => Err(format!("HTTP {status} from {endpoint}")),
        }
    }
}

impl Transport for FootballApi {
    async fn request(&self, method: Method, endpoint: &str, params: &Params) -> Value {
        match self.send(method, endpoint, params).await {
            Ok(body) => body,
            Err(reason) => {
                log::warn!(target: self.log.target(), "request to {endpoint} failed: {reason}");
                failure_envelope(&reason)
            }
        }
    }
}
