//! Per-actor HTTP agents

use crate::errors::HttpError;
use crate::types::HttpMethod;
use isubench_config::BenchConfig;
use reqwest::{header::CONTENT_TYPE, Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

/// Which timeout an agent is built with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    /// Regular flow traffic
    Default,
    /// `POST /initialize`, which may run much longer
    Initialize,
}

/// Builds agents that all point at the same target
#[derive(Debug, Clone)]
pub struct AgentFactory {
    base_url: Url,
    request_timeout: Duration,
    initialize_timeout: Duration,
    user_agent: String,
}

impl AgentFactory {
    pub fn new(
        base_url: Url,
        request_timeout: Duration,
        initialize_timeout: Duration,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            base_url,
            request_timeout,
            initialize_timeout,
            user_agent: user_agent.into(),
        }
    }

    pub fn from_config(config: &BenchConfig) -> Result<Self, HttpError> {
        let base_url = config
            .target
            .base_url()
            .map_err(|e| HttpError::InvalidUrl(e.to_string()))?;
        Ok(Self::new(
            base_url,
            config.http.request_timeout,
            config.http.initialize_timeout,
            config.http.user_agent.clone(),
        ))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Create a fresh agent with its own connection pool and cookie jar
    pub fn new_agent(&self, kind: AgentKind) -> Result<Agent, HttpError> {
        let timeout = match kind {
            AgentKind::Default => self.request_timeout,
            AgentKind::Initialize => self.initialize_timeout,
        };

        debug!("Creating {:?} agent for {} with {:?} timeout", kind, self.base_url, timeout);

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(&self.user_agent)
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Agent {
            client,
            base_url: self.base_url.clone(),
        })
    }
}

/// One simulated client session
#[derive(Debug, Clone)]
pub struct Agent {
    client: Client,
    base_url: Url,
}

impl Agent {
    pub(crate) fn request(&self, method: HttpMethod, path: &str) -> Result<RequestBuilder, HttpError> {
        let url = self.base_url.join(path.trim_start_matches('/'))?;
        Ok(self.client.request(method.into(), url))
    }

    /// Send a request and read the whole body, giving up as soon as the run is cancelled
    pub(crate) async fn send(
        &self,
        cancel: &CancellationToken,
        method: HttpMethod,
        path: &str,
        builder: RequestBuilder,
    ) -> Result<Captured, HttpError> {
        let exchange = async {
            let response = builder.send().await?;
            let status = response.status().as_u16();
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body = response.bytes().await?.to_vec();

            debug!("{} {} -> {} ({} bytes)", method, path, status, body.len());

            Ok(Captured {
                method,
                path: path.to_string(),
                status,
                content_type,
                body,
            })
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(HttpError::Canceled),
            result = exchange => result,
        }
    }
}

/// A fully read response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captured {
    pub method: HttpMethod,
    pub path: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Captured {
    /// `METHOD /path`, used to prefix validation messages
    pub fn endpoint(&self) -> String {
        format!("{} {}", self.method, self.path)
    }

    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false)
    }

    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}
