//! The network boundary.
//!
//! A transport sends one [`ApiRequest`] and hands back the raw status and
//! body. It must not interpret the status: 4xx/5xx are returned as data and
//! only connection-level failures become [`Error::Network`].

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::http::{ApiRequest, HttpMethod, RawResponse};

/// Async transport. Suspends only while awaiting the server.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse>;
}

/// Blocking transport. Blocks the calling thread for the round-trip.
pub trait BlockingTransport: Send + Sync + std::fmt::Debug {
    fn send(&self, request: ApiRequest) -> Result<RawResponse>;
}

/// reqwest-backed async transport with a per-request timeout.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(http: reqwest::Client, timeout: Duration) -> Self {
        Self { http, timeout }
    }

    pub(crate) fn build(user_agent: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self::new(http, timeout))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse> {
        let builder = match request.method {
            HttpMethod::Get => self.http.get(&request.url),
            HttpMethod::Post => self.http.post(&request.url),
        };

        let response = builder
            .json(&request.body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| network_error(&request, e))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| network_error(&request, e))?;

        Ok(RawResponse::new(status, body.to_vec()))
    }
}

/// reqwest-backed blocking transport.
#[cfg(feature = "blocking")]
#[derive(Debug, Clone)]
pub struct BlockingReqwestTransport {
    http: reqwest::blocking::Client,
    timeout: Duration,
}

#[cfg(feature = "blocking")]
impl BlockingReqwestTransport {
    pub fn new(http: reqwest::blocking::Client, timeout: Duration) -> Self {
        Self { http, timeout }
    }

    pub(crate) fn build(user_agent: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .build()?;
        Ok(Self::new(http, timeout))
    }
}

#[cfg(feature = "blocking")]
impl BlockingTransport for BlockingReqwestTransport {
    fn send(&self, request: ApiRequest) -> Result<RawResponse> {
        let builder = match request.method {
            HttpMethod::Get => self.http.get(&request.url),
            HttpMethod::Post => self.http.post(&request.url),
        };

        let response = builder
            .json(&request.body)
            .timeout(self.timeout)
            .send()
            .map_err(|e| network_error(&request, e))?;

        let status = response.status().as_u16();
        let body = response.bytes().map_err(|e| network_error(&request, e))?;

        Ok(RawResponse::new(status, body.to_vec()))
    }
}

fn network_error(request: &ApiRequest, e: reqwest::Error) -> Error {
    tracing::warn!(endpoint = %request.endpoint, error = %e, "Transport failure");
    Error::Network(e.to_string())
}
