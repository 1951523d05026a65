//! Request templates
//!
//! A [`RequestTemplate`] assembles one well-formed request from typed call
//! parameters: path template with `{token}` substitution, query
//! parameters, an optional JSON body, and the JSON accept header. The
//! `api-version` pair and the configured API-key header are attached at
//! build time so every operation carries them uniformly.

use std::fmt;

use reqwest::header::{HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;
use tessera_domain::{IamError, Result};

use crate::config::IamClientConfig;

/// Builder for one outgoing request.
#[derive(Debug, Clone)]
pub struct RequestTemplate {
    method: Method,
    path: String,
    query: Vec<(&'static str, String)>,
    body: Option<Vec<u8>>,
}

impl RequestTemplate {
    /// GET template for the given path.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// POST template for the given path.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), query: Vec::new(), body: None }
    }

    /// Replace a `{token}` placeholder in the path.
    ///
    /// Literal, case-sensitive string replacement; substitutions are
    /// independent of the order they are applied in.
    pub fn replace_token(mut self, token: &str, value: impl fmt::Display) -> Self {
        self.path = self.path.replace(token, &value.to_string());
        self
    }

    /// Append a query parameter; `None` and blank values are omitted
    /// entirely rather than sent as empty strings.
    pub fn query_param(mut self, key: &'static str, value: Option<&str>) -> Self {
        if let Some(value) = value {
            if !value.trim().is_empty() {
                self.query.push((key, value.to_string()));
            }
        }
        self
    }

    /// Attach a JSON body.
    pub fn json_body<T: Serialize>(mut self, body: &T) -> Result<Self> {
        let bytes = serde_json::to_vec(body)
            .map_err(|err| IamError::InvalidArgument(format!("unserializable body: {err}")))?;
        self.body = Some(bytes);
        Ok(self)
    }

    /// Produce the request against the configured endpoint.
    ///
    /// The resulting URL is not validated here; anything malformed that
    /// survives URL joining fails in the transport, not in the template.
    pub fn build(self, config: &IamClientConfig) -> Result<reqwest::Request> {
        let mut url = config
            .base_url
            .join(&self.path)
            .map_err(|err| IamError::Transport(format!("invalid request URL: {err}")))?;

        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query {
                pairs.append_pair(key, value);
            }
            pairs.append_pair("api-version", &config.api_version);
        }

        let mut request = reqwest::Request::new(self.method, url);
        request.headers_mut().insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(api_key) = &config.api_key {
            let name = HeaderName::from_bytes(config.api_key_header.as_bytes()).map_err(|_| {
                IamError::InvalidArgument(format!(
                    "invalid API key header name: {}",
                    config.api_key_header
                ))
            })?;
            let value = HeaderValue::from_str(api_key)
                .map_err(|_| IamError::InvalidArgument("invalid API key value".to_string()))?;
            request.headers_mut().insert(name, value);
        }

        if let Some(bytes) = self.body {
            request
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            *request.body_mut() = Some(bytes.into());
        }

        Ok(request)
    }
}
