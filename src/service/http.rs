//! HTTP implementation of the access service.

use std::time::Duration;

use reqwest::blocking::Client;

use super::{AccessService, Action, ServiceError};

/// Access service reached over HTTP(S) form POSTs.
#[derive(Debug, Clone)]
pub struct HttpAccessService {
    client: Client,
    endpoint: String,
}

impl HttpAccessService {
    /// Create a client for `endpoint`.
    ///
    /// With `timeout` unset the HTTP client's default applies.
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ServiceError> {
        let mut builder = Client::builder().user_agent(concat!("gatepass/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ServiceError::Client(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// The URL requests are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl AccessService for HttpAccessService {
    fn submit(&self, action: Action, fields: &[(&str, &str)]) -> Result<String, ServiceError> {
        let mut form = Vec::with_capacity(fields.len() + 1);
        form.push(("action", action.as_str()));
        form.extend_from_slice(fields);

        // Field values include passwords; only names are logged.
        log::debug!(
            "POST {} action={} fields={:?}",
            self.endpoint,
            action,
            fields.iter().map(|(k, _)| *k).collect::<Vec<_>>()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .form(&form)
            .send()
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("Access service answered {} for action={}", status, action);
            return Err(ServiceError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        log::debug!("Access service response for action={}: {:?}", action, body);
        Ok(body)
    }
}
