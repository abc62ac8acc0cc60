//! HTTP delivery provider adapter.
//!
//! One provider instance serves one medium (push, email); the external
//! service routes to the actual device or mailbox by wallet address.

use reqwest::StatusCode;
use serde::Serialize;

use crate::error::DeliveryError;
use crate::port::{ChannelKind, DeliveryChannel, DeliveryRequest, Priority};

#[derive(Serialize)]
struct DeliveryBody<'a> {
    channel: &'static str,
    recipient: &'a str,
    title: &'a str,
    body: &'a str,
    actions: Vec<ActionBody<'a>>,
    /// Expedited hint for high-priority messages.
    expedited: bool,
}

#[derive(Serialize)]
struct ActionBody<'a> {
    label: &'a str,
    url: &'a str,
}

/// Delivers notifications through the external multi-channel provider API.
pub struct HttpDeliveryProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    kind: ChannelKind,
}

impl HttpDeliveryProvider {
    pub fn new(base_url: &str, api_key: Option<String>, kind: ChannelKind) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/deliveries", base_url.trim_end_matches('/')),
            api_key,
            kind,
        }
    }
}

#[async_trait::async_trait]
impl DeliveryChannel for HttpDeliveryProvider {
    fn kind(&self) -> ChannelKind {
        self.kind
    }

    async fn deliver(&self, request: &DeliveryRequest) -> Result<(), DeliveryError> {
        let body = DeliveryBody {
            channel: self.kind.as_str(),
            recipient: request.recipient.as_str(),
            title: &request.title,
            body: &request.body,
            actions: request
                .actions
                .iter()
                .map(|a| ActionBody {
                    label: &a.label,
                    url: &a.url,
                })
                .collect(),
            expedited: request.priority == Priority::High,
        };

        let mut builder = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| DeliveryError::Unavailable {
            channel: self.kind.as_str().to_string(),
            reason: e.to_string(),
        })?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE => {
                Err(DeliveryError::Unavailable {
                    channel: self.kind.as_str().to_string(),
                    reason: format!("provider returned {}", response.status()),
                })
            }
            status => Err(DeliveryError::Rejected {
                channel: self.kind.as_str().to_string(),
                reason: format!("provider returned {status}"),
            }),
        }
    }
}
