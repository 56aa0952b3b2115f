//! Outbound message relays.
//!
//! A [`Relay`] delivers one [`RelayRequest`] and reports success or failure.
//! The messenger never knows which provider sits behind it.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::{RelayConfig, RelayKind};
use crate::error::{Error, Result};

/// Everything a relay needs to deliver one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayRequest {
    /// Display name of the sender, taken from the form draft.
    pub sender_name: String,
    /// Where the message goes.
    pub recipient_address: String,
    /// Message text.
    pub message_body: String,
    /// Sender's email, taken from the form draft. Never format-checked.
    pub sender_email: String,
}

/// A provider that can deliver messages.
#[async_trait::async_trait]
pub trait Relay: Send + Sync {
    /// Short provider name for logging.
    fn name(&self) -> &'static str;

    /// Deliver the message.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider rejects the message or cannot be
    /// reached.
    async fn dispatch(&self, request: &RelayRequest) -> Result<()>;
}

/// Relay that only logs. Always succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogRelay;

#[async_trait::async_trait]
impl Relay for LogRelay {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn dispatch(&self, request: &RelayRequest) -> Result<()> {
        info!(
            from = %request.sender_name,
            to = %request.recipient_address,
            bytes = request.message_body.len(),
            "Message relayed to log"
        );
        Ok(())
    }
}

/// Template parameters understood by the EmailJS template.
#[derive(Debug, Serialize)]
struct TemplateParams<'a> {
    from_name: &'a str,
    to_email: &'a str,
    message: &'a str,
    user_email: &'a str,
}

#[derive(Debug, Serialize)]
struct SendPayload<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: TemplateParams<'a>,
}

/// Relay backed by the EmailJS REST API.
#[derive(Debug, Clone)]
pub struct EmailJsRelay {
    client: reqwest::Client,
    endpoint: String,
    service_id: String,
    template_id: String,
    user_id: String,
}

impl EmailJsRelay {
    /// Create a relay posting to `endpoint` with the given account ids.
    #[must_use]
    pub fn new(
        endpoint: impl Into<String>,
        service_id: impl Into<String>,
        template_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            service_id: service_id.into(),
            template_id: template_id.into(),
            user_id: user_id.into(),
        }
    }

    /// Use `client` for requests instead of a default one.
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn payload<'a>(&'a self, request: &'a RelayRequest) -> SendPayload<'a> {
        SendPayload {
            service_id: &self.service_id,
            template_id: &self.template_id,
            user_id: &self.user_id,
            template_params: TemplateParams {
                from_name: &request.sender_name,
                to_email: &request.recipient_address,
                message: &request.message_body,
                user_email: &request.sender_email,
            },
        }
    }
}

#[async_trait::async_trait]
impl Relay for EmailJsRelay {
    fn name(&self) -> &'static str {
        "emailjs"
    }

    async fn dispatch(&self, request: &RelayRequest) -> Result<()> {
        debug!(endpoint = %self.endpoint, "Posting message to EmailJS");
        let response = self
            .client
            .post(&self.endpoint)
            .json(&self.payload(request))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(Error::relay(format!("{status}: {}", body.trim())))
    }
}

/// Build the relay selected by configuration.
#[must_use]
pub fn relay_from_config(config: &RelayConfig) -> Box<dyn Relay> {
    match config.kind {
        RelayKind::Log => Box::new(LogRelay),
        RelayKind::EmailJs => Box::new(EmailJsRelay::new(
            config.endpoint.clone(),
            config.service_id.clone(),
            config.template_id.clone(),
            config.user_id.clone(),
        )),
    }
}

/// Dispatch with an optional upper bound on how long to wait.
///
/// # Errors
///
/// Returns the relay's own error, or [`Error::Timeout`] if `limit` elapses
/// first.
pub async fn dispatch_with_timeout(
    relay: &dyn Relay,
    request: &RelayRequest,
    limit: Option<Duration>,
) -> Result<()> {
    match limit {
        None => relay.dispatch(request).await,
        Some(limit) => tokio::time::timeout(limit, relay.dispatch(request))
            .await
            .map_err(|_| Error::timeout(format!("{} relay dispatch", relay.name())))?,
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{RecordingRelay, StalledRelay};
    use super::*;

    fn request() -> RelayRequest {
        RelayRequest {
            sender_name: "Ann".to_string(),
            recipient_address: "a@b.co".to_string(),
            message_body: "hello".to_string(),
            sender_email: "ann@x.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_log_relay_succeeds() {
        assert!(LogRelay.dispatch(&request()).await.is_ok());
        assert_eq!(LogRelay.name(), "log");
    }

    #[test]
    fn test_emailjs_payload_shape() {
        let relay = EmailJsRelay::new("http://localhost/send", "svc", "tpl", "usr");
        let req = request();
        let json = serde_json::to_value(relay.payload(&req)).unwrap();

        assert_eq!(json["service_id"], "svc");
        assert_eq!(json["template_id"], "tpl");
        assert_eq!(json["user_id"], "usr");
        assert_eq!(json["template_params"]["from_name"], "Ann");
        assert_eq!(json["template_params"]["to_email"], "a@b.co");
        assert_eq!(json["template_params"]["message"], "hello");
        assert_eq!(json["template_params"]["user_email"], "ann@x.com");
    }

    #[tokio::test]
    async fn test_emailjs_unreachable_endpoint_is_error() {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        let relay = EmailJsRelay::new("http://127.0.0.1:9/send", "svc", "tpl", "usr")
            .with_client(client);
        let err = relay.dispatch(&request()).await.unwrap_err();
        assert!(err.is_relay_error());
    }

    #[test]
    fn test_relay_from_config() {
        let mut config = RelayConfig::default();
        assert_eq!(relay_from_config(&config).name(), "log");

        config.kind = RelayKind::EmailJs;
        assert_eq!(relay_from_config(&config).name(), "emailjs");
    }

    #[tokio::test]
    async fn test_recording_relay_records() {
        let relay = RecordingRelay::failing("boom");
        let err = relay.dispatch(&request()).await.unwrap_err();
        assert_eq!(err.to_string(), "relay failed: boom");
        assert_eq!(relay.calls(), vec![request()]);
    }

    #[tokio::test]
    async fn test_dispatch_without_limit_passes_through() {
        let relay = RecordingRelay::succeeding();
        dispatch_with_timeout(&relay, &request(), None).await.unwrap();
        assert_eq!(relay.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispatch_times_out() {
        let err = dispatch_with_timeout(&StalledRelay, &request(), Some(Duration::from_secs(5)))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout { .. }));
        assert!(err.to_string().contains("stalled"));
    }
}
