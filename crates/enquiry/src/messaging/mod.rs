//! Relayed "SMS" messaging.
//!
//! The messenger holds the message box state (body and recipient), validates
//! it, and hands a [`RelayRequest`] to a [`Relay`]. Sending is two-phase:
//!
//! 1. [`Messenger::prepare`] validates and builds the request.
//! 2. The relay is awaited.
//! 3. [`Messenger::complete`] applies the outcome exactly once.
//!
//! [`Messenger::send`] runs all three. On failure the body and recipient are
//! kept so the user can retry; nothing is retried automatically.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use enquiry::messaging::{LogRelay, Messenger};
//! use enquiry::notify::TracingNotifier;
//! use enquiry::Entry;
//!
//! let rt = tokio::runtime::Builder::new_current_thread()
//!     .enable_all()
//!     .build()
//!     .unwrap();
//! rt.block_on(async {
//!     let mut messenger = Messenger::new(Arc::new(TracingNotifier), None);
//!     messenger.set_message_body("hello");
//!     messenger.set_recipient_address("a@b.co");
//!     messenger.send(&Entry::default(), &LogRelay).await.unwrap();
//!     assert_eq!(messenger.history().len(), 1);
//! });
//! ```

mod address;
mod relay;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

pub use address::is_valid_address;
pub use relay::{
    dispatch_with_timeout, relay_from_config, EmailJsRelay, LogRelay, Relay, RelayRequest,
};

use crate::entry::Entry;
use crate::error::{Result, ValidationError};
use crate::notify::{Notification, Notifier};

const MSG_EMPTY: &str = "Please type a message to send.";
const TITLE_EMPTY: &str = "SMS Incomplete";
const MSG_BAD_ADDRESS: &str = "Please enter a valid email address.";
const MSG_SENT: &str = "SMS Sent Successfully";
const MSG_FAILED: &str = "Failed to send SMS";

/// A message that the relay accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentMessage {
    /// Message text as sent.
    pub body: String,
    /// Recipient it was sent to.
    pub recipient: String,
    /// When the relay confirmed delivery.
    pub sent_at: DateTime<Utc>,
}

/// Message box state and send history.
pub struct Messenger {
    message_body: String,
    recipient_address: String,
    history: Vec<SentMessage>,
    timeout: Option<Duration>,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for Messenger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Messenger")
            .field("message_body", &self.message_body)
            .field("recipient_address", &self.recipient_address)
            .field("history", &self.history)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Messenger {
    /// Create a messenger. `timeout` bounds each relay call; `None` waits
    /// for as long as the relay takes.
    #[must_use]
    pub fn new(notifier: Arc<dyn Notifier>, timeout: Option<Duration>) -> Self {
        Self {
            message_body: String::new(),
            recipient_address: String::new(),
            history: Vec::new(),
            timeout,
            notifier,
        }
    }

    /// Current message text.
    #[must_use]
    pub fn message_body(&self) -> &str {
        &self.message_body
    }

    /// Current recipient address.
    #[must_use]
    pub fn recipient_address(&self) -> &str {
        &self.recipient_address
    }

    /// Messages sent so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &[SentMessage] {
        &self.history
    }

    /// Replace the message text.
    pub fn set_message_body(&mut self, text: impl Into<String>) {
        self.message_body = text.into();
    }

    /// Replace the recipient address.
    pub fn set_recipient_address(&mut self, text: impl Into<String>) {
        self.recipient_address = text.into();
    }

    /// Validate the message box and build a relay request.
    ///
    /// Sender name and email come from `sender`, normally the form draft.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyMessage`] if the body is blank, or
    /// [`ValidationError::InvalidAddress`] if the recipient is malformed.
    /// Each failure emits one notification.
    pub fn prepare(&self, sender: &Entry) -> Result<RelayRequest> {
        if self.message_body.trim().is_empty() {
            self.refuse(ValidationError::EmptyMessage);
            return Err(ValidationError::EmptyMessage.into());
        }
        if !is_valid_address(&self.recipient_address) {
            self.refuse(ValidationError::InvalidAddress);
            return Err(ValidationError::InvalidAddress.into());
        }

        Ok(RelayRequest {
            sender_name: sender.username.clone(),
            recipient_address: self.recipient_address.clone(),
            message_body: self.message_body.clone(),
            sender_email: sender.email.clone(),
        })
    }

    /// Apply the outcome of dispatching `request`.
    ///
    /// On success the body is recorded in the history and the message box is
    /// cleared. On failure the message box is left as it was.
    ///
    /// # Errors
    ///
    /// Passes the relay error back to the caller after reporting it.
    pub fn complete(&mut self, request: RelayRequest, outcome: Result<()>) -> Result<()> {
        match outcome {
            Ok(()) => {
                info!(to = %request.recipient_address, "Message sent");
                self.history.push(SentMessage {
                    body: request.message_body,
                    recipient: request.recipient_address,
                    sent_at: Utc::now(),
                });
                self.message_body.clear();
                self.recipient_address.clear();
                self.notifier.notify(Notification::success(MSG_SENT));
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, to = %request.recipient_address, "Message dispatch failed");
                self.notifier.notify(Notification::error(MSG_FAILED));
                Err(err)
            }
        }
    }

    /// Validate, dispatch through `relay`, and apply the outcome.
    ///
    /// # Errors
    ///
    /// Returns a validation error (relay not called) or the relay's error.
    pub async fn send(&mut self, sender: &Entry, relay: &dyn Relay) -> Result<()> {
        let request = self.prepare(sender)?;
        debug!(relay = relay.name(), "Dispatching message");
        let outcome = dispatch_with_timeout(relay, &request, self.timeout).await;
        self.complete(request, outcome)
    }

    fn refuse(&self, reason: ValidationError) {
        debug!(%reason, "Send refused");
        let notification = match reason {
            ValidationError::EmptyMessage => {
                Notification::new(reason.severity(), MSG_EMPTY).with_title(TITLE_EMPTY)
            }
            ValidationError::InvalidAddress => Notification::new(reason.severity(), MSG_BAD_ADDRESS),
            ValidationError::IncompleteForm => return,
        };
        self.notifier.notify(notification);
    }
}
