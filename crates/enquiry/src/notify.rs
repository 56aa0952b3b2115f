//! Transient user notifications.
//!
//! Every state-changing action reports its outcome as a [`Notification`]
//! pushed into a [`Notifier`]. Notifiers are fire-and-forget: nothing is
//! acknowledged and delivery failures are ignored.

use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// The action completed.
    Success,
    /// The action was refused; the user can fix the input and retry.
    Warning,
    /// The action failed.
    Error,
    /// Informational.
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// A single user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Presentation severity.
    pub severity: Severity,
    /// Message body.
    pub message: String,
    /// Optional heading shown above the message.
    pub title: Option<String>,
}

impl Notification {
    /// Create a notification without a title.
    #[must_use]
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            title: None,
        }
    }

    /// Attach a title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Shorthand for a success notification.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    /// Shorthand for a warning notification.
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Shorthand for an error notification.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Shorthand for an info notification.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.title {
            Some(title) => write!(f, "[{}] {title}: {}", self.severity, self.message),
            None => write!(f, "[{}] {}", self.severity, self.message),
        }
    }
}

/// Sink for user notifications.
pub trait Notifier: Send + Sync {
    /// Deliver a notification. Must not block and must not fail.
    fn notify(&self, notification: Notification);
}

/// Notifier that forwards into an unbounded channel.
///
/// The receiving half belongs to whatever renders notifications.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiver its notifications arrive on.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        // Renderer gone: nothing left to show it to
        let _ = self.tx.send(notification);
    }
}

/// Notifier that writes each notification to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        let title = notification.title.as_deref().unwrap_or("");
        match notification.severity {
            Severity::Success | Severity::Info => {
                info!(severity = %notification.severity, title, "{}", notification.message);
            }
            Severity::Warning => warn!(title, "{}", notification.message),
            Severity::Error => error!(title, "{}", notification.message),
        }
    }
}

/// Drain everything currently queued on a notification receiver.
pub fn drain(rx: &mut mpsc::UnboundedReceiver<Notification>) -> Vec<Notification> {
    let mut out = Vec::new();
    while let Ok(n) = rx.try_recv() {
        out.push(n);
    }
    out
}
