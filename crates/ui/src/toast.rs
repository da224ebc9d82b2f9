//! Toast notification dispatch
//!
//! One fixed display configuration is applied uniformly to every
//! notification; only the message and severity vary per call. The
//! dispatcher pushes [`Toast`]s onto an unbounded channel for whatever
//! rendering surface consumes them.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Outcome severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Error,
    /// Neutral information.
    Info,
    /// Something needs attention but did not fail.
    Warning,
}

/// Screen position toasts appear at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastPosition {
    /// Upper-right corner.
    #[default]
    TopRight,
    /// Upper-left corner.
    TopLeft,
    /// Lower-right corner.
    BottomRight,
    /// Lower-left corner.
    BottomLeft,
}

/// Fixed, process-wide display options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastConfig {
    /// Where toasts appear.
    pub position: ToastPosition,
    /// Delay before auto-dismissal.
    pub auto_dismiss: Duration,
    /// Whether clicking a toast dismisses it.
    pub close_on_click: bool,
    /// Whether hovering pauses the dismissal timer.
    pub pause_on_hover: bool,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            position: ToastPosition::TopRight,
            auto_dismiss: Duration::from_secs(3),
            close_on_click: true,
            pause_on_hover: true,
        }
    }
}

/// One notification ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Outcome severity.
    pub severity: Severity,
    /// The message shown to the user.
    pub message: String,
    /// The shared display configuration.
    pub config: ToastConfig,
}

/// Dispatches severity-tagged notifications with one shared configuration.
#[derive(Debug, Clone)]
pub struct ToastDispatcher {
    config: ToastConfig,
    tx: mpsc::UnboundedSender<Toast>,
}

impl ToastDispatcher {
    /// Creates a dispatcher and the receiving end for the display surface.
    #[must_use]
    pub fn channel(config: ToastConfig) -> (Self, mpsc::UnboundedReceiver<Toast>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { config, tx }, rx)
    }

    /// The shared display configuration.
    #[must_use]
    pub const fn config(&self) -> ToastConfig {
        self.config
    }

    /// Dispatches a success toast.
    pub fn success(&self, message: impl Into<String>) {
        self.dispatch(Severity::Success, message.into());
    }

    /// Dispatches an error toast.
    pub fn error(&self, message: impl Into<String>) {
        self.dispatch(Severity::Error, message.into());
    }

    /// Dispatches an info toast.
    pub fn info(&self, message: impl Into<String>) {
        self.dispatch(Severity::Info, message.into());
    }

    /// Dispatches a warning toast.
    pub fn warning(&self, message: impl Into<String>) {
        self.dispatch(Severity::Warning, message.into());
    }

    fn dispatch(&self, severity: Severity, message: String) {
        // Display surface may be gone; dropping the toast is fine then.
        let _ = self.tx.send(Toast {
            severity,
            message,
            config: self.config,
        });
    }
}
