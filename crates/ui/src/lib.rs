//! Trellis UI - reusable view-state utilities
//!
//! Six independent helpers, each encapsulating one piece of view-layer
//! behavior: change-driven effects (deep comparison and skip-first), a
//! title lifecycle guard, a window-size tracker, a toast dispatcher, and
//! an error-message classifier for facade errors. None hold cross-instance
//! state; creation is "mount" and `Drop` is "unmount".

pub mod effect;
pub mod error_message;
pub mod skip_first;
pub mod title;
pub mod toast;
pub mod window;

pub use effect::DeepEffect;
pub use error_message::{notify_error, user_message, GENERIC_ERROR_MESSAGE};
pub use skip_first::{Cleanup, SkipFirstEffect};
pub use title::{TitleGuard, TitleHost};
pub use toast::{Severity, Toast, ToastConfig, ToastDispatcher, ToastPosition};
pub use window::{window_size, SizePublisher, WindowSize};
