//! User-facing error message extraction
//!
//! Classifies a failed facade call into a human-readable string: a
//! server-provided message wins, the error's own message is next, and a
//! fixed generic fallback covers everything else. Never panics, always
//! yields a non-empty string.

use trellis_client::ClientError;

/// Fallback shown when no specific message can be extracted.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Extracts the user-facing message for a facade error.
#[must_use]
pub fn user_message(err: &ClientError) -> String {
    classify(err.server_message(), &err.to_string())
}

/// Classifies the message by precedence: server message, own message,
/// generic fallback. Blank strings count as absent.
fn classify(server_message: Option<&str>, own_message: &str) -> String {
    if let Some(message) = server_message {
        let trimmed = message.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    let trimmed = own_message.trim();
    if trimmed.is_empty() {
        GENERIC_ERROR_MESSAGE.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Classifies `err` and hands the message to a display callback.
///
/// The callback is agnostic to the display mechanism; pairing it with a
/// toast dispatcher's `error` method is the usual wiring.
pub fn notify_error(err: &ClientError, display: impl FnOnce(&str)) {
    display(&user_message(err));
}
