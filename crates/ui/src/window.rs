//! Window size tracking

use tokio::sync::watch;

/// Publishes new size samples as resize events arrive.
#[derive(Debug, Clone)]
pub struct SizePublisher {
    tx: watch::Sender<(u32, u32)>,
}

impl SizePublisher {
    /// Publishes a new `[width, height]` sample.
    pub fn resize(&self, width: u32, height: u32) {
        // Receivers may all be gone; publishing is then a no-op.
        let _ = self.tx.send((width, height));
    }
}

/// Tracks the latest window dimensions.
///
/// Holds only the current sample; no history is retained. Dropping the
/// tracker unsubscribes from further events.
#[derive(Debug, Clone)]
pub struct WindowSize {
    rx: watch::Receiver<(u32, u32)>,
}

impl WindowSize {
    /// The most recent `[width, height]` sample.
    #[must_use]
    pub fn current(&self) -> (u32, u32) {
        *self.rx.borrow()
    }

    /// Waits until the size changes, returning the new sample.
    ///
    /// # Errors
    ///
    /// Returns an error when the publisher has been dropped.
    pub async fn changed(&mut self) -> Result<(u32, u32), watch::error::RecvError> {
        self.rx.changed().await?;
        Ok(*self.rx.borrow())
    }
}

/// Creates a publisher/tracker pair seeded with the current dimensions.
///
/// The tracker observes `initial` immediately (never a zero placeholder)
/// and every later sample published through the returned publisher.
#[must_use]
pub fn window_size(initial: (u32, u32)) -> (SizePublisher, WindowSize) {
    let (tx, rx) = watch::channel(initial);
    (SizePublisher { tx }, WindowSize { rx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_initial_sample_is_available_immediately() {
        let (_publisher, tracker) = window_size((1280, 720));
        assert_eq!(tracker.current(), (1280, 720));
    }

    #[test]
    fn test_resize_updates_current_sample() {
        let (publisher, tracker) = window_size((800, 600));
        publisher.resize(1024, 768);
        assert_eq!(tracker.current(), (1024, 768));
    }

    #[test]
    fn test_only_latest_sample_is_retained() {
        let (publisher, tracker) = window_size((1, 1));
        publisher.resize(2, 2);
        publisher.resize(3, 3);
        assert_eq!(tracker.current(), (3, 3));
    }

    #[tokio::test]
    async fn test_changed_resolves_with_new_sample() {
        let (publisher, mut tracker) = window_size((640, 480));

        let waiter = tokio::spawn(async move { tracker.changed().await });
        publisher.resize(1920, 1080);

        let sample = waiter.await.expect("join").expect("publisher alive");
        assert_eq!(sample, (1920, 1080));
    }

    #[test]
    fn test_publish_after_all_trackers_dropped_is_noop() {
        let (publisher, tracker) = window_size((10, 10));
        drop(tracker);
        publisher.resize(20, 20);
    }
}
