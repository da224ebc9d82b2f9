//! Document title lifecycle guard

use std::sync::Arc;

/// Surface owning a mutable title (a document, a terminal, a window).
pub trait TitleHost: Send + Sync {
    /// The current title.
    fn title(&self) -> String;
    /// Replaces the title.
    fn set_title(&self, title: &str);
}

/// Sets a title on creation and restores the previous one on drop.
///
/// The guard records whatever title the host held at creation time, so
/// nested guards unwind correctly in reverse order.
pub struct TitleGuard {
    host: Arc<dyn TitleHost>,
    previous: String,
}

impl std::fmt::Debug for TitleGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TitleGuard")
            .field("previous", &self.previous)
            .finish()
    }
}

impl TitleGuard {
    /// Records the host's current title and sets `title`.
    #[must_use]
    pub fn set(host: Arc<dyn TitleHost>, title: &str) -> Self {
        let previous = host.title();
        host.set_title(title);
        Self { host, previous }
    }

    /// The title that will be restored on drop.
    #[must_use]
    pub fn previous(&self) -> &str {
        &self.previous
    }
}

impl Drop for TitleGuard {
    fn drop(&mut self) {
        self.host.set_title(&self.previous);
    }
}
