//! Skip-first effect guard

/// Cleanup closure returned by an effect, run before the effect re-fires
/// and when the guard is dropped.
pub type Cleanup = Box<dyn FnOnce() + Send>;

/// Runs an effect on every dependency change except the first evaluation.
///
/// The first call after creation only records the snapshot; the mount
/// evaluation is deliberately skipped. Later calls fire when the
/// dependencies changed, running the cleanup returned by the previous
/// invocation first.
#[derive(Default)]
pub struct SkipFirstEffect<T> {
    last: Option<T>,
    cleanup: Option<Cleanup>,
}

impl<T> std::fmt::Debug for SkipFirstEffect<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkipFirstEffect")
            .field("primed", &self.last.is_some())
            .field("has_cleanup", &self.cleanup.is_some())
            .finish()
    }
}

impl<T: PartialEq + Clone> SkipFirstEffect<T> {
    /// Creates a guard whose next evaluation is the skipped first one.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last: None,
            cleanup: None,
        }
    }

    /// Evaluates the guard against `deps`, firing `effect` on changes
    /// after the first evaluation.
    ///
    /// Returns whether the effect ran.
    pub fn run<F>(&mut self, deps: &T, effect: F) -> bool
    where
        F: FnOnce() -> Option<Cleanup>,
    {
        match &self.last {
            None => {
                self.last = Some(deps.clone());
                false
            }
            Some(prev) if prev == deps => false,
            Some(_) => {
                self.last = Some(deps.clone());
                if let Some(cleanup) = self.cleanup.take() {
                    cleanup();
                }
                self.cleanup = effect();
                true
            }
        }
    }
}

impl<T> Drop for SkipFirstEffect<T> {
    fn drop(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_three_changes_fire_twice() {
        let mut effect = SkipFirstEffect::new();
        let mut fired = 0;

        // Mount evaluation, then two real changes.
        effect.run(&1, || {
            fired += 1;
            None
        });
        effect.run(&2, || {
            fired += 1;
            None
        });
        effect.run(&3, || {
            fired += 1;
            None
        });

        assert_eq!(fired, 2);
    }

    #[test]
    fn test_unchanged_deps_do_not_fire() {
        let mut effect = SkipFirstEffect::new();
        let mut fired = 0;

        effect.run(&"a", || {
            fired += 1;
            None
        });
        effect.run(&"a", || {
            fired += 1;
            None
        });

        assert_eq!(fired, 0);
    }

    #[test]
    fn test_previous_cleanup_runs_before_refire() {
        let cleaned = Arc::new(AtomicUsize::new(0));
        let mut effect = SkipFirstEffect::new();

        for deps in 1..=3 {
            let cleaned = Arc::clone(&cleaned);
            effect.run(&deps, move || {
                Some(Box::new(move || {
                    cleaned.fetch_add(1, Ordering::SeqCst);
                }) as Cleanup)
            });
        }

        // Fired on deps 2 and 3; the cleanup from deps 2 ran before 3.
        assert_eq!(cleaned.load(Ordering::SeqCst), 1);

        drop(effect);
        assert_eq!(cleaned.load(Ordering::SeqCst), 2);
    }
}
