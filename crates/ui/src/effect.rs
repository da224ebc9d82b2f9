//! Deep-comparison effect guard

/// Runs a callback whenever its dependencies change structurally.
///
/// The guard keeps the last-seen dependency snapshot and compares the next
/// one against it with `PartialEq`, so equality is structural rather than
/// identity-based.
/// The very first evaluation always fires since there is no prior
/// snapshot.
#[derive(Debug, Default)]
pub struct DeepEffect<T> {
    last: Option<T>,
}

impl<T: PartialEq + Clone> DeepEffect<T> {
    /// Creates a guard with no snapshot; the next `run` fires.
    #[must_use]
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Fires `callback` if `deps` differs from the stored snapshot.
    ///
    /// Returns whether the callback ran.
    pub fn run(&mut self, deps: &T, callback: impl FnOnce()) -> bool {
        if self.last.as_ref() == Some(deps) {
            return false;
        }
        self.last = Some(deps.clone());
        callback();
        true
    }
}
