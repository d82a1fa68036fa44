use alloc::sync::Arc;
use core::fmt;
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

// -----------------------------------------------------------------------------
// StopToken

const NO_STATE: usize = usize::MAX;

struct StopState {
    requested: AtomicBool,
    resume_at: AtomicUsize,
}

/// Cooperative stop signal for bulk operations.
///
/// A token is shared (by cloning) between the caller of a bulk operation and
/// the collaborator driving it. When the collaborator raises the signal, the
/// bulk operation finishes the current entry, records the position of the
/// next one and returns `Ok(())`. Calling the operation again after
/// [`resume`](Self::resume) continues at the recorded position.
///
/// [`StopToken::none`] cannot be stopped and carries no state.
///
/// A token belongs to one bulk operation on one target. The recorded position
/// stays in the token until that operation is called again, so a token
/// shared between targets resumes the second one at the first one's offset.
///
/// # Examples
///
/// ```
/// use vc_access::StopToken;
///
/// let token = StopToken::new();
/// let signal = token.clone();
///
/// signal.request();
/// assert!(token.is_requested());
///
/// token.resume();
/// assert!(!token.is_requested());
/// ```
#[derive(Clone, Default)]
pub struct StopToken(Option<Arc<StopState>>);

impl StopToken {
    /// A token that is never raised.
    #[inline]
    pub const fn none() -> Self {
        Self(None)
    }

    /// A token that can be raised through any of its clones.
    pub fn new() -> Self {
        Self(Some(Arc::new(StopState {
            requested: AtomicBool::new(false),
            resume_at: AtomicUsize::new(NO_STATE),
        })))
    }

    #[inline]
    pub fn can_be_stopped(&self) -> bool {
        self.0.is_some()
    }

    /// Raises the signal. Does nothing on [`StopToken::none`].
    pub fn request(&self) {
        if let Some(state) = &self.0 {
            state.requested.store(true, Ordering::Release);
        }
    }

    #[inline]
    pub fn is_requested(&self) -> bool {
        self.0
            .as_ref()
            .is_some_and(|state| state.requested.load(Ordering::Acquire))
    }

    /// Lowers the signal, keeping the saved position.
    pub fn resume(&self) {
        if let Some(state) = &self.0 {
            state.requested.store(false, Ordering::Release);
        }
    }

    /// The position a stopped operation will continue from.
    pub fn saved(&self) -> Option<usize> {
        let state = self.0.as_ref()?;
        match state.resume_at.load(Ordering::Acquire) {
            NO_STATE => None,
            at => Some(at),
        }
    }

    /// Records the next position to process.
    pub fn save(&self, next: usize) {
        if let Some(state) = &self.0 {
            state.resume_at.store(next, Ordering::Release);
        }
    }

    /// Takes the saved position, leaving none behind.
    pub fn take_saved(&self) -> Option<usize> {
        let state = self.0.as_ref()?;
        match state.resume_at.swap(NO_STATE, Ordering::AcqRel) {
            NO_STATE => None,
            at => Some(at),
        }
    }

    /// Checks the signal after the entry at `position` was processed.
    ///
    /// Returns `true` and saves `position + 1` when the operation must stop.
    #[inline]
    pub fn checkpoint(&self, position: usize) -> bool {
        if self.is_requested() {
            self.save(position + 1);
            true
        } else {
            false
        }
    }
}

impl fmt::Debug for StopToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StopToken")
            .field("can_be_stopped", &self.can_be_stopped())
            .field("requested", &self.is_requested())
            .field("saved", &self.saved())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
