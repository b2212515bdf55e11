//! Identity of a native thread.

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};

/// Opaque identifier of a native thread, or of no thread at all.
///
/// A default-constructed `ThreadId` is the *null identity*: it compares equal
/// only to other null identities and never names a running thread. Non-null
/// identities are produced by a successful spawn or by [`ThreadId::current`].
///
/// Once the owning [`Thread`](super::Thread) has been joined or detached the
/// native runtime may hand the same raw value to a new thread, so comparisons
/// are only meaningful while the originating handle still holds the id.
///
/// `ThreadId` is usable as a key in both ordered and hashed collections. The
/// ordering is over the raw representation and carries no native meaning.
#[derive(Clone, Copy, Default)]
pub struct ThreadId {
    native: Option<libc::pthread_t>,
}

impl ThreadId {
    /// The null identity.
    pub const fn null() -> Self {
        Self { native: None }
    }

    /// Wrap a raw native identifier.
    pub(crate) const fn from_raw(native: libc::pthread_t) -> Self {
        Self {
            native: Some(native),
        }
    }

    /// Identity of the calling thread.
    pub fn current() -> Self {
        // SAFETY: pthread_self has no preconditions and cannot fail.
        Self::from_raw(unsafe { libc::pthread_self() })
    }

    /// Whether this is the null identity.
    pub const fn is_null(&self) -> bool {
        self.native.is_none()
    }

    /// Get the raw native identifier, or `None` for the null identity.
    pub const fn as_raw(&self) -> Option<libc::pthread_t> {
        self.native
    }
}

/// Identity of the calling thread.
pub fn current_thread_id() -> ThreadId {
    ThreadId::current()
}

impl PartialEq for ThreadId {
    fn eq(&self, other: &Self) -> bool {
        match (self.native, other.native) {
            (None, None) => true,
            // SAFETY: pthread_equal only compares its arguments.
            (Some(lhs), Some(rhs)) => unsafe { libc::pthread_equal(lhs, rhs) != 0 },
            _ => false,
        }
    }
}

impl Eq for ThreadId {}

impl PartialOrd for ThreadId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ThreadId {
    fn cmp(&self, other: &Self) -> Ordering {
        // None sorts before every Some.
        self.native.cmp(&other.native)
    }
}

impl Hash for ThreadId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.native.hash(state);
    }
}

impl fmt::Debug for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.native {
            Some(native) => write!(f, "ThreadId({:?})", native),
            None => f.write_str("ThreadId(null)"),
        }
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.native {
            Some(native) => write!(f, "{:?}", native),
            None => f.write_str("id of a non-executing thread"),
        }
    }
}

// SAFETY: a ThreadId is plain identifier data; it is never dereferenced, even
// on platforms where `pthread_t` is a pointer.
unsafe impl Send for ThreadId {}
// SAFETY: see above.
unsafe impl Sync for ThreadId {}
