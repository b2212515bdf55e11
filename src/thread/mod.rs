use core::fmt;
use core::ptr;

use crate::errors::SpawnError;

pub mod builder;
pub mod id;
pub(crate) mod routine;

pub use builder::Builder;
pub use id::{current_thread_id, ThreadId};

/// Owning handle for one native thread.
///
/// A `Thread` is either *empty* or *owns* a running (or finished but not yet
/// joined) native thread. [`is_joinable`](Thread::is_joinable) tells the two
/// states apart and is exactly `!self.id().is_null()`.
///
/// Ownership must be resolved explicitly: a handle that still owns its thread
/// has to be [joined](Thread::join) or [detached](Thread::detach) before it is
/// dropped or overwritten. Dropping a joinable handle aborts the process.
///
/// Handles move like any Rust value. To move the thread out while leaving an
/// empty handle behind use [`std::mem::take`].
///
/// ```
/// use native_thread::Thread;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let hits = Arc::new(AtomicUsize::new(0));
/// let worker_hits = Arc::clone(&hits);
///
/// let mut thread = Thread::spawn(move || worker_hits.fetch_add(1, Ordering::Relaxed))?;
/// assert!(thread.is_joinable());
///
/// thread.join();
/// assert!(!thread.is_joinable());
/// assert_eq!(hits.load(Ordering::Relaxed), 1);
/// # Ok::<(), native_thread::SpawnError>(())
/// ```
#[derive(Debug, Default)]
pub struct Thread {
    pub(crate) id: ThreadId,
}

impl Thread {
    /// An empty handle that owns no thread.
    pub const fn empty() -> Self {
        Self {
            id: ThreadId::null(),
        }
    }

    /// Spawn a native thread running `f`.
    ///
    /// The call returns as soon as the thread exists; it does not wait for
    /// `f` to run. The value `f` returns is dropped on the new thread.
    ///
    /// # Errors
    ///
    /// [`SpawnError::Create`] if the native runtime cannot create the thread.
    /// `f` has been dropped by then.
    pub fn spawn<F, R>(f: F) -> Result<Self, SpawnError>
    where
        F: FnOnce() -> R + Send + 'static,
    {
        Builder::new().spawn(f)
    }

    /// Spawn a native thread running `f(args)`.
    pub fn spawn_with<F, A, R>(f: F, args: A) -> Result<Self, SpawnError>
    where
        F: FnOnce(A) -> R + Send + 'static,
        A: Send + 'static,
    {
        Builder::new().spawn_with(f, args)
    }

    /// Identity of the owned thread, or the null identity if the handle is empty.
    pub fn id(&self) -> ThreadId {
        self.id
    }

    /// Whether this handle owns a thread that has not been joined or detached.
    pub fn is_joinable(&self) -> bool {
        !self.id.is_null()
    }

    /// Raw native identifier of the owned thread.
    pub fn native_handle(&self) -> Option<libc::pthread_t> {
        self.id.as_raw()
    }

    /// Block until the owned thread finishes, then release it.
    ///
    /// Everything the thread did happens-before this call returns. On an
    /// empty handle this is a no-op. If the native join fails (for instance
    /// when a thread joins its own handle) the process is aborted rather than
    /// returning without having waited.
    pub fn join(&mut self) {
        let Some(native) = self.id.as_raw() else {
            return;
        };

        // SAFETY: this handle owns `native` and it has been neither joined
        // nor detached.
        let rc = unsafe { libc::pthread_join(native, ptr::null_mut()) };
        if rc != 0 {
            fatal(format_args!(
                "pthread_join failed for thread {}: os error {}",
                self.id, rc
            ));
        }

        log::trace!("joined thread {}", self.id);
        self.id = ThreadId::null();
    }

    /// Let the owned thread run on independently and release it.
    ///
    /// The native runtime reclaims the thread's resources when it exits.
    /// Nothing about the thread's progress can be observed through this
    /// handle afterwards.
    ///
    /// Detaching an empty handle is a contract violation and aborts the
    /// process.
    pub fn detach(&mut self) {
        let Some(native) = self.id.as_raw() else {
            fatal(format_args!("detach() called on a thread handle that owns no thread"));
        };

        // SAFETY: this handle owns `native` and it has been neither joined
        // nor detached.
        let rc = unsafe { libc::pthread_detach(native) };
        if rc != 0 {
            fatal(format_args!(
                "pthread_detach failed for thread {}: os error {}",
                self.id, rc
            ));
        }

        log::trace!("detached thread {}", self.id);
        self.id = ThreadId::null();
    }

    /// Move `other` into `self`.
    ///
    /// Equivalent to `*self = other`, but names the violation when `self`
    /// still owns a thread: that aborts the process instead of silently
    /// abandoning the running thread.
    pub fn assign(&mut self, other: Thread) {
        if self.is_joinable() {
            fatal(format_args!(
                "assigned over thread handle still owning thread {}",
                self.id
            ));
        }
        *self = other;
    }
}

impl Drop for Thread {
    fn drop(&mut self) {
        if self.is_joinable() {
            fatal(format_args!(
                "thread handle dropped while still owning thread {}; join or detach it first",
                self.id
            ));
        }
    }
}

/// Log `reason` and abort the process.
#[cold]
pub(crate) fn fatal(reason: fmt::Arguments<'_>) -> ! {
    log::error!("fatal: {}", reason);
    std::process::abort()
}
