//! Packaging of a thread's work for the native entry point.
//!
//! `pthread_create` only accepts a fixed `extern "C" fn(*mut c_void) -> *mut c_void`
//! and one untyped pointer. A [`Routine`] boxes the callable together with its
//! arguments, is leaked to that pointer, and is reclaimed by [`trampoline`] on
//! the new thread (or by the spawner if creation fails).

use core::ffi::c_void;
use core::ptr;
use std::ffi::CString;
use std::panic::{self, AssertUnwindSafe};

use super::fatal;

/// Signature the native runtime expects for a thread entry point.
pub(crate) type Entry = extern "C" fn(*mut c_void) -> *mut c_void;

/// A callable plus its arguments, owned by whoever currently holds the raw pointer.
pub(crate) struct Routine<F, A> {
    func: F,
    args: A,
    name: Option<CString>,
}

impl<F, A> Routine<F, A> {
    pub(crate) fn new(func: F, args: A, name: Option<CString>) -> Self {
        Self { func, args, name }
    }

    /// Leak the routine into a pointer suitable for `pthread_create`.
    pub(crate) fn into_raw(self) -> *mut c_void {
        Box::into_raw(Box::new(self)).cast()
    }

    /// Reclaim a routine leaked by [`Routine::into_raw`].
    ///
    /// # Safety
    ///
    /// `data` must come from `Routine::<F, A>::into_raw` and must not have been
    /// reclaimed already.
    pub(crate) unsafe fn from_raw(data: *mut c_void) -> Box<Self> {
        // SAFETY: guaranteed by the caller.
        unsafe { Box::from_raw(data.cast::<Self>()) }
    }

    /// Entry point that runs a `Routine<F, A>` returning `R`.
    pub(crate) fn entry<R>() -> Entry
    where
        F: FnOnce(A) -> R,
    {
        trampoline::<F, A, R>
    }

    fn run<R>(self) -> R
    where
        F: FnOnce(A) -> R,
    {
        if let Some(name) = &self.name {
            set_current_name(name);
        }
        (self.func)(self.args)
    }
}

/// Native entry point for a spawned thread.
///
/// Takes ownership of the routine behind `data`, runs it, discards its result
/// and returns null. A panic escaping the routine aborts the process.
extern "C" fn trampoline<F, A, R>(data: *mut c_void) -> *mut c_void
where
    F: FnOnce(A) -> R,
{
    // SAFETY: the spawner handed ownership of this pointer to the new thread
    // when pthread_create succeeded.
    let routine = unsafe { Routine::<F, A>::from_raw(data) };

    let outcome = panic::catch_unwind(AssertUnwindSafe(move || {
        drop(routine.run());
    }));
    if outcome.is_err() {
        fatal(format_args!(
            "thread {} panicked; unwinding out of a native thread is not allowed",
            super::current_thread_id()
        ));
    }

    ptr::null_mut()
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn set_current_name(name: &CString) {
    // The kernel limit is 16 bytes including the terminator.
    const TASK_COMM_LEN: usize = 16;

    let bytes = name.as_bytes();
    let mut buf = [0 as libc::c_char; TASK_COMM_LEN];
    for (dst, src) in buf.iter_mut().zip(&bytes[..bytes.len().min(TASK_COMM_LEN - 1)]) {
        *dst = *src as libc::c_char;
    }

    // SAFETY: `buf` is NUL terminated and outlives the call.
    let rc = unsafe { libc::pthread_setname_np(libc::pthread_self(), buf.as_ptr()) };
    if rc != 0 {
        log::debug!("failed to set thread name {:?}: os error {}", name, rc);
    }
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn set_current_name(name: &CString) {
    log::debug!("thread names are not supported on this platform; ignoring {:?}", name);
}
