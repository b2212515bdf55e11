//! Thread configuration and spawning.

use core::mem::{self, MaybeUninit};
use std::ffi::CString;

use super::routine::Routine;
use super::{Thread, ThreadId};
use crate::errors::SpawnError;

/// Configuration for a new thread.
///
/// `Builder::new().spawn(f)` behaves exactly like [`Thread::spawn`].
///
/// ```no_run
/// use native_thread::Builder;
///
/// let mut worker = Builder::new()
///     .name("worker")
///     .stack_size(256 * 1024)
///     .spawn(|| println!("hello from a named thread"))
///     .expect("failed to spawn thread");
/// worker.join();
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder {
    name: Option<String>,
    stack_size: Option<usize>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name the thread. On Linux the name is visible to debuggers and `ps`,
    /// truncated to 15 bytes.
    pub fn name<T: Into<String>>(mut self, name: T) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Request a stack of at least `size` bytes. The size is rounded up to a
    /// whole number of pages.
    pub fn stack_size(mut self, size: usize) -> Self {
        self.stack_size = Some(size);
        self
    }

    /// Spawn a thread running `f`.
    pub fn spawn<F, R>(self, f: F) -> Result<Thread, SpawnError>
    where
        F: FnOnce() -> R + Send + 'static,
    {
        self.spawn_with(move |(): ()| f(), ())
    }

    /// Spawn a thread running `f(args)`.
    ///
    /// `args` is moved to the new thread alongside `f`; pass a tuple for
    /// several arguments. Whatever `f` returns is dropped on the new thread.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is rejected or the native runtime cannot
    /// create the thread. In either case `f` and `args` have been dropped and
    /// no thread was started.
    pub fn spawn_with<F, A, R>(self, f: F, args: A) -> Result<Thread, SpawnError>
    where
        F: FnOnce(A) -> R + Send + 'static,
        A: Send + 'static,
    {
        let name = self
            .name
            .map(|name| {
                CString::new(name).map_err(|err| {
                    SpawnError::InvalidName(String::from_utf8_lossy(&err.into_vec()).into_owned())
                })
            })
            .transpose()?;

        let mut attr = ThreadAttr::new()?;
        if let Some(size) = self.stack_size {
            attr.set_stack_size(size)?;
        }

        let data = Routine::new(f, args, name).into_raw();
        let mut native = MaybeUninit::<libc::pthread_t>::uninit();
        // SAFETY: `attr` is initialized, `data` is a live routine whose
        // ownership moves to the new thread only if creation succeeds.
        let rc = unsafe {
            libc::pthread_create(
                native.as_mut_ptr(),
                attr.as_ptr(),
                Routine::<F, A>::entry::<R>(),
                data,
            )
        };
        drop(attr);

        if rc != 0 {
            // SAFETY: no thread was created, so the routine is still ours.
            drop(unsafe { Routine::<F, A>::from_raw(data) });
            let err = SpawnError::create(rc);
            log::warn!("{}", err);
            return Err(err);
        }

        // SAFETY: pthread_create succeeded and wrote the identifier.
        let id = ThreadId::from_raw(unsafe { native.assume_init() });
        log::trace!("spawned thread {}", id);
        Ok(Thread { id })
    }
}

/// Owned `pthread_attr_t`, destroyed on drop.
struct ThreadAttr {
    attr: Box<libc::pthread_attr_t>,
}

impl ThreadAttr {
    fn new() -> Result<Self, SpawnError> {
        // SAFETY: all-zero is a valid bit pattern for the storage; it is
        // initialized by pthread_attr_init before any other use.
        let mut attr: Box<libc::pthread_attr_t> = Box::new(unsafe { mem::zeroed() });
        // SAFETY: `attr` points to writable storage.
        let rc = unsafe { libc::pthread_attr_init(&mut *attr) };
        if rc != 0 {
            return Err(SpawnError::attribute(rc));
        }
        Ok(Self { attr })
    }

    fn set_stack_size(&mut self, size: usize) -> Result<(), SpawnError> {
        let size = round_to_page(size);
        // SAFETY: the attribute object is initialized and exclusively ours.
        let rc = unsafe { libc::pthread_attr_setstacksize(&mut *self.attr, size) };
        match rc {
            0 => Ok(()),
            libc::EINVAL => Err(SpawnError::InvalidStackSize(size)),
            rc => Err(SpawnError::attribute(rc)),
        }
    }

    fn as_ptr(&self) -> *const libc::pthread_attr_t {
        &*self.attr
    }
}

impl Drop for ThreadAttr {
    fn drop(&mut self) {
        // SAFETY: initialized in `new` and destroyed exactly once here.
        let rc = unsafe { libc::pthread_attr_destroy(&mut *self.attr) };
        debug_assert_eq!(rc, 0);
    }
}

fn round_to_page(size: usize) -> usize {
    // SAFETY: sysconf has no preconditions.
    let page = match unsafe { libc::sysconf(libc::_SC_PAGESIZE) } {
        page if page > 0 => page as usize,
        _ => return size,
    };
    match size.checked_add(page - 1) {
        Some(padded) => padded & !(page - 1),
        None => size,
    }
}
