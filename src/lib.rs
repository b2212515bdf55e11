#![deny(unsafe_op_in_unsafe_fn)]
#![forbid(unreachable_pub)]

//! Move-only handles for native POSIX threads.
//!
//! A [`Thread`] owns at most one native thread. It is created empty or by
//! spawning a closure, and its thread must be disposed of explicitly with
//! [`Thread::join`] (wait for completion) or [`Thread::detach`] (let it run
//! on alone) before the handle goes away.
//!
//! # Quick Start
//!
//! ```
//! use native_thread::{Builder, Thread};
//!
//! let mut first = Thread::spawn(|| 6 * 7)?;
//! let mut second = Builder::new().name("second").spawn_with(|n: u32| n + 1, 41)?;
//!
//! assert_ne!(first.id(), second.id());
//!
//! first.join();
//! second.detach();
//! # Ok::<(), native_thread::SpawnError>(())
//! ```
//!
//! # Contract violations
//!
//! Losing track of a running thread is treated as a bug, never as an error
//! value. The process is aborted (after an error-level [`log`] record) when:
//! - a joinable [`Thread`] is dropped or overwritten,
//! - [`Thread::detach`] is called on an empty handle,
//! - the native join or detach of an owned thread fails (e.g. a thread joins itself),
//! - a spawned closure panics.
//!
//! The only recoverable failure is spawning, reported as [`SpawnError`].

#[cfg(not(unix))]
compile_error!("native-thread requires a POSIX threads implementation");

pub mod errors;
pub mod thread;

#[cfg(test)]
mod tests;

// ============================================================================
// Public API
// ============================================================================

// Threads
pub use thread::{current_thread_id, Builder, Thread, ThreadId};

// Errors
pub use errors::SpawnError;
