//! Error types for thread creation.
//!
//! Only spawning can fail recoverably. Every other contract violation in this
//! crate (leaking a joinable handle, detaching an empty one) is fatal and never
//! surfaces as a value of this type.

use std::io;
use thiserror::Error;

/// Errors that can occur during thread spawning.
///
/// When any of these is returned, the routine handed to the spawn call has
/// already been dropped and no [`ThreadId`](crate::ThreadId) was produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpawnError {
    /// The native runtime refused to create the thread.
    #[error("Failed to create thread: {message} (os error {code})")]
    Create {
        /// Raw error code returned by `pthread_create`.
        code: i32,
        /// Platform description of `code`.
        message: String,
    },
    /// The requested stack size was rejected by the native runtime.
    #[error("Invalid stack size: {0}")]
    InvalidStackSize(usize),
    /// Thread name contains an interior NUL byte.
    #[error("Invalid thread name: {0:?}")]
    InvalidName(String),
    /// Thread attribute setup failed.
    #[error("Failed to configure thread attributes: {message} (os error {code})")]
    Attribute {
        /// Raw error code returned by the `pthread_attr_*` call.
        code: i32,
        /// Platform description of `code`.
        message: String,
    },
}

impl SpawnError {
    /// Build a [`SpawnError::Create`] from a `pthread_create` return code.
    pub fn create(code: i32) -> Self {
        SpawnError::Create {
            code,
            message: describe(code),
        }
    }

    /// Build a [`SpawnError::Attribute`] from a `pthread_attr_*` return code.
    pub fn attribute(code: i32) -> Self {
        SpawnError::Attribute {
            code,
            message: describe(code),
        }
    }

    /// The native error code, if the native runtime produced one.
    pub fn os_error(&self) -> Option<i32> {
        match self {
            SpawnError::Create { code, .. } | SpawnError::Attribute { code, .. } => Some(*code),
            SpawnError::InvalidStackSize(_) | SpawnError::InvalidName(_) => None,
        }
    }

    /// Whether the failure was caused by the system running out of threads or memory.
    pub fn is_resource_exhaustion(&self) -> bool {
        matches!(self.os_error(), Some(libc::EAGAIN) | Some(libc::ENOMEM))
    }
}

fn describe(code: i32) -> String {
    let text = io::Error::from_raw_os_error(code).to_string();
    // io::Error appends " (os error N)"; the variants format the code themselves.
    match text.rfind(" (os error ") {
        Some(idx) => text[..idx].to_owned(),
        None => text,
    }
}
