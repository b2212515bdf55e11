//! Test helper utilities and common functionality.

use std::env;
use std::os::unix::process::ExitStatusExt;
use std::process::{Command, ExitStatus, Stdio};

/// Environment variable naming the test a re-executed child should act out.
const ISOLATED_TEST_ENV: &str = "NATIVE_THREAD_ISOLATED_TEST";

/// Whether the current process is the isolated child for `test`.
pub(crate) fn in_isolated_child(test: &str) -> bool {
    env::var(ISOLATED_TEST_ENV).map_or(false, |value| value == test)
}

/// Re-run the single test `module::test` in a fresh copy of this test binary.
///
/// `module` is the `module_path!()` of the calling test.
pub(crate) fn run_isolated(module: &str, test: &str) -> ExitStatus {
    // libtest names tests without the leading crate name.
    let module = module.split_once("::").map_or(module, |(_, rest)| rest);
    let exe = env::current_exe().expect("test binary path");

    Command::new(exe)
        .arg("--exact")
        .arg(format!("{module}::{test}"))
        .arg("--test-threads=1")
        .arg("--nocapture")
        .env(ISOLATED_TEST_ENV, test)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .expect("failed to run isolated test")
}

/// Whether the child was killed by `SIGABRT`.
pub(crate) fn aborted(status: &ExitStatus) -> bool {
    status.signal() == Some(libc::SIGABRT)
}

/// A raw pointer that may cross into a spawned thread.
///
/// Used to share plain memory with no synchronization other than join.
pub(crate) struct SendPtr<T>(*mut T);

// SAFETY: tests only dereference the pointer while the pointee is alive and
// never from two threads at once.
unsafe impl<T> Send for SendPtr<T> {}

impl<T> SendPtr<T> {
    pub(crate) fn new(target: &mut T) -> Self {
        Self(target)
    }

    pub(crate) fn get(&self) -> *mut T {
        self.0
    }
}

/// Simple linear congruential generator for property testing.
pub(crate) struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    pub(crate) fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub(crate) fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    pub(crate) fn gen_range(&mut self, min: u64, max: u64) -> u64 {
        min + ((self.next_u64() >> 33) % (max - min))
    }
}
