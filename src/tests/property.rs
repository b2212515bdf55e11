//! Property-based tests for verifying handle invariants.

use super::helpers::SimpleRng;
use crate::{Thread, ThreadId};
use std::collections::HashSet;
use std::mem;

const SLOTS: usize = 6;
const STEPS: usize = 400;

/// Every handle is joinable exactly when its id is non-null, and no two
/// joinable handles share an id.
fn check_invariants(slots: &[Thread]) {
    let mut live = HashSet::new();
    for thread in slots {
        assert_eq!(thread.is_joinable(), !thread.id().is_null());
        assert_eq!(thread.native_handle().is_some(), thread.is_joinable());
        if thread.is_joinable() {
            assert!(live.insert(thread.id()), "duplicate live id {}", thread.id());
        }
    }
}

#[test]
fn property_lifecycle_preserves_invariants() {
    let mut rng = SimpleRng::new(0x12345678);
    let mut slots: Vec<Thread> = (0..SLOTS).map(|_| Thread::empty()).collect();

    for _ in 0..STEPS {
        let at = rng.gen_range(0, SLOTS as u64) as usize;
        match rng.gen_range(0, 4) {
            0 => {
                if !slots[at].is_joinable() {
                    let spawned = Thread::spawn(|| {}).expect("Failed to spawn thread");
                    let id = spawned.id();
                    slots[at].assign(spawned);
                    assert_eq!(slots[at].id(), id);
                }
            }
            1 => {
                slots[at].join();
                assert!(!slots[at].is_joinable());
            }
            2 => {
                if slots[at].is_joinable() {
                    slots[at].detach();
                }
                assert!(!slots[at].is_joinable());
            }
            _ => {
                let to = rng.gen_range(0, SLOTS as u64) as usize;
                if to != at && !slots[to].is_joinable() {
                    let before = slots[at].id();
                    let moved = mem::take(&mut slots[at]);
                    slots[to].assign(moved);
                    assert_eq!(slots[to].id(), before);
                    assert_eq!(slots[at].id(), ThreadId::null());
                }
            }
        }
        check_invariants(&slots);
    }

    for thread in &mut slots {
        thread.join();
    }
    check_invariants(&slots);
}

#[test]
fn property_ids_of_joinable_handles_unique() {
    let mut rng = SimpleRng::new(0xfeed_beef);
    let mut threads = Vec::new();

    for _ in 0..8 {
        let batch = rng.gen_range(1, 12);
        for _ in 0..batch {
            threads.push(Thread::spawn(|| {}).expect("Failed to spawn thread"));
        }
        check_invariants(&threads);

        // Release a random subset, keeping the rest alive across batches.
        let mut index = 0;
        while index < threads.len() {
            if rng.next_u64() & 1 == 0 {
                let mut thread = threads.swap_remove(index);
                thread.join();
            } else {
                index += 1;
            }
        }
    }

    for thread in &mut threads {
        thread.join();
    }
}
