#![cfg(feature = "control")]
//! Property-based tests for Thunk laws.
//!
//! This module verifies that Thunk satisfies:
//!
//! - **Idempotence**: force() returns the same value every time
//! - **Laziness**: computation is deferred until force()
//! - **Memoization**: computation runs at most once, across every clone
//! - **Map laws**: identity and composition

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use fstream::control::Thunk;
use proptest::prelude::*;

// =============================================================================
// Idempotence Law
// =============================================================================

proptest! {
    /// Idempotence: calling force() multiple times returns the same value
    #[test]
    fn prop_thunk_idempotence(value in any::<String>()) {
        let expected = value.clone();
        let thunk = Thunk::new(move || value);

        prop_assert_eq!(thunk.force(), &expected);
        prop_assert_eq!(thunk.force(), &expected);
        prop_assert_eq!(thunk.into_inner(), expected);
    }
}

// =============================================================================
// Memoization Law
// =============================================================================

proptest! {
    /// Memoization: the initializer runs once no matter which clone forces
    #[test]
    fn prop_thunk_memoization_across_clones(value in any::<i32>(), clones in 1_usize..8) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let thunk = Thunk::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            value
        });
        let handles: Vec<Thunk<i32>> = (0..clones).map(|_| thunk.clone()).collect();

        prop_assert_eq!(calls.load(Ordering::SeqCst), 0);
        for handle in &handles {
            prop_assert_eq!(*handle.force(), value);
        }
        prop_assert!(thunk.is_forced());
        prop_assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

// =============================================================================
// Map Laws
// =============================================================================

proptest! {
    /// Map identity: thunk.map(|x| x) forces to the same value
    #[test]
    fn prop_thunk_map_identity(value in any::<i32>()) {
        let thunk = Thunk::new(move || value);
        let mapped = thunk.map(|x| *x);

        prop_assert_eq!(*mapped.force(), *thunk.force());
    }
}

proptest! {
    /// Map composition: thunk.map(f).map(g) == thunk.map(|x| g(f(x)))
    #[test]
    fn prop_thunk_map_composition(value in any::<i32>()) {
        let function1 = |n: &i32| n.wrapping_add(1);
        let function2 = |n: &i32| n.to_string();

        let thunk = Thunk::new(move || value);
        let left = thunk.map(function1).map(function2);
        let right = thunk.map(move |x| function2(&function1(x)));

        prop_assert_eq!(left.force(), right.force());
    }
}

proptest! {
    /// Ready thunks are already forced and hold the given value
    #[test]
    fn prop_thunk_ready_is_forced(value in any::<i64>()) {
        let thunk = Thunk::ready(value);
        prop_assert!(thunk.is_forced());
        prop_assert_eq!(thunk.get(), Some(&value));
    }
}
