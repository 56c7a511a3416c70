//! User hook invocation
//!
//! External callbacks are called behind a panic boundary; a panicking hook
//! is logged and treated as having declined, keeping the state machine's
//! control flow free of unwinding.

use std::panic::{catch_unwind, AssertUnwindSafe};

/// Outcome of a user hook call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookResult<T> {
    Value(T),
    /// The hook panicked; the caller falls back to its default behavior
    Declined,
}

impl<T> HookResult<T> {
    pub fn value_or(self, default: T) -> T {
        match self {
            HookResult::Value(value) => value,
            HookResult::Declined => default,
        }
    }
}

/// Call a user-supplied hook, converting a panic into a declined outcome
pub fn call_hook<T>(name: &str, hook: impl FnOnce() -> T) -> HookResult<T> {
    match catch_unwind(AssertUnwindSafe(hook)) {
        Ok(value) => HookResult::Value(value),
        Err(_) => {
            tracing::warn!("user hook {:?} panicked, treating as declined", name);
            HookResult::Declined
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_passes_through() {
        assert_eq!(call_hook("ok", || 42), HookResult::Value(42));
    }

    #[test]
    fn test_panic_declines() {
        let result: HookResult<i32> = call_hook("boom", || panic!("hook failure"));
        assert_eq!(result, HookResult::Declined);
        assert_eq!(result.value_or(7), 7);
    }
}
