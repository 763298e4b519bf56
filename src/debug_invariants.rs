//! Structural self-checks for the graph and the replicated state.
//!
//! Checks always run through [`DebugInvariants::validate_invariants`]; the
//! panicking variant is compiled in only under `debug_assertions` or the
//! `check-invariants` feature.

use crate::sssp_error::SsspError;

pub trait DebugInvariants {
    /// Return the first violated invariant, if any.
    fn validate_invariants(&self) -> Result<(), SsspError>;

    /// Panic on a violated invariant when checking is compiled in; no-op otherwise.
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), std::any::type_name::<Self>());
    }
}

/// `Err(InvariantViolation)` built lazily from `msg` unless `cond` holds.
pub(crate) fn ensure(cond: bool, msg: impl FnOnce() -> String) -> Result<(), SsspError> {
    if cond {
        Ok(())
    } else {
        Err(SsspError::InvariantViolation(msg()))
    }
}

#[macro_export]
macro_rules! debug_invariants {
    ($check:expr, $what:expr) => {
        #[cfg(any(debug_assertions, feature = "check-invariants"))]
        if let Err(e) = $check {
            panic!("[invariants] {}: {}", $what, e);
        }
    };
}
