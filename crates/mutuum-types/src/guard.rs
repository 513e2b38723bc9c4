//! Whole-call re-entrancy locks.
//!
//! The protocol executes transaction-serialized: no operation may nest a
//! re-entry into another operation of the same module, in particular not
//! from within a token transfer. Each module owns a [`ReentrancyGuard`]
//! and takes it at the top of every externally reachable mutating
//! operation. The RAII [`EnterGuard`] releases the lock on every exit
//! path, including early `?` returns.

use std::cell::Cell;
use std::rc::Rc;

/// A single-owner re-entrancy lock.
///
/// Not a thread synchronization primitive: the execution model is
/// single-threaded, and the guard only rejects nested entry within one
/// call stack.
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    entered: Rc<Cell<bool>>,
}

impl Clone for ReentrancyGuard {
    /// Cloning state snapshots never happens mid-operation, so a clone
    /// always starts unlocked and shares nothing with the original.
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl ReentrancyGuard {
    /// Create a new, unlocked guard.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entered: Rc::new(Cell::new(false)),
        }
    }

    /// Take the lock for the duration of the returned [`EnterGuard`].
    ///
    /// Returns `None` if the lock is already held, which callers surface
    /// as their module's `Reentrancy` error. The handle owns its link to
    /// the lock, so holding it does not borrow the guard's owner.
    #[must_use]
    pub fn enter(&self) -> Option<EnterGuard> {
        if self.entered.get() {
            return None;
        }
        self.entered.set(true);
        Some(EnterGuard {
            entered: Rc::clone(&self.entered),
        })
    }

    /// Whether the lock is currently held.
    #[must_use]
    pub fn is_entered(&self) -> bool {
        self.entered.get()
    }
}

/// RAII handle holding a [`ReentrancyGuard`] lock.
#[derive(Debug)]
pub struct EnterGuard {
    entered: Rc<Cell<bool>>,
}

impl Drop for EnterGuard {
    fn drop(&mut self) {
        self.entered.set(false);
    }
}
