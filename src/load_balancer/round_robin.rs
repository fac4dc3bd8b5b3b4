//! Round-robin cursor arithmetic.

/// Positional rotation cursor.
///
/// Holds no reference to the members it indexes; the owning pool supplies the
/// current length on every call and keeps both under one lock.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RoundRobin {
    position: usize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the slot to serve and advance past it.
    ///
    /// Returns `None` for an empty member list and leaves the cursor untouched.
    pub fn next_slot(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let slot = self.position % len;
        self.position = (slot + 1) % len;
        Some(slot)
    }

    /// Wrap the cursor onto a member list of a new length.
    ///
    /// The positional offset is kept; a shorter list wraps it via modulo.
    pub fn rebase(&mut self, len: usize) {
        if len > 0 {
            self.position %= len;
        }
    }
}
