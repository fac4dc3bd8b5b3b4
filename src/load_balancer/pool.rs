//! Backend pool management.
//!
//! # Responsibilities
//! - Own the ordered set of backends currently eligible for selection
//! - Hand out backends in round-robin order
//! - Accept wholesale replacement from the health monitor
//!
//! Members and cursor live behind one mutex; every public operation is a
//! single critical section.

use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::load_balancer::{backend::Backend, round_robin::RoundRobin};

/// Errors returned by pool operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PoolError {
    /// No backend is currently in rotation.
    #[error("no backend available")]
    NotAvailable,
}

/// A backend picked for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub backend: Backend,
    /// Rotation slot the backend was read from.
    pub slot: usize,
}

#[derive(Debug, Default)]
struct PoolState {
    members: Vec<Backend>,
    cursor: RoundRobin,
}

/// The live, lock-guarded set of backends eligible for selection.
#[derive(Debug, Default)]
pub struct BackendPool {
    state: Mutex<PoolState>,
}

impl BackendPool {
    /// Create a pool with the given members and the cursor at zero.
    pub fn new(members: Vec<Backend>) -> Self {
        Self {
            state: Mutex::new(PoolState {
                members,
                cursor: RoundRobin::new(),
            }),
        }
    }

    // Pool state is consistent after every critical section, so a poisoned
    // lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read the member under the cursor and advance it.
    pub fn select_next(&self) -> Result<Selection, PoolError> {
        let mut state = self.lock();
        let len = state.members.len();
        let slot = state.cursor.next_slot(len).ok_or(PoolError::NotAvailable)?;
        Ok(Selection {
            backend: state.members[slot].clone(),
            slot,
        })
    }

    /// Replace the member list wholesale.
    ///
    /// The cursor keeps its positional offset, wrapped onto the new length.
    pub fn replace_members(&self, members: Vec<Backend>) {
        let mut state = self.lock();
        state.cursor.rebase(members.len());
        state.members = members;
    }

    pub fn is_empty(&self) -> bool {
        self.lock().members.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lock().members.len()
    }

    /// Copy of the current members, in rotation order.
    pub fn snapshot(&self) -> Vec<Backend> {
        self.lock().members.clone()
    }
}
