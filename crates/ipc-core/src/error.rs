//! Error kinds for the ping-pong buffer protocol.
//!
//! Mirrors `kaal-capability-broker`'s `CapabilityError`: a `thiserror`-derived,
//! `no_std`-compatible enum with no heap allocation in its variants.

use thiserror::Error;

/// Errors returned by [`crate::buffer_manager::BufferManager`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IpcError {
    /// Null pointer or otherwise invalid argument (bad buffer id, zero-sized region, ...).
    #[error("invalid argument")]
    Invalid,

    /// A buffer-state transition was attempted from a state that does not
    /// permit it (double-commit, release on an IDLE buffer, ...). Indicates
    /// a programming bug in the caller, not a transient condition.
    #[error("buffer {id} is not in the expected state for this operation")]
    WrongState { id: u8 },

    /// `acquire_for_write`/`acquire_for_read` could not complete within the
    /// requested window. Normal back-pressure signal, not a bug.
    #[error("operation timed out")]
    Timeout,

    /// A precondition for initialization was not met (e.g. re-initializing
    /// with a different configuration than the one already in effect).
    #[error("initialization precondition not met")]
    Init,
}

pub type Result<T> = core::result::Result<T, IpcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_state_carries_buffer_id() {
        let e = IpcError::WrongState { id: 1 };
        match e {
            IpcError::WrongState { id } => assert_eq!(id, 1),
            _ => panic!("wrong variant"),
        }
    }
}
