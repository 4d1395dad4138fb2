//! Session state and timer bookkeeping.
//!
//! The session is the single mutable authentication record of the
//! process. It lives behind one lock in the [`TokenManager`](crate::TokenManager)
//! together with the one timer slot, so every state transition and the
//! timer it arms happen atomically.

mod state;
mod timer;

pub use state::SessionState;
pub use timer::{ArmedTimer, TimerKind};

pub(crate) use state::Session;
pub(crate) use timer::TimerSlot;
