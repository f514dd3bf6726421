//! Recording session state machine

mod state;

pub use state::{InvalidStateTransition, SessionState, SessionStateMachine};
