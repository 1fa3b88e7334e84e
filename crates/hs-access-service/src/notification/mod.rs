//! Post-commit delivery of access-control events.

pub mod broadcast;

pub use broadcast::{BroadcastNotifier, NoopNotifier};
