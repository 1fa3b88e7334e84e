//! Trait seams between the engine and its collaborators.

pub mod notifier;

pub use notifier::PermissionNotifier;
