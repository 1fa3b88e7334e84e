//! Community domain entities.

pub mod model;

pub use model::{Community, CommunityFlags, CreateCommunity};
