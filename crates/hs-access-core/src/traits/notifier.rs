//! Notifier trait for post-commit permission change delivery.

use async_trait::async_trait;

use crate::events::DomainEvent;
use crate::result::AppResult;

/// Receives domain events after an access-control transaction commits.
///
/// The search index refresher is the main consumer. Delivery failures are
/// logged by the caller and never roll back the committed mutation.
#[async_trait]
pub trait PermissionNotifier: Send + Sync + std::fmt::Debug + 'static {
    /// Deliver a batch of events produced by one transaction.
    async fn notify(&self, events: &[DomainEvent]) -> AppResult<()>;
}
