pub mod api;
pub mod metrics;

pub use api::{slugify, WebflowClient};
pub use metrics::{ApiMetrics, MetricsCollector, RequestMetrics};

use async_trait::async_trait;
use scribebot_core::{CoreError, PostImage, PublishedPost};

/// Content-management publish collaborator. A successful publish returns
/// the durable identifier assigned by the CMS.
#[async_trait]
pub trait ContentPublisher: Send + Sync {
    async fn publish(
        &self,
        title: &str,
        body: &str,
        image: Option<&PostImage>,
    ) -> Result<PublishedPost, CoreError>;
}
