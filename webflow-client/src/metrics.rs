use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMetrics {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub average_response_time: Duration,
    pub last_request_time: Option<SystemTime>,
}

impl Default for ApiMetrics {
    fn default() -> Self {
        Self {
            total_requests: 0,
            successful_requests: 0,
            failed_requests: 0,
            average_response_time: Duration::from_millis(0),
            last_request_time: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RequestMetrics {
    pub endpoint: String,
    pub status_code: Option<u16>,
    pub response_time: Duration,
    pub success: bool,
}

#[derive(Debug, Default)]
pub struct MetricsCollector {
    metrics: RwLock<ApiMetrics>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            metrics: RwLock::new(ApiMetrics::default()),
        }
    }

    pub async fn record_request(&self, request: RequestMetrics) {
        debug!(
            "Recorded {} request: status={:?} time={:?} success={}",
            request.endpoint, request.status_code, request.response_time, request.success
        );

        let mut metrics = self.metrics.write().await;

        let total_time =
            metrics.average_response_time * metrics.total_requests as u32 + request.response_time;
        metrics.total_requests += 1;
        metrics.average_response_time = total_time / metrics.total_requests as u32;

        if request.success {
            metrics.successful_requests += 1;
        } else {
            metrics.failed_requests += 1;
        }
        metrics.last_request_time = Some(SystemTime::now());
    }

    pub async fn get_metrics(&self) -> ApiMetrics {
        self.metrics.read().await.clone()
    }

    pub async fn reset_metrics(&self) {
        let mut metrics = self.metrics.write().await;
        *metrics = ApiMetrics::default();
    }
}
