use crate::metrics::{MetricsCollector, RequestMetrics};
use crate::ContentPublisher;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use scribebot_core::{CoreError, PostImage, PublishedPost, WebflowApiError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

const WEBFLOW_API_BASE: &str = "https://api.webflow.com/v2";

/// Lower-case the title and collapse every non-alphanumeric run into a
/// single hyphen. This is the slug format the collection API expects.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_hyphen = false;

    for c in title.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    slug
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CollectionItemRequest {
    field_data: FieldData,
}

#[derive(Debug, Serialize)]
struct FieldData {
    name: String,
    slug: String,
    #[serde(rename = "post-body")]
    post_body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<PostImage>,
}

#[derive(Debug, Deserialize)]
struct CollectionItemResponse {
    id: String,
}

#[derive(Debug, Clone)]
pub struct WebflowClient {
    http_client: Client,
    auth_header: String,
    collection_id: String,
    metrics: Arc<MetricsCollector>,
}

impl WebflowClient {
    pub fn new(api_token: &str, collection_id: String) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            auth_header: format!("Bearer {}", api_token),
            collection_id,
            metrics: Arc::new(MetricsCollector::new()),
        }
    }

    pub async fn get_metrics(&self) -> crate::metrics::ApiMetrics {
        self.metrics.get_metrics().await
    }
}

#[async_trait]
impl ContentPublisher for WebflowClient {
    async fn publish(
        &self,
        title: &str,
        body: &str,
        image: Option<&PostImage>,
    ) -> Result<PublishedPost, CoreError> {
        let url = format!(
            "{}/collections/{}/items",
            WEBFLOW_API_BASE, self.collection_id
        );
        let endpoint = "create_item";
        let start_time = Instant::now();

        let request = CollectionItemRequest {
            field_data: FieldData {
                name: title.to_string(),
                slug: slugify(title),
                post_body: body.to_string(),
                image: image.cloned(),
            },
        };

        info!("Publishing \"{}\" to collection {}", title, self.collection_id);
        let response = match self
            .http_client
            .post(&url)
            .header("Authorization", &self.auth_header)
            .header("accept", "application/json")
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!("Network error while publishing: {}", e);
                self.metrics
                    .record_request(RequestMetrics {
                        endpoint: endpoint.to_string(),
                        status_code: None,
                        response_time: start_time.elapsed(),
                        success: false,
                    })
                    .await;

                if e.is_timeout() {
                    return Err(CoreError::WebflowApi(WebflowApiError::RequestTimeout));
                }
                return Err(CoreError::Network(e));
            }
        };

        let status = response.status();
        self.metrics
            .record_request(RequestMetrics {
                endpoint: endpoint.to_string(),
                status_code: Some(status.as_u16()),
                response_time: start_time.elapsed(),
                success: status.is_success(),
            })
            .await;

        if !status.is_success() {
            // The status and response body travel up to the caller verbatim;
            // publishing is never retried.
            let body = response.text().await.unwrap_or_default();
            error!("Publish failed with status {}: {}", status, body);

            if status.as_u16() == 401 {
                return Err(CoreError::WebflowApi(WebflowApiError::InvalidToken));
            }
            return Err(CoreError::WebflowApi(WebflowApiError::RequestFailed {
                status_code: status.as_u16(),
                body,
            }));
        }

        let item: CollectionItemResponse = response.json().await.map_err(|e| {
            error!("Failed to parse publish response: {}", e);
            CoreError::WebflowApi(WebflowApiError::InvalidResponse {
                details: e.to_string(),
            })
        })?;

        debug!("Published item {} for \"{}\"", item.id, title);
        Ok(PublishedPost {
            external_id: item.id,
            title: title.to_string(),
            publish_date: Utc::now(),
        })
    }
}
