//! The order-creation collaborator checkout submits to.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::domain::orders::Order;

use super::OrderSubmission;

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    /// The store answered with a non-2xx status. `message` is the body's `error` field, if any.
    #[error("Order was rejected with status {status}: {}", .message.as_deref().unwrap_or("no reason given"))]
    Rejected { status: u16, message: Option<String> },
    #[error("Order could not be submitted: {0}")]
    Transport(#[from] reqwest::Error),
}

#[async_trait]
pub trait OrderGateway: Send + Sync {
    async fn create_order(&self, submission: &OrderSubmission) -> Result<Order, SubmissionError>;
}

/// Talks to the store server's `POST /api/orders`.
#[derive(Debug, Clone)]
pub struct HttpOrderGateway {
    client: Client,
    base_url: String,
}

impl HttpOrderGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        HttpOrderGateway::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        HttpOrderGateway {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    fn orders_url(&self) -> String {
        format!("{}/api/orders", self.base_url)
    }
}

#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[async_trait]
impl OrderGateway for HttpOrderGateway {
    async fn create_order(&self, submission: &OrderSubmission) -> Result<Order, SubmissionError> {
        let response = self
            .client
            .post(self.orders_url())
            .json(submission)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error);
            debug!("Order submission rejected with {status}: {message:?}");
            return Err(SubmissionError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}
