use crate::app::config::GatewayConfig;
use crate::error::GatewayError;
use crate::logging::FileLogger;
use crate::models::{error_codes, PaymentRequest, PaymentResponse};
use crate::services::http_client::build_http_client;
use crate::services::retry_policy::RetryPolicy;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::sync::Arc;
use url::Url;

pub const PAYMENTS_PATH: &str = "/api/payments";

#[async_trait]
pub trait PaymentService: Send + Sync {
    /// Never fails: every problem is reported through the returned response.
    async fn process_payment(&self, request: &PaymentRequest) -> PaymentResponse;
}

pub struct PaymentGatewayClient {
    client: Client,
    endpoint: Url,
    retry_policy: RetryPolicy,
    logger: Arc<FileLogger>,
}

impl PaymentGatewayClient {
    pub fn new(config: &GatewayConfig, logger: Arc<FileLogger>) -> Result<Self, GatewayError> {
        let endpoint = Url::parse(&config.api_base_url)?.join(PAYMENTS_PATH)?;

        Ok(Self {
            client: build_http_client(config)?,
            endpoint,
            retry_policy: RetryPolicy::from_config(config, Arc::clone(&logger)),
            logger,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn submit(&self, request: &PaymentRequest) -> Result<PaymentResponse, GatewayError> {
        let body = serde_json::to_vec(request)?;

        let response = self
            .retry_policy
            .execute(|attempt| {
                self.logger.log_info(&format!(
                    "Sending payment request to gateway. Order: {} (attempt {})",
                    request.order_id, attempt
                ));

                self.client
                    .post(self.endpoint.clone())
                    .header(CONTENT_TYPE, "application/json; charset=utf-8")
                    .body(body.clone())
                    .send()
            })
            .await?;

        let status = response.status();
        let content = response.text().await?;
        self.logger.log_info(&format!(
            "Response received for order {}. Status: {}",
            request.order_id, status
        ));

        if status.is_success() {
            let payment: PaymentResponse = serde_json::from_str(&content)?;
            self.logger.log_info(&format!(
                "Payment processed. TransactionId: {}, Status: {:?}",
                payment.transaction_id, payment.status
            ));
            return Ok(payment);
        }

        self.logger.log_error(
            &format!(
                "Gateway rejected payment. Status: {}, Response: {}",
                status, content
            ),
            None,
        );

        Ok(PaymentResponse::failure(
            request.order_id.clone(),
            error_codes::http(status.as_u16()),
            format!(
                "Error communicating with the API: {}",
                status.canonical_reason().unwrap_or("Unknown Status")
            ),
        ))
    }
}

#[async_trait]
impl PaymentService for PaymentGatewayClient {
    async fn process_payment(&self, request: &PaymentRequest) -> PaymentResponse {
        if let Err(reason) = request.check() {
            self.logger.log_error(
                &format!("Invalid payment request for order {}: {}", request.order_id, reason),
                None,
            );
            return PaymentResponse::failure(
                request.order_id.clone(),
                error_codes::INVALID_REQUEST,
                format!("Invalid payment data: {}", reason),
            );
        }

        self.logger.log_info(&format!(
            "Processing payment for order {}. Method: {}",
            request.order_id,
            request.method.kind()
        ));

        match self.submit(request).await {
            Ok(response) => response,
            Err(e) => {
                self.logger.log_error(
                    &format!("Exception processing payment for order {}", request.order_id),
                    Some(&e),
                );
                PaymentResponse::failure(
                    request.order_id.clone(),
                    error_codes::EXCEPTION,
                    format!("Internal error: {}", e),
                )
            }
        }
    }
}
