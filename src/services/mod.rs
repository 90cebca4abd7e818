pub mod http_client;
pub mod payment_gateway_client;
pub mod retry_policy;

pub use payment_gateway_client::{PaymentGatewayClient, PaymentService, PAYMENTS_PATH};
pub use retry_policy::{Outcome, RetryPolicy};
