pub mod app;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod utils;

pub use app::config::GatewayConfig;
pub use error::{ConfigError, GatewayError};
pub use logging::FileLogger;
pub use models::{PaymentMethod, PaymentRequest, PaymentResponse, PaymentStatus};
pub use services::{PaymentGatewayClient, PaymentService};
