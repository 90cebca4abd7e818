#![allow(dead_code)]

use chrono::{Datelike, Local};
use paygateway_client::models::CreditCardDetails;
use paygateway_client::{FileLogger, GatewayConfig, PaymentGatewayClient, PaymentMethod, PaymentRequest};
use rust_decimal::Decimal;
use std::sync::Arc;
use tempfile::TempDir;

pub fn gateway_for(base_url: &str, max_retries: u32) -> (PaymentGatewayClient, Arc<FileLogger>, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = GatewayConfig {
        api_base_url: base_url.to_string(),
        api_key: "test-key".to_string(),
        timeout_seconds: 5,
        max_retries,
        log_file_path: dir.path().join("logs").join("payment_gateway.log"),
        backoff_unit_ms: 1,
        retry_jitter: false,
    };

    let logger = Arc::new(FileLogger::new(&config.log_file_path).unwrap());
    let client = PaymentGatewayClient::new(&config, Arc::clone(&logger)).unwrap();
    (client, logger, dir)
}

pub fn log_lines(logger: &FileLogger) -> Vec<String> {
    std::fs::read_to_string(logger.path())
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

fn base_request(order_id: &str, amount: Decimal, method: PaymentMethod) -> PaymentRequest {
    PaymentRequest {
        order_id: order_id.to_string(),
        amount,
        currency: "BRL".to_string(),
        customer_name: "Maria Souza".to_string(),
        customer_email: "maria@example.com".to_string(),
        customer_document: "987.654.321-00".to_string(),
        method,
        callback_url: "https://modastyle.example.com/payment/callback".to_string(),
        description: "Compra de roupas - ModaStyle".to_string(),
    }
}

pub fn pix_request(order_id: &str) -> PaymentRequest {
    base_request(
        order_id,
        Decimal::new(8990, 2),
        PaymentMethod::Pix { key: "maria@example.com".to_string() },
    )
}

/// Card expiring in December, two years from now.
pub fn credit_card_request(order_id: &str) -> PaymentRequest {
    let year = (Local::now().year() + 2) % 100;
    base_request(
        order_id,
        Decimal::new(15075, 2),
        PaymentMethod::CreditCard(CreditCardDetails {
            card_number: "4111111111111111".to_string(),
            holder_name: "JOAO SILVA".to_string(),
            expiration: format!("12/{:02}", year),
            cvv: "123".to_string(),
        }),
    )
}
