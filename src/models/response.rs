use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

pub mod error_codes {
    pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
    pub const EXCEPTION: &str = "EXCEPTION";

    pub fn http(status: u16) -> String {
        format!("HTTP_{}", status)
    }
}

/// Status reported by the gateway. Values outside the known vocabulary
/// deserialize to `Unknown` and never count as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Approved,
    Pending,
    Error,
    #[default]
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    pub fn is_success(self) -> bool {
        matches!(self, PaymentStatus::Approved | PaymentStatus::Pending)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub transaction_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub order_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: PaymentStatus,
    #[serde(
        serialize_with = "rust_decimal::serde::float::serialize",
        deserialize_with = "amount_or_zero"
    )]
    pub amount: Decimal,
    #[serde(deserialize_with = "null_as_default")]
    pub currency: String,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub processed_at: Option<DateTime<Utc>>,
    /// Bank slip page or PIX QR code.
    pub payment_url: Option<String>,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
}

// Gateways mandam null em qualquer campo; null vira o valor padrão.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn amount_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(rust_decimal::serde::float_option::deserialize(deserializer)?.unwrap_or_default())
}

/// RFC 3339, or a timestamp without offset (read as UTC).
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Ok(None),
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }

    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Some(Utc.from_utc_datetime(&naive)))
        .map_err(|e| serde::de::Error::custom(format!("invalid processedAt {:?}: {}", raw, e)))
}

impl PaymentResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn failure(
        order_id: impl Into<String>,
        error_code: impl Into<String>,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            status: PaymentStatus::Error,
            error_code: Some(error_code.into()),
            error_message: Some(error_message.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let parse = |raw: &str| serde_json::from_str::<PaymentStatus>(&format!("\"{}\"", raw)).unwrap();

        assert_eq!(parse("approved"), PaymentStatus::Approved);
        assert_eq!(parse("pending"), PaymentStatus::Pending);
        assert_eq!(parse("error"), PaymentStatus::Error);
        assert_eq!(parse("chargeback"), PaymentStatus::Unknown);
        assert!(parse("approved").is_success());
        assert!(parse("pending").is_success());
        assert!(!parse("error").is_success());
        assert!(!parse("APPROVED").is_success());
    }

    #[test]
    fn test_deserialize_gateway_body() {
        let body = r#"{
            "transactionId": "tx-123",
            "orderId": "ORDER-1",
            "status": "pending",
            "amount": 89.9,
            "currency": "BRL",
            "processedAt": "2025-03-01T12:00:00Z",
            "paymentUrl": "https://pay.example.com/qr/tx-123"
        }"#;

        let response: PaymentResponse = serde_json::from_str(body).unwrap();
        assert!(response.is_success());
        assert_eq!(response.transaction_id, "tx-123");
        assert_eq!(response.amount, Decimal::new(899, 1));
        assert_eq!(response.payment_url.as_deref(), Some("https://pay.example.com/qr/tx-123"));
        assert!(response.error_code.is_none());
    }

    #[test]
    fn test_missing_status_is_unknown() {
        let response: PaymentResponse = serde_json::from_str(r#"{"transactionId": "tx-1"}"#).unwrap();
        assert_eq!(response.status, PaymentStatus::Unknown);
        assert!(!response.is_success());
    }

    #[test]
    fn test_null_status_is_unknown() {
        let response: PaymentResponse =
            serde_json::from_str(r#"{"transactionId": "tx-1", "status": null}"#).unwrap();
        assert_eq!(response.transaction_id, "tx-1");
        assert_eq!(response.status, PaymentStatus::Unknown);
        assert!(!response.is_success());
    }

    #[test]
    fn test_null_fields_fall_back_to_defaults() {
        let body = r#"{
            "transactionId": null,
            "orderId": null,
            "status": "pending",
            "amount": null,
            "currency": null,
            "processedAt": null,
            "paymentUrl": null
        }"#;

        let response: PaymentResponse = serde_json::from_str(body).unwrap();
        assert!(response.is_success());
        assert_eq!(response.transaction_id, "");
        assert_eq!(response.order_id, "");
        assert_eq!(response.currency, "");
        assert_eq!(response.amount, Decimal::ZERO);
        assert!(response.processed_at.is_none());
        assert!(response.payment_url.is_none());
    }

    #[test]
    fn test_processed_at_without_offset_is_utc() {
        let response: PaymentResponse = serde_json::from_str(
            r#"{"status": "approved", "processedAt": "2025-03-01T12:00:00"}"#,
        )
        .unwrap();
        assert!(response.is_success());
        assert_eq!(
            response.processed_at,
            Some(Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap())
        );

        let fractional: PaymentResponse = serde_json::from_str(
            r#"{"status": "approved", "processedAt": "2025-03-01T12:00:00.1234567"}"#,
        )
        .unwrap();
        assert!(fractional.processed_at.is_some());

        let offset: PaymentResponse = serde_json::from_str(
            r#"{"status": "approved", "processedAt": "2025-03-01T09:00:00-03:00"}"#,
        )
        .unwrap();
        assert_eq!(offset.processed_at, response.processed_at);
    }

    #[test]
    fn test_failure() {
        let response = PaymentResponse::failure("ORDER-1", error_codes::http(503), "Service Unavailable");
        assert_eq!(response.status, PaymentStatus::Error);
        assert_eq!(response.error_code.as_deref(), Some("HTTP_503"));
        assert!(!response.is_success());
    }
}
